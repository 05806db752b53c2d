use crate::{config::DEFAULT_IDENTIFIER, ExtensionConfig, ServiceError};
use linefeat::LineGeometry;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

/// Aggregate statistics of a computed profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfos {
    /// Length of the line, in meters.
    pub distance: f64,

    #[serde(rename = "denivelepositif")]
    pub positive_elevation_gain: f64,

    #[serde(rename = "denivelenegatif")]
    pub negative_elevation_gain: f64,

    #[serde(rename = "processedpoints")]
    pub processed_point_count: u64,

    #[serde(rename = "referentiel")]
    pub referential_name: String,
}

/// One sample of a profile, transmitted as
/// `[distance, x, y, altitude, slope]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 5]", into = "[f64; 5]")]
pub struct ProfilePoint {
    /// Distance along the line, in meters.
    pub distance: f64,
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
    pub slope: f64,
}

impl From<[f64; 5]> for ProfilePoint {
    fn from([distance, x, y, altitude, slope]: [f64; 5]) -> Self {
        Self {
            distance,
            x,
            y,
            altitude,
            slope,
        }
    }
}

impl From<ProfilePoint> for [f64; 5] {
    fn from(p: ProfilePoint) -> Self {
        [p.distance, p.x, p.y, p.altitude, p.slope]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub infos: ProfileInfos,
    pub points: Vec<ProfilePoint>,
}

impl ProfileResult {
    pub fn write_csv<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "distance,x,y,altitude,slope")?;
        for ProfilePoint {
            distance,
            x,
            y,
            altitude,
            slope,
        } in &self.points
        {
            writeln!(out, "{distance},{x},{y},{altitude},{slope}")?;
        }
        Ok(())
    }
}

/// Raw response of the remote profile process.
///
/// The process answers `{"profile": {"infos": {...}, "points": [...]}}`
/// but may omit either part; such responses carry no profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfilePayload(pub Value);

impl ProfilePayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ServiceError> {
        Ok(Self(serde_json::from_slice(bytes)?))
    }

    pub fn into_result(self) -> Option<ProfileResult> {
        let Value::Object(mut response) = self.0 else {
            return None;
        };
        let Some(Value::Object(mut profile)) = response.remove("profile") else {
            return None;
        };
        let infos = profile.remove("infos").map(serde_json::from_value);
        let points = profile.remove("points").map(serde_json::from_value);
        match (infos, points) {
            (Some(Ok(infos)), Some(Ok(points))) => Some(ProfileResult { infos, points }),
            (infos, points) => {
                debug!(
                    "incomplete profile; infos: {}, points: {}",
                    infos.map_or(false, |r| r.is_ok()),
                    points.map_or(false, |r| r.is_ok())
                );
                None
            }
        }
    }
}

impl From<Value> for ProfilePayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A profile computation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRequest {
    /// Remote process identifier.
    pub identifier: String,

    /// Remote process endpoint.
    pub url: Option<String>,

    /// Line as `LINESTRING(x y,x y,...)`.
    pub geometry: String,

    /// CRS code of `geometry`.
    pub crs: String,

    /// Resampling step, in meters.
    pub distance: f64,

    /// Layer to sample elevation from.
    pub referential: String,
}

/// Value of a process input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputData<'a> {
    Complex { data: &'a str, mime: &'static str },
    Literal(String),
}

impl ProfileRequest {
    pub fn new(
        config: Option<&ExtensionConfig>,
        geometry: &LineGeometry,
        distance: f64,
        referential: impl Into<String>,
    ) -> Self {
        Self {
            identifier: config.map_or_else(
                || DEFAULT_IDENTIFIER.to_string(),
                |c| c.identifier.clone(),
            ),
            url: config.and_then(|c| c.wpsurl.clone()),
            geometry: geometry.to_wkt(),
            crs: geometry.projection().code().to_string(),
            distance,
            referential: referential.into(),
        }
    }

    /// Named inputs of the remote process, in declaration order.
    pub fn inputs(&self) -> [(&'static str, InputData<'_>); 4] {
        [
            (
                "geometrie",
                InputData::Complex {
                    data: &self.geometry,
                    mime: "application/wkt",
                },
            ),
            ("crs", InputData::Literal(self.crs.clone())),
            ("distance", InputData::Literal(self.distance.to_string())),
            ("referentiel", InputData::Literal(self.referential.clone())),
        ]
    }
}
