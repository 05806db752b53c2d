use crate::ConfigError;
use linefeat::Crs;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

/// Process identifier used when the configuration doesn't name one.
pub(crate) const DEFAULT_IDENTIFIER: &str = "gs:LongitudinalProfile";

/// Extension configuration, as delivered by the host at setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionConfig {
    /// Layers the remote process can sample elevation from.
    #[serde(default)]
    pub referentiels: Vec<Referential>,

    /// Selectable resampling steps, in meters.
    #[serde(default)]
    pub distances: Vec<f64>,

    #[serde(default)]
    pub default_distance: Option<f64>,

    #[serde(default)]
    pub default_referentiel: Option<String>,

    /// Identifier of the remote profile process.
    #[serde(default = "default_identifier")]
    pub identifier: String,

    /// Endpoint of the remote profile process.
    #[serde(default)]
    pub wpsurl: Option<String>,

    /// Additional projections an imported map may declare.
    #[serde(default)]
    pub projection_defs: Vec<ProjectionDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referential {
    pub layer_name: String,

    #[serde(default)]
    pub title: String,

    /// CRS of the points returned when sampling this layer.
    #[serde(default)]
    pub projection: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionDef {
    pub code: String,
}

/// Referential and distance a fresh extension starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub referential: String,
    pub distance: f64,
}

fn default_identifier() -> String {
    DEFAULT_IDENTIFIER.to_string()
}

impl ExtensionConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_reader(File::open(path)?)
    }

    /// Resolves the initial referential and distance.
    ///
    /// Explicit defaults win over the first entry of each list.
    pub fn defaults(&self) -> Result<Defaults, ConfigError> {
        let referential = self
            .default_referentiel
            .clone()
            .or_else(|| self.referentiels.first().map(|r| r.layer_name.clone()))
            .ok_or(ConfigError::NoReferential)?;
        let distance = self
            .default_distance
            .or_else(|| self.distances.first().copied())
            .ok_or(ConfigError::NoDistance)?;
        if !(distance.is_finite() && distance > 0.0) {
            return Err(ConfigError::Distance(distance));
        }
        Ok(Defaults {
            referential,
            distance,
        })
    }

    pub fn referential(&self, layer_name: &str) -> Option<&Referential> {
        self.referentiels
            .iter()
            .find(|r| r.layer_name == layer_name)
    }

    pub fn projection_codes(&self) -> Vec<String> {
        self.projection_defs.iter().map(|d| d.code.clone()).collect()
    }
}

impl Referential {
    /// CRS of this referential's sample points, if known.
    pub fn crs(&self) -> Option<Crs> {
        self.projection.as_deref().and_then(|code| code.parse().ok())
    }
}
