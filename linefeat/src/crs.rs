use crate::LineError;
use geo::geometry::Coord;
use std::{f64::consts::FRAC_PI_4, fmt, str::FromStr};

/// Semi-major axis used by the spherical web mercator projection.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which web mercator becomes a square.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Coordinate reference systems we know how to transform between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Geographic longitude/latitude (EPSG:4326).
    Wgs84,

    /// Spherical web mercator (EPSG:3857, a.k.a. EPSG:900913).
    WebMercator,
}

impl Crs {
    /// CRS every extracted line is normalized into.
    pub const WORKING: Crs = Crs::WebMercator;

    pub fn code(self) -> &'static str {
        match self {
            Self::Wgs84 => "EPSG:4326",
            Self::WebMercator => "EPSG:3857",
        }
    }

    /// Transforms `coord` from `self` into `to`.
    pub fn transform(self, to: Crs, coord: Coord<f64>) -> Coord<f64> {
        match (self, to) {
            (Self::Wgs84, Self::Wgs84) | (Self::WebMercator, Self::WebMercator) => coord,
            (Self::Wgs84, Self::WebMercator) => to_mercator(coord),
            (Self::WebMercator, Self::Wgs84) => to_lon_lat(coord),
        }
    }
}

impl FromStr for Crs {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, LineError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EPSG:4326" | "CRS:84" | "WGS84" | "URN:OGC:DEF:CRS:OGC:1.3:CRS84"
            | "URN:OGC:DEF:CRS:EPSG::4326" => Ok(Self::Wgs84),
            "EPSG:3857" | "EPSG:900913" | "EPSG:102100" | "URN:OGC:DEF:CRS:EPSG::3857" => {
                Ok(Self::WebMercator)
            }
            _ => Err(LineError::UnsupportedCrs(s.to_string())),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn to_mercator(Coord { x: lon, y: lat }: Coord<f64>) -> Coord<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    Coord {
        x: EARTH_RADIUS_M * lon.to_radians(),
        y: EARTH_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
    }
}

fn to_lon_lat(Coord { x, y }: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (x / EARTH_RADIUS_M).to_degrees(),
        y: (2.0 * (y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees(),
    }
}
