//! Line feature extraction for longitudinal profiles.
//!
//! Takes the loosely structured documents a map client produces
//! (identify responses, selection results, dropped map or GeoJSON
//! files), finds the first line feature, and normalizes it into a
//! [`LineGeometry`] in the working CRS (EPSG:3857).
//!
//! # References
//!
//! 1. [RFC 7946, The GeoJSON Format](https://datatracker.ietf.org/doc/html/rfc7946)
//! 1. [EPSG:3857 (spherical web mercator)](https://epsg.io/3857)

mod crs;
mod error;
mod flatten;
mod geometry;
mod import;
mod select;

pub use crate::{
    crs::Crs,
    error::{ImportError, LineError},
    flatten::{flatten_features, Flatten, MAX_DEPTH},
    geometry::LineGeometry,
    import::{read_document, DroppedFile, ImportedDocument, SUPPORTED_PROJECTIONS},
    select::{find_line_feature, LineMatch},
};
pub use {geo, geojson};
