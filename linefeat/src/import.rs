use crate::{flatten_features, find_line_feature, Crs, ImportError, LineError, LineGeometry};
use geojson::Feature;
use log::debug;
use serde_json::Value;
use std::{io, path::Path};

/// Projection codes a map document may declare without further
/// configuration.
pub const SUPPORTED_PROJECTIONS: [&str; 3] = ["EPSG:4326", "EPSG:3857", "EPSG:900913"];

/// A file handed to us by a drop zone or file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,

    /// MIME type reported by the browser or OS, if any.
    pub mime: Option<String>,

    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    fn is_json(&self) -> bool {
        match self.mime.as_deref() {
            Some(mime) if !mime.is_empty() => {
                mime == "application/json" || mime == "application/geo+json"
            }
            _ => Path::new(&self.name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| {
                    ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("geojson")
                }),
        }
    }
}

/// A parsed map or GeoJSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDocument {
    pub file_name: String,
    pub json: Value,

    /// CRS of the document's feature coordinates.
    pub crs: Crs,
}

impl ImportedDocument {
    pub fn features(&self) -> Result<Vec<Feature>, LineError> {
        flatten_features(&self.json)
    }

    /// Returns the first line of the document in [`Crs::WORKING`].
    pub fn find_line(&self) -> Result<Option<LineGeometry>, LineError> {
        let features = self.features()?;
        Ok(find_line_feature(&features, self.crs).map(|found| found.geometry))
    }
}

/// Parses a dropped file.
///
/// `extra_projections` are the codes configured on top of
/// [`SUPPORTED_PROJECTIONS`] that a map document may declare.
pub fn read_document(
    file: &DroppedFile,
    extra_projections: &[String],
) -> Result<ImportedDocument, ImportError> {
    if !file.is_json() {
        return Err(ImportError::FileNotSupported);
    }
    let json: Value =
        serde_json::from_slice(&file.bytes).map_err(|e| ImportError::Unknown(e.to_string()))?;

    if let Some(projection) = json.pointer("/map/projection").and_then(Value::as_str) {
        let supported = SUPPORTED_PROJECTIONS.contains(&projection)
            || extra_projections.iter().any(|code| code == projection);
        if !supported {
            return Err(ImportError::ProjectionNotSupported(projection.to_string()));
        }
    }

    // Map documents store vector layer features as longitude/latitude
    // whatever the map projection is; only plain GeoJSON may declare
    // otherwise.
    let crs = match json.pointer("/crs/properties/name").and_then(Value::as_str) {
        None => Crs::Wgs84,
        Some(code) => code
            .parse()
            .map_err(|_| ImportError::ProjectionNotSupported(code.to_string()))?,
    };

    debug!("read {}; crs: {crs}", file.name);
    Ok(ImportedDocument {
        file_name: file.name.clone(),
        json,
        crs,
    })
}
