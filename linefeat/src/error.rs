use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("line has {0} coordinates, at least 2 are required")]
    Degenerate(usize),

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("unsupported CRS {0}")]
    UnsupportedCrs(String),

    #[error("document nesting exceeds {0} levels")]
    TooDeep(usize),
}

/// Failure reading a dropped file.
///
/// These are shown to the user next to the drop zone, so each variant
/// maps to a stable message code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("file type not supported")]
    FileNotSupported,

    #[error("projection {0} not supported")]
    ProjectionNotSupported(String),

    #[error("{0}")]
    Unknown(String),
}

impl ImportError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotSupported => "FILE_NOT_SUPPORTED",
            Self::ProjectionNotSupported(_) => "PROJECTION_NOT_SUPPORTED",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}
