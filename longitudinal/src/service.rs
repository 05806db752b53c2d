use crate::{LayerInfo, MapPoint, ProfilePayload, ProfileRequest, ServiceError};
use linefeat::{geojson::Feature, read_document, DroppedFile, ImportError, ImportedDocument};
use std::{future::Future, pin::Pin, sync::Arc};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The remote profile computation process.
///
/// Dropping the returned future abandons the request; implementations
/// need no other cancellation support.
pub trait ProfileService: Send + Sync {
    fn execute(
        &self,
        request: ProfileRequest,
    ) -> BoxFuture<'static, Result<ProfilePayload, ServiceError>>;
}

/// Features found at a point, in `crs` (EPSG:4326 when absent).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdentifyResponse {
    pub features: Vec<Feature>,
    pub crs: Option<String>,
}

pub trait IdentifyService: Send + Sync {
    fn identify(
        &self,
        layer: &LayerInfo,
        point: &MapPoint,
    ) -> BoxFuture<'static, Result<IdentifyResponse, ServiceError>>;
}

pub trait FileImporter: Send + Sync {
    /// Reads a dropped file. `extra_projections` extends the map
    /// projections accepted by default.
    fn import(
        &self,
        file: DroppedFile,
        extra_projections: &[String],
    ) -> BoxFuture<'static, Result<ImportedDocument, ImportError>>;
}

/// Imports JSON and GeoJSON documents already held in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonImporter;

impl FileImporter for JsonImporter {
    fn import(
        &self,
        file: DroppedFile,
        extra_projections: &[String],
    ) -> BoxFuture<'static, Result<ImportedDocument, ImportError>> {
        let document = read_document(&file, extra_projections);
        Box::pin(async move { document })
    }
}

/// Remote collaborators of a [`Controller`](crate::Controller).
#[derive(Clone)]
pub struct Services {
    pub profile: Arc<dyn ProfileService>,
    pub identify: Arc<dyn IdentifyService>,
    pub importer: Arc<dyn FileImporter>,
}

impl Services {
    pub fn new(profile: Arc<dyn ProfileService>, identify: Arc<dyn IdentifyService>) -> Self {
        Self {
            profile,
            identify,
            importer: Arc::new(JsonImporter),
        }
    }

    pub fn with_importer(mut self, importer: Arc<dyn FileImporter>) -> Self {
        self.importer = importer;
        self
    }
}
