//! Collaborators provided by the map application hosting the extension.
//!
//! The controller owns its host and calls into it synchronously; what the
//! host observes on its side comes back as [`HostEvent`]s.

use crate::DOCK_WIDTH;
use linefeat::{
    geo::{Coord, Rect},
    geojson::Feature,
    Crs, LineGeometry,
};
use std::time::Duration;

/// Identifiers of the user-facing notification texts.
pub mod messages {
    pub const WARNING_TITLE: &str = "longitudinal.warnings.title";
    pub const ERROR_TITLE: &str = "longitudinal.errors.title";

    pub const NO_LAYER_SELECTED: &str = "longitudinal.warnings.noLayerSelected";
    pub const LAYER_NOT_SUPPORTED: &str = "longitudinal.warnings.layerNotSupported";
    pub const NO_FEATURE_IN_POINT: &str = "longitudinal.warnings.noFeatureInPoint";
    pub const NO_LINE_FEATURE_FOUND: &str = "longitudinal.warnings.noLineFeatureFound";

    pub const LOADING_ERROR: &str = "longitudinal.errors.loadingError";
    pub const SETUP_ERROR: &str = "longitudinal.errors.setupError";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawOptions {
    /// End the interaction after one geometry.
    pub stop_after_drawing: bool,
}

/// The host's drawing tool. At most one owner draws at a time.
pub trait Drawing {
    fn start_drawing(&mut self, kind: &str, owner: &str, options: DrawOptions);
    fn stop_drawing(&mut self);
    /// Clears geometries drawn by `owner`.
    fn clean_drawing(&mut self, owner: &str);
    fn drawing_owner(&self) -> Option<&str>;
}

pub trait ClickListeners {
    fn register(&mut self, event: &str, owner: &str);
    fn unregister(&mut self, event: &str, owner: &str);
    fn is_listening(&self, event: &str, owner: &str) -> bool;
}

/// The host's independent feature-identify tool.
pub trait MapInfo {
    fn is_identify_enabled(&self) -> bool;
    fn set_identify_enabled(&mut self, enabled: bool);
    fn purge_identify_results(&mut self);
    fn hide_identify_marker(&mut self);
}

pub trait Overlays {
    /// Adds `layer`, replacing any layer with the same id and owner.
    fn upsert_layer(&mut self, layer: OverlayLayer);
    fn remove_layer(&mut self, id: &str, owner: &str);
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn warn(&mut self, notice: Notice);
    fn error(&mut self, notice: Notice);
}

pub trait MapHost {
    fn selected_layer(&self) -> Option<LayerInfo>;
    fn map_view(&self) -> MapView;
    fn change_map_view(&mut self, view: MapView);
    /// `source` tags who produced the layout.
    fn update_map_layout(&mut self, layout: MapLayout, source: &str);
    fn update_dock_panels(&mut self, name: &str, action: PanelAction, location: &str);
}

/// Everything the controller needs from its host.
pub trait Host: Drawing + ClickListeners + MapInfo + Overlays + Notifier + MapHost {}

impl<T> Host for T where T: Drawing + ClickListeners + MapInfo + Overlays + Notifier + MapHost {}

/// Something that happened on the host side.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    DrawingStarted {
        owner: String,
    },
    /// A drawing interaction finished; `geometry` is the drawn line,
    /// when one was completed.
    DrawingEnded {
        owner: String,
        geometry: Option<LineGeometry>,
    },
    IdentifyEnabled,
    MapClicked(MapClick),
    MapLayoutChanged {
        layout: MapLayout,
        source: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Wms,
    Wfs,
    Vector,
    Other,
}

/// The layer currently selected in the host's table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerInfo {
    pub id: String,
    pub kind: LayerKind,
    pub visible: bool,
    /// Service used to query the layer's features.
    pub search: Option<LayerKind>,
    pub url: Option<String>,
}

impl LayerInfo {
    /// Whether a line can be picked from this layer.
    pub fn is_supported(&self) -> bool {
        self.visible
            && match self.kind {
                LayerKind::Wfs | LayerKind::Vector => true,
                LayerKind::Wms => self.search == Some(LayerKind::Wfs),
                LayerKind::Other => false,
            }
    }

    /// Endpoint of a remote identify request, if features of this layer
    /// aren't held by the map itself.
    pub fn identify_url(&self) -> Option<&str> {
        match self.kind {
            LayerKind::Wms | LayerKind::Wfs => self.url.as_deref(),
            LayerKind::Vector | LayerKind::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    /// EPSG:4326.
    pub latlng: Coord<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectedLayer {
    pub layer_id: String,
    /// EPSG:4326.
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapClick {
    pub point: MapPoint,
    pub intersected: Vec<IntersectedLayer>,
}

impl MapClick {
    pub fn features_of(&self, layer_id: &str) -> &[Feature] {
        self.intersected
            .iter()
            .find(|l| l.layer_id == layer_id)
            .map_or(&[], |l| &l.features)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// EPSG:4326.
    pub center: Coord<f64>,
    pub zoom: f64,
    /// EPSG:4326.
    pub bbox: Option<Rect<f64>>,
    pub size: Option<(f64, f64)>,
    pub projection: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapLayout {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub bounding_map_rect: Edges,
    pub bounding_sidebar_rect: Option<Edges>,
    pub right_panel: bool,
}

impl MapLayout {
    /// Right-hand space taken by the host's own sidebar.
    pub fn sidebar_right(&self) -> f64 {
        self.bounding_sidebar_rect.map_or(0.0, |r| r.right)
    }

    /// Makes room for the dock on the right of the map.
    pub fn with_dock(mut self) -> Self {
        let right = DOCK_WIDTH + self.sidebar_right();
        self.right = right;
        self.bounding_map_rect.right = right;
        self.right_panel = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Add,
    Remove,
}

/// A map layer owned by the extension.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub id: String,
    pub owner: String,
    pub role: String,
    pub features: Vec<Feature>,
    pub projection: Crs,
}

impl OverlayLayer {
    pub fn new(id: &str, owner: &str, features: Vec<Feature>, projection: Crs) -> Self {
        Self {
            id: id.to_string(),
            owner: owner.to_string(),
            role: "overlay".to_string(),
            features,
            projection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
    pub auto_dismiss: Duration,
}

impl Notice {
    pub fn warning(message: &'static str) -> Self {
        Self {
            title: messages::WARNING_TITLE,
            message,
            auto_dismiss: Duration::from_secs(10),
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            title: messages::ERROR_TITLE,
            message,
            auto_dismiss: Duration::from_secs(6),
        }
    }
}
