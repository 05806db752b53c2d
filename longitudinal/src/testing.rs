//! Test doubles for the host and the remote services.

use crate::{
    Action, BoxFuture, ClickListeners, Controller, DrawOptions, Drawing, ExtensionConfig,
    HostEvent, IdentifyResponse, IdentifyService, LayerInfo, MapHost, MapInfo, MapLayout,
    MapPoint, MapView, Notice, Notifier, OverlayLayer, Overlays, PanelAction, ProfilePayload,
    ProfileRequest, ProfileService, ServiceError, Services, CLICK_EVENT, CONTROL_NAME,
};
use linefeat::{geo::Coord, Crs, LineGeometry};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc::UnboundedReceiver, oneshot};

/// Records what the extension does to the map.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct MockHost {
    pub drawing: Option<String>,
    pub draw_starts: Vec<(String, String, DrawOptions)>,
    pub listeners: Vec<(String, String)>,
    pub unregisters: usize,
    pub identify_enabled: bool,
    pub identify_purges: usize,
    pub layers: Vec<OverlayLayer>,
    pub warnings: Vec<&'static str>,
    pub errors: Vec<&'static str>,
    pub views: Vec<MapView>,
    pub layouts: Vec<(MapLayout, String)>,
    pub panels: Vec<(String, PanelAction)>,
    pub selected: Option<LayerInfo>,

    /// Times a drawing and a click listener of ours were live together.
    pub violations: usize,
}

impl MockHost {
    pub fn is_listening_to_clicks(&self) -> bool {
        self.is_listening(CLICK_EVENT, CONTROL_NAME)
    }

    /// Completes the current drawing the way the host's drawing tool
    /// does.
    pub fn finish_drawing(&mut self, geometry: Option<LineGeometry>) -> HostEvent {
        let owner = self.drawing.take().unwrap_or_default();
        HostEvent::DrawingEnded { owner, geometry }
    }

    fn check_exclusive(&mut self) {
        if self.drawing.as_deref() == Some(CONTROL_NAME) && self.is_listening_to_clicks() {
            self.violations += 1;
        }
    }
}

impl Drawing for MockHost {
    fn start_drawing(&mut self, kind: &str, owner: &str, options: DrawOptions) {
        self.drawing = Some(owner.to_string());
        self.draw_starts
            .push((kind.to_string(), owner.to_string(), options));
        self.check_exclusive();
    }

    fn stop_drawing(&mut self) {
        self.drawing = None;
    }

    fn clean_drawing(&mut self, _owner: &str) {}

    fn drawing_owner(&self) -> Option<&str> {
        self.drawing.as_deref()
    }
}

impl ClickListeners for MockHost {
    fn register(&mut self, event: &str, owner: &str) {
        self.listeners.push((event.to_string(), owner.to_string()));
        self.check_exclusive();
    }

    fn unregister(&mut self, event: &str, owner: &str) {
        self.listeners.retain(|(e, o)| !(e == event && o == owner));
        self.unregisters += 1;
    }

    fn is_listening(&self, event: &str, owner: &str) -> bool {
        self.listeners.iter().any(|(e, o)| e == event && o == owner)
    }
}

impl MapInfo for MockHost {
    fn is_identify_enabled(&self) -> bool {
        self.identify_enabled
    }

    fn set_identify_enabled(&mut self, enabled: bool) {
        self.identify_enabled = enabled;
    }

    fn purge_identify_results(&mut self) {
        self.identify_purges += 1;
    }

    fn hide_identify_marker(&mut self) {}
}

impl Overlays for MockHost {
    fn upsert_layer(&mut self, layer: OverlayLayer) {
        self.layers
            .retain(|l| !(l.id == layer.id && l.owner == layer.owner));
        self.layers.push(layer);
    }

    fn remove_layer(&mut self, id: &str, owner: &str) {
        self.layers.retain(|l| !(l.id == id && l.owner == owner));
    }
}

impl Notifier for MockHost {
    fn warn(&mut self, notice: Notice) {
        self.warnings.push(notice.message);
    }

    fn error(&mut self, notice: Notice) {
        self.errors.push(notice.message);
    }
}

impl MapHost for MockHost {
    fn selected_layer(&self) -> Option<LayerInfo> {
        self.selected.clone()
    }

    fn map_view(&self) -> MapView {
        self.views.last().cloned().unwrap_or(MapView {
            center: Coord { x: 0.0, y: 0.0 },
            zoom: 12.0,
            bbox: None,
            size: Some((800.0, 600.0)),
            projection: "EPSG:3857".to_string(),
        })
    }

    fn change_map_view(&mut self, view: MapView) {
        self.views.push(view);
    }

    fn update_map_layout(&mut self, layout: MapLayout, source: &str) {
        self.layouts.push((layout, source.to_string()));
    }

    fn update_dock_panels(&mut self, name: &str, action: PanelAction, _location: &str) {
        self.panels.push((name.to_string(), action));
    }
}

/// A service whose responses are handed out by the test, in any order.
pub(crate) struct Pending<Req, T> {
    calls: Mutex<Vec<(Req, Option<oneshot::Sender<T>>)>>,
}

impl<Req: Clone, T> Pending<Req, T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Req> {
        let calls = self.calls.lock().unwrap();
        calls.iter().map(|(req, _)| req.clone()).collect()
    }

    /// Answers the `index`th call. Answers to abandoned calls go nowhere.
    pub fn resolve(&self, index: usize, response: T) {
        let sender = self.calls.lock().unwrap()[index].1.take().unwrap();
        let _ = sender.send(response);
    }

    fn push(&self, request: Req) -> oneshot::Receiver<T> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push((request, Some(tx)));
        rx
    }
}

pub(crate) type PendingProfile = Pending<ProfileRequest, Result<ProfilePayload, ServiceError>>;
pub(crate) type PendingIdentify = Pending<String, Result<IdentifyResponse, ServiceError>>;

fn unanswered<T>(rx: oneshot::Receiver<Result<T, ServiceError>>) -> BoxFuture<'static, Result<T, ServiceError>>
where
    T: Send + 'static,
{
    Box::pin(async move {
        rx.await
            .unwrap_or_else(|_| Err(ServiceError::Transport("never answered".into())))
    })
}

impl ProfileService for PendingProfile {
    fn execute(
        &self,
        request: ProfileRequest,
    ) -> BoxFuture<'static, Result<ProfilePayload, ServiceError>> {
        unanswered(self.push(request))
    }
}

impl IdentifyService for PendingIdentify {
    fn identify(
        &self,
        layer: &LayerInfo,
        _point: &MapPoint,
    ) -> BoxFuture<'static, Result<IdentifyResponse, ServiceError>> {
        unanswered(self.push(layer.id.clone()))
    }
}

pub(crate) fn config() -> ExtensionConfig {
    ExtensionConfig::from_reader(
        r#"{
            "referentiels": [
                { "layerName": "ref:bdalti", "title": "BD Alti", "projection": "EPSG:3857" },
                { "layerName": "ref:mnt", "title": "MNT", "projection": "EPSG:2154" }
            ],
            "distances": [100, 50, 10],
            "wpsurl": "https://example.org/geoserver/wps",
            "projectionDefs": [{ "code": "EPSG:2154" }]
        }"#
        .as_bytes(),
    )
    .unwrap()
}

/// A 1 km diagonal line in web mercator, starting `offset` meters east
/// of the origin.
pub(crate) fn line(offset: f64) -> LineGeometry {
    LineGeometry::new(
        vec![
            Coord { x: offset, y: 0.0 },
            Coord {
                x: offset + 1000.0,
                y: 1000.0,
            },
        ],
        Crs::WebMercator,
    )
    .unwrap()
}

/// A three point profile whose referential name is `label`.
pub(crate) fn payload(label: &str) -> ProfilePayload {
    ProfilePayload(json!({
        "profile": {
            "infos": {
                "distance": 1414.2,
                "denivelepositif": 30.0,
                "denivelenegatif": 15.0,
                "processedpoints": 3,
                "referentiel": label
            },
            "points": [
                [0.0, 0.0, 0.0, 210.0, 0.0],
                [707.1, 500.0, 500.0, 240.0, 4.2],
                [1414.2, 1000.0, 1000.0, 225.0, -2.1]
            ]
        }
    }))
}

pub(crate) struct Harness {
    pub ctl: Controller<MockHost>,
    pub profile: Arc<PendingProfile>,
    pub identify: Arc<PendingIdentify>,
}

impl Harness {
    pub fn services(&self) -> Services {
        Services::new(self.profile.clone(), self.identify.clone())
    }
}

/// A controller set up with [`config`].
pub(crate) fn harness() -> Harness {
    let profile = PendingProfile::new();
    let identify = PendingIdentify::new();
    let mut ctl = Controller::new(
        MockHost::default(),
        Services::new(profile.clone(), identify.clone()),
    );
    ctl.dispatch(Action::Setup(config()));
    Harness {
        ctl,
        profile,
        identify,
    }
}

/// Lets spawned tasks run and handles everything they report.
pub(crate) async fn settle(ctl: &mut Controller<MockHost>) {
    for _ in 0..16 {
        tokio::task::yield_now().await;
        while ctl.try_next() {}
    }
}

pub(crate) fn drain(actions: &mut UnboundedReceiver<Action>) -> Vec<Action> {
    let mut drained = Vec::new();
    while let Ok(action) = actions.try_recv() {
        drained.push(action);
    }
    drained
}
