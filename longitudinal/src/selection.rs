use crate::{
    controller::{Completion, Controller},
    host::{messages, Notice},
    task::TaskKind,
    Action, Host, IdentifyResponse, LayerInfo, MapClick, MapPoint, Mode, ServiceError,
    CLICK_EVENT, CONTROL_NAME,
};
use linefeat::{find_line_feature, geojson::Feature, Crs};
use log::{debug, warn};

impl<H: Host> Controller<H> {
    /// Picks a line from the selected layer at the clicked point.
    pub(crate) fn on_map_click(&mut self, click: MapClick) {
        if self.state.mode() != Mode::Select || !self.host.is_listening(CLICK_EVENT, CONTROL_NAME)
        {
            return;
        }
        // A new click supersedes any identify still in flight.
        if self.tasks.slot(TaskKind::Identify).cancel() {
            self.put(Action::Identifying(false));
        }
        let Some(layer) = self.host.selected_layer() else {
            self.host.warn(Notice::warning(messages::NO_LAYER_SELECTED));
            return;
        };
        if !layer.is_supported() {
            self.host.warn(Notice::warning(messages::LAYER_NOT_SUPPORTED));
            return;
        }
        if layer.identify_url().is_some() {
            self.identify(&layer, &click.point);
        } else {
            self.select_line(click.features_of(&layer.id), Crs::Wgs84);
        }
    }

    fn identify(&mut self, layer: &LayerInfo, point: &MapPoint) {
        debug!("identifying {} at {:?}", layer.id, point.latlng);
        if !self.state.is_identifying() {
            self.put(Action::Identifying(true));
        }
        let response = self.services.identify.identify(layer, point);
        self.spawn(TaskKind::Identify, response, |generation, result| {
            Completion::Identify { generation, result }
        });
    }

    pub(crate) fn on_identify_done(
        &mut self,
        generation: u64,
        result: Result<IdentifyResponse, ServiceError>,
    ) {
        if !self.tasks.slot(TaskKind::Identify).finish(generation) {
            debug!("dropping stale identify response {generation}");
            return;
        }
        match result {
            Ok(IdentifyResponse { features, crs }) => {
                let source = match crs.as_deref().map(str::parse::<Crs>) {
                    None => Crs::Wgs84,
                    Some(Ok(crs)) => crs,
                    Some(Err(err)) => {
                        warn!("{err}; reading identify response as {}", Crs::Wgs84);
                        Crs::Wgs84
                    }
                };
                self.select_line(&features, source);
            }
            Err(err) => {
                warn!("identify failed: {err}");
                self.host.error(Notice::error(messages::LOADING_ERROR));
            }
        }
        self.put(Action::Identifying(false));
    }

    fn select_line(&mut self, features: &[Feature], source: Crs) {
        match find_line_feature(features, source) {
            Some(found) => self.put(Action::ChangeGeometry(Some(found.geometry))),
            None => self.host.warn(Notice::warning(messages::NO_FEATURE_IN_POINT)),
        }
    }
}
