use crate::{
    controller::Controller, Action, Host, MapLayout, OverlayLayer, CONTROL_NAME, LAYER_OWNER,
    MARKER_LAYER_ID, OVERLAY_LAYER_ID,
};
use linefeat::{
    geojson::{Feature, Geometry, Value},
    Crs, LineGeometry,
};
use log::debug;

impl<H: Host> Controller<H> {
    /// Stops showing a profile: the line goes, and with it the overlay
    /// and the maximized chart.
    pub(crate) fn on_dock_closed(&mut self) {
        if self.state.geometry().is_some() {
            self.put(Action::ChangeGeometry(None));
        }
        self.host.remove_layer(OVERLAY_LAYER_ID, LAYER_OWNER);
        if self.state.is_maximized() {
            self.put(Action::ToggleMaximize);
        }
    }

    pub(crate) fn show_overlay(&mut self, geometry: &LineGeometry) {
        self.host.upsert_layer(OverlayLayer::new(
            OVERLAY_LAYER_ID,
            LAYER_OWNER,
            vec![geometry.to_feature()],
            geometry.projection(),
        ));
    }

    /// Centers the map on `geometry`, keeping zoom, size and projection.
    pub(crate) fn recenter(&mut self, geometry: &LineGeometry) {
        let line = geometry.reproject(Crs::Wgs84);
        let mut view = self.host.map_view();
        view.center = line.centroid().0;
        view.bbox = Some(line.bounding_rect());
        self.host.change_map_view(view);
    }

    pub(crate) fn on_layout_changed(&mut self, layout: MapLayout, source: Option<&str>) {
        if !self.state.is_dock_open() || source == Some(CONTROL_NAME) {
            return;
        }
        self.host.update_map_layout(layout.with_dock(), CONTROL_NAME);
    }

    pub(crate) fn show_marker(&mut self) {
        let Some(point) = self.state.marker() else {
            debug!(
                "no known projection for referential {:?}; marker ignored",
                self.state.referential()
            );
            return;
        };
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![point.x, point.y]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        self.host.upsert_layer(OverlayLayer::new(
            MARKER_LAYER_ID,
            LAYER_OWNER,
            vec![feature],
            Crs::Wgs84,
        ));
    }
}
