use crate::{
    controller::{Completion, Controller},
    host::{messages, Notice},
    task::TaskKind,
    Action, Host, ProfilePayload, ProfileResult, ServiceError,
};
use log::{debug, warn};

impl<H: Host> Controller<H> {
    /// Replaces any request in flight with one for the current line and
    /// settings. Without a line, only cancels.
    pub(crate) fn request_profile(&mut self) {
        let request = self.state.profile_request();
        self.cancel_profile();
        let Some(request) = request else {
            return;
        };
        debug!(
            "requesting profile; points: {}, referential: {}, distance: {}",
            self.state.geometry().map_or(0, |g| g.num_coords()),
            request.referential,
            request.distance
        );
        self.put(Action::Loading(true));
        let response = self.services.profile.execute(request);
        self.spawn(TaskKind::Profile, response, |generation, result| {
            Completion::Profile { generation, result }
        });
    }

    fn cancel_profile(&mut self) {
        if self.tasks.slot(TaskKind::Profile).cancel() {
            debug!("profile request superseded");
            self.put(Action::Loading(false));
        }
    }

    pub(crate) fn on_profile_done(
        &mut self,
        generation: u64,
        result: Result<ProfilePayload, ServiceError>,
    ) {
        if !self.tasks.slot(TaskKind::Profile).finish(generation) {
            debug!("dropping stale profile response {generation}");
            return;
        }
        match result.map(ProfilePayload::into_result) {
            Ok(Some(profile)) => self.show_profile(profile),
            Ok(None) => debug!("profile response without data"),
            Err(err) => {
                warn!("profile request failed: {err}");
                self.host.error(Notice::error(messages::LOADING_ERROR));
            }
        }
        self.put(Action::Loading(false));
    }

    fn show_profile(&mut self, profile: ProfileResult) {
        self.put(Action::AddProfileData(profile));
        if !self.state.is_dock_open() {
            self.put(Action::SetDockOpen(true));
        }
        if let Some(geometry) = self.state.geometry().cloned() {
            self.show_overlay(&geometry);
            self.recenter(&geometry);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        testing::{drain, harness, line, payload, settle},
        Action, ProfilePayload, ServiceError, OVERLAY_LAYER_ID,
    };
    use serde_json::json;

    fn loading(actions: &[Action]) -> Vec<bool> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::Loading(loading) => Some(*loading),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_profile_opens_dock() {
        let mut h = harness();
        let mut actions = h.ctl.subscribe();
        h.ctl.dispatch(Action::ChangeGeometry(Some(line(0.0))));
        assert!(h.ctl.state().is_loading());

        let requests = h.profile.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].referential, "ref:bdalti");
        assert_eq!(requests[0].distance, 100.0);
        assert_eq!(requests[0].crs, "EPSG:3857");

        h.profile.resolve(0, Ok(payload("BD Alti")));
        settle(&mut h.ctl).await;

        let state = h.ctl.state();
        assert!(!state.is_loading());
        assert!(state.is_dock_open());
        assert_eq!(state.infos().unwrap().referential_name, "BD Alti");
        assert_eq!(state.points().len(), 3);

        let host = h.ctl.host();
        assert_eq!(host.layers.len(), 1);
        assert_eq!(host.layers[0].id, OVERLAY_LAYER_ID);
        assert_eq!(host.layers[0].features.len(), 1);
        assert_eq!(host.views.len(), 1);

        let actions = drain(&mut actions);
        assert_eq!(loading(&actions), [true, false]);
        assert_eq!(
            actions.iter().filter(|a| **a == Action::SetDockOpen(true)).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_switch_latest() {
        let mut h = harness();
        let mut actions = h.ctl.subscribe();
        h.ctl.dispatch(Action::ChangeGeometry(Some(line(0.0))));
        h.ctl.dispatch(Action::ChangeGeometry(Some(line(5000.0))));
        assert_eq!(h.profile.requests().len(), 2);

        // The superseded request resolving last changes nothing.
        h.profile.resolve(1, Ok(payload("second")));
        h.profile.resolve(0, Ok(payload("first")));
        settle(&mut h.ctl).await;

        assert_eq!(
            h.ctl.state().infos().unwrap().referential_name,
            "second"
        );
        assert_eq!(loading(&drain(&mut actions)), [true, false, true, false]);
        assert!(!h.ctl.state().is_loading());
    }

    #[tokio::test]
    async fn test_settings_change_requests_again() {
        let mut h = harness();
        h.ctl.dispatch(Action::ChangeDistance(25.0));
        assert!(h.profile.requests().is_empty());

        h.ctl.dispatch(Action::ChangeGeometry(Some(line(0.0))));
        h.ctl.dispatch(Action::ChangeReferential("ref:mnt".into()));
        let requests = h.profile.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].referential, "ref:mnt");
        assert_eq!(requests[1].distance, 25.0);
    }

    #[tokio::test]
    async fn test_error_keeps_previous_profile() {
        let mut h = harness();
        h.ctl.dispatch(Action::ChangeGeometry(Some(line(0.0))));
        h.profile.resolve(0, Ok(payload("first")));
        settle(&mut h.ctl).await;
        let previous = h.ctl.state().profile().cloned();

        let mut actions = h.ctl.subscribe();
        h.ctl.dispatch(Action::ChangeDistance(10.0));
        h.profile
            .resolve(1, Err(ServiceError::Transport("connection reset".into())));
        settle(&mut h.ctl).await;

        assert_eq!(h.ctl.host().errors, ["longitudinal.errors.loadingError"]);
        assert!(!h.ctl.state().is_loading());
        assert_eq!(h.ctl.state().profile().cloned(), previous);
        assert_eq!(loading(&drain(&mut actions)), [true, false]);
    }

    #[tokio::test]
    async fn test_empty_response_is_ignored() {
        let mut h = harness();
        let mut actions = h.ctl.subscribe();
        h.ctl.dispatch(Action::ChangeGeometry(Some(line(0.0))));
        h.profile
            .resolve(0, Ok(ProfilePayload(json!({ "profile": { "infos": null } }))));
        settle(&mut h.ctl).await;

        let state = h.ctl.state();
        assert!(!state.is_loading());
        assert!(!state.is_dock_open());
        assert_eq!(state.profile(), None);
        assert!(h.ctl.host().errors.is_empty());
        assert_eq!(loading(&drain(&mut actions)), [true, false]);
    }

    #[tokio::test]
    async fn test_clearing_geometry_cancels() {
        let mut h = harness();
        let mut actions = h.ctl.subscribe();
        h.ctl.dispatch(Action::ChangeGeometry(Some(line(0.0))));
        h.ctl.dispatch(Action::ChangeGeometry(None));
        assert!(!h.ctl.state().is_loading());

        h.profile.resolve(0, Ok(payload("first")));
        settle(&mut h.ctl).await;
        assert_eq!(h.ctl.state().profile(), None);
        assert_eq!(loading(&drain(&mut actions)), [true, false]);
    }
}
