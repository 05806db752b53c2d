use crate::{
    host::{messages, Notice, PanelAction},
    task::{TaskKind, Tasks},
    Action, Defaults, ExtensionConfig, Host, HostEvent, IdentifyResponse, Mode, ProfilePayload,
    ServiceError, Services, State, CONTROL_DOCK_NAME, DOCK_LOCATION, LAYER_OWNER,
    MARKER_LAYER_ID, OVERLAY_LAYER_ID,
};
use linefeat::{ImportError, ImportedDocument};
use log::{debug, warn};
use std::future::Future;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Input of a [`Controller`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Action(Action),
    Host(HostEvent),
}

impl From<Action> for Event {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

impl From<HostEvent> for Event {
    fn from(event: HostEvent) -> Self {
        Self::Host(event)
    }
}

/// Outcome of a background task, tagged with the generation it was
/// started with.
#[derive(Debug)]
pub(crate) enum Completion {
    Profile {
        generation: u64,
        result: Result<ProfilePayload, ServiceError>,
    },
    Identify {
        generation: u64,
        result: Result<IdentifyResponse, ServiceError>,
    },
    Import {
        generation: u64,
        result: Result<ImportedDocument, ImportError>,
    },
    DrawRestart {
        generation: u64,
    },
}

#[derive(Debug)]
enum Inbox {
    Event(Event),
    Done(Completion),
}

/// Queues events for a running [`Controller`].
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: UnboundedSender<Inbox>,
}

impl ControllerHandle {
    /// Returns `false` once the controller is gone.
    pub fn send(&self, event: impl Into<Event>) -> bool {
        self.tx.send(Inbox::Event(event.into())).is_ok()
    }
}

/// Owns the extension [`State`] and applies every change to it, one
/// message at a time.
///
/// Events are handled synchronously by [`dispatch`](Self::dispatch) or
/// queued through a [`ControllerHandle`]. Remote work runs on spawned
/// tasks whose results come back through the same queue, so the state
/// is only ever touched from the task driving the controller.
pub struct Controller<H> {
    pub(crate) state: State,
    pub(crate) host: H,
    pub(crate) services: Services,
    pub(crate) tasks: Tasks,

    /// Set when the identify tool was disabled on entering a mode.
    pub(crate) identify_suspended: bool,

    subscribers: Vec<UnboundedSender<Action>>,
    stopped: bool,
    tx: UnboundedSender<Inbox>,
    rx: UnboundedReceiver<Inbox>,
}

impl<H: Host> Controller<H> {
    pub fn new(host: H, services: Services) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: State::default(),
            host,
            services,
            tasks: Tasks::default(),
            identify_suspended: false,
            subscribers: Vec::new(),
            stopped: false,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.tx.clone(),
        }
    }

    /// Returns a stream of every action applied from now on, in order.
    pub fn subscribe(&mut self) -> UnboundedReceiver<Action> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn dispatch(&mut self, event: impl Into<Event>) {
        match event.into() {
            Event::Action(action) => self.put(action),
            Event::Host(event) => self.on_host_event(event),
        }
    }

    /// Waits for the next queued event or task result and handles it.
    pub async fn next(&mut self) {
        if let Some(message) = self.rx.recv().await {
            self.process(message);
        }
    }

    /// Handles one queued message if there is one.
    pub fn try_next(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(message) => {
                self.process(message);
                true
            }
            Err(_) => false,
        }
    }

    /// Handles queued messages until the extension is torn down, then
    /// gives the host back.
    pub async fn run(mut self) -> H {
        while !self.stopped {
            match self.rx.recv().await {
                Some(message) => self.process(message),
                None => break,
            }
        }
        self.host
    }

    fn process(&mut self, message: Inbox) {
        match message {
            Inbox::Event(event) => self.dispatch(event),
            Inbox::Done(Completion::Profile { generation, result }) => {
                self.on_profile_done(generation, result)
            }
            Inbox::Done(Completion::Identify { generation, result }) => {
                self.on_identify_done(generation, result)
            }
            Inbox::Done(Completion::Import { generation, result }) => {
                self.on_import_done(generation, result)
            }
            Inbox::Done(Completion::DrawRestart { generation }) => {
                self.on_draw_restart(generation)
            }
        }
    }

    /// Applies `action`, notifies subscribers, then runs the side
    /// effects it calls for. Those may apply further actions.
    pub(crate) fn put(&mut self, action: Action) {
        if action == Action::TearDown {
            self.before_tear_down();
        }
        let previous_mode = self.state.mode();
        self.state.reduce(&action);
        self.subscribers.retain(|tx| tx.send(action.clone()).is_ok());

        match action {
            Action::Setup(config) => self.setup(&config),
            Action::TearDown => {
                debug!("torn down");
                self.stopped = true;
            }
            Action::ToggleMode(_) if self.state.mode() != previous_mode => {
                self.on_mode_changed(previous_mode)
            }
            Action::ChangeGeometry(_) | Action::ChangeReferential(_) | Action::ChangeDistance(_) => {
                self.request_profile()
            }
            Action::SetDockOpen(false) => self.on_dock_closed(),
            Action::AddMarker(_) => self.show_marker(),
            Action::HideMarker => self.host.remove_layer(MARKER_LAYER_ID, LAYER_OWNER),
            Action::DropFile(file) if self.state.mode() == Mode::Import => self.start_import(file),
            _ => (),
        }
    }

    /// Runs `work` in the background. Its output comes back through the
    /// queue as the completion built by `done`.
    pub(crate) fn spawn<T, F, D>(&mut self, kind: TaskKind, work: F, done: D)
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
        D: FnOnce(u64, T) -> Completion + Send + 'static,
    {
        let slot = self.tasks.slot(kind);
        let generation = slot.next();
        let tx = self.tx.clone();
        slot.set(tokio::spawn(async move {
            let output = work.await;
            // The controller is gone if this fails; nothing left to do.
            let _ = tx.send(Inbox::Done(done(generation, output)));
        }));
    }

    fn setup(&mut self, config: &ExtensionConfig) {
        match config.defaults() {
            Ok(Defaults {
                referential,
                distance,
            }) => {
                self.host
                    .update_dock_panels(CONTROL_DOCK_NAME, PanelAction::Add, DOCK_LOCATION);
                self.put(Action::ChangeReferential(referential));
                self.put(Action::ChangeDistance(distance));
                self.put(Action::Initialized);
                debug!("initialized");
            }
            Err(err) => {
                warn!("setup failed: {err}");
                self.host.error(Notice::error(messages::SETUP_ERROR));
            }
        }
    }

    /// Returns every host resource to where it was before setup. Runs
    /// before the state is reset so that the usual transitions still see
    /// what they are undoing.
    fn before_tear_down(&mut self) {
        let mode = self.state.mode();
        if mode != Mode::Off {
            self.put(Action::ToggleMode(mode));
        }
        if self.tasks.slot(TaskKind::Profile).cancel() {
            self.put(Action::Loading(false));
        }
        if self.state.is_dock_open() {
            self.put(Action::SetDockOpen(false));
        }
        if self.state.marker().is_some() {
            self.put(Action::HideMarker);
        }
        self.release_tools();
        self.restore_identify();
        self.tasks.cancel_all();
        self.host.remove_layer(OVERLAY_LAYER_ID, LAYER_OWNER);
        if self.state.is_initialized() {
            self.host
                .update_dock_panels(CONTROL_DOCK_NAME, PanelAction::Remove, DOCK_LOCATION);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        testing::{config, harness, line, payload, settle, MockHost},
        Action, Controller, HostEvent, Mode, PanelAction, State, CONTROL_DOCK_NAME,
    };

    #[tokio::test]
    async fn test_setup_seeds_defaults() {
        let h = harness();
        let state = h.ctl.state();
        assert!(state.is_initialized());
        assert_eq!(state.referential(), Some("ref:bdalti"));
        assert_eq!(state.distance(), Some(100.0));
        assert_eq!(
            h.ctl.host().panels,
            [(CONTROL_DOCK_NAME.to_string(), PanelAction::Add)]
        );
    }

    #[tokio::test]
    async fn test_setup_failure() {
        let h = harness();
        let mut ctl = Controller::new(MockHost::default(), h.services());
        let mut malformed = config();
        malformed.distances.clear();
        ctl.dispatch(Action::Setup(malformed));
        assert!(!ctl.state().is_initialized());
        assert_eq!(ctl.host().errors, ["longitudinal.errors.setupError"]);
        assert!(ctl.host().panels.is_empty());
    }

    #[tokio::test]
    async fn test_tear_down_restores_baseline() {
        let mut h = harness();
        h.ctl.host_mut().identify_enabled = true;
        h.ctl.dispatch(Action::ToggleMode(Mode::Select));
        h.ctl.dispatch(Action::ChangeGeometry(Some(line(0.0))));
        h.profile.resolve(0, Ok(payload("first")));
        settle(&mut h.ctl).await;
        assert!(h.ctl.state().is_dock_open());

        h.ctl.dispatch(Action::ToggleMaximize);
        h.ctl.dispatch(Action::ChangeDistance(10.0));
        assert!(h.ctl.state().is_loading());

        h.ctl.dispatch(Action::TearDown);
        assert_eq!(h.ctl.state(), &State::default());

        let host = h.ctl.host();
        assert!(host.layers.is_empty());
        assert!(host.listeners.is_empty());
        assert_eq!(host.drawing, None);
        assert!(host.identify_enabled);
        assert_eq!(
            host.panels.last(),
            Some(&(CONTROL_DOCK_NAME.to_string(), PanelAction::Remove))
        );

        // The cancelled request never lands.
        h.profile.resolve(1, Ok(payload("late")));
        settle(&mut h.ctl).await;
        assert_eq!(h.ctl.state(), &State::default());
    }

    #[tokio::test]
    async fn test_run_until_tear_down() {
        let h = harness();
        let handle = h.ctl.handle();
        assert!(handle.send(HostEvent::IdentifyEnabled));
        assert!(handle.send(Action::ToggleMode(Mode::Import)));
        assert!(handle.send(Action::TearDown));
        let host = h.ctl.run().await;
        assert!(host.layers.is_empty());
        assert!(!handle.send(Action::Initialized));
    }
}
