use crate::{
    controller::{Completion, Controller},
    task::TaskKind,
    Action, DrawOptions, Host, HostEvent, Mode, CLICK_EVENT, CONTROL_NAME, DRAW_RESTART_DELAY,
};
use linefeat::{Crs, LineGeometry};
use log::debug;

impl<H: Host> Controller<H> {
    /// Tears down what `previous` engaged, then engages the current
    /// mode.
    pub(crate) fn on_mode_changed(&mut self, previous: Mode) {
        let mode = self.state.mode();
        debug!("mode {previous:?} -> {mode:?}");
        self.leave_mode(previous);
        match mode {
            Mode::Draw => {
                self.suspend_identify();
                self.start_drawing();
            }
            Mode::Select => {
                self.suspend_identify();
                self.host.register(CLICK_EVENT, CONTROL_NAME);
            }
            Mode::Import => (),
            Mode::Off => self.restore_identify(),
        }
    }

    fn leave_mode(&mut self, previous: Mode) {
        match previous {
            Mode::Draw => {
                self.tasks.slot(TaskKind::DrawRestart).cancel();
            }
            Mode::Select => {
                if self.tasks.slot(TaskKind::Identify).cancel() {
                    self.put(Action::Identifying(false));
                }
            }
            Mode::Import => {
                self.tasks.slot(TaskKind::Import).cancel();
            }
            Mode::Off => (),
        }
        self.release_tools();
    }

    /// Stops the drawing interaction and the click listener owned by
    /// this extension. Does nothing for those not active.
    pub(crate) fn release_tools(&mut self) {
        if self.host.drawing_owner() == Some(CONTROL_NAME) {
            self.host.stop_drawing();
        }
        self.host.clean_drawing(CONTROL_NAME);
        if self.host.is_listening(CLICK_EVENT, CONTROL_NAME) {
            self.host.unregister(CLICK_EVENT, CONTROL_NAME);
        }
    }

    fn start_drawing(&mut self) {
        if self.host.drawing_owner().is_some() {
            self.host.stop_drawing();
        }
        self.host.start_drawing(
            "LineString",
            CONTROL_NAME,
            DrawOptions {
                stop_after_drawing: true,
            },
        );
    }

    fn suspend_identify(&mut self) {
        if self.host.is_identify_enabled() {
            self.host.set_identify_enabled(false);
            self.identify_suspended = true;
        }
        self.host.purge_identify_results();
        self.host.hide_identify_marker();
    }

    /// Re-enables the identify tool if this extension disabled it.
    pub(crate) fn restore_identify(&mut self) {
        if std::mem::take(&mut self.identify_suspended) {
            self.host.set_identify_enabled(true);
        }
    }

    /// Leaves the current mode because the host engaged a tool that
    /// can't coexist with it.
    fn interrupt(&mut self, reason: &str) {
        let mode = self.state.mode();
        if mode != Mode::Off {
            debug!("{reason}; leaving {mode:?}");
            self.put(Action::ToggleMode(mode));
        }
    }

    pub(crate) fn on_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::DrawingStarted { owner } if owner != CONTROL_NAME => {
                self.interrupt("drawing started by another tool")
            }
            HostEvent::DrawingEnded { owner, geometry } if owner == CONTROL_NAME => {
                self.on_line_drawn(geometry)
            }
            HostEvent::DrawingStarted { .. } | HostEvent::DrawingEnded { .. } => (),
            HostEvent::IdentifyEnabled => {
                // Enabled by the user; nothing left to restore.
                self.identify_suspended = false;
                self.interrupt("identify enabled")
            }
            HostEvent::MapClicked(click) => self.on_map_click(click),
            HostEvent::MapLayoutChanged { layout, source } => {
                self.on_layout_changed(layout, source.as_deref())
            }
        }
    }

    fn on_line_drawn(&mut self, geometry: Option<LineGeometry>) {
        if self.state.mode() != Mode::Draw {
            return;
        }
        if let Some(line) = geometry {
            self.put(Action::ChangeGeometry(Some(line.reproject(Crs::WORKING))));
        }
        self.spawn(
            TaskKind::DrawRestart,
            tokio::time::sleep(DRAW_RESTART_DELAY),
            |generation, ()| Completion::DrawRestart { generation },
        );
    }

    pub(crate) fn on_draw_restart(&mut self, generation: u64) {
        if self.tasks.slot(TaskKind::DrawRestart).finish(generation)
            && self.state.mode() == Mode::Draw
        {
            self.start_drawing();
        }
    }
}
