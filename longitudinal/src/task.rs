use tokio::task::JoinHandle;

/// Holds at most one running background task.
///
/// Every task started in a slot gets a new generation number. A result
/// is current only while its generation is still the slot's latest, so
/// results already queued when a task is replaced or cancelled can be
/// recognized and dropped.
#[derive(Debug, Default)]
pub(crate) struct TaskSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    /// Cancels the running task, if any, and returns the generation of
    /// the next one.
    pub fn next(&mut self) -> u64 {
        self.cancel();
        self.generation
    }

    pub fn set(&mut self, handle: JoinHandle<()>) {
        self.handle = Some(handle);
    }

    /// Aborts the running task and invalidates its result. Returns
    /// whether a task was running.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Marks the task of `generation` as done. Returns `false` when the
    /// task was superseded.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.handle = None;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskKind {
    Profile,
    Identify,
    Import,
    DrawRestart,
}

#[derive(Debug, Default)]
pub(crate) struct Tasks {
    profile: TaskSlot,
    identify: TaskSlot,
    import: TaskSlot,
    draw_restart: TaskSlot,
}

impl Tasks {
    pub fn slot(&mut self, kind: TaskKind) -> &mut TaskSlot {
        match kind {
            TaskKind::Profile => &mut self.profile,
            TaskKind::Identify => &mut self.identify,
            TaskKind::Import => &mut self.import,
            TaskKind::DrawRestart => &mut self.draw_restart,
        }
    }

    pub fn cancel_all(&mut self) {
        for slot in [
            &mut self.profile,
            &mut self.identify,
            &mut self.import,
            &mut self.draw_restart,
        ] {
            slot.cancel();
        }
    }
}
