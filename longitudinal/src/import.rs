use crate::{
    controller::{Completion, Controller},
    host::{messages, Notice},
    task::TaskKind,
    Action, ExtensionConfig, Host, Mode,
};
use linefeat::{DroppedFile, ImportError, ImportedDocument};
use log::debug;

impl<H: Host> Controller<H> {
    pub(crate) fn start_import(&mut self, file: DroppedFile) {
        debug!("importing {}", file.name);
        let extra = self
            .state
            .config()
            .map(ExtensionConfig::projection_codes)
            .unwrap_or_default();
        let document = self.services.importer.import(file, &extra);
        self.spawn(TaskKind::Import, document, |generation, result| {
            Completion::Import { generation, result }
        });
    }

    pub(crate) fn on_import_done(
        &mut self,
        generation: u64,
        result: Result<ImportedDocument, ImportError>,
    ) {
        if !self.tasks.slot(TaskKind::Import).finish(generation) {
            return;
        }
        let line = match result {
            Ok(document) => document
                .find_line()
                .map_err(|err| ImportError::Unknown(err.to_string())),
            Err(err) => Err(err),
        };
        match line {
            Ok(Some(line)) => {
                self.put(Action::ImportDone);
                self.put(Action::ChangeGeometry(Some(line)));
                if self.state.mode() == Mode::Import {
                    self.put(Action::ToggleMode(Mode::Import));
                }
            }
            Ok(None) => {
                self.put(Action::ImportDone);
                self.host
                    .warn(Notice::warning(messages::NO_LINE_FEATURE_FOUND));
            }
            Err(err) => {
                debug!("import failed: {err}");
                self.put(Action::ImportFailed(err));
            }
        }
    }
}
