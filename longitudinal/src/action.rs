use crate::{ExtensionConfig, Mode, ProfileResult};
use linefeat::{geo::Coord, DroppedFile, ImportError, LineGeometry};

/// Transition messages of the extension state.
///
/// Every change to [`State`](crate::State) goes through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Setup(ExtensionConfig),
    Initialized,
    TearDown,

    /// Tool button pressed or released.
    SetActive(bool),
    SetSettingsOpen(bool),

    /// Switches to the named mode, or back to [`Mode::Off`] when it is
    /// already active.
    ToggleMode(Mode),

    Loading(bool),
    Identifying(bool),

    ChangeReferential(String),
    ChangeDistance(f64),

    /// `None` clears the current line.
    ChangeGeometry(Option<LineGeometry>),

    AddProfileData(ProfileResult),

    SetDockOpen(bool),
    ToggleMaximize,

    /// Chart hover position, in the active referential's CRS.
    AddMarker(Coord<f64>),
    HideMarker,

    DropFile(DroppedFile),
    ImportFailed(ImportError),
    ImportDone,
}
