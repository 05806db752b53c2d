use crate::{Action, ExtensionConfig, ProfileInfos, ProfilePoint, ProfileRequest, ProfileResult};
use linefeat::{geo::Coord, Crs, ImportError, LineGeometry};
use serde::{Deserialize, Serialize};

/// How the user obtains a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Off,
    Draw,
    Select,
    Import,
}

/// Parameters of the remote profile request other than the line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestConfig {
    pub referential: Option<String>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImportStatus {
    #[default]
    Idle,
    Loading,
    Failed(ImportError),
}

/// The extension state container.
///
/// Fields are only changed by [`State::reduce`]; everything else reads
/// them through the accessor methods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    initialized: bool,
    config: Option<ExtensionConfig>,
    request: RequestConfig,
    active: bool,
    settings_open: bool,
    mode: Mode,
    loading: bool,
    identifying: bool,
    geometry: Option<LineGeometry>,
    profile: Option<ProfileResult>,
    dock_open: bool,
    maximized: bool,

    /// Chart hover position, EPSG:4326.
    marker: Option<Coord<f64>>,

    import: ImportStatus,
}

impl State {
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::Setup(config) => self.config = Some(config.clone()),
            Action::Initialized => self.initialized = true,
            Action::TearDown => *self = Self::default(),
            Action::SetActive(active) => self.active = *active,
            Action::SetSettingsOpen(open) => self.settings_open = *open,
            Action::ToggleMode(mode) => {
                self.mode = if self.mode == *mode { Mode::Off } else { *mode };
                if self.mode != Mode::Import {
                    self.import = ImportStatus::Idle;
                }
            }
            Action::Loading(loading) => self.loading = *loading,
            Action::Identifying(identifying) => self.identifying = *identifying,
            Action::ChangeReferential(referential) => {
                self.request.referential = Some(referential.clone())
            }
            Action::ChangeDistance(distance) => self.request.distance = Some(*distance),
            Action::ChangeGeometry(geometry) => self.geometry = geometry.clone(),
            Action::AddProfileData(profile) => self.profile = Some(profile.clone()),
            Action::SetDockOpen(open) => self.dock_open = *open,
            Action::ToggleMaximize => self.maximized = !self.maximized,
            Action::AddMarker(point) => {
                self.marker = self
                    .referential_crs()
                    .map(|crs| crs.transform(Crs::Wgs84, *point))
            }
            Action::HideMarker => self.marker = None,
            Action::DropFile(_) if self.mode == Mode::Import => self.import = ImportStatus::Loading,
            Action::DropFile(_) => (),
            Action::ImportFailed(err) => self.import = ImportStatus::Failed(err.clone()),
            Action::ImportDone => self.import = ImportStatus::Idle,
        }
    }
}

/// Selectors.
impl State {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> Option<&ExtensionConfig> {
        self.config.as_ref()
    }

    pub fn request(&self) -> &RequestConfig {
        &self.request
    }

    pub fn referential(&self) -> Option<&str> {
        self.request.referential.as_deref()
    }

    pub fn distance(&self) -> Option<f64> {
        self.request.distance
    }

    /// CRS of the points returned for the active referential.
    pub fn referential_crs(&self) -> Option<Crs> {
        let referential = self.referential()?;
        self.config()?.referential(referential)?.crs()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the tool menu shows as engaged.
    pub fn is_active_menu(&self) -> bool {
        self.settings_open || self.mode != Mode::Off
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_identifying(&self) -> bool {
        self.identifying
    }

    pub fn geometry(&self) -> Option<&LineGeometry> {
        self.geometry.as_ref()
    }

    pub fn profile(&self) -> Option<&ProfileResult> {
        self.profile.as_ref()
    }

    pub fn infos(&self) -> Option<&ProfileInfos> {
        self.profile.as_ref().map(|p| &p.infos)
    }

    pub fn points(&self) -> &[ProfilePoint] {
        self.profile.as_ref().map_or(&[], |p| &p.points)
    }

    pub fn is_dock_open(&self) -> bool {
        self.dock_open
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn marker(&self) -> Option<Coord<f64>> {
        self.marker
    }

    pub fn import_status(&self) -> &ImportStatus {
        &self.import
    }

    /// The request the current line and settings call for, if both are
    /// known.
    pub fn profile_request(&self) -> Option<ProfileRequest> {
        let geometry = self.geometry()?;
        Some(ProfileRequest::new(
            self.config(),
            geometry,
            self.distance()?,
            self.referential()?,
        ))
    }
}
