//! # Longitudinal profiles
//!
//! `longitudinal` is the state and orchestration core of an elevation
//! profile tool for a web map. A user obtains a line by drawing it,
//! clicking a feature, or dropping a file; the line and the chosen
//! referential/distance are sent to a remote profile process, and the
//! returned series is kept alongside the dock, overlay and viewport
//! state that must follow it.
//!
//! Everything runs on a single task: [`Controller`] owns the [`State`],
//! applies [`Action`]s in arrival order, and talks to the map through
//! the [`Host`] traits. Remote work is spawned and reports back through
//! the controller's queue, where stale results are discarded.

mod action;
mod config;
mod controller;
mod error;
mod host;
mod import;
mod mode;
mod pipeline;
mod profile;
mod selection;
mod service;
mod state;
mod task;
#[cfg(test)]
mod testing;
mod view;

pub use crate::{
    action::Action,
    config::{Defaults, ExtensionConfig, ProjectionDef, Referential},
    controller::{Controller, ControllerHandle, Event},
    error::{ConfigError, ServiceError},
    host::{
        messages, ClickListeners, DrawOptions, Drawing, Edges, Host, HostEvent, IntersectedLayer,
        LayerInfo, LayerKind, MapClick, MapHost, MapInfo, MapLayout, MapPoint, MapView, Notice,
        Notifier, OverlayLayer, Overlays, PanelAction,
    },
    profile::{InputData, ProfileInfos, ProfilePayload, ProfilePoint, ProfileRequest, ProfileResult},
    service::{
        BoxFuture, FileImporter, IdentifyResponse, IdentifyService, JsonImporter, ProfileService,
        Services,
    },
    state::{ImportStatus, Mode, RequestConfig, State},
};
pub use linefeat;

use std::time::Duration;

/// Name of the tool control; owner of drawing interactions and click
/// listeners started by this extension.
pub const CONTROL_NAME: &str = "longitudinalProfile";

/// Name of the dock panel registered with the host.
pub const CONTROL_DOCK_NAME: &str = "longitudinalDock";

/// Side of the map the dock is attached to.
pub const DOCK_LOCATION: &str = "right";

/// Width of the dock, in pixels.
pub const DOCK_WIDTH: f64 = 550.0;

/// Owner tag of the layers this extension adds to the map.
pub const LAYER_OWNER: &str = "longitudinal";

pub const OVERLAY_LAYER_ID: &str = "longitudinal_profile";

pub const MARKER_LAYER_ID: &str = "longitudinal_profile_marker";

/// Map event this extension listens to in select mode.
pub const CLICK_EVENT: &str = "click";

/// Delay before a new line drawing starts after the previous one ends.
pub const DRAW_RESTART_DELAY: Duration = Duration::from_millis(200);
