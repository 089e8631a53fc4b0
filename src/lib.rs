//! Screen-space markers for scene nodes streamed through a property tree.
//!
//! Snapshot in, view model and subscription commands out:
//!
//! ```no_run
//! use scene_markers::{dispatch_all, AppState, Config, LocalPropertyService, Markers};
//!
//! let mut service = LocalPropertyService::new(AppState::default());
//! let mut markers = Markers::new(Config::default());
//!
//! let update = markers.update(service.snapshot());
//! dispatch_all(&update.commands, &mut service);
//!
//! let stops = markers.unmount();
//! dispatch_all(&stops, &mut service);
//! ```

pub mod catalog;
pub mod component;
pub mod config;
pub mod error;
pub mod logging;
pub mod marker;
pub mod property_tree;
pub mod scene;
pub mod service;
pub mod subscription;

pub use catalog::{FetchEntry, InfoIconCatalog, PlanetInfo};
pub use component::{Markers, MarkersUpdate};
pub use config::Config;
pub use error::{Error, Result};
pub use marker::{markers, MarkerInfo, MarkerPolicy};
pub use property_tree::{Property, PropertyDescription, PropertyOwner, PropertyTree};
pub use scene::{derive, AppState, MarkerState, SceneNode, TrackedKind, TrackedProperties};
pub use service::LocalPropertyService;
pub use subscription::{dispatch_all, ListenCommand, PropertyService};
