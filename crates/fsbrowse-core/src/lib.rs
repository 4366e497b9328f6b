//! fsbrowse-core: symbolic, root-relative filesystem browsing.
//!
//! Paths are written against logical roots instead of absolute locations:
//! `%APPLICATIONDIR%` for the application install directory, `%PROJECTDIR%`
//! for the loaded project, and `%USB<n>%` for removable media slots. The
//! core parses and formats these values, resolves them against per-machine
//! root bindings, and drives a filtered directory listing that is walked
//! purely through symbolic path edits.
//!
//! The pieces, bottom up:
//!
//! - [`SymbolicPath`]: parse and format of `<root-token><separator><segment>`
//! - [`RootRegistry`]: root bindings, both resolution directions, USB probing
//! - [`DirectoryLister`] and [`ExtensionFilter`]: one listing per call,
//!   files filtered by extension, `..` always first
//! - [`PathNavigator`]: the state machine gluing the three together
//! - [`LocationsModel`]: the selectable-roots snapshot for a picker
//! - [`BrowserConfig`]: TOML configuration that builds a navigator
//!
//! Everything is synchronous and single-threaded. Independent browser
//! instances share nothing but their root bindings, which are plain values
//! and can simply be cloned.

pub mod config;
pub mod error;
pub mod listing;
pub mod locations;
pub mod navigator;
pub mod roots;
pub mod symbolic;

pub use config::{BrowserConfig, UsbMountConfig};
pub use error::{BrowseError, ListError, ParseError, ResolutionError};
pub use listing::{DirectoryEntry, DirectoryLister, ExtensionFilter};
pub use locations::{Location, LocationsModel};
pub use navigator::{BrowsePhase, PathNavigator};
pub use roots::{PathStyle, RootBindings, RootRegistry};
pub use symbolic::{MAX_USB_SLOTS, RootKind, SymbolicPath, UsbSlot};
