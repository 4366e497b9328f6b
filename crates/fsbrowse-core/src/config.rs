//! Browser configuration, loadable from TOML.
//!
//! ```toml
//! application_dir = "/opt/acme/app"
//! project_dir = "/var/lib/acme/project"
//! namespace = "ns=7"
//! path = "%PROJECTDIR%\\reports"
//! extension_filter = "*.csv;*.txt"
//!
//! [[usb]]
//! slot = 1
//! mount = "/media/usb1"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::navigator::PathNavigator;
use crate::roots::{RootBindings, RootRegistry};
use crate::symbolic::{MAX_USB_SLOTS, UsbSlot};

/// Everything needed to stand up one browser instance.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Directory the application root resolves to.
    pub application_dir: PathBuf,
    /// Directory the project root resolves to.
    pub project_dir: PathBuf,
    /// USB slot bindings.
    #[serde(default)]
    pub usb: Vec<UsbMountConfig>,
    /// Namespace qualifier carried on application and project paths.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Initial symbolic path.
    #[serde(default = "default_start_path")]
    pub path: String,
    /// Semicolon-delimited extension filter spec.
    #[serde(default)]
    pub extension_filter: String,
    /// Upper bound for USB slot probing.
    #[serde(default = "default_max_usb_slots")]
    pub max_usb_slots: u8,
}

/// One `[[usb]]` entry binding a slot to its mount directory.
#[derive(Debug, Clone, Deserialize)]
pub struct UsbMountConfig {
    pub slot: u8,
    pub mount: PathBuf,
}

fn default_start_path() -> String {
    "%PROJECTDIR%\\".to_string()
}

fn default_max_usb_slots() -> u8 {
    MAX_USB_SLOTS
}

impl BrowserConfig {
    /// Config with the two mandatory roots and defaults for everything
    /// else.
    pub fn for_dirs(application_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            application_dir: application_dir.into(),
            project_dir: project_dir.into(),
            usb: Vec::new(),
            namespace: None,
            path: default_start_path(),
            extension_filter: String::new(),
            max_usb_slots: MAX_USB_SLOTS,
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("malformed browser configuration")
    }

    /// Root bindings described by this config. Slot numbers are validated
    /// here; mount presence is not, that stays a resolution-time concern.
    pub fn bindings(&self) -> Result<RootBindings> {
        let mut bindings = RootBindings::new(&self.application_dir, &self.project_dir);
        for usb in &self.usb {
            let slot = UsbSlot::new(usb.slot)
                .with_context(|| format!("USB slot {} is outside 1..={MAX_USB_SLOTS}", usb.slot))?;
            bindings = bindings.with_usb_mount(slot, &usb.mount);
        }
        Ok(bindings)
    }

    /// A navigator over this config's roots, still idle. Callers bind
    /// [`path`](Self::path) via [`PathNavigator::initialize`] when ready.
    pub fn build_navigator(&self) -> Result<PathNavigator> {
        let registry = RootRegistry::new(self.bindings()?, self.namespace.clone());
        let mut navigator = PathNavigator::new(registry);
        navigator.set_extension_filter(&self.extension_filter);
        Ok(navigator)
    }
}

// =============================================================================
// Tests
// =============================================================================
