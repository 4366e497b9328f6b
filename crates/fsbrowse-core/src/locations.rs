//! Selectable root locations, the model behind a location picker.

use crate::roots::RootRegistry;
use crate::symbolic::{RootKind, SymbolicPath};

/// One selectable storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Plain display label. Localization is the caller's concern.
    pub label: String,
    /// The bare root path (`%PROJECTDIR%\`, `%USB2%/`, ...).
    pub path: SymbolicPath,
}

/// The set of roots currently worth offering.
///
/// Application and project are always present; connected USB slots follow
/// in probing order, so a gap in device numbering hides the slots after it.
/// The model is a snapshot: rebuild it to pick up plug and unplug events.
#[derive(Debug, Clone)]
pub struct LocationsModel {
    locations: Vec<Location>,
}

impl LocationsModel {
    pub fn discover(registry: &RootRegistry, max_slots: u8) -> Self {
        let mut locations = vec![
            Location {
                label: "Application".to_string(),
                path: registry.symbolic_root(RootKind::Application),
            },
            Location {
                label: "Project".to_string(),
                path: registry.symbolic_root(RootKind::Project),
            },
        ];
        for slot in registry.probe_available_usb(max_slots) {
            locations.push(Location {
                label: format!("USB {}", slot.get()),
                path: registry.symbolic_root(RootKind::Usb(slot)),
            });
        }
        Self { locations }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The location a path belongs to, matched by root. Used to keep a
    /// picker selection in sync with the browsed path.
    pub fn find(&self, path: &SymbolicPath) -> Option<&Location> {
        self.locations.iter().find(|l| l.path.root() == path.root())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::roots::{PathStyle, RootBindings};
    use crate::symbolic::UsbSlot;

    #[test]
    fn fixed_roots_are_always_offered() {
        let registry = RootRegistry::with_style(
            RootBindings::new("/opt/app", "/data/proj"),
            None,
            PathStyle::Posix,
        );
        let model = LocationsModel::discover(&registry, 5);
        let labels: Vec<&str> = model.locations().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Application", "Project"]);
        assert_eq!(model.locations()[1].path.to_string(), "%PROJECTDIR%\\");
    }

    #[test]
    fn connected_usb_slots_are_appended_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let m1 = tmp.path().join("u1");
        let m2 = tmp.path().join("u2");
        fs::create_dir(&m1).unwrap();
        fs::create_dir(&m2).unwrap();
        let bindings = RootBindings::new("/opt/app", "/data/proj")
            .with_usb_mount(UsbSlot::new(1).unwrap(), &m1)
            .with_usb_mount(UsbSlot::new(2).unwrap(), &m2);
        let registry = RootRegistry::with_style(bindings, None, PathStyle::Posix);

        let model = LocationsModel::discover(&registry, 5);
        let labels: Vec<&str> = model.locations().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Application", "Project", "USB 1", "USB 2"]);
        assert_eq!(model.locations()[2].path.to_string(), "%USB1%/");
    }

    #[test]
    fn a_numbering_gap_hides_later_slots() {
        let tmp = tempfile::tempdir().unwrap();
        let m2 = tmp.path().join("u2");
        fs::create_dir(&m2).unwrap();
        // Only slot 2 is connected; the probe stops at slot 1.
        let bindings = RootBindings::new("/opt/app", "/data/proj")
            .with_usb_mount(UsbSlot::new(2).unwrap(), &m2);
        let registry = RootRegistry::with_style(bindings, None, PathStyle::Posix);

        let model = LocationsModel::discover(&registry, 5);
        assert_eq!(model.locations().len(), 2);
    }

    #[test]
    fn find_matches_by_root_not_by_segment() {
        let tmp = tempfile::tempdir().unwrap();
        let m1 = tmp.path().join("u1");
        fs::create_dir(&m1).unwrap();
        let bindings = RootBindings::new("/opt/app", "/data/proj")
            .with_usb_mount(UsbSlot::new(1).unwrap(), &m1);
        let registry = RootRegistry::with_style(bindings, None, PathStyle::Posix);
        let model = LocationsModel::discover(&registry, 5);

        let deep = SymbolicPath::parse("%USB1%/media/clips").unwrap();
        assert_eq!(model.find(&deep).unwrap().label, "USB 1");

        let project = SymbolicPath::parse("%PROJECTDIR%\\reports").unwrap();
        assert_eq!(model.find(&project).unwrap().label, "Project");

        let unplugged = SymbolicPath::parse("%USB2%/x").unwrap();
        assert!(model.find(&unplugged).is_none());
    }
}
