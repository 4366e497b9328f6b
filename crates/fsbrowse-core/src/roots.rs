//! Root bindings and resolution between symbolic and absolute paths.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ResolutionError;
use crate::symbolic::{RootKind, SymbolicPath, UsbSlot};

/// Path convention a registry resolves under.
///
/// Resolution is host-sensitive in two places: the separator joined into
/// absolute paths, and whether filename case folds in the extension filter.
/// Carrying the style as a value keeps both rules testable on any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Posix,
    Windows,
}

impl PathStyle {
    /// Style of the compile target.
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    pub fn separator(self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Rewrites a relative segment to this style's separator. Symbolic
    /// segments may carry either kind, absolute paths only the host's.
    pub fn normalize_segment(self, segment: &str) -> String {
        match self {
            PathStyle::Posix => segment.replace('\\', "/"),
            PathStyle::Windows => segment.replace('/', "\\"),
        }
    }

    /// Whether file names compare case-insensitively under this style.
    pub fn folds_case(self) -> bool {
        matches!(self, PathStyle::Windows)
    }
}

/// Absolute directories bound to each logical root.
///
/// Application and project are always bound. USB slots are bound per mount
/// and count as connected only while the mount directory exists; that check
/// happens at resolution time, not here.
#[derive(Debug, Clone)]
pub struct RootBindings {
    application_dir: PathBuf,
    project_dir: PathBuf,
    usb_mounts: BTreeMap<UsbSlot, PathBuf>,
}

impl RootBindings {
    pub fn new(application_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            application_dir: trim_trailing_separators(application_dir.into()),
            project_dir: trim_trailing_separators(project_dir.into()),
            usb_mounts: BTreeMap::new(),
        }
    }

    /// Binds a USB slot to its mount directory.
    pub fn with_usb_mount(mut self, slot: UsbSlot, mount: impl Into<PathBuf>) -> Self {
        self.usb_mounts.insert(slot, trim_trailing_separators(mount.into()));
        self
    }
}

/// Bound directories are stored without trailing separators so the prefix
/// strip in [`RootRegistry::to_symbolic_relative`] leaves exactly one
/// separator in front of a child's remainder. Drive roots (`E:\`) and the
/// filesystem root (`/`) are kept whole; trimmed, they would name a
/// different directory.
fn trim_trailing_separators(dir: PathBuf) -> PathBuf {
    let text = dir.to_string_lossy();
    let trimmed = text.trim_end_matches(['\\', '/']);
    if trimmed.is_empty() || trimmed.ends_with(':') || trimmed.len() == text.len() {
        return dir;
    }
    PathBuf::from(trimmed)
}

/// Resolves symbolic paths against the current root bindings.
///
/// Immutable after construction. USB presence is re-checked on every call
/// rather than cached; mounts come and go between calls.
#[derive(Debug, Clone)]
pub struct RootRegistry {
    bindings: RootBindings,
    namespace: Option<String>,
    style: PathStyle,
}

impl RootRegistry {
    /// Registry using the host's native path style.
    pub fn new(bindings: RootBindings, namespace: Option<String>) -> Self {
        Self::with_style(bindings, namespace, PathStyle::native())
    }

    /// Registry with an explicit path style. Live hosts want
    /// [`RootRegistry::new`]; this exists so the per-style stripping rules
    /// can be pinned down in tests.
    pub fn with_style(bindings: RootBindings, namespace: Option<String>, style: PathStyle) -> Self {
        Self {
            bindings,
            namespace,
            style,
        }
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// Directory bound to a root, without checking that it is present.
    fn bound_dir(&self, root: RootKind) -> Result<&Path, ResolutionError> {
        match root {
            RootKind::Application => Ok(&self.bindings.application_dir),
            RootKind::Project => Ok(&self.bindings.project_dir),
            RootKind::Usb(slot) => self
                .bindings
                .usb_mounts
                .get(&slot)
                .map(PathBuf::as_path)
                .ok_or(ResolutionError::RootNotBound { slot: slot.get() }),
        }
    }

    /// Like [`Self::bound_dir`], but a USB root must also be connected
    /// right now, i.e. its mount directory exists.
    fn connected_dir(&self, root: RootKind) -> Result<&Path, ResolutionError> {
        let dir = self.bound_dir(root)?;
        if let RootKind::Usb(slot) = root {
            if !dir.is_dir() {
                return Err(ResolutionError::RootNotBound { slot: slot.get() });
            }
        }
        Ok(dir)
    }

    /// Maps a symbolic path to an absolute filesystem path.
    ///
    /// The relative segment is normalized to the registry's separator and
    /// joined with that same separator; a bound directory that already ends
    /// in it (a drive root like `E:\`) takes the segment directly. An empty
    /// segment resolves to the root directory itself.
    pub fn resolve_absolute(&self, path: &SymbolicPath) -> Result<PathBuf, ResolutionError> {
        let dir = self.connected_dir(path.root())?;
        if path.relative_segment().is_empty() {
            return Ok(dir.to_path_buf());
        }
        let mut joined = dir.to_string_lossy().into_owned();
        if !joined.ends_with(self.style.separator()) {
            joined.push(self.style.separator());
        }
        joined.push_str(&self.style.normalize_segment(path.relative_segment()));
        Ok(PathBuf::from(joined))
    }

    /// Maps an absolute path back into a symbolic path under `root`.
    ///
    /// The root's bound prefix is stripped off the front of `absolute`, and
    /// the leading separator of what remains is then consumed. The
    /// exception is USB roots under the Windows style: their bound prefix
    /// is a drive root (`E:\`) that already ends in the separator, so
    /// nothing further is consumed. An empty remainder yields the bare
    /// root. The segment is otherwise kept verbatim, host separators
    /// included.
    pub fn to_symbolic_relative(
        &self,
        root: RootKind,
        absolute: &Path,
    ) -> Result<SymbolicPath, ResolutionError> {
        let dir = self.bound_dir(root)?;
        let dir_str = dir.to_string_lossy();
        let absolute_str = absolute.to_string_lossy();

        let outside = || ResolutionError::OutsideRoot {
            root,
            path: absolute.to_path_buf(),
        };

        let remainder = absolute_str
            .strip_prefix(dir_str.as_ref())
            .ok_or_else(outside)?;
        if remainder.is_empty() {
            return Ok(self.symbolic_root(root));
        }

        let consume_separator = !(self.style == PathStyle::Windows && matches!(root, RootKind::Usb(_)));
        let relative = if consume_separator {
            // A remainder that does not continue with the separator means
            // `absolute` only shares a name prefix with the root
            // (`/data/proj` vs `/data/project-x`), which is outside it.
            remainder
                .strip_prefix(self.style.separator())
                .ok_or_else(outside)?
        } else {
            remainder
        };

        Ok(self.symbolic_root(root).with_relative_segment(relative))
    }

    /// Bare symbolic path for a root. Application and project paths carry
    /// the registry's namespace qualifier; USB paths never do.
    pub fn symbolic_root(&self, root: RootKind) -> SymbolicPath {
        let path = SymbolicPath::new(root, "");
        match root {
            RootKind::Usb(_) => path,
            RootKind::Application | RootKind::Project => {
                path.with_namespace(self.namespace.as_deref())
            }
        }
    }

    /// The fallback whenever an external path value fails validation: the
    /// bare project root.
    pub fn default_root(&self) -> SymbolicPath {
        self.symbolic_root(RootKind::Project)
    }

    /// USB slots whose mounts are present, probing `1..=max_slots` in order
    /// and stopping at the first slot that fails to resolve. Device
    /// numbering is assumed contiguous, so a gap hides the slots after it.
    pub fn probe_available_usb(&self, max_slots: u8) -> Vec<UsbSlot> {
        let mut available = Vec::new();
        for number in 1..=max_slots {
            let Some(slot) = UsbSlot::new(number) else {
                break;
            };
            match self.connected_dir(RootKind::Usb(slot)) {
                Ok(_) => available.push(slot),
                Err(e) => {
                    tracing::debug!("USB probe stopped at slot {}: {}", number, e);
                    break;
                }
            }
        }
        available
    }
}

// =============================================================================
// Tests
// =============================================================================
