//! The navigation state machine.
//!
//! [`PathNavigator`] owns the browsing state of one browser instance: the
//! current symbolic path, the extension filter, the last listing, and the
//! full-path observable used for file selection. The current absolute
//! location is never cached; every operation re-resolves the symbolic path
//! against the live root bindings, so a USB mount vanishing between calls
//! surfaces as an error on the next operation instead of a stale listing.

use std::path::{Path, PathBuf};

use crate::error::BrowseError;
use crate::listing::{DirectoryEntry, DirectoryLister, ExtensionFilter};
use crate::roots::RootRegistry;
use crate::symbolic::SymbolicPath;

/// Lifecycle of a browser instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowsePhase {
    /// No path bound yet.
    Idle,
    /// Current path resolved and listed.
    Bound,
    /// The last transition failed; stays until a path binds again.
    Error,
}

pub struct PathNavigator {
    registry: RootRegistry,
    lister: DirectoryLister,
    filter: ExtensionFilter,
    phase: BrowsePhase,
    current: Option<SymbolicPath>,
    entries: Vec<DirectoryEntry>,
    full_path: Option<PathBuf>,
}

impl PathNavigator {
    /// A navigator in [`BrowsePhase::Idle`] with the match-all filter.
    pub fn new(registry: RootRegistry) -> Self {
        let lister = DirectoryLister::new(registry.style());
        Self {
            registry,
            lister,
            filter: ExtensionFilter::default(),
            phase: BrowsePhase::Idle,
            current: None,
            entries: Vec::new(),
            full_path: None,
        }
    }

    /// Binds the first path, correcting invalid input instead of failing.
    ///
    /// A value that does not parse, or whose root cannot currently be
    /// resolved (typically a disconnected USB device remembered from an
    /// earlier run), is logged and replaced by the default root. Callers
    /// observe the corrected value through [`Self::current_path`]. Errors
    /// from the initial listing itself are returned.
    pub fn initialize(&mut self, raw: &str) -> Result<(), BrowseError> {
        let path = match SymbolicPath::parse(raw) {
            Ok(path) => path,
            Err(e) => {
                let fallback = self.registry.default_root();
                tracing::error!(
                    "start path '{}' is not root-relative: {}. Falling back to '{}'",
                    raw,
                    e,
                    fallback
                );
                fallback
            }
        };
        let path = match self.registry.resolve_absolute(&path) {
            Ok(_) => path,
            Err(e) => {
                let fallback = self.registry.default_root();
                tracing::error!(
                    "start path '{}' cannot be resolved: {}. Falling back to '{}'",
                    path,
                    e,
                    fallback
                );
                fallback
            }
        };
        self.rebind(path)
    }

    /// External request to browse a different directory.
    ///
    /// Unlike [`Self::initialize`] this is fail-fast: a value that is not
    /// root-relative is rejected without touching any state. A resolution
    /// or listing failure moves the navigator to [`BrowsePhase::Error`] and
    /// is returned, not corrected.
    pub fn set_path(&mut self, raw: &str) -> Result<(), BrowseError> {
        let path = SymbolicPath::parse(raw).map_err(|source| {
            tracing::error!("rejecting path '{}': {}", raw, source);
            BrowseError::NotRootRelative {
                value: raw.to_string(),
                source,
            }
        })?;
        self.rebind(path)
    }

    /// One navigation step from the current directory.
    ///
    /// `".."` ascends to the parent, unless the current path is already at
    /// its root boundary, which is refused with a warning and no state
    /// change. Any other token names a child entry: a directory becomes
    /// the new current path; a file leaves the browsed directory alone.
    /// Either way the full-path observable tracks the candidate, including
    /// candidates that turn out not to exist.
    pub fn navigate(&mut self, token: &str) -> Result<(), BrowseError> {
        let current = self.current.clone().ok_or(BrowseError::NotInitialized)?;

        if token == ".." {
            if current.is_at_root() {
                tracing::warn!(
                    "cannot browse to the parent of '{}': it is a top-level folder",
                    current
                );
                return Ok(());
            }
            let absolute = self.resolve_current(&current)?;
            let Some(parent) = absolute.parent() else {
                tracing::warn!("'{}' has no parent directory", absolute.display());
                return Ok(());
            };
            let symbolic = self.registry.to_symbolic_relative(current.root(), parent)?;
            self.full_path = Some(parent.to_path_buf());
            return self.rebind(symbolic);
        }

        let candidate = self.resolve_current(&current)?.join(token);
        self.full_path = Some(candidate.clone());
        if candidate.is_dir() {
            let symbolic = self.registry.to_symbolic_relative(current.root(), &candidate)?;
            return self.rebind(symbolic);
        }
        Ok(())
    }

    /// Re-resolves and re-lists the current path. This is how filter
    /// changes and external filesystem changes become visible.
    pub fn refresh(&mut self) -> Result<(), BrowseError> {
        let current = self.current.clone().ok_or(BrowseError::NotInitialized)?;
        self.rebind(current)
    }

    /// Replaces the extension filter. Takes effect at the next listing;
    /// the current entry set is not recomputed.
    pub fn set_extension_filter(&mut self, spec: &str) {
        self.filter = ExtensionFilter::parse(spec);
    }

    pub fn phase(&self) -> BrowsePhase {
        self.phase
    }

    pub fn current_path(&self) -> Option<&SymbolicPath> {
        self.current.as_ref()
    }

    /// Absolute location of the current path, resolved fresh against the
    /// live bindings.
    pub fn current_absolute(&self) -> Result<PathBuf, BrowseError> {
        let current = self.current.as_ref().ok_or(BrowseError::NotInitialized)?;
        Ok(self.registry.resolve_absolute(current)?)
    }

    /// The last successful listing. Kept as-is across failed transitions.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Absolute path of the last navigation candidate, directory or file.
    /// File selection reads this after navigating onto a file entry.
    pub fn full_path(&self) -> Option<&Path> {
        self.full_path.as_deref()
    }

    pub fn extension_filter(&self) -> &ExtensionFilter {
        &self.filter
    }

    pub fn registry(&self) -> &RootRegistry {
        &self.registry
    }

    /// Makes `path` current: resolve, list, go to `Bound`. On failure the
    /// path still becomes current (so a later [`Self::refresh`] can retry
    /// it), the previous entries stay, and the phase moves to `Error`.
    fn rebind(&mut self, path: SymbolicPath) -> Result<(), BrowseError> {
        let absolute = match self.registry.resolve_absolute(&path) {
            Ok(absolute) => absolute,
            Err(e) => {
                tracing::error!("cannot resolve '{}': {}", path, e);
                self.current = Some(path);
                self.phase = BrowsePhase::Error;
                return Err(e.into());
            }
        };
        self.current = Some(path);
        match self.lister.list(&absolute, &self.filter) {
            Ok(entries) => {
                self.entries = entries;
                self.phase = BrowsePhase::Bound;
                Ok(())
            }
            Err(e) => {
                tracing::error!("cannot list '{}': {}", absolute.display(), e);
                self.phase = BrowsePhase::Error;
                Err(e.into())
            }
        }
    }

    /// Resolves the current path for a navigation step. A failure here
    /// means the current root went away mid-session.
    fn resolve_current(&mut self, current: &SymbolicPath) -> Result<PathBuf, BrowseError> {
        match self.registry.resolve_absolute(current) {
            Ok(absolute) => Ok(absolute),
            Err(e) => {
                tracing::error!("current path '{}' no longer resolves: {}", current, e);
                self.phase = BrowsePhase::Error;
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
