//! Failure taxonomy for the browsing core.
//!
//! One enum per concern: [`ParseError`] for the symbolic-path grammar,
//! [`ResolutionError`] for the symbolic/absolute mapping, [`ListError`] for
//! directory enumeration, and [`BrowseError`] as the navigator umbrella.

use std::path::PathBuf;

use thiserror::Error;

use crate::symbolic::{MAX_USB_SLOTS, RootKind};

/// Input text does not match the root-token grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("path is empty")]
    Empty,
    #[error("path must start with '%APPLICATIONDIR%\\', '%PROJECTDIR%\\' or '%USB<n>%': got '{0}'")]
    UnrecognizedRoot(String),
    #[error("USB slot {0} is outside 1..={max}", max = MAX_USB_SLOTS)]
    SlotOutOfRange(u32),
    #[error("USB slot in '{0}' is not a number")]
    InvalidSlot(String),
    #[error("namespace qualifier is not allowed on USB paths: '{0}'")]
    QualifiedUsb(String),
}

/// A recognized root cannot be mapped to or from an absolute path right now.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The USB slot is not configured, or its mount directory is gone.
    /// Recoverable: the device may show up before the next call.
    #[error("USB slot {slot} is not connected")]
    RootNotBound { slot: u8 },
    /// The inverse mapping was handed a path outside the root's prefix.
    #[error("'{}' is not under the {root} root", .path.display())]
    OutsideRoot { root: RootKind, path: PathBuf },
}

/// Directory enumeration failed.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("'{}' does not exist or is not a directory", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read directory '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

/// Anything a [`PathNavigator`](crate::navigator::PathNavigator) operation
/// can fail with.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// An externally supplied path value failed the root-relative gate.
    /// This is a caller contract violation, never silently corrected.
    #[error("path '{value}' is not root-relative: {source}")]
    NotRootRelative { value: String, source: ParseError },
    #[error("no current path to navigate from")]
    NotInitialized,
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    List(#[from] ListError),
}
