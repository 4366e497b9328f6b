//! Symbolic root-relative paths.
//!
//! A symbolic path is a root token (`%APPLICATIONDIR%`, `%PROJECTDIR%`,
//! `%USB<n>%`) followed by a relative segment. The token names a logical
//! root whose absolute location differs per machine, so these values are
//! portable where absolute paths are not. Values are immutable; every
//! navigation step constructs a new one.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Highest slot number a `%USB<n>%` token may carry.
pub const MAX_USB_SLOTS: u8 = 5;

const APPLICATION_TOKEN: &str = "%APPLICATIONDIR%";
const PROJECT_TOKEN: &str = "%PROJECTDIR%";

/// A USB slot number, always within `1..=MAX_USB_SLOTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsbSlot(u8);

impl UsbSlot {
    /// Returns `None` when `slot` is outside `1..=MAX_USB_SLOTS`.
    pub fn new(slot: u8) -> Option<Self> {
        (1..=MAX_USB_SLOTS).contains(&slot).then_some(Self(slot))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for UsbSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which logical root a symbolic path hangs off.
///
/// The slot lives inside the `Usb` variant, so a USB path always carries a
/// validated slot number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    Application,
    Project,
    Usb(UsbSlot),
}

impl RootKind {
    /// Separator printed between the root token and the relative segment.
    ///
    /// Application and project tokens take `\`, USB tokens take `/`,
    /// independent of the host platform. Parsing accepts either.
    pub fn token_separator(self) -> char {
        match self {
            RootKind::Application | RootKind::Project => '\\',
            RootKind::Usb(_) => '/',
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootKind::Application => f.write_str(APPLICATION_TOKEN),
            RootKind::Project => f.write_str(PROJECT_TOKEN),
            RootKind::Usb(slot) => write!(f, "%USB{slot}%"),
        }
    }
}

/// A parsed root-relative path.
///
/// The relative segment is stored verbatim: it may be empty (the bare
/// root), may contain either separator style, and is never canonicalized
/// here. The optional namespace qualifier is opaque text some hosts prefix
/// to application and project paths (`ns=7;%PROJECTDIR%\..`); USB paths are
/// never qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicPath {
    root: RootKind,
    relative: String,
    namespace: Option<String>,
}

impl SymbolicPath {
    pub fn new(root: RootKind, relative: impl Into<String>) -> Self {
        Self {
            root,
            relative: relative.into(),
            namespace: None,
        }
    }

    /// Parses `<qualifier ';'>? <root-token> <separator>? <segment>`.
    ///
    /// The separator right after the token is consumed when present, so
    /// `%PROJECTDIR%\reports` and `%PROJECTDIR%reports` parse identically.
    /// A qualifier is only recognized when the text does not already start
    /// with `%`, and is split off at the first `;`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let (namespace, rest) = if text.starts_with('%') {
            (None, text)
        } else {
            match text.split_once(';') {
                Some((ns, rest)) if !ns.is_empty() && rest.starts_with('%') => (Some(ns), rest),
                _ => return Err(ParseError::UnrecognizedRoot(text.to_string())),
            }
        };

        let (root, remainder) = if let Some(r) = rest.strip_prefix(APPLICATION_TOKEN) {
            (RootKind::Application, r)
        } else if let Some(r) = rest.strip_prefix(PROJECT_TOKEN) {
            (RootKind::Project, r)
        } else if let Some(r) = rest.strip_prefix("%USB") {
            let Some(end) = r.find('%') else {
                return Err(ParseError::UnrecognizedRoot(text.to_string()));
            };
            let number: u32 = r[..end]
                .parse()
                .map_err(|_| ParseError::InvalidSlot(text.to_string()))?;
            let slot = u8::try_from(number)
                .ok()
                .and_then(UsbSlot::new)
                .ok_or(ParseError::SlotOutOfRange(number))?;
            (RootKind::Usb(slot), &r[end + 1..])
        } else {
            return Err(ParseError::UnrecognizedRoot(text.to_string()));
        };

        if namespace.is_some() && matches!(root, RootKind::Usb(_)) {
            return Err(ParseError::QualifiedUsb(text.to_string()));
        }

        let relative = remainder.strip_prefix(['\\', '/']).unwrap_or(remainder);
        Ok(Self {
            root,
            relative: relative.to_string(),
            namespace: namespace.map(String::from),
        })
    }

    pub fn root(&self) -> RootKind {
        self.root
    }

    pub fn relative_segment(&self) -> &str {
        &self.relative
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Same root and qualifier, different relative segment.
    pub fn with_relative_segment(&self, segment: impl Into<String>) -> Self {
        Self {
            root: self.root,
            relative: segment.into(),
            namespace: self.namespace.clone(),
        }
    }

    pub(crate) fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(String::from);
        self
    }

    /// Whether this path sits directly at its root. Ascending from here is
    /// a boundary violation the navigator refuses.
    pub fn is_at_root(&self) -> bool {
        self.relative.is_empty()
    }
}

impl fmt::Display for SymbolicPath {
    /// Canonical form: qualifier (if any), token, the per-kind separator,
    /// then the segment verbatim. The separator is printed even when the
    /// segment is empty, matching how these values appear in stored
    /// configuration.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ns) = &self.namespace {
            write!(f, "{ns};")?;
        }
        write!(f, "{}{}{}", self.root, self.root.token_separator(), self.relative)
    }
}

impl FromStr for SymbolicPath {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Tests
// =============================================================================
