//! Directory listing and extension filtering.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::ListError;
use crate::roots::PathStyle;

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_directory: bool,
    /// File length rounded to the nearest kilobyte (divisor 1000, ties
    /// round to even); 0 for directories.
    pub size_kb: u64,
}

impl DirectoryEntry {
    /// The synthetic `..` entry heading every listing.
    pub fn parent() -> Self {
        Self::directory("..")
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            size_kb: 0,
        }
    }

    pub fn file(name: impl Into<String>, len_bytes: u64) -> Self {
        // Ties go to the even kilobyte: 500 B lists as 0 kB, 1500 B as 2 kB.
        let whole = len_bytes / 1000;
        let rem = len_bytes % 1000;
        let size_kb = whole + u64::from(rem > 500 || (rem == 500 && whole % 2 == 1));
        Self {
            name: name.into(),
            is_directory: false,
            size_kb,
        }
    }
}

/// Which files a listing shows, by extension.
///
/// Parsed from a semicolon-delimited spec of glob-style suffixes
/// (`*.txt;*.csv`). An empty spec, or any `*.*` pattern, disables
/// filtering. Directories are never filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    patterns: Vec<String>,
}

impl ExtensionFilter {
    /// Splits `spec` on `;`, keeping every piece verbatim. No trimming:
    /// `"*.txt; *.csv"` really does look for the extension `" *.csv"` spelled
    /// with a space, and `";"` yields two empty patterns that match nothing.
    pub fn parse(spec: &str) -> Self {
        Self {
            patterns: spec.split(';').map(String::from).collect(),
        }
    }

    /// Everything passes: the set contains `*.*`, or is the single empty
    /// pattern an empty spec parses to.
    pub fn is_match_all(&self) -> bool {
        self.patterns.iter().any(|p| p == "*.*")
            || (self.patterns.len() == 1 && self.patterns[0].is_empty())
    }

    /// Whether a file named `name` passes. The name's extension is turned
    /// into the `*.<ext>` pattern it would have to appear as in the spec;
    /// `style` decides whether the comparison folds case.
    pub fn matches(&self, name: &str, style: PathStyle) -> bool {
        if self.is_match_all() {
            return true;
        }
        let suffix = suffix_pattern(name);
        if style.folds_case() {
            let suffix = suffix.to_lowercase();
            self.patterns.iter().any(|p| p.to_lowercase() == suffix)
        } else {
            self.patterns.contains(&suffix)
        }
    }
}

impl Default for ExtensionFilter {
    /// The match-all filter.
    fn default() -> Self {
        Self::parse("")
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.patterns.join(";"))
    }
}

/// `*.<ext>` pattern for a file name. Names without an extension, and
/// names ending in a bare `.`, reduce to `*`; a leading dot counts as an
/// extension, so `.bashrc` becomes `*.bashrc`.
fn suffix_pattern(name: &str) -> String {
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() => format!("*{}", &name[i..]),
        _ => "*".to_string(),
    }
}

/// Lists one directory per call; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    style: PathStyle,
}

impl DirectoryLister {
    pub fn new(style: PathStyle) -> Self {
        Self { style }
    }

    /// Entries of `dir` in listing order: the synthetic `..` first (always
    /// present, even in an empty directory; refusing to ascend past a root
    /// is the navigator's job), then subdirectories, then the files passing
    /// `filter`, each group in enumeration order.
    pub fn list(&self, dir: &Path, filter: &ExtensionFilter) -> Result<Vec<DirectoryEntry>, ListError> {
        if !dir.is_dir() {
            return Err(ListError::NotFound(dir.to_path_buf()));
        }

        let mut entries = vec![DirectoryEntry::parent()];
        let mut files = Vec::new();
        let iter = fs::read_dir(dir).map_err(|source| ListError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for item in iter {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry in '{}': {}", dir.display(), e);
                    continue;
                }
            };
            let name = item.file_name().to_string_lossy().into_owned();
            let meta = match item.metadata() {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::debug!("skipping '{}': {}", name, e);
                    continue;
                }
            };
            if meta.is_dir() {
                entries.push(DirectoryEntry::directory(name));
            } else if filter.matches(&name, self.style) {
                files.push(DirectoryEntry::file(name, meta.len()));
            }
        }
        entries.extend(files);
        Ok(entries)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("notes.txt", "*.txt")]
    #[case::double_extension("archive.tar.gz", "*.gz")]
    #[case::no_extension("README", "*")]
    #[case::trailing_dot("draft.", "*")]
    #[case::leading_dot(".bashrc", "*.bashrc")]
    fn suffix_pattern_folds_names(#[case] name: &str, #[case] pattern: &str) {
        assert_eq!(suffix_pattern(name), pattern);
    }

    #[rstest]
    #[case::listed("report.txt", true)]
    #[case::also_listed("data.csv", true)]
    #[case::not_listed("image.png", false)]
    #[case::extensionless("README", false)]
    fn filter_admits_listed_extensions(#[case] name: &str, #[case] admitted: bool) {
        let filter = ExtensionFilter::parse("*.txt;*.csv");
        assert_eq!(filter.matches(name, PathStyle::Posix), admitted);
    }

    #[test]
    fn posix_comparison_is_case_sensitive() {
        let filter = ExtensionFilter::parse("*.txt");
        assert!(!filter.matches("REPORT.TXT", PathStyle::Posix));
        assert!(filter.matches("REPORT.TXT", PathStyle::Windows));
    }

    #[test]
    fn windows_comparison_folds_both_sides() {
        let filter = ExtensionFilter::parse("*.TXT");
        assert!(filter.matches("report.txt", PathStyle::Windows));
        assert!(!filter.matches("report.txt", PathStyle::Posix));
    }

    #[rstest]
    #[case::empty_spec("")]
    #[case::star_dot_star("*.*")]
    #[case::star_dot_star_among_others("*.txt;*.*")]
    fn match_all_specs_admit_everything(#[case] spec: &str) {
        let filter = ExtensionFilter::parse(spec);
        assert!(filter.is_match_all());
        assert!(filter.matches("anything.bin", PathStyle::Posix));
        assert!(filter.matches("README", PathStyle::Posix));
    }

    #[test]
    fn bare_star_admits_extensionless_files_only() {
        let filter = ExtensionFilter::parse("*");
        assert!(filter.matches("README", PathStyle::Posix));
        assert!(!filter.matches("notes.txt", PathStyle::Posix));
    }

    #[test]
    fn lone_semicolon_blocks_every_file() {
        // Two empty patterns: not the single-empty match-all shape, and no
        // suffix pattern is ever the empty string.
        let filter = ExtensionFilter::parse(";");
        assert!(!filter.is_match_all());
        assert!(!filter.matches("notes.txt", PathStyle::Posix));
        assert!(!filter.matches("README", PathStyle::Posix));
    }

    #[test]
    fn spec_pieces_are_not_trimmed() {
        let filter = ExtensionFilter::parse("*.txt; *.csv");
        assert!(!filter.matches("data.csv", PathStyle::Posix));
        assert!(filter.matches("notes.txt", PathStyle::Posix));
    }

    #[test]
    fn display_round_trips_the_spec() {
        for spec in ["", "*.txt", "*.txt;*.csv", ";"] {
            assert_eq!(ExtensionFilter::parse(spec).to_string(), spec);
        }
    }

    #[rstest]
    #[case::zero(0, 0)]
    #[case::under_half(499, 0)]
    #[case::tie_to_even_zero(500, 0)]
    #[case::over_half(501, 1)]
    #[case::exact(1000, 1)]
    #[case::just_under_next(1499, 1)]
    #[case::tie_to_even_two(1500, 2)]
    #[case::tie_stays_at_even_two(2500, 2)]
    #[case::tie_to_even_four(3500, 4)]
    #[case::large(1_234_567, 1235)]
    fn file_sizes_round_to_nearest_kilobyte(#[case] len: u64, #[case] kb: u64) {
        assert_eq!(DirectoryEntry::file("f", len).size_kb, kb);
    }

    #[test]
    fn lists_parent_then_directories_then_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("a.txt"), vec![0u8; 1600]).unwrap();
        std::fs::write(tmp.path().join("b.csv"), b"1,2\n").unwrap();

        let lister = DirectoryLister::new(PathStyle::Posix);
        let mut entries = lister.list(tmp.path(), &ExtensionFilter::default()).unwrap();

        assert_eq!(entries[0], DirectoryEntry::parent());
        assert_eq!(entries[1], DirectoryEntry::directory("sub"));
        // Enumeration order is platform-dependent past the dir/file split.
        entries[2..].sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            &entries[2..],
            &[DirectoryEntry::file("a.txt", 1600), DirectoryEntry::file("b.csv", 4)]
        );
        assert_eq!(entries[2].size_kb, 2);
    }

    #[test]
    fn filtered_files_are_dropped_but_directories_stay() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub.png")).unwrap();
        std::fs::write(tmp.path().join("keep.txt"), b"x").unwrap();
        std::fs::write(tmp.path().join("drop.png"), b"x").unwrap();

        let lister = DirectoryLister::new(PathStyle::Posix);
        let entries = lister
            .list(tmp.path(), &ExtensionFilter::parse("*.txt"))
            .unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["..", "sub.png", "keep.txt"]);
    }

    #[test]
    fn empty_directory_still_lists_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let lister = DirectoryLister::new(PathStyle::Posix);
        let entries = lister.list(tmp.path(), &ExtensionFilter::default()).unwrap();
        assert_eq!(entries, vec![DirectoryEntry::parent()]);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("gone");
        let lister = DirectoryLister::new(PathStyle::Posix);
        let err = lister.list(&gone, &ExtensionFilter::default()).unwrap_err();
        assert!(matches!(err, ListError::NotFound(p) if p == gone));
    }

    #[test]
    fn a_file_path_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f.txt");
        std::fs::write(&file, b"x").unwrap();
        let lister = DirectoryLister::new(PathStyle::Posix);
        assert!(matches!(
            lister.list(&file, &ExtensionFilter::default()),
            Err(ListError::NotFound(_))
        ));
    }
}
