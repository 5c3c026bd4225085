//! File search by name pattern and/or content substring.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::Pattern;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use super::error::FinderError;

/// A single search request.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Directory the walk starts from.
    pub root: PathBuf,

    /// Case-insensitive glob matched against each file's base name.
    pub name_pattern: Option<String>,

    /// Case-sensitive literal searched for in each line.
    pub content: Option<String>,

    /// When set, symlinks whose target resolves outside this directory are
    /// skipped. Must be canonical.
    pub confine_to: Option<PathBuf>,
}

impl SearchQuery {
    /// Create a query rooted at `root` that matches nothing yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Match file names against a glob pattern.
    pub fn with_name(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// Match lines containing `content`.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Skip symlinks that escape the canonical directory `boundary`.
    pub fn confined_to(mut self, boundary: Option<PathBuf>) -> Self {
        self.confine_to = boundary;
        self
    }
}

/// One reported match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMatch {
    /// The file's base name matched the name pattern.
    Name { path: PathBuf },

    /// A line of the file contained the content substring.
    Content {
        path: PathBuf,
        /// 1-based.
        line_number: usize,
        line: String,
    },
}

impl SearchMatch {
    /// Path of the matched file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Name { path } | Self::Content { path, .. } => path,
        }
    }
}

impl fmt::Display for SearchMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { path } => write!(f, "{}", path.display()),
            Self::Content {
                path,
                line_number,
                line,
            } => write!(f, "{}:{}: {}", path.display(), line_number, line),
        }
    }
}

/// Matches in walk order. Content matches of one file are in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    matches: Vec<SearchMatch>,
}

impl SearchResult {
    /// All matches.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of reported entries.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Consume the result, returning the matches.
    pub fn into_matches(self) -> Vec<SearchMatch> {
        self.matches
    }
}

/// One match per line.
impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.matches.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

/// Search `query.root` recursively.
///
/// Fails with [`FinderError::NotFound`] when the root does not exist and with
/// [`FinderError::Traversal`] on any error while walking the tree. Files that
/// cannot be opened for the content scan are skipped.
pub fn search(query: &SearchQuery) -> Result<SearchResult, FinderError> {
    search_cancellable(query, &CancellationToken::new())
}

/// Like [`search`], but stops with [`FinderError::Cancelled`] once `token`
/// is cancelled.
#[instrument(skip_all, fields(root = %query.root.display()))]
pub fn search_cancellable(
    query: &SearchQuery,
    token: &CancellationToken,
) -> Result<SearchResult, FinderError> {
    match query.root.try_exists() {
        Ok(true) => {}
        Ok(false) => return Err(FinderError::not_found(&query.root)),
        Err(e) => return Err(FinderError::from_io(&query.root, e)),
    }

    let name_pattern = query
        .name_pattern
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| {
            Pattern::new(&p.to_lowercase()).map_err(|source| FinderError::InvalidPattern {
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()?;
    let needle = query.content.as_deref().filter(|c| !c.is_empty());

    let mut result = SearchResult::default();
    if name_pattern.is_none() && needle.is_none() {
        debug!("Neither a name pattern nor a content substring given");
        return Ok(result);
    }

    for entry in WalkDir::new(&query.root)
        .follow_links(false)
        .sort_by_file_name()
    {
        if token.is_cancelled() {
            return Err(FinderError::Cancelled);
        }

        let entry = entry.map_err(|e| FinderError::Traversal {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| query.root.clone()),
            source: e.into(),
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        if entry.path_is_symlink() && !keep_symlink(entry.path(), query.confine_to.as_deref()) {
            continue;
        }

        if let Some(pattern) = &name_pattern {
            let base = entry.file_name().to_string_lossy().to_lowercase();
            if pattern.matches(&base) {
                result.matches.push(SearchMatch::Name {
                    path: entry.into_path(),
                });
                continue;
            }
        }

        if let Some(needle) = needle {
            scan_file(entry.path(), needle, &mut result.matches);
        }
    }

    debug!("Search finished with {} matches", result.len());
    Ok(result)
}

/// Whether a symlink entry is reported like a file.
///
/// Links to directories are dropped. With a `boundary`, so are links that
/// resolve outside it or do not resolve at all.
fn keep_symlink(path: &Path, boundary: Option<&Path>) -> bool {
    if fs::metadata(path).is_ok_and(|m| m.is_dir()) {
        debug!("Skipping directory link {}", path.display());
        return false;
    }

    let Some(boundary) = boundary else {
        return true;
    };
    match fs::canonicalize(path) {
        Ok(target) if target.starts_with(boundary) => true,
        Ok(target) => {
            debug!(
                "Skipping {}: links outside {} to {}",
                path.display(),
                boundary.display(),
                target.display()
            );
            false
        }
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            false
        }
    }
}

/// Append a content match for every line of `path` containing `needle`.
fn scan_file(path: &Path, needle: &str, matches: &mut Vec<SearchMatch>) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return;
        }
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Stopped reading {} at line {}: {}", path.display(), line_number, e);
                break;
            }
        }
        line_number += 1;

        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        if line.contains(needle) {
            matches.push(SearchMatch::Content {
                path: path.to_path_buf(),
                line_number,
                line: line.into_owned(),
            });
        }
    }
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(result: &SearchResult) -> Vec<String> {
        result
            .matches()
            .iter()
            .map(|m| m.path().file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_content_match_reports_line() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("a");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("b.txt"), "TODO fix\n").unwrap();
        fs::write(root.join("readme.md"), "nothing here\n").unwrap();

        let result = search(&SearchQuery::new(&root).with_content("TODO")).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.matches()[0],
            SearchMatch::Content {
                path: root.join("b.txt"),
                line_number: 1,
                line: "TODO fix".to_string(),
            }
        );
        assert_eq!(
            result.to_string(),
            format!("{}:1: TODO fix", root.join("b.txt").display())
        );
    }

    #[test]
    fn test_name_match_glob() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("x");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("main.go"), "package main").unwrap();
        fs::write(root.join("main_test.go"), "package main").unwrap();

        let result = search(&SearchQuery::new(&root).with_name("*_test.go")).unwrap();

        assert_eq!(
            result.matches(),
            &[SearchMatch::Name {
                path: root.join("main_test.go")
            }]
        );
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.MD"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let result = search(&SearchQuery::new(temp_dir.path()).with_name("readme.*")).unwrap();
        assert_eq!(names(&result), vec!["README.MD"]);

        let result = search(&SearchQuery::new(temp_dir.path()).with_name("NOTES.TXT")).unwrap();
        assert_eq!(names(&result), vec!["notes.txt"]);
    }

    #[test]
    fn test_name_match_recurses_and_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(temp_dir.path().join("lib.rs")).unwrap();
        fs::write(nested.join("lib.rs"), "").unwrap();
        fs::write(temp_dir.path().join("main.rs"), "").unwrap();

        let result = search(&SearchQuery::new(temp_dir.path()).with_name("*.rs")).unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.matches().iter().all(|m| m.path().is_file()));
        assert!(
            result
                .matches()
                .iter()
                .any(|m| m.path() == nested.join("lib.rs"))
        );
    }

    #[test]
    fn test_bracket_and_question_mark_patterns() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["a1.txt", "b2.txt", "c3.txt", "ab.txt"] {
            fs::write(temp_dir.path().join(name), "").unwrap();
        }

        let result = search(&SearchQuery::new(temp_dir.path()).with_name("[ab]?.txt")).unwrap();
        assert_eq!(names(&result), vec!["a1.txt", "ab.txt", "b2.txt"]);
    }

    #[test]
    fn test_name_match_short_circuits_content_scan() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "TODO one\nTODO two\n").unwrap();
        fs::write(temp_dir.path().join("main.rs"), "// TODO three\n").unwrap();

        let query = SearchQuery::new(temp_dir.path())
            .with_name("*.txt")
            .with_content("TODO");
        let result = search(&query).unwrap();

        let notes: Vec<_> = result
            .matches()
            .iter()
            .filter(|m| m.path().ends_with("notes.txt"))
            .collect();
        assert_eq!(notes.len(), 1);
        assert!(matches!(notes[0], SearchMatch::Name { .. }));

        assert!(result.matches().iter().any(|m| matches!(
            m,
            SearchMatch::Content { path, line_number: 1, .. } if path.ends_with("main.rs")
        )));
    }

    #[test]
    fn test_file_matching_neither_is_excluded() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("other.md"), "nothing").unwrap();

        let query = SearchQuery::new(temp_dir.path())
            .with_name("*.txt")
            .with_content("TODO");
        assert!(search(&query).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_lines_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("log.txt"),
            "error: a\nok\r\nerror: b\r\nfine\nerror: c",
        )
        .unwrap();

        let result = search(&SearchQuery::new(temp_dir.path()).with_content("error")).unwrap();
        let lines: Vec<_> = result
            .matches()
            .iter()
            .map(|m| match m {
                SearchMatch::Content {
                    line_number, line, ..
                } => (*line_number, line.as_str()),
                _ => panic!("Expected content match"),
            })
            .collect();

        assert_eq!(lines, vec![(1, "error: a"), (3, "error: b"), (5, "error: c")]);
    }

    #[test]
    fn test_content_match_is_case_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "todo lowercase\n").unwrap();

        let result = search(&SearchQuery::new(temp_dir.path()).with_content("TODO")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_binary_content_is_scanned_lossily() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("blob.bin"), b"\xff\xfeneedle\x00\n").unwrap();

        let result = search(&SearchQuery::new(temp_dir.path()).with_content("needle")).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_empty_query_yields_empty_result() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "content").unwrap();

        let query = SearchQuery::new(temp_dir.path())
            .with_name("")
            .with_content("");
        let result = search(&query).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.to_string(), "");
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does_not_exist");

        let err = search(&SearchQuery::new(&missing).with_name("*")).unwrap_err();
        assert!(matches!(err, FinderError::NotFound { path } if path == missing));

        // Even an empty query validates the root
        let err = search(&SearchQuery::new(&missing)).unwrap_err();
        assert!(matches!(err, FinderError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let err = search(&SearchQuery::new(temp_dir.path()).with_name("[abc")).unwrap_err();
        assert!(matches!(err, FinderError::InvalidPattern { .. }));
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "x").unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let err =
            search_cancellable(&SearchQuery::new(temp_dir.path()).with_name("*"), &token)
                .unwrap_err();
        assert!(matches!(err, FinderError::Cancelled));
    }

    #[test]
    fn test_root_may_be_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("single.txt");
        fs::write(&file, "first\nneedle here\n").unwrap();

        let result = search(&SearchQuery::new(&file).with_content("needle")).unwrap();
        assert_eq!(result.to_string(), format!("{}:2: needle here", file.display()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_aborts_search() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("inner.txt"), "x").unwrap();
        fs::write(temp_dir.path().join("outer.txt"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; nothing to assert in that case.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = search(&SearchQuery::new(temp_dir.path()).with_name("*.txt"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(FinderError::Traversal { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let secret = temp_dir.path().join("secret.txt");
        fs::write(&secret, "needle").unwrap();
        fs::write(temp_dir.path().join("public.txt"), "needle").unwrap();
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

        let readable = File::open(&secret).is_ok();
        let result = search(&SearchQuery::new(temp_dir.path()).with_content("needle"));
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

        let result = result.unwrap();
        let expected = if readable { 2 } else { 1 };
        assert_eq!(result.len(), expected);
        assert!(result.matches().iter().any(|m| m.path().ends_with("public.txt")));
    }

    /// A root holding `link.txt -> <outside>/secret.txt`, `linkdir -> <outside>`
    /// and `inner.txt -> local.txt`.
    #[cfg(unix)]
    fn linked_tree() -> (TempDir, TempDir, PathBuf) {
        use std::os::unix::fs::symlink;

        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "SECRET=hunter2\n").unwrap();
        fs::write(root.path().join("local.txt"), "SECRET=local\n").unwrap();
        symlink(outside.path().join("secret.txt"), root.path().join("link.txt")).unwrap();
        symlink(outside.path(), root.path().join("linkdir")).unwrap();
        symlink(root.path().join("local.txt"), root.path().join("inner.txt")).unwrap();

        let root_path = root.path().canonicalize().unwrap();
        (root, outside, root_path)
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_reported() {
        let (_root, _outside, root) = linked_tree();

        let result = search(&SearchQuery::new(&root).with_name("link*")).unwrap();
        assert_eq!(names(&result), vec!["link.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_links_are_followed_without_boundary() {
        let (_root, _outside, root) = linked_tree();

        let result = search(&SearchQuery::new(&root).with_content("SECRET")).unwrap();
        assert_eq!(names(&result), vec!["inner.txt", "link.txt", "local.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_boundary_drops_escaping_links() {
        let (_root, _outside, root) = linked_tree();

        let query = SearchQuery::new(&root)
            .with_content("SECRET")
            .confined_to(Some(root.clone()));
        let result = search(&query).unwrap();
        assert_eq!(names(&result), vec!["inner.txt", "local.txt"]);
        assert!(!result.to_string().contains("hunter2"));

        let query = SearchQuery::new(&root)
            .with_name("*.txt")
            .confined_to(Some(root.clone()));
        let result = search(&query).unwrap();
        assert_eq!(names(&result), vec!["inner.txt", "local.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_boundary_drops_dangling_links() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        symlink(root.join("gone.txt"), root.join("dangling.txt")).unwrap();

        let unconfined = search(&SearchQuery::new(&root).with_name("*.txt")).unwrap();
        assert_eq!(names(&unconfined), vec!["dangling.txt"]);

        let query = SearchQuery::new(&root)
            .with_name("*.txt")
            .confined_to(Some(root.clone()));
        assert!(search(&query).unwrap().is_empty());
    }
}
