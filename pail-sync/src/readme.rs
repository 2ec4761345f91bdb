//! README package-list region replacement.
//!
//! The README carries a delimited region between two literal markers; only
//! that region is ever rewritten. The pipeline's obligation ends at
//! producing the sorted, de-duplicated package-name list — everything
//! outside the markers is untouched.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use pail_core::AppName;

use crate::error::{io_err, SyncError};

/// Literal marker opening the package-list region.
pub const APP_LIST_START: &str = "{APP_LIST_START_PLACEHOLDER}";

/// Literal marker closing the package-list region.
pub const APP_LIST_END: &str = "{APP_LIST_END_PLACEHOLDER}";

/// Line rendered when the bucket tracks no packages.
const EMPTY_LIST_LINE: &str = "No applications have been added to this bucket yet.\n";

/// What happened to the README during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ReadmeOutcome {
    /// Region rewritten with a changed package list.
    Updated,
    /// Region already current; no write.
    Unchanged,
    /// Dry-run mode: the region *would* have been rewritten.
    WouldUpdate,
    /// One or both markers absent (or out of order); README untouched.
    MarkersMissing,
    /// README file does not exist; nothing written.
    Missing,
    /// Read or write failure, recorded but non-fatal for the run.
    Failed { error: String },
}

/// Sorted, de-duplicated package names.
pub fn app_list(names: impl IntoIterator<Item = AppName>) -> Vec<AppName> {
    names.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Markdown bullet list for the region body.
pub fn render_app_list(names: &[AppName]) -> String {
    if names.is_empty() {
        return EMPTY_LIST_LINE.to_owned();
    }
    let mut rendered = String::new();
    for name in names {
        rendered.push_str(&format!("- `{name}`\n"));
    }
    rendered
}

/// Substitute the package list into the delimited region of `content`.
///
/// Returns `None` when the markers are absent or out of order. The returned
/// string may equal the input when the region is already current.
pub fn replace_app_region(content: &str, names: &[AppName]) -> Option<String> {
    let start = content.find(APP_LIST_START)?;
    let end = content.find(APP_LIST_END)?;
    if end <= start {
        return None;
    }

    let mut before = content[..start + APP_LIST_START.len()].to_owned();
    if !before.ends_with('\n') {
        before.push('\n');
    }
    let mut middle = render_app_list(names);
    if !middle.ends_with('\n') {
        middle.push('\n');
    }
    let after = &content[end..];

    Some(format!("{before}{middle}{after}"))
}

/// Rewrite the README's package-list region in place, idempotently.
pub fn update_readme(
    path: &Path,
    names: &[AppName],
    dry_run: bool,
) -> Result<ReadmeOutcome, SyncError> {
    if !path.exists() {
        tracing::warn!("README not found at {}; package list not written", path.display());
        return Ok(ReadmeOutcome::Missing);
    }
    let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;

    let Some(updated) = replace_app_region(&content, names) else {
        tracing::warn!(
            "markers {APP_LIST_START} / {APP_LIST_END} not found in {}; package list not written",
            path.display()
        );
        return Ok(ReadmeOutcome::MarkersMissing);
    };
    if updated == content {
        return Ok(ReadmeOutcome::Unchanged);
    }
    if dry_run {
        tracing::info!("[dry-run] would update package list in {}", path.display());
        return Ok(ReadmeOutcome::WouldUpdate);
    }
    std::fs::write(path, &updated).map_err(|e| io_err(path, e))?;
    tracing::info!("updated package list in {}", path.display());
    Ok(ReadmeOutcome::Updated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(values: &[&str]) -> Vec<AppName> {
        values.iter().map(|v| AppName::from(*v)).collect()
    }

    fn readme_with_region(body: &str) -> String {
        format!("# My bucket\n\nPackages:\n\n{APP_LIST_START}\n{body}{APP_LIST_END}\n\ntail text\n")
    }

    #[test]
    fn app_list_sorts_and_dedupes() {
        let list = app_list(names(&["zeta", "alpha", "zeta", "mid"]));
        assert_eq!(list, names(&["alpha", "mid", "zeta"]));
    }

    #[test]
    fn renders_bullet_lines_or_empty_notice() {
        assert_eq!(
            render_app_list(&names(&["a", "b"])),
            "- `a`\n- `b`\n"
        );
        assert_eq!(render_app_list(&[]), EMPTY_LIST_LINE);
    }

    #[test]
    fn replaces_only_the_delimited_region() {
        let content = readme_with_region("stale line\n");
        let updated = replace_app_region(&content, &names(&["rg", "fd"])).unwrap();
        assert_eq!(updated, readme_with_region("- `rg`\n- `fd`\n"));
    }

    #[test]
    fn missing_or_misordered_markers_yield_none() {
        assert!(replace_app_region("no markers here", &[]).is_none());
        let backwards = format!("{APP_LIST_END}\nx\n{APP_LIST_START}");
        assert!(replace_app_region(&backwards, &[]).is_none());
    }

    #[test]
    fn substitution_is_idempotent() {
        let content = readme_with_region("old\n");
        let list = names(&["app"]);
        let once = replace_app_region(&content, &list).unwrap();
        let twice = replace_app_region(&once, &list).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn update_reports_unchanged_when_region_is_current() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        std::fs::write(&path, readme_with_region("- `app`\n")).unwrap();

        let outcome = update_readme(&path, &names(&["app"]), false).unwrap();
        assert_eq!(outcome, ReadmeOutcome::Unchanged);
    }

    #[test]
    fn update_rewrites_stale_region() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        std::fs::write(&path, readme_with_region("stale\n")).unwrap();

        let outcome = update_readme(&path, &names(&["app"]), false).unwrap();
        assert_eq!(outcome, ReadmeOutcome::Updated);
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, readme_with_region("- `app`\n"));
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        let original = readme_with_region("stale\n");
        std::fs::write(&path, &original).unwrap();

        let outcome = update_readme(&path, &names(&["app"]), true).unwrap();
        assert_eq!(outcome, ReadmeOutcome::WouldUpdate);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn missing_readme_is_reported_not_created() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        let outcome = update_readme(&path, &[], false).unwrap();
        assert_eq!(outcome, ReadmeOutcome::Missing);
        assert!(!path.exists());
    }
}
