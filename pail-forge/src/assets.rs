//! Keyword-based asset selection.
//!
//! Intentionally plain substring matching, not glob or regex: configuration
//! stays declarative and the matcher deterministic. Forge-provided asset
//! order is authoritative — first match wins.

use crate::types::ReleaseAsset;

/// Pick the first asset whose filename contains every keyword,
/// case-insensitively. An empty keyword set matches the first asset.
pub fn select_asset<'a>(
    assets: &'a [ReleaseAsset],
    keywords: &[String],
) -> Option<&'a ReleaseAsset> {
    assets.iter().find(|asset| {
        let name = asset.name.to_lowercase();
        keywords
            .iter()
            .all(|keyword| name.contains(&keyword.to_lowercase()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_owned(),
            browser_download_url: format!("https://example.com/{name}"),
        }
    }

    #[test]
    fn empty_keywords_match_first_asset() {
        let assets = vec![asset("a.zip"), asset("b.zip")];
        let found = select_asset(&assets, &[]).unwrap();
        assert_eq!(found.name, "a.zip");
    }

    #[test]
    fn all_keywords_must_match_case_insensitively() {
        let assets = vec![asset("app-linux-arm.tar.gz"), asset("app-win64.zip")];
        let found = select_asset(&assets, &["WIN64".to_owned()]).unwrap();
        assert_eq!(found.name, "app-win64.zip");
    }

    #[test]
    fn first_qualifying_asset_wins() {
        let assets = vec![
            asset("tool-1.0-win64-setup.exe"),
            asset("tool-1.0-win64-portable.zip"),
        ];
        let found = select_asset(&assets, &["win64".to_owned()]).unwrap();
        assert_eq!(found.name, "tool-1.0-win64-setup.exe");
    }

    #[test]
    fn no_asset_satisfies_all_keywords() {
        let assets = vec![asset("app-win64.zip"), asset("app-linux-arm.tar.gz")];
        let keywords = vec!["linux".to_owned(), "64bit".to_owned()];
        assert!(select_asset(&assets, &keywords).is_none());
    }

    #[test]
    fn empty_asset_list_matches_nothing() {
        assert!(select_asset(&[], &[]).is_none());
    }
}
