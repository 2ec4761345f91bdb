//! Wire types for the forge's release listing.
//!
//! Field names match the GitHub REST API; unknown response fields are
//! ignored. Releases arrive newest-first and that order is authoritative —
//! nothing in this crate re-sorts them.

use serde::Deserialize;

/// One upstream published release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable artifact attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_github_release_listing() {
        let body = r#"[
            {
                "tag_name": "v1.3.0-rc.1",
                "prerelease": true,
                "draft": false,
                "assets": [
                    {"name": "app-win64.zip", "browser_download_url": "https://example.com/app-win64.zip", "size": 12}
                ]
            },
            {
                "tag_name": "v1.2.0",
                "prerelease": false,
                "assets": []
            }
        ]"#;
        let releases: Vec<Release> = serde_json::from_str(body).unwrap();
        assert_eq!(releases.len(), 2);
        assert!(releases[0].prerelease);
        assert_eq!(releases[0].assets[0].name, "app-win64.zip");
        assert_eq!(releases[1].tag_name, "v1.2.0");
        assert!(releases[1].assets.is_empty());
    }

    #[test]
    fn missing_optional_fields_default() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v1.0.0"}"#).unwrap();
        assert!(!release.prerelease);
        assert!(release.assets.is_empty());
    }
}
