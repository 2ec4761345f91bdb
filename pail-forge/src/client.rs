//! Authenticated-or-not GitHub release listing.
//!
//! The bearer credential is an explicit configuration value threaded in at
//! construction — absence means unauthenticated access (lower rate limits),
//! never an error. `api_base` is configurable so tests can point the client
//! at a loopback stub.

use std::time::Duration;

use pail_core::RepoSlug;

use crate::error::ForgeError;
use crate::types::Release;

/// Production API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Timeout for a release-listing request.
pub const DEFAULT_RELEASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Some asset hosts reject requests without a browser-looking user agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for [`ReleaseClient`].
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Base URL of the forge API, without trailing slash.
    pub api_base: String,
    /// Optional bearer credential for higher rate limits.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            token: None,
            timeout: DEFAULT_RELEASE_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Queries a forge's release list for a repository.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    agent: ureq::Agent,
    config: ForgeConfig,
}

impl ReleaseClient {
    pub fn new(config: ForgeConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }

    /// `{api_base}/repos/{owner}/{name}/releases`
    pub fn releases_url(&self, repo: &RepoSlug) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.config.api_base.trim_end_matches('/'),
            repo.owner,
            repo.name
        )
    }

    /// Fetch all releases for `repo`, newest-first (the forge's native
    /// order, passed through untouched).
    pub fn releases(&self, repo: &RepoSlug) -> Result<Vec<Release>, ForgeError> {
        let url = self.releases_url(repo);
        tracing::debug!("fetching releases from {url}");

        let mut request = self
            .agent
            .get(&url)
            .set("Accept", "application/vnd.github.v3+json")
            .set("User-Agent", &self.config.user_agent);
        if let Some(token) = &self.config.token {
            request = request.set("Authorization", &format!("token {token}"));
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => ForgeError::Status {
                url: url.clone(),
                code,
            },
            other => ForgeError::Transport {
                url: url.clone(),
                source: Box::new(other),
            },
        })?;

        response
            .into_json::<Vec<Release>>()
            .map_err(|e| ForgeError::Body { url, source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_url_joins_base_and_slug() {
        let client = ReleaseClient::new(ForgeConfig {
            api_base: "https://api.github.com/".to_owned(),
            ..ForgeConfig::default()
        });
        let repo: RepoSlug = "acme/tool".parse().unwrap();
        assert_eq!(
            client.releases_url(&repo),
            "https://api.github.com/repos/acme/tool/releases"
        );
    }

    #[test]
    fn default_config_is_unauthenticated() {
        let config = ForgeConfig::default();
        assert!(config.token.is_none());
        assert_eq!(config.timeout, DEFAULT_RELEASE_TIMEOUT);
    }
}
