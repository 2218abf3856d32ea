//! Acquisition configuration, injected at construction.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("repo-showcase/", env!("CARGO_PKG_VERSION"));

/// Number of items requested from either upstream.
pub const DEFAULT_LIMIT: u32 = 6;

/// Settings shared read-only by every acquisition run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    /// Privileged-access token. Presence alone selects the pinned query.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub graphql_endpoint: String,
    pub api_base: String,
    pub user_agent: String,
    /// Per-request timeout. `None` leaves it to the transport defaults.
    pub timeout_ms: Option<u64>,
    pub pinned_limit: u32,
    pub listing_limit: u32,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            token: None,
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: None,
            pinned_limit: DEFAULT_LIMIT,
            listing_limit: DEFAULT_LIMIT,
        }
    }
}

impl ShowcaseConfig {
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_graphql_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graphql_endpoint = endpoint.into();
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The token, if one is configured and non-empty.
    pub fn credential(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_github() {
        let config = ShowcaseConfig::default();
        assert_eq!(config.graphql_endpoint, "https://api.github.com/graphql");
        assert_eq!(config.api_base, "https://api.github.com");
        assert_eq!(config.listing_limit, 6);
        assert!(config.timeout_ms.is_none());
        assert!(!config.has_credential());
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let config = ShowcaseConfig::default().with_token(Some(String::new()));
        assert!(!config.has_credential());
        let config = ShowcaseConfig::default().with_token(Some("ghp_x".into()));
        assert_eq!(config.credential(), Some("ghp_x"));
    }

    #[test]
    fn test_token_never_serialized() {
        let config = ShowcaseConfig::default().with_token(Some("secret".into()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
