//! Upstream request descriptors.
//!
//! Builds the pinned-items GraphQL query and the public repository
//! listing request for a handle. Nothing here touches the network.

use serde::Serialize;
use url::Url;

use crate::config::ShowcaseConfig;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::transport::{HttpMethod, HttpRequest};
use crate::types::OwnerHandle;

/// Languages requested per pinned repository.
const LANGUAGES_PER_ITEM: u32 = 5;
/// Topics requested per pinned repository.
const TOPICS_PER_ITEM: u32 = 10;

const GITHUB_WEB: &str = "https://github.com";

/// JSON body of a GraphQL POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQlBody {
    pub query: String,
}

/// Token-authenticated pinned items query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivilegedRequest {
    pub endpoint: String,
    pub body: GraphQlBody,
}

impl PrivilegedRequest {
    pub fn to_http(&self, token: &str, user_agent: &str) -> HttpRequest {
        let body = serde_json::json!({ "query": self.body.query }).to_string();
        HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), format!("Bearer {token}")),
                ("User-Agent".to_string(), user_agent.to_string()),
            ],
            body: Some(body),
        }
    }
}

/// Public listing of the handle's most-starred owned repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicRequest {
    pub url: String,
}

impl PublicRequest {
    pub fn to_http(&self, user_agent: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url.clone(),
            headers: vec![
                (
                    "Accept".to_string(),
                    "application/vnd.github+json".to_string(),
                ),
                ("User-Agent".to_string(), user_agent.to_string()),
            ],
            body: None,
        }
    }
}

/// Both descriptors for one handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRequests {
    pub privileged: PrivilegedRequest,
    pub public: PublicRequest,
}

/// Build the privileged and public descriptors for `handle`.
pub fn build_requests(
    handle: &OwnerHandle,
    config: &ShowcaseConfig,
) -> ShowcaseResult<SourceRequests> {
    Ok(SourceRequests {
        privileged: PrivilegedRequest {
            endpoint: config.graphql_endpoint.clone(),
            body: GraphQlBody {
                query: pinned_items_query(handle, config.pinned_limit),
            },
        },
        public: PublicRequest {
            url: public_listing_url(handle, config)?,
        },
    })
}

/// GraphQL document requesting the handle's pinned repositories.
pub fn pinned_items_query(handle: &OwnerHandle, limit: u32) -> String {
    let login = graphql_string_literal(handle.as_str());
    format!(
        r#"query {{
  user(login: {login}) {{
    pinnedItems(first: {limit}, types: REPOSITORY) {{
      nodes {{
        ... on Repository {{
          name
          description
          url
          homepageUrl
          primaryLanguage {{
            name
          }}
          languages(first: {LANGUAGES_PER_ITEM}) {{
            nodes {{
              name
            }}
          }}
          repositoryTopics(first: {TOPICS_PER_ITEM}) {{
            nodes {{
              topic {{
                name
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}"#
    )
}

/// `{api_base}/users/{handle}/repos?sort=stars&direction=desc&per_page=N&type=owner`
pub fn public_listing_url(handle: &OwnerHandle, config: &ShowcaseConfig) -> ShowcaseResult<String> {
    let mut url = Url::parse(&config.api_base)
        .map_err(|e| ShowcaseError::Config(format!("invalid API base '{}': {e}", config.api_base)))?;

    url.path_segments_mut()
        .map_err(|_| {
            ShowcaseError::Config(format!("API base '{}' cannot carry a path", config.api_base))
        })?
        .pop_if_empty()
        .extend(["users", handle.as_str(), "repos"]);

    url.query_pairs_mut()
        .append_pair("sort", "stars")
        .append_pair("direction", "desc")
        .append_pair("per_page", &config.listing_limit.to_string())
        .append_pair("type", "owner");

    Ok(url.into())
}

/// Web link to the handle's full repository list.
pub fn profile_link(handle: &OwnerHandle) -> ShowcaseResult<String> {
    let mut url = Url::parse(GITHUB_WEB)
        .map_err(|e| ShowcaseError::Config(format!("invalid profile base: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ShowcaseError::Config("profile base cannot carry a path".to_string()))?
        .pop_if_empty()
        .push(handle.as_str());
    url.set_query(Some("tab=repositories"));
    Ok(url.into())
}

fn graphql_string_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
