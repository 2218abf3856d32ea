//! Upstream payload decoding and normalization into [`ProjectSummary`].

use serde::Deserialize;

use crate::error::{ShowcaseError, ShowcaseResult};
use crate::types::{ProjectSummary, MAX_TAGS, NO_DESCRIPTION};

// ── GraphQL (pinned items) ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    #[serde(default)]
    user: Option<PinnedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedUser {
    pinned_items: Connection<PinnedRepository>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct NamedNode {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TopicNode {
    topic: NamedNode,
}

/// One pinned repository as returned by the GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRepository {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub homepage_url: Option<String>,
    #[serde(default, deserialize_with = "connection_names")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "topic_names")]
    pub repository_topics: Vec<String>,
}

fn connection_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let conn: Option<Connection<NamedNode>> = Option::deserialize(deserializer)?;
    Ok(conn
        .map(|c| c.nodes.into_iter().map(|n| n.name).collect())
        .unwrap_or_default())
}

fn topic_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let conn: Option<Connection<TopicNode>> = Option::deserialize(deserializer)?;
    Ok(conn
        .map(|c| c.nodes.into_iter().map(|n| n.topic.name).collect())
        .unwrap_or_default())
}

// ── REST (public listing) ───────────────────────────────────────

/// One repository from the public REST listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicRepository {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub fork: bool,
}

/// A decoded upstream payload, tagged by the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamPayload {
    Privileged(Vec<PinnedRepository>),
    Public(Vec<PublicRepository>),
}

/// Decode a GraphQL response body.
///
/// A non-empty `errors` list wins over any partial `data`.
pub fn decode_privileged(body: &str) -> ShowcaseResult<UpstreamPayload> {
    let envelope: GraphQlEnvelope = serde_json::from_str(body)
        .map_err(|e| ShowcaseError::MalformedResponse(format!("invalid GraphQL response: {e}")))?;

    if let Some(first) = envelope.errors.as_ref().and_then(|errors| errors.first()) {
        let message = first
            .message
            .clone()
            .unwrap_or_else(|| "GraphQL query failed".to_string());
        return Err(ShowcaseError::UpstreamReported(message));
    }

    let user = envelope
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| ShowcaseError::MalformedResponse("GitHub user not found".to_string()))?;

    Ok(UpstreamPayload::Privileged(user.pinned_items.nodes))
}

/// Decode a REST listing body, dropping forks. Anything but an array of
/// repositories is malformed.
pub fn decode_public(body: &str) -> ShowcaseResult<UpstreamPayload> {
    let mut repos: Vec<PublicRepository> = serde_json::from_str(body).map_err(|e| {
        ShowcaseError::MalformedResponse(format!("unexpected repository listing: {e}"))
    })?;
    repos.retain(|r| !r.fork);
    Ok(UpstreamPayload::Public(repos))
}

/// Map a payload into canonical project records.
pub fn normalize(payload: &UpstreamPayload) -> Vec<ProjectSummary> {
    match payload {
        UpstreamPayload::Privileged(repos) => repos.iter().map(from_pinned).collect(),
        UpstreamPayload::Public(repos) => repos.iter().map(from_public).collect(),
    }
}

fn from_pinned(repo: &PinnedRepository) -> ProjectSummary {
    ProjectSummary {
        title: repo.name.clone(),
        description: description_or_placeholder(repo.description.as_deref()),
        link: prefer_homepage(repo.homepage_url.as_deref(), &repo.url),
        tags: collect_tags(
            repo.languages
                .iter()
                .chain(repo.repository_topics.iter())
                .map(String::as_str),
        ),
    }
}

fn from_public(repo: &PublicRepository) -> ProjectSummary {
    let topics = repo.topics.iter().flatten().map(String::as_str);
    ProjectSummary {
        title: repo.name.clone(),
        description: description_or_placeholder(repo.description.as_deref()),
        link: prefer_homepage(repo.homepage.as_deref(), &repo.html_url),
        tags: collect_tags(repo.language.as_deref().into_iter().chain(topics)),
    }
}

fn description_or_placeholder(description: Option<&str>) -> String {
    match description {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => NO_DESCRIPTION.to_string(),
    }
}

fn prefer_homepage(homepage: Option<&str>, repo_url: &str) -> String {
    match homepage {
        Some(h) if !h.is_empty() => h.to_string(),
        _ => repo_url.to_string(),
    }
}

/// First-seen order, no blanks, no duplicates, at most [`MAX_TAGS`].
fn collect_tags<'a>(candidates: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);
    for tag in candidates {
        if tags.len() == MAX_TAGS {
            break;
        }
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags
}
