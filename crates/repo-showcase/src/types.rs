//! Core data types for showcase acquisition.

use serde::{Deserialize, Serialize};

/// Placeholder used whenever upstream omits a repository description.
pub const NO_DESCRIPTION: &str = "No description provided";

/// Maximum number of tags kept on a [`ProjectSummary`].
pub const MAX_TAGS: usize = 5;

/// The account whose projects are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerHandle(String);

impl OwnerHandle {
    /// Parse a raw handle. Empty or whitespace-only input means "no handle".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical project record handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub title: String,
    pub description: String,
    pub link: String,
    pub tags: Vec<String>,
}

/// Which upstream produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Pinned items via the token-authenticated GraphQL API.
    Pinned,
    /// Most-starred owned repositories via the public REST API.
    PublicListing,
}

/// Lifecycle of one acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum AcquisitionState {
    #[default]
    Idle,
    Loading,
    Ready(Vec<ProjectSummary>),
    Failed(String),
}

impl AcquisitionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True once a run has concluded (`Ready` or `Failed`) or nothing is bound.
    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    pub fn projects(&self) -> &[ProjectSummary] {
        match self {
            Self::Ready(projects) => projects,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Read-only projection of an [`AcquisitionState`] for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcquisitionView {
    /// Projects of the current `Ready` state; empty otherwise.
    pub projects: Vec<ProjectSummary>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set when the data came from the public listing after the pinned
    /// query failed.
    pub notice: Option<String>,
    /// Last `Ready` list for the current binding, kept across a refresh
    /// so a failed refresh can still show data.
    pub previous: Vec<ProjectSummary>,
}
