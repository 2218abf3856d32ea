//! Output formatting for fetched showcases.

use std::fmt::Write as _;

use serde::Serialize;

use repo_showcase::{profile_link, AcquisitionView, OwnerHandle, ProjectSummary};

/// JSON shape printed by `fetch --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ShowcaseReport<'a> {
    pub handle: &'a str,
    pub projects: &'a [ProjectSummary],
    pub loading: bool,
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
    /// Last successful list for this handle, kept while a refresh is
    /// loading or after it failed.
    pub previous: &'a [ProjectSummary],
    /// Link to the handle's full repository list.
    pub profile: Option<String>,
}

impl<'a> ShowcaseReport<'a> {
    pub fn new(handle: &'a OwnerHandle, view: &'a AcquisitionView) -> Self {
        Self {
            handle: handle.as_str(),
            projects: &view.projects,
            loading: view.loading,
            error: view.error.as_deref(),
            notice: view.notice.as_deref(),
            previous: &view.previous,
            profile: profile_link(handle).ok(),
        }
    }
}

pub fn render_json(handle: &OwnerHandle, view: &AcquisitionView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ShowcaseReport::new(handle, view))
}

/// Human-readable listing.
pub fn render_text(handle: &OwnerHandle, view: &AcquisitionView) -> String {
    let mut out = String::new();

    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
        return out;
    }

    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "Note: {notice}");
        let _ = writeln!(out);
    }

    if view.projects.is_empty() {
        let _ = writeln!(out, "No repositories to show for {handle}.");
    } else {
        let _ = writeln!(out, "{} projects for {handle}:", view.projects.len());
        let _ = writeln!(out);
        for project in &view.projects {
            let _ = writeln!(out, "  {}", project.title);
            let _ = writeln!(out, "    {}", project.description);
            let _ = writeln!(out, "    {}", project.link);
            if !project.tags.is_empty() {
                let _ = writeln!(out, "    [{}]", project.tags.join(", "));
            }
            let _ = writeln!(out);
        }
    }

    if let Ok(link) = profile_link(handle) {
        let _ = writeln!(out, "View more: {link}");
    }
    out
}
