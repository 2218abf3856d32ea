//! Source selection and the single privileged → public fallback hop.

use std::sync::Arc;

use serde::Serialize;

use crate::config::ShowcaseConfig;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::normalize::{decode_privileged, decode_public, normalize, UpstreamPayload};
use crate::query::{build_requests, PrivilegedRequest, PublicRequest};
use crate::transport::{HttpClient, Transport};
use crate::types::{AcquisitionState, OwnerHandle, ProjectSummary, Source};

/// Data produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acquisition {
    pub source: Source,
    pub projects: Vec<ProjectSummary>,
    /// Message of the swallowed pinned-query failure, when the data came
    /// from the fallback.
    pub fallback_reason: Option<String>,
}

/// How one run concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No handle was supplied; nothing was fetched.
    Idle,
    Ready(Acquisition),
    Failed(ShowcaseError),
}

impl RunOutcome {
    pub fn into_state(self) -> AcquisitionState {
        match self {
            RunOutcome::Idle => AcquisitionState::Idle,
            RunOutcome::Ready(acq) => AcquisitionState::Ready(acq.projects),
            RunOutcome::Failed(e) => AcquisitionState::Failed(e.to_string()),
        }
    }
}

/// Runs one acquisition: pinned items when a credential is configured,
/// the public listing otherwise or after the pinned query fails.
#[derive(Clone)]
pub struct FallbackCoordinator {
    transport: Arc<dyn Transport>,
    config: Arc<ShowcaseConfig>,
}

impl FallbackCoordinator {
    pub fn new(transport: Arc<dyn Transport>, config: Arc<ShowcaseConfig>) -> Self {
        Self { transport, config }
    }

    /// Coordinator backed by a real HTTP client built from `config`.
    pub fn with_http(config: ShowcaseConfig) -> ShowcaseResult<Self> {
        let client = HttpClient::new(&config.user_agent, config.timeout_ms)?;
        Ok(Self::new(Arc::new(client), Arc::new(config)))
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    /// Run for an optional handle. Never panics and never returns `Loading`.
    pub async fn run(&self, handle: Option<&OwnerHandle>) -> RunOutcome {
        let Some(handle) = handle else {
            tracing::debug!("No handle supplied; staying idle");
            return RunOutcome::Idle;
        };

        match self.acquire(handle).await {
            Ok(acq) => {
                tracing::info!(
                    "Acquired {} projects for {handle} from {:?}",
                    acq.projects.len(),
                    acq.source
                );
                RunOutcome::Ready(acq)
            }
            Err(e) => {
                tracing::error!("Error fetching GitHub repos for {handle}: {e}");
                RunOutcome::Failed(e)
            }
        }
    }

    /// Fetch and normalize projects for `handle`.
    ///
    /// Errors on the pinned path are logged and trigger exactly one public
    /// listing attempt; errors on the public path are returned as-is.
    pub async fn acquire(&self, handle: &OwnerHandle) -> ShowcaseResult<Acquisition> {
        let requests = build_requests(handle, &self.config)?;

        let Some(token) = self.config.credential() else {
            let payload = self.fetch_public(&requests.public).await?;
            return Ok(Acquisition {
                source: Source::PublicListing,
                projects: normalize(&payload),
                fallback_reason: None,
            });
        };

        match self.fetch_pinned(&requests.privileged, token).await {
            Ok(payload) => Ok(Acquisition {
                source: Source::Pinned,
                projects: normalize(&payload),
                fallback_reason: None,
            }),
            Err(pinned_err) => {
                tracing::warn!(
                    "GraphQL fetch failed for {handle}, falling back to REST API: {pinned_err}"
                );
                let payload = self.fetch_public(&requests.public).await?;
                Ok(Acquisition {
                    source: Source::PublicListing,
                    projects: normalize(&payload),
                    fallback_reason: Some(pinned_err.to_string()),
                })
            }
        }
    }

    async fn fetch_pinned(
        &self,
        request: &PrivilegedRequest,
        token: &str,
    ) -> ShowcaseResult<UpstreamPayload> {
        let http = request.to_http(token, &self.config.user_agent);
        tracing::debug!("POST {}", http.url);
        let resp = self.transport.send(&http).await?;
        if !resp.is_success() {
            return Err(ShowcaseError::status(resp.status));
        }
        decode_privileged(&resp.body)
    }

    async fn fetch_public(&self, request: &PublicRequest) -> ShowcaseResult<UpstreamPayload> {
        let http = request.to_http(&self.config.user_agent);
        tracing::debug!("GET {}", http.url);
        let resp = self.transport.send(&http).await?;
        if !resp.is_success() {
            return Err(ShowcaseError::status(resp.status));
        }
        decode_public(&resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pinned_body, public_body, ScriptedTransport};
    use crate::transport::HttpMethod;
    use crate::types::NO_DESCRIPTION;

    fn coordinator(transport: &Arc<ScriptedTransport>, token: Option<&str>) -> FallbackCoordinator {
        let config = ShowcaseConfig::default()
            .with_api_base("http://upstream.test")
            .with_graphql_endpoint("http://upstream.test/graphql")
            .with_token(token.map(str::to_string));
        FallbackCoordinator::new(transport.clone(), Arc::new(config))
    }

    fn octocat() -> OwnerHandle {
        OwnerHandle::parse("octocat").unwrap()
    }

    #[tokio::test]
    async fn test_no_handle_stays_idle() {
        let transport = Arc::new(ScriptedTransport::new());
        let outcome = coordinator(&transport, Some("t")).run(None).await;
        assert_eq!(outcome, RunOutcome::Idle);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_without_credential_only_public_is_called() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, "/users/octocat/repos", 200, public_body("hello-go"));

        let acq = coordinator(&transport, None).acquire(&octocat()).await.unwrap();

        assert_eq!(acq.source, Source::PublicListing);
        assert_eq!(acq.projects[0].description, NO_DESCRIPTION);
        assert_eq!(acq.projects[0].tags, vec!["Go"]);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, HttpMethod::Get);
        assert!(calls[0].header("authorization").is_none());
    }

    #[tokio::test]
    async fn test_credential_prefers_pinned() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Post, "/graphql", 200, pinned_body("pinned-one"));
        transport.respond(HttpMethod::Get, "/users/octocat/repos", 200, public_body("public"));

        let acq = coordinator(&transport, Some("tok")).acquire(&octocat()).await.unwrap();

        assert_eq!(acq.source, Source::Pinned);
        assert_eq!(acq.projects[0].title, "pinned-one");
        assert!(acq.fallback_reason.is_none());
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].header("authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_graphql_errors_fall_back_once() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            HttpMethod::Post,
            "/graphql",
            200,
            r#"{"errors":[{"message":"Bad credentials"}]}"#.to_string(),
        );
        transport.respond(HttpMethod::Get, "/users/octocat/repos", 200, public_body("public"));

        let acq = coordinator(&transport, Some("tok")).acquire(&octocat()).await.unwrap();

        assert_eq!(acq.source, Source::PublicListing);
        assert_eq!(acq.projects[0].title, "public");
        assert_eq!(acq.fallback_reason.as_deref(), Some("Bad credentials"));
        let methods: Vec<HttpMethod> = transport.calls().iter().map(|c| c.method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Get]);
    }

    #[tokio::test]
    async fn test_transport_failure_on_pinned_falls_back() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(
            HttpMethod::Post,
            "/graphql",
            ShowcaseError::Transport("connection refused".into()),
        );
        transport.respond(HttpMethod::Get, "/users/octocat/repos", 200, public_body("public"));

        let outcome = coordinator(&transport, Some("tok")).run(Some(&octocat())).await;

        assert!(matches!(outcome, RunOutcome::Ready(ref a) if a.source == Source::PublicListing));
    }

    #[tokio::test]
    async fn test_public_failure_is_terminal() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Post, "/graphql", 502, String::new());
        transport.respond(HttpMethod::Get, "/users/octocat/repos", 404, "{}".to_string());

        let outcome = coordinator(&transport, Some("tok")).run(Some(&octocat())).await;

        assert_eq!(
            outcome.into_state(),
            AcquisitionState::Failed("GitHub API error: Not Found".to_string())
        );
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_public_payload_fails() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            HttpMethod::Get,
            "/users/octocat/repos",
            200,
            r#"{"message":"weird"}"#.to_string(),
        );

        let err = coordinator(&transport, None).acquire(&octocat()).await.unwrap_err();
        assert!(matches!(err, ShowcaseError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_token_goes_straight_to_public() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(HttpMethod::Get, "/users/octocat/repos", 200, "[]".to_string());

        let acq = coordinator(&transport, Some("")).acquire(&octocat()).await.unwrap();

        assert!(acq.projects.is_empty());
        assert_eq!(transport.calls().len(), 1);
    }
}
