//! In-memory transport for unit tests.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use crate::error::{ShowcaseError, ShowcaseResult};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};

struct Route {
    method: HttpMethod,
    url_fragment: String,
    reply: ShowcaseResult<(u16, String)>,
    gate: Option<Arc<Notify>>,
    once: bool,
}

/// Answers requests from a script of routes, first match wins.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, url_fragment: &str, status: u16, body: String) {
        self.push(method, url_fragment, Ok((status, body)), None, false);
    }

    /// Single-use route; later matching requests fall through to the next route.
    pub fn respond_once(&self, method: HttpMethod, url_fragment: &str, status: u16, body: String) {
        self.push(method, url_fragment, Ok((status, body)), None, true);
    }

    pub fn fail(&self, method: HttpMethod, url_fragment: &str, error: ShowcaseError) {
        self.push(method, url_fragment, Err(error), None, false);
    }

    /// Single-use route whose reply is held until the returned gate is
    /// notified.
    pub fn respond_gated(
        &self,
        method: HttpMethod,
        url_fragment: &str,
        status: u16,
        body: String,
    ) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(method, url_fragment, Ok((status, body)), Some(gate.clone()), true);
        gate
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(
        &self,
        method: HttpMethod,
        url_fragment: &str,
        reply: ShowcaseResult<(u16, String)>,
        gate: Option<Arc<Notify>>,
        once: bool,
    ) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Route {
                method,
                url_fragment: url_fragment.to_string(),
                reply,
                gate,
                once,
            });
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> ShowcaseResult<HttpResponse> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let (reply, gate) = {
            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            let matched = routes
                .iter()
                .position(|r| r.method == request.method && request.url.contains(&r.url_fragment));
            match matched {
                Some(i) if routes[i].once => {
                    let route = routes.remove(i);
                    (route.reply, route.gate)
                }
                Some(i) => (routes[i].reply.clone(), routes[i].gate.clone()),
                None => (Ok((404, String::new())), None),
            }
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let (status, body) = reply?;
        Ok(HttpResponse {
            url: request.url.clone(),
            status,
            body,
        })
    }
}

/// GraphQL body with a single pinned repository.
pub fn pinned_body(name: &str) -> String {
    json!({
        "data": { "user": { "pinnedItems": { "nodes": [{
            "name": name,
            "description": "pinned",
            "url": format!("https://github.com/octocat/{name}"),
            "homepageUrl": null,
            "languages": { "nodes": [{ "name": "Rust" }] },
            "repositoryTopics": { "nodes": [] }
        }] } } }
    })
    .to_string()
}

/// REST listing body with a single Go repository lacking a description.
pub fn public_body(name: &str) -> String {
    json!([{
        "name": name,
        "description": null,
        "html_url": format!("https://github.com/octocat/{name}"),
        "homepage": null,
        "language": "Go",
        "topics": []
    }])
    .to_string()
}
