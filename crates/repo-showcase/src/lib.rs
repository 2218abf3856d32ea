//! repo-showcase: acquire a short list of showcase repositories from GitHub.
//!
//! Pinned items come from the GraphQL API when a token is configured; the
//! public REST listing (most-starred owned repositories) is used otherwise,
//! or once as a fallback when the pinned query fails.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod normalize;
pub mod query;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::ShowcaseConfig;
pub use coordinator::{Acquisition, FallbackCoordinator, RunOutcome};
pub use error::{ShowcaseError, ShowcaseResult};
pub use normalize::{decode_privileged, decode_public, normalize, UpstreamPayload};
pub use query::{build_requests, profile_link, SourceRequests};
pub use store::AcquisitionStore;
pub use transport::{HttpClient, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::*;
