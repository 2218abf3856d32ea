//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit flag, then environment, then the
//! library default.

use repo_showcase::ShowcaseConfig;

pub const TOKEN_ENV: &str = "SHOWCASE_GITHUB_TOKEN";
pub const FALLBACK_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const API_BASE_ENV: &str = "SHOWCASE_API_BASE";
pub const GRAPHQL_URL_ENV: &str = "SHOWCASE_GRAPHQL_URL";

/// Values taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub api_base: Option<String>,
    pub graphql_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Build the library config from flags and the process environment.
pub fn build_config(overrides: &Overrides) -> ShowcaseConfig {
    build_config_with(overrides, |key| std::env::var(key).ok())
}

/// Same as [`build_config`] with an explicit environment lookup.
pub fn build_config_with<F>(overrides: &Overrides, env: F) -> ShowcaseConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ShowcaseConfig::default()
        .with_token(resolve_token(overrides.token.as_deref(), &env))
        .with_timeout_ms(overrides.timeout_ms);

    if let Some(base) = resolve_setting(overrides.api_base.as_deref(), API_BASE_ENV, &env) {
        config = config.with_api_base(base);
    }
    if let Some(url) = resolve_setting(overrides.graphql_url.as_deref(), GRAPHQL_URL_ENV, &env) {
        config = config.with_graphql_endpoint(url);
    }
    config
}

/// Resolve the GitHub token.
pub fn resolve_token<F>(explicit: Option<&str>, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = non_blank(explicit) {
        return Some(token);
    }

    if let Some(token) = non_blank(env(TOKEN_ENV).as_deref()) {
        return Some(token);
    }

    non_blank(env(FALLBACK_TOKEN_ENV).as_deref())
}

fn resolve_setting<F>(explicit: Option<&str>, key: &str, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(explicit).or_else(|| non_blank(env(key).as_deref()))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
