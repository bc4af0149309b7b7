//! HTTP client construction and base URL handling.

use std::time::Duration;

use reqwest::{Client, Url};

use webrepo_core::config::EndpointConfig;
use webrepo_core::error::{ClientError, ErrorKind};
use webrepo_core::result::ClientResult;

/// Build the shared connection-reusing HTTP client from endpoint settings.
///
/// Connection pooling is owned entirely by the returned client; repository
/// instances hold a cheap clone of it and never open or close connections
/// themselves.
pub fn build_http_client(config: &EndpointConfig) -> ClientResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| {
            ClientError::with_source(ErrorKind::Configuration, "failed to build HTTP client", e)
        })
}

/// Parse a base URL and guarantee a trailing slash, so relative paths
/// resolve under the collection root instead of replacing its last
/// segment.
pub fn normalize_base_url(base_url: &str) -> ClientResult<Url> {
    let mut url = Url::parse(base_url).map_err(|e| {
        ClientError::with_source(
            ErrorKind::Configuration,
            format!("invalid base URL '{base_url}'"),
            e,
        )
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::configuration(format!(
            "base URL '{base_url}' cannot serve as a base endpoint"
        )));
    }
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}
