//! Blocking page fetch (static HTML only, no JavaScript execution)

use std::time::Duration;

use crate::document::HtmlDocument;
use crate::error::{InferError, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("schema_infer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Check that `url` is an absolute http(s) URL
pub fn validate_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url)
        .map_err(|e| InferError::DocumentUnavailable(format!("invalid URL {}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(InferError::DocumentUnavailable(format!(
            "unsupported scheme `{}` in {}",
            scheme, url
        ))),
    }
}

/// Fetch `url` with ureq and parse the body. No retries.
pub fn fetch_document_blocking(url: &str, options: &FetchOptions) -> Result<HtmlDocument> {
    let parsed = validate_url(url)?;

    let agent = ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(options.timeout_secs)))
            .user_agent(options.user_agent.as_str())
            .http_status_as_error(false)
            .build(),
    );

    let body = match agent.get(parsed.as_str()).call() {
        Ok(resp) => {
            if resp.status().is_success() {
                resp.into_body().read_to_string().map_err(|e| {
                    InferError::DocumentUnavailable(format!("failed to read {}: {}", url, e))
                })?
            } else {
                return Err(InferError::DocumentUnavailable(format!(
                    "HTTP {} for {}",
                    resp.status(),
                    url
                )));
            }
        }
        Err(e) => {
            return Err(InferError::DocumentUnavailable(format!(
                "failed to fetch {}: {}",
                url, e
            )));
        }
    };

    Ok(HtmlDocument::parse(parsed.as_str(), &body))
}
