// GitHub API HTTP client.
// Handles authentication, rate limit tracking, and response classification.

use std::sync::{Mutex, PoisonError};

use reqwest::{
    Client, Response, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{DlightError, Result};

use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with optional authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    api_base: Url,
    per_page: u32,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a new GitHub client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| DlightError::Config(format!("invalid token: {}", e)))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("dlight/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let api_base = Url::parse(&config.api_base)
            .map_err(|e| DlightError::Config(format!("invalid API base: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(DlightError::Config(format!(
                "API base cannot carry a path: {}",
                config.api_base
            )));
        }

        Ok(Self {
            client,
            api_base,
            per_page: config.per_page,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Get the most recently observed rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        *self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Page size sent with list requests.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Build an endpoint URL from raw path segments. Segments are percent-encoded.
    pub fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        segments: &[&str],
        params: &T,
    ) -> Result<Response> {
        let url = self.endpoint_url(segments);
        debug!(%url, "GET");

        let response = self.client.get(url).query(params).send().await?;

        let rate_limit = self.update_rate_limit(&response);
        self.check_response(response, &rate_limit).await
    }

    /// GET an endpoint and decode its JSON body.
    pub async fn get_json<T, P>(&self, segments: &[&str], params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        let response = self.get_with_params(segments, params).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DlightError::Malformed(e.to_string()))
    }

    /// Update rate limit from response headers. Returns the merged value.
    fn update_rate_limit(&self, response: &Response) -> RateLimit {
        let mut current = self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner);
        merge_rate_limit(&mut current, response.headers());
        *current
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response, rate_limit: &RateLimit) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        let err = status_error(status, url.path(), rate_limit, body);
        warn!(%url, %status, error = %err, "GitHub request failed");
        Err(err)
    }
}

/// Copy any rate limit headers present into `rate_limit`.
pub(crate) fn merge_rate_limit(rate_limit: &mut RateLimit, headers: &HeaderMap) {
    let header = |name: &str| -> Option<u64> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    };

    if let Some(limit) = header("x-ratelimit-limit") {
        rate_limit.limit = limit;
    }
    if let Some(remaining) = header("x-ratelimit-remaining") {
        rate_limit.remaining = remaining;
    }
    if let Some(reset) = header("x-ratelimit-reset") {
        rate_limit.reset = reset;
    }
}

/// Map a non-success status to an error.
pub(crate) fn status_error(
    status: StatusCode,
    path: &str,
    rate_limit: &RateLimit,
    body: String,
) -> DlightError {
    match status {
        StatusCode::NOT_FOUND => DlightError::NotFound(not_found_subject(path)),
        StatusCode::UNAUTHORIZED => DlightError::Unauthorized,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            if rate_limit.limit > 0 && rate_limit.remaining == 0 =>
        {
            let reset_at = chrono::DateTime::from_timestamp(rate_limit.reset as i64, 0)
                .map(|dt| dt.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            DlightError::RateLimited { reset_at }
        }
        StatusCode::TOO_MANY_REQUESTS => DlightError::RateLimited {
            reset_at: "unknown".to_string(),
        },
        status => DlightError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

/// The user a `/users/{login}/...` path refers to, or the path itself.
fn not_found_subject(path: &str) -> String {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("users"), Some(login)) if !login.is_empty() => format!("user {}", login),
        _ => path.to_string(),
    }
}
