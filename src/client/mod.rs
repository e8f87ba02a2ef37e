//! Salesforce REST API client
//!
//! Async client for the `query` and `sobjects` resources, built on reqwest.
//! Authenticates with an already-issued OAuth access token; obtaining or
//! refreshing that token is the caller's business.

pub mod error;
pub mod query;
pub mod types;
pub(crate) mod wire;

mod sobjects;


use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Url};
use serde_json::Value;

pub use error::Error;
pub use query::{Order, SoqlQuery, SoqlQueryBuilder, SoqlValue};
pub use reqwest::Method;
pub use types::*;

/// Default Salesforce REST API version.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent sent when none is configured.
pub const USER_AGENT: &str = concat!("sftable/", env!("CARGO_PKG_VERSION"));

// ── Auth ────────────────────────────────────────────────────────────────────

/// Bearer credentials for the REST API.
struct Auth {
    token: String,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Async client for one Salesforce org.
#[derive(Debug)]
pub struct SalesforceClient {
    http: reqwest::Client,
    instance_url: Url,
    api_version: String,
    auth: Auth,
}

impl SalesforceClient {
    /// Create a client for `instance_url` (e.g. `https://acme.my.salesforce.com`).
    pub fn new(instance_url: &str, access_token: impl Into<String>) -> Result<Self, Error> {
        Self::with_user_agent(instance_url, access_token, USER_AGENT)
    }

    /// Create a client with a custom user agent.
    pub fn with_user_agent(
        instance_url: &str,
        access_token: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self, Error> {
        let instance_url = Url::parse(instance_url.trim_end_matches('/'))
            .map_err(|e| Error::InvalidUrl(format!("{instance_url}: {e}")))?;
        if instance_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(instance_url.to_string()));
        }

        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            http,
            instance_url,
            api_version: DEFAULT_API_VERSION.to_string(),
            auth: Auth {
                token: access_token.into(),
            },
        })
    }

    /// Use a specific API version. Accepts `62.0` or `v62.0`.
    ///
    /// Returns `self` for builder-style chaining.
    pub fn with_api_version(mut self, version: &str) -> Self {
        self.api_version = version.trim_start_matches('v').to_string();
        self
    }

    pub fn instance_url(&self) -> &Url {
        &self.instance_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    // ── HTTP helpers ────────────────────────────────────────────────────

    /// Build `<instance>/services/data/v<version>/<segments..>`, percent-encoding
    /// each segment.
    pub(crate) fn endpoint<I, S>(&self, segments: I) -> Result<Url, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.instance_url.clone();
        {
            let version = format!("v{}", self.api_version);
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidUrl(self.instance_url.to_string()))?;
            path.pop_if_empty()
                .extend(["services", "data", version.as_str()])
                .extend(segments);
        }
        Ok(url)
    }

    /// Resolve a server-relative path such as a `nextRecordsUrl`.
    pub(crate) fn resolve(&self, path: &str) -> Result<Url, Error> {
        self.instance_url
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))
    }

    /// Start an authenticated request.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "Salesforce request");
        self.http
            .request(method, url)
            .bearer_auth(&self.auth.token)
            .header(ACCEPT, "application/json")
    }

    /// Send a request and check the response status.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = request.send().await?;
        Self::check_status(resp).await
    }

    /// Turn non-success HTTP statuses into [`Error::Api`] carrying the raw body.
    pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %message, "Salesforce error response");
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Read a JSON body that may legitimately be empty (204 No Content).
    pub(crate) async fn optional_json(resp: reqwest::Response) -> Result<Option<Value>, Error> {
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}
