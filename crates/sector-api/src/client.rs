// MyPages HTTP client
//
// Wraps `reqwest::Client` with URL construction, cookie plumbing, and the
// failure classification shared by every authenticated call. Endpoint
// groups (panel, locks) are implemented as inherent methods via separate
// files to keep this module focused on transport mechanics.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{self, HeaderMap};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Version token embedded in the login page, e.g. `v1_1_68`.
static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v\d+_\d+_\d+").expect("version token pattern"));

/// Short-lived pre-authentication token from the login page fetch.
/// Required to submit the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken(String);

impl RequestToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque session token returned on successful login; attached as the
/// `Cookie` header on every authenticated call. The service advertises no
/// expiry -- expiry shows up as [`Error::InvalidSession`] on a later call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie(String);

impl SessionCookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of the unauthenticated login page fetch: the service version
/// and the pre-auth token needed for the login POST.
#[derive(Debug, Clone)]
pub struct ServiceMetadata {
    pub version: String,
    pub cookie: RequestToken,
}

/// Raw HTTP client for the Sector Alarm MyPages service.
///
/// Holds no session state: the pre-auth and session tokens are explicit
/// values handed in by the caller (`sector-core`'s `Site` owns them).
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SessionClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` should be the service root, normally
    /// `https://mypagesapi.sectoralarm.net`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The client must have redirects disabled; see [`TransportConfig`].
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL for a service path (the path may carry a query).
    pub(crate) fn page_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| Error::communication(format!("invalid service URL: {e}")))
    }

    // ── Unauthenticated flow ─────────────────────────────────────────

    /// Fetch the login page and extract the service version and pre-auth
    /// token.
    ///
    /// `GET /User/Login` -- the version is scraped from a script URL in
    /// the body (`vMAJOR_MINOR_PATCH`), the token from the response's
    /// first `Set-Cookie` header.
    pub async fn get_metadata(&self) -> Result<ServiceMetadata, Error> {
        let url = self.page_url("User/Login")?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let cookie = first_cookie(resp.headers())
            .ok_or_else(|| Error::communication("login page set no request cookie"))?;

        let body = resp.text().await?;
        let version = VERSION_TOKEN
            .find(&body)
            .map(|m| m.as_str().to_owned())
            .ok_or_else(|| Error::communication("login page carried no version token"))?;

        debug!(%version, "service metadata fetched");
        Ok(ServiceMetadata {
            version,
            cookie: RequestToken(cookie),
        })
    }

    /// Submit credentials to the login form.
    ///
    /// `POST /User/Login?ReturnUrl=%2f` with the pre-auth token as the
    /// request cookie. The service signals success with a redirect carrying
    /// a fresh session cookie; any answered non-redirect means the
    /// credentials were rejected.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
        token: &RequestToken,
    ) -> Result<SessionCookie, Error> {
        let url = self.page_url("User/Login?ReturnUrl=%2f")?;
        debug!("POST {url}");

        let form = [("userID", email), ("password", password.expose_secret())];
        let resp = self
            .http
            .post(url)
            .header(header::COOKIE, token.as_str())
            .form(&form)
            .send()
            .await?;

        if resp.status().is_redirection() {
            if let Some(cookie) = first_cookie(resp.headers()) {
                debug!("login successful");
                return Ok(SessionCookie(cookie));
            }
        }

        Err(Error::InvalidCredentials)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and parse the JSON body.
    pub(crate) async fn authed_get(
        &self,
        url: Url,
        session: &SessionCookie,
    ) -> Result<Value, Error> {
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(header::COOKIE, session.as_str())
            .send()
            .await?;

        self.parse_json(resp).await
    }

    /// Send an authenticated POST with a JSON body and parse the JSON
    /// response body.
    pub(crate) async fn authed_post(
        &self,
        url: Url,
        session: &SessionCookie,
        body: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(header::COOKIE, session.as_str())
            .json(body)
            .send()
            .await?;

        self.parse_json(resp).await
    }

    /// Classify the response status, then parse the body as JSON.
    ///
    /// A 401 means the session cookie was rejected outright; a redirect is
    /// the service bouncing an expired session back to the login page.
    /// Both surface as [`Error::InvalidSession`].
    async fn parse_json(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status.is_redirection() {
            return Err(Error::InvalidSession);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::communication(format!(
                "HTTP {status}: {}",
                preview(&body)
            )));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            Error::communication(format!(
                "unexpected response body: {e} (preview: {:?})",
                preview(&body)
            ))
        })
    }
}

/// Truncate a body for diagnostics without splitting a multi-byte
/// character.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Extract the first `Set-Cookie` value, attribute suffix stripped,
/// leaving the bare `name=value` pair to send back later.
fn first_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .next()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_owned())
}
