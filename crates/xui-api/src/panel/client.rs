// Panel API HTTP client
//
// Wraps `reqwest::Client` with panel URL construction, session-cookie
// attachment and envelope unwrapping. Endpoint groups (inbounds, clients,
// traffic) live in sibling files as inherent methods so this module stays
// focused on transport mechanics.

use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{Credentials, Session};
use crate::error::Error;
use crate::panel::models::ApiResponse;
use crate::transport::TransportConfig;

/// Path prefix shared by every inbound endpoint.
const INBOUNDS_PATH: [&str; 3] = ["panel", "api", "inbounds"];

/// Async client for the 3X-UI panel API.
///
/// Construct it, call [`login`](Self::login), then use the endpoint methods.
/// The session token is held behind a lock, so `&PanelClient` may be shared
/// between tasks. Nothing is retried and the client never re-authenticates
/// on its own.
#[derive(Debug)]
pub struct PanelClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    session: Session,
}

impl PanelClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Create a client with the default [`TransportConfig`].
    ///
    /// No network call is made. A trailing slash on `base_url` is ignored;
    /// a path prefix (the panel's "web base path") is kept.
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::with_transport(base_url, username, password, &TransportConfig::default())
    }

    /// Create a client whose HTTP transport is built from `transport`.
    pub fn with_transport(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, username, password)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The client should not carry a cookie store; the session cookie is
    /// attached per request.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            credentials: Credentials::new(username, password),
            session: Session::default(),
        })
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(raw.to_owned()));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The panel base URL, without a trailing slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The login username.
    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    ///
    /// Segments are pushed individually, so an email like `a/b@x` becomes
    /// `a%2Fb@x` and can never alter the path structure. Empty, `.` and `..`
    /// segments would be dropped or resolved by the URL parser, so they are
    /// rejected with `InvalidPathSegment`.
    pub(crate) fn url<I, S>(&self, segments: I) -> Result<Url, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(checked_segment(segment.as_ref())?);
            }
        }
        Ok(url)
    }

    /// Build `{base}/panel/api/inbounds/{segments...}`.
    pub(crate) fn inbounds_url<I, S>(&self, segments: I) -> Result<Url, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().to_owned())
            .collect();
        self.url(INBOUNDS_PATH.iter().copied().chain(segments.iter().map(String::as_str)))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Start a request with the session cookie attached, if one is held.
    pub(crate) fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        debug!(%method, %url, "panel request");
        let builder = self.http.request(method, url);
        match self.session.cookie_header() {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    /// `GET` and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        self.send(self.request(Method::GET, url)).await
    }

    /// `POST` with no body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        self.send(self.request(Method::POST, url)).await
    }

    /// `POST` a JSON body and unwrap the envelope.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        let payload = serde_json::to_vec(body)?;
        let builder = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload);
        self.send(builder).await
    }

    /// Send a request and unwrap the `{ success, msg, obj }` envelope.
    ///
    /// Returns `obj`, which is `None` when the panel sent it absent or `null`.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Option<T>, Error> {
        let resp = builder.send().await?;
        let envelope: ApiResponse<T> = Self::decode(resp).await?;

        if envelope.success {
            Ok(envelope.obj)
        } else {
            Err(Error::Api {
                message: envelope.msg.unwrap_or_default(),
            })
        }
    }

    /// Check the status and decode the body as an envelope, without
    /// interpreting `success`.
    pub(crate) async fn decode<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<ApiResponse<T>, Error> {
        Self::check_status(&resp)?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::decode(&e, &body))
    }

    pub(crate) fn check_status(resp: &reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status == StatusCode::OK {
            return Ok(());
        }
        Err(Error::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
        })
    }
}

fn checked_segment(segment: &str) -> Result<&str, Error> {
    match segment {
        "" | "." | ".." => Err(Error::InvalidPathSegment(segment.to_owned())),
        _ => Ok(segment),
    }
}
