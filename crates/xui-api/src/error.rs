use thiserror::Error;

/// Top-level error type for the `xui-api` crate.
///
/// Variants fall into four classes, exposed through the `is_*` helpers:
///
/// - **transport**: the request never produced a 200 response
/// - **decode**: the body was not the JSON shape we expected
/// - **domain**: the panel answered `success: false`
/// - **protocol**: a structurally required piece of a successful reply is missing
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, body read, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The panel answered with a status other than `200 OK`.
    #[error("request failed with status: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL parsed but cannot carry a path (e.g. `mailto:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A path parameter is empty, `.` or `..`, which a URL path cannot carry
    /// as a literal segment.
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Decode ──────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A value could not be serialized into an embedded JSON string.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Domain ──────────────────────────────────────────────────────
    /// Login was rejected by the panel (`success: false`).
    #[error("login failed: {message}")]
    Authentication { message: String },

    /// The panel reported `success: false`; `message` is its `msg` verbatim.
    #[error("panel API error: {message}")]
    Api { message: String },

    // ── Protocol ────────────────────────────────────────────────────
    /// Login succeeded but no session cookie came back.
    #[error("session cookie not found in login response")]
    MissingSessionCookie,

    /// A successful envelope carried no `obj` where one is required.
    #[error("{operation}: response has no object")]
    MissingObject { operation: &'static str },
}

impl Error {
    /// Build a `Deserialization` error from a serde failure and the body it choked on.
    pub(crate) fn decode(err: &serde_json::Error, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }

    /// Returns `true` for network failures and non-200 statuses.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::HttpStatus { .. }
                | Self::InvalidUrl(_)
                | Self::InvalidBaseUrl(_)
                | Self::InvalidPathSegment(_)
                | Self::Tls(_)
        )
    }

    /// Returns `true` if the response body could not be (de)serialized.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Deserialization { .. } | Self::Serialization(_))
    }

    /// Returns `true` if the panel rejected the request with `success: false`.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Api { .. })
    }

    /// Returns `true` if a successful response was missing a required part.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::MissingSessionCookie | Self::MissingObject { .. })
    }

    /// Returns `true` if re-authenticating might resolve this error.
    ///
    /// The panel has no structured "session expired" signal, so only a
    /// rejected login, a missing cookie, or HTTP 401 count here.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::MissingSessionCookie => true,
            Self::HttpStatus { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// The HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The panel's `msg` for domain errors.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Authentication { message } | Self::Api { message } => Some(message),
            _ => None,
        }
    }
}
