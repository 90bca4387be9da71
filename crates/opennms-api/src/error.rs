use thiserror::Error;

/// Top-level error type for the `opennms-api` crate.
///
/// Covers every failure mode across both API surfaces (v1 `/rest/` and
/// v2 `/api/v2/`): authentication, transport, server-side payload errors,
/// and local validation. A missing record is never an error; item-level
/// lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 401 from the server. Never retried automatically.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Server payload ──────────────────────────────────────────────
    /// Any other 4xx/5xx, with the server's response text attached.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// A create-type call hit a server-side uniqueness constraint.
    #[error("A {kind} named {name} already exists")]
    DuplicateEntity { name: String, kind: &'static str },

    // ── Local validation ────────────────────────────────────────────
    /// A caller-supplied parameter failed validation before any network
    /// call was made.
    #[error("{name} received an invalid value of {value} (valid: {valid:?})")]
    InvalidValue {
        name: &'static str,
        value: String,
        valid: Vec<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A legacy XML payload could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Returns `true` if this error indicates invalid or expired credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
