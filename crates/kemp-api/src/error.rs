use quick_xml::de::DeError;
use thiserror::Error;

/// Top-level error type for the `kemp-api` crate.
///
/// Four families, kept apart so callers can tell them apart:
/// transport (nothing useful came back), remote (the appliance rejected
/// the command), decode (something came back but could not be read), and
/// validation (the command was never sent).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS handshake, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be built (CA bundle unreadable, etc.)
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Appliance ───────────────────────────────────────────────────
    /// The appliance answered with HTTP >= 400 and an `<Error>` document.
    #[error("{code} - {message}")]
    Remote { code: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    // ── Local ───────────────────────────────────────────────────────
    /// Input rejected before any request was issued.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Returns `true` if the appliance itself rejected the command.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns `true` if this is a transient error a caller may want to retry.
    ///
    /// Nothing in this crate retries; the predicate only exists for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// The HTTP status carried by a remote rejection.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Failure to turn a response body into a document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The XML prolog names a charset we have no decoder for.
    #[error("unsupported character encoding '{0}'")]
    UnsupportedEncoding(String),

    /// Bytes are not valid in the declared charset.
    #[error("body is not valid {0}")]
    Charset(&'static str),

    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// A structurally required element is absent.
    #[error("missing <{0}> element")]
    MissingElement(&'static str),

    /// Well-formed XML that does not fit the expected record.
    #[error("unexpected document shape: {0}")]
    Schema(String),
}

impl From<quick_xml::Error> for DecodeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<DeError> for DecodeError {
    fn from(err: DeError) -> Self {
        match err {
            DeError::InvalidXml(inner) => Self::Malformed(inner.to_string()),
            DeError::UnexpectedEof => Self::Malformed("unexpected end of document".into()),
            other => Self::Schema(other.to_string()),
        }
    }
}

/// Local precondition failure detected before a command is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is not a valid ip address")]
    InvalidAddress(String),

    #[error("a {0} needs a port")]
    MissingPort(&'static str),

    #[error("protocol must be tcp or udp, got '{0}'")]
    InvalidProtocol(String),
}
