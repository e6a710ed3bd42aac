use std::io;

/// Everything that can go wrong while driving a [`MockContainer`] or sending a [`Request`]
/// through a chain of [`Wire`]s.
///
/// Assertion helpers on [`RestResponse`] and [`XmlResponse`] do not return this type: like any
/// other test assertion, they panic with a dump of the response they were looking at.
///
/// [`MockContainer`]: crate::MockContainer
/// [`Request`]: crate::Request
/// [`Wire`]: crate::Wire
/// [`RestResponse`]: crate::RestResponse
/// [`XmlResponse`]: crate::XmlResponse
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("container is already listening on port {0}")]
    AlreadyStarted(u16),

    #[error("container is not started")]
    NotStarted,

    /// `take` was called but no request reached the container yet.
    #[error("no request was received by the container (or all of them were already taken)")]
    NothingReceived,

    /// A request reached the container but no answer was queued for it.
    #[error("no answer left to give, {received} request(s) received so far")]
    NoAnswer { received: usize },

    #[error("invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("unsupported URI scheme '{0}', only plain 'http' is supported")]
    UnsupportedScheme(String),

    #[error("invalid HTTP header '{name}: {value}'")]
    InvalidHeader { name: String, value: String },

    #[error("invalid HTTP status code {0}")]
    InvalidStatus(u16),

    #[error("user info '{0}' must have the 'user:password' form")]
    MalformedUserInfo(String),

    #[error("cookie header '{0}' must have the 'name=value' form")]
    MalformedCookie(String),

    #[error("HTTP header '{0}' is missing in the response")]
    MissingHeader(String),

    #[error("XML document is malformed: {0}")]
    MalformedXml(String),

    #[error("invalid XPath expression '{xpath}': {reason}")]
    InvalidXPath { xpath: String, reason: String },

    #[error("Link header value doesn't comply to RFC-5988: \"{0}\"")]
    MalformedLink(String),

    #[error("Link with rel=\"{0}\" doesn't exist")]
    MissingLink(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("HTTP transport failure: {0}")]
    Transport(#[from] hyper::Error),
}

impl Error {
    /// Whether the failure happened while talking to the network, as opposed to a misuse
    /// of the API. Only the former is worth retrying.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Transport(_))
    }

    pub(crate) fn invalid_uri(uri: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidUri {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }
}
