use crate::print::{print_body, BodyPrintLimit};
use crate::Headers;
use http::{Method, Uri};
use http_body_util::BodyExt;
use std::borrow::Cow;
use std::fmt;

/// A request received by a [`MockContainer`].
///
/// Retrieve them, oldest first, with [`MockContainer::take`].
///
/// ### Implementation notes:
/// The body of an incoming `hyper` request is a stream that gets consumed when read.
/// We read it fully once, when the request arrives in the container, and store the result: a
/// `MkQuery` is an immutable snapshot that can be inspected as many times as needed.
///
/// [`MockContainer`]: crate::MockContainer
/// [`MockContainer::take`]: crate::MockContainer::take
#[derive(Debug, Clone)]
pub struct MkQuery {
    method: Method,
    uri: Uri,
    headers: Headers,
    body: Vec<u8>,
}

impl MkQuery {
    pub(crate) async fn from_hyper(
        request: hyper::Request<hyper::body::Incoming>,
    ) -> Result<MkQuery, hyper::Error> {
        let (parts, body) = request.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: Headers::from(&parts.headers),
            body: body.to_vec(),
        })
    }

    /// The HTTP method, e.g. `GET`.
    pub fn method(&self) -> &str {
        self.method.as_str()
    }

    /// The request target as it was received, e.g. `/users?page=2`.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The raw request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The request body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub(crate) fn print_with_limit(
        &self,
        mut buffer: impl fmt::Write,
        body_print_limit: BodyPrintLimit,
    ) -> fmt::Result {
        writeln!(buffer, "{} {}", self.method, self.uri)?;
        write!(buffer, "{}", self.headers)?;
        writeln!(buffer)?;
        print_body(buffer, &self.body, body_print_limit)
    }
}

impl fmt::Display for MkQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_with_limit(f, BodyPrintLimit::default())
    }
}
