//! What comes back from a [`Request`], and the views that make it easy to assert on it.
//!
//! [`Response`] is the raw material. [`RestResponse`], [`XmlResponse`] and
//! [`WebLinkingResponse`] wrap it (and dereference to it), adding assertions and the
//! navigation primitives to issue the next request of a conversation.
//!
//! [`Request`]: crate::Request
mod cookie;
mod links;
mod rest;
mod xml;

pub use cookie::Cookie;
pub use links::{Link, WebLinkingResponse};
pub use rest::RestResponse;
pub use xml::XmlResponse;

use crate::print::{print_body, BodyPrintLimit};
use crate::{Headers, Request};
use http::StatusCode;
use std::borrow::Cow;
use std::fmt;

/// An HTTP response, together with the [`Request`] that produced it.
///
/// [`Request`]: crate::Request
#[derive(Clone, Debug)]
pub struct Response {
    request: Request,
    status: StatusCode,
    headers: Headers,
    body: Vec<u8>,
}

impl Response {
    /// Usually called by the innermost [`Wire`] of a chain, once the network round-trip is
    /// complete.
    ///
    /// [`Wire`]: crate::Wire
    pub fn new(request: Request, status: StatusCode, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            request,
            status,
            headers,
            body,
        }
    }

    /// The request this response answers.
    pub fn back(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// The canonical reason phrase of the status code, empty for unknown codes.
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or_default()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body decoded as UTF-8, replacing invalid sequences.
    pub fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// The raw body.
    pub fn binary(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn print_with_limit(
        &self,
        mut buffer: impl fmt::Write,
        body_print_limit: BodyPrintLimit,
    ) -> fmt::Result {
        writeln!(
            buffer,
            "{} {} [{}]",
            self.status(),
            self.reason(),
            self.request.uri()
        )?;
        write!(buffer, "{}", self.headers)?;
        writeln!(buffer)?;
        print_body(buffer, &self.body, body_print_limit)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_with_limit(f, BodyPrintLimit::default())
    }
}
