use crate::{normalize, Error, Headers};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderName, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use serde::Serialize;

/// The blueprint for the response returned by a [`MockContainer`] to the next request it
/// receives.
///
/// Answers are queued with [`MockContainer::next`] and given out strictly in the order they
/// were queued, one per incoming request, no matter what the request looks like.
///
/// [`MockContainer`]: crate::MockContainer
/// [`MockContainer::next`]: crate::MockContainer::next
#[derive(Clone, Debug)]
pub struct MkAnswer {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

// Nothing is validated while an answer is being built: an invalid status code or header is
// reported by the container, as a 500 response, when it tries to give the answer out.
impl MkAnswer {
    /// Start building a `MkAnswer` specifying the status code of the response.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A `200 OK` answer with a plain text body.
    pub fn text<T: Into<String>>(body: T) -> Self {
        Self::new(200).with_body_string(body)
    }

    /// Append a header `value` to list of headers with `name` as header name.
    ///
    /// Existing values for the same header are kept: the container sends all of them.
    ///
    /// ### Example:
    /// ```rust
    /// use mockwire::MkAnswer;
    ///
    /// let answer = MkAnswer::new(302)
    ///     .with_header("Set-Cookie", "name=value; path=/")
    ///     .with_header("Set-Cookie", "name2=value2; Domain=example.com")
    ///     .with_header("Location", "/home");
    ///
    /// assert_eq!(answer.headers().get("set-cookie").unwrap().len(), 2);
    /// ```
    pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the response body with bytes.
    pub fn with_body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Set the response body to a string.
    ///
    /// It sets "Content-Type" to "text/plain" unless a content type was already provided.
    pub fn with_body_string<T: Into<String>>(self, body: T) -> Self {
        let body = body.into().into_bytes();
        self.with_default_content_type("text/plain").with_body(body)
    }

    /// Set the response body from a JSON-serializable value.
    ///
    /// It sets "Content-Type" to "application/json" unless a content type was already provided.
    pub fn with_body_json<B: Serialize>(self, body: B) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(&body)?;
        Ok(self
            .with_default_content_type("application/json")
            .with_body(body))
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> Headers {
        self.headers.iter().map(|(k, v)| (k, v.as_str())).collect()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn with_default_content_type(self, mime: &str) -> Self {
        let present = self
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
        if present {
            self
        } else {
            self.with_header(normalize(CONTENT_TYPE.as_str()), mime)
        }
    }

    /// Generate the HTTP response.
    ///
    /// `Content-Length` always reflects the actual size of the body, whatever the answer
    /// says.
    pub(crate) fn render(&self) -> Result<Response<Full<Bytes>>, Error> {
        let status =
            StatusCode::from_u16(self.status).map_err(|_| Error::InvalidStatus(self.status))?;
        let mut response = Response::new(Full::new(Bytes::from(self.body.clone())));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            let invalid = || Error::InvalidHeader {
                name: name.clone(),
                value: value.clone(),
            };
            let key = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.append(key, value);
        }
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        Ok(response)
    }
}
