use crate::print::{print_body, BodyPrintLimit};
use crate::wire::{HyperWire, Outgoing, Wire};
use crate::{Error, Response};
use http::Method;
use log::info;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use url::form_urlencoded;
use url::Url;

/// An HTTP request bound to a chain of [`Wire`]s.
///
/// `Request` is immutable: every `with_*` method returns a new `Request`, leaving the original
/// untouched. It is cheap to clone - the wire chain is shared.
///
/// ### Example:
/// ```rust
/// use mockwire::{Method, Request};
///
/// let request = Request::new("http://localhost:8080/users")
///     .unwrap()
///     .with_method(Method::POST)
///     .with_header("Content-Type", "application/x-www-form-urlencoded")
///     .with_form_param("name", "Jeff Lebowski")
///     .with_query_param("notify", "true");
///
/// assert_eq!(request.uri().as_str(), "http://localhost:8080/users?notify=true");
/// assert_eq!(request.body(), b"name=Jeff+Lebowski&");
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    wire: Arc<dyn Wire>,
    uri: Url,
    method: Method,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    // `url` forgets an empty password, as in `user:@host`.
    empty_password: bool,
}

impl Request {
    /// A `GET` request to `uri`, sent over the network by a [`HyperWire`].
    pub fn new(uri: &str) -> Result<Self, Error> {
        Self::with_wire(Arc::new(HyperWire::new()), uri)
    }

    /// A `GET` request to `uri`, sent through `wire`.
    pub fn with_wire(wire: Arc<dyn Wire>, uri: &str) -> Result<Self, Error> {
        let empty_password = has_empty_password(uri);
        let uri = Url::parse(uri).map_err(|e| Error::invalid_uri(uri, e))?;
        Ok(Self {
            wire,
            uri,
            method: Method::GET,
            headers: Vec::new(),
            body: Vec::new(),
            empty_password,
        })
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The headers of the request, in the order they were added.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Append a header, its name kept as given. Values already set for the same header are
    /// kept.
    pub fn with_header(mut self, name: &str, value: impl ToString) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Remove all values of the header `name`.
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Append a URL-encoded form parameter to the body, e.g. `name=Jeff+Lebowski&`.
    pub fn with_form_param(mut self, name: &str, value: impl ToString) -> Self {
        self.body.extend_from_slice(name.as_bytes());
        self.body.push(b'=');
        let value = value.to_string();
        for chunk in form_urlencoded::byte_serialize(value.as_bytes()) {
            self.body.extend_from_slice(chunk.as_bytes());
        }
        self.body.push(b'&');
        self
    }

    pub fn with_query_param(mut self, name: &str, value: impl ToString) -> Self {
        self.uri
            .query_pairs_mut()
            .append_pair(name, &value.to_string());
        self
    }

    /// Append one or more segments to the path of the URI.
    pub fn with_path(mut self, segment: &str) -> Self {
        if let Ok(mut segments) = self.uri.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(segment.split('/').filter(|s| !s.is_empty()));
        }
        self
    }

    /// Set the user info of the URI, e.g. `jeff:secret` or `jeff:` for an empty password.
    pub fn with_user_info(mut self, info: &str) -> Result<Self, Error> {
        let (user, password) = match info.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (info, None),
        };
        let address = self.uri.to_string();
        let failed = |_| Error::invalid_uri(address.as_str(), "it cannot carry user info");
        self.uri.set_username(user).map_err(failed)?;
        self.uri.set_password(password).map_err(failed)?;
        self.empty_password = password == Some("");
        Ok(self)
    }

    /// The same request, sent to a different URI.
    ///
    /// An empty password survives only if `uri` carries the same user name.
    pub fn with_uri(mut self, uri: Url) -> Self {
        self.empty_password = self.empty_password
            && uri.password().is_none()
            && uri.username() == self.uri.username();
        self.uri = uri;
        self
    }

    /// Wrap the current wire chain with one more wire, which will run first.
    ///
    /// `wrap` gets the current chain and returns the new outermost wire, e.g.
    /// `request.through(VerboseWire::new)`.
    pub fn through<W, F>(mut self, wrap: F) -> Self
    where
        W: Wire + 'static,
        F: FnOnce(Arc<dyn Wire>) -> W,
    {
        self.wire = Arc::new(wrap(self.wire));
        self
    }

    /// Send the request through the wire chain.
    pub async fn fetch(&self) -> Result<Response, Error> {
        let start = Instant::now();
        let outgoing = Outgoing {
            uri: self.uri.clone(),
            method: self.method.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            user_info: self.user_info(),
        };
        let response = self.wire.send(self, outgoing).await?;
        info!(
            "#fetch({} {}): completed in {:?} [{} {}]: {}",
            self.method,
            self.uri.path(),
            start.elapsed(),
            response.status(),
            response.reason(),
            self.uri
        );
        Ok(response)
    }
}

impl Request {
    // The percent-encoded user info, as it was written.
    fn user_info(&self) -> Option<String> {
        match (self.uri.username(), self.uri.password()) {
            (user, Some(password)) => Some(format!("{}:{}", user, password)),
            (user, None) if self.empty_password => Some(format!("{}:", user)),
            ("", None) => None,
            (user, None) => Some(user.to_string()),
        }
    }
}

// Whether the authority of `uri` ends its user info with a `:`, e.g. `http://jeff:@host/`.
fn has_empty_password(uri: &str) -> bool {
    let rest = uri.split_once("://").map_or(uri, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    authority
        .rsplit_once('@')
        .is_some_and(|(info, _)| info.ends_with(':'))
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "HTTP/1.1 {} {} ({})",
            self.method,
            self.uri.path(),
            self.uri.host_str().unwrap_or_default()
        )?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        writeln!(f)?;
        print_body(f, &self.body, BodyPrintLimit::default())
    }
}
