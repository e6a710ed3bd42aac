use crate::response::Cookie;
use crate::{normalize, Error, Request, Response};
use http::header::{COOKIE, LOCATION, SET_COOKIE};
use std::ops::Deref;

/// A [`Response`] with assertions and the primitives to navigate to the next request.
///
/// Assertions panic, with the whole response in the panic message, when they are not
/// satisfied. They return `&Self` so that they can be chained.
///
/// ### Example:
/// ```rust
/// use mockwire::{MkAnswer, MockContainer, Request, RestResponse};
///
/// #[tokio::main]
/// async fn main() {
///     // Arrange
///     let mut container = MockContainer::new();
///     container
///         .next(MkAnswer::new(303).with_header("Location", "/welcome"))
///         .next(MkAnswer::text("Hello!"));
///     let home = container.start().unwrap();
///
///     // Act
///     let response = Request::new(home.as_str()).unwrap().fetch().await.unwrap();
///     let next = RestResponse::new(response)
///         .assert_status(303)
///         .follow()
///         .unwrap();
///     let response = RestResponse::new(next.fetch().await.unwrap());
///
///     // Assert
///     response.assert_status(200).assert_body_contains("Hello");
///     container.take().unwrap();
///     assert_eq!(container.take().unwrap().uri().path(), "/welcome");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct RestResponse(Response);

impl RestResponse {
    pub fn new(response: Response) -> Self {
        Self(response)
    }

    pub fn into_inner(self) -> Response {
        self.0
    }

    #[track_caller]
    pub fn assert_status(&self, status: u16) -> &Self {
        if self.0.status() != status {
            panic!(
                "HTTP response status is not equal to {}:\n{}",
                status, self.0
            );
        }
        self
    }

    /// Assert that one of the values of the header `name` is `value`.
    #[track_caller]
    pub fn assert_header(&self, name: &str, value: &str) -> &Self {
        let found = self
            .0
            .headers()
            .get(name)
            .is_some_and(|values| values.iter().any(|v| v == value));
        if !found {
            panic!(
                "HTTP header {} doesn't have the value '{}':\n{}",
                name, value, self.0
            );
        }
        self
    }

    #[track_caller]
    pub fn assert_body_contains(&self, text: &str) -> &Self {
        if !self.0.body().contains(text) {
            panic!(
                "HTTP response body doesn't contain '{}':\n{}",
                text, self.0
            );
        }
        self
    }

    /// Assert that the body, decoded as UTF-8, satisfies `predicate`.
    #[track_caller]
    pub fn assert_body<P>(&self, predicate: P) -> &Self
    where
        P: FnOnce(&str) -> bool,
    {
        if !predicate(&self.0.body()) {
            panic!("HTTP response body content is not valid:\n{}", self.0);
        }
        self
    }

    /// The cookie named `name` among the ones set by the `Set-Cookie` headers, if any.
    pub fn cookie(&self, name: &str) -> Option<Cookie> {
        cookies(&self.0).find(|cookie| cookie.name() == name)
    }

    /// A new request, through the same wire chain, to `target`.
    ///
    /// A relative `target` is resolved against the URI of the request that produced this
    /// response. Method, headers and body of that request are kept. Every cookie set by this
    /// response (with a non-empty value) is added as a `Cookie` header.
    pub fn jump(&self, target: &str) -> Result<Request, Error> {
        jump(&self.0, target)
    }

    /// [`RestResponse::jump`] to the URI in the `Location` header.
    pub fn follow(&self) -> Result<Request, Error> {
        let location = self
            .0
            .headers()
            .first(LOCATION.as_str())
            .ok_or_else(|| Error::MissingHeader(LOCATION.to_string()))?;
        jump(&self.0, location)
    }
}

impl Deref for RestResponse {
    type Target = Response;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Response> for RestResponse {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}

pub(super) fn jump(response: &Response, target: &str) -> Result<Request, Error> {
    let origin = response.back();
    let uri = origin
        .uri()
        .join(target)
        .map_err(|e| Error::invalid_uri(target, e))?;
    let mut request = origin.clone().with_uri(uri);
    for cookie in cookies(response).filter(|cookie| !cookie.value().is_empty()) {
        request = request.with_header(
            &normalize(COOKIE.as_str()),
            format!("{}={}", cookie.name(), cookie.value()),
        );
    }
    Ok(request)
}

fn cookies(response: &Response) -> impl Iterator<Item = Cookie> + '_ {
    response
        .headers()
        .get(SET_COOKIE.as_str())
        .unwrap_or_default()
        .iter()
        .filter_map(|header| Cookie::parse(header))
}
