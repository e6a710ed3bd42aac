use crate::response::rest::jump;
use crate::xml::XmlDocument;
use crate::{Error, Request, Response};
use http::Method;
use log::{debug, warn};
use std::ops::Deref;

const XHTML: &str = "http://www.w3.org/1999/xhtml";

const LINKS: &str = "//head/link/@href | //body//a/@href | //body//img/@src \
    | //xhtml:link/@href | //xhtml:a/@href | //xhtml:img/@src";

/// A [`Response`] whose body is an XML document, with XPath assertions and navigation.
///
/// Namespace prefixes used in XPath expressions must be registered first with
/// [`XmlResponse::register_ns`].
///
/// ### Example:
/// ```rust
/// use mockwire::{MkAnswer, MockContainer, Request, XmlResponse};
///
/// #[tokio::main]
/// async fn main() {
///     // Arrange
///     let mut container = MockContainer::new();
///     container.next(MkAnswer::new(200).with_body(
///         r#"<page xmlns="urn:test"><link rel="self" href="/page/1"/></page>"#,
///     ));
///     let home = container.start().unwrap();
///
///     // Act
///     let response = Request::new(home.as_str()).unwrap().fetch().await.unwrap();
///     let xml = XmlResponse::new(response).register_ns("t", "urn:test");
///
///     // Assert
///     xml.assert_xpath("/t:page/t:link[@rel='self']");
///     let next = xml.rel("/t:page/t:link[@rel='self']/@href").unwrap();
///     assert_eq!(next.uri().path(), "/page/1");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct XmlResponse {
    response: Response,
    namespaces: Vec<(String, String)>,
}

impl XmlResponse {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            namespaces: Vec::new(),
        }
    }

    pub fn into_inner(self) -> Response {
        self.response
    }

    /// The body, parsed. It fails with [`Error::MalformedXml`] if the body is not XML.
    pub fn xml(&self) -> Result<XmlDocument, Error> {
        XmlDocument::parse(&self.response.body(), &self.namespaces)
    }

    /// A new view where `prefix` stands for the namespace `uri` in XPath expressions.
    ///
    /// `self` is left untouched.
    pub fn register_ns(&self, prefix: &str, uri: &str) -> Self {
        let mut namespaces = self.namespaces.clone();
        namespaces.retain(|(registered, _)| registered != prefix);
        namespaces.push((prefix.to_string(), uri.to_string()));
        Self {
            response: self.response.clone(),
            namespaces,
        }
    }

    /// The text of every node matched by `query`, in document order.
    pub fn xpath(&self, query: &str) -> Result<Vec<String>, Error> {
        self.xml()?.xpath(query)
    }

    /// Assert that `query` matches something in the body.
    #[track_caller]
    pub fn assert_xpath(&self, query: &str) -> &Self {
        match self.xpath(query) {
            Ok(values) if !values.is_empty() => self,
            Ok(_) => self.missing(query),
            Err(e) => panic!(
                "XML can't be queried with XPath '{}': {}\n{}",
                query,
                e,
                self.response.body()
            ),
        }
    }

    /// [`RestResponse::jump`] to the first value matched by `query`.
    ///
    /// A body that is not XML is an error. A query matching nothing is an assertion failure,
    /// as with [`XmlResponse::assert_xpath`].
    ///
    /// [`RestResponse::jump`]: crate::RestResponse::jump
    #[track_caller]
    pub fn rel(&self, query: &str) -> Result<Request, Error> {
        let values = self.xpath(query)?;
        match values.first() {
            Some(target) => jump(&self.response, target),
            None => self.missing(query),
        }
    }

    /// Assert that every link, stylesheet and image referenced by the (X)HTML body can be
    /// fetched, through the same wire chain, with a status lower than 400.
    ///
    /// Relative references are resolved against the URI of the request that produced this
    /// response.
    pub async fn assert_no_broken_links(&self) -> &Self {
        let links = match self.register_ns("xhtml", XHTML).xpath(LINKS) {
            Ok(links) => links,
            Err(e) => panic!(
                "XML can't be searched for links: {}\n{}",
                e,
                self.response.body()
            ),
        };
        debug!(
            "#assert_no_broken_links(): {} links found: {:?}",
            links.len(),
            links
        );

        let mut broken = Vec::new();
        for link in links {
            let request = match jump(&self.response, &link) {
                Ok(request) => request.with_method(Method::GET).with_body(Vec::new()),
                Err(e) => {
                    warn!("#assert_no_broken_links('{}'): {}", link, e);
                    broken.push(link);
                    continue;
                }
            };
            match request.fetch().await {
                Ok(response) if response.status() < 400 => {}
                Ok(response) => {
                    warn!(
                        "#assert_no_broken_links('{}'): not valid since response code={}",
                        request.uri(),
                        response.status()
                    );
                    broken.push(request.uri().to_string());
                }
                Err(e) => {
                    warn!("#assert_no_broken_links('{}'): {}", request.uri(), e);
                    broken.push(request.uri().to_string());
                }
            }
        }

        if !broken.is_empty() {
            panic!("{} broken link(s) found: {:?}", broken.len(), broken);
        }
        self
    }

    #[track_caller]
    fn missing(&self, query: &str) -> ! {
        panic!(
            "XML doesn't contain required XPath '{}':\n{}",
            query,
            self.response.body()
        )
    }
}

impl Deref for XmlResponse {
    type Target = Response;

    fn deref(&self) -> &Self::Target {
        &self.response
    }
}

impl From<Response> for XmlResponse {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}
