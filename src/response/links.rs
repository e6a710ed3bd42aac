use crate::response::rest::jump;
use crate::{Error, Request, Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Deref;

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([^>]+)>\s*;(.*)$").expect("the Link pattern is valid"));

/// A [`Response`] navigated through its RFC 5988 `Link` headers, e.g.
/// `Link: </users?page=2>; rel="next", </users?page=9>; rel="last"`.
#[derive(Clone, Debug)]
pub struct WebLinkingResponse(Response);

/// A single link of a `Link` header: a URI reference plus its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    uri: String,
    params: BTreeMap<String, String>,
}

impl Link {
    fn parse(text: &str) -> Result<Self, Error> {
        let captures = LINK
            .captures(text)
            .ok_or_else(|| Error::MalformedLink(text.to_string()))?;
        let mut params = BTreeMap::new();
        for pair in captures[2].split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::MalformedLink(text.to_string()))?;
            params.insert(
                key.trim().to_lowercase(),
                value.trim().trim_matches('"').to_string(),
            );
        }
        Ok(Self {
            uri: captures[1].to_string(),
            params,
        })
    }

    /// The URI reference, as written in the header: it may be relative.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The value of the parameter `name` (lower-case), e.g. `rel` or `title`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

impl WebLinkingResponse {
    pub fn new(response: Response) -> Self {
        Self(response)
    }

    pub fn into_inner(self) -> Response {
        self.0
    }

    /// Every link with a `rel` parameter, by relation. When two links share a relation,
    /// the last one wins.
    pub fn links(&self) -> Result<BTreeMap<String, Link>, Error> {
        let mut links = BTreeMap::new();
        for header in self.0.headers().get("Link").unwrap_or_default() {
            for part in header.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let link = Link::parse(part)?;
                if let Some(rel) = link.get("rel") {
                    links.insert(rel.to_string(), link.clone());
                }
            }
        }
        Ok(links)
    }

    /// The link with relation `rel`, if any.
    pub fn link(&self, rel: &str) -> Result<Option<Link>, Error> {
        Ok(self.links()?.remove(rel))
    }

    /// [`RestResponse::jump`] to the link with relation `rel`.
    ///
    /// [`RestResponse::jump`]: crate::RestResponse::jump
    pub fn follow(&self, rel: &str) -> Result<Request, Error> {
        let link = self
            .link(rel)?
            .ok_or_else(|| Error::MissingLink(rel.to_string()))?;
        jump(&self.0, link.uri())
    }
}

impl Deref for WebLinkingResponse {
    type Target = Response;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Response> for WebLinkingResponse {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}
