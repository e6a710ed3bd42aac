//! The XML capability behind [`XmlResponse`]: parse a document, evaluate XPath expressions
//! against it with a set of namespace prefixes, get back the matched values as text.
//!
//! [`XmlResponse`]: crate::XmlResponse
use crate::Error;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use sxd_document::{parser, Package};
use sxd_xpath::{Context, Factory, Value};

static LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"'[^']*'|"[^"]*""#).expect("the literal pattern is valid"));

// A prefixed name, `p:item` or `p:*`. Axes (`child::item`) never match: `:` is followed by `:`.
static PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_][\w.\-]*):[A-Za-z_*]").expect("the prefix pattern is valid")
});

/// A parsed XML document, queryable with XPath.
pub struct XmlDocument {
    package: Package,
    namespaces: Vec<(String, String)>,
}

impl XmlDocument {
    /// Parse `text`. Prefixes in `namespaces` can be used in the XPath expressions evaluated
    /// against the document.
    pub fn parse(text: &str, namespaces: &[(String, String)]) -> Result<Self, Error> {
        let package = parser::parse(text).map_err(|e| Error::MalformedXml(format!("{:?}", e)))?;
        Ok(Self {
            package,
            namespaces: namespaces.to_vec(),
        })
    }

    /// Evaluate `query` and return the text of every match, in document order.
    ///
    /// Nothing matched is an empty vector, not an error. Queries returning a scalar yield a
    /// single value, except for `false` and the empty string, which count as no match.
    pub fn xpath(&self, query: &str) -> Result<Vec<String>, Error> {
        let invalid = |reason: String| Error::InvalidXPath {
            xpath: query.to_string(),
            reason,
        };
        let xpath = Factory::new()
            .build(query)
            .map_err(|e| invalid(format!("{:?}", e)))?
            .ok_or_else(|| invalid("the expression is empty".to_string()))?;

        if let Some(prefix) = self.unregistered_prefix(query) {
            return Err(invalid(format!("unregistered prefix '{}'", prefix)));
        }

        let mut context = Context::new();
        for (prefix, uri) in &self.namespaces {
            context.set_namespace(prefix, uri);
        }

        let document = self.package.as_document();
        let value = xpath
            .evaluate(&context, document.root())
            .map_err(|e| invalid(format!("{:?}", e)))?;
        let values = match value {
            Value::Nodeset(nodes) => nodes
                .document_order()
                .iter()
                .map(|node| node.string_value())
                .collect(),
            Value::String(text) if text.is_empty() => Vec::new(),
            Value::String(text) => vec![text],
            Value::Boolean(true) => vec!["true".to_string()],
            Value::Boolean(false) => Vec::new(),
            Value::Number(number) => vec![number.to_string()],
        };
        Ok(values)
    }
}

impl XmlDocument {
    // The XPath engine cannot resolve a prefix missing from the context, so such expressions
    // are rejected before being evaluated.
    fn unregistered_prefix(&self, query: &str) -> Option<String> {
        let stripped = LITERAL.replace_all(query, "''");
        PREFIX
            .captures_iter(&stripped)
            .map(|captures| captures[1].to_string())
            .find(|prefix| !self.namespaces.iter().any(|(known, _)| known == prefix))
    }
}

impl fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDocument")
            .field("namespaces", &self.namespaces)
            .finish_non_exhaustive()
    }
}
