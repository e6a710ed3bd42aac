/// A cookie set by the server through a `Set-Cookie` header.
///
/// Only the attributes needed to carry a cookie over to the next request are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
}

impl Cookie {
    /// Parse the value of a `Set-Cookie` header: `name=value; Path=/; Domain=example.com; ...`.
    ///
    /// Attribute names are case-insensitive, unknown attributes are ignored.
    pub fn parse(header: &str) -> Option<Cookie> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie {
            name: name.to_string(),
            value: unquote(value),
            path: None,
            domain: None,
        };
        for attribute in parts {
            let (key, value) = attribute.split_once('=').unwrap_or((attribute, ""));
            let key = key.trim();
            if key.eq_ignore_ascii_case("path") {
                cookie.path = Some(unquote(value));
            } else if key.eq_ignore_ascii_case("domain") {
                cookie.domain = Some(unquote(value));
            }
        }
        Some(cookie)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
