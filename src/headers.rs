use http::HeaderMap;
use std::fmt;

/// An ordered multimap of HTTP headers.
///
/// Header names are compared case-insensitively: `x-test`, `X-TEST` and `X-Test` all resolve
/// to the same entry, named the way it was first seen. Headers read off the wire come
/// lower-cased from hyper and are reported in their canonical form instead (see
/// [`normalize`]). Repeated instances of the same header keep their values, in the order they
/// were added.
///
/// `Headers` is built once - when a [`MkQuery`], a [`MkAnswer`] or a [`Response`] is assembled -
/// and never changes afterwards.
///
/// [`MkQuery`]: crate::MkQuery
/// [`MkAnswer`]: crate::MkAnswer
/// [`Response`]: crate::Response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve all values of the header `name`, if it is present.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name)
            .map(|index| self.entries[index].1.as_slice())
    }

    /// Retrieve the first value of the header `name`, if it is present.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Header names, in the order they were first seen.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// All `(name, values)` entries, in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Every single `(name, value)` pair, flattened.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Only used while a `Headers` is being assembled: there is no way to reach it from a
    // value that has already been handed out.
    pub(crate) fn append(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(index) => self.entries[index].1.push(value.into()),
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), value);
        }
        headers
    }
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        map.iter()
            .map(|(name, value)| {
                (
                    normalize(name.as_str()),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.pairs() {
            writeln!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}

/// Bring a header name to its canonical form: the first character and every character
/// following a `-` are upper-cased, everything else is left untouched.
///
/// ```rust
/// assert_eq!(mockwire::normalize("content-type"), "Content-Type");
/// assert_eq!(mockwire::normalize("x-request-ID"), "X-Request-ID");
/// ```
pub fn normalize(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper { c.to_ascii_uppercase() } else { c };
            upper = c == '-';
            mapped
        })
        .collect()
}
