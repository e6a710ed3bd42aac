use crate::wire::{Outgoing, Wire};
use crate::{normalize, Error, Request, Response};
use async_trait::async_trait;
use http::header::COOKIE;
use std::sync::Arc;

/// Merges every `Cookie` header of the request into a single one.
///
/// When the same cookie is set more than once the last value wins, keeping the position of
/// its first occurrence. Cookies with an empty value are dropped, and so is the header when no
/// cookie is left. A cookie without `=` is rejected with [`Error::MalformedCookie`].
///
/// It pairs well with [`RestResponse::follow`], which appends the cookies set by a response to
/// the ones the request already had.
///
/// [`RestResponse::follow`]: crate::RestResponse::follow
#[derive(Debug)]
pub struct CookieOptimizingWire {
    origin: Arc<dyn Wire>,
}

impl CookieOptimizingWire {
    pub fn new(origin: Arc<dyn Wire>) -> Self {
        Self { origin }
    }
}

#[async_trait]
impl Wire for CookieOptimizingWire {
    async fn send(&self, request: &Request, outgoing: Outgoing) -> Result<Response, Error> {
        let mut cookies: Vec<(String, String)> = Vec::new();
        let mut headers = Vec::with_capacity(outgoing.headers.len());
        for (name, value) in &outgoing.headers {
            if !name.eq_ignore_ascii_case(COOKIE.as_str()) {
                headers.push((name.clone(), value.clone()));
                continue;
            }
            for pair in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| Error::MalformedCookie(pair.to_string()))?;
                let (key, value) = (key.trim(), value.trim());
                match cookies.iter_mut().find(|(name, _)| name == key) {
                    Some(cookie) => cookie.1 = value.to_string(),
                    None => cookies.push((key.to_string(), value.to_string())),
                }
            }
        }

        let merged = cookies
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        if !merged.is_empty() {
            headers.push((normalize(COOKIE.as_str()), merged));
        }
        self.origin.send(request, outgoing.with_headers(headers)).await
    }
}
