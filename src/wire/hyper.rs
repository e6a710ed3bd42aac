use crate::wire::{Outgoing, Wire};
use crate::{Error, Headers, Request, Response};
use ::hyper::body::Bytes;
use ::hyper::client::conn::http1;
use async_trait::async_trait;
use http::header::{HOST, USER_AGENT};
use http::{HeaderName, HeaderValue};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use log::{debug, warn};
use tokio::net::TcpStream;

const AGENT: &str = concat!("mockwire/", env!("CARGO_PKG_VERSION"));

/// The innermost wire: sends the request over a fresh HTTP/1.1 connection.
///
/// Only plain `http` URIs are supported. A `Host` and a `User-Agent` header are added when the
/// request doesn't carry one.
#[derive(Clone, Debug, Default)]
pub struct HyperWire;

impl HyperWire {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Wire for HyperWire {
    async fn send(&self, request: &Request, outgoing: Outgoing) -> Result<Response, Error> {
        let uri = &outgoing.uri;
        if uri.scheme() != "http" {
            return Err(Error::UnsupportedScheme(uri.scheme().to_string()));
        }
        let host = uri
            .host_str()
            .ok_or_else(|| Error::invalid_uri(uri.as_str(), "it has no host"))?;
        let port = uri
            .port_or_known_default()
            .ok_or_else(|| Error::invalid_uri(uri.as_str(), "it has no port"))?;

        let mut path = uri.path().to_string();
        if let Some(query) = uri.query() {
            path.push('?');
            path.push_str(query);
        }
        let mut builder = http::Request::builder()
            .method(outgoing.method.clone())
            .uri(path.as_str());
        let headers = builder
            .headers_mut()
            .ok_or_else(|| Error::invalid_uri(uri.as_str(), "it is not a valid request target"))?;
        for (name, value) in &outgoing.headers {
            let invalid = || Error::InvalidHeader {
                name: name.clone(),
                value: value.clone(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.append(header_name, header_value);
        }
        if !headers.contains_key(HOST) {
            let authority = match uri.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
            let value = HeaderValue::from_str(&authority).map_err(|_| Error::InvalidHeader {
                name: HOST.to_string(),
                value: authority.clone(),
            })?;
            headers.insert(HOST, value);
        }
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));
        }
        let hyper_request = builder
            .body(Full::new(Bytes::from(outgoing.body.clone())))
            .map_err(|e| Error::invalid_uri(uri.as_str(), e))?;

        let address = host.trim_start_matches('[').trim_end_matches(']');
        let stream = TcpStream::connect((address, port)).await?;
        let (mut sender, connection) = http1::handshake(TokioIo::new(stream)).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("Connection error: {}", e);
            }
        });

        let response = sender.send_request(hyper_request).await?;
        let status = response.status();
        let headers = Headers::from(response.headers());
        let body = response.into_body().collect().await?.to_bytes().to_vec();
        debug!(
            "#send({} {}): {} received, {} byte(s) of body",
            outgoing.method,
            uri,
            status,
            body.len()
        );
        Ok(Response::new(request.clone(), status, headers, body))
    }
}
