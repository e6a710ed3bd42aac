#![allow(clippy::needless_doctest_main)]
//! `mockwire` helps you test Rust code that talks HTTP, without a live network dependency.
//!
//! It has two halves:
//! - a [`MockContainer`], an HTTP server listening on a real local port that answers with a
//!   script of [`MkAnswer`]s, in order, and records every request it receives as a [`MkQuery`];
//! - a client side: a [`Request`] sent through a chain of composable [`Wire`]s (basic
//!   authentication, cookie merging, logging, retries...), and response views
//!   ([`RestResponse`], [`XmlResponse`], [`WebLinkingResponse`]) to assert on what came back and
//!   follow redirects and links.
//!
//! # Table of Contents
//! 1. [Getting started](#getting-started)
//! 2. [Wires](#wires)
//! 3. [Spying](#spying)
//! 4. [Logging](#logging)
//!
//! ## Getting started
//! ```rust
//! use mockwire::{MkAnswer, MockContainer, Request, RestResponse};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Start a background HTTP server on a random local port and script its answers:
//!     // the first request gets a redirect, the second one a greeting.
//!     let mut container = MockContainer::new();
//!     container
//!         .next(MkAnswer::new(303).with_header("Location", "/hello"))
//!         .next(MkAnswer::text("Hello, world!"));
//!     let home = container.start().unwrap();
//!
//!     // Send a request and follow the redirect.
//!     let response = Request::new(home.as_str()).unwrap().fetch().await.unwrap();
//!     let next = RestResponse::new(response)
//!         .assert_status(303)
//!         .follow()
//!         .unwrap();
//!     let response = RestResponse::new(next.fetch().await.unwrap());
//!     response.assert_status(200).assert_body_contains("Hello");
//!
//!     // Check what the server received.
//!     assert_eq!(container.take().unwrap().uri().path(), "/");
//!     assert_eq!(container.take().unwrap().uri().path(), "/hello");
//!     assert!(container.take().is_err());
//! }
//! ```
//!
//! ## Wires
//!
//! A [`Request`] is sent by a [`HyperWire`] unless told otherwise. Wrap it with more wires
//! using [`Request::through`]: each wire transforms the outgoing request and hands it over to
//! the next one. Check the [`wire`] module for the details.
//!
//! ## Spying
//!
//! There is no request matching: the container gives the `n`-th answer to the `n`-th request.
//! [`MockContainer::take`] returns the requests received, in arrival order, so that tests can
//! assert on them afterwards. If a request arrives when no answer is left, the container
//! answers `500` with a description of the problem in the body.
//!
//! ## Logging
//!
//! `mockwire` logs through the [`log`] facade and never installs a logger. Bodies are
//! truncated in logs and assertion failures according to [`BodyPrintLimit`]; the default limit
//! can be set with the `MOCKWIRE_BODY_PRINT_LIMIT` environment variable.
//!
//! [`log`]: https://docs.rs/log/
mod answer;
mod container;
mod error;
mod headers;
mod print;
mod query;
mod request;
mod response;
pub mod wire;
pub mod xml;

pub use answer::MkAnswer;
pub use container::{MockContainer, MockContainerBuilder};
pub use error::Error;
pub use headers::{normalize, Headers};
pub use http::{Method, StatusCode};
pub use print::{BodyPrintLimit, BODY_PRINT_LIMIT};
pub use query::MkQuery;
pub use request::Request;
pub use response::{Cookie, Link, Response, RestResponse, WebLinkingResponse, XmlResponse};
pub use wire::{
    BasicAuthWire, CookieOptimizingWire, HyperWire, Outgoing, RetryWire, VerboseWire, Wire,
};
