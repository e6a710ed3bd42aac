//! All bits and pieces concerning the HTTP mock container are in this module.
//!
//! [`MockContainer`] is the "front-end" used by tests. It drives the server running in the
//! background, defined in the `hyper` sub-module, through the queues held by an `Exchange`
//! (see the `exchange` sub-module).
mod exchange;
mod hyper;

use crate::print::BodyPrintLimit;
use crate::{Error, MkAnswer, MkQuery};
use exchange::Exchange;
use log::{info, warn};
use std::net::{SocketAddr, TcpListener};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use url::Url;

/// An HTTP server running in the background, answering requests with a script of
/// [`MkAnswer`]s and recording every request it receives as a [`MkQuery`].
///
/// There is no routing: the `n`-th request received gets the `n`-th answer queued with
/// [`MockContainer::next`], whatever its method, path or headers. Tests are expected to drive
/// requests and answers in lock-step.
///
/// ### Example:
/// ```rust
/// use mockwire::{MkAnswer, MockContainer, Request, RestResponse};
///
/// #[tokio::main]
/// async fn main() {
///     // Arrange
///     let mut container = MockContainer::new();
///     container.next(MkAnswer::text("works fine!"));
///     let home = container.start().unwrap();
///
///     // Act
///     let response = Request::new(home.as_str()).unwrap().fetch().await.unwrap();
///
///     // Assert
///     RestResponse::new(response)
///         .assert_status(200)
///         .assert_body(|body| body.starts_with("works"));
///     container.stop();
///     assert_eq!(container.take().unwrap().method(), "GET");
/// }
/// ```
#[derive(Debug)]
pub struct MockContainer {
    exchange: Arc<Exchange>,
    running: Option<Running>,
}

/// The handle over a background server that is currently listening.
#[derive(Debug)]
struct Running {
    address: SocketAddr,
    home: Url,
    // When `shutdown_trigger` gets dropped, or used, the server stops accepting connections.
    shutdown_trigger: tokio::sync::oneshot::Sender<()>,
    // Behind a lock to keep `MockContainer` shareable across threads.
    closed: Mutex<mpsc::Receiver<()>>,
}

impl Default for MockContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContainer {
    /// An idle container, with default configuration: call [`MockContainer::start`] to have it
    /// listen.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Use `MockContainer::builder` if you need to specify custom configuration.
    pub fn builder() -> MockContainerBuilder {
        MockContainerBuilder::new()
    }

    /// Give this answer on the next request (after all the answers already queued).
    ///
    /// It can be called before or after [`MockContainer::start`], from any thread.
    pub fn next(&self, answer: MkAnswer) -> &Self {
        self.exchange.next(answer);
        self
    }

    /// Remove and return the oldest request received.
    ///
    /// It never waits: if no request has been received yet, it fails with
    /// [`Error::NothingReceived`].
    pub fn take(&self) -> Result<MkQuery, Error> {
        self.exchange.take()
    }

    /// Start listening on a random port available on the local machine.
    ///
    /// Returns the home URI of the container, the same one returned by [`MockContainer::home`].
    pub fn start(&mut self) -> Result<Url, Error> {
        self.start_on(0)
    }

    /// Start listening on the provided port.
    ///
    /// It fails with [`Error::AlreadyStarted`] if the container is listening already.
    pub fn start_on(&mut self, port: u16) -> Result<Url, Error> {
        if let Some(running) = &self.running {
            return Err(Error::AlreadyStarted(running.address.port()));
        }
        let listener = TcpListener::bind(("127.0.0.1", port))?;
        listener.set_nonblocking(true)?;
        let address = listener.local_addr()?;
        let home = format!("http://localhost:{}/", address.port());
        let home = Url::parse(&home).map_err(|e| Error::invalid_uri(home.as_str(), e))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (shutdown_trigger, shutdown_receiver) = tokio::sync::oneshot::channel();
        let (closed_sender, closed) = mpsc::channel();
        let exchange = self.exchange.clone();
        thread::Builder::new()
            .name(format!("mockwire-{}", address.port()))
            .spawn(move || {
                runtime.block_on(self::hyper::run_server(
                    listener,
                    exchange,
                    shutdown_receiver,
                    closed_sender,
                ))
            })?;

        info!("Mock container started on port #{}", address.port());
        self.running = Some(Running {
            address,
            home: home.clone(),
            shutdown_trigger,
            closed: Mutex::new(closed),
        });
        Ok(home)
    }

    /// Stop listening.
    ///
    /// It blocks until the port is released. Requests already accepted are still answered.
    /// The container can be started again afterwards, keeping its queues as they are.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            let port = running.address.port();
            let _ = running.shutdown_trigger.send(());
            let closed = running
                .closed
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner);
            if closed.recv().is_err() {
                warn!("Mock container on port #{} terminated abruptly", port);
            }
            info!("Mock container stopped on port #{}", port);
        }
    }

    /// The home URI of the running container, e.g. `http://localhost:4372/`.
    pub fn home(&self) -> Result<Url, Error> {
        self.running
            .as_ref()
            .map(|running| running.home.clone())
            .ok_or(Error::NotStarted)
    }

    /// The port the container listens on, `0` if it is not started.
    pub fn port(&self) -> u16 {
        self.running
            .as_ref()
            .map_or(0, |running| running.address.port())
    }

    /// The socket address of the running container, e.g. `127.0.0.1:4372`.
    ///
    /// Use this method to interact with the container using `TcpStream`s.
    pub fn address(&self) -> Option<&SocketAddr> {
        self.running.as_ref().map(|running| &running.address)
    }
}

impl Drop for MockContainer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A builder providing a fluent API to assemble a [`MockContainer`] step-by-step.
/// Use [`MockContainer::builder`] to get started.
#[derive(Debug)]
pub struct MockContainerBuilder {
    body_print_limit: BodyPrintLimit,
}

impl MockContainerBuilder {
    fn new() -> Self {
        Self {
            body_print_limit: BodyPrintLimit::default(),
        }
    }

    /// The container logs every query it receives and embeds it in the body of its `500`
    /// responses. By default, the size of the printed body is limited (see [`BodyPrintLimit`]).
    pub fn body_print_limit(mut self, limit: BodyPrintLimit) -> Self {
        self.body_print_limit = limit;
        self
    }

    /// Finalise the builder to get an idle [`MockContainer`].
    pub fn build(self) -> MockContainer {
        MockContainer {
            exchange: Arc::new(Exchange::new(self.body_print_limit)),
            running: None,
        }
    }
}
