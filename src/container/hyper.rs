use crate::container::exchange::Exchange;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use log::{debug, warn};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// The actual HTTP server answering incoming requests from the queue held by `exchange`.
///
/// It stops accepting connections as soon as `shutdown_signal` resolves - either because a
/// value was sent or because the sender was dropped. The listener is dropped (and the port
/// released) before `closed` is notified. Connections accepted before the shutdown are then
/// driven to completion.
pub(super) async fn run_server(
    listener: std::net::TcpListener,
    exchange: Arc<Exchange>,
    mut shutdown_signal: tokio::sync::oneshot::Receiver<()>,
    closed: std::sync::mpsc::Sender<()>,
) {
    let listener = match TcpListener::from_std(listener) {
        Ok(listener) => listener,
        Err(e) => {
            warn!("Mock container cannot listen: {}", e);
            let _ = closed.send(());
            return;
        }
    };
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        // Typically out of file descriptors, which in-flight connections free.
                        warn!("Failed to accept a connection: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                };
                debug!("Accepted a connection from {}", peer);
                let exchange = exchange.clone();
                connections.spawn(async move {
                    let service = service_fn(move |request| {
                        let exchange = exchange.clone();
                        async move { Ok::<_, Infallible>(exchange.handle(request).await) }
                    });
                    // One query per connection: the answer queue is consumed in lock-step with
                    // accepted connections.
                    if let Err(e) = http1::Builder::new()
                        .keep_alive(false)
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        if e.is_parse() {
                            // hyper answers `400 Bad Request` on its own: the request never
                            // reaches the exchange, so there is no query to record.
                            warn!("Malformed request from {}: {}", peer, e);
                        } else {
                            debug!("Connection with {} failed: {}", peer, e);
                        }
                    }
                });
            }
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = &mut shutdown_signal => break,
        }
    }

    drop(listener);
    let _ = closed.send(());

    while connections.join_next().await.is_some() {}
}
