use crate::wire::{Outgoing, Wire};
use crate::{Error, Request, Response};
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use std::time::Duration;

/// Retries the request when the network fails, up to three attempts in total.
///
/// Only transport failures are retried (see [`Error::is_transport`]). Any HTTP response,
/// whatever its status, is returned as it is.
#[derive(Debug)]
pub struct RetryWire {
    origin: Arc<dyn Wire>,
    attempts: usize,
    delay: Duration,
}

impl RetryWire {
    pub fn new(origin: Arc<dyn Wire>) -> Self {
        Self {
            origin,
            attempts: 3,
            delay: Duration::from_millis(100),
        }
    }

    /// Give up after `attempts` attempts. At least one attempt is always made.
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Wait `delay` between two attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Wire for RetryWire {
    async fn send(&self, request: &Request, outgoing: Outgoing) -> Result<Response, Error> {
        let mut attempt = 1;
        loop {
            match self.origin.send(request, outgoing.clone()).await {
                Err(e) if e.is_transport() && attempt < self.attempts => {
                    warn!(
                        "#send({} {}): attempt #{} failed, retrying in {:?}: {}",
                        outgoing.method, outgoing.uri, attempt, self.delay, e
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                result => return result,
            }
        }
    }
}
