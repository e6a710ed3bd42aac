use crate::print::BodyPrintLimit;
use crate::{Error, MkAnswer, MkQuery};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use log::{debug, warn};
use std::collections::VecDeque;
use std::fmt::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The state shared between a [`MockContainer`] and the connections it is serving: the answers
/// still to give and the queries received so far.
///
/// Both queues are plain FIFOs behind their own lock. Locks are never held across an `.await`
/// and never both at once.
///
/// [`MockContainer`]: crate::MockContainer
#[derive(Debug)]
pub(super) struct Exchange {
    answers: Mutex<VecDeque<MkAnswer>>,
    queries: Mutex<VecDeque<MkQuery>>,
    body_print_limit: BodyPrintLimit,
}

impl Exchange {
    pub(super) fn new(body_print_limit: BodyPrintLimit) -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            queries: Mutex::new(VecDeque::new()),
            body_print_limit,
        }
    }

    pub(super) fn next(&self, answer: MkAnswer) {
        lock(&self.answers).push_back(answer);
    }

    pub(super) fn take(&self) -> Result<MkQuery, Error> {
        lock(&self.queries)
            .pop_front()
            .ok_or(Error::NothingReceived)
    }

    /// Record the incoming request and give out the oldest answer.
    ///
    /// It never fails: whatever goes wrong is turned into a `500 Internal Server Error`
    /// describing the failure, so that the client gets a well-formed response instead of a
    /// hung or dropped connection.
    pub(super) async fn handle(
        &self,
        request: hyper::Request<hyper::body::Incoming>,
    ) -> Response<Full<Bytes>> {
        let query = match MkQuery::from_hyper(request).await {
            Ok(query) => query,
            Err(e) => return self.fail(Error::Transport(e), None),
        };
        let mut printed = String::new();
        let _ = query.print_with_limit(&mut printed, self.body_print_limit);
        debug!("Received query:\n{}", printed);

        let received = {
            let mut queries = lock(&self.queries);
            queries.push_back(query);
            queries.len()
        };
        let answer = lock(&self.answers).pop_front();
        match answer {
            Some(answer) => match answer.render() {
                Ok(response) => response,
                Err(e) => self.fail(e, Some(&printed)),
            },
            None => self.fail(Error::NoAnswer { received }, Some(&printed)),
        }
    }

    fn fail(&self, failure: Error, query: Option<&str>) -> Response<Full<Bytes>> {
        warn!("Failed to answer a request: {}", failure);
        let mut text = String::new();
        let _ = writeln!(text, "{}", failure);
        if let Some(query) = query {
            let _ = write!(text, "\nReceived query:\n{}", query);
        }

        let mut response = Response::new(Full::new(Bytes::from(text.clone())));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from(text.len()));
        response
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A queue stays consistent even if a holder of the lock panicked.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
