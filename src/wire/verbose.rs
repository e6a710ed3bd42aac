use crate::print::{indent, print_body, BodyPrintLimit};
use crate::wire::{Outgoing, Wire};
use crate::{Error, Request, Response};
use async_trait::async_trait;
use log::info;
use std::fmt::Write;
use std::sync::Arc;

/// Logs, at `info` level, the request as it leaves and the response as it comes back.
///
/// Both are indented by two spaces. Bodies are printed up to the given [`BodyPrintLimit`].
#[derive(Debug)]
pub struct VerboseWire {
    origin: Arc<dyn Wire>,
    body_print_limit: BodyPrintLimit,
}

impl VerboseWire {
    pub fn new(origin: Arc<dyn Wire>) -> Self {
        Self {
            origin,
            body_print_limit: BodyPrintLimit::default(),
        }
    }

    /// Print bodies up to `body_print_limit` instead of the default limit.
    pub fn body_print_limit(mut self, body_print_limit: BodyPrintLimit) -> Self {
        self.body_print_limit = body_print_limit;
        self
    }

    fn print_outgoing(&self, outgoing: &Outgoing) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        write!(buffer, "{} {}", outgoing.method, outgoing.uri.path())?;
        if let Some(query) = outgoing.uri.query() {
            write!(buffer, "?{}", query)?;
        }
        writeln!(buffer, " HTTP/1.1")?;
        for (name, value) in &outgoing.headers {
            writeln!(buffer, "{}: {}", name, value)?;
        }
        writeln!(buffer)?;
        print_body(&mut buffer, &outgoing.body, self.body_print_limit)?;
        Ok(buffer)
    }
}

#[async_trait]
impl Wire for VerboseWire {
    async fn send(&self, request: &Request, outgoing: Outgoing) -> Result<Response, Error> {
        if let Ok(printed) = self.print_outgoing(&outgoing) {
            info!("#send({}):\n{}", outgoing.uri, indent(&printed));
        }
        let response = self.origin.send(request, outgoing).await?;
        let mut printed = String::new();
        if response
            .print_with_limit(&mut printed, self.body_print_limit)
            .is_ok()
        {
            info!("#send({}) returned:\n{}", request.uri(), indent(&printed));
        }
        Ok(response)
    }
}
