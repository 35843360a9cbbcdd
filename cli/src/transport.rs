//! ureq-backed `Transport` for the host binary.

use std::time::Duration;

use rsvp_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes gateway requests with a blocking ureq agent.
///
/// Status-code-as-error is disabled so 4xx/5xx responses reach the core as
/// data; only I/O failures come back as `Err`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = match (req.method, req.body) {
            (HttpMethod::Get, _) => {
                let mut builder = self.agent.get(&req.url);
                for (key, value) in &req.headers {
                    builder = builder.header(key, value);
                }
                builder.call()?
            }
            (HttpMethod::Post, body) => {
                let mut builder = self.agent.post(&req.url);
                for (key, value) in &req.headers {
                    builder = builder.header(key, value);
                }
                match body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse { status, headers, body })
    }
}
