//! Executes core `HttpRequest` values over the network with ureq.

use anyhow::Context;
use hawksoft_core::{HttpMethod, HttpRequest, HttpResponse};

/// Blocking executor around a shared ureq agent.
///
/// Status codes are returned as data (`http_status_as_error(false)`) so the
/// core client decides what a 404 or 401 means.
pub struct Transport {
    agent: ureq::Agent,
}

impl Transport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn execute(&self, req: HttpRequest) -> anyhow::Result<HttpResponse> {
        tracing::debug!(method = req.method.as_str(), url = %req.url, "sending request");

        let result = match req.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&req.url);
                for (k, v) in &req.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&req.url);
                for (k, v) in &req.headers {
                    builder = builder.header(k.as_str(), v.as_str());
                }
                let body = req.body.unwrap_or_default();
                builder.send(body.as_bytes())
            }
        };
        let mut response = result.with_context(|| format!("request to {} failed", req.url))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .context("failed to read response body")?;

        tracing::debug!(status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
