//! HTTP client for a mermaid.ink-compatible rendering service.

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE;
use tracing::debug;
use ureq::Agent;

use crate::error::DiagramError;

/// Placeholder artifact written when the service fails, so downstream
/// processing never stalls on a missing file.
const FAILED_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="360" height="40">"#,
    r##"<text x="10" y="25" fill="#b00020" font-family="sans-serif">"##,
    "diagram rendering failed</text></svg>"
);

/// Rendering seam between the document pipeline and the mermaid service.
///
/// An implementation must leave an artifact at `dest` in every non-error
/// outcome, including render failures reported by the service.
pub trait DiagramRenderer {
    /// Render a mermaid description to an SVG file at `dest`.
    ///
    /// Service-side failures are appended to `warnings` (one human-readable
    /// line each) and a placeholder artifact is written; only local I/O
    /// failures surface as errors.
    fn render_svg(
        &self,
        source: &str,
        dest: &Path,
        endpoint: &str,
        warnings: &mut Vec<String>,
    ) -> Result<(), DiagramError>;
}

/// Client for the mermaid.ink SVG endpoint.
///
/// Requests are `GET {server_url}/svg/{base64(source)}`. The agent is built
/// with `http_status_as_error(false)` so failure statuses can be classified
/// and their bodies read for the warning text.
pub struct MermaidClient {
    agent: Agent,
    server_url: String,
}

impl MermaidClient {
    /// Create a client for the given service URL.
    #[must_use]
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self { agent, server_url }
    }

    /// URL of the SVG rendering endpoint for `source`.
    fn svg_url(&self, source: &str) -> String {
        let encoded = BASE64_URL_SAFE.encode(source);
        format!("{}/svg/{encoded}", self.server_url)
    }
}

impl DiagramRenderer for MermaidClient {
    fn render_svg(
        &self,
        source: &str,
        dest: &Path,
        endpoint: &str,
        warnings: &mut Vec<String>,
    ) -> Result<(), DiagramError> {
        debug!(endpoint, "rendering mermaid diagram");
        debug!(source, "mermaid source");

        let data = match self.agent.get(&self.svg_url(source)).call() {
            Ok(response) => {
                let status = response.status();
                let mut body = response.into_body();
                if status.is_success() {
                    match body.read_to_vec() {
                        Ok(bytes) => Some(bytes),
                        Err(err) => {
                            warnings.push(format!(
                                "Error for {endpoint}: incomplete response body: {err}"
                            ));
                            None
                        }
                    }
                } else if status.as_u16() == 404 {
                    warnings.push(format!(
                        "Error for {endpoint}: HTTP 404 Not Found, maybe the \
                         diagram includes the character '?'"
                    ));
                    None
                } else {
                    let text = body
                        .read_to_string()
                        .unwrap_or_else(|_| String::from("(unable to read error body)"));
                    let reason = status.canonical_reason().unwrap_or("unknown status");
                    warnings.push(format!(
                        "Error for {endpoint}: {} {reason}: {text}",
                        status.as_u16()
                    ));
                    None
                }
            }
            Err(err) => {
                warnings.push(format!("Error for {endpoint}: no response: {err}"));
                None
            }
        };

        let contents: &[u8] = match &data {
            Some(bytes) => bytes,
            None => FAILED_SVG.as_bytes(),
        };
        std::fs::write(dest, contents).map_err(|source| DiagramError::Io {
            path: dest.to_path_buf(),
            source,
        })
    }
}
