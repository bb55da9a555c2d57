// src/checker/transport.rs
// =============================================================================
// The HTTP capability the external validator needs, as a trait.
//
// A Transport sends one request (HEAD or GET) and reports the final status
// after following redirects. It does NOT enforce the per-attempt deadline;
// the validator wraps each attempt in tokio::time::timeout, so any transport
// gets the same timeout behaviour.
//
// ReqwestTransport is the real one. Tests plug in fakes that count calls.
// =============================================================================

use reqwest::redirect::Policy;
use reqwest::Client;
use std::future::Future;
use thiserror::Error;

// Sent with every probe so site owners can tell who is knocking
pub const USER_AGENT: &str = concat!("mdx-linklist/", env!("CARGO_PKG_VERSION"), " (Link Checker)");

// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    /// Headers only, no body download
    Head,
    /// Full retrieval, for servers that reject HEAD
    Get,
}

// What came back from one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Reason phrase, e.g. "Not Found"
    pub reason: Option<String>,
    /// Where the redirects ended up (None if the transport doesn't know)
    pub final_url: Option<String>,
}

impl ProbeResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            final_url: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Failures below the HTTP layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request ran out of time
    #[error("request timed out")]
    Timeout,
    /// Connection refused, DNS failure, TLS problem, ...
    #[error("{0}")]
    Network(String),
}

pub trait Transport: Send + Sync {
    fn probe(
        &self,
        method: ProbeMethod,
        url: &str,
    ) -> impl Future<Output = Result<ProbeResponse, TransportError>> + Send;
}

// Transport backed by a shared reqwest::Client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn probe(&self, method: ProbeMethod, url: &str) -> Result<ProbeResponse, TransportError> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };

        let response = request.send().await.map_err(categorize_error)?;
        let status = response.status();

        Ok(ProbeResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            final_url: Some(response.url().to_string()),
        })
    }
}

// Maps reqwest errors onto the two cases the validator cares about
fn categorize_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}
