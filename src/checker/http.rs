// src/checker/http.rs
// =============================================================================
// This module checks external links by making HTTP requests.
//
// Key functionality:
// - Makes HTTP HEAD requests (lightweight, no body download)
// - Falls back to GET when the server answers 405 Method Not Allowed
// - Retries transport failures (connection errors, timeouts) with a growing
//   delay; an HTTP error status is the server's answer and is NOT retried
// - Caches every final answer so the same URL is only probed once per run
// - Runs checks concurrently, never more than `concurrency` at once
//
// One link, step by step:
//
//   ignored?  -> Skipped (no network, no cache)
//   cached?   -> cached result
//   attempt 1 -> Settled(result)      -> cache + return
//             -> Retryable(error)     -> sleep 1s, attempt 2
//   attempt 2 -> ...                  -> sleep 2s, attempt 3
//   last      -> Retryable(Timeout)   -> Timeout
//             -> Retryable(Network)   -> Broken
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Generics: the validator works with any Transport
// - Streams: For processing many items concurrently
// =============================================================================

use super::cache::ResultCache;
use super::ignore::IgnoreRules;
use super::transport::{ProbeMethod, ProbeResponse, ReqwestTransport, Transport, TransportError};
use super::types::{ExtractedLink, LinkCheckResult, LinkStatus};
use crate::config::Config;
use crate::error::Result;
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

const METHOD_NOT_ALLOWED: u16 = 405;

// Base unit of the linear backoff between attempts
const BACKOFF_STEP: Duration = Duration::from_millis(1000);

// How one attempt ended
enum AttemptOutcome {
    /// The server gave an answer (good or bad); stop here
    Settled(LinkCheckResult),
    /// No answer; worth another try if attempts remain
    Retryable(TransportError),
}

pub struct ExternalValidator<T = ReqwestTransport> {
    transport: T,
    cache: Arc<ResultCache>,
    ignore: IgnoreRules,
    timeout: Duration,
    retries: u32,
    concurrency: usize,
}

impl ExternalValidator<ReqwestTransport> {
    // Validator with a real HTTP client and a fresh cache
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Self::with_transport(config, transport, Arc::new(ResultCache::new()))
    }
}

impl<T: Transport> ExternalValidator<T> {
    // Validator over any transport, sharing an existing cache
    pub fn with_transport(config: &Config, transport: T, cache: Arc<ResultCache>) -> Result<Self> {
        let ignore = IgnoreRules::new(&config.ignore_patterns, &config.ignore_domains)?;

        Ok(Self {
            transport,
            cache,
            ignore,
            timeout: config.timeout_duration(),
            retries: config.retries,
            // Zero would stall the stream forever
            concurrency: config.concurrency.max(1),
        })
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    // Checks multiple links concurrently
    //
    // Up to `concurrency` probes are in flight at any moment; as soon as one
    // finishes the next link starts. Results come back in completion order.
    pub async fn validate_all(&self, links: &[ExtractedLink]) -> Vec<LinkCheckResult> {
        stream::iter(links.iter().map(|link| self.validate(link)))
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    // Checks a single external link
    pub async fn validate(&self, link: &ExtractedLink) -> LinkCheckResult {
        if self.ignore.matches(&link.href) {
            debug!(href = %link.href, "skipping ignored link");
            return LinkCheckResult::new(link.clone(), LinkStatus::Skipped);
        }

        if let Some((cached, age)) = self.cache.get(&link.href) {
            debug!(href = %link.href, age_ms = age.as_millis() as u64, "cache hit");
            return cached.reattach(link.clone());
        }

        let started = Instant::now();
        let attempts = self.retries.saturating_add(1);
        let mut attempt = 1;

        let result = loop {
            match self.attempt(link, started).await {
                AttemptOutcome::Settled(result) => break result,
                AttemptOutcome::Retryable(error) if attempt < attempts => {
                    let backoff = BACKOFF_STEP.saturating_mul(attempt);
                    debug!(
                        href = %link.href,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        %error,
                        "probe failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                AttemptOutcome::Retryable(error) => break self.transport_failure(link, error, started),
            }
        };

        self.cache.put(&link.href, result.clone());
        result
    }

    // One attempt: HEAD, plus GET if HEAD is rejected, all under one deadline
    //
    // The GET only replaces the HEAD answer when it succeeds; a failing GET
    // leaves the 405 as the reported status.
    async fn attempt(&self, link: &ExtractedLink, started: Instant) -> AttemptOutcome {
        let probe = async {
            let head = self.transport.probe(ProbeMethod::Head, &link.href).await?;
            if head.status == METHOD_NOT_ALLOWED {
                debug!(href = %link.href, "HEAD not allowed, falling back to GET");
                let get = self.transport.probe(ProbeMethod::Get, &link.href).await?;
                if get.is_success() {
                    return Ok(get);
                }
            }
            Ok(head)
        };

        match tokio::time::timeout(self.timeout, probe).await {
            Ok(Ok(response)) => AttemptOutcome::Settled(self.analyze_response(link, response, started)),
            Ok(Err(error)) => AttemptOutcome::Retryable(error),
            Err(_elapsed) => AttemptOutcome::Retryable(TransportError::Timeout),
        }
    }

    // Analyzes an HTTP response to determine link status
    //
    // Redirects were already followed by the transport, so anything other
    // than 2xx here is a failure.
    fn analyze_response(
        &self,
        link: &ExtractedLink,
        response: ProbeResponse,
        started: Instant,
    ) -> LinkCheckResult {
        let result = LinkCheckResult::new(link.clone(), LinkStatus::Valid)
            .with_status_code(response.status)
            .with_response_time(started.elapsed());

        if response.is_success() {
            return match moved_to(&link.href, response.final_url.as_deref()) {
                Some(destination) => result.with_redirect(destination),
                None => result,
            };
        }

        let error = match response.reason.as_deref() {
            Some(reason) => format!("{} {}", response.status, reason),
            None => response.status.to_string(),
        };

        LinkCheckResult {
            status: LinkStatus::Broken,
            ..result
        }
        .with_error(error)
    }

    // The last attempt failed below the HTTP layer
    fn transport_failure(
        &self,
        link: &ExtractedLink,
        error: TransportError,
        started: Instant,
    ) -> LinkCheckResult {
        let (status, message) = match error {
            TransportError::Timeout => (
                LinkStatus::Timeout,
                format!("Timeout after {}ms", self.timeout.as_millis()),
            ),
            TransportError::Network(message) => (LinkStatus::Broken, message),
        };

        LinkCheckResult::new(link.clone(), status)
            .with_error(message)
            .with_response_time(started.elapsed())
    }
}

// The final URL, if redirects took us somewhere meaningfully different
fn moved_to(href: &str, final_url: Option<&str>) -> Option<String> {
    let final_url = final_url?;
    let same = match (Url::parse(href), Url::parse(final_url)) {
        // Parsing normalizes things like a missing trailing "/" on the host
        (Ok(original), Ok(destination)) => original == destination,
        _ => href == final_url,
    };
    (!same).then(|| final_url.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Transport trait?
//    - The retry/timeout/cache logic doesn't care how HTTP is done
//    - Tests swap in a fake transport that counts calls and simulates
//      failures, so they never touch the network
//
// 2. What is buffer_unordered?
//    - Runs up to N futures at once and yields results as they finish
//    - Works like a semaphore: a new check only starts when one finishes
//
// 3. Why tokio::time::timeout around the whole attempt?
//    - The HEAD and the fallback GET share one deadline
//    - If the timer fires first, the in-flight request future is dropped,
//      which cancels it
//
// 4. What is a match guard (`if attempt < attempts`)?
//    - An extra condition on a match arm; if it's false, matching moves on
//      to the next arm, which handles the "out of attempts" case
//
// 5. Why Arc<ResultCache>?
//    - Arc = shared ownership across tasks; several validators (or a later
//      run in the same process) can use the same cache
// -----------------------------------------------------------------------------
