use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::payload::{self, SubmitResponse};
use crate::proxy;
use crate::stats::GameStats;

/// User agents sampled for per-account browser profiles.
const USER_AGENTS: [&str; 8] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 Edg/125.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:126.0) Gecko/20100101 Firefox/126.0",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Header set a given account presents on every request, mimicking the game's
/// web client. Assigned once per account and reused for the whole run.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: &'static str,
}

impl BrowserProfile {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            user_agent: USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())],
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::ORIGIN, HeaderValue::from_static(crate::GAME_ORIGIN));
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://spritetype.irys.xyz/"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("empty"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("cors"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("same-origin"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers
    }
}

/// Fixed-delay retry schedule for one submission call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

/// What one `submit` call produced.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The server answered 2xx; `success` inside the body may still be false.
    Accepted(SubmitResponse),
    /// HTTP 400 — the server definitively rejected the payload. Never retried.
    Rejected { message: String },
    /// Every attempt failed at the transport or HTTP level.
    NoResult,
}

impl SubmitOutcome {
    /// Application-level message carried by the outcome, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Accepted(resp) => resp.message.as_deref().or(resp.error.as_deref()),
            SubmitOutcome::Rejected { message } => Some(message),
            SubmitOutcome::NoResult => None,
        }
    }
}

/// HTTP client for the scoring API.
pub struct SubmitClient {
    base_api: String,
    probe_url: String,
    policy: RetryPolicy,
    submit_timeout: Duration,
    probe_timeout: Duration,
}

impl SubmitClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            base_api: settings.base_api.trim_end_matches('/').to_string(),
            probe_url: settings.probe_url.clone(),
            policy: RetryPolicy {
                max_attempts: settings.retry_attempts,
                delay: Duration::from_secs(settings.retry_delay_secs),
            },
            submit_timeout: Duration::from_secs(settings.submit_timeout_secs),
            probe_timeout: Duration::from_secs(settings.probe_timeout_secs),
        }
    }

    /// Submit one game result, retrying transient failures on a fixed delay.
    ///
    /// HTTP 400 is terminal and consumes a single attempt; any other HTTP or
    /// transport error is retried up to the policy ceiling, after which the
    /// call resolves to [`SubmitOutcome::NoResult`].
    pub async fn submit(
        &self,
        address: &str,
        profile: &BrowserProfile,
        stats: &GameStats,
        proxy: Option<&str>,
    ) -> Result<SubmitOutcome> {
        let payload = payload::build(address, stats);
        let body =
            serde_json::to_string(&payload).context("failed to encode submission payload")?;
        let url = format!("{}/submit-result", self.base_api);

        for attempt in 1..=self.policy.max_attempts {
            let client = self.http_client(self.submit_timeout, proxy)?;
            match self.attempt_submit(&client, &url, profile, &body).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    if attempt < self.policy.max_attempts {
                        debug!("submit attempt {attempt} failed: {e:#}, retrying");
                        tokio::time::sleep(self.policy.delay).await;
                    } else {
                        warn!("submit failed after {attempt} attempt(s): {e:#}");
                    }
                }
            }
        }
        Ok(SubmitOutcome::NoResult)
    }

    async fn attempt_submit(
        &self,
        client: &reqwest::Client,
        url: &str,
        profile: &BrowserProfile,
        body: &str,
    ) -> Result<SubmitOutcome> {
        let response = client
            .post(url)
            .headers(profile.headers())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(body.to_string())
            .send()
            .await
            .context("submit request failed")?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let parsed: SubmitResponse =
                response.json().await.context("unreadable rejection body")?;
            let message = parsed
                .error
                .or(parsed.message)
                .unwrap_or_else(|| "request rejected".to_string());
            return Ok(SubmitOutcome::Rejected { message });
        }
        if !status.is_success() {
            anyhow::bail!("submit returned HTTP {status}");
        }
        let parsed: SubmitResponse =
            response.json().await.context("unreadable submit response")?;
        Ok(SubmitOutcome::Accepted(parsed))
    }

    /// Liveness probe through the same proxy configuration submissions use.
    pub async fn check_connection(&self, proxy: Option<&str>) -> bool {
        match self.probe(proxy).await {
            Ok(true) => true,
            Ok(false) => {
                warn!("connectivity probe returned a non-success status");
                false
            }
            Err(e) => {
                warn!("connectivity probe failed: {e:#}");
                false
            }
        }
    }

    async fn probe(&self, proxy: Option<&str>) -> Result<bool> {
        let client = self.http_client(self.probe_timeout, proxy)?;
        let response = client.get(&self.probe_url).send().await?;
        Ok(response.status().is_success())
    }

    fn http_client(&self, timeout: Duration, proxy: Option<&str>) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(proxy_url) = proxy {
            builder = builder.proxy(proxy::build_proxy(proxy_url)?);
        }
        builder.build().context("failed to build HTTP client")
    }
}
