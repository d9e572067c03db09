use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use thiserror::Error;
use tokio::time::{sleep, Duration, Instant};
use url::Url;

/// Fixed-interval polling budget. The wall-clock deadline is the only
/// thing that stops the loop; there is no backoff and no attempt cap.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub timeout_ms: u64,
    pub interval_ms: u64,
    // bounds a single probe, so one hung request cannot eat the deadline
    pub attempt_timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            timeout_ms: 30_000,
            interval_ms: 500,
            attempt_timeout_ms: 2_000,
        }
    }
}

impl PollConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }
}

/// Outcome of a single probe. Transport failures and non-2xx statuses
/// both land in `NotReady`, since neither can be told apart from a
/// server that simply has not finished booting.
#[derive(Debug)]
pub enum ProbeStatus {
    Ready,
    NotReady(String),
}

#[async_trait]
pub trait Probe: Send + Sync {
    fn target(&self) -> &Url;

    async fn check(&self) -> ProbeStatus;
}

pub struct HttpProbe {
    url: Url,
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(url: Url, attempt_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(attempt_timeout)
            .build()?;
        Ok(HttpProbe { url, client })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn target(&self) -> &Url {
        &self.url
    }

    async fn check(&self) -> ProbeStatus {
        match self.client.get(self.url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => ProbeStatus::Ready,
            Ok(resp) => ProbeStatus::NotReady(format!("status {}", resp.status())),
            Err(err) => ProbeStatus::NotReady(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {}ms waiting for {url}", timeout.as_millis())]
    Timeout { url: Url, timeout: Duration },
}

/// Polls `probe` every `interval_ms` until it reports `Ready`, or until
/// `timeout_ms` of wall-clock time has passed. A timeout of zero means
/// exactly one attempt.
pub async fn wait_until_ready(probe: &dyn Probe, config: &PollConfig) -> Result<(), WaitError> {
    let timeout = config.timeout();
    let interval = config.interval();
    let deadline = Instant::now() + timeout;

    log::info!(
        "waiting up to {}ms for {}",
        config.timeout_ms,
        probe.target()
    );
    loop {
        match probe.check().await {
            ProbeStatus::Ready => {
                log::info!("{} is ready", probe.target());
                return Ok(());
            }
            ProbeStatus::NotReady(reason) => {
                log::debug!("{} not ready yet: {}", probe.target(), reason);
            }
        }
        if Instant::now() >= deadline {
            break;
        }
        sleep(interval).await;
        if Instant::now() >= deadline {
            break;
        }
    }

    Err(WaitError::Timeout {
        url: probe.target().clone(),
        timeout,
    })
}
