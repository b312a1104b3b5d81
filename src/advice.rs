//! Coach advice gateway.
//!
//! An external generative-text service turns a per-task progress summary
//! into a short motivational tip. The call is fire-and-forget: it runs on a
//! worker thread, any failure degrades to a fixed fallback string, and a
//! newer request supersedes a pending one (stale replies are dropped, not
//! queued).

use crate::analytics::TaskProgress;
use anyhow::{Context, Result};
use std::env;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shown whenever the gateway is unavailable or errors out
pub const FALLBACK_ADVICE: &str = "Keep going! Small steps lead to big achievements.";

/// Environment variable naming the coach endpoint
pub const COACH_URL_ENV: &str = "FOCUSFLOW_COACH_URL";
/// Environment variable holding an optional bearer token
pub const COACH_TOKEN_ENV: &str = "FOCUSFLOW_COACH_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maps a progress summary to a short natural-language tip
pub trait AdviceSource: Send + Sync {
    fn fetch(&self, summary: &[TaskProgress]) -> Result<String>;
}

/// Build the coach prompt from the progress summary
fn build_prompt(summary: &[TaskProgress]) -> String {
    let data = serde_json::to_string(summary).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Act as a professional focus coach. Here are my focus tasks and progress today:\n\
         {data}\n\n\
         Provide a short (max 2 sentences), encouraging productivity tip based on this data. \
         If I'm doing well, celebrate. If I'm behind on goals, give a small tip to restart."
    )
}

/// HTTP-backed advice source.
///
/// Posts `{"prompt": ...}` as JSON to the configured endpoint and expects a
/// `{"text": ...}` reply. The service itself is a black box; only the two
/// field names matter here.
pub struct HttpAdviceSource {
    endpoint: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpAdviceSource {
    pub fn new(endpoint: String, token: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build coach HTTP client")?;
        Ok(Self {
            endpoint,
            token,
            client,
        })
    }

    /// Construct from `FOCUSFLOW_COACH_URL` / `FOCUSFLOW_COACH_TOKEN`.
    /// Returns None when no endpoint is configured.
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var(COACH_URL_ENV).ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }
        let token = env::var(COACH_TOKEN_ENV).ok().filter(|t| !t.is_empty());
        match Self::new(endpoint, token) {
            Ok(source) => Some(source),
            Err(err) => {
                tracing::warn!("coach client unavailable: {err:#}");
                None
            }
        }
    }
}

impl AdviceSource for HttpAdviceSource {
    fn fetch(&self, summary: &[TaskProgress]) -> Result<String> {
        let body = serde_json::json!({ "prompt": build_prompt(summary) });
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .context("Coach request failed")?
            .error_for_status()
            .context("Coach service returned an error status")?;

        let value: serde_json::Value = response.json().context("Coach reply was not JSON")?;
        let text = value
            .get("text")
            .and_then(|t| t.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .context("Coach reply missing text")?;
        Ok(text.to_string())
    }
}

/// Background advice fetcher with supersession.
///
/// Each `request` bumps a generation counter and spawns a worker thread;
/// `poll` drains finished replies and keeps only those from the current
/// generation, so an in-flight request is abandoned the moment a newer one
/// starts. Failures never escape the worker: they become the fallback
/// string.
pub struct AdviceFetcher {
    source: Option<Arc<dyn AdviceSource>>,
    tx: Sender<(u64, String)>,
    rx: Receiver<(u64, String)>,
    generation: u64,
}

impl AdviceFetcher {
    pub fn new(source: Option<Arc<dyn AdviceSource>>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            generation: 0,
        }
    }

    /// Kick off a fetch for this summary, superseding any pending request
    pub fn request(&mut self, summary: Vec<TaskProgress>) {
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();

        match &self.source {
            Some(source) => {
                let source = Arc::clone(source);
                thread::spawn(move || {
                    let advice = source.fetch(&summary).unwrap_or_else(|err| {
                        tracing::warn!("advice fetch failed: {err:#}");
                        FALLBACK_ADVICE.to_string()
                    });
                    // Receiver may be gone during shutdown
                    let _ = tx.send((generation, advice));
                });
            }
            None => {
                let _ = tx.send((generation, FALLBACK_ADVICE.to_string()));
            }
        }
    }

    /// Collect any finished reply from the current generation
    pub fn poll(&mut self) -> Option<String> {
        let mut latest = None;
        while let Ok((generation, advice)) = self.rx.try_recv() {
            if generation == self.generation {
                latest = Some(advice);
            }
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Vec<TaskProgress> {
        vec![TaskProgress {
            name: "Write thesis".to_string(),
            goal: 10.0,
            actual: 2.0,
            remaining: 8.0,
        }]
    }

    fn poll_until(fetcher: &mut AdviceFetcher) -> String {
        for _ in 0..200 {
            if let Some(advice) = fetcher.poll() {
                return advice;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("no advice arrived in time");
    }

    struct CannedSource(&'static str);

    impl AdviceSource for CannedSource {
        fn fetch(&self, _summary: &[TaskProgress]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSource;

    impl AdviceSource for FailingSource {
        fn fetch(&self, _summary: &[TaskProgress]) -> Result<String> {
            anyhow::bail!("service unreachable")
        }
    }

    /// Echoes the first task's name; a task named "slow" delays the reply
    struct EchoSource;

    impl AdviceSource for EchoSource {
        fn fetch(&self, summary: &[TaskProgress]) -> Result<String> {
            let name = summary[0].name.clone();
            if name == "slow" {
                thread::sleep(Duration::from_millis(100));
            }
            Ok(name)
        }
    }

    #[test]
    fn test_prompt_embeds_summary() {
        let prompt = build_prompt(&summary());
        assert!(prompt.contains("Write thesis"));
        assert!(prompt.contains("focus coach"));
        assert!(prompt.contains("max 2 sentences"));
    }

    #[test]
    fn test_fetcher_delivers_advice() {
        let mut fetcher = AdviceFetcher::new(Some(Arc::new(CannedSource("Nice pace!"))));
        fetcher.request(summary());
        assert_eq!(poll_until(&mut fetcher), "Nice pace!");
    }

    #[test]
    fn test_failure_degrades_to_fallback() {
        let mut fetcher = AdviceFetcher::new(Some(Arc::new(FailingSource)));
        fetcher.request(summary());
        assert_eq!(poll_until(&mut fetcher), FALLBACK_ADVICE);
    }

    #[test]
    fn test_missing_source_yields_fallback() {
        let mut fetcher = AdviceFetcher::new(None);
        fetcher.request(summary());
        assert_eq!(poll_until(&mut fetcher), FALLBACK_ADVICE);
    }

    #[test]
    fn test_newer_request_supersedes_pending_one() {
        let named = |name: &str| {
            vec![TaskProgress {
                name: name.to_string(),
                goal: 1.0,
                actual: 0.0,
                remaining: 1.0,
            }]
        };
        let mut fetcher = AdviceFetcher::new(Some(Arc::new(EchoSource)));

        fetcher.request(named("slow")); // pending, will come back stale
        fetcher.request(named("fast")); // current generation

        assert_eq!(poll_until(&mut fetcher), "fast");
        // Give the slow worker time to finish, then confirm it is dropped
        thread::sleep(Duration::from_millis(150));
        assert_eq!(fetcher.poll(), None);
    }
}
