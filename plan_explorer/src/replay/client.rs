use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use url::Url;

use super::{Fixture, ReplayPlan};
use crate::error::{ExplorerError, Result};

/// One answered request.
#[derive(Clone, Debug)]
pub struct ReplayResponse {
    pub target: String,
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub sent: usize,
    pub failed: usize,
}

/// Replays fixtures against the planner service, strictly one request at a time.
pub struct Replayer {
    client: reqwest::Client,
    host: Url,
    delay: Duration,
}

impl Replayer {
    pub fn new(host: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|source| ExplorerError::Http {
                url: host.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            host,
            delay: Duration::ZERO,
        })
    }

    /// Pause between consecutive requests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    /// `<host>/<segment>`, keeping any path prefix of the host.
    pub fn endpoint(&self, segment: &str) -> Result<Url> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| ExplorerError::Url {
                raw: self.host.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// `GET /clear`, then `PUT /<target>` per fixture. Every response is handed
    /// to `on_response` as soon as it arrives. Transport failures abort the run.
    pub async fn run(
        &self,
        plan: &ReplayPlan,
        mut on_response: impl FnMut(&ReplayResponse),
    ) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();

        let clear = self.endpoint("clear")?;
        let response = self
            .client
            .get(clear.clone())
            .send()
            .await
            .map_err(|source| ExplorerError::Http {
                url: clear.to_string(),
                source,
            })?;
        if !response.status().is_success() {
            tracing::warn!("GET {clear} returned {}", response.status());
        }

        for (i, fixture) in plan.fixtures.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let answered = self.put(fixture).await?;
            report.sent += 1;
            if !answered.status.is_success() {
                report.failed += 1;
                tracing::warn!(
                    "PUT /{} ({}) returned {}",
                    answered.target,
                    fixture.path.display(),
                    answered.status
                );
            }
            on_response(&answered);
        }

        tracing::info!(
            "replayed {} requests against {} ({} failed)",
            report.sent,
            self.host,
            report.failed
        );
        Ok(report)
    }

    async fn put(&self, fixture: &Fixture) -> Result<ReplayResponse> {
        let url = self.endpoint(&fixture.name.target)?;
        tracing::debug!("PUT {url} <- {}", fixture.path.display());
        let http_error = |source| ExplorerError::Http {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(fixture.body.clone())
            .send()
            .await
            .map_err(http_error)?;
        let status = response.status();
        let body = response.text().await.map_err(http_error)?;
        Ok(ReplayResponse {
            target: fixture.name.target.clone(),
            status,
            body,
        })
    }

    /// Runs [`Replayer::run`] on a current-thread runtime.
    pub fn run_blocking(
        &self,
        plan: &ReplayPlan,
        on_response: impl FnMut(&ReplayResponse),
    ) -> Result<ReplayReport> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ExplorerError::Runtime)?;
        rt.block_on(self.run(plan, on_response))
    }
}
