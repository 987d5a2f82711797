//! Poll driver: the sequential fetch → project → flush loop.
//!
//! One domain at a time, round-robin, with a fixed sleep after each flush.
//! No backoff, no jitter, no parallelism — a failed cycle is logged and the
//! domain simply waits for its next turn.
//!
//! ## Rust concepts
//! - generic struct over the [`PixelSink`] implementation
//! - disjoint closure captures: the cache borrows the client's fetch
//!   future while both live on `self`
//! - loop labels for breaking the round-robin from the inner loop

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use chrono::Utc;

use crate::cache::SnapshotStore;
use crate::client::{Resource, StatusClient};
use crate::error::Error;
use crate::render;
use crate::sink::{PixelSink, push_frame};
use crate::status::{IncidentList, LiveStatus, Summary};
use crate::{MAX_AGE_STATUS, MAX_AGE_SUMMARY, is_running};

/// Runtime settings for the poll loop, assembled from the CLI.
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Status page domains, polled in order.
    pub domains: Vec<String>,
    /// Sleep between domains.
    pub interval: Duration,
    /// Panel brightness factor in `0.0..=1.0`.
    pub brightness: f32,
    /// Panel rotation in degrees.
    pub rotation: u16,
}

/// Split the CLI's single positional argument into domains.
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(String::from).collect()
}

/// The cached summary's indicator is authoritative for the overall band
/// only while younger than the short freshness threshold.
fn summary_indicator_is_fresh(age_seconds: u64) -> bool {
    age_seconds <= MAX_AGE_STATUS
}

/// Owns the client, the snapshot store, and the display for the lifetime
/// of the process.
pub struct PollDriver<S> {
    client: StatusClient,
    store: SnapshotStore,
    sink: S,
    config: PollConfig,
}

impl<S: PixelSink> PollDriver<S> {
    pub fn new(client: StatusClient, store: SnapshotStore, sink: S, config: PollConfig) -> Self {
        Self {
            client,
            store,
            sink,
            config,
        }
    }

    /// Run until `running` goes false (Ctrl-C).
    ///
    /// Fetch and render failures never end the loop: the domain is skipped
    /// for this cycle and retried on its next round-robin turn.
    pub async fn run(&mut self, running: &AtomicBool) {
        let domains = self.config.domains.clone();

        'poll: loop {
            for domain in &domains {
                if !is_running(running) {
                    break 'poll;
                }

                tracing::info!(%domain, "polling status page");
                if let Err(err) = self.cycle(domain).await {
                    tracing::error!(%domain, %err, "cycle failed, skipping domain until its next turn");
                }

                tokio::time::sleep(self.config.interval).await;
            }
        }

        tracing::info!("poll loop stopped");
    }

    /// One domain's cycle: summary → overall indicator → incidents →
    /// frame → panel.
    async fn cycle(&mut self, domain: &str) -> Result<(), Error> {
        let now = Utc::now();

        let (payload, age) = self
            .store
            .get(domain, Resource::Summary, now, MAX_AGE_SUMMARY, || {
                self.client.fetch(domain, Resource::Summary)
            })
            .await?;
        let summary: Summary = serde_json::from_value(payload)?;
        tracing::info!(age_seconds = age, "summary snapshot");

        // The summary is cached for hours, which is fine for component and
        // incident detail but too coarse for the headline band. Once the
        // snapshot is older than the short threshold, ask for the current
        // indicator directly; status.json is never cached.
        let live_indicator = if summary_indicator_is_fresh(age) {
            None
        } else {
            tracing::info!(age_seconds = age, "summary too old for the overall band, fetching live status");
            let live: LiveStatus =
                serde_json::from_value(self.client.fetch(domain, Resource::Status).await?)?;
            Some(live.status.indicator)
        };

        let (payload, _) = self
            .store
            .get(domain, Resource::Incidents, now, MAX_AGE_SUMMARY, || {
                self.client.fetch(domain, Resource::Incidents)
            })
            .await?;
        let incidents: IncidentList = serde_json::from_value(payload)?;

        let frame = render::render(&summary, live_indicator, &incidents, now);
        push_frame(
            &mut self.sink,
            &frame,
            self.config.brightness,
            self.config.rotation,
        );

        Ok(())
    }
}
