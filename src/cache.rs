//! Snapshot cache: timestamped JSON payloads on disk, one file per
//! `(domain, resource)` pair.
//!
//! A snapshot's `fetched_at` is the file's modification time, so the store
//! needs no index of its own and survives process restarts for free. `now`
//! is always passed in by the caller, which keeps freshness decisions
//! deterministic under test.
//!
//! ## Rust concepts
//! - generic `FnOnce() -> impl Future` parameter for the fetch callback
//! - `SystemTime` → `chrono::DateTime` conversion for age arithmetic
//! - treating unreadable state as a miss instead of an error

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::client::Resource;
use crate::error::Error;

/// File-backed key-value store for fetched JSON snapshots.
///
/// Owned by the poll driver; there are no process-wide singletons. The
/// baseline design is single-threaded, so entries are never accessed
/// concurrently.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Store snapshots under `dir` (typically the OS temp dir).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get-or-fetch with a per-resource expiry.
    ///
    /// Returns the payload plus its age in seconds:
    /// - no cached entry → `fetch`, store, age 0;
    /// - entry older than `expiry_seconds` → refetch, overwrite, age 0;
    /// - otherwise → cached payload with its computed age.
    ///
    /// An unreadable or corrupt entry counts as a miss and is refetched.
    /// Fetch failures are not retried; they propagate to the caller.
    pub async fn get<F, Fut>(
        &self,
        domain: &str,
        resource: Resource,
        now: DateTime<Utc>,
        expiry_seconds: u64,
        fetch: F,
    ) -> Result<(Value, u64), Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, Error>>,
    {
        let path = self.entry_path(domain, resource);

        if let Some(age) = entry_age(&path, now) {
            if age <= expiry_seconds {
                match read_entry(&path) {
                    Ok(payload) => return Ok((payload, age)),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "unreadable snapshot, refetching");
                    }
                }
            } else {
                tracing::debug!(
                    resource = resource.as_str(),
                    age,
                    expiry_seconds,
                    "snapshot expired"
                );
            }
        }

        let payload = fetch().await?;
        write_entry(&path, &payload)?;
        Ok((payload, 0))
    }

    fn entry_path(&self, domain: &str, resource: Resource) -> PathBuf {
        self.dir
            .join(format!("hat-status-{domain}-{}.json", resource.as_str()))
    }
}

/// Age in whole seconds of the file at `path`, or `None` if it does not
/// exist (or its mtime cannot be read — same thing to us).
fn entry_age(path: &Path, now: DateTime<Utc>) -> Option<u64> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let fetched_at: DateTime<Utc> = modified.into();
    // mtime in the future (clock changed) reads as a fresh entry
    Some((now - fetched_at).num_seconds().max(0) as u64)
}

fn read_entry(path: &Path) -> Result<Value, Error> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_entry(path: &Path, payload: &Value) -> Result<(), Error> {
    fs::write(path, serde_json::to_vec_pretty(payload)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::Cell;
    use tempfile::TempDir;

    const EXPIRY: u64 = 3600;

    fn sample() -> Value {
        json!({ "status": { "indicator": "none" }, "components": [] })
    }

    /// Seed a cache entry on disk and return the `now` at which it is
    /// exactly `age_seconds` old (derived from the real file mtime).
    fn seed(store: &SnapshotStore, bytes: &[u8], age_seconds: i64) -> DateTime<Utc> {
        let path = store.entry_path("example.com", Resource::Summary);
        fs::write(&path, bytes).unwrap();
        let fetched_at: DateTime<Utc> = fs::metadata(&path).unwrap().modified().unwrap().into();
        fetched_at + Duration::seconds(age_seconds)
    }

    #[tokio::test]
    async fn miss_fetches_and_stores_with_age_zero() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        let (payload, age) = store
            .get("example.com", Resource::Summary, Utc::now(), EXPIRY, || async {
                Ok(sample())
            })
            .await
            .unwrap();

        assert_eq!(age, 0);
        assert_eq!(payload, sample());

        // entry landed on disk and is replayable
        let path = store.entry_path("example.com", Resource::Summary);
        assert_eq!(read_entry(&path).unwrap(), sample());
    }

    #[tokio::test]
    async fn fresh_entry_is_served_without_fetching() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let cached = json!({ "status": { "indicator": "minor" } });
        let now = seed(&store, &serde_json::to_vec(&cached).unwrap(), EXPIRY as i64 - 1);

        // a fetch here would fail the whole call, so Ok proves it was skipped
        let (payload, age) = store
            .get("example.com", Resource::Summary, now, EXPIRY, || async {
                Err(Error::Api {
                    status: 500,
                    url: "unexpected fetch".to_string(),
                })
            })
            .await
            .unwrap();

        assert_eq!(age, EXPIRY - 1);
        assert_eq!(payload, cached);
    }

    #[tokio::test]
    async fn expired_entry_triggers_exactly_one_refetch() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let stale = json!({ "status": { "indicator": "critical" } });
        let now = seed(&store, &serde_json::to_vec(&stale).unwrap(), EXPIRY as i64 + 1);

        let calls = Cell::new(0u32);
        let (payload, age) = store
            .get("example.com", Resource::Summary, now, EXPIRY, || {
                calls.set(calls.get() + 1);
                async { Ok(sample()) }
            })
            .await
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(age, 0);
        assert_eq!(payload, sample());

        // the stale entry was overwritten in place
        let path = store.entry_path("example.com", Resource::Summary);
        assert_eq!(read_entry(&path).unwrap(), sample());
    }

    #[tokio::test]
    async fn corrupt_entry_counts_as_miss() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());
        let now = seed(&store, b"not json at all", 10);

        let calls = Cell::new(0u32);
        let (payload, age) = store
            .get("example.com", Resource::Summary, now, EXPIRY, || {
                calls.set(calls.get() + 1);
                async { Ok(sample()) }
            })
            .await
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(age, 0);
        assert_eq!(payload, sample());
    }

    #[tokio::test]
    async fn fetch_error_propagates() {
        let tmp = TempDir::new().unwrap();
        let store = SnapshotStore::new(tmp.path());

        let result = store
            .get("example.com", Resource::Incidents, Utc::now(), EXPIRY, || async {
                Err(Error::Api {
                    status: 503,
                    url: "https://example.com/api/v2/incidents.json".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(Error::Api { status: 503, .. })));
    }

    #[test]
    fn entries_are_keyed_by_domain_and_resource() {
        let store = SnapshotStore::new("/tmp");
        assert_eq!(
            store.entry_path("www.githubstatus.com", Resource::Incidents),
            PathBuf::from("/tmp/hat-status-www.githubstatus.com-incidents.json")
        );
    }
}
