//! Expiry Sweep Task
//!
//! Background task that periodically scans expiry side collections and
//! removes the entries whose expiry has passed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::entry::{current_timestamp_ms, ExpiryRecord, EXPIRES_PATTERN};
use crate::cache::{HashStore, SweepStats};

/// Interval between sweeps when none is configured.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(5000);

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Expiry collections inspected
    pub collections: usize,
    /// Entries removed from their owning collection
    pub expired: u64,
    /// Collections or records skipped because of an error
    pub failures: u64,
}

/// Runs one sweep pass over every `*:expires` collection.
///
/// Never fails: a broken collection or record is logged, counted and
/// skipped so the rest of the scan still runs. Expiry records whose entry
/// is already gone are removed without complaint.
pub async fn sweep_expired<S>(store: &S, now_ms: i64) -> SweepReport
where
    S: HashStore + ?Sized,
{
    let mut report = SweepReport::default();

    let names = match store.scan_match(EXPIRES_PATTERN).await {
        Ok(names) => names,
        Err(err) => {
            warn!("Expiry sweep: scan failed: {}", err);
            report.failures += 1;
            return report;
        }
    };

    for name in names {
        report.collections += 1;

        let raw_records = match store.hvals(&name).await {
            Ok(values) => values,
            Err(err) => {
                warn!("Expiry sweep: cannot read '{}': {}", name, err);
                report.failures += 1;
                continue;
            }
        };

        for raw in raw_records {
            let record = match ExpiryRecord::decode(&raw) {
                Ok(record) => record,
                Err(err) => {
                    warn!("Expiry sweep: corrupt record in '{}': {}", name, err);
                    report.failures += 1;
                    continue;
                }
            };

            if !record.is_expired_at(now_ms) {
                continue;
            }

            // the key may have been rewritten since the hvals read
            match store.hget(&name, &record.key).await {
                Ok(Some(current)) => match ExpiryRecord::decode(&current) {
                    Ok(current) if current.at == record.at => {}
                    _ => continue,
                },
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        "Expiry sweep: cannot re-read record '{}' from '{}': {}",
                        record.key, name, err
                    );
                    report.failures += 1;
                    continue;
                }
            }

            match store.hdel(&record.name, &record.key).await {
                Ok(removed) => report.expired += removed,
                Err(err) => {
                    // keep the record so the next pass retries
                    warn!(
                        "Expiry sweep: cannot delete '{}' from '{}': {}",
                        record.key, record.name, err
                    );
                    report.failures += 1;
                    continue;
                }
            }

            if let Err(err) = store.hdel(&name, &record.key).await {
                warn!(
                    "Expiry sweep: cannot drop record '{}' from '{}': {}",
                    record.key, name, err
                );
                report.failures += 1;
            }
        }
    }

    report
}

/// Spawns a background task that sweeps `store` every `interval`.
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop sweeping.
///
/// # Example
/// ```ignore
/// let stats = Arc::new(RwLock::new(SweepStats::new()));
/// let handle = spawn_sweep_task(store.clone(), DEFAULT_SWEEP_INTERVAL, stats);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<S>(
    store: Arc<S>,
    interval: Duration,
    stats: Arc<RwLock<SweepStats>>,
) -> JoinHandle<()>
where
    S: HashStore + ?Sized,
{
    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = sweep_expired(store.as_ref(), current_timestamp_ms()).await;
            stats.write().await.record(&report);

            if report.expired > 0 {
                info!("Expiry sweep: removed {} expired entries", report.expired);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
