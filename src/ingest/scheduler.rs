// src/ingest/scheduler.rs
use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;

use crate::ingest::types::SourceProvider;
use crate::ingest::SourceFetch;

/// Shared snapshot of the latest fetch; the API reads it per request,
/// the refresh task swaps it whole. Layout outputs are never mutated in
/// place, only recomputed from the snapshot with a fresh "now".
pub type ScheduleSnapshot = Arc<RwLock<SourceFetch>>;

pub fn new_snapshot() -> ScheduleSnapshot {
    Arc::new(RwLock::new(SourceFetch::default()))
}

#[derive(Clone, Copy, Debug)]
pub struct RefreshCfg {
    pub interval_secs: u64,
}

/// Spawn the periodic refresh task. The first tick fires immediately,
/// so the snapshot is populated right after startup.
pub fn spawn_refresh(
    providers: Vec<Arc<dyn SourceProvider>>,
    snapshot: ScheduleSnapshot,
    cfg: RefreshCfg,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(cfg.interval_secs));
        loop {
            ticker.tick().await;
            let fetch = crate::ingest::run_once(&providers).await;

            tracing::info!(
                target: "ingest",
                sources = fetch.schedules.len(),
                failed = ?fetch.failed,
                "schedule refresh tick"
            );

            *snapshot.write().expect("snapshot lock poisoned") = fetch;
        }
    })
}
