// src/ingest/mod.rs
pub mod providers;
pub mod scheduler;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use tokio::task::JoinSet;

use crate::ingest::types::SourceProvider;
use crate::schedule::{backfill_ends, ScheduleItem};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "schedule_items_total",
            "Total schedule items parsed from providers."
        );
        describe_counter!(
            "schedule_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!(
            "schedule_parse_ms",
            "Provider parse time in milliseconds."
        );
        describe_gauge!(
            "schedule_fetch_last_run_ts",
            "Unix ts when the schedule fetch last ran."
        );
    });
}

/// One provider's backfilled schedule, tagged with its source key.
#[derive(Debug, Clone)]
pub struct SourceSchedule {
    pub source: String,
    pub items: Vec<ScheduleItem>,
}

/// Result of fetching every provider once. Failures are per source so a
/// partial timeline can still render.
#[derive(Debug, Clone, Default)]
pub struct SourceFetch {
    pub schedules: Vec<SourceSchedule>,
    pub failed: Vec<String>,
}

impl SourceFetch {
    /// Per-source item slices in the shape the window selector takes.
    pub fn per_source(&self) -> Vec<&[ScheduleItem]> {
        self.schedules.iter().map(|s| s.items.as_slice()).collect()
    }
}

/// Fetch every provider concurrently and join before returning: the
/// layout pipeline never starts on a half-fetched universe. Each
/// per-source list gets its end times backfilled here, since providers
/// only supply starts. A failing provider is logged and reported by
/// name, never fatal.
pub async fn run_once(providers: &[Arc<dyn SourceProvider>]) -> SourceFetch {
    ensure_metrics_described();

    let mut set = JoinSet::new();
    for provider in providers {
        let provider = Arc::clone(provider);
        set.spawn(async move { (provider.name(), provider.fetch_schedule().await) });
    }

    let mut fetch = SourceFetch::default();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Ok(mut items))) => {
                backfill_ends(&mut items);
                fetch.schedules.push(SourceSchedule {
                    source: name.to_string(),
                    items,
                });
            }
            Ok((name, Err(e))) => {
                tracing::warn!(error = ?e, provider = name, "provider error");
                counter!("schedule_provider_errors_total").increment(1);
                fetch.failed.push(name.to_string());
            }
            Err(e) => {
                tracing::warn!(error = ?e, "provider task panicked");
            }
        }
    }

    // Join order is completion order; keep the output deterministic.
    fetch.schedules.sort_by(|a, b| a.source.cmp(&b.source));
    fetch.failed.sort();

    let now = chrono::Utc::now().timestamp().max(0) as u64;
    gauge!("schedule_fetch_last_run_ts").set(now as f64);

    fetch
}
