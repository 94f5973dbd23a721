// src/ingest/types.rs
use anyhow::Result;

use crate::schedule::ScheduleItem;

/// One upstream schedule provider. Implementations return the raw
/// per-source list, sorted ascending by start time, with no end times
/// set; the ingest layer backfills the ends.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleItem>>;
    fn name(&self) -> &'static str;
}
