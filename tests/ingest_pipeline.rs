// tests/ingest_pipeline.rs
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use radiogrid::ingest::types::SourceProvider;
use radiogrid::ingest::{run_once, SourceFetch};
use radiogrid::schedule::{ScheduleItem, DISPLAY_TZ};

fn warsaw_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&DISPLAY_TZ)
}

struct MockProvider {
    name: &'static str,
    offsets_min: Vec<i64>,
}

#[async_trait]
impl SourceProvider for MockProvider {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleItem>> {
        let base = warsaw_now();
        Ok(self
            .offsets_min
            .iter()
            .map(|&m| ScheduleItem::starting_at(self.name, base + Duration::minutes(m)))
            .collect())
    }
    fn name(&self) -> &'static str {
        self.name
    }
}

struct BrokenProvider;

#[async_trait]
impl SourceProvider for BrokenProvider {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleItem>> {
        Err(anyhow!("upstream returned 503"))
    }
    fn name(&self) -> &'static str {
        "broken"
    }
}

#[tokio::test]
async fn run_once_backfills_and_orders_sources() {
    let providers: Vec<Arc<dyn SourceProvider>> = vec![
        Arc::new(MockProvider {
            name: "zeta",
            offsets_min: vec![-30, 30, 90],
        }),
        Arc::new(MockProvider {
            name: "alfa",
            offsets_min: vec![-10, 50],
        }),
    ];

    let fetch: SourceFetch = run_once(&providers).await;
    assert!(fetch.failed.is_empty());

    let names: Vec<&str> = fetch.schedules.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(names, vec!["alfa", "zeta"]);

    for schedule in &fetch.schedules {
        let items = &schedule.items;
        for i in 0..items.len() - 1 {
            assert_eq!(items[i].end_time_millis, Some(items[i + 1].start_time_millis));
        }
        assert_eq!(items.last().unwrap().end_time_millis, None);
    }
}

#[tokio::test]
async fn one_broken_provider_does_not_sink_the_rest() {
    let providers: Vec<Arc<dyn SourceProvider>> = vec![
        Arc::new(BrokenProvider),
        Arc::new(MockProvider {
            name: "alive",
            offsets_min: vec![0, 60],
        }),
    ];

    let fetch = run_once(&providers).await;
    assert_eq!(fetch.failed, vec!["broken".to_string()]);
    assert_eq!(fetch.schedules.len(), 1);
    assert_eq!(fetch.schedules[0].source, "alive");
}

#[tokio::test]
async fn zero_providers_yield_an_empty_fetch() {
    let fetch = run_once(&[]).await;
    assert!(fetch.schedules.is_empty());
    assert!(fetch.failed.is_empty());
    assert!(fetch.per_source().is_empty());
}

#[tokio::test]
async fn fetch_feeds_the_layout_pipeline_end_to_end() {
    let providers: Vec<Arc<dyn SourceProvider>> = vec![
        Arc::new(MockProvider {
            name: "a",
            offsets_min: vec![-60, -15, 45, 120],
        }),
        Arc::new(MockProvider {
            name: "b",
            offsets_min: vec![-20, 30],
        }),
    ];

    let fetch = run_once(&providers).await;
    let now = warsaw_now();
    let items = radiogrid::select_window(&fetch.per_source(), now);
    assert!(!items.is_empty());

    let grid = radiogrid::compose(&items, now);
    assert_eq!(grid.sources, vec!["a".to_string(), "b".to_string()]);
    assert!(grid
        .boundaries
        .windows(2)
        .all(|w| w[0].millis <= w[1].millis));

    let (band_start, band_end) = grid.now_band;
    assert!(band_start < band_end);
    assert_eq!(
        grid.boundaries[band_end].millis - grid.boundaries[band_start].millis,
        60_000
    );
}
