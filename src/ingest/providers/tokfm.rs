//! TOK FM: JSON schedule from the `getsch` endpoint. Past entries carry
//! `emission_time`, the live entry `start_time`, both as `HH:MM` on
//! today's Warsaw date.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::providers::{parse_hhmm, today, zoned};
use crate::ingest::types::SourceProvider;
use crate::schedule::ScheduleItem;

pub const SOURCE: &str = "tokfm";
#[cfg(feature = "ingest-http")]
pub const UPSTREAM_URL: &str = "https://audycje.tokfm.pl/getsch?ver=2021";

#[derive(Debug, Deserialize)]
struct Getsch {
    schedule: Vec<Entry>,
}

/// Union of the past-podcast and live-program entry shapes; only the
/// fields we map are listed, the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    emission_time: Option<String>,
    #[serde(default)]
    slider_title: String,
    #[serde(default)]
    podcast_name: String,
    #[serde(default)]
    leader_email: Option<String>,
    #[serde(default)]
    leader_img: Option<String>,
    #[serde(default)]
    podcast_img: Option<String>,
}

pub struct TokfmProvider {
    mode: Mode,
}

enum Mode {
    #[cfg(feature = "ingest-fixtures")]
    Fixture(String),
    #[cfg(feature = "ingest-http")]
    Http {
        url: &'static str,
        client: reqwest::Client,
    },
}

impl TokfmProvider {
    #[cfg(feature = "ingest-fixtures")]
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    #[cfg(feature = "ingest-http")]
    pub fn from_url(url: &'static str) -> Self {
        Self {
            mode: Mode::Http {
                url,
                client: reqwest::Client::new(),
            },
        }
    }
}

/// Parse the `getsch` JSON against an explicit date (testable without a
/// clock). Entries with an unparseable time are skipped, not fatal.
pub fn parse_schedule(body: &str, date: NaiveDate) -> Result<Vec<ScheduleItem>> {
    let t0 = std::time::Instant::now();
    let getsch: Getsch = serde_json::from_str(body).context("parsing tokfm getsch json")?;

    let mut out = Vec::with_capacity(getsch.schedule.len());
    for entry in getsch.schedule {
        let Some(time_label) = entry.start_time.as_deref().or(entry.emission_time.as_deref())
        else {
            continue;
        };
        let Ok((hour, minute)) = parse_hhmm(time_label) else {
            tracing::debug!(time = time_label, "skipping tokfm entry with bad time");
            continue;
        };
        let mut item = ScheduleItem::starting_at(SOURCE, zoned(date, hour, minute)?);
        item.title = entry.slider_title;
        item.description = entry.podcast_name;
        item.authors = entry
            .leader_email
            .filter(|email| !email.is_empty())
            .into_iter()
            .collect();
        item.image_url = entry.leader_img.or(entry.podcast_img);
        out.push(item);
    }

    // The feed mixes past and live entries; order by start before the
    // backfill downstream.
    out.sort_by_key(|item| item.start_time_millis);

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("schedule_parse_ms").record(ms);
    counter!("schedule_items_total").increment(out.len() as u64);
    Ok(out)
}

#[async_trait]
impl SourceProvider for TokfmProvider {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleItem>> {
        match &self.mode {
            #[cfg(feature = "ingest-fixtures")]
            Mode::Fixture(s) => parse_schedule(s, today()),

            #[cfg(feature = "ingest-http")]
            Mode::Http { url, client } => {
                let body = client
                    .get(*url)
                    .send()
                    .await
                    .context("tokfm http get()")?
                    .text()
                    .await
                    .context("tokfm http .text()")?;
                parse_schedule(&body, today())
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
