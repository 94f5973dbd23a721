//! Radio 357: the `ramowka` endpoint returns JSON wrapping a rendered
//! HTML week view. One `swiper-slide` section per day, one
//! `podcastElement` per segment with a `data-hour` attribute; hours
//! smaller than the day's first hour belong to the small hours of the
//! next calendar day.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;

use crate::ingest::providers::{align_first_date, clean_text, today, zoned};
use crate::ingest::types::SourceProvider;
use crate::schedule::ScheduleItem;

pub const SOURCE: &str = "r357";
#[cfg(feature = "ingest-http")]
pub const UPSTREAM_URL: &str = "https://radio357.pl/xhr/ramowka/";

#[derive(Debug, Deserialize)]
struct Ramowka {
    document: String,
}

pub struct R357Provider {
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

impl R357Provider {
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

fn re(cell: &'static OnceCell<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static regex"))
}

static RE_DATE: OnceCell<Regex> = OnceCell::new();
static RE_SLIDE: OnceCell<Regex> = OnceCell::new();
static RE_PODCAST: OnceCell<Regex> = OnceCell::new();
static RE_HOUR: OnceCell<Regex> = OnceCell::new();
static RE_TITLE: OnceCell<Regex> = OnceCell::new();
static RE_AUTHOR: OnceCell<Regex> = OnceCell::new();
static RE_DESC: OnceCell<Regex> = OnceCell::new();
static RE_IMG: OnceCell<Regex> = OnceCell::new();

/// Parse the wrapped JSON payload against an explicit date.
pub fn parse_payload(body: &str, today: NaiveDate) -> Result<Vec<ScheduleItem>> {
    let ramowka: Ramowka = serde_json::from_str(body).context("parsing r357 ramowka json")?;
    parse_document(&ramowka.document, today)
}

/// Parse the embedded week-view HTML against an explicit date.
pub fn parse_document(document: &str, today: NaiveDate) -> Result<Vec<ScheduleItem>> {
    let t0 = std::time::Instant::now();

    let re_date = re(&RE_DATE, r#"(?is)class="[^"]*scheduleDate[^"]*"[^>]*>(.*?)<"#);
    let first_label = re_date
        .captures(document)
        .map(|c| clean_text(&c[1]))
        .ok_or_else(|| anyhow!("missing scheduleDate header"))?;
    let first_date = align_first_date(today, &first_label)?;

    // The nav carousel uses the same slider widget; only slides inside
    // the schedule list are day sections.
    let list_start = document
        .find(r#"id="scheduleList""#)
        .ok_or_else(|| anyhow!("missing scheduleList"))?;
    let list = &document[list_start..];

    let re_slide = re(&RE_SLIDE, r#"class="[^"]*swiper-slide"#);
    let slides: Vec<&str> = re_slide.split(list).skip(1).collect();
    if slides.is_empty() {
        return Err(anyhow!("missing schedule slides"));
    }

    let re_podcast = re(&RE_PODCAST, r#"class="[^"]*podcastElement"#);
    let re_hour = re(&RE_HOUR, r#"data-hour="(\d+)""#);
    let re_title = re(&RE_TITLE, r#"data-title="([^"]*)""#);
    let re_author = re(&RE_AUTHOR, r#"(?is)class="[^"]*podcastAuthor[^"]*"[^>]*>(.*?)</"#);
    let re_desc = re(&RE_DESC, r#"(?is)class="[^"]*podcastDesc[^"]*"[^>]*>(.*?)</div>"#);
    let re_img = re(&RE_IMG, r#"data-src="([^"]*)""#);

    let mut out = Vec::new();
    for (day_idx, slide) in slides.iter().enumerate() {
        let date = first_date + Duration::days(day_idx as i64);
        let mut first_hour_of_day: Option<u32> = None;

        for chunk in re_podcast.split(slide).skip(1) {
            let hour: u32 = re_hour
                .captures(chunk)
                .ok_or_else(|| anyhow!("podcast element without data-hour"))?[1]
                .parse()?;
            let first_hour = *first_hour_of_day.get_or_insert(hour);
            // Early-morning hours listed after late-evening ones roll
            // over into the next day.
            let date = if hour < first_hour {
                date + Duration::days(1)
            } else {
                date
            };

            let mut item = ScheduleItem::starting_at(SOURCE, zoned(date, hour, 0)?);
            item.title = re_title
                .captures(chunk)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default();
            item.authors = re_author
                .captures(chunk)
                .map(|c| {
                    clean_text(&c[1])
                        .split(',')
                        .map(|a| a.trim().to_string())
                        .filter(|a| !a.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            item.description = re_desc
                .captures(chunk)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default();
            item.image_url = re_img.captures(chunk).map(|c| c[1].to_string());
            out.push(item);
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("schedule_parse_ms").record(ms);
    counter!("schedule_items_total").increment(out.len() as u64);
    Ok(out)
}

#[async_trait]
impl SourceProvider for R357Provider {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleItem>> {
        match &self.mode {
            #[cfg(feature = "ingest-fixtures")]
            Mode::Fixture(s) => parse_payload(s, today()),

            #[cfg(feature = "ingest-http")]
            Mode::Http { url, client } => {
                let body = client
                    .get(*url)
                    .send()
                    .await
                    .context("r357 http get()")?
                    .text()
                    .await
                    .context("r357 http .text()")?;
                parse_payload(&body, today())
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
