//! Radio Nowy Świat: scraped from the public `ramowka` page. One
//! `rns-switcher-list` per day, one `rns-switcher-single` per segment
//! with an `HH:MM` label; authors are the anchor links inside the names
//! block, the remaining text is the description.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::providers::{
    align_first_date, clean_text, clean_text_multiline, parse_hhmm, today, zoned,
};
use crate::ingest::types::SourceProvider;
use crate::schedule::ScheduleItem;

pub const SOURCE: &str = "rns";
pub const BASE_URL: &str = "https://nowyswiat.online/";
#[cfg(feature = "ingest-http")]
pub const UPSTREAM_URL: &str = "https://nowyswiat.online/ramowka";

pub struct RnsProvider {
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

impl RnsProvider {
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
static RE_LIST: OnceCell<Regex> = OnceCell::new();
static RE_SINGLE: OnceCell<Regex> = OnceCell::new();
static RE_TIME: OnceCell<Regex> = OnceCell::new();
static RE_TITLE: OnceCell<Regex> = OnceCell::new();
static RE_NAMES: OnceCell<Regex> = OnceCell::new();
static RE_ANCHOR: OnceCell<Regex> = OnceCell::new();
static RE_BR: OnceCell<Regex> = OnceCell::new();
static RE_IMG: OnceCell<Regex> = OnceCell::new();

/// Parse the schedule page against an explicit date.
pub fn parse_page(page: &str, today: NaiveDate) -> Result<Vec<ScheduleItem>> {
    let t0 = std::time::Instant::now();

    let re_date = re(
        &RE_DATE,
        r#"(?is)class="[^"]*rns-week-switcher-date[^"]*"[^>]*>(.*?)<"#,
    );
    let first_label = re_date
        .captures(page)
        .map(|c| clean_text(&c[1]))
        .ok_or_else(|| anyhow!("missing week switcher date"))?;
    let first_date = align_first_date(today, &first_label)?;

    let re_list = re(&RE_LIST, r#"class="[^"]*rns-switcher-list"#);
    let lists: Vec<&str> = re_list.split(page).skip(1).collect();
    if lists.is_empty() {
        return Err(anyhow!("missing switcher lists"));
    }

    let re_single = re(&RE_SINGLE, r#"class="[^"]*rns-switcher-single"#);
    let re_time = re(
        &RE_TIME,
        r#"(?is)class="[^"]*rns-switcher-time[^"]*"[^>]*>(.*?)<"#,
    );
    let re_title = re(
        &RE_TITLE,
        r#"(?is)class="[^"]*rns-switcher-title[^"]*"[^>]*>(.*?)<"#,
    );
    let re_names = re(
        &RE_NAMES,
        r#"(?is)class="[^"]*rns-switcher-names[^"]*"[^>]*>(.*?)</div>"#,
    );
    let re_anchor = re(&RE_ANCHOR, r#"(?is)<a[^>]*>(.*?)</a>"#);
    let re_br = re(&RE_BR, r#"(?i)<br\s*/?>"#);
    let re_img = re(&RE_IMG, r#"(?is)<img[^>]*src="([^"]*)""#);

    let mut out = Vec::new();
    for (day_idx, list) in lists.iter().enumerate() {
        let date = first_date + Duration::days(day_idx as i64);

        for chunk in re_single.split(list).skip(1) {
            let time_label = re_time
                .captures(chunk)
                .map(|c| clean_text(&c[1]))
                .ok_or_else(|| anyhow!("switcher entry without a time"))?;
            let (hour, minute) = parse_hhmm(&time_label)?;

            let mut item = ScheduleItem::starting_at(SOURCE, zoned(date, hour, minute)?);
            item.title = re_title
                .captures(chunk)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default();

            if let Some(names) = re_names.captures(chunk) {
                let block = &names[1];
                item.authors = re_anchor
                    .captures_iter(block)
                    .map(|c| clean_text(&c[1]).trim_end_matches(',').to_string())
                    .filter(|a| !a.is_empty())
                    .collect();
                // Description is the names block with the author links
                // removed and line breaks kept.
                let without_anchors = re_anchor.replace_all(block, "");
                let with_breaks = re_br.replace_all(&without_anchors, "\n");
                item.description = clean_text_multiline(&with_breaks)
                    .trim_start_matches('|')
                    .trim()
                    .to_string();
            }

            item.image_url = re_img
                .captures(chunk)
                .and_then(|c| resolve_image_url(&c[1]));
            out.push(item);
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("schedule_parse_ms").record(ms);
    counter!("schedule_items_total").increment(out.len() as u64);
    Ok(out)
}

/// Image paths on the page are relative to the site root.
fn resolve_image_url(src: &str) -> Option<String> {
    let base = reqwest::Url::parse(BASE_URL).ok()?;
    base.join(src).ok().map(String::from)
}

#[async_trait]
impl SourceProvider for RnsProvider {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleItem>> {
        match &self.mode {
            #[cfg(feature = "ingest-fixtures")]
            Mode::Fixture(s) => parse_page(s, today()),

            #[cfg(feature = "ingest-http")]
            Mode::Http { url, client } => {
                let body = client
                    .get(*url)
                    .send()
                    .await
                    .context("rns http get()")?
                    .text()
                    .await
                    .context("rns http .text()")?;
                parse_page(&body, today())
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
