// src/ingest/providers/mod.rs
pub mod r357;
pub mod rns;
pub mod tokfm;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::OnceCell;

use crate::schedule::DISPLAY_TZ;

use crate::ingest::types::SourceProvider;
use std::sync::Arc;

/// The three live providers, in column order.
#[cfg(feature = "ingest-http")]
pub fn default_providers() -> Vec<Arc<dyn SourceProvider>> {
    vec![
        Arc::new(r357::R357Provider::from_url(r357::UPSTREAM_URL)),
        Arc::new(rns::RnsProvider::from_url(rns::UPSTREAM_URL)),
        Arc::new(tokfm::TokfmProvider::from_url(tokfm::UPSTREAM_URL)),
    ]
}

#[cfg(not(feature = "ingest-http"))]
pub fn default_providers() -> Vec<Arc<dyn SourceProvider>> {
    panic!("default_providers called without feature `ingest-http`");
}

/// Today's calendar date in the display zone.
pub fn today() -> NaiveDate {
    chrono::Utc::now().with_timezone(&DISPLAY_TZ).date_naive()
}

/// Decode HTML entities and strip any remaining tags.
pub fn strip_markup(s: &str) -> String {
    let out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    re_tags.replace_all(&out, "").to_string()
}

/// Clean scraped text: decode HTML entities, strip tags, collapse
/// whitespace, trim.
pub fn clean_text(s: &str) -> String {
    let out = strip_markup(s);

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Like [`clean_text`] but keeps line breaks, collapsing only the
/// horizontal whitespace within each line.
pub fn clean_text_multiline(s: &str) -> String {
    let out = strip_markup(s);
    let lines: Vec<String> = out
        .lines()
        .map(|line| {
            static RE_HWS: OnceCell<regex::Regex> = OnceCell::new();
            let re_hws = RE_HWS.get_or_init(|| regex::Regex::new(r"[ \t]+").unwrap());
            re_hws.replace_all(line, " ").trim().to_string()
        })
        .collect();
    lines.join("\n").trim_matches('\n').to_string()
}

/// Parse an `HH:MM` clock label.
pub fn parse_hhmm(s: &str) -> Result<(u32, u32)> {
    let trimmed = s.trim();
    let (h, m) = trimmed
        .split_once(':')
        .ok_or_else(|| anyhow!("unexpected time format {trimmed:?}"))?;
    Ok((h.parse()?, m.parse()?))
}

/// Resolve a provider's `dd.mm` first-day label against today, scanning
/// back at most 7 days. Provider pages label their week with day and
/// month only; the year and the exact offset come from this scan. If no
/// day within a week matches, the scan bottoms out a week back, which
/// at worst shifts the schedule out of the selection window.
pub fn align_first_date(today: NaiveDate, first_label: &str) -> Result<NaiveDate> {
    static RE_DDMM: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_DDMM.get_or_init(|| regex::Regex::new(r"^(\d\d)\.(\d\d)$").unwrap());
    let caps = re
        .captures(first_label.trim())
        .ok_or_else(|| anyhow!("unexpected date format {first_label:?}"))?;
    let day: u32 = caps[1].parse()?;
    let month: u32 = caps[2].parse()?;

    let mut date = today;
    let mut back = 0;
    while back < 7 && (date.day() != day || date.month() != month) {
        date = date - Duration::days(1);
        back += 1;
    }
    Ok(date)
}

/// Zoned timestamp for a wall-clock time on a given Warsaw date. On a
/// DST gap or fold the earlier valid interpretation wins.
pub fn zoned(date: NaiveDate, hour: u32, minute: u32) -> Result<DateTime<Tz>> {
    DISPLAY_TZ
        .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, minute, 0)
        .earliest()
        .ok_or_else(|| anyhow!("nonexistent local time {date} {hour:02}:{minute:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_decodes_and_strips() {
        let s = "  <b>Hello&nbsp;world</b> &ldquo;ok&rdquo; <br/> done ";
        assert_eq!(clean_text(s), "Hello world “ok” done");
    }

    #[test]
    fn multiline_clean_keeps_breaks() {
        let s = "first  line\n\tsecond &amp; line\n";
        assert_eq!(clean_text_multiline(s), "first line\nsecond & line");
    }

    #[test]
    fn align_walks_back_to_the_labelled_day() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        let aligned = align_first_date(today, "09.05").unwrap();
        assert_eq!(aligned, NaiveDate::from_ymd_opt(2024, 5, 9).unwrap());
    }

    #[test]
    fn align_accepts_today_itself() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        assert_eq!(align_first_date(today, "12.05").unwrap(), today);
    }

    #[test]
    fn align_rejects_garbage_labels() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        assert!(align_first_date(today, "May 12").is_err());
        assert!(align_first_date(today, "2024-05-12").is_err());
    }

    #[test]
    fn hhmm_parses_and_rejects() {
        assert_eq!(parse_hhmm(" 07:30 ").unwrap(), (7, 30));
        assert!(parse_hhmm("730").is_err());
        assert!(parse_hhmm("ab:cd").is_err());
    }
}
