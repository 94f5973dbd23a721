//! # Grid Composer
//! Thin mapping from the windowed items and the sized time axis to the
//! row/column placement data the frontend renders. Columns are keyed by
//! source, rows by boundary index, and the live band spans the two
//! synthetic boundaries around "now".

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::schedule::{millis, ScheduleItem};
use crate::timeline::{build_boundaries, live_band_end, shows_label, size_tracks, TrackSize};

/// One axis row: a boundary plus everything the renderer needs for it.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBoundary {
    pub instant: DateTime<Tz>,
    pub millis: i64,
    pub size: TrackSize,
    /// Time label rendered at this row (suppressed inside the live slot).
    pub shows_label: bool,
    /// Date cell rendered when the calendar day changes at this row.
    pub date_header: bool,
}

impl Serialize for GridBoundary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("GridBoundary", 5)?;
        s.serialize_field("instant", &self.instant.to_rfc3339())?;
        s.serialize_field("millis", &self.millis)?;
        s.serialize_field("size", &self.size)?;
        s.serialize_field("showsLabel", &self.shows_label)?;
        s.serialize_field("dateHeader", &self.date_header)?;
        s.end()
    }
}

/// One placed segment: column key plus row span as boundary indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    pub source: String,
    pub row_start: usize,
    pub row_end: usize,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub image_url: Option<String>,
}

/// Complete layout description for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGrid {
    pub items: Vec<GridItem>,
    pub boundaries: Vec<GridBoundary>,
    /// Distinct sources present in `items`, lexicographically sorted.
    pub sources: Vec<String>,
    /// Boundary indices delimiting the live band.
    pub now_band: (usize, usize),
}

/// Compose the final layout from an already-selected window. Tolerates
/// an empty window: the result then carries only the two synthetic
/// boundaries and no items.
pub fn compose(items: &[ScheduleItem], now: DateTime<Tz>) -> ScheduleGrid {
    let boundaries = build_boundaries(items, now);
    let sizes = size_tracks(&boundaries, now);

    // Row lookup by millis; the first occurrence wins when a synthetic
    // boundary duplicates an item boundary.
    let mut rows: HashMap<i64, usize> = HashMap::new();
    for (idx, boundary) in boundaries.iter().enumerate() {
        rows.entry(boundary.millis).or_insert(idx);
    }

    let grid_boundaries: Vec<GridBoundary> = boundaries
        .iter()
        .zip(sizes)
        .enumerate()
        .map(|(idx, (boundary, size))| GridBoundary {
            instant: boundary.instant,
            millis: boundary.millis,
            size,
            shows_label: shows_label(boundary.instant, now),
            date_header: idx == 0 || {
                let previous = boundaries[idx - 1].instant;
                (previous.year(), previous.ordinal()) != (boundary.instant.year(), boundary.instant.ordinal())
            },
        })
        .collect();

    let grid_items: Vec<GridItem> = items
        .iter()
        .filter_map(|item| {
            // The selector only admits items with an end; anything else
            // is a contract violation we skip rather than crash on.
            let end_ms = item.end_time_millis?;
            let row_start = *rows.get(&item.start_time_millis)?;
            let row_end = *rows.get(&end_ms)?;
            Some(GridItem {
                source: item.source.clone(),
                row_start,
                row_end,
                title: item.title.clone(),
                authors: item.authors.clone(),
                description: item.description.clone(),
                image_url: item.image_url.clone(),
            })
        })
        .collect();

    let sources: Vec<String> = items
        .iter()
        .map(|item| item.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let now_band = (
        *rows
            .get(&millis(now))
            .expect("synthetic now boundary is always present"),
        *rows
            .get(&millis(live_band_end(now)))
            .expect("synthetic now+1min boundary is always present"),
    );

    ScheduleGrid {
        items: grid_items,
        boundaries: grid_boundaries,
        sources,
        now_band,
    }
}
