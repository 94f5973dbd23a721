//! # Schedule data model
//! One broadcast segment per [`ScheduleItem`], one row divider per
//! [`TimeBoundary`]. All identity and ordering goes through epoch
//! milliseconds; the zoned timestamps exist for display only and are
//! rebuilt from the millis on deserialization, so a JSON round trip
//! preserves the integers exactly.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed display timezone for every provider and for the grid.
pub const DISPLAY_TZ: Tz = chrono_tz::Europe::Warsaw;

/// Epoch milliseconds of a zoned timestamp.
pub fn millis(time: DateTime<Tz>) -> i64 {
    time.timestamp_millis()
}

/// Rebuild the zoned display timestamp from epoch milliseconds.
pub fn from_millis(ms: i64) -> Option<DateTime<Tz>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|utc| utc.with_timezone(&DISPLAY_TZ))
}

/// One broadcast segment from one provider. The end fields stay empty
/// until [`backfill_ends`] runs; a source's open-ended last item keeps
/// them empty for good.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleItem {
    pub source: String,
    pub start_time: DateTime<Tz>,
    pub start_time_millis: i64,
    pub end_time: Option<DateTime<Tz>>,
    pub end_time_millis: Option<i64>,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub image_url: Option<String>,
}

impl ScheduleItem {
    /// Build an item with the millis derived from `start_time` and no end.
    pub fn starting_at(source: &str, start_time: DateTime<Tz>) -> Self {
        Self {
            source: source.to_string(),
            start_time,
            start_time_millis: millis(start_time),
            end_time: None,
            end_time_millis: None,
            title: String::new(),
            authors: Vec::new(),
            description: String::new(),
            image_url: None,
        }
    }
}

impl Serialize for ScheduleItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ScheduleItem", 9)?;
        s.serialize_field("source", &self.source)?;
        s.serialize_field("startTime", &self.start_time.to_rfc3339())?;
        s.serialize_field("startTimeMillis", &self.start_time_millis)?;
        s.serialize_field("endTime", &self.end_time.map(|t| t.to_rfc3339()))?;
        s.serialize_field("endTimeMillis", &self.end_time_millis)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("authors", &self.authors)?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field("imageUrl", &self.image_url)?;
        s.end()
    }
}

/// Wire shape for deserialization. The RFC 3339 strings are ignored;
/// the millis fields are authoritative.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleItemWire {
    source: String,
    start_time_millis: i64,
    #[serde(default)]
    end_time_millis: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: Option<String>,
}

impl<'de> Deserialize<'de> for ScheduleItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ScheduleItemWire::deserialize(deserializer)?;
        let start_time = from_millis(wire.start_time_millis)
            .ok_or_else(|| serde::de::Error::custom("startTimeMillis out of range"))?;
        let end_time = match wire.end_time_millis {
            Some(ms) => Some(
                from_millis(ms)
                    .ok_or_else(|| serde::de::Error::custom("endTimeMillis out of range"))?,
            ),
            None => None,
        };
        Ok(ScheduleItem {
            source: wire.source,
            start_time,
            start_time_millis: wire.start_time_millis,
            end_time,
            end_time_millis: wire.end_time_millis,
            title: wire.title,
            authors: wire.authors,
            description: wire.description,
            image_url: wire.image_url,
        })
    }
}

/// A distinct point on the time axis. Two boundaries are the same point
/// iff their `millis` are equal, whatever the zoned representation says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBoundary {
    pub instant: DateTime<Tz>,
    pub millis: i64,
}

impl TimeBoundary {
    pub fn new(instant: DateTime<Tz>) -> Self {
        Self {
            instant,
            millis: millis(instant),
        }
    }
}

/// Fill each item's end time from the next item's start time, in place.
/// The last item keeps no end (providers never say when a schedule ends).
/// Idempotent; no-op for empty or single-item input.
pub fn backfill_ends(items: &mut [ScheduleItem]) {
    for idx in 1..items.len() {
        let start = items[idx].start_time;
        let previous = &mut items[idx - 1];
        previous.end_time = Some(start);
        previous.end_time_millis = Some(millis(start));
    }
}
