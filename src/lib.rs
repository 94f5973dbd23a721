// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod grid;
pub mod ingest;
pub mod metrics;
pub mod schedule;
pub mod timeline;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::grid::{compose, GridBoundary, GridItem, ScheduleGrid};
pub use crate::schedule::{backfill_ends, millis, ScheduleItem, TimeBoundary, DISPLAY_TZ};
pub use crate::timeline::{build_boundaries, shows_label, size_tracks, TrackSize};
pub use crate::window::{select_window, select_window_with_horizon};
