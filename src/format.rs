use crate::consts::UNSET_PLACEHOLDER;
use crate::prelude::*;
use crate::types::{Instant, ZoneId};
use chrono::{Datelike, Timelike};

/// Calendar fields as they would read on a clock in a specific timezone at a
/// given instant.
///
/// `Display` renders the fixed `DD/MM/YYYY, HH:mm` convention (24-hour clock,
/// zero-padded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{day:02}/{month:02}/{year:04}, {hour:02}:{minute:02}")]
pub struct WallClock {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Re-derives the wall-clock fields `zone` would display for `instant`.
///
/// The projection is a property of the absolute instant: the same instant
/// projected across a DST transition picks up the zone's post-transition
/// offset, regardless of the wall clock it was originally entered with.
pub fn project_to_zone(instant: Instant, zone: ZoneId) -> WallClock {
    let local = instant.as_utc().with_timezone(&zone.tz());
    WallClock {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
    }
}

/// Renders an endpoint for the read-only preview: the zone's civil time for a
/// set endpoint, an em-dash placeholder for an unset one.
///
/// Pure function of its arguments; safe to call repeatedly and concurrently.
pub fn format_in_zone(instant: Option<Instant>, zone: ZoneId) -> String {
    match instant {
        None => UNSET_PLACEHOLDER.to_owned(),
        Some(instant) => project_to_zone(instant, zone).to_string(),
    }
}
