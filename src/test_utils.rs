//! Shared fixtures for the unit tests.

use crate::RangeSelection;
use crate::types::{Instant, ZoneId};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// An instant at the given UTC wall clock
pub(crate) fn instant(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Instant {
    Instant::from_utc(
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("test wall clock should be a valid UTC time"),
    )
}

/// An evaluation instant in an arbitrary zone
pub(crate) fn zoned(tz: Tz, year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    tz.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("test wall clock should be unambiguous in its zone")
}

/// An evaluation instant in the UTC zone
pub(crate) fn utc_now(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    zoned(chrono_tz::UTC, year, month, day, hour, minute)
}

/// A selection displayed in UTC
pub(crate) fn selection(start: Option<Instant>, end: Option<Instant>) -> RangeSelection {
    let mut sel = RangeSelection::new(ZoneId::from_tz(chrono_tz::UTC));
    sel.set_start(start);
    sel.set_end(end);
    sel
}
