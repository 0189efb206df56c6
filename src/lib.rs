mod consts;
mod format;
mod presets;
mod prelude;
mod types;
mod validate;

#[cfg(test)]
pub(crate) mod test_utils;

pub use consts::*;
pub use format::{WallClock, format_in_zone, project_to_zone};
pub use presets::{Preset, UnknownPresetError};
pub use types::{Instant, UnknownTimezoneError, ZoneId, ZoneMenu};
pub use validate::{AllowedWindow, ValidationIssue};

use crate::prelude::*;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The caller-owned selection state: two candidate endpoints, each possibly
/// unset, plus the zone chosen for display.
///
/// Setters replace a single field and nothing else; validity is a derived
/// computation (see [`RangeSelection::validate`]) and never blocks an edit,
/// so a selection may hold an out-of-order or out-of-window pair at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSelection {
    start: Option<Instant>,
    end: Option<Instant>,
    timezone: ZoneId,
}

/// Error type for wall-clock input parsing.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    /// Input does not match the `YYYY-MM-DDTHH:mm` shape
    #[display(fmt = "Invalid date-time input: {_0} (expected YYYY-MM-DDTHH:mm)")]
    InvalidFormat(String),
    /// Input names a wall-clock minute the entry zone skips over
    #[display(fmt = "Local time {wall} does not exist in {zone} (skipped by a DST transition)")]
    SkippedLocalTime { wall: String, zone: String },
}

impl std::error::Error for ParseError {}

impl RangeSelection {
    /// An empty selection displayed in the given zone
    pub const fn new(timezone: ZoneId) -> Self {
        Self {
            start: None,
            end: None,
            timezone,
        }
    }

    /// Builds a selection from raw input strings, parsing each endpoint with
    /// [`parse_local_input`].
    ///
    /// # Errors
    /// Returns the first `ParseError` either endpoint produces.
    pub fn from_inputs(
        start_raw: &str,
        end_raw: &str,
        timezone: ZoneId,
        entry_zone: ZoneId,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            start: parse_local_input(start_raw, entry_zone)?,
            end: parse_local_input(end_raw, entry_zone)?,
            timezone,
        })
    }

    /// The candidate start endpoint
    pub const fn start(&self) -> Option<Instant> {
        self.start
    }

    /// The candidate end endpoint
    pub const fn end(&self) -> Option<Instant> {
        self.end
    }

    /// The zone used to display the endpoints
    pub const fn timezone(&self) -> ZoneId {
        self.timezone
    }

    /// Replaces the start endpoint; no other field changes
    pub fn set_start(&mut self, start: Option<Instant>) {
        self.start = start;
    }

    /// Replaces the end endpoint; no other field changes
    pub fn set_end(&mut self, end: Option<Instant>) {
        self.end = end;
    }

    /// Replaces the display zone; the endpoints, being absolute instants, are
    /// unaffected
    pub fn set_timezone(&mut self, timezone: ZoneId) {
        self.timezone = timezone;
    }

    /// Whether neither endpoint is set
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether both endpoints are set
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Parses a timezone-naive `YYYY-MM-DDTHH:mm` string into an instant.
///
/// The wall clock is interpreted in `entry_zone`, the zone the value was
/// typed in. This is deliberately a different zone from the one a selection
/// displays with: entry and display are separate conversions, and conflating
/// them silently shifts every endpoint by the offset between the two zones.
///
/// An empty (or all-whitespace) string is an unset endpoint, not an error.
/// An ambiguous wall clock in a fall-back overlap resolves to the earlier of
/// the two instants.
///
/// # Errors
/// Returns `ParseError::InvalidFormat` for any other malformed input and
/// `ParseError::SkippedLocalTime` when the wall clock falls inside a
/// spring-forward gap.
pub fn parse_local_input(raw: &str, entry_zone: ZoneId) -> Result<Option<Instant>, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let wall = NaiveDateTime::parse_from_str(trimmed, INPUT_FORMAT)
        .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;

    let resolved = types::resolve_local(entry_zone.tz(), wall).ok_or_else(|| ParseError::SkippedLocalTime {
        wall: trimmed.to_owned(),
        zone: entry_zone.to_string(),
    })?;

    Ok(Some(resolved.into()))
}

/// Renders an instant back into the `YYYY-MM-DDTHH:mm` input format, as the
/// wall clock reads in `entry_zone`. Inverse of [`parse_local_input`] for
/// unambiguous wall clocks; used to refill the text inputs after a preset.
pub fn format_local_input(instant: Instant, entry_zone: ZoneId) -> String {
    instant
        .as_utc()
        .with_timezone(&entry_zone.tz())
        .format(INPUT_FORMAT)
        .to_string()
}
