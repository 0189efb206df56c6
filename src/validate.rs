use crate::RangeSelection;
use crate::consts::MAX_RANGE_DAYS;
use crate::prelude::*;
use crate::types::{Instant, local_end_of_day, local_midnight};
use chrono::{DateTime, Days, NaiveDate};
use chrono_tz::Tz;

/// A single advisory problem with the current selection.
///
/// At most one issue is reported per evaluation; earlier variants outrank
/// later ones. `Display` renders the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ValidationIssue {
    /// Both endpoints set, end strictly before start
    #[display(fmt = "End must be after Start.")]
    OutOfOrder,
    /// Start before the window opens
    #[display(fmt = "Start cannot be in the past.")]
    StartTooEarly,
    /// End before the window opens
    #[display(fmt = "End cannot be in the past.")]
    EndTooEarly,
    /// Start past the window's last day
    #[display(fmt = "Start is too far in the future (max {} days).", MAX_RANGE_DAYS)]
    StartTooLate,
    /// End past the window's last day
    #[display(fmt = "End is too far in the future (max {} days).", MAX_RANGE_DAYS)]
    EndTooLate,
}

/// The span a selection is allowed to fall in: local midnight of `now`'s day
/// through the end of the day thirty calendar days later. Both bounds are
/// inclusive.
///
/// Derived fresh from `now` on every evaluation, never cached, since the
/// window slides forward as time passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedWindow {
    min: Instant,
    max: Instant,
}

impl AllowedWindow {
    /// Computes the window around the supplied evaluation instant, in that
    /// instant's timezone.
    pub fn around(now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let last_day = today
            .checked_add_days(Days::new(MAX_RANGE_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self {
            min: local_midnight(tz, today).into(),
            max: local_end_of_day(tz, last_day).into(),
        }
    }

    /// Earliest selectable instant (inclusive)
    pub const fn min(&self) -> Instant {
        self.min
    }

    /// Latest selectable instant (inclusive)
    pub const fn max(&self) -> Instant {
        self.max
    }

    /// Whether an instant falls inside the window, bounds included
    pub fn contains(&self, instant: Instant) -> bool {
        self.min <= instant && instant <= self.max
    }
}

impl RangeSelection {
    /// Evaluates the selection against the window derived from `now`.
    ///
    /// `now` is captured once per call: every comparison in a single
    /// evaluation observes the same window. Checks run in strict priority
    /// order and the first failure wins:
    ///
    /// 1. with both endpoints set, `end < start` is reported before any
    ///    window problem;
    /// 2. window checks then apply to whichever endpoints are set, start
    ///    before end, too-early before too-late.
    ///
    /// An empty or half-set selection is not an issue by itself, and
    /// endpoints landing exactly on the window bounds are valid.
    pub fn validate(&self, now: DateTime<Tz>) -> Option<ValidationIssue> {
        if let (Some(start), Some(end)) = (self.start(), self.end()) {
            if end < start {
                return Some(ValidationIssue::OutOfOrder);
            }
        }

        if self.start().is_none() && self.end().is_none() {
            return None;
        }

        let window = AllowedWindow::around(now);
        if let Some(start) = self.start() {
            if start < window.min() {
                return Some(ValidationIssue::StartTooEarly);
            }
        }
        if let Some(end) = self.end() {
            if end < window.min() {
                return Some(ValidationIssue::EndTooEarly);
            }
        }
        if let Some(start) = self.start() {
            if start > window.max() {
                return Some(ValidationIssue::StartTooLate);
            }
        }
        if let Some(end) = self.end() {
            if end > window.max() {
                return Some(ValidationIssue::EndTooLate);
            }
        }
        None
    }
}
