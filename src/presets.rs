use crate::RangeSelection;
use crate::consts::{FINAL_INPUT_MINUTE, LAST_SEVEN_LOOKBACK_DAYS};
use crate::prelude::*;
use crate::types::{first_valid_on_or_after, local_midnight};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::str::FromStr;

/// A named shortcut that replaces both endpoints of a selection at once.
/// `Display` and `FromStr` use the action labels shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Preset {
    /// Today, 00:00 through 23:59
    #[display(fmt = "Today")]
    Today,
    /// Today and the six days before it, inclusive
    #[display(fmt = "Last 7 Days")]
    LastSevenDays,
    /// Unset both endpoints
    #[display(fmt = "Clear")]
    Clear,
}

/// Error type for preset action lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown preset action: {0}")]
pub struct UnknownPresetError(pub String);

impl Preset {
    /// Computes the replacement selection for this preset, anchored to the
    /// supplied evaluation instant (and its timezone). The display timezone
    /// of the selection is left untouched.
    pub fn apply(self, selection: &RangeSelection, now: DateTime<Tz>) -> RangeSelection {
        let tz = now.timezone();
        let today = now.date_naive();
        let mut next = selection.clone();
        match self {
            Self::Today => {
                next.set_start(Some(local_midnight(tz, today).into()));
                next.set_end(Some(final_input_minute(tz, today).into()));
            }
            Self::LastSevenDays => {
                let first_day = today
                    .checked_sub_days(Days::new(LAST_SEVEN_LOOKBACK_DAYS))
                    .unwrap_or(NaiveDate::MIN);
                next.set_start(Some(local_midnight(tz, first_day).into()));
                next.set_end(Some(final_input_minute(tz, today).into()));
            }
            Self::Clear => {
                next.set_start(None);
                next.set_end(None);
            }
        }
        next
    }
}

impl FromStr for Preset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Today" => Ok(Self::Today),
            "Last 7 Days" => Ok(Self::LastSevenDays),
            "Clear" => Ok(Self::Clear),
            other => Err(UnknownPresetError(other.to_owned())),
        }
    }
}

/// Local 23:59:00.000 of `day`, the latest wall clock the input format can
/// express (minute precision, so not 23:59:59)
fn final_input_minute(tz: Tz, day: NaiveDate) -> DateTime<Tz> {
    first_valid_on_or_after(tz, day.and_time(NaiveTime::MIN) + Duration::minutes(FINAL_INPUT_MINUTE))
}
