/// Length of the allowed selection window, in calendar days past today
pub const MAX_RANGE_DAYS: u64 = 30;

/// Days to look back from today for the seven-day preset (today + 6 prior days)
pub const LAST_SEVEN_LOOKBACK_DAYS: u64 = 6;

/// Minutes from midnight to 23:59, the latest wall-clock minute the
/// input format can express
pub const FINAL_INPUT_MINUTE: i64 = 23 * 60 + 59;

/// Rendered in place of an unset endpoint
pub const UNSET_PLACEHOLDER: &str = "\u{2014}";

/// Wall-clock input format (timezone-naive, minute precision)
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Upper bound, in minutes, when probing past a spring-forward gap for the
/// first valid wall-clock minute. Real tzdb gaps never exceed two hours.
pub(crate) const GAP_PROBE_LIMIT_MINUTES: u32 = 180;
