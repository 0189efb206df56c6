use crate::consts::GAP_PROBE_LIMIT_MINUTES;
use crate::prelude::*;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// An absolute point in time, independent of any timezone.
///
/// Wraps a UTC timestamp; construction from any zoned date-time normalizes to
/// UTC, so two `Instant`s compare by the moment they denote, not by the wall
/// clock they were entered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<Utc>);

impl Instant {
    /// Creates an instant from a UTC date-time
    pub const fn from_utc(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the instant as a UTC date-time
    pub const fn as_utc(self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp_millis(self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl<T: TimeZone> From<DateTime<T>> for Instant {
    fn from(datetime: DateTime<T>) -> Self {
        Self(datetime.with_timezone(&Utc))
    }
}

impl From<Instant> for DateTime<Utc> {
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl serde::Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

/// Error type for timezone identifier resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown IANA timezone identifier: {id}")]
pub struct UnknownTimezoneError {
    /// The identifier that failed to resolve
    pub id: String,
}

/// A validated IANA timezone identifier.
///
/// Construction fails for any string the tz database does not recognize, so a
/// `ZoneId` held anywhere in the crate is guaranteed formattable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{}", "_0.name()")]
pub struct ZoneId(Tz);

impl ZoneId {
    /// Resolves an IANA identifier such as `"America/New_York"`.
    ///
    /// # Errors
    /// Returns `UnknownTimezoneError` if the identifier is not in the tz database.
    pub fn new(id: &str) -> Result<Self, UnknownTimezoneError> {
        id.parse::<Tz>()
            .map(Self)
            .map_err(|_| UnknownTimezoneError { id: id.to_owned() })
    }

    /// Wraps an already-typed timezone
    pub const fn from_tz(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the underlying timezone
    pub const fn tz(self) -> Tz {
        self.0
    }

    /// Canonical identifier string
    pub fn name(self) -> &'static str {
        self.0.name()
    }
}

impl FromStr for ZoneId {
    type Err = UnknownTimezoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Tz> for ZoneId {
    fn from(tz: Tz) -> Self {
        Self(tz)
    }
}

impl serde::Serialize for ZoneId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for ZoneId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

/// The closed list of zones a caller offers for selection.
///
/// Every identifier is resolved up front; a menu that would contain an
/// unrecognized zone fails construction instead of failing later at display
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMenu(Vec<ZoneId>);

impl ZoneMenu {
    /// Builds a menu from IANA identifier strings, validating each one.
    ///
    /// # Errors
    /// Returns `UnknownTimezoneError` naming the first identifier that fails
    /// to resolve.
    pub fn new<I, S>(ids: I) -> Result<Self, UnknownTimezoneError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let zones = ids
            .into_iter()
            .map(|id| ZoneId::new(id.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(zones))
    }

    /// The selectable zones, in menu order
    pub fn zones(&self) -> &[ZoneId] {
        &self.0
    }

    /// Whether a zone is offered by this menu
    pub fn contains(&self, zone: ZoneId) -> bool {
        self.0.contains(&zone)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ZoneMenu {
    /// The reference menu: UTC plus one zone each from Asia, America and Europe.
    /// Typed constants, so the default cannot carry a misspelled identifier.
    fn default() -> Self {
        Self(vec![
            ZoneId(chrono_tz::UTC),
            ZoneId(chrono_tz::Asia::Kolkata),
            ZoneId(chrono_tz::America::New_York),
            ZoneId(chrono_tz::Europe::London),
        ])
    }
}

// --- wall-clock anchoring helpers ---
//
// Wall clocks and instants are not in bijection: a spring-forward transition
// skips a block of wall-clock minutes and a fall-back transition repeats one.
// Derived anchors (midnight, 23:59, end of day) must resolve without panicking
// on either case.

/// Maps a wall clock to an instant in `tz`. Ambiguous wall clocks (fall-back
/// overlap) resolve to the earlier instant; skipped wall clocks resolve to
/// `None`.
pub(crate) fn resolve_local(tz: Tz, wall: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&wall).earliest()
}

/// First valid instant at or after the requested wall clock, probing forward
/// minute by minute across a spring-forward gap.
pub(crate) fn first_valid_on_or_after(tz: Tz, wall: NaiveDateTime) -> DateTime<Tz> {
    let mut probe = wall;
    for _ in 0..GAP_PROBE_LIMIT_MINUTES {
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => probe += Duration::minutes(1),
        }
    }
    // No tzdb gap is this wide; keep the function total anyway.
    tz.from_utc_datetime(&wall)
}

/// Local 00:00:00.000 of `day` (first valid instant after it on days where
/// midnight itself is skipped)
pub(crate) fn local_midnight(tz: Tz, day: NaiveDate) -> DateTime<Tz> {
    first_valid_on_or_after(tz, day.and_time(NaiveTime::MIN))
}

/// Local 23:59:59.999 of `day`, computed as the next midnight minus one
/// millisecond so it stays correct on 23- and 25-hour days
pub(crate) fn local_end_of_day(tz: Tz, day: NaiveDate) -> DateTime<Tz> {
    let next = day.checked_add_days(chrono::Days::new(1)).unwrap_or(NaiveDate::MAX);
    local_midnight(tz, next) - Duration::milliseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_instant_normalizes_to_utc() {
        let ny = chrono_tz::America::New_York;
        let zoned = ny
            .with_ymd_and_hms(2026, 6, 15, 10, 0, 0)
            .single()
            .expect("valid New York time");
        let instant = Instant::from(zoned);
        // EDT is UTC-4 in June
        assert_eq!(instant.as_utc(), Utc.with_ymd_and_hms(2026, 6, 15, 14, 0, 0).single().expect("valid UTC time"));
    }

    #[test]
    fn test_instant_ordering_ignores_entry_zone() {
        let ny = chrono_tz::America::New_York;
        let kolkata = chrono_tz::Asia::Kolkata;
        // 10:00 New York == 19:30 Kolkata on this date
        let a = Instant::from(ny.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).single().expect("valid"));
        let b = Instant::from(kolkata.with_ymd_and_hms(2026, 6, 15, 19, 30, 0).single().expect("valid"));
        assert_eq!(a, b);
        let later = Instant::from(ny.with_ymd_and_hms(2026, 6, 15, 10, 1, 0).single().expect("valid"));
        assert!(a < later);
    }

    #[test]
    fn test_instant_display_rfc3339() {
        let instant = Instant::from_utc(Utc.with_ymd_and_hms(2026, 6, 15, 14, 0, 0).single().expect("valid"));
        assert_eq!(instant.to_string(), "2026-06-15T14:00:00.000Z");
    }

    #[test]
    fn test_instant_serde_round_trip() {
        let instant = Instant::from_utc(Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).single().expect("valid"));
        let json = serde_json::to_string(&instant).expect("failed to serialize instant");
        assert_eq!(json, r#""2026-03-08T07:30:00.000Z""#);
        let parsed: Instant = serde_json::from_str(&json).expect("failed to deserialize instant");
        assert_eq!(instant, parsed);
    }

    #[test]
    fn test_instant_serde_rejects_garbage() {
        let result: Result<Instant, _> = serde_json::from_str(r#""not a timestamp""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_zone_id_valid() {
        for id in ["UTC", "Asia/Kolkata", "America/New_York", "Europe/London"] {
            let zone = ZoneId::new(id).expect("identifier should resolve");
            assert_eq!(zone.name(), id);
            assert_eq!(zone.to_string(), id);
        }
    }

    #[test]
    fn test_zone_id_rejects_misspellings() {
        // Both appeared in a hand-maintained zone list; neither is in the tzdb.
        for id in ["America/New_york", "Eurupe/London"] {
            let result = ZoneId::new(id);
            assert_eq!(result, Err(UnknownTimezoneError { id: id.to_owned() }));
        }
    }

    #[test]
    fn test_zone_id_from_str() {
        let zone: ZoneId = "Europe/London".parse().expect("identifier should resolve");
        assert_eq!(zone.tz(), chrono_tz::Europe::London);
        assert!("Europe/Lundon".parse::<ZoneId>().is_err());
    }

    #[test]
    fn test_zone_id_serde() {
        let zone = ZoneId::from_tz(chrono_tz::Asia::Kolkata);
        let json = serde_json::to_string(&zone).expect("failed to serialize zone");
        assert_eq!(json, r#""Asia/Kolkata""#);
        let parsed: ZoneId = serde_json::from_str(&json).expect("failed to deserialize zone");
        assert_eq!(zone, parsed);

        let result: Result<ZoneId, _> = serde_json::from_str(r#""Mars/Olympus_Mons""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_zone_menu_validates_every_entry() {
        let menu = ZoneMenu::new(["UTC", "America/New_York"]).expect("all identifiers valid");
        assert_eq!(menu.len(), 2);
        assert!(menu.contains(ZoneId::from_tz(chrono_tz::UTC)));
        assert!(!menu.contains(ZoneId::from_tz(chrono_tz::Europe::London)));

        let result = ZoneMenu::new(["UTC", "Eurupe/London", "America/New_York"]);
        assert_eq!(
            result,
            Err(UnknownTimezoneError {
                id: "Eurupe/London".to_owned()
            })
        );
    }

    #[test]
    fn test_zone_menu_default() {
        let menu = ZoneMenu::default();
        assert_eq!(menu.len(), 4);
        assert!(!menu.is_empty());
        let names: Vec<_> = menu.zones().iter().map(|z| z.name()).collect();
        assert_eq!(names, ["UTC", "Asia/Kolkata", "America/New_York", "Europe/London"]);
    }

    #[test]
    fn test_resolve_local_single() {
        let ny = chrono_tz::America::New_York;
        let wall = NaiveDate::from_ymd_opt(2026, 6, 15)
            .expect("valid date")
            .and_hms_opt(10, 0, 0)
            .expect("valid time");
        let resolved = resolve_local(ny, wall).expect("unambiguous wall clock");
        assert_eq!(Instant::from(resolved).as_utc(), Utc.with_ymd_and_hms(2026, 6, 15, 14, 0, 0).single().expect("valid"));
    }

    #[test]
    fn test_resolve_local_gap_is_none() {
        // 02:30 on 2026-03-08 is inside the New York spring-forward gap
        let ny = chrono_tz::America::New_York;
        let wall = NaiveDate::from_ymd_opt(2026, 3, 8)
            .expect("valid date")
            .and_hms_opt(2, 30, 0)
            .expect("valid time");
        assert!(resolve_local(ny, wall).is_none());
    }

    #[test]
    fn test_resolve_local_ambiguous_takes_earlier() {
        // 01:30 on 2026-11-01 occurs twice in New York; the EDT reading comes first
        let ny = chrono_tz::America::New_York;
        let wall = NaiveDate::from_ymd_opt(2026, 11, 1)
            .expect("valid date")
            .and_hms_opt(1, 30, 0)
            .expect("valid time");
        let resolved = resolve_local(ny, wall).expect("ambiguous wall clock still resolves");
        assert_eq!(resolved.with_timezone(&Utc), Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).single().expect("valid"));
    }

    #[test]
    fn test_first_valid_skips_spring_forward_gap() {
        let ny = chrono_tz::America::New_York;
        let wall = NaiveDate::from_ymd_opt(2026, 3, 8)
            .expect("valid date")
            .and_hms_opt(2, 30, 0)
            .expect("valid time");
        let resolved = first_valid_on_or_after(ny, wall);
        // The gap runs 02:00..03:00; the first valid minute is 03:00 EDT
        assert_eq!(resolved.hour(), 3);
        assert_eq!(resolved.minute(), 0);
        assert_eq!(resolved.with_timezone(&Utc), Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).single().expect("valid"));
    }

    #[test]
    fn test_local_midnight_plain_day() {
        let london = chrono_tz::Europe::London;
        let day = NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date");
        let midnight = local_midnight(london, day);
        // BST is UTC+1 in June
        assert_eq!(midnight.with_timezone(&Utc), Utc.with_ymd_and_hms(2026, 6, 14, 23, 0, 0).single().expect("valid"));
    }

    #[test]
    fn test_local_end_of_day_short_day() {
        // 2026-03-08 is a 23-hour day in New York
        let ny = chrono_tz::America::New_York;
        let day = NaiveDate::from_ymd_opt(2026, 3, 8).expect("valid date");
        let start = local_midnight(ny, day);
        let end = local_end_of_day(ny, day);
        let span_ms = end.timestamp_millis() - start.timestamp_millis();
        assert_eq!(span_ms, 23 * 60 * 60 * 1000 - 1);
    }

    #[test]
    fn test_local_end_of_day_long_day() {
        // 2026-11-01 is a 25-hour day in New York
        let ny = chrono_tz::America::New_York;
        let day = NaiveDate::from_ymd_opt(2026, 11, 1).expect("valid date");
        let start = local_midnight(ny, day);
        let end = local_end_of_day(ny, day);
        let span_ms = end.timestamp_millis() - start.timestamp_millis();
        assert_eq!(span_ms, 25 * 60 * 60 * 1000 - 1);
    }
}
