//! Time value arithmetic (ES5 §15.9.1), time zones, and the Date string
//! formats.
//!
//! A time value is a count of milliseconds since 1970-01-01T00:00:00Z, or
//! NaN for an invalid date. Calendar fields are derived with the proleptic
//! Gregorian formulas of the standard rather than through a calendar
//! library, so that the full ±8.64e15 ms range is covered. chrono is used
//! only to ask the host for its UTC offset at an instant.

use std::sync::OnceLock;

use chrono::{Local, Offset, TimeZone as _};
use num_integer::Integer;
use regex::{Captures, Regex};

use crate::realm::TimeZone;

/// Milliseconds per day
pub const MS_PER_DAY: f64 = 86_400_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_SECOND: f64 = 1_000.0;

/// Largest magnitude of a valid time value
pub const MAX_TIME: f64 = 8.64e15;

/// Years this far from 1970 cannot yield a valid time value
const MAX_YEAR_SPAN: f64 = 400_000.0;

const WEEK_DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// First day of each month in a common year, plus the year length
const MONTH_STARTS: [i64; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

/// Day(t)
pub fn day(t: f64) -> f64 {
    (t / MS_PER_DAY).floor()
}

/// TimeWithinDay(t)
pub fn time_within_day(t: f64) -> f64 {
    t.rem_euclid(MS_PER_DAY)
}

fn is_leap_year(year: i64) -> bool {
    year.is_multiple_of(&4) && (!year.is_multiple_of(&100) || year.is_multiple_of(&400))
}

/// DayFromYear(y)
pub fn day_from_year(year: i64) -> i64 {
    365 * (year - 1970) + Integer::div_floor(&(year - 1969), &4) - Integer::div_floor(&(year - 1901), &100)
        + Integer::div_floor(&(year - 1601), &400)
}

fn month_start(month: usize, leap: bool) -> i64 {
    MONTH_STARTS[month] + i64::from(leap && month >= 2)
}

/// YearFromTime(t)
pub fn year_from_time(t: f64) -> i64 {
    let days = day(t) as i64;
    let mut year = (days as f64 / 365.2425).floor() as i64 + 1970;
    while day_from_year(year) > days {
        year -= 1;
    }
    while day_from_year(year + 1) <= days {
        year += 1;
    }
    year
}

/// Calendar fields of a finite time value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFields {
    /// Full year
    pub year: i64,
    /// Month, 0 = January
    pub month: u32,
    /// Day of the month, from 1
    pub date: u32,
    /// Day of the week, 0 = Sunday
    pub week_day: u32,
    /// Hours
    pub hour: u32,
    /// Minutes
    pub minute: u32,
    /// Seconds
    pub second: u32,
    /// Milliseconds
    pub millisecond: u32,
}

impl DateFields {
    /// Split `t` into calendar fields; `t` must be finite
    pub fn from_time(t: f64) -> Self {
        let year = year_from_time(t);
        let days = day(t) as i64;
        let day_in_year = days - day_from_year(year);
        let leap = is_leap_year(year);
        let month = (1..12).take_while(|&m| month_start(m, leap) <= day_in_year).count();
        let ms_in_day = time_within_day(t) as i64;
        DateFields {
            year,
            month: month as u32,
            date: (day_in_year - month_start(month, leap) + 1) as u32,
            week_day: (days + 4).mod_floor(&7) as u32,
            hour: (ms_in_day / 3_600_000) as u32,
            minute: (ms_in_day / 60_000 % 60) as u32,
            second: (ms_in_day / 1_000 % 60) as u32,
            millisecond: (ms_in_day % 1_000) as u32,
        }
    }
}

fn integer(n: f64) -> f64 {
    core_types::number::to_integer(n)
}

/// MakeTime(hour, min, sec, ms)
pub fn make_time(hour: f64, min: f64, sec: f64, ms: f64) -> f64 {
    if ![hour, min, sec, ms].iter().all(|n| n.is_finite()) {
        return f64::NAN;
    }
    integer(hour) * MS_PER_HOUR + integer(min) * MS_PER_MINUTE + integer(sec) * MS_PER_SECOND + integer(ms)
}

/// MakeDay(year, month, date)
pub fn make_day(year: f64, month: f64, date: f64) -> f64 {
    if ![year, month, date].iter().all(|n| n.is_finite()) {
        return f64::NAN;
    }
    let month = integer(month);
    let year = integer(year) + (month / 12.0).floor();
    if (year - 1970.0).abs() > MAX_YEAR_SPAN {
        return f64::NAN;
    }
    let year = year as i64;
    let month_in_year = month.rem_euclid(12.0) as usize;
    let first = day_from_year(year) + month_start(month_in_year, is_leap_year(year));
    first as f64 + integer(date) - 1.0
}

/// MakeDate(day, time)
pub fn make_date(day: f64, time: f64) -> f64 {
    if !day.is_finite() || !time.is_finite() {
        return f64::NAN;
    }
    day * MS_PER_DAY + time
}

/// TimeClip(time): NaN outside ±8.64e15, otherwise an integer without -0
pub fn time_clip(time: f64) -> f64 {
    if !time.is_finite() || time.abs() > MAX_TIME {
        return f64::NAN;
    }
    integer(time) + 0.0
}

/// Offset of `tz` from UTC, in milliseconds, at the UTC instant `t`
pub fn offset_at(tz: TimeZone, t: f64) -> f64 {
    match tz {
        TimeZone::Utc => 0.0,
        TimeZone::Fixed(minutes) => f64::from(minutes) * MS_PER_MINUTE,
        TimeZone::Local => {
            if !t.is_finite() {
                return 0.0;
            }
            Local
                .timestamp_millis_opt(t as i64)
                .single()
                .map_or(0.0, |dt| f64::from(dt.offset().fix().local_minus_utc()) * MS_PER_SECOND)
        }
    }
}

/// The zone's standard (non-daylight) offset in the year containing `t`
fn raw_offset(tz: TimeZone, t: f64) -> f64 {
    match tz {
        TimeZone::Local => {
            let year = year_from_time(t);
            let january = make_date(make_day(year as f64, 0.0, 1.0), 0.0);
            let july = make_date(make_day(year as f64, 6.0, 1.0), 0.0);
            offset_at(tz, january).min(offset_at(tz, july))
        }
        other => offset_at(other, t),
    }
}

/// LocalTime(t)
pub fn local_time(t: f64, tz: TimeZone) -> f64 {
    t + offset_at(tz, t)
}

/// UTC(t): the inverse of [`local_time`]
pub fn utc(local: f64, tz: TimeZone) -> f64 {
    if !local.is_finite() {
        return f64::NAN;
    }
    local - offset_at(tz, local - raw_offset(tz, local))
}

/// Two-digit years written as 0..=99 mean 1900..=1999
pub fn legacy_year(year: f64) -> f64 {
    let y = integer(year);
    if year.is_finite() && (0.0..=99.0).contains(&y) {
        1900.0 + y
    } else {
        year
    }
}

// =============================================================================
// Formatting
// =============================================================================

fn year_text(year: i64) -> String {
    if year >= 0 {
        format!("{:04}", year)
    } else {
        format!("-{:06}", -year)
    }
}

fn zone_text(offset_ms: f64) -> String {
    let minutes = (offset_ms / MS_PER_MINUTE) as i64;
    let sign = if minutes < 0 { '-' } else { '+' };
    format!("GMT{}{:02}{:02}", sign, minutes.abs() / 60, minutes.abs() % 60)
}

fn date_part(f: &DateFields) -> String {
    format!(
        "{} {} {:02} {}",
        WEEK_DAYS[f.week_day as usize],
        MONTHS[f.month as usize],
        f.date,
        year_text(f.year)
    )
}

fn clock(f: &DateFields) -> String {
    format!("{:02}:{:02}:{:02}", f.hour, f.minute, f.second)
}

/// `Date.prototype.toString`: `Tue Mar 05 2024 14:03:00 GMT+0100`
pub fn format_date_time(t: f64, tz: TimeZone) -> Option<String> {
    if t.is_nan() {
        return None;
    }
    let offset = offset_at(tz, t);
    let fields = DateFields::from_time(t + offset);
    Some(format!("{} {} {}", date_part(&fields), clock(&fields), zone_text(offset)))
}

/// `Date.prototype.toDateString`: `Tue Mar 05 2024`
pub fn format_date(t: f64, tz: TimeZone) -> Option<String> {
    if t.is_nan() {
        return None;
    }
    Some(date_part(&DateFields::from_time(local_time(t, tz))))
}

/// `Date.prototype.toTimeString`: `14:03:00 GMT+0100`
pub fn format_time(t: f64, tz: TimeZone) -> Option<String> {
    if t.is_nan() {
        return None;
    }
    let offset = offset_at(tz, t);
    Some(format!("{} {}", clock(&DateFields::from_time(t + offset)), zone_text(offset)))
}

/// `Date.prototype.toLocaleTimeString`: `14:03:00`
pub fn format_locale_time(t: f64, tz: TimeZone) -> Option<String> {
    if t.is_nan() {
        return None;
    }
    Some(clock(&DateFields::from_time(local_time(t, tz))))
}

/// `Date.prototype.toUTCString`: `Tue, 05 Mar 2024 13:03:00 GMT`
pub fn format_utc(t: f64) -> Option<String> {
    if t.is_nan() {
        return None;
    }
    let f = DateFields::from_time(t);
    Some(format!(
        "{}, {:02} {} {} {} GMT",
        WEEK_DAYS[f.week_day as usize],
        f.date,
        MONTHS[f.month as usize],
        year_text(f.year),
        clock(&f)
    ))
}

/// `Date.prototype.toISOString`: `2024-03-05T13:03:00.000Z`, with the
/// six-digit signed year form outside 0000..=9999
pub fn format_iso(t: f64) -> Option<String> {
    if !t.is_finite() {
        return None;
    }
    let f = DateFields::from_time(t);
    let year = if (0..=9999).contains(&f.year) {
        format!("{:04}", f.year)
    } else if f.year < 0 {
        format!("-{:06}", -f.year)
    } else {
        format!("+{:06}", f.year)
    };
    Some(format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        f.month + 1,
        f.date,
        f.hour,
        f.minute,
        f.second,
        f.millisecond
    ))
}

// =============================================================================
// Parsing
// =============================================================================

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn number(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group).and_then(|m| m.as_str().parse::<f64>().ok())
}

fn month_index(name: &str) -> Option<f64> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(&name[..name.len().min(3)]))
        .map(|i| i as f64)
}

/// Assemble fields into a time value; `offset_minutes` of `None` means local time
fn assemble(
    tz: TimeZone,
    year: f64,
    month: f64,
    date: f64,
    time: [f64; 4],
    offset_minutes: Option<f64>,
) -> f64 {
    let [hour, minute, second, ms] = time;
    let local = make_date(make_day(year, month, date), make_time(hour, minute, second, ms));
    let t = match offset_minutes {
        Some(offset) => local - offset * MS_PER_MINUTE,
        None => utc(local, tz),
    };
    time_clip(t)
}

fn parse_iso(text: &str) -> Option<f64> {
    static ISO: OnceLock<Option<Regex>> = OnceLock::new();
    let re = compiled(
        &ISO,
        r"^([+-]\d{6}|\d{4})(?:-(\d{2})(?:-(\d{2}))?)?(?:T(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,3})\d*)?)?(Z|[+-]\d{2}:\d{2})?)?$",
    )?;
    let caps = re.captures(text)?;
    let year_text = caps.get(1)?.as_str();
    if year_text == "-000000" {
        return None;
    }
    let year = year_text.parse::<f64>().ok()?;
    let month = number(&caps, 2).unwrap_or(1.0);
    let date = number(&caps, 3).unwrap_or(1.0);
    let hour = number(&caps, 4).unwrap_or(0.0);
    let minute = number(&caps, 5).unwrap_or(0.0);
    let second = number(&caps, 6).unwrap_or(0.0);
    let ms = caps
        .get(7)
        .map(|m| format!("{:0<3}", m.as_str()).parse::<f64>().unwrap_or(0.0))
        .unwrap_or(0.0);
    let valid = (1.0..=12.0).contains(&month)
        && (1.0..=31.0).contains(&date)
        && minute < 60.0
        && second < 60.0
        && (hour < 24.0 || (hour == 24.0 && minute == 0.0 && second == 0.0 && ms == 0.0));
    if !valid {
        return None;
    }
    let offset = match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") => 0.0,
        Some(zone) => {
            let sign = if zone.starts_with('-') { -1.0 } else { 1.0 };
            let hours = zone.get(1..3)?.parse::<f64>().ok()?;
            let minutes = zone.get(4..6)?.parse::<f64>().ok()?;
            sign * (hours * 60.0 + minutes)
        }
    };
    let t = make_date(
        make_day(year, month - 1.0, date),
        make_time(hour, minute, second, ms),
    );
    Some(time_clip(t - offset * MS_PER_MINUTE))
}

fn clock_fields(caps: &Captures<'_>, first: usize) -> [f64; 4] {
    [
        number(caps, first).unwrap_or(0.0),
        number(caps, first + 1).unwrap_or(0.0),
        number(caps, first + 2).unwrap_or(0.0),
        0.0,
    ]
}

fn gmt_offset(caps: &Captures<'_>, group: usize) -> Option<Option<f64>> {
    let Some(zone) = caps.get(group) else {
        return Some(None);
    };
    let zone = zone.as_str();
    let sign = if zone.starts_with('-') { -1.0 } else { 1.0 };
    let hours = zone.get(1..3)?.parse::<f64>().ok()?;
    let minutes = zone.get(3..5)?.parse::<f64>().ok()?;
    Some(Some(sign * (hours * 60.0 + minutes)))
}

fn parse_legacy(text: &str, tz: TimeZone) -> Option<f64> {
    static TO_STRING: OnceLock<Option<Regex>> = OnceLock::new();
    static UTC_STRING: OnceLock<Option<Regex>> = OnceLock::new();
    static SLASHED: OnceLock<Option<Regex>> = OnceLock::new();
    static MONTH_FIRST: OnceLock<Option<Regex>> = OnceLock::new();
    const CLOCK: &str = r"(?: (\d{1,2}):(\d{2})(?::(\d{2}))?)?";

    let to_string = compiled(
        &TO_STRING,
        &format!(r"^(?:[A-Za-z]{{3}} )?([A-Za-z]{{3}}) (\d{{1,2}}) (-?\d{{4,6}}){} ?(?:GMT([+-]\d{{4}}))?(?: \([^)]*\))?$", CLOCK),
    )?;
    if let Some(caps) = to_string.captures(text) {
        let month = month_index(caps.get(1)?.as_str())?;
        return Some(assemble(
            tz,
            number(&caps, 3)?,
            month,
            number(&caps, 2)?,
            clock_fields(&caps, 4),
            gmt_offset(&caps, 7)?,
        ));
    }

    let utc_string = compiled(
        &UTC_STRING,
        &format!(r"^(?:[A-Za-z]{{3}}, )?(\d{{1,2}}) ([A-Za-z]{{3}}) (-?\d{{4,6}}){}(?: (GMT|UTC|Z))?$", CLOCK),
    )?;
    if let Some(caps) = utc_string.captures(text) {
        let month = month_index(caps.get(2)?.as_str())?;
        let offset = caps.get(7).map(|_| 0.0);
        return Some(assemble(
            tz,
            number(&caps, 3)?,
            month,
            number(&caps, 1)?,
            clock_fields(&caps, 4),
            offset,
        ));
    }

    let slashed = compiled(&SLASHED, &format!(r"^(\d{{4}})/(\d{{1,2}})/(\d{{1,2}}){}$", CLOCK))?;
    if let Some(caps) = slashed.captures(text) {
        return Some(assemble(
            tz,
            number(&caps, 1)?,
            number(&caps, 2)? - 1.0,
            number(&caps, 3)?,
            clock_fields(&caps, 4),
            None,
        ));
    }

    let month_first = compiled(
        &MONTH_FIRST,
        &format!(r"^([A-Za-z]{{3}})[A-Za-z]* (\d{{1,2}}), (\d{{4}}){}$", CLOCK),
    )?;
    let caps = month_first.captures(text)?;
    let month = month_index(caps.get(1)?.as_str())?;
    Some(assemble(
        tz,
        number(&caps, 3)?,
        month,
        number(&caps, 2)?,
        clock_fields(&caps, 4),
        None,
    ))
}

/// `Date.parse`: the ISO 8601 subset of ES5 15.9.1.15, then the formats
/// this module prints, then a couple of common legacy forms. ISO strings
/// without an offset are UTC; the legacy forms without one are local time.
pub fn parse(text: &str, tz: TimeZone) -> f64 {
    let text = text.trim();
    parse_iso(text)
        .or_else(|| parse_legacy(text, tz))
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_fields() {
        let f = DateFields::from_time(0.0);
        assert_eq!((f.year, f.month, f.date, f.week_day), (1970, 0, 1, 4));
        let f = DateFields::from_time(-1.0);
        assert_eq!((f.year, f.month, f.date, f.hour, f.millisecond), (1969, 11, 31, 23, 999));
    }

    #[test]
    fn test_leap_day() {
        let t = make_date(make_day(2024.0, 1.0, 29.0), 0.0);
        let f = DateFields::from_time(t);
        assert_eq!((f.month, f.date), (1, 29));
        let next = DateFields::from_time(t + MS_PER_DAY);
        assert_eq!((next.month, next.date), (2, 1));
    }

    #[test]
    fn test_make_day_month_overflow() {
        assert_eq!(make_day(2023.0, 12.0, 1.0), make_day(2024.0, 0.0, 1.0));
        assert_eq!(make_day(2024.0, -1.0, 1.0), make_day(2023.0, 11.0, 1.0));
        assert!(make_day(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn test_time_clip() {
        assert!(time_clip(8.64e15 + 1.0).is_nan());
        assert_eq!(time_clip(8.64e15), 8.64e15);
        assert!(time_clip(-0.0).is_sign_positive());
    }

    #[test]
    fn test_fixed_zone_round_trip() {
        let tz = TimeZone::Fixed(90);
        let t = 1_700_000_000_000.0;
        assert_eq!(local_time(t, tz), t + 90.0 * 60_000.0);
        assert_eq!(utc(local_time(t, tz), tz), t);
    }

    #[test]
    fn test_formats() {
        let t = parse("2024-03-05T13:03:00Z", TimeZone::Utc);
        let tz = TimeZone::Fixed(60);
        assert_eq!(format_date_time(t, tz).unwrap(), "Tue Mar 05 2024 14:03:00 GMT+0100");
        assert_eq!(format_utc(t).unwrap(), "Tue, 05 Mar 2024 13:03:00 GMT");
        assert_eq!(format_iso(t).unwrap(), "2024-03-05T13:03:00.000Z");
        assert_eq!(format_iso(-62198755200000.0).unwrap(), "-000001-01-01T00:00:00.000Z");
        assert!(format_iso(f64::NAN).is_none());
    }

    #[test]
    fn test_parse_own_output() {
        let tz = TimeZone::Fixed(-300);
        let t = 1_234_567_890_000.0;
        assert_eq!(parse(&format_date_time(t, tz).unwrap(), tz), t);
        assert_eq!(parse(&format_utc(t).unwrap(), tz), t);
        assert_eq!(parse(&format_iso(t).unwrap(), tz), t);
    }

    #[test]
    fn test_parse_iso_variants() {
        assert_eq!(parse("1970", TimeZone::Utc), 0.0);
        assert_eq!(parse("1970-01-01T00:00:00.5Z", TimeZone::Utc), 500.0);
        assert_eq!(parse("1970-01-01T01:00+01:00", TimeZone::Utc), 0.0);
        assert_eq!(parse("1970-01-02T24:00Z", TimeZone::Utc), 2.0 * MS_PER_DAY);
        assert!(parse("1970-13-01", TimeZone::Utc).is_nan());
        assert!(parse("-000000-01-01", TimeZone::Utc).is_nan());
        assert!(parse("not a date", TimeZone::Utc).is_nan());
    }

    #[test]
    fn test_parse_legacy_local() {
        let tz = TimeZone::Fixed(120);
        let expected = make_date(make_day(2020.0, 5.0, 15.0), make_time(8.0, 30.0, 0.0, 0.0)) - 120.0 * 60_000.0;
        assert_eq!(parse("2020/06/15 08:30", tz), expected);
        assert_eq!(parse("June 15, 2020 08:30", tz), expected);
    }

    #[test]
    fn test_legacy_year() {
        assert_eq!(legacy_year(99.0), 1999.0);
        assert_eq!(legacy_year(100.0), 100.0);
        assert!(legacy_year(f64::NAN).is_nan());
    }
}
