//! Date and time display.
//!
//! Every function accepts a [`DateInput`] and fails with
//! [`DateError::InvalidDate`] when it does not name a valid instant.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike,
    Utc,
};

use crate::locale::{DateOrder, LocaleData, locale_data};

pub const DEFAULT_DATE_LOCALE: &str = "en-IN";

/// Largest magnitude of an epoch-millisecond timestamp (±100,000,000 days).
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date: {input}")]
    InvalidDate { input: String },

    #[error("unknown UTC format mode '{0}' (expected \"iso\" or \"readable\")")]
    UnknownUtcMode(String),
}

impl DateError {
    fn invalid(input: impl fmt::Display) -> Self {
        DateError::InvalidDate {
            input: input.to_string(),
        }
    }
}

/// Anything that can name an instant.
#[derive(Clone, Debug, PartialEq)]
pub enum DateInput {
    Instant(DateTime<Utc>),
    /// ISO-8601 text.
    Text(String),
    EpochMillis(i64),
    /// Fractional milliseconds are truncated toward zero.
    EpochMillisF64(f64),
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(value: DateTime<Tz>) -> Self {
        DateInput::Instant(value.with_timezone(&Utc))
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<&String> for DateInput {
    fn from(value: &String) -> Self {
        DateInput::Text(value.clone())
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::EpochMillis(value)
    }
}

impl From<f64> for DateInput {
    fn from(value: f64) -> Self {
        DateInput::EpochMillisF64(value)
    }
}

impl DateInput {
    pub fn to_instant(&self) -> Result<DateTime<Utc>, DateError> {
        match self {
            DateInput::Instant(dt) => Ok(*dt),
            DateInput::Text(text) => parse_iso(text),
            DateInput::EpochMillis(ms) => from_millis(*ms),
            DateInput::EpochMillisF64(ms) => {
                if !ms.is_finite() || ms.abs() > MAX_EPOCH_MILLIS as f64 {
                    return Err(DateError::invalid(ms));
                }
                from_millis(ms.trunc() as i64)
            }
        }
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, DateError> {
    if ms.abs() > MAX_EPOCH_MILLIS {
        return Err(DateError::invalid(ms));
    }
    DateTime::from_timestamp_millis(ms).ok_or_else(|| DateError::invalid(ms))
}

/// Offset-less text is read as UTC, and a bare date is UTC midnight.
/// Browser `Date` parsing differs for date-times without an offset: it reads
/// them in the local zone. Here the result never depends on the host zone.
fn parse_iso(text: &str) -> Result<DateTime<Utc>, DateError> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(DateError::invalid(text))
}

/// Current instant; works on wasm32 where `std::time::SystemTime` does not.
pub fn now() -> DateTime<Utc> {
    let since_epoch = web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let millis = i64::try_from(since_epoch.as_millis()).unwrap_or(MAX_EPOCH_MILLIS);
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateOptions {
    pub locale: String,
    /// `None` renders in the host's local zone.
    pub time_zone: Option<FixedOffset>,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_DATE_LOCALE.to_owned(),
            time_zone: None,
        }
    }
}

impl DateOptions {
    pub fn locale(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            ..Self::default()
        }
    }

    pub fn in_zone(mut self, offset: FixedOffset) -> Self {
        self.time_zone = Some(offset);
        self
    }

    pub fn utc(self) -> Self {
        self.in_zone(Utc.fix())
    }
}

fn wall_clock(instant: DateTime<Utc>, zone: Option<FixedOffset>) -> NaiveDateTime {
    match zone {
        Some(offset) => instant.with_timezone(&offset).naive_local(),
        None => instant.with_timezone(&Local).naive_local(),
    }
}

fn date_text(wall: &NaiveDateTime, data: &LocaleData) -> String {
    let month = data.months[wall.month0() as usize];
    let (day, year) = (wall.day(), wall.year());
    match data.date_order {
        DateOrder::DayMonthYear => format!("{day:02} {month} {year}"),
        DateOrder::MonthDayYear => format!("{month} {day:02}, {year}"),
        DateOrder::DayDotMonthYear => format!("{day:02}. {month} {year}"),
    }
}

fn time_text(wall: &NaiveDateTime, data: &LocaleData, seconds: bool) -> String {
    let (minute, second) = (wall.minute(), wall.second());
    let clock = match data.day_periods {
        Some(_) => {
            let (_, h12) = wall.hour12();
            format!("{h12:02}:{minute:02}")
        }
        None => format!("{:02}:{minute:02}", wall.hour()),
    };
    let clock = if seconds {
        format!("{clock}:{second:02}")
    } else {
        clock
    };
    match data.day_periods {
        Some((am, pm)) => {
            let period = if wall.hour() < 12 { am } else { pm };
            format!("{clock} {period}")
        }
        None => clock,
    }
}

/// `16 August 2025` (`en-IN`), `August 16, 2025` (`en-US`).
pub fn format_date(input: impl Into<DateInput>, options: &DateOptions) -> Result<String, DateError> {
    let instant = input.into().to_instant()?;
    let wall = wall_clock(instant, options.time_zone);
    Ok(date_text(&wall, locale_data(&options.locale)))
}

/// `11:00 am` (`en-IN`), `11:00 AM` (`en-US`), `11:00` (`en-GB`).
pub fn format_time(input: impl Into<DateInput>, options: &DateOptions) -> Result<String, DateError> {
    let instant = input.into().to_instant()?;
    let wall = wall_clock(instant, options.time_zone);
    Ok(time_text(&wall, locale_data(&options.locale), false))
}

/// Date and time with seconds: `16 August 2025 at 11:00:00 am`.
pub fn format_date_time_to_locale(
    input: impl Into<DateInput>,
    options: &DateOptions,
) -> Result<String, DateError> {
    let instant = input.into().to_instant()?;
    let wall = wall_clock(instant, options.time_zone);
    let data = locale_data(&options.locale);
    Ok(format!(
        "{}{}{}",
        date_text(&wall, data),
        data.date_time_joiner,
        time_text(&wall, data, true)
    ))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UtcMode {
    /// `2025-08-16T11:00:00.000Z`
    #[default]
    Iso,
    /// `Aug 16, 2025, 11:00:00`
    Readable,
}

impl FromStr for UtcMode {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso" => Ok(UtcMode::Iso),
            "readable" => Ok(UtcMode::Readable),
            _ => Err(DateError::UnknownUtcMode(s.to_owned())),
        }
    }
}

/// Renders the instant in UTC regardless of any offset it carried.
pub fn construct_utc_format(input: impl Into<DateInput>, mode: UtcMode) -> Result<String, DateError> {
    let instant = input.into().to_instant()?;
    let text = match mode {
        UtcMode::Iso => instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        UtcMode::Readable => instant.format("%b %d, %Y, %H:%M:%S").to_string(),
    };
    Ok(text)
}

/// Absolute distance between two instants, split into units. Each field is
/// what remains after the larger units are taken out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeDifference {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeDifference {
    pub fn total_seconds(&self) -> u64 {
        ((self.days * 24 + self.hours) * 60 + self.minutes) * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for TimeDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

pub fn time_difference(
    a: impl Into<DateInput>,
    b: impl Into<DateInput>,
) -> Result<TimeDifference, DateError> {
    let a = a.into().to_instant()?;
    let b = b.into().to_instant()?;
    let millis = (a - b).num_milliseconds().unsigned_abs();

    let total_seconds = millis / 1000;
    Ok(TimeDifference {
        days: total_seconds / 86_400,
        hours: (total_seconds % 86_400) / 3_600,
        minutes: (total_seconds % 3_600) / 60,
        seconds: total_seconds % 60,
    })
}
