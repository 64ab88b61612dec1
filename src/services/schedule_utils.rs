use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};

/// Office days modelled by the booking system. Friday and Saturday are never
/// office days.
pub const DEFAULT_OFFICE_DAYS: [&str; 5] = ["sunday", "monday", "tuesday", "wednesday", "thursday"];

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    parse_date_lenient(value).ok_or_else(|| {
        AppError::validation_with_details(
            "invalid date format",
            json!({"value": value, "expected": "yyyy-MM-dd"}),
        )
    })
}

/// Accepts `yyyy-MM-dd` or an RFC 3339 timestamp (reduced to its own calendar
/// date). Anything else is `None`.
pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "sunday",
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
    }
}

pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sunday" => Some(Weekday::Sun),
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Resolves a list of weekday names, failing on the first unknown name.
pub fn parse_office_days(names: &[String]) -> AppResult<Vec<Weekday>> {
    let mut days = Vec::with_capacity(names.len());
    for name in names {
        let day = parse_weekday(name).ok_or_else(|| {
            AppError::validation_with_details("unknown weekday name", json!({ "value": name }))
        })?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

pub fn default_office_days() -> Vec<Weekday> {
    DEFAULT_OFFICE_DAYS
        .iter()
        .filter_map(|name| parse_weekday(name))
        .collect()
}

pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.trim().parse::<Tz>().map_err(|err| {
        AppError::validation_with_details(
            "unknown timezone",
            json!({ "value": name, "error": err.to_string() }),
        )
    })
}

/// Calendar date right now in the given office timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Inclusive calendar-day range. `start <= end` always holds, including for
/// deserialized ranges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = AppError;

    fn try_from(raw: RawDateRange) -> AppResult<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::validation_with_details(
                "date range ends before it starts",
                json!({ "start": format_date(start), "end": format_date(end) }),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// `days` consecutive days starting at `start`; zero is treated as one.
    pub fn starting_at(start: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1) - 1);
        let end = start
            .checked_add_signed(Duration::days(span))
            .unwrap_or(start);
        Self { start, end }
    }

    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).unwrap_or(0) + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}
