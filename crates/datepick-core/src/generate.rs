//! Calendar arithmetic adapter.
//!
//! The engine never constructs or inspects dates itself. Every read, write,
//! comparison, parse and format goes through a [`GenerateConfig`], so a host
//! can plug in whatever date type it already uses. [`ChronoGenerate`] is the
//! bundled implementation over [`chrono::NaiveDateTime`].

use crate::format::{self, DateFields, ParseError, ParsedFields};
use crate::locale::Locale;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt::Debug;

/// Capability interface over an opaque date value.
///
/// Months are zero based (`0` = January) and week days start at Sunday
/// (`0`). Setters must not panic on overflow: an impossible day of month
/// clamps to the last valid day.
pub trait GenerateConfig: Send + Sync + 'static {
    /// The date value this adapter manipulates.
    type Date: Clone + PartialEq + Debug + Send + Sync + 'static;

    fn get_now(&self) -> Self::Date;

    fn get_year(&self, date: &Self::Date) -> i32;
    fn get_month(&self, date: &Self::Date) -> u32;
    fn get_date(&self, date: &Self::Date) -> u32;
    fn get_hour(&self, date: &Self::Date) -> u32;
    fn get_minute(&self, date: &Self::Date) -> u32;
    fn get_second(&self, date: &Self::Date) -> u32;
    fn get_millisecond(&self, date: &Self::Date) -> u32;
    /// Day of week, `0` = Sunday.
    fn get_week_day(&self, date: &Self::Date) -> u32;
    /// The last day of the month containing `date`, time preserved.
    fn get_end_date(&self, date: &Self::Date) -> Self::Date;

    fn set_year(&self, date: &Self::Date, year: i32) -> Self::Date;
    fn set_month(&self, date: &Self::Date, month: u32) -> Self::Date;
    fn set_date(&self, date: &Self::Date, day: u32) -> Self::Date;
    fn set_hour(&self, date: &Self::Date, hour: u32) -> Self::Date;
    fn set_minute(&self, date: &Self::Date, minute: u32) -> Self::Date;
    fn set_second(&self, date: &Self::Date, second: u32) -> Self::Date;
    fn set_millisecond(&self, date: &Self::Date, millisecond: u32) -> Self::Date;

    fn add_year(&self, date: &Self::Date, diff: i32) -> Self::Date;
    fn add_month(&self, date: &Self::Date, diff: i32) -> Self::Date;
    fn add_date(&self, date: &Self::Date, diff: i32) -> Self::Date;

    /// `true` when `a` is strictly later than `b`.
    fn is_after(&self, a: &Self::Date, b: &Self::Date) -> bool;
    fn is_validate(&self, date: &Self::Date) -> bool;
    fn timestamp_millis(&self, date: &Self::Date) -> i64;

    /// First day of the locale week containing `date`.
    fn week_first_date(&self, locale: &Locale, date: &Self::Date) -> Self::Date;
    /// Locale week number of `date`.
    fn get_week(&self, locale: &Locale, date: &Self::Date) -> u32;

    fn format(&self, locale: &Locale, date: &Self::Date, pattern: &str) -> String;
    /// Parse `text` with the first pattern that accepts it.
    fn parse(&self, locale: &Locale, text: &str, patterns: &[String]) -> Result<Self::Date, ParseError>;
}

/// [`GenerateConfig`] over [`chrono::NaiveDateTime`].
///
/// `get_now` reads the local clock unless a fixed instant was pinned with
/// [`with_now`](ChronoGenerate::with_now), which keeps tests deterministic.
#[derive(Debug, Clone, Default)]
pub struct ChronoGenerate {
    now: Option<NaiveDateTime>,
}

impl ChronoGenerate {
    /// Adapter that reads the local clock.
    pub fn new() -> Self {
        Self { now: None }
    }

    /// Adapter whose `get_now` always returns `now`.
    pub fn with_now(now: NaiveDateTime) -> Self {
        Self { now: Some(now) }
    }

    fn with_day_clamped(date: &NaiveDateTime, year: i32, month0: u32, day: u32) -> NaiveDateTime {
        let month0 = month0.min(11);
        let last = days_in_month(year, month0);
        let day = day.clamp(1, last);
        NaiveDate::from_ymd_opt(year, month0 + 1, day)
            .map(|d| d.and_time(date.time()))
            .unwrap_or(*date)
    }

    fn week_number(&self, locale: &Locale, date: &NaiveDateTime) -> (i32, u32) {
        if locale.week_start == 1 {
            let iso = date.iso_week();
            return (iso.year(), iso.week());
        }
        // Week containing January 1st is week one (US rules).
        let first = self.week_first_date(locale, date);
        let last = first + Duration::days(6);
        if last.year() != first.year() {
            return (last.year(), 1);
        }
        let jan1 = NaiveDate::from_ymd_opt(first.year(), 1, 1)
            .map(|d| d.and_time(NaiveTime::MIN))
            .unwrap_or(first);
        let jan1_week = self.week_first_date(locale, &jan1);
        let days = (first.date() - jan1_week.date()).num_days();
        (first.year(), (days / 7) as u32 + 1)
    }

    fn resolve(&self, locale: &Locale, fields: &ParsedFields) -> Result<NaiveDateTime, ParseError> {
        let now = self.get_now();
        let year = fields.year.unwrap_or(now.year());

        if let Some(week) = fields.week {
            // Anchor on a day that always belongs to the requested week.
            let jan4 = NaiveDate::from_ymd_opt(year, 1, if locale.week_start == 1 { 4 } else { 1 })
                .ok_or(ParseError::OutOfRange {
                    field: "year",
                    value: i64::from(year),
                })?
                .and_time(NaiveTime::MIN);
            let first = self.week_first_date(locale, &jan4);
            return Ok(first + Duration::weeks(i64::from(week) - 1));
        }

        let month0 = fields
            .month
            .or(fields.quarter.map(|q| (q - 1) * 3))
            .unwrap_or(0);
        let day = fields.day.unwrap_or(1);
        if day > days_in_month(year, month0) {
            return Err(ParseError::OutOfRange {
                field: "day",
                value: i64::from(day),
            });
        }
        let date = NaiveDate::from_ymd_opt(year, month0 + 1, day).ok_or(ParseError::OutOfRange {
            field: "day",
            value: i64::from(day),
        })?;
        let time = NaiveTime::from_hms_milli_opt(
            fields.hour24().unwrap_or(0),
            fields.minute.unwrap_or(0),
            fields.second.unwrap_or(0),
            fields.millisecond.unwrap_or(0),
        )
        .ok_or(ParseError::OutOfRange {
            field: "time",
            value: 0,
        })?;
        Ok(date.and_time(time))
    }
}

/// Number of days in a zero-based month.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month) = if month0 >= 11 {
        (year + 1, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

impl GenerateConfig for ChronoGenerate {
    type Date = NaiveDateTime;

    fn get_now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| chrono::Local::now().naive_local())
    }

    fn get_year(&self, date: &NaiveDateTime) -> i32 {
        date.year()
    }

    fn get_month(&self, date: &NaiveDateTime) -> u32 {
        date.month0()
    }

    fn get_date(&self, date: &NaiveDateTime) -> u32 {
        date.day()
    }

    fn get_hour(&self, date: &NaiveDateTime) -> u32 {
        date.hour()
    }

    fn get_minute(&self, date: &NaiveDateTime) -> u32 {
        date.minute()
    }

    fn get_second(&self, date: &NaiveDateTime) -> u32 {
        date.second()
    }

    fn get_millisecond(&self, date: &NaiveDateTime) -> u32 {
        date.nanosecond() / 1_000_000
    }

    fn get_week_day(&self, date: &NaiveDateTime) -> u32 {
        date.weekday().num_days_from_sunday()
    }

    fn get_end_date(&self, date: &NaiveDateTime) -> NaiveDateTime {
        Self::with_day_clamped(date, date.year(), date.month0(), 31)
    }

    fn set_year(&self, date: &NaiveDateTime, year: i32) -> NaiveDateTime {
        Self::with_day_clamped(date, year, date.month0(), date.day())
    }

    fn set_month(&self, date: &NaiveDateTime, month: u32) -> NaiveDateTime {
        Self::with_day_clamped(date, date.year(), month, date.day())
    }

    fn set_date(&self, date: &NaiveDateTime, day: u32) -> NaiveDateTime {
        Self::with_day_clamped(date, date.year(), date.month0(), day)
    }

    fn set_hour(&self, date: &NaiveDateTime, hour: u32) -> NaiveDateTime {
        date.with_hour(hour.min(23)).unwrap_or(*date)
    }

    fn set_minute(&self, date: &NaiveDateTime, minute: u32) -> NaiveDateTime {
        date.with_minute(minute.min(59)).unwrap_or(*date)
    }

    fn set_second(&self, date: &NaiveDateTime, second: u32) -> NaiveDateTime {
        date.with_second(second.min(59)).unwrap_or(*date)
    }

    fn set_millisecond(&self, date: &NaiveDateTime, millisecond: u32) -> NaiveDateTime {
        date.with_nanosecond(millisecond.min(999) * 1_000_000)
            .unwrap_or(*date)
    }

    fn add_year(&self, date: &NaiveDateTime, diff: i32) -> NaiveDateTime {
        self.add_month(date, diff.saturating_mul(12))
    }

    fn add_month(&self, date: &NaiveDateTime, diff: i32) -> NaiveDateTime {
        let months = Months::new(diff.unsigned_abs());
        let shifted = if diff >= 0 {
            date.checked_add_months(months)
        } else {
            date.checked_sub_months(months)
        };
        shifted.unwrap_or(*date)
    }

    fn add_date(&self, date: &NaiveDateTime, diff: i32) -> NaiveDateTime {
        date.checked_add_signed(Duration::days(i64::from(diff)))
            .unwrap_or(*date)
    }

    fn is_after(&self, a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
        a > b
    }

    fn is_validate(&self, _date: &NaiveDateTime) -> bool {
        // Every constructed NaiveDateTime is a real instant.
        true
    }

    fn timestamp_millis(&self, date: &NaiveDateTime) -> i64 {
        date.and_utc().timestamp_millis()
    }

    fn week_first_date(&self, locale: &Locale, date: &NaiveDateTime) -> NaiveDateTime {
        let week_day = self.get_week_day(date);
        let back = (week_day + 7 - locale.week_start % 7) % 7;
        self.add_date(date, -(back as i32))
    }

    fn get_week(&self, locale: &Locale, date: &NaiveDateTime) -> u32 {
        self.week_number(locale, date).1
    }

    fn format(&self, locale: &Locale, date: &NaiveDateTime, pattern: &str) -> String {
        let (week_year, week) = self.week_number(locale, date);
        let fields = DateFields {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
            hour: date.hour(),
            minute: date.minute(),
            second: date.second(),
            millisecond: self.get_millisecond(date),
            week,
            week_year,
        };
        format::format_fields(&format::tokenize(pattern), &fields, locale)
    }

    fn parse(&self, locale: &Locale, text: &str, patterns: &[String]) -> Result<NaiveDateTime, ParseError> {
        let mut last_err = ParseError::NoMatch(patterns.len());
        for pattern in patterns {
            let parsed = format::parse_fields(&format::tokenize(pattern), text, locale)
                .and_then(|fields| self.resolve(locale, &fields));
            match parsed {
                Ok(date) => return Ok(date),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn set_date_clamps_to_month_end() {
        let gc = ChronoGenerate::new();
        let feb = dt(2024, 2, 10, 0, 0);
        assert_eq!(gc.set_date(&feb, 31), dt(2024, 2, 29, 0, 0));
        let jan31 = dt(2023, 1, 31, 8, 0);
        assert_eq!(gc.set_month(&jan31, 1), dt(2023, 2, 28, 8, 0));
    }

    #[test]
    fn add_month_clamps_and_goes_backwards() {
        let gc = ChronoGenerate::new();
        assert_eq!(gc.add_month(&dt(2024, 1, 31, 0, 0), 1), dt(2024, 2, 29, 0, 0));
        assert_eq!(gc.add_month(&dt(2024, 3, 15, 0, 0), -3), dt(2023, 12, 15, 0, 0));
        assert_eq!(gc.add_year(&dt(2024, 2, 29, 0, 0), 1), dt(2025, 2, 28, 0, 0));
    }

    #[test]
    fn end_date_keeps_time() {
        let gc = ChronoGenerate::new();
        assert_eq!(gc.get_end_date(&dt(2023, 4, 3, 9, 30)), dt(2023, 4, 30, 9, 30));
    }

    #[test]
    fn week_first_date_respects_locale() {
        let gc = ChronoGenerate::new();
        // 2024-01-10 is a Wednesday.
        let wed = dt(2024, 1, 10, 0, 0);
        assert_eq!(gc.week_first_date(&Locale::en_us(), &wed), dt(2024, 1, 7, 0, 0));
        assert_eq!(gc.week_first_date(&Locale::zh_cn(), &wed), dt(2024, 1, 8, 0, 0));
    }

    #[test]
    fn us_week_numbers() {
        let gc = ChronoGenerate::new();
        let locale = Locale::en_us();
        assert_eq!(gc.get_week(&locale, &dt(2024, 1, 1, 0, 0)), 1);
        assert_eq!(gc.get_week(&locale, &dt(2024, 1, 7, 0, 0)), 2);
        // The week of 2024-12-29 contains 2025-01-01.
        assert_eq!(gc.get_week(&locale, &dt(2024, 12, 30, 0, 0)), 1);
    }

    #[test]
    fn format_and_parse_date_time() {
        let gc = ChronoGenerate::new();
        let locale = Locale::en_us();
        let date = dt(2024, 3, 9, 14, 5);
        let text = gc.format(&locale, &date, "YYYY-MM-DD HH:mm:ss");
        assert_eq!(text, "2024-03-09 14:05:00");
        assert_eq!(
            gc.parse(&locale, &text, &["YYYY-MM-DD HH:mm:ss".to_string()]),
            Ok(date)
        );
    }

    #[test]
    fn parse_tries_every_pattern() {
        let gc = ChronoGenerate::new();
        let locale = Locale::en_us();
        let patterns = vec!["YYYY-MM-DD".to_string(), "YYYY/MM/DD".to_string()];
        assert_eq!(
            gc.parse(&locale, "2024/02/01", &patterns),
            Ok(dt(2024, 2, 1, 0, 0))
        );
        assert!(gc.parse(&locale, "2024.02.01", &patterns).is_err());
    }

    #[test]
    fn parse_rejects_impossible_day() {
        let gc = ChronoGenerate::new();
        let locale = Locale::en_us();
        assert!(matches!(
            gc.parse(&locale, "2023-02-29", &["YYYY-MM-DD".to_string()]),
            Err(ParseError::OutOfRange { field: "day", .. })
        ));
    }

    #[test]
    fn parse_week_lands_on_week_start() {
        let gc = ChronoGenerate::new();
        let locale = Locale::en_us();
        let date = gc
            .parse(&locale, "2024-2nd", &["YYYY-wo".to_string()])
            .unwrap();
        assert_eq!(date, dt(2024, 1, 7, 0, 0));
        assert_eq!(gc.format(&locale, &date, "YYYY-wo"), "2024-2nd");
    }

    #[test]
    fn quarter_round_trip() {
        let gc = ChronoGenerate::new();
        let locale = Locale::en_us();
        let date = dt(2024, 8, 20, 0, 0);
        assert_eq!(gc.format(&locale, &date, "YYYY-[Q]Q"), "2024-Q3");
        assert_eq!(
            gc.parse(&locale, "2024-Q3", &["YYYY-[Q]Q".to_string()]),
            Ok(dt(2024, 7, 1, 0, 0))
        );
    }

    #[test]
    fn pinned_now() {
        let now = dt(2024, 6, 1, 12, 0);
        assert_eq!(ChronoGenerate::with_now(now).get_now(), now);
    }
}
