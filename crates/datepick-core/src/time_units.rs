//! Hour, minute, second and millisecond columns.
//!
//! Units are generated per column with a step and a disabled list. The
//! disabled list of a column may depend on the values already chosen in the
//! coarser columns (minutes depend on the hour, seconds on hour and minute),
//! so [`TimeInfo::valid_time`] resolves columns strictly one after another.

use crate::active::RangeSide;
use crate::error::ConfigWarning;
use crate::format::{self, Meridiem, Token};
use crate::generate::GenerateConfig;
use crate::locale::Locale;
use std::fmt;
use std::sync::Arc;

/// One selectable entry of a time column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub label: String,
    pub value: u32,
    pub disabled: bool,
}

/// Which time column a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Hour,
    Minute,
    Second,
    Millisecond,
}

/// Build the units `start..=end` stepping by `step` (at least 1).
///
/// Disabled values are flagged, or left out entirely when `hide_disabled`
/// is set. Labels are zero padded to `pad` digits.
pub fn generate_units(
    start: u32,
    end: u32,
    step: u32,
    hide_disabled: bool,
    disabled: &[u32],
    pad: usize,
) -> Vec<Unit> {
    (start..=end)
        .step_by(step.max(1) as usize)
        .filter_map(|value| {
            let disabled = disabled.contains(&value);
            (!disabled || !hide_disabled).then(|| Unit {
                label: format!("{value:0pad$}"),
                value,
                disabled,
            })
        })
        .collect()
}

/// Move from `current` by `delta` enabled units.
///
/// Disabled units are never landed on, whether they are flagged or hidden.
/// Movement stops at the first and last enabled unit. When `current` is not
/// an enabled unit, the nearest enabled unit in the direction of travel is
/// returned.
pub fn step_unit(units: &[Unit], current: u32, delta: i32) -> Option<u32> {
    let enabled: Vec<u32> = units.iter().filter(|u| !u.disabled).map(|u| u.value).collect();
    if enabled.is_empty() {
        return None;
    }
    let idx = match enabled.iter().position(|v| *v == current) {
        Some(idx) => idx as i64 + i64::from(delta),
        None if delta >= 0 => {
            let after = enabled.iter().position(|v| *v > current).unwrap_or(enabled.len() - 1);
            after as i64 + i64::from(delta.max(1)) - 1
        }
        None => {
            let before = enabled.iter().rposition(|v| *v < current).unwrap_or(0);
            before as i64 + i64::from(delta) + 1
        }
    };
    let idx = idx.clamp(0, enabled.len() as i64 - 1) as usize;
    Some(enabled[idx])
}

type HoursFn = Arc<dyn Fn() -> Vec<u32> + Send + Sync>;
type MinutesFn = Arc<dyn Fn(u32) -> Vec<u32> + Send + Sync>;
type SecondsFn = Arc<dyn Fn(u32, u32) -> Vec<u32> + Send + Sync>;
type MillisecondsFn = Arc<dyn Fn(u32, u32, u32) -> Vec<u32> + Send + Sync>;

/// Per-column disabled lists returned by a `disabled_time` callback.
#[derive(Clone, Default)]
pub struct DisabledTimes {
    hours: Option<HoursFn>,
    minutes: Option<MinutesFn>,
    seconds: Option<SecondsFn>,
    milliseconds: Option<MillisecondsFn>,
}

impl DisabledTimes {
    /// Nothing disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hours(mut self, f: impl Fn() -> Vec<u32> + Send + Sync + 'static) -> Self {
        self.hours = Some(Arc::new(f));
        self
    }

    pub fn with_minutes(mut self, f: impl Fn(u32) -> Vec<u32> + Send + Sync + 'static) -> Self {
        self.minutes = Some(Arc::new(f));
        self
    }

    pub fn with_seconds(mut self, f: impl Fn(u32, u32) -> Vec<u32> + Send + Sync + 'static) -> Self {
        self.seconds = Some(Arc::new(f));
        self
    }

    pub fn with_milliseconds(
        mut self,
        f: impl Fn(u32, u32, u32) -> Vec<u32> + Send + Sync + 'static,
    ) -> Self {
        self.milliseconds = Some(Arc::new(f));
        self
    }

    pub fn hours(&self) -> Vec<u32> {
        self.hours.as_ref().map(|f| f()).unwrap_or_default()
    }

    pub fn minutes(&self, hour: u32) -> Vec<u32> {
        self.minutes.as_ref().map(|f| f(hour)).unwrap_or_default()
    }

    pub fn seconds(&self, hour: u32, minute: u32) -> Vec<u32> {
        self.seconds
            .as_ref()
            .map(|f| f(hour, minute))
            .unwrap_or_default()
    }

    pub fn milliseconds(&self, hour: u32, minute: u32, second: u32) -> Vec<u32> {
        self.milliseconds
            .as_ref()
            .map(|f| f(hour, minute, second))
            .unwrap_or_default()
    }
}

impl fmt::Debug for DisabledTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisabledTimes")
            .field("hours", &self.hours.is_some())
            .field("minutes", &self.minutes.is_some())
            .field("seconds", &self.seconds.is_some())
            .field("milliseconds", &self.milliseconds.is_some())
            .finish()
    }
}

/// Context handed to a `disabled_time` callback.
#[derive(Debug, Clone, PartialEq)]
pub struct DisabledTimeInfo<D> {
    /// Which range endpoint is being edited; `None` for single pickers.
    pub range: Option<RangeSide>,
    /// The other endpoint's value, when it constrains this one.
    pub from: Option<D>,
}

impl<D> Default for DisabledTimeInfo<D> {
    fn default() -> Self {
        Self {
            range: None,
            from: None,
        }
    }
}

pub type DisabledTimeFn<D> = Arc<dyn Fn(&D, &DisabledTimeInfo<D>) -> DisabledTimes + Send + Sync>;

/// Time column configuration (`showTime`).
pub struct TimeConfig<D> {
    pub show_hour: bool,
    pub show_minute: bool,
    pub show_second: bool,
    pub show_millisecond: bool,
    pub use_12_hours: bool,
    pub hour_step: u32,
    pub minute_step: u32,
    pub second_step: u32,
    pub millisecond_step: u32,
    pub hide_disabled_options: bool,
    pub disabled_time: Option<DisabledTimeFn<D>>,
    /// Time of day applied when a date cell is picked and no time exists yet.
    pub default_value: Option<D>,
}

impl<D> Default for TimeConfig<D> {
    fn default() -> Self {
        Self {
            show_hour: true,
            show_minute: true,
            show_second: true,
            show_millisecond: false,
            use_12_hours: false,
            hour_step: 1,
            minute_step: 1,
            second_step: 1,
            millisecond_step: 100,
            hide_disabled_options: false,
            disabled_time: None,
            default_value: None,
        }
    }
}

impl<D: Clone> Clone for TimeConfig<D> {
    fn clone(&self) -> Self {
        Self {
            disabled_time: self.disabled_time.clone(),
            default_value: self.default_value.clone(),
            ..*self
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for TimeConfig<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeConfig")
            .field("format", &self.format())
            .field("steps", &(self.hour_step, self.minute_step, self.second_step, self.millisecond_step))
            .field("hide_disabled_options", &self.hide_disabled_options)
            .field("disabled_time", &self.disabled_time.is_some())
            .field("default_value", &self.default_value)
            .finish()
    }
}

impl<D> TimeConfig<D> {
    /// Derive column visibility and the 12-hour flag from a pattern.
    pub fn from_format(pattern: &str) -> Self {
        let tokens = format::tokenize(pattern);
        let has = |candidates: &[Token]| tokens.iter().any(|t| candidates.contains(t));
        let twelve = has(&[Token::Hour12, Token::Hour12Padded]);
        Self {
            show_hour: twelve || has(&[Token::Hour1, Token::Hour2]),
            show_minute: has(&[Token::Minute1, Token::Minute2]),
            show_second: has(&[Token::Second1, Token::Second2]),
            show_millisecond: has(&[Token::Millisecond]),
            use_12_hours: twelve,
            ..Self::default()
        }
    }

    pub fn with_show_hour(mut self, show: bool) -> Self {
        self.show_hour = show;
        self
    }

    pub fn with_show_minute(mut self, show: bool) -> Self {
        self.show_minute = show;
        self
    }

    pub fn with_show_second(mut self, show: bool) -> Self {
        self.show_second = show;
        self
    }

    pub fn with_show_millisecond(mut self, show: bool) -> Self {
        self.show_millisecond = show;
        self
    }

    pub fn with_12_hours(mut self, use_12_hours: bool) -> Self {
        self.use_12_hours = use_12_hours;
        self
    }

    pub fn with_steps(mut self, hour: u32, minute: u32, second: u32) -> Self {
        self.hour_step = hour;
        self.minute_step = minute;
        self.second_step = second;
        self
    }

    pub fn with_millisecond_step(mut self, step: u32) -> Self {
        self.millisecond_step = step;
        self
    }

    pub fn with_hide_disabled_options(mut self, hide: bool) -> Self {
        self.hide_disabled_options = hide;
        self
    }

    pub fn with_disabled_time(
        mut self,
        f: impl Fn(&D, &DisabledTimeInfo<D>) -> DisabledTimes + Send + Sync + 'static,
    ) -> Self {
        self.disabled_time = Some(Arc::new(f));
        self
    }

    pub fn with_default_value(mut self, value: D) -> Self {
        self.default_value = Some(value);
        self
    }

    /// The input pattern matching the visible columns.
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.show_hour {
            parts.push(if self.use_12_hours { "hh" } else { "HH" });
        }
        if self.show_minute {
            parts.push("mm");
        }
        if self.show_second {
            parts.push("ss");
        }
        let mut pattern = parts.join(":");
        if self.show_millisecond {
            pattern.push_str(if pattern.is_empty() { "SSS" } else { ".SSS" });
        }
        if self.use_12_hours {
            pattern.push_str(" A");
        }
        pattern
    }

    /// Steps that do not divide their unit.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let checks = [
            ("hour", self.hour_step, 24),
            ("minute", self.minute_step, 60),
            ("second", self.second_step, 60),
        ];
        checks
            .into_iter()
            .filter(|(_, step, total)| *step > 0 && total % step != 0)
            .map(|(unit, step, total)| ConfigWarning::InvalidStep { unit, step, total })
            .collect()
    }

    /// Disabled lists for `date`, or nothing without a callback or date.
    pub fn disabled_for(&self, date: Option<&D>, info: &DisabledTimeInfo<D>) -> DisabledTimes {
        match (&self.disabled_time, date) {
            (Some(f), Some(date)) => f(date, info),
            _ => DisabledTimes::default(),
        }
    }

    /// Column state for the disabled lists that apply to `date`.
    pub fn info(&self, date: Option<&D>, info: &DisabledTimeInfo<D>) -> TimeInfo<'_, D> {
        TimeInfo {
            config: self,
            disabled: self.disabled_for(date, info),
        }
    }
}

/// Resolved columns for one disabled configuration.
pub struct TimeInfo<'a, D> {
    config: &'a TimeConfig<D>,
    disabled: DisabledTimes,
}

/// AM/PM entry of a 12-hour column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeridiemUnit {
    pub label: String,
    pub value: Meridiem,
    pub disabled: bool,
}

impl<'a, D> TimeInfo<'a, D> {
    /// All 24 hours. In 12-hour mode labels read `12, 01 .. 11` twice.
    pub fn hour_units(&self) -> Vec<Unit> {
        let c = self.config;
        let units = generate_units(0, 23, c.hour_step, c.hide_disabled_options, &self.disabled.hours(), 2);
        if !c.use_12_hours {
            return units;
        }
        units
            .into_iter()
            .map(|unit| Unit {
                label: format!("{:02}", match unit.value % 12 {
                    0 => 12,
                    h => h,
                }),
                ..unit
            })
            .collect()
    }

    /// Hours of one half of the day, as shown in a 12-hour column.
    pub fn hour_units_for(&self, meridiem: Meridiem) -> Vec<Unit> {
        self.hour_units()
            .into_iter()
            .filter(|u| Meridiem::of_hour(u.value) == meridiem)
            .collect()
    }

    pub fn minute_units(&self, hour: u32) -> Vec<Unit> {
        let c = self.config;
        generate_units(0, 59, c.minute_step, c.hide_disabled_options, &self.disabled.minutes(hour), 2)
    }

    pub fn second_units(&self, hour: u32, minute: u32) -> Vec<Unit> {
        let c = self.config;
        generate_units(
            0,
            59,
            c.second_step,
            c.hide_disabled_options,
            &self.disabled.seconds(hour, minute),
            2,
        )
    }

    pub fn millisecond_units(&self, hour: u32, minute: u32, second: u32) -> Vec<Unit> {
        let c = self.config;
        generate_units(
            0,
            999,
            c.millisecond_step,
            c.hide_disabled_options,
            &self.disabled.milliseconds(hour, minute, second),
            3,
        )
    }

    /// AM and PM, each disabled when every hour of its half is.
    pub fn meridiem_units(&self, locale: &Locale) -> Vec<MeridiemUnit> {
        let hours = self.hour_units();
        let all_disabled = |m: Meridiem| {
            hours
                .iter()
                .filter(|u| Meridiem::of_hour(u.value) == m)
                .all(|u| u.disabled)
        };
        vec![
            MeridiemUnit {
                label: locale.am().to_string(),
                value: Meridiem::Am,
                disabled: all_disabled(Meridiem::Am),
            },
            MeridiemUnit {
                label: locale.pm().to_string(),
                value: Meridiem::Pm,
                disabled: all_disabled(Meridiem::Pm),
            },
        ]
    }

    /// Repair `candidate` so every column holds an enabled value.
    ///
    /// Columns are checked hour, minute, second, millisecond. A column keeps
    /// its value when that value is listed and enabled, otherwise takes the
    /// first enabled unit; with no enabled unit at all it is left as is.
    pub fn valid_time<G>(&self, gc: &G, candidate: &D) -> D
    where
        D: Clone,
        G: GenerateConfig<Date = D>,
    {
        fn align<G: GenerateConfig>(
            gc: &G,
            date: G::Date,
            current: u32,
            units: &[Unit],
            set: impl Fn(&G, &G::Date, u32) -> G::Date,
        ) -> (G::Date, u32) {
            let keep = units.iter().any(|u| u.value == current && !u.disabled);
            if keep {
                return (date, current);
            }
            match units.iter().find(|u| !u.disabled) {
                Some(unit) => (set(gc, &date, unit.value), unit.value),
                None => (date, current),
            }
        }

        let date = candidate.clone();
        let (date, hour) = align(gc, date.clone(), gc.get_hour(&date), &self.hour_units(), G::set_hour);
        let (date, minute) = align(
            gc,
            date.clone(),
            gc.get_minute(&date),
            &self.minute_units(hour),
            G::set_minute,
        );
        let (date, second) = align(
            gc,
            date.clone(),
            gc.get_second(&date),
            &self.second_units(hour, minute),
            G::set_second,
        );
        let (date, _) = align(
            gc,
            date.clone(),
            gc.get_millisecond(&date),
            &self.millisecond_units(hour, minute, second),
            G::set_millisecond,
        );
        date
    }
}

impl<D> TimeConfig<D> {
    /// [`TimeInfo::valid_time`] using the disabled lists that apply to
    /// `certain_date` (or to the candidate itself when absent).
    pub fn valid_time<G>(
        &self,
        gc: &G,
        candidate: &D,
        certain_date: Option<&D>,
        info: &DisabledTimeInfo<D>,
    ) -> D
    where
        D: Clone,
        G: GenerateConfig<Date = D>,
    {
        let basis = certain_date.unwrap_or(candidate);
        self.info(Some(basis), info).valid_time(gc, candidate)
    }
}

/// Flip between AM and PM by twelve hours, clamped to the day.
pub fn toggle_meridiem<G: GenerateConfig>(gc: &G, date: &G::Date) -> G::Date {
    let hour = gc.get_hour(date);
    let next = if hour < 12 {
        (hour + 12).min(23)
    } else {
        hour.saturating_sub(12)
    };
    gc.set_hour(date, next)
}

/// Set one column of `date`.
pub fn set_unit<G: GenerateConfig>(gc: &G, date: &G::Date, unit: TimeUnit, value: u32) -> G::Date {
    match unit {
        TimeUnit::Hour => gc.set_hour(date, value),
        TimeUnit::Minute => gc.set_minute(date, value),
        TimeUnit::Second => gc.set_second(date, value),
        TimeUnit::Millisecond => gc.set_millisecond(date, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::ChronoGenerate;
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn units_honor_step_and_flags() {
        let units = generate_units(0, 10, 5, false, &[5], 2);
        assert_eq!(units.iter().map(|u| u.value).collect::<Vec<_>>(), vec![0, 5, 10]);
        assert!(units[1].disabled);
        assert_eq!(units[0].label, "00");

        let hidden = generate_units(0, 10, 5, true, &[5], 2);
        assert_eq!(hidden.iter().map(|u| u.value).collect::<Vec<_>>(), vec![0, 10]);
    }

    #[test]
    fn zero_step_behaves_like_one() {
        assert_eq!(generate_units(0, 3, 0, false, &[], 2).len(), 4);
    }

    #[test]
    fn millisecond_labels_pad_to_three() {
        let units = generate_units(0, 999, 100, false, &[], 3);
        assert_eq!(units.len(), 10);
        assert_eq!(units[1].label, "100");
        assert_eq!(units[0].label, "000");
    }

    #[test]
    fn twelve_hour_labels() {
        let config = TimeConfig::<NaiveDateTime>::default().with_12_hours(true);
        let info = config.info(None, &DisabledTimeInfo::default());
        let hours = info.hour_units();
        assert_eq!(hours[0].label, "12");
        assert_eq!(hours[13].label, "01");
        let pm = info.hour_units_for(Meridiem::Pm);
        assert_eq!(pm.first().map(|u| u.value), Some(12));
        assert_eq!(pm.len(), 12);
    }

    #[test]
    fn valid_time_prefers_afternoon_when_morning_disabled() {
        let gc = ChronoGenerate::new();
        let config = TimeConfig::default()
            .with_12_hours(true)
            .with_disabled_time(|_, _| DisabledTimes::new().with_hours(|| (0..12).collect()));
        let repaired = config.valid_time(&gc, &at(3, 15, 0), None, &DisabledTimeInfo::default());
        assert_eq!(repaired.hour(), 12);
        assert_eq!(repaired.minute(), 15);
    }

    #[test]
    fn valid_time_resolves_minutes_after_hour() {
        let gc = ChronoGenerate::new();
        let config = TimeConfig::default().with_disabled_time(|_, _| {
            DisabledTimes::new()
                .with_hours(|| vec![9])
                // Minutes below 30 are only disabled at ten o'clock.
                .with_minutes(|hour| if hour == 10 { (0..30).collect() } else { vec![] })
        });
        let repaired = config.valid_time(&gc, &at(10, 5, 0), None, &DisabledTimeInfo::default());
        assert_eq!((repaired.hour(), repaired.minute()), (10, 30));
        let repaired = config.valid_time(&gc, &at(9, 5, 0), None, &DisabledTimeInfo::default());
        assert_eq!((repaired.hour(), repaired.minute()), (0, 5));
    }

    #[test]
    fn valid_time_is_idempotent() {
        let gc = ChronoGenerate::new();
        let config = TimeConfig::default()
            .with_steps(2, 15, 10)
            .with_disabled_time(|_, _| {
                DisabledTimes::new()
                    .with_hours(|| vec![0, 2, 4])
                    .with_minutes(|h| if h % 3 == 0 { vec![0, 15] } else { vec![] })
                    .with_seconds(|_, m| if m == 30 { vec![0, 10, 20] } else { vec![] })
            });
        let info = DisabledTimeInfo::default();
        for (h, m, s) in [(0, 0, 0), (3, 7, 59), (23, 59, 59), (6, 30, 5), (11, 44, 1)] {
            let once = config.valid_time(&gc, &at(h, m, s), None, &info);
            let twice = config.valid_time(&gc, &once, None, &info);
            assert_eq!(once, twice, "from {h}:{m}:{s}");
        }
    }

    #[test]
    fn valid_time_fails_open() {
        let gc = ChronoGenerate::new();
        let config = TimeConfig::default()
            .with_disabled_time(|_, _| DisabledTimes::new().with_hours(|| (0..24).collect()));
        let candidate = at(7, 0, 0);
        assert_eq!(
            config.valid_time(&gc, &candidate, None, &DisabledTimeInfo::default()),
            candidate
        );
    }

    #[test]
    fn invalid_steps_warn() {
        let config = TimeConfig::<NaiveDateTime>::default().with_steps(5, 7, 1);
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], ConfigWarning::InvalidStep { unit: "hour", step: 5, total: 24 }));
    }

    #[test]
    fn meridiem_toggle_never_wraps() {
        let gc = ChronoGenerate::new();
        assert_eq!(toggle_meridiem(&gc, &at(0, 0, 0)).hour(), 12);
        assert_eq!(toggle_meridiem(&gc, &at(23, 0, 0)).hour(), 11);
        assert_eq!(toggle_meridiem(&gc, &at(11, 0, 0)).hour(), 23);
    }

    #[test]
    fn meridiem_units_disable_empty_half() {
        let config = TimeConfig::<NaiveDateTime>::default()
            .with_12_hours(true)
            .with_disabled_time(|_, _| DisabledTimes::new().with_hours(|| (0..12).collect()));
        let info = config.info(Some(&at(0, 0, 0)), &DisabledTimeInfo::default());
        let units = info.meridiem_units(&Locale::default());
        assert!(units[0].disabled);
        assert!(!units[1].disabled);
    }

    #[test]
    fn keyboard_steps_skip_disabled_units() {
        let units = generate_units(0, 5, 1, false, &[2, 3], 2);
        assert_eq!(step_unit(&units, 1, 1), Some(4));
        assert_eq!(step_unit(&units, 4, -1), Some(1));
        assert_eq!(step_unit(&units, 5, 1), Some(5));
        let hidden = generate_units(0, 5, 1, true, &[2, 3], 2);
        assert_eq!(step_unit(&hidden, 1, 1), Some(4));
        // From a disabled value, move to the next enabled one.
        assert_eq!(step_unit(&units, 2, 1), Some(4));
        assert_eq!(step_unit(&units, 3, -1), Some(1));
    }

    #[test]
    fn format_follows_columns() {
        let config = TimeConfig::<()>::default().with_12_hours(true).with_show_second(false);
        assert_eq!(config.format(), "hh:mm A");
        let derived = TimeConfig::<()>::from_format("h:mm a");
        assert!(derived.use_12_hours && derived.show_minute && !derived.show_second);
    }
}
