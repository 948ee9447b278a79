//! Composition of every rule that can make a date unselectable.
//!
//! Three layers apply, innermost first: the user's `disabled_date`
//! predicate, the `min_date`/`max_date` boundary, and for ranges the rule
//! that a date may not cross a disabled sibling field. Disabled checks are
//! evaluated fresh for every cell since `from` follows the live draft.

use crate::active::RangeSide;
use crate::date_util::is_same;
use crate::generate::GenerateConfig;
use crate::locale::Locale;
use crate::mode::{PanelMode, PickerKind};
use crate::time_units::{DisabledTimeInfo, TimeConfig};
use std::fmt;
use std::sync::Arc;

/// Context handed to a `disabled_date` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct DisabledInfo<D> {
    /// Granularity of the cell being checked.
    pub kind: PanelMode,
    /// Which range endpoint is being edited; `None` for single pickers.
    pub range: Option<RangeSide>,
    /// The other endpoint's value, when it was picked first.
    pub from: Option<D>,
}

pub type DisabledDateFn<D> = Arc<dyn Fn(&D, &DisabledInfo<D>) -> bool + Send + Sync>;

/// User constraints on selectable dates.
pub struct Constraints<D> {
    pub disabled_date: Option<DisabledDateFn<D>>,
    pub min_date: Option<D>,
    pub max_date: Option<D>,
}

impl<D> Default for Constraints<D> {
    fn default() -> Self {
        Self {
            disabled_date: None,
            min_date: None,
            max_date: None,
        }
    }
}

impl<D: Clone> Clone for Constraints<D> {
    fn clone(&self) -> Self {
        Self {
            disabled_date: self.disabled_date.clone(),
            min_date: self.min_date.clone(),
            max_date: self.max_date.clone(),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for Constraints<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("disabled_date", &self.disabled_date.is_some())
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .finish()
    }
}

impl<D> Constraints<D> {
    /// The user predicate, then the boundary. A date in the same
    /// `info.kind` bucket as a boundary is still selectable.
    pub fn boundary_disabled<G>(&self, gc: &G, locale: &Locale, date: &D, info: &DisabledInfo<D>) -> bool
    where
        G: GenerateConfig<Date = D>,
    {
        if let Some(f) = &self.disabled_date {
            if f(date, info) {
                return true;
            }
        }
        if let Some(min) = &self.min_date {
            if gc.is_after(min, date) && !is_same(gc, locale, Some(min), Some(date), info.kind) {
                return true;
            }
        }
        if let Some(max) = &self.max_date {
            if gc.is_after(date, max) && !is_same(gc, locale, Some(max), Some(date), info.kind) {
                return true;
            }
        }
        false
    }
}

/// Everything needed to judge a candidate against the live picker state.
pub struct DisabledScope<'a, G: GenerateConfig, const N: usize> {
    pub gc: &'a G,
    pub locale: &'a Locale,
    pub constraints: &'a Constraints<G::Date>,
    pub picker: PickerKind,
    pub time: Option<&'a TimeConfig<G::Date>>,
    /// Current draft.
    pub values: &'a [Option<G::Date>; N],
    pub disabled: &'a [bool; N],
    pub history: &'a [usize],
}

impl<'a, G: GenerateConfig, const N: usize> DisabledScope<'a, G, N> {
    /// The value of the first valued field in the activation history,
    /// unless that field is the one being edited.
    pub fn from_date(&self, active: Option<usize>) -> Option<&'a G::Date> {
        let values = self.values;
        let first = self
            .history
            .iter()
            .copied()
            .find(|&i| i < N && values[i].is_some())?;
        if Some(first) == active {
            return None;
        }
        values[first].as_ref()
    }

    fn side(&self, active: Option<usize>) -> Option<RangeSide> {
        if N == 2 {
            active.map(RangeSide::from_index)
        } else {
            None
        }
    }

    /// Whether `date`, shown at granularity `kind`, may not be picked for
    /// field `active`.
    pub fn is_disabled(&self, date: &G::Date, kind: PanelMode, active: Option<usize>) -> bool {
        self.is_disabled_from(date, kind, active, self.from_date(active))
    }

    /// [`is_disabled`](Self::is_disabled) with an explicit `from` value.
    pub fn is_disabled_from(
        &self,
        date: &G::Date,
        kind: PanelMode,
        active: Option<usize>,
        from: Option<&G::Date>,
    ) -> bool {
        let gc = self.gc;
        if N == 2 {
            let same = |other: &G::Date| is_same(gc, self.locale, Some(other), Some(date), kind);
            if let (Some(1), true, Some(start)) = (active, self.disabled[0], &self.values[0]) {
                if !same(start) && gc.is_after(start, date) {
                    return true;
                }
            }
            if let (Some(0), true, Some(end)) = (active, self.disabled[N - 1], &self.values[N - 1]) {
                if !same(end) && gc.is_after(date, end) {
                    return true;
                }
            }
        }

        let info = DisabledInfo {
            kind,
            range: self.side(active),
            from: from.cloned(),
        };
        self.constraints.boundary_disabled(gc, self.locale, date, &info)
    }

    /// Whether `date` may not be committed to field `active`: the adapter
    /// rejects it, it is disabled, or (for pickers with a time part) one
    /// of its time columns is disabled.
    pub fn is_invalid(&self, date: &G::Date, active: Option<usize>) -> bool {
        self.is_invalid_from(date, active, self.from_date(active))
    }

    /// [`is_invalid`](Self::is_invalid) with an explicit `from` value.
    pub fn is_invalid_from(&self, date: &G::Date, active: Option<usize>, from: Option<&G::Date>) -> bool {
        let gc = self.gc;
        if !gc.is_validate(date)
            || self.is_disabled_from(date, self.picker.internal_mode(false), active, from)
        {
            return true;
        }

        let Some(time) = self.time.filter(|_| self.picker.supports_time()) else {
            return false;
        };
        let info = DisabledTimeInfo {
            range: self.side(active),
            from: from.cloned(),
        };
        let disabled = time.disabled_for(Some(date), &info);
        let (h, m, s) = (gc.get_hour(date), gc.get_minute(date), gc.get_second(date));
        disabled.hours().contains(&h)
            || disabled.minutes(h).contains(&m)
            || disabled.seconds(h, m).contains(&s)
            || disabled.milliseconds(h, m, s).contains(&gc.get_millisecond(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::ChronoGenerate;
    use crate::time_units::DisabledTimes;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn scope<'a>(
        gc: &'a ChronoGenerate,
        locale: &'a Locale,
        constraints: &'a Constraints<NaiveDateTime>,
        values: &'a [Option<NaiveDateTime>; 2],
        disabled: &'a [bool; 2],
        history: &'a [usize],
    ) -> DisabledScope<'a, ChronoGenerate, 2> {
        DisabledScope {
            gc,
            locale,
            constraints,
            picker: PickerKind::Date,
            time: None,
            values,
            disabled,
            history,
        }
    }

    #[test]
    fn start_cannot_pass_disabled_end() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let constraints = Constraints::default();
        let values = [None, Some(dt(2024, 1, 10))];
        let disabled = [false, true];
        let scope = scope(&gc, &locale, &constraints, &values, &disabled, &[]);

        for day in 11..=31 {
            assert!(scope.is_disabled(&dt(2024, 1, day), PanelMode::Date, Some(0)), "day {day}");
        }
        assert!(!scope.is_disabled(&dt(2024, 1, 10), PanelMode::Date, Some(0)));
        assert!(!scope.is_disabled(&dt(2024, 1, 9), PanelMode::Date, Some(0)));
        // The rule only constrains the start field.
        assert!(!scope.is_disabled(&dt(2024, 1, 20), PanelMode::Date, Some(1)));
    }

    #[test]
    fn end_cannot_precede_disabled_start() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let constraints = Constraints::default();
        let values = [Some(dt(2024, 3, 15)), None];
        let disabled = [true, false];
        let scope = scope(&gc, &locale, &constraints, &values, &disabled, &[]);
        assert!(scope.is_disabled(&dt(2024, 2, 1), PanelMode::Month, Some(1)));
        // Same month as the start is tolerated at month granularity.
        assert!(!scope.is_disabled(&dt(2024, 3, 1), PanelMode::Month, Some(1)));
    }

    #[test]
    fn boundary_tolerates_same_bucket() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let constraints = Constraints {
            min_date: Some(dt(2024, 5, 20)),
            max_date: Some(dt(2024, 8, 10)),
            ..Constraints::default()
        };
        let info = DisabledInfo {
            kind: PanelMode::Month,
            range: None,
            from: None,
        };
        assert!(!constraints.boundary_disabled(&gc, &locale, &dt(2024, 5, 1), &info));
        assert!(constraints.boundary_disabled(&gc, &locale, &dt(2024, 4, 30), &info));
        assert!(!constraints.boundary_disabled(&gc, &locale, &dt(2024, 8, 31), &info));
        assert!(constraints.boundary_disabled(&gc, &locale, &dt(2024, 9, 1), &info));
        let by_date = DisabledInfo {
            kind: PanelMode::Date,
            ..info
        };
        assert!(constraints.boundary_disabled(&gc, &locale, &dt(2024, 5, 19), &by_date));
    }

    #[test]
    fn predicate_sees_first_picked_value_as_from() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let constraints = Constraints {
            disabled_date: Some(Arc::new(|date: &NaiveDateTime, info: &DisabledInfo<NaiveDateTime>| {
                // At most a week away from the first picked date.
                info.from
                    .map(|from| (*date - from).num_days().abs() > 7)
                    .unwrap_or(false)
            }) as DisabledDateFn<NaiveDateTime>),
            ..Constraints::default()
        };
        let values = [Some(dt(2024, 1, 10)), None];
        let disabled = [false, false];
        let history = [0, 1];
        let scope = scope(&gc, &locale, &constraints, &values, &disabled, &history);
        assert_eq!(scope.from_date(Some(1)).map(|d| d.day()), Some(10));
        assert!(scope.from_date(Some(0)).is_none());
        assert!(scope.is_disabled(&dt(2024, 1, 20), PanelMode::Date, Some(1)));
        assert!(!scope.is_disabled(&dt(2024, 1, 15), PanelMode::Date, Some(1)));
    }

    #[test]
    fn invalid_checks_time_columns() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let constraints = Constraints::default();
        let time = TimeConfig::default().with_disabled_time(|_, info: &DisabledTimeInfo<NaiveDateTime>| {
            match info.range {
                Some(RangeSide::End) => DisabledTimes::new().with_hours(|| vec![0]),
                _ => DisabledTimes::new(),
            }
        });
        let values = [None, None];
        let disabled = [false, false];
        let scope = DisabledScope {
            time: Some(&time),
            ..scope(&gc, &locale, &constraints, &values, &disabled, &[])
        };
        let midnight = dt(2024, 1, 1);
        assert!(!scope.is_invalid(&midnight, Some(0)));
        assert!(scope.is_invalid(&midnight, Some(1)));
    }
}
