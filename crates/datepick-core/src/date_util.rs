//! Granularity-aware comparisons built on the adapter.

use crate::generate::GenerateConfig;
use crate::locale::Locale;
use crate::mode::PanelMode;

fn nullable<D>(a: Option<&D>, b: Option<&D>, compare: impl FnOnce(&D, &D) -> bool) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => compare(a, b),
        _ => false,
    }
}

pub fn is_same_year<G: GenerateConfig>(gc: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| gc.get_year(a) == gc.get_year(b))
}

pub fn is_same_decade<G: GenerateConfig>(gc: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        gc.get_year(a).div_euclid(10) == gc.get_year(b).div_euclid(10)
    })
}

pub fn is_same_quarter<G: GenerateConfig>(gc: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        gc.get_year(a) == gc.get_year(b) && gc.get_month(a) / 3 == gc.get_month(b) / 3
    })
}

pub fn is_same_month<G: GenerateConfig>(gc: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        gc.get_year(a) == gc.get_year(b) && gc.get_month(a) == gc.get_month(b)
    })
}

pub fn is_same_date<G: GenerateConfig>(gc: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        gc.get_year(a) == gc.get_year(b)
            && gc.get_month(a) == gc.get_month(b)
            && gc.get_date(a) == gc.get_date(b)
    })
}

pub fn is_same_time<G: GenerateConfig>(gc: &G, a: Option<&G::Date>, b: Option<&G::Date>) -> bool {
    nullable(a, b, |a, b| {
        gc.get_hour(a) == gc.get_hour(b)
            && gc.get_minute(a) == gc.get_minute(b)
            && gc.get_second(a) == gc.get_second(b)
    })
}

pub fn is_same_week<G: GenerateConfig>(
    gc: &G,
    locale: &Locale,
    a: Option<&G::Date>,
    b: Option<&G::Date>,
) -> bool {
    nullable(a, b, |a, b| {
        let wa = gc.week_first_date(locale, a);
        let wb = gc.week_first_date(locale, b);
        is_same_date(gc, Some(&wa), Some(&wb))
    })
}

pub fn is_same_timestamp<G: GenerateConfig>(
    gc: &G,
    a: Option<&G::Date>,
    b: Option<&G::Date>,
) -> bool {
    nullable(a, b, |a, b| {
        a == b || gc.timestamp_millis(a) == gc.timestamp_millis(b)
    })
}

/// Same-granularity equality for `mode`.
///
/// Two empty values are equal; an empty and a present value never are.
/// Date-time panels compare full timestamps.
pub fn is_same<G: GenerateConfig>(
    gc: &G,
    locale: &Locale,
    a: Option<&G::Date>,
    b: Option<&G::Date>,
    mode: PanelMode,
) -> bool {
    match mode {
        PanelMode::Decade => is_same_decade(gc, a, b),
        PanelMode::Year => is_same_year(gc, a, b),
        PanelMode::Quarter => is_same_quarter(gc, a, b),
        PanelMode::Month => is_same_month(gc, a, b),
        PanelMode::Week => is_same_week(gc, locale, a, b),
        PanelMode::Date => is_same_date(gc, a, b),
        PanelMode::Time => is_same_time(gc, a, b),
        PanelMode::DateTime => is_same_timestamp(gc, a, b),
    }
}

/// `current` lies strictly between `start` and `end` (by date).
pub fn is_in_range<G: GenerateConfig>(
    gc: &G,
    start: Option<&G::Date>,
    end: Option<&G::Date>,
    current: &G::Date,
) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => {
            !is_same_date(gc, Some(start), Some(current))
                && !is_same_date(gc, Some(end), Some(current))
                && gc.is_after(current, start)
                && gc.is_after(end, current)
        }
        _ => false,
    }
}

/// Copy the time of day from `time` onto `date`. Without a source the
/// date is returned unchanged.
pub fn fill_time<G: GenerateConfig>(gc: &G, date: &G::Date, time: Option<&G::Date>) -> G::Date {
    let Some(time) = time else {
        return date.clone();
    };
    let next = gc.set_hour(date, gc.get_hour(time));
    let next = gc.set_minute(&next, gc.get_minute(time));
    let next = gc.set_second(&next, gc.get_second(time));
    gc.set_millisecond(&next, gc.get_millisecond(time))
}

/// Elementwise comparison of two value arrays.
///
/// Returns `(all_same, start_same)`: whether every slot matches (by value,
/// falling back to timestamp equality), and whether the first differing
/// slot is not the start slot.
pub fn same_dates<G: GenerateConfig>(
    gc: &G,
    source: &[Option<G::Date>],
    target: &[Option<G::Date>],
) -> (bool, bool) {
    let len = source.len().max(target.len());
    let diff = (0..len).find(|&i| {
        let prev = source.get(i).and_then(Option::as_ref);
        let next = target.get(i).and_then(Option::as_ref);
        !is_same_timestamp(gc, prev, next)
    });
    (diff.is_none(), diff != Some(0))
}

/// Sort a pair ascending by the adapter's ordering. Empty slots stay put.
pub fn order_dates<G: GenerateConfig>(gc: &G, values: &mut [Option<G::Date>]) {
    if let [Some(start), Some(end)] = values {
        if gc.is_after(start, end) {
            std::mem::swap(start, end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::ChronoGenerate;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_values_compare() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        assert!(is_same(&gc, &locale, None, None, PanelMode::Date));
        assert!(!is_same(&gc, &locale, Some(&dt(2024, 1, 1)), None, PanelMode::Date));
    }

    #[test]
    fn granularities() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let a = dt(2024, 1, 10);
        let b = dt(2024, 3, 31);
        assert!(is_same(&gc, &locale, Some(&a), Some(&b), PanelMode::Quarter));
        assert!(!is_same(&gc, &locale, Some(&a), Some(&b), PanelMode::Month));
        assert!(is_same(&gc, &locale, Some(&dt(2020, 1, 1)), Some(&dt(2029, 12, 31)), PanelMode::Decade));
        assert!(!is_same(&gc, &locale, Some(&dt(2019, 1, 1)), Some(&dt(2020, 1, 1)), PanelMode::Decade));
        // Sunday-start weeks: 2024-01-07 (Sun) .. 2024-01-13 (Sat)
        assert!(is_same(&gc, &locale, Some(&dt(2024, 1, 7)), Some(&dt(2024, 1, 13)), PanelMode::Week));
        assert!(!is_same(&gc, &locale, Some(&dt(2024, 1, 6)), Some(&dt(2024, 1, 7)), PanelMode::Week));
    }

    #[test]
    fn range_membership_is_strict() {
        let gc = ChronoGenerate::new();
        let start = dt(2024, 1, 1);
        let end = dt(2024, 1, 5);
        assert!(is_in_range(&gc, Some(&start), Some(&end), &dt(2024, 1, 3)));
        assert!(!is_in_range(&gc, Some(&start), Some(&end), &start));
        assert!(!is_in_range(&gc, Some(&start), None, &dt(2024, 1, 3)));
    }

    #[test]
    fn same_dates_reports_first_difference() {
        let gc = ChronoGenerate::new();
        let a = [Some(dt(2024, 1, 1)), None];
        let b = [Some(dt(2024, 1, 1)), Some(dt(2024, 1, 2))];
        assert_eq!(same_dates(&gc, &a, &b), (false, true));
        let c = [Some(dt(2024, 1, 3)), None];
        assert_eq!(same_dates(&gc, &a, &c), (false, false));
        assert_eq!(same_dates(&gc, &a, &a), (true, true));
    }

    #[test]
    fn order_swaps_descending_pair() {
        let gc = ChronoGenerate::new();
        let mut values = [Some(dt(2024, 1, 15)), Some(dt(2024, 1, 10))];
        order_dates(&gc, &mut values);
        assert_eq!(values, [Some(dt(2024, 1, 10)), Some(dt(2024, 1, 15))]);
    }
}
