//! Cell grids and header text for every calendar page.

use crate::date_util::is_same;
use crate::generate::GenerateConfig;
use crate::locale::Locale;
use crate::mode::PanelMode;

/// One cell of a calendar page.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<D> {
    pub date: D,
    pub label: String,
    /// Belongs to the page on screen (days of adjacent months and the
    /// edge years of a decade are shown but not in view).
    pub in_view: bool,
    pub disabled: bool,
    pub selected: bool,
    pub range_start: bool,
    pub range_end: bool,
    pub in_range: bool,
    pub today: bool,
}

/// A full page: the header, optional column titles and the cell rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<D> {
    pub mode: PanelMode,
    pub header: String,
    /// Weekday titles for day based pages.
    pub columns: Vec<String>,
    /// Week numbers for the week page, one per row.
    pub row_labels: Vec<String>,
    pub rows: Vec<Vec<Cell<D>>>,
}

impl<D> Page<D> {
    pub fn cells(&self) -> impl Iterator<Item = &Cell<D>> {
        self.rows.iter().flatten()
    }
}

/// Header text for the page of `mode` anchored at `anchor`.
pub fn header<G: GenerateConfig>(gc: &G, locale: &Locale, mode: PanelMode, anchor: &G::Date) -> String {
    let year = gc.get_year(anchor);
    match mode {
        PanelMode::Date | PanelMode::DateTime | PanelMode::Week => format!(
            "{} {}",
            gc.format(locale, anchor, locale.month_format()),
            gc.format(locale, anchor, locale.year_format())
        ),
        PanelMode::Month | PanelMode::Quarter => gc.format(locale, anchor, locale.year_format()),
        PanelMode::Year => {
            let start = year.div_euclid(10) * 10;
            format!("{}-{}", start, start + 9)
        }
        PanelMode::Decade => {
            let start = year.div_euclid(100) * 100;
            format!("{}-{}", start, start + 99)
        }
        PanelMode::Time => String::new(),
    }
}

/// Build the page of `mode` around `anchor`.
///
/// `values` is the picker's draft: one slot for single pickers, two for
/// ranges. `disabled` decides each cell's disabled flag.
pub fn build<G: GenerateConfig>(
    gc: &G,
    locale: &Locale,
    mode: PanelMode,
    anchor: &G::Date,
    values: &[Option<G::Date>],
    disabled: impl Fn(&G::Date) -> bool,
) -> Page<G::Date> {
    let now = gc.get_now();
    let make = |date: G::Date, label: String, in_view: bool| -> Cell<G::Date> {
        let same = |other: Option<&G::Date>| is_same(gc, locale, other, Some(&date), mode);
        let (range_start, range_end, in_range) = match values {
            [start, end] => {
                let in_range = match (start, end) {
                    (Some(s), Some(e)) => {
                        !same(Some(s)) && !same(Some(e)) && gc.is_after(&date, s) && gc.is_after(e, &date)
                    }
                    _ => false,
                };
                (same(start.as_ref()) && start.is_some(), same(end.as_ref()) && end.is_some(), in_range)
            }
            _ => (false, false, false),
        };
        Cell {
            disabled: disabled(&date),
            selected: values.iter().any(|v| v.is_some() && same(v.as_ref())),
            today: same(Some(&now)),
            range_start,
            range_end,
            in_range,
            label,
            in_view,
            date,
        }
    };

    let mut page = Page {
        mode,
        header: header(gc, locale, mode, anchor),
        columns: Vec::new(),
        row_labels: Vec::new(),
        rows: Vec::new(),
    };

    match mode {
        PanelMode::Date | PanelMode::DateTime | PanelMode::Week => {
            let month_start = gc.set_date(anchor, 1);
            let first = gc.week_first_date(locale, &month_start);
            page.columns = (0..7)
                .map(|i| locale.week_day_short((locale.week_start + i) % 7).to_string())
                .collect();
            for row in 0..6 {
                let row_start = gc.add_date(&first, row * 7);
                if mode == PanelMode::Week {
                    page.row_labels
                        .push(format!("{:02}", gc.get_week(locale, &row_start)));
                }
                let cells = (0..7)
                    .map(|col| {
                        let date = gc.add_date(&row_start, col);
                        let in_view = gc.get_month(&date) == gc.get_month(anchor)
                            && gc.get_year(&date) == gc.get_year(anchor);
                        let label = gc.get_date(&date).to_string();
                        make(date, label, in_view)
                    })
                    .collect();
                page.rows.push(cells);
            }
        }
        PanelMode::Month => {
            let year_start = gc.set_month(&gc.set_date(anchor, 1), 0);
            for row in 0..4 {
                let cells = (0..3)
                    .map(|col| {
                        let month = row * 3 + col;
                        let date = gc.add_month(&year_start, month);
                        let label = locale.month_short(gc.get_month(&date)).to_string();
                        make(date, label, true)
                    })
                    .collect();
                page.rows.push(cells);
            }
        }
        PanelMode::Quarter => {
            let year_start = gc.set_month(&gc.set_date(anchor, 1), 0);
            let cells = (0..4)
                .map(|q| {
                    let date = gc.add_month(&year_start, q * 3);
                    make(date, format!("Q{}", q + 1), true)
                })
                .collect();
            page.rows.push(cells);
        }
        PanelMode::Year => {
            let decade = gc.get_year(anchor).div_euclid(10) * 10;
            let base = gc.set_month(&gc.set_date(&gc.set_year(anchor, decade), 1), 0);
            for row in 0..4 {
                let cells = (0..3)
                    .map(|col| {
                        let offset = row * 3 + col - 1;
                        let date = gc.add_year(&base, offset);
                        make(date, (decade + offset).to_string(), (0..10).contains(&offset))
                    })
                    .collect();
                page.rows.push(cells);
            }
        }
        PanelMode::Decade => {
            let century = gc.get_year(anchor).div_euclid(100) * 100;
            let base = gc.set_month(&gc.set_date(&gc.set_year(anchor, century), 1), 0);
            for row in 0..4 {
                let cells = (0..3)
                    .map(|col| {
                        let offset = (row * 3 + col - 1) * 10;
                        let date = gc.add_year(&base, offset);
                        let start = century + offset;
                        make(date, format!("{}-{}", start, start + 9), (0..100).contains(&offset))
                    })
                    .collect();
                page.rows.push(cells);
            }
        }
        PanelMode::Time => {}
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};
    use crate::generate::ChronoGenerate;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn date_page_starts_on_week_start() {
        let gc = ChronoGenerate::with_now(dt(2024, 1, 17));
        let locale = Locale::default();
        let page = build(&gc, &locale, PanelMode::Date, &dt(2024, 1, 10), &[None], |_| false);
        assert_eq!(page.rows.len(), 6);
        assert_eq!(page.columns[0], "Su");
        // January 2024 starts on a Monday, so the grid opens on Dec 31.
        let first = &page.rows[0][0];
        assert_eq!((first.date.month(), first.date.day()), (12, 31));
        assert!(!first.in_view);
        assert!(page.rows[0][1].in_view);
        assert!(page.cells().any(|c| c.today && c.date.day() == 17));
        assert_eq!(page.header, "Jan 2024");
    }

    #[test]
    fn range_flags() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let values = [Some(dt(2024, 1, 10)), Some(dt(2024, 1, 15))];
        let page = build(&gc, &locale, PanelMode::Date, &dt(2024, 1, 1), &values, |_| false);
        let cell = |day| page.cells().find(|c| c.in_view && c.date.day() == day).unwrap();
        assert!(cell(10).range_start && cell(10).selected);
        assert!(cell(15).range_end);
        assert!(cell(12).in_range && !cell(12).selected);
        assert!(!cell(16).in_range);
    }

    #[test]
    fn year_page_shows_decade_with_edges() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let page = build(&gc, &locale, PanelMode::Year, &dt(2024, 6, 1), &[None], |_| false);
        let labels: Vec<_> = page.cells().map(|c| c.label.clone()).collect();
        assert_eq!(labels.first().map(String::as_str), Some("2019"));
        assert_eq!(labels.last().map(String::as_str), Some("2030"));
        assert!(!page.rows[0][0].in_view);
        assert_eq!(page.header, "2020-2029");
    }

    #[test]
    fn decade_page_labels() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let page = build(&gc, &locale, PanelMode::Decade, &dt(2024, 6, 1), &[None], |_| false);
        assert_eq!(page.rows[0][1].label, "2000-2009");
        assert_eq!(page.rows[0][1].date.year(), 2000);
        assert_eq!(page.header, "2000-2099");
    }

    #[test]
    fn quarter_and_month_pages() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let selected = [Some(dt(2024, 5, 9))];
        let page = build(&gc, &locale, PanelMode::Quarter, &dt(2024, 6, 1), &selected, |_| false);
        assert_eq!(page.rows[0].len(), 4);
        assert!(page.rows[0][1].selected);
        let page = build(&gc, &locale, PanelMode::Month, &dt(2024, 6, 1), &selected, |d| d.month() > 10);
        assert_eq!(page.rows[0][0].label, "Jan");
        assert!(page.rows[1][1].selected);
        assert!(page.rows[3][2].disabled);
    }

    #[test]
    fn week_page_labels_rows() {
        let gc = ChronoGenerate::new();
        let locale = Locale::default();
        let page = build(&gc, &locale, PanelMode::Week, &dt(2024, 1, 10), &[None], |_| false);
        assert_eq!(page.row_labels.len(), 6);
        assert_eq!(page.row_labels[0], "01");
    }
}
