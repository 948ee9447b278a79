//! Renders one calendar [`Page`] as a grid of cells.

use datepick_core::{Cell, Page};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

/// Styles for the calendar grid.
#[derive(Debug, Clone)]
pub struct CalendarStyle {
    pub header: Style,
    pub weekday: Style,
    pub row_label: Style,
    pub cell: Style,
    /// Cells of adjacent months or decades.
    pub out_of_view: Style,
    pub disabled: Style,
    pub selected: Style,
    pub in_range: Style,
    pub today: Style,
    /// Added on top of the cell's own style.
    pub cursor: Style,
}

impl Default for CalendarStyle {
    fn default() -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            weekday: Style::default().fg(Color::DarkGray),
            row_label: Style::default().fg(Color::DarkGray),
            cell: Style::default(),
            out_of_view: Style::default().fg(Color::DarkGray),
            disabled: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            in_range: Style::default().bg(Color::Blue),
            today: Style::default().add_modifier(Modifier::UNDERLINED),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// A stateless widget drawing `page`, with an optional keyboard cursor on
/// the cell at flat index `cursor`.
pub struct CalendarPanel<'a, D> {
    page: &'a Page<D>,
    cursor: Option<usize>,
    style: &'a CalendarStyle,
    prev_arrows: bool,
    next_arrows: bool,
}

impl<'a, D> CalendarPanel<'a, D> {
    pub fn new(page: &'a Page<D>, style: &'a CalendarStyle) -> Self {
        Self {
            page,
            cursor: None,
            style,
            prev_arrows: true,
            next_arrows: true,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Which navigation arrows the header shows. The first of two panels
    /// only points back, the second only forward.
    pub fn with_arrows(mut self, prev: bool, next: bool) -> Self {
        self.prev_arrows = prev;
        self.next_arrows = next;
        self
    }

    fn cell_width(page: &Page<D>) -> u16 {
        let widest = page
            .cells()
            .map(|c| c.label.width())
            .chain(page.columns.iter().map(|c| c.width()))
            .max()
            .unwrap_or(2);
        widest as u16 + 1
    }

    fn row_label_width(page: &Page<D>) -> u16 {
        page.row_labels
            .iter()
            .map(|l| l.width() as u16 + 1)
            .max()
            .unwrap_or(0)
    }

    /// Columns needed to draw `page` without clipping.
    pub fn width(page: &Page<D>) -> u16 {
        let columns = page.rows.first().map_or(0, Vec::len) as u16;
        let grid = Self::row_label_width(page) + columns * Self::cell_width(page);
        grid.max(page.header.width() as u16 + 8)
    }

    /// Rows needed: header, optional weekday titles, then the grid.
    pub fn height(page: &Page<D>) -> u16 {
        1 + u16::from(!page.columns.is_empty()) + page.rows.len() as u16
    }

    fn cell_style(&self, cell: &Cell<D>, index: usize) -> Style {
        let s = self.style;
        let mut style = if cell.disabled {
            s.disabled
        } else if cell.selected || cell.range_start || cell.range_end {
            s.selected
        } else if cell.in_range {
            s.in_range
        } else if !cell.in_view {
            s.out_of_view
        } else {
            s.cell
        };
        if cell.today {
            style = style.patch(s.today);
        }
        if self.cursor == Some(index) {
            style = style.patch(s.cursor);
        }
        style
    }
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(fill), text)
}

impl<D> Widget for CalendarPanel<'_, D> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let page = self.page;
        let right = area.x + area.width;
        let bottom = area.y + area.height;

        let prev = if self.prev_arrows { "« ‹" } else { "   " };
        let next = if self.next_arrows { "› »" } else { "   " };
        let title_x = area.x + area.width.saturating_sub(page.header.width() as u16) / 2;
        buf.set_string(area.x, area.y, prev, self.style.header);
        buf.set_string(title_x, area.y, &page.header, self.style.header);
        buf.set_string(right.saturating_sub(3), area.y, next, self.style.header);

        let cell_width = Self::cell_width(page);
        let label_width = Self::row_label_width(page);
        let mut y = area.y + 1;

        if !page.columns.is_empty() && y < bottom {
            for (i, title) in page.columns.iter().enumerate() {
                let x = area.x + label_width + i as u16 * cell_width;
                if x < right {
                    let text = pad_left(title, cell_width as usize);
                    buf.set_stringn(x, y, text, (right - x) as usize, self.style.weekday);
                }
            }
            y += 1;
        }

        let mut index = 0;
        for (row, cells) in page.rows.iter().enumerate() {
            if y >= bottom {
                break;
            }
            if let Some(label) = page.row_labels.get(row) {
                buf.set_string(area.x, y, label, self.style.row_label);
            }
            for (col, cell) in cells.iter().enumerate() {
                let x = area.x + label_width + col as u16 * cell_width;
                if x < right {
                    let text = pad_left(&cell.label, cell_width as usize);
                    let style = self.cell_style(cell, index);
                    buf.set_stringn(x, y, text, (right - x) as usize, style);
                }
                index += 1;
            }
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use datepick_core::panel::build;
    use datepick_core::{ChronoGenerate, Locale, PanelMode};

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn renders_month_grid() {
        let gc = ChronoGenerate::with_now(dt(2024, 1, 17));
        let page = build(&gc, &Locale::default(), PanelMode::Date, &dt(2024, 1, 1), &[None], |_| false);
        let style = CalendarStyle::default();
        let width = CalendarPanel::width(&page);
        let height = CalendarPanel::height(&page);
        assert_eq!((width, height), (21, 8));

        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        CalendarPanel::new(&page, &style).render(buf.area, &mut buf);
        let lines = lines(&buf);
        assert!(lines[0].contains("Jan 2024"));
        assert!(lines[0].starts_with("« ‹"));
        assert_eq!(lines[1].trim_end(), " Su Mo Tu We Th Fr Sa");
        assert_eq!(lines[2].trim_end(), " 31  1  2  3  4  5  6");
    }

    #[test]
    fn cursor_and_selection_styles() {
        let gc = ChronoGenerate::with_now(dt(2024, 1, 17));
        let values = [Some(dt(2024, 1, 3))];
        let page = build(&gc, &Locale::default(), PanelMode::Date, &dt(2024, 1, 1), &values, |_| false);
        let style = CalendarStyle::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 21, 8));
        CalendarPanel::new(&page, &style)
            .with_cursor(Some(1))
            .render(buf.area, &mut buf);

        // Row 0 holds Dec 31 then Jan 1..6; the 3rd is the fourth cell.
        let selected = &buf[(3 * 3 + 2, 2)];
        assert_eq!(selected.symbol(), "3");
        assert_eq!(selected.bg, Color::Cyan);
        let cursor = &buf[(3 + 2, 2)];
        assert!(cursor.modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn week_rows_are_labelled() {
        let gc = ChronoGenerate::new();
        let page = build(&gc, &Locale::default(), PanelMode::Week, &dt(2024, 1, 1), &[None], |_| false);
        let style = CalendarStyle::default();
        let width = CalendarPanel::width(&page);
        let mut buf = Buffer::empty(Rect::new(0, 0, width, CalendarPanel::height(&page)));
        CalendarPanel::new(&page, &style)
            .with_arrows(true, false)
            .render(buf.area, &mut buf);
        let lines = lines(&buf);
        assert!(lines[2].starts_with("01"));
        assert!(!lines[0].contains('»'));
    }
}
