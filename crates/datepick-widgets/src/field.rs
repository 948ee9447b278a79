//! The row of text fields a picker shows when closed.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

/// What one field shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldView {
    pub text: String,
    pub placeholder: String,
    pub active: bool,
    /// The text does not parse to a usable date.
    pub invalid: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
pub struct FieldStyle {
    pub text: Style,
    pub placeholder: Style,
    pub active: Style,
    pub invalid: Style,
    pub disabled: Style,
    pub separator: Style,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            active: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            invalid: Style::default().fg(Color::Red),
            disabled: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            separator: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Widget drawing `[ text ] → [ text ]`.
pub struct FieldRow<'a> {
    fields: &'a [FieldView],
    separator: &'a str,
    /// Minimum inner width of every field, e.g. the display format's width.
    min_width: usize,
    style: &'a FieldStyle,
}

impl<'a> FieldRow<'a> {
    pub fn new(fields: &'a [FieldView], style: &'a FieldStyle) -> Self {
        Self {
            fields,
            separator: " → ",
            min_width: 0,
            style,
        }
    }

    pub fn with_separator(mut self, separator: &'a str) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_min_width(mut self, width: usize) -> Self {
        self.min_width = width;
        self
    }

    fn inner_width(&self, field: &FieldView) -> usize {
        field
            .text
            .width()
            .max(field.placeholder.width())
            .max(self.min_width)
    }

    /// Horizontal span `(x, width)` of every field relative to the row.
    pub fn spans(&self) -> Vec<(u16, u16)> {
        let mut x = 0u16;
        self.fields
            .iter()
            .map(|field| {
                let width = self.inner_width(field) as u16 + 4;
                let span = (x, width);
                x += width + self.separator.width() as u16;
                span
            })
            .collect()
    }
}

impl Widget for FieldRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let right = area.x + area.width;
        for (i, (field, (offset, width))) in self.fields.iter().zip(self.spans()).enumerate() {
            let x = area.x + offset;
            if x >= right {
                break;
            }
            let (shown, mut style) = if field.text.is_empty() {
                (field.placeholder.as_str(), self.style.placeholder)
            } else {
                (field.text.as_str(), self.style.text)
            };
            if field.disabled {
                style = style.patch(self.style.disabled);
            } else if field.invalid {
                style = style.patch(self.style.invalid);
            }
            let bracket = if field.active {
                self.style.active
            } else {
                Style::default()
            };

            let pad = self.inner_width(field).saturating_sub(shown.width());
            let room = (right - x) as usize;
            buf.set_stringn(x, area.y, "[ ", room, bracket);
            if room > 2 {
                let body = format!("{shown}{}", " ".repeat(pad));
                let (end_x, _) = buf.set_stringn(x + 2, area.y, body, room - 2, style.patch(bracket));
                if end_x < right {
                    buf.set_stringn(end_x, area.y, " ]", (right - end_x) as usize, bracket);
                }
            }

            if i + 1 < self.fields.len() {
                let sep_x = x + width;
                if sep_x < right {
                    buf.set_stringn(sep_x, area.y, self.separator, (right - sep_x) as usize, self.style.separator);
                }
            }
        }
    }
}
