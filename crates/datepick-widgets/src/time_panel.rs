//! Scrolling hour / minute / second / AM-PM columns.

use datepick_core::time_units::step_unit;
use datepick_core::{GenerateConfig, Locale, Meridiem, TimeConfig, TimeInfo, TimeUnit, Unit};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

/// What a column edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Unit(TimeUnit),
    Meridiem,
}

/// One column of the time panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeColumn {
    pub kind: ColumnKind,
    pub units: Vec<Unit>,
    /// Value currently held by the picker.
    pub value: u32,
}

impl TimeColumn {
    pub fn selected_index(&self) -> Option<usize> {
        self.units.iter().position(|u| u.value == self.value)
    }

    /// The value `delta` enabled steps away, if there is one.
    pub fn step(&self, delta: i32) -> Option<u32> {
        let next = step_unit(&self.units, self.value, delta)?;
        (next != self.value).then_some(next)
    }

    fn width(&self) -> u16 {
        self.units.iter().map(|u| u.label.width()).max().unwrap_or(2) as u16 + 2
    }
}

fn meridiem_value(meridiem: Meridiem) -> u32 {
    match meridiem {
        Meridiem::Am => 0,
        Meridiem::Pm => 1,
    }
}

/// Map a meridiem column value back.
pub fn meridiem_of(value: u32) -> Meridiem {
    if value == 0 {
        Meridiem::Am
    } else {
        Meridiem::Pm
    }
}

/// The visible columns for `value` under `config`.
pub fn columns<G: GenerateConfig>(
    gc: &G,
    locale: &Locale,
    config: &TimeConfig<G::Date>,
    info: &TimeInfo<'_, G::Date>,
    value: &G::Date,
) -> Vec<TimeColumn> {
    let (h, m, s) = (gc.get_hour(value), gc.get_minute(value), gc.get_second(value));
    let meridiem = Meridiem::of_hour(h);
    let mut out = Vec::new();
    if config.show_hour {
        let units = if config.use_12_hours {
            info.hour_units_for(meridiem)
        } else {
            info.hour_units()
        };
        out.push(TimeColumn {
            kind: ColumnKind::Unit(TimeUnit::Hour),
            units,
            value: h,
        });
    }
    if config.show_minute {
        out.push(TimeColumn {
            kind: ColumnKind::Unit(TimeUnit::Minute),
            units: info.minute_units(h),
            value: m,
        });
    }
    if config.show_second {
        out.push(TimeColumn {
            kind: ColumnKind::Unit(TimeUnit::Second),
            units: info.second_units(h, m),
            value: s,
        });
    }
    if config.show_millisecond {
        out.push(TimeColumn {
            kind: ColumnKind::Unit(TimeUnit::Millisecond),
            units: info.millisecond_units(h, m, s),
            value: gc.get_millisecond(value),
        });
    }
    if config.use_12_hours {
        let units = info
            .meridiem_units(locale)
            .into_iter()
            .map(|u| Unit {
                label: u.label,
                value: meridiem_value(u.value),
                disabled: u.disabled,
            })
            .collect();
        out.push(TimeColumn {
            kind: ColumnKind::Meridiem,
            units,
            value: meridiem_value(meridiem),
        });
    }
    out
}

#[derive(Debug, Clone)]
pub struct TimeStyle {
    pub unit: Style,
    pub disabled: Style,
    pub selected: Style,
    /// Patched onto the selected unit of the focused column.
    pub focused: Style,
}

impl Default for TimeStyle {
    fn default() -> Self {
        Self {
            unit: Style::default(),
            disabled: Style::default().fg(Color::DarkGray),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            focused: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

/// Stateless widget drawing the time columns side by side. Each column
/// scrolls so its selected unit stays centred.
pub struct TimePanel<'a> {
    columns: &'a [TimeColumn],
    focused: Option<usize>,
    style: &'a TimeStyle,
}

impl<'a> TimePanel<'a> {
    pub fn new(columns: &'a [TimeColumn], style: &'a TimeStyle) -> Self {
        Self {
            columns,
            focused: None,
            style,
        }
    }

    pub fn with_focused(mut self, focused: Option<usize>) -> Self {
        self.focused = focused;
        self
    }

    pub fn width(columns: &[TimeColumn]) -> u16 {
        columns.iter().map(TimeColumn::width).sum()
    }
}

impl Widget for TimePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let right = area.x + area.width;
        let height = area.height as usize;
        let mut x = area.x;
        for (i, column) in self.columns.iter().enumerate() {
            if x >= right || height == 0 {
                break;
            }
            let selected = column.selected_index();
            let max_offset = column.units.len().saturating_sub(height);
            let offset = selected.unwrap_or(0).saturating_sub(height / 2).min(max_offset);
            for (row, unit) in column.units.iter().enumerate().skip(offset).take(height) {
                let y = area.y + (row - offset) as u16;
                let mut style = if Some(row) == selected {
                    self.style.selected
                } else if unit.disabled {
                    self.style.disabled
                } else {
                    self.style.unit
                };
                if Some(row) == selected && self.focused == Some(i) {
                    style = style.patch(self.style.focused);
                }
                let text = format!(" {} ", unit.label);
                buf.set_stringn(x, y, text, (right - x) as usize, style);
            }
            x += column.width();
        }
    }
}
