//! Terminal front end for a [`Picker`]: fields, popup calendar, time
//! columns and a footer, driven by the keyboard.

use crate::calendar::{CalendarPanel, CalendarStyle};
use crate::component::Component;
use crate::field::{FieldRow, FieldStyle, FieldView};
use crate::key::{KeyMap, PickerKeyMap};
use crate::time_panel::{self, ColumnKind, TimeColumn, TimePanel, TimeStyle};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use datepick_core::date_util::is_same;
use datepick_core::mode::move_cell;
use datepick_core::picker::Message as PickerMessage;
use datepick_core::{Command, Direction, GenerateConfig, PanelMode, Picker, PickerConfig, PickerKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// Messages for the date picker component.
#[derive(Debug, Clone, PartialEq)]
pub enum Message<D, const N: usize> {
    /// A key press forwarded by the host.
    Key(KeyEvent),
    /// Engine traffic: deferred input to feed back, or a notification for
    /// the host to observe. Notifications are ignored when fed back.
    Picker(PickerMessage<D, N>),
}

/// Where arrow keys go while the popup is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Calendar,
    Time(usize),
}

/// Interactive date or range picker.
///
/// # Example
///
/// ```ignore
/// use datepick_core::{ChronoGenerate, PickerConfig};
/// use datepick_widgets::picker::DatePicker;
///
/// let picker = DatePicker::<_, 2>::new(ChronoGenerate::new(), PickerConfig::new())
///     .with_placeholders(["Check in", "Check out"]);
/// ```
pub struct DatePicker<G: GenerateConfig, const N: usize> {
    engine: Picker<G, N>,
    keys: PickerKeyMap,
    cursor: Option<G::Date>,
    focus: Focus,
    /// (open, active field, mode) when the cursor was last placed.
    placed: Option<(bool, usize, PanelMode)>,
    placeholders: [String; N],
    show_help: bool,
    calendar_style: CalendarStyle,
    time_style: TimeStyle,
    field_style: FieldStyle,
    border_style: Style,
    footer_style: Style,
}

impl<G: GenerateConfig, const N: usize> DatePicker<G, N> {
    pub fn new(gc: G, config: PickerConfig<G::Date, N>) -> Self {
        let placeholders = std::array::from_fn(|i| match (N, i) {
            (1, _) => "Select date".to_string(),
            (_, 0) => "Start date".to_string(),
            _ => "End date".to_string(),
        });
        Self {
            engine: Picker::new(gc, config),
            keys: PickerKeyMap::default(),
            cursor: None,
            focus: Focus::Calendar,
            placed: None,
            placeholders,
            show_help: true,
            calendar_style: CalendarStyle::default(),
            time_style: TimeStyle::default(),
            field_style: FieldStyle::default(),
            border_style: Style::default().fg(Color::DarkGray),
            footer_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn with_placeholders(mut self, placeholders: [&str; N]) -> Self {
        self.placeholders = placeholders.map(str::to_string);
        self
    }

    pub fn with_keys(mut self, keys: PickerKeyMap) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_calendar_style(mut self, style: CalendarStyle) -> Self {
        self.calendar_style = style;
        self
    }

    pub fn with_time_style(mut self, style: TimeStyle) -> Self {
        self.time_style = style;
        self
    }

    pub fn with_field_style(mut self, style: FieldStyle) -> Self {
        self.field_style = style;
        self
    }

    pub fn picker(&self) -> &Picker<G, N> {
        &self.engine
    }

    /// The keyboard cursor on the calendar, while the popup is open.
    pub fn cursor(&self) -> Option<&G::Date> {
        self.cursor.as_ref()
    }

    pub fn keys(&self) -> &PickerKeyMap {
        &self.keys
    }

    fn send(&mut self, msg: PickerMessage<G::Date, N>) -> Command<Message<G::Date, N>> {
        let cmd = self.engine.update(msg).map(Message::Picker);
        self.place_cursor();
        cmd
    }

    fn send_all(&mut self, msgs: Vec<PickerMessage<G::Date, N>>) -> Command<Message<G::Date, N>> {
        let cmds: Vec<_> = msgs.into_iter().map(|msg| self.send(msg)).collect();
        Command::sequence(cmds)
    }

    /// Granularity at which the cursor matches a cell.
    fn cell_mode(&self) -> PanelMode {
        match self.engine.mode() {
            PanelMode::DateTime => PanelMode::Date,
            mode => mode,
        }
    }

    /// Panel and flat cell index showing `date`, if it is on screen.
    fn locate(&self, date: &G::Date) -> Option<(usize, usize)> {
        let mode = self.cell_mode();
        let gc = self.engine.generate();
        let locale = self.engine.locale();
        (0..self.engine.panel_count()).find_map(|panel| {
            self.engine
                .page(panel)
                .cells()
                .position(|c| c.in_view && is_same(gc, locale, Some(&c.date), Some(date), mode))
                .map(|index| (panel, index))
        })
    }

    /// Put the cursor back on the page whenever the popup opens, the
    /// field changes, the mode changes or the cursor scrolled away.
    fn place_cursor(&mut self) {
        if !self.engine.is_open() {
            self.cursor = None;
            self.placed = None;
            self.focus = Focus::Calendar;
            return;
        }
        let active = self.engine.active_index();
        let key = (true, active, self.engine.mode());
        let visible = self.cursor.as_ref().is_some_and(|c| self.locate(c).is_some());
        if self.placed == Some(key) && visible {
            return;
        }
        if self.placed.map(|(_, index, _)| index) != Some(active) || self.placed.is_none() {
            self.focus = if self.engine.config().picker == PickerKind::Time {
                Focus::Time(0)
            } else {
                Focus::Calendar
            };
        }
        self.placed = Some(key);
        let draft = self.engine.draft()[active]
            .clone()
            .filter(|d| self.locate(d).is_some());
        self.cursor = draft.or_else(|| self.engine.picker_value(active).cloned());
    }

    fn time_columns(&self) -> Vec<TimeColumn> {
        let (Some(info), Some(config)) = (self.engine.time_info(), self.engine.config().time_config()) else {
            return Vec::new();
        };
        time_panel::columns(
            self.engine.generate(),
            self.engine.locale(),
            config,
            &info,
            &self.engine.time_value(),
        )
    }

    /// Engine messages for one key press.
    fn translate(&mut self, key: KeyEvent) -> Vec<PickerMessage<G::Date, N>> {
        use PickerMessage as P;
        let engine = &self.engine;
        let active = engine.active_index();
        let keys = &self.keys;

        if !engine.is_focused() {
            return match key.code {
                KeyCode::Char(c) if is_text(&key) => {
                    vec![P::Focus(active), P::Input(active, format!("{}{c}", engine.text(active)))]
                }
                _ => vec![P::Focus(active)],
            };
        }

        if keys.next_field.matches(&key) {
            return if active + 1 < N {
                vec![P::Focus(active + 1)]
            } else {
                vec![P::Blur(active)]
            };
        }
        if keys.prev_field.matches(&key) {
            return if active > 0 { vec![P::Focus(active - 1)] } else { vec![] };
        }
        if keys.cancel.matches(&key) {
            return vec![P::Escape];
        }
        if keys.submit.matches(&key) {
            return vec![P::Submit];
        }
        if keys.clear.matches(&key) {
            return vec![P::Clear];
        }
        if keys.now.matches(&key) {
            return vec![P::SelectNow];
        }
        if keys.confirm.matches(&key) {
            return vec![P::Confirm];
        }
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            if key.modifiers == KeyModifiers::ALT {
                let index = c as usize - '1' as usize;
                return vec![P::SelectPreset(index)];
            }
        }
        if keys.backspace.matches(&key) {
            let mut text = engine.text(active).to_string();
            text.pop();
            return vec![P::Input(active, text)];
        }

        if !engine.is_open() {
            return match key.code {
                KeyCode::Char(c) if is_text(&key) => {
                    vec![P::Input(active, format!("{}{c}", engine.text(active)))]
                }
                KeyCode::Down => vec![P::Open],
                _ => vec![],
            };
        }

        if keys.coarser_mode.matches(&key) {
            let root = engine.config().internal_mode();
            return engine.mode().coarser(root).map(P::SetMode).into_iter().collect();
        }
        for (binding, offset, super_page) in [
            (&keys.prev_page, -1, false),
            (&keys.next_page, 1, false),
            (&keys.prev_super_page, -1, true),
            (&keys.next_super_page, 1, true),
        ] {
            if binding.matches(&key) {
                return vec![P::Navigate { offset, super_page }];
            }
        }

        let columns = self.time_columns();
        if keys.next_column.matches(&key) || keys.prev_column.matches(&key) {
            self.focus = step_focus(self.focus, keys.next_column.matches(&key), columns.len(), engine.mode());
            return vec![];
        }

        if let Focus::Time(index) = self.focus {
            let Some(column) = columns.get(index) else {
                return vec![];
            };
            let delta = if keys.up.matches(&key) {
                -1
            } else if keys.down.matches(&key) {
                1
            } else if keys.left.matches(&key) || keys.right.matches(&key) {
                self.focus = step_focus(self.focus, keys.right.matches(&key), columns.len(), engine.mode());
                return vec![];
            } else {
                return self.typed(key);
            };
            return match (column.kind, column.step(delta)) {
                (ColumnKind::Unit(unit), Some(value)) => vec![P::SelectTime(unit, value)],
                (ColumnKind::Meridiem, Some(value)) => vec![P::SelectMeridiem(time_panel::meridiem_of(value))],
                _ => vec![],
            };
        }

        let direction = if keys.up.matches(&key) {
            Some(Direction::Up)
        } else if keys.down.matches(&key) {
            Some(Direction::Down)
        } else if keys.left.matches(&key) {
            Some(Direction::Left)
        } else if keys.right.matches(&key) {
            Some(Direction::Right)
        } else {
            None
        };
        if let Some(direction) = direction {
            return self.move_cursor(direction);
        }

        if keys.select.matches(&key) && !engine.is_editing(active) {
            return self.cursor.clone().map(P::SelectCell).into_iter().collect();
        }
        self.typed(key)
    }

    fn typed(&self, key: KeyEvent) -> Vec<PickerMessage<G::Date, N>> {
        let active = self.engine.active_index();
        match key.code {
            KeyCode::Char(c) if is_text(&key) => {
                vec![PickerMessage::Input(active, format!("{}{c}", self.engine.text(active)))]
            }
            _ => vec![],
        }
    }

    /// Move the cell cursor; leaving the visible pages turns the page.
    fn move_cursor(&mut self, direction: Direction) -> Vec<PickerMessage<G::Date, N>> {
        let Some(current) = self.cursor.clone() else {
            return vec![];
        };
        let mode = self.engine.mode();
        if !mode.has_cells() {
            return vec![];
        }
        let gc = self.engine.generate();
        let next = move_cell(gc, mode, &current, direction);
        let forward = gc.is_after(&next, &current);
        let on_screen = self.locate(&next).is_some();
        self.cursor = Some(next);
        if on_screen {
            vec![]
        } else {
            vec![PickerMessage::Navigate {
                offset: if forward { 1 } else { -1 },
                super_page: false,
            }]
        }
    }

    fn footer(&self) -> Line<'static> {
        let engine = &self.engine;
        let locale = engine.locale();
        let mut spans = Vec::new();
        for (i, preset) in engine.config().presets.iter().enumerate().take(9) {
            spans.push(Span::styled(format!("[{}] {}  ", i + 1, preset.label), self.footer_style));
        }
        let now = if engine.config().has_time() {
            &locale.now
        } else {
            &locale.today
        };
        spans.push(Span::styled(format!("{now}  "), self.footer_style));
        if engine.need_confirm() {
            let style = if engine.can_confirm() {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                self.footer_style
            };
            spans.push(Span::styled(format!("[{}]", locale.ok), style));
        }
        Line::from(spans)
    }

    fn field_views(&self) -> Vec<FieldView> {
        let engine = &self.engine;
        let disabled = engine.config().disabled;
        (0..N)
            .map(|i| FieldView {
                text: engine.text(i).to_string(),
                placeholder: self.placeholders[i].clone(),
                active: engine.is_focused() && engine.active_index() == i,
                invalid: engine.is_invalid_text(i),
                disabled: disabled[i],
            })
            .collect()
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect) {
        let engine = &self.engine;
        let pages: Vec<_> = (0..engine.panel_count()).map(|p| engine.page(p)).collect();
        let columns = self.time_columns();

        let cal_width: u16 = pages.iter().map(CalendarPanel::width).sum::<u16>()
            + 2 * pages.len().saturating_sub(1) as u16;
        let cal_height = pages.iter().map(CalendarPanel::height).max().unwrap_or(0);
        let time_width = TimePanel::width(&columns);
        let gap = if cal_width > 0 && time_width > 0 { 2 } else { 0 };
        let body_height = cal_height.max(if columns.is_empty() { 0 } else { 7 });

        let footer = self.footer();
        let help = if self.show_help {
            self.keys.help_line()
        } else {
            String::new()
        };
        let inner_width = (cal_width + gap + time_width)
            .max(footer.width() as u16)
            .max(help.width() as u16);
        let footer_rows = 1 + u16::from(self.show_help);
        let popup = Rect::new(area.x, area.y + 1, inner_width + 2, body_height + footer_rows + 2)
            .intersection(frame.area());
        if popup.is_empty() {
            return;
        }

        frame.render_widget(Clear, popup);
        let block = Block::bordered().border_style(self.border_style);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let cursor = self.cursor.as_ref().and_then(|c| self.locate(c));
        let multi = pages.len() > 1;
        let mut x = inner.x;
        for (i, page) in pages.iter().enumerate() {
            let width = CalendarPanel::width(page);
            let rect = Rect::new(x, inner.y, width, body_height).intersection(inner);
            let panel = CalendarPanel::new(page, &self.calendar_style)
                .with_cursor(cursor.filter(|(p, _)| *p == i && self.focus == Focus::Calendar).map(|(_, c)| c))
                .with_arrows(!multi || i == 0, !multi || i + 1 == pages.len());
            frame.render_widget(panel, rect);
            x += width + 2;
        }
        if !columns.is_empty() {
            let tx = inner.x + cal_width + gap;
            let rect = Rect::new(tx, inner.y, time_width, body_height).intersection(inner);
            let focused = match self.focus {
                Focus::Time(index) => Some(index),
                Focus::Calendar => None,
            };
            frame.render_widget(TimePanel::new(&columns, &self.time_style).with_focused(focused), rect);
        }

        let footer_y = inner.y + body_height;
        if footer_y < inner.bottom() {
            frame.render_widget(Paragraph::new(footer), Rect::new(inner.x, footer_y, inner.width, 1));
        }
        if self.show_help && footer_y + 1 < inner.bottom() {
            frame.render_widget(
                Paragraph::new(Span::styled(help, self.footer_style)),
                Rect::new(inner.x, footer_y + 1, inner.width, 1),
            );
        }
    }
}

fn is_text(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Cycle keyboard focus through the calendar (when the mode has one) and
/// the time columns.
fn step_focus(focus: Focus, forward: bool, columns: usize, mode: PanelMode) -> Focus {
    let has_calendar = mode.has_cells();
    let mut stops: Vec<Focus> = Vec::new();
    if has_calendar {
        stops.push(Focus::Calendar);
    }
    stops.extend((0..columns).map(Focus::Time));
    if stops.is_empty() {
        return focus;
    }
    let current = stops.iter().position(|s| *s == focus).unwrap_or(0);
    let len = stops.len();
    let next = if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    };
    stops[next]
}

impl<G: GenerateConfig, const N: usize> Component for DatePicker<G, N> {
    type Message = Message<G::Date, N>;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
        match msg {
            Message::Key(key) => {
                let msgs = self.translate(key);
                self.send_all(msgs)
            }
            Message::Picker(msg) if msg.is_notification() => Command::none(),
            Message::Picker(msg) => self.send(msg),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let fields = self.field_views();
        let min_width = self
            .engine
            .formats()
            .first()
            .map(|f| f.width())
            .unwrap_or(0);
        let row = FieldRow::new(&fields, &self.field_style).with_min_width(min_width);
        frame.render_widget(row, Rect { height: 1, ..area });

        if self.engine.is_open() {
            self.render_popup(frame, area);
        }
    }

    fn focused(&self) -> bool {
        self.engine.is_focused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use datepick_core::{ChronoGenerate, Preset};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        key_with(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Feed `msg` in and loop every returned message back, the way a host
    /// does. Returns the notifications seen.
    fn drive<const N: usize>(
        picker: &mut DatePicker<ChronoGenerate, N>,
        msg: Message<NaiveDateTime, N>,
    ) -> Vec<PickerMessage<NaiveDateTime, N>> {
        let mut seen = Vec::new();
        let mut queue = vec![msg];
        while !queue.is_empty() {
            for msg in std::mem::take(&mut queue) {
                for out in picker.update(msg).into_messages() {
                    if let Message::Picker(inner) = &out {
                        if inner.is_notification() {
                            seen.push(inner.clone());
                        }
                    }
                    queue.push(out);
                }
            }
        }
        seen
    }

    fn press<const N: usize>(
        picker: &mut DatePicker<ChronoGenerate, N>,
        code: KeyCode,
    ) -> Vec<PickerMessage<NaiveDateTime, N>> {
        drive(picker, Message::Key(key(code)))
    }

    fn render<const N: usize>(picker: &DatePicker<ChronoGenerate, N>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                picker.view(frame, area);
            })
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn range() -> DatePicker<ChronoGenerate, 2> {
        DatePicker::new(ChronoGenerate::with_now(dt(2024, 1, 17)), PickerConfig::new())
    }

    #[test]
    fn closed_picker_shows_placeholders() {
        let picker = range();
        let out = render(&picker, 40, 3);
        let first = out.lines().next().unwrap();
        assert!(first.contains("Start date"));
        assert!(first.contains("End date"));
        assert!(!out.contains("Jan 2024"));
    }

    #[test]
    fn open_range_shows_two_months() {
        let mut picker = range();
        press(&mut picker, KeyCode::Enter);
        assert!(picker.picker().is_open());
        let out = render(&picker, 60, 14);
        assert!(out.contains("Jan 2024"));
        assert!(out.contains("Feb 2024"));
        assert!(out.contains("Today"));
        assert!(out.contains("tab next field"));
    }

    #[test]
    fn keyboard_picks_a_range() {
        let mut picker = range();
        press(&mut picker, KeyCode::Enter);
        assert_eq!(picker.cursor().map(|d| d.day()), Some(17));
        press(&mut picker, KeyCode::Right);
        press(&mut picker, KeyCode::Right);
        press(&mut picker, KeyCode::Char(' '));
        assert_eq!(picker.picker().active_index(), 1);
        assert_eq!(picker.picker().draft()[0], Some(dt(2024, 1, 19)));

        // The end field opens on the start field's page.
        let anchor = *picker.cursor().unwrap();
        press(&mut picker, KeyCode::Down);
        let seen = press(&mut picker, KeyCode::Char(' '));
        let end = anchor + chrono::Duration::days(7);
        assert_eq!(picker.picker().value(), &[Some(dt(2024, 1, 19)), Some(end)]);
        assert!(seen.iter().any(|m| matches!(m, PickerMessage::Changed { .. })));
        assert!(!picker.picker().is_open());
    }

    #[test]
    fn cursor_past_the_pages_turns_the_page() {
        let mut picker = DatePicker::<_, 1>::new(ChronoGenerate::with_now(dt(2024, 1, 30)), PickerConfig::new());
        press(&mut picker, KeyCode::Enter);
        press(&mut picker, KeyCode::Down);
        assert_eq!(picker.cursor().map(|d| (d.month(), d.day())), Some((2, 6)));
        assert_eq!(picker.picker().picker_value(0).map(|d| d.month()), Some(2));
        let out = render(&picker, 40, 14);
        assert!(out.contains("Feb 2024"));
    }

    #[test]
    fn typing_fills_the_field() {
        let mut picker = range();
        for c in "2024-03-05".chars() {
            press(&mut picker, KeyCode::Char(c));
        }
        assert_eq!(picker.picker().draft()[0], Some(dt(2024, 3, 5)));
        press(&mut picker, KeyCode::Backspace);
        assert_eq!(picker.picker().text(0), "2024-03-0");
        assert!(picker.picker().is_invalid_text(0));
        let out = render(&picker, 40, 1);
        assert!(out.contains("2024-03-0"));
    }

    #[test]
    fn zoom_out_then_pick_month() {
        let mut picker = range();
        press(&mut picker, KeyCode::Enter);
        drive(&mut picker, Message::Key(key_with(KeyCode::Up, KeyModifiers::CONTROL)));
        assert_eq!(picker.picker().mode(), PanelMode::Month);
        let out = render(&picker, 60, 14);
        assert!(out.contains("Jan"));
        assert!(out.contains("Dec"));
        press(&mut picker, KeyCode::Char(' '));
        assert_eq!(picker.picker().mode(), PanelMode::Date);
    }

    #[test]
    fn time_picker_steps_columns() {
        let config = PickerConfig::<NaiveDateTime, 1>::new().with_picker(PickerKind::Time);
        let mut picker = DatePicker::new(ChronoGenerate::with_now(dt(2024, 1, 17)), config);
        press(&mut picker, KeyCode::Enter);
        press(&mut picker, KeyCode::Down);
        assert_eq!(picker.picker().draft()[0].map(|d| d.hour()), Some(1));
        drive(&mut picker, Message::Key(key_with(KeyCode::Right, KeyModifiers::ALT)));
        press(&mut picker, KeyCode::Down);
        press(&mut picker, KeyCode::Down);
        assert_eq!(picker.picker().draft()[0].map(|d| (d.hour(), d.minute())), Some((1, 2)));
        // Time pickers wait for an explicit confirm.
        assert_eq!(picker.picker().value(), &[None]);
        press(&mut picker, KeyCode::Enter);
        assert!(picker.picker().value()[0].is_some());
        let out = render(&picker, 40, 1);
        assert!(out.contains("01:02:00"));
    }

    #[test]
    fn preset_shortcut_commits() {
        let week = [Some(dt(2024, 1, 1)), Some(dt(2024, 1, 7))];
        let config = PickerConfig::new().with_preset(Preset::new("First week", week));
        let mut picker = DatePicker::new(ChronoGenerate::with_now(dt(2024, 1, 17)), config);
        press(&mut picker, KeyCode::Enter);
        let out = render(&picker, 60, 14);
        assert!(out.contains("[1] First week"));
        drive(&mut picker, Message::Key(key_with(KeyCode::Char('1'), KeyModifiers::ALT)));
        assert_eq!(picker.picker().value(), &week);
    }

    #[test]
    fn blur_settles_through_the_host_loop() {
        let config = PickerConfig::<NaiveDateTime, 1>::new().with_need_confirm(true);
        let mut picker = DatePicker::new(ChronoGenerate::with_now(dt(2024, 1, 17)), config);
        press(&mut picker, KeyCode::Enter);
        press(&mut picker, KeyCode::Char(' '));
        assert_eq!(picker.picker().value(), &[None]);
        // Tab past the only field blurs; the settle tick commits the draft.
        let seen = press(&mut picker, KeyCode::Tab);
        assert_eq!(picker.picker().value(), &[Some(dt(2024, 1, 17))]);
        assert!(seen.iter().any(|m| matches!(m, PickerMessage::Changed { .. })));
        assert!(!picker.focused());
    }
}
