//! # Range Example
//!
//! A two-field date range picker for booking a stay:
//! - Weekends more than a month out are disabled
//! - Presets on `alt+1` / `alt+2`
//! - Picker notifications listed below the fields
//!
//! Run with: `cargo run --example range`
//! Set `RUST_LOG=datepick_core=debug` to get engine traces in `range.log`.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};
use datepick::crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use datepick::ratatui::layout::{Constraint, Layout};
use datepick::ratatui::style::{Color, Style};
use datepick::ratatui::text::Line;
use datepick::ratatui::widgets::{Block, Paragraph};
use datepick::ratatui::Frame;
use datepick::widgets::picker;
use datepick::widgets::{Component, DatePicker};
use datepick::{
    ChronoGenerate, Command, GenerateConfig, Message as PickerMessage, Model, PickerConfig, Preset, Program,
    ProgramError, ProgramOptions,
};

type Msg = picker::Message<NaiveDateTime, 2>;

struct RangeApp {
    picker: DatePicker<ChronoGenerate, 2>,
    log: Vec<String>,
}

impl RangeApp {
    fn record(&mut self, msg: &PickerMessage<NaiveDateTime, 2>) {
        let line = match msg {
            PickerMessage::Changed { text, .. } if text.iter().all(String::is_empty) => "cleared".to_string(),
            PickerMessage::Changed { text, .. } => format!("changed: {} → {}", text[0], text[1]),
            PickerMessage::OpenChanged(open) => format!("open: {open}"),
            PickerMessage::Ok(_) => "ok".to_string(),
            _ => return,
        };
        self.log.push(line);
        let overflow = self.log.len().saturating_sub(8);
        self.log.drain(..overflow);
    }
}

impl Model for RangeApp {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let gc = ChronoGenerate::new();
        let today = gc.get_now();
        let horizon = today + Duration::days(31);
        let week_end = today + Duration::days(6);
        let config = PickerConfig::new()
            .with_min_date(today)
            .with_disabled_date(move |date: &NaiveDateTime, _| {
                *date > horizon && matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            })
            .with_preset(Preset::new("Next 7 days", [Some(today), Some(week_end)]))
            .with_preset(Preset::lazy("Next weekend", move || {
                let ahead = (Weekday::Sat.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
                let saturday = today + Duration::days(i64::from(ahead));
                [Some(saturday), Some(saturday + Duration::days(1))]
            }));
        let picker = DatePicker::new(gc, config).with_placeholders(["Check in", "Check out"]);
        (
            RangeApp {
                picker,
                log: Vec::new(),
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        if let picker::Message::Picker(inner) = &msg {
            self.record(inner);
        }
        if let picker::Message::Key(key) = &msg {
            let quit = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
            if quit || (!self.picker.focused() && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)) {
                return Command::quit();
            }
        }
        self.picker.update(msg)
    }

    fn view(&self, frame: &mut Frame) {
        let [title_area, picker_area, log_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(16),
            Constraint::Fill(1),
        ])
        .areas(frame.area());

        let hint = if self.picker.focused() {
            "tab / shift+tab switch fields, esc discards"
        } else {
            "enter to pick dates, q to quit"
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::styled("Book a stay", Style::default().fg(Color::Cyan)),
                Line::styled(hint, Style::default().fg(Color::DarkGray)),
            ]),
            title_area,
        );

        let lines: Vec<Line> = self.log.iter().map(|l| Line::raw(l.as_str())).collect();
        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title("events")),
            log_area,
        );
        // Drawn last so the popup sits on top of the log.
        self.picker.view(frame, picker_area);
    }

    fn event(&self, event: Event) -> Option<Msg> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(picker::Message::Key(key)),
            _ => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ProgramError> {
    let options = ProgramOptions::default()
        .with_title("datepick range")
        .with_log_file("range.log");
    let app = Program::<RangeApp>::with_options((), options)?.run().await?;
    let value = app.picker.picker().value();
    println!("{value:?}");
    Ok(())
}
