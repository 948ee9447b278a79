//! # Date-Time Example
//!
//! A single picker with a 12-hour time panel:
//! - Minutes in steps of 15
//! - Hours before 9 and after 17 disabled
//! - Enter or `ctrl+o` confirms, `ctrl+n` picks now
//!
//! Run with: `cargo run --example datetime`

use chrono::NaiveDateTime;
use datepick::crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use datepick::ratatui::layout::{Constraint, Layout};
use datepick::ratatui::style::{Color, Style};
use datepick::ratatui::widgets::Paragraph;
use datepick::ratatui::Frame;
use datepick::widgets::picker;
use datepick::widgets::{Component, DatePicker};
use datepick::{
    ChronoGenerate, Command, DisabledTimes, Message as PickerMessage, Model, PickerConfig, Program, ProgramError,
    TimeConfig,
};

type Msg = picker::Message<NaiveDateTime, 1>;

struct MeetingApp {
    picker: DatePicker<ChronoGenerate, 1>,
    booked: Option<String>,
}

impl Model for MeetingApp {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let time = TimeConfig::from_format("hh:mm A")
            .with_steps(1, 15, 1)
            .with_disabled_time(|_, _| DisabledTimes::new().with_hours(|| (0..9).chain(18..24).collect()));
        let config = PickerConfig::new()
            .with_format("YYYY-MM-DD hh:mm A")
            .with_show_time(time);
        let picker = DatePicker::new(ChronoGenerate::new(), config).with_placeholders(["Meeting time"]);
        (MeetingApp { picker, booked: None }, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match &msg {
            picker::Message::Picker(PickerMessage::Changed { text, .. }) => {
                self.booked = Some(text[0].clone()).filter(|t| !t.is_empty());
            }
            picker::Message::Key(key) => {
                let quit = key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
                if quit || (!self.picker.focused() && key.code == KeyCode::Char('q')) {
                    return Command::quit();
                }
            }
            _ => {}
        }
        self.picker.update(msg)
    }

    fn view(&self, frame: &mut Frame) {
        let [status_area, picker_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(frame.area());
        let status = match &self.booked {
            Some(text) => format!("Booked for {text}"),
            None => "Nothing booked yet. enter to pick, q to quit".to_string(),
        };
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Green)),
            status_area,
        );
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
    Program::<MeetingApp>::new(())?.run().await?;
    Ok(())
}
