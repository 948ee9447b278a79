//! **datepick** -- a headless date and range picker with a terminal front end.
//!
//! This is the umbrella crate. It re-exports the engine from
//! [`datepick_core`] at the root, the widgets under [`widgets`], and adds a
//! small async [`Program`] that runs a [`Model`] on a real terminal.
//!
//! ```toml
//! [dependencies]
//! datepick = "0.1"
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use datepick::crossterm::event::Event;
//! use datepick::widgets::{picker, Component, DatePicker};
//! use datepick::{ChronoGenerate, Command, Model, PickerConfig};
//! use ratatui::Frame;
//!
//! struct App(DatePicker<ChronoGenerate, 2>);
//!
//! impl Model for App {
//!     type Message = picker::Message<chrono::NaiveDateTime, 2>;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Self::Message>) {
//!         (App(DatePicker::new(ChronoGenerate::new(), PickerConfig::new())), Command::none())
//!     }
//!     fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
//!         self.0.update(msg)
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         let area = frame.area();
//!         self.0.view(frame, area);
//!     }
//!     fn event(&self, event: Event) -> Option<Self::Message> {
//!         match event {
//!             Event::Key(key) => Some(picker::Message::Key(key)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), datepick::ProgramError> {
//!     datepick::Program::<App>::new(())?.run().await?;
//!     Ok(())
//! }
//! ```

pub mod model;
pub mod runtime;

pub use datepick_core::*;
pub use model::Model;
pub use runtime::{init_logging, Program, ProgramError, ProgramOptions};

pub mod widgets {
    pub use datepick_widgets::*;
}

pub use chrono;
pub use crossterm;
pub use ratatui;
pub use tokio;
