//! Terminal widgets for the **datepick** engine.
//!
//! [`DatePicker`](picker::DatePicker) wraps a headless
//! [`datepick_core::Picker`] in a [`Component`] that reads key presses and
//! draws itself with [`ratatui`]. The pieces it is built from are usable on
//! their own.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`picker`] | Fields plus popup: the full interactive picker |
//! | [`calendar`] | One calendar page as a grid of cells |
//! | [`time_panel`] | Hour / minute / second / AM-PM columns |
//! | [`field`] | The `[ start ] → [ end ]` text field row |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`component`] | The [`Component`] trait |
//! | [`key`] | Key bindings and the picker's default key map |

pub mod calendar;
pub mod component;
pub mod field;
pub mod key;
pub mod picker;
pub mod time_panel;

pub use component::Component;
pub use picker::DatePicker;
