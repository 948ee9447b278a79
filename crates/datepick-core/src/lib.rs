//! Headless engine for the **datepick** date and range pickers.
//!
//! `datepick-core` holds every rule of a date picker and none of its
//! pixels. A [`Picker`] is a reducer: feed it [`Message`]s from whatever
//! front end you have, read its state back for rendering, and route the
//! notifications it returns as a [`Command`].
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`GenerateConfig`] | Calendar arithmetic over an opaque date type |
//! | [`ChronoGenerate`] | Bundled adapter for [`chrono::NaiveDateTime`] |
//! | [`PickerConfig`] | Picker kind, formats, constraints, time columns |
//! | [`Picker`] | The engine; [`SinglePicker`] and [`RangePicker`] fix the arity |
//! | [`Page`] | One rendered calendar page of [`Cell`]s |
//! | [`TimeInfo`] | Hour, minute, second and AM/PM columns |
//! | [`TestPicker`](testing::TestPicker) | Headless harness for driving a picker in tests |
//!
//! # Flow of one message
//!
//! 1. **coordinate** -- focus, blur and confirm decide which field is
//!    active and whether the interaction is over.
//! 2. **value** -- the draft changes; on confirm it is ordered, validated
//!    and committed.
//! 3. **reconcile** -- the page each field shows is realigned with the
//!    draft and the min/max bounds.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use datepick_core::{ChronoGenerate, Message, PickerConfig, RangePicker};
//!
//! let mut picker = RangePicker::new(ChronoGenerate::new(), PickerConfig::new());
//! picker.update(Message::Focus(0));
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).and_then(|d| d.and_hms_opt(0, 0, 0));
//! if let (Some(start), Some(end)) = (day(4), day(8)) {
//!     picker.update(Message::SelectCell(start));
//!     picker.update(Message::SelectCell(end));
//!     assert_eq!(picker.value(), &[Some(start), Some(end)]);
//! }
//! ```

pub mod active;
pub mod command;
pub mod config;
pub mod date_util;
pub mod disabled;
pub mod error;
pub mod format;
pub mod generate;
pub mod locale;
pub mod lock;
pub mod mode;
pub mod panel;
pub mod picker;
pub mod testing;
pub mod time_units;
pub mod value;

pub use active::{ActiveCoordinator, Operation, RangeSide};
pub use command::{Action, Command};
pub use config::{PickerConfig, Preset};
pub use disabled::{Constraints, DisabledDateFn, DisabledInfo};
pub use error::ConfigWarning;
pub use format::{Meridiem, ParseError};
pub use generate::{ChronoGenerate, GenerateConfig};
pub use locale::Locale;
pub use mode::{Direction, PanelMode, PickerKind};
pub use panel::{Cell, Page};
pub use picker::{Message, Picker, PickerValueSource, RangePicker, SinglePicker};
pub use time_units::{
    DisabledTimeFn, DisabledTimeInfo, DisabledTimes, MeridiemUnit, TimeConfig, TimeInfo, TimeUnit,
    Unit,
};
