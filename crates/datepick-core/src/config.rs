//! Picker configuration.

use crate::disabled::{Constraints, DisabledInfo};
use crate::error::{self, ConfigWarning};
use crate::locale::Locale;
use crate::mode::{PanelMode, PickerKind};
use crate::time_units::TimeConfig;
use std::fmt;
use std::sync::Arc;

/// A named shortcut value shown in the popup ("Today", "Last 7 days").
///
/// The value is produced when the preset is chosen, so relative presets
/// can look at the clock.
pub struct Preset<D, const N: usize> {
    pub label: String,
    value: Arc<dyn Fn() -> [Option<D>; N] + Send + Sync>,
}

impl<D, const N: usize> Preset<D, N> {
    /// A preset with a fixed value.
    pub fn new(label: impl Into<String>, value: [Option<D>; N]) -> Self
    where
        D: Clone + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            value: Arc::new(move || value.clone()),
        }
    }

    /// A preset computed on selection.
    pub fn lazy(label: impl Into<String>, f: impl Fn() -> [Option<D>; N] + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            value: Arc::new(f),
        }
    }

    pub fn value(&self) -> [Option<D>; N] {
        (self.value)()
    }
}

impl<D, const N: usize> Clone for Preset<D, N> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            value: Arc::clone(&self.value),
        }
    }
}

impl<D, const N: usize> fmt::Debug for Preset<D, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preset").field("label", &self.label).finish()
    }
}

/// Everything a [`Picker`](crate::Picker) is built from.
///
/// ```rust
/// use datepick_core::{PickerConfig, PickerKind, TimeConfig};
/// use chrono::NaiveDateTime;
///
/// let config = PickerConfig::<NaiveDateTime, 2>::new()
///     .with_picker(PickerKind::Date)
///     .with_show_time(TimeConfig::default().with_show_second(false))
///     .with_allow_empty([false, true]);
/// assert!(config.need_confirm());
/// assert_eq!(config.formats(), vec!["YYYY-MM-DD HH:mm".to_string()]);
/// ```
pub struct PickerConfig<D, const N: usize> {
    pub picker: PickerKind,
    pub locale: Locale,
    /// Accepted input formats; the first one is used for display. Empty
    /// means the locale's field format for the picker.
    pub format: Vec<String>,
    /// Time columns. Date pickers gain a time part when this is set; time
    /// pickers always have one.
    pub show_time: Option<TimeConfig<D>>,
    /// `None` picks the default: required for time pickers and pickers
    /// with a time part.
    pub need_confirm: Option<bool>,
    pub order: bool,
    pub allow_empty: [bool; N],
    pub disabled: [bool; N],
    pub constraints: Constraints<D>,
    /// Pins the page shown for a field when the popup opens.
    pub default_picker_value: [Option<D>; N],
    /// Initial committed value.
    pub value: [Option<D>; N],
    pub presets: Vec<Preset<D, N>>,
}

impl<D, const N: usize> Default for PickerConfig<D, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, const N: usize> PickerConfig<D, N> {
    pub fn new() -> Self {
        Self {
            picker: PickerKind::Date,
            locale: Locale::default(),
            format: Vec::new(),
            show_time: None,
            need_confirm: None,
            order: true,
            // Single pickers may be emptied; range fields must be filled.
            allow_empty: [N == 1; N],
            disabled: [false; N],
            constraints: Constraints::default(),
            default_picker_value: std::array::from_fn(|_| None),
            value: std::array::from_fn(|_| None),
            presets: Vec::new(),
        }
    }

    pub fn with_picker(mut self, picker: PickerKind) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Add an accepted input format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format.push(format.into());
        self
    }

    pub fn with_show_time(mut self, time: TimeConfig<D>) -> Self {
        self.show_time = Some(time);
        self
    }

    pub fn with_need_confirm(mut self, need_confirm: bool) -> Self {
        self.need_confirm = Some(need_confirm);
        self
    }

    pub fn with_order(mut self, order: bool) -> Self {
        self.order = order;
        self
    }

    pub fn with_allow_empty(mut self, allow_empty: [bool; N]) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn with_disabled(mut self, disabled: [bool; N]) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_disabled_date(
        mut self,
        f: impl Fn(&D, &DisabledInfo<D>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.constraints.disabled_date = Some(Arc::new(f));
        self
    }

    pub fn with_min_date(mut self, date: D) -> Self {
        self.constraints.min_date = Some(date);
        self
    }

    pub fn with_max_date(mut self, date: D) -> Self {
        self.constraints.max_date = Some(date);
        self
    }

    pub fn with_default_picker_value(mut self, value: [Option<D>; N]) -> Self {
        self.default_picker_value = value;
        self
    }

    pub fn with_value(mut self, value: [Option<D>; N]) -> Self {
        self.value = value;
        self
    }

    pub fn with_preset(mut self, preset: Preset<D, N>) -> Self {
        self.presets.push(preset);
        self
    }

    /// Whether the picker selects a time of day, either alone or after a
    /// date.
    pub fn has_time(&self) -> bool {
        self.picker == PickerKind::Time || (self.picker.supports_time() && self.show_time.is_some())
    }

    /// The time columns in effect, if the picker has any.
    pub fn time_config(&self) -> Option<&TimeConfig<D>> {
        self.show_time.as_ref().filter(|_| self.picker.supports_time())
    }

    pub fn need_confirm(&self) -> bool {
        self.need_confirm.unwrap_or_else(|| self.has_time())
    }

    /// Panel clicks in these pickers never finish the interaction on
    /// their own.
    pub fn is_complex(&self) -> bool {
        self.has_time()
    }

    /// The mode a selection commits in.
    pub fn internal_mode(&self) -> PanelMode {
        self.picker.internal_mode(self.has_time())
    }

    /// Accepted formats, the display format first.
    pub fn formats(&self) -> Vec<String> {
        if !self.format.is_empty() {
            return self.format.clone();
        }
        vec![self.locale.field_format(self.picker, self.time_config())]
    }

    /// Non-fatal configuration problems. Each one is logged once per call.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = self.time_config().map(TimeConfig::warnings).unwrap_or_default();
        warnings.extend((0..N).filter_map(|index| {
            (self.disabled[index] && self.value[index].is_none() && !self.allow_empty[index])
                .then_some(ConfigWarning::DisabledFieldWithoutValue { index })
        }));
        error::report(warnings)
    }
}

impl<D: Clone, const N: usize> Clone for PickerConfig<D, N> {
    fn clone(&self) -> Self {
        Self {
            picker: self.picker,
            locale: self.locale.clone(),
            format: self.format.clone(),
            show_time: self.show_time.clone(),
            need_confirm: self.need_confirm,
            order: self.order,
            allow_empty: self.allow_empty,
            disabled: self.disabled,
            constraints: self.constraints.clone(),
            default_picker_value: self.default_picker_value.clone(),
            value: self.value.clone(),
            presets: self.presets.clone(),
        }
    }
}

impl<D: fmt::Debug, const N: usize> fmt::Debug for PickerConfig<D, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerConfig")
            .field("picker", &self.picker)
            .field("locale", &self.locale.locale)
            .field("format", &self.format)
            .field("show_time", &self.show_time)
            .field("need_confirm", &self.need_confirm)
            .field("order", &self.order)
            .field("allow_empty", &self.allow_empty)
            .field("disabled", &self.disabled)
            .field("constraints", &self.constraints)
            .field("value", &self.value)
            .field("presets", &self.presets)
            .finish()
    }
}
