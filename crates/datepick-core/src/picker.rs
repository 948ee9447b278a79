//! The picker engine: a reducer over [`Message`]s.
//!
//! Inside one message the field coordinator runs first, then the value
//! pipeline, then page reconciliation, so later stages always read the
//! state the earlier ones just produced. Notifications are never called
//! back synchronously; they are returned as messages in the [`Command`].

use crate::active::{ActiveCoordinator, Operation, RangeSide};
use crate::command::Command;
use crate::config::PickerConfig;
use crate::date_util::{fill_time, is_same};
use crate::disabled::DisabledScope;
use crate::error::{self, ConfigWarning};
use crate::format::Meridiem;
use crate::generate::GenerateConfig;
use crate::locale::Locale;
use crate::lock::{LockEffect, LockTransition};
use crate::mode::{offset_panel_date, super_offset_panel_date, PanelMode, PickerKind};
use crate::panel::{self, Page};
use crate::time_units::{set_unit, toggle_meridiem, DisabledTimeInfo, TimeConfig, TimeInfo, TimeUnit};
use crate::value::{Submission, SubmitRules, ValueEvent, ValuePipeline};

/// Why the page anchor moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerValueSource {
    /// Automatic realignment when the popup opens or the field changes.
    Reset,
    /// Direct user navigation.
    Panel,
}

/// Input to and output from [`Picker::update`].
///
/// The first group drives the picker. The second group is what the picker
/// emits; feeding those back in is a no-op, so a host may route every
/// message through the same queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Message<D, const N: usize> {
    /// Field `i` gained focus. Opens the popup.
    Focus(usize),
    /// Focus left the picker from field `i`.
    Blur(usize),
    Open,
    Close,
    /// The text of field `i` was edited.
    Input(usize, String),
    /// Enter in a field.
    Submit,
    /// Discard the draft and close.
    Escape,
    Clear,
    SelectCell(D),
    SelectTime(TimeUnit, u32),
    SelectMeridiem(Meridiem),
    /// Move the page by `offset` pages, or by the header's larger step.
    Navigate { offset: i32, super_page: bool },
    SetMode(PanelMode),
    /// The OK button.
    Confirm,
    /// The "Today" / "Now" button.
    SelectNow,
    SelectPreset(usize),
    /// Replace the value from outside without emitting a change.
    SetValue([Option<D>; N]),
    /// Deferred end of a blur; see [`LockEffect`].
    Settle(u64),

    /// An accepted commit changed the value. All slots empty means cleared.
    Changed {
        value: [Option<D>; N],
        text: [String; N],
    },
    /// The draft changed.
    CalendarChanged {
        value: [Option<D>; N],
        text: [String; N],
        range: Option<RangeSide>,
    },
    /// The user navigated pages or switched modes.
    PanelChanged { value: D, mode: PanelMode },
    /// A field's page anchor changed.
    PickerValueChanged {
        value: [D; N],
        source: PickerValueSource,
        range: Option<RangeSide>,
        mode: PanelMode,
    },
    /// An explicit confirm (OK button or Enter) with the draft at that time.
    Ok([Option<D>; N]),
    OpenChanged(bool),
}

impl<D, const N: usize> Message<D, N> {
    /// Whether this is something the picker emits rather than consumes.
    pub fn is_notification(&self) -> bool {
        matches!(
            self,
            Message::Changed { .. }
                | Message::CalendarChanged { .. }
                | Message::PanelChanged { .. }
                | Message::PickerValueChanged { .. }
                | Message::Ok(_)
                | Message::OpenChanged(_)
        )
    }
}

/// Headless date picker over `N` fields.
pub struct Picker<G: GenerateConfig, const N: usize> {
    gc: G,
    config: PickerConfig<G::Date, N>,
    formats: Vec<String>,
    active: ActiveCoordinator<N>,
    values: ValuePipeline<G::Date, N>,
    lock: LockEffect,
    flushing: bool,
    open: bool,
    mode: PanelMode,
    picker_values: [G::Date; N],
    prev_active: Option<usize>,
    reconcile_key: Option<(bool, usize, Option<G::Date>)>,
    mode_key: (bool, usize),
    texts: [String; N],
    invalid: [bool; N],
    editing: Option<usize>,
    outbox: Vec<Message<G::Date, N>>,
}

/// A picker with one field.
pub type SinglePicker<G> = Picker<G, 1>;
/// A picker with a start and an end field.
pub type RangePicker<G> = Picker<G, 2>;

impl<G: GenerateConfig, const N: usize> Picker<G, N> {
    pub fn new(gc: G, mut config: PickerConfig<G::Date, N>) -> Self {
        if config.picker == PickerKind::Time && config.show_time.is_none() {
            let format = config.formats().into_iter().next().unwrap_or_default();
            config.show_time = Some(TimeConfig::from_format(&format));
        }
        config.warnings();

        let formats = config.formats();
        let now = gc.get_now();
        let picker_values = std::array::from_fn(|i| {
            config.default_picker_value[i]
                .clone()
                .or_else(|| config.value[i].clone())
                .unwrap_or_else(|| now.clone())
        });
        let values = ValuePipeline::new(config.value.clone());
        let mode = config.internal_mode();
        tracing::debug!(picker = ?config.picker, fields = N, ?formats, "picker created");

        let mut picker = Self {
            gc,
            formats,
            active: ActiveCoordinator::new(),
            values,
            lock: LockEffect::new(false),
            flushing: false,
            open: false,
            mode,
            picker_values,
            prev_active: None,
            reconcile_key: None,
            mode_key: (false, 0),
            texts: std::array::from_fn(|_| String::new()),
            invalid: [false; N],
            editing: None,
            outbox: Vec::new(),
            config,
        };
        picker.sync_texts();
        picker
    }

    // --- Accessors ---

    pub fn config(&self) -> &PickerConfig<G::Date, N> {
        &self.config
    }

    pub fn generate(&self) -> &G {
        &self.gc
    }

    pub fn locale(&self) -> &Locale {
        &self.config.locale
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// The committed value.
    pub fn value(&self) -> &[Option<G::Date>; N] {
        self.values.value()
    }

    /// The draft shown while editing.
    pub fn draft(&self) -> &[Option<G::Date>; N] {
        self.values.draft()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_focused(&self) -> bool {
        self.active.focused()
    }

    pub fn active_index(&self) -> usize {
        self.active.active_index()
    }

    pub fn active_history(&self) -> &[usize] {
        self.active.history()
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Page anchor of field `index`.
    pub fn picker_value(&self, index: usize) -> Option<&G::Date> {
        self.picker_values.get(index)
    }

    /// Field text: the formatted draft, or what the user is typing.
    pub fn text(&self, index: usize) -> &str {
        self.texts.get(index).map(String::as_str).unwrap_or_default()
    }

    /// Whether field `index` shows typed text rather than the formatted draft.
    pub fn is_editing(&self, index: usize) -> bool {
        self.editing == Some(index)
    }

    /// Whether the text of field `index` does not parse to a usable date.
    pub fn is_invalid_text(&self, index: usize) -> bool {
        self.invalid.get(index).copied().unwrap_or(false)
    }

    pub fn need_confirm(&self) -> bool {
        self.config.need_confirm()
    }

    /// Two adjacent pages are shown for ranges in their terminal mode.
    pub fn is_multi_panel(&self) -> bool {
        N == 2
            && self.config.picker != PickerKind::Time
            && self.mode == self.config.picker.internal_mode(false)
    }

    pub fn panel_count(&self) -> usize {
        match (self.mode.has_cells(), self.is_multi_panel()) {
            (false, _) => 0,
            (true, true) => 2,
            (true, false) => 1,
        }
    }

    /// The calendar page of panel `panel` (0 or 1 when multi-panel).
    pub fn page(&self, panel: usize) -> Page<G::Date> {
        let active = self.active_index();
        let anchor = offset_panel_date(&self.gc, self.mode, &self.picker_values[active], panel as i32);
        let scope = self.scope();
        let kind = cell_kind(self.mode);
        panel::build(
            &self.gc,
            &self.config.locale,
            self.mode,
            &anchor,
            self.values.draft(),
            |date| scope.is_disabled(date, kind, Some(active)),
        )
    }

    /// Whether a cell on the current page may be selected.
    pub fn is_cell_disabled(&self, date: &G::Date) -> bool {
        self.scope()
            .is_disabled(date, cell_kind(self.mode), Some(self.active_index()))
    }

    /// Whether `date` could be committed to the active field.
    pub fn is_date_invalid(&self, date: &G::Date) -> bool {
        self.scope().is_invalid(date, Some(self.active_index()))
    }

    /// Time columns for the active field, if the picker has a time part.
    pub fn time_info(&self) -> Option<TimeInfo<'_, G::Date>> {
        let time = self.config.time_config()?;
        let active = self.active_index();
        let current = self.time_value();
        Some(time.info(Some(&current), &self.time_scope(active)))
    }

    /// The time the time panel shows: the active draft or a base time.
    pub fn time_value(&self) -> G::Date {
        let active = self.active_index();
        self.values.draft()[active]
            .clone()
            .unwrap_or_else(|| self.time_base(active))
    }

    /// Whether the OK button is usable.
    pub fn can_confirm(&self) -> bool {
        let active = self.active_index();
        match &self.values.draft()[active] {
            Some(date) => !self.is_date_invalid(date),
            None => false,
        }
    }

    pub fn format(&self, date: &G::Date) -> String {
        match self.formats.first() {
            Some(pattern) => self.gc.format(&self.config.locale, date, pattern),
            None => String::new(),
        }
    }

    // --- Reducer ---

    /// Apply one message and return the notifications and deferred
    /// messages it produced, in order.
    pub fn update(&mut self, msg: Message<G::Date, N>) -> Command<Message<G::Date, N>> {
        if msg.is_notification() {
            return Command::none();
        }
        tracing::trace!(?msg, "picker update");

        match msg {
            Message::Focus(index) => self.focus(index),
            Message::Blur(_) => self.blur(),
            Message::Open => {
                if self.config.disabled.contains(&false) {
                    self.set_open(true);
                }
            }
            Message::Close => self.set_open(false),
            Message::Input(index, text) => self.input(index, text),
            Message::Submit => self.submit_key(),
            Message::Escape => {
                self.values.reset_draft();
                self.editing = None;
                self.set_open(false);
            }
            Message::Clear => {
                self.editing = None;
                self.submit(Submission::Clear);
                self.set_open(false);
            }
            Message::SelectCell(date) => self.select_cell(date),
            Message::SelectTime(unit, value) => self.select_time(|gc, base| set_unit(gc, base, unit, value)),
            Message::SelectMeridiem(meridiem) => self.select_time(|gc, base| {
                if Meridiem::of_hour(gc.get_hour(base)) == meridiem {
                    base.clone()
                } else {
                    toggle_meridiem(gc, base)
                }
            }),
            Message::Navigate { offset, super_page } => self.navigate(offset, super_page),
            Message::SetMode(mode) => self.set_mode(mode),
            Message::Confirm => {
                if self.can_confirm() {
                    self.emit_ok();
                    self.part_confirm(None, false);
                }
            }
            Message::SelectNow => self.select_now(),
            Message::SelectPreset(index) => {
                if let Some(preset) = self.config.presets.get(index) {
                    let value = preset.value();
                    self.editing = None;
                    if self.submit(Submission::Value(value)) {
                        self.set_open(false);
                    }
                }
            }
            Message::SetValue(value) => {
                self.editing = None;
                self.values.set_value(value);
            }
            Message::Settle(token) => self.settle(token),
            _ => {}
        }

        self.after_update();
        Command::sequence(self.outbox.drain(..).map(Command::message).collect::<Vec<_>>())
    }

    fn after_update(&mut self) {
        let mode_key = (self.open, self.active_index());
        if self.open && self.mode_key != mode_key {
            self.mode = self.config.internal_mode();
        }
        self.mode_key = mode_key;

        self.reconcile();

        let active = self.active.focused() || self.open;
        match self.lock.set(active) {
            LockTransition::Run if !self.active.focused() => self.active.clear_history(),
            LockTransition::Schedule(token) => self.outbox.push(Message::Settle(token)),
            _ => {}
        }
        self.sync_texts();
    }

    fn settle(&mut self, token: u64) {
        if !self.lock.settle(token) {
            return;
        }
        tracing::debug!(token, "interaction finished");
        self.active.clear_history();
        self.flush();
    }

    /// Submit the draft, re-announce the committed value and drop the
    /// draft. Nested flushes are ignored.
    fn flush(&mut self) {
        if self.flushing {
            return;
        }
        self.flushing = true;
        self.editing = None;
        self.submit(Submission::Draft);
        let committed = self.values.value().clone();
        self.calendar_change(committed);
        self.values.reset_draft();
        self.flushing = false;
    }

    // --- Field coordinator ---

    fn focus(&mut self, index: usize) {
        if index >= N || self.config.disabled[index] {
            return;
        }
        let need_confirm = self.need_confirm();
        if self.active.blocks_switch_to(
            index,
            need_confirm,
            self.values.draft(),
            &self.config.allow_empty,
        ) {
            tracing::debug!(index, "field switch refused until the current field is confirmed");
            return;
        }

        self.active.set_last_operation(Operation::Input);
        let switching = self.active_index() != index;
        self.set_open(true);
        if switching && self.open && !need_confirm && self.config.is_complex() {
            self.part_confirm(None, true);
        }
        if switching {
            self.editing = None;
        }
        self.active.focus(index);
    }

    fn blur(&mut self) {
        self.set_open(false);
        if !self.need_confirm() && self.active.last_operation() == Some(Operation::Input) {
            let next = self.active.next_active_index(
                self.values.draft(),
                &self.config.allow_empty,
                &self.config.disabled,
            );
            if next.is_none() {
                self.submit(Submission::Draft);
            }
        }
        self.editing = None;
        self.active.blur();
    }

    fn set_open(&mut self, open: bool) {
        if self.open != open {
            self.open = open;
            self.outbox.push(Message::OpenChanged(open));
        }
    }

    /// Confirm the active field, then move to the next one or finish.
    fn part_confirm(&mut self, date: Option<G::Date>, skip_focus: bool) {
        let active = self.active_index();
        let next_value = match date {
            Some(date) => self.values.fill(active, Some(date)),
            None => self.values.draft().clone(),
        };
        self.active.mark_submit(active);
        let next_index =
            self.active
                .next_active_index(&next_value, &self.config.allow_empty, &self.config.disabled);
        self.calendar_change(next_value);
        self.editing = None;

        match next_index {
            None => {
                self.submit(Submission::Draft);
                self.set_open(false);
            }
            Some(next) if !skip_focus => self.focus(next),
            Some(_) => {}
        }
    }

    // --- Typing ---

    fn input(&mut self, index: usize, text: String) {
        if index >= N || self.config.disabled[index] {
            return;
        }
        self.active.set_last_operation(Operation::Input);
        self.editing = Some(index);

        if text.trim().is_empty() {
            self.invalid[index] = false;
            self.texts[index] = text;
            let next = self.values.fill(index, None);
            self.calendar_change(next);
            return;
        }

        let parsed = self
            .gc
            .parse(&self.config.locale, text.trim(), &self.formats)
            .ok()
            .filter(|date| !self.scope().is_invalid(date, Some(index)));
        self.texts[index] = text;
        match parsed {
            Some(date) => {
                self.invalid[index] = false;
                let next = self.values.fill(index, Some(date));
                self.calendar_change(next);
            }
            None => self.invalid[index] = true,
        }
    }

    fn submit_key(&mut self) {
        if !self.open {
            self.set_open(true);
            return;
        }
        let active = self.active_index();
        if self.invalid[active] {
            return;
        }
        if self.need_confirm() && self.can_confirm() {
            self.emit_ok();
        }
        self.part_confirm(None, false);
    }

    // --- Panel ---

    fn select_cell(&mut self, date: G::Date) {
        if !self.mode.has_cells() || self.is_cell_disabled(&date) {
            return;
        }
        self.active.set_last_operation(Operation::Panel);
        let internal = self.config.internal_mode();
        match self.mode.next_on_select(internal) {
            Some(next_mode) => {
                self.set_picker_value(date.clone(), PickerValueSource::Panel);
                self.mode = next_mode;
                self.outbox.push(Message::PanelChanged {
                    value: date,
                    mode: next_mode,
                });
            }
            None => {
                let date = if internal == PanelMode::DateTime {
                    self.with_draft_time(date)
                } else {
                    date
                };
                self.panel_select(date);
            }
        }
    }

    /// A value was picked in the popup.
    fn panel_select(&mut self, date: G::Date) {
        self.editing = None;
        let active = self.active_index();
        let next = self.values.fill(active, Some(date.clone()));
        self.calendar_change(next);
        if !self.need_confirm() && !self.config.is_complex() && self.mode == self.config.internal_mode() {
            self.part_confirm(Some(date), false);
        }
    }

    /// Give a date cell the time of the current draft, the configured
    /// default time, or keep its own; then repair it against disabled times.
    fn with_draft_time(&self, date: G::Date) -> G::Date {
        let active = self.active_index();
        let Some(time) = self.config.time_config() else {
            return date;
        };
        let source = self.values.draft()[active]
            .clone()
            .or_else(|| time.default_value.clone());
        let filled = fill_time(&self.gc, &date, source.as_ref());
        time.valid_time(&self.gc, &filled, None, &self.time_scope(active))
    }

    fn select_time(&mut self, change: impl FnOnce(&G, &G::Date) -> G::Date) {
        let Some(time) = self.config.time_config() else {
            return;
        };
        let active = self.active_index();
        let base = self.time_value();
        let next = change(&self.gc, &base);
        let next = time.valid_time(&self.gc, &next, None, &self.time_scope(active));
        self.active.set_last_operation(Operation::Panel);
        self.panel_select(next);
    }

    fn select_now(&mut self) {
        let now = self.gc.get_now();
        let active = self.active_index();
        let now = match self.config.time_config() {
            Some(time) => time.valid_time(&self.gc, &now, None, &self.time_scope(active)),
            None => now,
        };
        let kind = cell_kind(self.config.internal_mode());
        if self.scope().is_disabled(&now, kind, Some(active)) {
            return;
        }
        self.active.set_last_operation(Operation::Panel);
        self.panel_select(now);
    }

    fn navigate(&mut self, offset: i32, super_page: bool) {
        if !self.mode.has_cells() {
            return;
        }
        let active = self.active_index();
        let anchor = &self.picker_values[active];
        let next = if super_page {
            super_offset_panel_date(&self.gc, self.mode, anchor, offset)
        } else {
            offset_panel_date(&self.gc, self.mode, anchor, offset)
        };
        self.set_picker_value(next.clone(), PickerValueSource::Panel);
        self.outbox.push(Message::PanelChanged {
            value: next,
            mode: self.mode,
        });
    }

    fn set_mode(&mut self, mode: PanelMode) {
        if !mode.reachable_from(self.config.internal_mode()) {
            error::report(vec![ConfigWarning::UnreachableMode {
                mode: format!("{mode:?}"),
                picker: format!("{:?}", self.config.picker),
            }]);
            return;
        }
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        let value = self.picker_values[self.active_index()].clone();
        self.outbox.push(Message::PanelChanged { value, mode });
    }

    fn emit_ok(&mut self) {
        let draft = self.values.draft().clone();
        self.outbox.push(Message::Ok(draft));
    }

    // --- Value pipeline glue ---

    fn submit(&mut self, submission: Submission<G::Date, N>) -> bool {
        let config = &self.config;
        let gc = &self.gc;
        let history = self.active.history();
        let rules = SubmitRules {
            order: config.order,
            allow_empty: config.allow_empty,
            disabled: config.disabled,
            order_mode: config.internal_mode(),
        };
        let is_invalid = |values: &[Option<G::Date>; N], date: &G::Date, index: usize| {
            let scope = DisabledScope {
                gc,
                locale: &config.locale,
                constraints: &config.constraints,
                picker: config.picker,
                time: config.time_config(),
                values,
                disabled: &config.disabled,
                history,
            };
            scope.is_invalid(date, Some(index))
        };

        let mut events = Vec::new();
        let passed =
            self.values
                .trigger_submit(gc, &config.locale, submission, &rules, is_invalid, &mut events);
        self.push_value_events(events);
        passed
    }

    fn calendar_change(&mut self, next: [Option<G::Date>; N]) {
        let mut events = Vec::new();
        self.values.trigger_calendar_change(&self.gc, next, &mut events);
        self.push_value_events(events);
    }

    fn push_value_events(&mut self, events: Vec<ValueEvent<G::Date, N>>) {
        for event in events {
            let msg = match event {
                ValueEvent::CalendarChanged { value, range } => Message::CalendarChanged {
                    text: self.texts_of(&value),
                    value,
                    range,
                },
                ValueEvent::Changed { value } => {
                    tracing::debug!(?value, "value committed");
                    Message::Changed {
                        text: self.texts_of(&value),
                        value,
                    }
                }
            };
            self.outbox.push(msg);
        }
    }

    fn texts_of(&self, value: &[Option<G::Date>; N]) -> [String; N] {
        std::array::from_fn(|i| value[i].as_ref().map(|d| self.format(d)).unwrap_or_default())
    }

    fn sync_texts(&mut self) {
        for i in 0..N {
            if self.editing != Some(i) {
                self.texts[i] = self.values.draft()[i]
                    .as_ref()
                    .map(|d| self.format(d))
                    .unwrap_or_default();
                self.invalid[i] = false;
            }
        }
    }

    // --- Page reconciliation ---

    fn reconcile(&mut self) {
        let active = self.active_index();
        let key = (self.open, active, self.values.draft()[active].clone());
        if self.reconcile_key.as_ref() == Some(&key) {
            return;
        }
        let field_changed = self
            .reconcile_key
            .as_ref()
            .map_or(true, |(open, index, _)| *open != key.0 || *index != key.1);
        self.reconcile_key = Some(key);

        if !self.open {
            self.prev_active = None;
            return;
        }

        if let Some(pinned) = self.config.default_picker_value[active].clone() {
            if field_changed {
                self.set_picker_value(pinned, PickerValueSource::Reset);
            }
            self.prev_active = Some(active);
            return;
        }

        let draft = self.values.draft();
        let sibling = if N == 2 { Some(active ^ 1) } else { None };
        let mut next = (self.config.picker != PickerKind::Time).then(|| self.gc.get_now());
        if let Some(prev) = self.prev_active.filter(|prev| *prev != active) {
            next = Some(self.picker_values[prev].clone());
        } else if let Some(value) = &draft[active] {
            next = Some(if active == 0 {
                value.clone()
            } else {
                self.end_anchor(draft[0].as_ref(), value)
            });
        } else if let Some(value) = sibling.and_then(|s| draft[s].as_ref()) {
            next = Some(value.clone());
        }

        if let Some(next) = next {
            let next = self.clamp_anchor(next);
            self.set_picker_value(next, PickerValueSource::Reset);
        }
        self.prev_active = Some(active);
    }

    /// Anchor for the end field so the end lands on the second of two
    /// adjacent pages when start and end are in different buckets.
    fn end_anchor(&self, start: Option<&G::Date>, end: &G::Date) -> G::Date {
        if !self.is_multi_panel() {
            return end.clone();
        }
        let gc = &self.gc;
        let page = self.config.picker.internal_mode(false);
        let bucket = match page {
            PanelMode::Date | PanelMode::Week => PanelMode::Month,
            PanelMode::Month | PanelMode::Quarter => PanelMode::Year,
            PanelMode::Year => PanelMode::Decade,
            _ => return end.clone(),
        };
        if is_same(gc, &self.config.locale, start, Some(end), bucket) {
            end.clone()
        } else {
            offset_panel_date(gc, page, end, -1)
        }
    }

    /// Keep both visible pages within `min_date..=max_date`.
    fn clamp_anchor(&self, anchor: G::Date) -> G::Date {
        let gc = &self.gc;
        let constraints = &self.config.constraints;
        let page = self.config.picker.internal_mode(false);
        let multi = self.is_multi_panel();

        let mut anchor = anchor;
        if let Some(min) = &constraints.min_date {
            if gc.is_after(min, &anchor) {
                anchor = min.clone();
            }
        }
        if let Some(max) = &constraints.max_date {
            let last_page = if multi {
                offset_panel_date(gc, page, &anchor, 1)
            } else {
                anchor.clone()
            };
            if gc.is_after(&last_page, max) {
                anchor = if multi {
                    offset_panel_date(gc, page, max, -1)
                } else {
                    max.clone()
                };
            }
        }
        anchor
    }

    fn set_picker_value(&mut self, next: G::Date, source: PickerValueSource) {
        let active = self.active_index();
        let unchanged = is_same(
            &self.gc,
            &self.config.locale,
            Some(&self.picker_values[active]),
            Some(&next),
            self.mode,
        );
        self.picker_values[active] = next;
        if !unchanged {
            self.outbox.push(Message::PickerValueChanged {
                value: self.picker_values.clone(),
                source,
                range: self.active.range_side(),
                mode: self.mode,
            });
        }
    }

    // --- Disabled helpers ---

    fn scope(&self) -> DisabledScope<'_, G, N> {
        DisabledScope {
            gc: &self.gc,
            locale: &self.config.locale,
            constraints: &self.config.constraints,
            picker: self.config.picker,
            time: self.config.time_config(),
            values: self.values.draft(),
            disabled: &self.config.disabled,
            history: self.active.history(),
        }
    }

    fn time_scope(&self, active: usize) -> DisabledTimeInfo<G::Date> {
        DisabledTimeInfo {
            range: self.active.range_side(),
            from: self.scope().from_date(Some(active)).cloned(),
        }
    }

    /// Time of day used before the field has a value: midnight on the
    /// field's page, or the configured default time.
    fn time_base(&self, active: usize) -> G::Date {
        let gc = &self.gc;
        let anchor = &self.picker_values[active];
        let midnight = gc.set_millisecond(&gc.set_second(&gc.set_minute(&gc.set_hour(anchor, 0), 0), 0), 0);
        let default = self.config.time_config().and_then(|t| t.default_value.as_ref());
        fill_time(gc, &midnight, default)
    }
}

/// Granularity handed to disabled checks for cells of `mode`.
fn cell_kind(mode: PanelMode) -> PanelMode {
    match mode {
        PanelMode::DateTime => PanelMode::Date,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::generate::ChronoGenerate;
    use crate::testing::TestPicker;
    use crate::time_units::DisabledTimes;
    use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn range(config: PickerConfig<NaiveDateTime, 2>) -> TestPicker<ChronoGenerate, 2> {
        TestPicker::new(ChronoGenerate::with_now(now()), config)
    }

    fn single(config: PickerConfig<NaiveDateTime, 1>) -> TestPicker<ChronoGenerate, 1> {
        TestPicker::new(ChronoGenerate::with_now(now()), config)
    }

    #[test]
    fn decade_cell_drills_down_without_commit() {
        let mut t = single(PickerConfig::new());
        t.send(Message::Focus(0));
        t.send(Message::SetMode(PanelMode::Decade));
        t.send(Message::SelectCell(dt(2020, 1, 1)));

        assert_eq!(t.picker().mode(), PanelMode::Year);
        let anchor = t.picker().picker_value(0).unwrap();
        assert!((2020..2030).contains(&anchor.year()));
        assert_eq!(t.picker().value(), &[None]);
        assert!(t.changes().is_empty());
        assert!(t.emitted().iter().any(|m| matches!(
            m,
            Message::PanelChanged { mode: PanelMode::Year, .. }
        )));
    }

    #[test]
    fn single_date_commits_on_click() {
        let mut t = single(PickerConfig::new());
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 6, 3)));
        assert_eq!(t.picker().value(), &[Some(dt(2024, 6, 3))]);
        assert!(!t.picker().is_open());
        assert_eq!(
            t.changes(),
            vec![([Some(dt(2024, 6, 3))], ["2024-06-03".to_string()])]
        );
    }

    #[test]
    fn range_start_after_end_is_swapped_on_commit() {
        let mut t = range(PickerConfig::new().with_value([None, Some(dt(2024, 1, 10))]));
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 1, 15)));
        // The start was confirmed, focus moved on to the end field.
        assert_eq!(t.picker().active_index(), 1);
        assert!(t.picker().is_open());
        t.send(Message::Submit);

        let expected = [Some(dt(2024, 1, 10)), Some(dt(2024, 1, 15))];
        assert_eq!(t.picker().value(), &expected);
        assert_eq!(t.changes().last().map(|(v, _)| *v), Some(expected));
        assert!(!t.picker().is_open());
    }

    #[test]
    fn range_fills_both_fields_in_turn() {
        let mut t = range(PickerConfig::new());
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 6, 3)));
        assert_eq!(t.picker().active_index(), 1);
        assert!(t.changes().is_empty());
        t.send(Message::SelectCell(dt(2024, 6, 9)));
        assert_eq!(t.picker().value(), &[Some(dt(2024, 6, 3)), Some(dt(2024, 6, 9))]);
        assert!(!t.picker().is_open());
    }

    #[test]
    fn clear_empties_every_field() {
        let mut t = range(
            PickerConfig::new()
                .with_allow_empty([false, true])
                .with_value([Some(dt(2024, 1, 1)), Some(dt(2024, 1, 2))]),
        );
        t.send(Message::Clear);
        assert_eq!(t.picker().value(), &[None, None]);
        assert_eq!(t.changes(), vec![([None, None], [String::new(), String::new()])]);
    }

    #[test]
    fn open_with_empty_fields_anchors_on_now() {
        let mut t = range(PickerConfig::new());
        t.send(Message::Focus(0));
        assert!(is_same(
            t.picker().generate(),
            t.picker().locale(),
            t.picker().picker_value(0),
            Some(&now()),
            PanelMode::Date
        ));
        t.send(Message::Focus(1));
        // Switching fields keeps the page of the sibling field.
        assert_eq!(t.picker().picker_value(1).map(|d| d.month()), Some(6));
    }

    #[test]
    fn end_field_anchors_one_page_back() {
        let mut t = range(PickerConfig::new().with_value([Some(dt(2024, 1, 10)), Some(dt(2024, 3, 5))]));
        t.send(Message::Focus(1));
        // Opened straight on the end: the end shows on the second page.
        let anchor = t.picker().picker_value(1).unwrap();
        assert_eq!((anchor.year(), anchor.month()), (2024, 2));
        assert_eq!(t.picker().page(1).header, "Mar 2024");
    }

    #[test]
    fn anchor_clamped_to_max_date() {
        let mut t = range(PickerConfig::new().with_max_date(dt(2024, 3, 20)));
        t.send(Message::Focus(0));
        // Now is June; both pages must stay at or before March.
        let anchor = t.picker().picker_value(0).unwrap();
        assert_eq!((anchor.year(), anchor.month()), (2024, 2));
        let resets = t
            .emitted()
            .iter()
            .filter(|m| matches!(m, Message::PickerValueChanged { source: PickerValueSource::Reset, .. }))
            .count();
        assert_eq!(resets, 1);
    }

    #[test]
    fn default_picker_value_pins_the_page() {
        let mut t = single(PickerConfig::new().with_default_picker_value([Some(dt(2030, 5, 1))]));
        t.send(Message::Focus(0));
        assert_eq!(t.picker().picker_value(0).map(|d| d.year()), Some(2030));
    }

    #[test]
    fn navigation_emits_panel_events() {
        let mut t = single(PickerConfig::new());
        t.send(Message::Focus(0));
        t.clear_emitted();
        t.send(Message::Navigate {
            offset: 1,
            super_page: false,
        });
        assert_eq!(t.picker().picker_value(0).map(|d| d.month()), Some(7));
        assert!(t.emitted().iter().any(|m| matches!(
            m,
            Message::PickerValueChanged { source: PickerValueSource::Panel, .. }
        )));
        assert!(t.emitted().iter().any(|m| matches!(m, Message::PanelChanged { .. })));
        t.send(Message::Navigate {
            offset: -1,
            super_page: true,
        });
        assert_eq!(t.picker().picker_value(0).map(|d| d.year()), Some(2023));
    }

    #[test]
    fn typing_parses_and_blur_restores_text() {
        let mut t = single(PickerConfig::new());
        t.send(Message::Focus(0));
        t.send(Message::Input(0, "2024-02-x".into()));
        assert!(t.picker().is_invalid_text(0));
        assert_eq!(t.picker().text(0), "2024-02-x");
        t.send(Message::Input(0, "2024-02-03".into()));
        assert!(!t.picker().is_invalid_text(0));
        assert_eq!(t.picker().draft(), &[Some(dt(2024, 2, 3))]);
        t.send(Message::Input(0, "2024-02-".into()));
        t.send(Message::Blur(0));
        assert_eq!(t.picker().text(0), "2024-02-03");
        assert!(!t.picker().is_invalid_text(0));
    }

    #[test]
    fn blur_flushes_the_draft_after_settling() {
        let mut t = single(PickerConfig::new().with_need_confirm(true));
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 6, 20)));
        assert_eq!(t.picker().value(), &[None]);
        t.send(Message::Blur(0));
        // Nothing is committed until the settle tick runs.
        assert_eq!(t.picker().value(), &[None]);
        t.drain();
        assert_eq!(t.picker().value(), &[Some(dt(2024, 6, 20))]);
        assert!(t.picker().active_history().is_empty());
    }

    #[test]
    fn blur_with_incomplete_range_flushes_and_resyncs() {
        let mut t = range(PickerConfig::new());
        t.send(Message::Focus(0));
        t.send(Message::Input(0, "2024-01-05".to_string()));
        t.send(Message::Blur(0));
        t.drain();

        // The half-filled range is refused and the draft falls back to the
        // committed value, announced as a calendar change.
        assert_eq!(t.picker().value(), &[None, None]);
        assert_eq!(t.picker().draft(), &[None, None]);
        assert_eq!(
            t.calendar_changes(),
            vec![[Some(dt(2024, 1, 5)), None], [None, None]]
        );
        assert!(t.changes().is_empty());
    }

    #[test]
    fn refocus_before_settle_keeps_the_session() {
        let mut t = range(PickerConfig::new());
        t.send(Message::Focus(0));
        t.send(Message::Blur(0));
        t.send(Message::Focus(1));
        t.drain();
        assert_eq!(t.picker().active_history(), &[0, 1]);
        assert!(t.picker().is_open());
    }

    #[test]
    fn escape_discards_the_draft() {
        let mut t = single(PickerConfig::new().with_value([Some(dt(2024, 1, 1))]).with_need_confirm(true));
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 6, 20)));
        t.send(Message::Escape);
        assert_eq!(t.picker().draft(), &[Some(dt(2024, 1, 1))]);
        t.send(Message::Blur(0));
        t.drain();
        assert_eq!(t.picker().value(), &[Some(dt(2024, 1, 1))]);
        assert!(t.changes().is_empty());
    }

    #[test]
    fn unconfirmed_field_blocks_switching() {
        let mut t = range(PickerConfig::new().with_need_confirm(true));
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 6, 3)));
        t.send(Message::Focus(1));
        assert_eq!(t.picker().active_index(), 0);
        t.send(Message::Confirm);
        assert_eq!(t.picker().active_index(), 1);
        assert!(t.emitted().iter().any(|m| matches!(m, Message::Ok(_))));
    }

    #[test]
    fn enter_without_a_draft_does_not_confirm() {
        let mut t = range(PickerConfig::new().with_need_confirm(true));
        t.send(Message::Focus(0));
        t.send(Message::Submit);
        assert!(!t.emitted().iter().any(|m| matches!(m, Message::Ok(_))));
        assert_eq!(t.picker().value(), &[None, None]);

        let mut t = range(PickerConfig::new().with_need_confirm(true));
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 6, 3)));
        t.send(Message::Submit);
        assert!(t
            .emitted()
            .iter()
            .any(|m| matches!(m, Message::Ok(v) if v[0] == Some(dt(2024, 6, 3)))));
    }

    #[test]
    fn date_time_cell_keeps_the_drafted_time() {
        let time = TimeConfig::default().with_disabled_time(|_, _| {
            DisabledTimes::new().with_hours(|| (0..9).collect())
        });
        let mut t = single(PickerConfig::new().with_show_time(time));
        t.send(Message::Focus(0));
        assert_eq!(t.picker().mode(), PanelMode::DateTime);
        t.send(Message::SelectCell(dt(2024, 6, 3)));
        // Midnight is disabled, so the first enabled hour is used.
        let draft = t.picker().draft()[0].unwrap();
        assert_eq!((draft.day(), draft.hour()), (3, 9));
        t.send(Message::SelectTime(TimeUnit::Minute, 45));
        t.send(Message::SelectCell(dt(2024, 6, 4)));
        let draft = t.picker().draft()[0].unwrap();
        assert_eq!((draft.day(), draft.hour(), draft.minute()), (4, 9, 45));
        // Needs confirmation.
        assert_eq!(t.picker().value(), &[None]);
        t.send(Message::Confirm);
        assert_eq!(t.picker().value(), &[Some(draft)]);
    }

    #[test]
    fn twelve_hour_time_picker_skips_disabled_morning() {
        let time = TimeConfig::default()
            .with_12_hours(true)
            .with_disabled_time(|_, _| DisabledTimes::new().with_hours(|| (0..12).collect()));
        let mut t = single(PickerConfig::new().with_picker(PickerKind::Time).with_show_time(time));
        t.send(Message::Focus(0));
        assert_eq!(t.picker().mode(), PanelMode::Time);
        t.send(Message::SelectTime(TimeUnit::Hour, 3));
        assert_eq!(t.picker().draft()[0].map(|d| d.hour()), Some(12));
        t.send(Message::SelectMeridiem(Meridiem::Am));
        assert_eq!(t.picker().draft()[0].map(|d| d.hour()), Some(12));
    }

    #[test]
    fn presets_submit_and_close() {
        let value = [Some(dt(2024, 1, 1)), Some(dt(2024, 1, 7))];
        let mut t = range(PickerConfig::new().with_preset(Preset::new("First week", value)));
        t.send(Message::Focus(0));
        t.send(Message::SelectPreset(0));
        assert_eq!(t.picker().value(), &value);
        assert!(!t.picker().is_open());
    }

    #[test]
    fn order_false_keeps_input_order() {
        let backwards = [Some(dt(2024, 2, 1)), Some(dt(2024, 1, 1))];
        let mut t = range(
            PickerConfig::new()
                .with_order(false)
                .with_preset(Preset::new("backwards", backwards)),
        );
        t.send(Message::Focus(0));
        t.send(Message::SelectPreset(0));
        assert_eq!(t.picker().value(), &backwards);
        assert_eq!(t.changes().last().map(|(v, _)| *v), Some(backwards));
    }

    #[test]
    fn submit_checks_dates_against_the_first_picked_field() {
        // Nothing later than the first picked value may be chosen.
        let mut t = range(PickerConfig::new().with_disabled_date(|d: &NaiveDateTime, info| {
            info.from.map_or(false, |from| *d > from)
        }));
        t.send(Message::Focus(1));
        t.send(Message::SelectCell(dt(2024, 1, 20)));
        assert_eq!(t.picker().active_index(), 0);
        assert!(t.picker().is_cell_disabled(&dt(2024, 1, 25)));
        assert!(!t.picker().is_cell_disabled(&dt(2024, 1, 15)));

        t.send(Message::SelectCell(dt(2024, 1, 15)));
        assert_eq!(t.picker().value(), &[Some(dt(2024, 1, 15)), Some(dt(2024, 1, 20))]);
        assert!(!t.picker().is_open());
    }

    #[test]
    fn disabled_cells_are_ignored() {
        let mut t = single(PickerConfig::new().with_disabled_date(|d: &NaiveDateTime, _| d.day() == 13));
        t.send(Message::Focus(0));
        t.send(Message::SelectCell(dt(2024, 6, 13)));
        assert_eq!(t.picker().draft(), &[None]);
        assert!(t.picker().page(0).cells().any(|c| c.disabled && c.date.day() == 13));
    }

    #[test]
    fn notifications_are_inert() {
        let mut t = single(PickerConfig::new());
        let cmd = t.picker_mut().update(Message::OpenChanged(true));
        assert!(cmd.is_none());
        assert!(!t.picker().is_open());
    }

    #[test]
    fn unreachable_mode_is_refused() {
        let mut t = single(PickerConfig::new().with_picker(PickerKind::Month));
        t.send(Message::Focus(0));
        t.send(Message::SetMode(PanelMode::Date));
        assert_eq!(t.picker().mode(), PanelMode::Month);
        t.send(Message::SetMode(PanelMode::Year));
        assert_eq!(t.picker().mode(), PanelMode::Year);
        // Reopening starts again from the picker's own mode.
        t.send(Message::Close);
        t.send(Message::Open);
        assert_eq!(t.picker().mode(), PanelMode::Month);
    }

    #[test]
    fn select_now_uses_the_clock() {
        let mut t = single(PickerConfig::new());
        t.send(Message::Focus(0));
        t.send(Message::SelectNow);
        assert_eq!(t.picker().value(), &[Some(now())]);
    }
}
