//! Committed value and draft, and the submit rules between them.

use crate::active::RangeSide;
use crate::date_util::{is_same, order_dates, same_dates};
use crate::generate::GenerateConfig;
use crate::locale::Locale;
use crate::mode::PanelMode;

/// What [`ValuePipeline::trigger_submit`] should try to commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<D, const N: usize> {
    /// The current draft.
    Draft,
    /// Empty every field that is not disabled. Always accepted.
    Clear,
    /// An explicit value, e.g. a preset.
    Value([Option<D>; N]),
}

/// Notifications produced by the pipeline, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueEvent<D, const N: usize> {
    /// The draft changed. `range` names the first side that differs.
    CalendarChanged {
        value: [Option<D>; N],
        range: Option<RangeSide>,
    },
    /// An accepted submit changed the committed value.
    Changed { value: [Option<D>; N] },
}

/// Validation switches for a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitRules<const N: usize> {
    /// Keep ranges ascending.
    pub order: bool,
    pub allow_empty: [bool; N],
    pub disabled: [bool; N],
    /// Granularity at which equal endpoints count as ordered.
    pub order_mode: PanelMode,
}

impl<const N: usize> SubmitRules<N> {
    /// Whether a submitted range is sorted before validation. A disabled
    /// field pins its value, so nothing is swapped into or out of it.
    pub fn sorts(&self) -> bool {
        self.order && !self.disabled.contains(&true)
    }
}

/// Owner of the committed value and the draft ("calendar value").
#[derive(Debug, Clone, PartialEq)]
pub struct ValuePipeline<D, const N: usize> {
    value: [Option<D>; N],
    draft: [Option<D>; N],
}

impl<D: Clone, const N: usize> ValuePipeline<D, N> {
    pub fn new(value: [Option<D>; N]) -> Self {
        Self {
            draft: value.clone(),
            value,
        }
    }

    pub fn value(&self) -> &[Option<D>; N] {
        &self.value
    }

    pub fn draft(&self) -> &[Option<D>; N] {
        &self.draft
    }

    /// Replace both value and draft without any notification.
    pub fn set_value(&mut self, value: [Option<D>; N]) {
        self.draft = value.clone();
        self.value = value;
    }

    /// Drop pending edits.
    pub fn reset_draft(&mut self) {
        self.draft = self.value.clone();
    }

    /// The draft with slot `index` replaced.
    pub fn fill(&self, index: usize, date: Option<D>) -> [Option<D>; N] {
        let mut next = self.draft.clone();
        if let Some(slot) = next.get_mut(index) {
            *slot = date;
        }
        next
    }

    /// Store `next` as the draft if it differs. Returns whether it did.
    pub fn trigger_calendar_change<G>(
        &mut self,
        gc: &G,
        next: [Option<D>; N],
        events: &mut Vec<ValueEvent<D, N>>,
    ) -> bool
    where
        G: GenerateConfig<Date = D>,
    {
        let (all_same, start_same) = same_dates(gc, &self.draft, &next);
        if all_same {
            return false;
        }
        self.draft = next.clone();
        let range = (N == 2).then_some(if start_same {
            RangeSide::End
        } else {
            RangeSide::Start
        });
        events.push(ValueEvent::CalendarChanged { value: next, range });
        true
    }

    /// Try to commit a submission.
    ///
    /// The candidate is ordered (when `order` is set and no field is
    /// disabled) and stored as the draft first. It is then committed if it
    /// is a clear, or if every empty slot may be empty, the endpoints are
    /// in order and no enabled slot is invalid. `is_invalid` receives the
    /// candidate, the slot value and its index. A commit that changes the
    /// value emits [`ValueEvent::Changed`]. Returns whether it was accepted.
    pub fn trigger_submit<G>(
        &mut self,
        gc: &G,
        locale: &Locale,
        submission: Submission<D, N>,
        rules: &SubmitRules<N>,
        is_invalid: impl Fn(&[Option<D>; N], &D, usize) -> bool,
        events: &mut Vec<ValueEvent<D, N>>,
    ) -> bool
    where
        G: GenerateConfig<Date = D>,
    {
        let is_clear = matches!(submission, Submission::Clear);
        let mut next = match submission {
            Submission::Draft | Submission::Clear => self.draft.clone(),
            Submission::Value(value) => value,
        };

        if is_clear {
            for (slot, disabled) in next.iter_mut().zip(rules.disabled) {
                if !disabled {
                    *slot = None;
                }
            }
        }

        if rules.sorts() {
            order_dates(gc, &mut next);
        }

        self.trigger_calendar_change(gc, next.clone(), events);

        let empty_ok = next
            .iter()
            .zip(rules.allow_empty)
            .all(|(slot, allow)| slot.is_some() || allow);

        let order_ok = !rules.order
            || match next.as_slice() {
                [Some(start), Some(end)] => {
                    is_same(gc, locale, Some(start), Some(end), rules.order_mode) || gc.is_after(end, start)
                }
                _ => true,
            };

        let dates_ok = next.iter().enumerate().all(|(i, slot)| {
            rules.disabled[i] || slot.as_ref().map_or(true, |date| !is_invalid(&next, date, i))
        });

        let passed = is_clear || (empty_ok && order_ok && dates_ok);
        tracing::debug!(is_clear, empty_ok, order_ok, dates_ok, "submit");
        if passed {
            let (unchanged, _) = same_dates(gc, &self.value, &next);
            self.value = next.clone();
            if !unchanged {
                events.push(ValueEvent::Changed { value: next });
            }
        }
        passed
    }
}
