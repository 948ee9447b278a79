//! Which field of a picker is being edited, and which one comes next.

/// Endpoint of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeSide {
    Start,
    End,
}

impl RangeSide {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            RangeSide::Start
        } else {
            RangeSide::End
        }
    }

    pub fn index(self) -> usize {
        match self {
            RangeSide::Start => 0,
            RangeSide::End => 1,
        }
    }
}

/// Where the last edit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Typing into a field.
    Input,
    /// Clicking or selecting in the popup.
    Panel,
}

/// Focus and activation bookkeeping for the `N` fields of a picker.
///
/// The activation history records every field activated while the picker
/// was focused, duplicates included. It is what decides whether a confirm
/// moves on to the sibling field or finishes the interaction.
#[derive(Debug, Clone)]
pub struct ActiveCoordinator<const N: usize> {
    focused: bool,
    active_index: usize,
    history: Vec<usize>,
    last_operation: Option<Operation>,
    submit_index: Option<usize>,
}

impl<const N: usize> Default for ActiveCoordinator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ActiveCoordinator<N> {
    pub fn new() -> Self {
        Self {
            focused: false,
            active_index: 0,
            history: Vec::new(),
            last_operation: None,
            submit_index: None,
        }
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn last_operation(&self) -> Option<Operation> {
        self.last_operation
    }

    pub fn set_last_operation(&mut self, operation: Operation) {
        self.last_operation = Some(operation);
    }

    /// The active endpoint, or `None` for single pickers.
    pub fn range_side(&self) -> Option<RangeSide> {
        (N == 2).then(|| RangeSide::from_index(self.active_index))
    }

    /// Focus the picker on `index`, recording the activation when it is new.
    pub fn focus(&mut self, index: usize) {
        let index = index.min(N.saturating_sub(1));
        let changed = !self.focused || self.active_index != index;
        self.focused = true;
        self.active_index = index;
        if changed {
            self.history.push(index);
        }
    }

    /// Drop focus. History survives until the blur settles.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Forget the session: activation history and submit marker.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.submit_index = None;
    }

    /// Remember that `index` was confirmed in this session.
    pub fn mark_submit(&mut self, index: usize) {
        self.submit_index = Some(index);
    }

    pub fn has_active_submit_value(&self, index: usize) -> bool {
        self.submit_index == Some(index)
    }

    /// The field that should receive focus after a confirm, if any.
    ///
    /// A field counts as filled when it has a value or may stay empty.
    /// Once two distinct fields in the history are filled, or the next
    /// field is disabled, the interaction is finished and `None` is
    /// returned. Single pickers always finish.
    pub fn next_active_index<D>(
        &self,
        values: &[Option<D>; N],
        allow_empty: &[bool; N],
        disabled: &[bool; N],
    ) -> Option<usize> {
        if N < 2 {
            return None;
        }
        let mut filled: Vec<usize> = self
            .history
            .iter()
            .copied()
            .filter(|&i| i < N && (values[i].is_some() || allow_empty[i]))
            .collect();
        filled.sort_unstable();
        filled.dedup();

        let next = if self.history.last() == Some(&0) { 1 } else { 0 };
        if filled.len() >= 2 || disabled[next] {
            return None;
        }
        Some(next)
    }

    /// Whether switching to `index` must be refused because the last
    /// activated field holds a value the user has not confirmed yet.
    pub fn blocks_switch_to<D>(
        &self,
        index: usize,
        need_confirm: bool,
        values: &[Option<D>; N],
        allow_empty: &[bool; N],
    ) -> bool {
        let Some(&last) = self.history.last() else {
            return false;
        };
        last != index
            && need_confirm
            && last < N
            && !allow_empty[last]
            && !self.has_active_submit_value(last)
            && values[last].is_some()
    }
}
