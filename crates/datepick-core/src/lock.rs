//! Two-phase debounce for "the interaction has ended".
//!
//! When a field loses focus the next event is often focus landing on the
//! sibling field or the popup. Cleaning up immediately would throw away the
//! session, so a falling edge only schedules the cleanup under a token; any
//! rising edge before the token settles cancels it.

/// Outcome of feeding a new condition into a [`LockEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTransition {
    /// The condition became true. Run the callback now.
    Run,
    /// The condition became false. Deliver `Settle(token)` on the next tick.
    Schedule(u64),
    /// Nothing changed.
    Idle,
}

/// Debounced edge detector over a boolean condition.
#[derive(Debug, Clone, Default)]
pub struct LockEffect {
    condition: bool,
    pending: Option<u64>,
    next_token: u64,
}

impl LockEffect {
    pub fn new(condition: bool) -> Self {
        Self {
            condition,
            pending: None,
            next_token: 0,
        }
    }

    /// Record the current value of the condition.
    pub fn set(&mut self, condition: bool) -> LockTransition {
        if condition == self.condition {
            return LockTransition::Idle;
        }
        self.condition = condition;
        if condition {
            self.pending = None;
            LockTransition::Run
        } else {
            self.next_token = self.next_token.wrapping_add(1);
            self.pending = Some(self.next_token);
            LockTransition::Schedule(self.next_token)
        }
    }

    /// Whether a scheduled settle should run. A token only settles once,
    /// and only if no newer edge replaced it.
    pub fn settle(&mut self, token: u64) -> bool {
        if self.pending == Some(token) && !self.condition {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
