use crate::command::{Action, Command, CommandInner};
use crate::config::PickerConfig;
use crate::generate::GenerateConfig;
use crate::picker::{Message, Picker};

/// A headless harness that drives a [`Picker`] the way a host loop would.
///
/// Notifications returned by [`Picker::update`] are recorded for
/// assertions. Deferred input messages (the settle tick after a blur) are
/// queued and only delivered by [`drain`](TestPicker::drain), so a test
/// can observe the state between a blur and its settle.
///
/// # Example
///
/// ```rust
/// use datepick_core::testing::TestPicker;
/// use datepick_core::{ChronoGenerate, Message, PickerConfig};
///
/// let mut t = TestPicker::<ChronoGenerate, 1>::new(ChronoGenerate::new(), PickerConfig::new());
/// t.send(Message::Focus(0));
/// assert!(t.picker().is_open());
/// t.send(Message::Escape);
/// assert!(!t.picker().is_open());
/// ```
pub struct TestPicker<G: GenerateConfig, const N: usize> {
    picker: Picker<G, N>,
    pending: Vec<Message<G::Date, N>>,
    emitted: Vec<Message<G::Date, N>>,
}

impl<G: GenerateConfig, const N: usize> TestPicker<G, N> {
    pub fn new(gc: G, config: PickerConfig<G::Date, N>) -> Self {
        Self {
            picker: Picker::new(gc, config),
            pending: Vec::new(),
            emitted: Vec::new(),
        }
    }

    /// Run one update. Deferred messages stay queued.
    pub fn send(&mut self, msg: Message<G::Date, N>) {
        let cmd = self.picker.update(msg);
        self.collect(cmd);
    }

    /// Deliver queued messages until none are left.
    pub fn drain(&mut self) {
        while !self.pending.is_empty() {
            let messages: Vec<_> = self.pending.drain(..).collect();
            for msg in messages {
                let cmd = self.picker.update(msg);
                self.collect(cmd);
            }
        }
    }

    pub fn picker(&self) -> &Picker<G, N> {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut Picker<G, N> {
        &mut self.picker
    }

    /// Every notification so far, oldest first.
    pub fn emitted(&self) -> &[Message<G::Date, N>] {
        &self.emitted
    }

    pub fn clear_emitted(&mut self) {
        self.emitted.clear();
    }

    /// Payloads of every `Changed` notification.
    pub fn changes(&self) -> Vec<([Option<G::Date>; N], [String; N])> {
        self.emitted
            .iter()
            .filter_map(|msg| match msg {
                Message::Changed { value, text } => Some((value.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Payloads of every `CalendarChanged` notification.
    pub fn calendar_changes(&self) -> Vec<[Option<G::Date>; N]> {
        self.emitted
            .iter()
            .filter_map(|msg| match msg {
                Message::CalendarChanged { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    fn collect(&mut self, cmd: Command<Message<G::Date, N>>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                if msg.is_notification() {
                    self.emitted.push(msg);
                } else {
                    self.pending.push(msg);
                }
            }
            CommandInner::Action(Action::Quit) => {}
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}
