/// A side effect returned from [`Picker::update`](crate::Picker::update).
///
/// The picker engine never calls back into the host. Everything it wants to
/// happen after the current message is described by a `Command`: emitted
/// notifications, deferred follow-up messages (the settle tick of the blur
/// lock), or a request to quit the host program.
///
/// Messages inside a command are delivered *after* the update that produced
/// them returns, in order. A host that feeds them back through its event
/// queue gets the "next tick" semantics the engine relies on.
///
/// # Examples
///
/// ```rust
/// use datepick_core::Command;
///
/// let cmd: Command<u8> = Command::sequence([Command::message(1), Command::message(2)]);
/// assert_eq!(cmd.into_messages(), vec![1, 2]);
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Batch(Vec<Command<Msg>>),
    Sequence(Vec<Command<Msg>>),
}

/// Synchronous actions carried by a [`Command`].
pub enum Action<Msg> {
    /// Deliver a message on the next turn of the host loop.
    Message(Msg),
    /// Ask the host program to exit.
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Deliver a message after the current update.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Quit the host program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// Group commands with no ordering promise between them.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Group commands whose messages must be delivered in order.
    pub fn sequence(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Sequence(cmds),
            },
        }
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(std::sync::Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: std::sync::Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Action(Action::Message(msg)) => Command::message(f(msg)),
            CommandInner::Action(Action::Quit) => Command::quit(),
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(f.clone()))
                        .collect(),
                ),
            },
            CommandInner::Sequence(cmds) => Command {
                inner: CommandInner::Sequence(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(f.clone()))
                        .collect(),
                ),
            },
        }
    }

    /// Flatten the command into the actions it carries, in delivery order.
    pub fn into_actions(self) -> Vec<Action<Msg>> {
        let mut out = Vec::new();
        self.collect_actions(&mut out);
        out
    }

    fn collect_actions(self, out: &mut Vec<Action<Msg>>) {
        match self.inner {
            CommandInner::None => {}
            CommandInner::Action(action) => out.push(action),
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    cmd.collect_actions(out);
                }
            }
        }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// Returns `true` if this command, or any command nested in it, asks to quit.
    pub fn is_quit(&self) -> bool {
        match &self.inner {
            CommandInner::Action(Action::Quit) => true,
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                cmds.iter().any(Command::is_quit)
            }
            _ => false,
        }
    }

    /// If this command is a single message action, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// Every message carried by this command, in delivery order.
    pub fn into_messages(self) -> Vec<Msg> {
        self.into_actions()
            .into_iter()
            .filter_map(|action| match action {
                Action::Message(msg) => Some(msg),
                Action::Quit => None,
            })
            .collect()
    }
}

impl<Msg: Send + 'static> Default for Command<Msg> {
    fn default() -> Self {
        Command::none()
    }
}
