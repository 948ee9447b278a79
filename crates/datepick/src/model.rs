use crossterm::event::Event;
use datepick_core::Command;
use ratatui::Frame;

/// An application driven by [`Program`](crate::Program).
///
/// The runtime calls [`init`](Model::init) once, hands every terminal event
/// to [`event`](Model::event), feeds the resulting messages (and every
/// message a [`Command`] produces) through [`update`](Model::update), and
/// redraws with [`view`](Model::view).
pub trait Model: Sized + Send + 'static {
    type Message: Send + 'static;

    /// Data handed to [`init`](Model::init).
    type Flags: Send + 'static;

    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    fn view(&self, frame: &mut Frame);

    /// Map a terminal event to a message. `None` drops it.
    fn event(&self, event: Event) -> Option<Self::Message>;
}
