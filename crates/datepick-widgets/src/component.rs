use datepick_core::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// A parent decides *where* each child renders by passing it a sub-region
/// of the frame, and lifts the child's commands into its own message type
/// with [`Command::map`]:
///
/// ```rust,ignore
/// enum AppMsg { Picker(date_picker::Message<NaiveDateTime, 2>) }
///
/// fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///     match msg {
///         AppMsg::Picker(m) => self.picker.update(m).map(AppMsg::Picker),
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for
    /// follow-up messages.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Overlays such as a popup may extend below it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently wants keyboard input.
    fn focused(&self) -> bool {
        false
    }
}
