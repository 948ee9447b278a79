//! Key bindings for the picker and the help line built from them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    pub keys: Vec<KeyCombination>,
    /// Short label shown in the help line, e.g. `"enter"`.
    pub label: String,
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with the modifiers that must be held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Binding {
    pub fn new(key: KeyCombination, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_keys(vec![key], label, description)
    }

    pub fn with_keys(
        keys: Vec<KeyCombination>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            keys,
            label: label.into(),
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` is one of this binding's combinations with exactly
    /// the listed modifiers. Shift is ignored for character keys since the
    /// character already carries it.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        let modifiers = match event.code {
            KeyCode::Char(_) => event.modifiers.difference(KeyModifiers::SHIFT),
            _ => event.modifiers,
        };
        self.keys
            .iter()
            .any(|k| k.code == event.code && k.modifiers == modifiers)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl KeyCombination {
    pub fn new(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::CONTROL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::ALT)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::SHIFT)
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Types that can describe their bindings for a help line.
pub trait KeyMap {
    /// The most important bindings, in display order.
    fn short_help(&self) -> Vec<&Binding>;

    /// `label description` pairs joined for a one-line hint.
    fn help_line(&self) -> String {
        self.short_help()
            .iter()
            .filter(|b| b.enabled)
            .map(|b| format!("{} {}", b.label, b.description))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Every key the [`DatePicker`](crate::picker::DatePicker) reacts to.
#[derive(Debug, Clone)]
pub struct PickerKeyMap {
    pub next_field: Binding,
    pub prev_field: Binding,
    pub submit: Binding,
    pub cancel: Binding,
    pub select: Binding,
    pub up: Binding,
    pub down: Binding,
    pub left: Binding,
    pub right: Binding,
    pub prev_page: Binding,
    pub next_page: Binding,
    pub prev_super_page: Binding,
    pub next_super_page: Binding,
    pub coarser_mode: Binding,
    /// Move keyboard focus between the calendar and the time columns.
    pub next_column: Binding,
    pub prev_column: Binding,
    pub now: Binding,
    pub confirm: Binding,
    pub clear: Binding,
    pub backspace: Binding,
}

impl Default for PickerKeyMap {
    fn default() -> Self {
        use KeyCode::*;
        Self {
            next_field: Binding::new(KeyCombination::new(Tab), "tab", "next field"),
            prev_field: Binding::with_keys(
                vec![KeyCombination::new(BackTab), KeyCombination::shift(BackTab)],
                "shift+tab",
                "previous field",
            ),
            submit: Binding::new(KeyCombination::new(Enter), "enter", "confirm"),
            cancel: Binding::new(KeyCombination::new(Esc), "esc", "cancel"),
            select: Binding::new(KeyCombination::new(Char(' ')), "space", "pick"),
            up: Binding::new(KeyCombination::new(Up), "↑", "up"),
            down: Binding::new(KeyCombination::new(Down), "↓", "down"),
            left: Binding::new(KeyCombination::new(Left), "←", "left"),
            right: Binding::new(KeyCombination::new(Right), "→", "right"),
            prev_page: Binding::new(KeyCombination::new(PageUp), "pgup", "previous page"),
            next_page: Binding::new(KeyCombination::new(PageDown), "pgdn", "next page"),
            prev_super_page: Binding::new(KeyCombination::shift(PageUp), "shift+pgup", "previous year"),
            next_super_page: Binding::new(KeyCombination::shift(PageDown), "shift+pgdn", "next year"),
            coarser_mode: Binding::new(KeyCombination::ctrl(Up), "ctrl+↑", "zoom out"),
            next_column: Binding::new(KeyCombination::alt(Right), "alt+→", "next column"),
            prev_column: Binding::new(KeyCombination::alt(Left), "alt+←", "previous column"),
            now: Binding::new(KeyCombination::ctrl(Char('n')), "ctrl+n", "now"),
            confirm: Binding::new(KeyCombination::ctrl(Char('o')), "ctrl+o", "ok"),
            clear: Binding::new(KeyCombination::new(Delete), "del", "clear"),
            backspace: Binding::new(KeyCombination::new(Backspace), "⌫", "delete"),
        }
    }
}

impl KeyMap for PickerKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.next_field,
            &self.select,
            &self.submit,
            &self.cancel,
            &self.coarser_mode,
        ]
    }
}
