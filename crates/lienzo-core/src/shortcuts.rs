//! Keyboard shortcuts: mapping key presses to editor commands.

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// A printable character key, lowercased.
    Char(char),
}

impl Key {
    /// Parse a DOM-style key name (`"Delete"`, `"ArrowUp"`, `"z"`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Delete" => Some(Key::Delete),
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" => Some(Key::Escape),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c.to_ascii_lowercase())),
                    _ => None,
                }
            }
        }
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl_shift() -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press as delivered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    /// A text field has focus; shortcuts are suppressed.
    pub text_focus: bool,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            text_focus: false,
        }
    }

    pub fn with_text_focus(mut self, text_focus: bool) -> Self {
        self.text_focus = text_focus;
        self
    }
}

/// Editor action bound to a shortcut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    DeleteSelected,
    Undo,
    Redo,
    Copy,
    Paste,
    Duplicate,
    Deselect,
    /// Move the selection by the given number of steps on each axis.
    Nudge { dx: f64, dy: f64 },
}

/// Resolve a key press to a command.
///
/// `small_step` and `large_step` are the arrow-key nudge distances without and with Shift.
pub fn command_for(input: &KeyInput, small_step: f64, large_step: f64) -> Option<EditorCommand> {
    if input.text_focus {
        return None;
    }
    let mods = input.modifiers;
    let step = if mods.shift { large_step } else { small_step };

    match input.key {
        Key::Delete | Key::Backspace => Some(EditorCommand::DeleteSelected),
        Key::Escape => Some(EditorCommand::Deselect),
        Key::ArrowLeft => Some(EditorCommand::Nudge { dx: -step, dy: 0.0 }),
        Key::ArrowRight => Some(EditorCommand::Nudge { dx: step, dy: 0.0 }),
        Key::ArrowUp => Some(EditorCommand::Nudge { dx: 0.0, dy: -step }),
        Key::ArrowDown => Some(EditorCommand::Nudge { dx: 0.0, dy: step }),
        Key::Char(c) if mods.command() => match (c, mods.shift) {
            ('z', false) => Some(EditorCommand::Undo),
            ('z', true) | ('y', _) => Some(EditorCommand::Redo),
            ('c', false) => Some(EditorCommand::Copy),
            ('v', false) => Some(EditorCommand::Paste),
            ('d', false) => Some(EditorCommand::Duplicate),
            _ => None,
        },
        Key::Char(_) => None,
    }
}
