use std::fmt;

use enigo::Key as EnigoKey;

/// A key that can be emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Unicode(char),
    Control,
    Meta,
    Shift,
    Alt,
    Home,
    End,
    PageUp,
    PageDown,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    Delete,
    Backspace,
    Escape,
    Tab,
    Space,
    Return,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl From<Key> for EnigoKey {
    fn from(key: Key) -> Self {
        key.to_enigo()
    }
}

impl From<&Key> for EnigoKey {
    fn from(key: &Key) -> Self {
        key.to_enigo()
    }
}

impl Key {
    pub fn to_enigo(&self) -> EnigoKey {
        match self {
            Key::Unicode(ch) => EnigoKey::Unicode(*ch),
            Key::Control => EnigoKey::Control,
            Key::Meta => EnigoKey::Meta,
            Key::Shift => EnigoKey::Shift,
            Key::Alt => EnigoKey::Alt,
            Key::Home => EnigoKey::Home,
            Key::End => EnigoKey::End,
            Key::PageUp => EnigoKey::PageUp,
            Key::PageDown => EnigoKey::PageDown,
            Key::UpArrow => EnigoKey::UpArrow,
            Key::DownArrow => EnigoKey::DownArrow,
            Key::LeftArrow => EnigoKey::LeftArrow,
            Key::RightArrow => EnigoKey::RightArrow,
            Key::Delete => EnigoKey::Delete,
            Key::Backspace => EnigoKey::Backspace,
            Key::Escape => EnigoKey::Escape,
            Key::Tab => EnigoKey::Tab,
            Key::Space => EnigoKey::Space,
            Key::Return => EnigoKey::Return,
            Key::F1 => EnigoKey::F1,
            Key::F2 => EnigoKey::F2,
            Key::F3 => EnigoKey::F3,
            Key::F4 => EnigoKey::F4,
            Key::F5 => EnigoKey::F5,
            Key::F6 => EnigoKey::F6,
            Key::F7 => EnigoKey::F7,
            Key::F8 => EnigoKey::F8,
            Key::F9 => EnigoKey::F9,
            Key::F10 => EnigoKey::F10,
            Key::F11 => EnigoKey::F11,
            Key::F12 => EnigoKey::F12,
        }
    }
}

impl fmt::Display for Key {
    /// Writes the name the combo parser reads back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::Unicode(ch) => return write!(f, "{ch}"),
            Key::Control => "ctrl",
            Key::Meta => "meta",
            Key::Shift => "shift",
            Key::Alt => "alt",
            Key::Home => "home",
            Key::End => "end",
            Key::PageUp => "page_up",
            Key::PageDown => "page_down",
            Key::UpArrow => "up",
            Key::DownArrow => "down",
            Key::LeftArrow => "left",
            Key::RightArrow => "right",
            Key::Delete => "delete",
            Key::Backspace => "backspace",
            Key::Escape => "escape",
            Key::Tab => "tab",
            Key::Space => "space",
            Key::Return => "enter",
            Key::F1 => "f1",
            Key::F2 => "f2",
            Key::F3 => "f3",
            Key::F4 => "f4",
            Key::F5 => "f5",
            Key::F6 => "f6",
            Key::F7 => "f7",
            Key::F8 => "f8",
            Key::F9 => "f9",
            Key::F10 => "f10",
            Key::F11 => "f11",
            Key::F12 => "f12",
        };
        f.write_str(name)
    }
}

/// Parse a key name as written in the settings file.
///
/// Single lowercase characters become `Key::Unicode`, everything else is
/// matched against the named keys and their aliases.
pub(crate) fn parse_key(input: &str) -> Option<Key> {
    let mut chars = input.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            return Some(Key::Unicode(ch));
        }
    }

    match input {
        // Modifiers
        "ctrl" | "control" => Some(Key::Control),
        "meta" | "super" | "win" | "cmd" => Some(Key::Meta),
        "shift" => Some(Key::Shift),
        "alt" | "option" => Some(Key::Alt),

        // Navigation
        "home" => Some(Key::Home),
        "end" => Some(Key::End),
        "page_up" => Some(Key::PageUp),
        "page_down" => Some(Key::PageDown),
        "arrow_up" | "up" => Some(Key::UpArrow),
        "arrow_down" | "down" => Some(Key::DownArrow),
        "arrow_left" | "left" => Some(Key::LeftArrow),
        "arrow_right" | "right" => Some(Key::RightArrow),

        // Actions
        "delete" => Some(Key::Delete),
        "backspace" => Some(Key::Backspace),
        "escape" | "esc" => Some(Key::Escape),
        "tab" => Some(Key::Tab),
        "space" | "spacebar" => Some(Key::Space),
        "enter" | "return" => Some(Key::Return),

        "f1" => Some(Key::F1),
        "f2" => Some(Key::F2),
        "f3" => Some(Key::F3),
        "f4" => Some(Key::F4),
        "f5" => Some(Key::F5),
        "f6" => Some(Key::F6),
        "f7" => Some(Key::F7),
        "f8" => Some(Key::F8),
        "f9" => Some(Key::F9),
        "f10" => Some(Key::F10),
        "f11" => Some(Key::F11),
        "f12" => Some(Key::F12),
        _ => None,
    }
}
