//! Host-independent input event types.

use serde::{Deserialize, Serialize};

/// Generic key representation.
///
/// Hosts map their native key codes to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Space bar
    Space,
    /// Escape key
    Escape,
    /// Return/Enter key
    Return,
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Parses a key name as written in keybinding config and replay scripts.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "space" | " " => Self::Space,
            "escape" | "esc" => Self::Escape,
            "return" | "enter" => Self::Return,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Unknown,
                }
            }
        }
    }

    /// Lowercase name used for keybinding lookups.
    pub fn binding_name(&self) -> Option<String> {
        match self {
            Self::Char(c) => Some(c.to_lowercase().collect()),
            Self::Space => Some("space".to_string()),
            Self::Escape => Some("escape".to_string()),
            Self::Return => Some("return".to_string()),
            Self::Unknown => None,
        }
    }
}

/// Modifier keys held while a key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Primary button (draws)
    Left,
    /// Secondary button (erases for the duration of the press)
    Right,
    /// Middle button (ignored)
    Middle,
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Host-assigned identifier, stable for the lifetime of the contact.
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_parse() {
        assert_eq!(Key::from_name("Space"), Key::Space);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("S"), Key::Char('s'));
        assert_eq!(Key::from_name("esc"), Key::Escape);
        assert_eq!(Key::from_name("F13"), Key::Unknown);
    }

    #[test]
    fn binding_names_are_lowercase() {
        assert_eq!(Key::Char('E').binding_name().as_deref(), Some("e"));
        assert_eq!(Key::Space.binding_name().as_deref(), Some("space"));
        assert_eq!(Key::Unknown.binding_name(), None);
    }
}
