//! Keybinding configuration types and parsing.
//!
//! Each action accepts a list of bindings such as `"S"`, `"Space"` or
//! `"Ctrl+S"`. Keys are matched case-insensitively.

use crate::input::{Key, Modifiers};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ClearCanvas,
    SaveImage,
    ToggleEraser,
    ToggleHelp,
}

/// A single keybinding: a key name with optional modifiers.
///
/// The key is stored lowercase so bindings hash the same regardless of how
/// they were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parses strings like `"Ctrl+Shift+S"`, `"Space"` or `"e"`.
    ///
    /// Modifiers may appear in any order and spaces around `+` are allowed.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into trailing empty parts; the key itself is '+'.
        let key = key_parts.join("+");
        let key = if key.is_empty() { "+".to_string() } else { key };

        if Key::from_name(&key) == Key::Unknown {
            return Err(format!("Unknown key '{}' in: {}", key, s));
        }

        Ok(Self {
            key: key.to_lowercase(),
            ctrl,
            shift,
            alt,
        })
    }

    /// Builds the lookup binding for a pressed key.
    pub fn for_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        Some(Self {
            key: key.binding_name()?,
            ctrl: modifiers.ctrl,
            shift: modifiers.shift,
            alt: modifiers.alt,
        })
    }
}

/// Configuration for all keybindings.
///
/// ```toml
/// [keybindings]
/// clear_canvas = ["Space"]
/// save_image = ["S", "Ctrl+S"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: Vec<String>,

    #[serde(default = "default_save_image")]
    pub save_image: Vec<String>,

    #[serde(default = "default_toggle_eraser")]
    pub toggle_eraser: Vec<String>,

    #[serde(default = "default_toggle_help")]
    pub toggle_help: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            clear_canvas: default_clear_canvas(),
            save_image: default_save_image(),
            toggle_eraser: default_toggle_eraser(),
            toggle_help: default_toggle_help(),
        }
    }
}

impl KeybindingsConfig {
    /// Builds a lookup map from keybindings to actions.
    ///
    /// Returns an error if any binding is invalid or bound to two actions.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let groups = [
            (&self.clear_canvas, Action::ClearCanvas),
            (&self.save_image, Action::SaveImage),
            (&self.toggle_eraser, Action::ToggleEraser),
            (&self.toggle_help, Action::ToggleHelp),
        ];

        for (bindings, action) in groups {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

/// Resolves a key press against an action map.
///
/// A shifted character falls back to its unshifted binding, so `S` and `s`
/// both trigger a binding written as `"S"`.
pub fn lookup_action(
    map: &HashMap<KeyBinding, Action>,
    key: Key,
    modifiers: Modifiers,
) -> Option<Action> {
    let binding = KeyBinding::for_key(key, modifiers)?;
    if let Some(action) = map.get(&binding) {
        return Some(*action);
    }

    if modifiers.shift && matches!(key, Key::Char(_)) {
        let unshifted = KeyBinding {
            shift: false,
            ..binding
        };
        return map.get(&unshifted).copied();
    }

    None
}

fn default_clear_canvas() -> Vec<String> {
    vec!["Space".to_string()]
}

fn default_save_image() -> Vec<String> {
    vec!["S".to_string()]
}

fn default_toggle_eraser() -> Vec<String> {
    vec!["E".to_string()]
}

fn default_toggle_help() -> Vec<String> {
    vec!["H".to_string()]
}
