//! Type-safe key bindings used for keyboard navigation between tabs.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A single key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key itself.
    pub code: KeyCode,
    /// Modifiers that must be held.
    pub modifiers: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self { code, modifiers }
    }
}

/// Short help text for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// The key as shown to the user, e.g. `→/l`.
    pub key: String,
    /// What the key does.
    pub desc: String,
}

/// A set of key presses that trigger the same action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding from anything convertible to [`KeyPress`].
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            disabled: false,
        }
    }

    /// Attaches help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// The key presses of this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// The help text of this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding responds to key presses.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Reports whether `msg` is one of this binding's key presses.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled()
            && self
                .keys
                .iter()
                .any(|k| k.code == msg.key && k.modifiers == msg.modifiers)
    }
}

/// Components expose their bindings through this trait for help rendering.
pub trait KeyMap {
    /// Bindings shown in the compact help view.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings shown in the expanded help view, grouped in columns.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Reports whether `msg` matches any of `bindings`.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers,
        }
    }

    #[test]
    fn test_binding_matches_exact_modifiers() {
        let next = Binding::new(vec![KeyCode::Right, KeyCode::Char('l')]);
        assert!(next.matches(&press(KeyCode::Right, KeyModifiers::NONE)));
        assert!(next.matches(&press(KeyCode::Char('l'), KeyModifiers::NONE)));
        assert!(!next.matches(&press(KeyCode::Right, KeyModifiers::CONTROL)));
        assert!(!next.matches(&press(KeyCode::Left, KeyModifiers::NONE)));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = Binding::new(vec![(KeyCode::Tab, KeyModifiers::NONE)]);
        b.set_enabled(false);
        assert!(!b.enabled());
        assert!(!b.matches(&press(KeyCode::Tab, KeyModifiers::NONE)));

        let empty = Binding::new(Vec::<KeyCode>::new());
        assert!(!empty.enabled());
    }

    #[test]
    fn test_matches_any() {
        let a = Binding::new(vec![KeyCode::Left]);
        let b = Binding::new(vec![KeyCode::Right]).with_help("→", "next");
        assert!(matches(&press(KeyCode::Right, KeyModifiers::NONE), &[&a, &b]));
        assert_eq!(b.help().desc, "next");
    }
}
