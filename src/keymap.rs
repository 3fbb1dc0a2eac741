//! Keyboard chord to counter action mapping
//!
//! - `ArrowUp` / `+` increment
//! - `ArrowDown` / `-` decrement
//! - `Ctrl+R` / `Cmd+R` reset (and suppress the browser reload)

/// A key press, independent of where it came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    /// DOM `KeyboardEvent.key` value
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Platform "command" modifier (Ctrl, or Cmd on macOS)
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Parse a chord like `ArrowUp`, `+`, `Ctrl+R` or `Meta++`
    pub fn parse_chord(chord: &str) -> Option<Self> {
        let chord = chord.trim();
        if chord.is_empty() {
            return None;
        }

        let (mods, key) = if chord == "+" {
            ("", "+")
        } else if let Some(mods) = chord.strip_suffix("++") {
            (mods, "+")
        } else {
            chord.rsplit_once('+').unwrap_or(("", chord))
        };
        if key.is_empty() {
            return None;
        }

        let mut input = KeyInput::new(match key.to_lowercase().as_str() {
            "up" => "ArrowUp",
            "down" => "ArrowDown",
            _ => key,
        });

        if !mods.is_empty() {
            for modifier in mods.split('+') {
                match modifier.trim().to_lowercase().as_str() {
                    "ctrl" | "control" => input.ctrl = true,
                    "meta" | "cmd" | "command" | "super" => input.meta = true,
                    "alt" | "option" => input.alt = true,
                    "shift" => input.shift = true,
                    _ => return None,
                }
            }
        }

        Some(input)
    }
}

/// Counter operation a key press maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Increment,
    Decrement,
    Reset,
}

impl KeyAction {
    pub fn from_input(input: &KeyInput) -> Option<Self> {
        match input.key.as_str() {
            "ArrowUp" | "+" => Some(KeyAction::Increment),
            "ArrowDown" | "-" => Some(KeyAction::Decrement),
            "r" | "R" if input.command() => Some(KeyAction::Reset),
            _ => None,
        }
    }

    /// Whether the host's default handling of the key must be suppressed
    pub fn prevents_default(&self) -> bool {
        matches!(self, KeyAction::Reset)
    }
}

/// What a key handler did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not ours; pass the event through untouched
    Ignored,
    Handled { prevent_default: bool },
}

impl KeyOutcome {
    pub fn handled(action: KeyAction) -> Self {
        KeyOutcome::Handled {
            prevent_default: action.prevents_default(),
        }
    }

    pub fn prevent_default(&self) -> bool {
        matches!(
            self,
            KeyOutcome::Handled {
                prevent_default: true
            }
        )
    }

    /// Combine outcomes from several listeners of the same event
    pub fn merge(self, other: KeyOutcome) -> KeyOutcome {
        match (self, other) {
            (KeyOutcome::Ignored, o) | (o, KeyOutcome::Ignored) => o,
            (
                KeyOutcome::Handled { prevent_default: a },
                KeyOutcome::Handled { prevent_default: b },
            ) => KeyOutcome::Handled {
                prevent_default: a || b,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_sign_keys() {
        assert_eq!(
            KeyAction::from_input(&KeyInput::new("ArrowUp")),
            Some(KeyAction::Increment)
        );
        assert_eq!(KeyAction::from_input(&KeyInput::new("+")), Some(KeyAction::Increment));
        assert_eq!(
            KeyAction::from_input(&KeyInput::new("ArrowDown")),
            Some(KeyAction::Decrement)
        );
        assert_eq!(KeyAction::from_input(&KeyInput::new("-")), Some(KeyAction::Decrement));
    }

    #[test]
    fn test_reset_needs_command_modifier() {
        assert_eq!(KeyAction::from_input(&KeyInput::new("r")), None);
        assert_eq!(KeyAction::from_input(&KeyInput::new("R")), None);
        assert_eq!(
            KeyAction::from_input(&KeyInput::new("r").with_ctrl()),
            Some(KeyAction::Reset)
        );
        assert_eq!(
            KeyAction::from_input(&KeyInput::new("R").with_meta()),
            Some(KeyAction::Reset)
        );

        let mut alt_r = KeyInput::new("r");
        alt_r.alt = true;
        assert_eq!(KeyAction::from_input(&alt_r), None);
    }

    #[test]
    fn test_only_reset_prevents_default() {
        assert!(KeyAction::Reset.prevents_default());
        assert!(!KeyAction::Increment.prevents_default());
        assert!(!KeyAction::Decrement.prevents_default());
    }

    #[test]
    fn test_other_keys_ignored() {
        for key in ["a", "Enter", "=", " ", "ArrowLeft", "Escape"] {
            assert_eq!(KeyAction::from_input(&KeyInput::new(key)), None, "key {key:?}");
        }
    }

    #[test]
    fn test_parse_chord() {
        assert_eq!(KeyInput::parse_chord("ArrowUp"), Some(KeyInput::new("ArrowUp")));
        assert_eq!(KeyInput::parse_chord("up"), Some(KeyInput::new("ArrowUp")));
        assert_eq!(KeyInput::parse_chord(" + "), Some(KeyInput::new("+")));
        assert_eq!(KeyInput::parse_chord("-"), Some(KeyInput::new("-")));
        assert_eq!(
            KeyInput::parse_chord("Ctrl+R"),
            Some(KeyInput::new("R").with_ctrl())
        );
        assert_eq!(
            KeyInput::parse_chord("cmd+r"),
            Some(KeyInput::new("r").with_meta())
        );
        assert_eq!(
            KeyInput::parse_chord("Ctrl++"),
            Some(KeyInput::new("+").with_ctrl())
        );
        assert_eq!(KeyInput::parse_chord(""), None);
        assert_eq!(KeyInput::parse_chord("Hyper+R"), None);
    }

    #[test]
    fn test_outcome_merge() {
        let reset = KeyOutcome::handled(KeyAction::Reset);
        let inc = KeyOutcome::handled(KeyAction::Increment);
        assert_eq!(KeyOutcome::Ignored.merge(KeyOutcome::Ignored), KeyOutcome::Ignored);
        assert_eq!(KeyOutcome::Ignored.merge(inc), inc);
        assert!(inc.merge(reset).prevent_default());
        assert!(!inc.prevent_default());
    }
}
