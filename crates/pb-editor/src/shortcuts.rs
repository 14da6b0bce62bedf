//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s, which
//! [`Editor::run_shortcut`](crate::Editor::run_shortcut) turns into edits on
//! the current selection. Keeping the table here lets every front end share
//! one set of bindings.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── History ──
    Undo,
    Redo,

    // ── Edit ──
    Delete,
    Duplicate,
    Copy,
    Cut,
    Paste,
    CopyStyle,
    PasteStyle,
    /// Swap the selection with its previous sibling.
    MoveUp,
    /// Swap the selection with its next sibling.
    MoveDown,

    // ── View ──
    ShowDesktop,
    ShowTablet,
    ShowMobile,

    // ── UI ──
    Deselect,
}

/// Modifier state of a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// The platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn cmd() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    fn is_cmd(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, mods: Modifiers) -> Option<ShortcutAction> {
        let cmd = mods.is_cmd();

        // ── Modifier combos first (most specific) ──
        if cmd && mods.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd && mods.alt {
            return match key {
                "c" | "C" | "ç" => Some(ShortcutAction::CopyStyle),
                "v" | "V" | "√" => Some(ShortcutAction::PasteStyle),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "1" => Some(ShortcutAction::ShowDesktop),
                "2" => Some(ShortcutAction::ShowTablet),
                "3" => Some(ShortcutAction::ShowMobile),
                _ => None,
            };
        }

        if mods.alt {
            return match key {
                "ArrowUp" => Some(ShortcutAction::MoveUp),
                "ArrowDown" => Some(ShortcutAction::MoveDown),
                _ => None,
            };
        }

        if mods.shift {
            return None;
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
