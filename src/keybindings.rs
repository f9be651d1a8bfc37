//! Keybinding registry: maps key events to actions per view, with config
//! overrides from the `[keybindings]` table.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

use crate::news::CATEGORIES;

// ============================================================================
// Action Enum
// ============================================================================

/// Every user-facing action a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Open,
    Back,
    NextCategory,
    PrevCategory,
    /// Select the category at this zero-based catalog position.
    JumpToCategory(u8),
    ToggleSave,
    ToggleReaderMode,
    OpenSource,
    Retry,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ToggleTheme,
    ShowHelp,
}

impl Action {
    /// Description for the help overlay.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Next article",
            Self::NavUp => "Previous article",
            Self::Open => "Open article",
            Self::Back => "Back to list",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::JumpToCategory(_) => "Jump to category",
            Self::ToggleSave => "Save / unsave article",
            Self::ToggleReaderMode => "Toggle reader mode",
            Self::OpenSource => "Open source in browser",
            Self::Retry => "Retry failed fetch",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ToggleTheme => "Toggle light/dark theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. View-specific bindings win over `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    List,
    Detail,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::List => "Article list",
            Self::Detail => "Article detail",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Drop SHIFT where it is already encoded in the key code, so `T` and
    /// Shift+Tab match the plain bindings regardless of terminal.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => {
                Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT))
            }
            _ => self,
        }
    }
}

const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    (Context::Global, KeySpec::char('q'), Action::Quit),
    (Context::Global, KeySpec::char('?'), Action::ShowHelp),
    (Context::Global, KeySpec::char('T'), Action::ToggleTheme),
    (Context::Global, KeySpec::plain(KeyCode::Tab), Action::NextCategory),
    (Context::Global, KeySpec::char('l'), Action::NextCategory),
    (Context::Global, KeySpec::plain(KeyCode::Right), Action::NextCategory),
    (Context::Global, KeySpec::plain(KeyCode::BackTab), Action::PrevCategory),
    (Context::Global, KeySpec::char('h'), Action::PrevCategory),
    (Context::Global, KeySpec::plain(KeyCode::Left), Action::PrevCategory),
    (Context::Global, KeySpec::char('1'), Action::JumpToCategory(0)),
    (Context::Global, KeySpec::char('2'), Action::JumpToCategory(1)),
    (Context::Global, KeySpec::char('3'), Action::JumpToCategory(2)),
    (Context::Global, KeySpec::char('4'), Action::JumpToCategory(3)),
    (Context::Global, KeySpec::char('5'), Action::JumpToCategory(4)),
    (Context::Global, KeySpec::char('6'), Action::JumpToCategory(5)),
    (Context::Global, KeySpec::char('s'), Action::ToggleSave),
    (Context::Global, KeySpec::char('o'), Action::OpenSource),
    // List view
    (Context::List, KeySpec::char('j'), Action::NavDown),
    (Context::List, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::List, KeySpec::char('k'), Action::NavUp),
    (Context::List, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::List, KeySpec::plain(KeyCode::Enter), Action::Open),
    (Context::List, KeySpec::char('R'), Action::Retry),
    // Detail view
    (Context::Detail, KeySpec::char('j'), Action::ScrollDown),
    (Context::Detail, KeySpec::plain(KeyCode::Down), Action::ScrollDown),
    (Context::Detail, KeySpec::char('k'), Action::ScrollUp),
    (Context::Detail, KeySpec::plain(KeyCode::Up), Action::ScrollUp),
    (Context::Detail, KeySpec::ctrl('d'), Action::PageDown),
    (Context::Detail, KeySpec::ctrl('u'), Action::PageUp),
    (Context::Detail, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Detail, KeySpec::char('b'), Action::Back),
    (Context::Detail, KeySpec::char('r'), Action::ToggleReaderMode),
];

/// Parse a key string from config.
///
/// Accepts a single character ("q", "/"), a named key ("Enter", "Esc",
/// "Tab", "BackTab", arrows, "Backspace", "Space"), "Ctrl+<char>", or
/// "F1" to "F12".
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" | "shift+tab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix('F')
        .or_else(|| s.strip_prefix('f'))
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::char(c)),
        _ => None,
    }
}

/// Human-readable key name for the help overlay.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, name)
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.to_lowercase();
    if let Some(n) = name
        .strip_prefix("jump_")
        .or_else(|| name.strip_prefix("category_"))
        .and_then(|d| d.parse::<usize>().ok())
    {
        return (1..=CATEGORIES.len())
            .contains(&n)
            .then(|| Action::JumpToCategory((n - 1) as u8));
    }

    match name.as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "open" | "select" | "enter" => Some(Action::Open),
        "back" => Some(Action::Back),
        "next_category" => Some(Action::NextCategory),
        "prev_category" | "previous_category" => Some(Action::PrevCategory),
        "toggle_save" | "save" => Some(Action::ToggleSave),
        "toggle_reader_mode" | "reader_mode" | "reader" => Some(Action::ToggleReaderMode),
        "open_source" | "open_in_browser" => Some(Action::OpenSource),
        "retry" => Some(Action::Retry),
        "scroll_down" => Some(Action::ScrollDown),
        "scroll_up" => Some(Action::ScrollUp),
        "page_down" => Some(Action::PageDown),
        "page_up" => Some(Action::PageUp),
        "toggle_theme" | "theme" => Some(Action::ToggleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings: defaults plus config overrides.
///
/// The same key can mean different things in different contexts; lookups
/// try the view context first and then fall back to `Global`.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Registration order, for the help overlay.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.bindings
            .retain(|(c, k, _)| !(*c == context && *k == key));
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    /// Apply overrides from the config `[keybindings]` table.
    ///
    /// Keys are action names ("toggle_save", "jump_3"), values are key
    /// strings ("b", "Ctrl+s", "F5"). The new key replaces every default key
    /// of that action, in the same contexts. Returns one warning per entry
    /// that could not be applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted so the outcome does not depend on HashMap order.
        let mut entries: Vec<(&String, &String)> = overrides.iter().collect();
        entries.sort();

        for (action_name, key_str) in entries {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Action bound to a key in `context`, falling back to `Global`.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();

        self.lookup.get(&(context, key)).copied().or_else(|| {
            (context != Context::Global)
                .then(|| self.lookup.get(&(Context::Global, key)).copied())
                .flatten()
        })
    }

    /// First key bound to `action`, formatted, for status-bar hints.
    pub fn key_for(&self, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(_, _, a)| *a == action)
            .map(|(_, k, _)| format_key(k))
    }

    /// All bindings as (context, key, action, description), in registration order.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
