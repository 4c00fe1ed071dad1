//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings only apply in normal mode. While the query is being edited every
//! printable key goes into the input, so that mode is handled directly by the
//! event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Focus the query input.
    StartEditing,
    /// Submit the current query.
    SubmitSearch,
    /// Empty the query input and focus it.
    ClearInput,
    /// Expand or collapse the selected user's repositories.
    ToggleExpand,
    MoveUp,
    MoveDown,
    /// Scroll the expanded repository list.
    ScrollReposUp,
    ScrollReposDown,
    /// Fetch the selected user's repositories again.
    RefreshRepos,
    /// Show the key reference overlay.
    OpenHelp,
    Ignore,
}

/// Action names as they appear in `keybinds.conf`.
const ACTION_NAMES: &[(KeyAction, &str)] = &[
    (KeyAction::Quit, "Quit"),
    (KeyAction::StartEditing, "StartEditing"),
    (KeyAction::SubmitSearch, "SubmitSearch"),
    (KeyAction::ClearInput, "ClearInput"),
    (KeyAction::ToggleExpand, "ToggleExpand"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::ScrollReposUp, "ScrollReposUp"),
    (KeyAction::ScrollReposDown, "ScrollReposDown"),
    (KeyAction::RefreshRepos, "RefreshRepos"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::Ignore, "Ignore"),
];

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style `j`/`k`, `/` to type, Enter/Space to expand.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartEditing);
        bindings.insert((M::NONE, Char('i')), KeyAction::StartEditing);
        bindings.insert((M::NONE, Char('s')), KeyAction::SubmitSearch);
        bindings.insert((M::NONE, Char('c')), KeyAction::ClearInput);
        bindings.insert((M::NONE, Enter), KeyAction::ToggleExpand);
        bindings.insert((M::NONE, Char(' ')), KeyAction::ToggleExpand);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::ScrollReposUp);
        bindings.insert((M::NONE, PageDown), KeyAction::ScrollReposDown);
        // Some terminals report uppercase letters with SHIFT, some without.
        bindings.insert((M::NONE, Char('K')), KeyAction::ScrollReposUp);
        bindings.insert((M::SHIFT, Char('K')), KeyAction::ScrollReposUp);
        bindings.insert((M::NONE, Char('J')), KeyAction::ScrollReposDown);
        bindings.insert((M::SHIFT, Char('J')), KeyAction::ScrollReposDown);
        bindings.insert((M::NONE, Char('r')), KeyAction::RefreshRepos);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);
        Self { bindings }
    }

    /// Load `path`, or write the defaults there if it does not exist yet.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::warn!(path, error = %err, "could not write default keybindings");
        }
        km
    }

    /// Parse `<Action> = <KeySpec>` lines on top of the defaults.
    ///
    /// Unknown actions and unparsable keys are skipped.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# ghuser-search keybindings (normal mode)\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Space, Up, Down, PageUp, PageDown, /, ?\n");
        let names: Vec<&str> = ACTION_NAMES.iter().map(|(_, n)| *n).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut lines: Vec<String> = self
            .all_bindings()
            .into_iter()
            .filter(|((mods, _), _)| !mods.contains(KeyModifiers::SHIFT))
            .map(|((mods, code), action)| format!("{} = {}", format_action(action), Self::format_key(mods, code)))
            .collect();
        lines.sort();
        for line in lines {
            let _ = writeln!(&mut buf, "{line}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Human-readable key spec such as `Ctrl+c` or `PageDown`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(' ') => "Space".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "Space" => Char(' '),
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTION_NAMES.iter().find(|(_, name)| *name == s).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}
