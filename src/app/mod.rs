//! Application state types and entry glue.
//!
//! [`AppState`] wraps the [`SearchController`] with everything that is purely
//! presentation: the input buffer, the cursor, the repository scroll offset,
//! theme and key bindings.
//!
pub mod config;
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::time::Instant;

use crate::github::UserResult;
use crate::search::SearchController;
use keymap::Keymap;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub input_fg: Color,
    pub error_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            input_fg: Color::White,
            error_fg: Color::Red,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
        }
    }

    /// Catppuccin Mocha palette, the default.
    pub fn mocha() -> Self {
        // https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            input_fg: Color::Rgb(0xb4, 0xbe, 0xfe),     // lavender
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x31, 0x32, 0x44), // surface0
        }
    }

    fn slots(&mut self) -> [(&'static str, &mut Color); 10] {
        [
            ("text", &mut self.text),
            ("muted", &mut self.muted),
            ("title", &mut self.title),
            ("border", &mut self.border),
            ("input_fg", &mut self.input_fg),
            ("error_fg", &mut self.error_fg),
            ("status_bg", &mut self.status_bg),
            ("status_fg", &mut self.status_fg),
            ("highlight_fg", &mut self.highlight_fg),
            ("highlight_bg", &mut self.highlight_bg),
        ]
    }

    /// Parse `key = color` lines over the `mocha` defaults. Unknown keys are ignored.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            let key = key.trim();
            if let Some((_, slot)) = theme.slots().into_iter().find(|(name, _)| *name == key) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &str) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `reset`.
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
            Color::Reset => "reset".to_string(),
            Color::Black => "#000000".to_string(),
            Color::Red => "#FF0000".to_string(),
            Color::Yellow => "#FFFF00".to_string(),
            Color::Cyan => "#00FFFF".to_string(),
            Color::Gray => "#B3B3B3".to_string(),
            Color::DarkGray => "#4D4D4D".to_string(),
            Color::White => "#FFFFFF".to_string(),
            // Named colors not used by the built-in themes
            _ => "reset".to_string(),
        }
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# ghuser-search theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        let mut copy = *self;
        for (name, color) in copy.slots() {
            let _ = writeln!(&mut buf, "{} = {}", name, Self::color_to_str(*color));
        }
        std::fs::write(path, buf)
    }

    /// Load `path`, or write the `mocha` defaults there if it does not exist yet.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(err) = t.write_file(path) {
            tracing::warn!(path, error = %err, "could not write default theme");
        }
        t
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub search: SearchController,
    pub query: String,
    pub input_mode: InputMode,
    /// Cursor into the result list.
    pub selected: usize,
    /// First visible row of the expanded repository list.
    pub repo_scroll: usize,
    /// Visible rows of the repository list, updated on every draw.
    pub repo_rows: usize,
    pub theme: Theme,
    pub keymap: Keymap,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(search: SearchController, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            search,
            query: String::new(),
            input_mode: InputMode::Editing,
            selected: 0,
            repo_scroll: 0,
            repo_rows: 10,
            theme,
            keymap,
            should_quit: false,
        }
    }

    pub fn selected_user(&self) -> Option<&UserResult> {
        self.search.state().users().get(self.selected)
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.search.query_edited();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.search.query_edited();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.search.query_edited();
        self.input_mode = InputMode::Editing;
    }

    /// Submit the current input. Stays in editing mode when the query is rejected.
    pub fn submit(&mut self) {
        if self.search.submit_search(&self.query).is_ok() {
            self.selected = 0;
            self.repo_scroll = 0;
            self.input_mode = InputMode::Normal;
        } else {
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn toggle_selected(&mut self) {
        if self.search.toggle_expansion(self.selected) {
            self.repo_scroll = 0;
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.search.state().users().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    /// Scroll the expanded list by `pages` screens, clamped to its length.
    pub fn scroll_repos(&mut self, pages: isize) {
        let Some(position) = self.search.state().expanded() else {
            return;
        };
        let len = self
            .search
            .state()
            .users()
            .get(position)
            .and_then(|u| self.search.state().repositories(&u.login))
            .map_or(0, |r| r.len());
        let step = self.repo_rows.max(1) as isize * pages;
        self.repo_scroll = self
            .repo_scroll
            .saturating_add_signed(step)
            .min(len.saturating_sub(self.repo_rows.max(1)));
    }

    pub fn refresh_selected(&mut self) {
        if let Some(login) = self.selected_user().map(|u| u.login.clone()) {
            self.search.fetch_repositories(&login);
        }
    }

    /// Pull finished network results into the state and keep the cursor in range.
    pub fn on_tick(&mut self) {
        if self.search.drain_events() > 0 {
            let len = self.search.state().users().len();
            self.selected = self.selected.min(len.saturating_sub(1));
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
