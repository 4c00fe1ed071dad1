//! Shared UI components (status bar, spinner, help overlay).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::collections::{BTreeMap, BTreeSet};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Bottom status bar: mode, counts and the selected user's avatar URL.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Editing => "EDIT",
        InputMode::Help => "HELP",
    };
    let state = app.search.state();
    let loading = state
        .users()
        .iter()
        .filter(|u| state.is_loading_repos(&u.login))
        .count();
    let avatar = app
        .selected_user()
        .map(|u| format!("  avatar: {}", u.avatar_url))
        .unwrap_or_default();
    let msg = format!(
        "mode: {mode}  users:{}  fetching:{}{}",
        state.users().len(),
        loading,
        avatar
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Centered progress line shown while a request is in flight.
pub fn render_spinner(f: &mut Frame, area: Rect, app: &AppState, label: &str) {
    let frame = (app.started_at.elapsed().as_millis() / 150) as usize % SPINNER.len();
    let rect = centered_rect(label.len() as u16 + 8, 3, area);
    let p = Paragraph::new(format!("{} {label}…", SPINNER[frame])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, rect);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn action_label(action: KeyAction) -> Option<&'static str> {
    Some(match action {
        KeyAction::Quit => "Quit",
        KeyAction::StartEditing => "Edit query",
        KeyAction::SubmitSearch => "Search",
        KeyAction::ClearInput => "Clear query",
        KeyAction::ToggleExpand => "Expand / collapse",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::ScrollReposUp => "Scroll repos up",
        KeyAction::ScrollReposDown => "Scroll repos down",
        KeyAction::RefreshRepos => "Reload repos",
        KeyAction::OpenHelp => "Help",
        KeyAction::Ignore => return None,
    })
}

/// Key reference built from the active keymap plus the fixed editing keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let mut grouped: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in app.keymap.all_bindings() {
        if let Some(label) = action_label(action) {
            grouped.entry(label).or_default().insert(Keymap::format_key(mods, code));
        }
    }

    let label_w = grouped.keys().map(|k| k.len()).max().unwrap_or(0);
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Results:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, keys) in &grouped {
        let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>label_w$} │ ", label)),
            Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Editing:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in [
        ("Search", "Enter"),
        ("Clear query", "Ctrl+u"),
        ("Back to results", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>label_w$} │ ", label)),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = centered_rect(60, height, area);
    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Keybindings (Esc to close)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
