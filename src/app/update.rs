use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::ui;

/// Draw, poll input, apply network results; until the user quits.
pub fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut AppState) -> Result<()> {
    while !app.should_quit {
        app.on_tick();
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
    }

    app.search.shutdown();
    tracing::info!(uptime_secs = app.started_at.elapsed().as_secs(), "exiting");
    Ok(())
}

/// Route one key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    match app.input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_query(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.should_quit = true,
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        },
        InputMode::Help => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.input_mode = InputMode::Normal;
            }
            _ => {}
        },
        InputMode::Normal => {
            let Some(action) = app.keymap.resolve(&key) else {
                return;
            };
            match action {
                KeyAction::Quit => app.should_quit = true,
                KeyAction::StartEditing => app.input_mode = InputMode::Editing,
                KeyAction::SubmitSearch => app.submit(),
                KeyAction::ClearInput => app.clear_query(),
                KeyAction::ToggleExpand => app.toggle_selected(),
                KeyAction::MoveUp => app.move_selection(-1),
                KeyAction::MoveDown => app.move_selection(1),
                KeyAction::ScrollReposUp => app.scroll_repos(-1),
                KeyAction::ScrollReposDown => app.scroll_repos(1),
                KeyAction::RefreshRepos => app.refresh_selected(),
                KeyAction::OpenHelp => app.input_mode = InputMode::Help,
                KeyAction::Ignore => {}
            }
        }
    }
}
