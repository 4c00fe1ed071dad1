pub mod components;
pub mod results;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_input(f, root[0], app);

    let hint = if app.search.state().validation_error() {
        Line::from(Span::styled(
            crate::error::ValidationError::EmptyQuery.to_string(),
            Style::default().fg(app.theme.error_fg),
        ))
    } else {
        Line::from(Span::styled(
            "Enter: search  Esc: results  ?: keys",
            Style::default().fg(app.theme.muted),
        ))
    };
    f.render_widget(Paragraph::new(hint), root[1]);

    if app.search.state().is_searching() {
        components::render_spinner(f, root[2], app, "Searching users");
    } else {
        results::render_results(f, root[2], app);
    }

    components::render_status_bar(f, root[3], app);

    if app.input_mode == InputMode::Help {
        components::render_help_modal(f, f.area(), app);
    }
}

fn render_input(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.input_mode == InputMode::Editing;
    let border = if editing { app.theme.title } else { app.theme.border };
    let placeholder = app.query.is_empty() && !editing;
    let text = if placeholder {
        Span::styled("Search", Style::default().fg(app.theme.muted))
    } else {
        Span::styled(app.query.clone(), Style::default().fg(app.theme.input_fg))
    };
    let p = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title(Span::styled(
                "Search GitHub Users",
                Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);

    if editing {
        let width = app.query.chars().count() as u16;
        let x = (area.x + 1 + width).min(area.right().saturating_sub(2));
        f.set_cursor_position((x, area.y + 1));
    }
}
