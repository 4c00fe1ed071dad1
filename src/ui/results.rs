use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::app::AppState;
use crate::search::RepoState;

/// Result list on top, the expanded user's repositories below it.
pub fn render_results(f: &mut Frame, area: Rect, app: &mut AppState) {
    let users_len = app.search.state().users().len();
    if users_len == 0 {
        let p = Paragraph::new("No users. Type a name and press Enter.")
            .style(Style::default().fg(app.theme.muted))
            .block(bordered("Users", app));
        f.render_widget(p, area);
        return;
    }

    match app.search.state().expanded() {
        Some(position) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(users_len as u16 + 2), Constraint::Min(3)])
                .split(area);
            render_users(f, chunks[0], app);
            render_repositories(f, chunks[1], app, position);
        }
        None => render_users(f, area, app),
    }
}

fn render_users(f: &mut Frame, area: Rect, app: &AppState) {
    let state = app.search.state();
    let items: Vec<ListItem> = state
        .users()
        .iter()
        .enumerate()
        .map(|(i, u)| {
            let arrow = if state.is_expanded(i) { "▾" } else { "▸" };
            let marker = if i == app.selected { "▶ " } else { "  " };
            let mut spans = vec![
                Span::raw(format!("{marker}{arrow} ")),
                Span::styled(u.login.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  #{}", u.id), Style::default().fg(app.theme.muted)),
            ];
            match state.repo_state(&u.login) {
                Some(RepoState::Loading { received, .. }) => {
                    spans.push(Span::styled(
                        format!("  loading… {}", received.len()),
                        Style::default().fg(app.theme.muted),
                    ));
                }
                Some(RepoState::Ready(list)) => {
                    spans.push(Span::styled(
                        format!("  {} repos", list.len()),
                        Style::default().fg(app.theme.muted),
                    ));
                }
                Some(RepoState::Failed(_)) => {
                    spans.push(Span::styled("  unavailable", Style::default().fg(app.theme.error_fg)));
                }
                None => {}
            }
            let style = if i == app.selected {
                Style::default().fg(app.theme.highlight_fg).bg(app.theme.highlight_bg)
            } else {
                Style::default().fg(app.theme.text)
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let title = format!("Users ({})", state.users().len());
    f.render_widget(List::new(items).block(bordered(&title, app)), area);
}

fn render_repositories(f: &mut Frame, area: Rect, app: &mut AppState, position: usize) {
    let Some(login) = app.search.state().users().get(position).map(|u| u.login.clone()) else {
        return;
    };
    let title = format!("Repositories of {login}");
    let block = bordered(&title, app);
    let inner_rows = block.inner(area).height as usize;
    if inner_rows > 0 {
        app.repo_rows = inner_rows;
    }
    // a refetch may shrink the list under the current offset
    let ready_len = app.search.state().repositories(&login).map_or(0, |r| r.len());
    app.repo_scroll = app.repo_scroll.min(ready_len.saturating_sub(app.repo_rows.max(1)));

    let state = app.search.state();
    let message = match state.repo_state(&login) {
        Some(RepoState::Ready(list)) if !list.is_empty() => {
            let start = app.repo_scroll;
            let end = (start + inner_rows).min(list.len());
            let items: Vec<ListItem> = list[start..end]
                .iter()
                .map(|r| ListItem::new(r.name.clone()).style(Style::default().fg(app.theme.text)))
                .collect();
            let title = format!("{title} [{}-{} of {}]", start + 1, end, list.len());
            f.render_widget(List::new(items).block(bordered(&title, app)), area);
            return;
        }
        Some(RepoState::Ready(_)) => "No repositories.".to_string(),
        Some(RepoState::Loading { received, pages, .. }) => {
            format!("Loading… {} repositories in {} page(s) so far", received.len(), pages)
        }
        Some(RepoState::Failed(reason)) => format!("Could not load repositories: {reason}\nPress r to retry."),
        None => "Not requested yet. Press r to fetch.".to_string(),
    };
    let p = Paragraph::new(message)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.muted))
        .block(block);
    f.render_widget(p, area);
}

fn bordered<'a>(title: &'a str, app: &AppState) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}
