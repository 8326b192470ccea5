//! UI rendering using ratatui
//!
//! Screens:
//! - Lobbies: every lobby with member count and latest message
//! - LobbyDetail: tabs for chat, match history, leaderboard and members
//!
//! Modals are drawn over the current screen.

use super::lobby::render_lobby_detail;
use crate::app::{AppCoordinator, CreateField, FlashKind, LogMatchForm, Modal, Screen, TextInput};
use crate::lobby::Lobby;
use crate::stats::MatchMode;
use crate::storage::KeyValueStore;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

/// Render the appropriate screen based on app state
pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &AppCoordinator<S>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    render_header(frame, layout[0], app);

    match &app.screen {
        Screen::Lobbies { selected } => {
            render_lobby_list(frame, layout[1], app.repo.lobbies(), *selected);
        }
        Screen::LobbyDetail {
            tab,
            chat_input,
            sort,
            ..
        } => match app.current_lobby() {
            Some(lobby) => render_lobby_detail(
                frame,
                layout[1],
                lobby,
                &app.session,
                *tab,
                chat_input,
                *sort,
            ),
            None => render_not_found(frame, layout[1]),
        },
    }

    render_footer(frame, layout[2], app);

    if let Some(modal) = &app.modal {
        render_modal(frame, modal);
    }
}

fn render_header<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &AppCoordinator<S>) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(0)])
        .split(inner);

    let logo = Paragraph::new("QuickCourt")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(logo, header_layout[0]);

    let title = match app.current_lobby() {
        Some(lobby) => format!("{}  |  {}", lobby.name, app.session.display_name()),
        None => app.session.display_name().to_string(),
    };
    let user = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Right);
    frame.render_widget(user, header_layout[1]);
}

/// Render the lobby list
fn render_lobby_list(frame: &mut Frame, area: Rect, lobbies: &[Lobby], selected: usize) {
    if lobbies.is_empty() {
        let empty = Paragraph::new("No lobbies yet.\n\nPress c to create one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = lobbies
        .iter()
        .enumerate()
        .map(|(i, lobby)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            let latest = lobby
                .last_message()
                .map(|m| format!("{}: {}", m.user.full_name, m.text))
                .unwrap_or_else(|| "No messages yet".to_string());

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{}{}", prefix, lobby.name), style),
                    Span::styled(
                        format!("  ({})", lobby.member_count_label()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("    {}", latest),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Lobbies ({}) ", lobbies.len())),
    );
    frame.render_widget(list, area);
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    let para = Paragraph::new("Lobby not found.\n\nPress Esc to go back.")
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(para, area);
}

fn render_footer<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &AppCoordinator<S>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let mut status = Vec::new();
    if app.unsaved() {
        status.push(Span::styled(
            "[not saved] ",
            Style::default().fg(Color::Red).bold(),
        ));
    }
    if let Some(flash) = &app.flash {
        let color = match flash.kind {
            FlashKind::Info => Color::Green,
            FlashKind::Error => Color::Red,
        };
        status.push(Span::styled(flash.text.clone(), Style::default().fg(color)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Center),
        layout[0],
    );

    let help = Paragraph::new(help_text(app))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, layout[1]);
}

fn help_text<S: KeyValueStore>(app: &AppCoordinator<S>) -> &'static str {
    use crate::app::DetailTab;

    match (&app.modal, &app.screen) {
        (Some(Modal::LogMatch(_)), _) => {
            "↑↓ Move  Space Select  w Winner  m Mode  s Sport  0-9 Score  Enter Save  Esc Cancel"
        }
        (Some(Modal::CreateLobby { .. }), _) => "Tab Next field  Enter Create  Esc Cancel",
        (Some(Modal::AddMember { .. }), _) => "Enter Add  Esc Cancel",
        (None, Screen::Lobbies { .. }) => "↑↓ Navigate  Enter Open  c Create  r Reload  o Sign out  q Quit",
        (None, Screen::LobbyDetail { tab, .. }) => match tab {
            DetailTab::Chat => "Type to chat  Enter Send  Tab Next tab  Esc Back",
            DetailTab::Matches => "l Log match  Tab Next tab  Esc Back",
            DetailTab::Leaderboard => "1-5 Sort column  Tab Next tab  Esc Back",
            DetailTab::Members => "a Add member  Tab Next tab  Esc Back",
        },
    }
}

/// A rectangle of at most `width` x `height` centered in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_modal(frame: &mut Frame, modal: &Modal) {
    let height = match modal {
        Modal::CreateLobby { .. } => 8,
        Modal::AddMember { .. } => 5,
        Modal::LogMatch(form) => u16::try_from(form.candidates.len())
            .unwrap_or(u16::MAX)
            .saturating_add(9),
    };
    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(modal.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match modal {
        Modal::LogMatch(form) => {
            render_log_match(frame, inner, form);
            return;
        }
        Modal::CreateLobby {
            name,
            description,
            focus,
        } => vec![
            field_line("Name", name, *focus == CreateField::Name),
            Line::default(),
            field_line("Description", description, *focus == CreateField::Description),
        ],
        Modal::AddMember { name } => vec![field_line("Name", name, true)],
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line<'a>(label: &'a str, input: &'a TextInput, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<13}", format!("{}:", label)), Style::default().fg(Color::Gray)),
        Span::styled(format!("[{}]{}", input.value(), cursor), style),
    ])
}

/// Draft summary on top, then the candidate list scrolled to the cursor
fn render_log_match(frame: &mut Frame, area: Rect, form: &LogMatchForm) {
    let summary = log_match_summary(form);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(summary.len() as u16),
            Constraint::Min(0),
        ])
        .split(area);
    frame.render_widget(Paragraph::new(summary), layout[0]);

    let items: Vec<ListItem> = form
        .candidates
        .iter()
        .map(|name| ListItem::new(format!("{} {}", form.marker(name), name)))
        .collect();
    let list = List::new(items)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(form.cursor));
    frame.render_stateful_widget(list, layout[1], &mut state);
}

fn log_match_summary(form: &LogMatchForm) -> Vec<Line<'_>> {
    let draft = &form.draft;
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).bold();

    let (mode, winner) = match draft.mode() {
        MatchMode::Individual => (
            format!("Individual ({} selected)", draft.participants().len()),
            draft.winner().unwrap_or("-").to_string(),
        ),
        MatchMode::Team => (
            "Team".to_string(),
            draft
                .winning_side()
                .map(|side| side.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
    };

    vec![
        Line::from(vec![
            Span::styled("Mode:   ", label),
            Span::styled(mode, value),
            Span::styled("    Sport: ", label),
            Span::styled(draft.sport().label(), value),
        ]),
        Line::from(vec![
            Span::styled("Score:  ", label),
            Span::styled(format!("[{}]", draft.score()), value),
        ]),
        Line::from(vec![
            Span::styled("Winner: ", label),
            Span::styled(winner, Style::default().fg(Color::Green).bold()),
        ]),
        Line::default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Flash;
    use crate::lobby::LobbyRepository;
    use crate::session::Session;
    use crate::storage::Storage;
    use ratatui::backend::TestBackend;

    fn app() -> AppCoordinator<Storage> {
        AppCoordinator::new(
            LobbyRepository::new(Storage::open_in_memory().unwrap()),
            Session::demo(),
        )
    }

    fn draw(app: &AppCoordinator<Storage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_lobby_list_renders() {
        let screen = draw(&app());
        assert!(screen.contains("QuickCourt"));
        assert!(screen.contains("Badminton Legends"));
        assert!(screen.contains("Sunday Football Club"));
        assert!(screen.contains("3 Members"));
        assert!(screen.contains("Alex Morgan"));
    }

    #[test]
    fn test_flash_and_unsaved_marker() {
        let mut app = app();
        app.flash = Some(Flash::error("Member name cannot be empty."));
        let screen = draw(&app);
        assert!(screen.contains("Member name cannot be empty."));
        assert!(!screen.contains("[not saved]"));
    }

    #[test]
    fn test_modals_render() {
        let mut app = app();
        app.modal = Some(Modal::create_lobby());
        assert!(draw(&app).contains("Create Lobby"));

        app.open_lobby("lobby-1");
        app.modal = Some(Modal::LogMatch(LogMatchForm::new(vec![
            "Alex Morgan".to_string(),
            "Jane Doe".to_string(),
        ])));
        let screen = draw(&app);
        assert!(screen.contains("Log Match"));
        assert!(screen.contains("Box Cricket"));
        assert!(screen.contains("> [ ] Alex Morgan"));
    }

    #[test]
    fn test_log_match_cursor_stays_visible() {
        let mut app = app();
        app.open_lobby("lobby-1");
        let candidates: Vec<String> = (1..=60).map(|i| format!("Player {:02}", i)).collect();
        let mut form = LogMatchForm::new(candidates);
        for _ in 0..59 {
            form.down();
        }
        app.modal = Some(Modal::LogMatch(form));

        let screen = draw(&app);
        assert!(screen.contains("> [ ] Player 60"));
        assert!(!screen.contains("Player 01"));
    }

    #[test]
    fn test_missing_lobby_placeholder() {
        let mut app = app();
        app.open_lobby("lobby-gone");
        assert!(draw(&app).contains("Lobby not found."));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(60, 8, area), Rect::new(0, 1, 20, 8));
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
    }
}
