//! Lobby detail rendering
//!
//! Layout:
//! ┌─────────────────────────────────────────────────┐
//! │  Badminton Legends                    3 Members │
//! │  Evening doubles at Urban Sports Hub.           │
//! ├─────────────────────────────────────────────────┤
//! │  Chat │ Matches │ Leaderboard │ Members         │
//! ├─────────────────────────────────────────────────┤
//! │                                                 │
//! │  (selected tab)                                 │
//! │                                                 │
//! └─────────────────────────────────────────────────┘

use crate::app::{DetailTab, TextInput};
use crate::lobby::{ChatMessage, Lobby};
use crate::session::Session;
use crate::stats::{position_of, rank, Match, MatchOutcome, SortConfig, SortDirection, SortKey};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs},
};

/// Render one lobby with the given tab selected
pub fn render_lobby_detail(
    frame: &mut Frame,
    area: Rect,
    lobby: &Lobby,
    session: &Session,
    tab: DetailTab,
    chat_input: &TextInput,
    sort: SortConfig,
) {
    let viewer = session.display_name();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Name + description
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Content
        ])
        .split(area);

    render_summary(frame, layout[0], lobby);

    let titles: Vec<&str> = DetailTab::ALL.iter().map(DetailTab::label).collect();
    let tabs = Tabs::new(titles)
        .select(tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(tabs, layout[1]);

    match tab {
        DetailTab::Chat => render_chat(frame, layout[2], lobby, viewer, chat_input),
        DetailTab::Matches => render_matches(frame, layout[2], &lobby.matches),
        DetailTab::Leaderboard => render_leaderboard(frame, layout[2], lobby, viewer, sort),
        DetailTab::Members => {
            render_members(frame, layout[2], lobby, viewer, lobby.is_admin(session.user_id()))
        }
    }
}

fn render_summary(frame: &mut Frame, area: Rect, lobby: &Lobby) {
    let lines = vec![
        Line::from(vec![
            Span::styled(lobby.name.as_str(), Style::default().fg(Color::Cyan).bold()),
            Span::styled(
                format!("  {}", lobby.member_count_label()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::styled(lobby.description.as_str(), Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_chat(frame: &mut Frame, area: Rect, lobby: &Lobby, viewer: &str, input: &TextInput) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    // Walk back from the newest message until the pane is full
    let width = layout[0].width.saturating_sub(2);
    let height = usize::from(layout[0].height.saturating_sub(2));
    let mut recent: Vec<Vec<Line>> = Vec::new();
    let mut rows = 0;
    for message in lobby.chat.iter().rev() {
        if rows >= height {
            break;
        }
        let wrapped = wrap_line(chat_line(message, viewer), width);
        rows += wrapped.len();
        recent.push(wrapped);
    }
    let lines: Vec<Line> = recent
        .into_iter()
        .rev()
        .flatten()
        .skip(rows.saturating_sub(height))
        .collect();

    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Chat "));
    frame.render_widget(log, layout[0]);

    let (text, style) = if !lobby.is_member(viewer) {
        (
            "Join this lobby to chat.".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else if input.is_empty() {
        (
            "Type a message...".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            format!("{}_", input.value()),
            Style::default().fg(Color::White),
        )
    };
    let input_box = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Message "));
    frame.render_widget(input_box, layout[1]);
}

/// System notices are centered without an author.
fn chat_line<'a>(message: &'a ChatMessage, viewer: &str) -> Line<'a> {
    if message.is_system() {
        return Line::styled(
            message.text.as_str(),
            Style::default().fg(Color::DarkGray).italic(),
        )
        .alignment(Alignment::Center);
    }

    let name_style = if message.user.full_name == viewer {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::Cyan).bold()
    };
    Line::from(vec![
        Span::styled(
            format!("{} ", message.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(message.user.full_name.as_str(), name_style),
        Span::raw(": "),
        Span::raw(message.text.as_str()),
    ])
}

/// Split a line into rows of at most `width` columns, keeping span styles.
fn wrap_line(line: Line<'_>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let finish = |spans: Vec<Span<'static>>| {
        let row = Line::from(spans).style(line.style);
        match line.alignment {
            Some(alignment) => row.alignment(alignment),
            None => row,
        }
    };

    let mut rows = Vec::new();
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    for span in &line.spans {
        let mut chunk = String::new();
        for ch in span.content.chars() {
            let mut buf = [0u8; 4];
            let ch_width = Span::raw(&*ch.encode_utf8(&mut buf)).width();
            if used > 0 && used + ch_width > width {
                if !chunk.is_empty() {
                    row.push(Span::styled(std::mem::take(&mut chunk), span.style));
                }
                rows.push(finish(std::mem::take(&mut row)));
                used = 0;
            }
            chunk.push(ch);
            used += ch_width;
        }
        if !chunk.is_empty() {
            row.push(Span::styled(chunk, span.style));
        }
    }
    rows.push(finish(row));
    rows
}

fn render_matches(frame: &mut Frame, area: Rect, matches: &[Match]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Match History ({}) ", matches.len()));

    if matches.is_empty() {
        let empty = Paragraph::new("No matches logged yet. Press l to log one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = matches.iter().map(match_card).collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn match_card(logged: &Match) -> ListItem<'_> {
    let mut heading = vec![
        Span::styled(
            logged.date.format("%d %b %Y").to_string(),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(logged.sport.label(), Style::default().fg(Color::Yellow).bold()),
        Span::styled(
            if logged.is_team() { "  (team)" } else { "" },
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(score) = &logged.score {
        heading.push(Span::styled(
            format!("  {}", score),
            Style::default().fg(Color::White),
        ));
    }

    let players = match &logged.outcome {
        MatchOutcome::Individual { participants, .. } => participants.join(", "),
        MatchOutcome::Team { team_a, team_b, .. } => {
            format!("Team A: {}  vs  Team B: {}", roster(team_a), roster(team_b))
        }
    };

    ListItem::new(vec![
        Line::from(heading),
        Line::styled(format!("  {}", players), Style::default().fg(Color::White)),
        Line::from(vec![
            Span::styled("  Winner: ", Style::default().fg(Color::Gray)),
            Span::styled(logged.winner_label(), Style::default().fg(Color::Green).bold()),
        ]),
        Line::default(),
    ])
}

fn roster(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Column header with a direction arrow on the active column
fn sort_header(key: SortKey, sort: SortConfig, hotkey: usize) -> String {
    let arrow = match (key == sort.key, sort.direction) {
        (false, _) => "",
        (true, SortDirection::Descending) => " ▼",
        (true, SortDirection::Ascending) => " ▲",
    };
    format!("{}{} ({})", key.label(), arrow, hotkey)
}

fn render_leaderboard(frame: &mut Frame, area: Rect, lobby: &Lobby, viewer: &str, sort: SortConfig) {
    let ranked = rank(&lobby.stats, sort);

    let mut header_cells = vec![Cell::from("#"), Cell::from("Player")];
    header_cells.extend(
        SortKey::ALL
            .iter()
            .enumerate()
            .map(|(i, key)| Cell::from(sort_header(*key, sort, i + 1))),
    );
    let header = Row::new(header_cells).style(Style::default().fg(Color::Yellow).bold());

    let rows: Vec<Row> = ranked
        .iter()
        .enumerate()
        .map(|(i, stats)| {
            let style = if stats.player_name == viewer {
                Style::default().fg(Color::Green).bold()
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(stats.player_name.clone()),
                Cell::from(stats.matches_played.to_string()),
                Cell::from(stats.wins.to_string()),
                Cell::from(stats.losses.to_string()),
                Cell::from(stats.draws.to_string()),
                Cell::from(stats.win_rate_label()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(11),
    ];
    let title = match position_of(&ranked, viewer) {
        Some(position) => format!(" Leaderboard  |  You: #{} ", position),
        None => " Leaderboard ".to_string(),
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn render_members(frame: &mut Frame, area: Rect, lobby: &Lobby, viewer: &str, admin: bool) {
    let items: Vec<ListItem> = lobby
        .members
        .iter()
        .map(|name| {
            let you = if name == viewer { " (you)" } else { "" };
            let style = if name == viewer {
                Style::default().fg(Color::Green).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let record = lobby.stats_for(name).map_or_else(
                || "no matches yet".to_string(),
                |s| format!("{}W {}L {}D", s.wins, s.losses, s.draws),
            );
            ListItem::new(Line::from(vec![
                Span::styled(format!("  {}{}", name, you), style),
                Span::styled(format!("  {}", record), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(
                " Members ({}){} ",
                lobby.members.len(),
                if admin { "  |  You created this lobby" } else { "" }
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(list, area);
}
