//! UI layout and widget rendering for the journal TUI

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use bjournal_core::date::day_title;
use bjournal_core::fs::FileSystem;
use bjournal_core::{Category, Cursor, DailyLog, Log, LogStore};

use super::state::{InputMode, JournalState, Pane};

/// Render the full UI
pub fn render<FS: FileSystem>(frame: &mut Frame, state: &mut JournalState, store: &mut LogStore<FS>) {
    // Main layout: content area + help bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let columns = match state.side_pane() {
        Some(_) => vec![Constraint::Percentage(50), Constraint::Percentage(50)],
        None => vec![Constraint::Percentage(100)],
    };
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(main_chunks[0]);

    // Today list with the selected entry's note underneath
    let today_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(content_chunks[0]);

    render_today(frame, state, store, today_chunks[0]);
    render_body(frame, state, store, today_chunks[1]);

    match state.side_pane() {
        Some(Pane::Previous) => render_previous(frame, state, store, content_chunks[1]),
        Some(Pane::Index) => render_index(frame, state, store, content_chunks[1]),
        _ => {}
    }

    render_help_bar(frame, state, main_chunks[1]);
}

fn render_today<FS: FileSystem>(
    frame: &mut Frame,
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    area: Rect,
) {
    let focused = state.focus == Pane::Today;
    match store.read_day(state.today) {
        Ok(day) => {
            let title = format!(" {} ", day_title(&day.date()));
            render_day(
                frame,
                day,
                &mut state.today_cursor,
                &mut state.today_list,
                pane_block(title, focused),
                area,
            );
        }
        Err(e) => render_error(frame, &e.to_string(), pane_block(" Today ".into(), focused), area),
    }
}

fn render_previous<FS: FileSystem>(
    frame: &mut Frame,
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    area: Rect,
) {
    let focused = state.focus == Pane::Previous;
    match store.read_previous(state.previous) {
        Ok(day) => {
            let title = if day.is_unresolved() {
                " No previous day ".to_string()
            } else {
                format!(" {} ", day_title(&day.date()))
            };
            render_day(
                frame,
                day,
                &mut state.previous_cursor,
                &mut state.previous_list,
                pane_block(title, focused),
                area,
            );
        }
        Err(e) => {
            let block = pane_block(" Previous day ".into(), focused);
            render_error(frame, &e.to_string(), block, area);
        }
    }
}

/// Render a day's entries with sub-logs indented under their owner
fn render_day(
    frame: &mut Frame,
    day: &DailyLog,
    cursor: &mut Cursor,
    list_state: &mut ListState,
    block: Block<'static>,
    area: Rect,
) {
    cursor.clamp(day.logs());

    let mut items = Vec::new();
    for log in day.logs() {
        items.push(log_item(log, 0));
        for sub_log in log.sub_logs() {
            items.push(log_item(sub_log, 1));
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    list_state.select(cursor.row(day.logs()));
    frame.render_stateful_widget(list, area, list_state);
}

fn log_item(log: &Log, depth: usize) -> ListItem<'static> {
    let mut style = category_style(log.mark);
    if log.important {
        style = style.add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw("   ".repeat(depth)),
        Span::styled(format!("{} {}", log.mark.glyph(), log.name), style),
    ];
    if log.important {
        spans.push(Span::styled(" !", Style::default().fg(Color::Red).bold()));
    }
    if log.url.is_some() {
        spans.push(Span::styled(" ✎", Style::default().fg(Color::DarkGray)));
    }

    ListItem::new(Line::from(spans))
}

fn category_style(category: Category) -> Style {
    let style = Style::default();
    match category {
        Category::Task => style.fg(Color::LightBlue),
        Category::Complete => style.fg(Color::Rgb(154, 205, 50)),
        Category::Irrelevant => style.fg(Color::Yellow).add_modifier(Modifier::CROSSED_OUT),
        Category::Migrated => style.fg(Color::Rgb(255, 69, 0)),
        Category::Scheduled => style.fg(Color::Yellow),
        Category::Note => style.fg(Color::Rgb(255, 192, 203)),
        Category::Event => style.fg(Color::Rgb(160, 32, 240)),
    }
}

/// Render the note attached to the entry selected in the focused day pane
fn render_body<FS: FileSystem>(
    frame: &mut Frame,
    state: &JournalState,
    store: &mut LogStore<FS>,
    area: Rect,
) {
    let (day, cursor) = match state.focus {
        Pane::Previous => (store.read_previous(state.previous), &state.previous_cursor),
        _ => (store.read_day(state.today), &state.today_cursor),
    };
    let selected = day.ok().and_then(|day| cursor.current_selection(day.logs()));

    let (title, body) = match selected {
        Some(log) => (
            log.url.clone().unwrap_or_else(|| "(no note)".to_string()),
            log.text.clone().unwrap_or_default(),
        ),
        None => ("(no selection)".to_string(), String::new()),
    };

    let content = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" {} ", title),
                    Style::default().fg(Color::DarkGray),
                ))
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(content, area);
}

fn render_index<FS: FileSystem>(
    frame: &mut Frame,
    state: &mut JournalState,
    store: &LogStore<FS>,
    area: Rect,
) {
    let items: Vec<ListItem> = store
        .index()
        .items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::styled(item.name.clone(), Style::default().bold()),
                Span::styled(format!("  {}", item.url), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    if state.index_selected.is_some_and(|i| i >= items.len()) {
        state.index_selected = items.len().checked_sub(1);
    }

    let list = List::new(items)
        .block(pane_block(" Index ".into(), state.focus == Pane::Index))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    state.index_list.select(state.index_selected);
    frame.render_stateful_widget(list, area, &mut state.index_list);
}

fn render_error(frame: &mut Frame, message: &str, block: Block<'static>, area: Rect) {
    let error = Paragraph::new(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    ))
    .block(block)
    .wrap(Wrap { trim: false });
    frame.render_widget(error, area);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let color = if focused { Color::Cyan } else { Color::Blue };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

/// Render the help bar at the bottom, adapting to current input mode
fn render_help_bar(frame: &mut Frame, state: &JournalState, area: Rect) {
    let line = match &state.mode {
        InputMode::Normal => render_normal_help(state),
        InputMode::Prompt { kind, buffer } => render_prompt(kind.label(), buffer),
    };

    let help_bar = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(help_bar, area);
}

/// Normal mode help bar, or the status message if one is active
fn render_normal_help(state: &JournalState) -> Line<'static> {
    if let Some((msg, is_error)) = &state.status_message {
        let color = if *is_error { Color::Red } else { Color::Green };
        return Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(msg.clone(), Style::default().fg(color).bold()),
        ]);
    }

    let hints: &[(&'static str, &'static str)] = match state.focus {
        Pane::Index => &[
            ("j/k", "nav"),
            ("Enter", "open"),
            ("n", "new note"),
            ("Tab", "focus"),
            ("I", "index"),
            ("q", "quit"),
        ],
        _ => &[
            ("j/k", "nav"),
            ("t/n/e", "add"),
            ("c", "done"),
            ("x", "drop"),
            ("!", "important"),
            ("m/M", "migrate"),
            ("P", "previous"),
            ("I", "index"),
            ("Tab", "focus"),
            ("q", "quit"),
        ],
    };

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan).bold()));
        spans.push(Span::raw(format!(": {}  ", action)));
    }
    Line::from(spans)
}

/// Prompt bar showing the text typed so far
fn render_prompt(label: &str, buffer: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {}: ", label),
            Style::default().fg(Color::Yellow).bold(),
        ),
        Span::raw(buffer.to_string()),
        Span::styled(
            " ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Enter", Style::default().fg(Color::DarkGray)),
        Span::styled(": save  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::DarkGray)),
        Span::styled(": cancel", Style::default().fg(Color::DarkGray)),
    ])
}
