use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Tabs},
    Frame,
};
use todolite_core::Filter;
use unicode_width::UnicodeWidthStr;

use crate::list::{format_created, EMPTY_MESSAGE};
use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filter tabs
            Constraint::Min(1),    // Tasks
            Constraint::Length(3), // Input line
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("TODOLITE")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, chunks[0]);

    draw_filter_tabs(f, app, chunks[1]);
    draw_task_list(f, app, chunks[2]);
    draw_input(f, app, chunks[3]);
    draw_footer(f, app, chunks[4]);
}

fn draw_filter_tabs(f: &mut Frame, app: &App, area: Rect) {
    let current = app.state.filter();
    let titles: Vec<Line> = Filter::ALL
        .iter()
        .enumerate()
        .map(|(i, filter)| Line::from(format!("{} {}", i + 1, filter)))
        .collect();
    let selected = Filter::ALL.iter().position(|filter| *filter == current).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().title(" Filter ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn draw_task_list(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().title(" Tasks ").borders(Borders::ALL).border_type(BorderType::Rounded);
    let editing_id = app.state.edit_session().editing_id().cloned();

    let rows: Vec<Row> = app.visible_tasks().iter().map(|task| {
        let status_icon = if task.completed { "✔" } else { "☐" };
        let text_style = if task.completed {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        } else if editing_id.as_ref() == Some(&task.id) {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        Row::new(vec![
            Span::raw(status_icon),
            Span::styled(task.id.short().to_string(), Style::default().fg(Color::DarkGray)),
            Span::styled(task.text.clone(), text_style),
            Span::raw(format_created(task.created_at)),
        ])
    }).collect();

    if rows.is_empty() {
        let empty = Paragraph::new(EMPTY_MESSAGE)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(9),  // ID
            Constraint::Min(10),    // Text
            Constraint::Length(17), // Created
        ]
    )
    .header(Row::new(vec!["St", "ID", "Task", "Created"]).style(Style::default().fg(Color::Yellow)))
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.table);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, style) = match app.input_mode {
        InputMode::Normal => (" Input ", Style::default().fg(Color::DarkGray)),
        InputMode::Adding => (" New task ", Style::default().fg(Color::Green)),
        InputMode::Editing => (" Edit task ", Style::default().fg(Color::Yellow)),
    };
    let text = app.input_text();

    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(input, area);

    if !matches!(app.input_mode, InputMode::Normal) {
        let x = cursor_x(area, text, app.cursor_position);
        f.set_cursor_position((x, area.y + 1));
    }
}

/// Column of the input cursor, measured by display width so wide characters
/// line up, and clamped inside the input box.
fn cursor_x(area: Rect, text: &str, cursor_position: usize) -> u16 {
    let before: String = text.chars().take(cursor_position).collect();
    let width = u16::try_from(before.width()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(width)
        .min(area.right().saturating_sub(2))
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let counts = app.state.store().counts();
    let toggle_hint = match app.selected_task() {
        Some(task) if task.completed => "space: mark as active",
        _ => "space: mark as completed",
    };
    let help = match app.input_mode {
        InputMode::Normal => format!(
            "a: add | e: edit | {} | d: delete | c: clear completed | f: filter | q: quit",
            toggle_hint
        ),
        InputMode::Adding => "enter: add | esc: done".to_string(),
        InputMode::Editing => "enter/tab: save | esc: cancel".to_string(),
    };

    let mut spans = vec![Span::styled(
        format!("{} active, {} completed  ", counts.active, counts.completed),
        Style::default().fg(Color::Cyan),
    )];
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("{}  ", status), Style::default().fg(Color::Red)));
    }
    spans.push(Span::styled(help, Style::default().fg(Color::DarkGray)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
