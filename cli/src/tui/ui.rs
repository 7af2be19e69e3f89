use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};
use taskmaster_core::{KeyValueStore, Priority, Theme};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode};

struct Palette {
    primary: Color,
    muted: Color,
    text: Color,
    highlight: Color,
    done: Color,
}

const LIGHT: Palette = Palette {
    primary: Color::Blue,
    muted: Color::Gray,
    text: Color::Black,
    highlight: Color::LightBlue,
    done: Color::Green,
};

const DARK: Palette = Palette {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    highlight: Color::DarkGray,
    done: Color::Green,
};

fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Normal => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let size = f.area();
    let colors = palette(app.theme);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Filters
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Footer/Input
        ])
        .split(size);

    let stats = app.stats();
    let header = Paragraph::new(Line::from(vec![
        Span::styled("TASKMASTER", Style::default().fg(colors.primary).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("   {} total · {} active · {} completed", stats.total, stats.active, stats.completed),
            Style::default().fg(colors.muted),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    draw_filter_bar(f, app, colors, main_chunks[1]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_chunks[2]);

    draw_task_list(f, app, colors, content_chunks[0]);
    draw_detail_view(f, app, colors, content_chunks[1]);

    let percent = stats.completion_percentage();
    let gauge = Gauge::default()
        .block(Block::default().title(" Progress ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .gauge_style(Style::default().fg(colors.done))
        .percent(u16::from(percent))
        .label(format!("{}%", percent));
    f.render_widget(gauge, main_chunks[3]);

    draw_footer(f, app, colors, main_chunks[4]);
}

fn draw_filter_bar<S: KeyValueStore>(f: &mut Frame, app: &App<S>, colors: &Palette, area: Rect) {
    let active = app.filter.active_filters();
    let style_for = |on: bool| {
        if on {
            Style::default().fg(colors.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.muted)
        }
    };

    let mut spans = vec![
        Span::styled(" Status: ", Style::default().fg(colors.muted)),
        Span::styled(app.filter.status.to_string(), style_for(active.status)),
        Span::styled("  Priority: ", Style::default().fg(colors.muted)),
        Span::styled(app.filter.priority.to_string(), style_for(active.priority)),
    ];
    if active.search {
        spans.push(Span::styled("  Search: ", Style::default().fg(colors.muted)));
        spans.push(Span::styled(format!("'{}'", app.filter.search_term()), style_for(true)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_task_list<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, colors: &Palette, area: Rect) {
    let block = Block::default().title(" Tasks ").borders(Borders::ALL).border_type(BorderType::Rounded);

    if app.projection.is_empty() {
        let empty = Paragraph::new(app.projection.empty_state_message())
            .style(Style::default().fg(colors.muted))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app.visible().iter().map(|task| {
        let status_icon = if task.completed { "✔" } else { "☐" };
        let pri_str = match task.priority {
            Priority::High => "H",
            Priority::Normal => "N",
            Priority::Low => "L",
        };
        let text_style = if task.completed {
            Style::default().fg(colors.muted).add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(colors.text).add_modifier(Modifier::BOLD)
        };
        let created = task.created_at.with_timezone(&chrono::Local).format("%m-%d").to_string();

        Row::new(vec![
            Span::raw(status_icon),
            Span::styled(pri_str, priority_style(task.priority)),
            Span::raw(created),
            Span::styled(task.text.clone(), text_style),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3), // Status
            Constraint::Length(3), // Priority
            Constraint::Length(6), // Created
            Constraint::Min(10),   // Text
        ],
    )
    .header(Row::new(vec!["St", "Pr", "Date", "Task"]).style(Style::default().fg(colors.primary)))
    .block(block)
    .row_highlight_style(Style::default().bg(colors.highlight).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view<S: KeyValueStore>(f: &mut Frame, app: &App<S>, colors: &Palette, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded);
    let Some(task) = app.selected_task() else {
        f.render_widget(block, area);
        return;
    };

    let label = |s: &'static str| Span::styled(s, Style::default().fg(colors.primary));
    let detail_text = vec![
        Line::from(Span::styled(task.text.as_str(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![label("ID: "), Span::raw(task.id.to_string())]),
        Line::from(vec![label("Status: "), Span::raw(task.status_label())]),
        Line::from(vec![
            label("Priority: "),
            Span::styled(task.priority.label(), priority_style(task.priority)),
        ]),
        Line::from(vec![
            label("Created: "),
            Span::raw(task.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string()),
        ]),
    ];

    let detail = Paragraph::new(detail_text).block(block).wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}

fn draw_footer<S: KeyValueStore>(f: &mut Frame, app: &App<S>, colors: &Palette, area: Rect) {
    let prompt = match &app.input_mode {
        InputMode::Adding => Some("Add: "),
        InputMode::Editing(_) => Some("Edit: "),
        InputMode::Searching => Some("Search: "),
        InputMode::Normal | InputMode::ConfirmClearAll => None,
    };

    if let Some(prompt) = prompt {
        let line = Line::from(vec![
            Span::styled(prompt, Style::default().fg(colors.primary)),
            Span::raw(app.input.as_str()),
        ]);
        f.render_widget(Paragraph::new(line), area);

        let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
        let x = area.x + (prompt.width() + before_cursor.width()) as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        return;
    }

    let text = if matches!(app.input_mode, InputMode::ConfirmClearAll) {
        "Delete ALL tasks? y: yes | n: no".to_string()
    } else if let Some(message) = &app.message {
        message.clone()
    } else {
        "j/k: Move | space: Done | a: Add | e: Edit | d: Delete | s/p: Filter | /: Search | x: Clear done | C/R: All done/active | D: Delete all | t: Theme | q: Quit".to_string()
    };
    let footer = Paragraph::new(text)
        .style(Style::default().fg(colors.muted))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}
