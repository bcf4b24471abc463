//! UI rendering for shortcut lab.

use crate::app::{App, InputMode, Page};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use shortcut_engine::KeyDisplayFormat;

pub fn draw(f: &mut Frame, app: &App) {
    let [header, main, input, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(f.area());

    draw_header(f, app, header);

    let body = if app.show_sidebar {
        let [sidebar, body, log] = Layout::horizontal([
            Constraint::Length(20),
            Constraint::Min(20),
            Constraint::Length(32),
        ])
        .areas(main);
        draw_sidebar(f, app, sidebar);
        draw_log(f, app, log);
        body
    } else {
        main
    };
    draw_page(f, app, body);
    draw_input(f, app, input);
    draw_status(f, status);

    if app.show_help {
        draw_help(f, app);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let format = match app.display.format {
        KeyDisplayFormat::Text => "text",
        KeyDisplayFormat::Symbolic => "symbolic",
    };
    let pending = app.pending_keys();
    let pending = if pending.is_empty() { "-".to_string() } else { pending };

    let line = Line::from(vec![
        Span::styled("Preset: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.preset_name(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled("   Keys: ", Style::default().fg(Color::DarkGray)),
        Span::styled(pending, Style::default().fg(Color::Yellow)),
        Span::styled("   Display: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Shortcut Lab "),
    );
    f.render_widget(header, area);
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Page::ALL
        .iter()
        .map(|&page| {
            let style = if page == app.page {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!(" {}", page.title()), style)))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Pages "));
    f.render_widget(list, area);
}

fn draw_page(f: &mut Frame, app: &App, area: Rect) {
    let files = app.visible_files();
    let items: Vec<ListItem> = files
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i == app.selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!("  {}", name), style)))
        })
        .collect();

    let title = if app.search.is_empty() {
        format!(" {} ", app.page.title())
    } else {
        format!(" {} (filter: {}) ", app.page.title(), app.search)
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app.log.iter().rev().map(|entry| Line::from(entry.as_str())).collect();
    let log = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Actions "));
    f.render_widget(log, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, active) = match app.focus.input {
        Some(InputMode::Search) => (" Search ", true),
        Some(InputMode::Palette) => (" Command (preset <id>, format <text|symbolic>) ", true),
        None => (" Input ", false),
    };
    let text = if active {
        format!("{}_", app.input)
    } else {
        String::new()
    };
    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );
    f.render_widget(input, area);
}

fn draw_status(f: &mut Frame, area: Rect) {
    let status = Paragraph::new("?: Help  F10: Next preset  F9: Key display  q: Quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, area);
}

fn draw_help(f: &mut Frame, app: &App) {
    let area = popup_area(f.area(), 60, 80);
    f.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} shortcuts", app.preset_name()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for section in app.engine.categorized_bindings() {
        lines.push(Line::from(Span::styled(
            format!("{}:", section.category.label()),
            Style::default().fg(Color::Cyan),
        )));
        for entry in &section.entries {
            lines.push(Line::from(format!(
                "  {:<16} {}",
                entry.format(&app.display),
                entry.description
            )));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press Esc or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(help, area);
}

/// A rectangle of the given percentages, centered in `area`.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
