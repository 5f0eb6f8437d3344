use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Mode};
use crate::status_manager::MessageType;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Reader
            Constraint::Length(2), // Status bar
        ])
        .split(f.size());

    draw_title_bar(f, app, chunks[0]);

    if app.show_help() {
        draw_help(f, chunks[1]);
    } else {
        draw_reader(f, app, chunks[1]);
    }

    draw_status_bar(f, app, chunks[2]);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.file_path() {
        Some(path) => format!("  Versemark -- {}", path.display()),
        None => String::from("  Versemark -- [No File]"),
    };

    let modified_str = if app.is_modified() { " [Modified]" } else { "" };
    let title_bar = Paragraph::new(format!("{}{}", title, modified_str))
        .style(Style::default().bg(Color::Blue).fg(Color::White))
        .alignment(Alignment::Left);

    f.render_widget(title_bar, area);
}

fn draw_reader(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Center the reading column when the terminal is wider than it.
    let column = (app.config.reader.width).min(inner.width);
    let offset = (inner.width - column) / 2;
    let column_area = Rect {
        x: inner.x + offset,
        width: column,
        ..inner
    };

    let page = app.render_page(column_area.width as usize, column_area.height as usize);
    if page.lines.is_empty() {
        let empty = Paragraph::new("(empty document)")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(empty, column_area);
        return;
    }

    let scroll = u16::try_from(app.scroll()).unwrap_or(u16::MAX);
    let reader = Paragraph::new(page.lines).scroll((scroll, 0));
    f.render_widget(reader, column_area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Shortcuts and reading state
            Constraint::Length(1), // Status message
        ])
        .split(area);

    if app.mode() == Mode::SavePrompt {
        let prompt = Paragraph::new("Save changes before quitting? (y)es (n)o (c)ancel")
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(prompt, chunks[0]);
    } else {
        let key = |k: &'static str| {
            Span::styled(k, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        };
        let shortcuts = vec![
            key("j/k"),
            Span::raw(" Verse  "),
            key("t"),
            Span::raw(" Template  "),
            key("c"),
            Span::raw(" Compact  "),
            key("w"),
            Span::raw(" Save  "),
            key("?"),
            Span::raw(" Help  "),
        ];

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(48)])
            .split(chunks[0]);
        f.render_widget(
            Paragraph::new(Line::from(shortcuts)).style(Style::default().bg(Color::DarkGray)),
            halves[0],
        );
        f.render_widget(
            Paragraph::new(app.status_summary())
                .style(Style::default().bg(Color::DarkGray).fg(Color::Cyan))
                .alignment(Alignment::Right),
            halves[1],
        );
    }

    if let Some(message) = app.status.current() {
        let color = match message.message_type {
            MessageType::Info => Color::Yellow,
            MessageType::Success => Color::Green,
            MessageType::Warning => Color::LightYellow,
            MessageType::Error => Color::Red,
        };
        f.render_widget(
            Paragraph::new(message.content.clone()).style(Style::default().fg(color)),
            chunks[1],
        );
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            " HELP -- Reader Key Bindings",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(" Position:"),
        Line::from("  j / Down     Next verse"),
        Line::from("  k / Up       Previous verse"),
        Line::from("  PgDn / PgUp  Scroll"),
        Line::from(""),
        Line::from(" Display:"),
        Line::from("  c            Toggle compact spacing"),
        Line::from("  n            Toggle verse numbers"),
        Line::from("  h            Toggle current-verse highlight"),
        Line::from(""),
        Line::from(" Document:"),
        Line::from("  t            Apply the next layout template"),
        Line::from("  w            Save"),
        Line::from("  q            Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Press ? or Esc to exit help",
            Style::default().add_modifier(Modifier::ITALIC),
        )]),
    ];

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Left);

    f.render_widget(help, area);
}
