//! UI rendering for the debugger.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, List, ListItem},
    style::{Color, Style, Modifier},
};
use crate::cpu::MEMORY_SIZE;
use crate::dump::disassemble_word;
use super::app::DebuggerApp;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &DebuggerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .split(frame.area());

    // Left side: memory and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(chunks[0]);

    draw_memory(frame, left_chunks[0], app);
    draw_registers(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    // Right side: operator output and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(6),
        ])
        .split(chunks[1]);

    draw_output(frame, right_chunks[0], app);
    draw_help(frame, right_chunks[1]);
}

/// Draw memory with disassembly, marking the pc and breakpoints.
fn draw_memory(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let visible_rows = (area.height as usize).saturating_sub(2);
    let start = app.mem_scroll;
    let end = (start + visible_rows).min(MEMORY_SIZE);

    let items: Vec<ListItem> = app.cpu.mem.cells()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, word)| {
            let addr = (start + offset) as i64;
            let is_pc = addr == app.cpu.pc;
            let is_bp = app.breakpoints.contains(&addr);

            let prefix = if is_pc { "▶ " } else { "  " };
            let bp = if is_bp { "●" } else { " " };
            let text = format!("{} {}{:02}: {}  {}", bp, prefix, addr, word, disassemble_word(*word));

            let style = if is_pc {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if is_bp {
                Style::default().fg(Color::Red)
            } else if !word.is_zero() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Memory ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    frame.render_widget(list, area);
}

/// Draw the accumulator, program counter and run state.
fn draw_registers(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let content = vec![
        Line::from(vec![
            Span::raw("ACC: "),
            Span::styled(format!("{}", app.cpu.acc), Style::default().fg(Color::White)),
            Span::raw("   PC: "),
            Span::styled(format!("{}", app.cpu.pc), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("Cycles: "),
            Span::styled(format!("{}", app.cpu.cycles), Style::default().fg(Color::Cyan)),
            Span::raw("   State: "),
            Span::styled(format!("{:?}", app.cpu.state),
                if app.cpu.is_running() {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                }),
        ]),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default()
            .title(" Registers ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)));

    frame.render_widget(paragraph, area);
}

/// Draw status bar, or the input line while a GET is waiting.
fn draw_status(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let (title, text, color) = match &app.input {
        Some(buffer) => (" Input ", format!("> {}_", buffer), Color::Yellow),
        None => (" Status ", app.status.clone(), Color::White),
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default()
            .title(title)
            .borders(Borders::ALL));

    frame.render_widget(status, area);
}

/// Draw words written by PUT, newest at the bottom.
fn draw_output(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let visible_rows = (area.height as usize).saturating_sub(2);
    let output = &app.console.output;
    let skip = output.len().saturating_sub(visible_rows);

    let items: Vec<ListItem> = output[skip..]
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let list = List::new(items)
        .block(Block::default()
            .title(" Output ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)));

    frame.render_widget(list, area);
}

/// Draw help panel.
fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  b: Breakpoint"),
        Line::from("x: Reset  ↑↓: Scroll memory  q: Quit"),
        Line::from("GET input: digits, '-', Enter, Esc"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default()
        .title(" Help ")
        .borders(Borders::ALL));

    frame.render_widget(help, area);
}
