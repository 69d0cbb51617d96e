use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, StatefulWidget,
        Widget, Wrap,
    },
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, InputMode};
use crate::prompts::is_challenging;
use crate::session::{SelectionResult, Session};
use crate::timer::Countdown;

const CHALLENGING_COLOR: Color = Color::LightRed;

const HELP_LINES: [&str; 7] = [
    "Spin the wheel (space) to select a random discussion topic or icebreaker.",
    "Use the timer (t, 0, +/-, m) to keep your discussions on track.",
    "Add custom questions (a) or remove existing ones (l, then d) to tailor the pool.",
    "Questions marked with 🚨 are more challenging. It's okay to skip these if the group isn't comfortable.",
    "Asked questions are tracked (h) to avoid repetition.",
    "Reset the wheel (r) when you've gone through all questions or want to start fresh.",
    "Press ? to close this panel.",
];

pub fn spin_label(session: &Session) -> &'static str {
    if session.is_spinning() {
        "Spinning..."
    } else if session.pool().is_empty() {
        "No questions to spin"
    } else {
        "Spin the Wheel"
    }
}

pub fn render_spin_control(session: &Session, area: Rect, buf: &mut Buffer) {
    let style = if session.can_spin() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    Paragraph::new(Span::styled(format!(" {} ", spin_label(session)), style))
        .alignment(Alignment::Center)
        .render(area, buf);
}

pub fn render_result(session: &Session, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Discussion Topic");

    let text = match session.result() {
        Some(SelectionResult::Prompt(prompt)) if is_challenging(prompt) => vec![
            Line::from(Span::styled(
                prompt.as_str(),
                Style::default()
                    .fg(CHALLENGING_COLOR)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "challenging question: fine to skip if the group isn't comfortable",
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            )),
        ],
        Some(SelectionResult::Prompt(prompt)) => vec![Line::from(Span::styled(
            prompt.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ))],
        Some(result @ SelectionResult::Exhausted) => vec![Line::from(Span::styled(
            result.text(),
            Style::default().fg(Color::Yellow),
        ))],
        None => vec![Line::from(Span::styled(
            "Ready to start? Spin the wheel for a question to stimulate discussion or break the ice!",
            Style::default().add_modifier(Modifier::ITALIC),
        ))],
    };

    Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

pub fn render_timer(timer: &Countdown, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL).title(format!(
        "Discussion Timer · {} min",
        timer.duration_minutes()
    ));
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge_color = if timer.remaining_secs() == 0 {
        Color::Red
    } else {
        Color::Blue
    };
    Gauge::default()
        .gauge_style(Style::default().fg(gauge_color).bg(Color::DarkGray))
        .ratio(timer.progress().clamp(0.0, 1.0))
        .label(Span::styled(
            timer.format_remaining(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .render(rows[0], buf);

    let status = if timer.is_running() {
        "running · (t) pause"
    } else if timer.remaining_secs() == 0 {
        "time's up · (0) reset"
    } else {
        "paused · (t) start"
    };
    Paragraph::new(Span::styled(
        status,
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(rows[1], buf);
}

pub fn render_pool(session: &Session, cursor: usize, area: Rect, buf: &mut Buffer) {
    let history = session.history();
    let items = session
        .pool()
        .iter()
        .enumerate()
        .map(|(idx, prompt)| {
            let used = history.iter().any(|h| h == prompt);
            let mut style = Style::default();
            if is_challenging(prompt) {
                style = style.fg(CHALLENGING_COLOR);
            }
            if used {
                style = style.add_modifier(Modifier::DIM);
            }
            let marker = if used { "✓" } else { " " };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{marker} {:>2}. ", idx + 1)),
                Span::styled(prompt, style),
            ]))
        })
        .collect::<Vec<_>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("All Questions ({})", session.pool().len()))
                .title_bottom("(↑/↓) select (d) remove"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !session.pool().is_empty() {
        state.select(Some(cursor.min(session.pool().len() - 1)));
    }
    StatefulWidget::render(list, area, buf, &mut state);
}

pub fn render_history(session: &Session, area: Rect, buf: &mut Buffer) {
    let items = session
        .history()
        .iter()
        .enumerate()
        .map(|(idx, prompt)| ListItem::new(format!("{:>2}. {prompt}", idx + 1)))
        .collect::<Vec<_>>();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Asked Questions ({})", session.history().len())),
    );
    Widget::render(list, area, buf);
}

pub fn render_input(mode: InputMode, input: &str, area: Rect, buf: &mut Buffer) {
    let title = match mode {
        InputMode::Minutes => "Timer minutes (enter) apply (esc) cancel",
        _ => "New question (enter) add (esc) cancel",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let width = block.inner(area).width.saturating_sub(1) as usize;

    Paragraph::new(Line::from(vec![
        Span::raw(visible_tail(input, width)),
        Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(block)
    .render(area, buf);
}

/// The end of `input` that fits in `width` terminal columns.
pub fn visible_tail(input: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = input.len();
    for (idx, c) in input.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = idx;
    }
    &input[start..]
}

pub fn legend_text(app: &App) -> String {
    let entries: &[&str] = match app.mode {
        InputMode::AddPrompt | InputMode::Minutes => &["(enter) confirm", "(esc) cancel"],
        InputMode::Normal => &[
            "(space) spin",
            "(r)eset wheel",
            "(a)dd",
            "(l)ist",
            "(h)istory",
            "(t)imer",
            "(m)inutes",
            "(?) help",
            "(q)uit",
        ],
    };
    entries.iter().join(" / ")
}

pub fn render_legend(app: &App, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        legend_text(app),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(area, buf);
}

pub fn render_help(area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(70, 60, area);
    Clear.render(popup, buf);

    let lines = HELP_LINES
        .iter()
        .map(|l| Line::from(format!("• {l}")))
        .collect::<Vec<_>>();

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("How to use")
                .style(Style::default().fg(Color::Gray)),
        )
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

/// A rect of `percent_x` by `percent_y` of `area`, centered in it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
