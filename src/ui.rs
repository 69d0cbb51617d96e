pub mod panels;
pub mod wheel;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::{App, InputMode};
use crate::ui::wheel::WheelWidget;

const HORIZONTAL_MARGIN: u16 = 2;
const WHEEL_WIDTH: u16 = 36;
const TIMER_HEIGHT: u16 = 5;
const INPUT_HEIGHT: u16 = 3;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let lists_shown = self.view.show_pool || self.view.show_history;

        let mut constraints = vec![
            Constraint::Length(1), // title
            Constraint::Min(8),    // wheel + result + timer
        ];
        if lists_shown {
            constraints.push(Constraint::Percentage(40));
        }
        if self.mode != InputMode::Normal {
            constraints.push(Constraint::Length(INPUT_HEIGHT));
        }
        constraints.push(Constraint::Length(1)); // legend

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(constraints)
            .split(area);

        render_title(self, chunks[0], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(WHEEL_WIDTH), Constraint::Min(10)])
            .split(chunks[1]);

        let wheel_column = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // wheel
                Constraint::Length(1), // spin control
            ])
            .split(body[0]);

        WheelWidget::new(
            session.wheel().displayed_degrees(self.now()),
            session.is_spinning(),
        )
        .render(wheel_column[0], buf);
        panels::render_spin_control(session, wheel_column[1], buf);

        let info_column = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(TIMER_HEIGHT)])
            .split(body[1]);

        panels::render_result(session, info_column[0], buf);
        panels::render_timer(session.timer(), info_column[1], buf);

        let mut next = 2;
        if lists_shown {
            let list_area = chunks[next];
            next += 1;
            match (self.view.show_pool, self.view.show_history) {
                (true, true) => {
                    let halves = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .split(list_area);
                    panels::render_pool(session, self.view.pool_cursor, halves[0], buf);
                    panels::render_history(session, halves[1], buf);
                }
                (true, false) => panels::render_pool(session, self.view.pool_cursor, list_area, buf),
                _ => panels::render_history(session, list_area, buf),
            }
        }

        if self.mode != InputMode::Normal {
            panels::render_input(self.mode, &self.view.input, chunks[next], buf);
            next += 1;
        }

        panels::render_legend(self, chunks[next], buf);

        if self.view.show_help {
            panels::render_help(area, buf);
        }
    }
}

fn render_title(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let title = Line::from(vec![
        Span::styled(
            "Discussion Starter",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "   {} questions · {} asked",
                session.pool().len(),
                session.history().len()
            ),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    Paragraph::new(title)
        .alignment(Alignment::Center)
        .render(area, buf);
}
