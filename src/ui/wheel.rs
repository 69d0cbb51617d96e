use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Paragraph, Widget,
    },
};

pub const SEGMENT_COUNT: usize = 8;
const SEGMENT_DEGREES: f64 = 360.0 / SEGMENT_COUNT as f64;
const RAYS_PER_SEGMENT: usize = 9;
const RADIUS: f64 = 1.0;

pub const SEGMENT_COLORS: [Color; SEGMENT_COUNT] = [
    Color::Rgb(0xFF, 0x9A, 0xA2),
    Color::Rgb(0xFF, 0xB7, 0xB2),
    Color::Rgb(0xFF, 0xDA, 0xC1),
    Color::Rgb(0xE2, 0xF0, 0xCB),
    Color::Rgb(0xB5, 0xEA, 0xD7),
    Color::Rgb(0xC7, 0xCE, 0xEA),
    Color::Rgb(0x9E, 0xD2, 0xFF),
    Color::Rgb(0xE0, 0xBB, 0xE4),
];

/// The wheel drawn at a given clockwise rotation, with a fixed pointer on top.
pub struct WheelWidget {
    degrees: f64,
    spinning: bool,
}

impl WheelWidget {
    pub fn new(degrees: f64, spinning: bool) -> Self {
        Self { degrees, spinning }
    }
}

impl Widget for WheelWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        let under_pointer = segment_at_pointer(self.degrees);
        let pointer_style = if self.spinning {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(SEGMENT_COLORS[under_pointer])
                .add_modifier(Modifier::BOLD)
        };
        Paragraph::new(Span::styled("▼", pointer_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let degrees = self.degrees;
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-1.1, 1.1])
            .y_bounds([-1.1, 1.1])
            .paint(move |ctx| {
                for segment in 0..SEGMENT_COUNT {
                    let color = SEGMENT_COLORS[segment];
                    for ray in 0..RAYS_PER_SEGMENT {
                        let along = segment as f64 * SEGMENT_DEGREES
                            + ray as f64 * SEGMENT_DEGREES / RAYS_PER_SEGMENT as f64;
                        let (x, y) = rim_point(along + degrees);
                        ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, color));
                    }
                }
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: RADIUS,
                    color: Color::White,
                });
                ctx.layer();
                ctx.print(0.0, 0.0, "🧬");
            })
            .render(chunks[1], buf);
    }
}

/// Canvas coordinates of the rim point `degrees` clockwise from twelve o'clock.
pub fn rim_point(degrees: f64) -> (f64, f64) {
    let theta = (90.0 - degrees).to_radians();
    (RADIUS * theta.cos(), RADIUS * theta.sin())
}

/// Index of the segment under the top pointer when the wheel is rotated clockwise
/// by `degrees`.
pub fn segment_at_pointer(degrees: f64) -> usize {
    let turned = degrees.rem_euclid(360.0);
    let at_top = (360.0 - turned).rem_euclid(360.0);
    ((at_top / SEGMENT_DEGREES) as usize).min(SEGMENT_COUNT - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_at_pointer() {
        assert_eq!(segment_at_pointer(0.0), 0);
        assert_eq!(segment_at_pointer(10.0), 7);
        assert_eq!(segment_at_pointer(45.0), 7);
        assert_eq!(segment_at_pointer(50.0), 6);
        assert_eq!(segment_at_pointer(350.0), 0);
        assert_eq!(segment_at_pointer(1440.0 + 10.0), 7);
        assert_eq!(segment_at_pointer(-10.0), 0);
    }

    #[test]
    fn test_rim_point() {
        let (x, y) = rim_point(0.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);

        let (x, y) = rim_point(90.0);
        assert!((x - 1.0).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_wheel_renders_pointer() {
        let area = Rect::new(0, 0, 30, 12);
        let mut buf = Buffer::empty(area);

        WheelWidget::new(123.0, false).render(area, &mut buf);

        let top = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect::<String>();
        assert!(top.contains('▼'));
    }

    #[test]
    fn test_wheel_skips_tiny_area() {
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        WheelWidget::new(0.0, true).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
