use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
        Block, BorderType, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

use super::scene::{Paint, Scene, Shape};
use crate::game::{ColorToken, Viewport};
use crate::metrics::GameMetrics;
use crate::session::Session;

const BACKGROUND: Color = Color::Rgb(10, 15, 10);
const ACCENT: Color = Color::Rgb(16, 185, 129);

/// Screen regions for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLayout {
    pub header: Rect,
    pub game: Rect,
    /// Drawable area inside the game border; mouse input maps against this
    pub canvas: Rect,
    pub footer: Rect,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn layout(&self, area: Rect) -> RenderLayout {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(4), // Footer
            ])
            .split(area);

        let game = chunks[1];
        let canvas = Block::default().borders(Borders::ALL).inner(game);

        RenderLayout {
            header: chunks[0],
            game,
            canvas,
            footer: chunks[2],
        }
    }

    pub fn render(&self, frame: &mut Frame, session: &Session, metrics: &GameMetrics) {
        let layout = self.layout(frame.area());
        let state = session.state();

        let stats = self.render_stats(session, metrics);
        frame.render_widget(stats, layout.header);

        let scene = Scene::compose(state, session.frame(), session.viewport());
        let canvas_step = dot_size(layout.canvas, session.viewport());
        let arena = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(ACCENT))
                    .title(" BioSnake "),
            )
            .marker(Marker::Braille)
            .background_color(BACKGROUND)
            .x_bounds([0.0, session.viewport().width])
            .y_bounds([0.0, session.viewport().height])
            .paint(|ctx| {
                let painter = Painter {
                    viewport: session.viewport(),
                    step: canvas_step,
                };
                for shape in &scene.shapes {
                    painter.draw(ctx, shape);
                }
            });
        frame.render_widget(arena, layout.game);

        if state.is_terminated {
            let popup = centered(layout.game, 60, 12);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(session, metrics), popup);
        }

        let footer = match session.last_fact() {
            Some(_) if !state.is_terminated => self.render_fact(session),
            _ => self.render_controls(),
        };
        frame.render_widget(footer, layout.footer);
    }

    fn render_stats(&self, session: &Session, metrics: &GameMetrics) -> Paragraph<'_> {
        let state = session.state();
        let species = if session.is_evolving() {
            "Mutating...".to_string()
        } else {
            state.species.clone()
        };

        let label = Style::default().fg(Color::Rgb(16, 120, 90));
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled(
                species,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("SCORE: ", label),
            Span::styled(state.score.to_string(), value),
            Span::raw("    "),
            Span::styled("LENGTH: ", label),
            Span::styled(format!("{} cm", state.length_stat), value),
            Span::raw("    "),
            Span::styled("SPEED: ", label),
            Span::styled(format!("{:.2}", state.speed), value),
            Span::raw("    "),
            Span::styled("TIME: ", label),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("BEST: ", label),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }

    fn render_fact(&self, session: &Session) -> Paragraph<'_> {
        let mut lines = Vec::new();
        if let Some(fact) = session.last_fact() {
            lines.push(Line::from(vec![
                Span::styled(
                    "BIOLOGICAL INSIGHT  ",
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("\"{}\"", fact.fact),
                    Style::default()
                        .fg(Color::Rgb(200, 240, 220))
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));

            let mut traits = Vec::new();
            for name in &fact.traits {
                traits.push(Span::styled(
                    format!(" {} ", name.to_uppercase()),
                    Style::default().fg(Color::Rgb(110, 231, 183)).bg(Color::Rgb(6, 78, 59)),
                ));
                traits.push(Span::raw(" "));
            }
            lines.push(Line::from(traits));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }

    fn render_game_over(&self, session: &Session, metrics: &GameMetrics) -> Paragraph<'_> {
        let state = session.state();
        let note = session
            .obituary()
            .unwrap_or("Decomposition in progress...")
            .to_string();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "BIOLOGICAL FAILURE",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                note,
                Style::default()
                    .fg(Color::Rgb(200, 240, 220))
                    .add_modifier(Modifier::ITALIC),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Total Evolutions: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.evolution_history.len().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Runs: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.runs.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Longest: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{} cm", metrics.longest),
                    Style::default().fg(Color::White),
                ),
                Span::raw("    "),
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to regenerate or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(vec![
                Span::styled("Mouse", Style::default().fg(Color::Cyan)),
                Span::raw(" to steer | "),
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
            Line::from(Span::styled(
                "BIOSYNC ACTIVE // NEURAL STEERING ENGAGED",
                Style::default().fg(Color::Rgb(16, 90, 70)),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws scene shapes onto a ratatui canvas
struct Painter {
    viewport: Viewport,
    /// Viewport distance covered by one braille dot
    step: f64,
}

impl Painter {
    fn draw(&self, ctx: &mut Context<'_>, shape: &Shape) {
        match *shape {
            // Canvas background colour already covers this
            Shape::Rect { .. } => {}
            Shape::Line { from, to, paint } => {
                ctx.draw(&CanvasLine {
                    x1: from.x,
                    y1: self.flip(from.y),
                    x2: to.x,
                    y2: self.flip(to.y),
                    color: color_of(paint),
                });
            }
            Shape::Disc {
                center,
                radius,
                paint,
            } => {
                let color = color_of(paint);
                let mut r = radius;
                while r > 0.0 {
                    ctx.draw(&Circle {
                        x: center.x,
                        y: self.flip(center.y),
                        radius: r,
                        color,
                    });
                    r -= self.step;
                }
                ctx.draw(&Points {
                    coords: &[(center.x, self.flip(center.y))],
                    color,
                });
            }
            Shape::Ellipse {
                center,
                rx,
                ry,
                angle,
                paint,
            } => {
                let coords = self.ellipse_points(center.x, center.y, rx, ry, angle);
                ctx.draw(&Points {
                    coords: &coords,
                    color: color_of(paint),
                });
            }
        }
    }

    /// Canvas y grows upward, viewport y grows downward
    fn flip(&self, y: f64) -> f64 {
        self.viewport.height - y
    }

    fn ellipse_points(&self, cx: f64, cy: f64, rx: f64, ry: f64, angle: f64) -> Vec<(f64, f64)> {
        let (sin, cos) = angle.sin_cos();
        let mut coords = Vec::new();
        let mut scale = 1.0;
        while scale > 0.0 {
            for i in 0..48 {
                let t = i as f64 / 48.0 * std::f64::consts::TAU;
                let lx = rx * scale * t.cos();
                let ly = ry * scale * t.sin();
                let x = cx + lx * cos - ly * sin;
                let y = cy + lx * sin + ly * cos;
                coords.push((x, self.flip(y)));
            }
            scale -= (self.step / rx.max(ry)).max(0.05);
        }
        coords.push((cx, self.flip(cy)));
        coords
    }
}

/// Viewport units per braille dot, the larger of the two axes
fn dot_size(canvas: Rect, viewport: Viewport) -> f64 {
    if canvas.width == 0 || canvas.height == 0 {
        return viewport.width.max(viewport.height).max(1.0);
    }
    let dx = viewport.width / (f64::from(canvas.width) * 2.0);
    let dy = viewport.height / (f64::from(canvas.height) * 4.0);
    dx.max(dy).max(0.5)
}

fn color_of(paint: Paint) -> Color {
    match paint {
        Paint::Background => BACKGROUND,
        Paint::Grid => Color::Rgb(24, 34, 26),
        Paint::FoodGlow(token) => match token {
            ColorToken::Red => Color::Rgb(120, 34, 34),
            ColorToken::Amber => Color::Rgb(125, 95, 18),
            ColorToken::Violet => Color::Rgb(83, 69, 125),
        },
        Paint::Food(token) => match token {
            ColorToken::Red => Color::Rgb(239, 68, 68),
            ColorToken::Amber => Color::Rgb(251, 191, 36),
            ColorToken::Violet => Color::Rgb(167, 139, 250),
        },
        Paint::Highlight => Color::Rgb(255, 240, 240),
        Paint::Underbelly => Color::Rgb(20, 83, 45),
        Paint::Body => Color::Rgb(74, 222, 128),
        Paint::Head => Color::Rgb(45, 90, 39),
        Paint::Eye => Color::White,
        Paint::Pupil => Color::Rgb(20, 20, 20),
        Paint::Tongue => Color::Rgb(244, 63, 94),
    }
}

/// A `width` x `height` rect centred in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
