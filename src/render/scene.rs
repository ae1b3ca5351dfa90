//! Display list for one frame
//!
//! [`Scene::compose`] turns a snapshot into an ordered list of shapes in
//! viewport coordinates. It reads the state and never changes it; the frame
//! counter only drives idle animation (food bobbing, tongue flicker).

use crate::game::{ColorToken, Food, GameState, Point, Segment, Viewport};

const GRID_SPACING: f64 = 100.0;

const FOOD_GLOW_RADIUS: f64 = 15.0;
const FOOD_CORE_RADIUS: f64 = 8.0;
const FOOD_HIGHLIGHT_RADIUS: f64 = 2.0;
const FOOD_BOB_AMPLITUDE: f64 = 1.5;

const HEAD_RADIUS: f64 = 15.0;
const BODY_MAX_RADIUS: f64 = 14.0;
const BODY_MIN_RADIUS: f64 = 8.0;
const BODY_TAPER: f64 = 10.0;

const TONGUE_THRESHOLD: f64 = 0.8;
const TONGUE_EAGER_THRESHOLD: f64 = 0.5;
/// Food closer than this makes the tongue flick more often
const TONGUE_SENSE_RANGE: f64 = 120.0;

/// Palette slot; the painter picks the concrete colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Background,
    Grid,
    FoodGlow(ColorToken),
    Food(ColorToken),
    Highlight,
    Underbelly,
    Body,
    Head,
    Eye,
    Pupil,
    Tongue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    Line {
        from: Point,
        to: Point,
        paint: Paint,
    },
    /// Filled circle
    Disc {
        center: Point,
        radius: f64,
        paint: Paint,
    },
    /// Filled ellipse, `rx` along `angle`
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
        angle: f64,
        paint: Paint,
    },
}

impl Shape {
    pub fn paint(&self) -> Paint {
        match self {
            Shape::Rect { paint, .. }
            | Shape::Line { paint, .. }
            | Shape::Disc { paint, .. }
            | Shape::Ellipse { paint, .. } => *paint,
        }
    }
}

/// Shapes in back-to-front order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn compose(state: &GameState, frame: u64, viewport: Viewport) -> Self {
        let mut shapes = vec![Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: viewport.width,
            height: viewport.height,
            paint: Paint::Background,
        }];

        shapes.extend(grid_lines(viewport));
        for (index, food) in state.food.iter().enumerate() {
            shapes.extend(food_shapes(food, index, frame));
        }
        shapes.extend(compose_organism(
            &state.snake.segments,
            frame,
            state.nearest_food_distance(),
        ));

        Self { shapes }
    }
}

/// Visual radius of segment `index` in a body of `total` segments.
///
/// The head is largest; the body tapers toward the tail but never below
/// the floor radius.
pub fn segment_radius(index: usize, total: usize) -> f64 {
    if index == 0 {
        return HEAD_RADIUS;
    }
    let ratio = index as f64 / total.max(1) as f64;
    (BODY_MAX_RADIUS - ratio * BODY_TAPER).max(BODY_MIN_RADIUS)
}

/// Whether the tongue is out on this frame
pub fn tongue_visible(frame: u64, nearest_food: Option<f64>) -> bool {
    let threshold = match nearest_food {
        Some(distance) if distance < TONGUE_SENSE_RANGE => TONGUE_EAGER_THRESHOLD,
        _ => TONGUE_THRESHOLD,
    };
    (frame as f64 / 6.0).sin() > threshold
}

/// Body from tail to head, then the head ornaments on top.
///
/// An empty slice yields no shapes.
pub fn compose_organism(segments: &[Segment], frame: u64, nearest_food: Option<f64>) -> Vec<Shape> {
    let Some(head) = segments.first() else {
        return Vec::new();
    };

    let total = segments.len();
    let mut shapes = Vec::with_capacity(total * 2 + 8);

    for (index, segment) in segments.iter().enumerate().skip(1).rev() {
        let radius = segment_radius(index, total);
        let center = segment.position();
        shapes.push(Shape::Disc {
            center,
            radius,
            paint: Paint::Underbelly,
        });
        shapes.push(Shape::Disc {
            center,
            radius: radius * 0.6,
            paint: Paint::Body,
        });
    }

    let size = segment_radius(0, total);
    shapes.push(Shape::Ellipse {
        center: head.position(),
        rx: size + 4.0,
        ry: size,
        angle: head.angle,
        paint: Paint::Head,
    });

    for side in [-5.0, 5.0] {
        shapes.push(Shape::Disc {
            center: local_to_world(head, 8.0, side),
            radius: 4.0,
            paint: Paint::Eye,
        });
        shapes.push(Shape::Disc {
            center: local_to_world(head, 10.0, side),
            radius: 2.0,
            paint: Paint::Pupil,
        });
    }

    if tongue_visible(frame, nearest_food) {
        let base = local_to_world(head, 15.0, 0.0);
        let fork = local_to_world(head, 25.0, 0.0);
        shapes.push(Shape::Line {
            from: base,
            to: fork,
            paint: Paint::Tongue,
        });
        for side in [-3.0, 3.0] {
            shapes.push(Shape::Line {
                from: fork,
                to: local_to_world(head, 28.0, side),
                paint: Paint::Tongue,
            });
        }
    }

    shapes
}

fn grid_lines(viewport: Viewport) -> Vec<Shape> {
    let mut lines = Vec::new();

    let mut x = 0.0;
    while x < viewport.width {
        lines.push(Shape::Line {
            from: Point::new(x, 0.0),
            to: Point::new(x, viewport.height),
            paint: Paint::Grid,
        });
        x += GRID_SPACING;
    }

    let mut y = 0.0;
    while y < viewport.height {
        lines.push(Shape::Line {
            from: Point::new(0.0, y),
            to: Point::new(viewport.width, y),
            paint: Paint::Grid,
        });
        y += GRID_SPACING;
    }

    lines
}

fn food_shapes(food: &Food, index: usize, frame: u64) -> [Shape; 3] {
    let bob = (frame as f64 * 0.1 + index as f64).sin() * FOOD_BOB_AMPLITUDE;
    let center = Point::new(food.x, food.y + bob);

    [
        Shape::Disc {
            center,
            radius: FOOD_GLOW_RADIUS,
            paint: Paint::FoodGlow(food.color),
        },
        Shape::Disc {
            center,
            radius: FOOD_CORE_RADIUS,
            paint: Paint::Food(food.color),
        },
        Shape::Disc {
            center: Point::new(center.x - 2.0, center.y - 2.0),
            radius: FOOD_HIGHLIGHT_RADIUS,
            paint: Paint::Highlight,
        },
    ]
}

/// Offset in the head's frame (x forward, y to the right) to viewport space
fn local_to_world(head: &Segment, forward: f64, side: f64) -> Point {
    let (sin, cos) = head.angle.sin_cos();
    Point::new(
        head.x + forward * cos - side * sin,
        head.y + forward * sin + side * cos,
    )
}
