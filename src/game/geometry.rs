//! Angle math and the segment-chasing kinematics used by the step engine.
//!
//! Everything in here is a pure function over `f64`. None of it panics:
//! non-finite inputs propagate as NaN rather than aborting the frame.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// A point in viewport space (x grows right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move the point `distance` units along `angle`
    pub fn advanced(&self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }
}

/// One oriented unit of the organism's body
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, kept in (-PI, PI]
    pub angle: f64,
}

impl Segment {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn distance_to(&self, point: Point) -> f64 {
        self.position().distance_to(point)
    }
}

/// Size of the playable area, in the same units as `Point`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive bounds check; the edges themselves are still inside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// Reduce any angle delta into (-PI, PI] so steering always takes the short way round
pub fn normalize_angle_delta(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Ease `current` toward `target` by `turn_rate` of the shortest angular gap.
///
/// `turn_rate` of 1.0 snaps straight onto the target; small values give a
/// sluggish, wide turning circle. The result is not wrapped.
pub fn steer_toward(current: f64, target: f64, turn_rate: f64) -> f64 {
    current + normalize_angle_delta(target - current) * turn_rate
}

/// Heading from `from` to `to`, or `None` when the two points coincide
pub fn bearing(from: Point, to: Point) -> Option<f64> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(dy.atan2(dx))
}

/// Pull `follower` toward `leader` so they are at most `desired_distance` apart.
///
/// A follower that is already close enough is returned untouched. Otherwise it
/// lands exactly `desired_distance` from the leader, on the line between them,
/// and its heading points at the leader.
pub fn chase(leader: Point, follower: Segment, desired_distance: f64) -> Segment {
    let dist = follower.distance_to(leader);
    if dist <= desired_distance {
        return follower;
    }

    let angle = (leader.y - follower.y).atan2(leader.x - follower.x);
    Segment {
        x: leader.x - angle.cos() * desired_distance,
        y: leader.y - angle.sin() * desired_distance,
        angle,
    }
}
