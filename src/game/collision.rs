//! Distance-based collision tests

use super::food::Food;
use super::geometry::{Point, Segment, Viewport};

/// Type of collision that ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the viewport
    Wall,
    /// Head bit the body
    SelfCollision,
}

/// Index of the first food within `pickup_radius` of the head.
///
/// Only one item is eaten per step; when several overlap the head the earliest
/// in the list wins.
pub fn find_food(head: Point, food: &[Food], pickup_radius: f64) -> Option<usize> {
    food.iter()
        .position(|f| head.distance_to(f.position()) < pickup_radius)
}

/// Whether the head overlaps any body segment from `skip` onward.
///
/// The first `skip` segments trail right behind the head and curl close to it
/// on tight turns, so they are never tested.
pub fn hits_body(head: Point, segments: &[Segment], skip: usize, radius: f64) -> bool {
    segments
        .iter()
        .skip(skip)
        .any(|segment| segment.distance_to(head) < radius)
}

/// Whether a point lies on the playfield, edges included
pub fn in_bounds(point: Point, viewport: Viewport) -> bool {
    viewport.contains(point)
}
