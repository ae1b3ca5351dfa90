use std::sync::atomic::{AtomicU64, Ordering};

use crate::game::Point;

/// Latest pointer sample, shared between the input side and the step loop.
///
/// Both coordinates are packed as `f32` bits into one `AtomicU64`, so a reader
/// always sees an x and y from the same sample. Only the newest value is kept.
#[derive(Debug)]
pub struct PointerCell {
    bits: AtomicU64,
}

impl PointerCell {
    pub fn new(initial: Point) -> Self {
        Self {
            bits: AtomicU64::new(pack(initial)),
        }
    }

    pub fn store(&self, point: Point) {
        self.bits.store(pack(point), Ordering::Release);
    }

    pub fn load(&self) -> Point {
        unpack(self.bits.load(Ordering::Acquire))
    }
}

impl Default for PointerCell {
    fn default() -> Self {
        Self::new(Point::default())
    }
}

fn pack(point: Point) -> u64 {
    let x = (point.x as f32).to_bits() as u64;
    let y = (point.y as f32).to_bits() as u64;
    (x << 32) | y
}

fn unpack(bits: u64) -> Point {
    let x = f32::from_bits((bits >> 32) as u32);
    let y = f32::from_bits(bits as u32);
    Point::new(f64::from(x), f64::from(y))
}
