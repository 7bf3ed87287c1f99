//! Axis-aligned bounding box collision
//!
//! Sprites are squares or rectangles anchored at their top-left corner, in
//! screen coordinates (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// A square box of side `size`
    pub fn square(min: Vec2, size: f32) -> Self {
        Self::new(min, Vec2::splat(size))
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Shrink each side by `fraction` of the box size (forgiveness buffer)
    pub fn inset(&self, fraction: f32) -> Self {
        Self {
            min: self.min + self.size * fraction,
            size: self.size * (1.0 - 2.0 * fraction),
        }
    }

    /// Strict overlap test: touching edges do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Inclusive point containment
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

/// Player-vs-obstacle test: both boxes shrink by `buffer` before the AABB test
pub fn forgiving_overlap(a: &Aabb, b: &Aabb, buffer: f32) -> bool {
    a.inset(buffer).overlaps(&b.inset(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Aabb::square(Vec2::new(0.0, 0.0), 10.0);
        let b = Aabb::square(Vec2::new(5.0, 5.0), 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::square(Vec2::new(0.0, 0.0), 10.0);
        let b = Aabb::square(Vec2::new(10.0, 0.0), 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_inset_shrinks_each_side() {
        let a = Aabb::square(Vec2::new(10.0, 20.0), 100.0).inset(0.2);
        assert!((a.min.x - 30.0).abs() < 1e-4);
        assert!((a.min.y - 40.0).abs() < 1e-4);
        assert!((a.size.x - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_forgiveness_ignores_corner_graze() {
        // Full boxes overlap by 15px on each axis, inset boxes do not
        let player = Aabb::square(Vec2::new(0.0, 0.0), 100.0);
        let obstacle = Aabb::square(Vec2::new(85.0, 85.0), 60.0);
        assert!(player.overlaps(&obstacle));
        assert!(!forgiving_overlap(&player, &obstacle, 0.2));
    }

    #[test]
    fn test_forgiveness_still_catches_deep_overlap() {
        let player = Aabb::square(Vec2::new(0.0, 0.0), 100.0);
        let obstacle = Aabb::square(Vec2::new(50.0, 30.0), 60.0);
        assert!(forgiving_overlap(&player, &obstacle, 0.2));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let a = Aabb::square(Vec2::new(0.0, 0.0), 10.0);
        assert!(a.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!a.contains_point(Vec2::new(10.1, 5.0)));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, asz in 1.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bsz in 1.0f32..200.0,
        ) {
            let a = Aabb::square(Vec2::new(ax, ay), asz);
            let b = Aabb::square(Vec2::new(bx, by), bsz);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn inset_overlap_implies_full_overlap(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, asz in 1.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, bsz in 1.0f32..200.0,
        ) {
            let a = Aabb::square(Vec2::new(ax, ay), asz);
            let b = Aabb::square(Vec2::new(bx, by), bsz);
            if forgiving_overlap(&a, &b, 0.2) {
                prop_assert!(a.overlaps(&b));
            }
        }
    }
}
