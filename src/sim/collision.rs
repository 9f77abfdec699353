//! Axis-aligned collision detection
//!
//! Every shooter entity is a box in screen space (y grows downward), so a
//! single strict-overlap test covers bullets, enemies, power-ups and the
//! player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Anything with a collision box
pub trait Bounds {
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Strict overlap test. Rectangles that only share an edge do not collide.
#[inline]
pub fn colliding(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}

/// Overlap test over two entities' collision boxes
#[inline]
pub fn overlaps(a: &impl Bounds, b: &impl Bounds) -> bool {
    colliding(&a.bounds(), &b.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        let b = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(colliding(&a, &b));
    }

    #[test]
    fn test_contained_box_collides() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 4.0, 10.0);
        assert!(colliding(&outer, &inner));
        assert!(colliding(&inner, &outer));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        // Shares the vertical edge x = 20
        let right = Rect::new(20.0, 0.0, 20.0, 20.0);
        // Shares the horizontal edge y = 20
        let below = Rect::new(0.0, 20.0, 20.0, 20.0);
        // Shares only the corner
        let corner = Rect::new(20.0, 20.0, 5.0, 5.0);

        assert!(!colliding(&a, &right));
        assert!(!colliding(&a, &below));
        assert!(!colliding(&a, &corner));
    }

    #[test]
    fn test_separated_boxes_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(50.0, 5.0, 10.0, 10.0);
        assert!(!colliding(&a, &b));
    }

    #[test]
    fn test_center() {
        let r = Rect::new(10.0, 20.0, 20.0, 10.0);
        assert_eq!(r.center(), Vec2::new(20.0, 25.0));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            0.5f32..200.0,
            0.5f32..200.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(colliding(&a, &b), colliding(&b, &a));
        }

        #[test]
        fn prop_edge_adjacent_never_collides(a in rect_strategy(), w in 0.5f32..200.0, dy in -100.0f32..100.0) {
            let b = Rect::new(a.right(), a.pos.y + dy, w, a.size.y);
            prop_assert!(!colliding(&a, &b));
            prop_assert!(!colliding(&b, &a));
        }

        #[test]
        fn prop_box_collides_with_itself(a in rect_strategy()) {
            prop_assert!(colliding(&a, &a));
        }
    }
}
