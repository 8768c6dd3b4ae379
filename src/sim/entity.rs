//! Shared entity pieces: axis-aligned boxes, facing, deletion marking

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Axis-aligned box, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hitbox {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// At least partly inside the visible canvas
    pub fn on_screen(&self) -> bool {
        self.left() <= CANVAS_WIDTH
            && self.right() >= 0.0
            && self.top() <= CANVAS_HEIGHT
            && self.bottom() >= 0.0
    }

    /// Horizontally inside the canvas (vertical extent ignored)
    pub fn on_screen_x(&self) -> bool {
        self.left() <= CANVAS_WIDTH && self.right() >= 0.0
    }
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Anything with a box that can be flagged for removal by its owner
pub trait Entity {
    fn hitbox(&self) -> Hitbox;
    fn is_marked(&self) -> bool;
    fn mark(&mut self);
}

/// Drop every marked entity, preserving the order of the rest
pub fn prune<E: Entity>(items: &mut Vec<E>) {
    items.retain(|e| !e.is_marked());
}

/// Index of a frame that advances every `interval` reference frames
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameTimer {
    pub timer: f32,
}

impl FrameTimer {
    /// Accumulate `fs` frames; returns true when the interval is exceeded
    pub fn tick(&mut self, fs: f32, interval: f32) -> bool {
        self.timer += fs;
        if self.timer > interval {
            self.timer = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Hitbox::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Hitbox::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Hitbox::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_on_screen() {
        assert!(Hitbox::new(-5.0, -5.0, 10.0, 10.0).on_screen());
        assert!(!Hitbox::new(961.0, 10.0, 10.0, 10.0).on_screen());
        assert!(!Hitbox::new(10.0, -30.0, 10.0, 10.0).on_screen());
        assert!(Hitbox::new(10.0, -30.0, 10.0, 10.0).on_screen_x());
    }

    #[test]
    fn test_frame_timer_fires_after_interval() {
        let mut t = FrameTimer::default();
        assert!(!t.tick(1.0, 2.0));
        assert!(!t.tick(1.0, 2.0));
        assert!(t.tick(1.0, 2.0));
        assert_eq!(t.timer, 0.0);
    }
}
