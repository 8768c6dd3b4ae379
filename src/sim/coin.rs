//! Floating coin dropped by defeated enemies

use glam::Vec2;

use super::entity::{Entity, Hitbox};
use crate::assets::COIN_FRAMES;
use crate::frame_scale;

pub const COIN_SIZE: Vec2 = Vec2::new(40.0, 40.0);
/// ~10 s at 60 Hz
pub const COIN_LIFETIME_FRAMES: f32 = 600.0;
const FLOAT_RATE: f32 = 5.0;
const FLOAT_AMPLITUDE: f32 = 10.0;
const FRAME_INTERVAL: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub pos: Vec2,
    base_y: f32,
    float_timer: f32,
    pub life: f32,
    pub frame: u8,
    frame_timer: f32,
    pub marked: bool,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            base_y: pos.y,
            float_timer: 0.0,
            life: 0.0,
            frame: 0,
            frame_timer: 0.0,
            marked: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        let fs = frame_scale(dt);

        self.frame_timer += fs;
        if self.frame_timer >= FRAME_INTERVAL {
            self.frame_timer = 0.0;
            self.frame = (self.frame + 1) % COIN_FRAMES;
        }

        self.float_timer += dt * FLOAT_RATE;
        self.pos.y = self.base_y + self.float_timer.sin() * FLOAT_AMPLITUDE;

        self.life += fs;
        if self.life > COIN_LIFETIME_FRAMES {
            self.marked = true;
        }
    }
}

impl Entity for Coin {
    fn hitbox(&self) -> Hitbox {
        Hitbox {
            pos: self.pos,
            size: COIN_SIZE,
        }
    }

    fn is_marked(&self) -> bool {
        self.marked
    }

    fn mark(&mut self) {
        self.marked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_floats_around_baseline() {
        let mut c = Coin::new(Vec2::new(10.0, 100.0));
        for _ in 0..200 {
            c.update(FRAME);
            assert!((c.pos.y - 100.0).abs() <= 10.0 + 1e-4);
            assert_eq!(c.pos.x, 10.0);
        }
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut c = Coin::new(Vec2::ZERO);
        for _ in 0..595 {
            c.update(FRAME);
        }
        assert!(!c.marked);
        for _ in 0..10 {
            c.update(FRAME);
        }
        assert!(c.marked);
    }
}
