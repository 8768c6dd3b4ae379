//! One-shot explosion animation. Purely visual.

use glam::Vec2;

use super::entity::FrameTimer;
use crate::assets::EXPLOSION_FRAMES;
use crate::frame_scale;

/// Drawn this many times the frame image size, centered on `center`
pub const EXPLOSION_DRAW_SCALE: f32 = 2.5;
const FRAME_INTERVAL: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub center: Vec2,
    pub frame: u8,
    anim: FrameTimer,
    pub marked: bool,
}

impl Explosion {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            frame: 0,
            anim: FrameTimer::default(),
            marked: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.marked {
            return;
        }
        if self.anim.tick(frame_scale(dt), FRAME_INTERVAL) {
            self.frame += 1;
            if self.frame >= EXPLOSION_FRAMES {
                self.frame = EXPLOSION_FRAMES - 1;
                self.marked = true;
            }
        }
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }
}

/// Drop finished explosions
pub fn prune_explosions(explosions: &mut Vec<Explosion>) {
    explosions.retain(|e| !e.marked);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plays_once_then_marks() {
        let mut e = Explosion::new(Vec2::new(5.0, 5.0));
        let mut steps = 0;
        while !e.is_marked() {
            e.update(1.0 / 60.0);
            steps += 1;
            assert!(steps < 1000);
        }
        // Two reference frames per animation frame
        assert!(steps >= EXPLOSION_FRAMES as usize * 2 - 2);
        assert_eq!(e.frame, EXPLOSION_FRAMES - 1);

        let mut list = vec![e, Explosion::new(Vec2::ZERO)];
        prune_explosions(&mut list);
        assert_eq!(list.len(), 1);
    }
}
