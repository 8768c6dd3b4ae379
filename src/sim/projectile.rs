//! Missiles and enemy spit

use glam::Vec2;

use super::entity::{Entity, Facing, FrameTimer, Hitbox};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::frame_scale;

pub const MISSILE_SPEED: f32 = 6.0;
pub const MISSILE_SIZE: Vec2 = Vec2::new(45.0, 22.0);
/// Four times the player missile
pub const GIANT_MISSILE_SIZE: Vec2 = Vec2::new(180.0, 88.0);
pub const SPIT_SPEED: f32 = 4.0;
pub const SPIT_SIZE: Vec2 = Vec2::new(30.0, 15.0);

/// Missile sheet: 2 columns × 5 rows
pub const MISSILE_FRAMES: u32 = 10;
pub const MISSILE_SHEET_COLS: u32 = 2;
const MISSILE_FRAME_INTERVAL: f32 = 6.0;

const OFFSCREEN_MARGIN: f32 = 50.0;
const GIANT_OFFSCREEN_MARGIN: f32 = 300.0;

/// Projectile variant with its variant-specific state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    /// Player-fired, animated
    Missile { frame: u32, anim: FrameTimer },
    /// Barrage missile, animated, only stopped by the special obstacle
    GiantMissile { frame: u32, anim: FrameTimer },
    /// Enemy shot aimed at the player at spawn time
    AlienSpit,
}

impl ProjectileKind {
    pub fn is_giant(&self) -> bool {
        matches!(self, ProjectileKind::GiantMissile { .. })
    }

    /// Current sprite-sheet frame, if animated
    pub fn frame(&self) -> Option<u32> {
        match self {
            ProjectileKind::Missile { frame, .. } | ProjectileKind::GiantMissile { frame, .. } => {
                Some(*frame)
            }
            ProjectileKind::AlienSpit => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    pub marked: bool,
}

impl Projectile {
    /// Player missile travelling horizontally
    pub fn missile(pos: Vec2, facing: Facing) -> Self {
        Self {
            kind: ProjectileKind::Missile {
                frame: 0,
                anim: FrameTimer::default(),
            },
            pos,
            size: MISSILE_SIZE,
            vel: Vec2::new(MISSILE_SPEED * facing.sign(), 0.0),
            marked: false,
        }
    }

    pub fn giant_missile(pos: Vec2, facing: Facing) -> Self {
        Self {
            kind: ProjectileKind::GiantMissile {
                frame: 0,
                anim: FrameTimer::default(),
            },
            pos,
            size: GIANT_MISSILE_SIZE,
            vel: Vec2::new(MISSILE_SPEED * facing.sign(), 0.0),
            marked: false,
        }
    }

    /// Spit from `from` heading for `target`; straight left if they coincide
    pub fn alien_spit(from: Vec2, target: Vec2) -> Self {
        let delta = target - from;
        let vel = if delta.length() > 0.0 {
            delta.normalize() * SPIT_SPEED
        } else {
            Vec2::new(-SPIT_SPEED, 0.0)
        };
        Self {
            kind: ProjectileKind::AlienSpit,
            pos: from,
            size: SPIT_SIZE,
            vel,
            marked: false,
        }
    }

    pub fn facing(&self) -> Facing {
        if self.vel.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    pub fn update(&mut self, dt: f32) {
        let fs = frame_scale(dt);
        self.pos += self.vel * fs;

        let margin = if self.kind.is_giant() {
            GIANT_OFFSCREEN_MARGIN
        } else {
            OFFSCREEN_MARGIN
        };
        if self.pos.x > CANVAS_WIDTH + margin
            || self.pos.x < -margin
            || self.pos.y > CANVAS_HEIGHT + margin
            || self.pos.y < -margin
        {
            self.marked = true;
        }

        match &mut self.kind {
            ProjectileKind::Missile { frame, anim } | ProjectileKind::GiantMissile { frame, anim } => {
                if anim.tick(fs, MISSILE_FRAME_INTERVAL) {
                    *frame = (*frame + 1) % MISSILE_FRAMES;
                }
            }
            ProjectileKind::AlienSpit => {}
        }
    }
}

impl Entity for Projectile {
    fn hitbox(&self) -> Hitbox {
        Hitbox {
            pos: self.pos,
            size: self.size,
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
    fn test_missile_moves_with_facing() {
        let mut m = Projectile::missile(Vec2::new(100.0, 100.0), Facing::Left);
        m.update(FRAME);
        assert!((m.pos.x - 94.0).abs() < 1e-3);
        assert_eq!(m.facing(), Facing::Left);
    }

    #[test]
    fn test_spit_is_aimed_at_target() {
        let s = Projectile::alien_spit(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((s.vel.length() - SPIT_SPEED).abs() < 1e-4);
        assert!((s.vel.x - 2.4).abs() < 1e-4);
        let s = Projectile::alien_spit(Vec2::ONE, Vec2::ONE);
        assert_eq!(s.vel, Vec2::new(-SPIT_SPEED, 0.0));
    }

    #[test]
    fn test_offscreen_margins() {
        let mut m = Projectile::missile(Vec2::new(CANVAS_WIDTH + 45.0, 10.0), Facing::Right);
        m.update(FRAME);
        assert!(m.marked);

        let mut g = Projectile::giant_missile(Vec2::new(-250.0, 100.0), Facing::Right);
        g.update(FRAME);
        assert!(!g.marked);
    }

    #[test]
    fn test_missile_animation_wraps() {
        let mut m = Projectile::missile(Vec2::new(100.0, 100.0), Facing::Right);
        for _ in 0..(7 * MISSILE_FRAMES) {
            m.pos.x = 100.0;
            m.update(FRAME);
        }
        assert_eq!(m.kind.frame(), Some(0));
        assert_eq!(
            Projectile::alien_spit(Vec2::ZERO, Vec2::X).kind.frame(),
            None
        );
    }
}
