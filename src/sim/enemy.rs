//! Serpentine alien
//!
//! Position is a closed-form function of active age: a wide cosine sweep on x,
//! linear drift on y in the entry direction, and two sinusoidal wobbles with
//! different periods layered on top.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, FrameTimer, Hitbox};
use super::projectile::Projectile;
use crate::assets::{Assets, ENEMY_FRAMES, ImageId};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::frame_scale;

pub const ENEMY_SCALE: f32 = 0.48;
/// Age → path parameter
const PATH_RATE: f32 = 0.005;
const SWEEP_CENTER_OFFSET: f32 = 200.0;
const SWEEP_AMPLITUDE: f32 = 400.0;
const SWEEP_FREQ: f32 = 1.5;
const WOBBLE_X_AMPLITUDE: f32 = 50.0;
const WOBBLE_X_FREQ: f32 = 8.0;
const WOBBLE_Y_AMPLITUDE: f32 = 30.0;
const WOBBLE_Y_FREQ: f32 = 6.0;
/// Vertical drift per reference frame
const DRIFT_SPEED: f32 = 1.0;

const FRAME_INTERVAL: f32 = 2.0;

/// Vertical entry direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDirection {
    /// Enters at the top, drifts down
    Down,
    /// Enters at the bottom, drifts up
    Up,
}

impl EntryDirection {
    pub fn sign(self) -> f32 {
        match self {
            EntryDirection::Down => 1.0,
            EntryDirection::Up => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            EntryDirection::Down => EntryDirection::Up,
            EntryDirection::Up => EntryDirection::Down,
        }
    }

    fn start_y(self) -> f32 {
        match self {
            EntryDirection::Down => -250.0,
            EntryDirection::Up => CANVAS_HEIGHT + 50.0,
        }
    }
}

/// Path position at `age` reference frames after activation
pub fn path_position(start_y: f32, direction: EntryDirection, age: f32) -> Vec2 {
    let t = age * PATH_RATE;
    let x = (CANVAS_WIDTH - SWEEP_CENTER_OFFSET)
        + (t * SWEEP_FREQ).cos() * SWEEP_AMPLITUDE
        + (t * WOBBLE_X_FREQ).sin() * WOBBLE_X_AMPLITUDE;
    let y = start_y
        + age * DRIFT_SPEED * direction.sign()
        + (t * WOBBLE_Y_FREQ).cos() * WOBBLE_Y_AMPLITUDE;
    Vec2::new(x, y)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub direction: EntryDirection,
    start_y: f32,
    /// Reference frames left before activation
    pub delay: f32,
    pub age: f32,
    pub active: bool,
    shoot_timer: f32,
    /// Ping-pong animation cursor
    pub frame: u8,
    frame_step: i8,
    anim: FrameTimer,
    pub marked: bool,
}

impl Enemy {
    pub fn new<R: Rng>(delay: f32, direction: EntryDirection, size: Vec2, rng: &mut R) -> Self {
        let start_y = direction.start_y();
        Self {
            pos: Vec2::new(CANVAS_WIDTH + 50.0, start_y),
            size,
            direction,
            start_y,
            delay,
            age: 0.0,
            active: false,
            shoot_timer: rng.random_range(50.0..150.0),
            frame: 0,
            frame_step: 1,
            anim: FrameTimer::default(),
            marked: false,
        }
    }

    /// Rendered size of the first animation frame
    pub fn size_for(assets: &Assets) -> Vec2 {
        let (w, h) = assets.size(ImageId::Enemy(0));
        Vec2::new(w, h) * ENEMY_SCALE
    }

    /// Advance along the path. May return a spit aimed at `target`.
    pub fn update<R: Rng>(&mut self, target: &Hitbox, rng: &mut R, dt: f32) -> Option<Projectile> {
        let fs = frame_scale(dt);
        if self.delay > 0.0 {
            self.delay -= fs;
            return None;
        }
        self.active = true;
        self.age += fs;
        self.pos = path_position(self.start_y, self.direction, self.age);

        let gone = match self.direction {
            EntryDirection::Down => self.pos.y > CANVAS_HEIGHT + 100.0,
            EntryDirection::Up => self.pos.y < -150.0,
        };
        if gone {
            self.marked = true;
        }

        let mut shot = None;
        self.shoot_timer -= fs;
        if self.shoot_timer <= 0.0 {
            if self.hitbox().on_screen() {
                let mouth = Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0);
                shot = Some(Projectile::alien_spit(mouth, target.center()));
            }
            self.shoot_timer = rng.random_range(100.0..200.0);
        }

        if self.anim.tick(fs, FRAME_INTERVAL) {
            self.advance_frame();
        }

        shot
    }

    fn advance_frame(&mut self) {
        let last = ENEMY_FRAMES as i16 - 1;
        let next = self.frame as i16 + self.frame_step as i16;
        if next >= last {
            self.frame = last as u8;
            self.frame_step = -1;
        } else if next <= 0 {
            self.frame = 0;
            self.frame_step = 1;
        } else {
            self.frame = next as u8;
        }
    }
}

impl Entity for Enemy {
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
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FRAME: f32 = 1.0 / 60.0;

    fn enemy(delay: f32, dir: EntryDirection) -> (Enemy, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(7);
        let e = Enemy::new(delay, dir, Vec2::new(80.0, 80.0), &mut rng);
        (e, rng)
    }

    #[test]
    fn test_delay_holds_enemy_offscreen() {
        let (mut e, mut rng) = enemy(40.0, EntryDirection::Down);
        let target = Hitbox::new(100.0, 200.0, 75.0, 37.0);
        for _ in 0..39 {
            e.update(&target, &mut rng, FRAME);
        }
        assert!(!e.active);
        assert_eq!(e.pos, Vec2::new(CANVAS_WIDTH + 50.0, -250.0));
        e.update(&target, &mut rng, FRAME);
        e.update(&target, &mut rng, FRAME);
        assert!(e.active);
    }

    #[test]
    fn test_path_start_points() {
        let p = path_position(-250.0, EntryDirection::Down, 0.0);
        assert!((p.x - (CANVAS_WIDTH - 200.0 + 400.0)).abs() < 1e-3);
        assert!((p.y - (-250.0 + 30.0)).abs() < 1e-3);
    }

    #[test]
    fn test_exit_edges() {
        let (mut e, mut rng) = enemy(0.0, EntryDirection::Down);
        let target = Hitbox::new(100.0, 200.0, 75.0, 37.0);
        e.age = 1000.0;
        e.update(&target, &mut rng, FRAME);
        assert!(e.marked);

        let (mut e, mut rng) = enemy(0.0, EntryDirection::Up);
        e.age = 800.0;
        e.update(&target, &mut rng, FRAME);
        assert!(e.marked);
    }

    #[test]
    fn test_shoots_at_player_only_when_visible() {
        let (mut e, mut rng) = enemy(0.0, EntryDirection::Down);
        let target = Hitbox::new(100.0, 200.0, 75.0, 37.0);
        // Middle of the path: on screen
        e.age = 400.0;
        e.shoot_timer = 0.5;
        let spit = e.update(&target, &mut rng, FRAME).expect("visible enemy fires");
        assert!((spit.vel.length() - 4.0).abs() < 1e-3);
        assert!(spit.vel.x < 0.0);

        let (mut e, mut rng) = enemy(0.0, EntryDirection::Down);
        e.shoot_timer = 0.5;
        // Age 1 sits above the top edge
        assert!(e.update(&target, &mut rng, FRAME).is_none());
        assert!(e.shoot_timer >= 100.0);
    }

    #[test]
    fn test_animation_ping_pongs() {
        let (mut e, _) = enemy(0.0, EntryDirection::Down);
        let mut seen_max = 0;
        let mut went_back = false;
        for _ in 0..(ENEMY_FRAMES as usize + 5) {
            e.advance_frame();
            seen_max = seen_max.max(e.frame);
            if seen_max == ENEMY_FRAMES - 1 && e.frame < seen_max {
                went_back = true;
            }
        }
        assert_eq!(seen_max, ENEMY_FRAMES - 1);
        assert!(went_back);
    }
}
