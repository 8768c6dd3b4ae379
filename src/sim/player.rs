//! The player's craft

use glam::Vec2;

use super::entity::{Entity, Facing, FrameTimer, Hitbox, prune};
use super::projectile::Projectile;
use crate::assets::TURN_FRAMES;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::frame_scale;
use crate::platform::InputSnapshot;

pub const PLAYER_SPEED: f32 = 2.0;
pub const PLAYER_SIZE: Vec2 = Vec2::new(75.0, 37.0);
/// Spawn position at construction
pub const PLAYER_START: Vec2 = Vec2::new(100.0, CANVAS_HEIGHT / 2.0);
/// Position used when a run starts or resets
pub const PLAYER_RESET: Vec2 = Vec2::new(100.0, 200.0);
pub const MAX_BULLETS: usize = 4;
/// Reference frames between shots
pub const SHOOT_COOLDOWN: f32 = 15.0;

/// Idle sheet: 4 frames of 150×112
pub const SPRITE_FRAMES: u32 = 4;
pub const SPRITE_FRAME_SIZE: Vec2 = Vec2::new(150.0, 112.0);
const FRAME_INTERVAL: f32 = 5.0;
const TURN_FRAME_INTERVAL: f32 = 7.0;

/// Non-interruptible turn in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turn {
    pub target: Facing,
    /// 0..TURN_FRAMES
    pub index: u8,
    pub timer: FrameTimer,
}

impl Turn {
    /// Turn image to show; the sequence plays backwards when turning left
    pub fn image_index(&self) -> u8 {
        let last = TURN_FRAMES - 1;
        let idx = self.index.min(last);
        match self.target {
            Facing::Left => last - idx,
            Facing::Right => idx,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub turn: Option<Turn>,
    /// Idle animation column
    pub frame: u32,
    anim: FrameTimer,
    pub bullets: Vec<Projectile>,
    shoot_timer: f32,
    can_shoot: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: PLAYER_START,
            size: PLAYER_SIZE,
            facing: Facing::Right,
            turn: None,
            frame: 0,
            anim: FrameTimer::default(),
            bullets: Vec::new(),
            shoot_timer: 0.0,
            can_shoot: true,
        }
    }

    /// Back to the run start position with no bullets in flight
    pub fn reset(&mut self) {
        self.pos = PLAYER_RESET;
        self.bullets.clear();
    }

    fn start_turn(&mut self, target: Facing) {
        self.turn = Some(Turn {
            target,
            index: 0,
            timer: FrameTimer::default(),
        });
    }

    fn steer(&mut self, wanted: Facing) {
        if self.turn.is_none() && self.facing != wanted {
            self.start_turn(wanted);
        }
    }

    /// Move, animate, maybe fire, then advance bullets.
    /// Returns true if a new bullet was created this frame.
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) -> bool {
        let fs = frame_scale(dt);
        let step = PLAYER_SPEED * fs;

        if input.up {
            self.pos.y -= step;
        }
        if input.down {
            self.pos.y += step;
        }
        if input.left {
            self.pos.x -= step;
            self.steer(Facing::Left);
        }
        if input.right {
            self.pos.x += step;
            self.steer(Facing::Right);
        }

        if let Some(turn) = self.turn.as_mut() {
            if turn.timer.tick(fs, TURN_FRAME_INTERVAL) {
                turn.index += 1;
                if turn.index >= TURN_FRAMES {
                    self.facing = turn.target;
                    self.turn = None;
                }
            }
        }

        self.pos.x = self.pos.x.clamp(0.0, CANVAS_WIDTH - self.size.x);
        self.pos.y = self.pos.y.clamp(0.0, CANVAS_HEIGHT - self.size.y);

        if self.anim.tick(fs, FRAME_INTERVAL) {
            self.frame = (self.frame + 1) % SPRITE_FRAMES;
        }

        // Semi-automatic: fire must be released before the next shot
        let mut fired = false;
        if input.fire {
            if self.can_shoot && self.shoot_timer <= 0.0 {
                fired = self.shoot();
                self.shoot_timer = SHOOT_COOLDOWN;
                self.can_shoot = false;
            }
        } else {
            self.can_shoot = true;
        }
        if self.shoot_timer > 0.0 {
            self.shoot_timer -= fs;
        }

        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        prune(&mut self.bullets);

        fired
    }

    /// Direction shots travel: a turn in progress fires toward its target
    pub fn fire_direction(&self) -> Facing {
        self.turn.map(|t| t.target).unwrap_or(self.facing)
    }

    fn shoot(&mut self) -> bool {
        if self.bullets.len() >= MAX_BULLETS {
            return false;
        }
        let dir = self.fire_direction();
        let x = match dir {
            Facing::Right => self.pos.x + self.size.x - 5.0,
            Facing::Left => self.pos.x - 20.0,
        };
        let y = self.pos.y + self.size.y / 2.0;
        self.bullets.push(Projectile::missile(Vec2::new(x, y), dir));
        log::debug!("Bullet fired ({} in flight)", self.bullets.len());
        true
    }
}

impl Entity for Player {
    fn hitbox(&self) -> Hitbox {
        Hitbox {
            pos: self.pos,
            size: self.size,
        }
    }

    // The player is never pruned from a collection
    fn is_marked(&self) -> bool {
        false
    }

    fn mark(&mut self) {}
}
