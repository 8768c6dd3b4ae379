//! Scrolling backdrop, ground strip and the terrain collision oracle
//!
//! The ground is two chained segments: a one-shot intro piece followed by a
//! loop piece that tiles forever. Both scroll at the same rate, so while the
//! intro is still visible the loop's leading edge sits exactly at
//! `intro.x + intro.width`; the loop only wraps once the intro is long gone.

use glam::Vec2;

use super::collision_map::CollisionMap;
use super::entity::Hitbox;
use super::parallax::ParallaxLayer;
use crate::assets::{Assets, ImageId};
use crate::consts::{BASE_SCROLL_SPEED, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::frame_scale;

/// Ground drawn at half the source resolution
pub const GROUND_SCALE: f32 = 0.5;
/// Ground speed relative to the base scroll speed
pub const GROUND_SPEED: f32 = 0.4;
/// Reference frames between reset and the ground starting to scroll
pub const GROUND_DELAY_FRAMES: f32 = 120.0;
/// Special obstacle height as a fraction of the view
pub const OBSTACLE_HEIGHT_FRACTION: f32 = 0.85;
/// Gap between the obstacle and the bottom edge
pub const OBSTACLE_BOTTOM_MARGIN: f32 = 10.0;
/// Fractional inset of the narrow-phase sample points
const OBSTACLE_SAMPLE_INSET: f32 = 0.2;

const START_BG_SPEED: f32 = 0.2;
const PLAY_BG_SPEED: f32 = 0.1;
const MIST_SPEED: f32 = 0.3;
const MIST_Y: f32 = -40.0;
const MIST_SCALE: f32 = 2.6;

/// Which backdrop is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvMode {
    #[default]
    Start,
    Play,
}

/// One piece of the ground strip
#[derive(Debug, Clone)]
pub struct GroundSegment {
    pub image: ImageId,
    /// World-space left edge
    pub x: f32,
    /// Scaled size
    pub width: f32,
    pub height: f32,
    pub map: CollisionMap,
}

impl GroundSegment {
    fn new(image: ImageId, assets: &Assets, x: f32) -> Self {
        let (w, h) = assets.size(image);
        Self {
            image,
            x,
            width: w * GROUND_SCALE,
            height: h * GROUND_SCALE,
            map: CollisionMap::build(&assets.image(image)),
        }
    }
}

/// The large single-instance obstacle
#[derive(Debug, Clone)]
pub struct SpecialObstacle {
    pub image: ImageId,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Scaled size / source size
    pub scale: f32,
    pub map: CollisionMap,
}

impl SpecialObstacle {
    /// Bottom-aligned y of the top edge
    pub fn y(&self) -> f32 {
        CANVAS_HEIGHT - self.height - OBSTACLE_BOTTOM_MARGIN
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y(), self.width, self.height)
    }

    fn is_solid_at(&self, p: Vec2) -> bool {
        if self.scale <= 0.0 {
            return false;
        }
        let lx = ((p.x - self.x) / self.scale).floor() as i32;
        let ly = ((p.y - self.y()) / self.scale).floor() as i32;
        self.map.is_solid(lx, ly)
    }
}

/// Owns every scrolling layer and answers terrain collision queries
#[derive(Debug, Clone)]
pub struct Environment {
    pub mode: EnvMode,
    pub base_speed: f32,
    pub bg_start: ParallaxLayer,
    pub bg_play: ParallaxLayer,
    pub mist: ParallaxLayer,
    /// Top of the ground band
    pub ground_y: f32,
    pub intro: GroundSegment,
    pub ground: GroundSegment,
    pub ground_started: bool,
    ground_timer: f32,
    pub obstacle: Option<SpecialObstacle>,
}

impl Environment {
    pub fn new(assets: &Assets) -> Self {
        let intro = GroundSegment::new(ImageId::GroundIntro, assets, CANVAS_WIDTH);
        let ground = GroundSegment::new(ImageId::Ground, assets, CANVAS_WIDTH + intro.width);
        let ground_y = CANVAS_HEIGHT - ground.height;

        Self {
            mode: EnvMode::Start,
            base_speed: BASE_SCROLL_SPEED,
            bg_start: ParallaxLayer::fill_height(
                ImageId::CaveStart,
                assets,
                START_BG_SPEED,
                CANVAS_HEIGHT,
            ),
            bg_play: ParallaxLayer::fill_height(
                ImageId::CavePlay,
                assets,
                PLAY_BG_SPEED,
                CANVAS_HEIGHT,
            ),
            mist: ParallaxLayer::new(ImageId::Mist, assets, MIST_SPEED, MIST_Y, MIST_SCALE),
            ground_y,
            intro,
            ground,
            ground_started: false,
            ground_timer: 0.0,
            obstacle: None,
        }
    }

    /// Switch the backdrop. Ground state is left alone.
    pub fn set_mode(&mut self, mode: EnvMode) {
        self.mode = mode;
    }

    /// Put the ground back off the right edge and drop the obstacle
    pub fn reset(&mut self) {
        self.ground_started = false;
        self.ground_timer = 0.0;
        self.intro.x = CANVAS_WIDTH;
        self.ground.x = CANVAS_WIDTH + self.intro.width;
        self.obstacle = None;
    }

    pub fn background(&self) -> &ParallaxLayer {
        match self.mode {
            EnvMode::Start => &self.bg_start,
            EnvMode::Play => &self.bg_play,
        }
    }

    /// Horizontal ground displacement for one update of `dt`
    pub fn ground_move_amount(&self, dt: f32) -> f32 {
        GROUND_SPEED * self.base_speed * frame_scale(dt)
    }

    pub fn update(&mut self, dt: f32, advance_ground: bool) {
        let dt = crate::sanitize_dt(dt);
        let base = self.base_speed;
        match self.mode {
            EnvMode::Start => self.bg_start.update(base, dt),
            EnvMode::Play => {
                self.bg_play.update(base, dt);
                self.mist.update(base, dt);
            }
        }

        if !advance_ground {
            return;
        }

        if !self.ground_started {
            self.ground_timer += frame_scale(dt);
            if self.ground_timer > GROUND_DELAY_FRAMES {
                self.ground_started = true;
                log::debug!("Ground started scrolling");
            }
        }

        if !self.ground_started {
            return;
        }

        let step = self.ground_move_amount(dt);
        self.intro.x -= step;
        self.ground.x -= step;
        if self.ground.width > 0.0 {
            while self.ground.x <= -self.ground.width {
                self.ground.x += self.ground.width;
            }
        }

        if let Some(obstacle) = self.obstacle.as_mut() {
            obstacle.x -= step;
            if obstacle.x < -obstacle.width {
                self.obstacle = None;
                log::info!("Special obstacle left the screen");
            }
        }
    }

    /// Obstacle first (always live), then three points along the lower edge
    /// against the ground once it is moving.
    pub fn check_collision(&self, player: &Hitbox) -> bool {
        if self.check_easter_egg_collision(player) {
            return true;
        }
        if !self.ground_started {
            return false;
        }

        let Hitbox { pos, size } = *player;
        let points = [
            Vec2::new(pos.x + 10.0, pos.y + size.y - 5.0),
            Vec2::new(pos.x + size.x / 2.0, pos.y + size.y - 2.0),
            Vec2::new(pos.x + size.x - 10.0, pos.y + size.y - 5.0),
        ];
        points.iter().any(|p| self.check_point(p.x, p.y))
    }

    /// World point against whichever ground segment covers it
    pub fn check_point(&self, gx: f32, gy: f32) -> bool {
        if gy < self.ground_y {
            return false;
        }
        let local_y = ((gy - self.ground_y) / GROUND_SCALE).floor() as i32;

        let intro = &self.intro;
        if intro.x > -intro.width && gx >= intro.x && gx < intro.x + intro.width {
            let local_x = ((gx - intro.x) / GROUND_SCALE).floor() as i32;
            if intro.map.is_solid(local_x, local_y) {
                return true;
            }
        }

        let offset = gx - self.ground.x;
        if offset >= 0.0 && self.ground.width > 0.0 {
            let rel = offset % self.ground.width;
            let local_x = (rel / GROUND_SCALE).floor() as i32;
            if self.ground.map.is_solid(local_x, local_y) {
                return true;
            }
        }

        false
    }

    /// Broad-phase box test, then five inset sample points against the mask
    pub fn check_easter_egg_collision(&self, entity: &Hitbox) -> bool {
        let Some(obstacle) = &self.obstacle else {
            return false;
        };
        if !entity.overlaps(&obstacle.hitbox()) {
            return false;
        }

        let Hitbox { pos, size } = *entity;
        let inset = size * OBSTACLE_SAMPLE_INSET;
        let points = [
            Vec2::new(pos.x + inset.x, pos.y + inset.y),
            Vec2::new(pos.x + size.x - inset.x, pos.y + inset.y),
            Vec2::new(pos.x + inset.x, pos.y + size.y - inset.y),
            Vec2::new(pos.x + size.x - inset.x, pos.y + size.y - inset.y),
            entity.center(),
        ];
        points.iter().any(|&p| obstacle.is_solid_at(p))
    }

    /// Place the obstacle just past the right edge, scaled to 85% of the view
    pub fn spawn_easter_egg(&mut self, assets: &Assets) {
        let image = ImageId::GroundEaster;
        let (w, h) = assets.size(image);
        let scale = if h > 0.0 {
            CANVAS_HEIGHT * OBSTACLE_HEIGHT_FRACTION / h
        } else {
            1.0
        };
        self.obstacle = Some(SpecialObstacle {
            image,
            x: CANVAS_WIDTH,
            width: w * scale,
            height: h * scale,
            scale,
            map: CollisionMap::build(&assets.image(image)),
        });
        log::info!("Special obstacle spawned");
    }

    pub fn obstacle_present(&self) -> bool {
        self.obstacle.is_some()
    }

    /// Left edges of loop tiles covering the view (intro drawn separately)
    pub fn ground_tile_positions(&self) -> Vec<f32> {
        let mut out = Vec::new();
        if self.ground.width <= 0.0 {
            return out;
        }
        let mut cx = self.ground.x;
        while cx < CANVAS_WIDTH {
            if cx > -self.ground.width {
                out.push(cx.floor());
            }
            cx += self.ground.width;
        }
        out
    }

    /// Intro segment still overlaps the view
    pub fn intro_visible(&self) -> bool {
        self.intro.x > -self.intro.width && self.intro.x < CANVAS_WIDTH
    }
}
