//! Horizontally tiling scroll layer

use crate::assets::{Assets, ImageId};
use crate::frame_scale;

/// One tiling background band
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub image: ImageId,
    /// Multiplier on the environment's base speed
    pub speed: f32,
    /// Scroll offset of the first tile, in (-tile_width, 0]
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub tile_width: f32,
    pub tile_height: f32,
}

impl ParallaxLayer {
    pub fn new(image: ImageId, assets: &Assets, speed: f32, y: f32, scale: f32) -> Self {
        let (w, h) = assets.size(image);
        Self {
            image,
            speed,
            x: 0.0,
            y,
            scale,
            tile_width: w * scale,
            tile_height: h * scale,
        }
    }

    /// Layer scaled so one tile exactly fills `view_height`
    pub fn fill_height(image: ImageId, assets: &Assets, speed: f32, view_height: f32) -> Self {
        let (_, h) = assets.size(image);
        let scale = if h > 0.0 { view_height / h } else { 1.0 };
        Self::new(image, assets, speed, 0.0, scale)
    }

    pub fn update(&mut self, base_speed: f32, dt: f32) {
        self.x -= self.speed * base_speed * frame_scale(dt);
        if self.tile_width > 0.0 && self.x <= -self.tile_width {
            // Large steps (fast-forward) can cross more than one tile
            self.x = self.x.rem_euclid(self.tile_width);
            if self.x > 0.0 {
                self.x -= self.tile_width;
            }
        }
    }

    /// Left edges of the tiles needed to cover `[0, view_width)`
    pub fn tile_positions(&self, view_width: f32) -> Vec<f32> {
        let mut out = Vec::new();
        if self.tile_width <= 0.0 {
            return out;
        }
        let mut cx = self.x;
        while cx < view_width {
            out.push(cx.floor());
            cx += self.tile_width;
        }
        out
    }
}
