//! Per-pixel opacity masks
//!
//! Built once per image, read-only afterwards.

use crate::assets::ImageData;
use crate::consts::ALPHA_THRESHOLD;

/// Solid/empty mask with the same dimensions as its source image
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMap {
    width: u32,
    height: u32,
    solid: Vec<bool>,
}

impl CollisionMap {
    /// Threshold the alpha channel of an image
    pub fn build(image: &ImageData) -> Self {
        let solid = image
            .rgba
            .chunks_exact(4)
            .map(|px| px[3] > ALPHA_THRESHOLD)
            .collect();
        Self {
            width: image.width,
            height: image.height,
            solid,
        }
    }

    /// Build directly from a predicate (tests and procedural shapes)
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut solid = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                solid.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            solid,
        }
    }

    /// False for anything outside `[0,width)×[0,height)`
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        self.solid
            .get((y as u32 * self.width + x as u32) as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of solid pixels
    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|&&s| s).count()
    }
}
