//! Draw list to GPU vertices
//!
//! Each primitive becomes one or more textured quads (two triangles, no index
//! buffer). Consecutive quads sharing a texture collapse into one draw call,
//! so the painter's order of the draw list is preserved exactly.

use std::ops::Range;

use crate::assets::ImageId;

use super::font;
use super::surface::{BlitOptions, Color, DrawCmd, DrawList, Rect};
use super::vertex::SpriteVertex;

/// Texture bound for a batch. Fills and text sample a 1x1 white texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Solid,
    Image(ImageId),
}

/// One draw call
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureKey,
    pub vertices: Range<u32>,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    vertices: Vec<SpriteVertex>,
    batches: Vec<Batch>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a frame's draw list. `image_size` gives the pixel size of
    /// each image so source rects can be normalized.
    pub fn build(&mut self, list: &DrawList, image_size: impl Fn(ImageId) -> (f32, f32)) {
        self.vertices.clear();
        self.batches.clear();

        for cmd in list.commands() {
            match cmd {
                DrawCmd::Blit { image, dest, opts } => {
                    let uv = source_uv(opts, image_size(*image));
                    let tint = Color::WHITE.with_alpha(opts.alpha);
                    self.push_quad(TextureKey::Image(*image), *dest, uv, tint);
                }
                DrawCmd::Fill { rect, color } => {
                    self.push_quad(TextureKey::Solid, *rect, SOLID_UV, *color);
                }
                DrawCmd::Text { text, x, y, style } => {
                    for rect in font::layout(text, *x, *y, style) {
                        self.push_quad(TextureKey::Solid, rect, SOLID_UV, style.color);
                    }
                }
            }
        }
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    fn push_quad(&mut self, texture: TextureKey, dest: Rect, uv: [f32; 4], color: Color) {
        let [u0, v0, u1, v1] = uv;
        let (x0, y0) = (dest.x, dest.y);
        let (x1, y1) = (dest.x + dest.w, dest.y + dest.h);
        let c = color.to_array();

        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            SpriteVertex::new(x0, y0, u0, v0, c),
            SpriteVertex::new(x0, y1, u0, v1, c),
            SpriteVertex::new(x1, y0, u1, v0, c),
            SpriteVertex::new(x1, y0, u1, v0, c),
            SpriteVertex::new(x0, y1, u0, v1, c),
            SpriteVertex::new(x1, y1, u1, v1, c),
        ]);
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(last) if last.texture == texture => last.vertices.end = end,
            _ => self.batches.push(Batch {
                texture,
                vertices: start..end,
            }),
        }
    }
}

const SOLID_UV: [f32; 4] = [0.5, 0.5, 0.5, 0.5];

/// Normalized `[u0, v0, u1, v1]`, with u swapped for mirrored blits
fn source_uv(opts: &BlitOptions, (w, h): (f32, f32)) -> [f32; 4] {
    let [u0, v0, u1, v1] = match opts.src {
        Some(src) if w > 0.0 && h > 0.0 => [
            src.x / w,
            src.y / h,
            (src.x + src.w) / w,
            (src.y + src.h) / h,
        ],
        _ => [0.0, 0.0, 1.0, 1.0],
    };
    if opts.flip_x {
        [u1, v0, u0, v1]
    } else {
        [u0, v0, u1, v1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{Surface, TextAlign, TextStyle};

    fn sizes(_: ImageId) -> (f32, f32) {
        (100.0, 50.0)
    }

    #[test]
    fn test_consecutive_quads_share_a_batch() {
        let mut list = DrawList::new();
        list.blit(ImageId::Logo, Rect::new(0.0, 0.0, 10.0, 10.0), BlitOptions::default());
        list.blit(ImageId::Logo, Rect::new(20.0, 0.0, 10.0, 10.0), BlitOptions::default());
        list.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK);
        list.text(
            "1",
            0.0,
            20.0,
            TextStyle::new(20.0, Color::WHITE, TextAlign::Left),
        );
        list.blit(ImageId::Logo, Rect::new(0.0, 0.0, 10.0, 10.0), BlitOptions::default());

        let mut batch = SpriteBatch::new();
        batch.build(&list, sizes);

        let keys: Vec<_> = batch.batches().iter().map(|b| b.texture).collect();
        assert_eq!(
            keys,
            vec![
                TextureKey::Image(ImageId::Logo),
                TextureKey::Solid,
                TextureKey::Image(ImageId::Logo),
            ]
        );
        assert_eq!(batch.batches()[0].vertices, 0..12);
        let total: u32 = batch.batches().iter().map(|b| b.vertices.len() as u32).sum();
        assert_eq!(total as usize, batch.vertices().len());
    }

    #[test]
    fn test_source_rect_and_flip() {
        let opts = BlitOptions {
            src: Some(Rect::new(50.0, 0.0, 50.0, 25.0)),
            flip_x: true,
            alpha: 0.5,
        };
        let mut list = DrawList::new();
        list.blit(ImageId::Missile, Rect::new(0.0, 0.0, 10.0, 10.0), opts);

        let mut batch = SpriteBatch::new();
        batch.build(&list, sizes);
        let top_left = batch.vertices()[0];
        assert_eq!(top_left.position, [0.0, 0.0]);
        assert_eq!(top_left.uv, [1.0, 0.0]);
        assert_eq!(top_left.color[3], 0.5);
        let bottom_right = batch.vertices()[5];
        assert_eq!(bottom_right.uv, [0.5, 0.5]);
    }
}
