//! 2D drawing surface
//!
//! The scene code only knows three primitives: blit an image, fill a
//! rectangle, draw a line of text. [`DrawList`] records them so the GPU
//! batcher (and tests) can consume a frame after the fact.

use crate::assets::ImageId;

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const GREY: Color = Color::rgb(0.667, 0.667, 0.667);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// How an image is sampled onto its destination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitOptions {
    /// Source region in image pixels; `None` means the whole image
    pub src: Option<Rect>,
    /// Mirror horizontally within the destination rect
    pub flip_x: bool,
    pub alpha: f32,
}

impl Default for BlitOptions {
    fn default() -> Self {
        Self {
            src: None,
            flip_x: false,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Cap height in pixels
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

impl TextStyle {
    pub const fn new(size: f32, color: Color, align: TextAlign) -> Self {
        Self { size, color, align }
    }
}

/// Drawing primitives at the logical resolution. `y` for text is the baseline.
pub trait Surface {
    fn blit(&mut self, image: ImageId, dest: Rect, opts: BlitOptions);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Blit {
        image: ImageId,
        dest: Rect,
        opts: BlitOptions,
    },
    Fill {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

/// Recording surface, replayed by the sprite batcher
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Every text string drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Blits of one image
    pub fn blits_of(&self, id: ImageId) -> impl Iterator<Item = (&Rect, &BlitOptions)> {
        self.cmds.iter().filter_map(move |c| match c {
            DrawCmd::Blit { image, dest, opts } if *image == id => Some((dest, opts)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn blit(&mut self, image: ImageId, dest: Rect, opts: BlitOptions) {
        if dest.w <= 0.0 || dest.h <= 0.0 || opts.alpha <= 0.0 {
            return;
        }
        self.cmds.push(DrawCmd::Blit { image, dest, opts });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.w <= 0.0 || rect.h <= 0.0 || color.a <= 0.0 {
            return;
        }
        self.cmds.push(DrawCmd::Fill { rect, color });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.cmds.push(DrawCmd::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_primitives_are_dropped() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 0.0, 10.0), Color::WHITE);
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE.with_alpha(0.0));
        list.text("", 0.0, 0.0, TextStyle::new(10.0, Color::WHITE, TextAlign::Left));
        assert!(list.is_empty());

        list.blit(ImageId::Logo, Rect::new(0.0, 0.0, 5.0, 5.0), BlitOptions::default());
        assert_eq!(list.blits_of(ImageId::Logo).count(), 1);
    }
}
