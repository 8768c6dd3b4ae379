//! Rendering module
//!
//! Scene code draws through the [`Surface`] trait into a [`DrawList`]; the
//! WebGPU [`SpriteRenderer`] turns that list into batched textured quads.

pub mod batch;
pub mod font;
pub mod pipeline;
pub mod scene;
pub mod surface;
pub mod vertex;

pub use pipeline::SpriteRenderer;
pub use scene::draw_game;
pub use surface::{BlitOptions, Color, DrawCmd, DrawList, Rect, Surface, TextAlign, TextStyle};
