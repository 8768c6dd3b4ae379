//! Cosmic Parasite - a side-scrolling cave shooter
//!
//! Core modules:
//! - `sim`: Frame-rate independent simulation (terrain, entities, game flow)
//! - `renderer`: Draw surface abstraction and WebGPU sprite pipeline
//! - `platform`: Browser/native platform abstraction (input merging)
//! - `assets`, `audio`, `scores`: collaborators behind small contracts
//! - `settings`: Tunables persisted as JSON

pub mod assets;
pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod scores;
pub mod settings;
pub mod sim;

pub use assets::{Assets, ImageData, ImageId};
pub use scores::{ScoreEntry, ScoreManager};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical canvas resolution
    pub const CANVAS_WIDTH: f32 = 960.0;
    pub const CANVAS_HEIGHT: f32 = 540.0;

    /// Tunables are expressed per frame at this rate
    pub const REFERENCE_HZ: f32 = 60.0;
    /// dt used when the host hands us a zero/NaN delta
    pub const FALLBACK_DT: f32 = 0.016;

    /// Pixels with alpha above this are solid for collision purposes
    pub const ALPHA_THRESHOLD: u8 = 200;

    /// Base scroll speed in pixels per reference frame
    pub const BASE_SCROLL_SPEED: f32 = 2.0;
    /// Distance gained per simulated second (meters)
    pub const DISTANCE_PER_SECOND: f32 = 100.0;

    /// Points per collected coin
    pub const COIN_VALUE: u64 = 100;
}

/// Convert a real frame delta into reference-frame units (`dt * 60`)
#[inline]
pub fn frame_scale(dt: f32) -> f32 {
    dt * consts::REFERENCE_HZ
}

/// Replace a missing or nonsensical delta with the fallback
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        consts::FALLBACK_DT
    }
}
