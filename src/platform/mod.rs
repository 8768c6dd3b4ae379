//! Platform abstraction layer
//!
//! Handles browser/native differences for input capture. Raw events come in
//! from the host shell, logical per-frame state goes out.

pub mod input;

pub use input::{GamepadState, InputHandler, InputSnapshot};
