//! Screen fade controller
//!
//! Alpha climbs to 1 during `FadeOut`, hands back the pending action exactly
//! once, then falls back to 0 during `FadeIn`.

use crate::frame_scale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeState {
    #[default]
    None,
    FadeOut,
    FadeIn,
}

/// What to do when the screen is fully black
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeAction {
    StartGame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FadeController {
    pub state: FadeState,
    /// Overlay opacity in [0, 1]
    pub alpha: f32,
    /// Alpha change per reference frame
    pub speed: f32,
    pending: Option<FadeAction>,
}

impl FadeController {
    pub fn new(speed: f32) -> Self {
        Self {
            state: FadeState::None,
            alpha: 0.0,
            speed,
            pending: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == FadeState::None
    }

    pub fn is_fading_out(&self) -> bool {
        self.state == FadeState::FadeOut
    }

    /// Begin fading to black; `action` fires when alpha reaches 1
    pub fn fade_out(&mut self, action: FadeAction) {
        self.state = FadeState::FadeOut;
        self.pending = Some(action);
    }

    /// Clear any transition immediately
    pub fn reset(&mut self) {
        self.state = FadeState::None;
        self.alpha = 0.0;
        self.pending = None;
    }

    /// Advance; returns the pending action on the frame the fade-out completes
    pub fn update(&mut self, dt: f32) -> Option<FadeAction> {
        let step = self.speed * frame_scale(dt);
        match self.state {
            FadeState::None => None,
            FadeState::FadeOut => {
                self.alpha += step;
                if self.alpha >= 1.0 {
                    self.alpha = 1.0;
                    self.state = FadeState::FadeIn;
                    self.pending.take()
                } else {
                    None
                }
            }
            FadeState::FadeIn => {
                self.alpha -= step;
                if self.alpha <= 0.0 {
                    self.alpha = 0.0;
                    self.state = FadeState::None;
                }
                None
            }
        }
    }
}
