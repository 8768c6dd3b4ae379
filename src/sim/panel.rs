//! Start-screen high score panel animation

use crate::consts::CANVAS_HEIGHT;

const HIDDEN_SECS: f32 = 10.0;
const SLIDE_SECS: f32 = 1.0;
const VISIBLE_SECS: f32 = 15.0;

/// Below the bottom edge
pub const PANEL_OFFSCREEN_Y: f32 = CANVAS_HEIGHT + 100.0;
pub const PANEL_TARGET_Y: f32 = CANVAS_HEIGHT / 2.0 - 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    SlidingIn,
    Visible,
    SlidingOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorePanel {
    pub state: PanelState,
    timer: f32,
    /// Top edge of the table
    pub y: f32,
}

impl Default for ScorePanel {
    fn default() -> Self {
        Self {
            state: PanelState::Hidden,
            timer: 0.0,
            y: PANEL_OFFSCREEN_Y,
        }
    }
}

impl ScorePanel {
    pub fn is_shown(&self) -> bool {
        self.state != PanelState::Hidden
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update(&mut self, dt: f32) {
        self.timer += dt;
        let travel = PANEL_OFFSCREEN_Y - PANEL_TARGET_Y;
        match self.state {
            PanelState::Hidden => {
                if self.timer >= HIDDEN_SECS {
                    self.enter(PanelState::SlidingIn);
                }
            }
            PanelState::SlidingIn => {
                let p = (self.timer / SLIDE_SECS).min(1.0);
                let ease_out = 1.0 - (1.0 - p).powi(3);
                self.y = PANEL_OFFSCREEN_Y - travel * ease_out;
                if p >= 1.0 {
                    self.enter(PanelState::Visible);
                }
            }
            PanelState::Visible => {
                if self.timer >= VISIBLE_SECS {
                    self.enter(PanelState::SlidingOut);
                }
            }
            PanelState::SlidingOut => {
                let p = (self.timer / SLIDE_SECS).min(1.0);
                let ease_in = p.powi(3);
                self.y = PANEL_TARGET_Y + travel * ease_in;
                if p >= 1.0 {
                    self.enter(PanelState::Hidden);
                }
            }
        }
    }

    fn enter(&mut self, state: PanelState) {
        self.state = state;
        self.timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(panel: &mut ScorePanel, secs: f32) {
        let steps = (secs / 0.05).round() as usize;
        for _ in 0..steps {
            panel.update(0.05);
        }
    }

    #[test]
    fn test_cycle() {
        let mut p = ScorePanel::default();
        run(&mut p, 9.9);
        assert_eq!(p.state, PanelState::Hidden);
        run(&mut p, 0.2);
        assert_eq!(p.state, PanelState::SlidingIn);
        run(&mut p, 1.1);
        assert_eq!(p.state, PanelState::Visible);
        assert!((p.y - PANEL_TARGET_Y).abs() < 1e-3);
        run(&mut p, 15.1);
        assert_eq!(p.state, PanelState::SlidingOut);
        run(&mut p, 1.1);
        assert_eq!(p.state, PanelState::Hidden);
        assert!((p.y - PANEL_OFFSCREEN_Y).abs() < 1e-3);
    }

    #[test]
    fn test_slide_in_eases_out() {
        let mut p = ScorePanel::default();
        p.enter(PanelState::SlidingIn);
        p.update(0.5);
        // Ease-out: more than half the travel done at half time
        let travel = PANEL_OFFSCREEN_Y - PANEL_TARGET_Y;
        assert!(PANEL_OFFSCREEN_Y - p.y > travel * 0.5);
    }
}
