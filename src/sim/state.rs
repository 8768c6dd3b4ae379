//! Game state and the types the host observes
//!
//! `Game` owns every piece of run state. The per-frame logic lives in
//! `tick.rs`; this file holds construction and the small accessors.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::coin::Coin;
use super::enemy::{Enemy, EntryDirection};
use super::environment::Environment;
use super::explosion::Explosion;
use super::fade::FadeController;
use super::panel::ScorePanel;
use super::player::Player;
use super::projectile::Projectile;
use super::schedule::{Barrage, DeferredQueue, WaveSchedule};
use crate::assets::Assets;
use crate::audio::{AudioSink, Track};
use crate::scores::ScoreManager;
use crate::settings::Settings;

/// Top-level flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Start,
    Playing,
    GameOver,
}

/// Output the host reacts to (UI panels, logging). Drained once per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    StateChanged(GameState),
    /// Reveal the game-over panel with the final score
    ShowGameOver { score: u64 },
    HideGameOver,
    GodModeToggled(bool),
    Paused,
    Resumed,
}

/// Frames counted per wall-clock second
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FpsCounter {
    frames: u32,
    window_start: Option<f64>,
    pub fps: u32,
}

impl FpsCounter {
    pub fn tick(&mut self, now: f64) {
        self.frames += 1;
        let start = *self.window_start.get_or_insert(now);
        if now - start >= 1.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now);
        }
    }
}

/// Complete game (run state plus collaborators)
pub struct Game {
    pub state: GameState,
    pub settings: Settings,
    pub assets: Assets,
    pub(super) audio: Box<dyn AudioSink>,
    pub scores: ScoreManager,
    pub(super) rng: Pcg32,

    pub env: Environment,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_projectiles: Vec<Projectile>,
    pub coins: Vec<Coin>,
    pub explosions: Vec<Explosion>,
    /// Enemy box size, derived from the sprite once
    pub(super) enemy_size: Vec2,

    pub score: u64,
    /// Meters travelled this run
    pub distance: f32,
    pub god_mode: bool,
    pub paused: bool,

    pub fade: FadeController,
    pub waves: WaveSchedule,
    pub last_wave_direction: EntryDirection,
    pub barrage: Barrage,
    pub(super) deferred: DeferredQueue,
    pub panel: ScorePanel,

    /// Seconds spent on the start screen
    pub start_screen_timer: f32,
    /// Reference frames since the run ended
    pub game_over_timer: f32,
    /// Name entry finished; a key press restarts
    pub restart_prompt_visible: bool,
    /// Banner shown once the special obstacle has gone by
    pub show_dev_message: bool,
    /// Bumped on every reset; stale deferred reveals compare against it
    pub generation: u64,
    /// Last wall-clock time handed to `update` (seconds)
    pub clock: f64,
    pub fps: FpsCounter,
    /// Start-screen updates, drives the prompt blink
    pub blink_timer: u32,

    pub(super) events: Vec<GameEvent>,
}

impl Game {
    pub fn new(
        seed: u64,
        assets: Assets,
        settings: Settings,
        mut audio: Box<dyn AudioSink>,
        mut scores: ScoreManager,
    ) -> Self {
        let env = Environment::new(&assets);
        let enemy_size = Enemy::size_for(&assets);
        let fade = FadeController::new(settings.fade_speed);
        let god_mode = settings.god_mode;

        audio.play_music(Track::IntroMusic);
        let loaded = scores.refresh().len();
        log::info!("Game created (seed {seed}, {loaded} high scores)");

        Self {
            state: GameState::Start,
            settings,
            assets,
            audio,
            scores,
            rng: Pcg32::seed_from_u64(seed),

            env,
            player: Player::new(),
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
            coins: Vec::new(),
            explosions: Vec::new(),
            enemy_size,

            score: 0,
            distance: 0.0,
            god_mode,
            paused: false,

            fade,
            waves: WaveSchedule::default(),
            last_wave_direction: EntryDirection::Down,
            barrage: Barrage::default(),
            deferred: DeferredQueue::new(),
            panel: ScorePanel::default(),

            start_screen_timer: 0.0,
            game_over_timer: 0.0,
            restart_prompt_visible: false,
            show_dev_message: false,
            generation: 0,
            clock: 0.0,
            fps: FpsCounter::default(),
            blink_timer: 0,

            events: Vec::new(),
        }
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deferred tasks still waiting on the wall clock
    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    /// Audio backend, for hosts that need to forward gestures to it
    pub fn audio_mut(&mut self) -> &mut dyn AudioSink {
        self.audio.as_mut()
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("score", &self.score)
            .field("distance", &self.distance)
            .field("enemies", &self.enemies.len())
            .field("enemy_projectiles", &self.enemy_projectiles.len())
            .field("coins", &self.coins.len())
            .field("explosions", &self.explosions.len())
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}
