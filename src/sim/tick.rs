//! Per-frame update
//!
//! `Game::update` is the single entry point the host calls once per animation
//! frame. It dispatches to the active state, runs the fade controller, and
//! polls wall-clock deferred tasks. The collision pipeline runs in a fixed
//! order; later rules skip anything an earlier rule already consumed.

use glam::Vec2;
use rand::Rng;

use super::coin::Coin;
use super::enemy::{Enemy, EntryDirection};
use super::entity::{Entity, Facing, prune};
use super::environment::EnvMode;
use super::explosion::{Explosion, prune_explosions};
use super::fade::FadeAction;
use super::player::PLAYER_RESET;
use super::projectile::Projectile;
use super::schedule::{
    BARRAGE_DISTANCE, DeferredTask, WAVE_SIZE, WAVE_SPACING_FRAMES, WaveTrigger,
};
use super::state::{Game, GameEvent, GameState};
use crate::audio::Track;
use crate::consts::{CANVAS_HEIGHT, COIN_VALUE, DISTANCE_PER_SECOND};
use crate::frame_scale;
use crate::platform::InputSnapshot;

/// Music fade when leaving the start screen
const START_MUSIC_FADE_SECS: f32 = 1.0;
/// Music fade after the player dies
const DEATH_MUSIC_FADE_SECS: f32 = 2.0;
/// Barrage missiles enter from behind the player
const GIANT_MISSILE_X: f32 = -250.0;
const GIANT_MISSILE_MIN_Y: f32 = 20.0;
const GIANT_MISSILE_Y_RANGE: f32 = CANVAS_HEIGHT - 150.0;

impl Game {
    /// Advance one animation frame.
    ///
    /// `raw_dt` is the wall-clock delta in seconds; it is clamped and scaled
    /// by the settings before reaching the simulation. `now` is wall-clock
    /// seconds and drives deferred tasks and the FPS counter.
    pub fn update(&mut self, input: &InputSnapshot, raw_dt: f32, now: f64) {
        self.clock = now;
        self.fps.tick(now);
        self.audio.tick(now);
        self.run_deferred(now);

        if input.cheat_toggled {
            self.god_mode = !self.god_mode;
            log::debug!("God mode {}", if self.god_mode { "on" } else { "off" });
            self.emit(GameEvent::GodModeToggled(self.god_mode));
        }

        if input.pause && self.state == GameState::Playing {
            self.set_paused(!self.paused);
        }
        if self.paused {
            return;
        }

        if self.audio.is_locked() && input.gamepad_active {
            self.audio.unlock();
        }

        let dt = self.settings.scale_dt(raw_dt, input.fast_forward);
        match self.state {
            GameState::Start => self.update_start_screen(input, dt),
            GameState::Playing => self.update_playing(input, dt),
            GameState::GameOver => self.update_game_over(input, dt),
        }

        if let Some(FadeAction::StartGame) = self.fade.update(dt) {
            self.start_game();
        }
    }

    fn run_deferred(&mut self, now: f64) {
        for task in self.deferred.drain_due(now) {
            match task {
                DeferredTask::ExplosionSound => self.audio.play_sfx(Track::Explosion),
                DeferredTask::RevealGameOver { generation } => {
                    if generation != self.generation || self.state != GameState::GameOver {
                        log::debug!("Dropping stale game-over reveal");
                        continue;
                    }
                    self.restart_prompt_visible = false;
                    self.emit(GameEvent::ShowGameOver { score: self.score });
                }
            }
        }
    }

    fn update_start_screen(&mut self, input: &InputSnapshot, dt: f32) {
        self.env.update(dt, false);
        self.start_screen_timer += dt;
        self.panel.update(dt);
        self.blink_timer = self.blink_timer.wrapping_add(1);

        if input.any_key
            && self.fade.is_idle()
            && self.start_screen_timer > self.settings.start_dwell_secs
        {
            self.fade.fade_out(FadeAction::StartGame);
            self.audio.fade_out(START_MUSIC_FADE_SECS);
        }
    }

    /// Flip to Playing. Runs when the start-screen fade reaches black.
    pub fn start_game(&mut self) {
        self.state = GameState::Playing;
        self.audio.play_music(Track::StageMusic);
        self.env.set_mode(EnvMode::Play);
        self.env.reset();
        self.player.pos = PLAYER_RESET;
        log::info!("Run started");
        self.emit(GameEvent::StateChanged(GameState::Playing));
    }

    fn update_playing(&mut self, input: &InputSnapshot, dt: f32) {
        self.distance += DISTANCE_PER_SECOND * dt;
        self.env.update(dt, true);

        if !self.fade.is_fading_out() && self.player.update(input, dt) {
            self.audio.play_sfx(Track::Shoot);
        }

        for trigger in self.waves.check(self.distance) {
            match trigger {
                WaveTrigger::Wave1 => {
                    let direction = if self.rng.random_bool(0.5) {
                        EntryDirection::Down
                    } else {
                        EntryDirection::Up
                    };
                    self.last_wave_direction = direction;
                    self.spawn_wave(direction);
                }
                WaveTrigger::Wave2 => self.spawn_wave(self.last_wave_direction.opposite()),
                WaveTrigger::SpawnObstacle => self.env.spawn_easter_egg(&self.assets),
            }
        }

        let armed = self.waves.obstacle_spawned && self.distance >= BARRAGE_DISTANCE;
        if self.barrage.update(armed, dt) {
            self.spawn_giant_missile();
        }

        if self.waves.obstacle_spawned && !self.env.obstacle_present() && !self.show_dev_message {
            self.show_dev_message = true;
            log::info!("Obstacle passed, showing construction banner");
        }

        let target = self.player.hitbox();
        for enemy in &mut self.enemies {
            if let Some(shot) = enemy.update(&target, &mut self.rng, dt) {
                self.enemy_projectiles.push(shot);
            }
        }
        prune(&mut self.enemies);

        for proj in &mut self.enemy_projectiles {
            proj.update(dt);
        }
        prune(&mut self.enemy_projectiles);

        for explosion in &mut self.explosions {
            explosion.update(dt);
        }
        prune_explosions(&mut self.explosions);

        for coin in &mut self.coins {
            coin.update(dt);
            if !coin.marked && coin.hitbox().overlaps(&target) {
                coin.mark();
                self.score += COIN_VALUE;
                self.audio.play_coin_sound();
            }
        }
        prune(&mut self.coins);

        self.resolve_collisions();
    }

    /// Run the seven collision rules in order, then drop everything marked
    pub fn resolve_collisions(&mut self) {
        let player_box = self.player.hitbox();

        // 1. Player bullets vs enemies, first hit wins
        for bullet in self.player.bullets.iter_mut().rev() {
            if bullet.marked {
                continue;
            }
            let bullet_box = bullet.hitbox();
            for enemy in self.enemies.iter_mut().rev() {
                if !enemy.active || enemy.marked {
                    continue;
                }
                let enemy_box = enemy.hitbox();
                if !enemy_box.on_screen() || !bullet_box.overlaps(&enemy_box) {
                    continue;
                }
                enemy.mark();
                bullet.mark();
                self.coins.push(Coin::new(enemy.pos));
                self.explosions.push(Explosion::new(enemy_box.center()));
                self.audio.play_sfx(Track::Explosion);
                log::debug!("Enemy destroyed");
                break;
            }
        }

        // 2. Player vs enemies
        let rammed = self.enemies.iter().position(|enemy| {
            let enemy_box = enemy.hitbox();
            enemy.active && !enemy.marked && enemy_box.on_screen() && player_box.overlaps(&enemy_box)
        });
        if let Some(index) = rammed {
            if !self.god_mode {
                self.kill_player(Some(index));
            }
        }

        // 3. Enemy projectiles vs player
        let mut shot_down = false;
        for proj in &mut self.enemy_projectiles {
            if !proj.marked && proj.hitbox().overlaps(&player_box) && !self.god_mode {
                proj.mark();
                shot_down = true;
            }
        }
        if shot_down {
            self.kill_player(None);
        }

        // 4. Player vs terrain
        if !self.god_mode && self.env.check_collision(&player_box) {
            self.kill_player(None);
        }

        // 5. Enemy projectiles vs special obstacle
        for proj in &mut self.enemy_projectiles {
            let proj_box = proj.hitbox();
            if proj.marked || !proj_box.on_screen_x() {
                continue;
            }
            if self.env.check_easter_egg_collision(&proj_box) {
                proj.mark();
                self.explosions.push(Explosion::new(proj_box.center()));
                self.audio.play_sfx(Track::Explosion);
            }
        }

        // 6. Player bullets vs special obstacle
        for bullet in &mut self.player.bullets {
            if bullet.marked {
                continue;
            }
            if self.env.check_easter_egg_collision(&bullet.hitbox()) {
                bullet.mark();
                self.explosions.push(Explosion::new(bullet.pos));
                self.audio.play_sfx(Track::Explosion);
            }
        }

        // 7. Player bullets vs giant missiles; the missile survives
        for bullet in self.player.bullets.iter_mut().rev() {
            if bullet.marked {
                continue;
            }
            let bullet_box = bullet.hitbox();
            let blocked = self.enemy_projectiles.iter().any(|proj| {
                let proj_box = proj.hitbox();
                proj.kind.is_giant()
                    && !proj.marked
                    && proj_box.on_screen_x()
                    && bullet_box.overlaps(&proj_box)
            });
            if blocked {
                bullet.mark();
                self.explosions.push(Explosion::new(bullet.pos));
                self.audio.play_sfx(Track::Explosion);
            }
        }

        prune(&mut self.player.bullets);
        prune(&mut self.enemies);
        prune(&mut self.enemy_projectiles);
        prune(&mut self.coins);
    }

    /// End the run. `enemy` is the index of an enemy that rammed the player.
    /// Does nothing unless a run is in progress.
    pub fn kill_player(&mut self, enemy: Option<usize>) {
        if self.state != GameState::Playing {
            return;
        }

        self.explosions.push(Explosion::new(self.player.hitbox().center()));
        if let Some(enemy) = enemy.and_then(|i| self.enemies.get_mut(i)) {
            let center = enemy.hitbox().center();
            enemy.mark();
            self.explosions.push(Explosion::new(center));
            self.coins.push(Coin::new(center));
        }

        self.audio.play_sfx(Track::Explosion);
        let now = self.clock;
        self.deferred.schedule(
            now,
            f64::from(self.settings.second_explosion_delay_secs),
            DeferredTask::ExplosionSound,
        );
        self.audio.fade_out(DEATH_MUSIC_FADE_SECS);

        self.state = GameState::GameOver;
        self.game_over_timer = 0.0;
        self.restart_prompt_visible = false;
        self.deferred.schedule(
            now,
            f64::from(self.settings.game_over_reveal_delay_secs),
            DeferredTask::RevealGameOver {
                generation: self.generation,
            },
        );
        log::info!(
            "Player down: score {}, distance {:.0} m",
            self.score,
            self.distance
        );
        self.emit(GameEvent::StateChanged(GameState::GameOver));
    }

    fn update_game_over(&mut self, input: &InputSnapshot, dt: f32) {
        self.game_over_timer += frame_scale(dt);

        for explosion in &mut self.explosions {
            explosion.update(dt);
        }
        prune_explosions(&mut self.explosions);

        let cooled_down = self.game_over_timer > self.settings.game_over_cooldown_frames as f32;
        if self.restart_prompt_visible && input.any_key && cooled_down {
            self.reset_game();
        }
    }

    /// Save `name` (trimmed, upper-cased) with the run's score and return to
    /// the start screen. Empty names skip the save. Returns whether a score
    /// was stored.
    pub fn submit_name(&mut self, name: &str) -> bool {
        if self.state != GameState::GameOver {
            return false;
        }
        let name = name.trim().to_uppercase();
        let saved = !name.is_empty() && self.scores.submit(&name, self.score);
        self.reset_game();
        saved
    }

    /// Close name entry without saving; a key press then restarts
    pub fn skip_name_entry(&mut self) {
        if self.state == GameState::GameOver {
            self.restart_prompt_visible = true;
        }
    }

    /// Back to the start screen with a clean run. High scores are kept.
    pub fn reset_game(&mut self) {
        self.state = GameState::Start;
        self.start_screen_timer = 0.0;
        self.game_over_timer = 0.0;
        self.restart_prompt_visible = false;
        self.paused = false;

        self.enemies.clear();
        self.coins.clear();
        self.enemy_projectiles.clear();
        self.explosions.clear();
        self.player.reset();

        self.waves.reset();
        self.barrage.reset();
        self.show_dev_message = false;
        self.score = 0;
        self.distance = 0.0;
        self.panel.reset();
        self.generation += 1;

        self.env.set_mode(EnvMode::Start);
        self.env.reset();
        self.audio.play_music(Track::IntroMusic);

        log::info!("Game reset");
        self.emit(GameEvent::HideGameOver);
        self.emit(GameEvent::StateChanged(GameState::Start));
    }

    /// Host hook for window blur
    pub fn on_focus_lost(&mut self) {
        if self.state == GameState::Playing && !self.paused {
            self.set_paused(true);
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.audio.pause();
            self.emit(GameEvent::Paused);
        } else {
            self.audio.resume();
            self.emit(GameEvent::Resumed);
        }
        log::debug!("Paused: {paused}");
    }

    fn spawn_wave(&mut self, direction: EntryDirection) {
        for i in 0..WAVE_SIZE {
            let delay = i as f32 * WAVE_SPACING_FRAMES;
            let enemy = Enemy::new(delay, direction, self.enemy_size, &mut self.rng);
            self.enemies.push(enemy);
        }
        log::info!(
            "Wave of {WAVE_SIZE} spawned at {:.0} m ({direction:?})",
            self.distance
        );
    }

    fn spawn_giant_missile(&mut self) {
        let y = self.rng.random_range(0.0..1.0) * GIANT_MISSILE_Y_RANGE + GIANT_MISSILE_MIN_Y;
        self.enemy_projectiles.push(Projectile::giant_missile(
            Vec2::new(GIANT_MISSILE_X, y),
            Facing::Right,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::audio::{AudioCall, RecordingAudio};
    use crate::scores::ScoreManager;
    use crate::settings::Settings;
    use crate::sim::entity::Hitbox;
    use crate::sim::schedule::OBSTACLE_DISTANCE;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME: f32 = 1.0 / 60.0;

    fn game() -> (Game, Rc<RefCell<Vec<AudioCall>>>) {
        let audio = RecordingAudio::new();
        let log = audio.log();
        let settings = Settings {
            time_scale: 1.0,
            ..Settings::default()
        };
        let game = Game::new(
            42,
            Assets::placeholders(),
            settings,
            Box::new(audio),
            ScoreManager::default(),
        );
        (game, log)
    }

    fn playing() -> (Game, Rc<RefCell<Vec<AudioCall>>>) {
        let (mut g, log) = game();
        g.start_game();
        g.drain_events();
        log.borrow_mut().clear();
        (g, log)
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    fn active_enemy(g: &mut Game, pos: Vec2) -> usize {
        let mut e = Enemy::new(0.0, EntryDirection::Down, Vec2::new(80.0, 80.0), &mut g.rng);
        e.active = true;
        e.pos = pos;
        g.enemies.push(e);
        g.enemies.len() - 1
    }

    #[test]
    fn test_start_needs_dwell_then_fades_in() {
        let (mut g, log) = game();
        let press = InputSnapshot {
            any_key: true,
            ..idle()
        };
        g.update(&press, FRAME, 0.0);
        assert!(g.fade.is_idle(), "dwell time not yet reached");

        let mut t = 0.0;
        for _ in 0..70 {
            t += f64::from(FRAME);
            g.update(&idle(), FRAME, t);
        }
        g.update(&press, FRAME, t);
        assert!(g.fade.is_fading_out());
        assert!(log.borrow().contains(&AudioCall::FadeOut(1.0)));

        for _ in 0..300 {
            t += f64::from(FRAME);
            g.update(&idle(), FRAME, t);
        }
        assert_eq!(g.state, GameState::Playing);
        assert_eq!(g.env.mode, EnvMode::Play);
        assert!(g.fade.is_idle());
        assert!(log.borrow().contains(&AudioCall::Music(Track::StageMusic)));
    }

    #[test]
    fn test_player_frozen_during_fade_out() {
        let (mut g, _) = playing();
        let before = g.player.pos;
        g.fade.fade_out(FadeAction::StartGame);
        let right = InputSnapshot {
            right: true,
            ..idle()
        };
        g.update_playing(&right, FRAME);
        assert_eq!(g.player.pos, before);
    }

    #[test]
    fn test_coin_collection_scores() {
        let (mut g, log) = playing();
        g.coins.push(Coin::new(g.player.pos));
        g.update_playing(&idle(), FRAME);
        assert_eq!(g.score, COIN_VALUE);
        assert!(g.coins.is_empty());
        assert!(log.borrow().contains(&AudioCall::Coin));
    }

    #[test]
    fn test_bullet_kills_enemy_and_drops_coin() {
        let (mut g, log) = playing();
        let i = active_enemy(&mut g, Vec2::new(400.0, 200.0));
        let enemy_pos = g.enemies[i].pos;
        g.player
            .bullets
            .push(Projectile::missile(Vec2::new(410.0, 220.0), Facing::Right));
        g.resolve_collisions();
        assert!(g.enemies.is_empty());
        assert!(g.player.bullets.is_empty());
        assert_eq!(g.coins.len(), 1);
        assert_eq!(g.coins[0].pos, enemy_pos);
        assert_eq!(g.explosions.len(), 1);
        assert_eq!(log.borrow().as_slice(), &[AudioCall::Sfx(Track::Explosion)]);
    }

    #[test]
    fn test_bullet_ignores_waiting_enemy() {
        let (mut g, _) = playing();
        let i = active_enemy(&mut g, Vec2::new(400.0, 200.0));
        g.enemies[i].active = false;
        g.player
            .bullets
            .push(Projectile::missile(Vec2::new(410.0, 220.0), Facing::Right));
        g.resolve_collisions();
        assert_eq!(g.enemies.len(), 1);
        assert_eq!(g.player.bullets.len(), 1);
    }

    #[test]
    fn test_ramming_enemy_ends_run() {
        let (mut g, log) = playing();
        g.clock = 5.0;
        let pos = g.player.pos;
        active_enemy(&mut g, pos);
        g.resolve_collisions();
        assert_eq!(g.state, GameState::GameOver);
        assert!(g.enemies.is_empty());
        assert_eq!(g.explosions.len(), 2);
        assert_eq!(g.coins.len(), 1);
        assert_eq!(g.pending_tasks(), 2);
        assert!(log.borrow().contains(&AudioCall::FadeOut(2.0)));
        assert_eq!(
            g.drain_events(),
            vec![GameEvent::StateChanged(GameState::GameOver)]
        );
    }

    #[test]
    fn test_god_mode_survives_everything() {
        let (mut g, _) = playing();
        g.god_mode = true;
        let pos = g.player.pos;
        active_enemy(&mut g, pos);
        g.enemy_projectiles.push(Projectile::alien_spit(pos, pos + Vec2::X));
        g.resolve_collisions();
        assert_eq!(g.state, GameState::Playing);
        // Projectile survives in god mode
        assert_eq!(g.enemy_projectiles.len(), 1);
    }

    #[test]
    fn test_projectile_hit_kills_once() {
        let (mut g, _) = playing();
        let pos = g.player.pos;
        g.enemy_projectiles.push(Projectile::alien_spit(pos, pos + Vec2::X));
        g.enemy_projectiles.push(Projectile::alien_spit(pos, pos + Vec2::X));
        g.resolve_collisions();
        assert_eq!(g.state, GameState::GameOver);
        assert!(g.enemy_projectiles.is_empty());
        // One death, one player explosion
        assert_eq!(g.explosions.len(), 1);
    }

    #[test]
    fn test_obstacle_stops_projectiles_and_bullets() {
        let (mut g, _) = playing();
        g.god_mode = true;
        g.env.spawn_easter_egg(&g.assets);
        let obstacle = g.env.obstacle.as_mut().expect("obstacle spawned");
        obstacle.x = 200.0;
        let c = obstacle.hitbox().center();

        g.enemy_projectiles
            .push(Projectile::giant_missile(c - Vec2::new(90.0, 44.0), Facing::Right));
        g.player
            .bullets
            .push(Projectile::missile(c - Vec2::new(22.0, 11.0), Facing::Right));
        g.resolve_collisions();
        assert!(g.enemy_projectiles.is_empty());
        assert!(g.player.bullets.is_empty());
        assert_eq!(g.explosions.len(), 2);
    }

    #[test]
    fn test_giant_missile_absorbs_bullets() {
        let (mut g, log) = playing();
        g.god_mode = true;
        g.enemy_projectiles
            .push(Projectile::giant_missile(Vec2::new(500.0, 300.0), Facing::Right));
        g.player
            .bullets
            .push(Projectile::missile(Vec2::new(520.0, 320.0), Facing::Right));
        g.resolve_collisions();
        assert!(g.player.bullets.is_empty());
        assert_eq!(g.enemy_projectiles.len(), 1);
        assert_eq!(g.explosions.len(), 1);
        assert_eq!(g.explosions[0].center, Vec2::new(520.0, 320.0));
        assert_eq!(log.borrow().as_slice(), &[AudioCall::Sfx(Track::Explosion)]);
    }

    #[test]
    fn test_terrain_kills_once_ground_moves() {
        let (mut g, _) = playing();
        // Solid placeholder ground: land the player on it
        g.env.ground_started = true;
        g.env.intro.x = 0.0;
        g.player.pos = Vec2::new(100.0, g.env.ground_y);
        g.resolve_collisions();
        assert_eq!(g.state, GameState::GameOver);
    }

    #[test]
    fn test_reveal_is_generation_guarded() {
        let (mut g, _) = playing();
        g.clock = 10.0;
        g.kill_player(None);
        g.drain_events();
        g.reset_game();
        g.drain_events();
        g.update(&idle(), FRAME, 12.0);
        assert!(!g.drain_events().iter().any(|e| matches!(e, GameEvent::ShowGameOver { .. })));

        let (mut g, _) = playing();
        g.score = 700;
        g.clock = 10.0;
        g.kill_player(None);
        g.update(&idle(), FRAME, 10.5);
        assert!(!g.drain_events().iter().any(|e| matches!(e, GameEvent::ShowGameOver { .. })));
        g.update(&idle(), FRAME, 11.1);
        assert!(g.drain_events().contains(&GameEvent::ShowGameOver { score: 700 }));
    }

    #[test]
    fn test_second_explosion_is_deferred() {
        let (mut g, log) = playing();
        g.clock = 1.0;
        g.kill_player(None);
        let count = |log: &Rc<RefCell<Vec<AudioCall>>>| {
            log.borrow()
                .iter()
                .filter(|c| **c == AudioCall::Sfx(Track::Explosion))
                .count()
        };
        assert_eq!(count(&log), 1);
        g.update(&idle(), FRAME, 1.2);
        assert_eq!(count(&log), 1);
        g.update(&idle(), FRAME, 1.31);
        assert_eq!(count(&log), 2);
    }

    #[test]
    fn test_restart_needs_prompt_and_cooldown() {
        let (mut g, _) = playing();
        g.kill_player(None);
        let press = InputSnapshot {
            any_key: true,
            ..idle()
        };
        for _ in 0..100 {
            g.update(&press, FRAME, 0.0);
        }
        assert_eq!(g.state, GameState::GameOver);

        g.skip_name_entry();
        g.game_over_timer = 0.0;
        g.update(&press, FRAME, 0.0);
        assert_eq!(g.state, GameState::GameOver);
        for _ in 0..70 {
            g.update(&press, FRAME, 0.0);
        }
        assert_eq!(g.state, GameState::Start);
    }

    #[test]
    fn test_submit_name_saves_trimmed_uppercase() {
        let (mut g, _) = playing();
        g.score = 1200;
        g.kill_player(None);
        assert!(g.submit_name("  maverick "));
        assert_eq!(g.state, GameState::Start);
        assert_eq!(g.scores.high_scores()[0].name, "MAVERICK");
        assert_eq!(g.scores.high_scores()[0].score, 1200);
    }

    #[test]
    fn test_submit_blank_name_skips_save() {
        let (mut g, _) = playing();
        g.kill_player(None);
        assert!(!g.submit_name("   "));
        assert_eq!(g.state, GameState::Start);
        assert!(g.scores.high_scores().is_empty());
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let (mut g, log) = playing();
        let pause = InputSnapshot {
            pause: true,
            ..idle()
        };
        g.update(&pause, FRAME, 0.0);
        assert!(g.paused);
        let d = g.distance;
        for _ in 0..10 {
            g.update(&idle(), FRAME, 0.0);
        }
        assert_eq!(g.distance, d);
        g.update(&pause, FRAME, 0.0);
        assert!(!g.paused);
        assert!(g.distance > d);
        assert_eq!(
            log.borrow().as_slice(),
            &[AudioCall::Pause, AudioCall::Resume]
        );
    }

    #[test]
    fn test_pause_ignored_outside_play() {
        let (mut g, _) = game();
        let pause = InputSnapshot {
            pause: true,
            ..idle()
        };
        g.update(&pause, FRAME, 0.0);
        assert!(!g.paused);
        g.on_focus_lost();
        assert!(!g.paused);
    }

    #[test]
    fn test_focus_loss_pauses_run() {
        let (mut g, _) = playing();
        g.on_focus_lost();
        assert!(g.paused);
        assert_eq!(g.drain_events(), vec![GameEvent::Paused]);
        g.on_focus_lost();
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_cheat_toggles_in_any_state() {
        let (mut g, _) = game();
        let cheat = InputSnapshot {
            cheat_toggled: true,
            ..idle()
        };
        g.update(&cheat, FRAME, 0.0);
        assert!(g.god_mode);
        assert_eq!(g.drain_events(), vec![GameEvent::GodModeToggled(true)]);
        g.update(&cheat, FRAME, 0.0);
        assert!(!g.god_mode);
    }

    #[test]
    fn test_gamepad_unlocks_audio() {
        let audio = RecordingAudio::locked();
        let log = audio.log();
        let mut g = Game::new(
            1,
            Assets::placeholders(),
            Settings::default(),
            Box::new(audio),
            ScoreManager::default(),
        );
        g.update(&idle(), FRAME, 0.0);
        assert!(!log.borrow().contains(&AudioCall::Unlock));
        let pad = InputSnapshot {
            gamepad_active: true,
            ..idle()
        };
        g.update(&pad, FRAME, 0.1);
        assert!(log.borrow().contains(&AudioCall::Unlock));
    }

    #[test]
    fn test_waves_alternate_direction() {
        let (mut g, _) = playing();
        g.god_mode = true;
        g.distance = 599.0;
        g.update_playing(&idle(), FRAME);
        assert_eq!(g.enemies.len(), WAVE_SIZE);
        let first = g.enemies[0].direction;
        assert_eq!(first, g.last_wave_direction);
        assert!(g.enemies[1].delay > g.enemies[0].delay);

        g.distance = 1699.0;
        g.update_playing(&idle(), FRAME);
        assert_eq!(g.enemies.len(), WAVE_SIZE * 2);
        assert_eq!(g.enemies[WAVE_SIZE].direction, first.opposite());
    }

    #[test]
    fn test_barrage_spawns_giant_missiles_on_left() {
        let (mut g, _) = playing();
        g.god_mode = true;
        g.waves.wave1_spawned = true;
        g.waves.wave2_spawned = true;
        g.distance = OBSTACLE_DISTANCE;
        for _ in 0..80 {
            g.update_playing(&idle(), FRAME);
        }
        let giants: Vec<&Projectile> = g
            .enemy_projectiles
            .iter()
            .filter(|p| p.kind.is_giant())
            .collect();
        assert!(!giants.is_empty());
        for p in giants {
            assert!(p.vel.x > 0.0);
            assert!(p.pos.y >= GIANT_MISSILE_MIN_Y - 1.0);
        }
    }

    #[test]
    fn test_dev_banner_after_obstacle_leaves() {
        let (mut g, _) = playing();
        g.god_mode = true;
        g.waves.obstacle_spawned = true;
        g.update_playing(&idle(), FRAME);
        assert!(g.show_dev_message);
    }

    #[test]
    fn test_reset_restores_clean_run() {
        let (mut g, log) = playing();
        g.score = 500;
        g.distance = 2000.0;
        g.coins.push(Coin::new(Vec2::ZERO));
        g.explosions.push(Explosion::new(Vec2::ZERO));
        g.kill_player(None);
        g.reset_game();
        assert_eq!(g.state, GameState::Start);
        assert_eq!(g.score, 0);
        assert_eq!(g.distance, 0.0);
        assert!(g.enemies.is_empty() && g.coins.is_empty() && g.explosions.is_empty());
        assert!(g.enemy_projectiles.is_empty() && g.player.bullets.is_empty());
        assert_eq!(g.env.mode, EnvMode::Start);
        assert!(!g.waves.wave1_spawned);
        assert_eq!(g.player.hitbox(), Hitbox { pos: PLAYER_RESET, size: g.player.size });
        assert_eq!(log.borrow().last(), Some(&AudioCall::Music(Track::IntroMusic)));
    }
}
