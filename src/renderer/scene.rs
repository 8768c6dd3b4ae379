//! Draws a [`Game`] onto any [`Surface`]
//!
//! Pure function of game state plus the wall clock (for the pause blink).
//! Nothing here mutates the simulation.

use super::surface::{BlitOptions, Color, Rect, Surface, TextAlign, TextStyle};
use crate::assets::ImageId;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::scores::table_rows;
use crate::sim::environment::EnvMode;
use crate::sim::explosion::EXPLOSION_DRAW_SCALE;
use crate::sim::player::{SPRITE_FRAME_SIZE, SPRITE_FRAMES};
use crate::sim::projectile::{MISSILE_FRAMES, MISSILE_SHEET_COLS};
use crate::sim::{
    Coin, Enemy, Entity, Environment, Explosion, Facing, Game, GameState, ParallaxLayer, Player,
    Projectile, ProjectileKind,
};

const PLAYER_DRAW_SCALE: f32 = 0.6;
const PLAYER_DRAW_OFFSET: (f32, f32) = (-7.0, -13.0);
const MISSILE_FRAME_W: f32 = 215.0;
const MISSILE_FRAME_H: f32 = 85.0;
const MISSILE_DRAW_OFFSET_Y: f32 = -5.0;

const PLAY_DARKEN: f32 = 0.4;
const MIST_ALPHA: f32 = 0.3;

const LOGO_SCALE: f32 = 1.32;
const LOGO_Y: f32 = 50.0;
/// Updates per blink phase
const BLINK_PERIOD: u32 = 30;

const TABLE_WIDTH: f32 = 800.0;
const TABLE_HEIGHT: f32 = 340.0;
const TABLE_BORDER: f32 = 3.0;
const TABLE_LINE_HEIGHT: f32 = 28.0;
const TABLE_ROWS_PER_COLUMN: usize = 10;

const HUD_SCORE_STYLE: TextStyle = TextStyle::new(20.0, Color::YELLOW, TextAlign::Left);
const HUD_SMALL_STYLE: TextStyle = TextStyle::new(16.0, Color::GREY, TextAlign::Left);

/// Draw one full frame
pub fn draw_game(game: &Game, surface: &mut impl Surface, wall_secs: f64) {
    match game.state {
        GameState::Start => draw_start_screen(game, surface),
        GameState::Playing => draw_playing(game, surface, wall_secs),
        GameState::GameOver => draw_game_over(game, surface),
    }

    if game.fade.alpha > 0.0 {
        surface.fill_rect(
            Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
            Color::BLACK.with_alpha(game.fade.alpha),
        );
    }

    if game.settings.show_fps {
        surface.text(
            &format!("FPS: {}", game.fps.fps),
            CANVAS_WIDTH - 10.0,
            20.0,
            TextStyle::new(16.0, Color::CYAN, TextAlign::Right),
        );
    }
}

fn draw_layer(layer: &ParallaxLayer, surface: &mut impl Surface, alpha: f32) {
    for x in layer.tile_positions(CANVAS_WIDTH) {
        surface.blit(
            layer.image,
            Rect::new(x, layer.y, layer.tile_width, layer.tile_height),
            BlitOptions {
                alpha,
                ..BlitOptions::default()
            },
        );
    }
}

pub fn draw_environment(env: &Environment, surface: &mut impl Surface) {
    draw_layer(env.background(), surface, 1.0);

    if env.mode == EnvMode::Play {
        surface.fill_rect(
            Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
            Color::BLACK.with_alpha(PLAY_DARKEN),
        );
        draw_layer(&env.mist, surface, MIST_ALPHA);
    }

    if env.ground_started {
        if env.intro_visible() {
            let intro = &env.intro;
            surface.blit(
                intro.image,
                Rect::new(intro.x.floor(), env.ground_y, intro.width, intro.height),
                BlitOptions::default(),
            );
        }
        let ground = &env.ground;
        for x in env.ground_tile_positions() {
            surface.blit(
                ground.image,
                Rect::new(x, env.ground_y, ground.width, ground.height),
                BlitOptions::default(),
            );
        }
    }

    if let Some(obstacle) = &env.obstacle {
        surface.blit(
            obstacle.image,
            Rect::new(obstacle.x.floor(), obstacle.y(), obstacle.width, obstacle.height),
            BlitOptions::default(),
        );
    }
}

pub fn draw_projectile(proj: &Projectile, surface: &mut impl Surface) {
    match proj.kind {
        ProjectileKind::Missile { frame, .. } | ProjectileKind::GiantMissile { frame, .. } => {
            let frame = frame.min(MISSILE_FRAMES - 1);
            let col = (frame % MISSILE_SHEET_COLS) as f32;
            let row = (frame / MISSILE_SHEET_COLS) as f32;
            surface.blit(
                ImageId::Missile,
                Rect::new(
                    proj.pos.x,
                    proj.pos.y + MISSILE_DRAW_OFFSET_Y,
                    proj.size.x,
                    proj.size.y,
                ),
                BlitOptions {
                    src: Some(Rect::new(
                        col * MISSILE_FRAME_W,
                        row * MISSILE_FRAME_H,
                        MISSILE_FRAME_W,
                        MISSILE_FRAME_H,
                    )),
                    flip_x: proj.facing() == Facing::Left,
                    alpha: 1.0,
                },
            );
        }
        ProjectileKind::AlienSpit => surface.blit(
            ImageId::AlienSpit,
            Rect::new(proj.pos.x, proj.pos.y, proj.size.x, proj.size.y),
            BlitOptions::default(),
        ),
    }
}

pub fn draw_player(player: &Player, surface: &mut impl Surface) {
    for bullet in &player.bullets {
        draw_projectile(bullet, surface);
    }

    let x = player.pos.x + PLAYER_DRAW_OFFSET.0;
    let y = player.pos.y + PLAYER_DRAW_OFFSET.1;
    let dest = Rect::new(
        x,
        y,
        SPRITE_FRAME_SIZE.x * PLAYER_DRAW_SCALE,
        SPRITE_FRAME_SIZE.y * PLAYER_DRAW_SCALE,
    );

    if let Some(turn) = &player.turn {
        surface.blit(ImageId::Turn(turn.image_index()), dest, BlitOptions::default());
        return;
    }

    let sheet = match player.facing {
        Facing::Left => ImageId::HelicopterLeft,
        Facing::Right => ImageId::Helicopter,
    };
    let frame = player.frame.min(SPRITE_FRAMES - 1) as f32;
    surface.blit(
        sheet,
        dest,
        BlitOptions {
            src: Some(Rect::new(
                frame * SPRITE_FRAME_SIZE.x,
                0.0,
                SPRITE_FRAME_SIZE.x,
                SPRITE_FRAME_SIZE.y,
            )),
            ..BlitOptions::default()
        },
    );
}

pub fn draw_enemy(enemy: &Enemy, surface: &mut impl Surface) {
    if !enemy.active {
        return;
    }
    surface.blit(
        ImageId::Enemy(enemy.frame),
        Rect::new(enemy.pos.x, enemy.pos.y, enemy.size.x, enemy.size.y),
        BlitOptions::default(),
    );
}

pub fn draw_coin(coin: &Coin, surface: &mut impl Surface) {
    let hb = coin.hitbox();
    surface.blit(
        ImageId::Coin(coin.frame),
        Rect::new(hb.pos.x, hb.pos.y, hb.size.x, hb.size.y),
        BlitOptions::default(),
    );
}

/// `frame_size` is the unscaled explosion frame image size
pub fn draw_explosion(explosion: &Explosion, frame_size: (f32, f32), surface: &mut impl Surface) {
    let w = frame_size.0 * EXPLOSION_DRAW_SCALE;
    let h = frame_size.1 * EXPLOSION_DRAW_SCALE;
    surface.blit(
        ImageId::Explosion(explosion.frame),
        Rect::new(explosion.center.x - w / 2.0, explosion.center.y - h / 2.0, w, h),
        BlitOptions::default(),
    );
}

fn draw_hostiles(game: &Game, surface: &mut impl Surface) {
    for enemy in &game.enemies {
        draw_enemy(enemy, surface);
    }
    for proj in &game.enemy_projectiles {
        draw_projectile(proj, surface);
    }
}

fn draw_explosions(game: &Game, surface: &mut impl Surface) {
    for explosion in &game.explosions {
        let size = game.assets.size(ImageId::Explosion(explosion.frame));
        draw_explosion(explosion, size, surface);
    }
}

fn draw_playing(game: &Game, surface: &mut impl Surface, wall_secs: f64) {
    draw_environment(&game.env, surface);
    draw_player(&game.player, surface);
    draw_hostiles(game, surface);
    for coin in &game.coins {
        draw_coin(coin, surface);
    }
    draw_explosions(game, surface);

    draw_hud(game, surface);

    if game.show_dev_message {
        surface.text(
            "Under construction...",
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT / 2.0,
            TextStyle::new(48.0, Color::YELLOW, TextAlign::Center),
        );
    }

    if game.paused {
        draw_pause_overlay(surface, wall_secs);
    }
}

fn draw_hud(game: &Game, surface: &mut impl Surface) {
    surface.text(
        &format!("CASH: R$ {},00", game.score),
        20.0,
        30.0,
        HUD_SCORE_STYLE,
    );
    surface.text(
        &format!("DIST: {:.1} km", game.distance / 1000.0),
        20.0,
        50.0,
        HUD_SMALL_STYLE,
    );
    if game.god_mode {
        surface.text(
            "GOD MODE",
            20.0,
            80.0,
            TextStyle {
                color: Color::GREEN,
                ..HUD_SMALL_STYLE
            },
        );
    }
}

/// Dim the frozen frame; the label blinks every 500 ms of wall clock
pub fn draw_pause_overlay(surface: &mut impl Surface, wall_secs: f64) {
    surface.fill_rect(
        Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
        Color::BLACK.with_alpha(0.5),
    );
    if (wall_secs * 2.0).floor() as i64 % 2 == 0 {
        surface.text(
            "PAUSED",
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT / 2.0,
            TextStyle::new(48.0, Color::YELLOW, TextAlign::Center),
        );
    }
}

fn draw_game_over(game: &Game, surface: &mut impl Surface) {
    draw_environment(&game.env, surface);
    draw_hostiles(game, surface);
    draw_explosions(game, surface);
}

fn draw_start_screen(game: &Game, surface: &mut impl Surface) {
    draw_environment(&game.env, surface);

    let (lw, lh) = game.assets.size(ImageId::Logo);
    let (lw, lh) = (lw * LOGO_SCALE, lh * LOGO_SCALE);
    surface.blit(
        ImageId::Logo,
        Rect::new((CANVAS_WIDTH - lw) / 2.0, LOGO_Y, lw, lh),
        BlitOptions::default(),
    );

    if (game.blink_timer / BLINK_PERIOD) % 2 == 0 {
        surface.text(
            "Press any key to start!",
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT - 40.0,
            TextStyle::new(24.0, Color::GREEN, TextAlign::Center),
        );
    }

    if game.panel.is_shown() {
        draw_score_table(game, surface);
    }
}

fn draw_score_table(game: &Game, surface: &mut impl Surface) {
    let x = (CANVAS_WIDTH - TABLE_WIDTH) / 2.0;
    let y = game.panel.y;

    surface.fill_rect(
        Rect::new(x, y, TABLE_WIDTH, TABLE_HEIGHT),
        Color::BLACK.with_alpha(0.9),
    );
    let border = [
        Rect::new(x, y, TABLE_WIDTH, TABLE_BORDER),
        Rect::new(x, y + TABLE_HEIGHT - TABLE_BORDER, TABLE_WIDTH, TABLE_BORDER),
        Rect::new(x, y, TABLE_BORDER, TABLE_HEIGHT),
        Rect::new(x + TABLE_WIDTH - TABLE_BORDER, y, TABLE_BORDER, TABLE_HEIGHT),
    ];
    for edge in border {
        surface.fill_rect(edge, Color::GREEN);
    }

    surface.text(
        "TOP 20 PILOTS",
        CANVAS_WIDTH / 2.0,
        y + 35.0,
        TextStyle::new(24.0, Color::GREEN, TextAlign::Center),
    );

    let col_width = TABLE_WIDTH / 2.0;
    let start_y = y + 60.0;
    for (i, (rank, name, score)) in table_rows(game.scores.high_scores()).into_iter().enumerate() {
        let col = (i / TABLE_ROWS_PER_COLUMN) as f32;
        let row = (i % TABLE_ROWS_PER_COLUMN) as f32;
        let cx = x + 20.0 + col * col_width;
        let cy = start_y + row * TABLE_LINE_HEIGHT;

        surface.text(
            &format!("{rank:02} {name}"),
            cx,
            cy,
            TextStyle::new(14.0, Color::MAGENTA, TextAlign::Left),
        );
        surface.text(
            &format!("R$ {},00", group_thousands(score)),
            cx + col_width - 40.0,
            cy,
            TextStyle::new(14.0, Color::YELLOW, TextAlign::Right),
        );
    }
}

/// `1234567` -> `1.234.567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::audio::SilentAudio;
    use crate::renderer::surface::{DrawCmd, DrawList};
    use crate::scores::ScoreManager;
    use crate::settings::Settings;
    use glam::Vec2;

    fn game() -> Game {
        Game::new(
            3,
            Assets::placeholders(),
            Settings::default(),
            Box::new(SilentAudio),
            ScoreManager::default(),
        )
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1.000");
        assert_eq!(group_thousands(1234567), "1.234.567");
    }

    #[test]
    fn test_start_screen_draws_logo_prompt_and_fps() {
        let g = game();
        let mut list = DrawList::new();
        draw_game(&g, &mut list, 0.0);
        assert_eq!(list.blits_of(ImageId::Logo).count(), 1);
        let texts: Vec<&str> = list.texts().collect();
        assert!(texts.contains(&"Press any key to start!"));
        assert!(texts.contains(&"FPS: 0"));
        // Ground has not started
        assert_eq!(list.blits_of(ImageId::Ground).count(), 0);
    }

    #[test]
    fn test_score_table_has_twenty_rows() {
        let mut g = game();
        g.panel.state = crate::sim::PanelState::Visible;
        let mut list = DrawList::new();
        draw_game(&g, &mut list, 0.0);
        let rows = list.texts().filter(|t| t.ends_with("---")).count();
        assert_eq!(rows, 20);
        assert!(list.texts().any(|t| t == "TOP 20 PILOTS"));
    }

    #[test]
    fn test_hud_and_pause_blink() {
        let mut g = game();
        g.start_game();
        g.score = 300;
        g.distance = 1250.0;
        g.god_mode = true;
        g.paused = true;

        let mut list = DrawList::new();
        draw_game(&g, &mut list, 0.1);
        let texts: Vec<&str> = list.texts().collect();
        assert!(texts.contains(&"CASH: R$ 300,00"));
        assert!(texts.contains(&"DIST: 1.2 km") || texts.contains(&"DIST: 1.3 km"));
        assert!(texts.contains(&"GOD MODE"));
        assert!(texts.contains(&"PAUSED"));

        list.clear();
        draw_game(&g, &mut list, 0.6);
        assert!(!list.texts().any(|t| t == "PAUSED"));
    }

    #[test]
    fn test_left_missile_is_flipped() {
        let mut list = DrawList::new();
        let proj = Projectile::missile(Vec2::new(10.0, 10.0), Facing::Left);
        draw_projectile(&proj, &mut list);
        let (dest, opts) = list.blits_of(ImageId::Missile).next().expect("missile drawn");
        assert!(opts.flip_x);
        assert_eq!(dest.y, 5.0);
        assert_eq!(opts.src, Some(Rect::new(0.0, 0.0, 215.0, 85.0)));
    }

    #[test]
    fn test_fade_overlay_drawn_last_before_fps() {
        let mut g = game();
        g.fade.alpha = 0.5;
        g.settings.show_fps = false;
        let mut list = DrawList::new();
        draw_game(&g, &mut list, 0.0);
        match list.commands().last() {
            Some(DrawCmd::Fill { color, .. }) => assert_eq!(color.a, 0.5),
            other => panic!("expected fade fill, got {other:?}"),
        }
    }

    #[test]
    fn test_explosion_centered() {
        let mut list = DrawList::new();
        let e = Explosion::new(Vec2::new(100.0, 100.0));
        draw_explosion(&e, (64.0, 64.0), &mut list);
        let (dest, _) = list.blits_of(ImageId::Explosion(0)).next().expect("drawn");
        assert_eq!(*dest, Rect::new(20.0, 20.0, 160.0, 160.0));
    }
}
