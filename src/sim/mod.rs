//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Every step is scaled by `frame_scale(dt)` so 60 Hz tunables hold at any rate
//! - Randomness comes from the game's seeded RNG only
//! - Entities are flagged for removal and pruned by their owner

pub mod coin;
pub mod collision_map;
pub mod enemy;
pub mod entity;
pub mod environment;
pub mod explosion;
pub mod fade;
pub mod panel;
pub mod parallax;
pub mod player;
pub mod projectile;
pub mod schedule;
pub mod state;
pub mod tick;

pub use coin::Coin;
pub use collision_map::CollisionMap;
pub use enemy::{Enemy, EntryDirection};
pub use entity::{Entity, Facing, Hitbox};
pub use environment::{EnvMode, Environment, SpecialObstacle};
pub use explosion::Explosion;
pub use fade::{FadeAction, FadeController, FadeState};
pub use panel::{PanelState, ScorePanel};
pub use parallax::ParallaxLayer;
pub use player::Player;
pub use projectile::{Projectile, ProjectileKind};
pub use schedule::{Barrage, DeferredTask, WaveSchedule, WaveTrigger};
pub use state::{Game, GameEvent, GameState};
