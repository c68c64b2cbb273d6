//! Typefall - deterministic core for a word-typing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, targeting, collisions, tick)
//! - `wordbank`: Dictionary loading and filtered random word draws
//! - `config`: Data-driven game balance
//! - `game`: State stack and the embedding-facing facade
//!
//! The crate owns no window, renderer or audio device. A frontend feeds
//! [`sim::TickInput`] into [`game::Game::tick`] at a fixed rate and draws
//! whatever [`game::Game::snapshot`] reports.

pub mod config;
pub mod game;
pub mod sim;
pub mod wordbank;

pub use config::{GameConfig, WaveSpec};
pub use game::{Game, GameState, StateStack, TickReport};
pub use wordbank::{WordBank, WordBankError, WordFilter};

use glam::Vec2;

/// Game constants
pub mod consts {
    /// Fixed simulation timestep in seconds (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena width in pixels (origin top-left, +y down)
    pub const ARENA_WIDTH: f32 = 500.0;
    /// Arena height in pixels
    pub const ARENA_HEIGHT: f32 = 900.0;

    /// Ship rest position
    pub const SHIP_X: f32 = ARENA_WIDTH / 2.0;
    pub const SHIP_Y: f32 = 675.0;
    /// Ship rest orientation: facing straight up the screen
    pub const SHIP_REST_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;

    /// Horizontal line words must not cross (level with the ship)
    pub const BOUNDARY_Y: f32 = SHIP_Y;

    /// Default word descent speed in pixels per second
    pub const WORD_SPEED: f32 = 60.0;
    /// Most words allowed on screen at once
    pub const MAX_LIVE_WORDS: usize = 3;
    /// Ticks between word spawns
    pub const SPAWN_COOLDOWN_TICKS: u32 = 60;

    /// Bullet flight speed in pixels per second
    pub const BULLET_SPEED: f32 = 1200.0;
    /// A bullet inside this distance of its target detonates
    pub const BULLET_HIT_RADIUS: f32 = 6.0;

    /// Explosion lifetime in ticks
    pub const EXPLOSION_FRAMES: u32 = 30;

    /// Lives at the start of a run
    pub const START_LIVES: u32 = 3;

    /// "Get ready" countdown ticks before each wave
    pub const WAVE_READY_TICKS: u32 = 180;

    /// How many recent draws the word bank refuses to repeat
    pub const REPEAT_WINDOW: usize = 8;

    /// Ticks between synthesized autoplay keystrokes
    pub const AUTOPLAY_KEY_TICKS: u32 = 6;
}

/// Unit vector from `from` toward `to`, or zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Screen-space angle from `from` to `to` in radians (0 = +x, +y down)
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to_normalizes() {
        let d = direction_to(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - 0.6).abs() < 1e-6);
        assert!((d.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_direction_to_coincident_is_zero() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(direction_to(p, p), Vec2::ZERO);
    }

    #[test]
    fn test_angle_to_cardinals() {
        let o = Vec2::ZERO;
        assert!((angle_to(o, Vec2::new(1.0, 0.0)) - 0.0).abs() < 1e-6);
        // +y is down the screen, so "below" is +FRAC_PI_2
        let below = angle_to(o, Vec2::new(0.0, 1.0));
        assert!((below - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let above = angle_to(o, Vec2::new(0.0, -1.0));
        assert!((above - consts::SHIP_REST_ANGLE).abs() < 1e-6);
    }
}
