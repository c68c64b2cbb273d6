//! Data-driven game balance
//!
//! Everything the simulation treats as a knob lives here so frontends can
//! serialize a config, tweak it, and hand it back without recompiling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::wordbank::WordFilter;

/// One wave of the campaign: how many words it sends down and which
/// dictionary entries qualify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSpec {
    /// Words this wave sends down
    pub bag_size: usize,
    /// Shortest acceptable word length
    pub min_len: usize,
    /// Longest acceptable word length (None = unbounded)
    pub max_len: Option<usize>,
}

impl WaveSpec {
    pub fn new(bag_size: usize, min_len: usize, max_len: Option<usize>) -> Self {
        Self {
            bag_size,
            min_len,
            max_len,
        }
    }

    /// Dictionary filter for this wave
    pub fn filter(&self) -> WordFilter {
        WordFilter {
            min_len: self.min_len,
            max_len: self.max_len,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // === Arena ===
    /// Playfield width in pixels (origin top-left, +y down)
    pub arena_width: f32,
    /// Playfield height in pixels
    pub arena_height: f32,
    /// Ship rest position
    pub ship_pos: Vec2,
    /// Words crossing this horizontal line count as a breach
    pub boundary_y: f32,

    // === Words ===
    /// Descent speed in pixels per second
    pub word_speed: f32,
    /// Most words alive at once
    pub max_live_words: usize,
    /// Ticks between spawn attempts
    pub spawn_cooldown_ticks: u32,

    // === Bullets / explosions ===
    /// Bullet flight speed in pixels per second
    pub bullet_speed: f32,
    /// Bullets inside this distance of their target detonate
    pub bullet_hit_radius: f32,
    /// Explosion lifetime in ticks
    pub explosion_frames: u32,

    // === Player ===
    /// Lives at the start of a run
    pub start_lives: u32,
    /// Whether a mistyped key while locked on costs a life
    pub damage_on_miss: bool,

    // === Pacing ===
    /// "Get ready" countdown before each wave, in ticks
    pub wave_ready_ticks: u32,
    /// Recent draws the word bank refuses to repeat
    pub repeat_window: usize,
    /// Ticks between synthesized autoplay keystrokes
    pub autoplay_key_ticks: u32,

    /// The campaign, in play order
    pub waves: Vec<WaveSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Arena
            arena_width: consts::ARENA_WIDTH,
            arena_height: consts::ARENA_HEIGHT,
            ship_pos: Vec2::new(consts::SHIP_X, consts::SHIP_Y),
            boundary_y: consts::BOUNDARY_Y,

            // Words
            word_speed: consts::WORD_SPEED,
            max_live_words: consts::MAX_LIVE_WORDS,
            spawn_cooldown_ticks: consts::SPAWN_COOLDOWN_TICKS,

            // Bullets / explosions
            bullet_speed: consts::BULLET_SPEED,
            bullet_hit_radius: consts::BULLET_HIT_RADIUS,
            explosion_frames: consts::EXPLOSION_FRAMES,

            // Player
            start_lives: consts::START_LIVES,
            damage_on_miss: false,

            // Pacing
            wave_ready_ticks: consts::WAVE_READY_TICKS,
            repeat_window: consts::REPEAT_WINDOW,
            autoplay_key_ticks: consts::AUTOPLAY_KEY_TICKS,

            waves: default_waves(),
        }
    }
}

impl GameConfig {
    /// Wave spec by index, if the campaign has one
    pub fn wave(&self, index: usize) -> Option<&WaveSpec> {
        self.waves.get(index)
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    /// Band above the top edge where new words appear. Extends 25% past
    /// each side so entries drift in from off screen.
    pub fn spawn_band(&self) -> (Vec2, Vec2) {
        let overhang = self.arena_width * 0.125;
        let min = Vec2::new(-overhang, -64.0);
        let max = Vec2::new(self.arena_width + overhang, 0.0);
        (min, max)
    }
}

/// Stock campaign: short common words first, long rare ones last.
fn default_waves() -> Vec<WaveSpec> {
    vec![
        WaveSpec::new(5, 2, Some(4)),
        WaveSpec::new(10, 3, Some(4)),
        WaveSpec::new(15, 4, Some(4)),
        WaveSpec::new(20, 5, None),
        WaveSpec::new(20, 8, None),
    ]
}
