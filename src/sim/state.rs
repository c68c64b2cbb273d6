//! Game state and core simulation types
//!
//! All state that must be persisted for replay/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{EntityId, EntityPool};
use super::targeting::TargetingResolver;
use crate::config::GameConfig;
use crate::consts;

/// A falling word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub id: EntityId,
    pub text: String,
    /// Characters already matched, counted from the front
    pub typed: usize,
    pub pos: Vec2,
    /// Descent speed in pixels per second
    pub speed: f32,
}

impl Word {
    pub fn new(id: EntityId, text: String, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            text,
            typed: 0,
            pos,
            speed,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Next character the player must type, None once fully typed
    pub fn next_char(&self) -> Option<char> {
        self.text.chars().nth(self.typed)
    }

    /// The untyped tail of the word
    pub fn remaining(&self) -> &str {
        match self.text.char_indices().nth(self.typed) {
            Some((byte, _)) => &self.text[byte..],
            None => "",
        }
    }

    /// Advance the matched prefix by one character
    pub fn advance(&mut self) {
        debug_assert!(self.typed < self.char_count(), "advance past end of word");
        self.typed = (self.typed + 1).min(self.char_count());
    }

    pub fn is_complete(&self) -> bool {
        self.typed >= self.char_count()
    }
}

/// A bullet homing toward its target word. The target is held as an id,
/// never a reference: the word may die first, in which case the bullet is
/// discarded without detonating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    /// Where the bullet was fired from
    pub origin: Vec2,
    pub pos: Vec2,
    pub target: EntityId,
    /// Re-aimed at the target's current position every tick
    pub vel: Vec2,
}

impl Bullet {
    pub fn new(id: EntityId, origin: Vec2, target: EntityId, vel: Vec2) -> Self {
        Self {
            id,
            origin,
            pos: origin,
            target,
            vel,
        }
    }
}

/// Detonation effect left behind by a bullet. Scene transitions wait for
/// every explosion to burn out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: EntityId,
    pub pos: Vec2,
    pub remaining_frames: u32,
}

impl Explosion {
    pub fn new(id: EntityId, pos: Vec2, frames: u32) -> Self {
        Self {
            id,
            pos,
            remaining_frames: frames,
        }
    }

    pub fn tick_down(&mut self) {
        self.remaining_frames = self.remaining_frames.saturating_sub(1);
    }

    pub fn finished(&self) -> bool {
        self.remaining_frames == 0
    }
}

/// The player's ship. Singleton, owned by the playing scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    /// Facing angle in radians (0 = +x, +y down)
    pub orientation: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            orientation: consts::SHIP_REST_ANGLE,
        }
    }

    /// Rotate to face a point
    pub fn face(&mut self, target: Vec2) {
        self.orientation = crate::angle_to(self.pos, target);
    }

    /// Return to the rest facing (straight up)
    pub fn rest(&mut self) {
        self.orientation = consts::SHIP_REST_ANGLE;
    }
}

/// Things that happened during a tick, for frontends to react to
/// (sound cues, screen shake, HUD updates). Drained every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WordSpawned { id: EntityId },
    /// Fully typed; a bullet is on its way
    WordCompleted { id: EntityId },
    /// Bullet arrived, word removed, explosion spawned
    WordDestroyed { id: EntityId },
    /// A word crossed the defended line
    BoundaryBreached { id: EntityId },
    LifeLost { remaining: u32 },
    WaveStarted { index: usize },
    Victory,
    Defeat,
}

/// How a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Complete state of one run (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live RNG stream; serialized so a restored run continues, not restarts
    pub rng: Pcg32,
    /// Every live word, bullet and explosion
    pub pool: EntityPool,
    /// Keystroke lock state
    pub resolver: TargetingResolver,
    pub ship: Ship,
    pub lives: u32,
    /// Current wave (0-based)
    pub wave_index: usize,
    /// Words this wave has yet to spawn
    pub wave_remaining: usize,
    /// Ticks until the next spawn attempt
    pub spawn_cooldown: u32,
    /// "Get ready" countdown; keystrokes and spawns wait for zero
    pub ready_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Outcome waiting for bullets and explosions to finish
    pub pending_outcome: Option<Outcome>,
    /// Ticks until the autopilot may type again
    pub autoplay_cooldown: u32,
    /// Per-tick event feed (transient, drained by the caller)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl PlayState {
    /// Fresh run at wave 0 with the given seed
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        let wave_remaining = config.wave(0).map(|w| w.bag_size).unwrap_or(0);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            pool: EntityPool::new(),
            resolver: TargetingResolver::new(),
            ship: Ship::new(config.ship_pos),
            lives: config.start_lives,
            wave_index: 0,
            wave_remaining,
            spawn_cooldown: 0,
            ready_ticks: config.wave_ready_ticks,
            time_ticks: 0,
            pending_outcome: None,
            autoplay_cooldown: 0,
            events: Vec::new(),
        };
        state.events.push(GameEvent::WaveStarted { index: 0 });
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_word(text: &str) -> Word {
        let mut pool = EntityPool::new();
        let id = pool.spawn_word(text.to_string(), Vec2::ZERO, 60.0);
        pool.word(id).cloned().unwrap()
    }

    #[test]
    fn test_word_prefix_walk() {
        let mut word = test_word("cat");
        assert_eq!(word.next_char(), Some('c'));
        assert_eq!(word.remaining(), "cat");
        word.advance();
        assert_eq!(word.next_char(), Some('a'));
        assert_eq!(word.remaining(), "at");
        word.advance();
        word.advance();
        assert!(word.is_complete());
        assert_eq!(word.next_char(), None);
        assert_eq!(word.remaining(), "");
    }

    #[test]
    fn test_explosion_burns_out() {
        let mut pool = EntityPool::new();
        let id = pool.spawn_explosion(Vec2::ZERO, 2);
        let mut boom = pool.live_explosions().next().cloned().unwrap();
        assert_eq!(boom.id, id);
        assert!(!boom.finished());
        boom.tick_down();
        boom.tick_down();
        assert!(boom.finished());
        // Saturates at zero
        boom.tick_down();
        assert!(boom.finished());
    }

    #[test]
    fn test_ship_faces_target_and_rests() {
        let mut ship = Ship::new(Vec2::new(250.0, 675.0));
        assert_eq!(ship.orientation, consts::SHIP_REST_ANGLE);
        // Target directly above: orientation stays at rest angle
        ship.face(Vec2::new(250.0, 100.0));
        assert!((ship.orientation - consts::SHIP_REST_ANGLE).abs() < 1e-6);
        // Target to the right
        ship.face(Vec2::new(400.0, 675.0));
        assert!(ship.orientation.abs() < 1e-6);
        ship.rest();
        assert_eq!(ship.orientation, consts::SHIP_REST_ANGLE);
    }

    #[test]
    fn test_new_play_state_announces_first_wave() {
        let config = GameConfig::default();
        let state = PlayState::new(7, &config);
        assert_eq!(state.lives, config.start_lives);
        assert_eq!(state.wave_remaining, config.waves[0].bag_size);
        assert_eq!(state.events, vec![GameEvent::WaveStarted { index: 0 }]);
        assert!(state.pending_outcome.is_none());
    }

    #[test]
    fn test_play_state_round_trips_without_events() {
        let config = GameConfig::default();
        let mut state = PlayState::new(7, &config);
        state.events.push(GameEvent::Victory);
        let json = serde_json::to_string(&state).unwrap();
        let back: PlayState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, state.seed);
        assert_eq!(back.lives, state.lives);
        // Event feed is transient
        assert!(back.events.is_empty());
    }
}
