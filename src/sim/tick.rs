//! Fixed timestep simulation tick
//!
//! Core game loop that advances one run deterministically. The scene stack
//! lives a level up; this module only knows how to move the playing field
//! forward by one step.

use glam::Vec2;
use rand::Rng;

use super::collision::{advance_bullets, advance_words, decay_explosions};
use super::pool::{EntityId, EntityKind, EntityPool};
use super::state::{GameEvent, Outcome, PlayState};
use super::targeting::KeystrokeResult;
use crate::config::GameConfig;
use crate::direction_to;
use crate::wordbank::WordBank;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Characters typed since the last tick, in arrival order
    pub keys: Vec<char>,
    /// Start/confirm (leaves the intro)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the autopilot types for the player
    pub autoplay: bool,
}

/// What one playing-state tick produced
#[derive(Debug, Clone, Default)]
pub struct PlayUpdate {
    /// One result per keystroke processed this tick
    pub key_results: Vec<KeystrokeResult>,
    /// Scene change to apply once this tick is over
    pub transition: Option<Outcome>,
}

/// Advance the playing field by one fixed timestep.
///
/// Order inside a tick: keystrokes, spawning, word motion (with boundary
/// checks), bullets, explosion decay, ship facing, then the deferred
/// removals commit and end-of-run checks against the settled pool.
pub fn update_play(
    state: &mut PlayState,
    input: &TickInput,
    dt: f32,
    config: &GameConfig,
    bank: &mut WordBank,
) -> PlayUpdate {
    // Zero elapsed time advances nothing, no matter how often it is called
    if dt <= 0.0 {
        return PlayUpdate::default();
    }

    state.time_ticks += 1;

    // "Get ready" countdown: the field runs, input and spawning wait
    let input_live = state.ready_ticks == 0 && state.pending_outcome.is_none();
    if state.ready_ticks > 0 {
        state.ready_ticks -= 1;
    }

    let mut key_results = Vec::new();
    if input_live {
        for key in effective_keys(state, input, config) {
            let lock_before = state.resolver.locked_word();
            let result = state.resolver.on_keystroke(&mut state.pool, state.ship.pos, key);
            match result {
                KeystrokeResult::WordComplete => {
                    if let Some(word_id) = completed_without_bullet(&state.pool) {
                        fire_bullet(state, word_id, config);
                    }
                }
                KeystrokeResult::NoMatch => {
                    // A miss only hurts when the lock was held through it
                    let lock_held =
                        lock_before.is_some() && state.resolver.locked_word() == lock_before;
                    if config.damage_on_miss && lock_held {
                        lose_life(state);
                    }
                }
                KeystrokeResult::Advanced => {}
            }
            key_results.push(result);
        }

        spawn_due_word(state, config, bank);
    }

    // Word motion and boundary breaches
    let breaches = advance_words(&mut state.pool, state.ship.pos, config.boundary_y, dt);
    for breach in breaches {
        log::info!("word {} breached the line", breach.word);
        state.events.push(GameEvent::BoundaryBreached { id: breach.word });
        if state.pending_outcome.is_none() {
            lose_life(state);
        }
    }
    // The breached word may have been the locked one
    state.resolver.validate(&state.pool);

    let impacts = advance_bullets(
        &mut state.pool,
        config.bullet_speed,
        config.bullet_hit_radius,
        config.explosion_frames,
        dt,
    );
    for impact in impacts {
        state.events.push(GameEvent::WordDestroyed { id: impact.word });
    }

    decay_explosions(&mut state.pool);

    // Ship tracks the locked word, otherwise faces up the screen
    let target = state
        .resolver
        .locked_word()
        .and_then(|id| state.pool.word(id))
        .map(|w| w.pos);
    match target {
        Some(pos) => state.ship.face(pos),
        None => state.ship.rest(),
    }

    state.pool.commit_removals();

    check_wave_complete(state, config);

    // A queued outcome is released only once nothing is left animating
    let transition = state
        .pending_outcome
        .filter(|_| !state.pool.animations_pending());

    PlayUpdate {
        key_results,
        transition,
    }
}

/// Player keys, or one synthesized keystroke when the autopilot is driving
fn effective_keys(state: &mut PlayState, input: &TickInput, config: &GameConfig) -> Vec<char> {
    let mut keys = input.keys.clone();
    if input.autoplay {
        if state.autoplay_cooldown > 0 {
            state.autoplay_cooldown -= 1;
        }
        if keys.is_empty() && state.autoplay_cooldown == 0 {
            if let Some(key) = autoplay_key(state) {
                keys.push(key);
                state.autoplay_cooldown = config.autoplay_key_ticks;
            }
        }
    }
    keys
}

/// What the autopilot should type: the locked word's next character, or
/// the first character of the word nearest the ship.
fn autoplay_key(state: &PlayState) -> Option<char> {
    if let Some(id) = state.resolver.locked_word() {
        if let Some(word) = state.pool.word(id) {
            return word.next_char();
        }
    }
    let ship = state.ship.pos;
    state
        .pool
        .live_words()
        .filter(|w| w.next_char().is_some())
        .min_by(|a, b| {
            a.pos
                .distance_squared(ship)
                .total_cmp(&b.pos.distance_squared(ship))
                .then(a.pos.x.total_cmp(&b.pos.x))
                .then(a.id.cmp(&b.id))
        })
        .and_then(|w| w.next_char())
}

/// The word just typed to completion: fully typed and not yet claimed by
/// a bullet. Every earlier completed word already has one in flight.
fn completed_without_bullet(pool: &EntityPool) -> Option<EntityId> {
    pool.live_words()
        .filter(|w| w.is_complete())
        .find(|w| !pool.live_bullets().any(|b| b.target == w.id))
        .map(|w| w.id)
}

fn fire_bullet(state: &mut PlayState, word_id: EntityId, config: &GameConfig) {
    let Some(word) = state.pool.word(word_id) else {
        return;
    };
    let vel = direction_to(state.ship.pos, word.pos) * config.bullet_speed;
    state.pool.spawn_bullet(state.ship.pos, word_id, vel);
    state.events.push(GameEvent::WordCompleted { id: word_id });
}

/// Put one more word on the field if the wave still owes some, the spawn
/// cooldown has elapsed, and the field has room.
fn spawn_due_word(state: &mut PlayState, config: &GameConfig, bank: &mut WordBank) {
    if state.wave_remaining == 0 {
        return;
    }
    if state.spawn_cooldown > 0 {
        state.spawn_cooldown -= 1;
        return;
    }
    if state.pool.live_count(EntityKind::Word) >= config.max_live_words {
        return;
    }
    let Some(wave) = config.wave(state.wave_index) else {
        return;
    };
    match bank.draw(&mut state.rng, &wave.filter()) {
        Ok(text) => {
            let (min, max) = config.spawn_band();
            let pos = Vec2::new(
                state.rng.random_range(min.x..max.x),
                state.rng.random_range(min.y..max.y),
            );
            let id = state.pool.spawn_word(text, pos, config.word_speed);
            state.events.push(GameEvent::WordSpawned { id });
        }
        Err(e) => {
            // An unfillable slot would stall the wave forever; skip it
            log::warn!("skipping spawn slot: {e}");
        }
    }
    state.wave_remaining -= 1;
    state.spawn_cooldown = config.spawn_cooldown_ticks;
}

fn lose_life(state: &mut PlayState) {
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost {
        remaining: state.lives,
    });
    if state.lives == 0 && state.pending_outcome.is_none() {
        log::info!("out of lives, defeat queued");
        state.pending_outcome = Some(Outcome::Defeat);
        state.events.push(GameEvent::Defeat);
    }
}

/// Advance to the next wave once the field is clear of words, or queue
/// victory after the last one.
fn check_wave_complete(state: &mut PlayState, config: &GameConfig) {
    if state.pending_outcome.is_some() || state.ready_ticks > 0 {
        return;
    }
    if state.wave_remaining > 0 || state.pool.live_count(EntityKind::Word) > 0 {
        return;
    }
    let next = state.wave_index + 1;
    if next < config.wave_count() {
        log::info!("wave {} begins", next + 1);
        state.wave_index = next;
        state.wave_remaining = config.wave(next).map(|w| w.bag_size).unwrap_or(0);
        state.ready_ticks = config.wave_ready_ticks;
        state.spawn_cooldown = 0;
        state.events.push(GameEvent::WaveStarted { index: next });
    } else {
        log::info!("all waves cleared, victory queued");
        state.pending_outcome = Some(Outcome::Victory);
        state.events.push(GameEvent::Victory);
    }
}
