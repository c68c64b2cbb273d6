//! Read-only scene description handed to frontends each tick
//!
//! The simulation never draws. Renderers take a [`Snapshot`], draw it, and
//! throw it away; nothing here can mutate the run.

use glam::Vec2;
use serde::Serialize;

use super::pool::EntityId;
use super::state::PlayState;

/// Which scene the stack is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SceneKind {
    Intro,
    Playing,
    Paused,
    Win,
    Lose,
}

/// One falling word as it should be drawn
#[derive(Debug, Clone, Serialize)]
pub struct WordView<'a> {
    pub id: EntityId,
    pub text: &'a str,
    /// Characters already typed off the front
    pub typed: usize,
    pub pos: Vec2,
    /// Whether this word currently holds the keystroke lock
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BulletView {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExplosionView {
    pub id: EntityId,
    pub pos: Vec2,
    pub remaining_frames: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub orientation: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub scene: SceneKind,
    pub words: Vec<WordView<'a>>,
    pub bullets: Vec<BulletView>,
    pub explosions: Vec<ExplosionView>,
    /// Present in play scenes only
    pub ship: Option<ShipView>,
    pub lives: u32,
    pub wave_index: usize,
    /// Remaining "get ready" ticks, zero once the wave is live
    pub ready_ticks: u32,
}

impl<'a> Snapshot<'a> {
    /// Scene with no playing field behind it (intro, win, lose)
    pub fn empty(scene: SceneKind) -> Snapshot<'static> {
        Snapshot {
            scene,
            words: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            ship: None,
            lives: 0,
            wave_index: 0,
            ready_ticks: 0,
        }
    }

    /// View of a live run
    pub fn from_play(scene: SceneKind, state: &'a PlayState) -> Snapshot<'a> {
        let words = state
            .pool
            .live_words()
            .map(|w| WordView {
                id: w.id,
                text: &w.text,
                typed: w.typed,
                pos: w.pos,
                locked: state.resolver.is_locked_on(w.id),
            })
            .collect();
        let bullets = state
            .pool
            .live_bullets()
            .map(|b| BulletView {
                id: b.id,
                pos: b.pos,
                vel: b.vel,
            })
            .collect();
        let explosions = state
            .pool
            .live_explosions()
            .map(|e| ExplosionView {
                id: e.id,
                pos: e.pos,
                remaining_frames: e.remaining_frames,
            })
            .collect();

        Snapshot {
            scene,
            words,
            bullets,
            explosions,
            ship: Some(ShipView {
                pos: state.ship.pos,
                orientation: state.ship.orientation,
            }),
            lives: state.lives,
            wave_index: state.wave_index,
            ready_ticks: state.ready_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_snapshot_marks_the_locked_word() {
        let config = GameConfig::default();
        let mut state = PlayState::new(7, &config);
        let near = state
            .pool
            .spawn_word("cot".into(), Vec2::new(250.0, 600.0), 60.0);
        let far = state
            .pool
            .spawn_word("cab".into(), Vec2::new(250.0, 50.0), 60.0);
        state
            .resolver
            .on_keystroke(&mut state.pool, state.ship.pos, 'c');

        let snap = Snapshot::from_play(SceneKind::Playing, &state);
        assert_eq!(snap.scene, SceneKind::Playing);
        assert_eq!(snap.words.len(), 2);
        for word in &snap.words {
            assert_eq!(word.locked, word.id == near);
        }
        assert!(snap.words.iter().any(|w| w.id == far));
        assert!(snap.ship.is_some());
        assert_eq!(snap.lives, config.start_lives);
    }

    #[test]
    fn test_snapshot_reflects_typed_prefix() {
        let config = GameConfig::default();
        let mut state = PlayState::new(7, &config);
        state
            .pool
            .spawn_word("cat".into(), Vec2::new(250.0, 300.0), 60.0);
        state
            .resolver
            .on_keystroke(&mut state.pool, state.ship.pos, 'c');

        let snap = Snapshot::from_play(SceneKind::Playing, &state);
        assert_eq!(snap.words[0].typed, 1);
        assert_eq!(snap.words[0].text, "cat");
    }

    #[test]
    fn test_empty_snapshot_has_no_field() {
        let snap = Snapshot::empty(SceneKind::Intro);
        assert_eq!(snap.scene, SceneKind::Intro);
        assert!(snap.words.is_empty());
        assert!(snap.ship.is_none());
    }

    #[test]
    fn test_snapshot_serializes_for_external_renderers() {
        let config = GameConfig::default();
        let mut state = PlayState::new(7, &config);
        state
            .pool
            .spawn_word("cat".into(), Vec2::new(250.0, 300.0), 60.0);
        let snap = Snapshot::from_play(SceneKind::Playing, &state);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"cat\""));
        assert!(json.contains("Playing"));
    }
}
