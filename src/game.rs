//! Scene stack and the embedding-facing facade
//!
//! Scenes are a closed set, so the stack is a tagged enum with pattern
//! matches rather than trait objects. Only the top scene sees input;
//! everything beneath stays allocated untouched.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::sim::snapshot::{SceneKind, Snapshot};
use crate::sim::state::{GameEvent, Outcome, PlayState};
use crate::sim::targeting::KeystrokeResult;
use crate::sim::tick::{TickInput, update_play};
use crate::wordbank::WordBank;

/// One scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameState {
    Intro,
    Playing(Box<PlayState>),
    /// Pause overlay; the run persists beneath it
    Paused,
    Win,
    Lose,
}

impl GameState {
    pub fn kind(&self) -> SceneKind {
        match self {
            GameState::Intro => SceneKind::Intro,
            GameState::Playing(_) => SceneKind::Playing,
            GameState::Paused => SceneKind::Paused,
            GameState::Win => SceneKind::Win,
            GameState::Lose => SceneKind::Lose,
        }
    }
}

/// Scene stack, bottom to top. Starts showing the intro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateStack {
    states: Vec<GameState>,
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStack {
    pub fn new() -> Self {
        Self {
            states: vec![GameState::Intro],
        }
    }

    /// Add a scene on top; the previous top keeps its state but stops
    /// receiving updates.
    pub fn push(&mut self, state: GameState) {
        self.states.push(state);
    }

    /// Discard the top scene, returning it to the caller
    pub fn pop(&mut self) -> Option<GameState> {
        self.states.pop()
    }

    /// Swap the top scene without touching those beneath
    pub fn replace_top(&mut self, state: GameState) {
        self.states.pop();
        self.states.push(state);
    }

    pub fn top(&self) -> Option<&GameState> {
        self.states.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut GameState> {
        self.states.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// Topmost running field, even when buried under an overlay
    pub fn playing(&self) -> Option<&PlayState> {
        self.states.iter().rev().find_map(|s| match s {
            GameState::Playing(play) => Some(play.as_ref()),
            _ => None,
        })
    }
}

/// What one facade tick produced
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// One result per keystroke processed
    pub key_results: Vec<KeystrokeResult>,
    /// Everything that happened, in order
    pub events: Vec<GameEvent>,
}

/// Owns a whole game: balance config, dictionary, scene stack.
///
/// Frontends call [`Game::tick`] at a fixed rate with that frame's input
/// and draw [`Game::snapshot`] afterwards.
pub struct Game {
    config: GameConfig,
    bank: WordBank,
    stack: StateStack,
    seed: u64,
}

impl Game {
    pub fn new(config: GameConfig, bank: WordBank, seed: u64) -> Self {
        Self {
            config,
            bank,
            stack: StateStack::new(),
            seed,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> SceneKind {
        self.stack
            .top()
            .map(GameState::kind)
            .unwrap_or(SceneKind::Intro)
    }

    /// The current run, if one exists (possibly paused)
    pub fn play_state(&self) -> Option<&PlayState> {
        self.stack.playing()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.scene(), SceneKind::Win | SceneKind::Lose)
    }

    /// Advance whatever scene is on top by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> TickReport {
        // Zero elapsed time is a hard no-op, scene changes included
        if dt <= 0.0 {
            return TickReport::default();
        }

        match self.scene() {
            SceneKind::Intro => {
                if input.start {
                    log::info!("run starting (seed {})", self.seed);
                    let play = PlayState::new(self.seed, &self.config);
                    self.stack.push(GameState::Playing(Box::new(play)));
                }
                TickReport::default()
            }
            SceneKind::Paused => {
                if input.pause {
                    log::info!("resumed");
                    self.stack.pop();
                }
                TickReport::default()
            }
            SceneKind::Win | SceneKind::Lose => TickReport::default(),
            SceneKind::Playing => {
                if input.pause {
                    log::info!("paused");
                    self.stack.push(GameState::Paused);
                    return TickReport::default();
                }

                let (update, events) = {
                    let Some(GameState::Playing(play)) = self.stack.top_mut() else {
                        return TickReport::default();
                    };
                    let update = update_play(play, input, dt, &self.config, &mut self.bank);
                    let events: Vec<GameEvent> = play.events.drain(..).collect();
                    (update, events)
                };

                if let Some(outcome) = update.transition {
                    let next = match outcome {
                        Outcome::Victory => GameState::Win,
                        Outcome::Defeat => GameState::Lose,
                    };
                    log::info!("run over: {:?}", outcome);
                    self.stack.replace_top(next);
                }

                TickReport {
                    key_results: update.key_results,
                    events,
                }
            }
        }
    }

    /// Read-only view of the current frame. A paused game still shows the
    /// field beneath its overlay.
    pub fn snapshot(&self) -> Snapshot<'_> {
        match self.stack.top() {
            Some(GameState::Playing(play)) => Snapshot::from_play(SceneKind::Playing, play),
            Some(GameState::Paused) => match self.stack.playing() {
                Some(play) => Snapshot::from_play(SceneKind::Paused, play),
                None => Snapshot::empty(SceneKind::Paused),
            },
            Some(GameState::Win) => Snapshot::empty(SceneKind::Win),
            Some(GameState::Lose) => Snapshot::empty(SceneKind::Lose),
            Some(GameState::Intro) | None => Snapshot::empty(SceneKind::Intro),
        }
    }
}
