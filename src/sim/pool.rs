//! Entity pool: live game objects with stable identity
//!
//! All systems within a tick see a consistent population. `remove` only
//! marks an id doomed; doomed entities vanish from live iteration at once
//! but stay allocated until `commit_removals` compacts the pool at the
//! tick boundary, so in-progress iteration is never invalidated.

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bullet, Explosion, Word};

/// Stable entity identity. Allocated monotonically, never reused within
/// a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity kinds tracked by the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Word,
    Bullet,
    Explosion,
}

/// Owns every live Word, Bullet and Explosion. Iteration order is spawn
/// order for deterministic replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool {
    words: Vec<Word>,
    bullets: Vec<Bullet>,
    explosions: Vec<Explosion>,
    /// Next id to hand out
    next_id: u64,
    /// Ids marked for removal this tick
    doomed: HashSet<EntityId>,
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPool {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            next_id: 1,
            doomed: HashSet::new(),
        }
    }

    fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        debug_assert!(self.id_is_fresh(id), "entity id {id} already in use");
        id
    }

    fn id_is_fresh(&self, id: EntityId) -> bool {
        self.words.iter().all(|w| w.id != id)
            && self.bullets.iter().all(|b| b.id != id)
            && self.explosions.iter().all(|e| e.id != id)
    }

    pub fn spawn_word(&mut self, text: String, pos: Vec2, speed: f32) -> EntityId {
        let id = self.alloc_id();
        self.words.push(Word::new(id, text, pos, speed));
        id
    }

    pub fn spawn_bullet(&mut self, origin: Vec2, target: EntityId, vel: Vec2) -> EntityId {
        let id = self.alloc_id();
        self.bullets.push(Bullet::new(id, origin, target, vel));
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, frames: u32) -> EntityId {
        let id = self.alloc_id();
        self.explosions.push(Explosion::new(id, pos, frames));
        id
    }

    /// Mark an entity doomed. It disappears from live iteration now and is
    /// physically dropped by the next `commit_removals`.
    pub fn remove(&mut self, id: EntityId) {
        self.doomed.insert(id);
    }

    pub fn is_doomed(&self, id: EntityId) -> bool {
        self.doomed.contains(&id)
    }

    /// Compact doomed entities out of the pool. Call once per tick, after
    /// every system has run.
    pub fn commit_removals(&mut self) {
        if self.doomed.is_empty() {
            return;
        }
        let doomed = &self.doomed;
        self.words.retain(|w| !doomed.contains(&w.id));
        self.bullets.retain(|b| !doomed.contains(&b.id));
        self.explosions.retain(|e| !doomed.contains(&e.id));
        self.doomed.clear();
    }

    /// Live words in spawn order. Restartable: every call walks the full
    /// current population.
    pub fn live_words(&self) -> impl Iterator<Item = &Word> {
        let doomed = &self.doomed;
        self.words.iter().filter(move |w| !doomed.contains(&w.id))
    }

    pub fn live_words_mut(&mut self) -> impl Iterator<Item = &mut Word> {
        let doomed = &self.doomed;
        self.words
            .iter_mut()
            .filter(move |w| !doomed.contains(&w.id))
    }

    pub fn live_bullets(&self) -> impl Iterator<Item = &Bullet> {
        let doomed = &self.doomed;
        self.bullets.iter().filter(move |b| !doomed.contains(&b.id))
    }

    pub fn live_bullets_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        let doomed = &self.doomed;
        self.bullets
            .iter_mut()
            .filter(move |b| !doomed.contains(&b.id))
    }

    pub fn live_explosions(&self) -> impl Iterator<Item = &Explosion> {
        let doomed = &self.doomed;
        self.explosions
            .iter()
            .filter(move |e| !doomed.contains(&e.id))
    }

    pub fn live_explosions_mut(&mut self) -> impl Iterator<Item = &mut Explosion> {
        let doomed = &self.doomed;
        self.explosions
            .iter_mut()
            .filter(move |e| !doomed.contains(&e.id))
    }

    /// Live word by id. Doomed words read as already gone.
    pub fn word(&self, id: EntityId) -> Option<&Word> {
        if self.doomed.contains(&id) {
            return None;
        }
        self.words.iter().find(|w| w.id == id)
    }

    pub fn word_mut(&mut self, id: EntityId) -> Option<&mut Word> {
        if self.doomed.contains(&id) {
            return None;
        }
        self.words.iter_mut().find(|w| w.id == id)
    }

    pub fn contains_word(&self, id: EntityId) -> bool {
        self.word(id).is_some()
    }

    pub fn bullet_mut(&mut self, id: EntityId) -> Option<&mut Bullet> {
        if self.doomed.contains(&id) {
            return None;
        }
        self.bullets.iter_mut().find(|b| b.id == id)
    }

    pub fn live_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Word => self.live_words().count(),
            EntityKind::Bullet => self.live_bullets().count(),
            EntityKind::Explosion => self.live_explosions().count(),
        }
    }

    /// True while any bullet or explosion is still playing out. Scene
    /// transitions wait on this.
    pub fn animations_pending(&self) -> bool {
        self.live_bullets().next().is_some() || self.live_explosions().next().is_some()
    }
}
