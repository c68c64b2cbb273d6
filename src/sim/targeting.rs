//! Keystroke targeting: which word owns the player's input
//!
//! One word at a time holds the lock. The first matching keystroke
//! acquires it and advances it; after that the lock is sticky, so a key
//! matching some other word's next character is a plain miss until the
//! locked word is finished or dies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{EntityId, EntityPool};

/// Outcome of one keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeResult {
    /// Nothing matched, or the key missed the locked word
    NoMatch,
    /// The locked word's typed prefix grew by one
    Advanced,
    /// The locked word is fully typed; the lock is released
    WordComplete,
}

/// Owns the current lock as a plain id, checked against the pool on every
/// use so a destroyed word can never be dereferenced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetingResolver {
    lock: Option<EntityId>,
}

impl TargetingResolver {
    pub fn new() -> Self {
        Self { lock: None }
    }

    /// Word currently claiming keystrokes, if any
    pub fn locked_word(&self) -> Option<EntityId> {
        self.lock
    }

    pub fn is_locked_on(&self, id: EntityId) -> bool {
        self.lock == Some(id)
    }

    /// Drop the lock when its word no longer exists. Called after words die
    /// by means other than typing (boundary loss).
    pub fn validate(&mut self, pool: &EntityPool) {
        if let Some(id) = self.lock {
            if !pool.contains_word(id) {
                self.lock = None;
            }
        }
    }

    /// Route one keystroke. `ship_pos` anchors the closest-word scan when
    /// no lock is held.
    pub fn on_keystroke(
        &mut self,
        pool: &mut EntityPool,
        ship_pos: Vec2,
        key: char,
    ) -> KeystrokeResult {
        // Dangling lock: the word was destroyed out from under us. Clear
        // and report a miss; this keystroke acquires nothing.
        if let Some(id) = self.lock {
            if !pool.contains_word(id) {
                self.lock = None;
                return KeystrokeResult::NoMatch;
            }
        }

        if self.lock.is_none() {
            self.lock = Self::acquire(pool, ship_pos, key);
            if self.lock.is_none() {
                return KeystrokeResult::NoMatch;
            }
        }

        let Some(id) = self.lock else {
            return KeystrokeResult::NoMatch;
        };
        let Some(word) = pool.word_mut(id) else {
            self.lock = None;
            return KeystrokeResult::NoMatch;
        };

        if word.next_char() == Some(key) {
            word.advance();
            if word.is_complete() {
                self.lock = None;
                KeystrokeResult::WordComplete
            } else {
                KeystrokeResult::Advanced
            }
        } else {
            // Wrong key: the lock stays where it is
            KeystrokeResult::NoMatch
        }
    }

    /// Closest live word to the ship whose next character matches the key.
    /// Ties break toward the leftmost word, then spawn order.
    fn acquire(pool: &EntityPool, ship_pos: Vec2, key: char) -> Option<EntityId> {
        pool.live_words()
            .filter(|w| w.next_char() == Some(key))
            .min_by(|a, b| {
                a.pos
                    .distance_squared(ship_pos)
                    .total_cmp(&b.pos.distance_squared(ship_pos))
                    .then(a.pos.x.total_cmp(&b.pos.x))
                    .then(a.id.cmp(&b.id))
            })
            .map(|w| w.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SHIP: Vec2 = Vec2::new(250.0, 675.0);

    fn pool_with(words: &[(&str, Vec2)]) -> (EntityPool, Vec<EntityId>) {
        let mut pool = EntityPool::new();
        let ids = words
            .iter()
            .map(|(text, pos)| pool.spawn_word(text.to_string(), *pos, 60.0))
            .collect();
        (pool, ids)
    }

    #[test]
    fn test_first_key_locks_closest_word() {
        // "cab" is far up the screen, "cot" is nearly on the ship
        let (mut pool, ids) = pool_with(&[
            ("cab", Vec2::new(250.0, 50.0)),
            ("cot", Vec2::new(250.0, 600.0)),
        ]);
        let mut resolver = TargetingResolver::new();

        let result = resolver.on_keystroke(&mut pool, SHIP, 'c');
        assert_eq!(result, KeystrokeResult::Advanced);
        assert!(resolver.is_locked_on(ids[1]));
        assert_eq!(pool.word(ids[1]).unwrap().typed, 1);
        assert_eq!(pool.word(ids[0]).unwrap().typed, 0);
    }

    #[test]
    fn test_equidistant_tie_breaks_leftmost() {
        // Mirrored around the ship's x: same distance, different x
        let (mut pool, ids) = pool_with(&[
            ("car", Vec2::new(350.0, 100.0)),
            ("cab", Vec2::new(150.0, 100.0)),
        ]);
        let mut resolver = TargetingResolver::new();

        resolver.on_keystroke(&mut pool, SHIP, 'c');
        assert!(resolver.is_locked_on(ids[1]));
    }

    #[test]
    fn test_lock_is_sticky_on_mismatch() {
        let (mut pool, ids) = pool_with(&[
            ("cat", Vec2::new(250.0, 600.0)),
            ("dog", Vec2::new(250.0, 100.0)),
        ]);
        let mut resolver = TargetingResolver::new();

        assert_eq!(
            resolver.on_keystroke(&mut pool, SHIP, 'c'),
            KeystrokeResult::Advanced
        );
        // 'd' would start "dog", but the lock on "cat" holds
        assert_eq!(
            resolver.on_keystroke(&mut pool, SHIP, 'd'),
            KeystrokeResult::NoMatch
        );
        assert!(resolver.is_locked_on(ids[0]));
        assert_eq!(pool.word(ids[1]).unwrap().typed, 0);
    }

    #[test]
    fn test_typing_through_completes_and_releases() {
        let (mut pool, ids) = pool_with(&[("cat", Vec2::new(250.0, 300.0))]);
        let mut resolver = TargetingResolver::new();

        let results: Vec<KeystrokeResult> = "cat"
            .chars()
            .map(|k| resolver.on_keystroke(&mut pool, SHIP, k))
            .collect();
        assert_eq!(
            results,
            vec![
                KeystrokeResult::Advanced,
                KeystrokeResult::Advanced,
                KeystrokeResult::WordComplete,
            ]
        );
        assert!(resolver.locked_word().is_none());
        assert!(pool.word(ids[0]).unwrap().is_complete());
    }

    #[test]
    fn test_dangling_lock_clears_without_acquiring() {
        let (mut pool, ids) = pool_with(&[
            ("cat", Vec2::new(250.0, 600.0)),
            ("cab", Vec2::new(250.0, 100.0)),
        ]);
        let mut resolver = TargetingResolver::new();

        resolver.on_keystroke(&mut pool, SHIP, 'c');
        assert!(resolver.is_locked_on(ids[0]));

        // Word dies under the lock (boundary loss path)
        pool.remove(ids[0]);
        assert_eq!(
            resolver.on_keystroke(&mut pool, SHIP, 'c'),
            KeystrokeResult::NoMatch
        );
        assert!(resolver.locked_word().is_none());

        // The next keystroke is free to lock the survivor
        assert_eq!(
            resolver.on_keystroke(&mut pool, SHIP, 'c'),
            KeystrokeResult::Advanced
        );
        assert!(resolver.is_locked_on(ids[1]));
    }

    #[test]
    fn test_validate_drops_dead_lock() {
        let (mut pool, ids) = pool_with(&[("cat", Vec2::new(250.0, 300.0))]);
        let mut resolver = TargetingResolver::new();
        resolver.on_keystroke(&mut pool, SHIP, 'c');

        pool.remove(ids[0]);
        pool.commit_removals();
        resolver.validate(&pool);
        assert!(resolver.locked_word().is_none());
    }

    #[test]
    fn test_unmatched_key_is_nomatch() {
        let (mut pool, _) = pool_with(&[("cat", Vec2::new(250.0, 300.0))]);
        let mut resolver = TargetingResolver::new();
        assert_eq!(
            resolver.on_keystroke(&mut pool, SHIP, 'x'),
            KeystrokeResult::NoMatch
        );
        assert!(resolver.locked_word().is_none());
    }

    proptest! {
        // Typed prefixes never escape [0, len] no matter what gets typed
        #[test]
        fn prop_typed_prefix_stays_in_bounds(keys in prop::collection::vec(prop::sample::select(vec!['c', 'a', 't', 'r', 'd', 'o', 'g']), 0..64)) {
            let (mut pool, _) = pool_with(&[
                ("cat", Vec2::new(200.0, 100.0)),
                ("cart", Vec2::new(300.0, 200.0)),
                ("dog", Vec2::new(250.0, 300.0)),
            ]);
            let mut resolver = TargetingResolver::new();

            for key in keys {
                resolver.on_keystroke(&mut pool, SHIP, key);
                for word in pool.live_words() {
                    prop_assert!(word.typed <= word.char_count());
                }
                if let Some(id) = resolver.locked_word() {
                    prop_assert!(pool.contains_word(id));
                }
            }
        }
    }
}
