//! Movement and impact resolution
//!
//! Each pass plans against the tick-start population and applies through
//! the pool's deferred-removal contract, so nothing observed mid-pass can
//! dangle. Call order matters: words first, then bullets (a bullet whose
//! word just breached must fizzle, not detonate), then explosion decay.

use glam::Vec2;

use super::pool::{EntityId, EntityPool};
use crate::direction_to;

/// A word that crossed the defended line this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breach {
    pub word: EntityId,
    pub pos: Vec2,
}

/// A bullet reaching its word
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub bullet: EntityId,
    pub word: EntityId,
    pub pos: Vec2,
}

/// Planned outcome for one bullet, applied after the scan
enum BulletOp {
    Step { bullet: EntityId, vel: Vec2 },
    Arrive(Impact),
    /// Target already gone: fizzle, no explosion
    Discard { bullet: EntityId },
}

/// Advance every live word toward the ship and report boundary crossings.
/// Breached words are removed on the spot (deferred), so each crossing is
/// reported exactly once.
pub fn advance_words(
    pool: &mut EntityPool,
    ship_pos: Vec2,
    boundary_y: f32,
    dt: f32,
) -> Vec<Breach> {
    let mut breaches = Vec::new();
    for word in pool.live_words_mut() {
        let dir = direction_to(word.pos, ship_pos);
        word.pos += dir * word.speed * dt;
        if word.pos.y >= boundary_y {
            breaches.push(Breach {
                word: word.id,
                pos: word.pos,
            });
        }
    }
    for breach in &breaches {
        pool.remove(breach.word);
    }
    breaches
}

/// Home every live bullet onto its target's current position. Arrivals
/// remove the word, spawn an explosion where it was, and remove the
/// bullet; bullets whose word already died are quietly dropped.
pub fn advance_bullets(
    pool: &mut EntityPool,
    speed: f32,
    hit_radius: f32,
    explosion_frames: u32,
    dt: f32,
) -> Vec<Impact> {
    let step = speed * dt;
    let mut ops = Vec::new();
    for bullet in pool.live_bullets() {
        match pool.word(bullet.target) {
            None => ops.push(BulletOp::Discard { bullet: bullet.id }),
            Some(word) => {
                if bullet.pos.distance(word.pos) <= step + hit_radius {
                    ops.push(BulletOp::Arrive(Impact {
                        bullet: bullet.id,
                        word: word.id,
                        pos: word.pos,
                    }));
                } else {
                    let vel = direction_to(bullet.pos, word.pos) * speed;
                    ops.push(BulletOp::Step {
                        bullet: bullet.id,
                        vel,
                    });
                }
            }
        }
    }

    let mut impacts = Vec::new();
    for op in ops {
        match op {
            BulletOp::Step { bullet, vel } => {
                if let Some(b) = pool.bullet_mut(bullet) {
                    b.vel = vel;
                    b.pos += vel * dt;
                }
            }
            BulletOp::Arrive(impact) => {
                pool.remove(impact.bullet);
                pool.remove(impact.word);
                pool.spawn_explosion(impact.pos, explosion_frames);
                impacts.push(impact);
            }
            BulletOp::Discard { bullet } => pool.remove(bullet),
        }
    }
    impacts
}

/// Burn one frame off every live explosion, removing finished ones.
/// Returns how many finished this tick.
pub fn decay_explosions(pool: &mut EntityPool) -> usize {
    let mut finished = Vec::new();
    for boom in pool.live_explosions_mut() {
        boom.tick_down();
        if boom.finished() {
            finished.push(boom.id);
        }
    }
    let count = finished.len();
    for id in finished {
        pool.remove(id);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pool::EntityKind;

    const SHIP: Vec2 = Vec2::new(250.0, 675.0);
    const BOUNDARY: f32 = 675.0;
    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_words_home_toward_ship() {
        let mut pool = EntityPool::new();
        let id = pool.spawn_word("drift".into(), Vec2::new(100.0, 0.0), 60.0);

        let breaches = advance_words(&mut pool, SHIP, BOUNDARY, DT);
        assert!(breaches.is_empty());

        let word = pool.word(id).unwrap();
        assert!(word.pos.y > 0.0, "descends");
        assert!(word.pos.x > 100.0, "drifts toward the ship's x");
    }

    #[test]
    fn test_breach_reported_once_and_word_removed() {
        let mut pool = EntityPool::new();
        let id = pool.spawn_word("late".into(), Vec2::new(250.0, 674.9), 60.0);

        let breaches = advance_words(&mut pool, SHIP, BOUNDARY, DT);
        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].word, id);
        assert!(pool.word(id).is_none());

        // Next pass sees nothing to breach
        let again = advance_words(&mut pool, SHIP, BOUNDARY, DT);
        assert!(again.is_empty());
    }

    #[test]
    fn test_bullet_flies_then_detonates() {
        let mut pool = EntityPool::new();
        let word_pos = Vec2::new(250.0, 75.0);
        let word = pool.spawn_word("boom".into(), word_pos, 60.0);
        let vel = direction_to(SHIP, word_pos) * 1200.0;
        pool.spawn_bullet(SHIP, word, vel);

        let mut impacts = Vec::new();
        for _ in 0..120 {
            impacts = advance_bullets(&mut pool, 1200.0, 6.0, 30, DT);
            pool.commit_removals();
            if !impacts.is_empty() {
                break;
            }
        }

        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].word, word);
        assert_eq!(impacts[0].pos, word_pos);
        assert!(pool.word(word).is_none());
        assert_eq!(pool.live_count(EntityKind::Bullet), 0);
        assert_eq!(pool.live_count(EntityKind::Explosion), 1);
    }

    #[test]
    fn test_bullet_tracks_a_moving_target() {
        let mut pool = EntityPool::new();
        let word = pool.spawn_word("dodge".into(), Vec2::new(100.0, 100.0), 60.0);
        pool.spawn_bullet(SHIP, word, Vec2::ZERO);

        let mut hit = false;
        for _ in 0..240 {
            // Target slides sideways every tick
            if let Some(w) = pool.word_mut(word) {
                w.pos.x += 2.0;
            }
            if !advance_bullets(&mut pool, 1200.0, 6.0, 30, DT).is_empty() {
                hit = true;
                break;
            }
            pool.commit_removals();
        }
        assert!(hit, "homing bullet never caught its target");
    }

    #[test]
    fn test_bullet_fizzles_when_target_already_dead() {
        let mut pool = EntityPool::new();
        let word = pool.spawn_word("gone".into(), Vec2::new(250.0, 100.0), 60.0);
        let bullet = pool.spawn_bullet(SHIP, word, Vec2::ZERO);

        pool.remove(word);
        let impacts = advance_bullets(&mut pool, 1200.0, 6.0, 30, DT);
        pool.commit_removals();

        assert!(impacts.is_empty());
        assert!(pool.word(word).is_none());
        assert!(pool.bullet_mut(bullet).is_none());
        assert_eq!(pool.live_count(EntityKind::Explosion), 0, "no explosion on a fizzle");
    }

    #[test]
    fn test_explosions_decay_and_vanish() {
        let mut pool = EntityPool::new();
        pool.spawn_explosion(Vec2::ZERO, 2);

        assert_eq!(decay_explosions(&mut pool), 0);
        pool.commit_removals();
        assert_eq!(pool.live_count(EntityKind::Explosion), 1);

        assert_eq!(decay_explosions(&mut pool), 1);
        pool.commit_removals();
        assert_eq!(pool.live_count(EntityKind::Explosion), 0);
    }
}
