//! Dictionary loading and filtered random word draws
//!
//! The bank owns the full dictionary. Each draw filters entries by the
//! current wave's rules and refuses words handed out within a recent window,
//! relaxing the window only when it would otherwise starve the caller.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Words served when no dictionary file is available
pub const FALLBACK_WORDS: &[&str] = &[
    "at", "on", "up", "ace", "art", "bat", "cat", "dog", "ice", "jet", "key", "map", "net", "owl",
    "sun", "bolt", "dawn", "echo", "fern", "gust", "hawk", "iris", "lava", "mist", "nova", "amber",
    "blaze", "comet", "drift", "ember", "flint", "gleam", "haven", "lunar", "orbit", "prism",
    "raven", "solar", "vortex", "asteroid", "blizzard", "dominion", "hurricane", "labyrinth",
    "meridian", "nebulous", "particle", "starlight", "turbulence", "whirlwind",
];

/// Word bank failures
#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no dictionary word satisfies the requested filter")]
    Empty,
}

/// Which dictionary entries qualify for a draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordFilter {
    /// Shortest acceptable length
    pub min_len: usize,
    /// Longest acceptable length (None = unbounded)
    pub max_len: Option<usize>,
}

impl Default for WordFilter {
    fn default() -> Self {
        Self {
            min_len: 1,
            max_len: None,
        }
    }
}

impl WordFilter {
    /// Length bounds plus letters-only. Punctuation never qualifies: every
    /// character of a falling word must be typeable as a plain keystroke.
    pub fn accepts(&self, word: &str) -> bool {
        let len = word.chars().count();
        if len < self.min_len {
            return false;
        }
        if let Some(max) = self.max_len {
            if len > max {
                return false;
            }
        }
        word.chars().all(|c| c.is_alphabetic())
    }
}

/// Loaded dictionary plus the recent-draw window
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
    recent: VecDeque<String>,
    window: usize,
}

impl WordBank {
    /// Build a bank from an iterator of words. Entries are lowercased and
    /// trimmed; blank entries are skipped.
    pub fn from_words<I, S>(words: I, window: usize) -> Result<Self, WordBankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(WordBankError::Empty);
        }
        Ok(Self {
            words,
            recent: VecDeque::new(),
            window,
        })
    }

    /// Load a newline-delimited dictionary file
    pub fn load(path: impl AsRef<Path>, window: usize) -> Result<Self, WordBankError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| WordBankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_words(text.lines(), window)
    }

    /// Bank backed by the built-in word list
    pub fn fallback(window: usize) -> Self {
        Self {
            words: FALLBACK_WORDS.iter().map(|w| (*w).to_string()).collect(),
            recent: VecDeque::new(),
            window,
        }
    }

    /// Load a dictionary, recovering with the built-in list on failure
    pub fn load_or_fallback(path: impl AsRef<Path>, window: usize) -> Self {
        match Self::load(&path, window) {
            Ok(bank) => {
                log::info!(
                    "Loaded {} words from {}",
                    bank.len(),
                    path.as_ref().display()
                );
                bank
            }
            Err(e) => {
                log::warn!("Word bank unavailable ({e}), using built-in list");
                Self::fallback(window)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Draw one word matching `filter`, avoiding the recent window when
    /// possible. Candidate order is dictionary order, so equal seeds give
    /// equal draws.
    pub fn draw(&mut self, rng: &mut impl Rng, filter: &WordFilter) -> Result<String, WordBankError> {
        let word = {
            let fresh: Vec<&String> = self
                .words
                .iter()
                .filter(|w| filter.accepts(w) && !self.recent.contains(w))
                .collect();
            let pool = if fresh.is_empty() {
                // Window would starve the draw; allow repeats
                self.words.iter().filter(|w| filter.accepts(w)).collect()
            } else {
                fresh
            };
            if pool.is_empty() {
                return Err(WordBankError::Empty);
            }
            pool[rng.random_range(0..pool.len())].clone()
        };

        if self.window > 0 {
            self.recent.push_back(word.clone());
            while self.recent.len() > self.window {
                self.recent.pop_front();
            }
        }
        Ok(word)
    }
}
