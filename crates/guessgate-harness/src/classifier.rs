//! Letter counting classifier.
//!
//! The game used by the simulation: every letter typed counts towards a win,
//! and the round is won when `target` letters have been typed. With a miss
//! limit, other characters count towards a loss.

use guessgate_app::{InputEvent, RoundOutcome};

/// Classifier counting valid letters per round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterCounter {
    target: u32,
    miss_limit: Option<u32>,
    letters: u32,
    misses: u32,
}

impl Default for LetterCounter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl LetterCounter {
    /// Win after `target` letters. Misses never lose.
    pub fn new(target: u32) -> Self {
        Self { target, miss_limit: None, letters: 0, misses: 0 }
    }

    /// Lose after `limit` non-letter keystrokes.
    #[must_use]
    pub fn with_miss_limit(mut self, limit: u32) -> Self {
        self.miss_limit = Some(limit);
        self
    }

    /// Letters counted in the current round.
    pub fn letters(&self) -> u32 {
        self.letters
    }

    /// Misses counted in the current round.
    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Classify one keystroke. Counters reset when a round ends.
    ///
    /// Letters are `a`-`z` in either case. Events without inserted text
    /// (deletions) neither count nor miss.
    pub fn classify(&mut self, event: &InputEvent) -> RoundOutcome {
        let Some(ch) = event.data().and_then(|data| data.chars().next()) else {
            return RoundOutcome::Continuing;
        };

        if ch.to_ascii_lowercase().is_ascii_lowercase() {
            self.letters += 1;
            tracing::debug!("valid letter {:?} ({}/{})", ch, self.letters, self.target);
            if self.letters >= self.target {
                self.reset();
                return RoundOutcome::Won;
            }
        } else if let Some(limit) = self.miss_limit {
            self.misses += 1;
            tracing::debug!("miss {:?} ({}/{})", ch, self.misses, limit);
            if self.misses >= limit {
                self.reset();
                return RoundOutcome::Lost;
            }
        }
        RoundOutcome::Continuing
    }

    /// Start counting from zero.
    pub fn reset(&mut self) {
        self.letters = 0;
        self.misses = 0;
    }
}
