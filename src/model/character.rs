use rand::Rng;

use crate::engine::achievements;
use crate::model::stats::{StatBlock, StatKey, STAT_MAX};

/// Age every new life starts at.
pub const INITIAL_AGE: u32 = 5;

/// The single player character. Owned by the game loop for the whole session.
#[derive(Debug, Clone)]
pub struct Character {
    name: String,
    age: u32,
    stats: StatBlock,
    achievements: Vec<String>,
    history: Vec<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: INITIAL_AGE,
            stats: StatBlock::default(),
            achievements: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Assigns independent uniform rolls in `0..100` to the six personality stats.
    pub fn roll_personality<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for key in StatKey::PERSONALITY {
            if let Some(slot) = self.stats.bounded_mut(key) {
                *slot = rng.gen_range(0..STAT_MAX);
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Returns the new age.
    pub fn age_up(&mut self) -> u32 {
        self.age += 1;
        self.age
    }

    /// Swaps in an updated stat block, failing loudly if it breaks a bound.
    pub fn replace_stats(&mut self, stats: StatBlock) {
        stats.assert_bounded();
        self.stats = stats;
    }

    /// Returns true when the achievement was new.
    pub fn record_achievement(&mut self, candidate: Option<&str>) -> bool {
        achievements::record(&mut self.achievements, candidate)
    }

    pub fn commit_input(&mut self, input: impl Into<String>) {
        self.history.push(input.into());
    }

    /// The last `window` committed inputs, oldest first.
    pub fn recent_history(&self, window: usize) -> &[String] {
        let start = self.history.len().saturating_sub(window);
        &self.history[start..]
    }
}
