//! Turn engine for a text life simulation driven by a generative model.
//!
//! A character ages through generated situations (the player answers) and
//! events (they just happen). Each validated outcome updates a bounded set
//! of life stats and may unlock an achievement.

pub mod config;
pub mod engine;
pub mod model;
pub mod ui;
