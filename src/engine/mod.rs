pub mod game_loop;
pub mod protocol;
pub mod error;

pub mod prompt_builder;
pub mod llm_client;
pub mod response_parser;
pub mod apply_stats;
pub mod achievements;
