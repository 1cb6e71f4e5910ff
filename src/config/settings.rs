use serde::{Deserialize, Serialize};

use crate::engine::game_loop::LoopOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Base URL of an OpenAI-compatible API (LM Studio, Ollama, ...).
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,

    /// Environment variable holding an optional bearer token.
    pub api_key_env: String,

    /// No timeout when unset.
    pub request_timeout_secs: Option<u64>,

    pub situation_probability: f64,
    pub history_window: usize,
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:1234/v1".into(),
            model: "local-model".into(),
            temperature: 0.7,
            api_key_env: "LIFE_SIM_API_KEY".into(),
            request_timeout_secs: None,
            situation_probability: 0.7,
            history_window: 10,
            seed: None,
        }
    }
}

impl GameSettings {
    /// Repairs values a hand-edited file may have broken.
    pub fn normalized(mut self) -> Self {
        if !self.situation_probability.is_finite() {
            self.situation_probability = GameSettings::default().situation_probability;
        }
        self.situation_probability = self.situation_probability.clamp(0.0, 1.0);
        self.endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            situation_probability: self.situation_probability,
            history_window: self.history_window,
            seed: self.seed,
        }
    }
}
