use std::sync::mpsc::Receiver;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::apply_stats::apply_stats;
use crate::engine::error::{GenerationFailure, TurnError};
use crate::engine::llm_client::ContentGenerator;
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{AgeUp, Presenter};
use crate::engine::response_parser::{parse_outcome, parse_situation};
use crate::model::character::Character;
use crate::model::turn::{Outcome, TurnKind};
use crate::model::turn_report::{diff_stats, TurnReport};

/// Largest per-turn move the generator is asked to make on a bounded stat.
/// Exceeding it is logged, not rejected.
pub const SOFT_STAT_STEP: u64 = 10;

pub const WELCOME_TEXT: &str = "Welcome to your new life. What should I call you?";
pub const GENERATION_FAILURE_TEXT: &str =
    "The fog of fate rolls in and nothing seems to happen. Let's try that again.";
pub const SCHEMA_FAILURE_TEXT: &str =
    "Life took a turn nobody could make sense of. Let's try that again.";

#[derive(Debug, Clone, PartialEq)]
pub struct LoopOptions {
    /// Chance that a drawn turn is a situation rather than an event.
    pub situation_probability: f64,
    /// How many recent player inputs each prompt carries.
    pub history_window: usize,
    pub seed: Option<u64>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            situation_probability: 0.7,
            history_window: 10,
            seed: None,
        }
    }
}

enum Phase {
    Naming,
    Briefing(Character),
    Playing(Character),
}

/// The turn engine. Strictly one turn at a time: at most one generator call
/// or one input wait is outstanding at any moment.
pub struct GameLoop<G, P> {
    generator: G,
    presenter: P,
    age_signals: Receiver<AgeUp>,
    prompts: PromptBuilder,
    rng: StdRng,
    situation_probability: f64,
    retry: Option<TurnKind>,
}

impl<G: ContentGenerator, P: Presenter> GameLoop<G, P> {
    pub fn new(
        generator: G,
        presenter: P,
        age_signals: Receiver<AgeUp>,
        options: LoopOptions,
    ) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            generator,
            presenter,
            age_signals,
            prompts: PromptBuilder::new(options.history_window),
            rng,
            situation_probability: options.situation_probability.clamp(0.0, 1.0),
            retry: None,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Runs naming, briefing and then turns until the presenter closes.
    /// Returns the character if play had started.
    pub fn run(&mut self) -> Option<Character> {
        let mut phase = Phase::Naming;

        loop {
            phase = match phase {
                Phase::Naming => {
                    self.presenter.display(WELCOME_TEXT);
                    let name = self.presenter.await_input()?;
                    let name = name.trim();
                    if name.is_empty() {
                        Phase::Naming
                    } else {
                        // Signals sent before a character existed age nobody.
                        let discarded = self.age_signals.try_iter().count();
                        if discarded > 0 {
                            log::debug!("dropping {} age-up signals sent before naming", discarded);
                        }
                        Phase::Briefing(Character::new(name))
                    }
                }

                Phase::Briefing(mut character) => {
                    character.roll_personality(&mut self.rng);
                    self.presenter.refresh_stats(&character);
                    self.presenter.display(&briefing_text(character.name()));

                    let answer = self.presenter.await_input()?;
                    if is_affirmative(&answer) {
                        log::info!("starting life of {}", character.name());
                        Phase::Playing(character)
                    } else {
                        log::debug!("briefing declined, back to naming");
                        Phase::Naming
                    }
                }

                Phase::Playing(mut character) => {
                    self.apply_pending_age_ups(&mut character);
                    match self.play_turn(&mut character) {
                        Ok(report) => {
                            log::info!(
                                "{} turn at age {}: {} stat changes{}",
                                report.kind,
                                character.age(),
                                report.changes.len(),
                                report
                                    .achievement
                                    .as_deref()
                                    .map(|a| format!(", unlocked '{}'", a))
                                    .unwrap_or_default()
                            );
                        }
                        Err(TurnError::InputClosed) => return Some(character),
                        Err(err) => log::warn!("turn abandoned: {}", err),
                    }
                    Phase::Playing(character)
                }
            };
        }
    }

    /// Applies every age-up signal queued so far. Never calls the generator.
    pub fn apply_pending_age_ups(&mut self, character: &mut Character) -> u32 {
        let mut applied = 0;
        while self.age_signals.try_recv().is_ok() {
            let age = character.age_up();
            log::info!("{} is now {}", character.name(), age);
            self.presenter.display(&format!("--- Age {} ---", age));
            self.presenter.refresh_stats(character);
            applied += 1;
        }
        applied
    }

    /// Plays one turn. A failed turn leaves stats untouched and the same kind
    /// is played again on the next call.
    pub fn play_turn(&mut self, character: &mut Character) -> Result<TurnReport, TurnError> {
        let kind = self.retry.take().unwrap_or_else(|| self.draw_turn_kind());

        let result = match kind {
            TurnKind::Situation => self.situation_turn(character),
            TurnKind::Event => self.event_turn(character),
        };

        match &result {
            Err(TurnError::Generation(_)) => {
                self.retry = Some(kind);
                self.presenter.display(GENERATION_FAILURE_TEXT);
            }
            Err(TurnError::Schema(_)) => {
                self.retry = Some(kind);
                self.presenter.display(SCHEMA_FAILURE_TEXT);
            }
            _ => {}
        }

        result
    }

    pub fn draw_turn_kind(&mut self) -> TurnKind {
        if self.rng.gen_bool(self.situation_probability) {
            TurnKind::Situation
        } else {
            TurnKind::Event
        }
    }

    fn situation_turn(&mut self, character: &mut Character) -> Result<TurnReport, TurnError> {
        let prompt = self.prompts.situation(character);
        let raw = self.request(&prompt)?;
        let situation = parse_situation(&raw)?;

        self.presenter.display(&situation.render());

        let response = self.presenter.await_input().ok_or(TurnError::InputClosed)?;
        character.commit_input(response.trim());

        let prompt = self.prompts.outcome(character, &situation, response.trim());
        let raw = self.request(&prompt)?;
        let outcome = parse_outcome(&raw)?;

        Ok(self.apply_outcome(character, TurnKind::Situation, outcome))
    }

    fn event_turn(&mut self, character: &mut Character) -> Result<TurnReport, TurnError> {
        let prompt = self.prompts.event(character);
        let raw = self.request(&prompt)?;
        let outcome = parse_outcome(&raw)?;

        Ok(self.apply_outcome(character, TurnKind::Event, outcome))
    }

    fn request(&mut self, prompt: &str) -> Result<String, GenerationFailure> {
        log::debug!("generator prompt:\n{}", prompt);
        let raw = self.generator.generate(prompt)?;
        log::debug!("generator response:\n{}", raw);
        Ok(raw)
    }

    fn apply_outcome(
        &mut self,
        character: &mut Character,
        kind: TurnKind,
        outcome: Outcome,
    ) -> TurnReport {
        log::debug!(
            "applying stat patch {}",
            serde_json::to_string(&outcome.stats).unwrap_or_default()
        );
        let before = character.stats().clone();
        character.replace_stats(apply_stats(&before, &outcome.stats));
        let changes = diff_stats(&before, character.stats());

        for change in &changes {
            if change.key.is_bounded() && change.magnitude().is_some_and(|m| m > SOFT_STAT_STEP) {
                log::warn!(
                    "{} moved from {} to {}, more than {} in one turn",
                    change.key,
                    change.before,
                    change.after,
                    SOFT_STAT_STEP
                );
            }
        }

        let unlocked = character.record_achievement(outcome.achievement.as_deref());

        self.presenter.display(&outcome.text);
        let achievement = if unlocked { outcome.achievement } else { None };
        if let Some(name) = &achievement {
            self.presenter.display(&format!("Achievement unlocked: {}", name));
        }
        self.presenter.refresh_stats(character);

        TurnReport {
            kind,
            text: outcome.text,
            changes,
            achievement,
        }
    }
}

pub fn briefing_text(name: &str) -> String {
    format!(
        "Welcome to your new life, {}!\n\n\
Game Instructions:\n\
- Type your response and press ENTER to make a choice\n\
- You may answer with an option number or in your own words\n\
- Type /age to age up\n\
- Type /stats to see your life stats\n\
- You can unlock achievements as the game progresses\n\n\
Are you ready to begin your adventure? (Type 'yes' to start)",
        name
    )
}

pub fn is_affirmative(input: &str) -> bool {
    matches!(
        input.trim().to_lowercase().as_str(),
        "yes" | "y" | "yeah" | "yep" | "sure" | "ok" | "okay" | "start"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        for yes in ["yes", "YES", " y ", "Okay", "start"] {
            assert!(is_affirmative(yes), "{}", yes);
        }
        for no in ["no", "", "maybe", "yes please"] {
            assert!(!is_affirmative(no), "{}", no);
        }
    }

    #[test]
    fn briefing_names_the_player() {
        let text = briefing_text("Robin");
        assert!(text.starts_with("Welcome to your new life, Robin!"));
        assert!(text.contains("Type 'yes' to start"));
    }
}
