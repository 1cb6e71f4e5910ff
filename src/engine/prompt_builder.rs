use crate::model::character::Character;
use crate::model::stats::StatKey;
use crate::model::turn::{Situation, TurnKind};

/// Builds the full prompt sent to the content generator.
/// Formatting only: no parsing, no networking, no state changes.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    history_window: usize,
}

impl PromptBuilder {
    pub fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    /// Opening request of a turn: a situation to answer, or a self-contained event.
    pub fn build(&self, character: &Character, kind: TurnKind) -> String {
        match kind {
            TurnKind::Situation => self.situation(character),
            TurnKind::Event => self.event(character),
        }
    }

    pub fn situation(&self, character: &Character) -> String {
        let mut prompt = String::new();

        push_system_prompt(&mut prompt, "Generate a situation for the player to respond to.");
        push_character_section(&mut prompt, character);
        push_history_section(&mut prompt, character.recent_history(self.history_window));
        push_situation_rules(&mut prompt);
        push_output_schema(&mut prompt, SITUATION_SCHEMA);
        push_reminder(&mut prompt);

        prompt
    }

    pub fn event(&self, character: &Character) -> String {
        let mut prompt = String::new();

        push_system_prompt(&mut prompt, "Generate a random event that happens to the player.");
        push_character_section(&mut prompt, character);
        push_history_section(&mut prompt, character.recent_history(self.history_window));
        push_outcome_rules(&mut prompt, "event");
        push_output_schema(&mut prompt, EVENT_SCHEMA);
        push_reminder(&mut prompt);

        prompt
    }

    /// Follow-up request once the player has answered `situation`.
    pub fn outcome(&self, character: &Character, situation: &Situation, response: &str) -> String {
        let mut prompt = String::new();

        push_system_prompt(
            &mut prompt,
            "Decide the outcome of the player's response and update their stats.",
        );
        push_character_section(&mut prompt, character);
        push_history_section(&mut prompt, character.recent_history(self.history_window));
        push_player_response(&mut prompt, situation, response);
        push_outcome_rules(&mut prompt, "outcome");
        push_output_schema(&mut prompt, OUTCOME_SCHEMA);
        push_reminder(&mut prompt);

        prompt
    }
}

const SITUATION_SCHEMA: &str = r#"{
  "type": "situation",
  "text": "Situation description",
  "options": ["Option 1", "Option 2", "Option 3"]
}
"options" must hold between 2 and 4 non-empty strings."#;

const OUTCOME_SCHEMA: &str = r#"{
  "text": "Outcome description",
  "stats": { "statName1": newValue, "statName2": newValue },
  "achievement": "New achievement unlocked (optional)"
}"#;

const EVENT_SCHEMA: &str = r#"{
  "type": "event",
  "text": "Event description",
  "stats": { "statName1": newValue, "statName2": newValue },
  "achievement": "New achievement unlocked (optional)"
}"#;

fn push_system_prompt(prompt: &mut String, task: &str) {
    prompt.push_str("You are running a turn-based life simulation game. ");
    prompt.push_str(task);
    prompt.push_str("\n\n");
}

fn push_character_section(prompt: &mut String, character: &Character) {
    prompt.push_str("PLAYER:\n");
    prompt.push_str(&format!("- Name: {}\n", character.name()));
    prompt.push_str(&format!("- Age: {}\n\n", character.age()));

    prompt.push_str("STATS:\n");
    let stats = character.stats();
    for key in StatKey::ALL {
        prompt.push_str(&format!("- {}: {}\n", key.name(), stats.get(key)));
    }
    prompt.push('\n');

    if !character.achievements().is_empty() {
        prompt.push_str("ACHIEVEMENTS:\n");
        for achievement in character.achievements() {
            prompt.push_str(&format!("- {}\n", achievement));
        }
        prompt.push('\n');
    }
}

fn push_history_section(prompt: &mut String, history: &[String]) {
    if history.is_empty() {
        return;
    }

    prompt.push_str("RECENT PLAYER CHOICES (oldest first):\n");
    for entry in history {
        prompt.push_str(&format!("- {}\n", entry));
    }
    prompt.push('\n');
}

fn push_player_response(prompt: &mut String, situation: &Situation, response: &str) {
    prompt.push_str("SITUATION:\n");
    prompt.push_str(&situation.text);
    prompt.push_str("\n\n");

    prompt.push_str("OPTIONS OFFERED:\n");
    for option in &situation.options {
        prompt.push_str(&format!("- {}\n", option));
    }
    prompt.push('\n');

    prompt.push_str("PLAYER RESPONSE:\n");
    prompt.push_str(situation.resolve_choice(response));
    prompt.push_str("\n\n");
}

fn push_situation_rules(prompt: &mut String) {
    prompt.push_str(
        "Rules:\n\
- Keep the description to 1-2 lines.\n\
- Make the situation fit the player's age and life circumstances.\n\
- Mix positive and negative situations.\n\
- Occasionally reference earlier choices.\n\
- Offer 2-4 clear options, each with plausible consequences for the stats.\n\n",
    );
}

fn push_outcome_rules(prompt: &mut String, what: &str) {
    prompt.push_str("Rules:\n");
    prompt.push_str(&format!("- Keep the {} description to 1-2 lines.\n", what));
    prompt.push_str(
        "- Only include stats that change, using the stat names listed under STATS.\n\
- Give new absolute values, not differences.\n\
- Move numeric stats by no more than 10 points per turn.\n",
    );

    let bounded: Vec<&str> = StatKey::ALL
        .into_iter()
        .filter(|k| k.is_bounded())
        .map(StatKey::name)
        .collect();
    prompt.push_str(&format!(
        "- Keep {} between 0 and 100.\n",
        bounded.join(", ")
    ));
    prompt.push_str(
        "- job and maritalStatus are short strings; netWorth and income are whole dollars.\n\
- Only award an achievement for a genuine milestone.\n\n",
    );
}

fn push_output_schema(prompt: &mut String, schema: &str) {
    prompt.push_str("Return a JSON object with this structure:\n");
    prompt.push_str(schema);
    prompt.push_str("\n\n");
}

fn push_reminder(prompt: &mut String) {
    prompt.push_str(
        "REMINDER:\n\
- Respond with the JSON object only. No markdown, no extra text.\n\
- All keys and string values must use double quotes.\n",
    );
}
