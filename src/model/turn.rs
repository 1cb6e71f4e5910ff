use std::fmt;

use crate::model::stats::StatPatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// The player picks how to respond.
    Situation,
    /// Happens to the player with no choice involved.
    Event,
}

impl TurnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnKind::Situation => "situation",
            TurnKind::Event => "event",
        }
    }
}

impl fmt::Display for TurnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated situation: prompt text plus 2 to 4 options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Situation {
    pub text: String,
    pub options: Vec<String>,
}

impl Situation {
    /// Text and numbered options, as shown to the player.
    pub fn render(&self) -> String {
        let mut out = self.text.clone();
        for (i, option) in self.options.iter().enumerate() {
            out.push_str(&format!("\n  {}. {}", i + 1, option));
        }
        out
    }

    /// Maps a bare option number to its text; anything else is returned as typed.
    pub fn resolve_choice<'a>(&'a self, input: &'a str) -> &'a str {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
            .unwrap_or(input)
    }
}

/// A validated outcome of a situation answer or a standalone event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub text: String,
    pub stats: StatPatch,
    pub achievement: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn situation() -> Situation {
        Situation {
            text: "A classmate offers you candy.".into(),
            options: vec!["Take it".into(), "Refuse".into(), "Tell a teacher".into()],
        }
    }

    #[test]
    fn render_numbers_options() {
        let rendered = situation().render();
        assert!(rendered.starts_with("A classmate offers you candy."));
        assert!(rendered.contains("\n  1. Take it"));
        assert!(rendered.contains("\n  3. Tell a teacher"));
    }

    #[test]
    fn resolve_choice_maps_numbers_only_when_in_range() {
        let s = situation();
        assert_eq!(s.resolve_choice("2"), "Refuse");
        assert_eq!(s.resolve_choice(" 3 "), "Tell a teacher");
        assert_eq!(s.resolve_choice("0"), "0");
        assert_eq!(s.resolve_choice("4"), "4");
        assert_eq!(s.resolve_choice("eat it all"), "eat it all");
    }
}
