use crate::model::character::Character;

/// External "age up" signal. Sent on a channel; the game loop applies
/// queued signals only between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeUp;

/// What the turn engine needs from whatever shows the game to the player.
pub trait Presenter {
    fn display(&mut self, text: &str);

    /// Next committed line of player text, trimmed and non-empty.
    /// `None` means the player side has shut down.
    fn await_input(&mut self) -> Option<String>;

    /// Called whenever the character's visible state changed.
    fn refresh_stats(&mut self, _character: &Character) {}
}
