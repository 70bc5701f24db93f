use bevy::prelude::*;

/// The phase a play session is in.
///
/// `Unknown` only exists before a session starts. Once `Won` or `GameOver`
/// is entered nothing moves the session out of it again, but entering the
/// same state twice is allowed and re-runs its entry actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayState {
    #[default]
    Unknown,
    Playing,
    Won,
    GameOver,
}

impl PlayState {
    /// True for `Won` and `GameOver`.
    pub fn is_finished(self) -> bool {
        matches!(self, PlayState::Won | PlayState::GameOver)
    }
}

/// Fired every time the game mode enters a state, including re-entry.
///
/// This is an observer event (commands.trigger() + On<T>), so listeners
/// such as the HUD react in the same frame the state was entered.
#[derive(Event, Clone, Copy, Debug)]
pub struct PlayStateEntered {
    pub state: PlayState,
}
