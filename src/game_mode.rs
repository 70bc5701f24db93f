// game_mode.rs - The rules of a play session, with no engine types in sight.
//
// GameStateController owns the current PlayState, works out the power needed
// to win, and drains the player's power a little every tick. Everything it
// touches in the world goes through the traits in collaborators.rs, so the
// same controller runs under Bevy (see session.rs) and in plain unit tests.

use bevy::log::{debug, info};

use crate::collaborators::{Collaborators, PlayerPower};
use crate::play_state::PlayState;

/// Fraction of the initial power lost per second while playing.
pub const DEFAULT_DECAY_RATE: f32 = 0.01;

/// Reaching more than this multiple of the initial power wins the game.
pub const WIN_MULTIPLIER: f32 = 1.25;

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    /// The player's power after this tick (unchanged unless it decayed).
    pub power: f32,
    /// The state whose entry actions ran during this tick, if any.
    /// Re-entering the current state still counts.
    pub entered: Option<PlayState>,
}

impl TickOutcome {
    pub fn state_changed(&self) -> bool {
        self.entered.is_some()
    }
}

/// The three ways a tick can go, checked in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decision {
    Win,
    Decay,
    Lose,
}

#[derive(Clone, Debug)]
pub struct GameStateController {
    current_state: PlayState,
    decay_rate: f32,
    initial_power: f32,
    power_to_win: f32,
}

impl Default for GameStateController {
    fn default() -> Self {
        Self::new(DEFAULT_DECAY_RATE)
    }
}

impl GameStateController {
    pub fn new(decay_rate: f32) -> Self {
        Self {
            current_state: PlayState::Unknown,
            decay_rate,
            initial_power: 0.0,
            power_to_win: 0.0,
        }
    }

    pub fn current_state(&self) -> PlayState {
        self.current_state
    }

    pub fn power_to_win(&self) -> f32 {
        self.power_to_win
    }

    pub fn initial_power(&self) -> f32 {
        self.initial_power
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// Begins a session: fixes the score to beat, starts every spawn source,
    /// and shows the HUD if there is one.
    ///
    /// A non-positive `initial_power` is accepted; the first tick then ends
    /// the session straight away.
    pub fn start_session(&mut self, initial_power: f32, collaborators: &mut Collaborators) {
        self.set_state(PlayState::Playing, collaborators);

        self.initial_power = initial_power;
        self.power_to_win = initial_power * WIN_MULTIPLIER;
        info!(
            initial_power,
            power_to_win = self.power_to_win,
            decay_rate = self.decay_rate,
            "session started"
        );

        if let Some(hud) = collaborators.hud.as_deref_mut() {
            hud.show_hud();
        }
    }

    /// Power drained over `delta_secs` at the configured decay rate.
    pub fn decay_over(&self, delta_secs: f32) -> f32 {
        delta_secs * self.decay_rate * self.initial_power
    }

    fn decide(&self, current_power: f32) -> Decision {
        if current_power > self.power_to_win {
            Decision::Win
        } else if current_power > 0.0 {
            Decision::Decay
        } else {
            Decision::Lose
        }
    }

    /// Runs one frame of the rules against a bare power value and returns the
    /// new power. The caller is responsible for storing it.
    pub fn tick(
        &mut self,
        current_power: f32,
        delta_secs: f32,
        collaborators: &mut Collaborators,
    ) -> TickOutcome {
        match self.decide(current_power) {
            Decision::Win => {
                self.set_state(PlayState::Won, collaborators);
                TickOutcome {
                    power: current_power,
                    entered: Some(PlayState::Won),
                }
            }
            Decision::Decay => TickOutcome {
                power: current_power - self.decay_over(delta_secs),
                entered: None,
            },
            Decision::Lose => {
                self.set_state(PlayState::GameOver, collaborators);
                TickOutcome {
                    power: current_power,
                    entered: Some(PlayState::GameOver),
                }
            }
        }
    }

    /// Same as [`tick`](Self::tick), but reads and drains the player directly.
    pub fn tick_player(
        &mut self,
        player: &mut dyn PlayerPower,
        delta_secs: f32,
        collaborators: &mut Collaborators,
    ) -> TickOutcome {
        let current_power = player.current_power();
        if self.decide(current_power) == Decision::Decay {
            player.update_power(-self.decay_over(delta_secs));
            return TickOutcome {
                power: player.current_power(),
                entered: None,
            };
        }
        self.tick(current_power, delta_secs, collaborators)
    }

    /// Stores `new_state` and runs its entry actions immediately, even when it
    /// equals the current state.
    pub fn set_state(&mut self, new_state: PlayState, collaborators: &mut Collaborators) {
        if new_state != self.current_state {
            info!("play state {:?} -> {:?}", self.current_state, new_state);
        }
        self.current_state = new_state;
        self.handle_state(new_state, collaborators);
    }

    fn handle_state(&self, state: PlayState, collaborators: &mut Collaborators) {
        match state {
            PlayState::Playing => collaborators.set_all_spawning_active(true),
            PlayState::Won => collaborators.set_all_spawning_active(false),
            PlayState::GameOver => {
                collaborators.set_all_spawning_active(false);

                if let Some(control) = collaborators.player_control.as_deref_mut() {
                    control.set_input_blocked(true);
                } else {
                    debug!("game over without a player controller; nothing to block");
                }

                if let Some(body) = collaborators.ragdoll.as_deref_mut() {
                    body.enable_physics_simulation();
                    body.disable_jump();
                }
            }
            PlayState::Unknown => {}
        }
    }
}
