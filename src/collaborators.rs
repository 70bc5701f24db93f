// collaborators.rs - The narrow capabilities the game mode needs from the world.
//
// The game mode never looks anything up by itself. Whoever drives it (the
// Bevy session systems, or a test) hands it a `Collaborators` bundle for the
// duration of one call. Anything that isn't there is simply skipped.

/// Something that produces collectibles while active (a spawn volume).
pub trait SpawnSource {
    fn set_spawning_active(&mut self, active: bool);
}

/// The player's power budget.
pub trait PlayerPower {
    fn initial_power(&self) -> f32;
    fn current_power(&self) -> f32;
    /// Adds `delta` (negative to drain) to the current power.
    fn update_power(&mut self, delta: f32);
}

/// Whatever turns player input into movement and actions.
pub trait PlayerControl {
    fn set_input_blocked(&mut self, blocked: bool);
}

/// Loss feedback on the player's body.
pub trait Ragdoll {
    fn enable_physics_simulation(&mut self);
    fn disable_jump(&mut self);
}

/// The heads-up display shown when a session starts.
pub trait Hud {
    fn show_hud(&mut self);
}

/// Borrowed collaborators for a single game mode call.
///
/// The spawn sources are expected to be unique. Order does not matter.
#[derive(Default)]
pub struct Collaborators<'a> {
    pub spawn_sources: Vec<&'a mut dyn SpawnSource>,
    pub player_control: Option<&'a mut dyn PlayerControl>,
    pub ragdoll: Option<&'a mut dyn Ragdoll>,
    pub hud: Option<&'a mut dyn Hud>,
}

impl<'a> Collaborators<'a> {
    pub fn set_all_spawning_active(&mut self, active: bool) {
        for source in self.spawn_sources.iter_mut() {
            source.set_spawning_active(active);
        }
    }
}
