use bevy::prelude::*;

pub mod character;
pub mod collaborators;
pub mod config;
pub mod game_mode;
pub mod hud;
pub mod level;
pub mod pickup;
pub mod play_state;
pub mod session;
pub mod spawn_volume;

#[cfg(test)]
mod test_harness;

/// All of the battery collector's gameplay, minus the level itself.
///
/// Spawn the player and spawn volumes during Startup (see `level::LevelPlugin`
/// for the default layout) and the session starts on its own in PostStartup.
pub struct BatteryCollectorPlugin;

impl Plugin for BatteryCollectorPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            config::ConfigPlugin,
            session::SessionPlugin,
            spawn_volume::SpawnVolumePlugin,
            character::CharacterPlugin,
            hud::HudPlugin,
        ));
    }
}
