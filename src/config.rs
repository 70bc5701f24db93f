use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game_mode::DEFAULT_DECAY_RATE;
use crate::pickup::DEFAULT_BATTERY_POWER;

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_config);
    }
}

/// Tunable numbers for a play session.
///
/// Every field has #[serde(default)], so a config file only needs the values
/// it wants to change. Missing fields fall back to the defaults below
/// instead of failing the whole parse.
#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameModeConfig {
    /// Fraction of the initial power lost per second.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f32,
    /// Power granted by each spawned battery.
    #[serde(default = "default_battery_power")]
    pub battery_power: f32,
    /// Power the player starts with.
    #[serde(default = "default_initial_power")]
    pub initial_power: f32,
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,
    /// Extra speed per unit of power.
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f32,
    #[serde(default = "default_collection_radius")]
    pub collection_radius: f32,
    /// Seconds between spawns, as (low, high).
    #[serde(default = "default_spawn_delay_range")]
    pub spawn_delay_range: (f32, f32),
    #[serde(default = "default_show_hud")]
    pub show_hud: bool,
}

fn default_decay_rate() -> f32 {
    DEFAULT_DECAY_RATE
}

fn default_battery_power() -> f32 {
    DEFAULT_BATTERY_POWER
}

fn default_initial_power() -> f32 {
    2000.0
}

fn default_base_speed() -> f32 {
    10.0
}

fn default_speed_factor() -> f32 {
    0.75
}

fn default_collection_radius() -> f32 {
    200.0
}

fn default_spawn_delay_range() -> (f32, f32) {
    (1.0, 4.5)
}

fn default_show_hud() -> bool {
    true
}

impl Default for GameModeConfig {
    fn default() -> Self {
        Self {
            decay_rate: default_decay_rate(),
            battery_power: default_battery_power(),
            initial_power: default_initial_power(),
            base_speed: default_base_speed(),
            speed_factor: default_speed_factor(),
            collection_radius: default_collection_radius(),
            spawn_delay_range: default_spawn_delay_range(),
            show_hud: default_show_hud(),
        }
    }
}

impl GameModeConfig {
    /// Parses a RON config, logging and returning `None` on bad input.
    pub fn from_ron(contents: &str) -> Option<Self> {
        match ron::from_str::<GameModeConfig>(contents) {
            Ok(config) => Some(config),
            Err(e) => {
                error!("Failed to parse game mode config: {}. Using defaults.", e);
                None
            }
        }
    }

    pub fn to_ron(&self) -> Option<String> {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(serialized) => Some(serialized),
            Err(e) => {
                error!("Failed to serialize game mode config: {}", e);
                None
            }
        }
    }
}

// =============================================================================
// Storage backend: Native (macOS, Linux, Windows)
//
// Looks next to the executable's working directory first, so a checked-in
// battery_collector.ron wins. Otherwise falls back to the per-user config
// directory that `dirs` finds for the current OS.
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod storage {
    use super::GameModeConfig;
    use bevy::prelude::*;
    use std::path::PathBuf;

    const LOCAL_FILE: &str = "battery_collector.ron";

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("battery_collector").join("config.ron"))
    }

    fn config_file_path() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_FILE);
        if local.exists() {
            return Some(local);
        }
        user_config_path()
    }

    /// True if there is a config file anywhere we would read one from.
    pub fn exists() -> bool {
        config_file_path().is_some_and(|path| path.exists())
    }

    pub fn load() -> Option<GameModeConfig> {
        let path = config_file_path()?;

        if !path.exists() {
            info!("No config file found at {:?}. Using defaults.", path);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let config = GameModeConfig::from_ron(&contents)?;
                info!("Loaded game mode config from {:?}: {:?}", path, config);
                Some(config)
            }
            Err(e) => {
                error!("Failed to read config file: {}. Using defaults.", e);
                None
            }
        }
    }

    pub fn save(config: &GameModeConfig) {
        let Some(path) = user_config_path() else {
            error!("Could not determine config file path!");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("Failed to create config directory: {}", e);
                return;
            }
        }

        let Some(serialized) = config.to_ron() else {
            return;
        };
        if let Err(e) = std::fs::write(&path, serialized) {
            error!("Failed to write config file: {}", e);
        } else {
            info!("Config saved to {:?}", path);
        }
    }
}

// Browsers have no filesystem; the web build just runs on defaults.
#[cfg(target_arch = "wasm32")]
mod storage {
    use super::GameModeConfig;
    use bevy::prelude::*;

    pub fn exists() -> bool {
        false
    }

    pub fn load() -> Option<GameModeConfig> {
        debug!("No config storage on wasm. Using defaults.");
        None
    }

    pub fn save(_config: &GameModeConfig) {
        debug!("Saving config is not supported on wasm.");
    }
}

/// Startup system: loads the config file, or falls back to defaults.
///
/// Skips loading entirely if a config was inserted before startup, which is
/// how tests (and anything embedding the plugin) pick their own numbers.
/// On first run (no file anywhere) the defaults are written out so there is
/// something to edit. A file that exists but fails to parse is left alone.
fn load_config(mut commands: Commands, existing: Option<Res<GameModeConfig>>) {
    if existing.is_some() {
        debug!("Game mode config already present, not loading from disk");
        return;
    }
    let (config, write_defaults) = resolve_loaded(storage::load(), storage::exists());
    if write_defaults {
        save_config(&config);
    }
    commands.insert_resource(config);
}

/// Picks the config to run with, and whether the defaults should be written
/// out. Only a missing file gets replaced; a broken one is kept for the user
/// to fix.
fn resolve_loaded(loaded: Option<GameModeConfig>, file_exists: bool) -> (GameModeConfig, bool) {
    match loaded {
        Some(config) => (config, false),
        None => (GameModeConfig::default(), !file_exists),
    }
}

/// Writes the config to the per-user config directory.
pub fn save_config(config: &GameModeConfig) {
    storage::save(config);
}
