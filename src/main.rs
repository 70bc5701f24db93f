use bevy::prelude::*;

use battery_collector::{level::LevelPlugin, BatteryCollectorPlugin};

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, BatteryCollectorPlugin, LevelPlugin))
        .run();
}
