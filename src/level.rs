use bevy::prelude::*;

use crate::character::player_bundle;
use crate::config::GameModeConfig;
use crate::spawn_volume::SpawnVolume;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_level);
    }
}

/// Where the default level's spawn volumes sit, and how far each reaches.
const SPAWN_VOLUMES: [(Vec2, Vec2); 2] = [
    (Vec2::new(-350.0, 0.0), Vec2::new(200.0, 250.0)),
    (Vec2::new(350.0, 0.0), Vec2::new(200.0, 250.0)),
];

fn spawn_level(mut commands: Commands, config: Option<Res<GameModeConfig>>) {
    let config = config.as_deref().cloned().unwrap_or_default();

    commands.spawn(Camera2d);

    commands.spawn((
        player_bundle(&config),
        Sprite::from_color(Color::srgb(0.9, 0.8, 0.2), Vec2::splat(32.0)),
    ));

    for (centre, half_extents) in SPAWN_VOLUMES {
        commands.spawn((
            SpawnVolume::new(half_extents, config.spawn_delay_range),
            Transform::from_translation(centre.extend(-1.0)),
        ));
    }
}
