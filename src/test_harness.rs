//! Headless session harness for tests.
//!
//! Wraps a bare `App` with `BatteryCollectorPlugin` and a manually advanced
//! `Time`, so each `tick` is exactly one frame of a known length. No window,
//! renderer, or input plugin is involved.

use std::time::Duration;

use bevy::prelude::*;

use crate::character::{
    player_bundle, CollectPickups, Player, PlayerController, PowerCharacter, RagdollBody,
};
use crate::config::GameModeConfig;
use crate::play_state::{PlayState, PlayStateEntered};
use crate::session::BatteryGameMode;
use crate::spawn_volume::{spawn_battery, SpawnVolume};
use crate::BatteryCollectorPlugin;

/// Every state the game mode entered, in order.
#[derive(Resource, Default)]
struct EnteredLog(Vec<PlayState>);

pub struct TestSession {
    app: App,
    config: GameModeConfig,
}

impl TestSession {
    pub fn new(config: GameModeConfig) -> Self {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.init_resource::<EnteredLog>();
        // Inserted before startup so nothing is read from disk.
        app.insert_resource(config.clone());
        app.add_plugins(BatteryCollectorPlugin);
        app.add_observer(|trigger: On<PlayStateEntered>, mut log: ResMut<EnteredLog>| {
            log.0.push(trigger.state);
        });
        Self { app, config }
    }

    pub fn with_player(mut self) -> Self {
        self.app.world_mut().spawn(player_bundle(&self.config));
        self
    }

    pub fn with_spawn_volumes(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.add_spawn_volume();
        }
        self
    }

    /// Runs startup (begin-play) plus one zero-length frame.
    pub fn start(mut self) -> Self {
        self.app.update();
        self
    }

    pub fn add_spawn_volume(&mut self) -> Entity {
        let volume = SpawnVolume::new(Vec2::splat(100.0), self.config.spawn_delay_range);
        self.app
            .world_mut()
            .spawn((volume, Transform::from_xyz(300.0, 0.0, 0.0)))
            .id()
    }

    pub fn place_battery(&mut self, position: Vec3, power: f32) -> Entity {
        let world = self.app.world_mut();
        let entity = {
            let mut commands = world.commands();
            spawn_battery(&mut commands, position, power)
        };
        world.flush();
        entity
    }

    /// Advances time by `secs` and runs one frame.
    pub fn tick(&mut self, secs: f32) {
        self.app
            .world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        self.app.update();
    }

    pub fn collect(&mut self) {
        self.app.world_mut().trigger(CollectPickups);
        self.app.world_mut().flush();
    }

    pub fn mode(&self) -> &BatteryGameMode {
        self.app.world().resource::<BatteryGameMode>()
    }

    pub fn state(&self) -> PlayState {
        self.mode().current_state()
    }

    pub fn entered_count(&self, state: PlayState) -> usize {
        self.app
            .world()
            .resource::<EnteredLog>()
            .0
            .iter()
            .filter(|entered| **entered == state)
            .count()
    }

    pub fn power(&mut self) -> Option<f32> {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&PowerCharacter, With<Player>>();
        query.single(world).ok().map(|c| c.current_power)
    }

    pub fn set_power(&mut self, power: f32) {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<&mut PowerCharacter, With<Player>>();
        if let Ok(mut character) = query.single_mut(world) {
            character.current_power = power;
        }
    }

    pub fn player_components(&mut self) -> Option<(PlayerController, RagdollBody)> {
        let world = self.app.world_mut();
        let mut query =
            world.query_filtered::<(&PlayerController, &RagdollBody), With<Player>>();
        query
            .single(world)
            .ok()
            .map(|(controller, body)| (*controller, *body))
    }

    pub fn active_volumes(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut query = world.query::<&SpawnVolume>();
        query
            .iter(world)
            .filter(|volume| volume.is_spawning_active())
            .count()
    }

    pub fn count<C: Component>(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<(), With<C>>();
        query.iter(world).count()
    }
}
