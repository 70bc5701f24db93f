// session.rs - Runs the game mode inside Bevy.
//
// The controller itself (game_mode.rs) knows nothing about entities. This
// plugin is the glue: at begin-play it finds the spawn volumes and starts the
// session, then every frame it borrows the player's components, wraps them up
// as Collaborators, and lets the controller tick.

use bevy::prelude::*;

use crate::character::{Player, PlayerController, PowerCharacter, RagdollBody};
use crate::collaborators::{Collaborators, Hud, PlayerControl, Ragdoll, SpawnSource};
use crate::config::GameModeConfig;
use crate::game_mode::{GameStateController, TickOutcome};
use crate::hud::HudSpawner;
use crate::play_state::{PlayState, PlayStateEntered};
use crate::spawn_volume::SpawnVolume;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BatteryGameMode>()
            // PostStartup so everything spawned during Startup is already in
            // the world when we go looking for spawn volumes.
            .add_systems(PostStartup, begin_play_system)
            .add_systems(Update, game_mode_tick_system)
            .add_observer(log_play_state_entered);
    }
}

/// The game mode for the current session, plus the spawn volumes it found
/// when play began.
#[derive(Resource, Default)]
pub struct BatteryGameMode {
    pub controller: GameStateController,
    spawn_volumes: Vec<Entity>,
    last_outcome: Option<TickOutcome>,
}

impl BatteryGameMode {
    pub fn current_state(&self) -> PlayState {
        self.controller.current_state()
    }

    pub fn spawn_volumes(&self) -> &[Entity] {
        &self.spawn_volumes
    }

    /// What the most recent frame's tick did, if the game mode has ticked.
    pub fn last_outcome(&self) -> Option<TickOutcome> {
        self.last_outcome
    }

    /// Adds a volume unless it's already tracked. Returns whether it was added.
    pub fn track_spawn_volume(&mut self, entity: Entity) -> bool {
        if self.spawn_volumes.contains(&entity) {
            return false;
        }
        self.spawn_volumes.push(entity);
        true
    }
}

/// Borrows the tracked volumes out of the query. Volumes that were despawned
/// since begin-play just don't show up.
fn tracked_volumes<'a>(
    tracked: &[Entity],
    volumes: &'a mut Query<(Entity, &mut SpawnVolume)>,
) -> Vec<Mut<'a, SpawnVolume>> {
    volumes
        .iter_mut()
        .filter(|(entity, _)| tracked.contains(entity))
        .map(|(_, volume)| volume)
        .collect()
}

fn begin_play_system(
    mut commands: Commands,
    mut mode: ResMut<BatteryGameMode>,
    config: Option<Res<GameModeConfig>>,
    mut volumes: Query<(Entity, &mut SpawnVolume)>,
    players: Query<&PowerCharacter, With<Player>>,
) {
    let config = config.as_deref().cloned().unwrap_or_default();
    let mode = &mut *mode;
    mode.controller = GameStateController::new(config.decay_rate);
    mode.last_outcome = None;

    for (entity, _) in volumes.iter() {
        mode.track_spawn_volume(entity);
    }
    info!("found {} spawn volumes", mode.spawn_volumes.len());

    let initial_power = players.single().ok().map(|character| character.initial_power);

    {
        let mut sources = tracked_volumes(&mode.spawn_volumes, &mut volumes);
        let mut hud = HudSpawner {
            commands: &mut commands,
        };
        let mut collaborators = Collaborators {
            spawn_sources: sources
                .iter_mut()
                .map(|volume| &mut **volume as &mut dyn SpawnSource)
                .collect(),
            ..Default::default()
        };
        if config.show_hud {
            collaborators.hud = Some(&mut hud as &mut dyn Hud);
        }

        match initial_power {
            Some(initial_power) => {
                mode.controller
                    .start_session(initial_power, &mut collaborators);
            }
            None => {
                warn!("no player character found; playing without a power budget");
                mode.controller.set_state(PlayState::Playing, &mut collaborators);
                if let Some(hud) = collaborators.hud.as_deref_mut() {
                    hud.show_hud();
                }
            }
        }
    }

    commands.trigger(PlayStateEntered {
        state: mode.controller.current_state(),
    });
}

fn game_mode_tick_system(
    mut commands: Commands,
    mut mode: ResMut<BatteryGameMode>,
    time: Res<Time>,
    mut players: Query<
        (
            &mut PowerCharacter,
            Option<&mut PlayerController>,
            Option<&mut RagdollBody>,
        ),
        With<Player>,
    >,
    mut volumes: Query<(Entity, &mut SpawnVolume)>,
) {
    // Nobody to drain or judge this frame.
    let Ok((mut character, mut player_controller, mut body)) = players.single_mut() else {
        return;
    };
    let mode = &mut *mode;

    let outcome = {
        let mut sources = tracked_volumes(&mode.spawn_volumes, &mut volumes);
        let mut collaborators = Collaborators {
            spawn_sources: sources
                .iter_mut()
                .map(|volume| &mut **volume as &mut dyn SpawnSource)
                .collect(),
            player_control: player_controller
                .as_deref_mut()
                .map(|c| c as &mut dyn PlayerControl),
            ragdoll: body.as_deref_mut().map(|b| b as &mut dyn Ragdoll),
            hud: None,
        };
        mode.controller
            .tick_player(&mut *character, time.delta_secs(), &mut collaborators)
    };
    mode.last_outcome = Some(outcome);

    if let Some(state) = outcome.entered {
        commands.trigger(PlayStateEntered { state });
    }
}

fn log_play_state_entered(trigger: On<PlayStateEntered>) {
    debug!("entered {:?}", trigger.state);
}
