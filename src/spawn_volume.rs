use bevy::prelude::*;
use rand::Rng;

use crate::collaborators::SpawnSource;
use crate::config::GameModeConfig;
use crate::pickup::BatteryPickup;

pub struct SpawnVolumePlugin;

impl Plugin for SpawnVolumePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, spawn_volume_system);
    }
}

/// A box in the world that drops batteries at random spots inside itself
/// while spawning is active.
///
/// The volume sits at its entity's Transform; `half_extents` is how far the
/// box reaches from that centre on each axis.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct SpawnVolume {
    pub half_extents: Vec2,
    /// Seconds between spawns, drawn uniformly from (low, high) each time.
    pub spawn_delay_range: (f32, f32),
    /// Counts down to the next spawn. Only set while spawning is active.
    pub timer: Option<Timer>,
    pub active: bool,
}

impl SpawnVolume {
    pub fn new(half_extents: Vec2, spawn_delay_range: (f32, f32)) -> Self {
        Self {
            half_extents,
            spawn_delay_range,
            timer: None,
            active: false,
        }
    }

    pub fn is_spawning_active(&self) -> bool {
        self.active
    }

    /// Random delay for the next spawn. A reversed or empty range just uses
    /// its lower bound.
    fn random_delay(&self) -> f32 {
        let (low, high) = self.spawn_delay_range;
        let low = low.max(0.0);
        if high > low {
            rand::thread_rng().gen_range(low..high)
        } else {
            low
        }
    }

    fn arm(&mut self) {
        self.timer = Some(Timer::from_seconds(self.random_delay(), TimerMode::Once));
    }

    /// Random point inside the box, relative to the volume's centre.
    pub fn random_point(&self) -> Vec2 {
        let mut rng = rand::thread_rng();
        let mut axis = |half: f32| {
            if half > 0.0 {
                rng.gen_range(-half..=half)
            } else {
                0.0
            }
        };
        Vec2::new(axis(self.half_extents.x), axis(self.half_extents.y))
    }
}

impl SpawnSource for SpawnVolume {
    fn set_spawning_active(&mut self, active: bool) {
        self.active = active;
        if active {
            self.arm();
        } else {
            self.timer = None;
        }
    }
}

/// Ticks every active volume; when a timer runs out, drop a battery and
/// re-arm with a fresh random delay.
fn spawn_volume_system(
    mut commands: Commands,
    mut volumes: Query<(&mut SpawnVolume, &Transform)>,
    config: Option<Res<GameModeConfig>>,
    time: Res<Time>,
) {
    let battery_power = config
        .map(|c| c.battery_power)
        .unwrap_or(crate::pickup::DEFAULT_BATTERY_POWER);

    for (mut volume, transform) in volumes.iter_mut() {
        if !volume.active {
            continue;
        }
        let Some(timer) = volume.timer.as_mut() else {
            continue;
        };
        timer.tick(time.delta());
        if !timer.just_finished() {
            continue;
        }

        let offset = volume.random_point();
        let position = transform.translation + offset.extend(0.0);
        spawn_battery(&mut commands, position, battery_power);
        debug!("spawn volume dropped a battery at {:?}", position);

        volume.arm();
    }
}

pub fn spawn_battery(commands: &mut Commands, position: Vec3, power: f32) -> Entity {
    commands
        .spawn((
            BatteryPickup::new(power),
            Transform::from_translation(position),
            Sprite::from_color(Color::srgb(0.3, 0.9, 0.4), Vec2::splat(16.0)),
        ))
        .id()
}
