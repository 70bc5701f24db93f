use bevy::prelude::*;

/// How much power a battery gives unless configured otherwise.
pub const DEFAULT_BATTERY_POWER: f32 = 150.0;

/// A collectible battery outside of any world.
///
/// `collect` takes the battery by value, so once it has been collected there
/// is nothing left to collect a second time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Battery {
    power: f32,
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(DEFAULT_BATTERY_POWER)
    }
}

impl Battery {
    pub fn new(power: f32) -> Self {
        Self { power }
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    /// Hands over the battery's power and consumes it.
    pub fn collect(self) -> f32 {
        self.power
    }
}

/// Base pickup state shared by everything the player can pick up.
/// Inactive pickups are ignored by the collect action.
#[derive(Component, Clone, Copy, Debug)]
pub struct Pickup {
    pub active: bool,
}

impl Default for Pickup {
    fn default() -> Self {
        Self { active: true }
    }
}

/// A battery living in the world. Spawning one also gives it a `Pickup`.
#[derive(Component, Clone, Copy, Debug)]
#[require(Pickup, Transform)]
pub struct BatteryPickup(pub Battery);

impl BatteryPickup {
    pub fn new(power: f32) -> Self {
        Self(Battery::new(power))
    }
}

/// Collects a single battery entity: deactivates it, despawns it, and
/// returns its power. Returns `None` if the pickup was already inactive.
pub fn collect_battery(
    commands: &mut Commands,
    entity: Entity,
    pickup: &mut Pickup,
    battery: &BatteryPickup,
) -> Option<f32> {
    if !pickup.active {
        return None;
    }
    // Deactivate first so another overlap this frame can't claim it again,
    // the despawn below only happens when commands are applied.
    pickup.active = false;
    commands.entity(entity).despawn();
    Some(battery.0.collect())
}
