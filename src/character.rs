// character.rs - The player's body: power, movement, collecting, and the ragdoll.
//
// The game mode only ever sees this entity through the collaborator traits.
// PowerCharacter is the PlayerPower, PlayerController is the PlayerControl,
// and RagdollBody is the Ragdoll.

use bevy::prelude::*;

use crate::collaborators::{PlayerControl, PlayerPower, Ragdoll};
use crate::config::GameModeConfig;
use crate::pickup::{collect_battery, BatteryPickup, Pickup};

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (collect_input_system, movement_system))
            .add_observer(on_collect_pickups);
    }
}

/// Marks the entity the local player controls.
#[derive(Component, Default)]
pub struct Player;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PowerCharacter {
    pub initial_power: f32,
    pub current_power: f32,
}

impl PowerCharacter {
    pub fn new(initial_power: f32) -> Self {
        Self {
            initial_power,
            current_power: initial_power,
        }
    }

    /// Walk speed grows with power, so a well-fed character is faster.
    pub fn speed(&self, base_speed: f32, speed_factor: f32) -> f32 {
        base_speed + speed_factor * self.current_power
    }
}

impl PlayerPower for PowerCharacter {
    fn initial_power(&self) -> f32 {
        self.initial_power
    }

    fn current_power(&self) -> f32 {
        self.current_power
    }

    fn update_power(&mut self, delta: f32) {
        self.current_power += delta;
    }
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct PlayerController {
    pub input_blocked: bool,
}

impl PlayerControl for PlayerController {
    fn set_input_blocked(&mut self, blocked: bool) {
        self.input_blocked = blocked;
    }
}

/// Physics is the engine's problem; these flags are what the loss sets.
#[derive(Component, Clone, Copy, Debug)]
pub struct RagdollBody {
    pub simulate_physics: bool,
    pub can_jump: bool,
}

impl Default for RagdollBody {
    fn default() -> Self {
        Self {
            simulate_physics: false,
            can_jump: true,
        }
    }
}

impl Ragdoll for RagdollBody {
    fn enable_physics_simulation(&mut self) {
        self.simulate_physics = true;
    }

    fn disable_jump(&mut self) {
        self.can_jump = false;
    }
}

/// Pickups whose centre is within `radius` of the player can be collected.
#[derive(Component, Clone, Copy, Debug)]
pub struct CollectionSphere {
    pub radius: f32,
}

/// Everything the player entity needs, built from the config.
pub fn player_bundle(config: &GameModeConfig) -> impl Bundle {
    (
        Player,
        PowerCharacter::new(config.initial_power),
        PlayerController::default(),
        RagdollBody::default(),
        CollectionSphere {
            radius: config.collection_radius,
        },
        Transform::default(),
    )
}

/// Asks the player to pick up everything in reach. Triggered by the collect
/// key, but anything can fire it.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct CollectPickups;

fn collect_input_system(
    mut commands: Commands,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    players: Query<&PlayerController, With<Player>>,
) {
    let Some(keys) = keys else {
        return;
    };
    if !keys.just_pressed(KeyCode::KeyC) {
        return;
    }
    // No controller means nothing is blocking input.
    let blocked = players
        .single()
        .map(|controller| controller.input_blocked)
        .unwrap_or(false);
    if !blocked {
        commands.trigger(CollectPickups);
    }
}

/// Sums the power of every active battery inside the player's collection
/// sphere, removes them, and gives the total to the player.
fn on_collect_pickups(
    _trigger: On<CollectPickups>,
    mut commands: Commands,
    mut players: Query<(&mut PowerCharacter, &CollectionSphere, &Transform), With<Player>>,
    mut pickups: Query<(Entity, &mut Pickup, &BatteryPickup, &Transform), Without<Player>>,
) {
    let Ok((mut character, sphere, player_transform)) = players.single_mut() else {
        debug!("collect requested with no player in the world");
        return;
    };

    let mut collected_power = 0.0;
    let mut collected = 0;
    for (entity, mut pickup, battery, transform) in pickups.iter_mut() {
        if transform.translation.distance(player_transform.translation) > sphere.radius {
            continue;
        }
        if let Some(power) = collect_battery(&mut commands, entity, &mut pickup, battery) {
            collected_power += power;
            collected += 1;
        }
    }

    if collected_power > 0.0 {
        character.update_power(collected_power);
        info!(
            collected,
            collected_power,
            current_power = character.current_power,
            "collected batteries"
        );
    }
}

fn movement_system(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    config: Option<Res<GameModeConfig>>,
    time: Res<Time>,
    mut players: Query<(&mut Transform, &PowerCharacter, Option<&PlayerController>), With<Player>>,
) {
    let Some(keys) = keys else {
        return;
    };
    let (base_speed, speed_factor) = match config {
        Some(c) => (c.base_speed, c.speed_factor),
        None => {
            let defaults = GameModeConfig::default();
            (defaults.base_speed, defaults.speed_factor)
        }
    };

    let mut direction = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    if direction == Vec2::ZERO {
        return;
    }
    let direction = direction.normalize();

    for (mut transform, character, controller) in players.iter_mut() {
        if controller.is_some_and(|c| c.input_blocked) {
            continue;
        }
        let speed = character.speed(base_speed, speed_factor);
        transform.translation += (direction * speed * time.delta_secs()).extend(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.add_plugins(CharacterPlugin);
        app
    }

    fn spawn_player(app: &mut App, power: f32, radius: f32) -> Entity {
        let config = GameModeConfig {
            initial_power: power,
            collection_radius: radius,
            ..Default::default()
        };
        app.world_mut().spawn(player_bundle(&config)).id()
    }

    fn spawn_battery_at(app: &mut App, x: f32, power: f32) -> Entity {
        app.world_mut()
            .spawn((BatteryPickup::new(power), Transform::from_xyz(x, 0.0, 0.0)))
            .id()
    }

    /// Holds D down for one second of game time.
    fn walk_right_for_a_second(app: &mut App) {
        app.init_resource::<ButtonInput<KeyCode>>();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyD);
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(std::time::Duration::from_secs(1));
        app.update();
    }

    fn player_x(app: &App, player: Entity) -> Option<f32> {
        app.world()
            .get::<Transform>(player)
            .map(|transform| transform.translation.x)
    }

    #[test]
    fn movement_speed_follows_power() {
        let mut app = collect_app();
        app.insert_resource(GameModeConfig {
            base_speed: 10.0,
            speed_factor: 0.5,
            ..Default::default()
        });
        let player = spawn_player(&mut app, 100.0, 200.0);

        walk_right_for_a_second(&mut app);

        let expected = PowerCharacter::new(100.0).speed(10.0, 0.5);
        assert_eq!(expected, 60.0);
        let x = player_x(&app, player).unwrap_or_default();
        assert!((x - expected).abs() < 1e-3, "player at x={x}");
    }

    #[test]
    fn blocked_input_stops_movement() {
        let mut app = collect_app();
        app.insert_resource(GameModeConfig::default());
        let player = spawn_player(&mut app, 100.0, 200.0);
        app.world_mut()
            .entity_mut(player)
            .insert(PlayerController { input_blocked: true });

        walk_right_for_a_second(&mut app);

        assert_eq!(player_x(&app, player), Some(0.0));
    }

    #[test]
    fn update_power_adds_without_clamping() {
        let mut character = PowerCharacter::new(100.0);
        character.update_power(-250.0);
        assert_eq!(character.current_power(), -150.0);
        assert_eq!(character.initial_power(), 100.0);
    }

    #[test]
    fn speed_scales_with_power() {
        let character = PowerCharacter::new(2000.0);
        assert_eq!(character.speed(10.0, 0.75), 1510.0);
    }

    #[test]
    fn ragdoll_and_controller_flags() {
        let mut body = RagdollBody::default();
        body.enable_physics_simulation();
        body.disable_jump();
        assert!(body.simulate_physics);
        assert!(!body.can_jump);

        let mut controller = PlayerController::default();
        controller.set_input_blocked(true);
        assert!(controller.input_blocked);
    }

    #[test]
    fn collecting_a_default_battery_adds_150_and_removes_it() {
        let mut app = collect_app();
        let player = spawn_player(&mut app, 1000.0, 200.0);
        let battery = spawn_battery_at(&mut app, 50.0, 150.0);

        app.world_mut().trigger(CollectPickups);
        app.world_mut().flush();

        let character = app.world().get::<PowerCharacter>(player).copied();
        assert_eq!(character.map(|c| c.current_power), Some(1150.0));
        assert!(app.world().get_entity(battery).is_err());
    }

    #[test]
    fn out_of_reach_and_inactive_batteries_stay() {
        let mut app = collect_app();
        let player = spawn_player(&mut app, 1000.0, 100.0);
        let near = spawn_battery_at(&mut app, 10.0, 150.0);
        let far = spawn_battery_at(&mut app, 500.0, 150.0);
        let inactive = spawn_battery_at(&mut app, 20.0, 150.0);
        app.world_mut().entity_mut(inactive).insert(Pickup { active: false });

        app.world_mut().trigger(CollectPickups);
        app.world_mut().flush();

        let power = app.world().get::<PowerCharacter>(player).map(|c| c.current_power);
        assert_eq!(power, Some(1150.0));
        assert!(app.world().get_entity(near).is_err());
        assert!(app.world().get_entity(far).is_ok());
        assert!(app.world().get_entity(inactive).is_ok());
    }

    #[test]
    fn collecting_twice_only_counts_each_battery_once() {
        let mut app = collect_app();
        let player = spawn_player(&mut app, 1000.0, 200.0);
        spawn_battery_at(&mut app, 0.0, 150.0);
        spawn_battery_at(&mut app, 5.0, 150.0);

        app.world_mut().trigger(CollectPickups);
        app.world_mut().flush();
        app.world_mut().trigger(CollectPickups);
        app.world_mut().flush();

        let power = app.world().get::<PowerCharacter>(player).map(|c| c.current_power);
        assert_eq!(power, Some(1300.0));
    }

    #[test]
    fn collect_without_player_does_nothing() {
        let mut app = collect_app();
        let battery = spawn_battery_at(&mut app, 0.0, 150.0);
        app.world_mut().trigger(CollectPickups);
        app.world_mut().flush();
        assert!(app.world().get_entity(battery).is_ok());
    }

    #[test]
    fn blocked_input_ignores_the_collect_key() {
        let mut app = collect_app();
        app.init_resource::<ButtonInput<KeyCode>>();
        let player = spawn_player(&mut app, 1000.0, 200.0);
        let battery = spawn_battery_at(&mut app, 0.0, 150.0);
        app.world_mut()
            .entity_mut(player)
            .insert(PlayerController { input_blocked: true });

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyC);
        app.update();

        assert!(app.world().get_entity(battery).is_ok());
    }

    #[test]
    fn collect_key_collects_when_not_blocked() {
        let mut app = collect_app();
        app.init_resource::<ButtonInput<KeyCode>>();
        let player = spawn_player(&mut app, 1000.0, 200.0);
        spawn_battery_at(&mut app, 0.0, 150.0);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyC);
        app.update();

        let power = app.world().get::<PowerCharacter>(player).map(|c| c.current_power);
        assert_eq!(power, Some(1150.0));
    }
}
