use bevy::prelude::*;

use crate::character::{Player, PowerCharacter};
use crate::collaborators::Hud;
use crate::play_state::{PlayState, PlayStateEntered};
use crate::session::BatteryGameMode;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_hud_text_system)
            .add_observer(on_play_state_entered);
    }
}

/// The power readout in the top-left corner.
#[derive(Component)]
pub struct HudText;

/// The big end-of-game message. Spawned at most once per session.
#[derive(Component)]
pub struct HudBanner;

/// Spawns the HUD when the game mode asks for it.
pub struct HudSpawner<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
}

impl Hud for HudSpawner<'_, '_, '_> {
    fn show_hud(&mut self) {
        self.commands.spawn((
            HudText,
            Text::new(""),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(Color::srgb(0.8, 0.8, 0.8)),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(20.0),
                left: Val::Px(20.0),
                ..default()
            },
        ));
        debug!("HUD shown");
    }
}

pub fn hud_readout(current_power: f32, power_to_win: f32) -> String {
    format!(
        "Power: {:.0}\nPower to win: {:.0}",
        current_power.max(0.0),
        power_to_win
    )
}

fn banner_message(state: PlayState) -> Option<&'static str> {
    match state {
        PlayState::Won => Some("YOU WIN!"),
        PlayState::GameOver => Some("GAME OVER"),
        PlayState::Playing | PlayState::Unknown => None,
    }
}

fn update_hud_text_system(
    mode: Option<Res<BatteryGameMode>>,
    players: Query<&PowerCharacter, With<Player>>,
    mut texts: Query<&mut Text, With<HudText>>,
) {
    let Some(mode) = mode else {
        return;
    };
    let Ok(character) = players.single() else {
        return;
    };
    let readout = hud_readout(character.current_power, mode.controller.power_to_win());
    for mut text in texts.iter_mut() {
        if text.0 != readout {
            text.0 = readout.clone();
        }
    }
}

fn on_play_state_entered(
    trigger: On<PlayStateEntered>,
    mut commands: Commands,
    huds: Query<(), With<HudText>>,
    banners: Query<(), With<HudBanner>>,
) {
    let Some(message) = banner_message(trigger.state) else {
        return;
    };
    // No HUD, no banner; and re-entering the state doesn't stack banners.
    if huds.is_empty() || !banners.is_empty() {
        return;
    }

    commands
        .spawn((
            HudBanner,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(message),
                TextFont {
                    font_size: 120.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(Justify::Center),
            ));
        });
}
