//! Keyboard input for driving controls.
//!
//! Key state is polled once per frame into the `DriverInput` resource. The
//! fixed-rate control tick reads whatever was committed most recently, so
//! input timing never races the simulation step.

use bevy::prelude::*;

/// Throttle/brake selector. Direct mapping from key state, no memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Power {
    Accelerate,
    Brake,
    #[default]
    Idle,
}

/// Requested steering direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SteerDirection {
    Left,
    Right,
    #[default]
    Center,
}

/// Resource tracking the driver's current inputs.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverInput {
    pub power: Power,
    pub direction: SteerDirection,
}

/// System to refresh `DriverInput` from keyboard state.
pub fn read_driver_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<DriverInput>) {
    *input = map_keys(&keyboard);
}

/// Map key state to driver input. Left wins when both directions are held.
fn map_keys(keyboard: &ButtonInput<KeyCode>) -> DriverInput {
    let direction = if keyboard.pressed(KeyCode::ArrowLeft) || keyboard.pressed(KeyCode::KeyA) {
        SteerDirection::Left
    } else if keyboard.pressed(KeyCode::ArrowRight) || keyboard.pressed(KeyCode::KeyD) {
        SteerDirection::Right
    } else {
        SteerDirection::Center
    };

    let power = if keyboard.pressed(KeyCode::ArrowUp) || keyboard.pressed(KeyCode::KeyW) {
        Power::Accelerate
    } else if keyboard.pressed(KeyCode::ArrowDown) || keyboard.pressed(KeyCode::KeyS) {
        Power::Brake
    } else {
        Power::Idle
    };

    DriverInput { power, direction }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard(pressed: &[KeyCode]) -> ButtonInput<KeyCode> {
        let mut keys = ButtonInput::default();
        for key in pressed {
            keys.press(*key);
        }
        keys
    }

    #[test]
    fn released_keys_map_to_idle_center() {
        let input = map_keys(&keyboard(&[]));
        assert_eq!(input.power, Power::Idle);
        assert_eq!(input.direction, SteerDirection::Center);
    }

    #[test]
    fn arrows_and_wasd_are_equivalent() {
        for (arrow, letter) in [
            (KeyCode::ArrowUp, KeyCode::KeyW),
            (KeyCode::ArrowDown, KeyCode::KeyS),
            (KeyCode::ArrowLeft, KeyCode::KeyA),
            (KeyCode::ArrowRight, KeyCode::KeyD),
        ] {
            assert_eq!(map_keys(&keyboard(&[arrow])), map_keys(&keyboard(&[letter])));
        }
    }

    #[test]
    fn left_wins_when_both_directions_held() {
        let input = map_keys(&keyboard(&[KeyCode::ArrowLeft, KeyCode::ArrowRight]));
        assert_eq!(input.direction, SteerDirection::Left);
    }

    #[test]
    fn accelerate_wins_when_both_pedals_held() {
        let input = map_keys(&keyboard(&[KeyCode::ArrowUp, KeyCode::ArrowDown]));
        assert_eq!(input.power, Power::Accelerate);
    }
}
