use chase_grid::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::InputConfig;

/// Agents whose body drops below this height have left the level.
pub const FALL_LIMIT: f32 = -4.0;

pub fn fell_out_of_world(y: f32) -> bool {
    y < FALL_LIMIT
}

/// Directional keys held this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HumanInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Linear and angular impulse for one step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Drive {
    pub impulse: Vec3,
    pub torque: Vec3,
}

impl HumanInput {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }

    /// Map held keys to impulses. Forward is −z; the torque rolls the body in the travel
    /// direction.
    pub fn drive(&self, config: &InputConfig, dt: f32) -> Drive {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let push = config.impulse_strength * dt;
        let roll = config.torque_strength * dt;

        let mut drive = Drive::default();
        if self.forward {
            drive.impulse.z -= push;
            drive.torque.x -= roll;
        }
        if self.backward {
            drive.impulse.z += push;
            drive.torque.x += roll;
        }
        if self.left {
            drive.impulse.x -= push;
            drive.torque.z += roll;
        }
        if self.right {
            drive.impulse.x += push;
            drive.torque.z -= roll;
        }
        drive
    }
}
