use chase_core::{ensure_non_negative, ensure_positive, ConfigError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteeringConfig {
    /// Seconds between path re-plans.
    pub replan_interval: f32,
    /// Agents closer than this to the target stop following and brake.
    pub follow_radius: f32,
    /// Distance at which the steering node counts as reached.
    pub arrival_radius: f32,
    pub max_speed: f32,
    /// Velocity-error gain for path following.
    pub gain: f32,
    /// Velocity damping gain used when there is nothing to follow.
    pub brake_gain: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            replan_interval: 0.5,
            follow_radius: 2.0,
            arrival_radius: 0.4,
            max_speed: 6.0,
            gain: 5.0,
            brake_gain: 2.0,
        }
    }
}

impl SteeringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("replan_interval", self.replan_interval)?;
        ensure_non_negative("follow_radius", self.follow_radius)?;
        ensure_positive("arrival_radius", self.arrival_radius)?;
        ensure_non_negative("max_speed", self.max_speed)?;
        ensure_non_negative("gain", self.gain)?;
        ensure_non_negative("brake_gain", self.brake_gain)?;
        Ok(())
    }
}

/// Human control strengths, applied per second of input.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    pub impulse_strength: f32,
    pub torque_strength: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            impulse_strength: 0.6,
            torque_strength: 0.2,
        }
    }
}

impl InputConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("impulse_strength", self.impulse_strength)?;
        ensure_non_negative("torque_strength", self.torque_strength)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TargetTrackingConfig {
    /// Seconds between broadcasts of the human agent's position.
    pub broadcast_interval: f32,
}

impl Default for TargetTrackingConfig {
    fn default() -> Self {
        Self {
            broadcast_interval: 0.1,
        }
    }
}

impl TargetTrackingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("broadcast_interval", self.broadcast_interval)
    }
}
