//! Conical field of view.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axisymmetric FOV: a target is visible when its cone angle does not
/// exceed the half-cone angle. The clock angle plays no role.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConicalSensor {
    /// Half-cone angle (radians).
    half_angle: f64,
}

impl ConicalSensor {
    /// Builds a [ConicalSensor] with the given half-cone angle (radians).
    pub fn new(half_angle: f64) -> Self {
        Self { half_angle }
    }

    /// Returns the half-cone angle (radians).
    pub fn field_of_view(&self) -> f64 {
        self.half_angle
    }

    /// Sets the half-cone angle (radians).
    pub fn set_field_of_view(&mut self, half_angle: f64) {
        self.half_angle = half_angle;
    }

    pub(crate) fn max_excursion_angle(&self) -> f64 {
        self.half_angle
    }

    pub(crate) fn check_target_visibility(&self, cone: f64, _clock: f64) -> bool {
        cone <= self.half_angle
    }
}
