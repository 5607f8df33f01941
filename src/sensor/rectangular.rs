//! Rectangular field of view.

use crate::orbit::clamped_acos;
use crate::sensor::cone_clock_to_vector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rectangular FOV described by its full angular extents: the height
/// spans the sensor YZ plane (clock ±90°), the width the XZ plane
/// (clock 0°/180°).
///
/// The target's signed off-axis angles — about the sensor X axis
/// `atan2(y, z)` and about Y `atan2(x, z)` — are compared strictly
/// against half of each extent, so the boundary itself is not visible
/// and a zero-extent FOV contains nothing.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RectangularSensor {
    /// Full angular extent across the YZ plane (radians).
    angle_height: f64,

    /// Full angular extent across the XZ plane (radians).
    angle_width: f64,
}

impl RectangularSensor {
    /// Builds a [RectangularSensor] from its full angular extents
    /// (radians).
    pub fn new(angle_height: f64, angle_width: f64) -> Self {
        Self {
            angle_height,
            angle_width,
        }
    }

    /// Returns the full height extent (radians).
    pub fn angle_height(&self) -> f64 {
        self.angle_height
    }

    /// Sets the full height extent (radians).
    pub fn set_angle_height(&mut self, angle_height: f64) {
        self.angle_height = angle_height;
    }

    /// Returns the full width extent (radians).
    pub fn angle_width(&self) -> f64 {
        self.angle_width
    }

    /// Sets the full width extent (radians).
    pub fn set_angle_width(&mut self, angle_width: f64) {
        self.angle_width = angle_width;
    }

    pub(crate) fn max_excursion_angle(&self) -> f64 {
        // great-circle distance from the boresight to a corner
        clamped_acos((self.angle_height / 2.0).cos() * (self.angle_width / 2.0).cos())
    }

    pub(crate) fn check_target_visibility(&self, cone: f64, clock: f64) -> bool {
        let v = cone_clock_to_vector(cone, clock);

        let off_height = v[1].atan2(v[2]);
        let off_width = v[0].atan2(v[2]);

        off_height.abs() < self.angle_height / 2.0 && off_width.abs() < self.angle_width / 2.0
    }
}
