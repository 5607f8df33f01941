//! Pointing sensors and their field-of-view containment predicates.
//!
//! A target direction is always handed to a sensor in the sensor frame,
//! in (cone, clock) form: the cone angle is measured from the +Z
//! boresight in [0, π], the clock angle counter-clockwise from +X in
//! the XY plane, in [0, 2π) (undefined on the boresight itself).

use crate::rotation::{euler_to_matrix, EulerSequence};

use nalgebra::{Matrix3, Vector3};

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod conical;
mod custom;
mod rectangular;

pub use conical::ConicalSensor;
pub use custom::CustomSensor;
pub use rectangular::RectangularSensor;

/// Converts a sensor-frame unit direction to (cone, clock) angles.
pub fn vector_to_cone_clock(v: &Vector3<f64>) -> (f64, f64) {
    let cone = crate::orbit::clamped_acos(v[2] / v.norm());
    let mut clock = v[1].atan2(v[0]);
    if clock < 0.0 {
        clock += 2.0 * PI;
    }
    (cone, clock)
}

/// Converts (cone, clock) angles to a sensor-frame unit direction.
pub fn cone_clock_to_vector(cone: f64, clock: f64) -> Vector3<f64> {
    Vector3::new(
        cone.sin() * clock.cos(),
        cone.sin() * clock.sin(),
        cone.cos(),
    )
}

/// The closed set of FOV shapes a [Sensor] can carry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Fov {
    /// Axisymmetric cone about the boresight.
    Conical(ConicalSensor),

    /// Two orthogonal angular extents about the boresight.
    Rectangular(RectangularSensor),

    /// Arbitrary closed polygon on the unit sphere.
    Custom(CustomSensor),
}

/// A pointing sensor: a body→sensor mounting rotation (an Euler triple
/// with a 1..3 axis sequence, identity by default) plus an FOV shape.
///
/// The maximum-excursion half-angle of the shape serves as a cheap
/// rejection test ahead of the exact containment predicate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sensor {
    /// Mounting Euler angles (radians), applied per `mount_sequence`.
    mount_angles: [f64; 3],

    /// Mounting Euler axis sequence.
    mount_sequence: EulerSequence,

    /// Cached body→sensor rotation.
    body_to_sensor: Matrix3<f64>,

    /// FOV shape.
    fov: Fov,
}

impl Sensor {
    /// Builds a [Sensor] around the given [Fov], mounted along the
    /// spacecraft body axes (identity rotation).
    pub fn new(fov: Fov) -> Self {
        Self {
            mount_angles: [0.0; 3],
            mount_sequence: EulerSequence::default(),
            body_to_sensor: Matrix3::identity(),
            fov,
        }
    }

    /// Convenience constructor for a conical FOV of the given
    /// half-angle (radians).
    pub fn conical(half_angle: f64) -> Self {
        Self::new(Fov::Conical(ConicalSensor::new(half_angle)))
    }

    /// Convenience constructor for a rectangular FOV of the given full
    /// angular extents (radians).
    pub fn rectangular(angle_height: f64, angle_width: f64) -> Self {
        Self::new(Fov::Rectangular(RectangularSensor::new(
            angle_height,
            angle_width,
        )))
    }

    /// Convenience constructor for a custom polygonal FOV; fails on
    /// inconsistent polygon data.
    pub fn custom(cone_angles: &[f64], clock_angles: &[f64]) -> Result<Self, crate::errors::FovError> {
        Ok(Self::new(Fov::Custom(CustomSensor::new(
            cone_angles,
            clock_angles,
        )?)))
    }

    /// Sets the sensor-body mounting offset: three Euler angles
    /// (radians) applied along the given axis sequence.
    pub fn set_body_offset_angles(&mut self, angles: [f64; 3], sequence: EulerSequence) {
        self.mount_angles = angles;
        self.mount_sequence = sequence;
        self.body_to_sensor = euler_to_matrix(angles, sequence);
    }

    /// Copies and returns [Sensor] with the given mounting offset.
    pub fn with_body_offset_angles(&self, angles: [f64; 3], sequence: EulerSequence) -> Self {
        let mut s = self.clone();
        s.set_body_offset_angles(angles, sequence);
        s
    }

    /// Returns the cached body→sensor rotation matrix.
    pub fn body_to_sensor_matrix(&self) -> Matrix3<f64> {
        self.body_to_sensor
    }

    /// Returns the mounting Euler angles and their axis sequence.
    pub fn body_offset_angles(&self) -> ([f64; 3], EulerSequence) {
        (self.mount_angles, self.mount_sequence)
    }

    /// Returns the FOV shape.
    pub fn fov(&self) -> &Fov {
        &self.fov
    }

    /// Maximum angular excursion of the FOV from the boresight
    /// (radians); directions beyond it are never visible.
    pub fn max_excursion_angle(&self) -> f64 {
        match &self.fov {
            Fov::Conical(c) => c.max_excursion_angle(),
            Fov::Rectangular(r) => r.max_excursion_angle(),
            Fov::Custom(c) => c.max_excursion_angle(),
        }
    }

    /// True when the sensor-frame direction (cone, clock) lies inside
    /// the FOV. Never fails: degenerate geometry yields `false`.
    pub fn check_target_visibility(&self, cone: f64, clock: f64) -> bool {
        if cone > self.max_excursion_angle() {
            return false;
        }

        match &self.fov {
            Fov::Conical(c) => c.check_target_visibility(cone, clock),
            Fov::Rectangular(r) => r.check_target_visibility(cone, clock),
            Fov::Custom(c) => c.check_target_visibility(cone, clock),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{cone_clock_to_vector, vector_to_cone_clock, Sensor};
    use crate::rotation::EulerSequence;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn cone_clock_vector_round_trip() {
        for (cone, clock) in [
            (0.3, 0.0),
            (0.3, 1.0),
            (1.5, 4.7),
            (2.9, 6.0),
            (0.5 * PI, 0.5 * PI),
        ] {
            let v = cone_clock_to_vector(cone, clock);
            assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1.0e-12);

            let (cone_out, clock_out) = vector_to_cone_clock(&v);
            assert_abs_diff_eq!(cone_out, cone, epsilon = 1.0e-12);
            assert_abs_diff_eq!(clock_out, clock, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn boresight_maps_to_zero_cone() {
        let (cone, _) = vector_to_cone_clock(&cone_clock_to_vector(0.0, 0.0));
        assert_abs_diff_eq!(cone, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn mount_matrix() {
        // published 3-2-1 truth matrix, through the sensor API
        let mut sensor = Sensor::conical(25.0_f64.to_radians());
        sensor.set_body_offset_angles([0.2, 0.25, 0.3], EulerSequence::new(3, 2, 1));

        let m = sensor.body_to_sensor_matrix();
        let truth = [
            [0.949599, 0.192493, -0.247404],
            [-0.118141, 0.950819, 0.286333],
            [0.290353, -0.242673, 0.925637],
        ];
        for row in 0..3 {
            for col in 0..3 {
                assert_abs_diff_eq!(m[(row, col)], truth[row][col], epsilon = 1.0e-4);
            }
        }
    }

    #[test]
    fn default_mount_is_identity() {
        let sensor = Sensor::conical(0.5);
        let m = sensor.body_to_sensor_matrix();
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(m[(row, col)], expected, epsilon = 1.0e-15);
            }
        }
    }
}
