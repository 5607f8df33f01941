//! Passive (coordinate-system) rotation matrices and Euler sequences.

use nalgebra::Matrix3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Passive rotation about the X axis by `angle` (radians):
/// rotates the coordinate system, not the vector.
pub fn r1(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, c, s, //
        0.0, -s, c,
    )
}

/// Passive rotation about the Y axis by `angle` (radians).
pub fn r2(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, 0.0, -s, //
        0.0, 1.0, 0.0, //
        s, 0.0, c,
    )
}

/// Passive rotation about the Z axis by `angle` (radians).
pub fn r3(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, s, 0.0, //
        -s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// A three-axis Euler rotation order. Axes are numbered 1 (X) to 3 (Z);
/// the first axis is applied first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerSequence {
    axes: [u8; 3],
}

impl Default for EulerSequence {
    /// The 1-2-3 sequence.
    fn default() -> Self {
        Self { axes: [1, 2, 3] }
    }
}

impl EulerSequence {
    /// Builds an [EulerSequence] from three axis numbers in 1..=3.
    /// Out-of-range axes saturate to Z.
    pub fn new(first: u8, second: u8, third: u8) -> Self {
        Self {
            axes: [first.clamp(1, 3), second.clamp(1, 3), third.clamp(1, 3)],
        }
    }

    /// Returns the axis numbers, first-applied first.
    pub fn axes(&self) -> [u8; 3] {
        self.axes
    }
}

/// Composes three passive axis rotations into a single matrix.
///
/// `angles[k]` is applied about `sequence.axes()[k]`, first entry first,
/// so the result is `R_ax3(θ3) · R_ax2(θ2) · R_ax1(θ1)`.
pub fn euler_to_matrix(angles: [f64; 3], sequence: EulerSequence) -> Matrix3<f64> {
    let mut matrix = Matrix3::identity();
    for (angle, axis) in angles.iter().zip(sequence.axes()) {
        let single = match axis {
            1 => r1(*angle),
            2 => r2(*angle),
            _ => r3(*angle),
        };
        matrix = single * matrix;
    }
    matrix
}
