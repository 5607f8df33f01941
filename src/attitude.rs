//! Nadir-pointing attitude model.

use nalgebra::{Matrix3, Vector3, Vector6};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nadir-pointing attitude: the reference frame tracks the local
/// orbital geometry, recomputed from the current body-fixed state on
/// every query.
///
/// The nadir frame is x along-track, y cross-track (negative orbit
/// normal), z toward the body center.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NadirPointingAttitude {}

impl NadirPointingAttitude {
    /// Builds the attitude model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation from the body-fixed frame to the nadir frame, built
    /// from the body-fixed position/velocity state. Matrix rows are
    /// the nadir basis vectors expressed in body-fixed axes.
    pub fn fixed_to_nadir(&self, bf_state: &Vector6<f64>) -> Matrix3<f64> {
        let r = Vector3::new(bf_state[0], bf_state[1], bf_state[2]);
        let v = Vector3::new(bf_state[3], bf_state[4], bf_state[5]);

        let r_hat = r.normalize();
        let v_hat = v.normalize();

        let z_n = -r_hat;
        let y_n = (-r_hat.cross(&v_hat)).normalize();
        let x_n = y_n.cross(&z_n);

        Matrix3::from_rows(&[x_n.transpose(), y_n.transpose(), z_n.transpose()])
    }
}

#[cfg(test)]
mod test {
    use super::NadirPointingAttitude;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Vector3, Vector6};

    #[test]
    fn equatorial_circular_basis() {
        let attitude = NadirPointingAttitude::new();
        let bf = Vector6::new(7000.0, 0.0, 0.0, 0.0, 7.5, 0.0);
        let m = attitude.fixed_to_nadir(&bf);

        // along-track sees the velocity direction
        let along = m * Vector3::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(along[0], 1.0, epsilon = 1.0e-12);

        // nadir sees the negated position direction
        let nadir = m * Vector3::new(-1.0, 0.0, 0.0);
        assert_abs_diff_eq!(nadir[2], 1.0, epsilon = 1.0e-12);

        // cross-track is the negative orbit normal
        let cross = m * Vector3::new(0.0, 0.0, -1.0);
        assert_abs_diff_eq!(cross[1], 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn orthonormal_for_eccentric_state() {
        let attitude = NadirPointingAttitude::new();
        // radial velocity component present
        let bf = Vector6::new(6800.0, 1200.0, 2500.0, -1.1, 6.9, 2.2);
        let m = attitude.fixed_to_nadir(&bf);

        let product = m * m.transpose();
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[(row, col)], expected, epsilon = 1.0e-12);
            }
        }

        // z still points at the body center exactly
        let r_hat = Vector3::new(6800.0, 1200.0, 2500.0).normalize();
        let nadir = m * (-r_hat);
        assert_abs_diff_eq!(nadir[2], 1.0, epsilon = 1.0e-12);
    }
}
