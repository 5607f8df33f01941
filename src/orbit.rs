//! Orbital state with Cartesian and Keplerian views.

use crate::constants::EARTH_MU_KM3_S2;
use crate::rotation::{euler_to_matrix, EulerSequence};

use nalgebra::{Vector3, Vector6};

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance below which eccentricity / inclination are treated
/// as exactly circular / equatorial in the element conversion.
const SINGULARITY_TOL: f64 = 1.0e-11;

/// Inertial Cartesian state (r, v) with its gravitational parameter.
/// Position in km, velocity in km.s⁻¹, μ in km³.s⁻².
///
/// The Keplerian view {a, e, i, Ω, ω, ν} (km, radians) is derived on
/// demand and converted back through the perifocal frame.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitState {
    /// Cartesian state (x, y, z, vx, vy, vz) in km and km.s⁻¹.
    state: Vector6<f64>,

    /// Gravitational parameter of the central body (km³.s⁻²).
    mu: f64,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            state: Vector6::zeros(),
            mu: EARTH_MU_KM3_S2,
        }
    }
}

impl OrbitState {
    /// Builds a new [OrbitState] from Keplerian elements
    /// (SMA km, eccentricity, inclination, RAAN, argument of periapsis,
    /// true anomaly, angles in radians).
    pub fn from_keplerian(sma: f64, ecc: f64, inc: f64, raan: f64, aop: f64, ta: f64) -> Self {
        let mut s = Self::default();
        s.set_keplerian(sma, ecc, inc, raan, aop, ta);
        s
    }

    /// Builds a new [OrbitState] from a Cartesian state vector.
    pub fn from_cartesian(cart: Vector6<f64>) -> Self {
        let mut s = Self::default();
        s.set_cartesian(cart);
        s
    }

    /// Sets the state from Keplerian elements (km, radians).
    pub fn set_keplerian(&mut self, sma: f64, ecc: f64, inc: f64, raan: f64, aop: f64, ta: f64) {
        self.state = self.keplerian_to_cartesian(sma, ecc, inc, raan, aop, ta);
    }

    /// Sets the state from a Keplerian element vector
    /// (a, e, i, Ω, ω, ν).
    pub fn set_keplerian_vector(&mut self, kepl: Vector6<f64>) {
        self.set_keplerian(kepl[0], kepl[1], kepl[2], kepl[3], kepl[4], kepl[5]);
    }

    /// Sets the Cartesian state directly.
    pub fn set_cartesian(&mut self, cart: Vector6<f64>) {
        self.state = cart;
    }

    /// Sets the gravitational parameter (km³.s⁻²).
    pub fn set_gravity_parameter(&mut self, mu: f64) {
        self.mu = mu;
    }

    /// Returns the gravitational parameter (km³.s⁻²).
    pub fn gravity_parameter(&self) -> f64 {
        self.mu
    }

    /// Returns the Cartesian state (x, y, z, vx, vy, vz).
    pub fn cartesian_state(&self) -> Vector6<f64> {
        self.state
    }

    /// Returns the Keplerian view (a, e, i, Ω, ω, ν), angles in [0, 2π).
    pub fn keplerian_state(&self) -> Vector6<f64> {
        self.cartesian_to_keplerian(self.state)
    }

    fn keplerian_to_cartesian(
        &self,
        sma: f64,
        ecc: f64,
        inc: f64,
        raan: f64,
        aop: f64,
        ta: f64,
    ) -> Vector6<f64> {
        let p = sma * (1.0 - ecc * ecc);
        let r_mag = p / (1.0 + ecc * ta.cos());

        let r_pf = Vector3::new(r_mag * ta.cos(), r_mag * ta.sin(), 0.0);
        let v_pf = Vector3::new(-ta.sin(), ecc + ta.cos(), 0.0) * (self.mu / p).sqrt();

        // inertial-to-perifocal is the 3-1-3 sequence (Ω, i, ω);
        // transpose it to rotate perifocal vectors out
        let pf_to_inertial =
            euler_to_matrix([raan, inc, aop], EulerSequence::new(3, 1, 3)).transpose();

        let r = pf_to_inertial * r_pf;
        let v = pf_to_inertial * v_pf;

        Vector6::new(r[0], r[1], r[2], v[0], v[1], v[2])
    }

    fn cartesian_to_keplerian(&self, cart: Vector6<f64>) -> Vector6<f64> {
        let r = Vector3::new(cart[0], cart[1], cart[2]);
        let v = Vector3::new(cart[3], cart[4], cart[5]);

        let r_mag = r.norm();
        let v_mag = v.norm();

        let h = r.cross(&v);
        let h_mag = h.norm();

        let node = Vector3::new(-h[1], h[0], 0.0); // ẑ × h
        let node_mag = node.norm();

        let e_vec = (r * (v_mag * v_mag - self.mu / r_mag) - v * r.dot(&v)) / self.mu;
        let ecc = e_vec.norm();

        let energy = v_mag * v_mag / 2.0 - self.mu / r_mag;
        let sma = -self.mu / (2.0 * energy);

        let inc = clamped_acos(h[2] / h_mag);

        let circular = ecc < SINGULARITY_TOL;
        let equatorial = inc < SINGULARITY_TOL || (PI - inc) < SINGULARITY_TOL;

        let (raan, aop, ta) = match (circular, equatorial) {
            (false, false) => {
                let mut raan = clamped_acos(node[0] / node_mag);
                if node[1] < 0.0 {
                    raan = 2.0 * PI - raan;
                }
                let mut aop = clamped_acos(node.dot(&e_vec) / (node_mag * ecc));
                if e_vec[2] < 0.0 {
                    aop = 2.0 * PI - aop;
                }
                let mut ta = clamped_acos(e_vec.dot(&r) / (ecc * r_mag));
                if r.dot(&v) < 0.0 {
                    ta = 2.0 * PI - ta;
                }
                (raan, aop, ta)
            }
            (true, false) => {
                // circular inclined: ω undefined, use the argument of
                // latitude in place of the true anomaly
                let mut raan = clamped_acos(node[0] / node_mag);
                if node[1] < 0.0 {
                    raan = 2.0 * PI - raan;
                }
                let mut arg_lat = clamped_acos(node.dot(&r) / (node_mag * r_mag));
                if r[2] < 0.0 {
                    arg_lat = 2.0 * PI - arg_lat;
                }
                (raan, 0.0, arg_lat)
            }
            (false, true) => {
                // equatorial elliptical: Ω undefined, use the longitude
                // of periapsis in place of ω
                let mut lon_per = clamped_acos(e_vec[0] / ecc);
                if e_vec[1] < 0.0 {
                    lon_per = 2.0 * PI - lon_per;
                }
                let mut ta = clamped_acos(e_vec.dot(&r) / (ecc * r_mag));
                if r.dot(&v) < 0.0 {
                    ta = 2.0 * PI - ta;
                }
                (0.0, lon_per, ta)
            }
            (true, true) => {
                // circular equatorial: true longitude only
                let mut lon_true = clamped_acos(r[0] / r_mag);
                if r[1] < 0.0 {
                    lon_true = 2.0 * PI - lon_true;
                }
                (0.0, 0.0, lon_true)
            }
        };

        Vector6::new(sma, ecc, inc, raan, aop, ta)
    }
}

/// acos with its argument clamped to [-1, 1] to absorb rounding.
pub(crate) fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod test {
    use super::OrbitState;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector6;
    use std::f64::consts::PI;

    fn truth_pairs() -> [(Vector6<f64>, Vector6<f64>); 2] {
        [
            (
                Vector6::new(6900.0, 0.002, PI / 3.0, PI / 4.0, PI / 4.0, PI / 4.0),
                Vector6::new(
                    -2436.063522947054,
                    2436.063522947055,
                    5967.112612227063,
                    -5.385803634090905,
                    -5.378203080755706,
                    0.009308738717021944,
                ),
            ),
            (
                Vector6::new(
                    6668.1609545680685,
                    0.48662628626097326,
                    9.345082638008284 * PI / 180.0,
                    330.6038697790278 * PI / 180.0,
                    232.0455606236203 * PI / 180.0,
                    122.30754270280369 * PI / 180.0,
                ),
                Vector6::new(
                    5635.532744258228,
                    -3941.435355496131,
                    -109.89457937927526,
                    6.7,
                    3.2,
                    1.0,
                ),
            ),
        ]
    }

    #[test]
    fn keplerian_to_cartesian() {
        for (kepl, cart) in truth_pairs() {
            let mut state = OrbitState::default();
            state.set_keplerian_vector(kepl);
            let test = state.cartesian_state();
            for k in 0..6 {
                assert_abs_diff_eq!(test[k], cart[k], epsilon = 1.0e-5);
            }
        }
    }

    #[test]
    fn cartesian_to_keplerian() {
        for (kepl, cart) in truth_pairs() {
            let state = OrbitState::from_cartesian(cart);
            let test = state.keplerian_state();
            assert_abs_diff_eq!(test[0], kepl[0], epsilon = 1.0e-2);
            for k in 1..6 {
                assert_abs_diff_eq!(test[k], kepl[k], epsilon = 1.0e-5);
            }
        }
    }

    #[test]
    fn round_trip() {
        for kepl in [
            Vector6::new(7000.0, 0.01, 0.5, 1.0, 2.0, 3.0),
            Vector6::new(6700.0, 0.1, 1.4, 5.9, 0.3, 4.5),
            Vector6::new(26560.0, 0.74, 1.1071, 2.0, 4.7, 1.2),
            Vector6::new(42164.0, 0.0002, 0.001, 0.2, 1.0, 5.0),
        ] {
            let mut state = OrbitState::default();
            state.set_keplerian_vector(kepl);
            let back = state.keplerian_state();

            assert_abs_diff_eq!(back[0], kepl[0], epsilon = 1.0e-5);
            assert_abs_diff_eq!(back[1], kepl[1], epsilon = 1.0e-7);
            for k in 2..6 {
                assert_abs_diff_eq!(back[k], kepl[k], epsilon = 1.0e-7);
            }
        }
    }

    #[test]
    fn circular_tie_break() {
        // exactly circular: ω must come back as zero, the anomaly slot
        // carrying the argument of latitude
        let mut state = OrbitState::default();
        state.set_keplerian(7000.0, 0.0, 0.9, 1.2, 0.0, 0.7);
        let kepl = state.keplerian_state();
        assert_abs_diff_eq!(kepl[1], 0.0, epsilon = 1.0e-10);
        assert_abs_diff_eq!(kepl[4], 0.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(kepl[5], 0.7, epsilon = 1.0e-7);
    }

    #[test]
    fn equatorial_tie_break() {
        // exactly equatorial: Ω must come back as zero, ω carrying the
        // longitude of periapsis
        let mut state = OrbitState::default();
        state.set_keplerian(7000.0, 0.05, 0.0, 0.0, 1.3, 0.4);
        let kepl = state.keplerian_state();
        assert_abs_diff_eq!(kepl[3], 0.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(kepl[4], 1.3, epsilon = 1.0e-7);
        assert_abs_diff_eq!(kepl[5], 0.4, epsilon = 1.0e-7);
    }
}
