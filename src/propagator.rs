//! Analytic J2 orbit propagation with optional exponential-drag decay.

use crate::atmosphere::ExponentialAtmosphere;
use crate::constants::{BODY_RADIUS_KM, EARTH_J2, SECONDS_PER_DAY};
use crate::errors::PropagationError;
use crate::spacecraft::Spacecraft;
use crate::time::AbsoluteDate;

use log::{debug, trace};
use nalgebra::Vector6;

use std::f64::consts::PI;

/// Kepler solver convergence tolerance (radians).
const KEPLER_TOL: f64 = 1.0e-12;

/// Kepler solver iteration bound; generous for any supported
/// eccentricity.
const KEPLER_MAX_ITER: usize = 50;

/// Analytic Keplerian propagator with first-order J2 secular rates on
/// Ω, ω and the mean anomaly, and an optional per-revolution drag
/// decay of (a, e) driven by [ExponentialAtmosphere].
///
/// Construction snapshots the spacecraft's mean elements at its
/// current epoch; every [Self::propagate] call advances those elements
/// analytically, writes the resulting state back into the spacecraft
/// and buffers a sample for dense interpolation.
#[derive(Debug, Clone)]
pub struct Propagator {
    /// Gravitational parameter (km³.s⁻²).
    mu: f64,

    /// Second zonal harmonic.
    j2: f64,

    /// Body equatorial radius (km).
    eq_radius_km: f64,

    /// Drag decay enabled.
    apply_drag: bool,

    /// Density model behind the drag decay.
    density_model: ExponentialAtmosphere,

    /// Julian date of the reference elements.
    ref_jd: f64,

    /// First propagation epoch.
    prop_start: AbsoluteDate,

    /// Most recent propagation epoch.
    prop_end: AbsoluteDate,

    /// Julian date of the last drag update.
    last_drag_update_jd: f64,

    /// Ballistic term Cd·A/m (m².kg⁻¹), captured from the spacecraft.
    ballistic_m2_kg: f64,

    // reference mean elements
    sma: f64,
    ecc: f64,
    inc: f64,
    raan0: f64,
    aop0: f64,
    ma0: f64,

    // derived quantities, refreshed when (a, e, i) change
    mean_motion: f64,
    orbit_period_s: f64,
    raan_rate: f64,
    aop_rate: f64,
    mean_motion_rate: f64,
}

impl Propagator {
    /// Builds a [Propagator] from the spacecraft's current epoch and
    /// orbital state. Drag is disabled by default.
    pub fn new(sc: &Spacecraft) -> Self {
        let kepl = sc.keplerian_state();
        let mu = sc.orbit_state().gravity_parameter();

        let ma0 = true_to_mean_anomaly(kepl[5], kepl[1]);

        let mut prop = Self {
            mu,
            j2: EARTH_J2,
            eq_radius_km: BODY_RADIUS_KM,
            apply_drag: false,
            density_model: ExponentialAtmosphere::new(),
            ref_jd: sc.julian_date(),
            prop_start: *sc.epoch(),
            prop_end: *sc.epoch(),
            last_drag_update_jd: sc.julian_date(),
            ballistic_m2_kg: sc.drag_coefficient() * sc.drag_area_m2() / sc.total_mass_kg(),
            sma: kepl[0],
            ecc: kepl[1],
            inc: kepl[2],
            raan0: kepl[3],
            aop0: kepl[4],
            ma0,
            mean_motion: 0.0,
            orbit_period_s: 0.0,
            raan_rate: 0.0,
            aop_rate: 0.0,
            mean_motion_rate: 0.0,
        };
        prop.compute_orbit_rates();
        prop
    }

    /// Overrides the body physical constants (μ km³.s⁻², J2, equatorial
    /// radius km) and refreshes the secular rates.
    pub fn set_physical_constants(&mut self, mu: f64, j2: f64, eq_radius_km: f64) {
        self.mu = mu;
        self.j2 = j2;
        self.eq_radius_km = eq_radius_km;
        self.compute_orbit_rates();
    }

    /// Enables or disables the drag decay.
    pub fn set_apply_drag(&mut self, apply_drag: bool) {
        self.apply_drag = apply_drag;
    }

    /// True when the drag decay is enabled.
    pub fn apply_drag(&self) -> bool {
        self.apply_drag
    }

    /// First and most recent propagation epochs.
    pub fn prop_start_end(&self) -> (AbsoluteDate, AbsoluteDate) {
        (self.prop_start, self.prop_end)
    }

    /// Advances the spacecraft to `to_date` and returns the inertial
    /// Cartesian state written into it.
    pub fn propagate(
        &mut self,
        sc: &mut Spacecraft,
        to_date: &AbsoluteDate,
    ) -> Result<Vector6<f64>, PropagationError> {
        let jd = to_date.julian_date();

        if self.apply_drag {
            self.update_drag_effects(jd)?;
        }

        let elapsed_s = (jd - self.ref_jd) * SECONDS_PER_DAY;
        let kepl = self.propagate_orbital_elements(elapsed_s)?;

        trace!("jd={jd}: elements {kepl:?}");

        sc.set_orbit_state(*to_date, kepl);
        self.prop_end = *to_date;

        Ok(sc.cartesian_state())
    }

    /// Advances the reference mean elements by `elapsed_s` seconds and
    /// returns the osculating set (a, e, i, Ω, ω, ν).
    fn propagate_orbital_elements(&self, elapsed_s: f64) -> Result<Vector6<f64>, PropagationError> {
        let raan = wrap_two_pi(self.raan0 + self.raan_rate * elapsed_s);
        let aop = wrap_two_pi(self.aop0 + self.aop_rate * elapsed_s);
        let ma = wrap_two_pi(self.ma0 + (self.mean_motion + self.mean_motion_rate) * elapsed_s);

        let ea = solve_kepler(ma, self.ecc)?;
        let ta = wrap_two_pi(
            2.0 * ((1.0 + self.ecc).sqrt() * (ea / 2.0).sin())
                .atan2((1.0 - self.ecc).sqrt() * (ea / 2.0).cos()),
        );

        Ok(Vector6::new(self.sma, self.ecc, self.inc, raan, aop, ta))
    }

    /// Applies the per-revolution drag decay when more than one orbital
    /// period elapsed since the last update, then refreshes the rates.
    fn update_drag_effects(&mut self, jd: f64) -> Result<(), PropagationError> {
        let elapsed_s = (jd - self.last_drag_update_jd) * SECONDS_PER_DAY;
        if elapsed_s <= self.orbit_period_s {
            return Ok(());
        }

        let periapsis_altitude_km = self.sma * (1.0 - self.ecc) - self.eq_radius_km;
        if periapsis_altitude_km <= 0.0 {
            return Err(PropagationError::DragNegativeAltitude {
                jd,
                altitude_km: periapsis_altitude_km,
            });
        }

        let (delta_sma_rev, delta_ecc_rev) =
            self.compute_drag_effects(self.sma, self.ecc, periapsis_altitude_km);

        let revolutions = elapsed_s / self.orbit_period_s;

        self.sma += delta_sma_rev * revolutions;
        self.ecc = (self.ecc + delta_ecc_rev * revolutions).clamp(0.0, 0.999);
        self.last_drag_update_jd = jd;

        if self.sma * (1.0 - self.ecc) <= self.eq_radius_km {
            return Err(PropagationError::DragNegativeAltitude {
                jd,
                altitude_km: self.sma * (1.0 - self.ecc) - self.eq_radius_km,
            });
        }

        debug!(
            "drag update at jd={jd}: {revolutions:.1} revs, a={} km, e={}",
            self.sma, self.ecc
        );

        self.compute_orbit_rates();
        Ok(())
    }

    /// Per-revolution (Δa, Δe) from the exponential atmosphere, using
    /// the small-argument expansion of the modified Bessel factors.
    fn compute_drag_effects(&self, sma: f64, ecc: f64, altitude_km: f64) -> (f64, f64) {
        let rho = self.density_model.density_kg_m3(altitude_km); // kg/m³
        let scale_height_m = self.density_model.scale_height_km(altitude_km) * 1.0e3;

        let sma_m = sma * 1.0e3;
        let c = (sma_m * ecc / scale_height_m).min(10.0);

        let i0 = 1.0 + c * c / 4.0;
        let i1 = c / 2.0 * (1.0 + c * c / 8.0);
        let i2 = c * c / 8.0;

        let damping = (-c).exp();
        let delta_sma_m =
            -2.0 * PI * self.ballistic_m2_kg * rho * sma_m * sma_m * (i0 + 2.0 * ecc * i1) * damping;
        let delta_ecc =
            -2.0 * PI * self.ballistic_m2_kg * rho * sma_m * (i1 + ecc / 2.0 * (i0 + i2)) * damping;

        (delta_sma_m / 1.0e3, delta_ecc)
    }

    /// Refreshes mean motion, period and the J2 secular rates from the
    /// current (a, e, i).
    fn compute_orbit_rates(&mut self) {
        let n = (self.mu / self.sma.powi(3)).sqrt();
        let p = self.sma * (1.0 - self.ecc * self.ecc);

        let sin_i2 = self.inc.sin().powi(2);
        let factor = 1.5 * self.j2 * (self.eq_radius_km / p).powi(2) * n;

        self.mean_motion = n;
        self.orbit_period_s = 2.0 * PI / n;
        self.raan_rate = -factor * self.inc.cos();
        self.aop_rate = factor * (2.0 - 2.5 * sin_i2);
        self.mean_motion_rate =
            factor * (1.0 - self.ecc * self.ecc).sqrt() * (1.0 - 1.5 * sin_i2);
    }
}

/// Mean anomaly from true anomaly through the eccentric anomaly.
fn true_to_mean_anomaly(ta: f64, ecc: f64) -> f64 {
    let ea = 2.0 * ((1.0 - ecc).sqrt() * (ta / 2.0).sin()).atan2((1.0 + ecc).sqrt() * (ta / 2.0).cos());
    wrap_two_pi(ea - ecc * ea.sin())
}

/// Newton solution of Kepler's equation E - e·sin(E) = M.
fn solve_kepler(ma: f64, ecc: f64) -> Result<f64, PropagationError> {
    let mut ea = if ecc < 0.8 { ma } else { PI };

    for _ in 0..KEPLER_MAX_ITER {
        let delta = (ea - ecc * ea.sin() - ma) / (1.0 - ecc * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOL {
            return Ok(ea);
        }
    }

    Err(PropagationError::KeplerNoConvergence {
        mean_anomaly: ma,
        ecc,
    })
}

/// Normalizes an angle to [0, 2π).
fn wrap_two_pi(angle: f64) -> f64 {
    angle.rem_euclid(2.0 * PI)
}
