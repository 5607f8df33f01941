//! Spacecraft: orbital state, attitude chain and attached sensors.

use crate::attitude::NadirPointingAttitude;
use crate::errors::InterpolationError;
use crate::interpolator::LagrangeInterpolator;
use crate::orbit::OrbitState;
use crate::rotation::{euler_to_matrix, EulerSequence};
use crate::sensor::{vector_to_cone_clock, Sensor};
use crate::time::AbsoluteDate;

use log::{debug, warn};
use nalgebra::{Matrix3, Vector3, Vector6};

/// A spacecraft: owned epoch and orbital state, a nadir-pointing
/// attitude with an optional body↔nadir Euler offset, an ordered
/// sensor list and a state-sample buffer for dense interpolation
/// between propagation steps.
#[derive(Debug, Clone)]
pub struct Spacecraft {
    /// Current epoch.
    epoch: AbsoluteDate,

    /// Current orbital state at `epoch`.
    state: OrbitState,

    /// Attitude model.
    attitude: NadirPointingAttitude,

    /// Attached sensors, in attachment order.
    sensors: Vec<Sensor>,

    /// State sample buffer, written by the propagator.
    interpolator: LagrangeInterpolator,

    /// Body↔nadir offset Euler angles (radians).
    offset_angles: [f64; 3],

    /// Body↔nadir offset Euler sequence.
    offset_sequence: EulerSequence,

    /// Cached nadir→body rotation from the offset angles.
    nadir_to_body: Matrix3<f64>,

    /// Drag area (m²).
    drag_area_m2: f64,

    /// Drag coefficient.
    drag_coefficient: f64,

    /// Total mass (kg).
    total_mass_kg: f64,
}

impl Spacecraft {
    /// Builds a [Spacecraft] from its epoch, orbital state, attitude
    /// model and interpolator.
    pub fn new(
        epoch: AbsoluteDate,
        state: OrbitState,
        attitude: NadirPointingAttitude,
        interpolator: LagrangeInterpolator,
    ) -> Self {
        Self {
            epoch,
            state,
            attitude,
            sensors: Vec::new(),
            interpolator,
            offset_angles: [0.0; 3],
            offset_sequence: EulerSequence::default(),
            nadir_to_body: Matrix3::identity(),
            drag_area_m2: 1.0,
            drag_coefficient: 2.2,
            total_mass_kg: 100.0,
        }
    }

    /// Current epoch.
    pub fn epoch(&self) -> &AbsoluteDate {
        &self.epoch
    }

    /// Current epoch as a Julian date (days).
    pub fn julian_date(&self) -> f64 {
        self.epoch.julian_date()
    }

    /// Current orbital state.
    pub fn orbit_state(&self) -> &OrbitState {
        &self.state
    }

    /// Current inertial Cartesian state (km, km.s⁻¹).
    pub fn cartesian_state(&self) -> Vector6<f64> {
        self.state.cartesian_state()
    }

    /// Current Keplerian elements (a, e, i, Ω, ω, ν).
    pub fn keplerian_state(&self) -> Vector6<f64> {
        self.state.keplerian_state()
    }

    /// Appends a sensor; attachment order is stable.
    pub fn add_sensor(&mut self, sensor: Sensor) {
        self.sensors.push(sensor);
    }

    /// True when at least one sensor is attached.
    pub fn has_sensors(&self) -> bool {
        !self.sensors.is_empty()
    }

    /// Attached sensors.
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Sets the body↔nadir pointing offset: three Euler angles
    /// (radians) applied along the given axis sequence. A yaw-180
    /// offset, for instance, re-points the body for descending-node
    /// coverage.
    pub fn set_body_nadir_offset_angles(&mut self, angles: [f64; 3], sequence: EulerSequence) {
        self.offset_angles = angles;
        self.offset_sequence = sequence;
        self.nadir_to_body = euler_to_matrix(angles, sequence);
    }

    /// Copies and returns [Spacecraft] with the given body↔nadir offset.
    pub fn with_body_nadir_offset_angles(
        &self,
        angles: [f64; 3],
        sequence: EulerSequence,
    ) -> Self {
        let mut s = self.clone();
        s.set_body_nadir_offset_angles(angles, sequence);
        s
    }

    /// Returns the body↔nadir offset Euler angles and their axis
    /// sequence.
    pub fn body_nadir_offset_angles(&self) -> ([f64; 3], EulerSequence) {
        (self.offset_angles, self.offset_sequence)
    }

    /// Drag area (m²).
    pub fn drag_area_m2(&self) -> f64 {
        self.drag_area_m2
    }

    /// Sets the drag area (m²).
    pub fn set_drag_area_m2(&mut self, area: f64) {
        self.drag_area_m2 = area;
    }

    /// Drag coefficient.
    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    /// Sets the drag coefficient.
    pub fn set_drag_coefficient(&mut self, cd: f64) {
        self.drag_coefficient = cd;
    }

    /// Total mass (kg).
    pub fn total_mass_kg(&self) -> f64 {
        self.total_mass_kg
    }

    /// Sets the total mass (kg).
    pub fn set_total_mass_kg(&mut self, mass: f64) {
        self.total_mass_kg = mass;
    }

    /// Overwrites epoch and orbital state (Keplerian elements at `t`)
    /// and buffers the resulting Cartesian sample for interpolation.
    ///
    /// Samples are buffered only when strictly later than the buffered
    /// tail, so re-stating the current epoch is a no-op for the buffer.
    pub fn set_orbit_state(&mut self, t: AbsoluteDate, keplerian: Vector6<f64>) {
        self.epoch = t;
        self.state.set_keplerian_vector(keplerian);

        let jd = t.julian_date();
        let buffered_tail = self.interpolator.min_max_time().map(|(_, t_max)| t_max);
        if buffered_tail.is_none_or(|t_max| jd > t_max) {
            // tail-monotonic by construction, cannot fail
            let _ = self.interpolator.add_point(jd, self.state.cartesian_state());
        } else {
            debug!("state at jd={jd} not buffered (tail at {buffered_tail:?})");
        }
    }

    /// Full attitude chain: rotates the satellite-to-target vector
    /// (body-fixed frame) into the sensor frame of `sensor_index` and
    /// dispatches the (cone, clock) pair to that sensor's predicate.
    ///
    /// `bf_state` is the spacecraft body-fixed state used to build the
    /// nadir frame. Returns false for an out-of-range sensor index.
    pub fn check_target_visibility(
        &self,
        bf_state: &Vector6<f64>,
        sat_to_target: &Vector3<f64>,
        _at_time: f64,
        sensor_index: usize,
    ) -> bool {
        let Some(sensor) = self.sensors.get(sensor_index) else {
            warn!("no sensor at index {sensor_index}");
            return false;
        };

        // fixed → nadir → body → sensor, composed once
        let fixed_to_nadir = self.attitude.fixed_to_nadir(bf_state);
        let fixed_to_sensor = sensor.body_to_sensor_matrix() * self.nadir_to_body * fixed_to_nadir;

        let view = fixed_to_sensor * sat_to_target;
        let (cone, clock) = vector_to_cone_clock(&view);

        sensor.check_target_visibility(cone, clock)
    }

    /// True when the sample buffer can serve a query at `at_time`
    /// (Julian date).
    pub fn can_interpolate(&self, at_time: f64) -> bool {
        self.interpolator.can_interpolate(at_time)
    }

    /// When enough samples are buffered, returns the mid-range margin
    /// (days) callers keep between their interpolation queries and the
    /// freshest sample.
    pub fn time_to_interpolate(&self, _at_time: f64) -> Option<f64> {
        if self.interpolator.len() > self.interpolator.order() {
            self.interpolator.mid_range()
        } else {
            None
        }
    }

    /// Interpolates the Cartesian state at `at_time` (Julian date)
    /// from the buffered samples.
    pub fn interpolate(&self, at_time: f64) -> Result<Vector6<f64>, InterpolationError> {
        self.interpolator.interpolate(at_time)
    }
}
