//! Coverage accumulation: the per-sample visibility sweep and its
//! aggregation into access intervals.

use crate::earth::Earth;
use crate::errors::CoverageError;
use crate::orbit::clamped_acos;
use crate::pointgroup::PointGroup;
use crate::report::{IntervalEventReport, VisiblePOIReport};
use crate::spacecraft::Spacecraft;
use crate::time::AbsoluteDate;

use log::{debug, trace};
use nalgebra::{Vector3, Vector6};

use std::f64::consts::PI;

/// Accumulates per-point visibility samples over a time sweep and
/// aggregates them into contiguous access intervals.
///
/// The checker borrows its point group for the whole analysis and owns
/// every piece of mutable sweep state; the spacecraft is handed to each
/// accumulation call. Callers must accumulate in non-decreasing time
/// order — sampling backwards silently corrupts the interval
/// decomposition.
#[derive(Debug, Clone)]
pub struct CoverageChecker<'a> {
    /// Coverage grid.
    point_group: &'a PointGroup,

    /// Central body model.
    earth: Earth,

    /// Unitized grid positions, one per point.
    point_array: Vec<Vector3<f64>>,

    /// Per-point strictly increasing sample indices at which the point
    /// was visible.
    time_series: Vec<Vec<usize>>,

    /// Per-point visibility records, populated when POI geometry
    /// computation is enabled.
    discrete_events: Vec<Vec<VisiblePOIReport>>,

    /// Julian date of every accumulated sample.
    date_buffer: Vec<f64>,

    /// Per-point count of visible samples.
    num_events_per_point: Vec<usize>,

    /// Per-point feasibility of the current sample.
    feasibility: Vec<bool>,

    /// Compute the per-sample observation/solar geometry.
    compute_poi_geometry: bool,
}

impl<'a> CoverageChecker<'a> {
    /// Builds a [CoverageChecker] over the given point group with the
    /// default [Earth].
    pub fn new(point_group: &'a PointGroup) -> Self {
        Self::with_earth(point_group, Earth::new())
    }

    /// Builds a [CoverageChecker] with a caller-supplied [Earth]
    /// (different radius, typically).
    pub fn with_earth(point_group: &'a PointGroup, earth: Earth) -> Self {
        let num_points = point_group.num_points();

        let point_array = (0..num_points)
            .map(|index| point_group.get_point_position_vector(index).normalize())
            .collect();

        Self {
            point_group,
            earth,
            point_array,
            time_series: vec![Vec::new(); num_points],
            discrete_events: vec![Vec::new(); num_points],
            date_buffer: Vec::new(),
            num_events_per_point: vec![0; num_points],
            feasibility: vec![false; num_points],
            compute_poi_geometry: false,
        }
    }

    /// Enables or disables POI geometry computation (default off).
    pub fn set_compute_poi_geometry(&mut self, flag: bool) {
        self.compute_poi_geometry = flag;
    }

    /// Julian dates of all accumulated samples.
    pub fn date_buffer(&self) -> &[f64] {
        &self.date_buffer
    }

    /// Sample indices at which `point_index` was visible.
    pub fn time_series(&self, point_index: usize) -> &[usize] {
        &self.time_series[point_index]
    }

    /// Per-point count of visible samples.
    pub fn num_events_per_point(&self) -> &[usize] {
        &self.num_events_per_point
    }

    /// Accumulates one sample at the spacecraft's current state and
    /// epoch. Returns the indices of the points visible at this
    /// sample, ascending.
    pub fn accumulate_coverage_data(&mut self, sc: &Spacecraft) -> Vec<usize> {
        let jd = sc.julian_date();
        let cart_state = sc.cartesian_state();
        let bf_state = self.earth_fixed_sat_state(jd, &cart_state);

        self.date_buffer.push(jd);
        self.check_point_coverage(sc, &bf_state, jd, &cart_state)
    }

    /// Accumulates one sample at `at_time` (Julian date), asking the
    /// spacecraft to interpolate its state there. Fails with
    /// [CoverageError::NotInterpolable] when the sample buffer cannot
    /// serve the request; no sample is recorded in that case.
    pub fn accumulate_coverage_data_at(
        &mut self,
        sc: &Spacecraft,
        at_time: f64,
    ) -> Result<Vec<usize>, CoverageError> {
        let cart_state = sc
            .interpolate(at_time)
            .map_err(|source| CoverageError::NotInterpolable { at_time, source })?;

        let bf_state = self.earth_fixed_sat_state(at_time, &cart_state);

        self.date_buffer.push(at_time);
        Ok(self.check_point_coverage(sc, &bf_state, at_time, &cart_state))
    }

    /// The per-sample sweep: feasibility prune, then the sensor FOV
    /// predicate (or the horizon fallback for sensor-less spacecraft)
    /// for each surviving point. Records hits against the most recent
    /// entry of the date buffer.
    pub fn check_point_coverage(
        &mut self,
        sc: &Spacecraft,
        bf_state: &Vector6<f64>,
        at_time: f64,
        cart_state: &Vector6<f64>,
    ) -> Vec<usize> {
        let time_index = self.date_buffer.len().saturating_sub(1);
        let bf_pos = Vector3::new(bf_state[0], bf_state[1], bf_state[2]);

        self.check_grid_feasibility(&bf_pos);

        let mut result = Vec::new();

        for point_index in 0..self.point_array.len() {
            if !self.feasibility[point_index] {
                continue;
            }

            let point_location = self.point_array[point_index] * self.earth.radius_km();
            let sat_to_target = point_location - bf_pos;

            let in_view = if sc.has_sensors() {
                sc.check_target_visibility(bf_state, &sat_to_target, at_time, 0)
            } else {
                // horizon-only fallback
                let range_vec = -sat_to_target;
                let bf_mag = bf_pos.norm();
                let off_nadir =
                    clamped_acos(range_vec.dot(&bf_pos) / (range_vec.norm() * bf_mag));
                let horizon_limit = PI / 2.0 - clamped_acos(self.earth.radius_km() / bf_mag);

                off_nadir < horizon_limit && range_vec[2] > 0.0
            };

            if in_view {
                trace!("point {point_index} visible at jd={at_time}");
                result.push(point_index);
                self.num_events_per_point[point_index] += 1;
                self.time_series[point_index].push(time_index);

                if self.compute_poi_geometry {
                    let report = self.poi_geometry_report(
                        point_index,
                        at_time,
                        &sat_to_target,
                        cart_state,
                    );
                    self.discrete_events[point_index].push(report);
                }
            }
        }

        result
    }

    /// Groups every point's time series into maximal runs of
    /// consecutive sample indices and emits one [IntervalEventReport]
    /// per run of two samples or more.
    pub fn process_coverage_data(&self) -> Vec<IntervalEventReport> {
        let mut reports = Vec::new();

        for point_index in 0..self.point_array.len() {
            reports.extend(build_interval_reports(
                point_index,
                &self.time_series[point_index],
                &self.discrete_events[point_index],
                &self.date_buffer,
            ));
        }

        debug!("{} access intervals emitted", reports.len());
        reports
    }

    /// Body-fixed state at `jd`: position and velocity rotated
    /// separately (the ω×r velocity term stays out, which is fine for
    /// coverage geometry).
    fn earth_fixed_sat_state(&self, jd: f64, cart_state: &Vector6<f64>) -> Vector6<f64> {
        let pos = Vector3::new(cart_state[0], cart_state[1], cart_state[2]);
        let vel = Vector3::new(cart_state[3], cart_state[4], cart_state[5]);

        let bf_pos = self.earth.inertial_to_body_fixed(&pos, jd);
        let bf_vel = self.earth.inertial_to_body_fixed(&vel, jd);

        Vector6::new(bf_pos[0], bf_pos[1], bf_pos[2], bf_vel[0], bf_vel[1], bf_vel[2])
    }

    /// Cheap same-hemisphere + above-horizon prune, refreshed for every
    /// point at each sample.
    fn check_grid_feasibility(&mut self, bf_pos: &Vector3<f64>) {
        let scaled = bf_pos / self.earth.radius_km();
        let body_unit = scaled.normalize();

        for (point, feasible) in self.point_array.iter().zip(self.feasibility.iter_mut()) {
            *feasible = if point.dot(&body_unit) > 0.0 {
                (scaled - point).dot(point) > 0.0
            } else {
                false
            };
        }
    }

    /// Observation and solar geometry of a visible sample, evaluated in
    /// the point's East-North-Up frame.
    fn poi_geometry_report(
        &self,
        point_index: usize,
        at_time: f64,
        sat_to_target: &Vector3<f64>,
        cart_state: &Vector6<f64>,
    ) -> VisiblePOIReport {
        let (lat, lon) = self.point_group.get_lat_and_lon(point_index);

        let topo_range = self
            .earth
            .fixed_to_topocentric(&(-sat_to_target), lat, lon);
        let range_km = topo_range.norm();

        let theta = topo_range[1].atan2(topo_range[0]).rem_euclid(2.0 * PI);
        let azimuth = (PI - theta).rem_euclid(2.0 * PI);
        let zenith = ((topo_range[0] * topo_range[0] + topo_range[1] * topo_range[1]).sqrt()
            / range_km)
            .clamp(-1.0, 1.0)
            .asin();

        let sun_fixed = self.earth.sun_position_in_body_coords(at_time);
        let sun_topo = self.earth.fixed_to_topocentric(&sun_fixed, lat, lon);
        let sun_range = sun_topo.norm();

        let sun_theta = sun_topo[1].atan2(sun_topo[0]).rem_euclid(2.0 * PI);
        let sun_azimuth = (PI - sun_theta).rem_euclid(2.0 * PI);
        let sun_zenith = ((sun_topo[0] * sun_topo[0] + sun_topo[1] * sun_topo[1]).sqrt()
            / sun_range)
            .clamp(-1.0, 1.0)
            .asin();

        VisiblePOIReport::new(AbsoluteDate::from_julian(at_time), point_index)
            .with_observation(azimuth, zenith, range_km)
            .with_sun(sun_azimuth, sun_zenith)
            .with_observer_state(
                Vector3::new(cart_state[0], cart_state[1], cart_state[2]),
                Vector3::new(cart_state[3], cart_state[4], cart_state[5]),
            )
    }
}

/// Splits one point's time series into access intervals.
///
/// Sub-sample accumulation intentionally starts at index 1: the first
/// discrete sample stands in for a placeholder entry the legacy
/// accumulator seeded at construction, and downstream consumers expect
/// it to stay unreported.
fn build_interval_reports(
    poi_index: usize,
    series: &[usize],
    discrete_events: &[VisiblePOIReport],
    date_buffer: &[f64],
) -> Vec<IntervalEventReport> {
    let mut reports = Vec::new();

    let num_events = series.len();
    if num_events < 2 {
        return reports;
    }

    let mut samples: Vec<VisiblePOIReport> = Vec::new();
    let mut run_start = 0_usize;

    for k in 1..num_events {
        if let Some(event) = discrete_events.get(k) {
            samples.push(*event);
        }

        let at = series[k];
        let prev = series[k - 1];

        if at - prev != 1 {
            // a gap closes the run at the previous sample; runs of a
            // single sample never emit
            if k - run_start >= 2 {
                reports.push(
                    IntervalEventReport::new(
                        poi_index,
                        AbsoluteDate::from_julian(date_buffer[series[run_start]]),
                        AbsoluteDate::from_julian(date_buffer[prev]),
                    )
                    .with_poi_events(std::mem::take(&mut samples)),
                );
            } else {
                samples.clear();
            }
            run_start = k;
        } else if k == num_events - 1 {
            reports.push(
                IntervalEventReport::new(
                    poi_index,
                    AbsoluteDate::from_julian(date_buffer[series[run_start]]),
                    AbsoluteDate::from_julian(date_buffer[at]),
                )
                .with_poi_events(std::mem::take(&mut samples)),
            );
        }
    }

    reports
}
