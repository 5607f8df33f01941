//! Visibility reports emitted by the coverage sweep.

use crate::time::AbsoluteDate;

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One time-stamped visibility record: a point of interest seen by the
/// spacecraft at a single sample, with the observation geometry
/// evaluated in the point's topocentric frame.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisiblePOIReport {
    /// Sample instant.
    pub epoch: AbsoluteDate,

    /// Index of the observed point inside its point group.
    pub poi_index: usize,

    /// Observer inertial position (km).
    pub obs_position_inertial_km: Vector3<f64>,

    /// Observer inertial velocity (km.s⁻¹).
    pub obs_velocity_inertial_km_s: Vector3<f64>,

    /// Observation azimuth at the point (radians).
    pub obs_azimuth_rad: f64,

    /// Observation zenith angle at the point (radians).
    pub obs_zenith_rad: f64,

    /// Observation range (km).
    pub obs_range_km: f64,

    /// Sun azimuth at the point (radians).
    pub sun_azimuth_rad: f64,

    /// Sun zenith angle at the point (radians).
    pub sun_zenith_rad: f64,
}

impl Default for VisiblePOIReport {
    fn default() -> Self {
        Self {
            epoch: AbsoluteDate::default(),
            poi_index: 0,
            obs_position_inertial_km: Vector3::zeros(),
            obs_velocity_inertial_km_s: Vector3::zeros(),
            obs_azimuth_rad: 0.0,
            obs_zenith_rad: 0.0,
            obs_range_km: 0.0,
            sun_azimuth_rad: 0.0,
            sun_zenith_rad: 0.0,
        }
    }
}

impl VisiblePOIReport {
    /// Builds a new [VisiblePOIReport] for the given sample instant
    /// and point index; geometry fields start zeroed.
    pub fn new(epoch: AbsoluteDate, poi_index: usize) -> Self {
        Self {
            epoch,
            poi_index,
            ..Default::default()
        }
    }

    /// Copies and returns [VisiblePOIReport] with the observation
    /// geometry (azimuth rad, zenith rad, range km).
    pub fn with_observation(&self, azimuth_rad: f64, zenith_rad: f64, range_km: f64) -> Self {
        let mut s = *self;
        s.obs_azimuth_rad = azimuth_rad;
        s.obs_zenith_rad = zenith_rad;
        s.obs_range_km = range_km;
        s
    }

    /// Copies and returns [VisiblePOIReport] with the solar geometry
    /// (azimuth rad, zenith rad).
    pub fn with_sun(&self, azimuth_rad: f64, zenith_rad: f64) -> Self {
        let mut s = *self;
        s.sun_azimuth_rad = azimuth_rad;
        s.sun_zenith_rad = zenith_rad;
        s
    }

    /// Copies and returns [VisiblePOIReport] with the observer inertial
    /// state.
    pub fn with_observer_state(
        &self,
        position_km: Vector3<f64>,
        velocity_km_s: Vector3<f64>,
    ) -> Self {
        let mut s = *self;
        s.obs_position_inertial_km = position_km;
        s.obs_velocity_inertial_km_s = velocity_km_s;
        s
    }
}

/// One access interval: a maximal contiguous span of samples during
/// which a specific point stayed visible, with its accumulated
/// sub-samples.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntervalEventReport {
    /// Index of the observed point inside its point group.
    pub poi_index: usize,

    /// First sample instant of the interval.
    pub start: AbsoluteDate,

    /// Last sample instant of the interval.
    pub end: AbsoluteDate,

    /// Time-ordered sub-samples attached to this interval.
    pub poi_events: Vec<VisiblePOIReport>,
}

impl IntervalEventReport {
    /// Builds a new [IntervalEventReport] spanning [start, end].
    pub fn new(poi_index: usize, start: AbsoluteDate, end: AbsoluteDate) -> Self {
        Self {
            poi_index,
            start,
            end,
            poi_events: Vec::new(),
        }
    }

    /// Copies and returns [IntervalEventReport] with the given
    /// sub-samples.
    pub fn with_poi_events(&self, poi_events: Vec<VisiblePOIReport>) -> Self {
        let mut s = self.clone();
        s.poi_events = poi_events;
        s
    }

    /// Interval duration in seconds.
    pub fn duration_s(&self) -> f64 {
        (self.end.julian_date() - self.start.julian_date()) * crate::constants::SECONDS_PER_DAY
    }
}
