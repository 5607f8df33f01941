//! Custom (polygonal) field of view.
//!
//! The FOV boundary is a closed polygon on the unit sphere, given as
//! paired (cone, clock) vertices. Containment is evaluated in the
//! stereographic projection from the -Z pole onto the boresight plane,
//! where the polygon becomes a planar closed polyline and the classic
//! crossing-count test applies.

use crate::errors::FovError;

use itertools::Itertools;
use log::warn;

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used to flag a crossing parameter as degenerate
/// (the test segment grazing a polygon vertex).
const DISTANCE_TOL: f64 = 1.0e-12;

/// Safety factor pushing the external test points beyond the polygon.
const EXTERNAL_SAFETY_FACTOR: f64 = 1.1;

/// At most this many external candidates are retained for the
/// crossing test.
const NUM_TEST_POINTS: usize = 3;

/// Polygonal FOV on the unit sphere.
///
/// The stereographic projection, its line segments, the bounding box
/// and the external test points are all derived once at construction.
/// A vertex sitting on (or numerically at) the -Z axis cannot be
/// projected, so such polygons are rejected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CustomSensor {
    /// Vertex cone angles (radians).
    cone_angles: Vec<f64>,

    /// Vertex clock angles (radians).
    clock_angles: Vec<f64>,

    /// Projected vertex x coordinates.
    x_projection: Vec<f64>,

    /// Projected vertex y coordinates.
    y_projection: Vec<f64>,

    /// Closed segment list, one row (x1, y1, x2, y2) per vertex;
    /// the last row connects back to the first vertex.
    segments: Vec<[f64; 4]>,

    /// External (x, y) test points, already safety-scaled.
    external_points: Vec<[f64; 2]>,

    /// Projected bounding box (min_x, max_x, min_y, max_y).
    bounding_box: (f64, f64, f64, f64),

    /// Largest vertex cone angle (radians).
    max_excursion: f64,
}

/// Stereographic projection of a (cone, clock) direction from the -Z
/// pole onto the z=0 plane.
pub(crate) fn cone_clock_to_stereographic(cone: f64, clock: f64) -> (f64, f64) {
    let r = (cone / 2.0).tan();
    (r * clock.cos(), r * clock.sin())
}

impl CustomSensor {
    /// Builds a [CustomSensor] from paired cone/clock vertex arrays
    /// (radians). Vertices are walked in order and the polygon closes
    /// onto its first vertex.
    ///
    /// Fails with [FovError] when the arrays disagree in length, fewer
    /// than 3 vertices are supplied, or any vertex lies at the
    /// projection pole (cone ≥ π - 100ε).
    pub fn new(cone_angles: &[f64], clock_angles: &[f64]) -> Result<Self, FovError> {
        if cone_angles.len() != clock_angles.len() {
            return Err(FovError::MismatchedAngleArrays {
                cones: cone_angles.len(),
                clocks: clock_angles.len(),
            });
        }

        if cone_angles.len() < 3 {
            return Err(FovError::TooFewVertices(cone_angles.len()));
        }

        for (index, cone) in cone_angles.iter().enumerate() {
            if *cone > PI - 100.0 * f64::EPSILON {
                return Err(FovError::VertexAtProjectionPole {
                    index,
                    cone_rad: *cone,
                });
            }
        }

        let (x_projection, y_projection): (Vec<f64>, Vec<f64>) = cone_angles
            .iter()
            .zip(clock_angles.iter())
            .map(|(cone, clock)| cone_clock_to_stereographic(*cone, *clock))
            .unzip();

        let (min_x, max_x) = x_projection
            .iter()
            .copied()
            .minmax()
            .into_option()
            .unwrap_or((0.0, 0.0));
        let (min_y, max_y) = y_projection
            .iter()
            .copied()
            .minmax()
            .into_option()
            .unwrap_or((0.0, 0.0));

        let segments = points_to_segments(&x_projection, &y_projection);

        let max_excursion = cone_angles.iter().copied().fold(f64::MIN, f64::max);

        let external_points =
            compute_external_points(&x_projection, &y_projection, cone_angles);

        Ok(Self {
            cone_angles: cone_angles.to_vec(),
            clock_angles: clock_angles.to_vec(),
            x_projection,
            y_projection,
            segments,
            external_points,
            bounding_box: (min_x, max_x, min_y, max_y),
            max_excursion,
        })
    }

    /// Returns the vertex cone angles (radians).
    pub fn cone_angles(&self) -> &[f64] {
        &self.cone_angles
    }

    /// Returns the vertex clock angles (radians).
    pub fn clock_angles(&self) -> &[f64] {
        &self.clock_angles
    }

    /// Returns the stereographic (x, y) vertex coordinate arrays.
    pub fn projection_coordinates(&self) -> (&[f64], &[f64]) {
        (&self.x_projection, &self.y_projection)
    }

    pub(crate) fn max_excursion_angle(&self) -> f64 {
        self.max_excursion
    }

    /// Crossing-count containment of a single direction.
    pub(crate) fn check_target_visibility(&self, cone: f64, clock: f64) -> bool {
        let (x, y) = cone_clock_to_stereographic(cone, clock);

        if !self.inside_bounding_box(x, y) {
            return false;
        }

        // Cast a segment from the target towards each external point in
        // turn; the first one whose crossing parameters stay clear of
        // the polygon vertices is trusted for the parity count.
        for external in &self.external_points {
            let test_segment = [x, y, external[0], external[1]];
            let intersections = segment_intersections(&self.segments, &test_segment);

            let valid = intersections.iter().any(|(_, distance)| {
                !(distance.abs() <= DISTANCE_TOL || (distance - 1.0).abs() <= DISTANCE_TOL)
            });

            if valid {
                let crossings = intersections.iter().filter(|(hit, _)| *hit).count();
                return crossings % 2 == 1;
            }
        }

        warn!("custom FOV: no valid external point for target ({cone}, {clock})");
        false
    }

    /// True when the closed region described by the given cone/clock
    /// vertices produces no segment crossing with the FOV boundary,
    /// i.e. the region lies fully on one side of it.
    pub fn check_region_visibility(&self, cone_angles: &[f64], clock_angles: &[f64]) -> bool {
        let (xs, ys): (Vec<f64>, Vec<f64>) = cone_angles
            .iter()
            .zip(clock_angles.iter())
            .map(|(cone, clock)| cone_clock_to_stereographic(*cone, *clock))
            .unzip();

        let region_segments = points_to_segments(&xs, &ys);

        for region_segment in &region_segments {
            let intersections = segment_intersections(&self.segments, region_segment);
            if intersections.iter().any(|(hit, _)| *hit) {
                return false;
            }
        }
        true
    }

    fn inside_bounding_box(&self, x: f64, y: f64) -> bool {
        let (min_x, max_x, min_y, max_y) = self.bounding_box;
        x >= min_x && x <= max_x && y >= min_y && y <= max_y
    }
}

/// Connects consecutive (x, y) points into a closed segment list:
/// one row per point, last row closing onto the first point.
fn points_to_segments(xs: &[f64], ys: &[f64]) -> Vec<[f64; 4]> {
    let n = xs.len();
    let mut segments = Vec::with_capacity(n);

    for i in 0..n {
        let next = (i + 1) % n;
        segments.push([xs[i], ys[i], xs[next], ys[next]]);
    }
    segments
}

/// Chooses up to [NUM_TEST_POINTS] external test points: convex
/// vertices (interior angle ≤ π) with the largest cone angles, pushed
/// outward by the safety factor.
fn compute_external_points(xs: &[f64], ys: &[f64], cone_angles: &[f64]) -> Vec<[f64; 2]> {
    let n = xs.len();
    let mut candidates: Vec<(f64, f64, f64)> = Vec::new(); // (cone, x, y)

    for i in 0..n {
        let (j, k) = if i + 2 < n {
            (i + 1, i + 2)
        } else if i + 1 < n {
            (n - 1, 0)
        } else {
            (0, 1)
        };

        let v1 = (xs[j] - xs[i], ys[j] - ys[i]);
        let v2 = (xs[k] - xs[j], ys[k] - ys[j]);

        let interior = (v2.1.atan2(v2.0).rem_euclid(2.0 * PI)
            - v1.1.atan2(v1.0).rem_euclid(2.0 * PI))
        .rem_euclid(2.0 * PI);

        if interior <= PI {
            candidates.push((cone_angles[j], xs[j], ys[j]));
        }
    }

    // largest cone angles first
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    candidates
        .iter()
        .take(NUM_TEST_POINTS)
        .map(|(_, x, y)| [EXTERNAL_SAFETY_FACTOR * x, EXTERNAL_SAFETY_FACTOR * y])
        .collect()
}

/// Intersects every polygon segment with one test segment.
///
/// Returns, per polygon segment, whether the two segments properly
/// intersect and the normalized crossing parameter along the *test*
/// segment of the supporting-line intersection (0 when parallel).
fn segment_intersections(segments: &[[f64; 4]], test: &[f64; 4]) -> Vec<(bool, f64)> {
    let [x3, y3, x4, y4] = *test;

    segments
        .iter()
        .map(|[x1, y1, x2, y2]| {
            let den = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
            if den.abs() < f64::EPSILON {
                return (false, 0.0);
            }

            let u_a = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / den;
            let u_b = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / den;

            let hit = (0.0..=1.0).contains(&u_a) && (0.0..=1.0).contains(&u_b);
            (hit, u_b)
        })
        .collect()
}
