//! Surface point grids for coverage analysis.

use log::warn;
use nalgebra::Vector3;

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered set of unit-sphere surface points, stored both as
/// (latitude, longitude) pairs and as unit position vectors that agree
/// to machine precision.
///
/// An optional latitude/longitude bounding box filters every point as
/// it is accumulated, so out-of-region points are never added.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointGroup {
    /// Point latitudes (radians).
    lats: Vec<f64>,

    /// Point longitudes (radians).
    lons: Vec<f64>,

    /// Unit position vectors.
    coords: Vec<Vector3<f64>>,

    /// Latitude bounds (lower, upper), radians.
    lat_bounds: (f64, f64),

    /// Longitude bounds (lower, upper), radians.
    lon_bounds: (f64, f64),
}

impl Default for PointGroup {
    fn default() -> Self {
        Self {
            lats: Vec::new(),
            lons: Vec::new(),
            coords: Vec::new(),
            lat_bounds: (-PI / 2.0, PI / 2.0),
            lon_bounds: (-PI, PI),
        }
    }
}

impl PointGroup {
    /// Builds an empty [PointGroup] with whole-sphere bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts subsequent accumulation to the given latitude /
    /// longitude box (radians).
    pub fn set_lat_lon_bounds(&mut self, lat_upper: f64, lat_lower: f64, lon_upper: f64, lon_lower: f64) {
        self.lat_bounds = (lat_lower, lat_upper);
        self.lon_bounds = (lon_lower, lon_upper);
    }

    /// Number of stored points.
    pub fn num_points(&self) -> usize {
        self.lats.len()
    }

    /// (latitude, longitude) of point `index`, radians.
    pub fn get_lat_and_lon(&self, index: usize) -> (f64, f64) {
        (self.lats[index], self.lons[index])
    }

    /// Unit position vector of point `index`.
    pub fn get_point_position_vector(&self, index: usize) -> &Vector3<f64> {
        &self.coords[index]
    }

    /// The latitude and longitude arrays (radians).
    pub fn lat_lon_vectors(&self) -> (&[f64], &[f64]) {
        (&self.lats, &self.lons)
    }

    /// Appends caller-supplied (lat, lon) pairs (radians), subject to
    /// the bounding box.
    pub fn add_user_defined_points(&mut self, lats: &[f64], lons: &[f64]) {
        if lats.len() != lons.len() {
            warn!(
                "user point arrays differ in length ({} lats, {} lons); extra entries dropped",
                lats.len(),
                lons.len()
            );
        }

        for (lat, lon) in lats.iter().zip(lons.iter()) {
            self.accumulate_point(*lat, *lon);
        }
    }

    /// Generates `num_points` points in a pole-plus-latitude-ring
    /// ("helical") arrangement: one point on each pole, the remainder
    /// distributed over evenly spaced latitude rings with per-ring
    /// counts proportional to ring circumference.
    pub fn add_helical_points_by_num_points(&mut self, num_points: usize) {
        if num_points == 0 {
            return;
        }

        self.accumulate_point(PI / 2.0, 0.0);
        if num_points == 1 {
            return;
        }
        self.accumulate_point(-PI / 2.0, 0.0);

        let remaining = num_points - 2;
        if remaining == 0 {
            return;
        }

        let ring_pairs = (((remaining as f64).sqrt() / 2.0).floor() as usize).max(1);
        let colatitudes = ring_colatitudes(ring_pairs);

        let mut budget = remaining as f64;
        let mut weight_sum: f64 = colatitudes.iter().map(|c| c.sin()).sum();

        for colatitude in colatitudes {
            let weight = colatitude.sin();
            // half-way allocations round up, matching the reference
            // point tables
            let count = ((budget * weight / weight_sum + 1.0e-9).round() as usize)
                .min(budget as usize);

            self.accumulate_ring(colatitude, count);

            budget -= count as f64;
            weight_sum -= weight;
            if budget <= 0.0 || weight_sum <= 0.0 {
                break;
            }
        }
    }

    /// Generates points with approximately `angle` radians of
    /// separation both between latitude rings and along each ring.
    pub fn add_helical_points_by_angle(&mut self, angle: f64) {
        if angle <= 0.0 {
            warn!("non-positive angular separation {angle}, no points generated");
            return;
        }

        self.accumulate_point(PI / 2.0, 0.0);
        self.accumulate_point(-PI / 2.0, 0.0);

        let ring_pairs = (((PI / angle - 1.0) / 2.0).round() as usize).max(1);

        for colatitude in ring_colatitudes(ring_pairs) {
            let count = ((2.0 * PI * colatitude.sin() / angle).round() as usize).max(1);
            self.accumulate_ring(colatitude, count);
        }
    }

    /// One ring of `count` points at the given colatitude, longitudes
    /// starting at -π and stepping eastward.
    fn accumulate_ring(&mut self, colatitude: f64, count: usize) {
        let lat = PI / 2.0 - colatitude;
        for j in 0..count {
            let lon = -PI + 2.0 * PI * j as f64 / count as f64;
            self.accumulate_point(lat, lon);
        }
    }

    /// Stores one point when it falls inside the bounding box.
    fn accumulate_point(&mut self, lat: f64, lon: f64) {
        let (lat_lower, lat_upper) = self.lat_bounds;
        let (lon_lower, lon_upper) = self.lon_bounds;

        if lat < lat_lower || lat > lat_upper || lon < lon_lower || lon > lon_upper {
            return;
        }

        self.lats.push(lat);
        self.lons.push(lon);
        self.coords.push(Vector3::new(
            lat.cos() * lon.cos(),
            lat.cos() * lon.sin(),
            lat.sin(),
        ));
    }
}

/// Interleaved north/south ring colatitudes for `pairs` ring pairs:
/// k·π/(2·pairs + 1) and its southern mirror, nearest the poles first.
fn ring_colatitudes(pairs: usize) -> Vec<f64> {
    let spacing = PI / (2 * pairs + 1) as f64;

    let mut colatitudes = Vec::with_capacity(2 * pairs);
    for k in 1..=pairs {
        colatitudes.push(k as f64 * spacing);
        colatitudes.push(PI - k as f64 * spacing);
    }
    colatitudes
}

#[cfg(test)]
mod test {
    use super::PointGroup;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    const RE: f64 = 6378.1363;

    /// Reference 50-point helical distribution, scaled to the body
    /// radius.
    #[rustfmt::skip]
    const HELICAL_50: [[f64; 3]; 50] = [
        [0.000000000000, 0.000000000000, 6378.136300000000],
        [0.000000000000, 0.000000000000, -6378.136300000000],
        [-2767.369626445428, -0.000000000000, 5746.502241538325],
        [-855.164244288687, -2631.924916228209, 5746.502241538325],
        [2238.849057511401, -1626.619054066753, 5746.502241538325],
        [2238.849057511401, 1626.619054066753, 5746.502241538325],
        [-855.164244288687, 2631.924916228209, 5746.502241538325],
        [-2767.369626445428, -0.000000000000, -5746.502241538325],
        [-855.164244288687, -2631.924916228209, -5746.502241538325],
        [2238.849057511401, -1626.619054066753, -5746.502241538325],
        [2238.849057511401, 1626.619054066753, -5746.502241538325],
        [-855.164244288687, 2631.924916228209, -5746.502241538325],
        [-4986.627758812155, -0.000000000001, 3976.702937914996],
        [-3526.078303509150, -3526.078303509150, 3976.702937914996],
        [0.000000000000, -4986.627758812155, 3976.702937914996],
        [3526.078303509150, -3526.078303509150, 3976.702937914996],
        [4986.627758812155, 0.000000000000, 3976.702937914996],
        [3526.078303509150, 3526.078303509150, 3976.702937914996],
        [0.000000000000, 4986.627758812155, 3976.702937914996],
        [-3526.078303509150, 3526.078303509150, 3976.702937914996],
        [-4986.627758812155, -0.000000000001, -3976.702937914996],
        [-3819.978484540894, -3205.342537483411, -3976.702937914996],
        [-865.918823021060, -4910.869678264101, -3976.702937914996],
        [2493.313879406076, -4318.546318347987, -3976.702937914996],
        [4685.897307561954, -1705.527140780692, -3976.702937914996],
        [4685.897307561954, 1705.527140780692, -3976.702937914996],
        [2493.313879406079, 4318.546318347985, -3976.702937914996],
        [-865.918823021058, 4910.869678264101, -3976.702937914996],
        [-3819.978484540894, 3205.342537483411, -3976.702937914996],
        [-6218.223106570102, -0.000000000001, 1419.268846376672],
        [-5231.102156334579, -3361.825223457347, 1419.268846376672],
        [-2583.143232664449, -5656.294691988934, 1419.268846376672],
        [884.945415758729, -6154.930561282550, 1419.268846376672],
        [4072.070147404028, -4699.419466030167, 1419.268846376672],
        [5966.341379121325, -1751.875894824452, 1419.268846376672],
        [5966.341379121325, 1751.875894824452, 1419.268846376672],
        [4072.070147404028, 4699.419466030167, 1419.268846376672],
        [884.945415758729, 6154.930561282550, 1419.268846376672],
        [-2583.143232664448, 5656.294691988935, 1419.268846376672],
        [-5231.102156334581, 3361.825223457345, 1419.268846376672],
        [-6218.223106570102, -0.000000000001, -1419.268846376672],
        [-5030.648168030191, -3654.979837506194, -1419.268846376672],
        [-1921.536614745141, -5913.881605280589, -1419.268846376672],
        [1921.536614745141, -5913.881605280588, -1419.268846376672],
        [5030.648168030192, -3654.979837506193, -1419.268846376672],
        [6218.223106570102, 0.000000000000, -1419.268846376672],
        [5030.648168030192, 3654.979837506193, -1419.268846376672],
        [1921.536614745141, 5913.881605280588, -1419.268846376672],
        [-1921.536614745141, 5913.881605280589, -1419.268846376672],
        [-5030.648168030191, 3654.979837506194, -1419.268846376672],
    ];

    #[test]
    fn helical_50_distribution() {
        let mut pg = PointGroup::new();
        pg.add_helical_points_by_num_points(50);
        assert_eq!(pg.num_points(), 50);

        let mut max_diff = 0.0_f64;
        for (index, truth) in HELICAL_50.iter().enumerate() {
            let p = pg.get_point_position_vector(index) * RE;
            let diff = ((p[0] - truth[0]).powi(2)
                + (p[1] - truth[1]).powi(2)
                + (p[2] - truth[2]).powi(2))
            .sqrt();
            max_diff = max_diff.max(diff);
        }
        assert!(max_diff < 1.0e-9, "max deviation {max_diff} km");
    }

    #[test]
    fn count_is_honored() {
        for n in [1, 2, 3, 7, 23, 100, 200, 777] {
            let mut pg = PointGroup::new();
            pg.add_helical_points_by_num_points(n);
            assert_eq!(pg.num_points(), n, "requested {n} points");
        }
    }

    #[test]
    fn unit_vectors_match_lat_lon() {
        let mut pg = PointGroup::new();
        pg.add_helical_points_by_num_points(137);

        for index in 0..pg.num_points() {
            let p = pg.get_point_position_vector(index);
            assert_abs_diff_eq!(p.norm(), 1.0, epsilon = 1.0e-14);

            let (lat, lon) = pg.get_lat_and_lon(index);
            assert_abs_diff_eq!(p[2], lat.sin(), epsilon = 1.0e-14);
            assert_abs_diff_eq!(p[1].atan2(p[0]), lon, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn region_bounds() {
        for (lat_up, lat_low, lon_up, lon_low) in [
            (PI / 3.0, -PI / 3.0, PI / 3.0, -PI / 3.0),
            (PI / 4.0, 0.0, 0.0, -PI),
            (-PI / 4.0, -PI / 2.0, -PI / 3.0, -PI / 2.0),
            (0.0, -PI / 2.0, PI, PI / 2.0),
        ] {
            let mut pg = PointGroup::new();
            pg.set_lat_lon_bounds(lat_up, lat_low, lon_up, lon_low);
            pg.add_helical_points_by_num_points(500);

            let (lats, lons) = pg.lat_lon_vectors();
            assert!(!lats.is_empty());
            for (lat, lon) in lats.iter().zip(lons.iter()) {
                assert!(*lat >= lat_low && *lat <= lat_up);
                assert!(*lon >= lon_low && *lon <= lon_up);
            }
        }
    }

    #[test]
    fn user_defined_points_round_trip() {
        let mut pg = PointGroup::new();
        pg.add_helical_points_by_num_points(64);
        let (lats, lons) = pg.lat_lon_vectors();

        let mut custom = PointGroup::new();
        custom.add_user_defined_points(lats, lons);
        assert_eq!(custom.num_points(), pg.num_points());

        let (lats2, lons2) = custom.lat_lon_vectors();
        for index in 0..custom.num_points() {
            assert_eq!(lats2[index], lats[index]);
            assert_eq!(lons2[index], lons[index]);
        }
    }

    #[test]
    fn angular_separation() {
        for angle_deg in [1.0, 0.5] {
            let angle = angle_deg * PI / 180.0;
            let mut pg = PointGroup::new();
            pg.add_helical_points_by_angle(angle);
            assert!(pg.num_points() > 2);

            // median separation of consecutive points tracks the
            // requested spacing (ring boundaries excluded by the median)
            let mut separations: Vec<f64> = (2..pg.num_points() - 1)
                .map(|k| {
                    let v1 = pg.get_point_position_vector(k);
                    let v2 = pg.get_point_position_vector(k + 1);
                    v1.dot(v2).clamp(-1.0, 1.0).acos()
                })
                .collect();
            separations.sort_by(|a, b| a.partial_cmp(b).unwrap());

            let median = separations[separations.len() / 2];
            assert_abs_diff_eq!(median, angle, epsilon = 1.0e-3);
        }
    }
}
