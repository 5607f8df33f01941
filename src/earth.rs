//! Earth model: rotation angle, frame transforms, geodetic conversions
//! and a low-precision solar ephemeris.

use crate::constants::{
    AU_KM, BODY_RADIUS_KM, EARTH_FLATTENING, EARTH_J2, EARTH_MU_KM3_S2, JD_J2000,
};
use crate::rotation::r3;

use nalgebra::Vector3;

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Earth as seen by the coverage kernel: a rotating body of fixed
/// equatorial radius, with stateless frame and coordinate conversions.
///
/// The inertial frame is Earth-centered equatorial with the x-axis to
/// the vernal equinox; GMST is the only Earth-orientation model, so the
/// body-fixed frame is the inertial frame spun about +Z.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Earth {
    /// Equatorial radius (km).
    radius_km: f64,

    /// Flattening (dimensionless).
    flattening: f64,

    /// Gravitational parameter (km³.s⁻²).
    mu_km3_s2: f64,

    /// Second zonal harmonic (dimensionless).
    j2: f64,
}

impl Default for Earth {
    fn default() -> Self {
        Self {
            radius_km: BODY_RADIUS_KM,
            flattening: EARTH_FLATTENING,
            mu_km3_s2: EARTH_MU_KM3_S2,
            j2: EARTH_J2,
        }
    }
}

impl Earth {
    /// Builds the default Earth model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies and returns [Earth] with a different equatorial radius (km).
    pub fn with_radius_km(&self, radius_km: f64) -> Self {
        let mut s = *self;
        s.radius_km = radius_km;
        s
    }

    /// Equatorial radius (km).
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Flattening.
    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    /// Gravitational parameter (km³.s⁻²).
    pub fn mu_km3_s2(&self) -> f64 {
        self.mu_km3_s2
    }

    /// Second zonal harmonic J₂.
    pub fn j2(&self) -> f64 {
        self.j2
    }

    /// Greenwich mean sidereal time at `jd`, as the rotation angle of
    /// the body-fixed frame relative to the inertial frame, in
    /// [0, 2π) radians. Low-fidelity analytical model, adequate for
    /// coverage work (≈ 1e-5 relative).
    pub fn gmst(&self, jd: f64) -> f64 {
        let days = jd - JD_J2000;
        let centuries = days / 36525.0;

        let theta_deg = 280.46061837
            + 360.98564736629 * days
            + 0.000387933 * centuries * centuries
            - centuries * centuries * centuries / 38710000.0;

        let theta = theta_deg.to_radians() % (2.0 * PI);
        if theta < 0.0 {
            theta + 2.0 * PI
        } else {
            theta
        }
    }

    /// Rotates an inertial vector into the body-fixed frame at `jd`.
    ///
    /// Velocities passed through this rotation lose the ω×r term; that
    /// omission is acceptable for coverage geometry but not for
    /// precision dynamics.
    pub fn inertial_to_body_fixed(&self, v: &Vector3<f64>, jd: f64) -> Vector3<f64> {
        r3(self.gmst(jd)) * v
    }

    /// Rotates a body-fixed vector into the inertial frame at `jd`.
    pub fn body_fixed_to_inertial(&self, v: &Vector3<f64>, jd: f64) -> Vector3<f64> {
        r3(self.gmst(jd)).transpose() * v
    }

    /// Rotates a body-fixed vector into the local East-North-Up frame
    /// of the site at (lat, lon): x east, y north, z up.
    pub fn fixed_to_topocentric(&self, v: &Vector3<f64>, lat: f64, lon: f64) -> Vector3<f64> {
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let east = Vector3::new(-sin_lon, cos_lon, 0.0);
        let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

        Vector3::new(east.dot(v), north.dot(v), up.dot(v))
    }

    /// Body-fixed Cartesian (km) to spherical (lat, lon, height) where
    /// the height is counted above the sphere of the equatorial radius.
    pub fn cartesian_to_spherical(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let r = v.norm();
        let lat = (v[2] / r).clamp(-1.0, 1.0).asin();
        let lon = v[1].atan2(v[0]);
        Vector3::new(lat, lon, r - self.radius_km)
    }

    /// Spherical (lat, lon, height) to body-fixed Cartesian (km).
    pub fn spherical_to_cartesian(&self, s: &Vector3<f64>) -> Vector3<f64> {
        let (lat, lon, height) = (s[0], s[1], s[2]);
        let r = self.radius_km + height;
        Vector3::new(
            r * lat.cos() * lon.cos(),
            r * lat.cos() * lon.sin(),
            r * lat.sin(),
        )
    }

    /// Body-fixed Cartesian (km) to geodetic (lat, lon, altitude) on
    /// the reference ellipsoid, iterating Bowring's formula to
    /// convergence.
    pub fn cartesian_to_ellipsoid(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let a = self.radius_km;
        let f = self.flattening;
        let b = a * (1.0 - f);
        let e2 = 2.0 * f - f * f;
        let ep2 = e2 / (1.0 - e2);

        let p = (v[0] * v[0] + v[1] * v[1]).sqrt();
        let lon = v[1].atan2(v[0]);

        let mut beta = (v[2] * a).atan2(p * b);
        let mut lat = 0.0;
        for _ in 0..5 {
            let (sin_b, cos_b) = beta.sin_cos();
            lat = (v[2] + ep2 * b * sin_b.powi(3)).atan2(p - e2 * a * cos_b.powi(3));
            beta = ((1.0 - f) * lat.sin()).atan2(lat.cos());
        }

        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt = if lat.cos().abs() > 1.0e-6 {
            p / lat.cos() - n
        } else {
            v[2].abs() - b
        };

        Vector3::new(lat, lon, alt)
    }

    /// Geodetic (lat, lon, altitude) to body-fixed Cartesian (km).
    pub fn ellipsoid_to_cartesian(&self, g: &Vector3<f64>) -> Vector3<f64> {
        let (lat, lon, alt) = (g[0], g[1], g[2]);
        let f = self.flattening;
        let e2 = 2.0 * f - f * f;

        let sin_lat = lat.sin();
        let n = self.radius_km / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        Vector3::new(
            (n + alt) * lat.cos() * lon.cos(),
            (n + alt) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + alt) * sin_lat,
        )
    }

    /// Inertial position (km) at `jd` to geodetic (lat, lon, altitude).
    pub fn inertial_to_ellipsoid(&self, v: &Vector3<f64>, jd: f64) -> Vector3<f64> {
        self.cartesian_to_ellipsoid(&self.inertial_to_body_fixed(v, jd))
    }

    /// Inertial position (km) at `jd` to spherical (lat, lon, height).
    pub fn inertial_to_spherical(&self, v: &Vector3<f64>, jd: f64) -> Vector3<f64> {
        self.cartesian_to_spherical(&self.inertial_to_body_fixed(v, jd))
    }

    /// Sun position in the inertial frame (km) at `jd`, from the
    /// low-precision analytic ephemeris (mean longitude plus a
    /// two-term equation of centre).
    pub fn sun_position_inertial(&self, jd: f64) -> Vector3<f64> {
        let t = (jd - JD_J2000) / 36525.0;

        let mean_lon_deg = 280.460 + 36000.771 * t;
        let mean_anom = (357.5291092 + 35999.05034 * t).to_radians();

        let ecl_lon = (mean_lon_deg
            + 1.914666471 * mean_anom.sin()
            + 0.019994643 * (2.0 * mean_anom).sin())
        .to_radians();

        let r_au =
            1.000140612 - 0.016708617 * mean_anom.cos() - 0.000139589 * (2.0 * mean_anom).cos();

        let obliquity = (23.439291 - 0.0130042 * t).to_radians();

        Vector3::new(
            ecl_lon.cos(),
            obliquity.cos() * ecl_lon.sin(),
            obliquity.sin() * ecl_lon.sin(),
        ) * (r_au * AU_KM)
    }

    /// Sun position rotated into the body-fixed frame (km) at `jd`.
    /// Feed through [Self::cartesian_to_spherical] or
    /// [Self::cartesian_to_ellipsoid] for angular views.
    pub fn sun_position_in_body_coords(&self, jd: f64) -> Vector3<f64> {
        self.inertial_to_body_fixed(&self.sun_position_inertial(jd), jd)
    }
}
