//! Physical constants shared across the crate.

/// Earth equatorial radius (km).
///
/// All spherical FOV geometry is evaluated on a sphere of this radius;
/// override at [crate::prelude::Earth] construction when a different
/// body model is required.
pub const BODY_RADIUS_KM: f64 = 6378.1363;

/// Earth gravitational constant μ (km³.s⁻²).
pub const EARTH_MU_KM3_S2: f64 = 398600.4415;

/// Earth second zonal harmonic J₂ (dimensionless).
pub const EARTH_J2: f64 = 1.0826269e-3;

/// Earth flattening (dimensionless).
pub const EARTH_FLATTENING: f64 = 0.0033527;

/// Astronomical unit (km).
pub const AU_KM: f64 = 149_597_870.691;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Reference epoch J2000.0 as a Julian date (days).
pub const JD_J2000: f64 = 2451545.0;
