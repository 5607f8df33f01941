//! Piecewise-exponential atmospheric density model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// (base altitude km, nominal density kg.m⁻³, scale height km)
const BANDS: [(f64, f64, f64); 28] = [
    (0.0, 1.225, 7.249),
    (25.0, 3.899e-2, 6.349),
    (30.0, 1.774e-2, 6.682),
    (40.0, 3.972e-3, 7.554),
    (50.0, 1.057e-3, 8.382),
    (60.0, 3.206e-4, 7.714),
    (70.0, 8.770e-5, 6.549),
    (80.0, 1.905e-5, 5.799),
    (90.0, 3.396e-6, 5.382),
    (100.0, 5.297e-7, 5.877),
    (110.0, 9.661e-8, 7.263),
    (120.0, 2.438e-8, 9.473),
    (130.0, 8.484e-9, 12.636),
    (140.0, 3.845e-9, 16.149),
    (150.0, 2.070e-9, 22.523),
    (180.0, 5.464e-10, 29.740),
    (200.0, 2.789e-10, 37.105),
    (250.0, 7.248e-11, 45.546),
    (300.0, 2.418e-11, 53.628),
    (350.0, 9.518e-12, 53.298),
    (400.0, 3.725e-12, 58.515),
    (450.0, 1.585e-12, 60.828),
    (500.0, 6.967e-13, 63.822),
    (600.0, 1.454e-13, 71.835),
    (700.0, 3.614e-14, 88.667),
    (800.0, 1.170e-14, 124.64),
    (900.0, 5.245e-15, 181.05),
    (1000.0, 3.019e-15, 268.0),
];

/// Static exponential atmosphere: density decays exponentially from a
/// banded base table. Good enough to drive per-revolution drag decay
/// estimates, nothing more.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExponentialAtmosphere {}

impl ExponentialAtmosphere {
    /// Builds the model.
    pub fn new() -> Self {
        Self::default()
    }

    fn band(&self, altitude_km: f64) -> (f64, f64, f64) {
        let mut selected = BANDS[0];
        for band in BANDS.iter() {
            if altitude_km >= band.0 {
                selected = *band;
            } else {
                break;
            }
        }
        selected
    }

    /// Density (kg.m⁻³) at the given altitude (km above the surface).
    /// Altitudes below zero saturate to the ground band; altitudes
    /// above the last band keep its scale height.
    pub fn density_kg_m3(&self, altitude_km: f64) -> f64 {
        let altitude_km = altitude_km.max(0.0);
        let (base, rho0, scale_height) = self.band(altitude_km);
        rho0 * (-(altitude_km - base) / scale_height).exp()
    }

    /// Scale height (km) of the band containing the given altitude.
    pub fn scale_height_km(&self, altitude_km: f64) -> f64 {
        self.band(altitude_km.max(0.0)).2
    }
}
