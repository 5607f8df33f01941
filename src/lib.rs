//! Earth-orbit coverage analysis kernel.
#![doc(html_logo_url = "https://raw.githubusercontent.com/rtk-rs/.github/master/logos/logo2.jpg")]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * orbitcov is part of the rtk-rs framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * (cf. https://github.com/rtk-rs/rinex/graphs/contributors)
 * This framework is shipped under Mozilla Public V2 license.
 *
 * Documentation: https://github.com/nav-solutions/orbitcov
 */

pub mod atmosphere;
pub mod attitude;
pub mod constants;
pub mod coverage;
pub mod earth;
pub mod errors;
pub mod interpolator;
pub mod orbit;
pub mod pointgroup;
pub mod propagator;
pub mod report;
pub mod rotation;
pub mod sensor;
pub mod spacecraft;
pub mod time;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use crate::{
        atmosphere::ExponentialAtmosphere,
        attitude::NadirPointingAttitude,
        constants::BODY_RADIUS_KM,
        coverage::CoverageChecker,
        earth::Earth,
        errors::{CoverageError, FovError, InterpolationError, PropagationError},
        interpolator::LagrangeInterpolator,
        orbit::OrbitState,
        pointgroup::PointGroup,
        propagator::Propagator,
        report::{IntervalEventReport, VisiblePOIReport},
        rotation::EulerSequence,
        sensor::{ConicalSensor, CustomSensor, Fov, RectangularSensor, Sensor},
        spacecraft::Spacecraft,
        time::AbsoluteDate,
    };

    // Pub re-export
    pub use hifitime::Epoch;
    pub use nalgebra::{Matrix3, Vector3, Vector6};
}
