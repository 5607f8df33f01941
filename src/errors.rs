use thiserror::Error;

/// Errors raised when constructing a sensor field of view
/// from inconsistent polygon data.
#[derive(Debug, Error)]
pub enum FovError {
    #[error("cone and clock angle arrays must be the same length ({cones} cones, {clocks} clocks)")]
    MismatchedAngleArrays { cones: usize, clocks: usize },

    #[error("at least 3 vertices are required to form a valid FOV (got {0})")]
    TooFewVertices(usize),

    #[error("vertex {index} has cone angle {cone_rad} rad, too close to the -Z projection pole")]
    VertexAtProjectionPole { index: usize, cone_rad: f64 },
}

/// Errors raised by the sliding-window interpolator.
#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("sample at t={t_new} is not after the previous sample at t={t_last}")]
    OutOfOrderSample { t_last: f64, t_new: f64 },

    #[error("t={t} is outside the interpolable span [{t_min}, {t_max}]")]
    OutOfRange { t: f64, t_min: f64, t_max: f64 },
}

/// Errors raised during orbit propagation.
#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("Kepler solver did not converge (M={mean_anomaly} rad, e={ecc})")]
    KeplerNoConvergence { mean_anomaly: f64, ecc: f64 },

    #[error("orbit decayed below the body surface at jd={jd} (periapsis altitude {altitude_km} km)")]
    DragNegativeAltitude { jd: f64, altitude_km: f64 },
}

/// Errors raised while accumulating coverage data.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("spacecraft state cannot be interpolated at jd={at_time}: {source}")]
    NotInterpolable {
        at_time: f64,
        #[source]
        source: InterpolationError,
    },
}
