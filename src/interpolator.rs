//! Sliding-window Lagrange interpolation of time-tagged state vectors.

use crate::errors::InterpolationError;

use nalgebra::Vector6;

use std::collections::VecDeque;

/// Fixed-order Lagrange interpolator over a bounded FIFO window of
/// (t, state) samples. Each of the six state dimensions is
/// interpolated independently.
///
/// Samples must be strictly increasing in the independent variable;
/// once the window is full the oldest sample is evicted.
#[derive(Debug, Clone)]
pub struct LagrangeInterpolator {
    /// Interpolation order (window of order + 1 samples).
    order: usize,

    /// Maximum number of buffered samples.
    max_points: usize,

    /// FIFO sample buffer.
    samples: VecDeque<(f64, Vector6<f64>)>,
}

impl Default for LagrangeInterpolator {
    /// Order 6 over a 7-sample window.
    fn default() -> Self {
        Self::new(6, 7)
    }
}

impl LagrangeInterpolator {
    /// Builds a [LagrangeInterpolator] of the given order and buffer
    /// capacity; the capacity is raised to order + 1 when necessary.
    pub fn new(order: usize, max_points: usize) -> Self {
        Self {
            order,
            max_points: max_points.max(order + 1),
            samples: VecDeque::new(),
        }
    }

    /// Interpolation order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample is buffered.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last buffered sample times.
    pub fn min_max_time(&self) -> Option<(f64, f64)> {
        match (self.samples.front(), self.samples.back()) {
            (Some((t_min, _)), Some((t_max, _))) => Some((*t_min, *t_max)),
            _ => None,
        }
    }

    /// Half the buffered span, the margin callers keep between their
    /// query and the leading edge of the window.
    pub fn mid_range(&self) -> Option<f64> {
        self.min_max_time().map(|(t_min, t_max)| (t_max - t_min) / 2.0)
    }

    /// True when a query at `t` can be serviced.
    pub fn can_interpolate(&self, t: f64) -> bool {
        match self.min_max_time() {
            Some((t_min, t_max)) => self.samples.len() > self.order && t >= t_min && t <= t_max,
            None => false,
        }
    }

    /// Appends a sample, evicting the oldest one when the buffer is
    /// full. Fails with [InterpolationError::OutOfOrderSample] when `t`
    /// is not strictly after the buffered tail.
    pub fn add_point(&mut self, t: f64, y: Vector6<f64>) -> Result<(), InterpolationError> {
        if let Some((t_last, _)) = self.samples.back() {
            if t <= *t_last {
                return Err(InterpolationError::OutOfOrderSample {
                    t_last: *t_last,
                    t_new: t,
                });
            }
        }

        if self.samples.len() == self.max_points {
            self.samples.pop_front();
        }
        self.samples.push_back((t, y));
        Ok(())
    }

    /// Interpolates the state at `t`.
    ///
    /// Requires at least order + 1 buffered samples and `t` inside the
    /// buffered span; violations fail with
    /// [InterpolationError::OutOfRange].
    pub fn interpolate(&self, t: f64) -> Result<Vector6<f64>, InterpolationError> {
        let (t_min, t_max) = self.min_max_time().unwrap_or((f64::NAN, f64::NAN));

        if self.samples.len() <= self.order || !(t >= t_min && t <= t_max) {
            return Err(InterpolationError::OutOfRange { t, t_min, t_max });
        }

        // window of order + 1 samples centered on the query
        let window_len = self.order + 1;
        let first_after = self
            .samples
            .iter()
            .position(|(t_i, _)| *t_i >= t)
            .unwrap_or(self.samples.len());
        let start = first_after
            .saturating_sub(window_len / 2)
            .min(self.samples.len() - window_len);

        let window: Vec<&(f64, Vector6<f64>)> =
            self.samples.iter().skip(start).take(window_len).collect();

        let mut result = Vector6::zeros();
        for (i, (t_i, y_i)) in window.iter().enumerate() {
            let mut l_i = 1.0_f64;
            for (j, (t_j, _)) in window.iter().enumerate() {
                if j != i {
                    l_i *= (t - t_j) / (t_i - t_j);
                }
            }
            result += y_i * l_i;
        }

        Ok(result)
    }
}
