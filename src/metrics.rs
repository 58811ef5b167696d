//! Steady-state reductions over simulated waveforms.

use std::ops::Range;

use ndarray::ArrayView1;

use crate::{Error, SimulationTrace};

/// The arithmetic mean of `samples`, or zero when empty.
pub fn mean(samples: ArrayView1<f64>) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.sum() / (samples.len() as f64)
}

/// The smallest and largest of `samples`.
pub fn min_max(samples: ArrayView1<f64>) -> Option<(f64, f64)> {
    samples.iter().fold(None, |acc, &x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}

/// `max - min` of `samples`, or zero when empty.
pub fn peak_to_peak(samples: ArrayView1<f64>) -> f64 {
    min_max(samples).map_or(0.0, |(lo, hi)| hi - lo)
}

/// Ripple relative to the mean; zero when the mean is zero.
pub fn ripple_factor(ripple: f64, mean: f64) -> f64 {
    if mean != 0.0 {
        ripple / mean
    } else {
        0.0
    }
}

/// The slice of `samples` covered by `range`, rejecting empty or out of bounds ranges.
pub fn window(samples: ArrayView1<f64>, range: Range<usize>) -> Result<ArrayView1<f64>, Error> {
    if range.start >= range.end || range.end > samples.len() {
        return Err(Error::invalid(
            "window",
            range.start as f64,
            "window must be a non-empty range inside the trace",
        ));
    }
    Ok(samples.slice_move(ndarray::s![range]))
}

/// Selects the trailing part of a trace once the start-up transient has died out.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SteadyWindow {
    /// Discard every sample before this much simulated time, in seconds.
    SkipDuration(f64),
    /// Discard this fraction of the samples from the front of the trace.
    SkipFraction(f64),
}

impl SteadyWindow {
    /// The sample index range that remains after the transient is discarded.
    pub fn range(&self, trace: &SimulationTrace) -> Result<Range<usize>, Error> {
        let len = trace.len();
        let start = match *self {
            SteadyWindow::SkipDuration(duration) => {
                crate::require_non_negative("transient duration", duration)?;
                let dt = trace.time_step();
                if dt > 0.0 {
                    (duration / dt) as usize
                } else {
                    0
                }
            }
            SteadyWindow::SkipFraction(fraction) => {
                if !(0.0..1.0).contains(&fraction) {
                    return Err(Error::invalid(
                        "transient fraction",
                        fraction,
                        "must lie in [0, 1)",
                    ));
                }
                (fraction * (len as f64)) as usize
            }
        };
        if start >= len {
            return Err(Error::invalid(
                "steady window start",
                start as f64,
                "transient covers the whole trace",
            ));
        }
        Ok(start..len)
    }
}

/// Scalar figures describing one signal in steady state.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SteadyStateMetrics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Peak-to-peak variation.
    pub ripple: f64,
    /// `ripple / mean`, zero when the mean is zero.
    pub ripple_factor: f64,
}

impl SteadyStateMetrics {
    /// Reduces a non-empty window of samples.
    pub fn from_window(samples: ArrayView1<f64>) -> Result<Self, Error> {
        let (min, max) = min_max(samples.view())
            .ok_or_else(|| Error::invalid("window", 0.0, "window holds no samples"))?;
        let mean = mean(samples);
        let ripple = max - min;

        Ok(Self {
            mean,
            min,
            max,
            ripple,
            ripple_factor: ripple_factor(ripple, mean),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_basic_reductions() {
        let samples = array![2.0, 4.0, 3.0, 7.0];
        assert_relative_eq!(mean(samples.view()), 4.0);
        assert_relative_eq!(peak_to_peak(samples.view()), 5.0);
        assert_eq!(min_max(samples.view()), Some((2.0, 7.0)));
    }

    #[test]
    fn test_empty_reductions() {
        let samples = ndarray::Array1::<f64>::zeros(0);
        assert_eq!(mean(samples.view()), 0.0);
        assert_eq!(peak_to_peak(samples.view()), 0.0);
        assert!(SteadyStateMetrics::from_window(samples.view()).is_err());
    }

    #[test]
    fn test_ripple_factor_zero_mean() {
        assert_eq!(ripple_factor(3.0, 0.0), 0.0);
        assert_relative_eq!(ripple_factor(1.0, 4.0), 0.25);
    }

    #[test]
    fn test_window_bounds() {
        let samples = array![1.0, 2.0, 3.0];
        assert_eq!(window(samples.view(), 1..3).unwrap(), array![2.0, 3.0]);
        assert!(window(samples.view(), 2..2).is_err());
        assert!(window(samples.view(), 1..4).is_err());
    }

    #[test]
    fn test_from_window() {
        let samples = array![-1.0, 1.0, 3.0];
        let metrics = SteadyStateMetrics::from_window(samples.view()).unwrap();
        assert_relative_eq!(metrics.mean, 1.0);
        assert_relative_eq!(metrics.ripple, 4.0);
        assert_relative_eq!(metrics.ripple_factor, 4.0);
        assert_eq!(metrics.min, -1.0);
        assert_eq!(metrics.max, 3.0);
    }
}
