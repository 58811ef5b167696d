//! Small-signal response of the rectifier's LC low-pass filter.
//!
//! The filter is treated as the linear transfer function
//! `H(s) = 1 / (L·C·s² + (L/R)·s + 1)`; the diode is left out entirely.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::rectifier::RectifierParameters;
use crate::{require_positive, Error};

/// The resonant frequency `1 / (2π·sqrt(L·C))` of an LC pair.
#[inline]
pub fn cutoff_frequency(inductance: f64, capacitance: f64) -> f64 {
    (2.0 * PI * f64::sqrt(inductance * capacitance)).recip()
}

/// Second order low-pass formed by a series inductor and a capacitor across the load.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LowPassFilter {
    pub inductance: f64,
    pub capacitance: f64,
    pub resistance: f64,
}

impl LowPassFilter {
    pub fn from_params(params: &RectifierParameters) -> Self {
        Self {
            inductance: params.inductance,
            capacitance: params.capacitance,
            resistance: params.resistance,
        }
    }

    /// Evaluates `H(j·2π·frequency)`.
    pub fn transfer(&self, frequency: f64) -> Complex64 {
        let s = Complex64::new(0.0, 2.0 * PI * frequency);
        let denominator = self.inductance * self.capacitance * s * s
            + (self.inductance / self.resistance) * s
            + 1.0;
        denominator.inv()
    }

    /// Magnitude and phase of the response at `frequency`.
    pub fn point(&self, frequency: f64) -> FrequencyPoint {
        let h = self.transfer(frequency);
        FrequencyPoint {
            frequency,
            magnitude_db: 20.0 * h.norm().log10(),
            phase_deg: h.arg().to_degrees(),
        }
    }

    pub fn magnitude_db(&self, frequency: f64) -> f64 {
        self.point(frequency).magnitude_db
    }

    pub fn phase_deg(&self, frequency: f64) -> f64 {
        self.point(frequency).phase_deg
    }

    /// Gain at 0 Hz; always 0 dB for this filter.
    pub fn dc_magnitude_db(&self) -> f64 {
        self.magnitude_db(0.0)
    }

    /// Gain at the resonant frequency, `20·log10(Q)`.
    pub fn magnitude_at_cutoff_db(&self) -> f64 {
        self.magnitude_db(self.cutoff_frequency())
    }

    #[inline]
    pub fn cutoff_frequency(&self) -> f64 {
        cutoff_frequency(self.inductance, self.capacitance)
    }

    /// The quality factor `R·sqrt(C/L)`; `1/√2` gives a maximally flat response.
    pub fn quality_factor(&self) -> f64 {
        self.resistance * f64::sqrt(self.capacitance / self.inductance)
    }
}

/// Describes a logarithmic frequency sweep.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SweepDescriptor {
    /// First frequency of the sweep [Hz].
    pub f_start: f64,
    /// Last frequency of the sweep [Hz].
    pub f_stop: f64,
    /// Number of points, both ends included.
    pub npoints: usize,
}

impl Default for SweepDescriptor {
    fn default() -> Self {
        Self {
            f_start: 1.0,
            f_stop: 100e3,
            npoints: 500,
        }
    }
}

impl SweepDescriptor {
    /// The sweep frequencies, evenly spaced in log10.
    pub fn frequencies(&self) -> Result<Vec<f64>, Error> {
        require_positive("f_start", self.f_start)?;
        require_positive("f_stop", self.f_stop)?;
        if self.f_stop <= self.f_start {
            return Err(Error::invalid("f_stop", self.f_stop, "must exceed f_start"));
        }
        if self.npoints < 2 {
            return Err(Error::invalid("npoints", self.npoints as f64, "sweep needs at least 2 points"));
        }

        let start = self.f_start.log10();
        let step = (self.f_stop.log10() - start) / ((self.npoints - 1) as f64);
        Ok((0..self.npoints)
            .map(|i| 10.0_f64.powf(start + step * (i as f64)))
            .collect())
    }
}

/// One evaluated frequency.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrequencyPoint {
    /// [Hz]
    pub frequency: f64,
    /// [dB]
    pub magnitude_db: f64,
    /// [degrees]
    pub phase_deg: f64,
}

/// A swept response together with the filter's analytic cutoff.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrequencyResponse {
    pub points: Vec<FrequencyPoint>,
    pub cutoff_frequency: f64,
}

impl FrequencyResponse {
    /// The swept point whose frequency is closest, on a log scale, to `frequency`.
    pub fn nearest(&self, frequency: f64) -> Option<&FrequencyPoint> {
        let distance = |p: &FrequencyPoint| (p.frequency / frequency).ln().abs();
        self.points
            .iter()
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))
    }
}

/// Sweeps the filter described by `params`.
pub fn frequency_response(
    params: &RectifierParameters,
    sweep: &SweepDescriptor,
) -> Result<FrequencyResponse, Error> {
    params.validate()?;
    let filter = LowPassFilter::from_params(params);
    let frequencies = sweep.frequencies()?;

    let _span = tracing::debug_span!("frequency_response", npoints = frequencies.len()).entered();
    let points = frequencies
        .into_iter()
        .map(|frequency| filter.point(frequency))
        .collect::<Vec<_>>();
    tracing::debug!(cutoff = filter.cutoff_frequency(), q = filter.quality_factor(), "swept LC filter");

    Ok(FrequencyResponse {
        points,
        cutoff_frequency: filter.cutoff_frequency(),
    })
}
