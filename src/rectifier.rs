//! An AC source rectified by a diode into a series-RL, parallel-RC filter.
//!
//! The rectifying diode is modelled as a constant forward drop that conducts
//! whenever the source exceeds it; otherwise the freewheeling diode clamps the
//! filter input to the negative of its own drop. There is no reverse recovery
//! and no dynamic resistance.

pub mod components;
pub mod frequency_response;

mod rectifier_simulator;

pub use rectifier_simulator::{RectifierMetrics, RectifierSimulator, RectifierSimulatorDescriptor};

use std::f64::consts::{PI, SQRT_2};

use crate::{require_non_negative, require_positive, Error};

/// Generates the AC voltage feeding the rectifier.
pub trait Source {
    fn generate(&self, time: f64) -> f64;
}

/// Maps the instantaneous source voltage to the voltage at the filter input.
pub trait Rectifier {
    fn rectify(&self, source_voltage: f64) -> f64;
}

/// Circuit values of the rectifier and its filter.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectifierParameters {
    /// RMS voltage of the AC source [V].
    pub vrms: f64,
    /// Frequency of the AC source [Hz].
    pub frequency: f64,
    /// Load resistance [Ω].
    pub resistance: f64,
    /// Series filter inductance [H].
    pub inductance: f64,
    /// Parallel filter capacitance [F].
    pub capacitance: f64,
    /// Forward drop of the rectifying diode [V].
    pub diode_drop: f64,
    /// Forward drop of the freewheeling diode [V].
    pub freewheel_drop: f64,
}

impl Default for RectifierParameters {
    fn default() -> Self {
        Self {
            vrms: 36.0,
            frequency: 60.0,
            resistance: 10.0,
            inductance: 1.0,
            capacitance: 1000e-6,
            diode_drop: 0.3,
            freewheel_drop: 0.7,
        }
    }
}

impl RectifierParameters {
    /// Checks that the circuit can be simulated.
    pub fn validate(&self) -> Result<(), Error> {
        require_positive("vrms", self.vrms)?;
        require_positive("frequency", self.frequency)?;
        require_positive("resistance", self.resistance)?;
        require_positive("inductance", self.inductance)?;
        require_positive("capacitance", self.capacitance)?;
        require_non_negative("diode_drop", self.diode_drop)?;
        require_non_negative("freewheel_drop", self.freewheel_drop)?;
        Ok(())
    }

    #[inline]
    pub fn peak_voltage(&self) -> f64 {
        self.vrms * SQRT_2
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.frequency.recip()
    }

    #[inline]
    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI * self.frequency
    }

    /// The resonant frequency of the LC filter.
    #[inline]
    pub fn cutoff_frequency(&self) -> f64 {
        frequency_response::cutoff_frequency(self.inductance, self.capacitance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::ErrorKind;

    #[test]
    fn test_default_parameters() {
        let params = RectifierParameters::default();
        assert!(params.validate().is_ok());
        assert_relative_eq!(params.peak_voltage(), 50.91168824543142, epsilon = 1e-9);
        assert_relative_eq!(params.period(), 1.0 / 60.0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let base = RectifierParameters::default();
        let cases = [
            RectifierParameters { vrms: 0.0, ..base },
            RectifierParameters { frequency: -60.0, ..base },
            RectifierParameters { resistance: 0.0, ..base },
            RectifierParameters { inductance: -1.0, ..base },
            RectifierParameters { capacitance: 0.0, ..base },
            RectifierParameters { capacitance: f64::NAN, ..base },
            RectifierParameters { freewheel_drop: -0.7, ..base },
        ];
        for params in cases {
            let err = params.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_zero_diode_drops_are_allowed() {
        let params = RectifierParameters {
            diode_drop: 0.0,
            freewheel_drop: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }
}
