//! A step-down converter under ideal PWM control.
//!
//! The inductor voltage jumps at every switching instant, so instead of an
//! adaptive solver the converter is advanced with explicit Euler steps much
//! shorter than the switching period.

pub mod pwm;

mod buck_simulator;

pub use buck_simulator::{BuckMetrics, BuckSimulator, BuckSimulatorDescriptor};

use crate::{require_non_negative, require_positive, Error};

/// Decides whether the switch conducts at a given time.
pub trait Gate {
    fn is_on(&self, time: f64) -> bool;
}

/// Circuit values of the buck converter.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BuckParameters {
    /// Input voltage [V].
    pub vin: f64,
    /// Desired output voltage [V]; must be below `vin`.
    pub vout: f64,
    /// Output current at the desired voltage [A].
    pub iout: f64,
    /// Switching frequency [Hz].
    pub switching_frequency: f64,
    /// Filter inductance [H].
    pub inductance: f64,
    /// Output capacitance [F].
    pub capacitance: f64,
    /// Equivalent series resistance of the output capacitor [Ω].
    pub esr: f64,
}

impl Default for BuckParameters {
    fn default() -> Self {
        Self {
            vin: 36.0,
            vout: 12.0,
            iout: 2.0,
            switching_frequency: 50e3,
            inductance: 220e-6,
            capacitance: 47e-6,
            esr: 0.01,
        }
    }
}

impl BuckParameters {
    /// Checks that the circuit can be simulated.
    pub fn validate(&self) -> Result<(), Error> {
        require_positive("vin", self.vin)?;
        require_positive("vout", self.vout)?;
        require_positive("iout", self.iout)?;
        require_positive("switching_frequency", self.switching_frequency)?;
        require_positive("inductance", self.inductance)?;
        require_positive("capacitance", self.capacitance)?;
        require_non_negative("esr", self.esr)?;
        if self.vin <= self.vout {
            return Err(Error::invalid(
                "vout",
                self.vout,
                "must be below vin for a duty cycle inside (0, 1)",
            ));
        }
        Ok(())
    }

    /// `vout / vin`.
    #[inline]
    pub fn duty_cycle(&self) -> f64 {
        self.vout / self.vin
    }

    /// The resistive load drawing `iout` at `vout`.
    #[inline]
    pub fn load_resistance(&self) -> f64 {
        self.vout / self.iout
    }

    #[inline]
    pub fn switching_period(&self) -> f64 {
        self.switching_frequency.recip()
    }
}
