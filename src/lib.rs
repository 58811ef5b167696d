//! A framework for simulating power electronics circuits in the time domain.
//!
//! Two topologies are provided: a diode rectifier feeding a series-RL,
//! parallel-RC filter ([`rectifier`]) and a PWM-driven buck converter
//! ([`buck`]). Both produce a [`SimulationTrace`] which [`metrics`] reduces to
//! steady-state figures. To get started, refer to the `demos` directory.

mod simulation;

pub mod buck;
pub mod metrics;
pub mod ode;
pub mod prelude;
pub mod rectifier;

pub use simulation::{RunDescriptor, Signal, SimulationTrace, TableSettings, MAX_SAMPLES};

/// Represents an error in the simulation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid parameter {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Simulation became numerically unstable \
        ( {signal} = {value} at t = {time} s )")]
    NumericalInstability {
        signal: &'static str,
        time: f64,
        value: f64,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The class of an [`Error`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    InvalidParameter,
    NumericalInstability,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Error::NumericalInstability { .. } => ErrorKind::NumericalInstability,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Error::InvalidParameter { name, value, reason }
    }
}

/// Rejects `value` unless it is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(name, value, "must be strictly positive"))
    }
}

/// Rejects `value` unless it is finite and not negative.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(name, value, "must not be negative"))
    }
}

/// Runs a circuit and reduces its output.
pub trait Simulator {
    /// The steady-state figures derived from a trace.
    type Metrics;

    /// Integrates the circuit over its configured time grid.
    ///
    /// Every call allocates a fresh trace; nothing carries over between runs.
    fn simulate(&self, desc: &RunDescriptor) -> Result<SimulationTrace, Error>;

    /// Reduces the steady-state tail of `trace` to scalar figures.
    fn steady_state_metrics(&self, trace: &SimulationTrace) -> Result<Self::Metrics, Error>;
}
