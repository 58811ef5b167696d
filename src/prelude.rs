//! Includes commonly used library components.

pub use crate::{
    Error,
    ErrorKind,
    RunDescriptor,
    Signal,
    SimulationTrace,
    Simulator,
    TableSettings,
};
pub use crate::buck::{BuckMetrics, BuckParameters, BuckSimulator, BuckSimulatorDescriptor};
pub use crate::metrics::{SteadyStateMetrics, SteadyWindow};
pub use crate::rectifier::{
    RectifierMetrics,
    RectifierParameters,
    RectifierSimulator,
    RectifierSimulatorDescriptor,
};
pub use crate::rectifier::frequency_response::{FrequencyResponse, SweepDescriptor};
