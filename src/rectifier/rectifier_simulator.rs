use nalgebra::Vector2;

use crate::metrics::{self, SteadyStateMetrics, SteadyWindow};
use crate::ode::rk4_trajectory;
use crate::rectifier::components::{DiodePair, SineSource};
use crate::rectifier::frequency_response::{self, FrequencyResponse, SweepDescriptor};
use crate::rectifier::{Rectifier, RectifierParameters, Source};
use crate::simulation::checked_sample_count;
use crate::{Error, RunDescriptor, Signal, SimulationTrace, Simulator};

/// Describes the composition of a `RectifierSimulator`.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectifierSimulatorDescriptor {
    pub params: RectifierParameters,
    /// How many source periods to simulate.
    pub cycles: usize,
    /// Number of time samples, both ends of the run included.
    pub samples: usize,
    /// Source periods discarded as start-up transient before taking metrics.
    pub transient_periods: f64,
}

impl Default for RectifierSimulatorDescriptor {
    fn default() -> Self {
        Self {
            params: RectifierParameters::default(),
            cycles: 10,
            samples: 10_000,
            transient_periods: 2.0,
        }
    }
}

/// Steady-state figures of a rectifier run.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectifierMetrics {
    /// Peak source voltage [V].
    pub peak_voltage: f64,
    /// Mean of the voltage at the filter input [V].
    pub rectified_mean: f64,
    /// Mean inductor current [A].
    pub current_mean: f64,
    /// The load voltage over the steady window.
    pub load: SteadyStateMetrics,
    /// Resonant frequency of the LC filter [Hz].
    pub cutoff_frequency: f64,
}

/// Integrates the rectifier filter with a fixed step RK4 on the sample grid.
#[derive(Clone, Debug)]
pub struct RectifierSimulator {
    params: RectifierParameters,
    source: SineSource,
    diodes: DiodePair,
    cycles: usize,
    samples: usize,
    transient_periods: f64,
}

impl RectifierSimulator {
    /// Validates the descriptor and creates a new `RectifierSimulator`.
    pub fn new(desc: RectifierSimulatorDescriptor) -> Result<Self, Error> {
        desc.params.validate()?;
        if desc.cycles == 0 {
            return Err(Error::invalid("cycles", 0.0, "must simulate at least one period"));
        }
        if desc.samples < 2 {
            return Err(Error::invalid("samples", desc.samples as f64, "need at least 2 samples"));
        }
        checked_sample_count("samples", desc.samples as f64)?;
        crate::require_non_negative("transient_periods", desc.transient_periods)?;

        Ok(Self {
            params: desc.params,
            source: SineSource::from_params(&desc.params),
            diodes: DiodePair::from_params(&desc.params),
            cycles: desc.cycles,
            samples: desc.samples,
            transient_periods: desc.transient_periods,
        })
    }

    #[inline]
    pub fn params(&self) -> &RectifierParameters {
        &self.params
    }

    /// The total simulated time.
    #[inline]
    pub fn duration(&self) -> f64 {
        (self.cycles as f64) * self.params.period()
    }

    /// The part of a trace treated as steady state.
    pub fn steady_window(&self) -> SteadyWindow {
        SteadyWindow::SkipDuration(self.transient_periods * self.params.period())
    }

    /// Sweeps the LC filter's small-signal response.
    pub fn frequency_response(&self, sweep: &SweepDescriptor) -> Result<FrequencyResponse, Error> {
        frequency_response::frequency_response(&self.params, sweep)
    }

    /// `[d(i_L)/dt, d(v_C)/dt]` for state `x = [i_L, v_C]`.
    fn dynamics(&self, t: f64, x: Vector2<f64>) -> Vector2<f64> {
        let v_rect = self.diodes.rectify(self.source.generate(t));
        let (i_l, v_c) = (x[0], x[1]);

        Vector2::new(
            (v_rect - v_c) / self.params.inductance,
            (i_l - v_c / self.params.resistance) / self.params.capacitance,
        )
    }
}

impl Simulator for RectifierSimulator {
    type Metrics = RectifierMetrics;

    fn simulate(&self, desc: &RunDescriptor) -> Result<SimulationTrace, Error> {
        let _span = tracing::debug_span!("rectifier").entered();
        let times = ndarray::Array1::linspace(0.0, self.duration(), self.samples);
        tracing::debug!(
            samples = self.samples,
            delta_t = self.duration() / ((self.samples - 1) as f64),
            "integrating rectifier filter"
        );

        let bar = desc.progress_bar(self.samples - 1);
        let states = rk4_trajectory(
            times.view(),
            Vector2::zeros(),
            &|t: f64, x: Vector2<f64>| self.dynamics(t, x),
            &bar,
        );
        if let Some(ref bar) = bar {
            bar.finish();
        }

        let mut trace = SimulationTrace::zeros(self.samples);
        for (index, (&t, x)) in times.iter().zip(states.iter()).enumerate() {
            let source = self.source.generate(t);
            let v_rect = self.diodes.rectify(source);
            let (i_l, v_c) = (x[0], x[1]);

            let mut sample = trace.sample_mut(index);
            sample[Signal::Time.column()] = t;
            sample[Signal::Source.column()] = source;
            sample[Signal::Switched.column()] = v_rect;
            sample[Signal::InductorCurrent.column()] = i_l;
            sample[Signal::LoadVoltage.column()] = v_c;
            sample[Signal::InductorVoltage.column()] = v_rect - v_c;
            sample[Signal::CapacitorVoltage.column()] = v_c;
            sample[Signal::CapacitorCurrent.column()] = i_l - v_c / self.params.resistance;
        }

        trace.check_finite()
    }

    fn steady_state_metrics(&self, trace: &SimulationTrace) -> Result<RectifierMetrics, Error> {
        let range = self.steady_window().range(trace)?;
        let rectified = metrics::window(trace.signal(Signal::Switched), range.clone())?;
        let current = metrics::window(trace.signal(Signal::InductorCurrent), range.clone())?;
        let load = metrics::window(trace.signal(Signal::LoadVoltage), range)?;

        let result = RectifierMetrics {
            peak_voltage: self.params.peak_voltage(),
            rectified_mean: metrics::mean(rectified),
            current_mean: metrics::mean(current),
            load: SteadyStateMetrics::from_window(load)?,
            cutoff_frequency: self.params.cutoff_frequency(),
        };
        tracing::info!(
            load_mean = result.load.mean,
            ripple = result.load.ripple,
            ripple_factor = result.load.ripple_factor,
            "rectifier steady state"
        );

        Ok(result)
    }
}
