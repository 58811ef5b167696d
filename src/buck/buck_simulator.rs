use crate::buck::pwm::PwmGate;
use crate::buck::{BuckParameters, Gate};
use crate::metrics::{self, SteadyStateMetrics, SteadyWindow};
use crate::simulation::checked_sample_count;
use crate::{Error, RunDescriptor, Signal, SimulationTrace, Simulator};

/// Fewest Euler steps allowed per switching period.
pub const MIN_STEPS_PER_PERIOD: usize = 100;

/// Describes the composition of a `BuckSimulator`.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BuckSimulatorDescriptor {
    pub params: BuckParameters,
    /// Euler steps per switching period.
    pub steps_per_period: usize,
    /// Simulated time [s].
    pub horizon: f64,
    /// Trailing fraction of the samples treated as steady state.
    pub steady_fraction: f64,
}

impl Default for BuckSimulatorDescriptor {
    fn default() -> Self {
        Self {
            params: BuckParameters::default(),
            steps_per_period: 200,
            horizon: 5e-3,
            steady_fraction: 0.1,
        }
    }
}

/// Steady-state figures of a buck converter run.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BuckMetrics {
    pub duty_cycle: f64,
    /// [Ω]
    pub load_resistance: f64,
    /// Output voltage over the steady window.
    pub output: SteadyStateMetrics,
    /// Mean inductor current over the steady window [A].
    pub current_mean: f64,
    /// Peak-to-peak inductor current over the whole run, start-up included [A].
    pub current_ripple_full: f64,
    /// Peak-to-peak inductor current over the steady window [A].
    pub current_ripple_steady: f64,
}

/// Advances the converter with explicit Euler steps.
#[derive(Clone, Debug)]
pub struct BuckSimulator {
    params: BuckParameters,
    gate: PwmGate,
    steps_per_period: usize,
    nsamples: usize,
    steady_fraction: f64,
}

impl BuckSimulator {
    /// Validates the descriptor and creates a new `BuckSimulator`.
    pub fn new(desc: BuckSimulatorDescriptor) -> Result<Self, Error> {
        desc.params.validate()?;
        if desc.steps_per_period < MIN_STEPS_PER_PERIOD {
            return Err(Error::invalid(
                "steps_per_period",
                desc.steps_per_period as f64,
                "need at least 100 steps per switching period",
            ));
        }
        crate::require_positive("horizon", desc.horizon)?;
        if !(desc.steady_fraction > 0.0 && desc.steady_fraction <= 1.0) {
            return Err(Error::invalid(
                "steady_fraction",
                desc.steady_fraction,
                "must lie in (0, 1]",
            ));
        }
        let delta_t = (desc.params.switching_frequency * desc.steps_per_period as f64).recip();
        let nsamples = checked_sample_count("horizon", (desc.horizon / delta_t).ceil())?.max(1);

        Ok(Self {
            params: desc.params,
            gate: PwmGate::from_params(&desc.params),
            steps_per_period: desc.steps_per_period,
            nsamples,
            steady_fraction: desc.steady_fraction,
        })
    }

    #[inline]
    pub fn params(&self) -> &BuckParameters {
        &self.params
    }

    #[inline]
    pub fn duty_cycle(&self) -> f64 {
        self.gate.duty_cycle
    }

    /// The fixed integration step.
    #[inline]
    pub fn delta_t(&self) -> f64 {
        (self.params.switching_frequency * self.steps_per_period as f64).recip()
    }

    /// Number of samples in a trace, the start included.
    #[inline]
    pub fn nsamples(&self) -> usize {
        self.nsamples
    }

    /// The part of a trace treated as steady state.
    pub fn steady_window(&self) -> SteadyWindow {
        SteadyWindow::SkipFraction(1.0 - self.steady_fraction)
    }
}

impl Simulator for BuckSimulator {
    type Metrics = BuckMetrics;

    fn simulate(&self, desc: &RunDescriptor) -> Result<SimulationTrace, Error> {
        let _span = tracing::debug_span!("buck").entered();
        let dt = self.delta_t();
        let nsamples = self.nsamples();
        tracing::debug!(nsamples, delta_t = dt, duty_cycle = self.gate.duty_cycle, "stepping buck converter");

        let p = &self.params;
        let r_load = p.load_resistance();
        let mut trace = SimulationTrace::zeros(nsamples);
        {
            let mut first = trace.sample_mut(0);
            first[Signal::Source.column()] = p.vin;
            if self.gate.is_on(0.0) {
                first[Signal::Switched.column()] = p.vin;
            }
        }

        let bar = desc.progress_bar(nsamples - 1);
        let mut i_l = 0.0;
        let mut v_c = 0.0;
        for index in 1..nsamples {
            let t = (index as f64) * dt;
            let on = self.gate.is_on(t);

            // the previous capacitor voltage drives this step's inductor voltage
            let v_l = if on { p.vin - v_c } else { -v_c };
            i_l += (v_l / p.inductance) * dt;
            let i_c = i_l - v_c / r_load;
            v_c += (i_c / p.capacitance) * dt;
            let v_out = v_c + i_c * p.esr;

            let mut sample = trace.sample_mut(index);
            sample[Signal::Time.column()] = t;
            sample[Signal::Source.column()] = p.vin;
            sample[Signal::Switched.column()] = if on { p.vin } else { 0.0 };
            sample[Signal::InductorCurrent.column()] = i_l;
            sample[Signal::LoadVoltage.column()] = v_out;
            sample[Signal::InductorVoltage.column()] = v_l;
            sample[Signal::CapacitorVoltage.column()] = v_c;
            sample[Signal::CapacitorCurrent.column()] = i_c;

            if let Some(ref bar) = bar {
                bar.inc(1)
            }
        }
        if let Some(ref bar) = bar {
            bar.finish();
        }

        trace.check_finite()
    }

    fn steady_state_metrics(&self, trace: &SimulationTrace) -> Result<BuckMetrics, Error> {
        let range = self.steady_window().range(trace)?;
        let output = metrics::window(trace.signal(Signal::LoadVoltage), range.clone())?;
        let current = metrics::window(trace.signal(Signal::InductorCurrent), range)?;

        let result = BuckMetrics {
            duty_cycle: self.gate.duty_cycle,
            load_resistance: self.params.load_resistance(),
            output: SteadyStateMetrics::from_window(output)?,
            current_mean: metrics::mean(current.view()),
            current_ripple_full: metrics::peak_to_peak(trace.signal(Signal::InductorCurrent)),
            current_ripple_steady: metrics::peak_to_peak(current),
        };
        tracing::info!(
            output_mean = result.output.mean,
            output_ripple = result.output.ripple,
            current_ripple = result.current_ripple_full,
            "buck steady state"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_grid() {
        let sim = BuckSimulator::new(BuckSimulatorDescriptor::default()).unwrap();
        assert_relative_eq!(sim.delta_t(), 1e-7, max_relative = 1e-12);
        assert_eq!(sim.nsamples(), 50_000);
        assert_eq!(sim.steady_window(), SteadyWindow::SkipFraction(0.9));
    }

    #[test]
    fn test_first_steps_follow_euler_update() {
        let sim = BuckSimulator::new(BuckSimulatorDescriptor {
            horizon: 3e-7,
            ..Default::default()
        })
        .unwrap();
        let trace = sim.simulate(&RunDescriptor::default()).unwrap();
        let p = BuckParameters::default();
        let dt = sim.delta_t();

        assert_eq!(trace.len(), 3);
        assert_eq!(trace.signal(Signal::InductorCurrent)[0], 0.0);
        assert_eq!(trace.signal(Signal::LoadVoltage)[0], 0.0);

        // step 1: switch on, capacitor still at rest
        let i_l1 = p.vin / p.inductance * dt;
        let v_c1 = i_l1 / p.capacitance * dt;
        assert_eq!(trace.signal(Signal::InductorVoltage)[1], p.vin);
        assert_eq!(trace.signal(Signal::InductorCurrent)[1], i_l1);
        assert_eq!(trace.signal(Signal::CapacitorCurrent)[1], i_l1);
        assert_eq!(trace.signal(Signal::CapacitorVoltage)[1], v_c1);
        assert_eq!(trace.signal(Signal::LoadVoltage)[1], v_c1 + i_l1 * p.esr);

        // step 2 uses the capacitor voltage from step 1
        assert_eq!(trace.signal(Signal::InductorVoltage)[2], p.vin - v_c1);
    }

    #[test]
    fn test_switch_node_follows_gate() {
        let sim = BuckSimulator::new(BuckSimulatorDescriptor {
            horizon: 4.0 / 50e3,
            ..Default::default()
        })
        .unwrap();
        let trace = sim.simulate(&RunDescriptor::default()).unwrap();
        let switched = trace.signal(Signal::Switched);
        let on = switched.iter().filter(|&&v| v > 0.0).count();

        // four periods at one third duty
        let expected = (4.0 * 200.0 / 3.0) as usize;
        assert!((on as i64 - expected as i64).abs() <= 4, "on = {}", on);
        assert!(trace.signal(Signal::Source).iter().all(|&v| v == 36.0));
    }

    #[test]
    fn test_rejects_coarse_steps() {
        let desc = BuckSimulatorDescriptor { steps_per_period: 50, ..Default::default() };
        assert!(BuckSimulator::new(desc).is_err());
    }

    #[test]
    fn test_rejects_bad_run_shape() {
        let no_time = BuckSimulatorDescriptor { horizon: 0.0, ..Default::default() };
        assert!(BuckSimulator::new(no_time).is_err());
        let no_window = BuckSimulatorDescriptor { steady_fraction: 0.0, ..Default::default() };
        assert!(BuckSimulator::new(no_window).is_err());
    }

    #[test]
    fn test_rejects_oversized_horizon() {
        for horizon in [1e13, f64::MAX] {
            let desc = BuckSimulatorDescriptor { horizon, ..Default::default() };
            let err = BuckSimulator::new(desc).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::InvalidParameter);
        }

        // a long run under the limit is still accepted; nothing is allocated until simulate
        let fits = BuckSimulatorDescriptor { horizon: 0.5, ..Default::default() };
        assert_eq!(BuckSimulator::new(fits).unwrap().nsamples(), 5_000_000);
    }
}
