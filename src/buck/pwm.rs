use crate::buck::{BuckParameters, Gate};

/// Ideal pulse width modulation reconstructed from absolute time.
///
/// The switch is on for the first `duty_cycle` fraction of every period. No
/// phase is accumulated between calls, so there is no drift over long runs.
#[derive(Copy, Clone, Debug)]
pub struct PwmGate {
    pub frequency: f64,
    pub duty_cycle: f64,
}

impl PwmGate {
    pub fn from_params(params: &BuckParameters) -> Self {
        Self {
            frequency: params.switching_frequency,
            duty_cycle: params.duty_cycle(),
        }
    }
}

impl Gate for PwmGate {
    #[inline]
    fn is_on(&self, time: f64) -> bool {
        (time * self.frequency).rem_euclid(1.0) < self.duty_cycle
    }
}
