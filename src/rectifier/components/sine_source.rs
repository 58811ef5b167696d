use crate::rectifier::{RectifierParameters, Source};

/// A simple sinusoidal voltage source.
#[derive(Copy, Clone, Debug)]
pub struct SineSource {
    pub peak: f64,
    pub angular_frequency: f64,
}

impl SineSource {
    pub fn from_params(params: &RectifierParameters) -> Self {
        Self {
            peak: params.peak_voltage(),
            angular_frequency: params.angular_frequency(),
        }
    }
}

impl Source for SineSource {
    #[inline]
    fn generate(&self, time: f64) -> f64 {
        self.peak * f64::sin(self.angular_frequency * time)
    }
}
