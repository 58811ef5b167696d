use crate::rectifier::{Rectifier, RectifierParameters};

/// A conducting diode plus a freewheeling diode, each a constant forward drop.
#[derive(Copy, Clone, Debug)]
pub struct DiodePair {
    /// Drop across the rectifying diode while it conducts.
    pub forward_drop: f64,
    /// Drop across the freewheeling diode while the source is reverse biased.
    pub freewheel_drop: f64,
}

impl DiodePair {
    pub fn from_params(params: &RectifierParameters) -> Self {
        Self {
            forward_drop: params.diode_drop,
            freewheel_drop: params.freewheel_drop,
        }
    }
}

impl Rectifier for DiodePair {
    #[inline]
    fn rectify(&self, source_voltage: f64) -> f64 {
        // conduction is decided by the instantaneous voltage alone
        if source_voltage > self.forward_drop {
            source_voltage - self.forward_drop
        } else {
            -self.freewheel_drop
        }
    }
}
