//! Circuit components.

mod diode_pair;
mod sine_source;

pub use diode_pair::DiodePair;
pub use sine_source::SineSource;
