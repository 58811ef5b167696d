use std::io::Write;

use crate::Error;

/// Describes a simulation run.
#[derive(Copy, Clone, Debug, Default)]
pub struct RunDescriptor {
    /// Whether or not to show a progress bar while integrating.
    pub verbose: bool,
}

impl RunDescriptor {
    /// Creates a progress bar for `nsteps` integration steps, if verbose.
    pub(crate) fn progress_bar(&self, nsteps: usize) -> Option<indicatif::ProgressBar> {
        if self.verbose {
            println!("# of time steps: {}", nsteps);
            Some(indicatif::ProgressBar::new(nsteps as u64))
        } else {
            None
        }
    }
}

/// Largest number of samples a single trace may hold (about 640 MB of signals).
pub const MAX_SAMPLES: usize = 10_000_000;

/// Converts a requested sample count into a trace length no larger than [`MAX_SAMPLES`].
pub(crate) fn checked_sample_count(name: &'static str, count: f64) -> Result<usize, Error> {
    if !count.is_finite() || count < 0.0 || count > MAX_SAMPLES as f64 {
        return Err(Error::invalid(name, count, "trace would exceed the sample limit"));
    }
    Ok(count as usize)
}

/// The waveforms recorded at every sample of a trace.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Signal {
    /// Simulated time, in seconds.
    Time,
    /// The raw source voltage.
    Source,
    /// The voltage after the rectifying diode or the switch.
    Switched,
    /// The current through the filter inductor.
    InductorCurrent,
    /// The voltage across the load.
    LoadVoltage,
    /// The voltage across the filter inductor.
    InductorVoltage,
    /// The voltage across the ideal filter capacitor.
    CapacitorVoltage,
    /// The current into the filter capacitor.
    CapacitorCurrent,
}

impl Signal {
    pub const ALL: [Signal; 8] = [
        Signal::Time,
        Signal::Source,
        Signal::Switched,
        Signal::InductorCurrent,
        Signal::LoadVoltage,
        Signal::InductorVoltage,
        Signal::CapacitorVoltage,
        Signal::CapacitorCurrent,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    #[inline]
    pub(crate) fn column(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Signal::Time => "time",
            Signal::Source => "source",
            Signal::Switched => "switched",
            Signal::InductorCurrent => "inductor_current",
            Signal::LoadVoltage => "load_voltage",
            Signal::InductorVoltage => "inductor_voltage",
            Signal::CapacitorVoltage => "capacitor_voltage",
            Signal::CapacitorCurrent => "capacitor_current",
        }
    }
}

/// A uniformly sampled record of every circuit signal.
///
/// Each row is one time sample; each column is one [`Signal`]. A trace is
/// never modified after a simulator hands it out.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationTrace {
    data: ndarray::Array2<f64>,
}

impl SimulationTrace {
    /// Allocates a zeroed trace with `nsamples` rows.
    pub(crate) fn zeros(nsamples: usize) -> Self {
        Self {
            data: ndarray::Array2::<f64>::zeros((nsamples, Signal::COUNT)),
        }
    }

    /// Mutable view of a single sample.
    #[inline]
    pub(crate) fn sample_mut(&mut self, index: usize) -> ndarray::ArrayViewMut1<f64> {
        self.data.row_mut(index)
    }

    /// Checks every recorded value, returning the earliest non-finite one as an error.
    pub(crate) fn check_finite(self) -> Result<Self, Error> {
        for row in self.data.rows() {
            for signal in Signal::ALL {
                let value = row[signal.column()];
                if !value.is_finite() {
                    let time = row[Signal::Time.column()];
                    tracing::warn!(signal = signal.name(), time, value, "non-finite sample");
                    return Err(Error::NumericalInstability {
                        signal: signal.name(),
                        time,
                        value,
                    });
                }
            }
        }
        Ok(self)
    }

    /// The number of time samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The samples of a single signal, in time order.
    #[inline]
    pub fn signal(&self, signal: Signal) -> ndarray::ArrayView1<f64> {
        self.data.column(signal.column())
    }

    /// The sample times.
    #[inline]
    pub fn time(&self) -> ndarray::ArrayView1<f64> {
        self.signal(Signal::Time)
    }

    /// The spacing of the time grid, or zero for traces with fewer than two samples.
    pub fn time_step(&self) -> f64 {
        let time = self.time();
        if time.len() < 2 {
            0.0
        } else {
            time[1] - time[0]
        }
    }

    /// The full sample matrix, one row per sample, columns ordered as [`Signal::ALL`].
    pub fn as_array(&self) -> ndarray::ArrayView2<f64> {
        self.data.view()
    }

    /// Writes the time, source, switched and load columns as delimited text.
    pub fn write_table<W: Write>(&self, mut writer: W, settings: &TableSettings) -> Result<(), Error> {
        let columns = [Signal::Time, Signal::Source, Signal::Switched, Signal::LoadVoltage];
        let delimiter = settings.delimiter;
        let precision = settings.decimal_places.clamp(4, 6);

        let separator = delimiter.to_string();
        let header = columns.iter().map(|s| s.name()).collect::<Vec<_>>();
        writeln!(writer, "{}", header.join(separator.as_str()))?;

        for row in self.data.rows() {
            let mut first = true;
            for signal in columns {
                if !first {
                    write!(writer, "{}", delimiter)?;
                }
                first = false;
                write!(writer, "{:.*}", precision, row[signal.column()])?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// How a trace is laid out as delimited text.
#[derive(Copy, Clone, Debug)]
pub struct TableSettings {
    /// Separates the columns of each row.
    pub delimiter: char,
    /// Digits after the decimal point, clamped to `4..=6`.
    pub decimal_places: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_places: 6,
        }
    }
}
