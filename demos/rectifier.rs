use pesim::prelude::*;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let params = RectifierParameters {
        vrms: 36.0,          // [V]
        frequency: 60.0,     // [Hz]
        resistance: 10.0,    // [Ω]
        inductance: 1.0,     // [H]
        capacitance: 1e-3,   // [F]
        diode_drop: 0.3,     // [V] schottky
        freewheel_drop: 0.7, // [V]
    };

    let sim = RectifierSimulator::new(RectifierSimulatorDescriptor {
        params,
        ..Default::default()
    })?;

    let trace = sim.simulate(&RunDescriptor { verbose: true })?;
    let metrics = sim.steady_state_metrics(&trace)?;
    let response = sim.frequency_response(&SweepDescriptor::default())?;

    println!(
        "\n-- Rectifier Steady State --\n\
        Peak voltage:      {:>9.2} V\n\
        Rectified mean:    {:>9.2} V\n\
        Load mean:         {:>9.2} V\n\
        Load current:      {:>9.4} A\n\
        Ripple:            {:>9.4} V\n\
        Ripple factor:     {:>9.4}\n\
        Cutoff frequency:  {:>9.2} Hz\n",
        metrics.peak_voltage,
        metrics.rectified_mean,
        metrics.load.mean,
        metrics.current_mean,
        metrics.load.ripple,
        metrics.load.ripple_factor,
        metrics.cutoff_frequency,
    );

    println!("-- Filter Response --");
    for point in response.points.iter().step_by(50) {
        println!(
            "{:>12.2} Hz  {:>9.2} dB  {:>8.2} deg",
            point.frequency, point.magnitude_db, point.phase_deg,
        );
    }

    // dump the waveforms for plotting
    trace.write_table(std::io::stdout().lock(), &TableSettings::default())?;

    Ok(())
}
