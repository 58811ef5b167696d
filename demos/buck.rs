use pesim::prelude::*;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let params = BuckParameters {
        vin: 36.0,                   // [V]
        vout: 12.0,                  // [V]
        iout: 2.0,                   // [A]
        switching_frequency: 50e3,   // [Hz]
        inductance: 220e-6,          // [H]
        capacitance: 47e-6,          // [F]
        esr: 0.01,                   // [Ω]
    };

    let sim = BuckSimulator::new(BuckSimulatorDescriptor {
        params,
        ..Default::default()
    })?;

    println!(
        "\n-- General Simulation Info --\n\
        Duty cycle:   {:.3}\n\
        Load:         {:.1} Ω\n\
        Δt:           {:<9.2e} s\n\
        # of samples: {}\n",
        sim.duty_cycle(),
        params.load_resistance(),
        sim.delta_t(),
        sim.nsamples(),
    );

    let trace = sim.simulate(&RunDescriptor { verbose: true })?;
    let metrics = sim.steady_state_metrics(&trace)?;

    println!(
        "\n-- Final Results --\n\
        Mean load voltage:          {:.3} V\n\
        Load voltage ripple:        {:.3} V\n\
        Inductor current ripple:    {:.3} A (whole run)\n\
        Inductor current ripple:    {:.3} A (steady state)\n",
        metrics.output.mean,
        metrics.output.ripple,
        metrics.current_ripple_full,
        metrics.current_ripple_steady,
    );

    Ok(())
}
