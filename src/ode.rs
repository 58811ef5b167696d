//! Fixed-step explicit ODE integration for small circuit state vectors.

use nalgebra::SVector;

/// A circuit state of `N` variables, e.g. `[i_L, v_C]`.
pub type State<const N: usize> = SVector<f64, N>;

/// Advances `x` from `t` to `t + dt` with one classic Runge-Kutta step.
pub fn rk4_step<F, const N: usize>(dynamics: &F, t: f64, dt: f64, x: State<N>) -> State<N>
where
    F: Fn(f64, State<N>) -> State<N>,
{
    let half = 0.5 * dt;
    let slope_start = dynamics(t, x);
    let slope_mid_a = dynamics(t + half, x + slope_start * half);
    let slope_mid_b = dynamics(t + half, x + slope_mid_a * half);
    let slope_end = dynamics(t + dt, x + slope_mid_b * dt);

    let weighted = slope_start + (slope_mid_a + slope_mid_b) * 2.0 + slope_end;
    x + weighted * (dt / 6.0)
}

/// Integrates `dynamics` over `times`, returning the state at every grid point.
///
/// The first entry is `x0` at `times[0]`; each following entry is one RK4 step
/// from its predecessor, so the grid need not be uniform.
pub fn rk4_trajectory<F, const N: usize>(
    times: ndarray::ArrayView1<f64>,
    x0: State<N>,
    dynamics: &F,
    bar: &Option<indicatif::ProgressBar>,
) -> Vec<State<N>>
where
    F: Fn(f64, State<N>) -> State<N>,
{
    let mut states = Vec::with_capacity(times.len());
    if times.is_empty() {
        return states;
    }
    states.push(x0);
    for window in times.windows(2) {
        let (t, t_next) = (window[0], window[1]);
        let x = rk4_step(dynamics, t, t_next - t, states[states.len() - 1]);
        states.push(x);

        if let Some(ref bar) = bar {
            bar.inc(1)
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Vector1, Vector2, Vector3};

    // Series RC driven by a step: v' = (V - v) / (RC), tracked alongside i = (V - v) / R.
    fn rc_charging(v_step: f64, r: f64, c: f64) -> impl Fn(f64, Vector2<f64>) -> Vector2<f64> {
        move |_t, x| {
            let dv = (v_step - x[0]) / (r * c);
            Vector2::new(dv, -dv / r)
        }
    }

    #[test]
    fn test_rc_charging_analytic_soln() {
        let (v_step, r, c) = (5.0, 1e3, 1e-6);
        let tau = r * c;
        let n_steps = 500;
        let times = ndarray::Array1::linspace(0.0, 5.0 * tau, n_steps + 1);

        let states = rk4_trajectory(
            times.view(),
            Vector2::new(0.0, v_step / r),
            &rc_charging(v_step, r, c),
            &None,
        );

        assert_eq!(states.len(), n_steps + 1);
        for (t, x) in times.iter().zip(states.iter()) {
            let v = v_step * (1.0 - (-t / tau).exp());
            assert_relative_eq!(x[0], v, epsilon = 1e-6);
            assert_relative_eq!(x[1], (v_step - v) / r, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_lc_tank_conserves_energy() {
        // i' = -v / L, v' = i / C
        let (l, c) = (1e-3, 1e-6);
        let dynamics = |_t: f64, x: Vector2<f64>| Vector2::new(-x[1] / l, x[0] / c);
        let period = 2.0 * std::f64::consts::PI * (l * c).sqrt();
        let times = ndarray::Array1::linspace(0.0, 3.0 * period, 3001);

        let states = rk4_trajectory(times.view(), Vector2::new(0.0, 1.0), &dynamics, &None);

        let energy = |x: &Vector2<f64>| 0.5 * l * x[0] * x[0] + 0.5 * c * x[1] * x[1];
        let e0 = energy(&states[0]);
        let last = states.last().unwrap();
        assert_relative_eq!(energy(last), e0, max_relative = 1e-6);
        // three whole periods brings the capacitor back to its start
        assert_relative_eq!(last[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_single_state_decay() {
        // RC discharge, v' = -v / tau; RK4 error per step is O(h^5)
        let tau = 1e-3;
        let dynamics = |_t: f64, x: Vector1<f64>| -x / tau;
        let times = ndarray::Array1::linspace(0.0, tau, 101);

        let states = rk4_trajectory(times.view(), Vector1::new(2.0), &dynamics, &None);
        assert_relative_eq!(states[100][0], 2.0 * (-1.0f64).exp(), max_relative = 1e-9);
    }

    #[test]
    fn test_step_with_time_dependent_input() {
        // x' = [1, 2t, 3t^2] is integrated exactly by one RK4 step
        let dynamics = |t: f64, _x: Vector3<f64>| Vector3::new(1.0, 2.0 * t, 3.0 * t * t);
        let x = rk4_step(&dynamics, 1.0, 0.5, Vector3::zeros());
        assert_relative_eq!(x, Vector3::new(0.5, 1.25, 2.375), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_grid() {
        let times = ndarray::Array1::<f64>::zeros(0);
        let dynamics = |_t: f64, x: Vector2<f64>| x;
        assert!(rk4_trajectory(times.view(), Vector2::zeros(), &dynamics, &None).is_empty());
    }
}
