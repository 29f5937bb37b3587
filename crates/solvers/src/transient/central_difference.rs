//! Explicit central difference solver for hysteretic SDOF systems.
//!
//! Integrates `M·a + C·v + R(x) = F(t)` with the velocity form of the
//! central difference scheme:
//!
//! ```text
//! v_{i} = v_{i-1} + a_{i-1} * dt
//! x_{i} = x_{i-1} + v_{i} * dt
//! a_{i} = (F(t_i) - C * v_{i} - R(x_{i})) / M
//! ```
//!
//! Mass, stiffness and damping are those of the region active after the
//! hysteresis update of each step. The run stops at the step horizon, at
//! component failure, or when the observer asks.
//!
//! # Example
//!
//! ```ignore
//! use ductile_solvers::transient::central_difference;
//!
//! let solution = central_difference::solve_unobserved(&parameters)?;
//!
//! for sample in solution.series.iter() {
//!     println!("t={}: x={} R={}", sample.time, sample.displacement, sample.resistance);
//! }
//! ```

mod action;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Sample, Solution, Status, TimeSeries};

use ductile_components::{
    SdofParameters,
    hysteresis::{
        CollapseToFirst, Decision, Hysteresis, HysteresisState, Kinematics, OnResume, Region,
        RetreatRule, ShiftTiming,
    },
};
use ductile_core::Observer;
use log::info;

/// Integrates the response of the system described by `parameters`.
///
/// # Algorithm
///
/// 1. Build the initial sample: zero displacement, the configured initial
///    velocity, and the acceleration balancing the load at `t = 0`.
/// 2. For each step:
///    - Update velocity from the previous acceleration, then displacement.
///    - Run the hysteresis update for the new displacement.
///    - Evaluate the load at the step time.
///    - Compute acceleration from the active region's mass and damping.
///    - Emit an [`Event`] to the observer.
///    - If the component failed, terminate with [`Status::Failed`].
///    - If the observer returns `StopEarly`, terminate.
/// 3. Return the solution with the full response history.
///
/// # Errors
///
/// Returns an error if the load history cannot be evaluated or the
/// hysteresis state rejects an update.
pub fn solve<Obs>(parameters: &SdofParameters, observer: Obs) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    solve_with(parameters, CollapseToFirst, OnResume, observer)
}

/// Integrates without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// Returns an error if the load history cannot be evaluated or the
/// hysteresis state rejects an update.
pub fn solve_unobserved(parameters: &SdofParameters) -> Result<Solution, Error> {
    solve(parameters, ())
}

/// Integrates using `retreat` to decide how the component unloads and
/// `timing` to decide when its permanent set shifts the region bounds.
///
/// # Errors
///
/// Returns an error if the load history cannot be evaluated or the
/// hysteresis state rejects an update.
pub fn solve_with<R, T, Obs>(
    parameters: &SdofParameters,
    retreat: R,
    timing: T,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    R: RetreatRule,
    T: ShiftTiming,
    Obs: Observer<Event, Action>,
{
    let dt = parameters.time_step();
    let steps = parameters.step_count();
    let mut hysteresis = Hysteresis::with_rules(parameters, retreat, timing);
    let mut series = TimeSeries::with_capacity(steps + 1);

    // Initial state.
    let region = hysteresis.state().region();
    let load = load_at(parameters, 0.0)?;
    let velocity = parameters.initial_velocity();
    let initial = Sample {
        time: 0.0,
        displacement: 0.0,
        velocity,
        acceleration: acceleration(parameters, region, load, velocity, 0.0),
        resistance: 0.0,
        load,
        region: region.signed(),
    };
    series.push(initial);

    let event = Event {
        step: 0,
        sample: initial,
        decision: Decision::Stay,
        bounds_shifted: false,
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        return Ok(finish(Status::StoppedByObserver, series, 0, hysteresis.state()));
    }

    let mut current = initial;

    for step in 1..=steps {
        #[allow(clippy::cast_precision_loss)]
        let time = step as f64 * dt;

        let velocity = current.velocity + current.acceleration * dt;
        let displacement = current.displacement + velocity * dt;

        let update = hysteresis.update(Kinematics {
            step,
            displacement,
            previous: current.displacement,
            velocity,
        })?;

        let load = load_at(parameters, time)?;
        let sample = Sample {
            time,
            displacement,
            velocity,
            acceleration: acceleration(parameters, update.region, load, velocity, update.resistance),
            resistance: update.resistance,
            load,
            region: update.region.signed(),
        };
        series.push(sample);

        let event = Event {
            step,
            sample,
            decision: update.decision,
            bounds_shifted: update.bounds_shifted,
        };
        let action = observer.observe(&event);

        if let Some(&failure) = hysteresis.state().failure() {
            info!("run ended by component failure at t = {time} after {step} steps");
            return Ok(finish(
                Status::Failed(failure),
                series,
                step,
                hysteresis.state(),
            ));
        }
        if let Some(Action::StopEarly) = action {
            return Ok(finish(
                Status::StoppedByObserver,
                series,
                step,
                hysteresis.state(),
            ));
        }

        current = sample;
    }

    info!(
        "run completed {steps} steps, permanent set {}",
        hysteresis.state().permanent_set()
    );
    Ok(finish(Status::Complete, series, steps, hysteresis.state()))
}

fn load_at(parameters: &SdofParameters, time: f64) -> Result<f64, Error> {
    parameters
        .load_at(time)
        .map_err(|source| Error::Load { time, source })
}

/// Solves the equation of motion for acceleration in `region`.
fn acceleration(
    parameters: &SdofParameters,
    region: Region,
    load: f64,
    velocity: f64,
    resistance: f64,
) -> f64 {
    let damping = parameters.damping_coefficient(region);
    (load - damping * velocity - resistance) / parameters.mass(region)
}

fn finish(status: Status, series: TimeSeries, steps: usize, state: &HysteresisState) -> Solution {
    Solution {
        status,
        series,
        steps,
        plastic_deformation: state.plastic_deformation(),
        permanent_set: state.permanent_set(),
        max_region_inbound: state.max_region_inbound(),
        max_region_rebound: state.max_region_rebound(),
    }
}
