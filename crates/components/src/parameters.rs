//! Run configuration and its validated, immutable form.

mod config;
mod error;

use std::f64::consts::PI;

pub use config::{RegionConfig, SdofConfig};
pub use error::ConfigError;

use crate::{
    hysteresis::{Region, RegionBounds},
    interpolation::{CurveInterpolator, InterpError},
};

/// Fraction of the shortest natural period the time step may not exceed.
const STABILITY_FRACTION: f64 = 0.1;

/// Relative slack applied when counting steps, so that round-off in
/// `total_time / time_step` does not add a spurious extra step.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// Validated parameters for a single SDOF run.
///
/// Parameters are immutable once built and can be shared across independent
/// runs. Build them from an [`SdofConfig`] with `try_into()`.
#[derive(Debug, Clone)]
pub struct SdofParameters {
    total_time: f64,
    time_step: f64,
    damping_ratio: f64,
    initial_velocity: f64,
    masses: Vec<f64>,
    stiffnesses: Vec<f64>,
    bounds: RegionBounds,
    load: CurveInterpolator,
}

impl SdofParameters {
    /// Returns the simulated duration.
    #[must_use]
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Returns the integration time step.
    #[must_use]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Returns the number of integration steps, `⌈total_time / time_step⌉`.
    #[must_use]
    pub fn step_count(&self) -> usize {
        step_count(self.total_time, self.time_step)
    }

    /// Returns the number of resistance regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.masses.len()
    }

    /// Returns the damping ratio as a percentage of critical damping.
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Returns the velocity at the start of the run.
    #[must_use]
    pub fn initial_velocity(&self) -> f64 {
        self.initial_velocity
    }

    /// Returns the per-region masses.
    #[must_use]
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Returns the per-region stiffnesses.
    #[must_use]
    pub fn stiffnesses(&self) -> &[f64] {
        &self.stiffnesses
    }

    /// Returns the mass of the given region.
    ///
    /// Both branches share the table, indexed by `|region| - 1`.
    #[must_use]
    pub fn mass(&self, region: Region) -> f64 {
        self.masses[region.index()]
    }

    /// Returns the stiffness of the given region.
    #[must_use]
    pub fn stiffness(&self, region: Region) -> f64 {
        self.stiffnesses[region.index()]
    }

    /// Returns the viscous damping coefficient for the given region.
    ///
    /// `C = ζ / 100 · 2 · √|k · M|`, using the region's own stiffness and mass.
    #[must_use]
    pub fn damping_coefficient(&self, region: Region) -> f64 {
        let k = self.stiffness(region);
        let m = self.mass(region);
        self.damping_ratio / 100.0 * 2.0 * (k * m).abs().sqrt()
    }

    /// Returns the undeformed region bounds.
    #[must_use]
    pub fn initial_bounds(&self) -> &RegionBounds {
        &self.bounds
    }

    /// Returns the displacement at which the first inbound region ends.
    #[must_use]
    pub fn yield_displacement(&self) -> f64 {
        self.bounds.inbound()[1]
    }

    /// Returns the shortest natural period over regions with positive stiffness.
    #[must_use]
    pub fn shortest_period(&self) -> f64 {
        shortest_period(&self.masses, &self.stiffnesses)
    }

    /// Returns the applied load history.
    #[must_use]
    pub fn load(&self) -> &CurveInterpolator {
        &self.load
    }

    /// Returns the applied load at time `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is outside the load history.
    pub fn load_at(&self, t: f64) -> Result<f64, InterpError> {
        self.load.interpolate(t)
    }
}

impl TryFrom<SdofConfig> for SdofParameters {
    type Error = ConfigError;

    fn try_from(config: SdofConfig) -> Result<Self, Self::Error> {
        let SdofConfig {
            total_time,
            time_step,
            damping_ratio,
            initial_velocity,
            regions,
            load,
        } = config;

        if regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        check_positive("total_time", total_time)?;
        check_positive("time_step", time_step)?;
        if time_step > total_time {
            return Err(ConfigError::TimeStepExceedsTotal {
                time_step,
                total_time,
            });
        }
        if !damping_ratio.is_finite() || damping_ratio < 0.0 {
            return Err(ConfigError::Damping(damping_ratio));
        }
        if !initial_velocity.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "initial_velocity",
                value: initial_velocity,
            });
        }

        let mut inbound_previous = 0.0;
        let mut rebound_previous = 0.0;
        for (i, region) in regions.iter().enumerate() {
            let number = i + 1;
            if !region.mass.is_finite() || region.mass <= 0.0 {
                return Err(ConfigError::Mass {
                    region: number,
                    value: region.mass,
                });
            }
            if !region.stiffness.is_finite() {
                return Err(ConfigError::Stiffness {
                    region: number,
                    value: region.stiffness,
                });
            }
            if !region.inbound_limit.is_finite() || region.inbound_limit <= inbound_previous {
                return Err(ConfigError::InboundLimit { region: number });
            }
            if !region.rebound_limit.is_finite() || region.rebound_limit >= rebound_previous {
                return Err(ConfigError::ReboundLimit { region: number });
            }
            inbound_previous = region.inbound_limit;
            rebound_previous = region.rebound_limit;
        }
        if regions[0].stiffness <= 0.0 {
            return Err(ConfigError::ElasticStiffness(regions[0].stiffness));
        }

        let masses: Vec<f64> = regions.iter().map(|r| r.mass).collect();
        let stiffnesses: Vec<f64> = regions.iter().map(|r| r.stiffness).collect();

        let limit = STABILITY_FRACTION * shortest_period(&masses, &stiffnesses);
        if time_step > limit {
            return Err(ConfigError::UnstableTimeStep { time_step, limit });
        }

        let load = CurveInterpolator::from_pairs(load.into_iter().map(|[t, f]| (t, f)))?;
        let [start, end] = load.domain();
        if start > 0.0 {
            return Err(ConfigError::LoadHistoryStart { start });
        }
        #[allow(clippy::cast_precision_loss)]
        let required = step_count(total_time, time_step) as f64 * time_step;
        if end < required * (1.0 - STEP_COUNT_TOLERANCE) {
            return Err(ConfigError::LoadHistoryEnd { end, required });
        }

        let inbound: Vec<f64> = regions.iter().map(|r| r.inbound_limit).collect();
        let rebound: Vec<f64> = regions.iter().map(|r| r.rebound_limit).collect();

        Ok(Self {
            total_time,
            time_step,
            damping_ratio,
            initial_velocity,
            masses,
            stiffnesses,
            bounds: RegionBounds::from_limits(&inbound, &rebound),
            load,
        })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn step_count(total_time: f64, time_step: f64) -> usize {
    (total_time / time_step - STEP_COUNT_TOLERANCE).ceil() as usize
}

fn shortest_period(masses: &[f64], stiffnesses: &[f64]) -> f64 {
    masses
        .iter()
        .zip(stiffnesses)
        .filter(|&(_, &k)| k > 0.0)
        .map(|(&m, &k)| 2.0 * PI * (m / k).sqrt())
        .fold(f64::INFINITY, f64::min)
}
