use thiserror::Error;

use crate::interpolation::InterpError;

/// Errors that can occur when validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("at least one resistance region is required")]
    NoRegions,

    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("time step {time_step} exceeds total time {total_time}")]
    TimeStepExceedsTotal { time_step: f64, total_time: f64 },

    #[error("damping ratio must be finite and non-negative, got {0}")]
    Damping(f64),

    #[error("mass of region {region} must be finite and positive, got {value}")]
    Mass { region: usize, value: f64 },

    #[error("stiffness of region {region} must be finite, got {value}")]
    Stiffness { region: usize, value: f64 },

    #[error("elastic (first region) stiffness must be positive, got {0}")]
    ElasticStiffness(f64),

    #[error("inbound limit of region {region} must be finite and beyond the previous one")]
    InboundLimit { region: usize },

    #[error("rebound limit of region {region} must be finite and beyond the previous one")]
    ReboundLimit { region: usize },

    #[error("time step {time_step} exceeds the stability limit {limit} (shortest period / 10)")]
    UnstableTimeStep { time_step: f64, limit: f64 },

    #[error("invalid load history: {0}")]
    LoadHistory(#[from] InterpError),

    #[error("load history starts at {start}, after the start of the run")]
    LoadHistoryStart { start: f64 },

    #[error("load history ends at {end}, before the end of the run at {required}")]
    LoadHistoryEnd { end: f64, required: f64 },
}
