use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Raw, unvalidated run configuration.
///
/// This is the serialized form of a run. Convert it into
/// [`SdofParameters`](super::SdofParameters) with `try_into()` to validate it.
///
/// # Example
///
/// ```
/// use ductile_components::{SdofConfig, SdofParameters};
///
/// let config = SdofConfig::from_toml(r#"
///     total_time = 0.1
///     time_step = 1e-4
///     damping_ratio = 2.0
///     load = [[0.0, 500.0], [0.01, 0.0], [0.2, 0.0]]
///
///     [[regions]]
///     mass = 1.0
///     stiffness = 10000.0
///     inbound_limit = 0.05
///     rebound_limit = -0.05
///
///     [[regions]]
///     mass = 1.0
///     stiffness = 0.0
///     inbound_limit = 0.5
///     rebound_limit = -0.5
/// "#).unwrap();
///
/// let params: SdofParameters = config.try_into().unwrap();
/// assert_eq!(params.region_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdofConfig {
    /// Simulated duration.
    pub total_time: f64,

    /// Integration time step.
    pub time_step: f64,

    /// Viscous damping as a percentage of critical damping.
    #[serde(default)]
    pub damping_ratio: f64,

    /// Velocity at the start of the run, used to model an initial impulse.
    #[serde(default)]
    pub initial_velocity: f64,

    /// Resistance regions ordered outward from zero displacement.
    pub regions: Vec<RegionConfig>,

    /// Applied load history as `[time, load]` samples.
    pub load: Vec<[f64; 2]>,
}

/// One segment of the multi-linear resistance curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Equivalent mass while the structure responds in this region.
    pub mass: f64,

    /// Stiffness (slope of the resistance curve) in this region.
    pub stiffness: f64,

    /// Undeformed outer boundary of the region on the inbound branch.
    pub inbound_limit: f64,

    /// Undeformed outer boundary of the region on the rebound branch.
    pub rebound_limit: f64,
}

impl SdofConfig {
    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
