use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Region;

/// Terminal failure of the component: the outermost boundary was reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Error)]
#[error(
    "component failed at step {step}: displacement {displacement} reached boundary {boundary} in region {}",
    .region.signed()
)]
pub struct ComponentFailure {
    pub step: usize,
    pub displacement: f64,
    pub boundary: f64,
    pub region: Region,
}

/// Errors that can occur when updating the hysteresis state.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HysteresisError {
    /// The component already failed; the state accepts no further steps.
    #[error("hysteresis state is terminal since step {step}")]
    Terminated { step: usize },

    /// A step was not newer than the last processed step.
    #[error("step {step} does not follow the last processed step {last}")]
    OutOfOrder { step: usize, last: usize },

    #[error("displacement at step {step} is not finite: {value}")]
    NotFinite { step: usize, value: f64 },
}
