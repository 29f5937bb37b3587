//! Components for single-degree-of-freedom structural response.
//!
//! - [`interpolation`]: linear curve lookup used for load histories
//! - [`parameters`]: run configuration and its validated form
//! - [`hysteresis`]: the multi-linear resistance state machine

pub mod hysteresis;
pub mod interpolation;
pub mod parameters;

pub use hysteresis::{ComponentFailure, Hysteresis, HysteresisError};
pub use interpolation::{CurveInterpolator, InterpError, OutOfDomainError};
pub use parameters::{ConfigError, RegionConfig, SdofConfig, SdofParameters};
