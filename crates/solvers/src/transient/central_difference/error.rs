use ductile_components::{InterpError, hysteresis::HysteresisError};

/// Errors that can occur during central difference integration.
///
/// Component failure is not an error: it ends the run with
/// [`Status::Failed`](super::Status::Failed).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("load history cannot be evaluated at t = {time}")]
    Load {
        time: f64,
        #[source]
        source: InterpError,
    },

    #[error("hysteresis update failed: {0}")]
    Hysteresis(#[from] HysteresisError),
}
