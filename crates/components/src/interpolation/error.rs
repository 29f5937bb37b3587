use ninterp::error::{InterpolateError, ValidateError};
use thiserror::Error;

/// A query fell outside the sampled range of a curve.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("query {x} is outside the sampled range [{min}, {max}]")]
pub struct OutOfDomainError {
    pub x: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Error, Debug)]
pub enum InterpError {
    #[error("x and y samples differ in length ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("at least two samples are required, got {0}")]
    TooFewSamples(usize),

    #[error("sample {index} is not finite")]
    NotFinite { index: usize },

    #[error("x samples must be strictly increasing (sample {index})")]
    NotIncreasing { index: usize },

    #[error(transparent)]
    OutOfDomain(#[from] OutOfDomainError),

    #[error(transparent)]
    Validation(#[from] ValidateError),

    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}
