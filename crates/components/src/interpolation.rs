//! Linear curve lookup over sampled tables.

mod error;

use ndarray::Array1;
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};

pub use error::{InterpError, OutOfDomainError};

/// Relative slack, as a fraction of the sampled span, within which a query
/// just outside an end point is treated as round-off and clamped.
const DOMAIN_TOLERANCE: f64 = 1e-9;

/// Linear interpolation over a strictly increasing table of samples.
///
/// Queries outside the sampled range are rejected with an
/// [`OutOfDomainError`]; there is no extrapolation.
///
/// # Example
///
/// ```
/// use ductile_components::CurveInterpolator;
///
/// let load = CurveInterpolator::new(vec![0.0, 0.01, 0.02], vec![0.0, 100.0, 0.0]).unwrap();
///
/// assert!((load.interpolate(0.005).unwrap() - 50.0).abs() < 1e-9);
/// assert!(load.interpolate(0.03).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CurveInterpolator {
    interp: Interp1DOwned<f64, Linear>,
    min: f64,
    max: f64,
}

impl CurveInterpolator {
    /// Builds an interpolator from matching `x` and `y` samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples differ in length, there are fewer than
    /// two of them, any value is not finite, or `x` is not strictly increasing.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, InterpError> {
        if x.len() != y.len() {
            return Err(InterpError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(InterpError::TooFewSamples(x.len()));
        }
        if let Some(index) = x
            .iter()
            .zip(&y)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(InterpError::NotFinite { index });
        }
        if let Some(index) = x.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(InterpError::NotIncreasing { index: index + 1 });
        }

        let min = x[0];
        let max = x[x.len() - 1];
        let interp = Interp1DOwned::new(
            Array1::from(x),
            Array1::from(y),
            Linear,
            Extrapolate::Error,
        )?;

        Ok(Self { interp, min, max })
    }

    /// Builds an interpolator from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// See [`CurveInterpolator::new`].
    pub fn from_pairs<I>(pairs: I) -> Result<Self, InterpError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (x, y) = pairs.into_iter().unzip();
        Self::new(x, y)
    }

    /// Returns the sampled range `[min, max]`.
    #[must_use]
    pub fn domain(&self) -> [f64; 2] {
        [self.min, self.max]
    }

    /// Returns the linearly interpolated value at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`InterpError::OutOfDomain`] if `x` lies outside the sampled range.
    pub fn interpolate(&self, x: f64) -> Result<f64, InterpError> {
        let slack = DOMAIN_TOLERANCE * (self.max - self.min);
        if !(x >= self.min - slack && x <= self.max + slack) {
            return Err(OutOfDomainError {
                x,
                min: self.min,
                max: self.max,
            }
            .into());
        }

        let x = x.clamp(self.min, self.max);
        Ok(self.interp.interpolate(&[x])?)
    }
}
