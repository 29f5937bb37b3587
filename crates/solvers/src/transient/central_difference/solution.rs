use ductile_components::hysteresis::ComponentFailure;
use serde::Serialize;

/// Response of the system at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub displacement: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub resistance: f64,
    pub load: f64,

    /// Signed region number: positive inbound, negative rebound.
    pub region: isize,
}

/// Column-oriented response history, indexed by step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub displacement: Vec<f64>,
    pub velocity: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub resistance: Vec<f64>,
    pub load: Vec<f64>,
    pub region: Vec<isize>,
}

impl TimeSeries {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            displacement: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            acceleration: Vec::with_capacity(capacity),
            resistance: Vec::with_capacity(capacity),
            load: Vec::with_capacity(capacity),
            region: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.time.push(sample.time);
        self.displacement.push(sample.displacement);
        self.velocity.push(sample.velocity);
        self.acceleration.push(sample.acceleration);
        self.resistance.push(sample.resistance);
        self.load.push(sample.load);
        self.region.push(sample.region);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns the sample at `step`, if recorded.
    #[must_use]
    pub fn get(&self, step: usize) -> Option<Sample> {
        (step < self.len()).then(|| Sample {
            time: self.time[step],
            displacement: self.displacement[step],
            velocity: self.velocity[step],
            acceleration: self.acceleration[step],
            resistance: self.resistance[step],
            load: self.load[step],
            region: self.region[step],
        })
    }

    #[must_use]
    pub fn last(&self) -> Option<Sample> {
        self.len().checked_sub(1).and_then(|step| self.get(step))
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len()).filter_map(|step| self.get(step))
    }
}

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// The component reached its outermost boundary.
    Failed(ComponentFailure),

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a central difference integration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// How the solver terminated.
    pub status: Status,

    /// Response history, including the initial state.
    pub series: TimeSeries,

    /// Number of integration steps completed.
    pub steps: usize,

    /// Permanent set the region bounds were shifted by at the end of the run.
    pub plastic_deformation: f64,

    /// Latest permanent set measured, whether or not the bounds took it yet.
    pub permanent_set: f64,

    /// Deepest inbound region reached, as a positive region number.
    pub max_region_inbound: isize,

    /// Deepest rebound region reached, as a negative region number.
    pub max_region_rebound: isize,
}

impl Solution {
    /// Returns the displacement of largest magnitude, with its sign.
    #[must_use]
    pub fn peak_displacement(&self) -> f64 {
        peak(&self.series.displacement)
    }

    /// Returns the resistance of largest magnitude, with its sign.
    #[must_use]
    pub fn peak_resistance(&self) -> f64 {
        peak(&self.series.resistance)
    }

    /// Returns the peak displacement magnitude over `yield_displacement`.
    #[must_use]
    pub fn ductility(&self, yield_displacement: f64) -> f64 {
        self.peak_displacement().abs() / yield_displacement.abs()
    }

    /// Returns the failure recorded by the run, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&ComponentFailure> {
        match &self.status {
            Status::Failed(failure) => Some(failure),
            Status::Complete | Status::StoppedByObserver => None,
        }
    }

    /// Converts a failed run into an error.
    ///
    /// # Errors
    ///
    /// Returns the [`ComponentFailure`] if the component failed.
    pub fn into_result(self) -> Result<Self, ComponentFailure> {
        match self.status {
            Status::Failed(failure) => Err(failure),
            Status::Complete | Status::StoppedByObserver => Ok(self),
        }
    }
}

fn peak(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .fold(0.0, |peak, value| if value.abs() > peak.abs() { value } else { peak })
}
