use ductile_components::hysteresis::Decision;

use super::Sample;

/// Event emitted by the central difference solver for each step.
///
/// Step 0 is the initial state before any integration.
/// Steps 1..N are emitted after each integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// The step number (0 for initial, 1..N for integration steps).
    pub step: usize,

    /// Response at this step.
    pub sample: Sample,

    /// Last region transition taken during the step.
    pub decision: Decision,

    /// Whether plastic deformation shifted the region bounds during the step.
    pub bounds_shifted: bool,
}
