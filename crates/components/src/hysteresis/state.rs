use serde::{Deserialize, Serialize};

use super::{Branch, ComponentFailure, MaxRegions, Region, RegionBounds};

/// A change in the sign of velocity.
///
/// `displacement` is the displacement one step before the change was seen,
/// which is the extreme the structure turned around at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityReversal {
    pub step: usize,
    pub displacement: f64,
}

/// Point the active resistance line passes through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(super) struct Anchor {
    pub(super) displacement: f64,
    pub(super) resistance: f64,
}

/// Mutable hysteresis state of one run.
///
/// Created in the first inbound region with undeformed bounds. Once a
/// failure is recorded the state is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HysteresisState {
    pub(super) region: Region,
    pub(super) max_regions: MaxRegions,
    pub(super) plastic_deformation: f64,
    pub(super) bounds: RegionBounds,
    pub(super) velocity_sign_changes: Vec<VelocityReversal>,
    pub(super) heading: Option<Branch>,
    pub(super) pending_set: Option<f64>,
    pub(super) inbound_reversal: Option<VelocityReversal>,
    pub(super) rebound_reversal: Option<VelocityReversal>,
    pub(super) anchor: Anchor,
    pub(super) failure: Option<ComponentFailure>,
    pub(super) last_step: usize,
}

impl HysteresisState {
    #[must_use]
    pub fn new(bounds: RegionBounds) -> Self {
        Self {
            region: Region::first(Branch::Inbound),
            max_regions: MaxRegions::default(),
            plastic_deformation: 0.0,
            bounds,
            velocity_sign_changes: Vec::new(),
            heading: None,
            pending_set: None,
            inbound_reversal: None,
            rebound_reversal: None,
            anchor: Anchor {
                displacement: 0.0,
                resistance: 0.0,
            },
            failure: None,
            last_step: 0,
        }
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns the signed number of the active region.
    #[must_use]
    pub fn current_region(&self) -> isize {
        self.region.signed()
    }

    #[must_use]
    pub fn max_regions(&self) -> MaxRegions {
        self.max_regions
    }

    /// Returns the deepest inbound region reached, as a positive number.
    #[must_use]
    pub fn max_region_inbound(&self) -> isize {
        self.max_regions.region(Branch::Inbound).signed()
    }

    /// Returns the deepest rebound region reached, as a negative number.
    #[must_use]
    pub fn max_region_rebound(&self) -> isize {
        self.max_regions.region(Branch::Rebound).signed()
    }

    /// Returns the committed permanent set, the one the bounds are shifted by.
    #[must_use]
    pub fn plastic_deformation(&self) -> f64 {
        self.plastic_deformation
    }

    /// Returns the latest permanent set, committed or not.
    ///
    /// A set measured when an excursion ends waits to be committed until the
    /// bounds timing fires.
    #[must_use]
    pub fn permanent_set(&self) -> f64 {
        self.pending_set.unwrap_or(self.plastic_deformation)
    }

    /// Returns the branch the structure was heading toward at its last
    /// non-zero velocity.
    #[must_use]
    pub fn heading(&self) -> Option<Branch> {
        self.heading
    }

    /// Returns the current, possibly shifted, region bounds.
    #[must_use]
    pub fn bounds(&self) -> &RegionBounds {
        &self.bounds
    }

    /// Returns every velocity reversal seen so far, in step order.
    #[must_use]
    pub fn velocity_sign_changes(&self) -> &[VelocityReversal] {
        &self.velocity_sign_changes
    }

    /// Returns the reversal that ended the last excursion on `branch`.
    #[must_use]
    pub fn reversal(&self, branch: Branch) -> Option<VelocityReversal> {
        match branch {
            Branch::Inbound => self.inbound_reversal,
            Branch::Rebound => self.rebound_reversal,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&ComponentFailure> {
        self.failure.as_ref()
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Returns the last step processed, or 0 before the first update.
    #[must_use]
    pub fn last_step(&self) -> usize {
        self.last_step
    }

    /// Records a reversal if `velocity` points the other way from the last
    /// non-zero velocity. Zero velocity carries no direction.
    pub(super) fn record_velocity(&mut self, step: usize, previous: f64, velocity: f64) {
        if velocity == 0.0 || velocity.is_nan() {
            return;
        }
        let heading = if velocity > 0.0 {
            Branch::Inbound
        } else {
            Branch::Rebound
        };
        if self.heading.is_some_and(|was| was != heading) {
            self.velocity_sign_changes.push(VelocityReversal {
                step,
                displacement: previous,
            });
        }
        self.heading = Some(heading);
    }

    pub(super) fn set_reversal(&mut self, branch: Branch, reversal: Option<VelocityReversal>) {
        match branch {
            Branch::Inbound => self.inbound_reversal = reversal,
            Branch::Rebound => self.rebound_reversal = reversal,
        }
    }

    /// Forgets the excursion memory of `branch`.
    pub(super) fn forget(&mut self, branch: Branch) {
        self.max_regions.reset(branch);
        self.set_reversal(branch, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> HysteresisState {
        HysteresisState::new(RegionBounds::from_limits(&[1.0, 2.0], &[-1.0, -2.0]))
    }

    #[test]
    fn starts_in_first_inbound_region() {
        let state = state();
        assert_eq!(state.current_region(), 1);
        assert_eq!(state.max_region_inbound(), 1);
        assert_eq!(state.max_region_rebound(), -1);
        assert_eq!(state.plastic_deformation(), 0.0);
        assert_eq!(state.permanent_set(), 0.0);
        assert!(state.heading().is_none());
        assert!(!state.is_failed());
    }

    #[test]
    fn reversals_ignore_zero_velocity() {
        let mut state = state();
        state.record_velocity(1, 0.0, 1.0);
        state.record_velocity(2, 0.5, 0.0);
        state.record_velocity(3, 0.5, 2.0);
        assert!(state.velocity_sign_changes().is_empty());
        assert_eq!(state.heading(), Some(Branch::Inbound));

        state.record_velocity(4, 0.8, -1.0);
        state.record_velocity(5, 0.7, 0.0);
        assert_eq!(state.heading(), Some(Branch::Rebound));
        state.record_velocity(6, 0.7, 1.0);
        let steps: Vec<_> = state.velocity_sign_changes().iter().map(|r| r.step).collect();
        assert_eq!(steps, [4, 6]);
        assert_eq!(state.velocity_sign_changes()[0].displacement, 0.8);
    }

    #[test]
    fn forgetting_a_branch_clears_its_memory() {
        let mut state = state();
        state
            .max_regions
            .record(Region::first(Branch::Rebound).deeper());
        state.set_reversal(
            Branch::Rebound,
            Some(VelocityReversal {
                step: 3,
                displacement: -1.5,
            }),
        );

        state.forget(Branch::Rebound);
        assert_eq!(state.max_region_rebound(), -1);
        assert!(state.reversal(Branch::Rebound).is_none());
    }
}
