use serde::{Deserialize, Serialize};

use super::{Branch, MaxRegions, Region};

/// Absolute region boundaries on both branches.
///
/// Each branch holds `n + 1` displacements: index 0 is the zero-resistance
/// reference and index `k` is the outer boundary of region `k`. Inbound
/// values increase and rebound values decrease away from the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    inbound: Vec<f64>,
    rebound: Vec<f64>,
}

impl RegionBounds {
    /// Builds undeformed bounds from the outer limit of each region.
    ///
    /// Both slices must have the same length; the reference is placed at zero.
    #[must_use]
    pub(crate) fn from_limits(inbound: &[f64], rebound: &[f64]) -> Self {
        debug_assert_eq!(inbound.len(), rebound.len());
        let with_reference = |limits: &[f64]| {
            std::iter::once(0.0)
                .chain(limits.iter().copied())
                .collect::<Vec<_>>()
        };
        Self {
            inbound: with_reference(inbound),
            rebound: with_reference(rebound),
        }
    }

    /// Returns the number of regions per branch.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.inbound.len() - 1
    }

    #[must_use]
    pub fn inbound(&self) -> &[f64] {
        &self.inbound
    }

    #[must_use]
    pub fn rebound(&self) -> &[f64] {
        &self.rebound
    }

    /// Returns the boundaries of `branch`.
    #[must_use]
    pub fn branch(&self, branch: Branch) -> &[f64] {
        match branch {
            Branch::Inbound => &self.inbound,
            Branch::Rebound => &self.rebound,
        }
    }

    /// Returns boundary `index` of `branch` (0 is the reference).
    #[must_use]
    pub fn boundary(&self, branch: Branch, index: usize) -> f64 {
        self.branch(branch)[index]
    }

    /// Returns the zero-resistance reference displacement.
    #[must_use]
    pub fn reference(&self) -> f64 {
        self.inbound[0]
    }

    /// Returns the inner and outer boundary of `region`.
    #[must_use]
    pub fn edges(&self, region: Region) -> (f64, f64) {
        let bounds = self.branch(region.branch());
        (bounds[region.level() - 1], bounds[region.level()])
    }
}

/// Decides when a permanent set measured at the end of an excursion is
/// committed to the bounds.
pub trait ShiftTiming {
    /// Returns `true` if the transition from `previous` to `current` commits
    /// the pending permanent set.
    fn commits(&self, previous: Region, current: Region, max_regions: &MaxRegions) -> bool;
}

/// Commits when reloading re-enters the deepest region recorded on the
/// branch, the first time it is revisited after unloading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnResume;

impl ShiftTiming for OnResume {
    fn commits(&self, previous: Region, current: Region, max_regions: &MaxRegions) -> bool {
        let branch = current.branch();
        previous.branch() == branch
            && previous.is_first()
            && !max_regions.is_initial(branch)
            && current.level() == max_regions.level(branch)
    }
}

/// Commits as soon as the structure unloads back into the first region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnUnload;

impl ShiftTiming for OnUnload {
    fn commits(&self, previous: Region, current: Region, max_regions: &MaxRegions) -> bool {
        let branch = current.branch();
        current.is_first()
            && previous.branch() == branch
            && !previous.is_first()
            && previous.level() <= max_regions.level(branch)
            && !max_regions.is_initial(branch)
    }
}

/// Keeps region bounds in step with accumulated plastic deformation.
///
/// Bounds are always the undeformed bounds shifted by the committed plastic
/// deformation, on both branches at once: a permanent set from either branch
/// moves the zero-resistance reference of both.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsTracker<T = OnResume> {
    initial: RegionBounds,
    timing: T,
}

impl BoundsTracker {
    #[must_use]
    pub fn new(initial: RegionBounds) -> Self {
        Self::with_timing(initial, OnResume)
    }
}

impl<T: ShiftTiming> BoundsTracker<T> {
    #[must_use]
    pub fn with_timing(initial: RegionBounds, timing: T) -> Self {
        Self { initial, timing }
    }

    /// Returns the undeformed bounds.
    #[must_use]
    pub fn initial(&self) -> &RegionBounds {
        &self.initial
    }

    /// Returns `true` if the transition commits the pending permanent set.
    #[must_use]
    pub fn commits(&self, previous: Region, current: Region, max_regions: &MaxRegions) -> bool {
        self.timing.commits(previous, current, max_regions)
    }

    /// Decides whether a transition from `previous` to `current` re-derives bounds.
    ///
    /// Fires when either:
    /// - the timing policy commits a permanent set, or
    /// - the structure entered the first region of a branch that has no
    ///   recorded excursion, from the other branch.
    ///
    /// Oscillation inside an already visited region never fires.
    #[must_use]
    pub fn should_shift(&self, previous: Region, current: Region, max_regions: &MaxRegions) -> bool {
        let branch = current.branch();
        let fresh_branch = current.is_first()
            && previous.branch() != branch
            && max_regions.is_initial(branch);

        fresh_branch || self.commits(previous, current, max_regions)
    }

    /// Rewrites `bounds` as the initial bounds shifted by `plastic_deformation`.
    ///
    /// Returns `true` if any boundary changed. Applying the same deformation
    /// twice leaves the bounds unchanged the second time.
    pub fn apply(&self, bounds: &mut RegionBounds, plastic_deformation: f64) -> bool {
        let shift = |initial: &[f64]| {
            initial
                .iter()
                .map(|b| b + plastic_deformation)
                .collect::<Vec<_>>()
        };
        let shifted = RegionBounds {
            inbound: shift(&self.initial.inbound),
            rebound: shift(&self.initial.rebound),
        };

        if *bounds == shifted {
            false
        } else {
            *bounds = shifted;
            true
        }
    }

    /// Applies `plastic_deformation` if the transition calls for it.
    ///
    /// Returns `true` if the bounds changed.
    pub fn update(
        &self,
        bounds: &mut RegionBounds,
        plastic_deformation: f64,
        previous: Region,
        current: Region,
        max_regions: &MaxRegions,
    ) -> bool {
        self.should_shift(previous, current, max_regions)
            && self.apply(bounds, plastic_deformation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn tracker() -> BoundsTracker {
        BoundsTracker::new(RegionBounds::from_limits(
            &[1.0, 2.0, 4.0],
            &[-1.0, -3.0, -5.0],
        ))
    }

    fn region(branch: Branch, level: usize) -> Region {
        Region::new(branch, level).unwrap()
    }

    #[test]
    fn limits_gain_a_zero_reference() {
        let bounds = tracker().initial().clone();
        assert_eq!(bounds.region_count(), 3);
        assert_eq!(bounds.inbound(), &[0.0, 1.0, 2.0, 4.0]);
        assert_eq!(bounds.rebound(), &[0.0, -1.0, -3.0, -5.0]);
        assert_eq!(bounds.edges(region(Branch::Rebound, 2)), (-1.0, -3.0));
    }

    #[test]
    fn apply_shifts_both_branches() {
        let tracker = tracker();
        let mut bounds = tracker.initial().clone();

        assert!(tracker.apply(&mut bounds, 0.5));
        assert_relative_eq!(bounds.reference(), 0.5);
        assert_eq!(bounds.inbound(), &[0.5, 1.5, 2.5, 4.5]);
        assert_eq!(bounds.rebound(), &[0.5, -0.5, -2.5, -4.5]);
    }

    #[test]
    fn apply_is_idempotent() {
        let tracker = tracker();
        let mut bounds = tracker.initial().clone();

        assert!(tracker.apply(&mut bounds, 0.25));
        let once = bounds.clone();
        assert!(!tracker.apply(&mut bounds, 0.25));
        assert_eq!(bounds, once);

        // Shifts are absolute, not cumulative.
        assert!(tracker.apply(&mut bounds, 0.0));
        assert_eq!(&bounds, tracker.initial());
    }

    #[test]
    fn resume_timing_fires_on_reentering_the_deepest_region() {
        let tracker = tracker();
        let mut max = MaxRegions::default();
        max.record(region(Branch::Inbound, 3));

        assert!(tracker.should_shift(
            region(Branch::Inbound, 1),
            region(Branch::Inbound, 3),
            &max
        ));
        // Unloading and stepping between deep regions do not fire.
        assert!(!tracker.should_shift(
            region(Branch::Inbound, 3),
            region(Branch::Inbound, 1),
            &max
        ));
        assert!(!tracker.should_shift(
            region(Branch::Inbound, 3),
            region(Branch::Inbound, 2),
            &max
        ));
        // Reloading into a shallower region than the deepest one recorded.
        assert!(!tracker.should_shift(
            region(Branch::Inbound, 1),
            region(Branch::Inbound, 2),
            &max
        ));
    }

    #[test]
    fn unload_timing_fires_when_an_excursion_ends() {
        let tracker = BoundsTracker::with_timing(tracker().initial().clone(), OnUnload);
        let mut max = MaxRegions::default();
        max.record(region(Branch::Inbound, 3));

        assert!(tracker.should_shift(
            region(Branch::Inbound, 3),
            region(Branch::Inbound, 1),
            &max
        ));
        // A one-level-at-a-time retreat also ends the excursion at level 1.
        assert!(tracker.should_shift(
            region(Branch::Inbound, 2),
            region(Branch::Inbound, 1),
            &max
        ));
        assert!(!tracker.should_shift(
            region(Branch::Inbound, 1),
            region(Branch::Inbound, 3),
            &max
        ));
    }

    #[test]
    fn reversing_into_a_visited_branch_does_not_fire() {
        let tracker = tracker();
        let mut max = MaxRegions::default();
        max.record(region(Branch::Inbound, 2));
        max.record(region(Branch::Rebound, 2));

        assert!(!tracker.should_shift(
            region(Branch::Inbound, 1),
            region(Branch::Rebound, 1),
            &max
        ));
    }

    #[test]
    fn fires_when_entering_a_fresh_branch() {
        let max = MaxRegions::default();
        assert!(tracker().should_shift(
            region(Branch::Inbound, 1),
            region(Branch::Rebound, 1),
            &max
        ));
    }

    #[test]
    fn update_only_changes_bounds_when_firing() {
        let tracker = tracker();
        let mut bounds = tracker.initial().clone();
        let mut max = MaxRegions::default();
        max.record(region(Branch::Inbound, 2));

        let changed = tracker.update(
            &mut bounds,
            0.7,
            region(Branch::Inbound, 2),
            region(Branch::Inbound, 1),
            &max,
        );
        assert!(!changed);
        assert_eq!(&bounds, tracker.initial());

        let changed = tracker.update(
            &mut bounds,
            0.7,
            region(Branch::Inbound, 1),
            region(Branch::Inbound, 2),
            &max,
        );
        assert!(changed);
        assert_relative_eq!(bounds.reference(), 0.7);
    }
}
