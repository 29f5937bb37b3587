//! Multi-linear hysteretic resistance.
//!
//! The resistance curve is split into `n` regions per branch, each with its
//! own stiffness. [`Hysteresis`] drives the region state machine one step at
//! a time from prescribed kinematics and reports the resulting resistance.
//! Resistance is continuous: every transition re-anchors the active line at
//! the pivot displacement.

mod bounds;
mod error;
mod machine;
mod region;
mod state;
mod window;

use log::{debug, warn};

pub use bounds::{BoundsTracker, OnResume, OnUnload, RegionBounds, ShiftTiming};
pub use error::{ComponentFailure, HysteresisError};
pub use machine::{
    CollapseToFirst, Decision, RegionStateMachine, RetreatRule, StepBack, StepContext,
};
pub use region::{Branch, MaxRegions, Placement, Region};
pub use state::{HysteresisState, VelocityReversal};
pub use window::{LevelWindow, Motion, level_window};

use crate::parameters::SdofParameters;
use state::Anchor;

/// Kinematics of one step, as seen by the hysteresis update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Index of the step, starting at 1.
    pub step: usize,

    /// Displacement at this step.
    pub displacement: f64,

    /// Displacement at the previous step.
    pub previous: f64,

    /// Velocity at this step.
    pub velocity: f64,
}

/// Result of one hysteresis update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    /// Last transition taken during the step, [`Decision::Stay`] if none.
    pub decision: Decision,

    /// Number of transitions taken during the step.
    pub transitions: usize,

    /// Active region after the step.
    pub region: Region,

    /// Resistance at the step's displacement.
    pub resistance: f64,

    /// Whether the region bounds were re-derived during the step.
    pub bounds_shifted: bool,
}

impl Update {
    /// Returns `true` if the step ended in component failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.decision, Decision::Fail { .. })
    }
}

/// Hysteretic resistance of a multi-linear component.
///
/// `R` picks the region entered on unloading and `T` picks when a measured
/// permanent set is committed to the bounds.
#[derive(Debug, Clone)]
pub struct Hysteresis<R = CollapseToFirst, T = OnResume> {
    stiffnesses: Vec<f64>,
    tracker: BoundsTracker<T>,
    machine: RegionStateMachine<R>,
    state: HysteresisState,
}

impl Hysteresis {
    #[must_use]
    pub fn from_parameters(parameters: &SdofParameters) -> Self {
        Self::with_rules(parameters, CollapseToFirst, OnResume)
    }
}

impl<R: RetreatRule, T: ShiftTiming> Hysteresis<R, T> {
    /// Creates a resistance from validated parameters with explicit unloading
    /// and bounds-shift rules.
    #[must_use]
    pub fn with_rules(parameters: &SdofParameters, retreat: R, timing: T) -> Self {
        Self::from_table(
            parameters.stiffnesses().to_vec(),
            parameters.initial_bounds().clone(),
            retreat,
            timing,
        )
    }

    /// Expects one stiffness per region of `bounds`.
    pub(crate) fn from_table(
        stiffnesses: Vec<f64>,
        bounds: RegionBounds,
        retreat: R,
        timing: T,
    ) -> Self {
        debug_assert_eq!(stiffnesses.len(), bounds.region_count());
        Self {
            machine: RegionStateMachine::with_retreat_rule(stiffnesses.len(), retreat),
            tracker: BoundsTracker::with_timing(bounds.clone(), timing),
            state: HysteresisState::new(bounds),
            stiffnesses,
        }
    }

    #[must_use]
    pub fn state(&self) -> &HysteresisState {
        &self.state
    }

    /// Returns the number of regions per branch.
    #[must_use]
    pub fn regions(&self) -> usize {
        self.stiffnesses.len()
    }

    /// Returns the stiffness of the active region.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffnesses[self.state.region.index()]
    }

    /// Returns the resistance the active region gives at displacement `x`.
    #[must_use]
    pub fn resistance_at(&self, x: f64) -> f64 {
        let Anchor {
            displacement,
            resistance,
        } = self.state.anchor;
        resistance + self.stiffness() * (x - displacement)
    }

    /// Advances the state by one step.
    ///
    /// Transitions are re-evaluated within the step until the displacement
    /// settles in a region, so a single large step may cross several
    /// boundaries. A retreat always ends the step.
    ///
    /// # Errors
    ///
    /// Fails if the component already failed, if the step does not follow
    /// the last processed step, or if the displacement is not finite. The
    /// state is left untouched in every error case.
    pub fn update(&mut self, kinematics: Kinematics) -> Result<Update, HysteresisError> {
        let Kinematics {
            step,
            displacement: x,
            previous,
            velocity,
        } = kinematics;

        if let Some(failure) = self.state.failure {
            return Err(HysteresisError::Terminated { step: failure.step });
        }
        if step <= self.state.last_step {
            return Err(HysteresisError::OutOfOrder {
                step,
                last: self.state.last_step,
            });
        }
        if !x.is_finite() {
            return Err(HysteresisError::NotFinite { step, value: x });
        }

        // The window trails the motion that led to `previous`, not this step's.
        let mut motion = Motion {
            current: previous,
            heading: self.state.heading,
        };
        self.state.last_step = step;
        self.state.record_velocity(step, previous, velocity);

        let mut update = Update {
            decision: Decision::Stay,
            transitions: 0,
            region: self.state.region,
            resistance: 0.0,
            bounds_shifted: false,
        };

        for _ in 0..2 * self.regions() + 4 {
            let region = self.state.region;
            let ctx = StepContext {
                region,
                window: level_window(region, &self.state.bounds, self.regions(), motion),
                displacement: x,
                previous,
                max_regions: self.state.max_regions,
                reversal: self.state.reversal(region.branch()),
            };

            let decision = self.machine.decide(&ctx);
            match decision {
                Decision::Stay => break,
                Decision::Fail { boundary } => {
                    let failure = ComponentFailure {
                        step,
                        displacement: x,
                        boundary,
                        region,
                    };
                    warn!("{failure}");
                    self.state.failure = Some(failure);
                    update.decision = decision;
                    break;
                }
                Decision::Advance { to, pivot }
                | Decision::Resume { to, pivot }
                | Decision::Reverse { to, pivot }
                | Decision::Retreat { to, pivot } => {
                    update.bounds_shifted |= self.transition(step, region, to, pivot);
                    update.decision = decision;
                    update.transitions += 1;
                    if matches!(decision, Decision::Retreat { .. }) {
                        break;
                    }
                    motion = Motion {
                        current: pivot,
                        heading: self.state.heading,
                    };
                }
            }
        }

        update.region = self.state.region;
        update.resistance = self.resistance_at(x);
        Ok(update)
    }

    /// Moves the active region to `to`, re-anchoring resistance at `pivot`.
    ///
    /// Returns `true` if the bounds shifted.
    fn transition(&mut self, step: usize, from: Region, to: Region, pivot: f64) -> bool {
        let resistance = self.resistance_at(pivot);
        debug!(
            "step {step}: region {} -> {} at displacement {pivot}",
            from.signed(),
            to.signed()
        );

        self.state.anchor = Anchor {
            displacement: pivot,
            resistance,
        };
        self.state.region = to;
        self.state.max_regions.record(to);

        // Yielding on one branch voids what the other branch remembered.
        if from.is_first() && !to.is_first() {
            self.state.forget(to.branch().opposite());
        }

        let excursion_ended = from.branch() == to.branch() && !from.is_first() && to.is_first();
        if excursion_ended {
            let reversal = self.state.velocity_sign_changes.last().copied();
            self.state.set_reversal(to.branch(), reversal);
            let set = pivot - resistance / self.stiffnesses[0];
            debug!("step {step}: excursion ended with permanent set {set}");
            self.state.pending_set = Some(set);
        }

        let max_regions = self.state.max_regions;
        if self.tracker.commits(from, to, &max_regions) {
            if let Some(set) = self.state.pending_set.take() {
                self.state.plastic_deformation = set;
            }
        }

        let plastic_deformation = self.state.plastic_deformation;
        let shifted = self.tracker.update(
            &mut self.state.bounds,
            plastic_deformation,
            from,
            to,
            &max_regions,
        );
        if shifted {
            debug!("step {step}: bounds shifted by plastic deformation {plastic_deformation}");
        }
        shifted
    }
}
