use serde::{Deserialize, Serialize};

use super::{LevelWindow, MaxRegions, Placement, Region, VelocityReversal};

/// Outcome of evaluating the region state machine for one displacement.
///
/// Every transition carries the target region and the pivot: the displacement
/// at which the change takes effect. Resistance is continuous through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// The displacement is still inside the active region.
    Stay,

    /// Loading continued past the outer edge into the next region.
    Advance { to: Region, pivot: f64 },

    /// Reloading passed the extreme of a previous excursion, so the deepest
    /// region recorded on the branch is entered directly.
    Resume { to: Region, pivot: f64 },

    /// The displacement crossed the zero-resistance reference onto the other branch.
    Reverse { to: Region, pivot: f64 },

    /// The structure unloaded out of a region beyond the first.
    Retreat { to: Region, pivot: f64 },

    /// The outermost boundary was reached; the component has failed.
    Fail { boundary: f64 },
}

impl Decision {
    /// Returns the target region and pivot of a transition.
    #[must_use]
    pub fn target(&self) -> Option<(Region, f64)> {
        match *self {
            Self::Advance { to, pivot }
            | Self::Resume { to, pivot }
            | Self::Reverse { to, pivot }
            | Self::Retreat { to, pivot } => Some((to, pivot)),
            Self::Stay | Self::Fail { .. } => None,
        }
    }
}

/// Selects the region entered when the structure unloads out of a region
/// beyond the first.
pub trait RetreatRule {
    fn retreat(&self, from: Region) -> Region;
}

/// Unloading from any region beyond the first returns straight to the first
/// region of the branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapseToFirst;

impl RetreatRule for CollapseToFirst {
    fn retreat(&self, from: Region) -> Region {
        Region::first(from.branch())
    }
}

/// Unloading steps back one region at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepBack;

impl RetreatRule for StepBack {
    fn retreat(&self, from: Region) -> Region {
        from.with_level(from.level() - 1)
    }
}

/// Everything the state machine looks at for one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    /// Active region.
    pub region: Region,

    /// Window of the active region.
    pub window: LevelWindow,

    /// Displacement being classified.
    pub displacement: f64,

    /// Displacement at the previous step.
    pub previous: f64,

    /// Deepest regions recorded on each branch.
    pub max_regions: MaxRegions,

    /// Velocity reversal that ended the last excursion on the active branch.
    pub reversal: Option<VelocityReversal>,
}

/// Hysteresis transition logic over `n` regions per branch.
///
/// The unloading rule is pluggable through [`RetreatRule`]; the default
/// collapses back to the first region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStateMachine<R = CollapseToFirst> {
    regions: usize,
    retreat: R,
}

impl RegionStateMachine {
    #[must_use]
    pub fn new(regions: usize) -> Self {
        Self::with_retreat_rule(regions, CollapseToFirst)
    }
}

impl<R: RetreatRule> RegionStateMachine<R> {
    #[must_use]
    pub fn with_retreat_rule(regions: usize, retreat: R) -> Self {
        Self { regions, retreat }
    }

    /// Returns the number of regions per branch.
    #[must_use]
    pub fn regions(&self) -> usize {
        self.regions
    }

    /// Decides the transition for the displacement in `ctx`.
    #[must_use]
    pub fn decide(&self, ctx: &StepContext) -> Decision {
        let StepContext {
            region,
            window,
            displacement: x,
            previous,
            ..
        } = *ctx;
        let sign = region.branch().sign();
        let past_outer = sign * (x - window.outer);
        let below_inner = sign * (x - window.inner) < 0.0;
        let outward = sign * (x - previous) > 0.0;

        match region.placement(self.regions) {
            Placement::First => self.decide_first(ctx, past_outer >= 0.0, below_inner),
            Placement::Interior if past_outer > 0.0 && outward => Decision::Advance {
                to: region.deeper(),
                pivot: window.outer,
            },
            Placement::Outermost if past_outer >= 0.0 => Decision::Fail {
                boundary: window.outer,
            },
            Placement::Interior | Placement::Outermost if below_inner => Decision::Retreat {
                to: self.retreat.retreat(region),
                pivot: previous,
            },
            _ => Decision::Stay,
        }
    }

    fn decide_first(&self, ctx: &StepContext, past_outer: bool, below_inner: bool) -> Decision {
        let region = ctx.region;
        let branch = region.branch();
        let sign = branch.sign();
        let window = ctx.window;

        if ctx.max_regions.is_initial(branch) {
            return match (past_outer, below_inner) {
                (true, _) if self.regions == 1 => Decision::Fail {
                    boundary: window.outer,
                },
                (true, _) => Decision::Advance {
                    to: region.deeper(),
                    pivot: window.outer,
                },
                (false, true) => reverse(region, window),
                (false, false) => Decision::Stay,
            };
        }

        match ctx.reversal {
            // Reloading reached the extreme where the last excursion reversed,
            // wherever the outer edge sits.
            Some(reversal) if sign * (ctx.displacement - reversal.displacement) >= 0.0 => {
                Decision::Resume {
                    to: ctx.max_regions.region(branch),
                    pivot: reversal.displacement,
                }
            }
            Some(_) if !past_outer && below_inner => reverse(region, window),
            Some(_) => Decision::Stay,
            None if past_outer => Decision::Resume {
                to: ctx.max_regions.region(branch),
                pivot: window.outer,
            },
            None if below_inner => reverse(region, window),
            None => Decision::Stay,
        }
    }
}

/// Crosses the zero-resistance reference onto the first region of the other branch.
fn reverse(region: Region, window: LevelWindow) -> Decision {
    Decision::Reverse {
        to: Region::first(region.branch().opposite()),
        pivot: window.inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::hysteresis::Branch;

    fn region(branch: Branch, level: usize) -> Region {
        Region::new(branch, level).unwrap()
    }

    fn context(region: Region, window: (f64, f64), previous: f64, x: f64) -> StepContext {
        StepContext {
            region,
            window: LevelWindow {
                inner: window.0,
                outer: window.1,
            },
            displacement: x,
            previous,
            max_regions: MaxRegions::default(),
            reversal: None,
        }
    }

    fn with_excursion(mut ctx: StepContext, level: usize, peak: f64) -> StepContext {
        ctx.max_regions
            .record(Region::first(ctx.region.branch()).with_level(level));
        ctx.reversal = Some(VelocityReversal {
            step: 10,
            displacement: peak,
        });
        ctx
    }

    #[test]
    fn first_region_stays_inside_window() {
        let machine = RegionStateMachine::new(3);
        let ctx = context(region(Branch::Inbound, 1), (0.0, 1.0), 0.4, 0.5);
        assert_eq!(machine.decide(&ctx), Decision::Stay);
    }

    #[test]
    fn first_region_advances_without_prior_excursion() {
        let machine = RegionStateMachine::new(3);
        let ctx = context(region(Branch::Inbound, 1), (0.0, 1.0), 0.9, 1.0);
        assert_eq!(
            machine.decide(&ctx),
            Decision::Advance {
                to: region(Branch::Inbound, 2),
                pivot: 1.0
            }
        );
    }

    #[test]
    fn first_region_stays_below_previous_extreme() {
        let machine = RegionStateMachine::new(3);
        let ctx = with_excursion(
            context(region(Branch::Inbound, 1), (0.4, 1.4), 1.3, 1.6),
            3,
            1.8,
        );
        assert_eq!(machine.decide(&ctx), Decision::Stay);
    }

    #[test]
    fn first_region_resumes_deepest_region_past_previous_extreme() {
        let machine = RegionStateMachine::new(3);
        let ctx = with_excursion(
            context(region(Branch::Inbound, 1), (0.4, 1.4), 1.7, 1.9),
            3,
            1.8,
        );
        assert_eq!(
            machine.decide(&ctx),
            Decision::Resume {
                to: region(Branch::Inbound, 3),
                pivot: 1.8
            }
        );
    }

    #[test]
    fn first_region_resumes_at_previous_extreme_inside_window() {
        // After softening the zero-resistance point sits so far out that the
        // outer edge lies beyond the extreme the structure turned around at.
        let machine = RegionStateMachine::new(3);
        let ctx = with_excursion(
            context(region(Branch::Inbound, 1), (1.2, 2.2), 1.9, 2.0),
            2,
            2.0,
        );
        assert_eq!(
            machine.decide(&ctx),
            Decision::Resume {
                to: region(Branch::Inbound, 2),
                pivot: 2.0
            }
        );
    }

    #[test]
    fn first_region_reverses_below_reference() {
        let machine = RegionStateMachine::new(3);

        let ctx = context(region(Branch::Inbound, 1), (0.2, 1.2), 0.3, 0.1);
        assert_eq!(
            machine.decide(&ctx),
            Decision::Reverse {
                to: region(Branch::Rebound, 1),
                pivot: 0.2
            }
        );

        let ctx = context(region(Branch::Rebound, 1), (0.2, -0.8), 0.1, 0.3);
        assert_eq!(
            machine.decide(&ctx),
            Decision::Reverse {
                to: region(Branch::Inbound, 1),
                pivot: 0.2
            }
        );
    }

    #[test]
    fn single_region_fails_at_its_boundary() {
        let machine = RegionStateMachine::new(1);
        let ctx = context(region(Branch::Rebound, 1), (0.0, -1.0), -0.9, -1.0);
        assert_eq!(machine.decide(&ctx), Decision::Fail { boundary: -1.0 });
    }

    #[test]
    fn interior_region_advances_only_when_moving_outward() {
        let machine = RegionStateMachine::new(3);

        let ctx = context(region(Branch::Rebound, 2), (-1.5, -3.0), -2.9, -3.1);
        assert_eq!(
            machine.decide(&ctx),
            Decision::Advance {
                to: region(Branch::Rebound, 3),
                pivot: -3.0
            }
        );

        let ctx = context(region(Branch::Rebound, 2), (-1.0, -3.0), -3.2, -3.1);
        assert_eq!(machine.decide(&ctx), Decision::Stay);
    }

    #[test]
    fn interior_region_collapses_to_first_on_retreat() {
        let machine = RegionStateMachine::new(4);
        let ctx = context(region(Branch::Inbound, 3), (2.5, 3.0), 2.5, 2.4);
        assert_eq!(
            machine.decide(&ctx),
            Decision::Retreat {
                to: region(Branch::Inbound, 1),
                pivot: 2.5
            }
        );
    }

    #[test]
    fn step_back_rule_retreats_one_region() {
        let machine = RegionStateMachine::with_retreat_rule(4, StepBack);
        let ctx = context(region(Branch::Inbound, 3), (2.5, 3.0), 2.5, 2.4);
        assert_eq!(
            machine.decide(&ctx),
            Decision::Retreat {
                to: region(Branch::Inbound, 2),
                pivot: 2.5
            }
        );
    }

    #[test]
    fn outermost_region_fails_at_boundary_and_wraps_on_retreat() {
        let machine = RegionStateMachine::new(3);
        let outermost = region(Branch::Inbound, 3);

        let ctx = context(outermost, (3.5, 4.0), 3.9, 4.0);
        assert_eq!(machine.decide(&ctx), Decision::Fail { boundary: 4.0 });

        let ctx = context(outermost, (3.5, 4.0), 3.5, 3.4);
        assert_eq!(
            machine.decide(&ctx),
            Decision::Retreat {
                to: region(Branch::Inbound, 1),
                pivot: 3.5
            }
        );

        let ctx = context(outermost, (3.5, 4.0), 3.5, 3.7);
        assert_eq!(machine.decide(&ctx), Decision::Stay);
    }

    #[test]
    fn decisions_are_branch_symmetric() {
        let machine = RegionStateMachine::new(3);
        let cases = [
            (region(Branch::Inbound, 1), (0.0, 1.0), 0.9, 1.1),
            (region(Branch::Inbound, 1), (0.0, 1.0), 0.1, -0.1),
            (region(Branch::Inbound, 2), (1.5, 2.0), 1.5, 1.4),
            (region(Branch::Inbound, 2), (1.5, 2.0), 1.9, 2.1),
            (region(Branch::Inbound, 3), (2.5, 4.0), 3.9, 4.2),
        ];

        for (region, (inner, outer), previous, x) in cases {
            let decision = machine.decide(&context(region, (inner, outer), previous, x));
            let mirrored = machine.decide(&context(
                region.mirrored(),
                (-inner, -outer),
                -previous,
                -x,
            ));

            let expected = match decision {
                Decision::Stay => Decision::Stay,
                Decision::Fail { boundary } => Decision::Fail {
                    boundary: -boundary,
                },
                Decision::Advance { to, pivot } => Decision::Advance {
                    to: to.mirrored(),
                    pivot: -pivot,
                },
                Decision::Resume { to, pivot } => Decision::Resume {
                    to: to.mirrored(),
                    pivot: -pivot,
                },
                Decision::Reverse { to, pivot } => Decision::Reverse {
                    to: to.mirrored(),
                    pivot: -pivot,
                },
                Decision::Retreat { to, pivot } => Decision::Retreat {
                    to: to.mirrored(),
                    pivot: -pivot,
                },
            };
            assert_eq!(mirrored, expected, "case {region:?} {x}");
        }
    }
}
