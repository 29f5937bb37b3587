use serde::{Deserialize, Serialize};

/// Branch of the hysteresis curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// Loading toward positive displacement.
    Inbound,
    /// Reversed loading toward negative displacement.
    Rebound,
}

impl Branch {
    /// Returns `1.0` for inbound and `-1.0` for rebound.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Inbound => 1.0,
            Self::Rebound => -1.0,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Inbound => Self::Rebound,
            Self::Rebound => Self::Inbound,
        }
    }
}

/// A region of the resistance curve on one branch.
///
/// Levels start at 1 for the region adjacent to the zero-resistance reference
/// and grow outward. The signed form used in reports is `+level` on the
/// inbound branch and `-level` on the rebound branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    branch: Branch,
    level: usize,
}

/// Where a region sits within the `n` regions of its branch.
///
/// Replaces numeric sentinels for the first and outermost regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Level 1, adjacent to the zero-resistance reference.
    First,
    /// Strictly between the first and the outermost region.
    Interior,
    /// Level `n` when `n > 1`; reaching its outer boundary is failure.
    Outermost,
}

impl Region {
    /// Returns the first region of a branch.
    #[must_use]
    pub fn first(branch: Branch) -> Self {
        Self { branch, level: 1 }
    }

    /// Creates a region, or `None` if `level` is zero.
    #[must_use]
    pub fn new(branch: Branch, level: usize) -> Option<Self> {
        (level >= 1).then_some(Self { branch, level })
    }

    #[must_use]
    pub fn branch(self) -> Branch {
        self.branch
    }

    #[must_use]
    pub fn level(self) -> usize {
        self.level
    }

    /// Returns the zero-based index into per-region property tables.
    #[must_use]
    pub fn index(self) -> usize {
        self.level - 1
    }

    /// Returns the signed region number: `+level` inbound, `-level` rebound.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn signed(self) -> isize {
        match self.branch {
            Branch::Inbound => self.level as isize,
            Branch::Rebound => -(self.level as isize),
        }
    }

    #[must_use]
    pub fn is_first(self) -> bool {
        self.level == 1
    }

    /// Returns the next region outward on the same branch.
    #[must_use]
    pub fn deeper(self) -> Self {
        Self {
            level: self.level + 1,
            ..self
        }
    }

    /// Returns the region at `level` on the same branch.
    ///
    /// Levels below 1 are raised to 1.
    #[must_use]
    pub fn with_level(self, level: usize) -> Self {
        Self {
            level: level.max(1),
            ..self
        }
    }

    /// Returns the same level on the opposite branch.
    #[must_use]
    pub fn mirrored(self) -> Self {
        Self {
            branch: self.branch.opposite(),
            ..self
        }
    }

    /// Classifies this region among `regions` regions per branch.
    #[must_use]
    pub fn placement(self, regions: usize) -> Placement {
        if self.level == 1 {
            Placement::First
        } else if self.level >= regions {
            Placement::Outermost
        } else {
            Placement::Interior
        }
    }
}

/// Deepest level reached on each branch since that branch's memory was reset.
///
/// Both start at level 1, which is the "no excursion" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxRegions {
    inbound: usize,
    rebound: usize,
}

impl Default for MaxRegions {
    fn default() -> Self {
        Self {
            inbound: 1,
            rebound: 1,
        }
    }
}

impl MaxRegions {
    /// Returns the deepest level recorded for `branch`.
    #[must_use]
    pub fn level(&self, branch: Branch) -> usize {
        match branch {
            Branch::Inbound => self.inbound,
            Branch::Rebound => self.rebound,
        }
    }

    /// Returns the deepest region recorded for `branch`.
    #[must_use]
    pub fn region(&self, branch: Branch) -> Region {
        Region::first(branch).with_level(self.level(branch))
    }

    /// Returns `true` if no excursion past the first region is recorded.
    #[must_use]
    pub fn is_initial(&self, branch: Branch) -> bool {
        self.level(branch) == 1
    }

    /// Records `region`, keeping the deeper of it and the stored level.
    pub fn record(&mut self, region: Region) {
        let slot = self.slot(region.branch());
        *slot = (*slot).max(region.level());
    }

    /// Forgets the excursion recorded for `branch`.
    pub fn reset(&mut self, branch: Branch) {
        *self.slot(branch) = 1;
    }

    fn slot(&mut self, branch: Branch) -> &mut usize {
        match branch {
            Branch::Inbound => &mut self.inbound,
            Branch::Rebound => &mut self.rebound,
        }
    }
}
