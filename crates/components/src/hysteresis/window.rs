use super::{Branch, Placement, Region, RegionBounds};

/// Displacement window bounding the active region.
///
/// `inner` is the edge closer to the zero-resistance reference and `outer`
/// the edge farther from it, so on the rebound branch `outer < inner`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelWindow {
    pub inner: f64,
    pub outer: f64,
}

impl LevelWindow {
    #[must_use]
    pub fn min(&self) -> f64 {
        self.inner.min(self.outer)
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.inner.max(self.outer)
    }

    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min() && x <= self.max()
    }
}

/// Recent motion used to place the trailing edge of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Displacement at which the active region was last confirmed.
    pub current: f64,

    /// Branch the structure was heading toward at its last non-zero velocity.
    pub heading: Option<Branch>,
}

/// Returns the displacement window of `region`.
///
/// - First region: from the zero-resistance reference to the first boundary.
/// - Interior region `k`: the outer edge is boundary `k`. The inner edge trails
///   the structure, sitting at the last confirmed displacement while it heads
///   outward, and falls back to boundary `k - 1` otherwise. A pause with zero
///   velocity keeps the last heading.
/// - Outermost region: as interior, except that once the last confirmed
///   displacement sits at or beyond the outermost boundary the window is the
///   fixed pair of outermost boundaries.
#[must_use]
pub fn level_window(
    region: Region,
    bounds: &RegionBounds,
    regions: usize,
    motion: Motion,
) -> LevelWindow {
    let (fixed_inner, outer) = bounds.edges(region);
    let sign = region.branch().sign();

    let inner = match region.placement(regions) {
        Placement::First => fixed_inner,
        Placement::Outermost if sign * (motion.current - outer) >= 0.0 => fixed_inner,
        Placement::Interior | Placement::Outermost => {
            if motion.heading == Some(region.branch()) {
                motion.current
            } else {
                fixed_inner
            }
        }
    };

    LevelWindow { inner, outer }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> RegionBounds {
        RegionBounds::from_limits(&[1.0, 2.0, 4.0], &[-1.0, -3.0, -5.0])
    }

    fn region(branch: Branch, level: usize) -> Region {
        Region::new(branch, level).unwrap()
    }

    fn heading(branch: Branch, current: f64) -> Motion {
        Motion {
            current,
            heading: Some(branch),
        }
    }

    #[test]
    fn first_region_spans_reference_to_first_boundary() {
        let window = level_window(
            region(Branch::Inbound, 1),
            &bounds(),
            3,
            heading(Branch::Inbound, 0.4),
        );
        assert_eq!(window, LevelWindow { inner: 0.0, outer: 1.0 });

        let window = level_window(
            region(Branch::Rebound, 1),
            &bounds(),
            3,
            heading(Branch::Rebound, -0.4),
        );
        assert_eq!(window, LevelWindow { inner: 0.0, outer: -1.0 });
        assert_eq!((window.min(), window.max()), (-1.0, 0.0));
        assert!(window.contains(-0.5));
        assert!(!window.contains(0.5));
    }

    #[test]
    fn interior_inner_edge_trails_outward_motion() {
        let window = level_window(
            region(Branch::Inbound, 2),
            &bounds(),
            3,
            heading(Branch::Inbound, 1.5),
        );
        assert_eq!(window, LevelWindow { inner: 1.5, outer: 2.0 });

        let window = level_window(
            region(Branch::Rebound, 2),
            &bounds(),
            3,
            heading(Branch::Rebound, -1.5),
        );
        assert_eq!(window, LevelWindow { inner: -1.5, outer: -3.0 });
    }

    #[test]
    fn interior_inner_edge_is_fixed_without_outward_motion() {
        let window = level_window(
            region(Branch::Inbound, 2),
            &bounds(),
            3,
            heading(Branch::Rebound, 1.5),
        );
        assert_eq!(window, LevelWindow { inner: 1.0, outer: 2.0 });

        let window = level_window(
            region(Branch::Inbound, 2),
            &bounds(),
            3,
            Motion {
                current: 1.5,
                heading: None,
            },
        );
        assert_eq!(window, LevelWindow { inner: 1.0, outer: 2.0 });
    }

    #[test]
    fn outermost_collapses_to_fixed_pair_at_its_boundary() {
        let outermost = region(Branch::Rebound, 3);

        let window = level_window(outermost, &bounds(), 3, heading(Branch::Rebound, -4.5));
        assert_eq!(window, LevelWindow { inner: -4.5, outer: -5.0 });

        let window = level_window(outermost, &bounds(), 3, heading(Branch::Rebound, -5.0));
        assert_eq!(window, LevelWindow { inner: -3.0, outer: -5.0 });
    }
}
