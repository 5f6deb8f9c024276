//! Horizontal virtualization: which columns stay materialized.
//!
//! A column "survives" when its horizontal extent overlaps the expanded
//! viewport window. The judge step diffs each frame's survivor set against
//! the previous one so the caller only touches columns that actually enter
//! or leave. Vertical virtualization is deliberately absent — every row of
//! a live column is materialized.

use std::collections::BTreeSet;

use log::debug;

use crate::layout::{GridLayout, Viewport};
use crate::model::ColumnAddress;

/// Outcome of one judge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Columns that must be materialized this frame.
    pub survivors: BTreeSet<ColumnAddress>,
    /// Columns newly materialized versus the previous frame.
    pub entering: BTreeSet<ColumnAddress>,
    /// Columns to recycle versus the previous frame.
    pub leaving: BTreeSet<ColumnAddress>,
}

impl Verdict {
    /// Whether this pass changes the live set at all.
    pub fn is_unchanged(&self) -> bool {
        self.entering.is_empty() && self.leaving.is_empty()
    }
}

/// Owns the live-column set between judge passes.
#[derive(Debug, Default)]
pub struct SurvivorManager {
    survivors: BTreeSet<ColumnAddress>,
}

impl SurvivorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The columns currently considered live.
    pub fn survivors(&self) -> &BTreeSet<ColumnAddress> {
        &self.survivors
    }

    /// Recompute the survivor set for the current viewport and return the
    /// diff against the previous pass.
    ///
    /// Membership is closed-interval overlap between the column's
    /// `[x, x + width]` and the expanded window — a partially visible
    /// column survives. Judging the same viewport twice yields an empty
    /// diff.
    pub fn judge(
        &mut self,
        layout: &GridLayout,
        viewport: &Viewport,
        expansion_factor: f32,
    ) -> Verdict {
        let (lo, hi) = viewport.expanded_window(expansion_factor);

        let next: BTreeSet<ColumnAddress> = layout
            .columns()
            .filter(|slot| slot.x <= hi && slot.right() >= lo)
            .map(|slot| slot.address)
            .collect();

        let entering: BTreeSet<ColumnAddress> =
            next.difference(&self.survivors).copied().collect();
        let leaving: BTreeSet<ColumnAddress> =
            self.survivors.difference(&next).copied().collect();

        if !entering.is_empty() || !leaving.is_empty() {
            debug!(
                "judge: {} survivors (+{} / -{}) in window [{lo}, {hi}]",
                next.len(),
                entering.len(),
                leaving.len()
            );
        }

        self.survivors = next.clone();
        Verdict {
            survivors: next,
            entering,
            leaving,
        }
    }

    /// Forget everything (used on reload).
    pub fn reset(&mut self) {
        self.survivors.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::model::TimeSpan;
    use crate::unit::LayoutUnit;
    use chrono::{TimeZone, Utc};

    fn layout() -> GridLayout {
        // Columns at x = 0, 50, 100, 150, each 40 wide.
        let range = TimeSpan::new(
            Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap(),
        )
        .unwrap();
        GridLayout::build(
            1,
            |_| 4,
            |_| 40.0,
            10.0,
            0.0,
            range,
            LayoutUnit::new(15, 8.0, 60).unwrap(),
        )
    }

    fn viewport(scroll_x: f32, width: f32) -> Viewport {
        let mut v = Viewport::new();
        v.resize(width, 600.0);
        v.scroll_x = scroll_x;
        v
    }

    #[test]
    fn test_closed_interval_overlap() {
        let layout = layout();
        let mut manager = SurvivorManager::new();
        // Window [60, 160] with no expansion: the column at 0 ends at 40
        // and misses; 50, 100, 150 all overlap.
        let verdict = manager.judge(&layout, &viewport(60.0, 100.0), 1.0);
        let survivors: Vec<u32> = verdict.survivors.iter().map(|a| a.column).collect();
        assert_eq!(survivors, vec![1, 2, 3]);
        assert_eq!(verdict.entering, verdict.survivors);
        assert!(verdict.leaving.is_empty());
    }

    #[test]
    fn test_judge_is_idempotent() {
        let layout = layout();
        let mut manager = SurvivorManager::new();
        let v = viewport(60.0, 100.0);
        let first = manager.judge(&layout, &v, 1.5);
        assert!(!first.survivors.is_empty());
        let second = manager.judge(&layout, &v, 1.5);
        assert!(second.is_unchanged());
        assert_eq!(second.survivors, first.survivors);
    }

    #[test]
    fn test_scroll_produces_incremental_diff() {
        let layout = layout();
        let mut manager = SurvivorManager::new();
        manager.judge(&layout, &viewport(0.0, 100.0), 1.0);
        // Scroll right: column 0 leaves, column 3 enters.
        let verdict = manager.judge(&layout, &viewport(60.0, 100.0), 1.0);
        let entering: Vec<u32> = verdict.entering.iter().map(|a| a.column).collect();
        let leaving: Vec<u32> = verdict.leaving.iter().map(|a| a.column).collect();
        assert_eq!(entering, vec![3]);
        assert_eq!(leaving, vec![0]);
    }

    #[test]
    fn test_expansion_widens_membership() {
        let layout = layout();
        let mut manager = SurvivorManager::new();
        // Visible [60, 100]: only the column at 50 (ends 90) and 100 overlap.
        let tight = manager.judge(&layout, &viewport(60.0, 40.0), 1.0);
        assert_eq!(tight.survivors.len(), 2);
        manager.reset();
        // Quadrupled window [0, 160] picks up the outer columns too.
        let wide = manager.judge(&layout, &viewport(60.0, 40.0), 4.0);
        assert_eq!(wide.survivors.len(), 4);
    }

    #[test]
    fn test_reset_forgets_survivors() {
        let layout = layout();
        let mut manager = SurvivorManager::new();
        manager.judge(&layout, &viewport(0.0, 100.0), 1.0);
        manager.reset();
        assert!(manager.survivors().is_empty());
        let verdict = manager.judge(&layout, &viewport(0.0, 100.0), 1.0);
        assert_eq!(verdict.entering, verdict.survivors);
    }
}
