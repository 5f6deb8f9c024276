//! Planning for live event creation.
//!
//! A long-press-like input at a content point resolves to an owning column
//! and a quantized start time; the plan carries the synthesized event and
//! its frame so the facade can obtain a cell and hand the session to the
//! edit engine in `Creating` mode.

use chrono::Duration;

use crate::geometry::{Point, Rect};
use crate::layout::GridLayout;
use crate::model::{ColumnAddress, Event, TimeSpan};

/// Everything needed to start a create session at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatePlan {
    pub column: ColumnAddress,
    pub event: Event,
    pub frame: Rect,
}

/// Resolve a content point into a create plan.
///
/// The column is the hit-tested lane under `point.x`; the start time is
/// the nearest granule at `point.y`; the duration is the unit's default
/// creation duration. Returns `None` when the layout has no columns or
/// the synthesized span would be degenerate.
///
/// `key` is the host-visible identifier stamped on the synthesized event.
pub fn plan_create(layout: &GridLayout, point: Point, key: u64) -> Option<CreatePlan> {
    let column = layout.column_at(point.x)?;
    let start = layout.instant_at(point.y);
    let minutes = layout.unit().default_create_minutes();
    let span = TimeSpan::from_start(start, Duration::minutes(minutes)).ok()?;
    let event = Event::new(span, true, key);
    let frame = layout.frame_for(column, &span)?;
    Some(CreatePlan {
        column,
        event,
        frame,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::unit::LayoutUnit;
    use chrono::{TimeZone, Utc};

    fn layout() -> GridLayout {
        let range = TimeSpan::new(
            Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 9, 20, 0, 0).unwrap(),
        )
        .unwrap();
        GridLayout::build(
            1,
            |_| 3,
            |_| 44.0,
            2.0,
            0.0,
            range,
            LayoutUnit::new(15, 8.0, 60).unwrap(),
        )
    }

    #[test]
    fn test_plan_resolves_column_and_quantized_start() {
        let layout = layout();
        // x = 50 falls in column 1; y = 35 px is 4.375 granules, nearest 4,
        // so one hour past the range start.
        let plan = plan_create(&layout, Point::new(50.0, 35.0), 7).unwrap();
        assert_eq!(plan.column, ColumnAddress::new(0, 1));
        assert_eq!(
            plan.event.span.start(),
            Utc.with_ymd_and_hms(2026, 3, 9, 9, 0, 0).unwrap()
        );
        assert_eq!(plan.event.span.duration_seconds(), 60 * 60);
        assert!(plan.event.editable);
        assert_eq!(plan.event.key, 7);
        // Default duration of 60 min = 4 granules = 32 px tall.
        assert_eq!(plan.frame, Rect::new(46.0, 32.0, 44.0, 32.0));
    }

    #[test]
    fn test_plan_clamps_x_to_first_column() {
        let layout = layout();
        let plan = plan_create(&layout, Point::new(-5.0, 0.0), 0).unwrap();
        assert_eq!(plan.column, ColumnAddress::new(0, 0));
    }

    #[test]
    fn test_plan_with_empty_layout() {
        let range = TimeSpan::new(
            Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 9, 20, 0, 0).unwrap(),
        )
        .unwrap();
        let layout = GridLayout::build(
            0,
            |_| 0,
            |_| 0.0,
            0.0,
            0.0,
            range,
            LayoutUnit::new(15, 8.0, 60).unwrap(),
        );
        assert!(plan_create(&layout, Point::new(10.0, 10.0), 0).is_none());
    }
}
