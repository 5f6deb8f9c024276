//! Pre-computed column geometry for one reload generation.
//!
//! Built once per `reload_data()` from the data source's declared
//! sections/columns/time range, then treated as immutable until the next
//! reload. Lookups are O(log n) binary searches over the sorted x offsets.

use std::collections::HashMap;

use chrono::Duration;

use crate::geometry::Rect;
use crate::model::{ColumnAddress, Instant, TimeSpan};
use crate::unit::LayoutUnit;

/// One column's horizontal slot in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSlot {
    pub address: ColumnAddress,
    /// Left edge in content coordinates (gutter included).
    pub x: f32,
    pub width: f32,
}

impl ColumnSlot {
    /// Right edge of the column.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Immutable per-reload layout table.
#[derive(Debug, Clone)]
pub struct GridLayout {
    columns: Vec<ColumnSlot>,
    index: HashMap<ColumnAddress, usize>,
    time_range: TimeSpan,
    unit: LayoutUnit,
    gutter_width: f32,
    spacing: f32,
    total_width: f32,
    total_height: f32,
}

impl GridLayout {
    /// Build the table in a single pass over sections and columns in
    /// declaration order.
    ///
    /// Each column's x offset is the running total of the gutter, prior
    /// widths, and the spacing between consecutive columns (no trailing
    /// spacing). Total height is the ceiling granule count of the time
    /// range times the granule height.
    pub fn build(
        section_count: u32,
        columns_per_section: impl Fn(u32) -> u32,
        width_of: impl Fn(ColumnAddress) -> f32,
        spacing: f32,
        gutter_width: f32,
        time_range: TimeSpan,
        unit: LayoutUnit,
    ) -> Self {
        let mut columns = Vec::new();
        let mut index = HashMap::new();
        let mut x = gutter_width;
        let mut first = true;

        for section in 0..section_count {
            for column in 0..columns_per_section(section) {
                let address = ColumnAddress::new(section, column);
                if !first {
                    x += spacing;
                }
                first = false;
                let width = width_of(address);
                index.insert(address, columns.len());
                columns.push(ColumnSlot { address, x, width });
                x += width;
            }
        }

        let total_width = x;
        let total_height = unit.content_height(&time_range);

        Self {
            columns,
            index,
            time_range,
            unit,
            gutter_width,
            spacing,
            total_width,
            total_height,
        }
    }

    pub fn time_range(&self) -> TimeSpan {
        self.time_range
    }

    pub fn unit(&self) -> &LayoutUnit {
        &self.unit
    }

    pub fn gutter_width(&self) -> f32 {
        self.gutter_width
    }

    pub fn column_spacing(&self) -> f32 {
        self.spacing
    }

    /// Total scrollable content width (gutter and inter-column spacing
    /// included, no trailing spacing).
    pub fn total_width(&self) -> f32 {
        self.total_width
    }

    /// Total scrollable content height.
    pub fn total_height(&self) -> f32 {
        self.total_height
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in layout order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSlot> {
        self.columns.iter()
    }

    /// Horizontal slot of a column, if it was declared at build time.
    pub fn slot(&self, address: ColumnAddress) -> Option<ColumnSlot> {
        self.index.get(&address).and_then(|i| self.columns.get(*i).copied())
    }

    /// Find the column at an x position (binary search): the last column
    /// whose left edge is at or before `x`. Positions left of the first
    /// column clamp to the first column, positions past the last clamp to
    /// the last. Returns `None` only for an empty table.
    pub fn column_at(&self, x: f32) -> Option<ColumnAddress> {
        if self.columns.is_empty() {
            return None;
        }
        let after = self.columns.partition_point(|slot| slot.x <= x);
        let idx = after.saturating_sub(1);
        self.columns.get(idx).map(|slot| slot.address)
    }

    /// Vertical pixel offset of an instant relative to the top of the
    /// content (nearest rounding).
    pub fn offset_of(&self, instant: Instant) -> f32 {
        self.unit.pixel_offset(self.time_range.start(), instant)
    }

    /// Instant at a vertical content offset (nearest granule).
    pub fn instant_at(&self, y: f32) -> Instant {
        self.time_range.start() + Duration::minutes(self.unit.minutes_for_pixels(y))
    }

    /// Content-coordinate frame for an event span inside a column.
    pub fn frame_for(&self, address: ColumnAddress, span: &TimeSpan) -> Option<Rect> {
        let slot = self.slot(address)?;
        Some(Rect::new(
            slot.x,
            self.offset_of(span.start()),
            slot.width,
            self.unit.pixel_height(span.duration_seconds()),
        ))
    }
}
