//! Host interface traits: the pull-based data source and the push-based
//! observer.
//!
//! Both are synchronous and run on the single logical thread that drives
//! the grid; neither may call back into the grid from inside a callback
//! (the grid owns the observer, so the borrow checker enforces this).

use std::collections::BTreeSet;

use crate::model::{Cell, CellId, ColumnAddress, Event, TimeSpan};
use crate::pool::DEFAULT_REUSE_ID;
use crate::unit::LayoutUnit;

/// Supplies the grid's structure and contents. Invoked during reload and
/// whenever columns are materialized; the host's model stays the single
/// source of truth for events.
pub trait GridDataSource {
    /// The full displayed time range (vertical axis).
    fn time_range(&self) -> TimeSpan;

    /// Quantization for all pixel⇄time conversions.
    fn layout_unit(&self) -> LayoutUnit;

    /// Horizontal gap between consecutive columns.
    fn column_spacing(&self) -> f32;

    /// Width reserved at the left for the host's time labels.
    fn time_gutter_width(&self) -> f32 {
        0.0
    }

    fn section_count(&self) -> u32;

    fn column_count(&self, section: u32) -> u32;

    fn column_width(&self, address: ColumnAddress) -> f32;

    /// Events to display in a column, invoked each time the column is
    /// materialized.
    fn events_for(&self, address: ColumnAddress) -> Vec<Event>;

    /// Which registered cell template to use for an event.
    fn reuse_id_for(&self, _address: ColumnAddress, _event: &Event) -> String {
        DEFAULT_REUSE_ID.to_string()
    }
}

/// Receives the grid's side effects. All methods default to no-ops so
/// hosts implement only what they render.
#[allow(unused_variables)]
pub trait GridObserver<V> {
    /// An edit session started; the host shows its ghost/overlay chrome.
    fn on_begin_edit(&mut self, id: CellId, cell: &Cell<V>) {}

    /// The edited event's span changed (fired once per distinct value).
    fn on_edit(&mut self, id: CellId, cell: &Cell<V>) {}

    /// The session ended; `cell.event` carries the committed, snapped
    /// span. Also fired when the session is torn down by an interrupt.
    fn on_end_edit(&mut self, id: CellId, cell: &Cell<V>) {}

    /// A create session synthesized a new event in a column.
    fn on_begin_create(&mut self, event: &Event, column: ColumnAddress) {}

    /// The in-flight created event changed.
    fn on_create_updated(&mut self, id: CellId, cell: &Cell<V>) {}

    /// The live-column set changed; the host inserts/removes column
    /// backing views accordingly.
    fn on_columns_changed(
        &mut self,
        entering: &BTreeSet<ColumnAddress>,
        leaving: &BTreeSet<ColumnAddress>,
    ) {
    }
}
