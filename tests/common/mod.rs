//! Common test utilities: a scriptable data source and a recording
//! observer.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, TimeZone, Utc};
use timegrid::{
    Cell, CellId, ColumnAddress, Event, GridDataSource, GridObserver, Instant, LayoutUnit,
    ScheduleGrid, TimeSpan, DEFAULT_REUSE_ID,
};

/// The displayed day used across the test suite: 08:00–20:00 UTC.
pub fn day_range() -> TimeSpan {
    TimeSpan::new(at(8, 0), at(20, 0)).unwrap()
}

/// An instant on the test day.
pub fn at(hour: u32, minute: u32) -> Instant {
    Utc.with_ymd_and_hms(2026, 3, 9, hour, minute, 0).unwrap()
}

/// 15-minute granules of 8 px, hour-long default creations.
pub fn test_unit() -> LayoutUnit {
    LayoutUnit::new(15, 8.0, 60).unwrap()
}

/// A data source scripted from a table: uniform column widths, events
/// added per column with the builder.
pub struct TestSource {
    pub columns_per_section: Vec<u32>,
    pub width: f32,
    pub spacing: f32,
    pub gutter: f32,
    pub range: TimeSpan,
    pub unit: LayoutUnit,
    pub events: HashMap<ColumnAddress, Vec<Event>>,
}

impl TestSource {
    pub fn new(columns_per_section: &[u32]) -> Self {
        Self {
            columns_per_section: columns_per_section.to_vec(),
            width: 44.0,
            spacing: 2.0,
            gutter: 0.0,
            range: day_range(),
            unit: test_unit(),
            events: HashMap::new(),
        }
    }

    pub fn with_column_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_gutter(mut self, gutter: f32) -> Self {
        self.gutter = gutter;
        self
    }

    /// Add an editable event to a column, starting at `hour:minute` and
    /// lasting `minutes`.
    pub fn with_event(
        mut self,
        section: u32,
        column: u32,
        hour: u32,
        minute: u32,
        minutes: i64,
        key: u64,
    ) -> Self {
        let span = TimeSpan::from_start(at(hour, minute), Duration::minutes(minutes)).unwrap();
        self.events
            .entry(ColumnAddress::new(section, column))
            .or_default()
            .push(Event::new(span, true, key));
        self
    }

    /// Add a locked (non-editable) event.
    pub fn with_locked_event(
        mut self,
        section: u32,
        column: u32,
        hour: u32,
        minute: u32,
        minutes: i64,
        key: u64,
    ) -> Self {
        let span = TimeSpan::from_start(at(hour, minute), Duration::minutes(minutes)).unwrap();
        self.events
            .entry(ColumnAddress::new(section, column))
            .or_default()
            .push(Event::new(span, false, key));
        self
    }
}

impl GridDataSource for TestSource {
    fn time_range(&self) -> TimeSpan {
        self.range
    }

    fn layout_unit(&self) -> LayoutUnit {
        self.unit
    }

    fn column_spacing(&self) -> f32 {
        self.spacing
    }

    fn time_gutter_width(&self) -> f32 {
        self.gutter
    }

    fn section_count(&self) -> u32 {
        self.columns_per_section.len() as u32
    }

    fn column_count(&self, section: u32) -> u32 {
        self.columns_per_section
            .get(section as usize)
            .copied()
            .unwrap_or(0)
    }

    fn column_width(&self, _address: ColumnAddress) -> f32 {
        self.width
    }

    fn events_for(&self, address: ColumnAddress) -> Vec<Event> {
        self.events.get(&address).cloned().unwrap_or_default()
    }
}

/// Everything the grid tells its observer, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    BeginEdit(CellId),
    Edit(CellId, TimeSpan),
    EndEdit(CellId, TimeSpan),
    BeginCreate(ColumnAddress, TimeSpan),
    CreateUpdated(CellId, TimeSpan),
    ColumnsChanged {
        entering: Vec<ColumnAddress>,
        leaving: Vec<ColumnAddress>,
    },
}

/// Observer that records every callback for later assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub emissions: Vec<Emission>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spans only make sense on cells that carry an event; tests always
    /// exercise such cells.
    fn span_of<V>(cell: &Cell<V>) -> TimeSpan {
        cell.event.expect("cell should carry an event").span
    }

    pub fn columns_changed_count(&self) -> usize {
        self.emissions
            .iter()
            .filter(|e| matches!(e, Emission::ColumnsChanged { .. }))
            .count()
    }
}

impl<V> GridObserver<V> for RecordingObserver {
    fn on_begin_edit(&mut self, id: CellId, _cell: &Cell<V>) {
        self.emissions.push(Emission::BeginEdit(id));
    }

    fn on_edit(&mut self, id: CellId, cell: &Cell<V>) {
        self.emissions.push(Emission::Edit(id, Self::span_of(cell)));
    }

    fn on_end_edit(&mut self, id: CellId, cell: &Cell<V>) {
        self.emissions
            .push(Emission::EndEdit(id, Self::span_of(cell)));
    }

    fn on_begin_create(&mut self, event: &Event, column: ColumnAddress) {
        self.emissions.push(Emission::BeginCreate(column, event.span));
    }

    fn on_create_updated(&mut self, id: CellId, cell: &Cell<V>) {
        self.emissions
            .push(Emission::CreateUpdated(id, Self::span_of(cell)));
    }

    fn on_columns_changed(
        &mut self,
        entering: &BTreeSet<ColumnAddress>,
        leaving: &BTreeSet<ColumnAddress>,
    ) {
        self.emissions.push(Emission::ColumnsChanged {
            entering: entering.iter().copied().collect(),
            leaving: leaving.iter().copied().collect(),
        });
    }
}

/// A fully wired grid over a `TestSource` with the default cell factory
/// registered and a concrete viewport size, reloaded and ready.
pub fn ready_grid(
    source: TestSource,
    width: f32,
    height: f32,
) -> ScheduleGrid<u32, TestSource, RecordingObserver> {
    let mut grid = ScheduleGrid::with_source(source, RecordingObserver::new());
    grid.register_cell(DEFAULT_REUSE_ID, || 0_u32);
    grid.set_viewport_size(width, height);
    grid.reload_data();
    grid
}

/// Addresses in one section, `(section, 0..count)`.
pub fn addrs(section: u32, columns: impl IntoIterator<Item = u32>) -> Vec<ColumnAddress> {
    columns
        .into_iter()
        .map(|c| ColumnAddress::new(section, c))
        .collect()
}
