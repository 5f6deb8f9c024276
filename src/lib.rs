//! Embeddable schedule grid core: layout, virtualization, and editing
//! for a scrollable multi-column time grid.
//!
//! The crate is headless. It computes where event blocks go (columns
//! across, time of day down), keeps only the columns near the viewport
//! materialized, recycles their cells through a reuse pool, and runs the
//! drag-to-edit / drag-to-create state machine. Rendering, gesture
//! recognition, and animation belong to the host, which talks to the grid
//! through two traits: [`GridDataSource`] feeds it, [`GridObserver`]
//! hears about every side effect.
//!
//! ```no_run
//! use timegrid::{ScheduleGrid, GridDataSource, GridObserver, DEFAULT_REUSE_ID};
//! # fn demo<S: GridDataSource, O: GridObserver<()>>(source: S, observer: O) {
//! let mut grid = ScheduleGrid::with_source(source, observer);
//! grid.register_cell(DEFAULT_REUSE_ID, || ());
//! grid.set_viewport_size(800.0, 600.0);
//! grid.reload_data();
//! grid.scroll_by(240.0, 0.0);
//! # }
//! ```

pub mod autoscroll;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod model;
pub mod pool;
pub mod source;
pub mod survivor;
pub mod unit;

pub use autoscroll::{AutoScroller, EdgeStrengths};
pub use edit::{DragHandle, EditMode, EditSession, EditState};
pub use error::{GridError, Result};
pub use geometry::{Point, Rect, Size};
pub use grid::{ScheduleGrid, DEFAULT_EXPANSION_FACTOR};
pub use layout::{ColumnSlot, GridLayout, Viewport};
pub use model::{Cell, CellId, ColumnAddress, Event, Instant, TimeSpan};
pub use pool::{CellPool, DEFAULT_REUSE_ID};
pub use source::{GridDataSource, GridObserver};
pub use survivor::{SurvivorManager, Verdict};
pub use unit::LayoutUnit;
