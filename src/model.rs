//! Core value types: instants, time spans, column addresses, events, and
//! the cell records managed by the grid.
//!
//! Events are never owned authoritatively here — the host's model is the
//! source of truth. The grid holds transient copies inside cell records and
//! pushes committed changes back through the observer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geometry::Rect;

/// An absolute point in time.
pub type Instant = DateTime<Utc>;

/// A closed time interval with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    start: Instant,
    end: Instant,
}

impl TimeSpan {
    /// Create a span; fails unless `start < end`.
    pub fn new(start: Instant, end: Instant) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(GridError::EmptySpan(format!("{start} ..< {end}")))
        }
    }

    /// Create a span from a start and a positive duration.
    pub fn from_start(start: Instant, duration: Duration) -> Result<Self> {
        Self::new(start, start + duration)
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    /// Duration in whole seconds (always positive).
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Whether the instant falls inside the span (start inclusive,
    /// end exclusive).
    pub fn contains(&self, instant: Instant) -> bool {
        instant >= self.start && instant < self.end
    }

    /// The same span moved by `delta`.
    pub fn shifted(&self, delta: Duration) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

/// Identifies a vertical lane: a column within a section.
///
/// Ordering follows iteration order during layout (section-major), so the
/// address doubles as a stable sort key across reloads as long as the data
/// source reports stable counts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ColumnAddress {
    pub section: u32,
    pub column: u32,
}

impl ColumnAddress {
    pub fn new(section: u32, column: u32) -> Self {
        Self { section, column }
    }
}

/// A time-bounded block displayed in a column.
///
/// `key` is the host's opaque reference to its own model object; the grid
/// only threads it through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub span: TimeSpan,
    pub editable: bool,
    pub key: u64,
}

impl Event {
    pub fn new(span: TimeSpan, editable: bool, key: u64) -> Self {
        Self {
            span,
            editable,
            key,
        }
    }
}

/// Stable handle to a cell record in the grid's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub(crate) u64);

/// A cell record: the host's view handle plus the geometry and event the
/// grid manages for it.
///
/// The `column` back-reference is non-owning; the grid's live-column map
/// owns the forward direction. A pooled (released) cell has no event and
/// no column.
#[derive(Debug)]
pub struct Cell<V> {
    /// The host's view object, created by a registered factory.
    pub view: V,
    reuse_id: String,
    /// Frame in content coordinates.
    pub frame: Rect,
    /// The displayed event; `None` while pooled.
    pub event: Option<Event>,
    /// Owning column; `None` while pooled.
    pub column: Option<ColumnAddress>,
}

impl<V> Cell<V> {
    pub(crate) fn new(view: V, reuse_id: &str) -> Self {
        Self {
            view,
            reuse_id: reuse_id.to_string(),
            frame: Rect::default(),
            event: None,
            column: None,
        }
    }

    /// The reuse identifier the cell was stamped with at creation.
    pub fn reuse_id(&self) -> &str {
        &self.reuse_id
    }

    /// Clear event and column before the cell goes back to the pool.
    pub(crate) fn prepare_for_reuse(&mut self) {
        self.event = None;
        self.column = None;
    }
}
