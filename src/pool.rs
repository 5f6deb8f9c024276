//! Reuse pool for released cells.
//!
//! Cells released by virtualization are parked here keyed by their reuse
//! identifier and handed back out front-first (FIFO), so hosts avoid
//! reconstructing view objects on every scroll. A pool miss invokes the
//! registered factory; requesting an identifier with no registered factory
//! is a contract violation.

use std::collections::{HashMap, VecDeque};

use log::trace;

use crate::model::Cell;

/// Reuse identifier used when the data source does not distinguish
/// templates.
pub const DEFAULT_REUSE_ID: &str = "timegrid.event-cell";

type Factory<V> = Box<dyn Fn() -> V>;

/// Caches released cells and creates new ones on miss.
pub struct CellPool<V> {
    factories: HashMap<String, Factory<V>>,
    idle: HashMap<String, VecDeque<Cell<V>>>,
}

impl<V> Default for CellPool<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CellPool<V> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            idle: HashMap::new(),
        }
    }

    /// Register the factory used on pool misses for `reuse_id`.
    ///
    /// Registering the same id again replaces the factory; already pooled
    /// cells are unaffected.
    pub fn register(&mut self, reuse_id: impl Into<String>, factory: impl Fn() -> V + 'static) {
        self.factories.insert(reuse_id.into(), Box::new(factory));
    }

    /// Whether a factory is registered for `reuse_id`.
    pub fn is_registered(&self, reuse_id: &str) -> bool {
        self.factories.contains_key(reuse_id)
    }

    /// Park a released cell under its own stamped reuse id. The cell's
    /// event and column references are cleared first.
    pub fn enqueue(&mut self, mut cell: Cell<V>) {
        cell.prepare_for_reuse();
        let key = cell.reuse_id().to_string();
        self.idle.entry(key).or_default().push_back(cell);
    }

    /// Pop the oldest released cell for `reuse_id`, if any.
    pub fn dequeue(&mut self, reuse_id: &str) -> Option<Cell<V>> {
        self.idle.get_mut(reuse_id).and_then(VecDeque::pop_front)
    }

    /// Dequeue a pooled cell or build a fresh one via the registered
    /// factory, stamping it with `reuse_id`.
    ///
    /// Aborts if no factory was registered for the id — that is a wiring
    /// bug in the embedding, not a runtime condition.
    #[allow(clippy::panic)]
    pub fn obtain(&mut self, reuse_id: &str) -> Cell<V> {
        if let Some(cell) = self.dequeue(reuse_id) {
            trace!("pool hit for reuse id `{reuse_id}`");
            return cell;
        }
        let Some(factory) = self.factories.get(reuse_id) else {
            panic!("no cell factory registered for reuse id `{reuse_id}`");
        };
        trace!("pool miss for reuse id `{reuse_id}`, invoking factory");
        Cell::new(factory(), reuse_id)
    }

    /// Number of parked cells for an id (test/diagnostic hook).
    pub fn idle_count(&self, reuse_id: &str) -> usize {
        self.idle.get(reuse_id).map_or(0, VecDeque::len)
    }

    /// Drop all parked cells, keeping registered factories.
    pub fn drain(&mut self) {
        self.idle.clear();
    }
}
