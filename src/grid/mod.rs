//! The schedule grid facade.
//!
//! Owns every component and wires the control flow: the data source feeds
//! the layout table, viewport changes drive the survivor judge, the judge's
//! diff reconciles the live cell arena against the reuse pool, and gesture
//! entry points (in `editing.rs`) route into the edit/create engine.
//!
//! All state transitions run synchronously on the caller's thread; the
//! observer is owned by the grid and cannot re-enter it.

mod editing;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use crate::autoscroll::AutoScroller;
use crate::edit::{EditEngine, EditMode, EditSession};
use crate::layout::{GridLayout, Viewport};
use crate::model::{Cell, CellId, ColumnAddress};
use crate::pool::CellPool;
use crate::source::{GridDataSource, GridObserver};
use crate::survivor::{SurvivorManager, Verdict};

/// Default horizontal window multiplier for virtualization: keep one extra
/// half-viewport of columns alive on each side.
pub const DEFAULT_EXPANSION_FACTOR: f32 = 2.0;

/// A scrollable multi-column schedule grid core.
///
/// `V` is the host's cell view type (created by registered factories),
/// `S` the data source, `O` the observer receiving side effects.
pub struct ScheduleGrid<V, S, O> {
    source: Option<S>,
    observer: O,
    layout: Option<GridLayout>,
    viewport: Viewport,
    survivors: SurvivorManager,
    pool: CellPool<V>,
    cells: HashMap<CellId, Cell<V>>,
    live: BTreeMap<ColumnAddress, Vec<CellId>>,
    engine: EditEngine,
    scroller: AutoScroller,
    expansion_factor: f32,
    next_cell: u64,
}

impl<V, S, O> ScheduleGrid<V, S, O>
where
    S: GridDataSource,
    O: GridObserver<V>,
{
    /// Create a grid with no data source attached yet. Until one is set,
    /// `reload_data` clears state and returns.
    pub fn new(observer: O) -> Self {
        Self {
            source: None,
            observer,
            layout: None,
            viewport: Viewport::new(),
            survivors: SurvivorManager::new(),
            pool: CellPool::new(),
            cells: HashMap::new(),
            live: BTreeMap::new(),
            engine: EditEngine::new(),
            scroller: AutoScroller::default(),
            expansion_factor: DEFAULT_EXPANSION_FACTOR,
            next_cell: 0,
        }
    }

    /// Create a grid with a data source attached.
    pub fn with_source(source: S, observer: O) -> Self {
        let mut grid = Self::new(observer);
        grid.source = Some(source);
        grid
    }

    /// Attach or replace the data source. Takes effect on the next
    /// `reload_data`.
    pub fn set_data_source(&mut self, source: S) {
        self.source = Some(source);
    }

    /// Register a cell factory under a reuse identifier.
    pub fn register_cell(&mut self, reuse_id: impl Into<String>, factory: impl Fn() -> V + 'static) {
        self.pool.register(reuse_id, factory);
    }

    /// Widen or narrow the virtualization window (≥ 1; 1 means exactly
    /// the visible columns).
    pub fn set_expansion_factor(&mut self, factor: f32) {
        assert!(factor >= 1.0, "expansion factor must be >= 1");
        self.expansion_factor = factor;
    }

    /// Replace the auto-scroll tuning.
    pub fn set_autoscroller(&mut self, scroller: AutoScroller) {
        self.scroller = scroller;
    }

    /// Rebuild the layout table from the data source, reset virtualization
    /// state, and rematerialize the visible columns' cells.
    ///
    /// With no data source attached this clears all state and returns.
    /// An active edit session is interrupted first (committed for edits,
    /// silently discarded for in-flight creations).
    pub fn reload_data(&mut self) {
        self.interrupt_session();
        self.live.clear();
        // The live map indexes the arena; on reload every record goes
        // back to the pool, reachable or not.
        for (_, cell) in self.cells.drain() {
            self.pool.enqueue(cell);
        }
        self.survivors.reset();
        self.layout = None;

        let Some(source) = &self.source else {
            debug!("reload with no data source; state cleared");
            return;
        };

        let layout = GridLayout::build(
            source.section_count(),
            |section| source.column_count(section),
            |address| source.column_width(address),
            source.column_spacing(),
            source.time_gutter_width(),
            source.time_range(),
            source.layout_unit(),
        );
        debug!(
            "reload: {} columns, {} x {} content",
            layout.column_count(),
            layout.total_width(),
            layout.total_height()
        );
        self.layout = Some(layout);
        if let Some(layout) = &self.layout {
            self.viewport.clamp_scroll(layout);
        }
        self.after_viewport_change();
    }

    /// Resize the visible area.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
        if let Some(layout) = &self.layout {
            self.viewport.clamp_scroll(layout);
        }
        self.after_viewport_change();
    }

    /// Scroll by a delta, clamped to the content bounds.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) {
        let Some(layout) = &self.layout else { return };
        self.viewport.scroll_by(delta_x, delta_y, layout);
        self.after_viewport_change();
    }

    /// Set the absolute scroll offset, clamped to the content bounds.
    pub fn set_scroll(&mut self, x: f32, y: f32) {
        let Some(layout) = &self.layout else { return };
        self.viewport.set_scroll(x, y, layout);
        self.after_viewport_change();
    }

    /// Scroll so the column (and its first event, vertically) is visible
    /// with `margin` pixels of breathing room, clamped to the valid
    /// range. No-op (returning `None`) when the column or its first event
    /// is absent. Returns the applied offset; animating toward it is the
    /// host's concern.
    pub fn scroll_to_column(&mut self, address: ColumnAddress, margin: f32) -> Option<(f32, f32)> {
        let layout = self.layout.as_ref()?;
        let slot = layout.slot(address)?;
        let first = self
            .source
            .as_ref()?
            .events_for(address)
            .into_iter()
            .next()?;
        let x = slot.x - margin;
        let y = layout.offset_of(first.span.start()) - margin;
        self.viewport.set_scroll(x, y, layout);
        let applied = (self.viewport.scroll_x, self.viewport.scroll_y);
        self.after_viewport_change();
        Some(applied)
    }

    // ---- Accessors ----

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The layout table of the current reload generation, if any.
    pub fn layout(&self) -> Option<&GridLayout> {
        self.layout.as_ref()
    }

    pub fn data_source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Columns currently materialized.
    pub fn survivors(&self) -> &BTreeSet<ColumnAddress> {
        self.survivors.survivors()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell<V>> {
        self.cells.get(&id)
    }

    /// All live cells in column order.
    pub fn visible_cells(&self) -> impl Iterator<Item = (CellId, &Cell<V>)> {
        self.live
            .values()
            .flatten()
            .filter_map(|id| self.cells.get(id).map(|cell| (*id, cell)))
    }

    /// Live cell ids for one column.
    pub fn cells_in_column(&self, address: ColumnAddress) -> &[CellId] {
        self.live.get(&address).map_or(&[], Vec::as_slice)
    }

    /// The active edit session, if any.
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.engine.session()
    }

    pub fn is_editing(&self) -> bool {
        self.engine.is_active()
    }

    // ---- Internals ----

    /// Judge the new viewport and reconcile cells. Also cancels an
    /// in-flight create session whose column lost all visible overlap.
    fn after_viewport_change(&mut self) {
        let creating = self
            .engine
            .session()
            .filter(|s| s.mode == EditMode::Creating)
            .map(|s| (s.cell, s.column));
        if let (Some((id, column)), Some(layout)) = (creating, &self.layout) {
            let (lo, hi) = self.viewport.visible_window();
            let visible = layout
                .slot(column)
                .is_some_and(|slot| slot.x <= hi && slot.right() >= lo);
            if !visible {
                debug!("create session cancelled: column {column:?} scrolled out");
                self.engine.end();
                if let Some(ids) = self.live.get_mut(&column) {
                    ids.retain(|i| *i != id);
                }
                self.cells.remove(&id);
            }
        }

        let verdict = match &self.layout {
            Some(layout) => {
                self.survivors
                    .judge(layout, &self.viewport, self.expansion_factor)
            }
            None => return,
        };
        self.reconcile(verdict);
    }

    /// Apply a judge verdict: recycle leaving columns' cells, materialize
    /// entering columns' cells from the data source.
    fn reconcile(&mut self, verdict: Verdict) {
        if verdict.is_unchanged() {
            return;
        }

        // A session whose column is being recycled is an asynchronous
        // interrupt: commit and end for edits, discard silently for
        // creations.
        if let Some(column) = self.engine.session().map(|s| s.column) {
            if verdict.leaving.contains(&column) {
                self.interrupt_session();
            }
        }

        for column in &verdict.leaving {
            let ids = self.live.remove(column).unwrap_or_default();
            for id in ids {
                if let Some(cell) = self.cells.remove(&id) {
                    self.pool.enqueue(cell);
                }
            }
        }

        if let (Some(layout), Some(source)) = (&self.layout, &self.source) {
            for column in &verdict.entering {
                // A create session may already have parked a cell in a
                // column that was clamped to while off-viewport; keep it
                // when the column is materialized for real.
                let mut ids = self.live.remove(column).unwrap_or_default();
                for event in source.events_for(*column) {
                    let Some(frame) = layout.frame_for(*column, &event.span) else {
                        continue;
                    };
                    let reuse_id = source.reuse_id_for(*column, &event);
                    let mut cell = self.pool.obtain(&reuse_id);
                    cell.event = Some(event);
                    cell.column = Some(*column);
                    cell.frame = frame;
                    let id = CellId(self.next_cell);
                    self.next_cell += 1;
                    self.cells.insert(id, cell);
                    ids.push(id);
                }
                self.live.insert(*column, ids);
            }
        }

        self.observer
            .on_columns_changed(&verdict.entering, &verdict.leaving);
    }

    /// Force-end the active session without a caller on the stack: the
    /// transient-interruption path (reload, recycled-out cell).
    fn interrupt_session(&mut self) {
        let Some(session) = self.engine.end() else { return };
        match session.mode {
            EditMode::Creating => {
                if let Some(ids) = self.live.get_mut(&session.column) {
                    ids.retain(|id| *id != session.cell);
                }
                self.cells.remove(&session.cell);
            }
            EditMode::Editing => {
                if let Some(cell) = self.cells.get(&session.cell) {
                    self.observer.on_end_edit(session.cell, cell);
                }
            }
        }
    }
}
