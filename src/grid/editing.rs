//! Gesture entry points: edit sessions, drag-to-create, and auto-scroll.
//!
//! Callers hand the grid already-recognized gestures (a long-press became
//! `begin_edit`, a pan became `drag` deltas); gesture recognition itself
//! stays in the host.

use log::debug;

use crate::edit::{DragHandle, EditMode, EditSession};
use crate::geometry::Point;
use crate::model::CellId;
use crate::source::{GridDataSource, GridObserver};

use super::ScheduleGrid;

impl<V, S, O> ScheduleGrid<V, S, O>
where
    S: GridDataSource,
    O: GridObserver<V>,
{
    /// Begin editing a live cell. Returns `false` when the cell is gone,
    /// has no event, or its event is not editable. At most one session is
    /// active at a time: a prior session is committed and ended first, so
    /// its `on_end_edit` arrives before the new `on_begin_edit`.
    pub fn begin_edit(&mut self, id: CellId) -> bool {
        let Some(cell) = self.cells.get(&id) else {
            return false;
        };
        let (Some(event), Some(column)) = (cell.event, cell.column) else {
            return false;
        };
        if !event.editable {
            return false;
        }
        let frame = cell.frame;

        self.end_edit();
        self.engine.begin(EditSession::new(
            id,
            column,
            EditMode::Editing,
            event.span,
            frame,
        ));
        if let Some(cell) = self.cells.get(&id) {
            self.observer.on_begin_edit(id, cell);
        }
        true
    }

    /// Start creating an event at a content-coordinate point: the column
    /// under the point's x, starting at the granule under its y, with the
    /// layout unit's default duration. A cell is drawn from the pool and
    /// the session opens in creating mode; the caller drives it with the
    /// same `drag`/`end_drag` calls as an edit.
    ///
    /// Returns the new cell's id, or `None` when the point hits no column
    /// (an empty layout). Panics if `reuse_id` has no registered factory.
    pub fn begin_create(&mut self, point: Point, reuse_id: &str, key: u64) -> Option<CellId> {
        let plan = {
            let layout = self.layout.as_ref()?;
            crate::edit::create::plan_create(layout, point, key)?
        };
        self.end_edit();

        let mut cell = self.pool.obtain(reuse_id);
        cell.event = Some(plan.event);
        cell.column = Some(plan.column);
        cell.frame = plan.frame;
        let id = CellId(self.next_cell);
        self.next_cell += 1;
        self.cells.insert(id, cell);
        self.live.entry(plan.column).or_default().push(id);

        self.engine.begin(EditSession::new(
            id,
            plan.column,
            EditMode::Creating,
            plan.event.span,
            plan.frame,
        ));
        self.observer.on_begin_create(&plan.event, plan.column);
        Some(id)
    }

    /// Apply a vertical drag delta (cumulative from the gesture origin) to
    /// the active session's handle. The cell's frame tracks the finger
    /// free-form; its event span snaps to the nearest granule, and span
    /// changes emit `on_edit` / `on_create_updated`.
    ///
    /// Panics if no session is active.
    pub fn drag(&mut self, handle: DragHandle, delta_y: f32) {
        let Some(unit) = self.layout.as_ref().map(|l| *l.unit()) else {
            return;
        };
        let outcome = self.engine.drag(handle, delta_y, &unit);
        let Some(session) = self.engine.session() else {
            return;
        };
        let (id, mode) = (session.cell, session.mode);

        if let Some(cell) = self.cells.get_mut(&id) {
            cell.frame = outcome.frame;
            if let Some(span) = outcome.changed {
                if let Some(event) = &mut cell.event {
                    event.span = span;
                }
            }
        }
        if outcome.changed.is_some() {
            if let Some(cell) = self.cells.get(&id) {
                match mode {
                    EditMode::Editing => self.observer.on_edit(id, cell),
                    EditMode::Creating => self.observer.on_create_updated(id, cell),
                }
            }
        }
    }

    /// Finish the in-flight drag: snap the cell's frame to its span's
    /// granule geometry and rebaseline the session for the next drag. The
    /// session stays active.
    ///
    /// Panics if no session is active.
    pub fn end_drag(&mut self) {
        let Some((unit, range_start)) = self
            .layout
            .as_ref()
            .map(|l| (*l.unit(), l.time_range().start()))
        else {
            return;
        };
        let snapped = self.engine.end_drag(&unit, range_start);
        if let Some(session) = self.engine.session() {
            let (id, span) = (session.cell, session.current_span);
            if let Some(cell) = self.cells.get_mut(&id) {
                cell.frame = snapped;
                if let Some(event) = &mut cell.event {
                    event.span = span;
                }
            }
        }
    }

    /// Commit and end the active session, emitting `on_end_edit` with the
    /// cell in its final state. No-op when no session is active (both
    /// editing and creating end this way).
    pub fn end_edit(&mut self) {
        let Some(session) = self.engine.end() else {
            return;
        };
        if let Some(cell) = self.cells.get(&session.cell) {
            self.observer.on_end_edit(session.cell, cell);
        }
    }

    /// A tap at a content-coordinate point: taps outside the edited cell
    /// commit and end the session; anything else is ignored.
    pub fn tap(&mut self, point: Point) {
        let Some(id) = self.engine.session().map(|s| s.cell) else {
            return;
        };
        let outside = self
            .cells
            .get(&id)
            .is_none_or(|cell| !cell.frame.contains(point));
        if outside {
            debug!("tap outside edited cell; ending session");
            self.end_edit();
        }
    }

    /// Advance edge auto-scroll by one frame: `touch` is the finger in
    /// viewport coordinates, `elapsed` the seconds since the last tick.
    /// Scrolls when the finger sits in an edge band and a session is
    /// active; returns `false` as the stop signal (finger left the bands,
    /// or the session ended).
    pub fn autoscroll_tick(&mut self, touch: Point, elapsed: f32) -> bool {
        if !self.engine.is_active() {
            return false;
        }
        let Some((dx, dy)) = self.scroller.tick(touch, self.viewport.size(), elapsed) else {
            return false;
        };
        self.scroll_by(dx, dy);
        // Scrolling may have recycled the session's column out.
        self.engine.is_active()
    }
}
