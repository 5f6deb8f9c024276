//! The drag-edit state machine.
//!
//! At most one event is edited or created at a time. The engine is an
//! explicit tagged state (`Ready` / one active session) with a single
//! transition surface, so it can be driven and tested without any
//! input-device plumbing: the embedding feeds it abstract vertical drag
//! deltas for one of three handles and reads back frames and spans.
//!
//! The engine owns no cells and performs no callbacks — the grid facade
//! routes its outcomes to the arena and the observer.

pub mod create;

use chrono::Duration;
use log::debug;

use crate::geometry::Rect;
use crate::model::{CellId, ColumnAddress, Instant, TimeSpan};
use crate::unit::LayoutUnit;

/// One of the three drag targets on an event block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    /// The whole block: shifts, never resizes.
    Body,
    /// The top edge: moves the start.
    StartEdge,
    /// The bottom edge: moves the end.
    EndEdge,
}

/// Whether the session edits an existing event or a freshly created one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Editing,
    Creating,
}

/// The live state of one edit/create interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub cell: CellId,
    pub column: ColumnAddress,
    pub mode: EditMode,
    /// Span at the start of the current drag (rebaselined by `end_drag`).
    pub original_span: TimeSpan,
    /// Frame at the start of the current drag (rebaselined by `end_drag`).
    pub original_frame: Rect,
    /// Span as of the latest drag delta.
    pub current_span: TimeSpan,
    /// Handle of the drag in progress, `None` between drags.
    pub active_handle: Option<DragHandle>,
}

impl EditSession {
    pub fn new(
        cell: CellId,
        column: ColumnAddress,
        mode: EditMode,
        span: TimeSpan,
        frame: Rect,
    ) -> Self {
        Self {
            cell,
            column,
            mode,
            original_span: span,
            original_frame: frame,
            current_span: span,
            active_handle: None,
        }
    }
}

/// `Ready` or exactly one active session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Ready,
    Active(EditSession),
}

/// What one drag delta produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    /// The frame to display while the drag is in flight (free-form, not
    /// yet snapped).
    pub frame: Rect,
    /// The new span, present only when it differs from the previously
    /// derived one — the dedupe that keeps `on_edit` from firing twice
    /// for the same value.
    pub changed: Option<TimeSpan>,
}

/// The state machine. Driving `drag`/`end_drag` while `Ready` is a
/// contract violation and aborts.
#[derive(Debug, Default)]
pub struct EditEngine {
    state: EditState,
}

impl EditEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EditState::Active(_))
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Active(session) => Some(session),
            EditState::Ready => None,
        }
    }

    /// Start a session. Any prior session is displaced and returned so the
    /// caller can tear it down first (exclusivity: the old cell gets its
    /// end-edit callback before the new one begins).
    pub fn begin(&mut self, session: EditSession) -> Option<EditSession> {
        debug!(
            "begin {:?} session for cell {:?} in column {:?}",
            session.mode, session.cell, session.column
        );
        let displaced = self.take_session();
        self.state = EditState::Active(session);
        displaced
    }

    /// Apply a vertical drag delta for one handle.
    ///
    /// The new frame derives from the drag-start frame; edge handles clamp
    /// so the block never shrinks below one granule's height. The frame is
    /// then read back into a time span with nearest-granule rounding.
    #[allow(clippy::panic)]
    pub fn drag(&mut self, handle: DragHandle, delta_y: f32, unit: &LayoutUnit) -> DragOutcome {
        let EditState::Active(session) = &mut self.state else {
            panic!("drag delta received with no active edit session");
        };

        let min_height = unit.pixels_per_granule();
        let origin = session.original_frame;
        let frame = match handle {
            DragHandle::Body => Rect::new(origin.x, origin.y + delta_y, origin.width, origin.height),
            DragHandle::StartEdge => {
                let delta = delta_y.min(origin.height - min_height);
                Rect::new(origin.x, origin.y + delta, origin.width, origin.height - delta)
            }
            DragHandle::EndEdge => {
                let height = (origin.height + delta_y).max(min_height);
                Rect::new(origin.x, origin.y, origin.width, height)
            }
        };
        session.active_handle = Some(handle);

        let start_delta = unit.minutes_for_pixels(frame.y - origin.y);
        let duration = unit.minutes_for_pixels(frame.height);
        let start = session.original_span.start() + Duration::minutes(start_delta);
        let changed = match TimeSpan::from_start(start, Duration::minutes(duration)) {
            Ok(span) if span != session.current_span => {
                session.current_span = span;
                Some(span)
            }
            _ => None,
        };

        DragOutcome { frame, changed }
    }

    /// Finish the drag in flight: snap the frame to exactly what the
    /// quantized span produces (removing sub-granule slack) and make the
    /// result the baseline for the next drag. The session stays active.
    ///
    /// `range_start` anchors the vertical axis — the instant at content
    /// y = 0.
    #[allow(clippy::panic)]
    pub fn end_drag(&mut self, unit: &LayoutUnit, range_start: Instant) -> Rect {
        let EditState::Active(session) = &mut self.state else {
            panic!("end_drag received with no active edit session");
        };

        let snapped = Rect::new(
            session.original_frame.x,
            unit.pixel_offset(range_start, session.current_span.start()),
            session.original_frame.width,
            unit.pixel_height(session.current_span.duration_seconds()),
        );
        session.original_frame = snapped;
        session.original_span = session.current_span;
        session.active_handle = None;
        snapped
    }

    /// Tear the session down and return to `Ready`. Safe to call in any
    /// state — this is also the path for asynchronous interrupts (the
    /// edited cell getting recycled out from under the session).
    pub fn end(&mut self) -> Option<EditSession> {
        let ended = self.take_session();
        if let Some(session) = &ended {
            debug!("end {:?} session for cell {:?}", session.mode, session.cell);
        }
        ended
    }

    fn take_session(&mut self) -> Option<EditSession> {
        match std::mem::take(&mut self.state) {
            EditState::Active(session) => Some(session),
            EditState::Ready => None,
        }
    }
}
