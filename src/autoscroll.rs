//! Edge-proximity auto-scrolling during drags.
//!
//! While an edit or create drag is active and the touch point nears a
//! viewport edge, each host tick yields a scroll delta proportional to
//! proximity. The assistant itself is stateless and cooperative: the host
//! drives it once per display refresh and stops as soon as it reports no
//! remaining pull (or the drag ends).

use crate::geometry::{Point, Size};

/// Per-edge proximity in `[0, 1]`: zero beyond the threshold fraction,
/// rising to one as the touch reaches (or crosses) the edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeStrengths {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeStrengths {
    /// Compute strengths for a touch point in viewport coordinates.
    pub fn compute(touch: Point, viewport: Size, edge_fraction: f32) -> Self {
        let horizontal_band = viewport.width * edge_fraction;
        let vertical_band = viewport.height * edge_fraction;
        Self {
            top: strength(touch.y, vertical_band),
            left: strength(touch.x, horizontal_band),
            bottom: strength(viewport.height - touch.y, vertical_band),
            right: strength(viewport.width - touch.x, horizontal_band),
        }
    }

    /// Whether any edge is pulling.
    pub fn any(&self) -> bool {
        self.top > 0.0 || self.left > 0.0 || self.bottom > 0.0 || self.right > 0.0
    }
}

/// Strength for one edge from the distance to it: 0 at or beyond the band,
/// 1 at the edge, clamped for points past it.
fn strength(distance: f32, band: f32) -> f32 {
    if band <= 0.0 {
        return 0.0;
    }
    ((band - distance) / band).clamp(0.0, 1.0)
}

/// Produces per-tick scroll deltas from edge proximity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScroller {
    /// Fraction of each viewport dimension that counts as "near the edge".
    pub edge_fraction: f32,
    /// Scroll speed at the faint edge of the band, px/s.
    pub min_speed: f32,
    /// Scroll speed at (or past) the edge itself, px/s.
    pub max_speed: f32,
}

impl Default for AutoScroller {
    fn default() -> Self {
        Self {
            edge_fraction: 0.15,
            min_speed: 32.0,
            max_speed: 512.0,
        }
    }
}

impl AutoScroller {
    /// One scheduling tick: the scroll delta for `elapsed` seconds, or
    /// `None` when no edge is pulling (the signal to stop ticking).
    /// Clamping the applied offset to the content's scroll bounds is the
    /// caller's job.
    pub fn tick(&self, touch: Point, viewport: Size, elapsed: f32) -> Option<(f32, f32)> {
        let strengths = EdgeStrengths::compute(touch, viewport, self.edge_fraction);
        if !strengths.any() {
            return None;
        }
        let dx = (self.speed(strengths.right) - self.speed(strengths.left)) * elapsed;
        let dy = (self.speed(strengths.bottom) - self.speed(strengths.top)) * elapsed;
        Some((dx, dy))
    }

    /// Speed for one edge: zero when idle, otherwise interpolated between
    /// the configured minimum and maximum.
    fn speed(&self, strength: f32) -> f32 {
        if strength <= 0.0 {
            0.0
        } else {
            (self.max_speed - self.min_speed) * strength + self.min_speed
        }
    }
}
