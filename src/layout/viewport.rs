//! Viewport state: scroll offset, visible size, and the expanded
//! virtualization window.

use crate::geometry::{Point, Size};

use super::GridLayout;

/// The visible area of the grid in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates.
    pub scroll_x: f32,
    /// Vertical scroll position in content coordinates.
    pub scroll_y: f32,
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// The visible horizontal window `[lo, hi]` in content coordinates.
    pub fn visible_window(&self) -> (f32, f32) {
        (self.scroll_x, self.scroll_x + self.width)
    }

    /// The horizontal window widened to `width × expansion_factor`,
    /// centered on the viewport's horizontal center. A factor of 1 is the
    /// visible window itself. Clamping to scroll bounds is the caller's
    /// concern, not this method's.
    pub fn expanded_window(&self, expansion_factor: f32) -> (f32, f32) {
        let extra = self.width * (expansion_factor - 1.0) / 2.0;
        (self.scroll_x - extra, self.scroll_x + self.width + extra)
    }

    /// Clamp scroll position to the layout's valid range.
    pub fn clamp_scroll(&mut self, layout: &GridLayout) {
        let max_x = (layout.total_width() - self.width).max(0.0);
        let max_y = (layout.total_height() - self.height).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    /// Scroll by delta amounts, clamped.
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, layout: &GridLayout) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(layout);
    }

    /// Set absolute scroll position, clamped.
    pub fn set_scroll(&mut self, x: f32, y: f32, layout: &GridLayout) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(layout);
    }

    /// Convert a viewport-relative point to content coordinates.
    pub fn to_content(&self, point: Point) -> Point {
        Point::new(point.x + self.scroll_x, point.y + self.scroll_y)
    }

    /// Convert a content point to viewport-relative coordinates.
    pub fn to_viewport(&self, point: Point) -> Point {
        Point::new(point.x - self.scroll_x, point.y - self.scroll_y)
    }
}
