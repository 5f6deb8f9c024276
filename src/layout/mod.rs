//! Grid geometry: the per-reload layout table and the scrollable viewport.

pub mod grid_layout;
pub mod viewport;

pub use grid_layout::{ColumnSlot, GridLayout};
pub use viewport::Viewport;
