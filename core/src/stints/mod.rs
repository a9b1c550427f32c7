//! Reshaping of raw stints into stacked-bar rows.

pub mod chart;
pub mod segment;

pub use chart::{driver_segments, normalize, segment_key, ChartRow, SegmentColorTable, TyreChart};
pub use segment::{Segment, SegmentColor, TRANSPARENT};
