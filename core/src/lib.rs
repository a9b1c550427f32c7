//! Data layer of the F1 stint dashboard.
//!
//! Drivers and stints are read from the OpenF1 API (or an in-memory fixture),
//! and stints are reshaped into fixed-width rows for stacked-bar charts.

pub mod model;
pub mod prelude;
pub mod sessions;
pub mod shell;
pub mod stints;
pub mod telemetry;
pub mod upstream;

pub use prelude::{FetchOutcome, TyreBoard, TyreChart};
