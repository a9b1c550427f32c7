pub mod metrics;

pub use metrics::{LookupCounts, LookupMetrics};
