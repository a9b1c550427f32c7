//! Commonly used types, re-exported for the dashboard front-ends.

pub use crate::model::{Compound, Driver, DriverNumber, Stint};
pub use crate::sessions::{resolve_session_key, SessionKey};
pub use crate::shell::{Refresh, TyreBoard};
pub use crate::stints::{normalize, ChartRow, Segment, SegmentColor, SegmentColorTable, TyreChart};
pub use crate::telemetry::LookupMetrics;
pub use crate::upstream::{
    lookup_driver, DriverSource, FetchOutcome, RacingData, StintSource, UpstreamError,
};
