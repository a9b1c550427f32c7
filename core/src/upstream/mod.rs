//! Access to the racing-data API and an in-memory stand-in for it.

pub mod fixture;
pub mod openf1;

pub use fixture::FixtureSource;
pub use openf1::{OpenF1Client, DEFAULT_BASE_URL};

use crate::model::{Driver, DriverNumber, Stint};
use crate::sessions::SessionKey;
use async_trait::async_trait;
use log::debug;

/// Failure to obtain an answer from upstream.
#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of one upstream read.
///
/// A missing record and an unreachable upstream are kept apart so callers can
/// decide how to present each.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Found(T),
    NotFound,
    TransportError(UpstreamError),
}

impl<T> FetchOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            FetchOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Found(value) => FetchOutcome::Found(f(value)),
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::TransportError(err) => FetchOutcome::TransportError(err),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> FetchOutcome<U>) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Found(value) => f(value),
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::TransportError(err) => FetchOutcome::TransportError(err),
        }
    }
}

impl<T> FetchOutcome<Vec<T>> {
    /// Keeps only the first element of an upstream array.
    pub fn first(self) -> FetchOutcome<T> {
        self.and_then(|items| match items.into_iter().next() {
            Some(item) => FetchOutcome::Found(item),
            None => FetchOutcome::NotFound,
        })
    }
}

#[async_trait]
pub trait DriverSource: Send + Sync {
    async fn driver_by_number(&self, number: DriverNumber) -> FetchOutcome<Driver>;
}

#[async_trait]
pub trait StintSource: Send + Sync {
    async fn stints_for_session(&self, session: SessionKey) -> FetchOutcome<Vec<Stint>>;
}

/// Anything that can serve both drivers and stints.
pub trait RacingData: DriverSource + StintSource {}

impl<T: DriverSource + StintSource> RacingData for T {}

/// Resolves a raw driver-number parameter to a driver.
///
/// Input that is not a positive integer never reaches the source.
pub async fn lookup_driver<S>(source: &S, raw: &str) -> FetchOutcome<Driver>
where
    S: DriverSource + ?Sized,
{
    match raw.parse::<DriverNumber>() {
        Ok(number) => source.driver_by_number(number).await,
        Err(err) => {
            debug!("skipping driver lookup: {err}");
            FetchOutcome::NotFound
        }
    }
}
