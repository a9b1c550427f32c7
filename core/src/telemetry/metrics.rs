use crate::upstream::FetchOutcome;
use serde::Serialize;
use std::sync::Mutex;

/// Counts upstream lookups by outcome.
pub struct LookupMetrics {
    inner: Mutex<LookupCounts>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LookupCounts {
    pub found: usize,
    pub not_found: usize,
    pub transport_errors: usize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LookupCounts::default()),
        }
    }

    pub fn record<T>(&self, outcome: &FetchOutcome<T>) {
        if let Ok(mut counts) = self.inner.lock() {
            match outcome {
                FetchOutcome::Found(_) => counts.found += 1,
                FetchOutcome::NotFound => counts.not_found += 1,
                FetchOutcome::TransportError(_) => counts.transport_errors += 1,
            }
        }
    }

    pub fn snapshot(&self) -> LookupCounts {
        if let Ok(counts) = self.inner.lock() {
            *counts
        } else {
            LookupCounts::default()
        }
    }
}

impl Default for LookupMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;

    #[test]
    fn outcomes_are_counted_separately() {
        let metrics = LookupMetrics::new();
        metrics.record(&FetchOutcome::Found(1));
        metrics.record::<u32>(&FetchOutcome::NotFound);
        metrics.record::<u32>(&FetchOutcome::NotFound);
        metrics.record::<u32>(&FetchOutcome::TransportError(UpstreamError::Status(500)));

        assert_eq!(
            metrics.snapshot(),
            LookupCounts {
                found: 1,
                not_found: 2,
                transport_errors: 1,
            }
        );
    }
}
