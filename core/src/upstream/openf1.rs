use super::{DriverSource, FetchOutcome, StintSource, UpstreamError};
use crate::model::{Driver, DriverNumber, Stint};
use crate::sessions::SessionKey;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openf1.org/v1";

/// HTTP client for the OpenF1 API.
///
/// Every call is a single GET; nothing is retried or cached.
#[derive(Debug, Clone)]
pub struct OpenF1Client {
    http: reqwest::Client,
    base_url: String,
}

impl OpenF1Client {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn drivers_url(&self, number: DriverNumber) -> String {
        format!("{}/drivers?driver_number={}", self.base_url, number)
    }

    pub fn stints_url(&self, session: SessionKey) -> String {
        format!("{}/stints?session_key={}", self.base_url, session)
    }

    async fn get_array<T: DeserializeOwned>(&self, url: &str) -> FetchOutcome<Vec<T>> {
        debug!("GET {url}");
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(err) => return FetchOutcome::TransportError(err.into()),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }
        if !status.is_success() {
            warn!("{url} answered {status}");
            return FetchOutcome::TransportError(UpstreamError::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => decode_array(&body),
            Err(err) => FetchOutcome::TransportError(err.into()),
        }
    }
}

fn decode_array<T: DeserializeOwned>(body: &str) -> FetchOutcome<Vec<T>> {
    match serde_json::from_str::<Vec<T>>(body) {
        Ok(items) => FetchOutcome::Found(items),
        Err(err) => FetchOutcome::TransportError(err.into()),
    }
}

#[async_trait]
impl DriverSource for OpenF1Client {
    async fn driver_by_number(&self, number: DriverNumber) -> FetchOutcome<Driver> {
        self.get_array::<Driver>(&self.drivers_url(number))
            .await
            .first()
    }
}

#[async_trait]
impl StintSource for OpenF1Client {
    async fn stints_for_session(&self, session: SessionKey) -> FetchOutcome<Vec<Stint>> {
        let outcome = self.get_array::<Stint>(&self.stints_url(session)).await;
        if let FetchOutcome::Found(stints) = &outcome {
            debug!("session {session}: {} stints", stints.len());
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Compound;

    #[test]
    fn urls_are_keyed_by_number_and_session() {
        let client = OpenF1Client::with_client(reqwest::Client::new(), "http://localhost:8080/v1/");
        let number = DriverNumber::new(44).unwrap();
        assert_eq!(
            client.drivers_url(number),
            "http://localhost:8080/v1/drivers?driver_number=44"
        );
        assert_eq!(
            client.stints_url(SessionKey(9523)),
            "http://localhost:8080/v1/stints?session_key=9523"
        );
    }

    #[test]
    fn decode_reads_stint_arrays() {
        let body = r#"[
            {"driver_number": 1, "lap_start": 1, "lap_end": 22, "compound": "MEDIUM", "stint_number": 1},
            {"driver_number": 1, "lap_start": 23, "lap_end": 78, "compound": "HARD", "stint_number": 2}
        ]"#;
        let stints = decode_array::<Stint>(body).found().unwrap();
        assert_eq!(stints.len(), 2);
        assert_eq!(stints[1].compound, Compound::Hard);
    }

    #[test]
    fn decode_reports_malformed_bodies() {
        let outcome = decode_array::<Stint>(r#"{"detail": "No results found."}"#);
        assert!(matches!(
            outcome,
            FetchOutcome::TransportError(UpstreamError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let client =
            OpenF1Client::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let outcome = client
            .driver_by_number(DriverNumber::new(1).unwrap())
            .await;
        assert!(matches!(
            outcome,
            FetchOutcome::TransportError(UpstreamError::Request(_))
        ));
    }
}
