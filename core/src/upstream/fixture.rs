use super::{DriverSource, FetchOutcome, StintSource};
use crate::model::{Driver, DriverNumber, Stint};
use crate::sessions::SessionKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Racing data held in memory, read from a JSON document shaped as
/// `{"drivers": [...], "sessions": {"9523": [...]}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSource {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub sessions: BTreeMap<u32, Vec<Stint>>,
}

impl FixtureSource {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn with_session(mut self, session: SessionKey, stints: Vec<Stint>) -> Self {
        self.sessions.insert(session.0, stints);
        self
    }

    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.drivers.push(driver);
        self
    }
}

#[async_trait]
impl DriverSource for FixtureSource {
    async fn driver_by_number(&self, number: DriverNumber) -> FetchOutcome<Driver> {
        match self
            .drivers
            .iter()
            .find(|driver| driver.driver_number == number.get())
        {
            Some(driver) => FetchOutcome::Found(driver.clone()),
            None => FetchOutcome::NotFound,
        }
    }
}

#[async_trait]
impl StintSource for FixtureSource {
    /// Unknown sessions answer with no stints, as the live API does.
    async fn stints_for_session(&self, session: SessionKey) -> FetchOutcome<Vec<Stint>> {
        FetchOutcome::Found(self.sessions.get(&session.0).cloned().unwrap_or_default())
    }
}
