use crate::model::Stint;
use crate::sessions::{resolve_session_key, SessionKey};
use crate::stints::{normalize, TyreChart};
use crate::upstream::{FetchOutcome, StintSource, UpstreamError};
use log::{info, warn};

/// What a [`TyreBoard::refresh`] did to the board.
#[derive(Debug)]
pub enum Refresh {
    /// The entered name matched no Grand Prix; the board is unchanged.
    Unresolved,
    Loaded(SessionKey),
    /// Upstream could not be read; the board is unchanged.
    Failed(SessionKey, UpstreamError),
}

/// State behind the tyre-stint view.
///
/// Drivers and the lap count are derived from the stints whenever they are
/// replaced; the chart is re-derived on demand.
#[derive(Debug, Clone, Default)]
pub struct TyreBoard {
    grand_prix: String,
    stints: Vec<Stint>,
    drivers: Vec<u32>,
    total_laps: u32,
}

impl TyreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grand_prix(&self) -> &str {
        &self.grand_prix
    }

    pub fn set_grand_prix(&mut self, name: impl Into<String>) {
        self.grand_prix = name.into();
    }

    pub fn stints(&self) -> &[Stint] {
        &self.stints
    }

    /// Unique driver numbers in the order they first appear in the stints.
    pub fn drivers(&self) -> &[u32] {
        &self.drivers
    }

    pub fn total_laps(&self) -> u32 {
        self.total_laps
    }

    /// Session for the entered name, or `None` (logged) when nothing matches.
    pub fn session_key(&self) -> Option<SessionKey> {
        let key = resolve_session_key(&self.grand_prix);
        if key.is_none() {
            warn!("invalid Grand Prix name {:?}", self.grand_prix.trim());
        }
        key
    }

    pub fn apply_stints(&mut self, stints: Vec<Stint>) {
        let mut drivers = Vec::new();
        for stint in &stints {
            if !drivers.contains(&stint.driver_number) {
                drivers.push(stint.driver_number);
            }
        }
        self.total_laps = stints.iter().map(|stint| stint.lap_end).max().unwrap_or(0);
        self.drivers = drivers;
        self.stints = stints;
    }

    /// Chart for the current stints; `None` while there are no laps to draw.
    pub fn chart(&self) -> Option<TyreChart> {
        (self.total_laps > 0).then(|| normalize(&self.drivers, &self.stints, self.total_laps))
    }

    /// Fetches the stints of the entered Grand Prix and replaces the board's data.
    ///
    /// A session upstream does not know reads as a session without stints.
    pub async fn refresh<S>(&mut self, source: &S) -> Refresh
    where
        S: StintSource + ?Sized,
    {
        let Some(session) = self.session_key() else {
            return Refresh::Unresolved;
        };
        match source.stints_for_session(session).await {
            FetchOutcome::Found(stints) => {
                info!("session {session}: loaded {} stints", stints.len());
                self.apply_stints(stints);
            }
            FetchOutcome::NotFound => self.apply_stints(Vec::new()),
            FetchOutcome::TransportError(err) => return Refresh::Failed(session, err),
        }
        Refresh::Loaded(session)
    }
}
