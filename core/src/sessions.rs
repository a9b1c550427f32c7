use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of one on-track session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(pub u32);

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Season shown by the Grand Prix table.
pub const SEASON: u16 = 2024;

/// Race session of each Grand Prix of the season, by display name.
pub const GRAND_PRIX_SESSIONS: [(&str, u32); 24] = [
    ("Bahrain", 9472),
    ("Saudi Arabia", 9480),
    ("Australia", 9488),
    ("Japan", 9496),
    ("China", 9673),
    ("Miami", 9507),
    ("Imola", 9515),
    ("Monaco", 9523),
    ("Canada", 9531),
    ("Spain", 9539),
    ("Austria", 9550),
    ("Britain", 9558),
    ("Hungary", 9566),
    ("Belgium", 9574),
    ("Netherlands", 9582),
    ("Monza", 9590),
    ("Azerbaijan", 9598),
    ("Singapore", 9606),
    ("Austin", 9617),
    ("Mexico", 9625),
    ("Brazil", 9636),
    ("Las Vegas", 9644),
    ("Qatar", 9655),
    ("Abu Dhabi", 9662),
];

/// Looks up a Grand Prix by name, ignoring case and surrounding whitespace.
pub fn resolve_session_key(name: &str) -> Option<SessionKey> {
    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }
    GRAND_PRIX_SESSIONS
        .iter()
        .find(|(grand_prix, _)| grand_prix.eq_ignore_ascii_case(wanted))
        .map(|&(_, key)| SessionKey(key))
}

pub fn grand_prix_names() -> impl Iterator<Item = &'static str> {
    GRAND_PRIX_SESSIONS.iter().map(|&(name, _)| name)
}
