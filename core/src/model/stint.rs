use super::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour for compound strings that are not in the registered set.
pub const FALLBACK_COMPOUND_COLOR: &str = "#888";

/// Tyre rubber formulation reported for a stint.
///
/// Matching against the upstream string is exact (`"SOFT"`, not `"soft"`);
/// anything else, including a missing value, is kept as [`Compound::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown(String),
}

impl Compound {
    /// Compounds with a registered display colour, in legend order.
    pub const REGISTERED: [Compound; 5] = [
        Compound::Soft,
        Compound::Medium,
        Compound::Hard,
        Compound::Intermediate,
        Compound::Wet,
    ];

    pub fn color(&self) -> &'static str {
        match self {
            Compound::Soft => "#ff2d55",
            Compound::Medium => "#ffcc00",
            Compound::Hard => "#ffffff",
            Compound::Intermediate => "#4cd964",
            Compound::Wet => "#0091ea",
            Compound::Unknown(_) => FALLBACK_COMPOUND_COLOR,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Intermediate => "INTERMEDIATE",
            Compound::Wet => "WET",
            Compound::Unknown(raw) => raw,
        }
    }
}

impl Default for Compound {
    fn default() -> Self {
        Compound::Unknown(String::new())
    }
}

impl From<&str> for Compound {
    fn from(raw: &str) -> Self {
        match raw {
            "SOFT" => Compound::Soft,
            "MEDIUM" => Compound::Medium,
            "HARD" => Compound::Hard,
            "INTERMEDIATE" => Compound::Intermediate,
            "WET" => Compound::Wet,
            other => Compound::Unknown(other.to_string()),
        }
    }
}

impl From<Option<String>> for Compound {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(Compound::from).unwrap_or_default()
    }
}

impl From<Compound> for String {
    fn from(compound: Compound) -> Self {
        match compound {
            Compound::Unknown(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A continuous range of laps one driver ran on a single tyre set.
///
/// Upstream occasionally reports `null` lap numbers for stints that are still
/// open; they read as lap 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stint {
    pub driver_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lap_start: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lap_end: u32,
    #[serde(default)]
    pub compound: Compound,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stint_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tyre_age_at_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_key: Option<u32>,
}

impl Stint {
    pub fn new(driver_number: u32, lap_start: u32, lap_end: u32, compound: Compound) -> Self {
        Self {
            driver_number,
            lap_start,
            lap_end,
            compound,
            stint_number: None,
            tyre_age_at_start: None,
            session_key: None,
        }
    }

    /// Laps covered, counted as `lap_end - lap_start`.
    pub fn lap_count(&self) -> u32 {
        self.lap_end.saturating_sub(self.lap_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_compounds_have_fixed_colors() {
        let colors: Vec<_> = Compound::REGISTERED.iter().map(Compound::color).collect();
        assert_eq!(
            colors,
            vec!["#ff2d55", "#ffcc00", "#ffffff", "#4cd964", "#0091ea"]
        );
    }

    #[test]
    fn unrecognized_compound_falls_back() {
        let compound = Compound::from("HYPERSOFT");
        assert_eq!(compound, Compound::Unknown("HYPERSOFT".into()));
        assert_eq!(compound.color(), FALLBACK_COMPOUND_COLOR);
        assert_eq!(Compound::from("soft").color(), FALLBACK_COMPOUND_COLOR);
    }

    #[test]
    fn stint_decodes_upstream_record() {
        let json = r#"{
            "meeting_key": 1236,
            "session_key": 9523,
            "stint_number": 2,
            "driver_number": 16,
            "lap_start": 2,
            "lap_end": 78,
            "compound": "HARD",
            "tyre_age_at_start": 0
        }"#;
        let stint: Stint = serde_json::from_str(json).unwrap();
        assert_eq!(stint.compound, Compound::Hard);
        assert_eq!(stint.lap_count(), 76);
        assert_eq!(stint.stint_number, Some(2));
        assert_eq!(stint.session_key, Some(9523));
    }

    #[test]
    fn stint_tolerates_nulls() {
        let json = r#"{"driver_number": 2, "lap_start": 1, "lap_end": null, "compound": null}"#;
        let stint: Stint = serde_json::from_str(json).unwrap();
        assert_eq!(stint.lap_end, 0);
        assert_eq!(stint.compound, Compound::default());
        assert_eq!(stint.lap_count(), 0);
    }

    #[test]
    fn compound_serializes_as_upstream_string() {
        let stint = Stint::new(1, 1, 10, Compound::Intermediate);
        let value = serde_json::to_value(&stint).unwrap();
        assert_eq!(value["compound"], "INTERMEDIATE");
    }
}
