use crate::model::{Compound, Stint};
use serde::{Serialize, Serializer};

/// Colour sentinel for laps with no recorded stint.
pub const TRANSPARENT: &str = "transparent";

/// Fill of one piece of a stacked bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SegmentColor {
    #[default]
    Transparent,
    Tyre(Compound),
}

impl SegmentColor {
    pub fn css(&self) -> &'static str {
        match self {
            SegmentColor::Transparent => TRANSPARENT,
            SegmentColor::Tyre(compound) => compound.color(),
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, SegmentColor::Transparent)
    }
}

impl Serialize for SegmentColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.css())
    }
}

/// A lap count paired with its display colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub value: u32,
    pub color: SegmentColor,
}

impl Segment {
    pub fn filler(value: u32) -> Self {
        Self {
            value,
            color: SegmentColor::Transparent,
        }
    }

    pub fn from_stint(stint: &Stint) -> Self {
        Self {
            value: stint.lap_count(),
            color: SegmentColor::Tyre(stint.compound.clone()),
        }
    }
}
