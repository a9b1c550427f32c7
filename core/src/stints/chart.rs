use crate::model::Stint;
use crate::stints::segment::{Segment, SegmentColor};
use log::debug;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Column key for the segment at `index`.
pub fn segment_key(index: usize) -> String {
    format!("seg{index}")
}

/// One bar of the chart: a driver and the lap count of each segment.
///
/// Every row of a [`TyreChart`] carries the same number of segments; missing
/// trailing segments are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    pub driver_number: u32,
    pub segments: Vec<u32>,
}

impl ChartRow {
    pub fn label(&self) -> String {
        format!("#{}", self.driver_number)
    }

    pub fn total(&self) -> u32 {
        self.segments.iter().sum()
    }
}

impl Serialize for ChartRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.segments.len() + 1))?;
        map.serialize_entry("driver", &self.label())?;
        for (index, value) in self.segments.iter().enumerate() {
            map.serialize_entry(&segment_key(index), value)?;
        }
        map.end()
    }
}

/// Colours per segment index, one entry per chart row in row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentColorTable {
    columns: Vec<Vec<SegmentColor>>,
}

impl SegmentColorTable {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&[SegmentColor]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Colour of segment `index` on row `row`; transparent when out of range.
    pub fn color_at(&self, index: usize, row: usize) -> &SegmentColor {
        const TRANSPARENT: &SegmentColor = &SegmentColor::Transparent;
        self.columns
            .get(index)
            .and_then(|column| column.get(row))
            .unwrap_or(TRANSPARENT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &[SegmentColor])> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| (segment_key(index), column.as_slice()))
    }
}

impl Serialize for SegmentColorTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (key, column) in self.iter() {
            map.serialize_entry(&key, column)?;
        }
        map.end()
    }
}

/// Chart-ready stint data: rows sorted by driver number plus the aligned colour table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TyreChart {
    pub total_laps: u32,
    pub rows: Vec<ChartRow>,
    pub colors: SegmentColorTable,
}

impl TyreChart {
    pub fn segment_count(&self) -> usize {
        self.colors.len()
    }
}

impl Serialize for TyreChart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TyreChart", 3)?;
        state.serialize_field("total_laps", &self.total_laps)?;
        state.serialize_field("data", &self.rows)?;
        state.serialize_field("segmentColors", &self.colors)?;
        state.end()
    }
}

/// Builds the segment list of a single driver.
///
/// Stints are ordered by `lap_start`. A leading transparent filler covers the
/// laps before the first stint, a trailing one covers the laps after the last
/// stint up to `total_laps`. A driver without stints is one filler spanning
/// the whole session.
pub fn driver_segments(driver: u32, stints: &[Stint], total_laps: u32) -> Vec<Segment> {
    let mut own: Vec<&Stint> = stints
        .iter()
        .filter(|stint| stint.driver_number == driver)
        .collect();
    own.sort_by_key(|stint| stint.lap_start);

    let (Some(first), Some(last)) = (own.first(), own.last()) else {
        return vec![Segment::filler(total_laps)];
    };

    for pair in own.windows(2) {
        if pair[1].lap_start < pair[0].lap_end {
            debug!(
                "driver #{} has overlapping stints: laps {}-{} and {}-{}",
                driver, pair[0].lap_start, pair[0].lap_end, pair[1].lap_start, pair[1].lap_end
            );
        }
    }

    let mut segments = Vec::with_capacity(own.len() + 2);
    if first.lap_start > 1 {
        segments.push(Segment::filler(first.lap_start - 1));
    }
    segments.extend(own.iter().map(|stint| Segment::from_stint(stint)));
    if last.lap_end < total_laps {
        segments.push(Segment::filler(total_laps - last.lap_end));
    }
    segments
}

/// Pivots per-stint records into one fixed-width row per driver.
///
/// Drivers are sorted ascending (duplicates collapse) and that order is shared
/// by the rows and by every colour column, so row `r` of the output pairs with
/// entry `r` of each colour column.
pub fn normalize(drivers: &[u32], stints: &[Stint], total_laps: u32) -> TyreChart {
    let mut sorted = drivers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let per_driver: Vec<Vec<Segment>> = sorted
        .iter()
        .map(|&driver| driver_segments(driver, stints, total_laps))
        .collect();
    let max_segments = per_driver.iter().map(Vec::len).max().unwrap_or(0);

    let rows = sorted
        .iter()
        .zip(&per_driver)
        .map(|(&driver_number, segments)| ChartRow {
            driver_number,
            segments: (0..max_segments)
                .map(|index| segments.get(index).map_or(0, |segment| segment.value))
                .collect(),
        })
        .collect();

    let columns = (0..max_segments)
        .map(|index| {
            per_driver
                .iter()
                .map(|segments| {
                    segments
                        .get(index)
                        .map(|segment| segment.color.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    TyreChart {
        total_laps,
        rows,
        colors: SegmentColorTable { columns },
    }
}
