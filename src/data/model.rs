use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ScheduleCode – the closed vocabulary of pickup-day tokens
// ---------------------------------------------------------------------------

/// Which weekday(s) trash is collected at an address.
///
/// `TH` is always Thursday and `T` is always Tuesday; combined codes are the
/// concatenation of their single-day tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScheduleCode {
    M,
    T,
    W,
    TH,
    F,
    MF,
    MTH,
    TF,
}

impl ScheduleCode {
    pub const COUNT: usize = 8;

    /// The full vocabulary in chart order.
    pub const ALL: [ScheduleCode; Self::COUNT] = [
        ScheduleCode::M,
        ScheduleCode::T,
        ScheduleCode::W,
        ScheduleCode::TH,
        ScheduleCode::F,
        ScheduleCode::MF,
        ScheduleCode::MTH,
        ScheduleCode::TF,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleCode::M => "M",
            ScheduleCode::T => "T",
            ScheduleCode::W => "W",
            ScheduleCode::TH => "TH",
            ScheduleCode::F => "F",
            ScheduleCode::MF => "MF",
            ScheduleCode::MTH => "MTH",
            ScheduleCode::TF => "TF",
        }
    }

    /// Parse a raw token. Anything outside the vocabulary is `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.into_iter().find(|code| code.as_str() == token)
    }

    /// Position of the code in [`ScheduleCode::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fixed display colour used by the map and the stacked bar chart.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            ScheduleCode::M => [255, 0, 0],
            ScheduleCode::T => [0, 255, 0],
            ScheduleCode::W => [0, 0, 255],
            ScheduleCode::TH => [255, 255, 0],
            ScheduleCode::F => [0, 255, 255],
            ScheduleCode::MF => [255, 0, 255],
            ScheduleCode::MTH => [128, 128, 128],
            ScheduleCode::TF => [0, 128, 128],
        }
    }
}

impl fmt::Display for ScheduleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DaySelection – the user-facing day dropdown
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum DaySelection {
    #[default]
    All,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl DaySelection {
    pub const OPTIONS: [DaySelection; 6] = [
        DaySelection::All,
        DaySelection::Monday,
        DaySelection::Tuesday,
        DaySelection::Wednesday,
        DaySelection::Thursday,
        DaySelection::Friday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DaySelection::All => "All",
            DaySelection::Monday => "Monday",
            DaySelection::Tuesday => "Tuesday",
            DaySelection::Wednesday => "Wednesday",
            DaySelection::Thursday => "Thursday",
            DaySelection::Friday => "Friday",
        }
    }
}

impl fmt::Display for DaySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single address with its pickup schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub full_address: String,
    pub mailing_neighborhood: String,
    /// Always exactly five digits; "00000" when the source had none.
    pub zip_code: String,
    pub pwd_district: Option<String>,
    pub recollect: Option<String>,
    /// Schedule token as it appeared in the source.
    pub trashday: String,
    /// Parsed schedule; `None` when the token is outside the vocabulary.
    pub schedule: Option<ScheduleCode>,
    pub x_coord: f64,
    pub y_coord: f64,
    /// Display colour looked up from `schedule`.
    pub color: Option<[u8; 3]>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with the pre-computed neighborhood index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records in source order.
    pub records: Vec<Record>,
    /// Sorted set of every mailing neighborhood present.
    pub neighborhoods: BTreeSet<String>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let neighborhoods = records
            .iter()
            .map(|r| r.mailing_neighborhood.clone())
            .collect();
        Dataset {
            records,
            neighborhoods,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown_codes() {
        assert_eq!(ScheduleCode::parse("TH"), Some(ScheduleCode::TH));
        assert_eq!(ScheduleCode::parse(" MTH "), Some(ScheduleCode::MTH));
        assert_eq!(ScheduleCode::parse("Th"), None);
        assert_eq!(ScheduleCode::parse("S"), None);
        assert_eq!(ScheduleCode::parse(""), None);
    }

    #[test]
    fn test_index_matches_chart_order() {
        for (i, code) in ScheduleCode::ALL.iter().enumerate() {
            assert_eq!(code.index(), i);
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(ScheduleCode::TH.rgb(), [255, 255, 0]);
        assert_eq!(ScheduleCode::TF.rgb(), [0, 128, 128]);
    }

    #[test]
    fn test_neighborhood_index_is_sorted_and_unique() {
        let rec = |n: &str| Record {
            full_address: "1 Main St".into(),
            mailing_neighborhood: n.into(),
            zip_code: "02116".into(),
            pwd_district: None,
            recollect: None,
            trashday: "M".into(),
            schedule: Some(ScheduleCode::M),
            x_coord: 0.0,
            y_coord: 0.0,
            color: Some(ScheduleCode::M.rgb()),
        };
        let ds = Dataset::from_records(vec![rec("South End"), rec("Back Bay"), rec("South End")]);
        assert_eq!(ds.len(), 3);
        let names: Vec<&str> = ds.neighborhoods.iter().map(String::as_str).collect();
        assert_eq!(names, ["Back Bay", "South End"]);
    }
}
