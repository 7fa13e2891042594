//! Picking vocabulary: metal categories, line statuses, operating weekdays.
//!
//! The wire values (`ZILVER`, `TE_DOEN`, ...) are the canonical database
//! strings; the enums exist so handlers and planning logic never pass raw
//! strings around.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weekdays on which picking operates (ISO-ish: 2 = Tuesday .. 5 = Friday).
pub const OPERATING_WEEKDAYS: [i32; 4] = [2, 3, 4, 5];

/// Whether `weekday` is one of the four operating days.
pub fn is_operating_weekday(weekday: i32) -> bool {
    OPERATING_WEEKDAYS.contains(&weekday)
}

/// Metal category of a picking line.
///
/// Declaration order defines the display sort order: ZILVER always
/// precedes STAAL within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metal {
    #[serde(rename = "ZILVER")]
    Zilver,
    #[serde(rename = "STAAL")]
    Staal,
}

impl Metal {
    /// Both metals, in sort order. Every required store gets one line per
    /// metal.
    pub const ALL: [Metal; 2] = [Metal::Zilver, Metal::Staal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metal::Zilver => "ZILVER",
            Metal::Staal => "STAAL",
        }
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ZILVER" => Ok(Metal::Zilver),
            "STAAL" => Ok(Metal::Staal),
            other => Err(format!("Unknown metal: {other}")),
        }
    }
}

/// Status of a picking line.
///
/// There is no enforced transition order: a line may move from any status
/// to any other (KLAAR back to TE_DOEN included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineStatus {
    #[serde(rename = "TE_DOEN")]
    TeDoen,
    #[serde(rename = "BEZIG")]
    Bezig,
    #[serde(rename = "KLAAR")]
    Klaar,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::TeDoen => "TE_DOEN",
            LineStatus::Bezig => "BEZIG",
            LineStatus::Klaar => "KLAAR",
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TE_DOEN" => Ok(LineStatus::TeDoen),
            "BEZIG" => Ok(LineStatus::Bezig),
            "KLAAR" => Ok(LineStatus::Klaar),
            other => Err(format!("Unknown line status: {other}")),
        }
    }
}
