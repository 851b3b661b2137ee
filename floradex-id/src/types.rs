//! Core domain types for floradex-id
//!
//! The identification pipeline turns three heterogeneous upstream payloads
//! (Pl@ntNet, the Forest Service invasive-species layer, Wikipedia) into the
//! flat, display-ready structures defined here. All of them are created
//! fresh per user action and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plant organ hint forwarded to the identification service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organ {
    /// Let the service guess the organ
    #[default]
    Auto,
    Leaf,
    Flower,
    Fruit,
    Bark,
    Habit,
}

impl Organ {
    /// Wire value expected by the identification service
    pub fn as_str(&self) -> &'static str {
        match self {
            Organ::Auto => "auto",
            Organ::Leaf => "leaf",
            Organ::Flower => "flower",
            Organ::Fruit => "fruit",
            Organ::Bark => "bark",
            Organ::Habit => "habit",
        }
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Organ {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Organ::Auto),
            "leaf" => Ok(Organ::Leaf),
            "flower" => Ok(Organ::Flower),
            "fruit" => Ok(Organ::Fruit),
            "bark" => Ok(Organ::Bark),
            "habit" => Ok(Organ::Habit),
            other => Err(format!("Unknown organ: {}", other)),
        }
    }
}

/// One candidate species from the identification response
///
/// Rows keep the upstream order, which already reflects the service's
/// confidence ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesCandidate {
    /// Scientific name without author
    pub scientific_name: String,
    /// Common names in source order (may be empty)
    pub common_names: Vec<String>,
    /// Genus scientific name
    pub genus: String,
    /// Family scientific name
    pub family: String,
    /// Confidence score in [0, 1], retained as float for programmatic use
    pub score: f64,
    /// Score formatted to two decimal places for display
    pub score_display: String,
}

/// One normalized invasive-species observation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvasiveRecord {
    pub plant_code: String,
    pub scientific_name: String,
    pub common_name: String,
    pub project_code: String,
    pub plant_status: String,
    /// Administrative unit name as displayed; normalization is applied only
    /// to the join key, never to this surface text
    pub unit_name: String,
    pub examiners: String,
    /// Canonical `YYYY-MM-DD` date, or empty when no usable date exists
    pub last_update: String,
}

/// A single map marker derived from a record's geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    /// Displayed unit name of the contributing record
    pub label: String,
}

/// Per-region record count, grouped by normalized unit name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    /// First-seen displayed name of the group (trimmed)
    pub unit_name: String,
    /// Number of records sharing the normalized unit name; always >= 1
    pub record_count: usize,
}

/// Encyclopedia summary for the selected scientific name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncyclopediaEntry {
    pub title: String,
    pub description: Option<String>,
    pub extract: Option<String>,
    pub thumbnail_url: Option<String>,
    pub page_url: Option<String>,
    pub last_revision_timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organ_round_trip() {
        for organ in [
            Organ::Auto,
            Organ::Leaf,
            Organ::Flower,
            Organ::Fruit,
            Organ::Bark,
            Organ::Habit,
        ] {
            assert_eq!(organ.as_str().parse::<Organ>(), Ok(organ));
        }
    }

    #[test]
    fn test_organ_parse_defaults_and_errors() {
        assert_eq!("".parse::<Organ>(), Ok(Organ::Auto));
        assert_eq!(" Leaf ".parse::<Organ>(), Ok(Organ::Leaf));
        assert!("stem".parse::<Organ>().is_err());
    }
}
