//! Canonical field positions and normalization of raw position strings.

use crate::models::error::FitError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A canonical position code. Wingers (`LW`/`RW`) fold into `LM`/`RM`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Position {
    GK,
    CB,
    LB,
    RB,
    CDM,
    CM,
    CAM,
    LM,
    RM,
    CF,
    ST,
}

impl Position {
    pub const ALL: [Position; 11] = [
        Position::GK,
        Position::CB,
        Position::LB,
        Position::RB,
        Position::CDM,
        Position::CM,
        Position::CAM,
        Position::LM,
        Position::RM,
        Position::CF,
        Position::ST,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::CB => "CB",
            Position::LB => "LB",
            Position::RB => "RB",
            Position::CDM => "CDM",
            Position::CM => "CM",
            Position::CAM => "CAM",
            Position::LM => "LM",
            Position::RM => "RM",
            Position::CF => "CF",
            Position::ST => "ST",
        }
    }

    fn from_code(code: &str) -> Option<Position> {
        Position::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// Normalize a raw position or slot string to a canonical position.
    ///
    /// Handles slot numbering (`CB1`), wing-back and winger aliases
    /// (`LWB`, `RW`), split centre-back notations (`CB-L`), `DM`/`AM`
    /// shorthands and side prefixes (`RCB`, `LCM`).
    pub fn normalize(raw: &str) -> Result<Position, FitError> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        if compact.is_empty() {
            return Err(FitError::UnknownPosition(raw.to_string()));
        }
        let code = compact.trim_end_matches(|c: char| c.is_ascii_digit());

        let aliased = match code {
            "LWB" => "LB",
            "RWB" => "RB",
            "LW" => "LM",
            "RW" => "RM",
            "CB-L" | "CB-R" | "CBL" | "CBR" => "CB",
            "DM" => "CDM",
            "AM" => "CAM",
            other => other,
        };
        if let Some(p) = Position::from_code(aliased) {
            return Ok(p);
        }

        // Side-prefixed centre positions: RCB, LCM, RDM, LAM ...
        if let Some(rest) = aliased.strip_prefix('L').or_else(|| aliased.strip_prefix('R')) {
            let rest = match rest {
                "DM" => "CDM",
                "AM" => "CAM",
                other => other,
            };
            if let Some(p) = Position::from_code(rest) {
                return Ok(p);
            }
        }

        Err(FitError::UnknownPosition(raw.to_string()))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Position {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::normalize(s)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Position::normalize(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_codes_round_trip() {
        for p in Position::ALL {
            assert_eq!(Position::normalize(p.code()).unwrap(), p);
        }
    }

    #[test]
    fn aliases_map_to_canonical_positions() {
        assert_eq!(Position::normalize("lwb").unwrap(), Position::LB);
        assert_eq!(Position::normalize("RWB").unwrap(), Position::RB);
        assert_eq!(Position::normalize("CB-L").unwrap(), Position::CB);
        assert_eq!(Position::normalize("DM").unwrap(), Position::CDM);
        assert_eq!(Position::normalize("AM").unwrap(), Position::CAM);
    }

    #[test]
    fn slot_numbers_and_side_prefixes_are_stripped() {
        assert_eq!(Position::normalize("CB2").unwrap(), Position::CB);
        assert_eq!(Position::normalize("ST1").unwrap(), Position::ST);
        assert_eq!(Position::normalize("RCB").unwrap(), Position::CB);
        assert_eq!(Position::normalize("LCM").unwrap(), Position::CM);
        assert_eq!(Position::normalize("RAM").unwrap(), Position::CAM);
    }

    #[test]
    fn blank_and_unknown_positions_fail() {
        assert!(Position::normalize("").is_err());
        assert!(Position::normalize("  ").is_err());
        assert!(Position::normalize("XX").is_err());
    }
}
