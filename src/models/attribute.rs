//! Player attributes: the seven rated skills and a per-player value set.

use crate::models::error::FitError;
use serde::{Deserialize, Serialize};

/// One of the seven rated skills.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Pace,
    Shooting,
    Passing,
    Dribbling,
    Defense,
    Physical,
    Goalkeeping,
}

impl Attribute {
    /// All attributes in display order.
    pub const ALL: [Attribute; 7] = [
        Attribute::Pace,
        Attribute::Shooting,
        Attribute::Passing,
        Attribute::Dribbling,
        Attribute::Defense,
        Attribute::Physical,
        Attribute::Goalkeeping,
    ];

    /// Short code used by role catalogs (`PAC`, `DEF`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Attribute::Pace => "PAC",
            Attribute::Shooting => "SHO",
            Attribute::Passing => "PAS",
            Attribute::Dribbling => "DRI",
            Attribute::Defense => "DEF",
            Attribute::Physical => "PHY",
            Attribute::Goalkeeping => "GK",
        }
    }

    /// Field name used by player payloads and marketplace filters.
    pub fn field_name(self) -> &'static str {
        match self {
            Attribute::Pace => "pace",
            Attribute::Shooting => "shooting",
            Attribute::Passing => "passing",
            Attribute::Dribbling => "dribbling",
            Attribute::Defense => "defense",
            Attribute::Physical => "physical",
            Attribute::Goalkeeping => "goalkeeping",
        }
    }

    /// Parse a short code or a field name, case-insensitively.
    ///
    /// Blank input means "no attribute at this rank" and yields `Ok(None)`.
    pub fn parse(raw: &str) -> Result<Option<Attribute>, FitError> {
        let s = raw.trim();
        if s.is_empty() {
            return Ok(None);
        }
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| s.eq_ignore_ascii_case(a.code()) || s.eq_ignore_ascii_case(a.field_name()))
            .map(Some)
            .ok_or_else(|| FitError::UnknownAttribute(s.to_string()))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A player's value for every attribute. Missing fields deserialize as 0.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub pace: i32,
    pub shooting: i32,
    pub passing: i32,
    pub dribbling: i32,
    pub defense: i32,
    pub physical: i32,
    pub goalkeeping: i32,
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Pace => self.pace,
            Attribute::Shooting => self.shooting,
            Attribute::Passing => self.passing,
            Attribute::Dribbling => self.dribbling,
            Attribute::Defense => self.defense,
            Attribute::Physical => self.physical,
            Attribute::Goalkeeping => self.goalkeeping,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: i32) {
        let slot = match attribute {
            Attribute::Pace => &mut self.pace,
            Attribute::Shooting => &mut self.shooting,
            Attribute::Passing => &mut self.passing,
            Attribute::Dribbling => &mut self.dribbling,
            Attribute::Defense => &mut self.defense,
            Attribute::Physical => &mut self.physical,
            Attribute::Goalkeeping => &mut self.goalkeeping,
        };
        *slot = value;
    }

    /// Builder-style setter, handy for fixtures.
    pub fn with(mut self, attribute: Attribute, value: i32) -> Self {
        self.set(attribute, value);
        self
    }
}
