//! Competitive tiers and their minimum-attribute thresholds.
//!
//! Tiers are ordered from the entry tier (index 0) up to the most
//! competitive one; "better tier" always means a higher index.

use crate::models::error::FitError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tier used when a caller does not choose one.
pub const DEFAULT_TIER: &str = "Iron";

/// A competitive bracket. `thresholds[i]` applies to a role's rank-`i` attribute.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub thresholds: [i32; 4],
}

impl Tier {
    pub fn new(name: impl Into<String>, thresholds: [i32; 4]) -> Self {
        Self {
            name: name.into(),
            thresholds,
        }
    }
}

/// All tiers, ascending by competitive level.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl Default for TierTable {
    fn default() -> Self {
        let tiers = vec![
            Tier::new("Flint", [66, 61, 57, 52]),
            Tier::new("Spark", [70, 66, 61, 57]),
            Tier::new("Ice", [74, 70, 66, 61]),
            Tier::new("Stone", [77, 74, 70, 66]),
            Tier::new("Iron", [80, 77, 74, 70]),
            Tier::new("Bronze", [84, 80, 77, 74]),
            Tier::new("Silver", [87, 84, 80, 77]),
            Tier::new("Gold", [90, 87, 84, 80]),
            Tier::new("Platinum", [93, 90, 87, 84]),
            Tier::new("Diamond", [97, 93, 90, 87]),
        ];
        Self { tiers }
    }
}

impl TierTable {
    /// Build a table from tiers listed lowest first. Names must be unique and non-empty.
    pub fn new(tiers: Vec<Tier>) -> Result<Self, FitError> {
        for (i, t) in tiers.iter().enumerate() {
            if t.name.trim().is_empty() {
                return Err(FitError::InvalidTier("tier name is empty".into()));
            }
            if tiers[..i].iter().any(|o| o.name.eq_ignore_ascii_case(&t.name)) {
                return Err(FitError::InvalidTier(format!("duplicate tier {}", t.name)));
            }
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Tier names, lowest first.
    pub fn names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name.as_str()).collect()
    }

    /// Tiers from most to least competitive.
    pub fn iter_best_first(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter().rev()
    }

    pub fn get(&self, name: &str) -> Option<&Tier> {
        let name = name.trim();
        self.tiers.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Look up a tier, failing with `UnknownTier` rather than defaulting.
    pub fn require(&self, name: &str) -> Result<&Tier, FitError> {
        self.get(name)
            .ok_or_else(|| FitError::UnknownTier(name.trim().to_string()))
    }

    /// Position in the ascending order (0 = entry tier).
    pub fn rank(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.tiers.iter().position(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Compare two tiers by competitive level (`Greater` = `a` is the better tier).
    pub fn compare(&self, a: &str, b: &str) -> Result<Ordering, FitError> {
        let ra = self.rank(a).ok_or_else(|| FitError::UnknownTier(a.to_string()))?;
        let rb = self.rank(b).ok_or_else(|| FitError::UnknownTier(b.to_string()))?;
        Ok(ra.cmp(&rb))
    }
}
