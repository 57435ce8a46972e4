//! Fit score results and the score-to-label table.

use serde::{Deserialize, Serialize};

/// Weight per attribute rank (rank 1 counts 4x, rank 4 counts 1x).
pub const ATTRIBUTE_WEIGHTS: [i32; 4] = [4, 3, 2, 1];

/// Score reported for a player who cannot play the role's position.
pub const DISQUALIFIED_SCORE: i32 = -999;

/// Qualitative fit band.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum FitLabel {
    Elite,
    Strong,
    Natural,
    Weak,
    Unusable,
}

impl FitLabel {
    /// Map a score to its band. Lower bounds are inclusive.
    pub fn from_score(score: i32) -> Self {
        if score >= 50 {
            FitLabel::Elite
        } else if score >= 20 {
            FitLabel::Strong
        } else if score >= 0 {
            FitLabel::Natural
        } else if score >= -20 {
            FitLabel::Weak
        } else {
            FitLabel::Unusable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FitLabel::Elite => "Elite",
            FitLabel::Strong => "Strong",
            FitLabel::Natural => "Natural",
            FitLabel::Weak => "Weak",
            FitLabel::Unusable => "Unusable",
        }
    }
}

impl std::fmt::Display for FitLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and label for one (player, role, tier) triple. Never cached.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub score: i32,
    pub label: FitLabel,
    /// Set only by the position gate; a real score may equal `DISQUALIFIED_SCORE`.
    #[serde(default)]
    pub disqualified: bool,
}

impl FitResult {
    /// Result for an out-of-position player.
    pub const DISQUALIFIED: FitResult = FitResult {
        score: DISQUALIFIED_SCORE,
        label: FitLabel::Unusable,
        disqualified: true,
    };

    pub fn from_score(score: i32) -> Self {
        Self {
            score,
            label: FitLabel::from_score(score),
            disqualified: false,
        }
    }

    /// True only for the position-gate sentinel, not for low but eligible scores.
    pub fn is_disqualified(&self) -> bool {
        self.disqualified
    }
}
