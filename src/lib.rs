//! MFL squad manager: library with models, role fit scoring and squad assignment.

pub mod logic;
pub mod models;
pub mod remote;

pub use logic::{
    analyze_player, assign_squad, assign_squad_with, rank_listings, score_fit, score_fit_by_name,
    AssignmentPolicy, MarketListing, MarketQuery, PlayerAnalysis, RemoteListing, RoleFit,
};
pub use models::{
    AssignedPlayer, Attribute, Attributes, Club, ClubId, ClubRegistry, FitError, FitLabel,
    FitResult, Formation, FormationCatalog, FormationSlot, Player, PlayerId, Position, Role,
    RoleCatalog, RoleMap, SlotAssignment, SlotRole, SquadAssignment, SquadSummary, Tier,
    TierTable, ATTRIBUTE_WEIGHTS, DEFAULT_TIER, DISQUALIFIED_SCORE, UNASSIGNED_CLUB,
};
