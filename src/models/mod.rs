//! Data structures: players, roles, tiers, formations, clubs, and fit results.

mod attribute;
mod club;
mod error;
mod fit;
mod formation;
mod player;
mod position;
mod role;
mod squad;
mod tier;

pub use attribute::{Attribute, Attributes};
pub use club::{Club, ClubId, ClubRegistry};
pub use error::FitError;
pub use fit::{FitLabel, FitResult, ATTRIBUTE_WEIGHTS, DISQUALIFIED_SCORE};
pub use formation::{Formation, FormationCatalog, FormationSlot, RoleMap, SlotRole};
pub use player::{Player, PlayerId, RemotePlayer, RemotePlayerMetadata, UNASSIGNED_CLUB};
pub use position::Position;
pub use role::{Role, RoleCatalog, RoleRecord, MAX_RANKED_ATTRIBUTES};
pub use squad::{AssignedPlayer, SlotAssignment, SquadAssignment, SquadRow, SquadSummary};
pub use tier::{Tier, TierTable, DEFAULT_TIER};
