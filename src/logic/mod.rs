//! Business logic: fit scoring, squad assignment, player analysis, market search.

mod analysis;
mod assignment;
mod market;
mod scoring;

pub use analysis::{analyze_player, PlayerAnalysis, RoleFit};
pub use assignment::{assign_squad, assign_squad_with, AssignmentPolicy};
pub use market::{rank_listings, MarketListing, MarketQuery, RemoteListing, MARKET_PAGE_SIZE};
pub use scoring::{score_fit, score_fit_by_name};
