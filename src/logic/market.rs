//! Marketplace search: build listing filters for a role and rank the results.

use crate::logic::scoring::score_fit;
use crate::models::{FitResult, Player, RemotePlayer, Role, Tier};
use serde::{Deserialize, Serialize};

/// Listings requested per search.
pub const MARKET_PAGE_SIZE: u32 = 25;

/// Query parameters for the listing service.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MarketQuery {
    pub params: Vec<(String, String)>,
}

impl MarketQuery {
    /// Available players at the role's position with every ranked attribute
    /// at least the tier threshold for its rank.
    pub fn for_role(role: &Role, tier: &Tier) -> Self {
        let mut params = vec![
            ("limit".to_string(), MARKET_PAGE_SIZE.to_string()),
            ("type".to_string(), "PLAYER".to_string()),
            ("status".to_string(), "AVAILABLE".to_string()),
            ("view".to_string(), "full".to_string()),
            ("positions".to_string(), role.position.code().to_string()),
        ];
        for (rank, attr) in role.ranked_attributes() {
            params.push((format!("{}Min", attr.field_name()), tier.thresholds[rank].to_string()));
        }
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A listing as returned by the listing service.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteListing {
    pub listing_resource_id: u64,
    #[serde(default)]
    pub price: Option<u64>,
    pub player: RemotePlayer,
}

/// A listing with its player normalized and scored for the searched role.
#[derive(Clone, Debug, Serialize)]
pub struct MarketListing {
    pub listing_id: u64,
    pub price: Option<u64>,
    pub player: Player,
    pub fit: FitResult,
}

/// Normalize, score and sort listings by price (cheapest first; unpriced last,
/// ties by player id).
pub fn rank_listings(listings: Vec<RemoteListing>, role: &Role, tier: &Tier) -> Vec<MarketListing> {
    let mut ranked: Vec<MarketListing> = listings
        .into_iter()
        .map(|l| {
            let player = Player::from(l.player);
            let fit = score_fit(&player, role, tier);
            MarketListing {
                listing_id: l.listing_resource_id,
                price: l.price,
                player,
                fit,
            }
        })
        .collect();
    ranked.sort_by_key(|l| (l.price.is_none(), l.price, l.player.id));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attribute, Position, TierTable};

    fn role() -> Role {
        use Attribute::*;
        Role::new("CB-Mobile", Position::CB, vec![Defense, Pace, Physical]).unwrap()
    }

    #[test]
    fn query_carries_position_and_rank_thresholds() {
        let tiers = TierTable::default();
        let q = MarketQuery::for_role(&role(), tiers.require("Iron").unwrap());
        assert_eq!(q.get("positions"), Some("CB"));
        assert_eq!(q.get("defenseMin"), Some("80"));
        assert_eq!(q.get("paceMin"), Some("77"));
        assert_eq!(q.get("physicalMin"), Some("74"));
        assert_eq!(q.get("shootingMin"), None);
        assert_eq!(q.get("limit"), Some("25"));
    }

    #[test]
    fn query_uses_each_attribute_own_rank_across_gaps() {
        use Attribute::*;
        let gap = Role::with_ranks("CB-Gap", Position::CB, [Some(Defense), None, Some(Pace), None]).unwrap();
        let tiers = TierTable::default();
        let q = MarketQuery::for_role(&gap, tiers.require("Iron").unwrap());
        assert_eq!(q.get("defenseMin"), Some("80"));
        assert_eq!(q.get("paceMin"), Some("74"));
    }

    #[test]
    fn listings_sorted_by_price_and_scored() {
        let json = r#"[
            {"listingResourceId": 1, "price": 900, "player": {"id": 10, "metadata": {"positions": ["CB"], "defense": 85, "pace": 80, "physical": 74}}},
            {"listingResourceId": 2, "player": {"id": 11, "metadata": {"positions": ["ST"]}}},
            {"listingResourceId": 3, "price": 150, "player": {"id": 12, "metadata": {"positions": ["CB"], "defense": 80, "pace": 77, "physical": 74}}}
        ]"#;
        let listings: Vec<RemoteListing> = serde_json::from_str(json).unwrap();
        let tiers = TierTable::default();
        let ranked = rank_listings(listings, &role(), tiers.require("Iron").unwrap());
        let ids: Vec<_> = ranked.iter().map(|l| l.listing_id).collect();
        assert_eq!(ids, [3, 1, 2]);
        assert_eq!(ranked[0].fit.score, 0);
        // (85-80)*4 + (80-77)*3 + 0
        assert_eq!(ranked[1].fit.score, 29);
        assert!(ranked[2].fit.is_disqualified());
    }
}
