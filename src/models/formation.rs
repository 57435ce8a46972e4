//! Formations (ordered slots with positions and default roles) and their catalog.

use crate::models::error::FitError;
use crate::models::position::Position;
use crate::models::role::{Role, RoleCatalog};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// One seat in a formation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    /// Slot identifier, unique within the formation (e.g. `CB1`).
    pub slot: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_role: Option<String>,
}

/// A named arrangement of slots, in lineup order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub name: String,
    pub slots: Vec<FormationSlot>,
}

/// A slot with its role resolved against the role catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotRole {
    pub slot: String,
    pub position: Position,
    /// None when nothing could be resolved; the slot stays Unfilled.
    pub role: Option<Role>,
}

/// Ordered slot -> role name mapping, as sent by the lineup screens.
///
/// JSON objects keep their key order here, since slot order is lineup order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoleMap(pub Vec<(String, String)>);

impl RoleMap {
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(slot))
            .map(|(_, r)| r.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>, R: Into<String>> FromIterator<(S, R)> for RoleMap {
    fn from_iter<I: IntoIterator<Item = (S, R)>>(iter: I) -> Self {
        RoleMap(iter.into_iter().map(|(s, r)| (s.into(), r.into())).collect())
    }
}

impl Serialize for RoleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (slot, role) in &self.0 {
            map.serialize_entry(slot, role)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RoleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoleMapVisitor;

        impl<'de> Visitor<'de> for RoleMapVisitor {
            type Value = RoleMap;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of slot to role name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RoleMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((slot, role)) = access.next_entry::<String, Option<String>>()? {
                    entries.push((slot, role.unwrap_or_default()));
                }
                Ok(RoleMap(entries))
            }
        }

        deserializer.deserialize_map(RoleMapVisitor)
    }
}

impl Formation {
    /// Build a formation, rejecting empty slot lists and duplicate slot ids.
    pub fn new(name: impl Into<String>, slots: Vec<FormationSlot>) -> Result<Self, FitError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(FitError::InvalidFormation("formation name is empty".into()));
        }
        if slots.is_empty() {
            return Err(FitError::InvalidFormation(format!("{} has no slots", name)));
        }
        for (i, s) in slots.iter().enumerate() {
            if s.slot.trim().is_empty() {
                return Err(FitError::InvalidFormation(format!("{} has an unnamed slot", name)));
            }
            if slots[..i].iter().any(|o| o.slot.eq_ignore_ascii_case(&s.slot)) {
                return Err(FitError::InvalidFormation(format!(
                    "{} repeats slot {}",
                    name, s.slot
                )));
            }
        }
        Ok(Self { name, slots })
    }

    /// Build from a slot -> default role map. A slot's position comes from its
    /// role when the role is known, else from the slot id (`CB2` -> CB).
    pub fn from_role_map(
        name: impl Into<String>,
        role_map: &RoleMap,
        roles: &RoleCatalog,
    ) -> Result<Self, FitError> {
        let slots = role_map
            .0
            .iter()
            .map(|(slot, role_name)| -> Result<FormationSlot, FitError> {
                let default_role = Some(role_name.trim())
                    .filter(|r| !r.is_empty())
                    .map(str::to_string);
                let position = match default_role.as_deref().and_then(|r| roles.get(r)) {
                    Some(role) => role.position,
                    None => Position::normalize(slot)?,
                };
                Ok(FormationSlot {
                    slot: slot.trim().to_string(),
                    position,
                    default_role,
                })
            })
            .collect::<Result<Vec<_>, FitError>>()?;
        Formation::new(name, slots)
    }

    /// Resolve one role per slot.
    ///
    /// Precedence: caller override, then the slot's default role, then the
    /// alphabetically first catalog role for the slot's position. A named role
    /// that is not in the catalog is an error; a slot with no candidate at all
    /// resolves to `None`. A resolved slot reports its role's position, since
    /// that is what decides eligibility.
    pub fn resolve_roles(
        &self,
        overrides: &RoleMap,
        roles: &RoleCatalog,
    ) -> Result<Vec<SlotRole>, FitError> {
        for (slot, _) in &overrides.0 {
            if !self.slots.iter().any(|s| s.slot.eq_ignore_ascii_case(slot)) {
                return Err(FitError::InvalidFormation(format!(
                    "{} has no slot {}",
                    self.name, slot
                )));
            }
        }
        let by_position = roles.by_position();
        self.slots
            .iter()
            .map(|s| -> Result<SlotRole, FitError> {
                let named = overrides
                    .get(&s.slot)
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .or_else(|| s.default_role.as_deref().map(str::trim).filter(|r| !r.is_empty()));
                let role = match named {
                    Some(name) => Some(roles.require(name)?.clone()),
                    None => by_position
                        .get(&s.position)
                        .and_then(|names| names.first())
                        .and_then(|name| roles.get(name))
                        .cloned(),
                };
                Ok(SlotRole {
                    slot: s.slot.clone(),
                    position: role.as_ref().map(|r| r.position).unwrap_or(s.position),
                    role,
                })
            })
            .collect()
    }
}

impl SlotRole {
    /// Slots straight from a slot -> role map with no formation behind it;
    /// each slot takes its role's position. Every role must exist.
    pub fn from_role_map(role_map: &RoleMap, roles: &RoleCatalog) -> Result<Vec<SlotRole>, FitError> {
        role_map
            .0
            .iter()
            .map(|(slot, name)| -> Result<SlotRole, FitError> {
                let role = roles.require(name)?.clone();
                Ok(SlotRole {
                    slot: slot.clone(),
                    position: role.position,
                    role: Some(role),
                })
            })
            .collect()
    }
}

/// Ordered formation catalog.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct FormationCatalog {
    formations: Vec<Formation>,
}

fn slot(slot: &str, position: Position, role: &str) -> FormationSlot {
    FormationSlot {
        slot: slot.to_string(),
        position,
        default_role: Some(role.to_string()),
    }
}

impl Default for FormationCatalog {
    /// The two stock formations.
    fn default() -> Self {
        use Position::*;
        let four_two_three_one = Formation {
            name: "4-2-3-1".to_string(),
            slots: vec![
                slot("GK", GK, "GK-Sweeper"),
                slot("LB", LB, "LB-Overlapper"),
                slot("RB", RB, "RB-Recovery"),
                slot("CB1", CB, "CB-Mobile"),
                slot("CB2", CB, "CB-Destroyer"),
                slot("CDM1", CDM, "CDM-Holding"),
                slot("CDM2", CDM, "CDM-Volante"),
                slot("LM", LM, "LM-Creative"),
                slot("RM", RM, "RM-Direct"),
                slot("CAM", CAM, "CAM-Playmaker"),
                slot("ST", ST, "ST-Complete"),
            ],
        };
        let three_five_two = Formation {
            name: "3-5-2".to_string(),
            slots: vec![
                slot("GK", GK, "GK-Sweeper"),
                slot("CB1", CB, "CB-Wide"),
                slot("CB2", CB, "CB-Central"),
                slot("CB3", CB, "CB-Wide"),
                slot("CDM", CDM, "CDM-Anchor"),
                slot("CM1", CM, "CM-Creator"),
                slot("CM2", CM, "CM-Carrier"),
                slot("LM", LM, "LM-Wingbacks"),
                slot("RM", RM, "RM-Wingbacks"),
                slot("ST1", ST, "ST-Deep"),
                slot("ST2", ST, "ST-Advanced"),
            ],
        };
        Self {
            formations: vec![four_two_three_one, three_five_two],
        }
    }
}

impl FormationCatalog {
    pub fn new(formations: Vec<Formation>) -> Result<Self, FitError> {
        let mut catalog = Self {
            formations: Vec::new(),
        };
        for f in formations {
            catalog.insert(f)?;
        }
        Ok(catalog)
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn names(&self) -> Vec<&str> {
        self.formations.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Formation> {
        let name = name.trim();
        self.formations.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn require(&self, name: &str) -> Result<&Formation, FitError> {
        self.get(name)
            .ok_or_else(|| FitError::UnknownFormation(name.trim().to_string()))
    }

    pub fn insert(&mut self, formation: Formation) -> Result<(), FitError> {
        if self.get(&formation.name).is_some() {
            return Err(FitError::DuplicateName(formation.name));
        }
        self.formations.push(formation);
        Ok(())
    }

    /// Replace the slots of an existing formation, keeping its name.
    pub fn replace(&mut self, name: &str, slots: Vec<FormationSlot>) -> Result<(), FitError> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| FitError::UnknownFormation(name.trim().to_string()))?;
        let rebuilt = Formation::new(self.formations[idx].name.clone(), slots)?;
        self.formations[idx] = rebuilt;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Formation, FitError> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| FitError::UnknownFormation(name.trim().to_string()))?;
        Ok(self.formations.remove(idx))
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.formations
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Load a JSON array of formations (canonical schema).
    pub fn load(path: &Path) -> Result<Self, FitError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| FitError::Load(format!("{}: {}", path.display(), e)))?;
        let raw: Vec<Formation> =
            serde_json::from_str(&json).map_err(|e| FitError::Load(e.to_string()))?;
        let validated = raw
            .into_iter()
            .map(|f| Formation::new(f.name, f.slots))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attribute::Attribute;

    fn catalog() -> RoleCatalog {
        RoleCatalog::new(vec![
            Role::new("CB-Mobile", Position::CB, vec![Attribute::Defense, Attribute::Pace]).unwrap(),
            Role::new("CB-Anchor", Position::CB, vec![Attribute::Defense]).unwrap(),
            Role::new("ST-Poacher", Position::ST, vec![Attribute::Shooting]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn role_map_keeps_json_key_order() {
        let m: RoleMap = serde_json::from_str(r#"{"ST": "a", "GK": "b", "CB1": "c"}"#).unwrap();
        let slots: Vec<_> = m.0.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(slots, ["ST", "GK", "CB1"]);
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"ST":"a","GK":"b","CB1":"c"}"#);
    }

    #[test]
    fn formation_rejects_duplicate_and_empty_slots() {
        assert!(Formation::new("x", vec![]).is_err());
        let dup = vec![
            slot("CB1", Position::CB, "a"),
            slot("cb1", Position::CB, "b"),
        ];
        assert!(Formation::new("x", dup).is_err());
    }

    #[test]
    fn resolve_prefers_override_then_default_then_position_fallback() {
        let f = Formation::new(
            "test",
            vec![
                slot("CB1", Position::CB, "CB-Mobile"),
                FormationSlot {
                    slot: "CB2".into(),
                    position: Position::CB,
                    default_role: None,
                },
                FormationSlot {
                    slot: "GK".into(),
                    position: Position::GK,
                    default_role: None,
                },
            ],
        )
        .unwrap();
        let overrides: RoleMap = [("CB1", "CB-Anchor")].into_iter().collect();
        let resolved = f.resolve_roles(&overrides, &catalog()).unwrap();
        assert_eq!(resolved[0].role.as_ref().unwrap().name, "CB-Anchor");
        // Fallback is alphabetical: CB-Anchor < CB-Mobile.
        assert_eq!(resolved[1].role.as_ref().unwrap().name, "CB-Anchor");
        assert!(resolved[2].role.is_none());
    }

    #[test]
    fn resolved_slot_reports_role_position() {
        let f = Formation::new(
            "test",
            vec![
                slot("LB", Position::LB, "CB-Mobile"),
                FormationSlot {
                    slot: "GK".into(),
                    position: Position::GK,
                    default_role: None,
                },
            ],
        )
        .unwrap();
        let resolved = f.resolve_roles(&RoleMap::default(), &catalog()).unwrap();
        assert_eq!(resolved[0].position, Position::CB);
        assert_eq!(resolved[1].position, Position::GK);
    }

    #[test]
    fn resolve_fails_on_unknown_role_or_slot() {
        let f = FormationCatalog::default().require("4-2-3-1").unwrap().clone();
        // Stock defaults are not in this small catalog.
        assert!(matches!(
            f.resolve_roles(&RoleMap::default(), &catalog()),
            Err(FitError::UnknownRole(_))
        ));
        let bad: RoleMap = [("LWB", "CB-Mobile")].into_iter().collect();
        assert!(matches!(
            f.resolve_roles(&bad, &catalog()),
            Err(FitError::InvalidFormation(_))
        ));
    }

    #[test]
    fn from_role_map_derives_positions() {
        let m: RoleMap = [("CB1", "CB-Mobile"), ("ST", "Unknown-Role")].into_iter().collect();
        let f = Formation::from_role_map("custom", &m, &catalog()).unwrap();
        assert_eq!(f.slots[0].position, Position::CB);
        assert_eq!(f.slots[1].position, Position::ST);
    }

    #[test]
    fn stock_formations_have_eleven_slots() {
        let c = FormationCatalog::default();
        assert_eq!(c.names(), ["4-2-3-1", "3-5-2"]);
        for f in c.formations() {
            assert_eq!(f.slots.len(), 11);
            assert!(Formation::new(f.name.clone(), f.slots.clone()).is_ok());
        }
    }
}
