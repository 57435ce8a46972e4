//! Roles (target position + ranked attributes) and the role catalog.

use crate::models::attribute::Attribute;
use crate::models::error::FitError;
use crate::models::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Maximum number of ranked attributes on a role.
pub const MAX_RANKED_ATTRIBUTES: usize = 4;

/// A named role: one target position plus up to four ranked attributes.
///
/// `attributes[i]` is the attribute at rank `i` (0 is the most important).
/// A rank may be empty while later ranks are set; each set attribute is
/// always scored with its own rank's threshold and weight.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RoleRecord", into = "RoleRecord")]
pub struct Role {
    pub name: String,
    pub position: Position,
    pub attributes: [Option<Attribute>; MAX_RANKED_ATTRIBUTES],
}

impl Role {
    /// Role with `attributes` filling ranks 1.. in order, no gaps.
    pub fn new(
        name: impl Into<String>,
        position: Position,
        attributes: Vec<Attribute>,
    ) -> Result<Self, FitError> {
        let name = name.into();
        if attributes.len() > MAX_RANKED_ATTRIBUTES {
            return Err(FitError::InvalidRole(format!(
                "{} has {} ranked attributes (max {})",
                name.trim(),
                attributes.len(),
                MAX_RANKED_ATTRIBUTES
            )));
        }
        let mut ranks = [None; MAX_RANKED_ATTRIBUTES];
        for (slot, a) in ranks.iter_mut().zip(attributes) {
            *slot = Some(a);
        }
        Self::with_ranks(name, position, ranks)
    }

    /// Role with an explicit attribute per rank; empty ranks are allowed anywhere.
    pub fn with_ranks(
        name: impl Into<String>,
        position: Position,
        attributes: [Option<Attribute>; MAX_RANKED_ATTRIBUTES],
    ) -> Result<Self, FitError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(FitError::InvalidRole("role name is empty".into()));
        }
        for (i, a) in attributes.iter().enumerate() {
            if let Some(a) = a {
                if attributes[..i].contains(&Some(*a)) {
                    return Err(FitError::InvalidRole(format!("{} ranks {} twice", name, a)));
                }
            }
        }
        Ok(Self {
            name,
            position,
            attributes,
        })
    }

    /// Attribute at rank index `i` (0-based), if assigned.
    pub fn ranked(&self, i: usize) -> Option<Attribute> {
        self.attributes.get(i).copied().flatten()
    }

    /// `(rank index, attribute)` for every assigned rank, best rank first.
    pub fn ranked_attributes(&self) -> impl Iterator<Item = (usize, Attribute)> + '_ {
        self.attributes
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.map(|a| (i, a)))
    }

    fn key(&self) -> String {
        name_key(&self.name)
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Role as stored in the catalog file: `Role` (or legacy `RoleType`),
/// `Position`, and `Attribute1`..`Attribute4` as short codes.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RoleRecord {
    #[serde(rename = "Role", alias = "RoleType", alias = "name")]
    pub role: String,
    #[serde(rename = "Position", alias = "position")]
    pub position: String,
    #[serde(rename = "Attribute1", default)]
    pub attribute_1: String,
    #[serde(rename = "Attribute2", default)]
    pub attribute_2: String,
    #[serde(rename = "Attribute3", default)]
    pub attribute_3: String,
    #[serde(rename = "Attribute4", default)]
    pub attribute_4: String,
}

impl TryFrom<RoleRecord> for Role {
    type Error = FitError;

    fn try_from(r: RoleRecord) -> Result<Self, Self::Error> {
        let position = Position::normalize(&r.position)?;
        let mut attributes = [None; MAX_RANKED_ATTRIBUTES];
        let raw = [&r.attribute_1, &r.attribute_2, &r.attribute_3, &r.attribute_4];
        for (slot, raw) in attributes.iter_mut().zip(raw) {
            *slot = Attribute::parse(raw)?;
        }
        Role::with_ranks(r.role, position, attributes)
    }
}

impl From<Role> for RoleRecord {
    fn from(role: Role) -> Self {
        let code = |i: usize| role.ranked(i).map(|a| a.code().to_string()).unwrap_or_default();
        RoleRecord {
            attribute_1: code(0),
            attribute_2: code(1),
            attribute_3: code(2),
            attribute_4: code(3),
            position: role.position.code().to_string(),
            role: role.name.clone(),
        }
    }
}

/// Ordered role catalog with case-insensitive name lookup.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct RoleCatalog {
    roles: Vec<Role>,
}

impl RoleCatalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn new(roles: Vec<Role>) -> Result<Self, FitError> {
        let mut catalog = Self::default();
        for role in roles {
            catalog.insert(role)?;
        }
        Ok(catalog)
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Role> {
        let key = name_key(name);
        self.roles.iter().find(|r| r.key() == key)
    }

    /// Look up a role, failing with `UnknownRole` if absent.
    pub fn require(&self, name: &str) -> Result<&Role, FitError> {
        self.get(name)
            .ok_or_else(|| FitError::UnknownRole(name.trim().to_string()))
    }

    pub fn insert(&mut self, role: Role) -> Result<(), FitError> {
        if self.get(&role.name).is_some() {
            return Err(FitError::DuplicateName(role.name));
        }
        self.roles.push(role);
        Ok(())
    }

    /// Replace the role called `original_name` (which may be renamed) in place.
    pub fn update(&mut self, original_name: &str, role: Role) -> Result<(), FitError> {
        let key = name_key(original_name);
        let idx = self
            .roles
            .iter()
            .position(|r| r.key() == key)
            .ok_or_else(|| FitError::UnknownRole(original_name.trim().to_string()))?;
        let renamed_onto_other = self
            .roles
            .iter()
            .enumerate()
            .any(|(i, r)| i != idx && r.key() == role.key());
        if renamed_onto_other {
            return Err(FitError::DuplicateName(role.name));
        }
        self.roles[idx] = role;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Role, FitError> {
        let key = name_key(name);
        let idx = self
            .roles
            .iter()
            .position(|r| r.key() == key)
            .ok_or_else(|| FitError::UnknownRole(name.trim().to_string()))?;
        Ok(self.roles.remove(idx))
    }

    /// Role names per position, each list sorted alphabetically.
    pub fn by_position(&self) -> BTreeMap<Position, Vec<String>> {
        let mut map: BTreeMap<Position, Vec<String>> = BTreeMap::new();
        for r in &self.roles {
            map.entry(r.position).or_default().push(r.name.clone());
        }
        for names in map.values_mut() {
            names.sort();
        }
        map
    }

    /// Parse a JSON array of role records.
    pub fn from_json(json: &str) -> Result<Self, FitError> {
        let records: Vec<RoleRecord> =
            serde_json::from_str(json).map_err(|e| FitError::Load(e.to_string()))?;
        Self::from_records(records)
    }

    /// Parse CSV with the header `Role,Position,Attribute1,...,Attribute4`.
    pub fn from_csv<R: std::io::Read>(reader: R) -> Result<Self, FitError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut records = Vec::new();
        for row in rdr.deserialize::<RoleRecord>() {
            records.push(row.map_err(|e| FitError::Load(e.to_string()))?);
        }
        Self::from_records(records)
    }

    fn from_records(records: Vec<RoleRecord>) -> Result<Self, FitError> {
        let roles = records
            .into_iter()
            .map(Role::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(roles)
    }

    /// Load from a `.json` or `.csv` file (chosen by extension).
    pub fn load(path: &Path) -> Result<Self, FitError> {
        let is_csv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            let file = std::fs::File::open(path)
                .map_err(|e| FitError::Load(format!("{}: {}", path.display(), e)))?;
            Self::from_csv(file)
        } else {
            let json = std::fs::read_to_string(path)
                .map_err(|e| FitError::Load(format!("{}: {}", path.display(), e)))?;
            Self::from_json(&json)
        }
    }

    /// The catalog as a pretty JSON array of role records, the shape `from_json` reads.
    pub fn to_json(&self) -> Result<String, FitError> {
        serde_json::to_string_pretty(&self.roles).map_err(|e| FitError::Load(e.to_string()))
    }
}
