//! Errors for catalog lookups and validation.

/// Errors that can occur while scoring, assigning, or editing catalogs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FitError {
    /// Tier name not present in the tier table.
    UnknownTier(String),
    /// Role name not present in the role catalog.
    UnknownRole(String),
    /// Formation name not present in the formation catalog.
    UnknownFormation(String),
    /// Attribute code is not one of the seven known attributes.
    UnknownAttribute(String),
    /// Position code could not be normalized to a canonical position.
    UnknownPosition(String),
    /// Role definition breaks an invariant (empty name, >4 attributes, duplicates).
    InvalidRole(String),
    /// Formation definition breaks an invariant (no slots, duplicate slot ids).
    InvalidFormation(String),
    /// Tier table definition breaks an invariant.
    InvalidTier(String),
    /// A role or formation with this name already exists (names are case-insensitive).
    DuplicateName(String),
    /// Club name not present in the registry.
    UnknownClub(String),
    /// Club name is empty or the unassigned sentinel.
    InvalidClub(String),
    /// Player is not on the club the caller claims it is.
    ClubMismatch { expected: String, actual: String },
    /// Catalog file could not be read or parsed.
    Load(String),
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::UnknownTier(name) => write!(f, "Unknown tier: {}", name),
            FitError::UnknownRole(name) => write!(f, "Role not found: {}", name),
            FitError::UnknownFormation(name) => write!(f, "Formation not found: {}", name),
            FitError::UnknownAttribute(code) => write!(f, "Unknown attribute: {}", code),
            FitError::UnknownPosition(code) => write!(f, "Unknown position: {}", code),
            FitError::InvalidRole(msg) => write!(f, "Invalid role: {}", msg),
            FitError::InvalidFormation(msg) => write!(f, "Invalid formation: {}", msg),
            FitError::InvalidTier(msg) => write!(f, "Invalid tier table: {}", msg),
            FitError::DuplicateName(name) => write!(f, "Name already exists: {}", name),
            FitError::UnknownClub(name) => write!(f, "Club not found: {}", name),
            FitError::InvalidClub(name) => write!(f, "Invalid club name: {:?}", name),
            FitError::ClubMismatch { expected, actual } => {
                write!(f, "Player is assigned to {} (expected {})", actual, expected)
            }
            FitError::Load(msg) => write!(f, "Failed to load catalog: {}", msg),
        }
    }
}

impl std::error::Error for FitError {}

impl FitError {
    /// True for errors caused by referencing something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FitError::UnknownTier(_)
                | FitError::UnknownRole(_)
                | FitError::UnknownFormation(_)
                | FitError::UnknownClub(_)
        )
    }
}
