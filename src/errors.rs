use thiserror::Error;

/// Main error type for the pokemon-duel engine.
///
/// Every variant is a construction-time failure. Nothing in here is raised
/// while a turn is being simulated: misses, blocked moves and useless items
/// are reported as battle events instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    /// Error while building or querying a catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Error while assembling an individual or a trainer
    #[error("Team error: {0}")]
    Team(#[from] TeamError),
    /// Error related to the battle itself
    #[error("Battle error: {0}")]
    Battle(#[from] BattleError),
    /// Error while instantiating a prefab scenario
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),
}

/// Errors related to catalog definitions and lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog text could not be parsed
    #[error("Malformed catalog data: {0}")]
    Parse(String),
    /// Two entries of the same kind share an id
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: u16 },
    /// Ids must be dense (0..len) so they can index the catalog tables
    #[error("{kind} ids must be dense: expected {expected}, found {found}")]
    SparseId {
        kind: &'static str,
        expected: usize,
        found: u16,
    },
    /// Two entries of the same kind share a name
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },
    /// A species lists a move that the catalog does not define
    #[error("Species {species} refers to unknown move {name}")]
    UnknownMove { species: String, name: String },
    /// A definition is outside the accepted value ranges
    #[error("Invalid {kind} {name}: {reason}")]
    Invalid {
        kind: &'static str,
        name: String,
        reason: String,
    },
    /// A lookup by name or id found nothing
    #[error("No {kind} named {name}")]
    NotFound { kind: &'static str, name: String },
}

/// Errors related to building individuals and trainers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    /// Level is outside 1..=100
    #[error("Invalid level: {0}")]
    InvalidLevel(u8),
    /// An individual value is outside 0..=31
    #[error("Invalid IV {value} at position {index}")]
    InvalidIv { index: usize, value: u8 },
    /// An individual may know at most four moves
    #[error("Too many moves: {0}")]
    TooManyMoves(usize),
    /// A trainer needs at least one individual
    #[error("A team needs at least one Pokemon")]
    EmptyTeam,
    /// A trainer may carry at most six individuals
    #[error("Team too large: {0}")]
    TeamTooLarge(usize),
    /// Inventory refers to an item id the catalog does not have
    #[error("Unknown item id: {0}")]
    UnknownItem(u16),
    /// Species id is not part of the catalog
    #[error("Unknown species id: {0}")]
    UnknownSpecies(u16),
    /// Move id is not part of the catalog
    #[error("Unknown move id: {0}")]
    UnknownMove(u16),
}

/// Errors related to battle construction and protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// A turn was requested after the battle ended
    #[error("The battle is already finished")]
    BattleFinished,
    /// The round cap must allow at least one round
    #[error("Max rounds must be greater than 0")]
    InvalidMaxRounds,
}

/// Errors related to prefab scenarios
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// No scenario is registered under this name
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

/// Type alias for Results using DuelError
pub type DuelResult<T> = Result<T, DuelError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Type alias for Results using TeamError
pub type TeamResult<T> = Result<T, TeamError>;
