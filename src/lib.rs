// In: src/lib.rs

//! Pokemon Duel Battle Engine
//!
//! A deterministic one-on-one Pokemon battle simulator built for game-playing
//! agents: battles are plain values that clone cheaply, every random draw
//! goes through one per-battle source, and headless battles skip message
//! bookkeeping entirely.

// --- MODULE DECLARATIONS ---
// This declares the module hierarchy for the crate.
pub mod battle;
pub mod catalog;
pub mod errors;
pub mod items;
pub mod moves;
pub mod pokemon;
pub mod prefab;
pub mod species;
pub mod trainer;
pub mod type_chart;

// --- PUBLIC API RE-EXPORTS ---
// This section defines the public-facing API of the `pokemon-duel` crate,
// making it easy for users to import the most important types directly.

// --- From the `schema` crate ---
// Re-export the closed enums and the catalog definition format.
pub use schema::{
    // Supporting Types & Enums
    BaseStats,
    // Definition format
    CatalogDefinition,
    ElementalType,
    ItemCategory,
    ItemDefinition,
    ItemEffectDefinition,
    MoveCategory,
    MoveDefinition,
    MoveEffectDefinition,
    SpeciesDefinition,
    StatType,
    StatusType,
    Target,
    VolatileType,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine and its events.
pub use battle::action::{Action, STRUGGLE_SLOT};
pub use battle::engine::{Battle, BattleOptions, DEFAULT_MAX_ROUNDS};
pub use battle::state::{ActionFailureReason, BattleEvent, EventBus, TurnRng};

// Core runtime types for a battle.
pub use catalog::Catalog;
pub use items::{Item, ItemEffect, ItemId};
pub use moves::{Move, MoveId, MoveKind};
pub use pokemon::{MoveSlot, PokemonInst, StatusCondition, VolatileState};
pub use species::{Species, SpeciesId};
pub use trainer::Trainer;
pub use type_chart::TypeChart;

// Crate-specific error and result types.
pub use errors::{
    BattleError, CatalogError, CatalogResult, DuelError, DuelResult, ScenarioError, TeamError,
    TeamResult,
};

/// One line of battle output. Events render to text through `Display`.
pub type Message = BattleEvent;
