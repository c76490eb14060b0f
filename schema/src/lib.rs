// Duel Schema - Shared definition types
// This crate contains the closed enums and the declarative definition structs
// shared between the pokemon-duel engine and the catalog files it loads.
// Everything here is plain data: validation and resolution happen in the
// engine's catalog module.

// Re-export the main types
pub use battle_data::*;
pub use item_data::*;
pub use move_data::*;
pub use move_types::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod item_data;
pub mod move_data;
pub mod move_types;
pub mod pokemon_types;
pub mod species_data;
