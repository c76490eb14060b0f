use crate::{ItemDefinition, MoveDefinition, SpeciesDefinition};
use serde::{Deserialize, Serialize};

/// A complete, unresolved catalog document.
///
/// Species refer to moves by name; ids must be dense within each list so
/// the engine can index by id after validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub species: Vec<SpeciesDefinition>,
    #[serde(default)]
    pub moves: Vec<MoveDefinition>,
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementalType, MoveCategory, MoveEffectDefinition, StatusType};

    #[test]
    fn test_catalog_definition_from_ron() {
        let text = r#"(
            species: [
                (
                    id: 0,
                    name: "Pikachu",
                    types: [Electric],
                    base_stats: (hp: 35, attack: 55, defense: 40, sp_attack: 50, sp_defense: 50, speed: 90),
                    default_moves: ["Thunder Wave"],
                ),
            ],
            moves: [
                (
                    id: 0,
                    name: "Thunder Wave",
                    category: Status,
                    element: Electric,
                    power: 0,
                    accuracy: 90,
                    pp: 20,
                    effect: InflictStatus(status: Some(Paralysis)),
                ),
            ],
        )"#;

        let catalog: CatalogDefinition = ron::from_str(text).expect("valid catalog text");

        assert_eq!(catalog.species[0].types, vec![ElementalType::Electric]);
        assert_eq!(catalog.moves[0].category, MoveCategory::Status);
        assert_eq!(catalog.moves[0].priority, 0);
        assert_eq!(
            catalog.moves[0].effect,
            MoveEffectDefinition::InflictStatus {
                status: Some(StatusType::Paralysis),
                volatile: None,
                chance: 100,
                duration: None,
            }
        );
        assert!(catalog.items.is_empty());
    }
}
