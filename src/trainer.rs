use crate::catalog::Catalog;
use crate::errors::{TeamError, TeamResult};
use crate::items::ItemId;
use crate::pokemon::PokemonInst;
use std::fmt;
use std::sync::Arc;

pub const MAX_TEAM_SIZE: usize = 6;

/// One side of a battle: a team whose slot 0 is the active Pokemon, plus an
/// inventory indexed by item id.
#[derive(Debug, Clone, PartialEq)]
pub struct Trainer {
    name: Arc<str>,
    team: Vec<PokemonInst>,
    initial_team: Arc<[PokemonInst]>,
    inventory: Vec<u16>,
    initial_inventory: Arc<[u16]>,
}

impl Trainer {
    /// Create a trainer. `item_count` is the number of items in the catalog
    /// the inventory refers to.
    pub fn new(
        name: &str,
        team: Vec<PokemonInst>,
        inventory: &[(ItemId, u16)],
        item_count: usize,
    ) -> TeamResult<Self> {
        if team.is_empty() {
            return Err(TeamError::EmptyTeam);
        }
        if team.len() > MAX_TEAM_SIZE {
            return Err(TeamError::TeamTooLarge(team.len()));
        }

        let mut quantities = vec![0u16; item_count];
        for &(item, quantity) in inventory {
            let slot = quantities
                .get_mut(usize::from(item.0))
                .ok_or(TeamError::UnknownItem(item.0))?;
            *slot = slot.saturating_add(quantity);
        }

        Ok(Trainer {
            name: Arc::from(name),
            initial_team: Arc::from(team.as_slice()),
            team,
            initial_inventory: Arc::from(quantities.as_slice()),
            inventory: quantities,
        })
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    // === Team ===

    pub fn active(&self) -> &PokemonInst {
        &self.team[0]
    }

    pub fn active_mut(&mut self) -> &mut PokemonInst {
        &mut self.team[0]
    }

    pub fn team(&self) -> &[PokemonInst] {
        &self.team
    }

    pub fn pokemon(&self, index: usize) -> Option<&PokemonInst> {
        self.team.get(index)
    }

    pub fn pokemon_mut(&mut self, index: usize) -> Option<&mut PokemonInst> {
        self.team.get_mut(index)
    }

    /// Bring the Pokemon at `index` into slot 0.
    ///
    /// The outgoing Pokemon loses its stat stages and volatile conditions but
    /// keeps HP and status.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0, out of range, or refers to a fainted Pokemon.
    pub fn switch_pokemon(&mut self, index: usize) {
        assert!(
            index > 0 && index < self.team.len(),
            "{} cannot switch to team slot {}",
            self.name,
            index
        );
        assert!(
            self.team[index].is_alive(),
            "{} cannot switch to fainted {}",
            self.name,
            self.team[index].surname()
        );

        self.team[0].clear_battle_state();
        self.team.swap(0, index);
    }

    /// Living team members other than the active one, by team index.
    pub fn switch_targets(&self) -> impl Iterator<Item = usize> + '_ {
        self.team
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, pokemon)| pokemon.is_alive())
            .map(|(index, _)| index)
    }

    pub fn is_defeated(&self) -> bool {
        self.team.iter().all(|pokemon| !pokemon.is_alive())
    }

    /// The first living team member, if any.
    pub fn first_alive(&self) -> Option<&PokemonInst> {
        self.team.iter().find(|pokemon| pokemon.is_alive())
    }

    // === Inventory ===

    pub fn item_quantity(&self, item: ItemId) -> u16 {
        self.inventory.get(usize::from(item.0)).copied().unwrap_or(0)
    }

    /// Items with a positive quantity, in id order.
    pub fn possessed_items(&self) -> Vec<(ItemId, u16)> {
        self.inventory
            .iter()
            .enumerate()
            .filter(|(_, &quantity)| quantity > 0)
            .map(|(id, &quantity)| (ItemId(id as u16), quantity))
            .collect()
    }

    /// # Panics
    ///
    /// Panics if the trainer holds none of `item`.
    pub fn decrease_item_quantity(&mut self, item: ItemId) {
        match self.inventory.get_mut(usize::from(item.0)) {
            Some(quantity) if *quantity > 0 => *quantity -= 1,
            _ => panic!("{} has no item {} left to use", self.name, item.0),
        }
    }

    /// Restore the team (members and order) and the inventory to how the
    /// trainer was built.
    pub fn reset(&mut self) {
        self.team.clone_from_slice(&self.initial_team);
        self.inventory.copy_from_slice(&self.initial_inventory);
    }

    /// Multi-line summary of the team and inventory.
    pub fn describe(&self, catalog: &Catalog) -> String {
        let mut lines = vec![format!("{}'s Team:", self.name)];
        for (index, pokemon) in self.team.iter().enumerate() {
            let state = if pokemon.is_alive() { "Alive" } else { "Fainted" };
            lines.push(format!("  [{}] {} ({})", index, pokemon, state));
        }

        lines.push(format!("{}'s Inventory:", self.name));
        let items = self.possessed_items();
        if items.is_empty() {
            lines.push("  (Empty)".to_string());
        }
        for (item, quantity) in items {
            let name = catalog
                .item(item)
                .map(|item| item.name.to_string())
                .unwrap_or_else(|| format!("#{}", item.0));
            lines.push(format!("  - {}: {}", name, quantity));
        }

        lines.join("\n")
    }
}

impl fmt::Display for Trainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{Species, SpeciesId};
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, ElementalType, StatType};

    fn member(name: &str) -> PokemonInst {
        let species = Species {
            id: SpeciesId(0),
            name: Arc::from(name),
            types: (ElementalType::Normal, ElementalType::Normal),
            base_stats: BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                sp_attack: 50,
                sp_defense: 50,
                speed: 50,
            },
            default_moves: vec![],
        };
        PokemonInst::new(&species, 20, &[], None, None, None).expect("valid pokemon")
    }

    fn trainer() -> Trainer {
        Trainer::new(
            "Red",
            vec![member("Eevee"), member("Snorlax"), member("Lapras")],
            &[(ItemId(0), 2), (ItemId(3), 1)],
            4,
        )
        .expect("valid trainer")
    }

    #[test]
    fn test_construction_is_checked() {
        assert_eq!(Trainer::new("Red", vec![], &[], 0), Err(TeamError::EmptyTeam));
        let seven = (0..7).map(|_| member("Eevee")).collect();
        assert_eq!(Trainer::new("Red", seven, &[], 0), Err(TeamError::TeamTooLarge(7)));
        assert_eq!(
            Trainer::new("Red", vec![member("Eevee")], &[(ItemId(9), 1)], 4),
            Err(TeamError::UnknownItem(9))
        );
    }

    #[test]
    fn test_switch_swaps_and_clears_outgoing_state() {
        // Arrange
        let mut trainer = trainer();
        trainer.active_mut().apply_stage(StatType::Atk, 2);
        trainer.active_mut().confuse(3);
        trainer.active_mut().take_damage(10);

        // Act
        trainer.switch_pokemon(2);

        // Assert
        assert_eq!(trainer.active().surname().as_ref(), "Lapras");
        let outgoing = trainer.pokemon(2).expect("slot 2");
        assert_eq!(outgoing.surname().as_ref(), "Eevee");
        assert_eq!(outgoing.stage(StatType::Atk), 0);
        assert!(!outgoing.is_confused());
        assert_eq!(outgoing.hp(), outgoing.max_hp() - 10, "HP is kept");
    }

    #[test]
    #[should_panic(expected = "cannot switch to team slot 0")]
    fn test_switch_to_active_panics() {
        trainer().switch_pokemon(0);
    }

    #[test]
    #[should_panic(expected = "cannot switch to fainted")]
    fn test_switch_to_fainted_panics() {
        let mut trainer = trainer();
        if let Some(pokemon) = trainer.pokemon_mut(1) {
            pokemon.take_damage(u16::MAX);
        }
        trainer.switch_pokemon(1);
    }

    #[test]
    fn test_inventory_bookkeeping_and_reset() {
        let mut trainer = trainer();
        assert_eq!(trainer.possessed_items(), vec![(ItemId(0), 2), (ItemId(3), 1)]);

        trainer.decrease_item_quantity(ItemId(3));
        assert_eq!(trainer.item_quantity(ItemId(3)), 0);
        assert_eq!(trainer.possessed_items(), vec![(ItemId(0), 2)]);
        assert_eq!(trainer.item_quantity(ItemId(42)), 0);

        trainer.reset();
        assert_eq!(trainer.item_quantity(ItemId(3)), 1);
    }

    #[test]
    fn test_reset_restores_team_order() {
        // Arrange
        let mut trainer = trainer();
        let pristine = trainer.clone();
        trainer.switch_pokemon(2);
        trainer.switch_pokemon(1);
        trainer.active_mut().take_damage(10);
        assert_eq!(trainer.active().surname().as_ref(), "Snorlax");

        // Act
        trainer.reset();

        // Assert
        let names: Vec<&str> = trainer.team().iter().map(|pokemon| pokemon.surname().as_ref()).collect();
        assert_eq!(names, vec!["Eevee", "Snorlax", "Lapras"]);
        assert_eq!(trainer, pristine);
    }

    #[test]
    #[should_panic(expected = "no item 1 left")]
    fn test_decrease_empty_item_panics() {
        trainer().decrease_item_quantity(ItemId(1));
    }

    #[test]
    fn test_defeat_and_first_alive() {
        let mut trainer = trainer();
        for index in 0..2 {
            if let Some(pokemon) = trainer.pokemon_mut(index) {
                pokemon.take_damage(u16::MAX);
            }
        }
        assert!(!trainer.is_defeated());
        assert_eq!(trainer.first_alive().map(|p| p.surname().to_string()), Some("Lapras".to_string()));
        assert_eq!(trainer.switch_targets().collect::<Vec<_>>(), vec![2]);

        if let Some(pokemon) = trainer.pokemon_mut(2) {
            pokemon.take_damage(u16::MAX);
        }
        assert!(trainer.is_defeated());
        assert_eq!(trainer.first_alive(), None);
    }
}
