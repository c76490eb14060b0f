#[cfg(test)]
mod tests {
    use crate::battle::action::Action;
    use crate::battle::engine::{Battle, BattleOptions};
    use crate::battle::state::{BattleEvent, TurnRng};
    use crate::battle::tests::common::{battle_between, create_test_trainer, item_id, TestPokemonBuilder};
    use crate::pokemon::{PokemonInst, StatusCondition};
    use pretty_assertions::assert_eq;
    use schema::StatusType;

    fn battle_with_items(team: Vec<PokemonInst>, inventory: &[(&str, u16)]) -> Battle {
        let red = create_test_trainer("Red", team, inventory);
        let snorlax = TestPokemonBuilder::new("Snorlax", 50).with_moves(&["Swords Dance"]).build();
        let blue = create_test_trainer("Blue", vec![snorlax], &[]);
        battle_between(red, blue, BattleOptions::default()).with_rng(TurnRng::new_for_test(vec![]))
    }

    /// Blue's move: raises its own Attack and draws nothing.
    const SWORDS_DANCE: Action = Action::Attack { move_slot: 0 };

    fn use_item(name: &str, target_index: usize) -> Action {
        Action::UseItem {
            item_id: item_id(name),
            target_index,
        }
    }

    #[test]
    fn test_full_heal_cures_status_and_spends_the_item() {
        // Arrange
        let pikachu = TestPokemonBuilder::new("Pikachu", 50)
            .with_status(StatusType::Paralysis)
            .build();
        let mut battle = battle_with_items(vec![pikachu], &[("Full Heal", 1)]);
        assert!(battle.get_possible_actions(0).contains(&use_item("Full Heal", 0)));

        // Act
        let events = battle.turn(use_item("Full Heal", 0), SWORDS_DANCE);

        // Assert
        assert!(events.contains(&BattleEvent::ItemUsed {
            trainer: "Red".into(),
            item: "Full Heal".into(),
            target: "Pikachu".into(),
        }));
        let cured = BattleEvent::PokemonStatusRemoved {
            target: "Pikachu".into(),
            status: StatusType::Paralysis,
        };
        assert!(events.contains(&cured));
        assert_eq!(cured.to_string(), "Pikachu was cured of its paralysis.");
        assert_eq!(battle.trainer(0).active().status(), StatusCondition::Healthy);
        assert_eq!(battle.trainer(0).item_quantity(item_id("Full Heal")), 0);
        assert!(!battle
            .get_possible_actions(0)
            .iter()
            .any(|action| matches!(action, Action::UseItem { .. })));
    }

    #[test]
    #[should_panic(expected = "Full Heal would have no effect on Pikachu")]
    fn test_item_without_effect_is_rejected() {
        let pikachu = TestPokemonBuilder::new("Pikachu", 50).build();
        let mut battle = battle_with_items(vec![pikachu], &[("Full Heal", 1)]);
        assert!(!battle.get_possible_actions(0).contains(&use_item("Full Heal", 0)));

        battle.turn(use_item("Full Heal", 0), SWORDS_DANCE);
    }

    #[test]
    fn test_potion_reports_the_hp_actually_recovered() {
        // Arrange
        let pikachu = TestPokemonBuilder::new("Pikachu", 50).with_hp(90).build();
        let mut battle = battle_with_items(vec![pikachu], &[("Potion", 2)]);

        // Act
        let events = battle.turn(use_item("Potion", 0), SWORDS_DANCE);

        // Assert
        assert!(events.contains(&BattleEvent::PokemonHealed {
            target: "Pikachu".into(),
            amount: 10,
        }));
        let pikachu = battle.trainer(0).active();
        assert_eq!(pikachu.hp(), pikachu.max_hp());
        assert_eq!(battle.trainer(0).item_quantity(item_id("Potion")), 1);
    }

    #[test]
    fn test_restricted_cure_ignores_other_statuses() {
        let pikachu = TestPokemonBuilder::new("Pikachu", 50)
            .with_status(StatusType::Burn)
            .build();
        let mut battle = battle_with_items(vec![pikachu], &[("Antidote", 1), ("Burn Heal", 1)]);

        let actions = battle.get_possible_actions(0);
        assert!(!actions.contains(&use_item("Antidote", 0)));
        assert!(actions.contains(&use_item("Burn Heal", 0)));

        battle.turn(use_item("Burn Heal", 0), SWORDS_DANCE);
        assert_eq!(battle.trainer(0).active().status(), StatusCondition::Healthy);
    }

    #[test]
    fn test_revive_brings_back_a_fainted_teammate() {
        // Arrange
        let team = vec![
            TestPokemonBuilder::new("Pikachu", 50).build(),
            TestPokemonBuilder::new("Eevee", 50).with_hp(0).build(),
        ];
        let mut battle = battle_with_items(team, &[("Revive", 1)]);
        let actions = battle.get_possible_actions(0);
        assert!(actions.contains(&use_item("Revive", 1)));
        assert!(!actions.contains(&Action::Switch { pokemon_index: 1 }));

        // Act
        let events = battle.turn(use_item("Revive", 1), SWORDS_DANCE);

        // Assert
        assert!(events.contains(&BattleEvent::PokemonRevived { target: "Eevee".into() }));
        let eevee = battle.trainer(0).pokemon(1).expect("Eevee");
        assert_eq!(eevee.status(), StatusCondition::Healthy);
        assert_eq!(eevee.hp(), eevee.max_hp() / 2);
        assert!(battle.get_possible_actions(0).contains(&Action::Switch { pokemon_index: 1 }));
    }

    #[test]
    #[should_panic(expected = "has no item")]
    fn test_using_an_item_that_is_not_held_panics() {
        let pikachu = TestPokemonBuilder::new("Pikachu", 50).with_hp(10).build();
        let mut battle = battle_with_items(vec![pikachu], &[]);

        battle.turn(use_item("Potion", 0), SWORDS_DANCE);
    }
}
