use serde::{Deserialize, Serialize};

use crate::state::StateMachine;

/// Collision category carried by every hitbox in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactCategory {
    Box,
    Enemy,
    Rock,
    Lava,
    Coral,
    Seaweed,
}

impl ContactCategory {
    pub const COUNT: usize = 6;

    pub const ALL: [ContactCategory; Self::COUNT] = [
        ContactCategory::Box,
        ContactCategory::Enemy,
        ContactCategory::Rock,
        ContactCategory::Lava,
        ContactCategory::Coral,
        ContactCategory::Seaweed,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// What happens when two categories touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactEffect {
    #[default]
    Ignore,
    GameOver,
}

/// One entry of the contact table, as written in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRule {
    pub a: ContactCategory,
    pub b: ContactCategory,
    pub effect: ContactEffect,
}

/// Total, symmetric `(category, category) → effect` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactTable {
    effects: [[ContactEffect; ContactCategory::COUNT]; ContactCategory::COUNT],
}

impl Default for ContactTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ContactTable {
    /// Every pair ignored.
    pub fn empty() -> Self {
        Self {
            effects: [[ContactEffect::Ignore; ContactCategory::COUNT]; ContactCategory::COUNT],
        }
    }

    /// The box dies on an enemy; everything else passes through.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.set(ContactCategory::Box, ContactCategory::Enemy, ContactEffect::GameOver);
        table
    }

    /// Standard table with `rules` applied on top.
    pub fn with_rules(rules: &[ContactRule]) -> Self {
        let mut table = Self::standard();
        table.apply(rules);
        table
    }

    /// Apply `rules` in order; a later rule for the same pair wins.
    pub fn apply(&mut self, rules: &[ContactRule]) {
        for rule in rules {
            self.set(rule.a, rule.b, rule.effect);
        }
    }

    pub fn set(&mut self, a: ContactCategory, b: ContactCategory, effect: ContactEffect) {
        self.effects[a.index()][b.index()] = effect;
        self.effects[b.index()][a.index()] = effect;
    }

    pub fn effect(&self, a: ContactCategory, b: ContactCategory) -> ContactEffect {
        self.effects[a.index()][b.index()]
    }
}

/// Result of feeding one contact to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Ignored,
    /// This contact ended the run.
    GameOver,
    /// The run was not live; nothing changed.
    Inactive,
}

/// Applies the contact table to the scene state machine.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    table: ContactTable,
}

impl CollisionResolver {
    pub fn new(table: ContactTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ContactTable {
        &self.table
    }

    /// Resolve a contact between `a` and `b`. Only a live (Idle) run reacts;
    /// after GameOver every contact is `Inactive`.
    pub fn resolve(&self, machine: &mut StateMachine, a: ContactCategory, b: ContactCategory) -> Resolution {
        if !machine.is_live() {
            return Resolution::Inactive;
        }
        match self.table.effect(a, b) {
            ContactEffect::Ignore => Resolution::Ignored,
            ContactEffect::GameOver => {
                if machine.game_over() {
                    Resolution::GameOver
                } else {
                    Resolution::Inactive
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SceneState;

    fn live_machine() -> StateMachine {
        let mut m = StateMachine::new();
        assert!(m.enter_idle());
        m
    }

    #[test]
    fn table_is_symmetric_and_total() {
        let table = ContactTable::standard();
        for &a in &ContactCategory::ALL {
            for &b in &ContactCategory::ALL {
                assert_eq!(table.effect(a, b), table.effect(b, a));
                let expected = if (a, b) == (ContactCategory::Box, ContactCategory::Enemy)
                    || (a, b) == (ContactCategory::Enemy, ContactCategory::Box)
                {
                    ContactEffect::GameOver
                } else {
                    ContactEffect::Ignore
                };
                assert_eq!(table.effect(a, b), expected, "{:?} x {:?}", a, b);
            }
        }
    }

    #[test]
    fn rules_extend_the_standard_table() {
        let table = ContactTable::with_rules(&[ContactRule {
            a: ContactCategory::Lava,
            b: ContactCategory::Box,
            effect: ContactEffect::GameOver,
        }]);
        assert_eq!(table.effect(ContactCategory::Box, ContactCategory::Lava), ContactEffect::GameOver);
        assert_eq!(table.effect(ContactCategory::Box, ContactCategory::Enemy), ContactEffect::GameOver);
        assert_eq!(table.effect(ContactCategory::Box, ContactCategory::Rock), ContactEffect::Ignore);
    }

    #[test]
    fn box_enemy_ends_the_run_once() {
        let resolver = CollisionResolver::default();
        let mut m = live_machine();

        assert_eq!(
            resolver.resolve(&mut m, ContactCategory::Enemy, ContactCategory::Box),
            Resolution::GameOver
        );
        assert_eq!(m.current(), Some(SceneState::GameOver));

        assert_eq!(
            resolver.resolve(&mut m, ContactCategory::Box, ContactCategory::Enemy),
            Resolution::Inactive
        );
        assert_eq!(m.current(), Some(SceneState::GameOver));
    }

    #[test]
    fn other_pairs_are_ignored() {
        let resolver = CollisionResolver::default();
        let mut m = live_machine();
        assert_eq!(
            resolver.resolve(&mut m, ContactCategory::Box, ContactCategory::Rock),
            Resolution::Ignored
        );
        assert_eq!(
            resolver.resolve(&mut m, ContactCategory::Enemy, ContactCategory::Enemy),
            Resolution::Ignored
        );
        assert!(m.is_live());
    }

    #[test]
    fn contact_before_setup_is_inactive() {
        let resolver = CollisionResolver::default();
        let mut m = StateMachine::new();
        assert_eq!(
            resolver.resolve(&mut m, ContactCategory::Box, ContactCategory::Enemy),
            Resolution::Inactive
        );
        assert_eq!(m.current(), None);
    }
}
