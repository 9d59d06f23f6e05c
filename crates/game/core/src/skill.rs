//! Static skill catalog.
//!
//! The catalog is immutable, process-lifetime data: every skill the ledger
//! understands plus the per-character lists of which skills each character may
//! use. The client only reads names, descriptions, and target classes from it;
//! magnitudes are carried for display and never used to resolve combat.

use crate::ids::{CharacterId, Side, SkillId};

/// Who a skill may legally target, relative to the acting character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetClass {
    /// The actor itself.
    SelfOnly,
    /// A character on the actor's own side (includes the actor).
    Ally,
    /// A character on the opposing side.
    Enemy,
}

impl TargetClass {
    /// Resolve the roster side a target must come from, given the actor's side.
    pub fn side_for(self, actor_side: Side) -> Side {
        match self {
            TargetClass::SelfOnly | TargetClass::Ally => actor_side,
            TargetClass::Enemy => actor_side.opposite(),
        }
    }
}

/// Immutable descriptor of one skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    pub id: SkillId,
    pub name: &'static str,
    pub description: &'static str,
    pub target_class: TargetClass,
    pub damage: u32,
    pub heal: u32,
    pub buff: u32,
    pub debuff: u32,
}

const CATALOG: [Skill; 9] = [
    Skill {
        id: SkillId(1),
        name: "Basic Attack",
        description: "A basic attack against an enemy.",
        target_class: TargetClass::Enemy,
        damage: 10,
        heal: 0,
        buff: 0,
        debuff: 0,
    },
    Skill {
        id: SkillId(2),
        name: "Power Attack",
        description: "A powerful attack that deals more damage.",
        target_class: TargetClass::Enemy,
        damage: 25,
        heal: 0,
        buff: 0,
        debuff: 0,
    },
    Skill {
        id: SkillId(3),
        name: "Flame Attack",
        description: "Fire attack that deals damage.",
        target_class: TargetClass::Enemy,
        damage: 30,
        heal: 0,
        buff: 0,
        debuff: 0,
    },
    Skill {
        id: SkillId(4),
        name: "Heal",
        description: "Heals an ally for a moderate amount.",
        target_class: TargetClass::Ally,
        damage: 0,
        heal: 30,
        buff: 0,
        debuff: 0,
    },
    Skill {
        id: SkillId(5),
        name: "Buff Defense",
        description: "Increases an ally's defense.",
        target_class: TargetClass::Ally,
        damage: 0,
        heal: 0,
        buff: 10,
        debuff: 0,
    },
    Skill {
        id: SkillId(6),
        name: "Buff Attack",
        description: "Increases an ally's attack.",
        target_class: TargetClass::Ally,
        damage: 0,
        heal: 0,
        buff: 10,
        debuff: 0,
    },
    Skill {
        id: SkillId(7),
        name: "Buff Critical Chance",
        description: "Increases the critical hit chance.",
        target_class: TargetClass::SelfOnly,
        damage: 0,
        heal: 0,
        buff: 10,
        debuff: 0,
    },
    Skill {
        id: SkillId(8),
        name: "Debuff Defense",
        description: "Reduces an enemy's defense.",
        target_class: TargetClass::Enemy,
        damage: 0,
        heal: 0,
        buff: 0,
        debuff: 10,
    },
    Skill {
        id: SkillId(9),
        name: "Debuff Attack",
        description: "Reduces an enemy's attack.",
        target_class: TargetClass::Enemy,
        damage: 0,
        heal: 0,
        buff: 0,
        debuff: 10,
    },
];

/// Look up a skill by its global identifier.
pub fn skill_by_id(id: SkillId) -> Option<&'static Skill> {
    CATALOG.iter().find(|skill| skill.id == id)
}

/// All skills the ledger understands, in identifier order.
pub fn catalog() -> &'static [Skill] {
    &CATALOG
}

/// The skills available to one character, in slot order.
///
/// Slot order matters: the wire encoding refers to skills by their position in
/// this list, not by global id. Unknown characters have no skills.
pub fn skills_of_character(character: CharacterId) -> &'static [SkillId] {
    match character.0 {
        1 => &[SkillId(2), SkillId(5), SkillId(6)],
        2 => &[SkillId(1), SkillId(3), SkillId(4)],
        3 => &[SkillId(2), SkillId(7), SkillId(8)],
        4 => &[SkillId(1), SkillId(7)],
        5 => &[SkillId(2), SkillId(7), SkillId(8)],
        6 => &[SkillId(1), SkillId(8), SkillId(4)],
        7 => &[
            SkillId(1),
            SkillId(2),
            SkillId(3),
            SkillId(8),
            SkillId(6),
            SkillId(7),
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_resolvable() {
        for skill in catalog() {
            assert_eq!(skill_by_id(skill.id), Some(skill));
        }
        let mut ids: Vec<u8> = catalog().iter().map(|s| s.id.0).collect();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn every_character_skill_exists_in_catalog() {
        for character in 1..=7 {
            let list = skills_of_character(CharacterId(character));
            assert!(!list.is_empty());
            for id in list {
                assert!(skill_by_id(*id).is_some(), "missing skill {id}");
            }
        }
        assert!(skills_of_character(CharacterId(99)).is_empty());
    }

    #[test]
    fn target_class_resolves_sides() {
        assert_eq!(TargetClass::Enemy.side_for(Side::Hero), Side::Monster);
        assert_eq!(TargetClass::Enemy.side_for(Side::Monster), Side::Hero);
        assert_eq!(TargetClass::Ally.side_for(Side::Hero), Side::Hero);
        assert_eq!(TargetClass::SelfOnly.side_for(Side::Monster), Side::Monster);
    }

    #[test]
    fn attack_skills_target_enemies() {
        for id in [1, 2, 3] {
            let skill = skill_by_id(SkillId(id)).unwrap();
            assert!(skill.damage > 0);
            assert_eq!(skill.target_class, TargetClass::Enemy);
        }
    }
}
