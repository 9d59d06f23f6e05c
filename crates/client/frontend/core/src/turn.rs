//! Turn selection state machine.
//!
//! Drives the player through per-actor action assignment: actor, then skill,
//! then a target of the side the skill's class demands. Illegal selections
//! (re-selecting an actor that already acted, a target on the wrong side) are
//! silent no-ops; UI affordances should prevent them, but the machine
//! defends regardless. There is no timeout between steps.

use arrayvec::ArrayVec;

use battle_core::{
    ActionEncodeError, CharacterId, EncodedAction, PendingAction, Side, SkillId, skill_by_id,
    skills_of_character,
};

/// Single-digit wire constraint: a roster side never exceeds ten actors.
const MAX_PARTY: usize = 10;

/// Where the player currently is in composing the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    ChoosingActor,
    ChoosingSkill,
    ChoosingTarget(Side),
}

/// Per-turn composer over the living hero roster.
///
/// Holds one optional [`PendingAction`] slot per hero, keyed by actor index.
/// The turn is complete once every slot is finalized; the session layer is
/// responsible for firing submission exactly once at that point.
#[derive(Clone, Debug)]
pub struct TurnComposer {
    heroes: ArrayVec<CharacterId, MAX_PARTY>,
    pending: ArrayVec<Option<PendingAction>, MAX_PARTY>,
    phase: SelectionPhase,
    selected_actor: Option<u8>,
    selected_skill: Option<SkillId>,
}

impl TurnComposer {
    /// Start a blank turn over the given living heroes, in actor-index order.
    ///
    /// Heroes beyond the single-digit wire limit are ignored.
    pub fn new(heroes: &[CharacterId]) -> Self {
        let heroes: ArrayVec<CharacterId, MAX_PARTY> =
            heroes.iter().copied().take(MAX_PARTY).collect();
        let pending = heroes.iter().map(|_| None).collect();
        Self {
            heroes,
            pending,
            phase: SelectionPhase::ChoosingActor,
            selected_actor: None,
            selected_skill: None,
        }
    }

    /// Replace the roster after a resynchronization and clear the turn.
    pub fn rebuild(&mut self, heroes: &[CharacterId]) {
        *self = Self::new(heroes);
    }

    /// Clear every pending action and return to actor selection.
    pub fn reset(&mut self) {
        let heroes: Vec<CharacterId> = self.heroes.iter().copied().collect();
        self.rebuild(&heroes);
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn heroes(&self) -> &[CharacterId] {
        &self.heroes
    }

    /// Actor currently being assigned, if mid-selection.
    pub fn selected_actor(&self) -> Option<u8> {
        self.selected_actor
    }

    pub fn selected_skill(&self) -> Option<SkillId> {
        self.selected_skill
    }

    /// Finalized action for one actor index, if any.
    pub fn pending_for(&self, actor_index: u8) -> Option<PendingAction> {
        self.pending
            .get(usize::from(actor_index))
            .copied()
            .flatten()
    }

    /// Skills the currently selected actor may choose from, in slot order.
    pub fn skills_of_selected(&self) -> &'static [SkillId] {
        match self.selected_character() {
            Some(id) => skills_of_character(id),
            None => &[],
        }
    }

    fn selected_character(&self) -> Option<CharacterId> {
        self.selected_actor
            .and_then(|index| self.heroes.get(usize::from(index)))
            .copied()
    }

    /// Fix the acting actor and move to skill selection.
    ///
    /// Returns false (state unchanged) outside actor selection, for unknown
    /// indices, and for actors that already have a finalized action.
    pub fn select_actor(&mut self, actor_index: u8) -> bool {
        if self.phase != SelectionPhase::ChoosingActor {
            return false;
        }
        let slot = usize::from(actor_index);
        if slot >= self.heroes.len() {
            return false;
        }
        if self.pending[slot].is_some() {
            tracing::debug!(
                target: "frontend::turn",
                actor_index,
                "actor already has an action this turn"
            );
            return false;
        }

        self.selected_actor = Some(actor_index);
        self.selected_skill = None;
        self.phase = SelectionPhase::ChoosingSkill;
        true
    }

    /// Choose the fixed actor's skill; the skill's target class decides which
    /// side the next step selects from.
    pub fn select_skill(&mut self, skill: SkillId) -> bool {
        if self.phase != SelectionPhase::ChoosingSkill {
            return false;
        }
        let Some(actor) = self.selected_character() else {
            return false;
        };
        if !skills_of_character(actor).contains(&skill) {
            tracing::debug!(
                target: "frontend::turn",
                %actor,
                %skill,
                "skill not available to actor"
            );
            return false;
        }
        let Some(descriptor) = skill_by_id(skill) else {
            return false;
        };

        self.selected_skill = Some(skill);
        self.phase = SelectionPhase::ChoosingTarget(descriptor.target_class.side_for(Side::Hero));
        true
    }

    /// Finalize the in-progress action with a target of the matching side.
    ///
    /// Wrong-side targets are defensively ignored. On success the selection
    /// clears and the machine returns to actor selection.
    pub fn select_target(&mut self, side: Side, target_index: u8) -> bool {
        let SelectionPhase::ChoosingTarget(expected) = self.phase else {
            return false;
        };
        if side != expected {
            tracing::debug!(
                target: "frontend::turn",
                ?side,
                ?expected,
                "target side mismatch, ignoring"
            );
            return false;
        }
        if target_index > 9 {
            return false;
        }
        let (Some(actor_index), Some(skill)) = (self.selected_actor, self.selected_skill) else {
            return false;
        };

        self.pending[usize::from(actor_index)] = Some(PendingAction {
            actor_index,
            skill,
            target_index,
        });
        self.selected_actor = None;
        self.selected_skill = None;
        self.phase = SelectionPhase::ChoosingActor;
        true
    }

    /// True once every hero has a finalized action.
    pub fn is_complete(&self) -> bool {
        !self.pending.is_empty() && self.pending.iter().all(Option::is_some)
    }

    /// Encode the turn: exactly one action per hero in ascending actor-index
    /// order, the no-op sentinel for anyone left unassigned.
    pub fn encoded_actions(&self) -> Result<Vec<EncodedAction>, ActionEncodeError> {
        self.heroes
            .iter()
            .zip(&self.pending)
            .map(|(hero, pending)| match pending {
                Some(action) => EncodedAction::from_pending(*hero, *action),
                None => Ok(EncodedAction::NO_ACTION),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Characters 1..=3 are the standard hero party in the catalog tables.
    fn composer() -> TurnComposer {
        TurnComposer::new(&[CharacterId(1), CharacterId(2), CharacterId(3)])
    }

    #[test]
    fn full_turn_flows_actor_skill_target() {
        let mut composer = composer();
        assert_eq!(composer.phase(), SelectionPhase::ChoosingActor);

        assert!(composer.select_actor(0));
        assert_eq!(composer.phase(), SelectionPhase::ChoosingSkill);

        // Character 1's skill 2 (Power Attack) targets enemies.
        assert!(composer.select_skill(SkillId(2)));
        assert_eq!(
            composer.phase(),
            SelectionPhase::ChoosingTarget(Side::Monster)
        );

        assert!(composer.select_target(Side::Monster, 1));
        assert_eq!(composer.phase(), SelectionPhase::ChoosingActor);
        assert_eq!(
            composer.pending_for(0),
            Some(PendingAction {
                actor_index: 0,
                skill: SkillId(2),
                target_index: 1,
            })
        );
        assert!(!composer.is_complete());
    }

    #[test]
    fn ally_class_skill_selects_hero_side_target() {
        let mut composer = composer();
        assert!(composer.select_actor(1));
        // Character 2's skill 4 is Heal, an ally-class skill.
        assert!(composer.select_skill(SkillId(4)));
        assert_eq!(composer.phase(), SelectionPhase::ChoosingTarget(Side::Hero));

        // An enemy-side pick while healing is ignored outright.
        assert!(!composer.select_target(Side::Monster, 0));
        assert_eq!(composer.phase(), SelectionPhase::ChoosingTarget(Side::Hero));

        assert!(composer.select_target(Side::Hero, 1));
        assert!(composer.pending_for(1).is_some());
    }

    #[test]
    fn acted_actor_cannot_be_reselected() {
        let mut composer = composer();
        assert!(composer.select_actor(0));
        assert!(composer.select_skill(SkillId(2)));
        assert!(composer.select_target(Side::Monster, 0));

        assert!(!composer.select_actor(0));
        assert_eq!(composer.phase(), SelectionPhase::ChoosingActor);
        assert!(composer.select_actor(1));
    }

    #[test]
    fn unavailable_skill_is_ignored() {
        let mut composer = composer();
        assert!(composer.select_actor(0));
        // Character 1 carries [2, 5, 6]; skill 9 is someone else's.
        assert!(!composer.select_skill(SkillId(9)));
        assert_eq!(composer.phase(), SelectionPhase::ChoosingSkill);
    }

    #[test]
    fn complete_turn_encodes_one_action_per_hero_in_order() {
        let mut composer = composer();

        assert!(composer.select_actor(0));
        assert!(composer.select_skill(SkillId(2)));
        assert!(composer.select_target(Side::Monster, 0));

        assert!(composer.select_actor(2));
        assert!(composer.select_skill(SkillId(7))); // self-buff
        assert_eq!(composer.phase(), SelectionPhase::ChoosingTarget(Side::Hero));
        assert!(composer.select_target(Side::Hero, 2));

        assert!(!composer.is_complete());
        assert!(composer.select_actor(1));
        assert!(composer.select_skill(SkillId(1)));
        assert!(composer.select_target(Side::Monster, 2));
        assert!(composer.is_complete());

        let encoded = composer.encoded_actions().unwrap();
        assert_eq!(encoded.len(), 3);
        // Actor 0: Power Attack is slot 1 for character 1, target 0 -> 001.
        assert_eq!(encoded[0].wire(), "001");
        // Actor 1: Basic Attack is slot 1 for character 2, target 2 -> 121.
        assert_eq!(encoded[1].wire(), "121");
        // Actor 2: skill 7 is slot 2 for character 3, target 2 -> 222.
        assert_eq!(encoded[2].wire(), "222");
    }

    #[test]
    fn unassigned_actors_encode_to_the_sentinel() {
        let mut composer = composer();
        assert!(composer.select_actor(1));
        assert!(composer.select_skill(SkillId(1)));
        assert!(composer.select_target(Side::Monster, 0));

        let encoded = composer.encoded_actions().unwrap();
        assert_eq!(encoded.len(), 3);
        assert!(encoded[0].is_no_action());
        assert!(!encoded[1].is_no_action());
        assert!(encoded[2].is_no_action());
    }

    #[test]
    fn reset_clears_pending_and_phase() {
        let mut composer = composer();
        assert!(composer.select_actor(0));
        assert!(composer.select_skill(SkillId(2)));
        assert!(composer.select_target(Side::Monster, 0));

        composer.reset();
        assert_eq!(composer.phase(), SelectionPhase::ChoosingActor);
        assert!(composer.pending_for(0).is_none());
        assert!(composer.select_actor(0));
    }

    #[test]
    fn empty_roster_is_never_complete() {
        let composer = TurnComposer::new(&[]);
        assert!(!composer.is_complete());
        assert!(composer.encoded_actions().unwrap().is_empty());
    }
}
