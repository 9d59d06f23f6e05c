//! Roster snapshot mapping logical indices to stable character ids.
//!
//! Captured at the moment a turn is submitted and held immutable until the
//! replay for that turn has finished. Events reference characters by
//! `(index, side)`; because every event in a receipt predates the deaths it
//! reports, indices always resolve correctly against the pre-replay snapshot
//! even when characters die mid-sequence.

use crate::ids::{CharacterId, Side};

/// Ordered ally/enemy identifier lists as of one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterSnapshot {
    heroes: Vec<CharacterId>,
    monsters: Vec<CharacterId>,
}

impl RosterSnapshot {
    pub fn new(heroes: Vec<CharacterId>, monsters: Vec<CharacterId>) -> Self {
        Self { heroes, monsters }
    }

    pub fn side(&self, side: Side) -> &[CharacterId] {
        match side {
            Side::Hero => &self.heroes,
            Side::Monster => &self.monsters,
        }
    }

    pub fn heroes(&self) -> &[CharacterId] {
        &self.heroes
    }

    pub fn monsters(&self) -> &[CharacterId] {
        &self.monsters
    }

    /// Number of living heroes at submission time; the submitter must send
    /// exactly this many encoded actions.
    pub fn hero_count(&self) -> usize {
        self.heroes.len()
    }

    /// Translate a logical roster position into a stable id.
    ///
    /// Out-of-bounds indices yield `None`; callers skip the effect rather
    /// than fail the replay.
    pub fn resolve(&self, index: u8, side: Side) -> Option<CharacterId> {
        self.side(side).get(usize::from(index)).copied()
    }

    /// Inverse lookup: where does a character currently sit in its roster.
    pub fn position_in(&self, side: Side, id: CharacterId) -> Option<u8> {
        self.side(side)
            .iter()
            .position(|candidate| *candidate == id)
            .map(|pos| pos as u8)
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty() && self.monsters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RosterSnapshot {
        RosterSnapshot::new(
            vec![CharacterId(5), CharacterId(9), CharacterId(2)],
            vec![CharacterId(11), CharacterId(12)],
        )
    }

    #[test]
    fn resolve_translates_indices_per_side() {
        let roster = snapshot();
        assert_eq!(roster.resolve(1, Side::Hero), Some(CharacterId(9)));
        assert_eq!(roster.resolve(0, Side::Monster), Some(CharacterId(11)));
    }

    #[test]
    fn resolve_out_of_bounds_is_none() {
        let roster = snapshot();
        assert_eq!(roster.resolve(5, Side::Hero), None);
        assert_eq!(roster.resolve(2, Side::Monster), None);
    }

    #[test]
    fn position_is_the_inverse_of_resolve() {
        let roster = snapshot();
        assert_eq!(roster.position_in(Side::Hero, CharacterId(2)), Some(2));
        assert_eq!(roster.position_in(Side::Hero, CharacterId(11)), None);
        for index in 0..roster.hero_count() as u8 {
            let id = roster.resolve(index, Side::Hero).unwrap();
            assert_eq!(roster.position_in(Side::Hero, id), Some(index));
        }
    }
}
