//! Receipt decoder: raw outcome log -> typed combat events.
//!
//! Demultiplexes entries by discriminator, normalizes the heterogeneous field
//! encodings, and preserves log order exactly. Entries with unknown
//! discriminators are dropped for forward compatibility; malformed entries
//! are dropped individually. No event is reordered, deduplicated, or
//! coalesced; the output order is the causal order the replay engine plays.

use battle_core::{BattleId, CombatEvent, PlayerAddress};

use crate::types::{FieldValue, RawLogEntry, RawReceipt};

/// Decode every recognizable entry of a receipt, in receipt order.
pub fn decode_receipt(receipt: &RawReceipt) -> Vec<CombatEvent> {
    receipt
        .entries
        .iter()
        .filter_map(|entry| match decode_entry(entry) {
            Some(event) => Some(event),
            None => {
                tracing::debug!(
                    target: "blockchain::decode",
                    key = %entry.key,
                    fields = entry.data.len(),
                    "dropping unrecognized or malformed log entry"
                );
                None
            }
        })
        .collect()
}

fn decode_entry(entry: &RawLogEntry) -> Option<CombatEvent> {
    let fields = Fields(&entry.data);
    // Discriminators arrive namespace-qualified ("destiny-DamageEvent");
    // match on the suffix so redeployments under another namespace decode too.
    match event_kind(&entry.key)? {
        "DamageEvent" => Some(CombatEvent::Damage {
            battle_id: fields.battle_id(0)?,
            from_idx: fields.index(1)?,
            to_idx: fields.index(2)?,
            critical_hit: fields.flag(3)?,
            damage: fields.amount(4)?,
            is_monster: fields.flag(5)?,
        }),
        "BuffEvent" => Some(CombatEvent::Buff {
            battle_id: fields.battle_id(0)?,
            from_idx: fields.index(1)?,
            to_idx: fields.index(2)?,
            buff_id: fields.index(3)?,
            amount: fields.amount(4)?,
            is_monster: fields.flag(5)?,
        }),
        "DebuffEvent" => Some(CombatEvent::Debuff {
            battle_id: fields.battle_id(0)?,
            from_idx: fields.index(1)?,
            to_idx: fields.index(2)?,
            debuff_id: fields.index(3)?,
            amount: fields.amount(4)?,
            is_monster: fields.flag(5)?,
        }),
        "HealEvent" => Some(CombatEvent::Heal {
            battle_id: fields.battle_id(0)?,
            from_idx: fields.index(1)?,
            to_idx: fields.index(2)?,
            amount: fields.amount(3)?,
            is_monster: fields.flag(4)?,
        }),
        "MissEvent" => Some(CombatEvent::Miss {
            battle_id: fields.battle_id(0)?,
            from_idx: fields.index(1)?,
            to_idx: fields.index(2)?,
            is_monster: fields.flag(3)?,
        }),
        "PlayerWinEvent" => Some(CombatEvent::Victory {
            battle_id: fields.battle_id(0)?,
            player: fields.address(1)?,
        }),
        "PlayerLoseEvent" => Some(CombatEvent::Defeat {
            battle_id: fields.battle_id(0)?,
            player: fields.address(1)?,
        }),
        _ => None,
    }
}

/// Strip the namespace prefix from a discriminator key.
fn event_kind(key: &str) -> Option<&str> {
    let kind = key.rsplit('-').next().unwrap_or(key);
    kind.ends_with("Event").then_some(kind)
}

/// Positional accessor over one entry's data array.
struct Fields<'a>(&'a [FieldValue]);

impl Fields<'_> {
    fn battle_id(&self, at: usize) -> Option<BattleId> {
        self.0.get(at)?.as_u32().map(BattleId)
    }

    fn index(&self, at: usize) -> Option<u8> {
        self.0.get(at)?.as_u8()
    }

    fn amount(&self, at: usize) -> Option<u32> {
        self.0.get(at)?.as_u32()
    }

    fn flag(&self, at: usize) -> Option<bool> {
        self.0.get(at)?.as_bool()
    }

    fn address(&self, at: usize) -> Option<PlayerAddress> {
        self.0
            .get(at)?
            .as_text()
            .map(|text| PlayerAddress(text.to_owned()))
    }
}
