//! Wire-level types shared by ledger backends.

use serde::{Deserialize, Serialize};

use battle_core::BattleId;

/// Identifier of a confirmed ledger transaction, kept textual.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub String);

impl std::fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response of a successful battle creation call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleCreated {
    pub transaction_hash: TransactionHash,
    pub battle_id: BattleId,
}

/// One raw value inside a log entry's positional data array.
///
/// The ledger's indexer is loose about numeric encodings: the same field may
/// arrive as a native integer, a decimal string, a `0x` hex string, or a
/// 0/1 boolean, depending on which path produced the entry. Normalization to
/// plain integers happens here, once, so nothing downstream ever touches a
/// raw field again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Uint(u64),
    Text(String),
}

impl FieldValue {
    /// Converge on a plain `u64`, whatever the source encoding.
    ///
    /// Big decimal strings are parsed through `u128` and must fit the target
    /// width; anything else is a malformed field.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Uint(value) => Some(*value),
            FieldValue::Bool(flag) => Some(u64::from(*flag)),
            FieldValue::Text(text) => {
                let text = text.trim();
                if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    return u64::from_str_radix(hex, 16).ok();
                }
                text.parse::<u128>().ok().and_then(|wide| wide.try_into().ok())
            }
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.as_u64().and_then(|value| value.try_into().ok())
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.as_u64().and_then(|value| value.try_into().ok())
    }

    /// Booleans may arrive as the integers 0/1.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(flag) => Some(*flag),
            _ => match self.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
        }
    }

    /// Textual form for address-like fields, hex left untouched.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One opaque log entry: a discriminator key plus positional data.
///
/// Field offsets per event kind are a collaborator contract with the ledger
/// program; [`crate::decode`] owns them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    pub key: String,
    pub data: Vec<FieldValue>,
}

/// Confirmation receipt of a submitted turn: the ordered outcome log.
///
/// Entry order is the authoritative causal order; the receipt is handed to
/// the decoder untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReceipt {
    pub transaction_hash: TransactionHash,
    pub entries: Vec<RawLogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_field_encodings_converge() {
        assert_eq!(FieldValue::Uint(7).as_u64(), Some(7));
        assert_eq!(FieldValue::Text("7".into()).as_u64(), Some(7));
        assert_eq!(FieldValue::Text("0x7".into()).as_u64(), Some(7));
        assert_eq!(FieldValue::Text("0x1A".into()).as_u64(), Some(26));
        assert_eq!(
            FieldValue::Text("18446744073709551615".into()).as_u64(),
            Some(u64::MAX)
        );
        assert_eq!(FieldValue::Bool(true).as_u64(), Some(1));
    }

    #[test]
    fn oversized_and_junk_fields_are_rejected() {
        assert_eq!(
            FieldValue::Text("340282366920938463463374607431768211455".into()).as_u64(),
            None
        );
        assert_eq!(FieldValue::Text("not-a-number".into()).as_u64(), None);
        assert_eq!(FieldValue::Uint(300).as_u8(), None);
    }

    #[test]
    fn booleans_accept_zero_one_integers() {
        assert_eq!(FieldValue::Uint(0).as_bool(), Some(false));
        assert_eq!(FieldValue::Text("1".into()).as_bool(), Some(true));
        assert_eq!(FieldValue::Uint(2).as_bool(), None);
        assert_eq!(FieldValue::Bool(false).as_bool(), Some(false));
    }

    #[test]
    fn untagged_deserialization_keeps_shapes_apart() {
        let entry: RawLogEntry = serde_json::from_str(
            r#"{"key":"destiny-DamageEvent","data":[1,"0x0","2",true,"25",0]}"#,
        )
        .unwrap();
        assert_eq!(entry.data.len(), 6);
        assert_eq!(entry.data[0], FieldValue::Uint(1));
        assert_eq!(entry.data[1].as_u64(), Some(0));
        assert_eq!(entry.data[3].as_bool(), Some(true));
    }
}
