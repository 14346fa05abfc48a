//! Record module - the shared result record of an ingestion session

use crate::{PropertyKey, PropertyValue, SessionId};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// State of one property in a record
///
/// Presence is a tag, not a value test: `Present(Int(0))` and
/// `Present(FloatList(vec![]))` are both present.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    /// Not extracted (yet) for this log
    #[default]
    Unset,

    /// Extracted value
    Present(PropertyValue),
}

impl Slot {
    /// Whether the slot holds a value
    pub fn is_present(&self) -> bool {
        matches!(self, Slot::Present(_))
    }

    /// The held value, if any
    pub fn value(&self) -> Option<&PropertyValue> {
        match self {
            Slot::Present(value) => Some(value),
            Slot::Unset => None,
        }
    }
}

/// How a write to an already-present key is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// The first value written wins; later writes are dropped
    #[default]
    KeepFirst,

    /// The last value written wins
    Overwrite,

    /// Per-step sequences (see [`PropertyKey::accumulates`]) are appended;
    /// everything else is overwritten
    Accumulate,
}

impl MergePolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::KeepFirst => "keep-first",
            MergePolicy::Overwrite => "overwrite",
            MergePolicy::Accumulate => "accumulate",
        }
    }

    /// Parse a policy from its name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keep-first" | "keep_first" => Some(MergePolicy::KeepFirst),
            "overwrite" => Some(MergePolicy::Overwrite),
            "accumulate" => Some(MergePolicy::Accumulate),
            _ => None,
        }
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid merge policy: {}", s))
    }
}

/// What a [`ResultRecord::merge`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Slot was unset and now holds the value
    Inserted,
    /// Previous value was replaced
    Replaced,
    /// Previous sequence was extended
    Extended,
    /// Previous value was kept; the new one was dropped
    Kept,
}

impl MergeOutcome {
    /// Whether the record changed
    pub fn changed(&self) -> bool {
        !matches!(self, MergeOutcome::Kept)
    }
}

/// The mutable accumulator of extracted properties for one ingestion session
///
/// One slot per [`PropertyKey`]. Slots only ever move from `Unset` to
/// `Present`; there is no way to clear a key once it is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    session: SessionId,
    policy: MergePolicy,
    slots: Vec<Slot>,
}

impl ResultRecord {
    /// Create an empty record with the default merge policy
    pub fn new() -> Self {
        Self::with_policy(MergePolicy::default())
    }

    /// Create an empty record with the given merge policy
    pub fn with_policy(policy: MergePolicy) -> Self {
        Self {
            session: SessionId::new(),
            policy,
            slots: vec![Slot::Unset; PropertyKey::COUNT],
        }
    }

    /// Session that owns this record
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Merge policy applied by [`ResultRecord::merge`]
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Slot for a key
    pub fn slot(&self, key: PropertyKey) -> &Slot {
        &self.slots[key.index()]
    }

    /// Value for a key, `None` when unset
    pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.slot(key).value()
    }

    /// Whether a key holds a value
    pub fn is_present(&self, key: PropertyKey) -> bool {
        self.slot(key).is_present()
    }

    /// Store a value unconditionally, returning the previous one
    ///
    /// Used by callers seeding a record; extractors go through
    /// [`ResultRecord::merge`].
    pub fn set(&mut self, key: PropertyKey, value: PropertyValue) -> Option<PropertyValue> {
        match std::mem::replace(&mut self.slots[key.index()], Slot::Present(value)) {
            Slot::Present(previous) => Some(previous),
            Slot::Unset => None,
        }
    }

    /// Store a value according to the record's merge policy
    pub fn merge(&mut self, key: PropertyKey, value: PropertyValue) -> MergeOutcome {
        let policy = self.policy;
        let slot = &mut self.slots[key.index()];
        if !slot.is_present() {
            *slot = Slot::Present(value);
            return MergeOutcome::Inserted;
        }

        match policy {
            MergePolicy::KeepFirst => MergeOutcome::Kept,
            MergePolicy::Overwrite => {
                *slot = Slot::Present(value);
                MergeOutcome::Replaced
            }
            MergePolicy::Accumulate => {
                if let Slot::Present(existing) = slot {
                    if key.accumulates() && existing.can_extend_with(&value) {
                        existing.extend_with(value);
                        return MergeOutcome::Extended;
                    }
                }
                *slot = Slot::Present(value);
                MergeOutcome::Replaced
            }
        }
    }

    /// Keys currently present, in key order
    pub fn present_keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        PropertyKey::ALL
            .into_iter()
            .filter(move |key| self.is_present(*key))
    }

    /// Number of present keys
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_present()).count()
    }

    /// Whether no key is present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form: session id plus present keys only
#[derive(Serialize)]
struct RecordDocument<'a> {
    session: String,
    merge_policy: MergePolicy,
    properties: BTreeMap<&'static str, &'a PropertyValue>,
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let properties = PropertyKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|value| (key.name(), value)))
            .collect();

        RecordDocument {
            session: self.session.to_string(),
            merge_policy: self.policy,
            properties,
        }
        .serialize(serializer)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_key() -> impl Strategy<Value = PropertyKey> {
        (0..PropertyKey::COUNT).prop_map(|i| PropertyKey::ALL[i])
    }

    proptest! {
        /// Property: any integer, including zero, makes its slot present
        #[test]
        fn test_any_int_is_present(key in any_key(), value: i64) {
            let mut record = ResultRecord::new();
            record.set(key, PropertyValue::Int(value));
            prop_assert!(record.is_present(key));
            prop_assert_eq!(record.len(), 1);
        }

        /// Property: under KeepFirst, the first merged value is never displaced
        #[test]
        fn test_keep_first_is_stable(key in any_key(), first: i64, later in proptest::collection::vec(any::<i64>(), 0..8)) {
            let mut record = ResultRecord::with_policy(MergePolicy::KeepFirst);
            record.merge(key, PropertyValue::Int(first));
            for value in later {
                prop_assert_eq!(record.merge(key, PropertyValue::Int(value)), MergeOutcome::Kept);
            }
            prop_assert_eq!(record.get(key), Some(&PropertyValue::Int(first)));
        }

        /// Property: accumulated lists keep every element in write order
        #[test]
        fn test_accumulate_concatenates(chunks in proptest::collection::vec(proptest::collection::vec(-1e3f64..1e3, 0..5), 1..6)) {
            let mut record = ResultRecord::with_policy(MergePolicy::Accumulate);
            for chunk in &chunks {
                record.merge(PropertyKey::ScfEnergies, PropertyValue::FloatList(chunk.clone()));
            }
            let expected: Vec<f64> = chunks.concat();
            prop_assert_eq!(record.get(PropertyKey::ScfEnergies), Some(&PropertyValue::FloatList(expected)));
        }
    }
}
