// Slot normalization.
//
// The voice platform hands us each slot as the literal text it heard plus an
// optional entity-resolution result. Handlers only want one question answered:
// "what value should I use, and was it a canonical match?"

use std::collections::HashMap;

/// Status code the platform reports for a canonical entity match.
pub const ER_SUCCESS_MATCH: &str = "ER_SUCCESS_MATCH";
/// Status code the platform reports when resolution ran but found nothing.
pub const ER_SUCCESS_NO_MATCH: &str = "ER_SUCCESS_NO_MATCH";

/// Outcome of the platform's entity resolution for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No resolution block was sent at all.
    Unresolved,
    NoMatch,
    /// Canonical name of the first resolved value.
    Match(String),
    /// Any other status code (timeouts, errors).
    Other(String),
}

impl Resolution {
    /// Builds a resolution from a status code and the resolved names in order.
    pub fn from_status(code: &str, mut names: impl Iterator<Item = String>) -> Self {
        match code {
            ER_SUCCESS_MATCH => match names.next() {
                Some(name) => Resolution::Match(name),
                None => Resolution::NoMatch,
            },
            ER_SUCCESS_NO_MATCH => Resolution::NoMatch,
            other => Resolution::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSlot {
    /// What the user said. `None` while the slot is still unfilled.
    pub value: Option<String>,
    pub resolution: Resolution,
}

/// A slot value ready for a handler to use.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotValue {
    pub synonym: String,
    pub resolved: String,
    pub is_validated: bool,
}

/// Normalized slots for one intent, keyed by slot name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slots(HashMap<String, SlotValue>);

impl Slots {
    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.0.get(name)
    }

    /// The resolved text of a slot, if it was filled with something non-blank.
    pub fn resolved(&self, name: &str) -> Option<&str> {
        self.get(name)
            .map(|slot| slot.resolved.as_str())
            .filter(|value| !value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalizes every raw slot.
///
/// Unfilled slots and slots whose resolution reported an unexpected status
/// code are left out of the result; handlers treat both as missing.
pub fn normalize_slots(raw: &HashMap<String, RawSlot>) -> Slots {
    let normalized = raw
        .iter()
        .filter_map(|(name, slot)| normalize_slot(slot).map(|value| (name.clone(), value)))
        .collect();

    Slots(normalized)
}

fn normalize_slot(slot: &RawSlot) -> Option<SlotValue> {
    let synonym = slot.value.clone()?;

    match &slot.resolution {
        Resolution::Match(name) => Some(SlotValue {
            synonym,
            resolved: name.clone(),
            is_validated: true,
        }),
        Resolution::NoMatch | Resolution::Unresolved => Some(SlotValue {
            resolved: synonym.clone(),
            synonym,
            is_validated: false,
        }),
        Resolution::Other(code) => {
            tracing::debug!(status = %code, "Ignoring slot with unexpected resolution status");
            None
        }
    }
}
