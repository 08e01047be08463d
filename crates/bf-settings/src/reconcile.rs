use bf_store::StoreKind;
use serde_json::Value;

use crate::slot::{ConfigSlot, SlotValidity};

/// A write needed to bring one store in line with the resolved value.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotWrite {
    pub store: StoreKind,
    pub value: Value,
}

/// Outcome of [`reconcile`].
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    /// The slot as it stands once `writes` are applied.
    pub slot: ConfigSlot,
    /// Writes to apply, primary first.
    pub writes: Vec<SlotWrite>,
}

impl Reconciliation {
    /// True if both stores already agree.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Decide the resolved value of a slot and the writes that persist it.
///
/// Preference: valid primary, then valid secondary, then `fallback` (the
/// heuristic result). Every store whose value differs from the pick is
/// written, so a heuristic pick lands in both. When nothing is valid and
/// there is no fallback the slot stays unresolved and nothing is written.
///
/// Applying the writes and reconciling again yields no further writes.
#[must_use]
pub fn reconcile(
    mut slot: ConfigSlot,
    validity: SlotValidity,
    fallback: Option<Value>,
) -> Reconciliation {
    let picked = if validity.primary_valid && slot.primary_value.is_some() {
        slot.primary_value.clone()
    } else if validity.secondary_valid && slot.secondary_value.is_some() {
        slot.secondary_value.clone()
    } else {
        fallback
    };

    let Some(value) = picked else {
        slot.resolved = None;
        return Reconciliation {
            slot,
            writes: Vec::new(),
        };
    };

    let mut writes = Vec::new();
    if slot.primary_value.as_ref() != Some(&value) {
        writes.push(SlotWrite {
            store: StoreKind::Primary,
            value: value.clone(),
        });
    }
    if slot.secondary_value.as_ref() != Some(&value) {
        writes.push(SlotWrite {
            store: StoreKind::Secondary,
            value: value.clone(),
        });
    }

    slot.primary_value = Some(value.clone());
    slot.secondary_value = Some(value.clone());
    slot.resolved = Some(value);
    Reconciliation { slot, writes }
}
