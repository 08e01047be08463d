//! Site setting reconciliation for Blockfront.
//!
//! Settings such as the site logo live in two stores: a primary one that is
//! reset by environment migrations, and a durable secondary one. Each named
//! [`SlotDefinition`] is resolved by reading both, keeping the first valid
//! value, and writing it back wherever it is missing or stale.
//!
//! - [`reconcile`]: pure decision, returns the slot and the writes to apply
//! - [`ConfigResolver`]: reads stores, checks validity, applies writes

mod reconcile;
mod resolver;
mod slot;

pub use reconcile::{Reconciliation, SlotWrite, reconcile};
pub use resolver::ConfigResolver;
pub use slot::{ConfigSlot, SlotDefinition, SlotKind, SlotValidity};
