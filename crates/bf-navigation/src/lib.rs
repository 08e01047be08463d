//! Navigation entries and mega-menu matching for Blockfront.
//!
//! Primary navigation menus and mega-menu definitions are authored in two
//! different places, so the only link between them is a free-text label.
//! This crate provides:
//!
//! - [`NavigationEntry`] and [`MegaMenuDefinition`] data types
//! - [`match_mega_menus`]: tolerant label matching (case, whitespace, plural)
//! - [`annotate`]: entries with their matched definition attached, ready to serialize
//!
//! # Example
//!
//! ```ignore
//! use bf_navigation::{NavigationEntry, MegaMenuDefinition, match_mega_menus};
//!
//! let entries = vec![NavigationEntry::new("Services", "/services")];
//! let definitions = vec![MegaMenuDefinition::new("Service")];
//! let matches = match_mega_menus(&entries, &definitions);
//! assert!(matches.get(0).is_some());
//! ```

mod matcher;
mod types;

pub use matcher::{AnnotatedEntry, MegaMenuMatches, MenuMatch, annotate, match_mega_menus};
pub use types::{Category, CategoryItem, MegaMenuDefinition, NavigationEntry};
