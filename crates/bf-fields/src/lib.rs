//! Structured field normalization for Blockfront.
//!
//! Block and page fields are persisted flattened and loosely typed: repeater
//! rows become `items_0_title`, `items_1_title`, a row count sits under
//! `items`, and `_items` holds an editor type hint. Media fields hold bare
//! attachment ids. This crate turns that storage shape into a typed
//! [`AttributeTree`]:
//!
//! - [`FieldNormalizer`]: repeater/group expansion, scalar coercion, media resolution
//! - [`FieldSchema`] / [`BlockSchemas`]: optional per-block field declarations
//! - [`AssetResolver`]: media references to absolute [`AssetDescriptor`]s
//!
//! Normalization never fails. Malformed input degrades field by field and
//! unresolvable media becomes [`AttributeTree::Null`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bf_fields::{AssetResolver, FieldNormalizer};
//!
//! let resolver = AssetResolver::new(store).with_base_url("https://cdn.example.com");
//! let normalizer = FieldNormalizer::new(resolver);
//! let tree = normalizer.normalize_inferred(&attrs);
//! ```

mod asset;
mod flatten;
mod normalizer;
mod schema;
mod tree;

pub use asset::{AssetResolver, is_absolute_url};
pub use normalizer::FieldNormalizer;
pub use schema::{BlockSchemas, FieldSchema, FieldType};
pub use tree::{AssetDescriptor, AttributeMap, AttributeTree};
