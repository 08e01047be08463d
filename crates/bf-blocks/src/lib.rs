//! Block tree parsing for Blockfront.
//!
//! Serialized content is literal markup interleaved with block delimiters
//! written as HTML comments:
//!
//! ```text
//! <!-- block:acme/hero {"title":"Hi"} -->
//!   <!-- wp:paragraph --><p>Body</p><!-- /wp:paragraph -->
//! <!-- /block:acme/hero -->
//! <!-- block:acme/spacer {"height":40} /-->
//! ```
//!
//! [`BlockParser`] turns this into an ordered tree of [`BlockNode`]s, calling a
//! [`BlockNormalizer`] once per named block after its children are parsed.
//!
//! # Example
//!
//! ```ignore
//! use bf_blocks::BlockParser;
//!
//! let parser = BlockParser::new(normalizer);
//! let nodes = parser.parse(&page.content);
//! ```

mod node;
mod parser;
mod token;

pub use node::BlockNode;
pub use parser::{BlockNormalizer, BlockParser, RawAttributes, parse, parse_raw};
