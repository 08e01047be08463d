//! Block tree construction.
//!
//! The input is tokenized once and delimiters are paired in a single pass
//! with an explicit stack of open blocks, so a block's inner markup spans
//! exactly its own children. Children are built before the parent is
//! normalized.

use bf_fields::{AttributeTree, FieldNormalizer};
use bf_store::FieldValues;
use serde_json::Value;

use crate::node::BlockNode;
use crate::token::{Delimiter, DelimiterKind, tokenize};

/// Deepest block nesting that is parsed into nodes.
const MAX_DEPTH: usize = 128;

/// Turns a block's raw attribute payload into its normalized attributes.
///
/// Called once per named block, after its children are parsed.
pub trait BlockNormalizer {
    /// Normalize the attributes of block `name`.
    fn normalize(&self, name: &str, attrs: &FieldValues, children: &[BlockNode])
    -> AttributeTree;
}

impl BlockNormalizer for FieldNormalizer {
    fn normalize(
        &self,
        name: &str,
        attrs: &FieldValues,
        _children: &[BlockNode],
    ) -> AttributeTree {
        self.normalize_block(name, attrs)
    }
}

impl<N: BlockNormalizer + ?Sized> BlockNormalizer for &N {
    fn normalize(
        &self,
        name: &str,
        attrs: &FieldValues,
        children: &[BlockNode],
    ) -> AttributeTree {
        (**self).normalize(name, attrs, children)
    }
}

/// Keeps attribute payloads exactly as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawAttributes;

impl BlockNormalizer for RawAttributes {
    fn normalize(
        &self,
        _name: &str,
        attrs: &FieldValues,
        _children: &[BlockNode],
    ) -> AttributeTree {
        AttributeTree::from(Value::Object(attrs.clone()))
    }
}

/// Block tree parser bound to a normalizer.
#[derive(Debug, Clone)]
pub struct BlockParser<N = FieldNormalizer> {
    normalizer: N,
}

impl<N: BlockNormalizer> BlockParser<N> {
    /// Create a parser that normalizes every named block with `normalizer`.
    #[must_use]
    pub fn new(normalizer: N) -> Self {
        Self { normalizer }
    }

    /// Borrow the normalizer.
    #[must_use]
    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// Parse serialized content into an ordered list of top-level nodes.
    ///
    /// Never fails: malformed payloads become empty attribute maps,
    /// unterminated blocks extend to the end of the input and stray closers
    /// are kept as literal markup. Blocks nested too deep stay literal markup
    /// inside the deepest block that fits.
    pub fn parse(&self, raw: &str) -> Vec<BlockNode> {
        let delimiters = tokenize(raw);
        let mut root = Level::default();
        let mut open: Vec<OpenBlock<'_, '_>> = Vec::new();
        // Openers past MAX_DEPTH still waiting for their closer.
        let mut overflow = 0usize;

        for delimiter in &delimiters {
            if overflow > 0 {
                match delimiter.kind {
                    DelimiterKind::Open => overflow += 1,
                    DelimiterKind::Close => overflow -= 1,
                    DelimiterKind::Void => {}
                }
                continue;
            }
            match delimiter.kind {
                DelimiterKind::Open if open.len() >= MAX_DEPTH => {
                    tracing::warn!(
                        block = %delimiter.name,
                        offset = delimiter.start,
                        max_depth = MAX_DEPTH,
                        "Block nesting too deep, keeping inner blocks as markup"
                    );
                    overflow = 1;
                }
                DelimiterKind::Open => {
                    let parent = current(&mut root, &mut open);
                    push_text(&mut parent.children, &raw[parent.cursor..delimiter.start]);
                    open.push(OpenBlock {
                        opener: delimiter,
                        level: Level {
                            children: Vec::new(),
                            cursor: delimiter.end,
                        },
                    });
                }
                DelimiterKind::Void => {
                    let parent = current(&mut root, &mut open);
                    push_text(&mut parent.children, &raw[parent.cursor..delimiter.start]);
                    parent
                        .children
                        .push(self.named(delimiter, String::new(), Vec::new()));
                    parent.cursor = delimiter.end;
                }
                DelimiterKind::Close => match open.pop() {
                    Some(block) => {
                        if block.opener.name != delimiter.name {
                            tracing::debug!(
                                opener = %block.opener.name,
                                closer = %delimiter.name,
                                "Block closed by mismatched delimiter"
                            );
                        }
                        let node = self.finish(raw, block, delimiter.start);
                        let parent = current(&mut root, &mut open);
                        parent.children.push(node);
                        parent.cursor = delimiter.end;
                    }
                    None => {
                        // Stray closer: left inside the next literal run.
                        tracing::debug!(
                            block = %delimiter.name,
                            offset = delimiter.start,
                            "Unmatched block closer"
                        );
                    }
                },
            }
        }

        while let Some(block) = open.pop() {
            tracing::debug!(
                block = %block.opener.name,
                "Unterminated block extends to end of input"
            );
            let node = self.finish(raw, block, raw.len());
            let parent = current(&mut root, &mut open);
            parent.children.push(node);
            parent.cursor = raw.len();
        }

        push_text(&mut root.children, &raw[root.cursor..]);
        root.children
    }

    /// Close `block` with its inner markup ending at `inner_end`.
    fn finish(&self, raw: &str, block: OpenBlock<'_, '_>, inner_end: usize) -> BlockNode {
        let OpenBlock { opener, mut level } = block;
        push_text(&mut level.children, &raw[level.cursor..inner_end]);
        self.named(opener, raw[opener.end..inner_end].to_owned(), level.children)
    }

    fn named(
        &self,
        delimiter: &Delimiter<'_>,
        inner: String,
        children: Vec<BlockNode>,
    ) -> BlockNode {
        let attrs = parse_payload(delimiter.name, delimiter.payload);
        let attributes = self.normalizer.normalize(delimiter.name, &attrs, &children);
        BlockNode {
            name: Some(delimiter.name.to_owned()),
            attributes,
            raw_inner_content: inner,
            children,
        }
    }
}

/// Parse with a borrowed normalizer.
pub fn parse(raw: &str, normalizer: &dyn BlockNormalizer) -> Vec<BlockNode> {
    BlockParser::new(normalizer).parse(raw)
}

/// Parse without field normalization; attribute payloads are kept verbatim.
pub fn parse_raw(raw: &str) -> Vec<BlockNode> {
    BlockParser::new(RawAttributes).parse(raw)
}

/// Children parsed so far at one nesting level, and where the next literal
/// run starts.
#[derive(Default)]
struct Level {
    children: Vec<BlockNode>,
    cursor: usize,
}

/// An opener still waiting for its closer.
struct OpenBlock<'t, 'a> {
    opener: &'t Delimiter<'a>,
    level: Level,
}

/// The innermost open level.
fn current<'s>(root: &'s mut Level, open: &'s mut [OpenBlock<'_, '_>]) -> &'s mut Level {
    match open.last_mut() {
        Some(block) => &mut block.level,
        None => root,
    }
}

fn push_text(nodes: &mut Vec<BlockNode>, markup: &str) {
    if !markup.trim().is_empty() {
        nodes.push(BlockNode::text(markup));
    }
}

fn parse_payload(name: &str, payload: Option<&str>) -> FieldValues {
    let Some(payload) = payload else {
        return FieldValues::new();
    };
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!(block = %name, "Block attributes are not a JSON object");
            FieldValues::new()
        }
        Err(e) => {
            tracing::warn!(block = %name, error = %e, "Malformed block attributes");
            FieldValues::new()
        }
    }
}
