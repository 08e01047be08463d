use bf_fields::AttributeTree;
use serde::Serialize;

/// A parsed block or a run of literal markup.
///
/// Named nodes carry normalized attributes and their ordered children.
/// Unnamed nodes hold literal markup in `raw_inner_content` and are never
/// normalized.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    /// Block type (`vendor/kind` or a bare name); `None` for literal markup.
    pub name: Option<String>,
    /// Normalized attributes (an empty map for literal markup).
    pub attributes: AttributeTree,
    /// Markup between the opening and closing delimiter, children included.
    pub raw_inner_content: String,
    /// Nested blocks and literal runs in source order.
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    /// Create a literal markup node.
    #[must_use]
    pub fn text(markup: impl Into<String>) -> Self {
        Self {
            name: None,
            attributes: AttributeTree::empty_map(),
            raw_inner_content: markup.into(),
            children: Vec::new(),
        }
    }

    /// True for literal markup nodes.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.name.is_none()
    }

    /// Number of named blocks in this subtree, depth first, self included.
    #[must_use]
    pub fn named_count(&self) -> usize {
        usize::from(!self.is_text()) + self.children.iter().map(Self::named_count).sum::<usize>()
    }
}
