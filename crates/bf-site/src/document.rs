use bf_blocks::BlockNode;
use bf_fields::AttributeTree;
use bf_navigation::AnnotatedEntry;
use serde::Serialize;

/// Response document for a page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageDocument {
    /// Page identifier.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Page-level fields, normalized without a schema.
    pub fields: AttributeTree,
    /// Top-level block nodes in source order.
    pub blocks: Vec<BlockNode>,
}

/// Response document for a navigation location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationDocument {
    /// Menu location key.
    pub location: String,
    /// Top-level entries with their matched mega menus.
    pub items: Vec<AnnotatedEntry>,
}
