//! Navigation data types.

use serde::{Deserialize, Serialize};

/// A single entry of a primary navigation menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// Display label as authored in the menu editor.
    pub label: String,
    /// Link target.
    pub url: String,
    /// Nested entries (dropdown items).
    #[serde(default)]
    pub children: Vec<NavigationEntry>,
}

impl NavigationEntry {
    /// Create an entry without children.
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            children: Vec::new(),
        }
    }

    /// Attach child entries.
    #[must_use]
    pub fn with_children(mut self, children: Vec<NavigationEntry>) -> Self {
        self.children = children;
        self
    }
}

/// Auxiliary navigation structure shown when hovering a top-level entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MegaMenuDefinition {
    /// Label used to pair the definition with a navigation entry.
    pub label: String,
    /// Columns of the mega menu.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl MegaMenuDefinition {
    /// Create a definition without categories.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            categories: Vec::new(),
        }
    }

    /// Append a category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }
}

/// A titled column of links inside a mega menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Column heading.
    pub title: String,
    /// Links in display order.
    #[serde(default)]
    pub items: Vec<CategoryItem>,
}

/// A link inside a mega-menu category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    /// Link text.
    pub title: String,
    /// Link target.
    pub url: String,
}
