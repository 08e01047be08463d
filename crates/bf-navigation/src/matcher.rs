//! Label matching between navigation entries and mega-menu definitions.
//!
//! Labels are compared after trimming and lower-casing. Each definition is
//! registered under its own label and its singular/plural twin, so "Service"
//! and "Services" find each other. When two definitions claim the same key
//! the one that comes first in input order wins.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::types::{MegaMenuDefinition, NavigationEntry};

/// A navigation entry paired with its mega-menu definition, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuMatch<'a> {
    /// The navigation entry.
    pub entry: &'a NavigationEntry,
    /// Matched definition (`None` renders as a plain link).
    pub definition: Option<&'a MegaMenuDefinition>,
}

/// Matching result for a list of top-level entries, in entry order.
#[derive(Debug, Default)]
pub struct MegaMenuMatches<'a> {
    matches: Vec<MenuMatch<'a>>,
}

impl<'a> MegaMenuMatches<'a> {
    /// Definition matched for the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a MegaMenuDefinition> {
        self.matches.get(index).and_then(|m| m.definition)
    }

    /// Definition matched for `entry`, looked up by identity.
    #[must_use]
    pub fn for_entry(&self, entry: &NavigationEntry) -> Option<&'a MegaMenuDefinition> {
        self.matches
            .iter()
            .find(|m| std::ptr::eq(m.entry, entry))
            .and_then(|m| m.definition)
    }

    /// Iterate over all pairs in entry order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuMatch<'a>> {
        self.matches.iter()
    }

    /// Number of entries (matched or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// True if there were no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of entries that found a definition.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.definition.is_some())
            .count()
    }
}

/// Navigation entry annotated with its mega menu for the frontend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedEntry {
    /// Display label.
    pub label: String,
    /// Link target.
    pub url: String,
    /// Nested entries (never annotated).
    pub children: Vec<NavigationEntry>,
    /// Matched mega menu.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mega_menu: Option<MegaMenuDefinition>,
}

/// Normalize a label for comparison.
fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Singular/plural twin of an already normalized label.
fn plural_twin(normalized: &str) -> String {
    match normalized.strip_suffix('s') {
        Some(singular) => singular.to_owned(),
        None => format!("{normalized}s"),
    }
}

/// Build the lookup table from normalized keys to definitions.
fn build_index(definitions: &[MegaMenuDefinition]) -> HashMap<String, &MegaMenuDefinition> {
    let mut index: HashMap<String, &MegaMenuDefinition> =
        HashMap::with_capacity(definitions.len() * 2);
    for definition in definitions {
        let key = normalize_label(&definition.label);
        if key.is_empty() {
            continue;
        }
        let twin = plural_twin(&key);
        for candidate in [key, twin] {
            if candidate.is_empty() {
                continue;
            }
            match index.entry(candidate) {
                Entry::Occupied(existing) => {
                    if !std::ptr::eq(*existing.get(), definition) {
                        tracing::debug!(
                            key = %existing.key(),
                            kept = %existing.get().label,
                            ignored = %definition.label,
                            "Mega menu label collision"
                        );
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(definition);
                }
            }
        }
    }
    index
}

/// Match top-level navigation entries against mega-menu definitions.
///
/// Every entry appears in the result, in input order. Entries without a
/// matching definition map to `None`.
#[must_use]
pub fn match_mega_menus<'a>(
    entries: &'a [NavigationEntry],
    definitions: &'a [MegaMenuDefinition],
) -> MegaMenuMatches<'a> {
    let index = build_index(definitions);
    let matches: Vec<MenuMatch<'a>> = entries
        .iter()
        .map(|entry| MenuMatch {
            entry,
            definition: index.get(&normalize_label(&entry.label)).copied(),
        })
        .collect();

    let result = MegaMenuMatches { matches };
    tracing::debug!(
        entries = result.len(),
        matched = result.matched_count(),
        "Matched mega menus"
    );
    result
}

/// Match entries and return owned, serializable annotated entries.
#[must_use]
pub fn annotate(
    entries: &[NavigationEntry],
    definitions: &[MegaMenuDefinition],
) -> Vec<AnnotatedEntry> {
    match_mega_menus(entries, definitions)
        .iter()
        .map(|m| AnnotatedEntry {
            label: m.entry.label.clone(),
            url: m.entry.url.clone(),
            children: m.entry.children.clone(),
            mega_menu: m.definition.cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{Category, CategoryItem};

    fn entries(labels: &[&str]) -> Vec<NavigationEntry> {
        labels
            .iter()
            .map(|l| NavigationEntry::new(*l, format!("/{}", l.to_lowercase())))
            .collect()
    }

    fn definitions(labels: &[&str]) -> Vec<MegaMenuDefinition> {
        labels.iter().map(|l| MegaMenuDefinition::new(*l)).collect()
    }

    #[test]
    fn test_plural_entry_matches_singular_definition() {
        let entries = entries(&["Services"]);
        let defs = definitions(&["Service"]);

        let matches = match_mega_menus(&entries, &defs);

        assert_eq!(matches.get(0).map(|d| d.label.as_str()), Some("Service"));
    }

    #[test]
    fn test_singular_entry_matches_plural_definition() {
        let entries = entries(&["Service"]);
        let defs = definitions(&["Services"]);

        let matches = match_mega_menus(&entries, &defs);

        assert_eq!(matches.get(0).map(|d| d.label.as_str()), Some("Services"));
    }

    #[test]
    fn test_unmatched_entry_maps_to_none() {
        let entries = entries(&["Contact"]);
        let defs = definitions(&["Services", "Products"]);

        let matches = match_mega_menus(&entries, &defs);

        assert_eq!(matches.len(), 1);
        assert!(matches.get(0).is_none());
        assert_eq!(matches.matched_count(), 0);
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        let entries = entries(&["  PRODUCTS "]);
        let defs = definitions(&["products"]);

        let matches = match_mega_menus(&entries, &defs);

        assert!(matches.get(0).is_some());
    }

    #[test]
    fn test_first_definition_wins_on_collision() {
        let entries = entries(&["Service"]);
        let defs = vec![
            MegaMenuDefinition::new("Services").with_category(Category {
                title: "first".to_owned(),
                items: Vec::new(),
            }),
            MegaMenuDefinition::new("Service").with_category(Category {
                title: "second".to_owned(),
                items: Vec::new(),
            }),
        ];

        let matches = match_mega_menus(&entries, &defs);

        let matched = matches.get(0).unwrap();
        assert_eq!(matched.categories[0].title, "first");
    }

    #[test]
    fn test_preserves_entry_order() {
        let entries = entries(&["About", "Services", "Contact", "Products"]);
        let defs = definitions(&["Product", "Services"]);

        let matches = match_mega_menus(&entries, &defs);
        let labels: Vec<Option<&str>> = matches
            .iter()
            .map(|m| m.definition.map(|d| d.label.as_str()))
            .collect();

        assert_eq!(
            labels,
            vec![None, Some("Services"), None, Some("Product")]
        );
    }

    #[test]
    fn test_for_entry_uses_identity() {
        let entries = entries(&["Services", "Services"]);
        let defs = definitions(&["Services"]);

        let matches = match_mega_menus(&entries, &defs);

        assert!(matches.for_entry(&entries[1]).is_some());
        let detached = NavigationEntry::new("Services", "/services");
        assert!(matches.for_entry(&detached).is_none());
    }

    #[test]
    fn test_empty_definition_label_is_not_registered() {
        let entries = entries(&["s"]);
        let defs = definitions(&["   "]);

        let matches = match_mega_menus(&entries, &defs);

        assert!(matches.get(0).is_none());
    }

    #[test]
    fn test_annotate_attaches_mega_menu() {
        let entries = vec![
            NavigationEntry::new("Services", "/services")
                .with_children(vec![NavigationEntry::new("Consulting", "/services/consulting")]),
            NavigationEntry::new("Contact", "/contact"),
        ];
        let defs = vec![MegaMenuDefinition::new("Service").with_category(Category {
            title: "Offerings".to_owned(),
            items: vec![CategoryItem {
                title: "Audit".to_owned(),
                url: "/services/audit".to_owned(),
            }],
        })];

        let annotated = annotate(&entries, &defs);
        let json = serde_json::to_value(&annotated).unwrap();

        assert_eq!(json[0]["label"], "Services");
        assert_eq!(json[0]["megaMenu"]["label"], "Service");
        assert_eq!(json[0]["megaMenu"]["categories"][0]["items"][0]["url"], "/services/audit");
        assert_eq!(json[0]["children"][0]["label"], "Consulting");
        assert!(json[1].get("megaMenu").is_none());
    }

    #[test]
    fn test_build_index_keys_each_definition_twice() {
        let defs = definitions(&["Services", "Service", "Products"]);

        let index = build_index(&defs);

        let mut keys: Vec<&str> = index.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["product", "products", "service", "services"]);
        assert_eq!(index["service"].label, "Services");
        assert_eq!(index["products"].label, "Products");
    }

    #[test]
    fn test_plural_twin() {
        assert_eq!(plural_twin("services"), "service");
        assert_eq!(plural_twin("service"), "services");
        assert_eq!(plural_twin("s"), "");
    }
}
