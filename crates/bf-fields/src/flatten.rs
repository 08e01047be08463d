//! Flattened key encoding.
//!
//! Repeater rows are stored as `<base>_<index>_<subfield>` with an optional
//! `<base>` row count. Keys starting with `_` are editor type hints that
//! shadow real keys and never reach the output.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Largest row count padded with empty rows.
///
/// Past it, only the rows present in the input are kept, in index order.
const MAX_ROWS: usize = 1000;

/// `<base>_<index>_<subfield>`, split at the leftmost `_<digits>_`.
static FLATTENED_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)_(\d+)_(.+)$").unwrap());

/// Split a flattened repeater key into `(base, index, subfield)`.
pub(crate) fn split_flattened_key(key: &str) -> Option<(&str, usize, &str)> {
    let caps = FLATTENED_KEY_RE.captures(key)?;
    let base = caps.get(1)?.as_str();
    let index = caps.get(2)?.as_str().parse().ok()?;
    let sub = caps.get(3)?.as_str();
    Some((base, index, sub))
}

/// True for editor type-hint companions (`_items`, `_hero_image`).
pub(crate) fn is_shadow_key(key: &str) -> bool {
    key.starts_with('_')
}

/// Interpret a value as a repeater row count.
pub(crate) fn row_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Replace every flattened family in `raw` by `<base>: [rows]`.
///
/// Shadow keys are dropped. The row count comes from the `<base>` key when
/// it holds a number, otherwise from the highest observed index. Rows past an
/// explicit count are stale leftovers and are dropped; missing rows are empty
/// objects. Rows are returned raw: nested flattening inside a row is left to
/// the caller's recursion.
pub(crate) fn expand_repeaters(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut plain = Map::new();
    let mut families: BTreeMap<&str, BTreeMap<usize, Map<String, Value>>> = BTreeMap::new();

    for (key, value) in raw {
        if is_shadow_key(key) {
            continue;
        }
        match split_flattened_key(key) {
            Some((base, index, sub)) => {
                families
                    .entry(base)
                    .or_default()
                    .entry(index)
                    .or_default()
                    .insert(sub.to_owned(), value.clone());
            }
            None => {
                plain.insert(key.clone(), value.clone());
            }
        }
    }

    for (base, rows) in families {
        let list = collect_rows(base, plain.get(base), rows);
        plain.insert(base.to_owned(), Value::Array(list));
    }

    plain
}

/// Assemble the ordered row list for one family.
pub(crate) fn collect_rows(
    base: &str,
    count_value: Option<&Value>,
    mut rows: BTreeMap<usize, Map<String, Value>>,
) -> Vec<Value> {
    let observed = rows.keys().next_back().map_or(0, |max| max + 1);
    let declared = count_value.and_then(row_count);

    if let Some(Value::Array(_)) = count_value {
        tracing::debug!(field = %base, "Flattened rows replace nested list");
    }

    let len = declared.unwrap_or(observed);
    if let Some(count) = declared
        && count < observed
    {
        tracing::debug!(
            field = %base,
            count,
            observed,
            "Dropping stale repeater rows"
        );
    }
    if len > MAX_ROWS {
        // Too sparse to pad: keep only the rows actually present.
        tracing::warn!(
            field = %base,
            count = len,
            rows = rows.len(),
            "Repeater row count too large, keeping observed rows only"
        );
        return rows
            .into_iter()
            .take_while(|(index, _)| *index < len)
            .map(|(_, row)| Value::Object(row))
            .collect();
    }

    (0..len)
        .map(|i| Value::Object(rows.remove(&i).unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_split_simple_key() {
        assert_eq!(
            split_flattened_key("items_0_title"),
            Some(("items", 0, "title"))
        );
    }

    #[test]
    fn test_split_uses_leftmost_index() {
        assert_eq!(
            split_flattened_key("hero_slides_2_buttons_1_label"),
            Some(("hero_slides", 2, "buttons_1_label"))
        );
    }

    #[test]
    fn test_split_rejects_plain_keys() {
        assert_eq!(split_flattened_key("title"), None);
        assert_eq!(split_flattened_key("items_0"), None);
        assert_eq!(split_flattened_key("_0_title"), None);
        assert_eq!(split_flattened_key("items_x_title"), None);
    }

    #[test]
    fn test_split_rejects_overflowing_index() {
        assert_eq!(
            split_flattened_key("items_99999999999999999999999_title"),
            None
        );
    }

    #[test]
    fn test_expand_uses_count_key() {
        let raw = object(json!({
            "items_0_title": "Home",
            "items_1_title": "About",
            "items": 2,
            "_items": "field_abc"
        }));

        let expanded = expand_repeaters(&raw);

        assert_eq!(
            Value::Object(expanded),
            json!({"items": [{"title": "Home"}, {"title": "About"}]})
        );
    }

    #[test]
    fn test_expand_without_count_uses_max_index() {
        let raw = object(json!({"items_2_title": "C", "items_0_title": "A"}));

        let expanded = expand_repeaters(&raw);

        assert_eq!(
            Value::Object(expanded),
            json!({"items": [{"title": "A"}, {}, {"title": "C"}]})
        );
    }

    #[test]
    fn test_expand_drops_stale_rows_past_count() {
        let raw = object(json!({
            "items": "1",
            "items_0_title": "Kept",
            "items_1_title": "Stale"
        }));

        let expanded = expand_repeaters(&raw);

        assert_eq!(
            Value::Object(expanded),
            json!({"items": [{"title": "Kept"}]})
        );
    }

    #[test]
    fn test_expand_keeps_nested_flattening_for_recursion() {
        let raw = object(json!({
            "slides_0_buttons_0_label": "Go",
            "slides_0_buttons": 1
        }));

        let expanded = expand_repeaters(&raw);

        assert_eq!(
            Value::Object(expanded),
            json!({"slides": [{"buttons_0_label": "Go", "buttons": 1}]})
        );
    }

    #[test]
    fn test_row_count_parsing() {
        assert_eq!(row_count(&json!(3)), Some(3));
        assert_eq!(row_count(&json!(" 4 ")), Some(4));
        assert_eq!(row_count(&json!(-1)), None);
        assert_eq!(row_count(&json!("many")), None);
        assert_eq!(row_count(&json!([1])), None);
    }

    #[test]
    fn test_huge_count_is_not_padded() {
        let rows = BTreeMap::new();
        let list = collect_rows("items", Some(&json!(1_000_000)), rows);

        assert_eq!(list, Vec::<Value>::new());
    }

    #[test]
    fn test_huge_count_keeps_present_rows() {
        let raw = object(json!({
            "items": 1_000_000,
            "items_0_title": "First",
            "items_5000_title": "Far"
        }));

        let out = expand_repeaters(&raw);

        assert_eq!(
            Value::Object(out),
            json!({"items": [{"title": "First"}, {"title": "Far"}]})
        );
    }

    #[test]
    fn test_large_index_without_count_keeps_row() {
        let raw = object(json!({"stats_2024_total": 5}));

        let out = expand_repeaters(&raw);

        assert_eq!(Value::Object(out), json!({"stats": [{"total": 5}]}));
    }
}
