//! Nested translation documents addressed by dotted keys.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A node in a translation document: either a string or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum Node {
    Text(String),
    Branch(BTreeMap<String, Node>),
}

/// One locale's translations for one namespace. Read-only after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    root: BTreeMap<String, Node>,
}

impl TranslationTable {
    /// Parse a JSON document of nested string-valued objects.
    ///
    /// Numbers, booleans, arrays and nulls anywhere in the document are
    /// rejected.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let root = serde_json::from_str(raw)?;
        Ok(Self { root })
    }

    /// Resolve `welcome.title` by descending `welcome` → `title`.
    ///
    /// A key that ends on a nested mapping rather than a string is missing.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            match node {
                Node::Branch(children) => node = children.get(segment)?,
                Node::Text(_) => return None,
            }
        }
        match node {
            Node::Text(text) => Some(text.as_str()),
            Node::Branch(_) => None,
        }
    }

    /// All dotted keys that resolve to a string, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_keys(&self.root, "", &mut out);
        out
    }

    /// Number of string entries.
    pub fn len(&self) -> usize {
        fn count(map: &BTreeMap<String, Node>) -> usize {
            map.values()
                .map(|node| match node {
                    Node::Text(_) => 1,
                    Node::Branch(children) => count(children),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collect_keys(map: &BTreeMap<String, Node>, prefix: &str, out: &mut Vec<String>) {
    for (name, node) in map {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match node {
            Node::Text(_) => out.push(key),
            Node::Branch(children) => collect_keys(children, &key, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "welcome": { "title": "Hello", "subtitle": "World" },
        "footer": { "links": { "privacy": "Privacy" } },
        "flat": "Flat value"
    }"#;

    #[test]
    fn test_lookup_descends_nested_levels() {
        let table = TranslationTable::from_json(SAMPLE).unwrap();
        assert_eq!(table.lookup("welcome.title"), Some("Hello"));
        assert_eq!(table.lookup("footer.links.privacy"), Some("Privacy"));
        assert_eq!(table.lookup("flat"), Some("Flat value"));
    }

    #[test]
    fn test_lookup_missing_and_partial_keys() {
        let table = TranslationTable::from_json(SAMPLE).unwrap();
        assert_eq!(table.lookup("welcome.missing"), None);
        assert_eq!(table.lookup("welcome"), None, "branch is not a string");
        assert_eq!(table.lookup("flat.deeper"), None);
        assert_eq!(table.lookup(""), None);
        assert_eq!(table.lookup("welcome..title"), None);
    }

    #[test]
    fn test_keys_are_flattened_and_sorted() {
        let table = TranslationTable::from_json(SAMPLE).unwrap();
        assert_eq!(
            table.keys(),
            vec![
                "flat",
                "footer.links.privacy",
                "welcome.subtitle",
                "welcome.title"
            ]
        );
        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_rejects_non_string_leaves() {
        assert!(TranslationTable::from_json(r#"{"count": 3}"#).is_err());
        assert!(TranslationTable::from_json(r#"{"a": {"b": null}}"#).is_err());
        assert!(TranslationTable::from_json(r#"{"a": ["x"]}"#).is_err());
        assert!(TranslationTable::from_json(r#"["x"]"#).is_err());
    }

    #[test]
    fn test_empty_document() {
        let table = TranslationTable::from_json("{}").unwrap();
        assert!(table.is_empty());
        assert_eq!(table, TranslationTable::default());
    }
}
