//! The generic document tree.
//!
//! Documents arrive here already parsed: mappings, sequences, scalars, and
//! `!reference` markers wherever the source used the tag.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value as RawValue;

use crate::{Reference, ReferenceError, Result};

/// Insertion-ordered mapping. Key order survives resolution.
pub type Mapping = IndexMap<String, Value>;

/// Leaf values. Opaque to the resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A node of a configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Mapping(Mapping),
    Sequence(Vec<Value>),
    Scalar(Scalar),
    /// A `!reference` marker awaiting substitution.
    Reference(Reference),
}

impl Value {
    /// Build a marker node from a raw tag argument.
    pub fn reference(raw: Option<&RawValue>) -> Result<Self> {
        Reference::from_raw(raw).map(Value::Reference)
    }

    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }

    /// True when no marker remains anywhere in this subtree.
    pub fn is_resolved(&self) -> bool {
        match self {
            Value::Scalar(_) => true,
            Value::Reference(_) => false,
            Value::Sequence(items) => items.iter().all(Value::is_resolved),
            Value::Mapping(mapping) => mapping.values().all(Value::is_resolved),
        }
    }

    /// Every marker in this subtree, in document order.
    pub fn references(&self) -> Vec<&Reference> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a Reference>) {
        match self {
            Value::Scalar(_) => {}
            Value::Reference(reference) => found.push(reference),
            Value::Sequence(items) => {
                for item in items {
                    item.collect_references(found);
                }
            }
            Value::Mapping(mapping) => {
                for value in mapping.values() {
                    value.collect_references(found);
                }
            }
        }
    }

    /// Convert a resolved tree to JSON for the schema layer.
    ///
    /// Fails on the first marker found, since a marker has no JSON meaning.
    pub fn to_json(&self) -> Result<RawValue> {
        Ok(match self {
            Value::Scalar(Scalar::Null) => RawValue::Null,
            Value::Scalar(Scalar::Bool(b)) => RawValue::Bool(*b),
            Value::Scalar(Scalar::Integer(n)) => RawValue::from(*n),
            Value::Scalar(Scalar::Float(f)) => RawValue::from(*f),
            Value::Scalar(Scalar::String(s)) => RawValue::String(s.clone()),
            Value::Sequence(items) => RawValue::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Mapping(mapping) => RawValue::Object(
                mapping
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.to_json()?)))
                    .collect::<Result<serde_json::Map<_, _>>>()?,
            ),
            Value::Reference(reference) => {
                return Err(ReferenceError::UnresolvedMarker {
                    path: reference.target_path().clone(),
                });
            }
        })
    }
}

/// Markers serialize as `{"!reference": [...]}` so unresolved trees can still be dumped.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Mapping(mapping) => mapping.serialize(serializer),
            Value::Sequence(items) => items.serialize(serializer),
            Value::Scalar(scalar) => scalar.serialize(serializer),
            Value::Reference(reference) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(Reference::TAG, reference.target_path())?;
                map.end()
            }
        }
    }
}

/// Plain JSON never contains markers; build those with [`Value::reference`].
impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => Value::Scalar(Scalar::Null),
            RawValue::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            RawValue::Number(n) => Value::Scalar(
                n.as_i64()
                    .map(Scalar::Integer)
                    .or_else(|| n.as_f64().map(Scalar::Float))
                    .unwrap_or(Scalar::Null),
            ),
            RawValue::String(s) => Value::Scalar(Scalar::String(s)),
            RawValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            RawValue::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Value::Mapping(mapping)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        Value::Reference(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marker(segments: RawValue) -> Value {
        Value::reference(Some(&segments)).unwrap()
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let value = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_number_conversion() {
        assert_eq!(Value::from(json!(7)), Value::Scalar(Scalar::Integer(7)));
        assert_eq!(Value::from(json!(1.5)), Value::Scalar(Scalar::Float(1.5)));
        assert_eq!(Value::from(json!(null)), Value::null());
    }

    #[test]
    fn test_references_in_document_order() {
        let mut inner = Mapping::new();
        inner.insert("x".into(), marker(json!(["a"])));
        let value = Value::Sequence(vec![
            marker(json!(["b", "c"])),
            Value::Mapping(inner),
            "plain".into(),
        ]);

        let paths: Vec<String> = value
            .references()
            .iter()
            .map(|r| r.target_path().to_string())
            .collect();
        assert_eq!(paths, vec![r#"["b", "c"]"#, r#"["a"]"#]);
        assert!(!value.is_resolved());
    }

    #[test]
    fn test_plain_tree_is_resolved() {
        let value = Value::from(json!({"a": [1, {"b": true}], "c": "d"}));
        assert!(value.is_resolved());
        assert!(value.references().is_empty());
    }

    #[test]
    fn test_get_walks_mapping_only() {
        let value = Value::from(json!({"a": {"b": "c"}, "list": ["x"]}));
        assert_eq!(value.get("a").and_then(|a| a.get("b")), Some(&Value::from("c")));
        assert!(value.get("list").and_then(|l| l.get("0")).is_none());
        assert!(value.get("missing").is_none());
    }

    #[test]
    fn test_to_json_round_trips_resolved_tree() {
        let raw = json!({"job": {"script": ["make", "make test"], "retry": 2, "allow_failure": false}});
        assert_eq!(Value::from(raw.clone()).to_json().unwrap(), raw);
    }

    #[test]
    fn test_to_json_rejects_markers() {
        let value = Value::Sequence(vec!["ok".into(), marker(json!(["setup"]))]);
        let err = value.to_json().unwrap_err();
        assert!(matches!(err, ReferenceError::UnresolvedMarker { .. }));
        assert_eq!(
            err.to_string(),
            r#"unresolved reference marker ["setup"] in resolved document"#
        );
    }

    #[test]
    fn test_serialize_marker_as_tagged_map() {
        let mut mapping = Mapping::new();
        mapping.insert("script".into(), marker(json!([".setup", "script"])));
        let dumped = serde_json::to_value(Value::Mapping(mapping)).unwrap();
        assert_eq!(dumped, json!({"script": {"!reference": [".setup", "script"]}}));
    }
}
