//! Driver-independent representation of a source document.
//!
//! Every record read from the data source is converted into [`DocValue`]
//! before normalization, so the conversion to plain JSON is an exhaustive
//! match over a closed set of variants.

use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::Value;

/// Ordered field list of one document.
pub type Fields = Vec<(String, DocValue)>;

#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<DocValue>),
    Document(Fields),
    ObjectId(ObjectId),
    DateTime(bson::DateTime),
    /// Types with no plain JSON form, kept as relaxed Extended JSON.
    Extended(Value),
}

impl DocValue {
    pub fn document<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, DocValue)>,
    {
        DocValue::Document(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

pub fn document_fields(doc: Document) -> Fields {
    doc.into_iter().map(|(k, v)| (k, DocValue::from(v))).collect()
}

impl From<Bson> for DocValue {
    fn from(value: Bson) -> Self {
        match value {
            Bson::Null | Bson::Undefined => DocValue::Null,
            Bson::Boolean(b) => DocValue::Bool(b),
            Bson::Int32(n) => DocValue::Int(n.into()),
            Bson::Int64(n) => DocValue::Int(n),
            Bson::Double(f) => DocValue::Double(f),
            Bson::String(s) | Bson::Symbol(s) => DocValue::String(s),
            Bson::Array(items) => DocValue::Array(items.into_iter().map(DocValue::from).collect()),
            Bson::Document(doc) => DocValue::Document(document_fields(doc)),
            Bson::ObjectId(oid) => DocValue::ObjectId(oid),
            Bson::DateTime(dt) => DocValue::DateTime(dt),
            other => DocValue::Extended(other.into_relaxed_extjson()),
        }
    }
}

impl From<Document> for DocValue {
    fn from(doc: Document) -> Self {
        DocValue::Document(document_fields(doc))
    }
}

impl From<Value> for DocValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocValue::Null,
            Value::Bool(b) => DocValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DocValue::Int(i),
                None => n.as_f64().map(DocValue::Double).unwrap_or(DocValue::Null),
            },
            Value::String(s) => DocValue::String(s),
            Value::Array(items) => DocValue::Array(items.into_iter().map(DocValue::from).collect()),
            Value::Object(map) => {
                DocValue::Document(map.into_iter().map(|(k, v)| (k, DocValue::from(v))).collect())
            }
        }
    }
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        DocValue::String(s.to_string())
    }
}

impl From<bool> for DocValue {
    fn from(b: bool) -> Self {
        DocValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, Regex};

    #[test]
    fn test_from_bson_document_keeps_field_order() {
        let doc = doc! { "z": 1, "a": "two", "m": true };
        let fields = document_fields(doc);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(fields[0].1, DocValue::Int(1));
    }

    #[test]
    fn test_from_bson_nested_values() {
        let oid = ObjectId::new();
        let value = DocValue::from(Bson::Document(doc! {
            "_id": oid,
            "tags": ["ai", 3_i64],
            "missing": Bson::Undefined,
        }));

        let expected = DocValue::document([
            ("_id", DocValue::ObjectId(oid)),
            (
                "tags",
                DocValue::Array(vec![DocValue::from("ai"), DocValue::Int(3)]),
            ),
            ("missing", DocValue::Null),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_from_bson_regex_is_extended_json() {
        let value = DocValue::from(Bson::RegularExpression(Regex {
            pattern: "^hack".to_string(),
            options: "i".to_string(),
        }));
        match value {
            DocValue::Extended(json) => assert!(json.get("$regularExpression").is_some()),
            other => panic!("expected extended json, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(DocValue::from(serde_json::json!(42)), DocValue::Int(42));
        assert_eq!(DocValue::from(serde_json::json!(2.5)), DocValue::Double(2.5));
    }
}
