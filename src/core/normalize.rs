//! Conversion of source documents into plain JSON.

use crate::domain::model::Record;
use crate::domain::value::{DocValue, Fields};
use chrono::{DateTime, Utc};
use mongodb::bson;
use serde_json::{Map, Number, Value};

/// Converts a document value into plain JSON. Never fails: values with no
/// JSON equivalent (non-finite doubles) become `null`.
pub fn normalize(value: &DocValue) -> Value {
    match value {
        DocValue::Null => Value::Null,
        DocValue::Bool(b) => Value::Bool(*b),
        DocValue::Int(n) => Value::Number((*n).into()),
        DocValue::Double(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        DocValue::String(s) => Value::String(s.clone()),
        DocValue::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        DocValue::Document(fields) => Value::Object(normalize_fields(fields)),
        DocValue::ObjectId(oid) => Value::String(oid.to_hex()),
        DocValue::DateTime(dt) => Value::String(format_datetime(*dt)),
        DocValue::Extended(json) => json.clone(),
    }
}

pub fn normalize_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), normalize(value)))
        .collect()
}

pub fn normalize_record(fields: &Fields) -> Record {
    Record::new(normalize_fields(fields))
}

/// ISO-8601 without an offset suffix; microseconds only when non-zero.
pub fn format_datetime(dt: bson::DateTime) -> String {
    match DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()) {
        Some(ts) if ts.timestamp_subsec_nanos() == 0 => ts.format("%Y-%m-%dT%H:%M:%S").to_string(),
        Some(ts) => ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        None => dt.to_string(),
    }
}

/// The `last_updated` stamp shared by every view of one run.
pub fn generation_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    fn sample() -> DocValue {
        DocValue::document([
            (
                "_id",
                DocValue::ObjectId(ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap()),
            ),
            ("name", DocValue::from("Hack the Planet")),
            (
                "start",
                DocValue::DateTime(bson::DateTime::from_millis(1_704_067_200_000)),
            ),
            (
                "sessions",
                DocValue::Array(vec![DocValue::document([
                    ("room", DocValue::Int(4)),
                    (
                        "at",
                        DocValue::DateTime(bson::DateTime::from_millis(1_704_067_200_250)),
                    ),
                ])]),
            ),
            ("score", DocValue::Double(f64::NAN)),
        ])
    }

    #[test]
    fn test_normalize_converts_driver_types() {
        let value = normalize(&sample());
        assert_eq!(
            value,
            json!({
                "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
                "name": "Hack the Planet",
                "start": "2024-01-01T00:00:00",
                "sessions": [{ "room": 4, "at": "2024-01-01T00:00:00.250000" }],
                "score": null
            })
        );
    }

    #[test]
    fn test_normalize_keeps_field_order() {
        let value = normalize(&sample());
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["_id", "name", "start", "sessions", "score"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&sample());
        let twice = normalize(&DocValue::from(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(normalize(&DocValue::Null), Value::Null);
        assert_eq!(normalize(&DocValue::Bool(false)), json!(false));
        assert_eq!(normalize(&DocValue::Double(1.5)), json!(1.5));
        assert_eq!(normalize(&DocValue::from("東京")), json!("東京"));
    }

    #[test]
    fn test_out_of_range_datetime_does_not_fail() {
        let value = normalize(&DocValue::DateTime(bson::DateTime::MAX));
        assert!(value.is_string());
    }

    #[test]
    fn test_generation_timestamp_has_trailing_z() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 18, 5, 0).unwrap();
        assert_eq!(generation_timestamp(now), "2024-03-09T18:05:00.000000Z");
    }
}
