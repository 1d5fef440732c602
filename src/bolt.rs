// Copyright 2026 Cowboy AI, LLC.

//! Conversion from loosely-typed JSON records to Bolt parameters

use std::collections::HashMap;

use neo4rs::{BoltNull, BoltType};
use serde_json::Value;

/// Bolt null value
pub fn bolt_null() -> BoltType {
    BoltType::Null(BoltNull {})
}

/// Convert a JSON object to a Bolt parameter map
pub fn json_object_to_bolt_map(obj: &serde_json::Map<String, Value>) -> HashMap<String, BoltType> {
    obj.iter()
        .map(|(k, v)| (k.clone(), json_to_bolt(v)))
        .collect()
}

/// Convert a JSON value to its Bolt parameter equivalent
///
/// Arrays and objects convert element-wise. Bolt integers are signed
/// 64-bit, so unsigned values beyond `i64::MAX` are carried as strings
/// rather than truncated.
pub fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => bolt_null(),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if n.is_u64() {
                n.to_string().into()
            } else if let Some(f) = n.as_f64() {
                f.into()
            } else {
                n.to_string().into()
            }
        }
        Value::String(s) => s.clone().into(),
        Value::Array(items) => items.iter().map(json_to_bolt).collect::<Vec<_>>().into(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), json_to_bolt(v)))
            .collect::<HashMap<String, BoltType>>()
            .into(),
    }
}
