use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value, json};

const SENTIMENT_KEYS: &[&str] = &["sentiment", "label", "duygu"];
const CONFIDENCE_KEYS: &[&str] = &["confidence", "score", "güven"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Structured {
        sentiment: String,
        confidence: f64,
        raw_result: Value,
    },
    Opaque {
        result: Value,
        raw_result: Value,
    },
}

impl AnalysisResult {
    /// Normalizes the first output value of a completed job.
    pub fn from_output(output: Value) -> Result<Self> {
        match output {
            Value::Object(map) => {
                let unknown = json!("unknown");
                let zero = json!(0);

                let sentiment = match first_of(&map, SENTIMENT_KEYS, &unknown) {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let confidence = to_f64(first_of(&map, CONFIDENCE_KEYS, &zero))?;

                Ok(Self::Structured {
                    sentiment,
                    confidence,
                    raw_result: Value::Object(map),
                })
            }
            other => Ok(Self::Opaque {
                result: other.clone(),
                raw_result: other,
            }),
        }
    }
}

/// Returns the value of the first key in `keys` that holds a meaningful value.
///
/// Null, `false`, `""`, zero and empty collections count as absent.
pub fn first_of<'a>(map: &'a Map<String, Value>, keys: &[&str], default: &'a Value) -> &'a Value {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_present(value))
        .unwrap_or(default)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn to_f64(value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.ok_or_else(|| Error::internal(format!("could not convert confidence {value} to float")))
}
