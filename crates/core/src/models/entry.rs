use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A loosely typed scalar as it appears in solver exports.
///
/// The CSV-to-JSON conversion upstream emits semesters, capacities and
/// counts as integers, floats or strings depending on the column, so the
/// value is kept discriminated instead of being coerced early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Integer view of the scalar, if it has one.
    ///
    /// Floats with no fractional part count as integers; text is parsed
    /// after trimming.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(value) => Some(*value),
            Scalar::Float(value) if value.fract() == 0.0 => Some(*value as i64),
            Scalar::Float(_) => None,
            Scalar::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(value) => Some(*value as f64),
            Scalar::Float(value) => Some(*value),
            Scalar::Text(text) => text.trim().parse().ok(),
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| number.as_f64().map(Scalar::Float)),
            Value::String(text) if !text.trim().is_empty() => Some(Scalar::Text(text)),
            Value::Bool(flag) => Some(Scalar::Text(flag.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{}", value),
            Scalar::Float(value) if value.fract() == 0.0 => write!(f, "{}", *value as i64),
            Scalar::Float(value) => write!(f, "{}", value),
            Scalar::Text(text) => f.write_str(text),
        }
    }
}

/// One schedule row as exported by the solver, before normalization.
///
/// Lab and theory exports carry different subsets of these fields, and any
/// of them may be missing, null, empty, or a number where text is expected.
/// Deserialization never fails on a single field: unusable values become
/// `None` and the normalizer applies the display fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub course_code: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub course_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub department: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub semester: Option<Scalar>,
    #[serde(deserialize_with = "lenient_text")]
    pub group_name: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub group_index: Option<Scalar>,
    #[serde(deserialize_with = "lenient_text")]
    pub teacher_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub teacher_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub staff_code: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub room_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub room_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub block: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub day: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub time_slot: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub time_range: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub session_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub schedule_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub session_type: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub session_number: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub slot_index: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub capacity: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub student_count: Option<Scalar>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub total_students: Option<Scalar>,
    #[serde(deserialize_with = "lenient_text")]
    pub day_pattern: Option<String>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_batched: Option<bool>,
}

/// Decodes the rows of an export. Elements that are not objects are skipped.
pub fn object_rows(items: Vec<Value>) -> Vec<RawEntry> {
    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// An entry list that is absent or not an array is empty.
pub(crate) fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<RawEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => object_rows(items),
        _ => Vec::new(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(Scalar::from_value))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_in_text_fields_become_text() {
        let entry: RawEntry = serde_json::from_value(json!({
            "room_number": 204,
            "room_id": 17,
            "course_code": "",
        }))
        .unwrap();

        assert_eq!(entry.room_number.as_deref(), Some("204"));
        assert_eq!(entry.room_id.as_deref(), Some("17"));
        assert_eq!(entry.course_code, None);
    }

    #[test]
    fn unusable_scalars_are_dropped_not_rejected() {
        let entry: RawEntry = serde_json::from_value(json!({
            "semester": [3],
            "capacity": null,
            "student_count": "  ",
            "is_batched": "maybe",
        }))
        .unwrap();

        assert_eq!(entry.semester, None);
        assert_eq!(entry.capacity, None);
        assert_eq!(entry.student_count, None);
        assert_eq!(entry.is_batched, None);
    }

    #[test]
    fn non_object_rows_are_skipped() {
        let rows = object_rows(vec![
            json!({ "course_code": "CS101" }),
            json!(null),
            json!("CS102"),
            json!([1, 2]),
            json!({}),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].course_code.as_deref(), Some("CS101"));
        assert_eq!(rows[1], RawEntry::default());
    }

    #[test]
    fn float_scalars_render_without_trailing_zero() {
        assert_eq!(Scalar::Float(5.0).to_string(), "5");
        assert_eq!(Scalar::Float(5.5).to_string(), "5.5");
        assert_eq!(Scalar::Text("S4".into()).as_i64(), None);
        assert_eq!(Scalar::Text(" 4 ".into()).as_i64(), Some(4));
    }
}
