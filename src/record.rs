use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to parse records: {0}")]
    Parse(#[from] json5::Error),
}

/// Flat input row of the chart. Ids may be given as numbers or strings and are
/// normalized to strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_parent_id")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_position")]
    pub position: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Remaining display attributes, carried through untouched.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        parent_id: Option<&str>,
        position: i64,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            position,
            title: title.into(),
            description: String::new(),
            kind: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

/// Parses a JSON (or JSON5) array of records.
pub fn parse_records(input: &str) -> Result<Vec<Record>, RecordError> {
    let records: Vec<Record> = json5::from_str(input)?;
    Ok(records)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Int(value) => value.to_string(),
            RawId::Float(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                (value as i64).to_string()
            }
            RawId::Float(value) => value.to_string(),
            RawId::Text(value) => value,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Int(i64),
    Float(f64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

fn deserialize_parent_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string))
}

fn deserialize_position<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawPosition::deserialize(deserializer)? {
        RawPosition::Int(value) => Ok(value),
        RawPosition::Float(value)
            if value.fract() == 0.0 && value.abs() < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        RawPosition::Float(value) => Err(D::Error::custom(format!(
            "position must be an integer, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_string_ids() {
        let input = r#"[
            { id: 1, parent_id: null, position: 0, title: "CEO", type: "strategy" },
            { "id": "2", "parent_id": 1, "position": 1, "title": "CTO", "team": "platform" },
        ]"#;
        let records = parse_records(input).expect("records should parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].parent_id, None);
        assert_eq!(records[0].kind, "strategy");
        assert_eq!(records[1].parent_id.as_deref(), Some("1"));
        assert_eq!(records[1].position, 1);
        assert_eq!(
            records[1].attributes.get("team").and_then(|v| v.as_str()),
            Some("platform")
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let records = parse_records(r#"[{ "id": "solo" }]"#).expect("records should parse");
        assert_eq!(records[0].parent_id, None);
        assert_eq!(records[0].position, 0);
        assert!(records[0].title.is_empty());
    }

    #[test]
    fn integral_float_positions_are_accepted() {
        let records = parse_records(r#"[{ id: "a", position: 2.0 }]"#).unwrap();
        assert_eq!(records[0].position, 2);
    }

    #[test]
    fn fractional_positions_are_rejected() {
        let err = parse_records(r#"[{ id: "a", position: 1.5 }]"#).unwrap_err();
        assert!(err.to_string().contains("position must be an integer"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_records("[{ id: }]").is_err());
    }
}
