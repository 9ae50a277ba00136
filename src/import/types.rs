use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar value carried in an import record's property bag.
///
/// Extra CSV columns always land here as `Text`; JSON input keeps whatever
/// scalar type it decoded to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<PropertyValue> for serde_json::Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Null => serde_json::Value::Null,
            PropertyValue::Bool(b) => serde_json::Value::Bool(b),
            // NaN/inf cannot be represented in JSON
            PropertyValue::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            PropertyValue::Text(s) => serde_json::Value::String(s),
        }
    }
}

/// One normalized object to be created in the inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl ImportRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Source format of an import batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::Csv => "csv",
            ImportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed result of one import attempt.
///
/// CSV batches only contain rows that passed validation; rejected rows show up
/// in `errors` instead. JSON batches keep every decoded element, including
/// invalid ones, and pair each invalid element with an `errors` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub records: Vec<ImportRecord>,
    pub format: ImportFormat,
    pub errors: Vec<String>,
}

impl ImportBatch {
    pub fn new(format: ImportFormat) -> Self {
        Self {
            records: Vec::new(),
            format,
            errors: Vec::new(),
        }
    }
}

/// How imported records are placed inside the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// Backend picks containers based on capacity and type
    Automatic,
    /// Every record goes into the container the wizard was opened from
    Target,
}

impl DistributionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionMode::Automatic => "automatic",
            DistributionMode::Target => "target",
        }
    }
}

impl fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_decodes_with_missing_and_null_fields() {
        let record: ImportRecord =
            serde_json::from_str(r#"{"name": null, "tags": null, "extra": 1}"#).unwrap();

        assert_eq!(record, ImportRecord::default());
    }

    #[test]
    fn test_property_values_keep_json_scalar_types() {
        let record: ImportRecord = serde_json::from_str(
            r#"{"name": "Lamp", "properties": {"watts": 40, "dimmable": true, "color": "red", "serial": null}}"#,
        )
        .unwrap();

        assert_eq!(record.properties["watts"], PropertyValue::Number(40.0));
        assert_eq!(record.properties["dimmable"], PropertyValue::Bool(true));
        assert_eq!(record.properties["color"], PropertyValue::from("red"));
        assert_eq!(record.properties["serial"], PropertyValue::Null);
    }

    #[test]
    fn test_nested_property_values_are_rejected() {
        let result: Result<ImportRecord, _> =
            serde_json::from_str(r#"{"name": "Lamp", "properties": {"sizes": [1, 2]}}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_distribution_mode_wire_names() {
        assert_eq!(DistributionMode::Automatic.to_string(), "automatic");
        assert_eq!(
            serde_json::to_string(&DistributionMode::Target).unwrap(),
            "\"target\""
        );
    }
}
