//! Raw documentation records as emitted by the comment extractor.
//!
//! Extractor output is only loosely shaped, so every field goes through
//! [`lenient`]: a value of the wrong JSON shape reads as absent instead of
//! failing the whole record. The original JSON of each record is kept around
//! for diagnostics.
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub memberof: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub scope: Option<String>,
    #[serde(default, rename = "customTags", deserialize_with = "lenient")]
    pub custom_tags: Option<Vec<RawTag>>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub type_: Option<RawType>,
    #[serde(default, deserialize_with = "lenient")]
    pub params: Option<Vec<RawParam>>,
    #[serde(default, deserialize_with = "lenient")]
    pub returns: Option<Vec<RawReturn>>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<Vec<RawProperty>>,
    #[serde(default, rename = "isEnum", deserialize_with = "lenient")]
    pub is_enum: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub examples: Option<Vec<String>>,
    /// Declared parents. jsdoc calls these `augments`.
    #[serde(default, alias = "extends", deserialize_with = "lenient")]
    pub augments: Option<Vec<String>>,

    #[serde(skip)]
    pub raw: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTag {
    #[serde(default, deserialize_with = "lenient")]
    pub tag: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawType {
    #[serde(default, deserialize_with = "lenient")]
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParam {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub optional: Option<bool>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub type_: Option<RawType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReturn {
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub type_: Option<RawType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperty {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub type_: Option<RawType>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl RawRecord {
    /// Never fails: anything that is not an object becomes an empty record
    /// that still carries its raw JSON.
    pub fn from_value(value: Value) -> Self {
        let mut record = serde_json::from_value::<RawRecord>(value.clone()).unwrap_or_default();
        record.raw = value;
        record
    }

    pub fn type_names(&self) -> &[String] {
        names_of(self.type_.as_ref())
    }

    pub fn first_type_name(&self) -> Option<&str> {
        self.type_names().first().map(String::as_str)
    }
}

impl RawParam {
    pub fn type_names(&self) -> &[String] {
        names_of(self.type_.as_ref())
    }
}

impl RawReturn {
    pub fn first_type_name(&self) -> Option<&str> {
        names_of(self.type_.as_ref()).first().map(String::as_str)
    }
}

impl RawProperty {
    pub fn type_names(&self) -> &[String] {
        names_of(self.type_.as_ref())
    }
}

fn names_of(ty: Option<&RawType>) -> &[String] {
    ty.and_then(|t| t.names.as_deref()).unwrap_or(&[])
}

/// Split one extractor output into records. An array yields one record per
/// element; any other JSON value is a single record.
pub fn records_from_value(value: Value) -> Vec<RawRecord> {
    match value {
        Value::Array(xs) => xs.into_iter().map(RawRecord::from_value).collect(),
        other => vec![RawRecord::from_value(other)],
    }
}

/// Parse the raw text of an extractor run. Only non-JSON text is an error.
pub fn parse_stream(src: &str) -> Result<Vec<RawRecord>, String> {
    let value = crate::path_de::from_str_with_path::<Value>(src)?;
    Ok(records_from_value(value))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).ok())
}
