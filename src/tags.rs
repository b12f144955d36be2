//! Custom tag normalization: `[{tag, value}]` → ordered `tag → value` map.
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::records::RawTag;

pub const CUSTOM_SETTER: &str = "custom_setter";
pub const CUSTOM_GETTER: &str = "custom_getter";
pub const CUSTOM_MEMBEROF: &str = "custom_memberof";
pub const CUSTOM_SCOPE: &str = "custom_scope";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Flag(bool),
    Text(String),
}

pub type TagMap = IndexMap<String, TagValue>;

impl TagValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            TagValue::Flag(_) => None,
        }
    }
}

impl From<Option<&Value>> for TagValue {
    fn from(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => TagValue::Flag(true),
            Some(Value::Bool(b)) => TagValue::Flag(*b),
            Some(Value::String(s)) => TagValue::Text(s.clone()),
            Some(other) => TagValue::Text(other.to_string()),
        }
    }
}

/// Later duplicates overwrite earlier ones; nameless entries are skipped.
pub fn normalize(tags: Option<&[RawTag]>) -> TagMap {
    let mut out = TagMap::new();
    for tag in tags.unwrap_or_default() {
        let Some(name) = tag.tag.as_ref() else { continue };
        out.insert(name.clone(), TagValue::from(tag.value.as_ref()));
    }
    out
}
