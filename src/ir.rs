// Normalized items: one per raw record after classification. No serde_json::Value here.
//
// Field names are serialized exactly as downstream templates read them.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemType {
    Class,
    Constructor,
    Function,
    Setter,
    Getter,
    Constant,
    Enum,
    Property(String),        // generic member re-typed with its declared type name
    Other(String),           // kind we don't classify; never claimed by the assembler
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Static,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ItemType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,     // class only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_of: Option<String>,        // None → module level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<Vec<String>>,     // callables only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Param>>,       // callables only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub description: String,
    pub optional: bool,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PropertyType,
    pub description: String,
}

/// Enums and global objects flatten their property types to one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyType {
    Single(String),
    Names(Vec<String>),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::Class => "class",
            ItemType::Constructor => "constructor",
            ItemType::Function => "function",
            ItemType::Setter => "setter",
            ItemType::Getter => "getter",
            ItemType::Constant => "constant",
            ItemType::Enum => "enum",
            ItemType::Property(name) | ItemType::Other(name) => name,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            ItemType::Constructor | ItemType::Function | ItemType::Setter | ItemType::Getter
        )
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Scope {
    /// Only `static` and `instance` are bucketable scopes.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "static" => Some(Scope::Static),
            "instance" => Some(Scope::Instance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_serializes_with_contract_names() {
        let item = Item {
            name: "add".into(),
            ty: ItemType::Function,
            description: String::new(),
            category: None,
            examples: vec![],
            extends: None,
            member_of: Some("Vec2".into()),
            scope: Some(Scope::Instance),
            returns: Some(vec!["void".into()]),
            params: Some(vec![]),
            properties: None,
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "name": "add",
                "type": "function",
                "description": "",
                "examples": [],
                "memberOf": "Vec2",
                "scope": "instance",
                "returns": ["void"],
                "params": [],
            })
        );
    }

    #[test]
    fn property_type_is_a_plain_string() {
        assert_eq!(serde_json::to_value(ItemType::Property("number".into())).unwrap(), json!("number"));
        assert_eq!(serde_json::to_value(PropertyType::Single("Number".into())).unwrap(), json!("Number"));
    }

    #[test]
    fn scope_parse_rejects_other_scopes() {
        assert_eq!(Scope::parse("static"), Some(Scope::Static));
        assert_eq!(Scope::parse("inner"), None);
    }
}
