//! Record classification: one raw record → one normalized [`Item`].
//!
//! Resolution precedence:
//! 1. `class` records keep their parent list.
//! 2. ES5 accessors (`custom_setter` / `custom_getter` tags) are redirected:
//!    the record's owner becomes the item name and `custom_memberof` the owner.
//! 3. Module-level constants split into enums, global objects and primitives.
//! 4. Module-level functions.
//! 5. Owned members pass their kind through.
//! 6. Generic members are re-typed with their declared type name.
//!
//! Classification never fails; missing pieces fall back to empty defaults.
use crate::ir::{Item, ItemType, Param, Property, PropertyType, Scope};
use crate::records::{RawProperty, RawRecord};
use crate::tags::{self, TagMap, CUSTOM_GETTER, CUSTOM_MEMBEROF, CUSTOM_SCOPE, CUSTOM_SETTER};

// ------------------------------- Policy ---------------------------------- //

/// Return type of callables that declare none.
pub const DEFAULT_RETURN: &str = "void";

/// Type name used when a record declares no type at all.
pub const ANY_TYPE: &str = "*";

const KIND_CLASS: &str = "class";
const KIND_CONSTRUCTOR: &str = "constructor";
const KIND_FUNCTION: &str = "function";
const KIND_CONSTANT: &str = "constant";
const KIND_MEMBER: &str = "member";

// ------------------------------- Front API -------------------------------- //

pub fn classify(record: &RawRecord) -> Item {
    let tags = tags::normalize(record.custom_tags.as_deref());
    classify_with_tags(record, &tags)
}

pub fn classify_with_tags(record: &RawRecord, tags: &TagMap) -> Item {
    let kind = record.kind.as_deref().unwrap_or_default();
    let mut item = Item {
        name: record.name.clone().unwrap_or_default(),
        ty: ItemType::Other(kind.to_string()),
        description: record.description.clone().unwrap_or_default(),
        category: record.category.clone(),
        examples: record.examples.clone().unwrap_or_default(),
        extends: None,
        member_of: None,
        scope: None,
        returns: None,
        params: None,
        properties: None,
    };

    // 1) classes
    if kind == KIND_CLASS {
        item.ty = ItemType::Class;
        item.extends = Some(record.augments.clone().unwrap_or_default());
        return item;
    }

    if let Some(accessor) = accessor_type(tags) {
        // 2) ES5 accessor redirection
        if let Some(owner) = &record.memberof {
            item.name = owner.clone();
        }
        item.ty = accessor;
        item.member_of = tags.get(CUSTOM_MEMBEROF).and_then(|v| v.as_text()).map(str::to_owned);
        let scope = tags
            .get(CUSTOM_SCOPE)
            .and_then(|v| v.as_text())
            .or(record.scope.as_deref());
        item.scope = scope.and_then(Scope::parse);
    } else {
        match (&record.memberof, kind) {
            // 3) module-level constants
            (None, KIND_CONSTANT) => classify_global_constant(record, &mut item),
            // 4) module-level functions
            (None, KIND_FUNCTION) => item.ty = ItemType::Function,
            // 5) owned members
            (owner, _) => {
                item.member_of = owner.clone();
                item.ty = member_type(record, kind);
            }
        }
        item.scope = record.scope.as_deref().and_then(Scope::parse);
    }

    // module-level primitives carry no properties
    let global_constant = item.ty == ItemType::Constant && item.member_of.is_none();
    if item.properties.is_none() && !global_constant {
        item.properties = record.properties.as_deref().map(listed_properties);
    }

    if item.ty.is_callable() {
        item.returns = Some(resolve_returns(record, &item));
        item.params = Some(resolve_params(record));
    }

    item
}

// ------------------------------ Resolution -------------------------------- //

fn accessor_type(tags: &TagMap) -> Option<ItemType> {
    if tags.contains_key(CUSTOM_SETTER) {
        Some(ItemType::Setter)
    } else if tags.contains_key(CUSTOM_GETTER) {
        Some(ItemType::Getter)
    } else {
        None
    }
}

fn classify_global_constant(record: &RawRecord, item: &mut Item) {
    let props = record.properties.as_deref().unwrap_or_default();
    if record.is_enum.unwrap_or(false) {
        item.ty = ItemType::Enum;
        item.properties = Some(flattened_properties(props));
    } else if record.first_type_name().is_some_and(|t| t.eq_ignore_ascii_case("object")) {
        // global object: stays a constant, keeps its fields
        item.ty = ItemType::Constant;
        item.properties = Some(flattened_properties(props));
    } else {
        item.ty = ItemType::Constant;
    }
}

/// Kind pass-through for records that are not module-level constants/functions.
/// Generic members are re-typed with their own declared type.
fn member_type(record: &RawRecord, kind: &str) -> ItemType {
    match kind {
        KIND_CONSTRUCTOR => ItemType::Constructor,
        KIND_FUNCTION => ItemType::Function,
        KIND_CONSTANT => ItemType::Constant,
        KIND_MEMBER => ItemType::Property(record.first_type_name().unwrap_or(ANY_TYPE).to_string()),
        other => ItemType::Other(other.to_string()),
    }
}

fn resolve_returns(record: &RawRecord, item: &Item) -> Vec<String> {
    let declared: Vec<String> = record
        .returns
        .iter()
        .flatten()
        .filter_map(|r| r.first_type_name())
        .map(str::to_owned)
        .collect();
    if !declared.is_empty() {
        return declared;
    }
    match item.ty {
        // a constructor returns an instance of its own class
        ItemType::Constructor => vec![item.member_of.clone().unwrap_or_else(|| item.name.clone())],
        _ => vec![DEFAULT_RETURN.to_string()],
    }
}

fn resolve_params(record: &RawRecord) -> Vec<Param> {
    record
        .params
        .iter()
        .flatten()
        .map(|p| Param {
            name: p.name.clone().unwrap_or_default(),
            description: p.description.clone().unwrap_or_default(),
            optional: p.optional.unwrap_or(false),
            types: p.type_names().to_vec(),
        })
        .collect()
}

fn listed_properties(props: &[RawProperty]) -> Vec<Property> {
    props
        .iter()
        .map(|p| property(p, PropertyType::Names(p.type_names().to_vec())))
        .collect()
}

fn flattened_properties(props: &[RawProperty]) -> Vec<Property> {
    props
        .iter()
        .map(|p| {
            let first = p.type_names().first().map(String::as_str).unwrap_or(ANY_TYPE);
            property(p, PropertyType::Single(first.to_string()))
        })
        .collect()
}

fn property(p: &RawProperty, ty: PropertyType) -> Property {
    Property {
        name: p.name.clone().unwrap_or_default(),
        ty,
        description: p.description.clone().unwrap_or_default(),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn classify_json(value: Value) -> Item {
        classify(&RawRecord::from_value(value))
    }

    #[test]
    fn class_copies_parents() {
        let item = classify_json(json!({"kind": "class", "name": "Vec3", "augments": ["Vec2"]}));
        assert_eq!(item.ty, ItemType::Class);
        assert_eq!(item.extends, Some(vec!["Vec2".to_string()]));
        assert!(item.member_of.is_none());
    }

    #[test]
    fn class_without_parents_has_empty_extends() {
        let item = classify_json(json!({"kind": "class", "name": "Vec2"}));
        assert_eq!(item.extends, Some(vec![]));
        assert_eq!(item.description, "");
        assert!(item.examples.is_empty());
    }

    #[test]
    fn setter_is_redirected_to_owner() {
        let item = classify_json(json!({
            "kind": "function",
            "name": "setX",
            "memberof": "x",
            "scope": "instance",
            "customTags": [
                {"tag": "custom_setter"},
                {"tag": "custom_memberof", "value": "Vec2"},
            ],
        }));
        assert_eq!(item.ty, ItemType::Setter);
        assert_eq!(item.name, "x");
        assert_eq!(item.member_of.as_deref(), Some("Vec2"));
        assert_eq!(item.scope, Some(Scope::Instance));
        assert_eq!(item.returns, Some(vec!["void".to_string()]));
    }

    #[test]
    fn getter_scope_comes_from_custom_scope() {
        let item = classify_json(json!({
            "kind": "function",
            "name": "getZero",
            "memberof": "ZERO",
            "scope": "instance",
            "customTags": [
                {"tag": "custom_getter"},
                {"tag": "custom_memberof", "value": "Vec2"},
                {"tag": "custom_scope", "value": "static"},
            ],
            "returns": [{"type": {"names": ["Vec2"]}}],
        }));
        assert_eq!(item.ty, ItemType::Getter);
        assert_eq!(item.name, "ZERO");
        assert_eq!(item.scope, Some(Scope::Static));
        assert_eq!(item.returns, Some(vec!["Vec2".to_string()]));
    }

    #[test]
    fn setter_wins_over_getter() {
        let item = classify_json(json!({
            "kind": "function",
            "customTags": [{"tag": "custom_getter"}, {"tag": "custom_setter"}],
        }));
        assert_eq!(item.ty, ItemType::Setter);
    }

    #[test]
    fn enum_properties_are_flattened() {
        let item = classify_json(json!({
            "kind": "constant",
            "name": "Mode",
            "isEnum": true,
            "properties": [{"name": "A", "type": {"names": ["Number"]}}],
        }));
        assert_eq!(item.ty, ItemType::Enum);
        let props = item.properties.unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].ty, PropertyType::Single("Number".into()));
        assert_eq!(props[0].description, "");
    }

    #[test]
    fn global_object_keeps_flattened_properties() {
        let item = classify_json(json!({
            "kind": "constant",
            "name": "Defaults",
            "type": {"names": ["Object"]},
            "properties": [
                {"name": "width", "type": {"names": ["Number", "String"]}},
                {"name": "anything"},
            ],
        }));
        assert_eq!(item.ty, ItemType::Constant);
        let props = item.properties.unwrap();
        assert_eq!(props[0].ty, PropertyType::Single("Number".into()));
        assert_eq!(props[1].ty, PropertyType::Single(ANY_TYPE.into()));
    }

    #[test]
    fn primitive_constant_drops_properties() {
        let item = classify_json(json!({
            "kind": "constant",
            "name": "EPS",
            "type": {"names": ["Number"]},
            "properties": [{"name": "ignored"}],
        }));
        assert_eq!(item.ty, ItemType::Constant);
        assert!(item.properties.is_none());
        assert!(item.returns.is_none());
    }

    #[test]
    fn global_function_defaults_to_void() {
        let item = classify_json(json!({"kind": "function", "name": "lerp"}));
        assert_eq!(item.ty, ItemType::Function);
        assert_eq!(item.returns, Some(vec!["void".to_string()]));
        assert_eq!(item.params, Some(vec![]));
        assert!(item.member_of.is_none());
    }

    #[test]
    fn constructor_returns_its_class() {
        let item = classify_json(json!({
            "kind": "constructor",
            "name": "Vec2",
            "memberof": "Vec2",
            "scope": "instance",
        }));
        assert_eq!(item.ty, ItemType::Constructor);
        assert_eq!(item.returns, Some(vec!["Vec2".to_string()]));
    }

    #[test]
    fn declared_returns_keep_first_name_each() {
        let item = classify_json(json!({
            "kind": "function",
            "name": "parse",
            "returns": [
                {"type": {"names": ["Number", "null"]}},
                {"type": {"names": ["String"]}},
                {"description": "untyped"},
            ],
        }));
        assert_eq!(item.returns, Some(vec!["Number".to_string(), "String".to_string()]));
    }

    #[test]
    fn params_are_defaulted() {
        let item = classify_json(json!({
            "kind": "function",
            "name": "scale",
            "memberof": "Vec2",
            "scope": "static",
            "params": [
                {"name": "v", "type": {"names": ["Vec2"]}, "description": "vector"},
                {"name": "s", "optional": true},
            ],
        }));
        let params = item.params.unwrap();
        assert_eq!(params[0], Param {
            name: "v".into(),
            description: "vector".into(),
            optional: false,
            types: vec!["Vec2".into()],
        });
        assert!(params[1].optional);
        assert!(params[1].types.is_empty());
        assert_eq!(item.scope, Some(Scope::Static));
    }

    #[test]
    fn member_is_retyped_with_declared_type() {
        let item = classify_json(json!({
            "kind": "member",
            "name": "x",
            "memberof": "Vec2",
            "scope": "instance",
            "type": {"names": ["number"]},
        }));
        assert_eq!(item.ty, ItemType::Property("number".into()));
        assert!(item.returns.is_none());
    }

    #[test]
    fn member_without_type_falls_back_to_any() {
        let item = classify_json(json!({"kind": "member", "name": "x", "memberof": "Vec2"}));
        assert_eq!(item.ty, ItemType::Property(ANY_TYPE.into()));
    }

    #[test]
    fn owned_member_properties_are_lists() {
        let item = classify_json(json!({
            "kind": "member",
            "name": "opts",
            "memberof": "App",
            "scope": "instance",
            "type": {"names": ["Object"]},
            "properties": [{"name": "fps", "type": {"names": ["Number"]}}],
        }));
        let props = item.properties.unwrap();
        assert_eq!(props[0].ty, PropertyType::Names(vec!["Number".into()]));
    }

    #[test]
    fn unexpected_scope_is_dropped() {
        let item = classify_json(json!({"kind": "function", "name": "f", "memberof": "A", "scope": "inner"}));
        assert!(item.scope.is_none());
    }

    #[test]
    fn garbage_never_panics() {
        let item = classify_json(json!([1, 2, 3]));
        assert_eq!(item.ty, ItemType::Other(String::new()));
        assert_eq!(item.name, "");
    }
}
