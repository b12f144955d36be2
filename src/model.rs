//! Output model: package → module → class tree.
//!
//! Field names are what the overview and downstream templates read; keep them stable.
use serde::Serialize;
use serde_json::Value;

use crate::ir::{Item, Scope};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageModel {
    pub name: String,
    pub version: String,
    /// Opaque provenance copied from the manifest.
    pub repository: Value,
    pub modules: Vec<ModuleModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleModel {
    pub path: String,
    pub classes: Vec<ClassEntry>,
    pub constants: Vec<Item>,
    pub enums: Vec<Item>,
    pub functions: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassEntry {
    pub name: String,
    pub description: String,
    pub extends: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub examples: Vec<String>,
    pub constructor: Option<Item>,
    pub properties: Scoped<Item>,
    pub methods: Scoped<Item>,
}

/// Static/instance buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scoped<T> {
    #[serde(rename = "static")]
    pub static_: Vec<T>,
    pub instance: Vec<T>,
}

impl<T> Default for Scoped<T> {
    fn default() -> Self {
        Self { static_: Vec::new(), instance: Vec::new() }
    }
}

impl<T> Scoped<T> {
    pub fn push(&mut self, scope: Scope, value: T) {
        match scope {
            Scope::Static => self.static_.push(value),
            Scope::Instance => self.instance.push(value),
        }
    }

    pub fn len(&self) -> usize {
        self.static_.len() + self.instance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClassEntry {
    /// Fresh entry from a class item: no constructor, empty buckets.
    pub fn from_item(item: Item) -> Self {
        Self {
            name: item.name,
            description: item.description,
            extends: item.extends.unwrap_or_default(),
            category: item.category,
            examples: item.examples,
            constructor: None,
            properties: Scoped::default(),
            methods: Scoped::default(),
        }
    }

    /// Number of members attached to this class, constructor included.
    pub fn member_count(&self) -> usize {
        usize::from(self.constructor.is_some()) + self.properties.len() + self.methods.len()
    }
}

impl ModuleModel {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            classes: Vec::new(),
            constants: Vec::new(),
            enums: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn global_count(&self) -> usize {
        self.constants.len() + self.enums.len() + self.functions.len()
    }
}
