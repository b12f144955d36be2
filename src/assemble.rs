//! Tree assembly for one module.
//!
//! The classified items are never mutated. Each pass walks the indices that
//! are still unclaimed, takes the ones it owns and hands the remainder to the
//! next pass:
//!
//! 1. extract classes (first record per name wins),
//! 2. associate members with their owning class,
//! 3. bucket module-level constants/enums/functions,
//! 4. report whatever is left as unhandled.
//!
//! Within every bucket items keep the order of the original record stream.
use indexmap::IndexMap;

use crate::classify::classify;
use crate::diagnostics::Diagnostic;
use crate::ir::{Item, ItemType, Scope};
use crate::model::{ClassEntry, ModuleModel};
use crate::records::RawRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub module: ModuleModel,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Constructor,
    Method(Scope),
    Property(Scope),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Constants,
    Enums,
    Functions,
}

// ------------------------------- Front API -------------------------------- //

/// Classify every record of one module and assemble the module tree.
pub fn assemble(path: &str, records: &[RawRecord]) -> Assembly {
    let items: Vec<Item> = records.iter().map(classify).collect();
    assemble_items(path, records, &items)
}

/// `items[i]` must be the classification of `records[i]`.
pub fn assemble_items(path: &str, records: &[RawRecord], items: &[Item]) -> Assembly {
    debug_assert_eq!(records.len(), items.len());
    let mut module = ModuleModel::new(path);
    let mut diagnostics = Vec::new();
    let raw = |i: usize| records.get(i).map(|r| r.raw.clone()).unwrap_or_default();

    // 1) classes
    let (class_indices, remaining): (Vec<usize>, Vec<usize>) =
        (0..items.len()).partition(|&i| items[i].ty == ItemType::Class);
    let mut classes: IndexMap<String, ClassEntry> = IndexMap::new();
    for i in class_indices {
        let item = &items[i];
        if classes.contains_key(&item.name) {
            diagnostics.push(Diagnostic::DuplicateClass {
                module: path.to_string(),
                name: item.name.clone(),
                record: raw(i),
            });
            continue;
        }
        classes.insert(item.name.clone(), ClassEntry::from_item(item.clone()));
    }

    // 2) members, once per known class
    let mut remaining = remaining;
    for class in classes.values_mut() {
        let mut rest = Vec::with_capacity(remaining.len());
        let mut constructor_index = None;
        for i in remaining {
            let item = &items[i];
            let slot = match member_slot(item) {
                Some(slot) if item.member_of.as_deref() == Some(class.name.as_str()) => slot,
                _ => {
                    rest.push(i);
                    continue;
                }
            };
            match slot {
                Slot::Constructor => {
                    if let Some(previous) = constructor_index.replace(i) {
                        diagnostics.push(Diagnostic::ReplacedConstructor {
                            module: path.to_string(),
                            class: class.name.clone(),
                            record: raw(previous),
                        });
                    }
                    class.constructor = Some(item.clone());
                }
                Slot::Method(scope) => class.methods.push(scope, item.clone()),
                Slot::Property(scope) => class.properties.push(scope, item.clone()),
            }
        }
        remaining = rest;
    }
    module.classes = classes.into_values().collect();

    // 3) module-level buckets
    let mut rest = Vec::with_capacity(remaining.len());
    for i in remaining {
        let item = items[i].clone();
        match global_bucket(&item) {
            Some(Bucket::Constants) => module.constants.push(item),
            Some(Bucket::Enums) => module.enums.push(item),
            Some(Bucket::Functions) => module.functions.push(item),
            None => rest.push(i),
        }
    }
    let remaining = rest;

    // 4) leftovers
    for i in remaining {
        diagnostics.push(Diagnostic::Unhandled {
            module: path.to_string(),
            item: items[i].clone(),
            record: raw(i),
        });
    }

    Assembly { module, diagnostics }
}

// ------------------------------- Routing ---------------------------------- //

fn member_slot(item: &Item) -> Option<Slot> {
    match (&item.ty, item.scope) {
        (ItemType::Constructor, _) => Some(Slot::Constructor),
        (ItemType::Function | ItemType::Setter | ItemType::Getter, Some(scope)) => Some(Slot::Method(scope)),
        (ItemType::Constant | ItemType::Property(_), Some(scope)) => Some(Slot::Property(scope)),
        _ => None,
    }
}

fn global_bucket(item: &Item) -> Option<Bucket> {
    if item.member_of.is_some() {
        return None;
    }
    match item.ty {
        ItemType::Constant => Some(Bucket::Constants),
        ItemType::Enum => Some(Bucket::Enums),
        ItemType::Function => Some(Bucket::Functions),
        _ => None,
    }
}

// ------------------------------- Tests ------------------------------------ //
