//! Warning channel for documentation that could not be placed in the tree.
//!
//! Nothing here is fatal: the assembler drops the offending record from the
//! model and hands back a [`Diagnostic`] carrying the record's raw JSON so the
//! gap can be inspected.
use serde::Serialize;
use serde_json::Value;

use crate::ir::Item;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A second class record with an already-seen name.
    DuplicateClass { module: String, name: String, record: Value },
    /// A constructor displaced by a later one for the same class.
    ReplacedConstructor { module: String, class: String, record: Value },
    /// Claimed by neither a class nor a module-level bucket.
    Unhandled { module: String, item: Item, record: Value },
}

impl Diagnostic {
    pub fn module(&self) -> &str {
        match self {
            Diagnostic::DuplicateClass { module, .. }
            | Diagnostic::ReplacedConstructor { module, .. }
            | Diagnostic::Unhandled { module, .. } => module,
        }
    }

    pub fn record(&self) -> &Value {
        match self {
            Diagnostic::DuplicateClass { record, .. }
            | Diagnostic::ReplacedConstructor { record, .. }
            | Diagnostic::Unhandled { record, .. } => record,
        }
    }

    /// Log through `tracing` at warn level.
    pub fn emit(&self) {
        match self {
            Diagnostic::DuplicateClass { module, name, .. } => {
                tracing::warn!(module = %module, class = %name, "duplicate class ignored");
            }
            Diagnostic::ReplacedConstructor { module, class, .. } => {
                tracing::warn!(module = %module, class = %class, "constructor replaced by a later one");
            }
            Diagnostic::Unhandled { module, item, record } => {
                tracing::warn!(
                    module = %module,
                    name = %item.name,
                    ty = %item.ty.as_str(),
                    member_of = item.member_of.as_deref().unwrap_or("-"),
                    record = %record,
                    "unhandled documentation",
                );
            }
        }
    }
}

pub fn emit_all(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        diagnostic.emit();
    }
}
