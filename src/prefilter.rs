//! Optional jq program applied to a raw record stream before classification,
//! e.g. `[.[] | select(.access != "private")]`.
use jaq_core::{compile::Undefined, load, Compiler, Ctx, Filter, Native, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{ApidocError, Result};

/// A jq program compiled once and applied to any number of record streams.
pub struct Prefilter {
    filter: Filter<Native<Val>>,
}

impl Prefilter {
    pub fn compile(src: &str) -> Result<Self> {
        let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = load::Arena::default();
        let modules = loader
            .load(&arena, load::File { code: src, path: () })
            .map_err(|errs| {
                describe(errs.into_iter().map(|(_, err)| format!("parse error: {err:?}")), src)
            })?;

        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(|errs| {
                let undefined = errs.into_iter().flat_map(|(_, list)| list).map(
                    |(name, undef): (&str, Undefined)| format!("undefined `{name}`: {undef:?}"),
                );
                describe(undefined, src)
            })?;
        Ok(Self { filter })
    }

    /// Every value the program yields is one JSON document; the caller
    /// flattens arrays among them into records.
    pub fn apply(&self, input: &Value) -> Result<Vec<Value>> {
        let inputs = RcIter::new(core::iter::empty());
        self.filter
            .run((Ctx::new([], &inputs), Val::from(input.clone())))
            .map(|item| {
                item.map(Value::from).map_err(|error| ApidocError::Prefilter {
                    message: format!("runtime error: {error}"),
                })
            })
            .collect()
    }
}

fn describe(problems: impl Iterator<Item = String>, src: &str) -> ApidocError {
    let problems: Vec<String> = problems.collect();
    ApidocError::Prefilter { message: format!("{} in `{src}`", problems.join("; ")) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run_filter(src: &str, input: &Value) -> Result<Vec<Value>> {
        Prefilter::compile(src)?.apply(input)
    }

    #[test]
    fn selects_records() {
        let input = json!([
            {"kind": "function", "name": "a", "access": "private"},
            {"kind": "function", "name": "b"},
        ]);
        let out = run_filter(r#"[.[] | select(.access != "private")]"#, &input).unwrap();
        assert_eq!(out, [json!([{"kind": "function", "name": "b"}])]);
    }

    #[test]
    fn compiled_program_is_reusable() {
        let prefilter = Prefilter::compile(".[] | .name").unwrap();
        assert_eq!(prefilter.apply(&json!([{"name": "a"}, {"name": "b"}])).unwrap(), [json!("a"), json!("b")]);
        assert_eq!(prefilter.apply(&json!([])).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn keeps_key_order_and_numbers() {
        let out = run_filter(".", &json!({"z": 1, "a": 2.5})).unwrap();
        assert_eq!(serde_json::to_string(&out[0]).unwrap(), r#"{"z":1,"a":2.5}"#);
    }

    #[test]
    fn bad_program_is_a_prefilter_error() {
        let err = Prefilter::compile(".[").err().unwrap();
        assert!(matches!(err, ApidocError::Prefilter { .. }));
        let err = Prefilter::compile("no_such_fn").err().unwrap();
        assert!(err.to_string().contains("no_such_fn"), "{err}");
    }

    #[test]
    fn runtime_error_is_a_prefilter_error() {
        let err = run_filter(".[0]", &json!({"kind": "class"})).unwrap_err();
        assert!(matches!(err, ApidocError::Prefilter { .. }));
    }
}
