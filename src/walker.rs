//! Module walker: one package directory → one [`PackageModel`].
//!
//! Modules are extracted strictly one after another in path order, so the
//! output module sequence always matches the discovered file order and at
//! most one extractor process runs per package.
use std::path::{Path, PathBuf};

use crate::assemble::assemble;
use crate::config::{Manifest, PackageSettings, MANIFEST_FILE};
use crate::diagnostics::{self, Diagnostic};
use crate::error::{ApidocError, Result};
use crate::extract::Extractor;
use crate::model::PackageModel;
use crate::records;

#[derive(Debug, Clone)]
pub struct PackageOutput {
    pub model: PackageModel,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn walk_package<E: Extractor + ?Sized>(root: &Path, extractor: &E) -> Result<PackageOutput> {
    let manifest = Manifest::load(root)?;
    let settings = PackageSettings::load(root)?;
    let files = discover_modules(root, &settings)?;
    tracing::info!(package = %root.display(), modules = files.len(), "walking package");

    let mut model = PackageModel {
        name: manifest.name.unwrap_or_else(|| fallback_name(root)),
        version: manifest.version.unwrap_or_default(),
        repository: manifest.repository,
        modules: Vec::with_capacity(files.len()),
    };
    let mut all_diagnostics = Vec::new();

    for file in &files {
        let source = extractor.extract(file, &settings.extractor)?;
        let records = records::parse_stream(&source).map_err(|message| ApidocError::RecordStream {
            file: file.clone(),
            message,
        })?;
        let assembly = assemble(&module_path(root, file), &records);
        diagnostics::emit_all(&assembly.diagnostics);
        tracing::debug!(
            module = %assembly.module.path,
            records = records.len(),
            classes = assembly.module.classes.len(),
            "module assembled",
        );
        model.modules.push(assembly.module);
        all_diagnostics.extend(assembly.diagnostics);
    }

    Ok(PackageOutput { model, diagnostics: all_diagnostics })
}

/// Include matches minus exclude matches minus the manifest; sorted, unique.
pub fn discover_modules(root: &Path, settings: &PackageSettings) -> Result<Vec<PathBuf>> {
    let excludes = settings
        .exclude
        .iter()
        .map(|p| glob::Pattern::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let options = glob::MatchOptions { require_literal_separator: true, ..Default::default() };

    let mut out = Vec::new();
    for include in &settings.include {
        // the root is literal; only `include` carries glob syntax
        let pattern = Path::new(&glob::Pattern::escape(&root.to_string_lossy())).join(include);
        let pattern = pattern.to_string_lossy();
        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|error| ApidocError::Io(error.into_error()))?;
            if !path.is_file() || path.file_name().is_some_and(|n| n == MANIFEST_FILE) {
                continue;
            }
            let relative = module_path(root, &path);
            if excludes.iter().any(|x| x.matches_with(&relative, options)) {
                tracing::debug!(module = %relative, "excluded");
                continue;
            }
            out.push(path);
        }
    }
    out.sort();
    out.dedup();
    Ok(out)
}

/// Path relative to the package root with `/` separators.
pub fn module_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn fallback_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractOptions;
    use std::fs;
    use std::sync::Mutex;

    fn package(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        dir
    }

    /// Treats the module file itself as the extractor's JSON output.
    fn passthrough(file: &Path, _: &ExtractOptions) -> Result<String> {
        Ok(fs::read_to_string(file)?)
    }

    #[test]
    fn walks_modules_in_path_order() {
        let dir = package(&[
            ("package.json", r#"{"name": "foam-color", "version": "1.2.0", "repository": "git://x"}"#),
            ("rgb.js", r#"[{"kind": "class", "name": "Rgb"}]"#),
            ("hsv.js", r#"[{"kind": "function", "name": "toHsv"}]"#),
            ("README.md", "not a module"),
        ]);
        let out = walk_package(dir.path(), &passthrough).unwrap();
        assert_eq!(out.model.name, "foam-color");
        assert_eq!(out.model.version, "1.2.0");
        assert_eq!(out.model.repository, "git://x");
        let paths: Vec<_> = out.model.modules.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, ["hsv.js", "rgb.js"]);
        assert_eq!(out.model.modules[1].classes[0].name, "Rgb");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn root_with_glob_characters_is_literal() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("foam[v2]");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("package.json"), r#"{"name": "foam"}"#).unwrap();
        fs::write(root.join("a.js"), r#"[{"kind": "function", "name": "run"}]"#).unwrap();

        let files = discover_modules(&root, &PackageSettings::default()).unwrap();
        assert_eq!(files, [root.join("a.js")]);

        let out = walk_package(&root, &passthrough).unwrap();
        assert_eq!(out.model.modules.len(), 1);
        assert_eq!(out.model.modules[0].path, "a.js");
        assert_eq!(out.model.modules[0].functions[0].name, "run");
    }

    #[test]
    fn missing_manifest_is_fatal() {
        let dir = package(&[("a.js", "[]")]);
        let err = walk_package(dir.path(), &passthrough).unwrap_err();
        assert!(matches!(err, ApidocError::MissingManifest { .. }));
    }

    #[test]
    fn settings_select_and_exclude_modules() {
        let dir = package(&[
            ("package.json", r#"{"name": "foam-gl"}"#),
            ("apidoc.json", r#"{"include": ["src/*.js"], "exclude": ["src/*.min.js"], "extractor": {"private": true}}"#),
            ("src/context.js", "[]"),
            ("src/context.min.js", "[]"),
            ("index.js", "[]"),
        ]);
        let seen = Mutex::new(Vec::new());
        let extractor = |file: &Path, options: &ExtractOptions| {
            assert!(options.private);
            seen.lock().unwrap().push(module_path(dir.path(), file));
            Ok::<_, ApidocError>("[]".to_string())
        };
        let out = walk_package(dir.path(), &extractor).unwrap();
        assert_eq!(out.model.modules.len(), 1);
        assert_eq!(out.model.modules[0].path, "src/context.js");
        assert_eq!(*seen.lock().unwrap(), ["src/context.js"]);
        assert_eq!(out.model.version, "");
    }

    #[test]
    fn extraction_failure_stops_remaining_modules() {
        let dir = package(&[
            ("package.json", r#"{"name": "foam-app"}"#),
            ("a.js", "[]"),
            ("b.js", "[]"),
            ("c.js", "[]"),
        ]);
        let calls = Mutex::new(Vec::new());
        let extractor = |file: &Path, _: &ExtractOptions| {
            let name = module_path(dir.path(), file);
            calls.lock().unwrap().push(name.clone());
            if name == "b.js" {
                return Err(ApidocError::Extraction { file: file.to_path_buf(), message: "boom".into() });
            }
            Ok("[]".to_string())
        };
        let err = walk_package(dir.path(), &extractor).unwrap_err();
        assert!(matches!(err, ApidocError::Extraction { .. }));
        assert_eq!(*calls.lock().unwrap(), ["a.js", "b.js"]);
    }

    #[test]
    fn non_json_output_is_a_stream_error() {
        let dir = package(&[("package.json", "{}"), ("a.js", "function a() {}")]);
        let err = walk_package(dir.path(), &passthrough).unwrap_err();
        assert!(matches!(err, ApidocError::RecordStream { .. }));
    }

    #[test]
    fn nameless_manifest_falls_back_to_directory() {
        let dir = package(&[("package.json", "{}")]);
        let out = walk_package(dir.path(), &passthrough).unwrap();
        assert_eq!(out.model.name, dir.path().file_name().unwrap().to_string_lossy());
        assert!(out.model.modules.is_empty());
        assert!(out.model.repository.is_null());
    }

    #[test]
    fn diagnostics_are_collected_per_module() {
        let dir = package(&[
            ("package.json", r#"{"name": "foam-app"}"#),
            ("app.js", r#"[{"kind": "function", "name": "run", "memberof": "Missing", "scope": "static"}]"#),
        ]);
        let out = walk_package(dir.path(), &passthrough).unwrap();
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].module(), "app.js");
    }

    #[test]
    fn module_path_uses_forward_slashes() {
        let root = Path::new("/pkg");
        assert_eq!(module_path(root, &root.join("src").join("a.js")), "src/a.js");
    }
}
