//! Configuration values. Nothing here is global: the CLI loads them and hands
//! them to the driver and walker explicitly.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApidocError, Result};
use crate::extract::{ExtractOptions, DEFAULT_COMMAND};
use crate::path_de::read_file_with_path;

pub const MANIFEST_FILE: &str = "package.json";
pub const SETTINGS_FILE: &str = "apidoc.json";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Provenance read from a package's own `package.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub repository: Value,
}

/// Optional per-package settings (`apidoc.json` next to the manifest).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSettings {
    /// Globs relative to the package root selecting module files.
    pub include: Vec<String>,
    /// Globs relative to the package root removed from the selection.
    pub exclude: Vec<String>,
    pub extractor: ExtractOptions,
}

/// Everything the package driver needs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    pub packages: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub title: String,
    pub template: Option<PathBuf>,
    pub extractor: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            include: vec!["*.js".to_string()],
            exclude: Vec::new(),
            extractor: ExtractOptions::default(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            out_dir: PathBuf::from("docs"),
            title: "API Reference".to_string(),
            template: None,
            extractor: DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Manifest {
    /// A missing manifest is fatal for the package.
    pub fn load(package_root: &Path) -> Result<Self> {
        let path = package_root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ApidocError::MissingManifest { package: package_root.to_path_buf() });
        }
        read_file_with_path(&path).map_err(|message| ApidocError::Manifest { path, message })
    }
}

impl PackageSettings {
    /// A missing settings file means defaults; a broken one is an error.
    pub fn load(package_root: &Path) -> Result<Self> {
        let path = package_root.join(SETTINGS_FILE);
        if !path.is_file() {
            tracing::debug!(package = %package_root.display(), "no {SETTINGS_FILE}, using defaults");
            return Ok(Self::default());
        }
        read_file_with_path(&path).map_err(|message| ApidocError::Settings { path, message })
    }
}

impl DriverConfig {
    /// Relative package, output and template paths resolve against the
    /// directory holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: DriverConfig = read_file_with_path(path)
            .map_err(|message| ApidocError::Config { path: path.to_path_buf(), message })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for package in &mut config.packages {
            *package = base.join(&*package);
        }
        config.out_dir = base.join(&config.out_dir);
        config.template = config.template.map(|t| base.join(t));
        Ok(config)
    }
}
