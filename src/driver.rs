//! Package driver: runs the module walker for every configured package and
//! publishes the results.
//!
//! Packages are independent of each other and run on the rayon pool; inside
//! one package the walker stays sequential. A package that fails is reported
//! and skipped without affecting the rest.
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::DriverConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{ApidocError, Result};
use crate::extract::Extractor;
use crate::overview::{self, OverviewData, PackageSummary, DEFAULT_TEMPLATE};
use crate::walker::{walk_package, PackageOutput};

pub const OVERVIEW_DATA_FILE: &str = "data.json";
pub const OVERVIEW_PAGE_FILE: &str = "index.html";

#[derive(Debug)]
pub struct PackageReport {
    pub source: PathBuf,
    pub outcome: Result<PublishedPackage>,
}

#[derive(Debug)]
pub struct PublishedPackage {
    pub name: String,
    pub version: String,
    pub artifact: PathBuf,
    pub modules: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct DriverReport {
    pub packages: Vec<PackageReport>,
    pub overview: PathBuf,
}

impl DriverReport {
    pub fn failures(&self) -> impl Iterator<Item = &PackageReport> {
        self.packages.iter().filter(|p| p.outcome.is_err())
    }
}

pub struct Driver<E> {
    config: DriverConfig,
    extractor: E,
}

impl<E: Extractor> Driver<E> {
    pub fn new(config: DriverConfig, extractor: E) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Per-package failures land in the report; only output-directory and
    /// overview problems abort the run.
    pub fn run(&self) -> Result<DriverReport> {
        fs::create_dir_all(&self.config.out_dir)?;

        let walked: Vec<(PathBuf, Result<PackageOutput>)> = self
            .config
            .packages
            .par_iter()
            .map(|root| (root.clone(), walk_package(root, &self.extractor)))
            .collect();

        // case-insensitive; first package in configured order keeps the name
        let mut claimed: HashSet<String> =
            [OVERVIEW_DATA_FILE, OVERVIEW_PAGE_FILE].into_iter().map(str::to_lowercase).collect();
        let packages: Vec<PackageReport> = walked
            .into_iter()
            .map(|(source, outcome)| {
                let outcome = outcome.and_then(|output| self.publish(output, &mut claimed));
                if let Err(error) = &outcome {
                    tracing::error!(package = %source.display(), %error, "package skipped");
                }
                PackageReport { source, outcome }
            })
            .collect();

        let overview = self.write_overview(&packages)?;
        Ok(DriverReport { packages, overview })
    }

    fn publish(&self, output: PackageOutput, claimed: &mut HashSet<String>) -> Result<PublishedPackage> {
        let file_name = format!("{}.json", artifact_stem(&output.model.name));
        let artifact = self.config.out_dir.join(&file_name);
        if !claimed.insert(file_name.to_lowercase()) {
            return Err(ApidocError::ArtifactCollision { package: output.model.name, artifact });
        }
        let json = serde_json::to_string_pretty(&output.model)?;
        fs::write(&artifact, json)?;
        tracing::info!(package = %output.model.name, artifact = %artifact.display(), "package written");
        Ok(PublishedPackage {
            name: output.model.name,
            version: output.model.version,
            artifact,
            modules: output.model.modules.len(),
            diagnostics: output.diagnostics,
        })
    }

    fn write_overview(&self, packages: &[PackageReport]) -> Result<PathBuf> {
        let data = OverviewData {
            title: self.config.title.clone(),
            generated: chrono::Utc::now().to_rfc3339(),
            packages: packages.iter().map(summarize).collect(),
        };
        fs::write(
            self.config.out_dir.join(OVERVIEW_DATA_FILE),
            serde_json::to_string_pretty(&data)?,
        )?;

        let template = match &self.config.template {
            Some(path) => fs::read_to_string(path).map_err(|error| ApidocError::Template {
                message: format!("cannot read {}: {error}", path.display()),
            })?,
            None => DEFAULT_TEMPLATE.to_string(),
        };
        let page = self.config.out_dir.join(OVERVIEW_PAGE_FILE);
        fs::write(&page, overview::render(&template, &data)?)?;
        Ok(page)
    }
}

fn summarize(report: &PackageReport) -> PackageSummary {
    match &report.outcome {
        Ok(published) => PackageSummary {
            name: published.name.clone(),
            version: published.version.clone(),
            artifact: published.artifact.file_name().map(|n| n.to_string_lossy().to_string()),
            modules: published.modules,
            failed: false,
        },
        Err(_) => PackageSummary {
            name: source_name(&report.source),
            version: String::new(),
            artifact: None,
            modules: 0,
            failed: true,
        },
    }
}

fn source_name(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| source.display().to_string())
}

/// npm scoped names (`@scope/name`) become flat file names.
pub fn artifact_stem(package_name: &str) -> String {
    package_name
        .trim_start_matches('@')
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '@') { '-' } else { c })
        .collect()
}
