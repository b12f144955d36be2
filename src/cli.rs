//! CLI: build (packages → JSON + overview) | classify (raw records → modules) | render (overview)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use crate::assemble::assemble;
use crate::config::DriverConfig;
use crate::diagnostics::{self, Diagnostic};
use crate::driver::{Driver, DriverReport};
use crate::extract::CommandExtractor;
use crate::model::ModuleModel;
use crate::overview::{self, OverviewData, DEFAULT_TEMPLATE};
use crate::prefilter::Prefilter;
use crate::records::records_from_value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// restructure jsdoc comment records into a package → module → class model and publish it
#[derive(Parser, Debug)]
#[command(name = "apidoc-tree")]
pub struct CommandLineInterface {
    /// debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// extract, classify and publish every configured package
    Build(BuildOut),
    /// classify pre-extracted record streams and print the module models
    Classify(ClassifyOut),
    /// render the overview page from an overview data file
    Render(RenderOut),
}

#[derive(Args, Debug, Clone)]
struct BuildOut {
    /// JSON driver configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// package directories (replace the configured list)
    #[arg(short, long = "package")]
    packages: Vec<PathBuf>,

    /// output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// overview page title
    #[arg(long)]
    title: Option<String>,

    /// overview template file
    #[arg(long)]
    template: Option<PathBuf>,

    /// extractor command line, program first (e.g. --extractor jsdoc -X)
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    extractor: Option<Vec<String>>,
}

#[derive(Args, Debug, Clone)]
struct ClassifyOut {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// JQ pre-process filter applied to each record stream
    #[arg(long)]
    jq_expr: Option<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// emit {module, diagnostics} pairs instead of bare modules
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Args, Debug, Clone)]
struct RenderOut {
    /// overview data file
    #[arg(long)]
    data: PathBuf,

    /// used when --data does not exist
    #[arg(long)]
    fallback_data: Option<PathBuf>,

    /// template file (built-in page if omitted)
    #[arg(long)]
    template: Option<PathBuf>,

    /// output .html file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct ClassifiedModule {
    module: ModuleModel,
    diagnostics: Vec<Diagnostic>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Build(target) => target.run(),
            Command::Classify(target) => target.run(),
            Command::Render(target) => target.run(),
        }
    }
}

impl BuildOut {
    fn driver_config(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::load(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => DriverConfig::default(),
        };
        if !self.packages.is_empty() {
            config.packages = self.packages.clone();
        }
        if let Some(out) = &self.out {
            config.out_dir = out.clone();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(template) = &self.template {
            config.template = Some(template.clone());
        }
        if let Some(extractor) = &self.extractor {
            config.extractor = extractor.clone();
        }
        Ok(config)
    }

    fn run(&self) -> Result<()> {
        let config = self.driver_config()?;
        if config.packages.is_empty() {
            bail!("no packages configured (use --config or --package)");
        }
        let extractor = CommandExtractor::from_command_line(config.extractor.as_slice())
            .context("extractor command is empty")?;

        let report = Driver::new(config, extractor).run().context("build failed")?;
        print_report(&report);

        let failed = report.failures().count();
        if failed > 0 {
            bail!("{failed} of {} packages failed", report.packages.len());
        }
        Ok(())
    }
}

impl ClassifyOut {
    fn run(&self) -> Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;

        let prefilter = self
            .jq_expr
            .as_deref()
            .map(Prefilter::compile)
            .transpose()
            .context("failed to compile jq expression")?;

        let mut modules = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            let json_value = crate::path_de::from_str_with_path::<Value>(&source)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;

            let records = match &prefilter {
                None => records_from_value(json_value),
                Some(prefilter) => prefilter
                    .apply(&json_value)
                    .with_context(|| format!("failed to apply jq expression to ({source_path_str})"))?
                    .into_iter()
                    .flat_map(records_from_value)
                    .collect(),
            };

            let assembly = assemble(&source_path_str, &records);
            diagnostics::emit_all(&assembly.diagnostics);
            modules.push(ClassifiedModule { module: assembly.module, diagnostics: assembly.diagnostics });
        }

        let out_src = if self.diagnostics {
            serde_json::to_string_pretty(&modules)?
        } else {
            let bare: Vec<&ModuleModel> = modules.iter().map(|m| &m.module).collect();
            serde_json::to_string_pretty(&bare)?
        };
        write_or_print(self.out.as_deref(), &out_src)
    }
}

impl RenderOut {
    fn run(&self) -> Result<()> {
        let data = OverviewData::load(&self.data, self.fallback_data.as_deref())
            .context("failed to load overview data")?;
        let template = match &self.template {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path.display()))?,
            None => DEFAULT_TEMPLATE.to_string(),
        };
        let html = overview::render(&template, &data)?;
        write_or_print(self.out.as_deref(), &html)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn print_report(report: &DriverReport) {
    for package in &report.packages {
        match &package.outcome {
            Ok(published) => {
                let warnings = published.diagnostics.len();
                let suffix = if warnings > 0 {
                    format!(" ({warnings} warnings)").yellow().to_string()
                } else {
                    String::new()
                };
                eprintln!(
                    "{} {} · {} modules → {}{suffix}",
                    "✓".green(),
                    published.name.bold(),
                    published.modules,
                    published.artifact.display(),
                );
            }
            Err(error) => {
                eprintln!("{} {}: {error}", "✗".red(), package.source.display());
            }
        }
    }
    eprintln!("{} {}", "overview →".dimmed(), report.overview.display());
}

fn write_or_print(out: Option<&Path>, src: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{src}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched: Vec<PathBuf> = glob::glob(pattern)?.collect::<Result<_, _>>()?;
            if matched.is_empty() {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
            matched.sort();
            out.extend(matched);
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
