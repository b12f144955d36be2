//! Boundary to the external comment extractor.
//!
//! The core only needs the raw JSON text one extractor run prints for one
//! module file; how it is produced is up to the [`Extractor`] implementation.
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::{ApidocError, Result};

/// Command used when nothing else is configured: jsdoc's JSON dump.
pub const DEFAULT_COMMAND: &[&str] = &["jsdoc", "-X"];

/// Per-package extractor options, read from the package settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// Include symbols marked `@private`.
    pub private: bool,
    /// Extra arguments appended before the module file.
    pub args: Vec<String>,
}

pub trait Extractor: Sync {
    fn extract(&self, file: &Path, options: &ExtractOptions) -> Result<String>;
}

impl<F> Extractor for F
where
    F: Fn(&Path, &ExtractOptions) -> Result<String> + Sync,
{
    fn extract(&self, file: &Path, options: &ExtractOptions) -> Result<String> {
        self(file, options)
    }
}

/// Runs `program args… [--private] extra-args… file` and captures stdout.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandExtractor {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// First element is the program, the rest its leading arguments.
    pub fn from_command_line<S: AsRef<str>>(command: &[S]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(
            program.as_ref(),
            args.iter().map(|a| a.as_ref().to_string()).collect(),
        ))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::from_command_line(DEFAULT_COMMAND).unwrap_or_else(|| Self::new("jsdoc", Vec::new()))
    }
}

impl Extractor for CommandExtractor {
    fn extract(&self, file: &Path, options: &ExtractOptions) -> Result<String> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if options.private {
            command.arg("--private");
        }
        command.args(&options.args).arg(file);
        tracing::debug!(program = %self.program.display(), file = %file.display(), "running extractor");

        let output = command.output().map_err(|error| ApidocError::Extraction {
            file: file.to_path_buf(),
            message: format!("failed to start {}: {error}", self.program.display()),
        })?;
        if !output.status.success() {
            return Err(ApidocError::Extraction {
                file: file.to_path_buf(),
                message: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim(),
                ),
            });
        }
        String::from_utf8(output.stdout).map_err(|error| ApidocError::Extraction {
            file: file.to_path_buf(),
            message: format!("output is not UTF-8: {error}"),
        })
    }
}
