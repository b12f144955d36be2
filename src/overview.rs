//! Overview page: the list of configured packages rendered through a small
//! placeholder template.
//!
//! Template syntax:
//! - `{{key}}`: `title`, `generated` or `count`
//! - `{{#packages}} … {{/packages}}`: repeated per package, with `name`,
//!   `version`, `artifact`, `href`, `modules` and `status` in scope
//!
//! Values are HTML-escaped. Unknown placeholders are an error.
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{ApidocError, Result};
use crate::path_de::read_file_with_path;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewData {
    pub title: String,
    pub generated: String,
    pub packages: Vec<PackageSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// File name of the package's JSON artifact; absent when the package failed.
    #[serde(default)]
    pub artifact: Option<String>,
    #[serde(default)]
    pub modules: usize,
    #[serde(default)]
    pub failed: bool,
}

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }
.failed { color: #a33; }
.version { color: #777; margin-left: 0.5em; }
</style>
</head>
<body>
<h1>{{title}}</h1>
<ul>
{{#packages}}  <li class="{{status}}"><a href="{{href}}">{{name}}</a><span class="version">{{version}}</span> ({{modules}} modules)</li>
{{/packages}}</ul>
<footer>{{count}} packages, generated {{generated}}</footer>
</body>
</html>
"#;

static PACKAGES_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{#packages\}\}(.*?)\{\{/packages\}\}").unwrap());
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap());

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl OverviewData {
    /// Read `primary`, or `fallback` when `primary` does not exist.
    pub fn load(primary: &Path, fallback: Option<&Path>) -> Result<Self> {
        let path = match fallback {
            Some(fallback) if !primary.is_file() => {
                tracing::info!(
                    missing = %primary.display(),
                    fallback = %fallback.display(),
                    "overview data missing, using fallback",
                );
                fallback
            }
            _ => primary,
        };
        read_file_with_path(path).map_err(|message| ApidocError::Config { path: path.to_path_buf(), message })
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "title" => Some(self.title.clone()),
            "generated" => Some(self.generated.clone()),
            "count" => Some(self.packages.len().to_string()),
            _ => None,
        }
    }
}

impl PackageSummary {
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "name" => Some(self.name.clone()),
            "version" => Some(self.version.clone()),
            "artifact" => Some(self.artifact.clone().unwrap_or_default()),
            // failed packages have no artifact to link to
            "href" => Some(self.artifact.clone().unwrap_or_else(|| "#".to_string())),
            "modules" => Some(self.modules.to_string()),
            "status" => Some(if self.failed { "failed" } else { "ok" }.to_string()),
            _ => None,
        }
    }
}

pub fn render(template: &str, data: &OverviewData) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for block in PACKAGES_BLOCK.captures_iter(template) {
        let whole = block.get(0).map(|m| m.range()).unwrap_or_default();
        out.push_str(&substitute(&template[last..whole.start], |k| data.lookup(k))?);
        let body = block.get(1).map(|m| m.as_str()).unwrap_or_default();
        for package in &data.packages {
            out.push_str(&substitute(body, |k| package.lookup(k).or_else(|| data.lookup(k)))?);
        }
        last = whole.end;
    }
    out.push_str(&substitute(&template[last..], |k| data.lookup(k))?);
    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn substitute(text: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(text) {
        let (range, key) = placeholder(&caps);
        let value = lookup(key).ok_or_else(|| ApidocError::Template {
            message: format!("unknown placeholder `{key}`"),
        })?;
        out.push_str(&text[last..range.start]);
        out.push_str(&html_escape(&value));
        last = range.end;
    }
    out.push_str(&text[last..]);
    Ok(out)
}

fn placeholder<'t>(caps: &Captures<'t>) -> (std::ops::Range<usize>, &'t str) {
    let range = caps.get(0).map(|m| m.range()).unwrap_or_default();
    let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    (range, key)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
