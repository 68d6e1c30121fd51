//! Configuration for an ingestion run
//!
//! Every path is explicit. Nothing here depends on the process working
//! directory beyond how relative paths are resolved by the OS.

use serde::{Deserialize, Serialize};
use snapfeat_common::{Result, SnapfeatError};
use std::path::{Component, Path, PathBuf};

// ============================================================================
// Ingest Configuration Constants
// ============================================================================

/// Default directory holding the SnapGene feature collections.
pub const DEFAULT_ROOT: &str = "assets/snapgene";

/// Root-relative prefixes that never hold plasmid files: macOS metadata and
/// previously generated output.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[".DS", "features"];

/// Serialization used for the feature mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `name<TAB>sequence` lines
    #[default]
    Tsv,
    /// Pretty-printed `{ "name": "sequence" }` object
    Json,
}

impl OutputFormat {
    /// File name used when no output path is given
    pub fn default_file_name(self) -> &'static str {
        match self {
            OutputFormat::Tsv => "features.tsv",
            OutputFormat::Json => "features.json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = SnapfeatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(SnapfeatError::config(format!("Invalid output format: {}", s))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Directory searched recursively for plasmid files
    pub root: PathBuf,

    /// Destination of the feature mapping (truncated on write)
    pub output: PathBuf,

    /// Output serialization
    #[serde(default)]
    pub format: OutputFormat,

    /// Prefixes excluded in addition to [`DEFAULT_EXCLUDED_PREFIXES`]
    #[serde(default)]
    pub extra_excluded_prefixes: Vec<String>,
}

impl IngestConfig {
    /// Config for `root`, writing `features.tsv` into it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let format = OutputFormat::default();
        Self {
            output: root.join(format.default_file_name()),
            root,
            format,
            extra_excluded_prefixes: Vec::new(),
        }
    }

    /// Load config from environment variables
    ///
    /// - `SNAPFEAT_ROOT`: input directory (default `assets/snapgene`)
    /// - `SNAPFEAT_FORMAT`: `tsv` or `json`
    /// - `SNAPFEAT_OUTPUT`: output file (default `<root>/features.<format>`)
    /// - `SNAPFEAT_EXCLUDE`: comma-separated extra excluded prefixes
    pub fn from_env() -> Result<Self> {
        let root = std::env::var("SNAPFEAT_ROOT").unwrap_or_else(|_| DEFAULT_ROOT.to_string());
        let mut config = Self::new(root);

        if let Ok(format) = std::env::var("SNAPFEAT_FORMAT") {
            config.set_format(format.parse()?);
        }

        if let Ok(output) = std::env::var("SNAPFEAT_OUTPUT") {
            config.set_output(output);
        }

        if let Ok(exclude) = std::env::var("SNAPFEAT_EXCLUDE") {
            for prefix in exclude.split(',') {
                config.add_excluded_prefix(prefix);
            }
        }

        Ok(config)
    }

    pub fn set_output(&mut self, output: impl Into<PathBuf>) {
        self.output = output.into();
    }

    /// Change the format; a default-named output follows the new format.
    pub fn set_format(&mut self, format: OutputFormat) {
        if self.output == self.root.join(self.format.default_file_name()) {
            self.output = self.root.join(format.default_file_name());
        }
        self.format = format;
    }

    /// Add an excluded prefix; blank prefixes are ignored.
    pub fn add_excluded_prefix(&mut self, prefix: impl AsRef<str>) {
        let prefix = prefix.as_ref().trim().trim_start_matches("./");
        if !prefix.is_empty() && !self.extra_excluded_prefixes.iter().any(|p| p == prefix) {
            self.extra_excluded_prefixes.push(prefix.to_string());
        }
    }

    /// Every prefix the enumerator must skip. When the output file lives
    /// under the root, its own relative path is included so a later run
    /// never tries to decode it. Both paths are resolved first, so
    /// `root` and `./root/db.tsv` (or a symlinked root) still match.
    pub fn excluded_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = DEFAULT_EXCLUDED_PREFIXES
            .iter()
            .map(|p| p.to_string())
            .chain(self.extra_excluded_prefixes.iter().cloned())
            .collect();

        if let Some(relative) = relative_to(&resolve(&self.output), &resolve(&self.root)) {
            if !prefixes.iter().any(|p| relative.starts_with(p.as_str())) {
                prefixes.push(relative);
            }
        }

        prefixes
    }

    /// Check the root exists and is a directory
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(SnapfeatError::config(format!(
                "Input root '{}' is not a directory",
                self.root.display()
            )));
        }

        if self.output.is_dir() {
            return Err(SnapfeatError::config(format!(
                "Output path '{}' is a directory",
                self.output.display()
            )));
        }

        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

/// `path` with its longest existing ancestor canonicalized and the missing
/// tail appended. `.` components are dropped first.
fn resolve(path: &Path) -> PathBuf {
    let lexical: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    loop {
        let candidate = if existing.as_os_str().is_empty() {
            Path::new(".")
        } else {
            existing
        };
        if let Ok(canonical) = candidate.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |resolved, name| resolved.join(name));
        }

        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            },
            _ => break,
        }
    }

    lexical
}

/// `path` relative to `root` in forward-slash form, if it lies beneath it.
pub(crate) fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
