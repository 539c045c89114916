use anyhow::{Context, Result};
use sieve_rules_config::Config;
use sieve_rules_engine::{GeneratorOptions, ScriptModel, io};
use std::fmt;
use std::path::{Path, PathBuf};

pub fn generator_options(config: Option<&Config>) -> GeneratorOptions {
    config
        .map(|c| GeneratorOptions::with_indent(c.format.indent))
        .unwrap_or_default()
}

/// Write a fresh config pointing at `scripts_dir`.
pub fn init(config_path: &Path, scripts_dir: &Path, force: bool) -> Result<Config> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            config_path.display()
        );
    }
    io::validate_scripts_dir(scripts_dir)?;

    let config = Config::new(scripts_dir);
    config
        .save_to_path(config_path)
        .with_context(|| format!("writing {}", config_path.display()))?;
    Ok(config)
}

pub fn parse(script: &Path) -> Result<String> {
    let model = io::load_model(script)?;
    let mut json = sieve_rules_engine::to_json(&model)?;
    json.push('\n');
    Ok(json)
}

pub fn generate(document: &Path, options: &GeneratorOptions) -> Result<String> {
    let json = io::read_script(document)?;
    let model = sieve_rules_engine::from_json(&json)
        .with_context(|| format!("invalid document {}", document.display()))?;
    Ok(sieve_rules_engine::generate_with(&model, options))
}

pub fn normalize(script: &Path, options: &GeneratorOptions) -> Result<String> {
    let model = io::load_model(script)?;
    Ok(sieve_rules_engine::generate_with(&model, options))
}

/// What `check` found in a script.
#[derive(Debug, PartialEq, Eq)]
pub struct CheckReport {
    pub rules: usize,
    pub disabled: usize,
    pub raw_blocks: usize,
    pub noted_extensions: Vec<String>,
    /// Regenerating the script reproduces it exactly
    pub canonical: bool,
}

impl CheckReport {
    fn new(model: &ScriptModel, canonical: bool) -> Self {
        Self {
            rules: model.rules().len(),
            disabled: model.rules().iter().filter(|r| !r.enabled).count(),
            raw_blocks: model.raw_blocks().len(),
            noted_extensions: model.noted_extensions().iter().cloned().collect(),
            canonical,
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rules: {} ({} disabled)", self.rules, self.disabled)?;
        writeln!(f, "raw blocks: {}", self.raw_blocks)?;
        if !self.noted_extensions.is_empty() {
            writeln!(f, "other extensions: {}", self.noted_extensions.join(", "))?;
        }
        writeln!(f, "canonical: {}", if self.canonical { "yes" } else { "no" })
    }
}

pub fn check(script: &Path, options: &GeneratorOptions) -> Result<CheckReport> {
    let text = io::read_script(script)?;
    let model = sieve_rules_engine::parse_script(&text);
    let canonical = sieve_rules_engine::generate_with(&model, options) == text;
    Ok(CheckReport::new(&model, canonical))
}

pub fn list(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let files = io::scan_script_files(dir, pattern)?;
    log::debug!("{} scripts in {}", files.len(), dir.display());
    Ok(files
        .into_iter()
        .map(|f| f.strip_prefix(dir).map(Path::to_path_buf).unwrap_or(f))
        .collect())
}
