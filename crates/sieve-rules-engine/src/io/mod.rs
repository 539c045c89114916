use crate::generating::{GeneratorOptions, generate_with};
use crate::models::ScriptModel;
use crate::parsing::parse_script;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scripts directory: {0}")]
    InvalidScriptsDir(String),
    #[error("Invalid script pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Read a script file and return its text
pub fn read_script(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write script text, creating parent directories as needed
pub fn write_script(path: &Path, text: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    log::trace!("writing {} bytes to {}", text.len(), path.display());
    fs::write(path, text).map_err(IoError::Io)
}

/// List script files under `scripts_root` whose path relative to it matches
/// `pattern` (e.g. `*.sieve` or `**/*.sieve`). Sorted.
pub fn scan_script_files(scripts_root: &Path, pattern: &str) -> Result<Vec<PathBuf>, IoError> {
    validate_scripts_dir(scripts_root)?;

    let root = glob::Pattern::escape(&scripts_root.to_string_lossy());
    let full_pattern = format!("{root}/{pattern}");

    let mut files = Vec::new();
    for entry in glob::glob(&full_pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("skipping unreadable entry: {e}"),
        }
    }
    files.sort();
    Ok(files)
}

pub fn validate_scripts_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidScriptsDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// Read and parse a script file.
pub fn load_model(path: &Path) -> Result<ScriptModel, IoError> {
    let text = read_script(path)?;
    Ok(parse_script(&text))
}

/// Generate a model's script text and write it to `path`.
pub fn save_model(
    path: &Path,
    model: &ScriptModel,
    options: &GeneratorOptions,
) -> Result<(), IoError> {
    write_script(path, &generate_with(model, options))
}
