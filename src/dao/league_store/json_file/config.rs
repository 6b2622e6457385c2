use std::path::{Path, PathBuf};

/// Location of the league document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileConfig {
    /// Path of the JSON document.
    pub path: PathBuf,
}

impl JsonFileConfig {
    /// Store the league at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling file written before being renamed over the real document.
    pub(super) fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "league.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Directory holding the document.
    pub(super) fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}
