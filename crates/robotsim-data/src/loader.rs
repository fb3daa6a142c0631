//! File-level helpers for scene data: format detection (RON/JSON/TOML),
//! scene discovery, deserialization and scene-id bookkeeping used by the
//! scene builder.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors raised while reading scene files or resolving scene ids.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// No scene file with the requested stem exists in the directory.
    #[error("no scene '{file}' (.ron, .toml or .json) in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    #[error("unsupported scene format: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// The same stem exists in two formats.
    #[error("conflicting scene files: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A scene id reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in scene '{scene}'")]
    UnresolvedRef {
        scene: String,
        name: String,
        expected_kind: &'static str,
    },

    /// Two entities of a scene share an id.
    #[error("duplicate id '{name}' in scene '{scene}'")]
    DuplicateName { scene: String, name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported scene file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Every format, in lookup order.
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, String> {
        match self {
            Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    Format::ALL
        .into_iter()
        .find(|f| Some(f.extension()) == ext)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Look in `dir` for a scene file named `stem` with any supported
/// extension.
///
/// Returns `Ok(None)` if there is none, or `Err(ConflictingFormats)` when the
/// same stem exists in more than one format.
pub fn find_scene_file(dir: &Path, stem: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut candidates = Format::ALL
        .into_iter()
        .map(|f| dir.join(format!("{stem}.{}", f.extension())))
        .filter(|p| p.is_file());
    let found = candidates.next();
    if let (Some(a), Some(b)) = (&found, candidates.next()) {
        return Err(DataLoadError::ConflictingFormats { a: a.clone(), b });
    }
    Ok(found)
}

/// Like [`find_scene_file`], but a missing file is an error.
pub fn require_scene_file(dir: &Path, stem: &str) -> Result<PathBuf, DataLoadError> {
    find_scene_file(dir, stem)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: stem.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it in the format its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    format.parse(&content).map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a scene id, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    scene: &str,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        scene: scene.to_string(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a scene id is already taken, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(map: &HashMap<String, V>, name: &str, scene: &str) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            scene: scene.to_string(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
