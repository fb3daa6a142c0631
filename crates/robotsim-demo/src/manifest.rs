use serde::Deserialize;
use std::path::Path;

use crate::error::DemoError;

/// Top-level manifest listing all scenes.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneManifest {
    pub title: String,
    pub description: String,
    pub scenes: Vec<SceneEntry>,
}

/// An entry in the manifest naming a scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Scene file stem in the scenes directory; any supported extension.
    pub path: String,
}

/// Load the scene manifest from a `manifest.ron` file.
pub fn load_manifest(scenes_dir: &Path) -> Result<SceneManifest, DemoError> {
    let path = scenes_dir.join("manifest.ron");
    let content = std::fs::read_to_string(&path)?;
    ron::from_str(&content).map_err(|e| DemoError::Parse {
        file: path,
        detail: e.to_string(),
    })
}
