use robotsim_core::controller::ControllerError;
use robotsim_core::error::SimError;
use robotsim_data::SceneError;
use std::path::PathBuf;

/// Failures of the scene runner.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("no active scene; load one first")]
    NoActiveScene,

    #[error("manifest has no scene '{id}'")]
    SceneNotFound { id: String },

    #[error("scene '{id}': {source}")]
    Scene {
        id: String,
        #[source]
        source: SceneError,
    },

    /// `manifest.ron` is malformed.
    #[error("bad manifest {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
