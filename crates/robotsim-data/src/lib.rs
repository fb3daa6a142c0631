//! Scene files and on-disk snapshots for robotsim.
//!
//! Scenes are authored in RON, TOML or JSON ([`schema`]), read with the
//! helpers in [`loader`] and turned into a [`robotsim_core::world::World`]
//! by [`scene::build_scene`]. [`store::FilePersistence`] keeps world
//! snapshots in a directory.

pub mod loader;
pub mod scene;
pub mod schema;
pub mod store;

pub use loader::DataLoadError;
pub use scene::{build_scene, load_named_scene, load_scene, Scene, SceneError};
pub use schema::SceneData;
pub use store::FilePersistence;
