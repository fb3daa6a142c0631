//! Scene gallery and headless runner for robotsim.
//!
//! Loads the scene manifest, builds scenes through `robotsim-data` and
//! drives them with a [`robotsim_core::controller::SimulationController`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use robotsim_demo::scene_manager::SceneManager;
//!
//! let mut mgr = SceneManager::new("scenes/".as_ref())?;
//! mgr.load_scene("open_floor")?;
//! mgr.tick_n(100)?;
//! for status in mgr.robot_status()? {
//!     println!("{}", status.label);
//! }
//! ```

pub mod error;
pub mod manifest;
pub mod scene_manager;

pub use error::DemoError;
pub use manifest::{SceneEntry, SceneManifest};
pub use scene_manager::{RobotStatus, SceneManager};
