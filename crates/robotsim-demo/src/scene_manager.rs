use std::collections::HashMap;
use std::path::{Path, PathBuf};

use robotsim_core::controller::SimulationController;
use robotsim_core::fixed::fixed64_to_f64;
use robotsim_core::geometry::Position;
use robotsim_core::id::EntityId;
use robotsim_core::world::World;
use robotsim_data::{FilePersistence, Scene, load_named_scene, load_scene};

use crate::error::DemoError;
use crate::manifest::{SceneEntry, SceneManifest, load_manifest};

/// A loaded scene driven by a controller.
#[derive(Debug)]
struct ActiveScene {
    id: String,
    controller: SimulationController,
    ids: HashMap<String, EntityId>,
}

/// One line of robot status for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotStatus {
    pub name: String,
    /// Name with battery percentage, e.g. `Robot-0(87.5%)`.
    pub label: String,
    pub center: Position,
    pub battery: f64,
    pub cursor: usize,
    pub visits: usize,
    pub held: bool,
}

/// Manages the scene gallery: loads the manifest, loads/unloads scenes,
/// drives simulation ticks, and provides query access.
#[derive(Debug)]
pub struct SceneManager {
    scenes_dir: PathBuf,
    manifest: SceneManifest,
    store: Option<FilePersistence>,
    active: Option<ActiveScene>,
}

impl SceneManager {
    /// Create a new SceneManager by loading the manifest from `scenes_dir`.
    pub fn new(scenes_dir: &Path) -> Result<Self, DemoError> {
        let manifest = load_manifest(scenes_dir)?;
        Ok(Self {
            scenes_dir: scenes_dir.to_path_buf(),
            manifest,
            store: None,
            active: None,
        })
    }

    /// Save snapshots of scenes loaded from now on into `store`.
    pub fn with_store(mut self, store: FilePersistence) -> Self {
        self.store = Some(store);
        self
    }

    pub fn title(&self) -> &str {
        &self.manifest.title
    }

    pub fn description(&self) -> &str {
        &self.manifest.description
    }

    /// All scene entries from the manifest.
    pub fn scenes(&self) -> &[SceneEntry] {
        &self.manifest.scenes
    }

    /// Load a scene by its manifest ID. Unloads any previously active scene.
    pub fn load_scene(&mut self, scene_id: &str) -> Result<(), DemoError> {
        let entry = self
            .manifest
            .scenes
            .iter()
            .find(|s| s.id == scene_id)
            .ok_or_else(|| DemoError::SceneNotFound {
                id: scene_id.to_string(),
            })?;

        let scene = load_named_scene(&self.scenes_dir, &entry.path).map_err(|source| DemoError::Scene {
            id: scene_id.to_string(),
            source,
        })?;
        self.activate(scene_id, scene);
        Ok(())
    }

    /// Load a scene file outside the manifest. Its id is the file stem.
    pub fn load_scene_file(&mut self, path: &Path) -> Result<(), DemoError> {
        let id = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        let scene = load_scene(path).map_err(|source| DemoError::Scene { id: id.clone(), source })?;
        self.activate(&id, scene);
        Ok(())
    }

    fn activate(&mut self, id: &str, scene: Scene) {
        let ids = scene.ids().clone();
        let mut controller = SimulationController::new(scene.into_world());
        if let Some(store) = &self.store {
            controller = controller.with_persistence(store.clone());
        }
        tracing::info!(scene = id, robots = ids.len(), "scene loaded");
        self.active = Some(ActiveScene {
            id: id.to_string(),
            controller,
            ids,
        });
    }

    /// Unload the current scene.
    pub fn unload_scene(&mut self) {
        self.active = None;
    }

    /// Manifest id of the active scene.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.id.as_str())
    }

    fn scene(&self) -> Result<&ActiveScene, DemoError> {
        self.active.as_ref().ok_or(DemoError::NoActiveScene)
    }

    fn scene_mut(&mut self) -> Result<&mut ActiveScene, DemoError> {
        self.active.as_mut().ok_or(DemoError::NoActiveScene)
    }

    pub fn world(&self) -> Result<&World, DemoError> {
        Ok(self.scene()?.controller.world())
    }

    /// Entity registered under a scene id in the active scene.
    pub fn entity(&self, name: &str) -> Option<EntityId> {
        self.active.as_ref()?.ids.get(name).copied()
    }

    // --- Simulation control ---

    pub fn start(&mut self) -> Result<bool, DemoError> {
        Ok(self.scene_mut()?.controller.start()?)
    }

    pub fn stop(&mut self) -> Result<bool, DemoError> {
        Ok(self.scene_mut()?.controller.stop()?)
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> Result<(), DemoError> {
        Ok(self.scene_mut()?.controller.step()?)
    }

    /// Advance the simulation by `n` ticks.
    pub fn tick_n(&mut self, n: u64) -> Result<(), DemoError> {
        let scene = self.scene_mut()?;
        for _ in 0..n {
            scene.controller.step()?;
        }
        Ok(())
    }

    /// Get the current tick count.
    pub fn current_tick(&self) -> Result<u64, DemoError> {
        Ok(self.world()?.tick_count())
    }

    /// The deterministic state hash of the active world.
    pub fn state_hash(&self) -> Result<u64, DemoError> {
        Ok(self.world()?.state_hash())
    }

    // --- Queries ---

    /// Status of every robot, in registration order.
    pub fn robot_status(&self) -> Result<Vec<RobotStatus>, DemoError> {
        let world = self.world()?;
        let mut out = Vec::with_capacity(world.robots().len());
        for &id in world.robots() {
            let component = world.entity_component(id)?;
            let robot = world.robot(id)?;
            out.push(RobotStatus {
                name: component.name().to_string(),
                label: robot.display_name(component.name()),
                center: component.center(),
                battery: fixed64_to_f64(robot.battery()),
                cursor: robot.cursor(),
                visits: robot.visits().len(),
                held: robot.is_held(),
            });
        }
        Ok(out)
    }

    /// Names of the figures a view would draw, in drawing order.
    pub fn figures(&self) -> Result<Vec<String>, DemoError> {
        Ok(self.world()?.figures().iter().map(|c| c.name().to_string()).collect())
    }

    // --- Persistence ---

    /// Save the active world. Requires a store.
    pub fn save(&mut self) -> Result<String, DemoError> {
        Ok(self.scene_mut()?.controller.save()?)
    }

    /// Replace the active world with a saved snapshot.
    pub fn restore(&mut self, snapshot_id: &str) -> Result<(), DemoError> {
        Ok(self.scene_mut()?.controller.load(snapshot_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SceneManager {
        SceneManager::new(&Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes")).unwrap()
    }

    #[test]
    fn queries_need_an_active_scene() {
        let mut mgr = manager();
        assert!(matches!(mgr.tick(), Err(DemoError::NoActiveScene)));
        assert!(matches!(mgr.state_hash(), Err(DemoError::NoActiveScene)));
        assert!(mgr.entity("Robot-0").is_none());
    }

    #[test]
    fn unknown_scene_is_rejected() {
        let mut mgr = manager();
        assert!(matches!(
            mgr.load_scene("nope"),
            Err(DemoError::SceneNotFound { .. })
        ));
    }

    #[test]
    fn load_tick_unload() {
        let mut mgr = manager();
        mgr.load_scene("open_floor").unwrap();
        assert_eq!(mgr.active_id(), Some("open_floor"));
        mgr.tick_n(3).unwrap();
        assert_eq!(mgr.current_tick().unwrap(), 3);

        let status = mgr.robot_status().unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].name, "Robot-0");
        assert!(status[0].label.starts_with("Robot-0("));

        mgr.unload_scene();
        assert!(mgr.active_id().is_none());
    }

    #[test]
    fn scene_file_outside_the_manifest_loads_under_its_stem() {
        let mut mgr = manager();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/open_floor.ron");
        mgr.load_scene_file(&path).unwrap();
        assert_eq!(mgr.active_id(), Some("open_floor"));
        assert!(matches!(
            mgr.load_scene_file(Path::new("missing.ron")),
            Err(DemoError::Scene { .. })
        ));
    }

    #[test]
    fn save_without_store_fails() {
        let mut mgr = manager();
        mgr.load_scene("four_rooms").unwrap();
        assert!(matches!(mgr.save(), Err(DemoError::Controller(_))));
    }
}
