use std::path::Path;

use robotsim_core::world::Kind;
use robotsim_data::FilePersistence;
use robotsim_demo::{DemoError, SceneManager};

fn scenes_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/scenes"))
}

fn manager() -> SceneManager {
    SceneManager::new(scenes_dir()).unwrap()
}

// -----------------------------------------------------------------------
// Scene contents
// -----------------------------------------------------------------------

#[test]
fn every_manifest_scene_loads() {
    let mut mgr = manager();
    let ids: Vec<String> = mgr.scenes().iter().map(|s| s.id.clone()).collect();
    for id in ids {
        mgr.load_scene(&id).unwrap_or_else(|e| panic!("scene '{id}' failed: {e}"));
        assert!(!mgr.robot_status().unwrap().is_empty());
    }
}

#[test]
fn four_rooms_places_every_door_and_machine() {
    let mut mgr = manager();
    mgr.load_scene("four_rooms").unwrap();
    let world = mgr.world().unwrap();
    let count = |kind| world.entity_ids().iter().filter(|&&id| world.kind_of(id).unwrap() == kind).count();
    assert_eq!(count(Kind::Room), 4);
    assert_eq!(count(Kind::Door), 5);
    assert_eq!(count(Kind::ProductionMachine), 2);
    assert_eq!(count(Kind::ChargingStation), 3);
    assert_eq!(count(Kind::Conveyor), 1);
    assert_eq!(count(Kind::Robot), 1);

    let robot = world.robot(mgr.entity("Robot-0").unwrap()).unwrap();
    assert_eq!(robot.visits().len(), 5);
}

#[test]
fn second_robot_shares_the_first_ones_graph() {
    let mut mgr = manager();
    mgr.load_scene("four_rooms_two_robots").unwrap();
    mgr.tick().unwrap();
    let world = mgr.world().unwrap();
    let graph = |name| {
        let id = mgr.entity(name).unwrap();
        std::rc::Rc::clone(world.robot(id).unwrap().pathfinder().unwrap().graph())
    };
    assert!(std::rc::Rc::ptr_eq(&graph("Robot-0"), &graph("Robot-1")));
}

// -----------------------------------------------------------------------
// Running
// -----------------------------------------------------------------------

#[test]
fn robots_leave_their_start() {
    let mut mgr = manager();
    mgr.load_scene("open_floor").unwrap();
    let before = mgr.robot_status().unwrap()[0].center;
    mgr.tick_n(30).unwrap();
    let after = mgr.robot_status().unwrap();
    assert_ne!(after[0].center, before);
    assert!(after[0].battery < 100.0);
}

#[test]
fn scenes_are_deterministic() {
    for id in ["four_rooms", "open_floor"] {
        let mut a = manager();
        let mut b = manager();
        a.load_scene(id).unwrap();
        b.load_scene(id).unwrap();
        a.tick_n(60).unwrap();
        b.tick_n(60).unwrap();
        assert_eq!(a.state_hash().unwrap(), b.state_hash().unwrap(), "scene {id}");
    }
}

#[test]
fn save_and_restore_through_a_file_store() {
    let dir = std::env::temp_dir().join(format!("robotsim_demo_test_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let mut mgr = manager().with_store(FilePersistence::new(&dir).unwrap());
    mgr.load_scene("open_floor").unwrap();
    mgr.tick_n(10).unwrap();
    let hash = mgr.state_hash().unwrap();
    let saved = mgr.save().unwrap();

    mgr.tick_n(10).unwrap();
    assert_ne!(mgr.state_hash().unwrap(), hash);
    mgr.restore(&saved).unwrap();
    assert_eq!(mgr.state_hash().unwrap(), hash);
    assert_eq!(mgr.current_tick().unwrap(), 10);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn start_is_idempotent() {
    let mut mgr = manager();
    assert!(matches!(mgr.start(), Err(DemoError::NoActiveScene)));
    mgr.load_scene("four_rooms").unwrap();
    assert!(mgr.start().unwrap());
    assert!(!mgr.start().unwrap());
    assert!(mgr.stop().unwrap());
    assert!(!mgr.stop().unwrap());
}
