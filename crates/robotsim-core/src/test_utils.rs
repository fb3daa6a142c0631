//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::error::ObserverError;
use crate::fixed::Fixed64;
use crate::geometry::{Position, Rect, VisitAnchor};
use crate::id::EntityId;
use crate::observer::Observer;
use crate::robot::RobotSpec;
use crate::world::World;
use std::cell::{Cell, RefCell};

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Observers
// ===========================================================================

/// Counts notifications.
#[derive(Debug, Default)]
pub struct CountingObserver {
    count: Cell<usize>,
}

impl CountingObserver {
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl Observer for CountingObserver {
    fn model_changed(&self, _world: &World) -> Result<(), ObserverError> {
        self.count.set(self.count.get() + 1);
        Ok(())
    }
}

/// Fails every notification with a fixed message.
#[derive(Debug)]
pub struct FailingObserver {
    message: String,
}

impl FailingObserver {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Observer for FailingObserver {
    fn model_changed(&self, _world: &World) -> Result<(), ObserverError> {
        Err(ObserverError(self.message.clone()))
    }
}

/// Records the figure names seen on each notification.
#[derive(Debug, Default)]
pub struct FigureRecorder {
    frames: RefCell<Vec<Vec<String>>>,
}

impl FigureRecorder {
    pub fn frames(&self) -> Vec<Vec<String>> {
        self.frames.borrow().clone()
    }

    pub fn last(&self) -> Option<Vec<String>> {
        self.frames.borrow().last().cloned()
    }
}

impl Observer for FigureRecorder {
    fn model_changed(&self, world: &World) -> Result<(), ObserverError> {
        let names = world.figures().iter().map(|c| c.name().to_string()).collect();
        self.frames.borrow_mut().push(names);
        Ok(())
    }
}

// ===========================================================================
// Canned worlds
// ===========================================================================

/// 800x600 floor with one charging station at (100,100) and a drained robot
/// whose center starts at (320,320).
pub fn charging_world() -> World {
    let mut w = World::new("Factory", 800, 600);
    w.add_charging_station("Station-0", Rect::new(100, 100, 100, 100));
    w.add_robot(RobotSpec::new("Robot-0", Position::new(300, 300)).battery(Fixed64::ZERO));
    w
}

/// A walled room with a door on its bottom wall and a pathfinding robot
/// inside it. Returns the world, the room, the door and the robot.
pub fn room_with_door() -> (World, EntityId, EntityId, EntityId) {
    let mut w = World::new("Factory", 400, 300);
    let room = w.add_room("Room-0", Rect::new(10, 10, 200, 150));
    let door = w
        .add_door(room, Position::new(60, 160), 60)
        .unwrap_or_else(|e| panic!("canned door placement failed: {e}"));
    let robot = w.add_robot(RobotSpec::new("Robot-0", Position::new(50, 50)).size(20, 20).pathfinding());
    (w, room, door, robot)
}

/// One room with a production machine and a conveyor outside it, each with
/// a visit point on the given anchor.
pub fn workshop(anchor: VisitAnchor) -> (World, EntityId, EntityId) {
    let mut w = World::new("Factory", 800, 600);
    let room = w.add_room("Room-0", Rect::new(10, 10, 400, 300));
    let machine = w
        .add_production_machine("Machine-0", room, Position::new(100, 100), 50)
        .unwrap_or_else(|e| panic!("canned machine placement failed: {e}"));
    let conveyor = w.add_conveyor("Conveyor-0", Rect::new(500, 100, 100, 300));
    let clearance = w.defaults().anchor_clearance;
    for id in [machine, conveyor] {
        w.set_visit_anchor(id, anchor, clearance)
            .unwrap_or_else(|e| panic!("canned anchor failed: {e}"));
    }
    (w, machine, conveyor)
}
