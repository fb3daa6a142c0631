//! Serde structs for scene files.
//!
//! A scene describes one factory floor: its size and bounds, the defaults
//! used for anything left unspecified, and every room, door, machine,
//! station, conveyor and robot on it. Entities are named by scene ids that
//! other entries reference (a door names its room, a robot names the
//! entities it visits).

use robotsim_core::config::SimDefaults;
use robotsim_core::geometry::Rect;
use serde::{Deserialize, Serialize};

// ===========================================================================
// Scene
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneData {
    pub name: String,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub bounds: Option<BoundsData>,
    #[serde(default)]
    pub defaults: SimDefaults,
    #[serde(default)]
    pub placement_policy: PlacementPolicy,
    #[serde(default)]
    pub rooms: Vec<RoomData>,
    #[serde(default)]
    pub doors: Vec<DoorData>,
    #[serde(default)]
    pub machines: Vec<MachineData>,
    #[serde(default)]
    pub stations: Vec<StationData>,
    #[serde(default)]
    pub conveyors: Vec<ConveyorData>,
    #[serde(default)]
    pub robots: Vec<RobotData>,
}

/// Inclusive coordinate clamp. An inverted range leaves that axis unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoundsData {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

/// What to do with a door or machine that cannot be placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Log and continue without the entity.
    #[default]
    Skip,
    /// Fail the whole load.
    Abort,
}

// ===========================================================================
// Fixed entities
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoomData {
    pub id: String,
    pub rect: Rect,
}

/// A door carved into `room` at `(x, y)`, which must be on the room's wall.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DoorData {
    pub room: String,
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

/// A square production machine anchored at `(x, y)` inside `room`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MachineData {
    pub id: String,
    pub room: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub size: Option<i32>,
    #[serde(default)]
    pub rate: Option<i32>,
    /// Visit anchor name such as `"top"` or `"d-top-left"`.
    #[serde(default)]
    pub visit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationData {
    pub id: String,
    pub rect: Rect,
    #[serde(default)]
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConveyorData {
    pub id: String,
    pub rect: Rect,
    #[serde(default)]
    pub rate: Option<i32>,
    #[serde(default)]
    pub visit: Option<String>,
}

// ===========================================================================
// Robots
// ===========================================================================

/// A robot anchored (top-left) at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RobotData {
    pub id: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub speed: Option<i32>,
    #[serde(default)]
    pub capacity: Option<i32>,
    /// Initial battery percent.
    #[serde(default)]
    pub battery: Option<f64>,
    #[serde(default)]
    pub pathfinding: bool,
    #[serde(default)]
    pub visits: Vec<VisitData>,
}

/// One entry of a robot's visit queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum VisitData {
    /// A fixed floor position.
    At { x: i32, y: i32 },
    /// The visit point of the entity with this scene id.
    Entity(String),
}
