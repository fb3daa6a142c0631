//! Default parameters for entities created without explicit values.

use serde::{Deserialize, Serialize};

/// Defaults applied by the entity builders of [`crate::world::World`].
///
/// Every field is optional when deserialized; missing fields keep the
/// values of [`SimDefaults::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimDefaults {
    /// Side of a robot's square footprint.
    pub robot_size: i32,
    /// Distance a robot may cover per tick.
    pub robot_speed: i32,
    /// Battery capacity; larger capacities drain more slowly.
    pub robot_capacity: i32,
    /// Battery percent added per tick to a connected robot.
    pub charging_rate: f64,
    pub conveyor_rate: i32,
    pub production_rate: i32,
    /// Side of a production machine when none is given.
    pub machine_size: i32,
    pub door_thickness: i32,
    /// Clearance used when placing a visit point by anchor name.
    pub anchor_clearance: i32,
}

impl Default for SimDefaults {
    fn default() -> Self {
        Self {
            robot_size: 40,
            robot_speed: 10,
            robot_capacity: 1000,
            charging_rate: 10.0,
            conveyor_rate: 4,
            production_rate: 4,
            machine_size: 50,
            door_thickness: 5,
            anchor_clearance: 40,
        }
    }
}
