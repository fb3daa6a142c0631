//! Cosmetic display styles. Styles never influence simulation physics; they
//! exist so a presentation layer can tell entity phases apart.

use crate::fixed::Fixed64;
use serde::{Deserialize, Serialize};

/// Battery band a robot is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatteryLevel {
    Empty,
    Critical,
    Low,
    Medium,
    High,
    Full,
}

impl BatteryLevel {
    /// Band for a percentage in `[0, 100]`.
    pub fn from_percent(battery: Fixed64) -> Self {
        if battery <= Fixed64::ZERO {
            BatteryLevel::Empty
        } else if battery < Fixed64::from_num(25) {
            BatteryLevel::Critical
        } else if battery < Fixed64::from_num(50) {
            BatteryLevel::Low
        } else if battery < Fixed64::from_num(75) {
            BatteryLevel::Medium
        } else if battery < Fixed64::from_num(100) {
            BatteryLevel::High
        } else {
            BatteryLevel::Full
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Factory,
    Room,
    DoorClosed,
    DoorOpen,
    Charging,
    Conveyor,
    ConveyorAlt,
    ProductionActive,
    ProductionActiveAlt,
    ProductionInactive,
    Battery(BatteryLevel),
}

impl Style {
    pub(crate) fn hash_code(self) -> u32 {
        match self {
            Style::Factory => 0,
            Style::Room => 1,
            Style::DoorClosed => 2,
            Style::DoorOpen => 3,
            Style::Charging => 4,
            Style::Conveyor => 5,
            Style::ConveyorAlt => 6,
            Style::ProductionActive => 7,
            Style::ProductionActiveAlt => 8,
            Style::ProductionInactive => 9,
            Style::Battery(level) => 10 + level as u32,
        }
    }
}
