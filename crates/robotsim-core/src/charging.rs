//! Charging stations: recharge robots that need it, holding them in place
//! until full.

use crate::component::Component;
use crate::error::SimError;
use crate::fixed::{Fixed64, f64_to_fixed64, full_charge};
use crate::geometry::Rect;
use crate::id::EntityId;
use crate::style::Style;
use crate::world::{Entity, EntityKind, Kind, World};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub(crate) rate: Fixed64,
    /// Connected robots in connection order, without duplicates.
    pub(crate) connected: Vec<EntityId>,
}

impl ChargingStation {
    /// Battery percent added per tick.
    pub fn rate(&self) -> Fixed64 {
        self.rate
    }

    pub fn connected(&self) -> &[EntityId] {
        &self.connected
    }

    pub fn is_connected(&self, robot: EntityId) -> bool {
        self.connected.contains(&robot)
    }
}

impl World {
    /// Register a charging station with the default rate.
    pub fn add_charging_station(&mut self, name: impl Into<String>, rect: Rect) -> EntityId {
        let rate = self.defaults().charging_rate;
        self.add_charging_station_with_rate(name, rect, rate)
    }

    /// Register a charging station adding `rate` percent per tick. The rate
    /// saturates to the fixed-point range and NaN counts as zero.
    pub fn add_charging_station_with_rate(
        &mut self,
        name: impl Into<String>,
        rect: Rect,
        rate: f64,
    ) -> EntityId {
        let mut component = Component::new(name, self.clamp_rect(rect), false, Style::Charging);
        component.charging = true;
        let station = ChargingStation {
            rate: f64_to_fixed64(rate),
            connected: Vec::new(),
        };
        self.register(component, EntityKind::ChargingStation(station))
    }

    /// Connect `robot` to `station` and hold it. Returns `false` when it was
    /// already connected.
    pub fn connect_robot(&mut self, station: EntityId, robot: EntityId) -> Result<bool, SimError> {
        self.robot(robot)?;
        let s = self.typed_mut(station, Kind::ChargingStation, Entity::as_charging_station_mut)?;
        if s.connected.contains(&robot) {
            return Ok(false);
        }
        s.connected.push(robot);
        tracing::debug!(?station, ?robot, "robot connected to charging station");
        self.hold(robot)?;
        self.notify_observers()?;
        Ok(true)
    }

    /// Disconnect `robot`, clear its charging need and release it. Returns
    /// `false` when it was not connected.
    pub fn disconnect_robot(&mut self, station: EntityId, robot: EntityId) -> Result<bool, SimError> {
        let s = self.typed_mut(station, Kind::ChargingStation, Entity::as_charging_station_mut)?;
        let before = s.connected.len();
        s.connected.retain(|&r| r != robot);
        if s.connected.len() == before {
            return Ok(false);
        }
        tracing::debug!(?station, ?robot, "robot disconnected from charging station");
        self.set_need_charging(robot, false)?;
        self.release(robot)?;
        Ok(true)
    }
}

/// Charge connected robots, then connect robots that overlap the station and
/// need charging.
pub(crate) fn behave(world: &mut World, id: EntityId) -> Result<(), SimError> {
    let station = world.charging_station(id)?;
    let rate = station.rate;
    let connected = station.connected.clone();

    for robot in connected {
        let battery = world.robot(robot)?.battery() + rate;
        world.set_battery(robot, battery)?;
        if battery >= full_charge() {
            world.disconnect_robot(id, robot)?;
        }
    }

    let rect = world.entity_component(id)?.rect();
    let waiting: Vec<EntityId> = world
        .robots()
        .iter()
        .copied()
        .filter(|&r| {
            world.entity(r).is_some_and(|e| {
                e.component().rect().overlaps(&rect) && e.as_robot().is_some_and(|rb| rb.need_charging())
            })
        })
        .collect();
    for robot in waiting {
        world.connect_robot(id, robot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::robot::RobotSpec;
    use crate::test_utils::fixed;

    fn station_and_robot(battery: f64) -> (World, EntityId, EntityId) {
        let mut w = World::new("Factory", 800, 600);
        let station = w.add_charging_station("Station-0", Rect::new(100, 100, 100, 100));
        let robot = w.add_robot(RobotSpec::new("Robot-0", Position::new(130, 130)).battery(fixed(battery)));
        (w, station, robot)
    }

    #[test]
    fn connect_holds_and_is_idempotent() {
        let (mut w, station, robot) = station_and_robot(45.0);
        assert!(w.connect_robot(station, robot).unwrap());
        assert!(!w.connect_robot(station, robot).unwrap());
        assert!(w.robot(robot).unwrap().is_held());
        assert_eq!(w.charging_station(station).unwrap().connected(), &[robot]);
    }

    #[test]
    fn disconnect_clears_need_and_releases() {
        let (mut w, station, robot) = station_and_robot(45.0);
        w.connect_robot(station, robot).unwrap();
        w.set_need_charging(robot, true).unwrap();
        assert!(w.disconnect_robot(station, robot).unwrap());
        assert!(!w.disconnect_robot(station, robot).unwrap());
        let r = w.robot(robot).unwrap();
        assert!(!r.is_held());
        assert!(!r.need_charging());
    }

    #[test]
    fn charges_until_full_then_disconnects() {
        let (mut w, station, robot) = station_and_robot(45.0);
        w.connect_robot(station, robot).unwrap();
        for _ in 0..5 {
            w.tick().unwrap();
        }
        assert_eq!(w.robot(robot).unwrap().battery(), fixed(95.0));
        assert!(w.charging_station(station).unwrap().is_connected(robot));

        w.tick().unwrap();
        assert_eq!(w.robot(robot).unwrap().battery(), fixed(100.0));
        assert!(!w.charging_station(station).unwrap().is_connected(robot));
        assert!(!w.robot(robot).unwrap().is_held());
    }

    #[test]
    fn overlapping_robot_without_need_is_ignored() {
        let (mut w, station, robot) = station_and_robot(45.0);
        w.tick().unwrap();
        assert!(!w.charging_station(station).unwrap().is_connected(robot));
    }

    #[test]
    fn overlapping_robot_in_need_is_connected() {
        let (mut w, station, robot) = station_and_robot(45.0);
        w.set_need_charging(robot, true).unwrap();
        w.tick().unwrap();
        assert!(w.charging_station(station).unwrap().is_connected(robot));
        assert!(w.robot(robot).unwrap().is_held());
    }

    #[test]
    fn station_offers_charging() {
        let (w, station, _) = station_and_robot(45.0);
        assert!(w.offers_charging(&station.into()));
    }

    #[test]
    fn unrepresentable_rates_saturate() {
        let mut w = World::new("Factory", 800, 600);
        let nan = w.add_charging_station_with_rate("a", Rect::new(0, 0, 10, 10), f64::NAN);
        let inf = w.add_charging_station_with_rate("b", Rect::new(20, 0, 10, 10), f64::INFINITY);
        assert_eq!(w.charging_station(nan).unwrap().rate(), Fixed64::ZERO);
        assert_eq!(w.charging_station(inf).unwrap().rate(), Fixed64::MAX);
    }
}
