//! Conveyors and production machines.
//!
//! Both are fixed obstacles with a cosmetic two-phase animation: while no
//! robot stands on the visit point they alternate between two styles each
//! tick, and they pause while one does.

use crate::component::Component;
use crate::error::{PlacementError, SimError};
use crate::geometry::{Position, Rect};
use crate::id::EntityId;
use crate::style::Style;
use crate::world::{Entity, EntityKind, Kind, World};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conveyor {
    pub(crate) rate: i32,
    pub(crate) active: bool,
}

impl Conveyor {
    pub fn rate(&self) -> i32 {
        self.rate
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionMachine {
    pub(crate) room: EntityId,
    pub(crate) rate: i32,
    pub(crate) active: bool,
}

impl ProductionMachine {
    /// The room the machine was placed in.
    pub fn room(&self) -> EntityId {
        self.room
    }

    pub fn rate(&self) -> i32 {
        self.rate
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

fn alternate(style: Style, a: Style, b: Style) -> Style {
    if style == a { b } else { a }
}

impl World {
    /// Register a conveyor with the default rate. Starts inactive.
    pub fn add_conveyor(&mut self, name: impl Into<String>, rect: Rect) -> EntityId {
        let rate = self.defaults().conveyor_rate;
        self.add_conveyor_with_rate(name, rect, rate)
    }

    pub fn add_conveyor_with_rate(&mut self, name: impl Into<String>, rect: Rect, rate: i32) -> EntityId {
        let component = Component::new(name, self.clamp_rect(rect), true, Style::Conveyor);
        self.register(component, EntityKind::Conveyor(Conveyor { rate, active: false }))
    }

    /// Register a square production machine of side `size` anchored at `at`
    /// inside `room`, with the default rate. Starts active.
    pub fn add_production_machine(
        &mut self,
        name: impl Into<String>,
        room: EntityId,
        at: Position,
        size: i32,
    ) -> Result<EntityId, PlacementError> {
        let rate = self.defaults().production_rate;
        self.add_production_machine_with_rate(name, room, at, size, rate)
    }

    /// Fails with [`PlacementError::MachineOutsideRoom`] unless all four
    /// corners lie inside the room.
    pub fn add_production_machine_with_rate(
        &mut self,
        name: impl Into<String>,
        room: EntityId,
        at: Position,
        size: i32,
        rate: i32,
    ) -> Result<EntityId, PlacementError> {
        let room_component = match self.entity(room) {
            Some(e) if e.as_room().is_some() => e.component(),
            _ => return Err(PlacementError::NotARoom(room)),
        };
        let rect = self.clamp_rect(Rect::new(at.x, at.y, size, size));
        let component = Component::new(name, rect, true, Style::ProductionActive);
        if !room_component.contains(&component) {
            return Err(PlacementError::MachineOutsideRoom {
                machine: component.name,
                room: room_component.name().to_string(),
            });
        }
        let machine = ProductionMachine {
            room,
            rate,
            active: true,
        };
        Ok(self.register(component, EntityKind::ProductionMachine(machine)))
    }

    /// Advance the conveyor animation, or start it. Always notifies.
    pub fn activate_conveyor(&mut self, id: EntityId) -> Result<(), SimError> {
        let style = self.entity_component(id)?.style();
        let c = self.typed_mut(id, Kind::Conveyor, Entity::as_conveyor_mut)?;
        if c.active {
            self.component_mut(id)?.style = alternate(style, Style::Conveyor, Style::ConveyorAlt);
        } else {
            c.active = true;
        }
        self.notify_observers()?;
        Ok(())
    }

    /// Pause the conveyor. Always notifies.
    pub fn deactivate_conveyor(&mut self, id: EntityId) -> Result<(), SimError> {
        self.typed_mut(id, Kind::Conveyor, Entity::as_conveyor_mut)?.active = false;
        self.notify_observers()?;
        Ok(())
    }

    /// Advance the machine animation, or restart it. Always notifies.
    pub fn activate_production_machine(&mut self, id: EntityId) -> Result<(), SimError> {
        let style = self.entity_component(id)?.style();
        let m = self.typed_mut(id, Kind::ProductionMachine, Entity::as_production_machine_mut)?;
        let next = if m.active {
            alternate(style, Style::ProductionActive, Style::ProductionActiveAlt)
        } else {
            m.active = true;
            Style::ProductionActive
        };
        self.component_mut(id)?.style = next;
        self.notify_observers()?;
        Ok(())
    }

    /// Pause the machine. Notifies only when it was running.
    pub fn deactivate_production_machine(&mut self, id: EntityId) -> Result<(), SimError> {
        let m = self.typed_mut(id, Kind::ProductionMachine, Entity::as_production_machine_mut)?;
        if !m.active {
            return Ok(());
        }
        m.active = false;
        self.component_mut(id)?.style = Style::ProductionInactive;
        self.notify_observers()?;
        Ok(())
    }

    /// Whether a robot's center sits exactly on the entity's visit point.
    pub fn is_visit_point_occupied(&self, id: EntityId) -> Result<bool, SimError> {
        let visit = self.entity_component(id)?.visit;
        Ok(self
            .robots()
            .iter()
            .filter_map(|&r| self.entity(r))
            .any(|e| e.component().center() == visit))
    }
}

pub(crate) fn behave_conveyor(world: &mut World, id: EntityId) -> Result<(), SimError> {
    if world.is_visit_point_occupied(id)? {
        world.deactivate_conveyor(id)
    } else {
        world.activate_conveyor(id)
    }
}

pub(crate) fn behave_production_machine(world: &mut World, id: EntityId) -> Result<(), SimError> {
    if world.is_visit_point_occupied(id)? {
        world.deactivate_production_machine(id)
    } else {
        world.activate_production_machine(id)
    }
}
