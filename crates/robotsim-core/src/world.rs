//! The world: owner of every entity, obstacle oracle and tick driver.
//!
//! Entities are registered once and never removed. They are stored in a
//! slotmap and remembered in registration order, which is also the order in
//! which [`World::tick`] runs their behaviors. Kind-specific builders and
//! operations live next to each kind (`room`, `door`, `charging`, `machine`,
//! `robot`); this module holds what they share.

use crate::charging::{self, ChargingStation};
use crate::component::{Component, VisitTarget, Visitable};
use crate::config::SimDefaults;
use crate::door::{self, Door};
use crate::error::{ObserverError, SimError};
use crate::geometry::{Bounds, Position, Probe, Rect, VisitAnchor};
use crate::id::EntityId;
use crate::machine::{self, Conveyor, ProductionMachine};
use crate::observer::{Observer, ObserverSet};
use crate::pathfinding::ObstacleMap;
use crate::robot::{self, Robot};
use crate::room::{self, Room};
use crate::sim::{SimState, StateHash};
use crate::style::Style;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::fmt;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Kind tag, cheap to copy out before dispatching on `&mut World`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Room,
    Door,
    ChargingStation,
    Conveyor,
    ProductionMachine,
    Robot,
}

impl Kind {
    pub fn label(self) -> &'static str {
        match self {
            Kind::Room => "room",
            Kind::Door => "door",
            Kind::ChargingStation => "charging station",
            Kind::Conveyor => "conveyor",
            Kind::ProductionMachine => "production machine",
            Kind::Robot => "robot",
        }
    }
}

/// Kind-specific state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Room(Room),
    Door(Door),
    ChargingStation(ChargingStation),
    Conveyor(Conveyor),
    ProductionMachine(ProductionMachine),
    Robot(Robot),
}

impl EntityKind {
    pub fn kind(&self) -> Kind {
        match self {
            EntityKind::Room(_) => Kind::Room,
            EntityKind::Door(_) => Kind::Door,
            EntityKind::ChargingStation(_) => Kind::ChargingStation,
            EntityKind::Conveyor(_) => Kind::Conveyor,
            EntityKind::ProductionMachine(_) => Kind::ProductionMachine,
            EntityKind::Robot(_) => Kind::Robot,
        }
    }
}

/// A registered entity: shared spatial record plus kind state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) component: Component,
    pub(crate) kind: EntityKind,
}

impl Entity {
    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Name as shown to users. Robots append their battery level.
    pub fn display_name(&self) -> String {
        match &self.kind {
            EntityKind::Robot(r) => r.display_name(&self.component.name),
            _ => self.component.name.clone(),
        }
    }

    pub fn as_room(&self) -> Option<&Room> {
        match &self.kind {
            EntityKind::Room(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_door(&self) -> Option<&Door> {
        match &self.kind {
            EntityKind::Door(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_charging_station(&self) -> Option<&ChargingStation> {
        match &self.kind {
            EntityKind::ChargingStation(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_conveyor(&self) -> Option<&Conveyor> {
        match &self.kind {
            EntityKind::Conveyor(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_production_machine(&self) -> Option<&ProductionMachine> {
        match &self.kind {
            EntityKind::ProductionMachine(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_robot(&self) -> Option<&Robot> {
        match &self.kind {
            EntityKind::Robot(r) => Some(r),
            _ => None,
        }
    }

    pub(crate) fn as_room_mut(&mut self) -> Option<&mut Room> {
        match &mut self.kind {
            EntityKind::Room(r) => Some(r),
            _ => None,
        }
    }

    pub(crate) fn as_door_mut(&mut self) -> Option<&mut Door> {
        match &mut self.kind {
            EntityKind::Door(d) => Some(d),
            _ => None,
        }
    }

    pub(crate) fn as_charging_station_mut(&mut self) -> Option<&mut ChargingStation> {
        match &mut self.kind {
            EntityKind::ChargingStation(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn as_conveyor_mut(&mut self) -> Option<&mut Conveyor> {
        match &mut self.kind {
            EntityKind::Conveyor(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn as_production_machine_mut(&mut self) -> Option<&mut ProductionMachine> {
        match &mut self.kind {
            EntityKind::ProductionMachine(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn as_robot_mut(&mut self) -> Option<&mut Robot> {
        match &mut self.kind {
            EntityKind::Robot(r) => Some(r),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// The floor plan and everything on it.
///
/// The world is itself described by a [`Component`] covering the floor
/// rectangle anchored at the origin. Every position it creates or mutates is
/// clamped to its [`Bounds`].
#[derive(Serialize, Deserialize)]
pub struct World {
    id: Option<String>,
    component: Component,
    bounds: Bounds,
    defaults: SimDefaults,
    entities: SlotMap<EntityId, Entity>,
    order: Vec<EntityId>,
    robots: Vec<EntityId>,
    state: SimState,
    #[serde(skip)]
    observers: ObserverSet,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("name", &self.component.name)
            .field("rect", &self.component.rect)
            .field("bounds", &self.bounds)
            .field("entities", &self.order.len())
            .field("robots", &self.robots.len())
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl World {
    /// An empty, stopped world of `width x height` without coordinate clamping.
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self::with_bounds(name, width, height, Bounds::unbounded())
    }

    pub fn with_bounds(name: impl Into<String>, width: i32, height: i32, bounds: Bounds) -> Self {
        Self {
            id: None,
            component: Component::new(name, Rect::new(0, 0, width, height), false, Style::Factory),
            bounds,
            defaults: SimDefaults::default(),
            entities: SlotMap::with_key(),
            order: Vec::new(),
            robots: Vec::new(),
            state: SimState::new(),
            observers: ObserverSet::default(),
        }
    }

    /// Replace the defaults used by builders called afterwards.
    pub fn with_defaults(mut self, defaults: SimDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn name(&self) -> &str {
        &self.component.name
    }

    pub fn width(&self) -> i32 {
        self.component.rect.width
    }

    pub fn height(&self) -> i32 {
        self.component.rect.height
    }

    /// The floor rectangle as a component.
    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn defaults(&self) -> &SimDefaults {
        &self.defaults
    }

    /// Persistence identifier, assigned on first successful persist.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.state.tick
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Clamp the anchor of `rect` into bounds, keeping its size.
    pub(crate) fn clamp_rect(&self, rect: Rect) -> Rect {
        let p = self.bounds.clamp(rect.anchor());
        Rect::new(p.x, p.y, rect.width, rect.height)
    }

    /// Append an entity. Registration does not notify.
    pub(crate) fn register(&mut self, component: Component, kind: EntityKind) -> EntityId {
        let is_robot = matches!(kind, EntityKind::Robot(_));
        let id = self.entities.insert(Entity { component, kind });
        self.order.push(id);
        if is_robot {
            self.robots.push(id);
        }
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.entities.get(id).map(|e| (id, e)))
    }

    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Robot ids in registration order.
    pub fn robots(&self) -> &[EntityId] {
        &self.robots
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn kind_of(&self, id: EntityId) -> Result<Kind, SimError> {
        Ok(self.get(id)?.kind.kind())
    }

    fn get(&self, id: EntityId) -> Result<&Entity, SimError> {
        self.entities.get(id).ok_or(SimError::UnknownEntity(id))
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, SimError> {
        self.entities.get_mut(id).ok_or(SimError::UnknownEntity(id))
    }

    pub fn entity_component(&self, id: EntityId) -> Result<&Component, SimError> {
        Ok(&self.get(id)?.component)
    }

    pub(crate) fn component_mut(&mut self, id: EntityId) -> Result<&mut Component, SimError> {
        Ok(&mut self.get_mut(id)?.component)
    }

    fn typed<'a, T: 'a>(
        &'a self,
        id: EntityId,
        expected: Kind,
        pick: fn(&'a Entity) -> Option<&'a T>,
    ) -> Result<&'a T, SimError> {
        pick(self.get(id)?).ok_or(SimError::WrongKind {
            id,
            expected: expected.label(),
        })
    }

    pub(crate) fn typed_mut<'a, T: 'a>(
        &'a mut self,
        id: EntityId,
        expected: Kind,
        pick: fn(&'a mut Entity) -> Option<&'a mut T>,
    ) -> Result<&'a mut T, SimError> {
        pick(self.get_mut(id)?).ok_or(SimError::WrongKind {
            id,
            expected: expected.label(),
        })
    }

    pub fn room(&self, id: EntityId) -> Result<&Room, SimError> {
        self.typed(id, Kind::Room, Entity::as_room)
    }

    pub fn door(&self, id: EntityId) -> Result<&Door, SimError> {
        self.typed(id, Kind::Door, Entity::as_door)
    }

    pub fn charging_station(&self, id: EntityId) -> Result<&ChargingStation, SimError> {
        self.typed(id, Kind::ChargingStation, Entity::as_charging_station)
    }

    pub fn conveyor(&self, id: EntityId) -> Result<&Conveyor, SimError> {
        self.typed(id, Kind::Conveyor, Entity::as_conveyor)
    }

    pub fn production_machine(&self, id: EntityId) -> Result<&ProductionMachine, SimError> {
        self.typed(id, Kind::ProductionMachine, Entity::as_production_machine)
    }

    pub fn robot(&self, id: EntityId) -> Result<&Robot, SimError> {
        self.typed(id, Kind::Robot, Entity::as_robot)
    }

    pub(crate) fn robot_mut(&mut self, id: EntityId) -> Result<&mut Robot, SimError> {
        self.typed_mut(id, Kind::Robot, Entity::as_robot_mut)
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Register an observer. Returns `false` if it was already registered.
    pub fn add_observer(&mut self, observer: Rc<dyn Observer>) -> bool {
        self.observers.add(observer)
    }

    /// Unregister an observer. Returns `false` if it was not registered.
    pub fn remove_observer(&mut self, observer: &Rc<dyn Observer>) -> bool {
        self.observers.remove(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Swap the observer set, returning the previous one.
    pub(crate) fn replace_observers(&mut self, observers: ObserverSet) -> ObserverSet {
        std::mem::replace(&mut self.observers, observers)
    }

    /// Call every observer now.
    pub fn notify_observers(&self) -> Result<(), ObserverError> {
        self.observers.notify(self)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Mark the simulation running. Returns `false` (and does not notify)
    /// when it already was.
    pub fn start_simulation(&mut self) -> Result<bool, ObserverError> {
        if self.state.running {
            return Ok(false);
        }
        self.state.running = true;
        tracing::info!(world = %self.component.name, tick = self.state.tick, "simulation started");
        self.notify_observers()?;
        Ok(true)
    }

    /// Mark the simulation stopped. Returns `false` (and does not notify)
    /// when it already was.
    pub fn stop_simulation(&mut self) -> Result<bool, ObserverError> {
        if !self.state.running {
            return Ok(false);
        }
        self.state.running = false;
        tracing::info!(world = %self.component.name, tick = self.state.tick, "simulation stopped");
        self.notify_observers()?;
        Ok(true)
    }

    /// Run every entity's behavior once, in registration order.
    ///
    /// An observer error aborts the tick at the failing notification; the
    /// tick counter is only advanced when every behavior completed.
    pub fn tick(&mut self) -> Result<(), SimError> {
        for i in 0..self.order.len() {
            let id = self.order[i];
            match self.kind_of(id)? {
                Kind::Room => {}
                Kind::Door => door::behave(self, id)?,
                Kind::ChargingStation => charging::behave(self, id)?,
                Kind::Conveyor => machine::behave_conveyor(self, id)?,
                Kind::ProductionMachine => machine::behave_production_machine(self, id)?,
                Kind::Robot => robot::behave(self, id)?,
            }
        }
        self.state.tick += 1;
        Ok(())
    }

    /// Drop every robot's pathfinder and path. The next tick rebuilds graphs
    /// against the current layout.
    pub fn invalidate_navigation(&mut self) {
        for &id in &self.robots {
            if let Some(r) = self.entities.get_mut(id).and_then(Entity::as_robot_mut) {
                r.pathfinder = None;
                r.path = None;
            }
        }
        tracing::debug!(robots = self.robots.len(), "navigation invalidated");
    }

    // -----------------------------------------------------------------------
    // Obstacles
    // -----------------------------------------------------------------------

    /// Whether any entity blocks the probe.
    pub fn is_obstacle(&self, probe: &Probe) -> bool {
        // Doors only answer for their room, which is consulted anyway.
        self.entities()
            .any(|(_, e)| !matches!(e.kind, EntityKind::Door(_)) && self.blocks(e, probe))
    }

    /// Whether one entity blocks the probe.
    pub fn entity_is_obstacle(&self, id: EntityId, probe: &Probe) -> bool {
        self.entities.get(id).is_some_and(|e| self.blocks(e, probe))
    }

    fn blocks(&self, e: &Entity, probe: &Probe) -> bool {
        match &e.kind {
            EntityKind::Room(r) => {
                e.component.obstacle && room::border_blocks(&e.component.rect, self.openings(r), probe)
            }
            EntityKind::Door(d) => self.entity_is_obstacle(d.room, probe),
            _ => e.component.obstacle && e.component.overlaps_probe(probe),
        }
    }

    fn openings<'a>(&'a self, room: &'a Room) -> impl Iterator<Item = (&'a Rect, &'a Door)> + 'a {
        room.doors.iter().filter_map(move |&id| {
            let e = self.entities.get(id)?;
            e.as_door().map(|d| (&e.component.rect, d))
        })
    }

    // -----------------------------------------------------------------------
    // Visits
    // -----------------------------------------------------------------------

    /// Resolve a visit target. `None` for an unknown entity.
    pub fn visit_point(&self, target: &VisitTarget) -> Option<Position> {
        match target {
            VisitTarget::Position(p) => Some(*p),
            VisitTarget::Entity(id) => self.entities.get(*id).map(|e| e.component.visit_point()),
        }
    }

    pub fn visit_name(&self, target: &VisitTarget) -> Option<String> {
        match target {
            VisitTarget::Position(p) => Some(p.visit_name()),
            VisitTarget::Entity(id) => self.entities.get(*id).map(|e| e.component.visit_name()),
        }
    }

    pub fn offers_charging(&self, target: &VisitTarget) -> bool {
        match target {
            VisitTarget::Position(p) => p.offers_charging(),
            VisitTarget::Entity(id) => self
                .entities
                .get(*id)
                .is_some_and(|e| e.component.offers_charging()),
        }
    }

    /// The charging-capable entity closest to `id` (center to center).
    /// On an exact tie the later-registered station wins.
    pub fn nearest_charging_station(&self, id: EntityId) -> Option<EntityId> {
        let from = self.entities.get(id)?.component.rect;
        let mut best: Option<(f64, EntityId)> = None;
        for (sid, e) in self.entities() {
            if !e.component.charging {
                continue;
            }
            let d = from.distance_to(&e.component.rect);
            if best.is_none_or(|(bd, _)| d <= bd) {
                best = Some((d, sid));
            }
        }
        best.map(|(_, sid)| sid)
    }

    /// Presentation list: the world itself, then every entity in
    /// registration order.
    pub fn figures(&self) -> Vec<&Component> {
        std::iter::once(&self.component)
            .chain(self.entities().map(|(_, e)| &e.component))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Shared mutators
    // -----------------------------------------------------------------------

    /// Move an entity's top-left anchor (clamped to bounds).
    pub fn set_position(&mut self, id: EntityId, anchor: Position) -> Result<(), SimError> {
        let anchor = self.bounds.clamp(anchor);
        let c = self.component_mut(id)?;
        c.rect.x = anchor.x;
        c.rect.y = anchor.y;
        self.notify_observers()?;
        Ok(())
    }

    /// Move an entity so its center lands on `center` (anchor clamped).
    pub fn set_center(&mut self, id: EntityId, center: Position) -> Result<(), SimError> {
        let rect = self.entity_component(id)?.rect;
        self.set_position(id, center.offset(-rect.width / 2, -rect.height / 2))
    }

    pub fn set_size(&mut self, id: EntityId, width: i32, height: i32) -> Result<(), SimError> {
        let c = self.component_mut(id)?;
        c.rect.width = width;
        c.rect.height = height;
        self.notify_observers()?;
        Ok(())
    }

    pub fn set_style(&mut self, id: EntityId, style: Style) -> Result<(), SimError> {
        self.component_mut(id)?.style = style;
        self.notify_observers()?;
        Ok(())
    }

    pub fn set_visit_point(&mut self, id: EntityId, visit: Position) -> Result<(), SimError> {
        let visit = self.bounds.clamp(visit);
        self.component_mut(id)?.visit = visit;
        self.notify_observers()?;
        Ok(())
    }

    /// Place the visit point next to the named side, `clearance / 2 + 1`
    /// away from it.
    pub fn set_visit_anchor(
        &mut self,
        id: EntityId,
        anchor: VisitAnchor,
        clearance: i32,
    ) -> Result<(), SimError> {
        let rect = self.entity_component(id)?.rect;
        self.set_visit_point(id, rect.anchor_point(anchor, clearance))
    }

    // -----------------------------------------------------------------------
    // Hashing
    // -----------------------------------------------------------------------

    /// Deterministic hash over geometry and behavioral state.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.state.tick);
        h.write_bool(self.state.running);
        for (_, e) in self.entities() {
            h.write_rect(&e.component.rect);
            h.write_position(e.component.visit);
            h.write_u64(e.component.style.hash_code() as u64);
            match &e.kind {
                EntityKind::Room(r) => h.write_u64(r.doors.len() as u64),
                EntityKind::Door(d) => h.write_bool(d.open),
                EntityKind::ChargingStation(s) => h.write_u64(s.connected.len() as u64),
                EntityKind::Conveyor(c) => h.write_bool(c.active),
                EntityKind::ProductionMachine(m) => h.write_bool(m.active),
                EntityKind::Robot(r) => {
                    h.write_fixed64(r.battery);
                    h.write_bool(r.need_charging);
                    h.write_bool(r.held);
                    h.write_u64(r.cursor as u64);
                    h.write_u64(r.visits.len() as u64);
                }
            }
        }
        h.finish()
    }
}

impl ObstacleMap for World {
    fn is_obstacle(&self, probe: &Probe) -> bool {
        World::is_obstacle(self, probe)
    }
}
