//! Robots: battery-powered agents that work through a queue of visits.
//!
//! Per tick a robot:
//!
//! 1. on an empty battery, flags itself as needing charge and, unless it is
//!    already heading somewhere that can charge it, inserts the nearest
//!    charging station as its next stop;
//! 2. does nothing else while held;
//! 3. otherwise travels toward its current visit point, either in a straight
//!    line (capped at `speed` per tick) or along a path from a shared
//!    navigation graph, spending battery for the distance covered.

use crate::component::{Component, VisitTarget};
use crate::error::SimError;
use crate::fixed::{Fixed64, clamp_percent, fixed64_to_f64, full_charge};
use crate::geometry::{Footprint, Position, Rect};
use crate::id::EntityId;
use crate::pathfinding::{Path, PathFinder};
use crate::style::{BatteryLevel, Style};
use crate::world::{EntityKind, World};
use serde::{Deserialize, Serialize};

/// Travel budget kept back per tick so a path hop never overshoots `speed`.
const STEP_EPSILON: f64 = 1.41;

/// Battery drain divisor applied to `speed`.
const DRAIN_DIVISOR: f64 = 13.0;

/// How a robot reaches its visit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Navigation {
    /// Straight line, ignoring obstacles.
    Direct,
    /// Shortest path on a navigation graph built for the robot's footprint.
    Pathfinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub(crate) speed: i32,
    pub(crate) capacity: i32,
    pub(crate) battery: Fixed64,
    pub(crate) need_charging: bool,
    pub(crate) held: bool,
    pub(crate) visits: Vec<VisitTarget>,
    pub(crate) cursor: usize,
    pub(crate) navigation: Navigation,
    #[serde(skip)]
    pub(crate) pathfinder: Option<PathFinder>,
    #[serde(skip)]
    pub(crate) path: Option<Path>,
}

impl Robot {
    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Battery percent in `[0, 100]`.
    pub fn battery(&self) -> Fixed64 {
        self.battery
    }

    pub fn need_charging(&self) -> bool {
        self.need_charging
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn navigation(&self) -> Navigation {
        self.navigation
    }

    pub fn visits(&self) -> &[VisitTarget] {
        &self.visits
    }

    /// Index of the current visit. Never exceeds the queue length.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pathfinder(&self) -> Option<&PathFinder> {
        self.pathfinder.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// The visit at the cursor. Once the queue is used up the robot parks on
    /// its first entry; an empty queue has no current visit.
    pub fn current_visit(&self) -> Option<VisitTarget> {
        self.visits
            .get(self.cursor)
            .or_else(|| self.visits.first())
            .copied()
    }

    /// `name(xx.x%)`.
    pub fn display_name(&self, name: &str) -> String {
        format!("{name}({:.1}%)", fixed64_to_f64(self.battery))
    }

    fn advance_cursor(&mut self) {
        if self.cursor < self.visits.len() {
            self.cursor += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// RobotSpec
// ---------------------------------------------------------------------------

/// Parameters for [`World::add_robot`]. Unset values come from the world's
/// [`crate::config::SimDefaults`].
#[derive(Debug, Clone, PartialEq)]
pub struct RobotSpec {
    pub name: String,
    /// Top-left anchor.
    pub anchor: Position,
    pub footprint: Option<Footprint>,
    pub speed: Option<i32>,
    pub capacity: Option<i32>,
    pub battery: Option<Fixed64>,
    pub navigation: Navigation,
}

impl RobotSpec {
    pub fn new(name: impl Into<String>, anchor: Position) -> Self {
        Self {
            name: name.into(),
            anchor,
            footprint: None,
            speed: None,
            capacity: None,
            battery: None,
            navigation: Navigation::Direct,
        }
    }

    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.footprint = Some(Footprint::new(width, height));
        self
    }

    pub fn speed(mut self, speed: i32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn capacity(mut self, capacity: i32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn battery(mut self, battery: Fixed64) -> Self {
        self.battery = Some(battery);
        self
    }

    pub fn navigation(mut self, navigation: Navigation) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn pathfinding(self) -> Self {
        self.navigation(Navigation::Pathfinding)
    }
}

// ---------------------------------------------------------------------------
// World operations
// ---------------------------------------------------------------------------

impl World {
    pub fn add_robot(&mut self, spec: RobotSpec) -> EntityId {
        let d = self.defaults();
        let footprint = spec.footprint.unwrap_or(Footprint::square(d.robot_size));
        let speed = spec.speed.unwrap_or(d.robot_speed);
        let capacity = spec.capacity.unwrap_or(d.robot_capacity);
        let battery = clamp_percent(spec.battery.unwrap_or_else(full_charge));

        let rect = self.clamp_rect(Rect::new(
            spec.anchor.x,
            spec.anchor.y,
            footprint.width,
            footprint.height,
        ));
        let style = Style::Battery(BatteryLevel::from_percent(battery));
        let component = Component::new(spec.name, rect, false, style);
        let robot = Robot {
            speed,
            capacity,
            battery,
            need_charging: false,
            held: false,
            visits: Vec::new(),
            cursor: 0,
            navigation: spec.navigation,
            pathfinder: None,
            path: None,
        };
        self.register(component, EntityKind::Robot(robot))
    }

    /// Set the battery (clamped to `[0, 100]`) and the matching style.
    pub fn set_battery(&mut self, id: EntityId, battery: Fixed64) -> Result<(), SimError> {
        let battery = clamp_percent(battery);
        self.robot_mut(id)?.battery = battery;
        self.component_mut(id)?.style = Style::Battery(BatteryLevel::from_percent(battery));
        self.notify_observers()?;
        Ok(())
    }

    pub fn set_speed(&mut self, id: EntityId, speed: i32) -> Result<(), SimError> {
        self.robot_mut(id)?.speed = speed;
        self.notify_observers()?;
        Ok(())
    }

    pub(crate) fn set_need_charging(&mut self, id: EntityId, need: bool) -> Result<(), SimError> {
        let r = self.robot_mut(id)?;
        if r.need_charging != need {
            r.need_charging = need;
            self.notify_observers()?;
        }
        Ok(())
    }

    /// Suspend all travel. Notifies only on change.
    pub fn hold(&mut self, id: EntityId) -> Result<(), SimError> {
        let r = self.robot_mut(id)?;
        if !r.held {
            r.held = true;
            self.notify_observers()?;
        }
        Ok(())
    }

    /// Resume travel and move on to the next visit. Notifies only on change.
    pub fn release(&mut self, id: EntityId) -> Result<(), SimError> {
        let r = self.robot_mut(id)?;
        if r.held {
            r.held = false;
            r.advance_cursor();
            self.notify_observers()?;
        }
        Ok(())
    }

    /// Append a visit to the queue.
    pub fn add_visit(&mut self, id: EntityId, target: impl Into<VisitTarget>) -> Result<(), SimError> {
        self.robot_mut(id)?.visits.push(target.into());
        self.notify_observers()?;
        Ok(())
    }

    /// Append several visits with a single notification.
    pub fn add_visits(
        &mut self,
        id: EntityId,
        targets: impl IntoIterator<Item = VisitTarget>,
    ) -> Result<(), SimError> {
        self.robot_mut(id)?.visits.extend(targets);
        self.notify_observers()?;
        Ok(())
    }

    /// Make `target` the immediate next stop without dropping the rest of
    /// the queue.
    ///
    /// When the robot is currently heading for the first entry of its queue,
    /// that entry is duplicated in front so the robot still returns to it
    /// afterwards.
    pub fn add_visit_next(&mut self, id: EntityId, target: impl Into<VisitTarget>) -> Result<(), SimError> {
        let r = self.robot_mut(id)?;
        if let Some(&first) = r.visits.first()
            && r.current_visit() == Some(first)
        {
            r.visits.insert(0, first);
            r.cursor += 1;
        }
        let at = r.cursor.min(r.visits.len());
        r.visits.insert(at, target.into());
        self.notify_observers()?;
        Ok(())
    }

    pub fn current_visit(&self, id: EntityId) -> Result<Option<VisitTarget>, SimError> {
        Ok(self.robot(id)?.current_visit())
    }

    /// Move one straight-line step toward `goal`: snap onto it when within
    /// `speed`, otherwise advance `speed` units (truncated to the grid).
    /// Drains the battery for the distance covered and returns it.
    pub fn step_toward(&mut self, id: EntityId, goal: Position) -> Result<f64, SimError> {
        let center = self.entity_component(id)?.center();
        let r = self.robot(id)?;
        let (speed, capacity, battery) = (r.speed, r.capacity.max(1), r.battery);

        let (vx, vy) = ((goal.x - center.x) as i64, (goal.y - center.y) as i64);
        let norm_sq = vx * vx + vy * vy;
        let next = if norm_sq <= (speed as i64) * (speed as i64) {
            goal
        } else {
            let norm = (norm_sq as f64).sqrt();
            Position::new(
                center.x + (speed as f64 * vx as f64 / norm) as i32,
                center.y + (speed as f64 * vy as f64 / norm) as i32,
            )
        };

        let moved = center.distance(&next);
        self.set_center(id, next)?;
        let cost = (speed as f64 / DRAIN_DIVISOR) * (moved * 100.0 / capacity as f64);
        self.set_battery(id, battery - Fixed64::saturating_from_num(cost))?;
        Ok(moved)
    }
}

// ---------------------------------------------------------------------------
// Behavior
// ---------------------------------------------------------------------------

pub(crate) fn behave(world: &mut World, id: EntityId) -> Result<(), SimError> {
    if world.robot(id)?.battery == Fixed64::ZERO {
        world.set_need_charging(id, true)?;
        seek_charging(world, id)?;
    }
    match world.robot(id)?.navigation {
        Navigation::Direct => behave_direct(world, id),
        Navigation::Pathfinding => behave_pathfinding(world, id),
    }
}

fn seek_charging(world: &mut World, id: EntityId) -> Result<(), SimError> {
    let current = world.robot(id)?.current_visit();
    if current.is_some_and(|t| world.offers_charging(&t)) {
        return Ok(());
    }
    match world.nearest_charging_station(id) {
        Some(station) => {
            tracing::debug!(robot = ?id, ?station, "battery empty, heading to charging station");
            world.add_visit_next(id, station)
        }
        None => {
            tracing::warn!(robot = ?id, "battery empty and no charging station in the world");
            Ok(())
        }
    }
}

fn behave_direct(world: &mut World, id: EntityId) -> Result<(), SimError> {
    let r = world.robot(id)?;
    if r.held {
        return Ok(());
    }
    let Some(target) = r.current_visit() else {
        return Ok(());
    };
    let Some(goal) = world.visit_point(&target) else {
        return Ok(());
    };
    if world.entity_component(id)?.center() == goal {
        world.robot_mut(id)?.advance_cursor();
        Ok(())
    } else {
        world.step_toward(id, goal).map(|_| ())
    }
}

fn behave_pathfinding(world: &mut World, id: EntityId) -> Result<(), SimError> {
    ensure_pathfinder(world, id)?;

    let r = world.robot(id)?;
    if r.held {
        return Ok(());
    }
    let current = r.current_visit();
    let stale = r.path.as_ref().is_none_or(|p| Some(p.target()) != current);
    if stale {
        let Some(target) = current else {
            return Ok(());
        };
        let Some(finder) = r.pathfinder.clone() else {
            return Ok(());
        };
        let Some(goal) = world.visit_point(&target) else {
            return Ok(());
        };
        let start = world.entity_component(id)?.center();
        let path = finder.find_path(start, goal, target);
        if path.is_unreachable() {
            tracing::debug!(robot = ?id, ?start, ?goal, "no route, robot blocked this tick");
            return Ok(());
        }
        world.robot_mut(id)?.path = Some(path);
    }

    let speed = world.robot(id)?.speed as f64;
    let mut path = world.robot_mut(id)?.path.take();
    let walked = walk(world, id, &mut path, speed);
    world.robot_mut(id)?.path = path;
    walked
}

/// Hop along path vertices until the tick's travel budget is spent. A fully
/// walked path advances the cursor and is dropped.
fn walk(world: &mut World, id: EntityId, path: &mut Option<Path>, speed: f64) -> Result<(), SimError> {
    let mut travelled = 0.0;
    while travelled + STEP_EPSILON < speed {
        let Some(p) = path.as_mut() else {
            break;
        };
        let Some(next) = p.next_position() else {
            world.robot_mut(id)?.advance_cursor();
            *path = None;
            break;
        };
        travelled += world.step_toward(id, next)?;
        p.advance();
    }
    Ok(())
}

/// Give the robot a pathfinder: share the graph of another robot with the
/// same footprint, or build one over the floor.
fn ensure_pathfinder(world: &mut World, id: EntityId) -> Result<(), SimError> {
    if world.robot(id)?.pathfinder.is_some() {
        return Ok(());
    }
    let footprint = world.entity_component(id)?.footprint();
    let shared = world
        .robots()
        .iter()
        .filter(|&&other| other != id)
        .filter_map(|&other| world.entity(other)?.as_robot()?.pathfinder.as_ref())
        .find(|f| f.footprint() == footprint)
        .cloned();
    let finder = match shared {
        Some(f) => {
            tracing::debug!(robot = ?id, ?footprint, "reusing shared navigation graph");
            f
        }
        None => PathFinder::build(&*world, world.component().rect(), footprint),
    };
    world.robot_mut(id)?.pathfinder = Some(finder);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CountingObserver, fixed};
    use std::rc::Rc;

    fn world_with_robot(spec: RobotSpec) -> (World, EntityId) {
        let mut w = World::new("Factory", 800, 600);
        let id = w.add_robot(spec);
        (w, id)
    }

    fn center(w: &World, id: EntityId) -> Position {
        w.entity_component(id).unwrap().center()
    }

    #[test]
    fn defaults_apply() {
        let (w, id) = world_with_robot(RobotSpec::new("Robot-0", Position::new(80, 80)));
        let r = w.robot(id).unwrap();
        assert_eq!(r.speed(), 10);
        assert_eq!(r.capacity(), 1000);
        assert_eq!(r.battery(), full_charge());
        assert_eq!(center(&w, id), Position::new(100, 100));
        assert_eq!(
            w.entity_component(id).unwrap().style(),
            Style::Battery(BatteryLevel::Full)
        );
    }

    #[test]
    fn display_name_shows_battery() {
        let (w, id) = world_with_robot(RobotSpec::new("Robot-0", Position::new(0, 0)).battery(fixed(45.0)));
        assert_eq!(w.entity(id).unwrap().display_name(), "Robot-0(45.0%)");
    }

    #[test]
    fn battery_is_clamped() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(0, 0)));
        w.set_battery(id, fixed(150.0)).unwrap();
        assert_eq!(w.robot(id).unwrap().battery(), fixed(100.0));
        w.set_battery(id, fixed(-5.0)).unwrap();
        assert_eq!(w.robot(id).unwrap().battery(), Fixed64::ZERO);
        assert_eq!(
            w.entity_component(id).unwrap().style(),
            Style::Battery(BatteryLevel::Empty)
        );
    }

    #[test]
    fn current_visit_parks_on_first_entry() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(0, 0)));
        assert_eq!(w.current_visit(id).unwrap(), None);
        let a = VisitTarget::Position(Position::new(10, 10));
        let b = VisitTarget::Position(Position::new(20, 20));
        w.add_visits(id, [a, b]).unwrap();
        assert_eq!(w.current_visit(id).unwrap(), Some(a));

        w.hold(id).unwrap();
        w.release(id).unwrap();
        w.hold(id).unwrap();
        w.release(id).unwrap();
        assert_eq!(w.robot(id).unwrap().cursor(), 2);
        assert_eq!(w.current_visit(id).unwrap(), Some(a));

        // Cursor never passes the queue length.
        w.hold(id).unwrap();
        w.release(id).unwrap();
        assert_eq!(w.robot(id).unwrap().cursor(), 2);
    }

    #[test]
    fn add_visit_next_keeps_the_way_home() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(0, 0)));
        let home = VisitTarget::Position(Position::new(10, 10));
        let work = VisitTarget::Position(Position::new(20, 20));
        let urgent = VisitTarget::Position(Position::new(30, 30));
        w.add_visits(id, [home, work]).unwrap();

        w.add_visit_next(id, urgent).unwrap();
        let r = w.robot(id).unwrap();
        assert_eq!(r.visits(), &[home, urgent, home, work]);
        assert_eq!(r.current_visit(), Some(urgent));
    }

    #[test]
    fn add_visit_next_mid_queue_inserts_at_cursor() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(0, 0)));
        let a = VisitTarget::Position(Position::new(10, 10));
        let b = VisitTarget::Position(Position::new(20, 20));
        let urgent = VisitTarget::Position(Position::new(30, 30));
        w.add_visits(id, [a, b]).unwrap();
        w.hold(id).unwrap();
        w.release(id).unwrap();

        w.add_visit_next(id, urgent).unwrap();
        let r = w.robot(id).unwrap();
        assert_eq!(r.visits(), &[a, urgent, b]);
        assert_eq!(r.current_visit(), Some(urgent));
    }

    #[test]
    fn hold_and_release_notify_on_change_only() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(0, 0)));
        let obs = Rc::new(CountingObserver::default());
        w.add_observer(obs.clone());
        w.hold(id).unwrap();
        w.hold(id).unwrap();
        w.release(id).unwrap();
        w.release(id).unwrap();
        assert_eq!(obs.count(), 2);
    }

    #[test]
    fn step_drains_battery_for_distance() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(80, 80)));
        let moved = w.step_toward(id, Position::new(200, 100)).unwrap();
        assert_eq!(moved, 10.0);
        assert_eq!(center(&w, id), Position::new(110, 100));
        let expected = 100.0 - (10.0 / 13.0) * (10.0 * 100.0 / 1000.0);
        let battery = fixed64_to_f64(w.robot(id).unwrap().battery());
        assert!((battery - expected).abs() < 1e-6);
    }

    #[test]
    fn direct_travel_arrives_then_advances() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(80, 80)));
        let goal = Position::new(130, 140);
        w.add_visit(id, goal).unwrap();

        for _ in 0..5 {
            w.tick().unwrap();
        }
        assert_eq!(center(&w, id), goal);
        assert_eq!(w.robot(id).unwrap().cursor(), 0);

        w.tick().unwrap();
        assert_eq!(w.robot(id).unwrap().cursor(), 1);
        // Parked at home: nothing moves any more.
        w.tick().unwrap();
        assert_eq!(center(&w, id), goal);
        assert_eq!(w.robot(id).unwrap().cursor(), 1);
    }

    #[test]
    fn held_robot_stays_put() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(80, 80)));
        w.add_visit(id, Position::new(300, 300)).unwrap();
        w.hold(id).unwrap();
        w.tick().unwrap();
        assert_eq!(center(&w, id), Position::new(100, 100));
    }

    #[test]
    fn empty_battery_detours_to_nearest_station() {
        let mut w = World::new("Factory", 800, 600);
        let near = w.add_charging_station("near", Rect::new(150, 50, 100, 100));
        w.add_charging_station("far", Rect::new(600, 400, 100, 100));
        let id = w.add_robot(RobotSpec::new("r", Position::new(80, 80)).battery(Fixed64::ZERO));
        let job = VisitTarget::Position(Position::new(400, 400));
        w.add_visit(id, job).unwrap();
        w.add_visit(id, Position::new(500, 100)).unwrap();
        w.hold(id).unwrap();
        w.release(id).unwrap();

        w.tick().unwrap();
        let r = w.robot(id).unwrap();
        assert!(r.need_charging());
        assert_eq!(r.current_visit(), Some(VisitTarget::Entity(near)));
        assert_eq!(r.visits().len(), 3);

        // Already heading to a station: nothing more is inserted.
        w.tick().unwrap();
        assert_eq!(w.robot(id).unwrap().visits().len(), 3);
    }

    #[test]
    fn empty_battery_without_station_changes_nothing() {
        let (mut w, id) = world_with_robot(RobotSpec::new("r", Position::new(80, 80)).battery(Fixed64::ZERO));
        w.add_visit(id, Position::new(200, 100)).unwrap();
        w.tick().unwrap();
        let r = w.robot(id).unwrap();
        assert!(r.need_charging());
        assert_eq!(r.visits().len(), 1);
        // It still moves with an empty battery.
        assert_eq!(center(&w, id), Position::new(110, 100));
    }

    #[test]
    fn pathfinding_robot_walks_around_a_conveyor() {
        let mut w = World::new("Factory", 120, 80);
        w.add_conveyor("wall", Rect::new(50, 0, 10, 55));
        let id = w.add_robot(RobotSpec::new("r", Position::new(15, 15)).size(10, 10).pathfinding());
        let goal = Position::new(100, 20);
        w.add_visit(id, goal).unwrap();

        for _ in 0..200 {
            w.tick().unwrap();
            if center(&w, id) == goal {
                break;
            }
        }
        assert_eq!(center(&w, id), goal);
        assert!(w.robot(id).unwrap().pathfinder().is_some());
    }

    #[test]
    fn pathfinding_robot_waits_when_blocked() {
        let mut w = World::new("Factory", 120, 80);
        w.add_conveyor("wall", Rect::new(50, 0, 10, 80));
        let id = w.add_robot(RobotSpec::new("r", Position::new(15, 15)).size(10, 10).pathfinding());
        w.add_visit(id, Position::new(100, 20)).unwrap();

        w.tick().unwrap();
        w.tick().unwrap();
        assert_eq!(center(&w, id), Position::new(20, 20));
        assert!(w.robot(id).unwrap().path().is_none());
        assert_eq!(w.robot(id).unwrap().cursor(), 0);
    }

    #[test]
    fn blocked_robot_moves_once_its_target_changes() {
        let mut w = World::new("Factory", 120, 80);
        w.add_conveyor("wall", Rect::new(50, 0, 10, 80));
        let id = w.add_robot(RobotSpec::new("r", Position::new(15, 15)).size(10, 10).pathfinding());
        w.add_visit(id, Position::new(100, 20)).unwrap();
        for _ in 0..3 {
            w.tick().unwrap();
        }
        assert_eq!(center(&w, id), Position::new(20, 20));

        let reachable = Position::new(30, 40);
        w.add_visit_next(id, reachable).unwrap();
        assert_eq!(w.robot(id).unwrap().current_visit(), Some(VisitTarget::Position(reachable)));
        w.tick().unwrap();
        assert_ne!(center(&w, id), Position::new(20, 20));
        assert!(w.robot(id).unwrap().path().is_some());
    }

    #[test]
    fn blocked_robot_moves_once_navigation_is_rebuilt() {
        let mut w = World::new("Factory", 120, 80);
        let wall = w.add_conveyor("wall", Rect::new(50, 0, 10, 80));
        let id = w.add_robot(RobotSpec::new("r", Position::new(15, 15)).size(10, 10).pathfinding());
        w.add_visit(id, Position::new(100, 20)).unwrap();
        w.tick().unwrap();
        w.tick().unwrap();

        // Open a gap under the wall; the cached graph still sees it closed.
        w.set_size(wall, 10, 40).unwrap();
        w.tick().unwrap();
        assert_eq!(center(&w, id), Position::new(20, 20));

        w.invalidate_navigation();
        w.tick().unwrap();
        assert_ne!(center(&w, id), Position::new(20, 20));
        assert!(w.robot(id).unwrap().path().is_some());
    }

    #[test]
    fn path_is_dropped_once_walked() {
        let mut w = World::new("Factory", 100, 100);
        let id = w.add_robot(RobotSpec::new("r", Position::new(15, 15)).size(10, 10).pathfinding());
        w.add_visit(id, Position::new(24, 20)).unwrap();
        w.add_visit(id, Position::new(60, 60)).unwrap();

        // Four one-unit hops, then the path runs out within the same tick.
        w.tick().unwrap();
        let r = w.robot(id).unwrap();
        assert_eq!(center(&w, id), Position::new(24, 20));
        assert_eq!(r.cursor(), 1);
        assert!(r.path().is_none());
    }
}
