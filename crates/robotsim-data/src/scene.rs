//! Builds a [`World`] from [`SceneData`].
//!
//! Entities are registered in a fixed order (rooms, doors, production
//! machines, charging stations, conveyors, robots), which is also the order
//! they behave in on every tick. Robot visit queues are resolved last, so a
//! robot may visit anything declared in the scene.

use crate::loader::{check_duplicate, deserialize_file, require_scene_file, resolve_name, DataLoadError};
use crate::schema::{PlacementPolicy, RobotData, SceneData, VisitData};
use robotsim_core::component::VisitTarget;
use robotsim_core::error::{PlacementError, SimError};
use robotsim_core::fixed::f64_to_fixed64;
use robotsim_core::geometry::{Bounds, GeometryError, Position, VisitAnchor};
use robotsim_core::id::EntityId;
use robotsim_core::robot::RobotSpec;
use robotsim_core::world::World;
use std::collections::{HashMap, HashSet};
use std::path::Path;

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Load(#[from] DataLoadError),

    #[error("cannot place {what} in scene '{scene}': {source}")]
    Placement {
        scene: String,
        what: String,
        #[source]
        source: PlacementError,
    },

    #[error("bad visit anchor on '{id}': {source}")]
    Anchor {
        id: String,
        #[source]
        source: GeometryError,
    },

    #[error("'{id}' has a non-finite {field}")]
    NotFinite { id: String, field: &'static str },

    #[error(transparent)]
    Sim(#[from] SimError),
}

// ===========================================================================
// Scene
// ===========================================================================

/// A built world plus the scene-id to entity mapping.
#[derive(Debug)]
pub struct Scene {
    world: World,
    ids: HashMap<String, EntityId>,
}

impl Scene {
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    /// Entity registered under a scene id. Skipped placements have none.
    pub fn id(&self, name: &str) -> Option<EntityId> {
        self.ids.get(name).copied()
    }

    pub fn ids(&self) -> &HashMap<String, EntityId> {
        &self.ids
    }
}

/// Read a scene file (RON, TOML or JSON) and build it.
pub fn load_scene(path: &Path) -> Result<Scene, SceneError> {
    let data: SceneData = deserialize_file(path)?;
    tracing::debug!(path = %path.display(), scene = %data.name, "scene file read");
    build_scene(&data)
}

/// Load the scene stored in `dir` as `{stem}.ron`, `.toml` or `.json`.
pub fn load_named_scene(dir: &Path, stem: &str) -> Result<Scene, SceneError> {
    let path = require_scene_file(dir, stem)?;
    load_scene(&path)
}

/// Build a world from scene data. Observers are not involved: construction
/// never notifies.
pub fn build_scene(data: &SceneData) -> Result<Scene, SceneError> {
    let mut builder = Builder::new(data);
    builder.rooms()?;
    builder.doors()?;
    builder.machines()?;
    builder.stations()?;
    builder.conveyors()?;
    builder.robots()?;
    let Builder { world, ids, .. } = builder;
    tracing::info!(scene = %data.name, entities = world.len(), robots = world.robots().len(), "scene built");
    Ok(Scene { world, ids })
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

struct Builder<'a> {
    data: &'a SceneData,
    world: World,
    ids: HashMap<String, EntityId>,
    skipped: HashSet<&'a str>,
}

impl<'a> Builder<'a> {
    fn new(data: &'a SceneData) -> Self {
        let bounds = data
            .bounds
            .map_or_else(Bounds::unbounded, |b| Bounds::new(b.min_x, b.max_x, b.min_y, b.max_y));
        let world = World::with_bounds(data.name.as_str(), data.width, data.height, bounds)
            .with_defaults(data.defaults.clone());
        Self {
            data,
            world,
            ids: HashMap::new(),
            skipped: HashSet::new(),
        }
    }

    fn scene(&self) -> &'a str {
        &self.data.name
    }

    fn register(&mut self, name: &str, id: EntityId) {
        self.ids.insert(name.to_string(), id);
    }

    /// Apply the placement policy to a rejected door or machine.
    fn rejected(&self, what: String, source: PlacementError) -> Result<(), SceneError> {
        match self.data.placement_policy {
            PlacementPolicy::Skip => {
                tracing::debug!(scene = self.scene(), %what, error = %source, "placement skipped");
                Ok(())
            }
            PlacementPolicy::Abort => Err(SceneError::Placement {
                scene: self.scene().to_string(),
                what,
                source,
            }),
        }
    }

    fn anchor(&mut self, name: &str, id: EntityId, visit: Option<&str>) -> Result<(), SceneError> {
        let Some(visit) = visit else {
            return Ok(());
        };
        let anchor: VisitAnchor = visit.parse().map_err(|source| SceneError::Anchor {
            id: name.to_string(),
            source,
        })?;
        let clearance = self.world.defaults().anchor_clearance;
        self.world.set_visit_anchor(id, anchor, clearance)?;
        Ok(())
    }

    fn room(&self, name: &str) -> Result<EntityId, DataLoadError> {
        resolve_name(&self.ids, name, self.scene(), "room").copied()
    }

    // -----------------------------------------------------------------------
    // Fixed entities
    // -----------------------------------------------------------------------

    fn rooms(&mut self) -> Result<(), SceneError> {
        let data = self.data;
        for room in &data.rooms {
            check_duplicate(&self.ids, &room.id, self.scene())?;
            let id = self.world.add_room(room.id.as_str(), room.rect);
            self.register(&room.id, id);
        }
        Ok(())
    }

    fn doors(&mut self) -> Result<(), SceneError> {
        let data = self.data;
        for door in &data.doors {
            let room = self.room(&door.room)?;
            if let Err(e) = self.world.add_door(room, Position::new(door.x, door.y), door.size) {
                self.rejected(format!("door on '{}'", door.room), e)?;
            }
        }
        Ok(())
    }

    fn machines(&mut self) -> Result<(), SceneError> {
        let data = self.data;
        for m in &data.machines {
            check_duplicate(&self.ids, &m.id, self.scene())?;
            let room = self.room(&m.room)?;
            let size = m.size.unwrap_or(self.world.defaults().machine_size);
            let rate = m.rate.unwrap_or(self.world.defaults().production_rate);
            let placed = self.world.add_production_machine_with_rate(
                m.id.as_str(),
                room,
                Position::new(m.x, m.y),
                size,
                rate,
            );
            match placed {
                Ok(id) => {
                    self.register(&m.id, id);
                    self.anchor(&m.id, id, m.visit.as_deref())?;
                }
                Err(e) => {
                    self.rejected(format!("machine '{}'", m.id), e)?;
                    self.skipped.insert(&m.id);
                }
            }
        }
        Ok(())
    }

    fn stations(&mut self) -> Result<(), SceneError> {
        let data = self.data;
        for s in &data.stations {
            check_duplicate(&self.ids, &s.id, self.scene())?;
            let rate = s.rate.unwrap_or(self.world.defaults().charging_rate);
            if !rate.is_finite() {
                return Err(SceneError::NotFinite {
                    id: s.id.clone(),
                    field: "charging rate",
                });
            }
            let id = self.world.add_charging_station_with_rate(s.id.as_str(), s.rect, rate);
            self.register(&s.id, id);
        }
        Ok(())
    }

    fn conveyors(&mut self) -> Result<(), SceneError> {
        let data = self.data;
        for c in &data.conveyors {
            check_duplicate(&self.ids, &c.id, self.scene())?;
            let rate = c.rate.unwrap_or(self.world.defaults().conveyor_rate);
            let id = self.world.add_conveyor_with_rate(c.id.as_str(), c.rect, rate);
            self.register(&c.id, id);
            self.anchor(&c.id, id, c.visit.as_deref())?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Robots
    // -----------------------------------------------------------------------

    fn robots(&mut self) -> Result<(), SceneError> {
        let data = self.data;
        let mut placed = Vec::with_capacity(data.robots.len());
        for r in &data.robots {
            check_duplicate(&self.ids, &r.id, self.scene())?;
            let spec = self.robot_spec(r)?;
            let id = self.world.add_robot(spec);
            self.register(&r.id, id);
            placed.push((id, r));
        }
        for (id, r) in placed {
            let visits = self.visits(r)?;
            self.world.add_visits(id, visits)?;
        }
        Ok(())
    }

    fn robot_spec(&self, r: &RobotData) -> Result<RobotSpec, SceneError> {
        let defaults = self.world.defaults();
        let mut spec = RobotSpec::new(r.id.as_str(), Position::new(r.x, r.y))
            .size(
                r.width.unwrap_or(defaults.robot_size),
                r.height.unwrap_or(defaults.robot_size),
            )
            .speed(r.speed.unwrap_or(defaults.robot_speed))
            .capacity(r.capacity.unwrap_or(defaults.robot_capacity));
        if let Some(battery) = r.battery {
            if !battery.is_finite() {
                return Err(SceneError::NotFinite {
                    id: r.id.clone(),
                    field: "battery",
                });
            }
            spec = spec.battery(f64_to_fixed64(battery.clamp(0.0, 100.0)));
        }
        if r.pathfinding {
            spec = spec.pathfinding();
        }
        Ok(spec)
    }

    fn visits(&self, r: &RobotData) -> Result<Vec<VisitTarget>, SceneError> {
        let mut targets = Vec::with_capacity(r.visits.len());
        for visit in &r.visits {
            match visit {
                VisitData::At { x, y } => targets.push(Position::new(*x, *y).into()),
                VisitData::Entity(name) if self.skipped.contains(name.as_str()) => {
                    tracing::debug!(robot = %r.id, target = %name, "visit to skipped entity dropped");
                }
                VisitData::Entity(name) => {
                    let id = *resolve_name(&self.ids, name, self.scene(), "visit")?;
                    targets.push(id.into());
                }
            }
        }
        Ok(targets)
    }
}
