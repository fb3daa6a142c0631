//! Outer control surface: owns a world and, optionally, a persistence
//! collaborator.

use crate::error::{ObserverError, SimError};
use crate::observer::Observer;
use crate::persistence::{PersistenceError, PersistenceManager};
use crate::world::World;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("no persistence manager attached")]
    NoPersistence,
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<ObserverError> for ControllerError {
    fn from(e: ObserverError) -> Self {
        Self::Sim(e.into())
    }
}

pub struct SimulationController {
    world: World,
    persistence: Option<Box<dyn PersistenceManager>>,
}

impl fmt::Debug for SimulationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationController")
            .field("world", &self.world)
            .field("persistence", &self.persistence.is_some())
            .finish()
    }
}

impl SimulationController {
    pub fn new(world: World) -> Self {
        Self {
            world,
            persistence: None,
        }
    }

    pub fn with_persistence(mut self, persistence: impl PersistenceManager + 'static) -> Self {
        self.persistence = Some(Box::new(persistence));
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn start(&mut self) -> Result<bool, ControllerError> {
        Ok(self.world.start_simulation()?)
    }

    pub fn stop(&mut self) -> Result<bool, ControllerError> {
        Ok(self.world.stop_simulation()?)
    }

    pub fn is_running(&self) -> bool {
        self.world.is_running()
    }

    /// Run a single tick, whether or not the simulation is running.
    pub fn step(&mut self) -> Result<(), ControllerError> {
        Ok(self.world.tick()?)
    }

    /// Tick while running, at most `max_ticks` times. Returns the number of
    /// ticks run.
    pub fn run(&mut self, max_ticks: u64) -> Result<u64, ControllerError> {
        let mut ran = 0;
        while ran < max_ticks && self.world.is_running() {
            self.world.tick()?;
            ran += 1;
        }
        Ok(ran)
    }

    /// Persist the world. Returns its id.
    pub fn save(&mut self) -> Result<String, ControllerError> {
        let store = self.persistence.as_mut().ok_or(ControllerError::NoPersistence)?;
        let id = store.persist(&mut self.world)?;
        tracing::info!(%id, tick = self.world.tick_count(), "world saved");
        Ok(id)
    }

    /// Replace the world with the one stored under `id`. Observers carry
    /// over to the loaded world.
    pub fn load(&mut self, id: &str) -> Result<(), ControllerError> {
        let store = self.persistence.as_ref().ok_or(ControllerError::NoPersistence)?;
        let mut world = store.read(id)?;
        let observers = self.world.replace_observers(Default::default());
        world.replace_observers(observers);
        self.world = world;
        tracing::info!(%id, tick = self.world.tick_count(), "world loaded");
        Ok(())
    }

    pub fn add_observer(&mut self, observer: Rc<dyn Observer>) -> bool {
        self.world.add_observer(observer)
    }

    pub fn remove_observer(&mut self, observer: &Rc<dyn Observer>) -> bool {
        self.world.remove_observer(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryPersistence;
    use crate::test_utils::{self, CountingObserver, FailingObserver};

    #[test]
    fn run_only_ticks_while_running() {
        let mut c = SimulationController::new(test_utils::charging_world());
        assert_eq!(c.run(10).unwrap(), 0);
        assert!(c.start().unwrap());
        assert!(!c.start().unwrap());
        assert_eq!(c.run(10).unwrap(), 10);
        assert_eq!(c.world().tick_count(), 10);
        c.stop().unwrap();
        assert!(!c.is_running());
        c.step().unwrap();
        assert_eq!(c.world().tick_count(), 11);
    }

    #[test]
    fn save_without_persistence_is_a_precondition_failure() {
        let mut c = SimulationController::new(test_utils::charging_world());
        assert!(matches!(c.save(), Err(ControllerError::NoPersistence)));
        assert!(matches!(c.load("world-0"), Err(ControllerError::NoPersistence)));
    }

    #[test]
    fn save_then_load_restores_and_keeps_observers() {
        let mut c = SimulationController::new(test_utils::charging_world()).with_persistence(MemoryPersistence::new());
        let obs = Rc::new(CountingObserver::default());
        c.add_observer(obs.clone());

        c.step().unwrap();
        let saved_hash = c.world().state_hash();
        let id = c.save().unwrap();
        for _ in 0..3 {
            c.step().unwrap();
        }
        assert_ne!(c.world().state_hash(), saved_hash);

        c.load(&id).unwrap();
        assert_eq!(c.world().state_hash(), saved_hash);
        assert_eq!(c.world().observer_count(), 1);

        let before = obs.count();
        c.start().unwrap();
        assert_eq!(obs.count(), before + 1);
    }

    #[test]
    fn observer_failure_surfaces() {
        let mut c = SimulationController::new(test_utils::charging_world());
        let failing: Rc<dyn Observer> = Rc::new(FailingObserver::new("view closed"));
        assert!(c.add_observer(failing.clone()));
        assert!(matches!(c.start(), Err(ControllerError::Sim(SimError::Observer(_)))));
        assert!(c.remove_observer(&failing));
        assert!(!c.remove_observer(&failing));
    }

    #[test]
    fn load_of_unknown_id_fails() {
        let mut c = SimulationController::new(test_utils::charging_world()).with_persistence(MemoryPersistence::new());
        assert!(matches!(
            c.load("nope"),
            Err(ControllerError::Persistence(PersistenceError::NotFound(_)))
        ));
    }
}
