//! Robotsim Core -- a tick-driven simulation of a robot factory floor.
//!
//! A [`world::World`] owns rooms with doored walls, charging stations,
//! conveyors, production machines and battery-powered robots. Every call to
//! [`world::World::tick`] runs each entity's behavior once, in registration
//! order:
//!
//! - **Doors** open while a robot stands in the doorway (display only).
//! - **Charging stations** charge connected robots and hold them until full.
//! - **Conveyors / production machines** animate unless a robot occupies
//!   their visit point.
//! - **Robots** seek a charging station on an empty battery, then travel to
//!   their current visit, either in a straight line or along a shortest path
//!   on a navigation graph shared between robots of the same footprint.
//!
//! Every mutation notifies the world's observers synchronously; an observer
//! error aborts the operation that triggered it.
//!
//! # Key Types
//!
//! - [`world::World`] -- Entity owner, obstacle oracle and tick driver.
//! - [`geometry::Position`], [`geometry::Rect`], [`geometry::Bounds`] --
//!   Integer floor geometry with explicit clamping.
//! - [`pathfinding::NavGraph`] / [`pathfinding::PathFinder`] -- Lattice
//!   graph over the floor and A* search.
//! - [`robot::RobotSpec`] -- Robot construction parameters.
//! - [`controller::SimulationController`] -- Start/stop/run plus save/load
//!   through a [`persistence::PersistenceManager`].
//! - [`serialize`] -- Versioned binary snapshots via bitcode.

pub mod charging;
pub mod component;
pub mod config;
pub mod controller;
pub mod door;
pub mod error;
pub mod fixed;
pub mod geometry;
pub mod id;
pub mod machine;
pub mod observer;
pub mod pathfinding;
pub mod persistence;
pub mod robot;
pub mod room;
pub mod serialize;
pub mod sim;
pub mod style;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
