//! Liminal Core - Endless Room Floor Engine
//!
//! Keeps a first-person walkthrough of an endless chain of rectangular
//! rooms alive: only the room the player stands in, plus any room spawned
//! beyond a doorway they approach, exists at a time.
//!
//! # Architecture
//!
//! - **Scene**: a `hecs` world used as an explicit node arena (parent
//!   handles, local transforms, a propagation pass)
//! - **Collaborators**: [`physics::PhysicsWorld`] for static colliders and
//!   [`assets::ModelLoader`] for fire-and-forget model requests
//! - **Floor**: [`floor::FloorEngine`] scans doorway zones, spawns rooms,
//!   debounces and commits transitions, and unloads what is left behind
//! - **Session**: [`engine::GameSession`] drives the floor and the light
//!   puzzle from one tick
//!
//! # Example
//!
//! ```rust,no_run
//! use liminal_core::prelude::*;
//! use liminal_logic::config::TuningConfig;
//! use liminal_logic::geometry::Vec3;
//! use liminal_logic::puzzle::starter_board;
//!
//! let tuning = TuningConfig::default();
//! let board = starter_board(Vec3::ZERO, &tuning.puzzle);
//! let mut session = GameSession::headless(tuning, board);
//! session.start("main").unwrap();
//!
//! let player = PlayerState::new(Vec3::new(8.0, 1.6, 8.0), Vec3::new(0.0, 0.0, -1.0));
//! loop {
//!     session.tick(&player, 1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod assets;
pub mod components;
pub mod engine;
pub mod floor;
pub mod generation;
pub mod physics;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::assets::{LoadError, LoadedModel, ModelLoader, ModelTicket, QueuedModelLoader};
    pub use crate::components::*;
    pub use crate::engine::{GameSession, PlayerState, TickReport};
    pub use crate::floor::{FloorEngine, FloorError, FloorEvent, ModelOutcome};
    pub use crate::physics::{ColliderHandle, PhysicsWorld, StaticBox, StaticColliderSet};
}
