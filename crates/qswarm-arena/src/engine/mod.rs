//! Simulation side of the arena.
//!
//! - [`Environment`] - What the learning core needs from a simulated world
//! - [`CollisionPair`] - Two bodies that started touching during a step
//! - [`ArenaLayout`] - Serializable description of walls, obstacles, target and start
//! - [`Arena`] - Headless reference implementation of [`Environment`]
//!
//! # Step Flow
//!
//! 1. The driver applies velocities chosen by the learner
//! 2. [`Arena::step`] integrates motion and resolves penetration
//! 3. Newly started contacts are returned to the driver, which forwards them to the
//!    learner's collision hook
//! 4. The driver calls the learner's post-step hook

pub use self::{arena::*, environment::*, layout::*};

mod arena;
mod environment;
mod layout;
