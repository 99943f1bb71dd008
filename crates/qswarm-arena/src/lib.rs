//! Headless 2-D arena used as the simulated environment for qswarm training.
//!
//! The learning core only talks to the [`Environment`] trait; [`Arena`] is the
//! reference implementation with circular agents, axis-aligned rectangle and circle
//! obstacles, enclosing walls and a single target.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    #[display("layout field `{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[display("layout `{name}` at {position} lies outside the field")]
    OutsideField {
        name: &'static str,
        position: Vec2,
    },
}
