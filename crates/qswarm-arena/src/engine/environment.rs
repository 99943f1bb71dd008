use serde::{Deserialize, Serialize};

use crate::core::{BodyId, BodyKind, Kinematics, Vec2};

/// Two bodies that started touching during a simulation step.
///
/// The arena always reports the agent as `a`, but consumers should not rely on the
/// order: other environments may report either side first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionPair {
    pub a: BodyId,
    pub b: BodyId,
}

impl CollisionPair {
    #[must_use]
    pub const fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }

    /// Returns the body on the other side of the pair, if `body` takes part in it.
    #[must_use]
    pub fn other(&self, body: BodyId) -> Option<BodyId> {
        if self.a == body {
            Some(self.b)
        } else if self.b == body {
            Some(self.a)
        } else {
            None
        }
    }
}

/// The simulated world as seen by the learning core.
///
/// The environment owns agent positions and velocities. The learner only reads them,
/// except for the explicit reset, velocity, spawn and remove calls below.
pub trait Environment {
    /// Fixed position agents start from and are reset to.
    fn start_position(&self) -> Vec2;

    /// Current position and velocity of an agent body, or `None` if the body does not exist.
    fn kinematics(&self, body: BodyId) -> Option<Kinematics>;

    /// Kind of any body in the world, or `None` if the body does not exist.
    fn body_kind(&self, body: BodyId) -> Option<BodyKind>;

    /// Teleports an agent and overwrites its velocity.
    fn reset_agent(&mut self, body: BodyId, position: Vec2, velocity: Vec2);

    /// Overwrites an agent's velocity.
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2);

    /// Adds a new agent body at `position` at rest and returns its id.
    fn spawn_agent(&mut self, position: Vec2) -> BodyId;

    /// Removes an agent body. Removing an unknown body is a no-op.
    fn remove_agent(&mut self, body: BodyId);
}
