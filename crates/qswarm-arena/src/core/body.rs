use serde::{Deserialize, Serialize};

use super::{geometry::Vec2, shape::Shape};

/// Identifier of a body in the arena.
///
/// Ids are handed out in increasing order and never reused, so a removed agent's id
/// can never alias a later one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("#{_0}")]
pub struct BodyId(pub u64);

/// What a body represents in the arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Agent,
    Wall,
    Obstacle,
    Target,
}

/// A static body: wall, obstacle or target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBody {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: Vec2,
    pub shape: Shape,
}

/// Position and velocity of an agent body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}
