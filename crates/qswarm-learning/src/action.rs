use qswarm_arena::Vec2;
use serde::{Deserialize, Serialize};

/// One of the four moves an agent can take.
///
/// An action overwrites the agent's velocity with a fixed speed along one axis.
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
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[display("up")]
    Up,
    #[display("down")]
    Down,
}

impl Action {
    pub const LEN: usize = 4;

    /// All actions, in the order values are queried when selecting an action.
    pub const ALL: [Self; Self::LEN] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Velocity this action sets, with y growing downward.
    ///
    /// ```
    /// use qswarm_arena::Vec2;
    /// use qswarm_learning::action::Action;
    ///
    /// assert_eq!(Action::Up.velocity(5.0), Vec2::new(0.0, -5.0));
    /// assert_eq!(Action::Left.velocity(5.0), Vec2::new(-5.0, 0.0));
    /// ```
    #[must_use]
    pub const fn velocity(self, speed: f64) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-speed, 0.0),
            Self::Right => Vec2::new(speed, 0.0),
            Self::Up => Vec2::new(0.0, -speed),
            Self::Down => Vec2::new(0.0, speed),
        }
    }
}
