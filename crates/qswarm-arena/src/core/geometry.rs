use serde::{Deserialize, Serialize};

/// A 2-D vector in arena units (positions) or arena units per step (velocities).
///
/// The y axis grows downward, so "up" is negative y.
///
/// # Example
///
/// ```
/// use qswarm_arena::Vec2;
///
/// let p = Vec2::new(3.0, 4.0);
/// assert_eq!(p.length(), 5.0);
/// assert_eq!(p * 2.0, Vec2::new(6.0, 8.0));
/// assert_eq!(p - Vec2::new(1.0, 1.0), Vec2::new(2.0, 3.0));
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Neg,
    derive_more::Mul,
    derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. Returns `self` unchanged for the zero vector.
    #[must_use]
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length > 0.0 {
            Self::new(self.x / length, self.y / length)
        } else {
            self
        }
    }

    /// Component-wise clamp into the box spanned by `min` and `max`.
    #[must_use]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self::new(self.x.clamp(min.x, max.x), self.y.clamp(min.y, max.y))
    }
}
