//! Discretization of continuous kinematics into state keys.
//!
//! Two resolutions exist:
//!
//! - **Coarse** - position only, each axis floored into buckets: `"x:y"`
//! - **Extended** - position rounded to the nearest bucket plus the sign of each
//!   velocity component: `"x:y:vx:vy"`
//!
//! The two resolutions produce distinct [`StateKey`] variants, so a coarse key never
//! aliases an extended one in a Q-table.
//!
//! The default per-tick update keys its transition on the extended state but looks up
//! the next state with the coarse encoding, while collision updates use coarse for both.
//! The mix is deliberate and load-bearing for the learned policy; see `DESIGN.md`.

use std::fmt;

use qswarm_arena::{Kinematics, Vec2};
use serde::{Deserialize, Serialize};

/// Discretized state used as the first half of a Q-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKey {
    Coarse { x: i64, y: i64 },
    Extended { x: i64, y: i64, vx: i8, vy: i8 },
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coarse { x, y } => write!(f, "{x}:{y}"),
            Self::Extended { x, y, vx, vy } => write!(f, "{x}:{y}:{vx}:{vy}"),
        }
    }
}

/// Maps positions and velocities onto [`StateKey`]s with a fixed bucket size.
///
/// # Example
///
/// ```
/// use qswarm_arena::{Kinematics, Vec2};
/// use qswarm_learning::state::StateEncoder;
///
/// let encoder = StateEncoder::new(100.0);
/// let kinematics = Kinematics {
///     position: Vec2::new(160.0, 240.0),
///     velocity: Vec2::new(-5.0, 0.0),
/// };
/// assert_eq!(encoder.coarse(kinematics.position).to_string(), "1:2");
/// assert_eq!(encoder.extended(kinematics).to_string(), "2:2:-1:0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateEncoder {
    bucket_size: f64,
}

impl StateEncoder {
    #[must_use]
    pub const fn new(bucket_size: f64) -> Self {
        Self { bucket_size }
    }

    /// Position-only key, flooring each axis into its bucket.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn coarse(&self, position: Vec2) -> StateKey {
        StateKey::Coarse {
            x: (position.x / self.bucket_size).floor() as i64,
            y: (position.y / self.bucket_size).floor() as i64,
        }
    }

    /// Position rounded to the nearest bucket plus velocity signs.
    ///
    /// Halfway positions round toward positive infinity (`-0.5 -> 0`, `2.5 -> 3`).
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn extended(&self, kinematics: Kinematics) -> StateKey {
        let round = |v: f64| (v / self.bucket_size + 0.5).floor() as i64;
        StateKey::Extended {
            x: round(kinematics.position.x),
            y: round(kinematics.position.y),
            vx: sign(kinematics.velocity.x),
            vy: sign(kinematics.velocity.y),
        }
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinematics(x: f64, y: f64, vx: f64, vy: f64) -> Kinematics {
        Kinematics {
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
        }
    }

    #[test]
    fn coarse_floors_negative_positions() {
        let encoder = StateEncoder::new(100.0);
        assert_eq!(
            encoder.coarse(Vec2::new(-1.0, 99.9)),
            StateKey::Coarse { x: -1, y: 0 }
        );
        assert_eq!(
            encoder.coarse(Vec2::new(200.0, 0.0)),
            StateKey::Coarse { x: 2, y: 0 }
        );
    }

    #[test]
    fn extended_rounds_half_up() {
        let encoder = StateEncoder::new(100.0);
        assert_eq!(
            encoder.extended(kinematics(-50.0, 250.0, 0.0, 0.0)),
            StateKey::Extended {
                x: 0,
                y: 3,
                vx: 0,
                vy: 0
            }
        );
        assert_eq!(
            encoder.extended(kinematics(149.0, -151.0, 0.0, 0.0)),
            StateKey::Extended {
                x: 1,
                y: -2,
                vx: 0,
                vy: 0
            }
        );
    }

    #[test]
    fn extended_keeps_velocity_signs_only() {
        let encoder = StateEncoder::new(100.0);
        let key = encoder.extended(kinematics(0.0, 0.0, 0.001, -42.0));
        assert_eq!(key.to_string(), "0:0:1:-1");
    }

    #[test]
    fn resolutions_never_alias() {
        let encoder = StateEncoder::new(100.0);
        let k = kinematics(0.0, 0.0, 0.0, 0.0);
        assert_ne!(encoder.coarse(k.position), encoder.extended(k));
    }
}
