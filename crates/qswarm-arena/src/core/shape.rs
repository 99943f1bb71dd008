use serde::{Deserialize, Serialize};

use super::geometry::Vec2;

/// Collision shape of a body, centered on the body position.
///
/// Rectangles are axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
}

/// Overlap between a circle and a shape.
///
/// `normal` points from the shape toward the circle center; pushing the circle by
/// `normal * depth` separates the two. A negative `depth` means the circle is within
/// the contact slop but not penetrating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vec2,
    pub depth: f64,
}

impl Shape {
    /// Tests a circle of `radius` at `center` against this shape placed at `position`.
    ///
    /// Returns a contact when the gap between the two is at most `slop`.
    #[must_use]
    pub fn circle_contact(
        self,
        position: Vec2,
        center: Vec2,
        radius: f64,
        slop: f64,
    ) -> Option<Contact> {
        match self {
            Shape::Circle { radius: other } => {
                let delta = center - position;
                let distance = delta.length();
                let depth = radius + other - distance;
                if depth < -slop {
                    return None;
                }
                let normal = if distance > 0.0 {
                    delta.normalized()
                } else {
                    // concentric: push upward
                    Vec2::new(0.0, -1.0)
                };
                Some(Contact { normal, depth })
            }
            Shape::Rect { width, height } => {
                let half = Vec2::new(width / 2.0, height / 2.0);
                let closest = center.clamp(position - half, position + half);
                let delta = center - closest;
                let distance = delta.length();
                if distance > 0.0 {
                    let depth = radius - distance;
                    if depth < -slop {
                        return None;
                    }
                    return Some(Contact {
                        normal: delta.normalized(),
                        depth,
                    });
                }
                // center inside the rectangle: leave through the nearest face
                let local = center - position;
                let faces = [
                    (half.x + local.x, Vec2::new(-1.0, 0.0)),
                    (half.x - local.x, Vec2::new(1.0, 0.0)),
                    (half.y + local.y, Vec2::new(0.0, -1.0)),
                    (half.y - local.y, Vec2::new(0.0, 1.0)),
                ];
                let (gap, normal) = faces
                    .into_iter()
                    .min_by(|a, b| a.0.total_cmp(&b.0))
                    .unwrap_or((0.0, Vec2::new(0.0, -1.0)));
                Some(Contact {
                    normal,
                    depth: radius + gap,
                })
            }
        }
    }
}
