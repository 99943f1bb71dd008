use serde::{Deserialize, Serialize};

use crate::{
    LayoutError,
    core::{Shape, Vec2},
};

/// A static body in a layout description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub position: Vec2,
    #[serde(flatten)]
    pub shape: Shape,
}

impl BodySpec {
    #[must_use]
    pub const fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            shape: Shape::Circle { radius },
        }
    }

    #[must_use]
    pub const fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            shape: Shape::Rect { width, height },
        }
    }
}

/// Static description of an arena: field size, obstacles, target and start.
///
/// Every field has a default, so a JSON layout only needs to list what it changes.
///
/// # Example
///
/// ```
/// use qswarm_arena::ArenaLayout;
///
/// let layout: ArenaLayout = serde_json::from_str(r#"{ "width": 400.0 }"#).unwrap();
/// assert_eq!(layout.width, 400.0);
/// assert_eq!(layout.height, 600.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    pub width: f64,
    pub height: f64,
    /// Walls are rectangles of this thickness placed just outside the field.
    pub wall_thickness: f64,
    pub agent_radius: f64,
    pub start: Vec2,
    pub target: BodySpec,
    pub obstacles: Vec<BodySpec>,
    /// Multiplier applied to velocities when integrating one step.
    pub time_scale: f64,
    /// Gap below which a resolved contact is still considered touching.
    pub contact_slop: f64,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            wall_thickness: 200.0,
            agent_radius: 20.0,
            start: Vec2::new(100.0, 200.0),
            target: BodySpec::circle(700.0, 100.0, 60.0),
            obstacles: vec![
                BodySpec::rect(400.0, 300.0, 100.0, 20.0),
                BodySpec::rect(600.0, 400.0, 80.0, 40.0),
                BodySpec::rect(200.0, 150.0, 60.0, 30.0),
                BodySpec::circle(300.0, 500.0, 30.0),
                BodySpec::circle(700.0, 200.0, 20.0),
                BodySpec::rect(500.0, 100.0, 120.0, 20.0),
                BodySpec::rect(100.0, 500.0, 40.0, 60.0),
                BodySpec::circle(100.0, 200.0, 15.0),
                BodySpec::circle(600.0, 500.0, 25.0),
                // trapezoid, pentagon and triangle approximated by their bounds
                BodySpec::rect(400.0, 450.0, 60.0, 40.0),
                BodySpec::circle(700.0, 350.0, 30.0),
                BodySpec::rect(300.0, 100.0, 40.0, 30.0),
            ],
            time_scale: 5.0,
            contact_slop: 0.5,
        }
    }
}

impl ArenaLayout {
    /// The four walls enclosing the field, as `(top, bottom, left, right)` specs.
    #[must_use]
    pub fn walls(&self) -> [BodySpec; 4] {
        let t = self.wall_thickness;
        let (w, h) = (self.width, self.height);
        [
            BodySpec::rect(w / 2.0, -t / 2.0, w, t),
            BodySpec::rect(w / 2.0, h + t / 2.0, w, t),
            BodySpec::rect(-t / 2.0, h / 2.0, t, h),
            BodySpec::rect(w + t / 2.0, h / 2.0, t, h),
        ]
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("wall_thickness", self.wall_thickness),
            ("agent_radius", self.agent_radius),
            ("time_scale", self.time_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::NotPositive { name, value });
            }
        }
        if !(self.contact_slop.is_finite() && self.contact_slop >= 0.0) {
            return Err(LayoutError::NotPositive {
                name: "contact_slop",
                value: self.contact_slop,
            });
        }
        let inside =
            |p: Vec2| (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y);
        if !inside(self.start) {
            return Err(LayoutError::OutsideField {
                name: "start",
                position: self.start,
            });
        }
        if !inside(self.target.position) {
            return Err(LayoutError::OutsideField {
                name: "target",
                position: self.target.position,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid() {
        assert!(ArenaLayout::default().validate().is_ok());
    }

    #[test]
    fn json_roundtrip_keeps_shapes() {
        let layout = ArenaLayout::default();
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains(r#""shape":"circle""#));
        let parsed: ArenaLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, layout);
    }

    #[test]
    fn rejects_start_outside_field() {
        let layout = ArenaLayout {
            start: Vec2::new(-10.0, 50.0),
            ..ArenaLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::OutsideField { name: "start", .. })
        ));
    }

    #[test]
    fn rejects_zero_time_scale() {
        let layout = ArenaLayout {
            time_scale: 0.0,
            ..ArenaLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::NotPositive {
                name: "time_scale",
                ..
            })
        ));
    }

    #[test]
    fn walls_enclose_field() {
        let layout = ArenaLayout::default();
        let [top, bottom, left, right] = layout.walls();
        assert_eq!(top.position, Vec2::new(400.0, -100.0));
        assert_eq!(bottom.position, Vec2::new(400.0, 700.0));
        assert_eq!(left.position, Vec2::new(-100.0, 300.0));
        assert_eq!(right.position, Vec2::new(900.0, 300.0));
    }
}
