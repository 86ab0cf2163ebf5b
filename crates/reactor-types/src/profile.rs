use serde::{Deserialize, Serialize};

/// How a profile point is joined to its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Straight,
    Spline,
    /// Three consecutive circle points define a three-point arc.
    Circle,
}

/// A 2D profile point in workplane coordinates.
///
/// `connection` is `None` when the point takes the envelope's default
/// connection kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionKind>,
}

impl ProfilePoint {
    pub fn new(x: f64, y: f64, connection: ConnectionKind) -> Self {
        Self {
            x,
            y,
            connection: Some(connection),
        }
    }

    pub fn straight(x: f64, y: f64) -> Self {
        Self::new(x, y, ConnectionKind::Straight)
    }

    pub fn spline(x: f64, y: f64) -> Self {
        Self::new(x, y, ConnectionKind::Spline)
    }

    pub fn circle(x: f64, y: f64) -> Self {
        Self::new(x, y, ConnectionKind::Circle)
    }

    /// A point that inherits the envelope's connection kind.
    pub fn bare(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            connection: None,
        }
    }

    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn same_position(&self, other: &ProfilePoint) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// One of the six axis-aligned workplanes.
///
/// The first letter names the world axis of the local u coordinate, the
/// second the world axis of the local v coordinate. Revolution is about the
/// local v axis; extrusion is along `u x v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Workplane {
    XY,
    YZ,
    #[default]
    XZ,
    YX,
    ZY,
    ZX,
}

const X: [f64; 3] = [1.0, 0.0, 0.0];
const Y: [f64; 3] = [0.0, 1.0, 0.0];
const Z: [f64; 3] = [0.0, 0.0, 1.0];

impl Workplane {
    pub fn u_axis(self) -> [f64; 3] {
        match self {
            Workplane::XY | Workplane::XZ => X,
            Workplane::YZ | Workplane::YX => Y,
            Workplane::ZY | Workplane::ZX => Z,
        }
    }

    pub fn v_axis(self) -> [f64; 3] {
        match self {
            Workplane::YX | Workplane::ZX => X,
            Workplane::XY | Workplane::ZY => Y,
            Workplane::XZ | Workplane::YZ => Z,
        }
    }

    pub fn normal(self) -> [f64; 3] {
        cross(self.u_axis(), self.v_axis())
    }

    /// Axis that profiles on this plane revolve around.
    pub fn revolve_axis(self) -> [f64; 3] {
        self.v_axis()
    }

    /// Map local `(u, v)` coordinates to world space.
    pub fn to_world(self, uv: [f64; 2]) -> [f64; 3] {
        let u = self.u_axis();
        let v = self.v_axis();
        [
            u[0] * uv[0] + v[0] * uv[1],
            u[1] * uv[0] + v[1] * uv[1],
            u[2] * uv[0] + v[2] * uv[1],
        ]
    }

    /// Project a world point onto local `(u, v)` coordinates.
    pub fn to_local(self, p: [f64; 3]) -> [f64; 2] {
        [dot(p, self.u_axis()), dot(p, self.v_axis())]
    }
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
