use serde::{Deserialize, Serialize};

pub use reactor_types::Workplane;

/// Opaque handle to a solid (or compound of solids) in the geometry kernel.
/// NEVER persisted. Valid only for the kernel session that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }

    /// Raw session-local number, for hashing and log output.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Transient kernel-internal entity identifier (faces built from wires).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelId(pub u64);

/// One run of a closed planar wire, in workplane `(u, v)` coordinates.
///
/// Consecutive segments share endpoints: the last point of one segment is
/// the first point of the next.
#[derive(Debug, Clone, PartialEq)]
pub enum WireSegment {
    /// Straight edges between consecutive points.
    Polyline(Vec<[f64; 2]>),
    /// Interpolating spline through every point.
    Spline(Vec<[f64; 2]>),
    /// Circular arc from `[0]` through `[1]` to `[2]`.
    ThreePointArc([[f64; 2]; 3]),
}

impl WireSegment {
    pub fn first(&self) -> Option<[f64; 2]> {
        match self {
            WireSegment::Polyline(pts) | WireSegment::Spline(pts) => pts.first().copied(),
            WireSegment::ThreePointArc(pts) => Some(pts[0]),
        }
    }

    pub fn last(&self) -> Option<[f64; 2]> {
        match self {
            WireSegment::Polyline(pts) | WireSegment::Spline(pts) => pts.last().copied(),
            WireSegment::ThreePointArc(pts) => Some(pts[2]),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 3]>) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.include(*p);
        }
        bb
    }

    pub fn include(&mut self, p: [f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] >= self.max[i])
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = out.min[i].min(other.min[i]);
            out.max[i] = out.max[i].max(other.max[i]);
        }
        out
    }

    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = out.min[i].max(other.min[i]);
            out.max[i] = out.max[i].min(other.max[i]);
        }
        out
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !self.intersection(other).is_empty()
    }

    pub fn size(&self) -> [f64; 3] {
        if self.is_empty() {
            return [0.0; 3];
        }
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn largest_dimension(&self) -> f64 {
        self.size().into_iter().fold(0.0, f64::max)
    }

    pub fn corners(&self) -> [[f64; 3]; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]],
            [b[0], a[1], a[2]],
            [b[0], b[1], a[2]],
            [a[0], b[1], a[2]],
            [a[0], a[1], b[2]],
            [b[0], a[1], b[2]],
            [b[0], b[1], b[2]],
            [a[0], b[1], b[2]],
        ]
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("invalid profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("entity not found: {id:?}")]
    EntityNotFound { id: KernelId },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Triangle mesh produced by faceting a solid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals, same layout as `vertices`.
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }
}

impl Serialize for KernelId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KernelId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(KernelId)
    }
}
