use reactor_kernel::{KernelError, KernelIntrospect, KernelSolidHandle};
use reactor_shapes::GeometryWarning;
use reactor_types::Color;
use serde::{Deserialize, Serialize};

/// What part of the machine a body stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRole {
    /// A caller-supplied cutter, carried for reference.
    ExtraCutShape,
    /// The reactor covered by a caller-supplied mask.
    ExtraIntersect,
    InboardCylinder,
    OutboardBlanket,
    Divertor,
    Plasma,
}

impl BodyRole {
    /// Bodies that make up the machine itself, as opposed to caller tools
    /// and the plasma.
    pub fn is_structure(self) -> bool {
        matches!(
            self,
            BodyRole::InboardCylinder | BodyRole::OutboardBlanket | BodyRole::Divertor
        )
    }
}

/// One named solid of an assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyBody {
    pub name: String,
    pub color: Color,
    pub solid: KernelSolidHandle,
    pub role: BodyRole,
}

/// Ordered, named bodies returned by a composer. Read-only once built.
///
/// Body order is part of the contract: caller cut shapes, masked bodies,
/// inboard cylinders, outboard blankets, divertors, and the plasma last.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    bodies: Vec<AssemblyBody>,
    warnings: Vec<GeometryWarning>,
}

impl Assembly {
    pub(crate) fn new(bodies: Vec<AssemblyBody>, warnings: Vec<GeometryWarning>) -> Self {
        Self { bodies, warnings }
    }

    pub fn bodies(&self) -> &[AssemblyBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.bodies.iter().map(|b| b.name.as_str()).collect()
    }

    /// First body with the given name.
    pub fn find(&self, name: &str) -> Option<&AssemblyBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn with_role(&self, role: BodyRole) -> impl Iterator<Item = &AssemblyBody> {
        self.bodies.iter().filter(move |b| b.role == role)
    }

    /// Geometry warnings raised while composing.
    pub fn warnings(&self) -> &[GeometryWarning] {
        &self.warnings
    }

    /// Volume of every body, in body order.
    pub fn volumes(&self, kernel: &dyn KernelIntrospect) -> Result<Vec<f64>, KernelError> {
        self.bodies.iter().map(|b| kernel.volume(&b.solid)).collect()
    }

    /// Summed volume of the machine structure: cylinders, blankets and
    /// divertors.
    pub fn structure_volume(&self, kernel: &dyn KernelIntrospect) -> Result<f64, KernelError> {
        self.bodies
            .iter()
            .filter(|b| b.role.is_structure())
            .map(|b| kernel.volume(&b.solid))
            .sum()
    }
}
