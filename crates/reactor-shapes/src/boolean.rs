use reactor_kernel::{Kernel, KernelSolidHandle};
use tracing::debug;

use crate::kernel_ext::KernelBundle;
use crate::types::ShapeError;

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Union,
    Subtract,
    Intersect,
}

/// Execute a boolean operation between two solids.
pub fn apply_boolean(
    kb: &mut dyn KernelBundle,
    body_a: &KernelSolidHandle,
    body_b: &KernelSolidHandle,
    kind: BooleanKind,
) -> Result<KernelSolidHandle, ShapeError> {
    let handle = match kind {
        BooleanKind::Union => kb.boolean_union(body_a, body_b)?,
        BooleanKind::Subtract => kb.boolean_subtract(body_a, body_b)?,
        BooleanKind::Intersect => kb.boolean_intersect(body_a, body_b)?,
    };
    debug!(
        ?kind,
        a = body_a.raw(),
        b = body_b.raw(),
        result = handle.raw(),
        "boolean"
    );
    Ok(handle)
}

/// Apply the same boolean with every tool body in turn, left to right.
pub fn fold_boolean(
    kb: &mut dyn KernelBundle,
    base: &KernelSolidHandle,
    tools: &[KernelSolidHandle],
    kind: BooleanKind,
) -> Result<KernelSolidHandle, ShapeError> {
    let mut current = base.clone();
    for tool in tools {
        current = apply_boolean(kb, &current, tool, kind)?;
    }
    Ok(current)
}

/// Union of all solids, or `None` for an empty slice.
pub fn union_all(
    kb: &mut dyn KernelBundle,
    solids: &[KernelSolidHandle],
) -> Result<Option<KernelSolidHandle>, ShapeError> {
    let Some((first, rest)) = solids.split_first() else {
        return Ok(None);
    };
    fold_boolean(kb, first, rest, BooleanKind::Union).map(Some)
}
