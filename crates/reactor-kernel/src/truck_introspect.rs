//! KernelIntrospect for TruckKernel: measurements on faceted solids and
//! topology counts.

use crate::tessellation;
use crate::traits::KernelIntrospect;
use crate::truck_kernel::TruckKernel;
use crate::types::*;

/// Direct KernelIntrospect implementation on TruckKernel.
/// This allows TruckKernel to satisfy the KernelBundle blanket impl (Kernel + KernelIntrospect).
impl KernelIntrospect for TruckKernel {
    fn contains_solid(&self, solid: &KernelSolidHandle) -> bool {
        self.get_body(solid).is_ok()
    }

    fn volume(&self, solid: &KernelSolidHandle) -> Result<f64, KernelError> {
        Ok(self
            .get_body(solid)?
            .iter()
            .map(|s| tessellation::measure_solid(s, tessellation::query_tolerance(s)).volume)
            .sum())
    }

    fn surface_area(&self, solid: &KernelSolidHandle) -> Result<f64, KernelError> {
        Ok(self
            .get_body(solid)?
            .iter()
            .map(|s| tessellation::measure_solid(s, tessellation::query_tolerance(s)).area)
            .sum())
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Result<BoundingBox, KernelError> {
        Ok(self
            .get_body(solid)?
            .iter()
            .map(|s| tessellation::measure_solid(s, tessellation::query_tolerance(s)).bounds)
            .fold(BoundingBox::empty(), |acc, bb| acc.union(&bb)))
    }

    fn face_count(&self, solid: &KernelSolidHandle) -> Result<usize, KernelError> {
        Ok(self
            .get_body(solid)?
            .iter()
            .map(|s| {
                s.boundaries()
                    .iter()
                    .map(|shell| shell.face_iter().count())
                    .sum::<usize>()
            })
            .sum())
    }
}
