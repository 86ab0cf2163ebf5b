use reactor_kernel::{Kernel, KernelIntrospect};

/// Combined trait for operations that need both mutable Kernel access
/// and read-only KernelIntrospect access on the same object.
///
/// Every shape, builder and composer takes `&mut dyn KernelBundle`; the
/// kernel is always an explicit collaborator.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

// Blanket implementation for any type that implements both traits
impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
