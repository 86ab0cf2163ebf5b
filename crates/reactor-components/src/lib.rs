//! Profile builders for reactor components.
//!
//! Every builder validates its inputs and returns a configured
//! [`ShapeEnvelope`](reactor_shapes::ShapeEnvelope); the solid is only
//! built when the envelope is asked for it.

pub mod arc_blanket;
pub mod blanket;
pub mod coils;
pub mod cylinder;
pub mod divertor;
pub mod dome;
pub mod error;
pub mod plasma;
pub mod tf_coils;
pub mod thickness;
pub mod wedge;

pub use arc_blanket::blanket_constant_thickness_arc_h;
pub use blanket::{blanket_from_plasma, blanket_points, BlanketParams};
pub use coils::{poloidal_field_coil, poloidal_field_coil_case};
pub use cylinder::{center_column_shield_cylinder, ReferencePoint};
pub use divertor::divertor_envelope;
pub use dome::{
    constant_thickness_dome, dished_vacuum_vessel, u_shaped_dome, DomeParams, DomeSide,
    VesselParams,
};
pub use error::ComponentError;
pub use plasma::{plasma_simplified, PlasmaShape, PLASMA_COLOR};
pub use tf_coils::{
    evenly_spaced_angles, toroidal_field_coil_princeton_d, toroidal_field_coil_rectangle,
    PrincetonDParams, RectangleCoilParams,
};
pub use thickness::ThicknessSpec;
pub use wedge::cutting_wedge;
