//! Implements basic definitions shared by the FEM and material modules

mod enums;
pub use crate::base::enums::*;
