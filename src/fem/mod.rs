//! Implements the FEM-facing structures: variables, boundaries, and periodic pairings

mod bc_periodic;
mod boundaries;
mod dof_map;
mod ghosting;
mod periodic;
mod problem;
mod variables;
pub use crate::fem::bc_periodic::*;
pub use crate::fem::boundaries::*;
pub use crate::fem::dof_map::*;
pub use crate::fem::ghosting::*;
pub use crate::fem::periodic::*;
pub use crate::fem::problem::*;
pub use crate::fem::variables::*;
