//! Implements parsed materials and the derivative assembly engine

mod assembly;
mod derivative_parsed;
mod parsed;
mod property;
pub use crate::material::assembly::*;
pub use crate::material::derivative_parsed::*;
pub use crate::material::parsed::*;
pub use crate::material::property::*;
