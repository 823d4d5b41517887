//! Implements the symbolic expression engine used by parsed materials

mod compiled;
mod expr;
mod function;
mod parser;
pub use crate::symbolic::compiled::*;
pub use crate::symbolic::expr::*;
pub use crate::symbolic::function::*;
pub use crate::symbolic::parser::*;
