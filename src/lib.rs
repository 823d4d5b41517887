//! Multiphysics simulation toolkit: periodic boundary setup and derivative-parsed materials
//!
//! This crate implements two companion pieces of a finite element framework:
//!
//! 1. [`BcPeriodic`] -- a configurator that turns user intent (auto-detected
//!    directions, an explicit translation vector, or forward/inverse transform
//!    functions) into periodic boundary pairings registered with the DOF map.
//! 2. [`DerivativeParsedMaterial`] -- a material that parses a symbolic
//!    expression, assembles every distinct partial derivative up to a requested
//!    order, and evaluates the resulting expressions per integration point.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod material;
pub mod symbolic;

pub use crate::base::*;
pub use crate::fem::*;
pub use crate::material::*;
pub use crate::symbolic::*;
