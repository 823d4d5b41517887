use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a boundary region (a named set of mesh points)
pub type BoundaryId = usize;

/// Identifies a system variable (unknown field)
pub type VariableId = usize;

/// Defines a coordinate axis
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the component index corresponding to this axis (x=0, y=1, z=2)
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Parses an axis from a direction string such as "X" or "x"
    pub fn from_direction(direction: &str) -> Result<Self, StrError> {
        match direction {
            "X" | "x" => Ok(Axis::X),
            "Y" | "y" => Ok(Axis::Y),
            "Z" | "z" => Ok(Axis::Z),
            _ => Err("direction string must be one of X, Y, Z (or lowercase)"),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
