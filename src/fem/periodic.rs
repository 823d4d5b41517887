use crate::base::{BoundaryId, VariableId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines how coordinates on the primary boundary map to the secondary boundary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PeriodicMapping {
    /// Fixed translation vector (one component per space dimension)
    Translation(Vec<f64>),

    /// Named transform functions, one per space dimension, evaluated by the
    /// mesh library to map primary coordinates to secondary coordinates
    Transform(Vec<String>),
}

/// Describes a periodic boundary pairing
///
/// Degrees of freedom of the attached variables on the primary boundary are
/// constrained to match those on the secondary boundary under the mapping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeriodicBoundary {
    /// The primary boundary
    pub primary: BoundaryId,

    /// The paired (secondary) boundary
    pub secondary: BoundaryId,

    /// The coordinate mapping from primary to secondary
    pub mapping: PeriodicMapping,

    /// Numbers of the variables constrained by this pairing
    pub variables: Vec<VariableId>,
}

impl PeriodicBoundary {
    /// Allocates a translation-type pairing
    pub fn new_translation(primary: BoundaryId, secondary: BoundaryId, delta: &[f64]) -> Self {
        PeriodicBoundary {
            primary,
            secondary,
            mapping: PeriodicMapping::Translation(delta.to_vec()),
            variables: Vec::new(),
        }
    }

    /// Allocates a function-type pairing
    pub fn new_transform(primary: BoundaryId, secondary: BoundaryId, functions: &[String]) -> Self {
        PeriodicBoundary {
            primary,
            secondary,
            mapping: PeriodicMapping::Transform(functions.to_vec()),
            variables: Vec::new(),
        }
    }

    /// Attaches a variable to this pairing (at most once)
    pub fn set_variable(&mut self, variable: VariableId) {
        if !self.variables.contains(&variable) {
            self.variables.push(variable);
        }
    }
}

impl fmt::Display for PeriodicBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mapping {
            PeriodicMapping::Translation(delta) => write!(
                f,
                "periodic({} -> {}) translation = {:?}, variables = {:?}",
                self.primary, self.secondary, delta, self.variables
            ),
            PeriodicMapping::Transform(functions) => write!(
                f,
                "periodic({} -> {}) transform = {:?}, variables = {:?}",
                self.primary, self.secondary, functions, self.variables
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{PeriodicBoundary, PeriodicMapping};

    #[test]
    fn new_translation_works() {
        let mut pb = PeriodicBoundary::new_translation(0, 1, &[2.0, 0.0]);
        assert_eq!(pb.mapping, PeriodicMapping::Translation(vec![2.0, 0.0]));
        pb.set_variable(0);
        pb.set_variable(1);
        pb.set_variable(0); // ignored
        assert_eq!(pb.variables, &[0, 1]);
        assert_eq!(
            format!("{}", pb),
            "periodic(0 -> 1) translation = [2.0, 0.0], variables = [0, 1]"
        );
    }

    #[test]
    fn new_transform_works() {
        let functions = vec!["fwd_x".to_string(), "fwd_y".to_string()];
        let pb = PeriodicBoundary::new_transform(3, 4, &functions);
        assert_eq!(pb.mapping, PeriodicMapping::Transform(functions));
        assert_eq!(
            format!("{}", pb),
            "periodic(3 -> 4) transform = [\"fwd_x\", \"fwd_y\"], variables = []"
        );
    }
}
