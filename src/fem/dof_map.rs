use super::PeriodicBoundary;
use crate::base::VariableId;
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the DOF-map surface relevant to periodic boundary conditions
///
/// The full DOF numbering machinery belongs to the mesh library; this
/// structure records the registered periodic pairings and which variables they
/// constrain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DofMap {
    /// All registered periodic pairings in registration order
    pub periodic: Vec<PeriodicBoundary>,
}

impl DofMap {
    /// Allocates a new instance
    pub fn new() -> Self {
        DofMap { periodic: Vec::new() }
    }

    /// Registers a single periodic pairing
    pub fn add_periodic_boundary(&mut self, pairing: PeriodicBoundary) {
        self.periodic.push(pairing);
    }

    /// Registers a matched forward/inverse pair of periodic pairings
    ///
    /// The inverse pairing must have primary and secondary boundaries swapped
    /// with respect to the forward pairing.
    pub fn add_periodic_boundary_pair(
        &mut self,
        forward: PeriodicBoundary,
        inverse: PeriodicBoundary,
    ) -> Result<(), StrError> {
        if inverse.primary != forward.secondary || inverse.secondary != forward.primary {
            return Err("inverse pairing must swap the primary and secondary boundaries");
        }
        self.periodic.push(forward);
        self.periodic.push(inverse);
        Ok(())
    }

    /// Returns the number of registered pairings
    pub fn n_periodic(&self) -> usize {
        self.periodic.len()
    }

    /// Tells whether a variable is constrained by any pairing
    pub fn is_periodic_variable(&self, variable: VariableId) -> bool {
        self.periodic.iter().any(|p| p.variables.contains(&variable))
    }
}

impl fmt::Display for DofMap {
    /// Prints a formatted summary of the periodic pairings
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Periodic pairings\n").unwrap();
        write!(f, "=================\n").unwrap();
        for pairing in &self.periodic {
            write!(f, "{}\n", pairing).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::DofMap;
    use crate::fem::PeriodicBoundary;

    #[test]
    fn add_periodic_boundary_works() {
        let mut dof_map = DofMap::new();
        let mut pb = PeriodicBoundary::new_translation(0, 1, &[1.0, 0.0]);
        pb.set_variable(0);
        dof_map.add_periodic_boundary(pb);
        assert_eq!(dof_map.n_periodic(), 1);
        assert!(dof_map.is_periodic_variable(0));
        assert!(!dof_map.is_periodic_variable(1));
    }

    #[test]
    fn add_periodic_boundary_pair_works() {
        let mut dof_map = DofMap::new();
        let functions = vec!["f".to_string()];
        let forward = PeriodicBoundary::new_transform(0, 1, &functions);
        let inverse = PeriodicBoundary::new_transform(1, 0, &functions);
        dof_map.add_periodic_boundary_pair(forward, inverse).unwrap();
        assert_eq!(dof_map.n_periodic(), 2);

        let forward = PeriodicBoundary::new_transform(0, 1, &functions);
        let not_swapped = PeriodicBoundary::new_transform(0, 1, &functions);
        assert_eq!(
            dof_map.add_periodic_boundary_pair(forward, not_swapped).err(),
            Some("inverse pairing must swap the primary and secondary boundaries")
        );
    }

    #[test]
    fn display_works() {
        let mut dof_map = DofMap::new();
        dof_map.add_periodic_boundary(PeriodicBoundary::new_translation(0, 1, &[1.0]));
        assert_eq!(
            format!("{}", dof_map),
            "Periodic pairings\n\
             =================\n\
             periodic(0 -> 1) translation = [1.0], variables = []\n"
        );
    }
}
