use super::{DofMap, GhostLayers, Variables};
use crate::base::BoundaryId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Holds the problem-level state consumed by boundary condition actions
///
/// This is the surface of the (external) problem object that periodic
/// boundary setup needs: the variable registry, the DOF map, an optional
/// geometrically displaced shadow DOF map, the set of boundaries marked for
/// ghosting, and the registered relationship managers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FemProblem {
    /// Registry of system variables
    pub variables: Variables,

    /// The primary DOF map
    pub dof_map: DofMap,

    /// DOF map of the displaced (deformed-geometry) shadow problem, if any
    pub displaced: Option<DofMap>,

    /// Boundaries marked for ghosting across process boundaries
    pub ghosted_boundaries: HashSet<BoundaryId>,

    /// Registered ghosting relationship managers
    pub ghost_layers: Vec<GhostLayers>,

    /// Whether the mesh is distributed across processes
    pub distributed: bool,
}

impl FemProblem {
    /// Allocates a new instance
    pub fn new() -> Self {
        FemProblem {
            variables: Variables::new(),
            dof_map: DofMap::new(),
            displaced: None,
            ghosted_boundaries: HashSet::new(),
            ghost_layers: Vec::new(),
            distributed: false,
        }
    }

    /// Enables the displaced shadow problem (with its own DOF map)
    pub fn enable_displaced(&mut self) -> &mut Self {
        if self.displaced.is_none() {
            self.displaced = Some(DofMap::new());
        }
        self
    }

    /// Marks a boundary for ghosting across process boundaries
    pub fn add_ghosted_boundary(&mut self, boundary: BoundaryId) -> &mut Self {
        self.ghosted_boundaries.insert(boundary);
        self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
