use super::{Boundaries, FemProblem, GhostLayers, GhostingKind, PeriodicBoundary, Variables};
use crate::base::Axis;
use crate::StrError;
use gemlab::mesh::Mesh;

/// Configures periodic boundary conditions
///
/// Exactly one of three modes must be selected:
///
/// 1. *auto-direction* -- paired boundaries are auto-detected on an orthogonal
///    mesh, one translation pairing per requested axis, with the translation
///    magnitude equal to the mesh extent along that axis;
/// 2. *explicit translation* -- named primary/secondary boundaries are paired
///    under a fixed translation vector;
/// 3. *functional transform* -- named forward and inverse transform functions
///    map coordinates between the primary and secondary boundaries (two
///    pairings are registered, the inverse one with the boundaries swapped).
///
/// Every pairing is installed into the primary DOF map and, when the problem
/// carries a displaced shadow, into the displaced DOF map as well; both paired
/// boundaries are marked for ghosting. When no target variables are given, the
/// pairing applies to all (non-scalar) system variables.
pub struct BcPeriodic {
    /// Name of this boundary condition (used in relationship manager names)
    pub name: String,

    /// Axes for auto-detected translation pairings
    auto_direction: Vec<Axis>,

    /// Translation vector for the explicit translation mode
    translation: Option<Vec<f64>>,

    /// Name of the primary boundary (translation and transform modes)
    primary: Option<String>,

    /// Name of the secondary boundary (translation and transform modes)
    secondary: Option<String>,

    /// Names of the forward transform functions, one per space dimension
    transform: Vec<String>,

    /// Names of the inverse transform functions, one per space dimension
    inv_transform: Vec<String>,

    /// Target variable names (empty means all system variables)
    variables: Vec<String>,
}

impl BcPeriodic {
    /// Allocates a new instance with no mode selected
    pub fn new(name: &str) -> Self {
        BcPeriodic {
            name: name.to_string(),
            auto_direction: Vec::new(),
            translation: None,
            primary: None,
            secondary: None,
            transform: Vec::new(),
            inv_transform: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Sets the axes for the auto-direction mode
    pub fn set_auto_direction(&mut self, axes: &[Axis]) -> Result<&mut Self, StrError> {
        if axes.is_empty() {
            return Err("at least one axis is required for auto_direction");
        }
        self.auto_direction = axes.to_vec();
        Ok(self)
    }

    /// Sets the primary and secondary boundary names
    pub fn set_boundaries(&mut self, primary: &str, secondary: &str) -> &mut Self {
        self.primary = Some(primary.to_string());
        self.secondary = Some(secondary.to_string());
        self
    }

    /// Sets the translation vector (explicit translation mode)
    pub fn set_translation(&mut self, delta: &[f64]) -> Result<&mut Self, StrError> {
        if delta.is_empty() || delta.len() > 3 {
            return Err("translation vector must have one, two, or three components");
        }
        self.translation = Some(delta.to_vec());
        Ok(self)
    }

    /// Sets the forward transform function names (functional transform mode)
    pub fn set_transform(&mut self, functions: &[&str]) -> &mut Self {
        self.transform = functions.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Sets the inverse transform function names (functional transform mode)
    pub fn set_inv_transform(&mut self, functions: &[&str]) -> &mut Self {
        self.inv_transform = functions.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Sets the target variables (default: all system variables)
    pub fn set_variables(&mut self, names: &[&str]) -> &mut Self {
        self.variables = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Registers the ghosting relationship manager (separate lifecycle phase)
    ///
    /// One layer of element side neighbors, geometric and algebraic. The
    /// relationship cannot be attached early: the periodic pairing objects
    /// must exist before the exchange runs.
    pub fn configure_ghosting(&self, problem: &mut FemProblem) -> Result<(), StrError> {
        let name = format!("periodic_bc_ghosting_{}", self.name);
        let mut ghost_layers = GhostLayers::new(&name, "PeriodicBcs", 1)?;
        ghost_layers
            .set_kind(GhostingKind::GeometricAndAlgebraic)
            .set_attach_early(false);
        problem.ghost_layers.push(ghost_layers);
        Ok(())
    }

    /// Applies the boundary condition, registering pairings with the DOF map(s)
    pub fn apply(&self, mesh: &Mesh, boundaries: &mut Boundaries, problem: &mut FemProblem) -> Result<(), StrError> {
        if !self.auto_direction.is_empty() {
            return self.apply_auto(mesh, boundaries, problem);
        }
        if self.translation.is_some() {
            return self.apply_translation(mesh, boundaries, problem);
        }
        if !self.transform.is_empty() {
            return self.apply_transform(mesh, boundaries, problem);
        }
        Err("either auto_direction, translation, or transform functions must be given to the periodic boundary condition")
    }

    /// Handles the auto-direction mode
    fn apply_auto(&self, mesh: &Mesh, boundaries: &mut Boundaries, problem: &mut FemProblem) -> Result<(), StrError> {
        if problem.distributed {
            // with a distributed mesh we ghost all known boundaries, because at
            // this stage we cannot tell which ones the pairings will need
            for id in boundaries.all_ids() {
                problem.add_ghosted_boundary(id);
            }
            if Boundaries::orthogonal_ranges(mesh).is_err() {
                return Err("cannot detect orthogonal dimension ranges for a distributed mesh");
            }
        }
        for axis in &self.auto_direction {
            match axis {
                Axis::X => (),
                Axis::Y => {
                    if mesh.ndim < 2 {
                        return Err("cannot wrap the y-direction with a 1D mesh");
                    }
                }
                Axis::Z => {
                    if mesh.ndim < 3 {
                        return Err("cannot wrap the z-direction with a 1D or 2D mesh");
                    }
                }
            }
            let (primary, secondary) = boundaries.pair(mesh, *axis)?;
            let mut delta = vec![0.0; mesh.ndim];
            delta[axis.index()] = Boundaries::extent(mesh, *axis)?;
            let mut pairing = PeriodicBoundary::new_translation(primary, secondary, &delta);
            self.attach_variables(&mut pairing, &problem.variables)?;
            problem.add_ghosted_boundary(primary).add_ghosted_boundary(secondary);
            install(problem, pairing);
        }
        Ok(())
    }

    /// Handles the explicit translation mode
    fn apply_translation(
        &self,
        mesh: &Mesh,
        boundaries: &Boundaries,
        problem: &mut FemProblem,
    ) -> Result<(), StrError> {
        let delta = self.translation.as_ref().unwrap(); // mode already selected
        if delta.len() != mesh.ndim {
            return Err("translation vector must have one component per space dimension");
        }
        let (primary, secondary) = self.named_boundaries(boundaries)?;
        let mut pairing = PeriodicBoundary::new_translation(primary, secondary, delta);
        self.attach_variables(&mut pairing, &problem.variables)?;
        problem.add_ghosted_boundary(primary).add_ghosted_boundary(secondary);
        install(problem, pairing);
        Ok(())
    }

    /// Handles the functional transform mode
    fn apply_transform(&self, mesh: &Mesh, boundaries: &Boundaries, problem: &mut FemProblem) -> Result<(), StrError> {
        // the inverse of an arbitrary transform cannot be formed automatically
        if self.inv_transform.is_empty() {
            return Err("an inverse transform function must be given together with the transform function");
        }
        if self.transform.len() != mesh.ndim || self.inv_transform.len() != mesh.ndim {
            return Err("one transform function per space dimension is required");
        }
        let (primary, secondary) = self.named_boundaries(boundaries)?;

        let mut forward = PeriodicBoundary::new_transform(primary, secondary, &self.transform);
        self.attach_variables(&mut forward, &problem.variables)?;

        // the inverse pairing swaps the boundaries
        let mut inverse = PeriodicBoundary::new_transform(secondary, primary, &self.inv_transform);
        self.attach_variables(&mut inverse, &problem.variables)?;

        problem.add_ghosted_boundary(primary).add_ghosted_boundary(secondary);
        if let Some(displaced) = problem.displaced.as_mut() {
            displaced.add_periodic_boundary_pair(forward.clone(), inverse.clone())?;
        }
        problem.dof_map.add_periodic_boundary_pair(forward, inverse)
    }

    /// Resolves the primary and secondary boundary names to ids
    fn named_boundaries(&self, boundaries: &Boundaries) -> Result<(usize, usize), StrError> {
        match (&self.primary, &self.secondary) {
            (Some(primary), Some(secondary)) => Ok((boundaries.id(primary)?, boundaries.id(secondary)?)),
            _ => Err("primary and secondary boundary names are required for the periodic boundary condition"),
        }
    }

    /// Attaches the target variables to a pairing
    ///
    /// An empty target list means all system variables. Scalar variables are
    /// not attached to periodic pairings.
    fn attach_variables(&self, pairing: &mut PeriodicBoundary, variables: &Variables) -> Result<(), StrError> {
        let names: Vec<String> = if self.variables.is_empty() {
            variables.names().iter().map(|s| s.to_string()).collect()
        } else {
            self.variables.clone()
        };
        for name in &names {
            if variables.is_scalar(name)? {
                continue;
            }
            pairing.set_variable(variables.number(name)?);
        }
        Ok(())
    }
}

/// Installs a pairing into the primary and (if present) displaced DOF maps
fn install(problem: &mut FemProblem, pairing: PeriodicBoundary) {
    if let Some(displaced) = problem.displaced.as_mut() {
        displaced.add_periodic_boundary(pairing.clone());
    }
    problem.dof_map.add_periodic_boundary(pairing);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
