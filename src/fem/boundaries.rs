use crate::base::{Axis, BoundaryId};
use crate::StrError;
use gemlab::mesh::{Mesh, PointId};

/// Relative tolerance for deciding that a point lies on an extreme plane
const PLANE_TOL: f64 = 1e-10;

/// Holds named boundary regions (point sets) of a mesh
///
/// Boundaries are registered explicitly by name or auto-detected as the
/// extreme planes of an orthogonal (box-shaped) mesh.
pub struct Boundaries {
    /// Boundary names; the position is the BoundaryId
    names: Vec<String>,

    /// Point sets, one per boundary
    points: Vec<Vec<PointId>>,
}

impl Boundaries {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        Boundaries {
            names: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Registers a named boundary and returns its id
    pub fn set(&mut self, name: &str, points: &[PointId]) -> Result<BoundaryId, StrError> {
        if self.names.iter().any(|n| n == name) {
            return Err("a boundary with the given name exists already");
        }
        if points.is_empty() {
            return Err("a boundary requires at least one point");
        }
        self.names.push(name.to_string());
        self.points.push(points.to_vec());
        Ok(self.names.len() - 1)
    }

    /// Returns the id of a named boundary
    pub fn id(&self, name: &str) -> Result<BoundaryId, StrError> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or("cannot find boundary with the given name")
    }

    /// Returns the points of a boundary
    pub fn points(&self, id: BoundaryId) -> Result<&[PointId], StrError> {
        match self.points.get(id) {
            Some(points) => Ok(points),
            None => Err("boundary id is out-of-bounds"),
        }
    }

    /// Returns all registered boundary ids
    pub fn all_ids(&self) -> Vec<BoundaryId> {
        (0..self.names.len()).collect()
    }

    /// Detects the coordinate ranges of an orthogonal mesh
    ///
    /// Returns one (min, max) pair per space dimension or fails when a range
    /// is degenerate (the mesh cannot host auto-detected periodic pairs).
    pub fn orthogonal_ranges(mesh: &Mesh) -> Result<Vec<(f64, f64)>, StrError> {
        if mesh.points.is_empty() {
            return Err("mesh has no points");
        }
        let mut ranges = vec![(f64::MAX, f64::MIN); mesh.ndim];
        for point in &mesh.points {
            for dim in 0..mesh.ndim {
                ranges[dim].0 = f64::min(ranges[dim].0, point.coords[dim]);
                ranges[dim].1 = f64::max(ranges[dim].1, point.coords[dim]);
            }
        }
        if ranges.iter().any(|(min, max)| max - min <= 0.0) {
            return Err("cannot detect orthogonal dimension ranges for this mesh");
        }
        Ok(ranges)
    }

    /// Returns the extent of the mesh along an axis
    pub fn extent(mesh: &Mesh, axis: Axis) -> Result<f64, StrError> {
        if axis.index() >= mesh.ndim {
            return Err("axis does not exist in the mesh space dimension");
        }
        let ranges = Self::orthogonal_ranges(mesh)?;
        let (min, max) = ranges[axis.index()];
        Ok(max - min)
    }

    /// Auto-detects (and registers) the paired boundaries orthogonal to an axis
    ///
    /// The two boundaries collect the points on the minimum and maximum planes
    /// of the axis; they are registered under the names `<axis>min` and
    /// `<axis>max` (reused when already present). Fails when the planes cannot
    /// be paired (empty or with mismatched point counts).
    pub fn pair(&mut self, mesh: &Mesh, axis: Axis) -> Result<(BoundaryId, BoundaryId), StrError> {
        if axis.index() >= mesh.ndim {
            return Err("axis does not exist in the mesh space dimension");
        }
        let ranges = Self::orthogonal_ranges(mesh)?;
        let (min, max) = ranges[axis.index()];
        let tol = PLANE_TOL * f64::max(1.0, max - min);
        let mut min_points = Vec::new();
        let mut max_points = Vec::new();
        for point in &mesh.points {
            let coord = point.coords[axis.index()];
            if (coord - min).abs() <= tol {
                min_points.push(point.id);
            } else if (coord - max).abs() <= tol {
                max_points.push(point.id);
            }
        }
        if min_points.is_empty() || min_points.len() != max_points.len() {
            return Err("cannot auto-detect a paired boundary for the periodic boundary condition");
        }
        let min_name = format!("{}min", axis);
        let max_name = format!("{}max", axis);
        let min_id = match self.id(&min_name) {
            Ok(id) => id,
            Err(_) => self.set(&min_name, &min_points)?,
        };
        let max_id = match self.id(&max_name) {
            Ok(id) => id,
            Err(_) => self.set(&max_name, &max_points)?,
        };
        Ok((min_id, max_id))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Boundaries;
    use crate::base::Axis;
    use gemlab::mesh::{Cell, Mesh, Point};
    use gemlab::shapes::GeoKind;
    use russell_lab::approx_eq;

    /// Returns a 2x1 rectangle with a single Qua4 cell
    fn rectangle() -> Mesh {
        Mesh {
            ndim: 2,
            points: vec![
                Point { id: 0, marker: 0, coords: vec![0.0, 0.0] },
                Point { id: 1, marker: 0, coords: vec![2.0, 0.0] },
                Point { id: 2, marker: 0, coords: vec![2.0, 1.0] },
                Point { id: 3, marker: 0, coords: vec![0.0, 1.0] },
            ],
            cells: vec![Cell { id: 0, attribute: 1, kind: GeoKind::Qua4, points: vec![0, 1, 2, 3] }],
        }
    }

    #[test]
    fn set_and_id_work() {
        let mut boundaries = Boundaries::new();
        let left = boundaries.set("left", &[0, 3]).unwrap();
        let right = boundaries.set("right", &[1, 2]).unwrap();
        assert_eq!(left, 0);
        assert_eq!(right, 1);
        assert_eq!(boundaries.id("right").unwrap(), 1);
        assert_eq!(boundaries.points(0).unwrap(), &[0, 3]);
        assert_eq!(boundaries.all_ids(), &[0, 1]);
        assert_eq!(boundaries.id("top").err(), Some("cannot find boundary with the given name"));
        assert_eq!(boundaries.points(7).err(), Some("boundary id is out-of-bounds"));
        assert_eq!(
            boundaries.set("left", &[0]).err(),
            Some("a boundary with the given name exists already")
        );
        assert_eq!(boundaries.set("empty", &[]).err(), Some("a boundary requires at least one point"));
    }

    #[test]
    fn orthogonal_ranges_works() {
        let mesh = rectangle();
        let ranges = Boundaries::orthogonal_ranges(&mesh).unwrap();
        assert_eq!(ranges, &[(0.0, 2.0), (0.0, 1.0)]);
        approx_eq(Boundaries::extent(&mesh, Axis::X).unwrap(), 2.0, 1e-15);
        approx_eq(Boundaries::extent(&mesh, Axis::Y).unwrap(), 1.0, 1e-15);
        assert_eq!(
            Boundaries::extent(&mesh, Axis::Z).err(),
            Some("axis does not exist in the mesh space dimension")
        );
    }

    #[test]
    fn orthogonal_ranges_captures_degenerate_meshes() {
        let mut mesh = rectangle();
        for point in &mut mesh.points {
            point.coords[1] = 0.0; // collapse the y-range
        }
        assert_eq!(
            Boundaries::orthogonal_ranges(&mesh).err(),
            Some("cannot detect orthogonal dimension ranges for this mesh")
        );
    }

    #[test]
    fn pair_works() {
        let mesh = rectangle();
        let mut boundaries = Boundaries::new();
        let (xmin, xmax) = boundaries.pair(&mesh, Axis::X).unwrap();
        assert_eq!(boundaries.points(xmin).unwrap(), &[0, 3]);
        assert_eq!(boundaries.points(xmax).unwrap(), &[1, 2]);
        // calling again reuses the registered boundaries
        let (again_min, again_max) = boundaries.pair(&mesh, Axis::X).unwrap();
        assert_eq!((again_min, again_max), (xmin, xmax));
        let (ymin, ymax) = boundaries.pair(&mesh, Axis::Y).unwrap();
        assert_eq!(boundaries.points(ymin).unwrap(), &[0, 1]);
        assert_eq!(boundaries.points(ymax).unwrap(), &[2, 3]);
    }

    #[test]
    fn pair_captures_unpairable_planes() {
        let mut mesh = rectangle();
        // move one corner off the xmax plane: 1 point on xmax vs 2 on xmin
        mesh.points[2].coords[0] = 1.5;
        let mut boundaries = Boundaries::new();
        assert_eq!(
            boundaries.pair(&mesh, Axis::X).err(),
            Some("cannot auto-detect a paired boundary for the periodic boundary condition")
        );
    }
}
