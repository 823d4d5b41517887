use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;
use mpsim::{Axis, BcPeriodic, Boundaries, FemProblem, PeriodicMapping, StrError};
use russell_lab::approx_eq;

/// Returns a 2 x 1 x 3 box with a single Hex8 cell
fn box_mesh() -> Mesh {
    Mesh {
        ndim: 3,
        points: vec![
            Point { id: 0, marker: 0, coords: vec![0.0, 0.0, 0.0] },
            Point { id: 1, marker: 0, coords: vec![2.0, 0.0, 0.0] },
            Point { id: 2, marker: 0, coords: vec![2.0, 1.0, 0.0] },
            Point { id: 3, marker: 0, coords: vec![0.0, 1.0, 0.0] },
            Point { id: 4, marker: 0, coords: vec![0.0, 0.0, 3.0] },
            Point { id: 5, marker: 0, coords: vec![2.0, 0.0, 3.0] },
            Point { id: 6, marker: 0, coords: vec![2.0, 1.0, 3.0] },
            Point { id: 7, marker: 0, coords: vec![0.0, 1.0, 3.0] },
        ],
        cells: vec![Cell {
            id: 0,
            attribute: 1,
            kind: GeoKind::Hex8,
            points: vec![0, 1, 2, 3, 4, 5, 6, 7],
        }],
    }
}

#[test]
fn test_periodic_bc_auto_direction() -> Result<(), StrError> {
    // mesh and problem with two field variables and one scalar variable
    let mesh = box_mesh();
    let mut boundaries = Boundaries::new();
    let mut problem = FemProblem::new();
    problem.variables.add_field("c")?;
    problem.variables.add_field("mu")?;
    problem.variables.add_scalar("lambda")?;

    // wrap the x and y directions
    let mut bc = BcPeriodic::new("wrap_xy");
    bc.set_auto_direction(&[Axis::X, Axis::Y])?;
    bc.configure_ghosting(&mut problem)?;
    bc.apply(&mesh, &mut boundaries, &mut problem)?;

    // exactly one translation pairing per requested axis
    assert_eq!(problem.dof_map.n_periodic(), 2);
    let expected = [(2.0, 0.0, 0.0), (0.0, 1.0, 0.0)];
    for (pairing, (dx, dy, dz)) in problem.dof_map.periodic.iter().zip(&expected) {
        match &pairing.mapping {
            PeriodicMapping::Translation(delta) => {
                approx_eq(delta[0], *dx, 1e-15);
                approx_eq(delta[1], *dy, 1e-15);
                approx_eq(delta[2], *dz, 1e-15);
            }
            _ => panic!("auto-detected pairings must be translations"),
        }
        // all field variables attached; the scalar variable is exempt
        assert_eq!(pairing.variables, &[0, 1]);
    }

    // paired plane boundaries were auto-registered and ghosted
    assert_eq!(boundaries.points(boundaries.id("xmin")?)?, &[0, 3, 4, 7]);
    assert_eq!(boundaries.points(boundaries.id("xmax")?)?, &[1, 2, 5, 6]);
    assert_eq!(boundaries.points(boundaries.id("ymin")?)?, &[0, 1, 4, 5]);
    assert_eq!(boundaries.points(boundaries.id("ymax")?)?, &[2, 3, 6, 7]);
    assert_eq!(problem.ghosted_boundaries.len(), 4);

    // the ghosting relationship manager was registered separately
    assert_eq!(problem.ghost_layers.len(), 1);
    assert_eq!(problem.ghost_layers[0].name, "periodic_bc_ghosting_wrap_xy");
    assert!(!problem.ghost_layers[0].attach_early);
    Ok(())
}

#[test]
fn test_periodic_bc_translation() -> Result<(), StrError> {
    // mesh, named boundaries, and problem with a displaced shadow DOF map
    let mesh = box_mesh();
    let mut boundaries = Boundaries::new();
    let left = boundaries.set("left", &[0, 3, 4, 7])?;
    let right = boundaries.set("right", &[1, 2, 5, 6])?;
    let mut problem = FemProblem::new();
    problem.variables.add_field("c")?;
    problem.enable_displaced();

    // explicit translation pairing
    let mut bc = BcPeriodic::new("wrap_x");
    bc.set_boundaries("left", "right");
    bc.set_translation(&[2.0, 0.0, 0.0])?;
    bc.apply(&mesh, &mut boundaries, &mut problem)?;

    // one pairing, registered in the primary and displaced maps
    assert_eq!(problem.dof_map.n_periodic(), 1);
    let pairing = &problem.dof_map.periodic[0];
    assert_eq!((pairing.primary, pairing.secondary), (left, right));
    assert!(problem.dof_map.is_periodic_variable(0));
    let displaced = problem.displaced.as_ref().unwrap();
    assert_eq!(displaced.n_periodic(), 1);

    // both paired boundaries are ghosted
    assert!(problem.ghosted_boundaries.contains(&left));
    assert!(problem.ghosted_boundaries.contains(&right));
    Ok(())
}

#[test]
fn test_periodic_bc_transform_requires_inverse() -> Result<(), StrError> {
    let mesh = box_mesh();
    let mut boundaries = Boundaries::new();
    boundaries.set("left", &[0, 3, 4, 7])?;
    boundaries.set("right", &[1, 2, 5, 6])?;
    let mut problem = FemProblem::new();
    problem.variables.add_field("c")?;

    // forward transform without an inverse must fail before registering anything
    let mut bc = BcPeriodic::new("twist");
    bc.set_boundaries("left", "right");
    bc.set_transform(&["fwd_x", "fwd_y", "fwd_z"]);
    assert_eq!(
        bc.apply(&mesh, &mut boundaries, &mut problem).err(),
        Some("an inverse transform function must be given together with the transform function")
    );
    assert_eq!(problem.dof_map.n_periodic(), 0);
    assert!(problem.ghosted_boundaries.is_empty());

    // with the inverse, two pairings appear (the inverse one with swapped boundaries)
    bc.set_inv_transform(&["inv_x", "inv_y", "inv_z"]);
    bc.apply(&mesh, &mut boundaries, &mut problem)?;
    assert_eq!(problem.dof_map.n_periodic(), 2);
    let forward = &problem.dof_map.periodic[0];
    let inverse = &problem.dof_map.periodic[1];
    assert_eq!((forward.primary, forward.secondary), (0, 1));
    assert_eq!((inverse.primary, inverse.secondary), (1, 0));
    Ok(())
}
