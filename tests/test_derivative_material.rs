use mpsim::{DerivativeParsedMaterial, ParamParsedMaterial, PropertyDescriptor, StrError};
use russell_lab::approx_eq;

#[test]
fn test_derivative_material_third_order() -> Result<(), StrError> {
    // free energy F(c, eta) = c^2 * eta + exp(c) with all derivatives up to order 3
    let mut param = ParamParsedMaterial::new("c^2 * eta + exp(c)", &["c", "eta"]);
    param.derivative_order = 3;
    let mut material = DerivativeParsedMaterial::new("free_energy", &param, 2)?;

    // retained derivatives: c, eta, cc, c-eta, ccc, cc-eta
    // (eta-eta and everything below it vanishes and is pruned)
    assert_eq!(material.assembly.derivatives.len(), 6);
    assert_eq!(material.assembly.n_params, 2);

    // evaluate at two integration points
    let states = [(0.3, 2.0), (-1.2, 0.5)];
    for (p, (c, eta)) in states.iter().enumerate() {
        material.compute_integ_point(p, &[*c, *eta], &[])?;
    }

    // check against hand-derived expressions
    for (p, (c, eta)) in states.iter().enumerate() {
        approx_eq(material.material.value[p], c * c * eta + c.exp(), 1e-14);
        approx_eq(material.derivative(&["c"])?.unwrap()[p], 2.0 * c * eta + c.exp(), 1e-14);
        approx_eq(material.derivative(&["eta"])?.unwrap()[p], c * c, 1e-14);
        approx_eq(material.derivative(&["c", "c"])?.unwrap()[p], 2.0 * eta + c.exp(), 1e-14);
        approx_eq(material.derivative(&["c", "eta"])?.unwrap()[p], 2.0 * c, 1e-14);
        approx_eq(material.derivative(&["c", "c", "c"])?.unwrap()[p], c.exp(), 1e-14);
        approx_eq(material.derivative(&["c", "c", "eta"])?.unwrap()[p], 2.0, 1e-14);
    }

    // pruned derivatives report None regardless of the argument order
    assert!(material.derivative(&["eta", "eta"])?.is_none());
    assert!(material.derivative(&["eta", "c", "eta"])?.is_none());
    assert!(material.derivative(&["eta", "eta", "eta"])?.is_none());
    Ok(())
}

#[test]
fn test_derivative_material_coupled_property() -> Result<(), StrError> {
    // F(c) = kappa(c) * c^2 where kappa is a coupled property depending on c;
    // the assembly synthesizes dkappa/dc and d2kappa/dc2 as extra parameters
    let mut param = ParamParsedMaterial::new("kappa * c^2", &["c"]);
    param.derivative_order = 2;
    param.properties.push(PropertyDescriptor::new("kappa", &["c"]));
    let mut material = DerivativeParsedMaterial::new("gradient_energy", &param, 1)?;

    // buffer layout: [c, kappa, dkappa/dc, d2kappa/dc2]
    assert_eq!(material.assembly.n_params, 4);
    assert_eq!(material.assembly.properties.len(), 3);

    let (c, kappa, dkappa, d2kappa) = (1.5, 2.0, -0.5, 0.25);
    material.compute_integ_point(0, &[c], &[kappa, dkappa, d2kappa])?;

    approx_eq(material.material.value[0], kappa * c * c, 1e-14);
    // dF/dc = dkappa c^2 + 2 c kappa
    approx_eq(
        material.derivative(&["c"])?.unwrap()[0],
        dkappa * c * c + 2.0 * c * kappa,
        1e-14,
    );
    // d2F/dc2 = d2kappa c^2 + 4 c dkappa + 2 kappa
    approx_eq(
        material.derivative(&["c", "c"])?.unwrap()[0],
        d2kappa * c * c + 4.0 * c * dkappa + 2.0 * kappa,
        1e-14,
    );

    // a second worker adopts the assembled result and evaluates identically
    let mut copy = DerivativeParsedMaterial::with_assembly("gradient_energy", &param, 1, &material.assembly)?;
    copy.compute_integ_point(0, &[c], &[kappa, dkappa, d2kappa])?;
    assert_eq!(copy.material.value[0], material.material.value[0]);
    assert_eq!(
        copy.derivative(&["c", "c"])?.unwrap()[0],
        material.derivative(&["c", "c"])?.unwrap()[0]
    );
    Ok(())
}

#[test]
fn test_derivative_material_tolerance_clamping() -> Result<(), StrError> {
    // F(c) = c * ln(c) with the argument clamped to [tol, 1-tol]
    let tol = 1e-4;
    let mut param = ParamParsedMaterial::new("c * ln(c)", &["c"]);
    param.tolerance = vec![tol];
    param.derivative_order = 1;
    let mut material = DerivativeParsedMaterial::new("entropy", &param, 1)?;

    // at the singularity the argument is clamped to tol
    material.compute_integ_point(0, &[0.0], &[])?;
    approx_eq(material.material.value[0], tol * tol.ln(), 1e-12);
    // dF/dc = ln(c) + 1 evaluated at the clamped argument
    approx_eq(material.derivative(&["c"])?.unwrap()[0], tol.ln() + 1.0, 1e-12);

    // above the band the argument is clamped to 1 - tol
    material.compute_integ_point(0, &[2.0], &[])?;
    approx_eq(material.material.value[0], (1.0 - tol) * (1.0 - tol).ln(), 1e-12);
    Ok(())
}
