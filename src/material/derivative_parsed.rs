use super::{assemble_derivatives, AssemblyResult, ParamParsedMaterial, ParsedMaterial};
use crate::StrError;
use russell_lab::Vector;

/// Implements a parsed material with automatic derivatives
///
/// On construction, every distinct partial derivative of the base expression
/// up to `derivative_order` is generated symbolically (see
/// [`assemble_derivatives`]); at evaluation time the base expression and all
/// retained derivatives are computed per integration point.
///
/// In multi-worker execution, exactly one worker builds the
/// [`AssemblyResult`] with [`DerivativeParsedMaterial::new`]; all other
/// workers adopt the finished result with
/// [`DerivativeParsedMaterial::with_assembly`] and never run the graph walk.
pub struct DerivativeParsedMaterial {
    /// The base expression material (holds the parameter buffer and base values)
    pub material: ParsedMaterial,

    /// Structural descriptors produced by the assembly pass (immutable)
    pub assembly: AssemblyResult,

    /// Per-integration-point values, one vector per retained derivative
    pub derivative_values: Vec<Vector>,
}

impl DerivativeParsedMaterial {
    /// Allocates a new instance and assembles all derivatives (builder worker)
    pub fn new(name: &str, param: &ParamParsedMaterial, n_integ_point: usize) -> Result<Self, StrError> {
        let material = ParsedMaterial::new(name, param, n_integ_point)?;
        let assembly = assemble_derivatives(name, &material.function, param)?;
        Self::with_parts(material, assembly, n_integ_point)
    }

    /// Allocates a new instance adopting an already assembled result (other workers)
    pub fn with_assembly(
        name: &str,
        param: &ParamParsedMaterial,
        n_integ_point: usize,
        assembly: &AssemblyResult,
    ) -> Result<Self, StrError> {
        if assembly.properties.len() < param.properties.len()
            || assembly.properties[..param.properties.len()] != param.properties[..]
            || assembly.n_params != param.arg_names.len() + assembly.properties.len()
        {
            return Err("assembly result does not match the material parameters");
        }
        let material = ParsedMaterial::new(name, param, n_integ_point)?;
        Self::with_parts(material, assembly.clone(), n_integ_point)
    }

    /// Finishes construction: widens the buffer and allocates derivative storage
    fn with_parts(
        mut material: ParsedMaterial,
        assembly: AssemblyResult,
        n_integ_point: usize,
    ) -> Result<Self, StrError> {
        // the buffer gains one slot per derivative property synthesized during assembly
        material.params = Vector::new(assembly.n_params);
        material.param.properties = assembly.properties.clone();
        let derivative_values = vec![Vector::new(n_integ_point); assembly.derivatives.len()];
        Ok(DerivativeParsedMaterial {
            material,
            assembly,
            derivative_values,
        })
    }

    /// Returns the derivative values with respect to the given arguments
    ///
    /// The argument order does not matter (mixed partials commute). Returns
    /// `Ok(None)` when the requested derivative vanishes identically (it was
    /// pruned during assembly).
    pub fn derivative(&self, darg_names: &[&str]) -> Result<Option<&Vector>, StrError> {
        let mut indices = Vec::with_capacity(darg_names.len());
        for name in darg_names {
            match self.material.param.arg_names.iter().position(|a| a == name) {
                Some(index) => indices.push(index),
                None => return Err("derivative argument name is not an argument of this material"),
            }
        }
        indices.sort_unstable();
        for (k, descriptor) in self.assembly.derivatives.iter().enumerate() {
            if descriptor.darg_indices == indices {
                return Ok(Some(&self.derivative_values[k]));
            }
        }
        Ok(None)
    }

    /// Zeroes the base value and every derivative value at one integration point
    pub fn initialize_integ_point(&mut self, p: usize) -> Result<(), StrError> {
        self.material.initialize_integ_point(p)?;
        for values in &mut self.derivative_values {
            values[p] = 0.0;
        }
        Ok(())
    }

    /// Evaluates the base expression and all retained derivatives at one integration point
    ///
    /// `prop_values` must hold one value per property descriptor in
    /// `assembly.properties` (base properties first, then the synthesized
    /// derivative properties, in append order).
    pub fn compute_integ_point(&mut self, p: usize, args: &[f64], prop_values: &[f64]) -> Result<(), StrError> {
        self.material.compute_integ_point(p, args, prop_values)?;
        let buffer = self.material.params.as_data();
        for (k, descriptor) in self.assembly.derivatives.iter().enumerate() {
            self.derivative_values[k][p] = descriptor.function.eval(buffer)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
