use super::PropertyDescriptor;
use crate::symbolic::ParsedFunction;
use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds parameters for parsed materials
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParamParsedMaterial {
    /// The expression to be parsed, written in terms of the arguments and property symbols
    pub expression: String,

    /// Names of the arguments (coupled solution variables)
    pub arg_names: Vec<String>,

    /// Tolerance band per argument: values are clamped to `[tol, 1-tol]`
    ///
    /// Either empty (no clamping) or one entry per argument; a negative entry
    /// disables clamping for that argument. Clamping avoids evaluating the
    /// expression at domain singularities such as `ln(0)`.
    pub tolerance: Vec<f64>,

    /// Coupled material properties referenced inside the expression
    pub properties: Vec<PropertyDescriptor>,

    /// Maximum order of derivatives taken (derivative materials only)
    pub derivative_order: usize,

    /// Disables algebraic simplification of the parsed expressions
    pub disable_optimizer: bool,

    /// Enables lowering expressions to instruction tapes (best effort)
    pub enable_compilation: bool,
}

impl ParamParsedMaterial {
    /// Allocates a new instance with default options
    pub fn new(expression: &str, arg_names: &[&str]) -> Self {
        ParamParsedMaterial {
            expression: expression.to_string(),
            arg_names: arg_names.iter().map(|s| s.to_string()).collect(),
            tolerance: Vec::new(),
            properties: Vec::new(),
            derivative_order: 3,
            disable_optimizer: false,
            enable_compilation: true,
        }
    }

    /// Reads a JSON file containing the parameters
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(&path).map_err(|_| "file not found")?;
        let reader = BufReader::new(file);
        let param = serde_json::from_reader(reader).map_err(|_| "deserialize failed")?;
        Ok(param)
    }

    /// Writes a JSON file with the parameters
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

/// Implements a material defined by a parsed expression
///
/// The expression is evaluated at every integration point with the current
/// values of the coupled arguments and coupled material properties.
pub struct ParsedMaterial {
    /// Name of this material (used in diagnostics)
    pub name: String,

    /// Copy of the parameters
    pub param: ParamParsedMaterial,

    /// The parsed base expression
    pub function: ParsedFunction,

    /// Parameter buffer: one slot per argument followed by one per property
    pub params: Vector,

    /// Per-integration-point values of the base expression
    pub value: Vector,
}

impl ParsedMaterial {
    /// Allocates a new instance, parsing the base expression
    pub fn new(name: &str, param: &ParamParsedMaterial, n_integ_point: usize) -> Result<Self, StrError> {
        let nargs = param.arg_names.len();
        if nargs == 0 {
            return Err("parsed material requires at least one argument");
        }
        if n_integ_point == 0 {
            return Err("number of integration points must be at least one");
        }
        if !param.tolerance.is_empty() {
            if param.tolerance.len() != nargs {
                return Err("tolerance array must have one entry per argument");
            }
            if param.tolerance.iter().any(|t| *t >= 0.5) {
                return Err("tolerance entries must be smaller than 1/2");
            }
        }

        // symbol table: arguments first, then property symbols (stable buffer order)
        let mut symbols = param.arg_names.clone();
        for property in &param.properties {
            symbols.push(property.symbol_name().to_string());
        }

        let mut function = ParsedFunction::new(&param.expression, &symbols)?;
        if !param.disable_optimizer {
            function.optimize();
        }
        if param.enable_compilation && function.compile().is_err() {
            log::info!(
                "failed to compile expression in material '{}', falling back to tree interpretation",
                name
            );
        }

        Ok(ParsedMaterial {
            name: name.to_string(),
            param: param.clone(),
            function,
            params: Vector::new(nargs + param.properties.len()),
            value: Vector::new(n_integ_point),
        })
    }

    /// Returns the number of integration points
    pub fn n_integ_point(&self) -> usize {
        self.value.dim()
    }

    /// Zeroes the stored value at one integration point
    pub fn initialize_integ_point(&mut self, p: usize) -> Result<(), StrError> {
        if p >= self.value.dim() {
            return Err("integration point index is out-of-bounds");
        }
        self.value[p] = 0.0;
        Ok(())
    }

    /// Fills the parameter buffer with argument values (clamped) and property values
    pub(crate) fn fill_params(&mut self, args: &[f64], prop_values: &[f64]) -> Result<(), StrError> {
        let nargs = self.param.arg_names.len();
        if args.len() != nargs {
            return Err("number of argument values must match the number of arguments");
        }
        if args.len() + prop_values.len() != self.params.dim() {
            return Err("number of property values must match the number of property descriptors");
        }
        for i in 0..nargs {
            let tol = if self.param.tolerance.is_empty() {
                -1.0
            } else {
                self.param.tolerance[i]
            };
            self.params[i] = if tol < 0.0 {
                args[i]
            } else if args[i] < tol {
                tol
            } else if args[i] > 1.0 - tol {
                1.0 - tol
            } else {
                args[i]
            };
        }
        for (k, value) in prop_values.iter().enumerate() {
            self.params[nargs + k] = *value;
        }
        Ok(())
    }

    /// Evaluates the expression at one integration point
    ///
    /// `args` holds the current argument values and `prop_values` the current
    /// coupled property values, one per property descriptor in order.
    ///
    /// The base value is always evaluated and stored: per-point storage for it
    /// is unconditionally allocated at construction, so there is no separate
    /// "no storage target" mode.
    pub fn compute_integ_point(&mut self, p: usize, args: &[f64], prop_values: &[f64]) -> Result<(), StrError> {
        if p >= self.value.dim() {
            return Err("integration point index is out-of-bounds");
        }
        self.fill_params(args, prop_values)?;
        self.value[p] = self.function.eval(self.params.as_data())?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
