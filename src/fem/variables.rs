use crate::base::VariableId;
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holds the registry of system variables (unknowns)
///
/// Field variables live on mesh nodes; scalar variables are single global
/// unknowns (e.g. Lagrange multipliers) without a spatial footprint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variables {
    /// All variables in registration order: (name, is_scalar)
    all: Vec<(String, bool)>,
}

impl Variables {
    /// Allocates a new instance
    pub fn new() -> Self {
        Variables { all: Vec::new() }
    }

    /// Registers a field variable and returns its number
    pub fn add_field(&mut self, name: &str) -> Result<VariableId, StrError> {
        self.add(name, false)
    }

    /// Registers a scalar variable and returns its number
    pub fn add_scalar(&mut self, name: &str) -> Result<VariableId, StrError> {
        self.add(name, true)
    }

    fn add(&mut self, name: &str, scalar: bool) -> Result<VariableId, StrError> {
        if self.all.iter().any(|(n, _)| n == name) {
            return Err("a variable with the given name exists already");
        }
        self.all.push((name.to_string(), scalar));
        Ok(self.all.len() - 1)
    }

    /// Returns the number of a variable
    pub fn number(&self, name: &str) -> Result<VariableId, StrError> {
        self.all
            .iter()
            .position(|(n, _)| n == name)
            .ok_or("cannot find variable with the given name")
    }

    /// Tells whether a variable is scalar
    pub fn is_scalar(&self, name: &str) -> Result<bool, StrError> {
        match self.all.iter().find(|(n, _)| n == name) {
            Some((_, scalar)) => Ok(*scalar),
            None => Err("cannot find variable with the given name"),
        }
    }

    /// Returns all variable names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.all.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns the number of registered variables
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Tells whether no variable has been registered
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

impl fmt::Display for Variables {
    /// Prints a formatted summary of the variables
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System variables\n").unwrap();
        write!(f, "================\n").unwrap();
        for (i, (name, scalar)) in self.all.iter().enumerate() {
            let kind = if *scalar { "scalar" } else { "field" };
            write!(f, "{} : {} ({})\n", i, name, kind).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
