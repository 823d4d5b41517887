use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Describes a coupled material property referenced inside a parsed expression
///
/// A coupled property is a per-point value supplied by another part of the
/// simulation. The descriptor carries the symbol under which the expression
/// refers to the property, the set of expression arguments the property
/// depends on, and the derivative chain (the sequence of arguments the
/// property has been differentiated with respect to).
///
/// Mixed partials commute, so the chain is kept in canonical (sorted) order:
/// differentiating with respect to `y` then `x` yields the same chain as `x`
/// then `y`. Two descriptors are considered equal iff their property name and
/// canonical chain coincide; this is the key used to deduplicate synthesized
/// derivative properties during assembly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Name of the underlying material property
    property_name: String,

    /// Symbol used inside expressions (synthesized for derivative properties)
    symbol_name: String,

    /// Arguments the property has been differentiated with respect to, in canonical (sorted) order
    derivative_chain: Vec<String>,

    /// Arguments the underlying property depends on
    dependencies: HashSet<String>,
}

impl PropertyDescriptor {
    /// Allocates a new base descriptor (no derivatives taken yet)
    ///
    /// The expression symbol defaults to the property name.
    pub fn new(property_name: &str, dependencies: &[&str]) -> Self {
        PropertyDescriptor {
            property_name: property_name.to_string(),
            symbol_name: property_name.to_string(),
            derivative_chain: Vec::new(),
            dependencies: dependencies.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Returns the name of the underlying material property
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Returns the symbol used inside expressions
    pub fn symbol_name(&self) -> &str {
        &self.symbol_name
    }

    /// Sets the symbol used inside expressions
    pub fn set_symbol_name(&mut self, name: &str) {
        self.symbol_name = name.to_string();
    }

    /// Returns the derivative chain
    pub fn derivative_chain(&self) -> &[String] {
        &self.derivative_chain
    }

    /// Tells whether this is the base property (empty derivative chain)
    pub fn is_base(&self) -> bool {
        self.derivative_chain.is_empty()
    }

    /// Tells whether the underlying property depends on the given argument
    pub fn depends_on(&self, arg_name: &str) -> bool {
        self.dependencies.contains(arg_name)
    }

    /// Returns a copy of this descriptor differentiated with respect to one more argument
    ///
    /// The new argument is inserted keeping the chain in canonical (sorted)
    /// order, so permutations of the same mixed partial produce equal
    /// descriptors. The caller must assign a fresh symbol name before
    /// registering the copy.
    pub fn differentiated(&self, arg_name: &str) -> Self {
        let mut derived = self.clone();
        let position = derived.derivative_chain.partition_point(|a| a.as_str() <= arg_name);
        derived.derivative_chain.insert(position, arg_name.to_string());
        derived
    }
}

impl PartialEq for PropertyDescriptor {
    /// Compares the underlying property name and the canonical derivative chain only
    fn eq(&self, other: &Self) -> bool {
        self.property_name == other.property_name && self.derivative_chain == other.derivative_chain
    }
}

impl fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.derivative_chain.is_empty() {
            write!(f, "{}", self.property_name)
        } else {
            write!(f, "d{}{}", self.derivative_chain.len(), self.property_name)?;
            for arg in &self.derivative_chain {
                write!(f, "/d{}", arg)?;
            }
            Ok(())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
