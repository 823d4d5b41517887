use super::{parse_expr, CompiledFunction, Expr};
use crate::StrError;
use std::collections::HashMap;

/// Holds a parsed expression together with its symbol table
///
/// The position of a symbol in the table is both the variable index inside the
/// tree and the slot in the parameter buffer passed to [`ParsedFunction::eval`].
/// Symbols may be appended after parsing (see [`ParsedFunction::add_variable`])
/// so that derivative relationships to auxiliary symbols can be registered
/// before further differentiation.
#[derive(Clone, Debug)]
pub struct ParsedFunction {
    /// Symbol table; index = variable index = parameter buffer slot
    symbols: Vec<String>,

    /// Registered derivative relationships: (symbol, wrt) -> derivative symbol
    rules: HashMap<(usize, usize), usize>,

    /// The expression tree
    root: Expr,

    /// Instruction tape, present after a successful [`ParsedFunction::compile`]
    compiled: Option<CompiledFunction>,
}

impl ParsedFunction {
    /// Parses a new function over the given symbols
    pub fn new(source: &str, symbols: &[String]) -> Result<Self, StrError> {
        for (i, name) in symbols.iter().enumerate() {
            if symbols[..i].contains(name) {
                return Err("symbol names must be unique");
            }
        }
        let root = parse_expr(source, symbols)?;
        Ok(ParsedFunction {
            symbols: symbols.to_vec(),
            rules: HashMap::new(),
            root,
            compiled: None,
        })
    }

    /// Appends a new symbol to the table
    pub fn add_variable(&mut self, name: &str) -> Result<(), StrError> {
        if self.symbols.iter().any(|s| s == name) {
            return Err("symbol is already defined in this function");
        }
        self.symbols.push(name.to_string());
        Ok(())
    }

    /// Returns the index of a symbol
    pub fn symbol_index(&self, name: &str) -> Result<usize, StrError> {
        self.symbols
            .iter()
            .position(|s| s == name)
            .ok_or("function does not know the given symbol")
    }

    /// Tells whether the symbol table contains a name
    pub fn has_symbol(&self, name: &str) -> bool {
        self.symbols.iter().any(|s| s == name)
    }

    /// Returns the number of symbols in the table
    pub fn n_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Registers the derivative relationship d(of)/d(wrt) = gives
    pub fn register_derivative(&mut self, of: &str, wrt: &str, gives: &str) -> Result<(), StrError> {
        let of = self.symbol_index(of)?;
        let wrt = self.symbol_index(wrt)?;
        let gives = self.symbol_index(gives)?;
        self.rules.insert((of, wrt), gives);
        Ok(())
    }

    /// Differentiates the function in place with respect to a symbol
    pub fn differentiate(&mut self, wrt: &str) -> Result<(), StrError> {
        let var = self.symbol_index(wrt)?;
        self.root = self.root.differentiate(var, &self.rules)?;
        self.compiled = None;
        Ok(())
    }

    /// Simplifies the expression algebraically
    pub fn optimize(&mut self) {
        self.root = self.root.simplify();
        self.compiled = None;
    }

    /// Lowers the expression to an instruction tape (best effort)
    ///
    /// On failure the function stays valid and keeps evaluating by tree
    /// interpretation.
    pub fn compile(&mut self) -> Result<(), StrError> {
        self.compiled = Some(CompiledFunction::new(&self.root)?);
        Ok(())
    }

    /// Tells whether the function is algebraically identically zero
    pub fn is_zero(&self) -> bool {
        self.root.is_zero()
    }

    /// Evaluates the function given a parameter buffer indexed by symbol
    ///
    /// The buffer may be longer than the symbol table (shared buffers carry
    /// slots for symbols this particular function never saw).
    pub fn eval(&self, params: &[f64]) -> Result<f64, StrError> {
        match &self.compiled {
            Some(tape) => tape.eval(params),
            None => self.root.eval(params),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
