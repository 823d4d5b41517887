use crate::StrError;
use std::collections::HashMap;

/// Defines the unary functions supported by the expression engine
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Tanh,
    Abs,
}

impl UnaryFn {
    /// Applies this function to a value
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            UnaryFn::Sin => x.sin(),
            UnaryFn::Cos => x.cos(),
            UnaryFn::Tan => x.tan(),
            UnaryFn::Exp => x.exp(),
            UnaryFn::Ln => x.ln(),
            UnaryFn::Sqrt => x.sqrt(),
            UnaryFn::Tanh => x.tanh(),
            UnaryFn::Abs => x.abs(),
        }
    }
}

/// Represents a node in the symbolic expression tree
///
/// Variables are stored by index into the symbol table held by the owning
/// [`crate::ParsedFunction`]; the index doubles as the slot in the parameter
/// buffer used during evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(usize),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Fun(UnaryFn, Box<Expr>),
}

// shorthand constructors (the calculus rules below get very noisy otherwise)
fn add(a: Expr, b: Expr) -> Expr {
    Expr::Add(Box::new(a), Box::new(b))
}
fn sub(a: Expr, b: Expr) -> Expr {
    Expr::Sub(Box::new(a), Box::new(b))
}
fn mul(a: Expr, b: Expr) -> Expr {
    Expr::Mul(Box::new(a), Box::new(b))
}
fn div(a: Expr, b: Expr) -> Expr {
    Expr::Div(Box::new(a), Box::new(b))
}
fn pow(a: Expr, b: Expr) -> Expr {
    Expr::Pow(Box::new(a), Box::new(b))
}
fn fun(f: UnaryFn, a: Expr) -> Expr {
    Expr::Fun(f, Box::new(a))
}

impl Expr {
    /// Computes the partial derivative with respect to the variable with index `var`
    ///
    /// The `rules` map holds registered derivative relationships between
    /// symbols: `rules[(u, var)] = w` means d(symbol u)/d(symbol var) is the
    /// symbol `w`. Symbols without a registered relationship are treated as
    /// independent of `var`.
    pub fn differentiate(&self, var: usize, rules: &HashMap<(usize, usize), usize>) -> Result<Expr, StrError> {
        match self {
            Expr::Num(_) => Ok(Expr::Num(0.0)),
            Expr::Var(u) => {
                if *u == var {
                    Ok(Expr::Num(1.0))
                } else {
                    match rules.get(&(*u, var)) {
                        Some(w) => Ok(Expr::Var(*w)),
                        None => Ok(Expr::Num(0.0)),
                    }
                }
            }
            Expr::Add(a, b) => Ok(add(a.differentiate(var, rules)?, b.differentiate(var, rules)?)),
            Expr::Sub(a, b) => Ok(sub(a.differentiate(var, rules)?, b.differentiate(var, rules)?)),
            Expr::Mul(a, b) => {
                let da = a.differentiate(var, rules)?;
                let db = b.differentiate(var, rules)?;
                Ok(add(mul(da, (**b).clone()), mul((**a).clone(), db)))
            }
            Expr::Div(a, b) => {
                let da = a.differentiate(var, rules)?;
                let db = b.differentiate(var, rules)?;
                Ok(div(
                    sub(mul(da, (**b).clone()), mul((**a).clone(), db)),
                    mul((**b).clone(), (**b).clone()),
                ))
            }
            Expr::Pow(base, exp) => {
                let db = base.differentiate(var, rules)?;
                match **exp {
                    // power rule with constant exponent
                    Expr::Num(n) => Ok(mul(mul(Expr::Num(n), pow((**base).clone(), Expr::Num(n - 1.0))), db)),
                    // general rule: d(b^e) = b^e * (e' ln(b) + e b'/b)
                    _ => {
                        let de = exp.differentiate(var, rules)?;
                        Ok(mul(
                            pow((**base).clone(), (**exp).clone()),
                            add(
                                mul(de, fun(UnaryFn::Ln, (**base).clone())),
                                div(mul((**exp).clone(), db), (**base).clone()),
                            ),
                        ))
                    }
                }
            }
            Expr::Neg(a) => Ok(Expr::Neg(Box::new(a.differentiate(var, rules)?))),
            Expr::Fun(f, a) => {
                let da = a.differentiate(var, rules)?;
                let u = (**a).clone();
                let outer = match f {
                    UnaryFn::Sin => fun(UnaryFn::Cos, u),
                    UnaryFn::Cos => Expr::Neg(Box::new(fun(UnaryFn::Sin, u))),
                    UnaryFn::Tan => div(Expr::Num(1.0), pow(fun(UnaryFn::Cos, u), Expr::Num(2.0))),
                    UnaryFn::Exp => fun(UnaryFn::Exp, u),
                    UnaryFn::Ln => div(Expr::Num(1.0), u),
                    UnaryFn::Sqrt => div(Expr::Num(1.0), mul(Expr::Num(2.0), fun(UnaryFn::Sqrt, u))),
                    UnaryFn::Tanh => sub(Expr::Num(1.0), pow(fun(UnaryFn::Tanh, u), Expr::Num(2.0))),
                    UnaryFn::Abs => return Err("cannot differentiate the abs function"),
                };
                Ok(mul(outer, da))
            }
        }
    }

    /// Evaluates the expression given a parameter buffer indexed by variable
    pub fn eval(&self, params: &[f64]) -> Result<f64, StrError> {
        match self {
            Expr::Num(n) => Ok(*n),
            Expr::Var(i) => match params.get(*i) {
                Some(v) => Ok(*v),
                None => Err("parameter buffer is too short to evaluate the expression"),
            },
            Expr::Add(a, b) => Ok(a.eval(params)? + b.eval(params)?),
            Expr::Sub(a, b) => Ok(a.eval(params)? - b.eval(params)?),
            Expr::Mul(a, b) => Ok(a.eval(params)? * b.eval(params)?),
            Expr::Div(a, b) => Ok(a.eval(params)? / b.eval(params)?),
            Expr::Pow(a, b) => Ok(a.eval(params)?.powf(b.eval(params)?)),
            Expr::Neg(a) => Ok(-a.eval(params)?),
            Expr::Fun(f, a) => Ok(f.apply(a.eval(params)?)),
        }
    }

    /// Applies algebraic simplifications until reaching a fixed point
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        loop {
            let next = current.simplify_pass();
            if next == current {
                return next;
            }
            current = next;
        }
    }

    /// Performs one bottom-up simplification pass
    fn simplify_pass(&self) -> Expr {
        match self {
            Expr::Num(_) | Expr::Var(_) => self.clone(),
            Expr::Add(a, b) => match (a.simplify_pass(), b.simplify_pass()) {
                (Expr::Num(x), Expr::Num(y)) => Expr::Num(x + y),
                (Expr::Num(x), rhs) if x == 0.0 => rhs,
                (lhs, Expr::Num(y)) if y == 0.0 => lhs,
                (lhs, rhs) => add(lhs, rhs),
            },
            Expr::Sub(a, b) => match (a.simplify_pass(), b.simplify_pass()) {
                (Expr::Num(x), Expr::Num(y)) => Expr::Num(x - y),
                (lhs, Expr::Num(y)) if y == 0.0 => lhs,
                (Expr::Num(x), rhs) if x == 0.0 => Expr::Neg(Box::new(rhs)),
                (lhs, rhs) => {
                    if lhs == rhs {
                        Expr::Num(0.0)
                    } else {
                        sub(lhs, rhs)
                    }
                }
            },
            Expr::Mul(a, b) => match (a.simplify_pass(), b.simplify_pass()) {
                (Expr::Num(x), Expr::Num(y)) => Expr::Num(x * y),
                (Expr::Num(x), _) if x == 0.0 => Expr::Num(0.0),
                (_, Expr::Num(y)) if y == 0.0 => Expr::Num(0.0),
                (Expr::Num(x), rhs) if x == 1.0 => rhs,
                (lhs, Expr::Num(y)) if y == 1.0 => lhs,
                (lhs, rhs) => mul(lhs, rhs),
            },
            Expr::Div(a, b) => match (a.simplify_pass(), b.simplify_pass()) {
                (Expr::Num(x), Expr::Num(y)) if y != 0.0 => Expr::Num(x / y),
                (Expr::Num(x), _) if x == 0.0 => Expr::Num(0.0),
                (lhs, Expr::Num(y)) if y == 1.0 => lhs,
                (lhs, rhs) => div(lhs, rhs),
            },
            Expr::Pow(a, b) => match (a.simplify_pass(), b.simplify_pass()) {
                (Expr::Num(x), Expr::Num(y)) => Expr::Num(x.powf(y)),
                (_, Expr::Num(y)) if y == 0.0 => Expr::Num(1.0),
                (lhs, Expr::Num(y)) if y == 1.0 => lhs,
                (lhs, rhs) => pow(lhs, rhs),
            },
            Expr::Neg(a) => match a.simplify_pass() {
                Expr::Num(x) => Expr::Num(-x),
                Expr::Neg(inner) => *inner,
                inner => Expr::Neg(Box::new(inner)),
            },
            Expr::Fun(f, a) => match a.simplify_pass() {
                Expr::Num(x) => Expr::Num(f.apply(x)),
                inner => fun(*f, inner),
            },
        }
    }

    /// Tells whether the expression is algebraically identically zero
    pub fn is_zero(&self) -> bool {
        self.simplify() == Expr::Num(0.0)
    }

    /// Returns the nesting depth of the tree
    pub fn depth(&self) -> usize {
        match self {
            Expr::Num(_) | Expr::Var(_) => 1,
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
                1 + usize::max(a.depth(), b.depth())
            }
            Expr::Neg(a) | Expr::Fun(_, a) => 1 + a.depth(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
