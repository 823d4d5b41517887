use super::{Expr, UnaryFn};
use crate::StrError;

/// The maximum tree nesting depth accepted by the tape compiler
///
/// Deeper expressions fall back to tree interpretation (non-fatal).
pub const MAX_COMPILE_DEPTH: usize = 128;

/// Defines one instruction of the stack machine
#[derive(Clone, Copy, Debug, PartialEq)]
enum Op {
    Push(f64),
    Load(usize),
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Fun(UnaryFn),
}

/// Holds an expression lowered to a linear instruction tape
///
/// The tape is evaluated by a small stack machine; this avoids walking the
/// tree at every integration point of every element.
#[derive(Clone, Debug)]
pub struct CompiledFunction {
    ops: Vec<Op>,
    stack_depth: usize,
}

impl CompiledFunction {
    /// Lowers an expression tree to an instruction tape
    pub fn new(expr: &Expr) -> Result<Self, StrError> {
        let stack_depth = expr.depth();
        if stack_depth > MAX_COMPILE_DEPTH {
            return Err("expression is too deeply nested to compile");
        }
        let mut ops = Vec::new();
        emit(expr, &mut ops);
        Ok(CompiledFunction { ops, stack_depth })
    }

    /// Evaluates the tape given a parameter buffer indexed by variable
    pub fn eval(&self, params: &[f64]) -> Result<f64, StrError> {
        let mut stack: Vec<f64> = Vec::with_capacity(self.stack_depth);
        for op in &self.ops {
            match op {
                Op::Push(n) => stack.push(*n),
                Op::Load(i) => match params.get(*i) {
                    Some(v) => stack.push(*v),
                    None => return Err("parameter buffer is too short to evaluate the expression"),
                },
                Op::Neg => {
                    let a = stack.pop().ok_or("compiled expression tape is corrupted")?;
                    stack.push(-a);
                }
                Op::Fun(f) => {
                    let a = stack.pop().ok_or("compiled expression tape is corrupted")?;
                    stack.push(f.apply(a));
                }
                _ => {
                    let b = stack.pop().ok_or("compiled expression tape is corrupted")?;
                    let a = stack.pop().ok_or("compiled expression tape is corrupted")?;
                    let r = match op {
                        Op::Add => a + b,
                        Op::Sub => a - b,
                        Op::Mul => a * b,
                        Op::Div => a / b,
                        Op::Pow => a.powf(b),
                        _ => unreachable!(),
                    };
                    stack.push(r);
                }
            }
        }
        match (stack.pop(), stack.is_empty()) {
            (Some(result), true) => Ok(result),
            _ => Err("compiled expression tape is corrupted"),
        }
    }

    /// Returns the number of instructions in the tape
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Emits instructions in postorder
fn emit(expr: &Expr, ops: &mut Vec<Op>) {
    match expr {
        Expr::Num(n) => ops.push(Op::Push(*n)),
        Expr::Var(i) => ops.push(Op::Load(*i)),
        Expr::Add(a, b) => {
            emit(a, ops);
            emit(b, ops);
            ops.push(Op::Add);
        }
        Expr::Sub(a, b) => {
            emit(a, ops);
            emit(b, ops);
            ops.push(Op::Sub);
        }
        Expr::Mul(a, b) => {
            emit(a, ops);
            emit(b, ops);
            ops.push(Op::Mul);
        }
        Expr::Div(a, b) => {
            emit(a, ops);
            emit(b, ops);
            ops.push(Op::Div);
        }
        Expr::Pow(a, b) => {
            emit(a, ops);
            emit(b, ops);
            ops.push(Op::Pow);
        }
        Expr::Neg(a) => {
            emit(a, ops);
            ops.push(Op::Neg);
        }
        Expr::Fun(f, a) => {
            emit(a, ops);
            ops.push(Op::Fun(*f));
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{CompiledFunction, MAX_COMPILE_DEPTH};
    use crate::symbolic::parse_expr;
    use crate::symbolic::Expr;
    use russell_lab::approx_eq;

    #[test]
    fn eval_matches_tree_interpretation() {
        let syms = vec!["x".to_string(), "y".to_string()];
        let source = "2*x^2 + sin(y)/x - exp(-y)";
        let expr = parse_expr(source, &syms).unwrap();
        let tape = CompiledFunction::new(&expr).unwrap();
        assert!(tape.len() > 0);
        for (x, y) in [(1.0, 0.5), (2.5, -1.0), (0.1, 3.0)] {
            approx_eq(tape.eval(&[x, y]).unwrap(), expr.eval(&[x, y]).unwrap(), 1e-15);
        }
    }

    #[test]
    fn new_captures_deep_nesting() {
        let mut expr = Expr::Var(0);
        for _ in 0..MAX_COMPILE_DEPTH {
            expr = Expr::Neg(Box::new(expr));
        }
        assert_eq!(
            CompiledFunction::new(&expr).err(),
            Some("expression is too deeply nested to compile")
        );
    }

    #[test]
    fn eval_captures_short_buffer() {
        let expr = Expr::Var(3);
        let tape = CompiledFunction::new(&expr).unwrap();
        assert_eq!(
            tape.eval(&[1.0]).err(),
            Some("parameter buffer is too short to evaluate the expression")
        );
    }
}
