use super::{ParamParsedMaterial, PropertyDescriptor};
use crate::symbolic::ParsedFunction;
use crate::StrError;
use std::collections::VecDeque;

/// Base name for synthesized derivative-property symbols
const AUX_SYMBOL_BASE: &str = "dprop_auto";

/// Describes one retained partial derivative of the base expression
#[derive(Clone, Debug)]
pub struct DerivativeDescriptor {
    /// Indices of the arguments differentiated with respect to (non-decreasing)
    pub darg_indices: Vec<usize>,

    /// Names of the arguments differentiated with respect to
    pub darg_names: Vec<String>,

    /// The derivative expression
    pub function: ParsedFunction,
}

/// Holds the outcome of one derivative assembly pass
///
/// This is a plain value: the designated builder worker assembles it once and
/// every other worker adopts it (by clone or shared ownership) instead of
/// re-running the graph walk. Structural data in here never changes after
/// assembly.
#[derive(Clone, Debug)]
pub struct AssemblyResult {
    /// All retained (non-vanishing) derivatives in construction order
    pub derivatives: Vec<DerivativeDescriptor>,

    /// All coupled-property descriptors, base properties first, then the
    /// derivative properties synthesized during assembly, in append order
    pub properties: Vec<PropertyDescriptor>,

    /// Size of the per-evaluation parameter buffer (arguments + properties)
    pub n_params: usize,
}

/// One node of the derivative construction graph (kept in an arena)
struct Node {
    /// Partially differentiated expression
    function: ParsedFunction,

    /// Ordered argument indices taken to reach this node
    dargs: Vec<usize>,

    /// Whether the node still takes part in auxiliary symbol registration
    alive: bool,
}

/// Performs a breadth-first construction of all requested derivatives
///
/// Starting from the base expression, generates one child per argument index
/// in `[last, nargs)` where `last` is the last index of the parent's path;
/// restricting paths to non-decreasing indices guarantees that each distinct
/// mixed partial is generated exactly once (differentiation order does not
/// affect the result).
///
/// Whenever a coupled property depends on the argument about to be
/// differentiated, its extended derivative chain (kept canonical, since mixed
/// partials commute) resolves to exactly one descriptor: a fresh auxiliary
/// symbol is synthesized on first sight and registered with every live node;
/// revisiting the chain through a permuted route reuses the symbol. Either
/// way the derivative relationship from the reaching parent is registered, so
/// every pending expression resolves the property derivative consistently.
pub fn assemble_derivatives(
    material_name: &str,
    function: &ParsedFunction,
    param: &ParamParsedMaterial,
) -> Result<AssemblyResult, StrError> {
    let nargs = param.arg_names.len();
    let mut properties = param.properties.clone();

    // no derivatives requested
    if param.derivative_order < 1 {
        let n_params = nargs + properties.len();
        return Ok(AssemblyResult {
            derivatives: Vec::new(),
            properties,
            n_params,
        });
    }

    // auxiliary symbol counter, scoped to this assembly pass
    let mut aux_index: usize = 0;

    let mut derivatives = Vec::new();
    let mut arena = vec![Node {
        function: function.clone(),
        dargs: Vec::new(),
        alive: true,
    }];
    let mut queue = VecDeque::from([0_usize]);

    while let Some(current) = queue.pop_front() {
        let first = arena[current].dargs.last().copied().unwrap_or(0);
        for i in first..nargs {
            let arg_name = param.arg_names[i].clone();

            // synthesize derivative properties for coupled values depending on this argument
            let n_properties = properties.len();
            for j in 0..n_properties {
                if !properties[j].depends_on(&arg_name) {
                    continue;
                }
                let mut derived = properties[j].differentiated(&arg_name);
                let parent_symbol = properties[j].symbol_name().to_string();
                let symbol = match properties.iter().position(|d| *d == derived) {
                    // permutations of the same chain share one synthesized symbol
                    Some(k) => properties[k].symbol_name().to_string(),
                    None => {
                        let symbol = format!("{}{}", AUX_SYMBOL_BASE, aux_index);
                        aux_index += 1;
                        derived.set_symbol_name(&symbol);
                        for node in arena.iter_mut().filter(|n| n.alive) {
                            node.function.add_variable(&symbol)?;
                        }
                        properties.push(derived);
                        symbol
                    }
                };
                // every parent reaching this chain registers its relationship,
                // so later differentiation routes resolve to the same symbol
                for node in arena.iter_mut().filter(|n| n.alive) {
                    node.function.register_derivative(&parent_symbol, &arg_name, &symbol)?;
                }
            }

            // differentiate a copy of the current expression
            let mut child = arena[current].function.clone();
            if child.differentiate(&arg_name).is_err() {
                log::error!(
                    "failed to take order {} derivative in material '{}'",
                    arena[current].dargs.len() + 1,
                    material_name
                );
                return Err("cannot take the derivative of the material expression");
            }

            // optimize and compile (compilation failure degrades to interpretation)
            if !param.disable_optimizer {
                child.optimize();
            }
            if param.enable_compilation && child.compile().is_err() {
                log::info!(
                    "failed to compile expression in material '{}', falling back to tree interpretation",
                    material_name
                );
            }

            let mut dargs = arena[current].dargs.clone();
            dargs.push(i);

            // keep the derivative only if it does not vanish identically
            if !child.is_zero() {
                derivatives.push(DerivativeDescriptor {
                    darg_indices: dargs.clone(),
                    darg_names: dargs.iter().map(|k| param.arg_names[*k].clone()).collect(),
                    function: child.clone(),
                });
            }

            // expand further if the requested order is not reached yet
            if dargs.len() < param.derivative_order {
                arena.push(Node {
                    function: child,
                    dargs,
                    alive: true,
                });
                queue.push_back(arena.len() - 1);
            }
        }
        arena[current].alive = false;
    }

    let n_params = nargs + properties.len();
    Ok(AssemblyResult {
        derivatives,
        properties,
        n_params,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
