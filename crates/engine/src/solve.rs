// Equation solver by isolation.
//
// To invert f(x) we form the equation y = f(x) and repeatedly peel the
// outermost operation off the side containing x, applying its inverse to
// the other side. Operations where x appears in both operands (x + x is
// fine after parsing as written, x^x is not) have no isolation step and
// fail with NoInverse. Even integer powers split into an ordered pair of
// branches, negative root first.

use crate::error::EngineError;
use crate::expr::{Expr, Function};

/// Compute the inverse of `expr` as a function of `dependent`.
///
/// `expr` must mention `independent` and must not already use the
/// `dependent` name. When the solver finds several branches the first one
/// wins; callers that need all of them use [`solve`] directly.
pub fn invert(expr: &Expr, independent: &str, dependent: &str) -> Result<Expr, EngineError> {
    if expr.contains(dependent) {
        return Err(EngineError::Parse(format!(
            "the symbol '{}' is reserved for the inverse",
            dependent
        )));
    }
    if !expr.contains(independent) {
        // Constant in x: the equation y = c has no solution for x
        return Err(EngineError::NoInverse);
    }

    let branches = solve(expr, &Expr::var(dependent), independent)?;
    match branches.into_iter().next() {
        Some(branch) => Ok(branch.simplify()),
        None => Err(EngineError::NoInverse),
    }
}

/// Solve the equation `lhs = rhs` for `var`, returning every branch the
/// isolation procedure finds, in a deterministic order.
pub fn solve(lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>, EngineError> {
    match lhs {
        Expr::Var(name) if name == var => Ok(vec![rhs.clone()]),
        Expr::Var(_) | Expr::Num(_) => Err(EngineError::NoInverse),

        Expr::Neg(a) => solve(a, &Expr::Neg(rhs.clone().boxed()), var),

        Expr::Add(a, b) => match side_with(a, b, var)? {
            Side::Left => solve(a, &Expr::Sub(rhs.clone().boxed(), b.clone()), var),
            Side::Right => solve(b, &Expr::Sub(rhs.clone().boxed(), a.clone()), var),
        },
        Expr::Sub(a, b) => match side_with(a, b, var)? {
            Side::Left => solve(a, &Expr::Add(rhs.clone().boxed(), b.clone()), var),
            Side::Right => solve(b, &Expr::Sub(a.clone(), rhs.clone().boxed()), var),
        },
        Expr::Mul(a, b) => match side_with(a, b, var)? {
            Side::Left => solve(a, &Expr::Div(rhs.clone().boxed(), b.clone()), var),
            Side::Right => solve(b, &Expr::Div(rhs.clone().boxed(), a.clone()), var),
        },
        Expr::Div(a, b) => match side_with(a, b, var)? {
            Side::Left => solve(a, &Expr::Mul(rhs.clone().boxed(), b.clone()), var),
            Side::Right => solve(b, &Expr::Div(a.clone(), rhs.clone().boxed()), var),
        },

        Expr::Pow(base, exp) => match side_with(base, exp, var)? {
            Side::Left => solve_power(base, exp, rhs, var),
            // Variable in the exponent: a^x = y  →  x = ln(y)/ln(a)
            Side::Right => {
                let log_rhs = Expr::Div(
                    Expr::Func(Function::Ln, rhs.clone().boxed()).boxed(),
                    Expr::Func(Function::Ln, base.clone()).boxed(),
                );
                solve(exp, &log_rhs, var)
            }
        },

        Expr::Func(func, a) => {
            if !a.contains(var) {
                return Err(EngineError::NoInverse);
            }
            solve(a, &apply_inverse(*func, rhs), var)
        }
    }
}

enum Side {
    Left,
    Right,
}

/// Which operand holds the variable. Both or neither is unsolvable.
fn side_with(a: &Expr, b: &Expr, var: &str) -> Result<Side, EngineError> {
    match (a.contains(var), b.contains(var)) {
        (true, false) => Ok(Side::Left),
        (false, true) => Ok(Side::Right),
        _ => Err(EngineError::NoInverse),
    }
}

/// Isolate `base` in `base^exp = rhs` when the variable is in the base.
fn solve_power(base: &Expr, exp: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>, EngineError> {
    // x^n with even integer n has two real branches; the negative root
    // comes first so it is the canonical inverse
    if let Expr::Num(n) = exp {
        if n.fract() == 0.0 && *n != 0.0 && (*n as i64) % 2 == 0 {
            let root = nth_root(rhs, *n);
            let mut branches = solve(base, &Expr::Neg(root.clone().boxed()), var)?;
            branches.extend(solve(base, &root, var)?);
            return Ok(branches);
        }
        if *n == 0.0 {
            return Err(EngineError::NoInverse);
        }
        return solve(base, &nth_root(rhs, *n), var);
    }

    // Symbolic exponent free of the variable: x^a = y  →  x = y^(1/a)
    let root = Expr::Pow(
        rhs.clone().boxed(),
        Expr::Div(Expr::num(1.0).boxed(), exp.clone().boxed()).boxed(),
    );
    solve(base, &root, var)
}

fn nth_root(rhs: &Expr, n: f64) -> Expr {
    if n == 2.0 {
        Expr::Func(Function::Sqrt, rhs.clone().boxed())
    } else {
        Expr::Pow(rhs.clone().boxed(), Expr::num(1.0 / n).boxed())
    }
}

/// The inverse of each elementary function, applied to `rhs`.
fn apply_inverse(func: Function, rhs: &Expr) -> Expr {
    let arg = rhs.clone().boxed();
    match func {
        Function::Sin => Expr::Func(Function::Asin, arg),
        Function::Cos => Expr::Func(Function::Acos, arg),
        Function::Tan => Expr::Func(Function::Atan, arg),
        Function::Asin => Expr::Func(Function::Sin, arg),
        Function::Acos => Expr::Func(Function::Cos, arg),
        Function::Atan => Expr::Func(Function::Tan, arg),
        Function::Exp => Expr::Func(Function::Ln, arg),
        Function::Ln => Expr::Func(Function::Exp, arg),
        Function::Log10 => Expr::Pow(Expr::num(10.0).boxed(), arg),
        Function::Sqrt => Expr::Pow(arg, Expr::num(2.0).boxed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval;
    use crate::parser::parse;
    use std::collections::BTreeMap;

    fn invert_src(src: &str) -> Result<Expr, EngineError> {
        invert(&parse(src).unwrap(), "x", "y")
    }

    #[test]
    fn test_linear() {
        let inv = invert_src("2*x+3").unwrap();
        assert_eq!(inv.to_string(), "(y - 3)/2");
    }

    #[test]
    fn test_square_negative_branch_first() {
        let inv = invert_src("x**2").unwrap();
        assert_eq!(inv.to_string(), "-sqrt(y)");

        let branches = solve(&parse("x**2").unwrap(), &Expr::var("y"), "x").unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].to_string(), "sqrt(y)");
    }

    #[test]
    fn test_exponential_with_parameter_base() {
        // a^x = y  →  x = ln(y)/ln(a)
        let inv = invert_src("a^x").unwrap();
        assert_eq!(inv.to_string(), "ln(y)/ln(a)");
    }

    #[test]
    fn test_elementary_functions() {
        assert_eq!(invert_src("sin(x)").unwrap().to_string(), "asin(y)");
        assert_eq!(invert_src("exp(x)").unwrap().to_string(), "ln(y)");
        assert_eq!(invert_src("ln(x)").unwrap().to_string(), "exp(y)");
        assert_eq!(invert_src("sqrt(x)").unwrap().to_string(), "y^2");
        assert_eq!(invert_src("log10(x)").unwrap().to_string(), "10^y");
    }

    #[test]
    fn test_nested_isolation() {
        // ln(2*x + 1) = y  →  x = (exp(y) - 1)/2
        let inv = invert_src("ln(2*x+1)").unwrap();
        assert_eq!(inv.to_string(), "(exp(y) - 1)/2");
    }

    #[test]
    fn test_division_by_variable() {
        // 1/x = y  →  x = 1/y
        let inv = invert_src("1/x").unwrap();
        assert_eq!(inv.to_string(), "1/y");
    }

    #[test]
    fn test_constant_has_no_inverse() {
        assert_eq!(invert_src("5"), Err(EngineError::NoInverse));
        assert_eq!(invert_src("a+1"), Err(EngineError::NoInverse));
    }

    #[test]
    fn test_variable_on_both_sides_unsolvable() {
        assert_eq!(invert_src("x^x"), Err(EngineError::NoInverse));
        assert_eq!(invert_src("x + sin(x)"), Err(EngineError::NoInverse));
    }

    #[test]
    fn test_reserved_symbol_rejected() {
        let err = invert_src("x + y").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_round_trip_numeric() {
        // f(f⁻¹(y)) = y on a few points, for several shapes
        for (src, ys) in [
            ("2*x+3", vec![-5.0, 0.0, 7.5]),
            ("exp(x)", vec![0.5, 1.0, 10.0]),
            ("ln(2*x+1)", vec![-1.0, 0.0, 2.0]),
            ("1/x", vec![-2.0, 0.25, 4.0]),
        ] {
            let f = parse(src).unwrap();
            let inv = invert(&f, "x", "y").unwrap();
            for y in ys {
                let mut map = BTreeMap::new();
                map.insert("y".to_string(), y);
                let x = eval(&inv, &map).unwrap();
                let mut back = BTreeMap::new();
                back.insert("x".to_string(), x);
                let round = eval(&f, &back).unwrap();
                assert!(
                    (round - y).abs() < 1e-9,
                    "{}: expected {}, got {}",
                    src,
                    y,
                    round
                );
            }
        }
    }
}
