// Numeric evaluation of expression trees.
//
// Domain violations (ln of a negative, division by zero) are not errors
// here: they surface as NaN or infinity and the sampler decides what to
// do with them. Only an unbound variable is a hard failure, because it
// means the caller's setup was wrong.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::expr::{Expr, Function};

/// Evaluate an expression under the given variable bindings.
pub fn eval(expr: &Expr, bindings: &BTreeMap<String, f64>) -> Result<f64, EngineError> {
    match expr {
        Expr::Num(v) => Ok(*v),
        Expr::Var(name) => bindings
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::Sample(format!("unbound variable: {}", name))),
        Expr::Neg(a) => Ok(-eval(a, bindings)?),
        Expr::Add(a, b) => Ok(eval(a, bindings)? + eval(b, bindings)?),
        Expr::Sub(a, b) => Ok(eval(a, bindings)? - eval(b, bindings)?),
        Expr::Mul(a, b) => Ok(eval(a, bindings)? * eval(b, bindings)?),
        Expr::Div(a, b) => Ok(eval(a, bindings)? / eval(b, bindings)?),
        Expr::Pow(a, b) => Ok(eval(a, bindings)?.powf(eval(b, bindings)?)),
        Expr::Func(func, a) => {
            let v = eval(a, bindings)?;
            Ok(apply(*func, v))
        }
    }
}

fn apply(func: Function, v: f64) -> f64 {
    match func {
        Function::Sin => v.sin(),
        Function::Cos => v.cos(),
        Function::Tan => v.tan(),
        Function::Asin => v.asin(),
        Function::Acos => v.acos(),
        Function::Atan => v.atan(),
        Function::Exp => v.exp(),
        Function::Ln => v.ln(),
        Function::Log10 => v.log10(),
        Function::Sqrt => v.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn eval_at(src: &str, x: f64) -> f64 {
        let expr = parse(src).unwrap();
        let mut map = BTreeMap::new();
        map.insert("x".to_string(), x);
        eval(&expr, &map).unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_at("2*x+3", 5.0), 13.0);
        assert_eq!(eval_at("x^2", -3.0), 9.0);
        assert_eq!(eval_at("-x^2", 3.0), -9.0);
        assert_eq!(eval_at("(x+1)/2", 3.0), 2.0);
    }

    #[test]
    fn test_functions() {
        assert!((eval_at("sin(x)", std::f64::consts::FRAC_PI_2) - 1.0).abs() < 1e-12);
        assert!((eval_at("exp(x)", 1.0) - std::f64::consts::E).abs() < 1e-12);
        assert!((eval_at("ln(x)", std::f64::consts::E) - 1.0).abs() < 1e-12);
        assert_eq!(eval_at("sqrt(x)", 16.0), 4.0);
        assert_eq!(eval_at("log10(x)", 1000.0), 3.0);
    }

    #[test]
    fn test_domain_violations_are_not_errors() {
        assert!(eval_at("1/x", 0.0).is_infinite());
        assert!(eval_at("ln(x)", -1.0).is_nan());
        assert!(eval_at("sqrt(x)", -4.0).is_nan());
    }

    #[test]
    fn test_unbound_variable_is_error() {
        let expr = parse("a*x").unwrap();
        let mut map = BTreeMap::new();
        map.insert("x".to_string(), 1.0);
        let err = eval(&expr, &map).unwrap_err();
        assert!(matches!(err, EngineError::Sample(_)));
        assert!(err.to_string().contains("unbound variable"));
    }
}
