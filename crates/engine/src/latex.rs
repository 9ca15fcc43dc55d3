// LaTeX rendering of expression trees.
//
// Deterministic: the same tree always renders to the same string, so the
// output is a stable display key for clients. Division always becomes
// \frac, powers always brace the exponent.

use crate::expr::{fmt_num, precedence, Expr, Function};

/// Render an expression as LaTeX source.
pub fn to_latex(expr: &Expr) -> String {
    match expr {
        Expr::Num(v) => fmt_num(*v),
        Expr::Var(name) => name.clone(),
        Expr::Neg(a) => format!("-{}", child(a, 3)),
        Expr::Add(a, b) => format!("{} + {}", child(a, 1), child(b, 2)),
        Expr::Sub(a, b) => format!("{} - {}", child(a, 1), child(b, 2)),
        Expr::Mul(a, b) => {
            // Implicit multiplication reads fine between a coefficient
            // and a symbol; two numerals need an explicit \cdot
            let sep = if matches!(**b, Expr::Num(_)) {
                " \\cdot "
            } else {
                " "
            };
            format!("{}{}{}", child(a, 3), sep, child(b, 3))
        }
        Expr::Div(a, b) => format!("\\frac{{{}}}{{{}}}", to_latex(a), to_latex(b)),
        Expr::Pow(a, b) => format!("{}^{{{}}}", child(a, 5), to_latex(b)),
        Expr::Func(func, a) => render_func(*func, a),
    }
}

fn child(expr: &Expr, parent_prec: u8) -> String {
    if precedence(expr) < parent_prec {
        format!("\\left({}\\right)", to_latex(expr))
    } else {
        to_latex(expr)
    }
}

fn render_func(func: Function, arg: &Expr) -> String {
    let inner = to_latex(arg);
    match func {
        Function::Sin => format!("\\sin\\left({}\\right)", inner),
        Function::Cos => format!("\\cos\\left({}\\right)", inner),
        Function::Tan => format!("\\tan\\left({}\\right)", inner),
        Function::Asin => format!("\\operatorname{{asin}}\\left({}\\right)", inner),
        Function::Acos => format!("\\operatorname{{acos}}\\left({}\\right)", inner),
        Function::Atan => format!("\\operatorname{{atan}}\\left({}\\right)", inner),
        Function::Exp => format!("e^{{{}}}", inner),
        Function::Ln => format!("\\ln\\left({}\\right)", inner),
        Function::Log10 => format!("\\log_{{10}}\\left({}\\right)", inner),
        Function::Sqrt => format!("\\sqrt{{{}}}", inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::solve::invert;

    fn latex_of_inverse(src: &str) -> String {
        to_latex(&invert(&parse(src).unwrap(), "x", "y").unwrap())
    }

    #[test]
    fn test_fraction() {
        assert_eq!(latex_of_inverse("2*x+3"), "\\frac{y - 3}{2}");
    }

    #[test]
    fn test_sqrt_branch() {
        assert_eq!(latex_of_inverse("x**2"), "-\\sqrt{y}");
    }

    #[test]
    fn test_log_ratio() {
        assert_eq!(latex_of_inverse("a^x"), "\\frac{\\ln\\left(y\\right)}{\\ln\\left(a\\right)}");
    }

    #[test]
    fn test_power_braces_exponent() {
        let expr = parse("x^12").unwrap();
        assert_eq!(to_latex(&expr), "x^{12}");
    }

    #[test]
    fn test_exp_renders_as_e_power() {
        let expr = parse("exp(2*x)").unwrap();
        assert_eq!(to_latex(&expr), "e^{2 x}");
    }

    #[test]
    fn test_parenthesized_base() {
        let expr = parse("(x+1)^2").unwrap();
        assert_eq!(to_latex(&expr), "\\left(x + 1\\right)^{2}");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(to_latex(&parse("2*x").unwrap()), "2 x");
        assert_eq!(to_latex(&parse("x*2").unwrap()), "x \\cdot 2");
    }

    #[test]
    fn test_deterministic() {
        let a = to_latex(&parse("sin(x)/x").unwrap());
        let b = to_latex(&parse("sin(x)/x").unwrap());
        assert_eq!(a, b);
        assert_eq!(a, "\\frac{\\sin\\left(x\\right)}{x}");
    }
}
