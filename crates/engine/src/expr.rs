// Symbolic expression tree.
//
// Expressions are immutable: substitution and simplification always build
// new trees. A symbol's identity is its name; there is no interning.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Unary elementary functions recognized by the parser and solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Ln,
    Log10,
    Sqrt,
}

impl Function {
    /// Look up a function by its source-notation name.
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            "asin" | "arcsin" => Some(Function::Asin),
            "acos" | "arccos" => Some(Function::Acos),
            "atan" | "arctan" => Some(Function::Atan),
            "exp" => Some(Function::Exp),
            "ln" => Some(Function::Ln),
            "log" => Some(Function::Ln),
            "log10" => Some(Function::Log10),
            "sqrt" => Some(Function::Sqrt),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
        }
    }
}

/// Symbolic expression over numbers, named variables and elementary
/// functions. Always well-formed: only the parser constructs these from
/// user input, and it rejects malformed strings up front.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(Function, Box<Expr>),
}

impl Expr {
    pub fn num(v: f64) -> Expr {
        Expr::Num(v)
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn boxed(self) -> Box<Expr> {
        Box::new(self)
    }

    /// All variable names appearing in the tree, sorted (BTreeSet keeps
    /// parameter substitution deterministic).
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Num(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(a) | Expr::Func(_, a) => a.collect_symbols(out),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    /// Whether the named variable occurs anywhere in the tree.
    pub fn contains(&self, var: &str) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Var(name) => name == var,
            Expr::Neg(a) | Expr::Func(_, a) => a.contains(var),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.contains(var) || b.contains(var),
        }
    }

    /// Substitute variables with constants, producing a new tree.
    /// Variables not in the map are left untouched.
    pub fn subst(&self, bindings: &BTreeMap<String, f64>) -> Expr {
        match self {
            Expr::Num(v) => Expr::Num(*v),
            Expr::Var(name) => match bindings.get(name) {
                Some(v) => Expr::Num(*v),
                None => Expr::Var(name.clone()),
            },
            Expr::Neg(a) => Expr::Neg(a.subst(bindings).boxed()),
            Expr::Add(a, b) => Expr::Add(a.subst(bindings).boxed(), b.subst(bindings).boxed()),
            Expr::Sub(a, b) => Expr::Sub(a.subst(bindings).boxed(), b.subst(bindings).boxed()),
            Expr::Mul(a, b) => Expr::Mul(a.subst(bindings).boxed(), b.subst(bindings).boxed()),
            Expr::Div(a, b) => Expr::Div(a.subst(bindings).boxed(), b.subst(bindings).boxed()),
            Expr::Pow(a, b) => Expr::Pow(a.subst(bindings).boxed(), b.subst(bindings).boxed()),
            Expr::Func(func, a) => Expr::Func(*func, a.subst(bindings).boxed()),
        }
    }

    /// Light structural simplification: constant folding and arithmetic
    /// identities (x+0, x*1, x*0, double negation). Used to tidy inverse
    /// expressions before rendering; not a full CAS simplifier.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Num(_) | Expr::Var(_) => self.clone(),
            Expr::Neg(a) => match a.simplify() {
                Expr::Num(v) => Expr::Num(-v),
                Expr::Neg(inner) => *inner,
                other => Expr::Neg(other.boxed()),
            },
            Expr::Add(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Num(x), Expr::Num(y)) => Expr::Num(x + y),
                (Expr::Num(z), other) | (other, Expr::Num(z)) if z == 0.0 => other,
                (x, y) => Expr::Add(x.boxed(), y.boxed()),
            },
            Expr::Sub(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Num(x), Expr::Num(y)) => Expr::Num(x - y),
                (other, Expr::Num(z)) if z == 0.0 => other,
                (Expr::Num(z), other) if z == 0.0 => Expr::Neg(other.boxed()),
                (x, y) => Expr::Sub(x.boxed(), y.boxed()),
            },
            Expr::Mul(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Num(x), Expr::Num(y)) => Expr::Num(x * y),
                (Expr::Num(z), _) | (_, Expr::Num(z)) if z == 0.0 => Expr::Num(0.0),
                (Expr::Num(o), other) | (other, Expr::Num(o)) if o == 1.0 => other,
                (Expr::Num(m), other) | (other, Expr::Num(m)) if m == -1.0 => {
                    Expr::Neg(other.boxed())
                }
                (x, y) => Expr::Mul(x.boxed(), y.boxed()),
            },
            Expr::Div(a, b) => match (a.simplify(), b.simplify()) {
                (Expr::Num(x), Expr::Num(y)) if y != 0.0 => Expr::Num(x / y),
                (other, Expr::Num(o)) if o == 1.0 => other,
                (x, y) => Expr::Div(x.boxed(), y.boxed()),
            },
            Expr::Pow(a, b) => match (a.simplify(), b.simplify()) {
                (other, Expr::Num(o)) if o == 1.0 => other,
                (x, y) => Expr::Pow(x.boxed(), y.boxed()),
            },
            Expr::Func(func, a) => Expr::Func(*func, a.simplify().boxed()),
        }
    }
}

// ── Infix printing ──────────────────────────────────────────────────

/// Operator precedence for minimal parenthesization.
/// Higher binds tighter.
pub(crate) fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Add(..) | Expr::Sub(..) => 1,
        Expr::Neg(..) => 2,
        Expr::Mul(..) | Expr::Div(..) => 3,
        Expr::Pow(..) => 4,
        Expr::Num(_) | Expr::Var(_) | Expr::Func(..) => 5,
    }
}

fn fmt_child(child: &Expr, parent_prec: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if precedence(child) < parent_prec {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

pub(crate) fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{}", fmt_num(*v)),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Neg(a) => {
                write!(f, "-")?;
                fmt_child(a, 3, f)
            }
            Expr::Add(a, b) => {
                fmt_child(a, 1, f)?;
                write!(f, " + ")?;
                fmt_child(b, 2, f)
            }
            Expr::Sub(a, b) => {
                fmt_child(a, 1, f)?;
                write!(f, " - ")?;
                fmt_child(b, 2, f)
            }
            Expr::Mul(a, b) => {
                fmt_child(a, 3, f)?;
                write!(f, "*")?;
                fmt_child(b, 3, f)
            }
            Expr::Div(a, b) => {
                fmt_child(a, 3, f)?;
                write!(f, "/")?;
                fmt_child(b, 4, f)
            }
            Expr::Pow(a, b) => {
                fmt_child(a, 5, f)?;
                write!(f, "^")?;
                fmt_child(b, 5, f)
            }
            Expr::Func(func, a) => write!(f, "{}({})", func.name(), a),
        }
    }
}
