pub mod error;
pub mod eval;
pub mod expr;
pub mod latex;
pub mod parser;
pub mod sample;
pub mod solve;

pub use error::EngineError;
pub use expr::{Expr, Function};
pub use latex::to_latex;
pub use parser::parse;
pub use sample::{sample, Samples, DOMAIN_END, DOMAIN_START};
pub use solve::{invert, solve};
