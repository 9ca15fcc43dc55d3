// Expression parser - converts infix math strings into Expr trees
// Supports: numbers, free symbols, functions (sin, ln, ...), basic math
// (+, -, *, /), power (^ and **), parentheses, unary +/-.

use crate::error::EngineError;
use crate::expr::{Expr, Function};

/// Parse an infix expression string.
///
/// Identifiers found in the function table become function applications
/// (`sin(x)`); any other identifier becomes a free symbol. Malformed
/// input is rejected here so that downstream stages only ever see
/// well-formed trees.
pub fn parse(raw: &str) -> Result<Expr, EngineError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(EngineError::Parse("empty expression".to_string()));
    }

    let tokens = tokenize(input)?;
    let (expr, pos) = parse_add_sub(&tokens, 0)?;
    if pos < tokens.len() {
        return Err(EngineError::Parse(format!(
            "unexpected trailing input at token {}",
            pos
        )));
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ or **
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EngineError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '*' => {
                chars.next();
                // ** is the power operator (Python notation)
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Caret);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                chars.next();
            }
            '^' => {
                tokens.push(Token::Caret);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| EngineError::Parse(format!("invalid number: {}", num_str)))?;
                tokens.push(Token::Number(num));
            }
            'A'..='Z' | 'a'..='z' | '_' => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => {
                return Err(EngineError::Parse(format!("unexpected character: {}", c)));
            }
        }
    }

    Ok(tokens)
}

// Precedence ladder, lowest first: add/sub → mul/div → unary → power →
// primary. Power is right-associative and its exponent re-enters at the
// unary level so `2^-x` parses.

fn parse_add_sub(tokens: &[Token], pos: usize) -> Result<(Expr, usize), EngineError> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos)?;

    while pos < tokens.len() {
        match &tokens[pos] {
            Token::Plus => {
                let (right, new_pos) = parse_mul_div(tokens, pos + 1)?;
                left = Expr::Add(left.boxed(), right.boxed());
                pos = new_pos;
            }
            Token::Minus => {
                let (right, new_pos) = parse_mul_div(tokens, pos + 1)?;
                left = Expr::Sub(left.boxed(), right.boxed());
                pos = new_pos;
            }
            _ => break,
        }
    }

    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize) -> Result<(Expr, usize), EngineError> {
    let (mut left, mut pos) = parse_unary(tokens, pos)?;

    while pos < tokens.len() {
        match &tokens[pos] {
            Token::Star => {
                let (right, new_pos) = parse_unary(tokens, pos + 1)?;
                left = Expr::Mul(left.boxed(), right.boxed());
                pos = new_pos;
            }
            Token::Slash => {
                let (right, new_pos) = parse_unary(tokens, pos + 1)?;
                left = Expr::Div(left.boxed(), right.boxed());
                pos = new_pos;
            }
            _ => break,
        }
    }

    Ok((left, pos))
}

fn parse_unary(tokens: &[Token], pos: usize) -> Result<(Expr, usize), EngineError> {
    if pos >= tokens.len() {
        return Err(EngineError::Parse("unexpected end of expression".to_string()));
    }

    match &tokens[pos] {
        // Unary plus is a no-op
        Token::Plus => parse_unary(tokens, pos + 1),
        // Unary minus binds looser than power: -x^2 is -(x^2)
        Token::Minus => {
            let (expr, pos) = parse_unary(tokens, pos + 1)?;
            Ok((Expr::Neg(expr.boxed()), pos))
        }
        _ => parse_power(tokens, pos),
    }
}

fn parse_power(tokens: &[Token], pos: usize) -> Result<(Expr, usize), EngineError> {
    let (base, pos) = parse_primary(tokens, pos)?;

    if pos < tokens.len() && tokens[pos] == Token::Caret {
        // Right-associative: the exponent may itself be a power or signed
        let (exponent, new_pos) = parse_unary(tokens, pos + 1)?;
        return Ok((Expr::Pow(base.boxed(), exponent.boxed()), new_pos));
    }

    Ok((base, pos))
}

fn parse_primary(tokens: &[Token], pos: usize) -> Result<(Expr, usize), EngineError> {
    if pos >= tokens.len() {
        return Err(EngineError::Parse("unexpected end of expression".to_string()));
    }

    match &tokens[pos] {
        Token::Number(n) => Ok((Expr::Num(*n), pos + 1)),
        Token::Ident(name) => {
            let is_call = pos + 1 < tokens.len() && tokens[pos + 1] == Token::LParen;
            match Function::from_name(name) {
                Some(func) if is_call => {
                    let (arg, new_pos) = parse_paren(tokens, pos + 1)?;
                    Ok((Expr::Func(func, arg.boxed()), new_pos))
                }
                None if is_call => Err(EngineError::Parse(format!("unknown function: {}", name))),
                // A function name without parentheses, or any unknown
                // identifier, is a free symbol
                _ => Ok((Expr::Var(name.clone()), pos + 1)),
            }
        }
        Token::LParen => parse_paren(tokens, pos),
        other => Err(EngineError::Parse(format!("unexpected token: {:?}", other))),
    }
}

/// Parse `( expr )` starting at the opening parenthesis.
fn parse_paren(tokens: &[Token], pos: usize) -> Result<(Expr, usize), EngineError> {
    debug_assert_eq!(tokens[pos], Token::LParen);
    let (expr, pos) = parse_add_sub(tokens, pos + 1)?;
    if pos >= tokens.len() {
        return Err(EngineError::Parse("missing closing parenthesis".to_string()));
    }
    match &tokens[pos] {
        Token::RParen => Ok((expr, pos + 1)),
        _ => Err(EngineError::Parse("expected closing parenthesis".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_linear() {
        let expr = parse("2*x+3").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Expr::Mul(Expr::num(2.0).boxed(), Expr::var("x").boxed()).boxed(),
                Expr::num(3.0).boxed(),
            )
        );
    }

    #[test]
    fn test_parse_python_power() {
        let expr = parse("x**2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(Expr::var("x").boxed(), Expr::num(2.0).boxed())
        );
    }

    #[test]
    fn test_parse_caret_power() {
        assert_eq!(parse("x^2").unwrap(), parse("x**2").unwrap());
    }

    #[test]
    fn test_power_right_associative() {
        // 2^3^2 = 2^(3^2)
        let expr = parse("2^3^2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Expr::num(2.0).boxed(),
                Expr::Pow(Expr::num(3.0).boxed(), Expr::num(2.0).boxed()).boxed(),
            )
        );
    }

    #[test]
    fn test_power_binds_tighter_than_mul() {
        // 2*x^3 = 2*(x^3)
        let expr = parse("2*x^3").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Expr::num(2.0).boxed(),
                Expr::Pow(Expr::var("x").boxed(), Expr::num(3.0).boxed()).boxed(),
            )
        );
    }

    #[test]
    fn test_unary_minus_below_power() {
        // -x^2 = -(x^2)
        let expr = parse("-x^2").unwrap();
        assert_eq!(
            expr,
            Expr::Neg(Expr::Pow(Expr::var("x").boxed(), Expr::num(2.0).boxed()).boxed())
        );
    }

    #[test]
    fn test_negative_exponent() {
        // 2^-x
        let expr = parse("2^-x").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Expr::num(2.0).boxed(),
                Expr::Neg(Expr::var("x").boxed()).boxed(),
            )
        );
    }

    #[test]
    fn test_unknown_identifier_is_free_symbol() {
        let expr = parse("a^x").unwrap();
        let syms: Vec<String> = expr.free_symbols().into_iter().collect();
        assert_eq!(syms, vec!["a", "x"]);
    }

    #[test]
    fn test_known_function() {
        let expr = parse("sin(x)").unwrap();
        assert_eq!(expr, Expr::Func(Function::Sin, Expr::var("x").boxed()));
    }

    #[test]
    fn test_function_name_without_call_is_symbol() {
        // "sin" with no argument list is just a symbol named sin
        let expr = parse("sin + 1").unwrap();
        assert!(expr.contains("sin"));
    }

    #[test]
    fn test_unknown_function_rejected() {
        let err = parse("foo(x)").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
        assert!(err.to_string().contains("unknown function"));
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(matches!(parse("(x+1"), Err(EngineError::Parse(_))));
        assert!(matches!(parse("x+1)"), Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse("   "), Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(matches!(parse("x 5"), Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse("x$2").unwrap_err();
        assert!(err.to_string().contains("unexpected character"));
    }

    #[test]
    fn test_decimal_numbers() {
        let expr = parse("0.5*x").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(Expr::num(0.5).boxed(), Expr::var("x").boxed())
        );
    }

    #[test]
    fn test_nested_functions() {
        let expr = parse("ln(sin(x)+1)").unwrap();
        assert_eq!(
            expr,
            Expr::Func(
                Function::Ln,
                Expr::Add(
                    Expr::Func(Function::Sin, Expr::var("x").boxed()).boxed(),
                    Expr::num(1.0).boxed(),
                )
                .boxed(),
            )
        );
    }
}
