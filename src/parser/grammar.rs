//! Grammar of the raw tree.
//!
//! ```text
//! expression := list | literal | identifier | keyword
//! list       := "(" expression+ ")" | "[" expression* "]" | "{" expression* "}"
//! ```

use crate::ast::{Expr, Ident, Literal, SExpr, TypeExpr, TypeName};
use crate::diagnostics::Diagnostics;
use crate::lexer::{Kind, Token};

use super::{ParseError, ParseState};

/// expression := list | literal | identifier | keyword
///
/// Returns `None` at end of input or when the expression was malformed; in the latter
/// case the error has already been reported and the offending tokens consumed.
pub fn expression(state: &mut ParseState, diagnostics: &mut Diagnostics) -> Option<Expr> {
    let token = state.advance()?;
    let position = token.position;

    let parsed = match token.kind {
        Kind::OpenParen => return list(state, diagnostics, token, Kind::CloseParen),
        Kind::OpenSquare => return list(state, diagnostics, token, Kind::CloseSquare),
        Kind::OpenCurly => return list(state, diagnostics, token, Kind::CloseCurly),

        Kind::Int => integer(token).map(Expr::Int),
        Kind::Float => float(token).map(Expr::Float),
        Kind::Bool => boolean(token).map(Expr::Bool),
        Kind::String => Ok(Expr::String(Literal {
            value: unescape(&token.value),
            token,
        })),
        Kind::Atom => Ok(Expr::Atom(raw(token))),
        Kind::Path => Ok(Expr::Path(raw(token))),
        Kind::Flag => Ok(Expr::Flag(raw(token))),

        Kind::Identifier
        | Kind::Plus
        | Kind::Minus
        | Kind::Multiply
        | Kind::Divide
        | Kind::GreaterThan
        | Kind::LessThan
        | Kind::GreaterEqual
        | Kind::LessEqual
        | Kind::Equal => Ok(Expr::Identifier(Ident {
            name: token.value.clone(),
            token,
        })),

        Kind::Command => Ok(Expr::SCommand(token)),
        Kind::Let => Ok(Expr::SLet(token)),
        Kind::Fn => Ok(Expr::SFunc(token)),
        Kind::Impl => Ok(Expr::SImpl(token)),

        kind if kind.is_type_keyword() => match TypeExpr::from_keyword(kind) {
            Some(ty) => Ok(Expr::Type(TypeName { ty, token })),
            None => Err(ParseError::Unsupported(token.describe())),
        },

        Kind::Invalid => Err(ParseError::InvalidToken(token.value)),
        _ => Err(ParseError::Unsupported(token.describe())),
    };

    match parsed {
        Ok(expr) => Some(expr),
        Err(error) => {
            diagnostics.push(error, Some(position));
            None
        }
    }
}

/// list := open expression* close
///
/// Parenthesized lists need at least one element, the first being the operator.
/// Square and curly lists carry a marker operator and may be empty.
fn list(
    state: &mut ParseState,
    diagnostics: &mut Diagnostics,
    open: Token,
    close: Kind,
) -> Option<Expr> {
    let position = open.position;
    let mut elements = vec![];

    loop {
        match state.peek() {
            None => {
                diagnostics.push(ParseError::UnclosedList, Some(position));
                return None;
            }
            Some(token) if token.kind == close => {
                state.advance();
                break;
            }
            Some(_) => {
                if let Some(element) = expression(state, diagnostics) {
                    elements.push(element);
                }
            }
        }
    }

    let (operator, operands) = match open.kind {
        Kind::OpenSquare => (Expr::SSquare(open), elements),
        Kind::OpenCurly => (Expr::SCurly(open), elements),
        _ => {
            if elements.is_empty() {
                diagnostics.push(ParseError::EmptyList, Some(position));
                return None;
            }
            let operator = elements.remove(0);
            (operator, elements)
        }
    };

    Some(Expr::SExpr(SExpr {
        operator: Box::new(operator),
        operands,
        position,
    }))
}

fn raw(token: Token) -> Literal<String> {
    Literal {
        value: token.value.clone(),
        token,
    }
}

fn integer(token: Token) -> Result<Literal<i64>, ParseError> {
    let text = token.value.replace('_', "");
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };

    match i64::from_str_radix(&format!("{sign}{digits}"), radix) {
        Ok(value) => Ok(Literal { value, token }),
        Err(_) => Err(ParseError::InvalidInt(token.value)),
    }
}

fn float(token: Token) -> Result<Literal<f64>, ParseError> {
    match token.value.parse::<f64>() {
        Ok(value) => Ok(Literal { value, token }),
        Err(_) => Err(ParseError::InvalidFloat(token.value)),
    }
}

fn boolean(token: Token) -> Result<Literal<bool>, ParseError> {
    let value = match token.value.as_str() {
        "true" => true,
        "false" => false,
        _ => return Err(ParseError::InvalidBool(token.value)),
    };
    Ok(Literal { value, token })
}

/// Strip the surrounding quotes and resolve backslash escapes.
fn unescape(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(raw);

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_token(text: &str) -> Token {
        Token::new(0, text, Kind::Int)
    }

    #[test]
    fn test_integer_bases() {
        assert_eq!(integer(int_token("0b0110_1111")).unwrap().value, 111);
        assert_eq!(integer(int_token("0x1F")).unwrap().value, 31);
        assert_eq!(integer(int_token("0o17")).unwrap().value, 15);
        assert_eq!(integer(int_token("-1_000")).unwrap().value, -1000);
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            integer(int_token("99999999999999999999")),
            Err(ParseError::InvalidInt(_))
        ));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#""a\"b""#), "a\"b");
        assert_eq!(unescape(r#""line\nnext""#), "line\nnext");
        assert_eq!(unescape(r#""\\""#), "\\");
    }
}
