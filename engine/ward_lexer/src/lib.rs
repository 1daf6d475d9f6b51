//! Tokenizer for the ward expression language, built on logos.
//!
//! Each symbol kind is one pattern; logos priorities reproduce the engine's
//! contract of trying recognizers in a fixed order at every cursor
//! position. Whitespace and `#` comments are trivia and never reach the
//! parser. Any input no recognizer matches fails with
//! [`ExprError::Format`] carrying the remaining text.

use logos::Logos;
use ward_ir::{ExprError, ExprResult, Op, Value};

/// Raw symbol from logos (before conversion to operands and operators).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawSymbol {
    #[regex(r"#[^\n]*")]
    Comment,

    // Literals
    #[regex(r"\[[^\]\[]*\]")]
    Array,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[regex(r"'[^']*'")]
    #[regex(r#""[^"]*""#)]
    Quoted,
    #[regex(r"-?[0-9]+")]
    Int,

    // `${name}`, with an optional leading `~` that is part of the name
    #[regex(r"\$\{~?[A-Za-z0-9_.-]+\}")]
    Variable,

    // Binary operators
    #[token("<=")]
    LowerOrEqual,
    #[token(">=")]
    GreaterOrEqual,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    LowerThan,
    #[token(">")]
    GreaterThan,
    #[token("||")]
    #[token("OR")]
    Or,
    #[token("&&")]
    #[token("AND")]
    And,
    #[token("contains")]
    Contains,

    // Unary operators
    #[token("!")]
    #[token("NOT")]
    Not,
    #[token("(list)")]
    AsList,
    #[token("(string)")]
    AsString,
    #[token("(int)")]
    AsInt,
    #[token("sizeof")]
    Sizeof,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

/// One meaningful symbol of the surface syntax, trivia removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// A literal operand (boolean, int, string or array).
    Operand(Value),
    /// A variable reference, name without the `${}` wrapper.
    Var(String),
    /// A two-operand operator.
    Binary(Op),
    /// A one-operand operator.
    Unary(Op),
    /// Opening parenthesis.
    LParen,
    /// Closing parenthesis.
    RParen,
}

/// Tokenize `source` into symbols, discarding whitespace and comments.
pub fn lex(source: &str) -> ExprResult<Vec<Symbol>> {
    let mut symbols = Vec::new();
    let mut lexer = RawSymbol::lexer(source);

    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        match result {
            Ok(RawSymbol::Comment) => {}
            Ok(raw) => symbols.push(convert(raw, slice)?),
            Err(()) => return Err(ExprError::unparsed(&source[lexer.span().start..])),
        }
    }

    Ok(symbols)
}

/// Convert a raw symbol, decoding literal payloads from the matched slice.
fn convert(raw: RawSymbol, slice: &str) -> ExprResult<Symbol> {
    let symbol = match raw {
        RawSymbol::True => Symbol::Operand(Value::Bool(true)),
        RawSymbol::False => Symbol::Operand(Value::Bool(false)),
        RawSymbol::Quoted => {
            // The pattern guarantees matching quotes with no embedded ones.
            Symbol::Operand(Value::Str(slice[1..slice.len() - 1].to_owned()))
        }
        RawSymbol::Int => {
            let value = slice
                .parse::<i64>()
                .map_err(|_| ExprError::Format(format!("integer '{slice}' is out of range")))?;
            Symbol::Operand(Value::Int(value))
        }
        RawSymbol::Array => Symbol::Operand(Value::List(parse_array(slice)?)),
        RawSymbol::Variable => Symbol::Var(slice[2..slice.len() - 1].to_owned()),

        RawSymbol::Or => Symbol::Binary(Op::Or),
        RawSymbol::And => Symbol::Binary(Op::And),
        RawSymbol::Equal => Symbol::Binary(Op::Equal),
        RawSymbol::NotEqual => Symbol::Binary(Op::NotEqual),
        RawSymbol::Contains => Symbol::Binary(Op::Contains),
        RawSymbol::GreaterThan => Symbol::Binary(Op::GreaterThan),
        RawSymbol::GreaterOrEqual => Symbol::Binary(Op::GreaterOrEqual),
        RawSymbol::LowerThan => Symbol::Binary(Op::LowerThan),
        RawSymbol::LowerOrEqual => Symbol::Binary(Op::LowerOrEqual),

        RawSymbol::Not => Symbol::Unary(Op::Not),
        RawSymbol::Sizeof => Symbol::Unary(Op::Sizeof),
        RawSymbol::AsInt => Symbol::Unary(Op::AsInt),
        RawSymbol::AsString => Symbol::Unary(Op::AsString),
        RawSymbol::AsList => Symbol::Unary(Op::AsList),

        RawSymbol::LParen => Symbol::LParen,
        RawSymbol::RParen => Symbol::RParen,

        // Trivia is filtered by the caller.
        RawSymbol::Comment => {
            return Err(ExprError::InvalidState("comment reached conversion".to_owned()))
        }
    };
    Ok(symbol)
}

/// Decode the body of a bracketed array literal: comma-separated
/// single-quoted strings, arbitrary whitespace between them.
fn parse_array(slice: &str) -> ExprResult<Vec<String>> {
    let inner = &slice[1..slice.len() - 1];
    let mut items = Vec::new();
    let mut rest = inner.trim_start();

    if rest.is_empty() {
        return Ok(items);
    }

    loop {
        let Some(body) = rest.strip_prefix('\'') else {
            return Err(ExprError::Format(format!(
                "expected a quoted list element in '{slice}'"
            )));
        };
        let Some(end) = body.find('\'') else {
            return Err(ExprError::Format(format!("unterminated list element in '{slice}'")));
        };
        items.push(body[..end].to_owned());
        rest = body[end + 1..].trim_start();

        if rest.is_empty() {
            return Ok(items);
        }
        let Some(after_comma) = rest.strip_prefix(',') else {
            return Err(ExprError::Format(format!(
                "expected ',' between list elements in '{slice}'"
            )));
        };
        rest = after_comma.trim_start();
    }
}

#[cfg(test)]
mod tests;
