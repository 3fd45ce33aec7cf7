use super::error::ParseError;
use crate::common::Int;
use crate::ops::Operator;
use logos::{Lexer, Logos};
use std::fmt;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Int(Int),
    /// String literal with escapes already removed.
    Str(String),
    /// Raw text between the outer brackets of a tuple literal.
    Tuple(String),
    /// Temp variable reference, holding the parsed index.
    Temp(Int),
    Ident(String),
    Op(Operator),
    LParen,
    RParen,
    Question,
    Colon,
    Comma,
    Percent,
}

impl Token {
    /// True for anything that wants operands on both sides, including the ternary `?`.
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Op(_) | Self::Question)
    }

    pub fn as_op(&self) -> Option<Operator> {
        match self {
            Self::Op(op) => Some(*op),
            _ => None,
        }
    }

    fn word(w: &str) -> Self {
        match Operator::from_word(w) {
            Some(op) => Self::Op(op),
            None => Self::Ident(w.to_owned()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => write!(f, "{}", x),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Tuple(s) => write!(f, "[{}]", s),
            Self::Temp(i) => write!(f, "$t{}", i),
            Self::Ident(name) => f.write_str(name),
            Self::Op(op) => write!(f, "{}", op),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Question => f.write_str("?"),
            Self::Colon => f.write_str(":"),
            Self::Comma => f.write_str(","),
            Self::Percent => f.write_str("%"),
        }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
enum RawToken {
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    Integer(Int),
    #[token("\"", string_literal)]
    Str(String),
    #[token("[", tuple_literal)]
    Tuple(String),
    #[regex(r"\$[a-zA-Z0-9]*", |lex| temp_index(lex.slice()))]
    Temp(Int),
    #[regex(r"[a-zA-Z]+")]
    Word,
    #[regex(r"[-+*/^=<>&|]", |lex| lex.slice().chars().next())]
    Symbol(char),

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("%")]
    Percent,

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    #[error]
    Error,
}

pub fn tokenize(s: &str) -> Result<Vec<Token>, ParseError> {
    let mut lex = RawToken::lexer(s);
    let mut tokens = Vec::new();
    while let Some(raw) = lex.next() {
        let token = match raw {
            RawToken::Integer(x) => Token::Int(x),
            RawToken::Str(s) => Token::Str(s),
            RawToken::Tuple(s) => Token::Tuple(s),
            RawToken::Temp(index) => Token::Temp(index),
            RawToken::Word => Token::word(lex.slice()),
            RawToken::Symbol(c) => match Operator::from_symbol(c) {
                Some(op) => Token::Op(op),
                None => {
                    return Err(ParseError::UnexpectedChar {
                        position: lex.span().start,
                        found: c,
                    })
                }
            },
            RawToken::LeftParen => Token::LParen,
            RawToken::RightParen => Token::RParen,
            RawToken::Question => Token::Question,
            RawToken::Colon => Token::Colon,
            RawToken::Comma => Token::Comma,
            RawToken::Percent => Token::Percent,
            RawToken::Error => return Err(ParseError::from_slice(lex.span().start, lex.slice())),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

// `$t12` -> 12; anything without a parsable suffix refers to slot 1
fn temp_index(slice: &str) -> Int {
    slice
        .get(2..)
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(1)
}

fn string_literal(lex: &mut Lexer<RawToken>) -> Option<String> {
    let mut content = String::new();
    let mut chars = lex.remainder().char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => content.push(chars.next()?.1),
            '"' => {
                lex.bump(i + 1);
                return Some(content);
            }
            _ => content.push(c),
        }
    }
    None
}

fn tuple_literal(lex: &mut Lexer<RawToken>) -> Option<String> {
    let rest = lex.remainder();
    let mut depth = 1usize;
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    lex.bump(i + 1);
                    return Some(rest[..i].to_owned());
                }
            }
            '"' => skip_string(&mut chars)?,
            _ => {}
        }
    }
    None
}

fn skip_string(chars: &mut CharIndices) -> Option<()> {
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '"' => return Some(()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::*;

    fn check(s: &str, expected: Vec<Token>) {
        assert_eq!(tokenize(s).unwrap(), expected);
    }

    fn check_err(s: &str, expected: ParseError) {
        assert_eq!(tokenize(s).unwrap_err(), expected);
    }

    fn op(w: &str) -> Token {
        Token::Op(Operator::from_word(w).unwrap())
    }

    #[test]
    fn test_lex_arithmetic() {
        check(
            "1 + 23*(4-5)",
            vec![
                Token::Int(1),
                Token::Op(Arithmetic::Add.into()),
                Token::Int(23),
                Token::Op(Arithmetic::Mul.into()),
                Token::LParen,
                Token::Int(4),
                Token::Op(Arithmetic::Sub.into()),
                Token::Int(5),
                Token::RParen,
            ],
        );
    }

    #[test]
    fn test_lex_words() {
        check("4d6kh3", vec![Token::Int(4), op("d"), Token::Int(6), op("kh"), Token::Int(3)]);
        check("d%", vec![op("d"), Token::Percent]);
        check("3a5m6", vec![Token::Int(3), op("a"), Token::Int(5), Token::Ident("m".into()), Token::Int(6)]);
        check("df", vec![op("f")]);
        check("xyz", vec![Token::Ident("xyz".into())]);
    }

    #[test]
    fn test_lex_ternary() {
        check(
            "1?2:3",
            vec![Token::Int(1), Token::Question, Token::Int(2), Token::Colon, Token::Int(3)],
        );
    }

    #[test]
    fn test_lex_temp() {
        check("$t", vec![Token::Temp(1)]);
        check("$t12", vec![Token::Temp(12)]);
        check("$", vec![Token::Temp(1)]);
        check("$tx", vec![Token::Temp(1)]);
        check(
            "$t2=7",
            vec![Token::Temp(2), Token::Op(Assign.into()), Token::Int(7)],
        );
    }

    #[test]
    fn test_lex_string() {
        check(r#""a{i}b""#, vec![Token::Str("a{i}b".into())]);
        check(r#""say \"hi\"""#, vec![Token::Str("say \"hi\"".into())]);
        check(r#""back\\slash""#, vec![Token::Str("back\\slash".into())]);
    }

    #[test]
    fn test_lex_tuple() {
        check("[1,2,3]", vec![Token::Tuple("1,2,3".into())]);
        check("[[1],2]kh1", vec![Token::Tuple("[1],2".into()), op("kh"), Token::Int(1)]);
        check(r#"["a]b",2]"#, vec![Token::Tuple(r#""a]b",2"#.into())]);
        check("[]", vec![Token::Tuple(String::new())]);
    }

    #[test]
    fn test_lex_errors() {
        check_err("1 # 2", ParseError::UnexpectedChar { position: 2, found: '#' });
        check_err(r#"1+"abc"#, ParseError::UnterminatedString(2));
        check_err("[1,2", ParseError::UnterminatedTuple(0));
        check_err(r#"["a,2]"#, ParseError::UnterminatedTuple(0));
        check_err(
            "99999999999999999999",
            ParseError::InvalidInteger {
                position: 0,
                slice: "99999999999999999999".into(),
            },
        );
    }
}
