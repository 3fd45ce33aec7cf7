use super::error::ParseError;
use super::lexer::Token;
use crate::ops::{Choose, Operate, Operator};
use std::fmt;

/// One step of a postfix program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Postfix {
    Operand(Token),
    Apply(Operator),
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(tok) => tok.fmt(f),
            Self::Apply(op) => op.fmt(f),
        }
    }
}

enum Pending {
    Op(Operator),
    Paren,
    /// An open `?` still waiting for its `:`.
    Cond,
    /// A `:` whose `?` has been matched.
    Select,
}

// `?` binds tighter than every binary operator and looser than `=`
const COND_PRECEDENCE: u8 = 8;

/// Shunting-yard conversion of an infix token stream.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Postfix>, ParseError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for tok in tokens {
        match tok {
            Token::Int(_) | Token::Str(_) | Token::Tuple(_) | Token::Temp(_) | Token::Ident(_) => {
                out.push(Postfix::Operand(tok))
            }
            Token::Op(op) => {
                pop_while(&mut stack, &mut out, |top| op.yields_to(top));
                stack.push(Pending::Op(op));
            }
            Token::Question => {
                pop_while(&mut stack, &mut out, |top| top >= COND_PRECEDENCE);
                stack.push(Pending::Cond);
            }
            Token::Colon => loop {
                match stack.pop() {
                    Some(Pending::Cond) => {
                        stack.push(Pending::Select);
                        break;
                    }
                    Some(Pending::Op(op)) => out.push(Postfix::Apply(op)),
                    Some(Pending::Select) => out.push(Postfix::Apply(Choose.into())),
                    Some(Pending::Paren) | None => return Err(ParseError::MismatchedTernary),
                }
            },
            Token::LParen => stack.push(Pending::Paren),
            Token::RParen => loop {
                match stack.pop() {
                    Some(Pending::Paren) => break,
                    Some(Pending::Op(op)) => out.push(Postfix::Apply(op)),
                    Some(Pending::Select) => out.push(Postfix::Apply(Choose.into())),
                    Some(Pending::Cond) => return Err(ParseError::MismatchedTernary),
                    None => return Err(ParseError::MismatchedParens),
                }
            },
            Token::Comma | Token::Percent => return Err(ParseError::UnexpectedToken(tok.to_string())),
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Op(op) => out.push(Postfix::Apply(op)),
            Pending::Select => out.push(Postfix::Apply(Choose.into())),
            Pending::Paren => return Err(ParseError::MismatchedParens),
            Pending::Cond => return Err(ParseError::MismatchedTernary),
        }
    }
    Ok(out)
}

// pops operators for as long as `cond` holds for the top one's precedence;
// parentheses and both halves of a ternary act as barriers
fn pop_while(stack: &mut Vec<Pending>, out: &mut Vec<Postfix>, cond: impl Fn(u8) -> bool) {
    while let Some(Pending::Op(top)) = stack.last() {
        if !cond(top.precedence()) {
            break;
        }
        out.push(Postfix::Apply(*top));
        stack.pop();
    }
}
