//! Token rewriting that runs right before postfix conversion: fills in operands the
//! notation allows to be left out and folds `XaYmZ` into a single three-operand operator.

use super::lexer::Token;
use crate::common::Int;
use crate::ops::{Operate, Operator};

pub fn preprocess(tokens: Vec<Token>, default_faces: Int) -> Vec<Token> {
    let tokens = insert_implied(tokens);
    let tokens = fold_chain_faces(tokens);
    insert_default_faces(tokens, default_faces)
}

// true when nothing after this point can serve as a right operand
fn ends_operand(next: Option<&Token>) -> bool {
    match next {
        None => true,
        Some(t) => t.is_operator() || matches!(t, Token::RParen | Token::Colon),
    }
}

fn insert_implied(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() + 4);
    let mut iter = tokens.into_iter().peekable();
    while let Some(tok) = iter.next() {
        let implied = tok.as_op().and_then(|op| op.implied_operands());
        let (left, right) = match implied {
            Some(operands) => operands,
            None => {
                out.push(tok);
                continue;
            }
        };

        let needs_left = match out.last() {
            None => true,
            Some(t) => t.is_operator() || matches!(t, Token::LParen | Token::Colon),
        };
        if needs_left {
            out.push(Token::Int(left));
        }
        out.push(tok);
        if let Some(right) = right {
            if ends_operand(iter.peek()) {
                out.push(Token::Int(right));
            }
        }
    }
    out
}

fn fold_chain_faces(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let [left, Token::Op(Operator::Chain(chain)), threshold @ Token::Int(_), Token::Ident(m), faces @ Token::Int(_), ..] =
            &tokens[i..]
        {
            if m == "m" && !chain.custom_faces {
                out.extend([
                    left.clone(),
                    threshold.clone(),
                    faces.clone(),
                    Token::Op(chain.with_faces().into()),
                ]);
                i += 5;
                continue;
            }
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

fn insert_default_faces(tokens: Vec<Token>, default_faces: Int) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len() + 2);
    let mut iter = tokens.into_iter().peekable();
    while let Some(tok) = iter.next() {
        if !matches!(tok, Token::Op(Operator::Roll(_))) {
            out.push(tok);
            continue;
        }

        let faces = if iter.next_if_eq(&Token::Percent).is_some() {
            Some(100)
        } else if ends_operand(iter.peek()) {
            Some(default_faces)
        } else {
            None
        };
        if faces.is_some() && out.is_empty() {
            out.push(Token::Int(1));
        }
        out.push(tok);
        out.extend(faces.map(Token::Int));
    }
    out
}
