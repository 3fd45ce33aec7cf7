//! Splits a token stream into the parts that must be evaluated on their own before
//! postfix conversion: parenthesised groups and ternary branches. Only the selected
//! branch of a ternary is ever evaluated, so its dice and temp writes never happen
//! for the other one.

use super::{ctx::RollContext, roller::Roller, value::Value, RResult};
use crate::parse::{preprocess, to_postfix, ParseError, Token};
use tracing::trace;

impl<R: Roller> RollContext<'_, R> {
    pub(crate) fn eval_tokens(&mut self, mut tokens: Vec<Token>) -> RResult<Value> {
        while let Some((open, close)) = next_group(&tokens)? {
            let inner = tokens[open + 1..close].to_vec();
            let folded = self.eval_tokens(inner)?.number();
            trace!(folded, "group");
            let rest = tokens.split_off(close + 1);
            tokens.truncate(open);
            tokens.push(Token::Int(folded));
            tokens.extend(rest);
        }

        let tokens = strip_outer_parens(tokens);

        if let Some((question, colon)) = find_ternary(&tokens)? {
            let cond = self.eval_tokens(tokens[..question].to_vec())?.number();
            trace!(cond, "ternary");
            let branch = if cond != 0 {
                &tokens[question + 1..colon]
            } else {
                &tokens[colon + 1..]
            };
            return self.eval_tokens(branch.to_vec());
        }

        let tokens = preprocess(tokens, self.config().default_faces);
        let program = to_postfix(tokens)?;
        trace!(program = %program.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "), "postfix");
        self.eval_postfix(program)
    }
}

// The first `)` whose `(` does not open a ternary branch, as `(open, close)`.
fn next_group(tokens: &[Token]) -> Result<Option<(usize, usize)>, ParseError> {
    for (close, tok) in tokens.iter().enumerate() {
        if *tok != Token::RParen {
            continue;
        }
        let open = matching_open(&tokens[..=close]).ok_or(ParseError::MismatchedParens)?;
        let opens_branch = open > 0 && matches!(tokens[open - 1], Token::Question | Token::Colon);
        if !opens_branch {
            return Ok(Some((open, close)));
        }
    }
    Ok(None)
}

// index of the `(` matching the `)` that ends `tokens`
fn matching_open(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().rev() {
        match tok {
            Token::RParen => depth += 1,
            Token::LParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_outer_parens(mut tokens: Vec<Token>) -> Vec<Token> {
    while tokens.len() >= 2 && tokens[0] == Token::LParen && wraps_all(&tokens) {
        tokens.pop();
        tokens.remove(0);
    }
    tokens
}

// whether the `(` at index 0 is closed by the last token
fn wraps_all(tokens: &[Token]) -> bool {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ => continue,
        }
        if depth == 0 {
            return i == tokens.len() - 1;
        }
    }
    false
}

// The first top-level `?` and the `:` that closes it, as `(question, colon)`.
fn find_ternary(tokens: &[Token]) -> Result<Option<(usize, usize)>, ParseError> {
    let mut depth = 0i32;
    let question = tokens.iter().position(|tok| {
        match tok {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            Token::Question => return depth == 0,
            _ => {}
        }
        false
    });
    let question = match question {
        Some(q) => q,
        None => return Ok(None),
    };

    let mut depth = 0i32;
    let mut open = 1;
    for (i, tok) in tokens.iter().enumerate().skip(question + 1) {
        match tok {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            Token::Question if depth == 0 => open += 1,
            Token::Colon if depth == 0 => {
                open -= 1;
                if open == 0 {
                    return Ok(Some((question, i)));
                }
            }
            _ => {}
        }
    }
    Err(ParseError::MismatchedTernary)
}
