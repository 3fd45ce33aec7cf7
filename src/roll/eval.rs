use super::{ctx::RollContext, roller::Roller, tuple, value::Value, RResult};
use crate::error::RollError;
use crate::ops::Operate;
use crate::parse::{Postfix, Token};
use tracing::trace;

/// Operand stack of the postfix evaluator.
#[derive(Debug, Default)]
pub struct Stack(Vec<Value>);

impl Stack {
    pub(crate) fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    pub(crate) fn pop(&mut self) -> RResult<Value> {
        self.0.pop().ok_or(RollError::StackUnderflow)
    }

    /// Pops a binary operator's operands, returned as `(left, right)`.
    pub(crate) fn pop_pair(&mut self) -> RResult<(Value, Value)> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }
}

impl From<Vec<Value>> for Stack {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<R: Roller> RollContext<'_, R> {
    pub(crate) fn eval_postfix(&mut self, program: Vec<Postfix>) -> RResult<Value> {
        let mut stack = Stack::default();
        for step in program {
            let value = match step {
                Postfix::Operand(tok) => self.operand(tok)?,
                Postfix::Apply(op) => {
                    trace!(op = op.symbol(), "applying");
                    op.operate(self, &mut stack)?
                }
            };
            stack.push(value);
        }

        let Stack(mut values) = stack;
        match values.len() {
            1 => values.pop().ok_or(RollError::StackUnderflow),
            n => Err(RollError::Unbalanced(n)),
        }
    }

    fn operand(&mut self, tok: Token) -> RResult<Value> {
        Ok(match tok {
            Token::Int(x) => Value::Scalar(x),
            Token::Str(s) => Value::strings(vec![s]),
            Token::Tuple(inner) => tuple::parse_literal(&inner),
            Token::Temp(index) => Value::Temp {
                index,
                value: self.read_temp(index),
            },
            Token::Ident(name) => return Err(RollError::UnknownOperator(name)),
            other => return Err(RollError::UnknownOperator(other.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{test_utils::mock_roller, Config};
    use crate::parse::{preprocess, to_postfix, tokenize};
    use crate::roll::Variables;

    fn run(s: &str) -> RResult<Value> {
        let mut roller = mock_roller();
        let mut vars = Variables::new();
        let mut ctx = RollContext::new(&mut roller, &mut vars, Config::default());
        let postfix = to_postfix(preprocess(tokenize(s)?, 100))?;
        ctx.eval_postfix(postfix)
    }

    fn check(s: &str, expected: Value) {
        assert_eq!(run(s).unwrap(), expected);
    }

    fn check_err(s: &str, expected: RollError) {
        assert_eq!(run(s).unwrap_err(), expected);
    }

    #[test]
    fn test_eval_arithmetic() {
        check("1+2*3", Value::Scalar(7));
        check("2^3^2", Value::Scalar(512));
        check("7/2-1", Value::Scalar(2));
        check("1+2<4", Value::Scalar(1));
        check("1|2&3", Value::Scalar(3));
    }

    #[test]
    fn test_eval_dice() {
        check("2d6+1", Value::Scalar(4));
        check("4d6kh3", Value::list(vec![4, 3, 2]));
        check("2d6d6", Value::list(vec![3, 4]));
    }

    #[test]
    fn test_eval_temp() {
        check("$t=7+$t", Value::Scalar(14));
        check("$t", Value::Temp { index: 1, value: 0 });
    }

    #[test]
    fn test_eval_ternary_in_postfix() {
        check("0?2:3+4", Value::Scalar(7));
        check("1?2?3:4:5", Value::Scalar(3));
    }

    #[test]
    fn test_eval_errors() {
        check_err("x", RollError::UnknownOperator("x".into()));
        check_err("1 2", RollError::Unbalanced(2));
        check_err("", RollError::Unbalanced(0));
        check_err("+", RollError::StackUnderflow);
        check_err("1=2", RollError::InvalidLeft("="));
    }
}
