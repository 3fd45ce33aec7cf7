use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("(at position {position}): unexpected character {found:?}")]
    UnexpectedChar { position: usize, found: char },
    #[error("(at position {0}): unterminated string literal")]
    UnterminatedString(usize),
    #[error("(at position {0}): unterminated tuple literal")]
    UnterminatedTuple(usize),
    #[error("(at position {position}): integer literal {slice:?} is out of range")]
    InvalidInteger { position: usize, slice: String },
    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),
    #[error("mismatched parentheses")]
    MismatchedParens,
    #[error("'?' without a matching ':'")]
    MismatchedTernary,
}

impl ParseError {
    /// Classifies a slice the lexer could not turn into a token.
    pub(crate) fn from_slice(position: usize, slice: &str) -> Self {
        match slice.chars().next() {
            Some('"') => Self::UnterminatedString(position),
            Some('[') => Self::UnterminatedTuple(position),
            Some(c) if c.is_ascii_digit() => Self::InvalidInteger {
                position,
                slice: slice.to_owned(),
            },
            Some(found) => Self::UnexpectedChar { position, found },
            None => Self::UnexpectedToken(String::new()),
        }
    }
}
