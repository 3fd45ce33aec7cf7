use crate::parse::ParseError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RollError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("not enough operands on the stack")]
    StackUnderflow,
    #[error("invalid left operand for '{0}'")]
    InvalidLeft(&'static str),
    #[error("invalid right operand for '{0}'")]
    InvalidRight(&'static str),
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("expression evaluated to {0} values instead of one")]
    Unbalanced(usize),
}

/// Coarse classification of [RollError]s.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Parse,
    StackUnderflow,
    InvalidLeft,
    InvalidRight,
    /// The expression could not be turned into a single value.
    Generate,
}

impl RollError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::StackUnderflow => ErrorKind::StackUnderflow,
            Self::InvalidLeft(_) => ErrorKind::InvalidLeft,
            Self::InvalidRight(_) => ErrorKind::InvalidRight,
            Self::UnknownOperator(_) | Self::Unbalanced(_) => ErrorKind::Generate,
        }
    }
}
