mod error;
mod lexer;
mod postfix;
mod preprocess;
mod subst;

pub use error::ParseError;
pub use lexer::{tokenize, Token};
pub use postfix::{to_postfix, Postfix};
pub use preprocess::preprocess;
pub use subst::substitute;
