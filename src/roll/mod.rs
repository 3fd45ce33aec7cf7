mod branch;
mod ctx;
mod eval;
mod outcome;
mod roller;
mod tuple;
mod value;
mod vars;

use crate::error::RollError;

pub type RResult<T> = Result<T, RollError>;

pub use ctx::RollContext;
pub use eval::Stack;
pub use outcome::{MetaItem, Outcome};
pub use roller::Roller;
pub use value::Value;
pub use vars::{Temps, Variables};

#[cfg(test)]
pub(crate) use roller::{SeqRoller, StepRoller};

pub type DefaultRoller = rand::prelude::ThreadRng;
