//! Evaluator for OneDice style dice expressions such as `4d6kh3+{STR}`,
//! short-circuiting ternaries (`1d20>10?2d6:0`), temp slots (`$t=1d6`),
//! percentile bonus dice (`b`, `p`), exploding pools (`a`, `c`) and
//! tuples (`[1d6,2d8]kh1`).
//!
//! ```
//! use onedice::{OneDice, Variables};
//!
//! let mut dice = OneDice::new("{STR}+2", Variables::from([("STR", 5)]));
//! assert_eq!(dice.roll().unwrap().value, 7);
//! ```

pub mod common;
mod error;
pub mod ops;
pub mod parse;
pub mod roll;

pub use common::{Config, Int};
pub use error::{ErrorKind, RollError};
pub use roll::{DefaultRoller, MetaItem, Outcome, RollContext, Roller, Temps, Value, Variables};

use tracing::debug;

/// A dice expression together with the state that survives between rolls:
/// the variable table and the temp slots.
pub struct OneDice<R = DefaultRoller> {
    expr: String,
    vars: Variables,
    temps: Temps,
    config: Config,
    roller: R,
}

impl OneDice {
    pub fn new(expr: impl Into<String>, vars: impl Into<Variables>) -> Self {
        Self {
            expr: expr.into(),
            vars: vars.into(),
            temps: Temps::new(),
            config: Config::default(),
            roller: rand::thread_rng(),
        }
    }
}

impl<R: Roller> OneDice<R> {
    /// Replaces the random source, e.g. with a seeded [rand::rngs::StdRng].
    pub fn with_roller<S: Roller>(self, roller: S) -> OneDice<S> {
        OneDice {
            expr: self.expr,
            vars: self.vars,
            temps: self.temps,
            config: self.config,
            roller,
        }
    }

    pub fn set_roller(&mut self, roller: R) {
        self.roller = roller;
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    pub fn temp(&self, index: Int) -> Option<Int> {
        self.temps.get(&index).copied()
    }

    /// Evaluates the expression. Temp slots and variables written by this roll stay
    /// visible to the next one.
    pub fn roll(&mut self) -> Result<Outcome, RollError> {
        let temps = std::mem::take(&mut self.temps);
        let mut ctx = RollContext::with_temps(&mut self.roller, &mut self.vars, temps, self.config);
        let value = ctx.eval_source(&self.expr);
        self.temps = ctx.into_temps();

        let outcome = Outcome::assemble(&value?, &self.temps, &self.vars);
        debug!(expr = %self.expr, detail = %outcome.detail, "rolled");
        Ok(outcome)
    }
}

/// Rolls `expr` once with no variables.
pub fn roll(expr: &str) -> Result<Outcome, RollError> {
    OneDice::new(expr, Variables::new()).roll()
}
