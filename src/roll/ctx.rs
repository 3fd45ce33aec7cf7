use super::{
    roller::Roller,
    value::Value,
    vars::{Temps, Variables},
    RResult,
};
use crate::common::*;
use crate::parse::{substitute, tokenize};
use tracing::debug;

/// Everything one evaluation reads and writes: the dice, the variable table and the
/// temp slots. Nested evaluations borrow the same roller.
pub struct RollContext<'a, R> {
    roller: &'a mut R,
    vars: &'a mut Variables,
    temps: Temps,
    config: Config,
}

impl<'a, R: Roller> RollContext<'a, R> {
    pub fn new(roller: &'a mut R, vars: &'a mut Variables, config: Config) -> Self {
        Self::with_temps(roller, vars, Temps::new(), config)
    }

    pub fn with_temps(roller: &'a mut R, vars: &'a mut Variables, temps: Temps, config: Config) -> Self {
        Self {
            roller,
            vars,
            temps,
            config,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn into_temps(self) -> Temps {
        self.temps
    }

    /// Runs the whole pipeline on `src`: lower-casing, `{NAME}` substitution,
    /// lexing and evaluation.
    pub fn eval_source(&mut self, src: &str) -> RResult<Value> {
        let lowered = src.to_lowercase();
        let substituted = substitute(&lowered, self.vars);
        debug!(source = %substituted, "evaluating");
        let tokens = tokenize(&substituted)?;
        self.eval_tokens(tokens)
    }

    /// Evaluates `src` with a fresh temp store. Variable writes, including temp
    /// mirrors, land in the caller's table.
    pub(crate) fn eval_nested_shared(&mut self, src: &str) -> RResult<Value> {
        RollContext::new(&mut *self.roller, &mut *self.vars, self.config).eval_source(src)
    }

    /// Evaluates `src` with a fresh temp store against a copy of the variable table,
    /// so nothing it writes is visible afterwards.
    pub(crate) fn eval_nested_isolated(&mut self, src: &str) -> RResult<Value> {
        let mut snapshot = self.vars.clone();
        RollContext::new(&mut *self.roller, &mut snapshot, self.config).eval_source(src)
    }

    pub(crate) fn roll_dice(&mut self, num: usize, sides: NonZeroUInt) -> Vec<Int> {
        self.roller.roll_iter(num, sides).map(Int::from).collect()
    }

    pub(crate) fn roll_digit(&mut self) -> Int {
        self.roller.roll_digit()
    }

    pub(crate) fn roll_fudge(&mut self) -> Int {
        self.roller.roll_fudge()
    }

    /// The live temp slot, then its `T<N>` mirror, then 0.
    pub(crate) fn read_temp(&self, index: Int) -> Int {
        self.temps
            .get(&index)
            .copied()
            .or_else(|| self.vars.get(&Variables::temp_key(index)))
            .unwrap_or(0)
    }

    pub(crate) fn assign_temp(&mut self, index: Int, value: Int) {
        self.temps.insert(index, value);
        self.vars.insert(&Variables::temp_key(index), value);
    }

    #[cfg(test)]
    pub(crate) fn vars(&self) -> &Variables {
        &*self.vars
    }
}
