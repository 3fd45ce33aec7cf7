use crate::common::{Int, NonZeroUInt, UInt};
use rand::{
    distributions::{DistIter, Distribution, Uniform},
    Rng,
};

const DIGIT_FACES: NonZeroUInt = match NonZeroUInt::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

const FUDGE_FACES: NonZeroUInt = match NonZeroUInt::new(3) {
    Some(n) => n,
    None => unreachable!(),
};

/// Source of dice results. Every [rand::Rng] is one.
pub trait Roller {
    type RollIter<'a>: Iterator<Item = UInt> + 'a
    where
        Self: 'a;

    /// A uniform result in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;

    fn roll_iter(&mut self, num: usize, sides: NonZeroUInt) -> Self::RollIter<'_>;

    /// A percentile digit in `0..=9`.
    fn roll_digit(&mut self) -> Int {
        Int::from(self.roll(DIGIT_FACES)) - 1
    }

    /// A fudge die: -1, 0 or +1.
    fn roll_fudge(&mut self) -> Int {
        Int::from(self.roll(FUDGE_FACES)) - 2
    }
}

impl<R: Rng> Roller for R {
    type RollIter<'a> = std::iter::Take<DistIter<Uniform<UInt>, &'a mut Self, UInt>>
    where
        Self: 'a;

    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }

    fn roll_iter(&mut self, num: usize, sides: NonZeroUInt) -> Self::RollIter<'_> {
        Uniform::new_inclusive(1, sides.get())
            .sample_iter(self)
            .take(num)
    }
}

#[cfg(test)]
pub(crate) use scripted::{SeqRoller, StepRoller};
