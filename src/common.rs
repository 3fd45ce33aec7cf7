use std::num::NonZeroU32;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// Upper bound for dice counts, face counts and operator parameters.
pub const MAX_DICE: Int = 10_000;

/// Number of individual rolls after which an exploding chain stops.
pub const MAX_ITEMS: usize = 10_000;

/// Faces used by `a` and `c` when no `m` clause is given.
pub const CHAIN_FACES: Int = 10;

pub const DEFAULT_FACES: Int = 100;

/// Knobs that affect evaluation but not the expression language itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    /// Faces rolled by a `d` that has no right operand.
    pub default_faces: Int,
}

impl Config {
    pub const fn with_default_faces(default_faces: Int) -> Self {
        Self { default_faces }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_default_faces(DEFAULT_FACES)
    }
}

/// Converts a face count to the roller's domain, rejecting anything outside `1..=MAX_DICE`.
pub(crate) fn faces(sides: Int) -> Option<NonZeroUInt> {
    if (1..=MAX_DICE).contains(&sides) {
        NonZeroUInt::new(sides as UInt)
    } else {
        None
    }
}

/// Converts a dice count, rejecting anything outside `lo..=MAX_DICE`.
pub(crate) fn count(n: Int, lo: Int) -> Option<usize> {
    if (lo..=MAX_DICE).contains(&n) {
        Some(n as usize)
    } else {
        None
    }
}
