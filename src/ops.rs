use crate::common::*;
use crate::error::RollError;
use crate::roll::{RResult, RollContext, Roller, Stack, Value};
use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[enum_dispatch::enum_dispatch(Operate)]
pub enum Operator {
    Arithmetic(Arithmetic),
    Compare(Compare),
    Bitwise(Bitwise),
    Roll(Roll),
    Select(Select),
    Clamp(Clamp),
    Chain(Chain),
    Percentile(Percentile),
    Fudge(Fudge),
    Position(Position),
    Repeat(Repeat),
    Assign(Assign),
    Choose(Choose),
}

impl Operator {
    pub fn from_word(w: &str) -> Option<Self> {
        Some(match w {
            "d" => Roll.into(),
            "f" | "df" => Fudge.into(),
            "a" => Chain::new(ChainKind::Additive, false).into(),
            "c" => Chain::new(ChainKind::Condensing, false).into(),
            "b" => Percentile::Bonus.into(),
            "p" => Percentile::Penalty.into(),
            "k" => Select::Highest.into(),
            "q" => Select::Lowest.into(),
            "kh" => Select::KeepHighest.into(),
            "kl" => Select::KeepLowest.into(),
            "dh" => Select::DropHighest.into(),
            "dl" => Select::DropLowest.into(),
            "min" => Clamp::Min.into(),
            "max" => Clamp::Max.into(),
            "sp" => Position::Pick.into(),
            "tp" => Position::Remove.into(),
            "lp" => Repeat.into(),
            _ => return None,
        })
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        Some(match c {
            '+' => Arithmetic::Add.into(),
            '-' => Arithmetic::Sub.into(),
            '*' => Arithmetic::Mul.into(),
            '/' => Arithmetic::Div.into(),
            '^' => Arithmetic::Pow.into(),
            '<' => Compare::Less.into(),
            '>' => Compare::Greater.into(),
            '&' => Bitwise::And.into(),
            '|' => Bitwise::Or.into(),
            '=' => Assign.into(),
            _ => return None,
        })
    }

    /// Whether `self` binds looser than (or, for left-associative operators, as loose as) `top`,
    /// i.e. whether `top` has to be applied first.
    pub(crate) fn yields_to(&self, top_precedence: u8) -> bool {
        if self.right_assoc() {
            self.precedence() < top_precedence
        } else {
            self.precedence() <= top_precedence
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[enum_dispatch::enum_dispatch]
pub trait Operate {
    fn symbol(&self) -> &'static str;

    fn precedence(&self) -> u8;

    fn right_assoc(&self) -> bool {
        false
    }

    /// Operands to insert when the written expression leaves them out, as `(left, right)`.
    fn implied_operands(&self) -> Option<(Int, Option<Int>)> {
        None
    }

    /// Pops this operator's operands off `stack` and computes the result.
    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value>;
}

macro_rules! operator_family {
    ($(#[$attr:meta])* $name:ident { $($(#[$vattr:meta])* $variant:ident => $sym:literal),+ $(,)? } @ $prec:literal) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub enum $name {
            $($(#[$vattr])* $variant),+
        }

        impl $name {
            const fn symbol_of(&self) -> &'static str {
                match self {
                    $(Self::$variant => $sym),+
                }
            }

            const fn family_precedence() -> u8 {
                $prec
            }
        }
    };
    ($(#[$attr:meta])* $name:ident => $sym:literal @ $prec:literal) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name;

        impl $name {
            const fn symbol_of(&self) -> &'static str {
                $sym
            }

            const fn family_precedence() -> u8 {
                $prec
            }
        }
    };
}

operator_family!(Arithmetic { Add => "+", Sub => "-", Mul => "*", Div => "/", Pow => "^" } @ 3);
operator_family!(Compare { Less => "<", Greater => ">" } @ 1);
operator_family!(Bitwise { And => "&", Or => "|" } @ 2);
operator_family!(
    /// `XdY`: roll X dice with Y faces.
    Roll => "d" @ 7
);
operator_family!(
    Select {
        /// `k`: keep the n highest.
        Highest => "k",
        /// `q`: keep the n lowest.
        Lowest => "q",
        KeepHighest => "kh",
        KeepLowest => "kl",
        DropHighest => "dh",
        DropLowest => "dl",
    } @ 6
);
operator_family!(Clamp { Min => "min", Max => "max" } @ 6);
operator_family!(
    /// Call of Cthulhu style percentile roll with bonus or penalty dice.
    Percentile { Bonus => "b", Penalty => "p" } @ 7
);
operator_family!(
    /// `XfY`: X fudge dice, each -1, 0 or +1.
    Fudge => "f" @ 7
);
operator_family!(
    Position {
        /// `sp`: the element at a one-based (negative counts from the end) position.
        Pick => "sp",
        /// `tp`: everything except the element at that position.
        Remove => "tp",
    } @ 6
);
operator_family!(Repeat => "lp" @ 6);
operator_family!(
    /// `$tN=V`: store V in temp slot N.
    Assign => "=" @ 9
);
operator_family!(
    /// Second half of `c ? a : b`, once both branches sit on the stack.
    Choose => ":" @ 8
);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ChainKind {
    /// `a`: counts successes; every success rolls again.
    Additive,
    /// `c`: sums each round's highest die; every success rolls again.
    Condensing,
}

/// Exploding dice pools, `XaY` / `XcY`, optionally with `mZ` faces.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Chain {
    pub kind: ChainKind,
    /// Faces were given explicitly and sit on the stack above the threshold.
    pub custom_faces: bool,
}

impl Chain {
    pub const fn new(kind: ChainKind, custom_faces: bool) -> Self {
        Self { kind, custom_faces }
    }

    pub const fn with_faces(self) -> Self {
        Self::new(self.kind, true)
    }
}

fn invalid_left<T>(op: &impl Operate) -> RResult<T> {
    Err(RollError::InvalidLeft(op.symbol()))
}

fn invalid_right<T>(op: &impl Operate) -> RResult<T> {
    Err(RollError::InvalidRight(op.symbol()))
}

// two's complement wraparound, like the machine integers of most dice bots
fn wrapping_pow(mut base: Int, mut exp: Int) -> Int {
    let mut acc: Int = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}

impl Operate for Arithmetic {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Sub => Self::family_precedence(),
            Self::Mul | Self::Div => 4,
            Self::Pow => 5,
        }
    }

    fn right_assoc(&self) -> bool {
        matches!(self, Self::Pow)
    }

    fn operate<R: Roller>(&self, _: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let (a, b) = (l.number(), r.number());
        let x = match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Mul => a.wrapping_mul(b),
            Self::Div if b == 0 => return invalid_right(self),
            Self::Div => a.wrapping_div(b),
            Self::Pow if a == 0 && b == 0 => return invalid_left(self),
            Self::Pow if b < 0 => return invalid_right(self),
            Self::Pow => wrapping_pow(a, b),
        };
        Ok(Value::Scalar(x))
    }
}

impl Operate for Compare {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn operate<R: Roller>(&self, _: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let holds = match self {
            Self::Less => l.number() < r.number(),
            Self::Greater => l.number() > r.number(),
        };
        Ok(Value::Scalar(holds as Int))
    }
}

impl Operate for Bitwise {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn operate<R: Roller>(&self, _: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        Ok(Value::Scalar(match self {
            Self::And => l.number() & r.number(),
            Self::Or => l.number() | r.number(),
        }))
    }
}

impl Operate for Roll {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn implied_operands(&self) -> Option<(Int, Option<Int>)> {
        Some((1, None))
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let times = match count(l.last_or_number(), 1) {
            Some(n) => n,
            None => return invalid_left(self),
        };
        let sides = match faces(r.last_or_number()) {
            Some(s) => s,
            None => return invalid_right(self),
        };
        Ok(Value::list(ctx.roll_dice(times, sides)))
    }
}

impl Operate for Select {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let n = r.number();
        if n <= 0 {
            return invalid_right(self);
        }
        let mut items = match ctx.resolve_shared(&l) {
            Some(items) => items,
            None => return invalid_left(self),
        };
        let lenient = matches!(self, Self::Highest | Self::Lowest);
        if items.is_empty() && !lenient {
            return invalid_left(self);
        }

        // stable, so equal dice keep their roll order
        match self {
            Self::Highest | Self::KeepHighest | Self::DropHighest => items.sort_by(|a, b| b.cmp(a)),
            Self::Lowest | Self::KeepLowest | Self::DropLowest => items.sort(),
        }
        let n = (n as usize).min(items.len());
        let kept = match self {
            Self::DropHighest | Self::DropLowest => items.split_off(n),
            _ => {
                items.truncate(n);
                items
            }
        };
        Ok(Value::pool(Value::sum(&kept), kept))
    }
}

impl Operate for Clamp {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let bound = r.number();
        if bound <= 0 {
            return invalid_right(self);
        }
        let items = match ctx.resolve_isolated(&l) {
            Some(items) => items,
            None => return invalid_left(self),
        };
        let clamped = items
            .into_iter()
            .map(|x| match self {
                Self::Min => x.max(bound),
                Self::Max => x.min(bound),
            })
            .collect();
        Ok(Value::list(clamped))
    }
}

impl Operate for Chain {
    fn symbol(&self) -> &'static str {
        match (self.kind, self.custom_faces) {
            (ChainKind::Additive, false) => "a",
            (ChainKind::Additive, true) => "a_m",
            (ChainKind::Condensing, false) => "c",
            (ChainKind::Condensing, true) => "c_m",
        }
    }

    fn precedence(&self) -> u8 {
        7
    }

    fn implied_operands(&self) -> Option<(Int, Option<Int>)> {
        if self.custom_faces {
            None
        } else {
            Some((1, None))
        }
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let sides = if self.custom_faces {
            Some(stack.pop()?.number())
        } else {
            None
        };
        let (l, r) = stack.pop_pair()?;

        let mut pending = match count(l.number(), 0) {
            Some(n) => n,
            None => return invalid_left(self),
        };
        let threshold = r.number();
        if threshold <= 0 || threshold > MAX_DICE {
            return invalid_right(self);
        }
        let sides = match faces(sides.unwrap_or(CHAIN_FACES)) {
            Some(s) => s,
            None => return invalid_right(self),
        };

        let mut total: Int = 0;
        let mut rolls = Vec::new();
        while pending > 0 {
            let round = ctx.roll_dice(pending, sides);
            pending = round.iter().filter(|&&x| x >= threshold).count();
            total += match self.kind {
                ChainKind::Additive => pending as Int,
                ChainKind::Condensing => round.iter().copied().max().unwrap_or(0),
            };
            rolls.extend(round);
            if rolls.len() > MAX_ITEMS {
                break;
            }
        }
        Ok(Value::pool(total, rolls))
    }
}

impl Operate for Percentile {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn implied_operands(&self) -> Option<(Int, Option<Int>)> {
        Some((1, Some(1)))
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let extra = match count(r.number(), 0) {
            Some(n) => n,
            None => return invalid_right(self),
        };
        if l.number() > MAX_DICE {
            return invalid_left(self);
        }

        let tens = ctx.roll_digit();
        let units = ctx.roll_digit();
        let extras: Vec<Int> = (0..extra).map(|_| ctx.roll_digit()).collect();
        let replaced = match self {
            Self::Bonus => extras.iter().copied().min(),
            Self::Penalty => extras.iter().copied().max(),
        };
        let result = match (tens, units) {
            (0, 0) => 100,
            _ => match replaced.unwrap_or(tens) * 10 + units {
                0 => 100,
                x => x,
            },
        };

        let mut digits = Vec::with_capacity(extra + 2);
        digits.push(tens);
        digits.push(units);
        digits.extend(extras);
        Ok(Value::List {
            total: result,
            items: digits,
        })
    }
}

impl Operate for Fudge {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn implied_operands(&self) -> Option<(Int, Option<Int>)> {
        Some((4, Some(3)))
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let sides = r.number();
        if sides <= 1 || sides > MAX_DICE {
            return invalid_right(self);
        }
        let times = match count(l.number(), 1) {
            Some(n) => n,
            None => return invalid_left(self),
        };
        let rolls = (0..times).map(|_| ctx.roll_fudge()).collect();
        Ok(Value::list(rolls))
    }
}

impl Operate for Position {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let index = r.number();

        if !l.is_tuple() {
            if index != 1 && index != -1 {
                return invalid_left(self);
            }
            let x = l.number();
            return Ok(match self {
                Self::Pick => Value::list(vec![x]),
                Self::Remove => Value::Scalar(0),
            });
        }

        let mut items = match ctx.resolve_isolated(&l) {
            Some(items) => items,
            None => return invalid_left(self),
        };
        let len = items.len() as Int;
        let pos = match index {
            0 => return invalid_right(self),
            i if i > 0 => i - 1,
            i => len + i,
        };
        if pos < 0 || pos >= len {
            return invalid_right(self);
        }

        let picked = items.remove(pos as usize);
        Ok(match self {
            Self::Pick => Value::list(vec![picked]),
            Self::Remove => Value::pool(Value::sum(&items), items),
        })
    }
}

impl Operate for Repeat {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let times = match count(r.number(), 1) {
            Some(n) => n,
            None => return invalid_right(self),
        };

        if let Value::Strings(templates) = &l {
            let mut counter = 0;
            let mut expanded = Vec::with_capacity(templates.len() * times);
            for _ in 0..times {
                for template in templates.iter() {
                    counter += 1;
                    expanded.push(template.replace("{i}", &counter.to_string()));
                }
            }
            return Ok(Value::strings(expanded));
        }

        let items = match ctx.resolve_shared(&l) {
            Some(items) => items,
            None => return invalid_left(self),
        };
        let repeated: Vec<Int> = items
            .iter()
            .copied()
            .cycle()
            .take(items.len() * times)
            .collect();
        Ok(Value::pool(Value::sum(&repeated), repeated))
    }
}

impl Operate for Assign {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn right_assoc(&self) -> bool {
        true
    }

    fn operate<R: Roller>(&self, ctx: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let (l, r) = stack.pop_pair()?;
        let index = match l {
            Value::Temp { index, .. } => index,
            _ => return invalid_left(self),
        };
        let x = r.number();
        ctx.assign_temp(index, x);
        Ok(Value::Scalar(x))
    }
}

impl Operate for Choose {
    fn symbol(&self) -> &'static str {
        self.symbol_of()
    }

    fn precedence(&self) -> u8 {
        Self::family_precedence()
    }

    fn operate<R: Roller>(&self, _: &mut RollContext<'_, R>, stack: &mut Stack) -> RResult<Value> {
        let otherwise = stack.pop()?;
        let (cond, then) = stack.pop_pair()?;
        Ok(if cond.number() != 0 { then } else { otherwise })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::*;
    use crate::roll::{SeqRoller, StepRoller, Variables};

    fn apply<R: Roller>(op: impl Into<Operator>, operands: Vec<Value>, roller: &mut R) -> RResult<Value> {
        let mut vars = Variables::new();
        let mut ctx = RollContext::new(roller, &mut vars, Config::default());
        let mut stack = Stack::from(operands);
        let op: Operator = op.into();
        op.operate(&mut ctx, &mut stack)
    }

    fn check(op: impl Into<Operator>, operands: Vec<Value>, expected: Value) {
        assert_eq!(apply(op, operands, &mut mock_roller()).unwrap(), expected);
    }

    fn check_err(op: impl Into<Operator>, operands: Vec<Value>, expected: RollError) {
        assert_eq!(apply(op, operands, &mut mock_roller()).unwrap_err(), expected);
    }

    fn int(x: Int) -> Value {
        Value::Scalar(x)
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Operator::from_word("df"), Some(Fudge.into()));
        assert_eq!(Operator::from_word("m"), None);
        assert_eq!(Operator::from_symbol('%'), None);
        assert_eq!(Operator::from(Chain::new(ChainKind::Condensing, false).with_faces()).to_string(), "c_m");
    }

    #[test]
    fn test_precedence_order() {
        let ladder: [Operator; 9] = [
            Compare::Less.into(),
            Bitwise::Or.into(),
            Arithmetic::Sub.into(),
            Arithmetic::Div.into(),
            Arithmetic::Pow.into(),
            Select::KeepHighest.into(),
            Roll.into(),
            Choose.into(),
            Assign.into(),
        ];
        for (expected, op) in (1..).zip(ladder) {
            assert_eq!(op.precedence(), expected, "{}", op);
        }
        assert!(Operator::from(Arithmetic::Pow).right_assoc());
        assert!(!Operator::from(Arithmetic::Sub).right_assoc());
    }

    #[test]
    fn test_arithmetic() {
        check(Arithmetic::Sub, vec![int(2), int(5)], int(-3));
        check(Arithmetic::Div, vec![int(-7), int(2)], int(-3));
        check(Arithmetic::Pow, vec![int(2), int(10)], int(1024));
        check(Arithmetic::Pow, vec![int(0), int(3)], int(0));
        check_err(Arithmetic::Div, vec![int(1), int(0)], RollError::InvalidRight("/"));
        check_err(Arithmetic::Pow, vec![int(0), int(0)], RollError::InvalidLeft("^"));
        check_err(Arithmetic::Pow, vec![int(2), int(-1)], RollError::InvalidRight("^"));
        check_err(Arithmetic::Add, vec![int(1)], RollError::StackUnderflow);
    }

    #[test]
    fn test_compare_bitwise() {
        check(Compare::Less, vec![int(1), int(2)], int(1));
        check(Compare::Greater, vec![int(1), int(2)], int(0));
        check(Bitwise::And, vec![int(6), int(3)], int(2));
        check(Bitwise::Or, vec![int(6), int(3)], int(7));
    }

    #[test]
    fn test_roll() {
        check(Roll, vec![int(3), int(6)], Value::list(vec![1, 2, 3]));
        // a pool on either side contributes its last die
        check(Roll, vec![Value::list(vec![5, 2]), Value::list(vec![1, 4])], Value::list(vec![1, 2]));
        check_err(Roll, vec![int(0), int(6)], RollError::InvalidLeft("d"));
        check_err(Roll, vec![int(10_001), int(6)], RollError::InvalidLeft("d"));
        check_err(Roll, vec![int(1), int(0)], RollError::InvalidRight("d"));
        check_err(Roll, vec![int(1), int(10_001)], RollError::InvalidRight("d"));
    }

    #[test]
    fn test_select() {
        let pool = || Value::list(vec![3, 1, 4, 1, 5]);
        check(Select::KeepHighest, vec![pool(), int(2)], Value::list(vec![5, 4]));
        check(Select::KeepLowest, vec![pool(), int(2)], Value::list(vec![1, 1]));
        check(Select::DropHighest, vec![pool(), int(2)], Value::list(vec![3, 1, 1]));
        check(Select::DropLowest, vec![pool(), int(2)], Value::list(vec![3, 4, 5]));
        check(Select::KeepHighest, vec![pool(), int(9)], Value::list(vec![5, 4, 3, 1, 1]));
        check(Select::DropLowest, vec![pool(), int(9)], int(0));
        check(Select::Highest, vec![pool(), int(1)], Value::list(vec![5]));
        check(Select::Lowest, vec![pool(), int(1)], Value::list(vec![1]));
        check(Select::KeepHighest, vec![int(5), int(3)], Value::list(vec![5]));
        check(Select::Highest, vec![Value::list(vec![]), int(3)], int(0));
        check_err(Select::KeepHighest, vec![pool(), int(0)], RollError::InvalidRight("kh"));
        check_err(Select::DropHighest, vec![Value::list(vec![]), int(1)], RollError::InvalidLeft("dh"));
    }

    #[test]
    fn test_clamp() {
        check(Clamp::Max, vec![Value::list(vec![1, 4, 7]), int(5)], Value::list(vec![1, 4, 5]));
        check(Clamp::Min, vec![Value::list(vec![1, 4, 7]), int(5)], Value::list(vec![5, 5, 7]));
        check(Clamp::Max, vec![int(9), int(3)], Value::list(vec![3]));
        check_err(Clamp::Min, vec![int(9), int(0)], RollError::InvalidRight("min"));
    }

    #[test]
    fn test_chain_additive() {
        let chain = Chain::new(ChainKind::Additive, false);
        let mut roller = StepRoller::new(nz(5), 1);
        let v = apply(chain, vec![int(3), int(5)], &mut roller).unwrap();
        assert_eq!(v, Value::List { total: 6, items: vec![5, 6, 7, 8, 9, 10, 1, 2, 3] });

        check(chain, vec![int(3), int(5)], Value::List { total: 0, items: vec![1, 2, 3] });
        check(chain, vec![int(0), int(5)], int(0));
        check_err(chain, vec![int(-1), int(5)], RollError::InvalidLeft("a"));
        check_err(chain, vec![int(1), int(0)], RollError::InvalidRight("a"));
    }

    #[test]
    fn test_chain_condensing() {
        let chain = Chain::new(ChainKind::Condensing, false);
        let mut roller = StepRoller::new(nz(5), 1);
        let v = apply(chain, vec![int(3), int(5)], &mut roller).unwrap();
        assert_eq!(v, Value::List { total: 7 + 10 + 3, items: vec![5, 6, 7, 8, 9, 10, 1, 2, 3] });
    }

    #[test]
    fn test_chain_custom_faces() {
        let chain = Chain::new(ChainKind::Additive, true);
        let mut roller = StepRoller::new(nz(5), 1);
        let v = apply(chain, vec![int(3), int(5), int(6)], &mut roller).unwrap();
        assert_eq!(v, Value::List { total: 2, items: vec![5, 6, 1, 2, 3] });
        check_err(chain, vec![int(3), int(5), int(0)], RollError::InvalidRight("a_m"));

        let chain = Chain::new(ChainKind::Condensing, true);
        let mut roller = StepRoller::new(nz(5), 1);
        // rounds [5, 6, 1] then [2, 3]
        let v = apply(chain, vec![int(3), int(5), int(6)], &mut roller).unwrap();
        assert_eq!(v, Value::List { total: 6 + 3, items: vec![5, 6, 1, 2, 3] });
        check_err(chain, vec![int(3), int(5), int(10_001)], RollError::InvalidRight("c_m"));
    }

    #[test]
    fn test_chain_cap() {
        let v = apply(Chain::new(ChainKind::Additive, false), vec![int(1), int(1)], &mut mock_roller()).unwrap();
        assert_eq!(v.number(), MAX_ITEMS as Int + 1);
        assert_eq!(v.items().map(<[Int]>::len), Some(MAX_ITEMS + 1));
    }

    #[test]
    fn test_percentile() {
        // digits roll 0, 1, 2, 3, 4
        check(Percentile::Bonus, vec![int(1), int(3)], Value::List { total: 21, items: vec![0, 1, 2, 3, 4] });
        check(Percentile::Penalty, vec![int(1), int(3)], Value::List { total: 41, items: vec![0, 1, 2, 3, 4] });
        check(Percentile::Bonus, vec![int(1), int(0)], Value::List { total: 1, items: vec![0, 1] });

        let mut zeros = StepRoller::new(nz(1), 10);
        let v = apply(Percentile::Bonus, vec![int(1), int(2)], &mut zeros).unwrap();
        assert_eq!(v.number(), 100);

        let mut roller = SeqRoller::new(vec![6, 1, 1]);
        let v = apply(Percentile::Bonus, vec![int(1), int(1)], &mut roller).unwrap();
        assert_eq!(v, Value::List { total: 100, items: vec![5, 0, 0] });

        // a natural 00 stands whatever the bonus die shows
        let mut roller = SeqRoller::new(vec![1, 1, 6]);
        let v = apply(Percentile::Bonus, vec![int(1), int(1)], &mut roller).unwrap();
        assert_eq!(v, Value::List { total: 100, items: vec![0, 0, 5] });

        check_err(Percentile::Penalty, vec![int(1), int(-1)], RollError::InvalidRight("p"));
        check_err(Percentile::Penalty, vec![int(10_001), int(1)], RollError::InvalidLeft("p"));
    }

    #[test]
    fn test_fudge() {
        check(Fudge, vec![int(5), int(3)], Value::List { total: -1, items: vec![-1, 0, 1, -1, 0] });
        check_err(Fudge, vec![int(5), int(1)], RollError::InvalidRight("f"));
        check_err(Fudge, vec![int(0), int(3)], RollError::InvalidLeft("f"));
    }

    #[test]
    fn test_position() {
        let pool = || Value::list(vec![3, 4, 5]);
        check(Position::Pick, vec![pool(), int(2)], Value::list(vec![4]));
        check(Position::Pick, vec![pool(), int(-1)], Value::list(vec![5]));
        check(Position::Remove, vec![pool(), int(2)], Value::list(vec![3, 5]));
        check(Position::Remove, vec![Value::list(vec![7]), int(1)], int(0));
        check(Position::Pick, vec![int(5), int(1)], Value::list(vec![5]));
        check(Position::Remove, vec![int(5), int(-1)], int(0));
        check_err(Position::Pick, vec![int(5), int(2)], RollError::InvalidLeft("sp"));
        check_err(Position::Pick, vec![pool(), int(0)], RollError::InvalidRight("sp"));
        check_err(Position::Remove, vec![pool(), int(4)], RollError::InvalidRight("tp"));
        check_err(Position::Remove, vec![pool(), int(-4)], RollError::InvalidRight("tp"));
    }

    #[test]
    fn test_repeat() {
        check(Repeat, vec![Value::list(vec![1, 2]), int(3)], Value::list(vec![1, 2, 1, 2, 1, 2]));
        check(
            Repeat,
            vec![Value::strings(vec!["a{i}".into(), "b{i}".into()]), int(2)],
            Value::strings(vec!["a1".into(), "b2".into(), "a3".into(), "b4".into()]),
        );
        check_err(Repeat, vec![int(1), int(0)], RollError::InvalidRight("lp"));
    }

    #[test]
    fn test_assign() {
        let mut roller = mock_roller();
        let mut vars = Variables::new();
        let mut ctx = RollContext::new(&mut roller, &mut vars, Config::default());
        let mut stack = Stack::from(vec![Value::Temp { index: 2, value: 0 }, int(7)]);
        assert_eq!(Operator::from(Assign).operate(&mut ctx, &mut stack), Ok(int(7)));
        assert_eq!(ctx.read_temp(2), 7);
        assert_eq!(vars.get("t2"), Some(7));

        check_err(Assign, vec![int(1), int(2)], RollError::InvalidLeft("="));
    }

    #[test]
    fn test_choose() {
        check(Choose, vec![int(1), int(2), int(3)], int(2));
        check(Choose, vec![int(0), int(2), int(3)], int(3));
        check_err(Choose, vec![int(2), int(3)], RollError::StackUnderflow);
    }
}
