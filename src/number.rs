/// Result of evaluating an expression.
///
/// Integer arithmetic stays exact until a division is involved, which always
/// produces a real.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(n) => n as f64,
            Number::Real(n) => n,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Integer(n) => n == 0,
            Number::Real(n) => n == 0.0,
        }
    }

    /// Combines two numbers, using `int` when both are integers and `real`
    /// otherwise. `None` means the integer operation overflowed.
    pub(crate) fn combine(
        self,
        other: Number,
        int: impl Fn(i64, i64) -> Option<i64>,
        real: impl Fn(f64, f64) -> f64,
    ) -> Option<Number> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => int(a, b).map(Number::Integer),
            (a, b) => Some(Number::Real(real(a.as_f64(), b.as_f64()))),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Integer(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Real(n)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            // Debug keeps the trailing `.0` on whole reals.
            Number::Real(n) => write!(f, "{:?}", n),
        }
    }
}
