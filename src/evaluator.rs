use miette::{Diagnostic, SourceSpan};
use thiserror::Error;
use crate::{
    ast::{BinaryOp, Expr},
    number::Number,
};

#[derive(Diagnostic, Debug, Error, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    #[diagnostic(code(eval::division_by_zero))]
    DivisionByZero {
        #[label("this divisor evaluates to zero")]
        span: SourceSpan,
    },

    #[error("integer overflow in '{op}'")]
    #[diagnostic(
        code(eval::overflow),
        help("integers are limited to the signed 64-bit range")
    )]
    Overflow {
        op: BinaryOp,
        #[label("this operation overflows")]
        span: SourceSpan,
    },
}

/// Reduces a tree to its value, evaluating operands before their operator.
pub fn evaluate(expr: &Expr) -> Result<Number, ArithmeticError> {
    match expr {
        Expr::Number { value, .. } => Ok(Number::from(*value)),
        Expr::Binary {
            left,
            op,
            op_span,
            right,
        } => {
            let lhs = evaluate(left)?;
            let rhs = evaluate(right)?;
            apply(*op, lhs, rhs).ok_or_else(|| match op {
                BinaryOp::Divide => ArithmeticError::DivisionByZero { span: right.span() },
                _ => ArithmeticError::Overflow {
                    op: *op,
                    span: *op_span,
                },
            })
        }
    }
}

/// `None` signals division by zero for `/` and overflow for the others.
fn apply(op: BinaryOp, lhs: Number, rhs: Number) -> Option<Number> {
    match op {
        BinaryOp::Add => lhs.combine(rhs, i64::checked_add, |a, b| a + b),
        BinaryOp::Subtract => lhs.combine(rhs, i64::checked_sub, |a, b| a - b),
        BinaryOp::Multiply => lhs.combine(rhs, i64::checked_mul, |a, b| a * b),
        BinaryOp::Divide if rhs.is_zero() => None,
        BinaryOp::Divide => Some(Number::from(lhs.as_f64() / rhs.as_f64())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn eval(input: &str) -> Result<Number, ArithmeticError> {
        let expr = Parser::new(input).parse().unwrap();
        evaluate(&expr)
    }

    #[test]
    fn test_literal() {
        assert_eq!(eval("42"), Ok(Number::Integer(42)));
    }

    #[test]
    fn test_add() {
        assert_eq!(eval("3 + 5"), Ok(Number::Integer(8)));
    }

    #[test]
    fn test_minus() {
        assert_eq!(eval("10 - 2"), Ok(Number::Integer(8)));
        assert_eq!(eval("2 - 10"), Ok(Number::Integer(-8)));
    }

    #[test]
    fn test_mult() {
        assert_eq!(eval("7 * 4"), Ok(Number::Integer(28)));
    }

    #[test]
    fn test_div_is_true_division() {
        assert_eq!(eval("8 / 2"), Ok(Number::Real(4.0)));
        assert_eq!(eval("7 / 2"), Ok(Number::Real(3.5)));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4"), Ok(Number::Integer(14)));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("10 - 2 - 3"), Ok(Number::Integer(5)));
        assert_eq!(eval("16 / 4 / 2"), Ok(Number::Real(2.0)));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(eval("(2 + 3) * 4"), Ok(Number::Integer(20)));
        assert_eq!(eval("(3 + 5) * 2"), Ok(Number::Integer(16)));
    }

    #[test]
    fn test_real_propagates() {
        assert_eq!(eval("14 + 2 * 3 - 6 / 2"), Ok(Number::Real(17.0)));
        assert_eq!(eval("1 / 4 * 2"), Ok(Number::Real(0.5)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            eval("5 / 0"),
            Err(ArithmeticError::DivisionByZero { span: (4, 1).into() })
        );
    }

    #[test]
    fn test_division_by_zero_subexpression() {
        assert_eq!(
            eval("1 / (3 - 3)"),
            Err(ArithmeticError::DivisionByZero { span: (5, 5).into() })
        );
        // The divisor is real zero here.
        assert!(matches!(
            eval("1 / (0 / 7)"),
            Err(ArithmeticError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_zero_dividend_is_fine() {
        assert_eq!(eval("0 / 5"), Ok(Number::Real(0.0)));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            eval("9223372036854775807 + 1"),
            Err(ArithmeticError::Overflow {
                op: BinaryOp::Add,
                span: (20, 1).into(),
            })
        );
        assert!(matches!(
            eval("0 - 9223372036854775807 - 2"),
            Err(ArithmeticError::Overflow {
                op: BinaryOp::Subtract,
                ..
            })
        ));
        assert!(matches!(
            eval("4611686018427387904 * 2"),
            Err(ArithmeticError::Overflow {
                op: BinaryOp::Multiply,
                ..
            })
        ));
    }

    #[test]
    fn test_large_values_survive_division() {
        assert_eq!(
            eval("9223372036854775807 / 1"),
            Ok(Number::Real(9223372036854775807.0))
        );
    }

    #[test]
    fn test_longest_accepted_chain() {
        let chain = format!("1{}", "+1".repeat(crate::parser::DEFAULT_MAX_HEIGHT - 1));
        assert_eq!(
            eval(&chain),
            Ok(Number::Integer(crate::parser::DEFAULT_MAX_HEIGHT as i64))
        );
    }
}
