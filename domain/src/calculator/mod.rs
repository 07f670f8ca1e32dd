//! Sandboxed arithmetic and statistics evaluator.
//!
//! Input goes through three stages:
//!
//! 1. [`lexer`] turns text into tokens. Operators outside `+ - * /` are
//!    kept as [`Token::Disallowed`] so they can be reported precisely.
//! 2. [`parser`] builds a permissive [`RawNode`] tree. It can represent
//!    names, strings, attribute access and calls to anything, so that such
//!    input is *recognized* rather than merely failing to parse.
//! 3. [`expr`] validates the raw tree into the closed [`Expr`] node set and
//!    evaluates it. Validation runs to completion before evaluation starts;
//!    a rejected expression never has any part of it evaluated.
//!
//! [`Token::Disallowed`]: lexer::Token::Disallowed
//! [`RawNode`]: parser::RawNode

pub mod expr;
pub mod lexer;
pub mod parser;

pub use expr::{Expr, StatArg, StatFunction};

use thiserror::Error;

/// Evaluation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("disallowed expression: {0}")]
    DisallowedExpression(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),

    #[error("{0}")]
    Statistics(String),
}

/// Parse, validate and evaluate `input`.
pub fn calculate(input: &str) -> Result<f64, CalcError> {
    compile(input)?.eval()
}

/// Parse and validate without evaluating.
pub fn compile(input: &str) -> Result<Expr, CalcError> {
    let tokens = lexer::tokenize(input)?;
    let raw = parser::parse(&tokens)?;
    Expr::validate(&raw)
}

/// Render a result the way it is shown to the model: whole numbers without
/// a fractional part, everything else at full precision.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_precedence() {
        assert_eq!(calculate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(calculate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(calculate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(calculate("100 / 10 / 2").unwrap(), 5.0);
    }

    #[test]
    fn test_unary_and_decimals() {
        assert_eq!(calculate("-5 + 2").unwrap(), -3.0);
        assert_eq!(calculate("-(2 + 3)").unwrap(), -5.0);
        assert_eq!(calculate("+.5 * 4").unwrap(), 2.0);
        assert_eq!(calculate("1.5e2").unwrap(), 150.0);
    }

    #[test]
    fn test_statistics() {
        assert_eq!(calculate("mean([1, 2, 3])").unwrap(), 2.0);
        assert_eq!(calculate("avg(1, 2, 3, 4)").unwrap(), 2.5);
        assert_eq!(calculate("median([5, 1, 3])").unwrap(), 3.0);
        assert_eq!(calculate("median([4, 1, 3, 2])").unwrap(), 2.5);
        assert_eq!(calculate("mode([2, 7, 7, 2, 7])").unwrap(), 7.0);
        assert_eq!(calculate("range([3, 9, 4])").unwrap(), 6.0);
        assert_eq!(calculate("MEAN([10, 20]) * 2").unwrap(), 30.0);
    }

    #[test]
    fn test_sample_stdev() {
        let value = calculate("stdev([2, 4, 4, 4, 5, 5, 7, 9])").unwrap();
        assert!((value - 2.138_089_935).abs() < 1e-6);
        assert_eq!(calculate("std([1, 3])").unwrap(), 2.0_f64.sqrt());
    }

    #[test]
    fn test_mode_returns_first_most_common() {
        assert_eq!(calculate("mode([3, 1, 1, 3])").unwrap(), 3.0);
    }

    #[test]
    fn test_list_arguments_are_flattened() {
        assert_eq!(calculate("mean([1, 2], 3, [4 + 2])").unwrap(), 3.0);
    }

    #[test]
    fn test_import_is_disallowed() {
        assert!(matches!(
            calculate("__import__('os')"),
            Err(CalcError::DisallowedExpression(_))
        ));
    }

    #[test]
    fn test_disallowed_constructs() {
        for input in [
            "open('x').read()",
            "os.system",
            "x + 1",
            "2 ** 10",
            "7 % 3",
            "7 // 2",
            "a = 1",
            "1 < 2",
            "[1, 2, 3]",
            "[1, 2] + 1",
            "lambda: 1",
            "mean([x for x in [1, 2]])",
            "sum([1, 2])",
            "'abc'",
            "mean([1, 2])[0]",
        ] {
            assert!(
                matches!(calculate(input), Err(CalcError::DisallowedExpression(_))),
                "expected {input:?} to be disallowed, got {:?}",
                calculate(input)
            );
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(calculate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(calculate("5 / (2 - 2)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_invalid_syntax() {
        for input in ["(1 + 2", "1 +", "", "2 3", "mean(1, 2", "1..2"] {
            assert!(
                matches!(calculate(input), Err(CalcError::InvalidSyntax(_))),
                "expected {input:?} to be invalid syntax, got {:?}",
                calculate(input)
            );
        }
    }

    #[test]
    fn test_statistics_errors() {
        assert!(matches!(calculate("mean()"), Err(CalcError::Statistics(_))));
        assert!(matches!(calculate("stdev([5])"), Err(CalcError::Statistics(_))));
        assert!(matches!(calculate("median([])"), Err(CalcError::Statistics(_))));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_long_sum_is_an_error_on_a_small_stack() {
        // Same stack size as a tokio worker thread
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let long = calculate(&vec!["1"; 5_000].join("+"));
                let short = calculate(&vec!["1"; 400].join("+"));
                (long, short)
            })
            .unwrap();
        let (long, short) = handle.join().unwrap();
        assert!(matches!(long, Err(CalcError::InvalidSyntax(_))));
        assert_eq!(short.unwrap(), 400.0);
    }
}
