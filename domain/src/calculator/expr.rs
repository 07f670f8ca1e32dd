//! Validated expression tree and evaluation.

use super::CalcError;
use super::parser::{BinaryOp, RawNode, UnaryOp};

/// Whitelisted statistical functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFunction {
    Mean,
    Median,
    Mode,
    Stdev,
    Range,
}

impl StatFunction {
    /// Resolve a (case-insensitive) function name, including aliases.
    pub fn lookup(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "mean" | "avg" | "average" => Some(StatFunction::Mean),
            "median" => Some(StatFunction::Median),
            "mode" => Some(StatFunction::Mode),
            "stdev" | "std" => Some(StatFunction::Stdev),
            "range" => Some(StatFunction::Range),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatFunction::Mean => "mean",
            StatFunction::Median => "median",
            StatFunction::Mode => "mode",
            StatFunction::Stdev => "stdev",
            StatFunction::Range => "range",
        }
    }

    fn apply(&self, values: &[f64]) -> Result<f64, CalcError> {
        let min_len = if *self == StatFunction::Stdev { 2 } else { 1 };
        if values.len() < min_len {
            return Err(CalcError::Statistics(format!(
                "{}() requires at least {} value{}",
                self.name(),
                min_len,
                if min_len == 1 { "" } else { "s" }
            )));
        }

        let n = values.len() as f64;
        let result = match self {
            StatFunction::Mean => values.iter().sum::<f64>() / n,
            StatFunction::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            StatFunction::Mode => {
                let mut best = values[0];
                let mut best_count = 0;
                for (i, candidate) in values.iter().enumerate() {
                    if values[..i].contains(candidate) {
                        continue;
                    }
                    let count = values.iter().filter(|v| *v == candidate).count();
                    if count > best_count {
                        best = *candidate;
                        best_count = count;
                    }
                }
                best
            }
            StatFunction::Stdev => {
                let mean = values.iter().sum::<f64>() / n;
                let variance =
                    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
                variance.sqrt()
            }
            StatFunction::Range => {
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                max - min
            }
        };
        Ok(result)
    }
}

/// A statistical function argument: a scalar or a bracketed list.
#[derive(Debug, Clone, PartialEq)]
pub enum StatArg {
    Scalar(Expr),
    List(Vec<Expr>),
}

/// Closed set of evaluable nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(StatFunction, Vec<StatArg>),
}

impl Expr {
    /// Convert a raw tree, rejecting anything outside the closed node set.
    pub fn validate(raw: &RawNode) -> Result<Expr, CalcError> {
        match raw {
            RawNode::Number(value) => Ok(Expr::Number(*value)),
            RawNode::Unary { op, operand } => {
                Ok(Expr::Unary(*op, Box::new(Expr::validate(operand)?)))
            }
            RawNode::Binary { op, lhs, rhs } => Ok(Expr::Binary(
                *op,
                Box::new(Expr::validate(lhs)?),
                Box::new(Expr::validate(rhs)?),
            )),
            RawNode::Call { func, args } => {
                let function = match func.as_ref() {
                    RawNode::Name(name) => StatFunction::lookup(name).ok_or_else(|| {
                        CalcError::DisallowedExpression(format!(
                            "function '{name}' is not allowed (use mean, median, mode, stdev or range)"
                        ))
                    })?,
                    _ => {
                        return Err(CalcError::DisallowedExpression(
                            "only calls to plain function names are allowed".to_string(),
                        ));
                    }
                };
                let args = args
                    .iter()
                    .map(|arg| match arg {
                        RawNode::List(items) => items
                            .iter()
                            .map(Expr::validate_scalar)
                            .collect::<Result<Vec<_>, _>>()
                            .map(StatArg::List),
                        other => Expr::validate(other).map(StatArg::Scalar),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::Call(function, args))
            }
            RawNode::List(_) => Err(CalcError::DisallowedExpression(
                "lists are only allowed as function arguments".to_string(),
            )),
            RawNode::Name(name) => Err(CalcError::DisallowedExpression(format!(
                "name '{name}' is not allowed"
            ))),
            RawNode::Str(_) => Err(CalcError::DisallowedExpression(
                "string literals are not allowed".to_string(),
            )),
            RawNode::Attribute { attr, .. } => Err(CalcError::DisallowedExpression(format!(
                "attribute access '.{attr}' is not allowed"
            ))),
        }
    }

    fn validate_scalar(raw: &RawNode) -> Result<Expr, CalcError> {
        match raw {
            RawNode::List(_) => Err(CalcError::DisallowedExpression(
                "nested lists are not allowed".to_string(),
            )),
            other => Expr::validate(other),
        }
    }

    pub fn eval(&self) -> Result<f64, CalcError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Unary(UnaryOp::Neg, operand) => Ok(-operand.eval()?),
            Expr::Unary(UnaryOp::Pos, operand) => operand.eval(),
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval()?;
                let r = rhs.eval()?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div if r == 0.0 => Err(CalcError::DivisionByZero),
                    BinaryOp::Div => Ok(l / r),
                }
            }
            Expr::Call(function, args) => {
                let mut values = Vec::new();
                for arg in args {
                    match arg {
                        StatArg::Scalar(expr) => values.push(expr.eval()?),
                        StatArg::List(items) => {
                            for item in items {
                                values.push(item.eval()?);
                            }
                        }
                    }
                }
                function.apply(&values)
            }
        }
    }
}
