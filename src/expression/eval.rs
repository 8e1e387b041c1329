use std::collections::HashMap;

use thiserror::Error;

use super::node::{BinaryOp, CompareOp, Expr};

/// A column value substituted during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric column value.
    Number(f64),
    /// Text column value (factor columns).
    Text(String),
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Column name → value bindings for one row.
pub type Row = HashMap<String, Value>;

/// Failure while evaluating an expression against a row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The row has no value for a referenced column.
    #[error("row has no value for column `{0}`")]
    MissingColumn(String),
    /// A text value reached an arithmetic position.
    #[error("expected a number, found text `{0}`")]
    NotANumber(String),
    /// The two sides of a comparison cannot be compared.
    #[error("cannot compare {left:?} with {right:?}")]
    Incomparable {
        /// Left operand value.
        left: Value,
        /// Right operand value.
        right: Value,
    },
    /// The function is not one the evaluator implements.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    /// The function was called with the wrong number of arguments.
    #[error("function `{function}` expects {expected} argument(s), got {got}")]
    Arity {
        /// Function name.
        function: String,
        /// Expected argument count.
        expected: usize,
        /// Actual argument count.
        got: usize,
    },
}

impl Expr {
    /// Evaluate the expression numerically with column values taken from `row`.
    ///
    /// Comparisons evaluate to `1.0` or `0.0`, matching how the SQL renderer
    /// emits them. Known functions are `EXP`, `LN`, `SQRT`, `ABS` and `POWER`,
    /// matched case-insensitively.
    pub fn evaluate(&self, row: &Row) -> Result<f64, EvalError> {
        match self.evaluate_value(row)? {
            Value::Number(value) => Ok(value),
            Value::Text(text) => Err(EvalError::NotANumber(text)),
        }
    }

    fn evaluate_value(&self, row: &Row) -> Result<Value, EvalError> {
        match self {
            Expr::Column { name } => row
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::MissingColumn(name.clone())),
            Expr::Number { value } => Ok(Value::Number(*value)),
            Expr::Text { value } => Ok(Value::Text(value.clone())),
            Expr::Binary { op, left, right } => {
                let l = left.evaluate(row)?;
                let r = right.evaluate(row)?;
                let out = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                };
                Ok(Value::Number(out))
            }
            Expr::Compare { op, left, right } => {
                let l = left.evaluate_value(row)?;
                let r = right.evaluate_value(row)?;
                let holds = compare(*op, &l, &r)?;
                Ok(Value::Number(if holds { 1.0 } else { 0.0 }))
            }
            Expr::Call { function, args } => {
                let values = args
                    .iter()
                    .map(|arg| arg.evaluate(row))
                    .collect::<Result<Vec<_>, _>>()?;
                call(function, &values).map(Value::Number)
            }
        }
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    let ordering = match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.partial_cmp(r),
        (Value::Text(l), Value::Text(r)) => Some(l.cmp(r)),
        // Numeric-looking factor levels compared against numeric columns.
        (Value::Number(l), Value::Text(r)) => {
            r.trim().parse::<f64>().ok().and_then(|r| l.partial_cmp(&r))
        }
        (Value::Text(l), Value::Number(r)) => {
            l.trim().parse::<f64>().ok().and_then(|l| l.partial_cmp(r))
        }
    };
    let Some(ordering) = ordering else {
        return Err(EvalError::Incomparable {
            left: left.clone(),
            right: right.clone(),
        });
    };

    Ok(match op {
        CompareOp::Eq => ordering.is_eq(),
        CompareOp::NotEq => ordering.is_ne(),
        CompareOp::Lt => ordering.is_lt(),
        CompareOp::LtEq => ordering.is_le(),
        CompareOp::Gt => ordering.is_gt(),
        CompareOp::GtEq => ordering.is_ge(),
    })
}

fn call(function: &str, args: &[f64]) -> Result<f64, EvalError> {
    let arity = |expected: usize| EvalError::Arity {
        function: function.to_string(),
        expected,
        got: args.len(),
    };
    match (function.to_ascii_lowercase().as_str(), args) {
        ("exp", [x]) => Ok(x.exp()),
        ("ln", [x]) => Ok(x.ln()),
        ("sqrt", [x]) => Ok(x.sqrt()),
        ("abs", [x]) => Ok(x.abs()),
        ("power", [base, exponent]) => Ok(base.powf(*exponent)),
        ("exp" | "ln" | "sqrt" | "abs", _) => Err(arity(1)),
        ("power", _) => Err(arity(2)),
        _ => Err(EvalError::UnknownFunction(function.to_string())),
    }
}
