/// Numeric evaluation of expression trees against a row of column values.
pub mod eval;
/// Expression node types and constructors.
pub mod node;

pub use eval::{EvalError, Row, Value};
pub use node::{BinaryOp, CompareOp, Expr};
