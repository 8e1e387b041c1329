use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic operator of a [`Expr::Binary`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// SQL spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison operator of a [`Expr::Compare`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl CompareOp {
    /// SQL spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A node of a scalar SQL expression tree.
///
/// Every node owns its children, so a tree never shares subtrees and cannot
/// contain cycles. A tree built from these variants renders to SQL by a plain
/// inorder walk (see [`crate::sql::render`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    /// Reference to an input column by its original name.
    Column {
        /// Column name as it appears in the model's training data.
        name: String,
    },
    /// Numeric literal.
    Number {
        /// Literal value; always finite in synthesized trees.
        value: f64,
    },
    /// Text literal, used as the right-hand side of factor-level comparisons.
    Text {
        /// Unescaped literal value.
        value: String,
    },
    /// Arithmetic on two operands.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Comparison used as a numeric indicator: 1 when it holds, 0 otherwise.
    Compare {
        /// Operator.
        op: CompareOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Call of a named SQL function.
    Call {
        /// Function name, emitted verbatim.
        function: String,
        /// Positional arguments.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Column reference.
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column { name: name.into() }
    }

    /// Numeric literal.
    pub fn number(value: f64) -> Self {
        Expr::Number { value }
    }

    /// Text literal.
    pub fn text(value: impl Into<String>) -> Self {
        Expr::Text {
            value: value.into(),
        }
    }

    /// Generic binary arithmetic node.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left + right`
    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Add, left, right)
    }

    /// `left - right`
    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Sub, left, right)
    }

    /// `left * right`
    pub fn mul(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Mul, left, right)
    }

    /// `left / right`
    pub fn div(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Div, left, right)
    }

    /// Generic comparison node.
    pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
        Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left = right` indicator.
    pub fn equals(left: Expr, right: Expr) -> Self {
        Expr::compare(CompareOp::Eq, left, right)
    }

    /// Call of `function` with the given arguments.
    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            function: function.into(),
            args,
        }
    }

    /// Left-nested sum of `terms`, or `None` when there are no terms.
    pub fn sum<I>(terms: I) -> Option<Expr>
    where
        I: IntoIterator<Item = Expr>,
    {
        terms.into_iter().reduce(Expr::add)
    }

    /// Left-nested product of `factors`, or `None` when there are no factors.
    pub fn product<I>(factors: I) -> Option<Expr>
    where
        I: IntoIterator<Item = Expr>,
    {
        factors.into_iter().reduce(Expr::mul)
    }

    /// Column names referenced by the tree, in first-seen order.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Column { name } => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expr::Number { .. } | Expr::Text { .. } => {}
            Expr::Binary { left, right, .. } | Expr::Compare { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_columns(out);
                }
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Column { .. } | Expr::Number { .. } | Expr::Text { .. } => 1,
            Expr::Binary { left, right, .. } | Expr::Compare { left, right, .. } => {
                1 + left.node_count() + right.node_count()
            }
            Expr::Call { args, .. } => 1 + args.iter().map(Expr::node_count).sum::<usize>(),
        }
    }
}
