use std::fmt::{self, Write};

use sqlparser::parser::Parser;
use sqlparser::tokenizer::Token;

use super::dialect::SqlDialect;
use super::names::{is_plain_identifier, quote_component, QualifiedIdentifier};
use crate::error::{Result, SynthesisError};
use crate::expression::Expr;

/// How column references are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnStyle {
    /// Unquoted when the name is a plain lowercase identifier, quoted otherwise.
    #[default]
    Bare,
    /// Always quoted.
    Quoted,
    /// Quoted and prefixed with a table path, e.g. `"s"."t"."x1"`.
    Qualified(QualifiedIdentifier),
}

/// Options for turning an [`Expr`] into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Dialect whose identifier quoting is used.
    pub dialect: SqlDialect,
    /// Column reference style.
    pub columns: ColumnStyle,
}

impl RenderOptions {
    /// Options for `dialect` with bare column names.
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            columns: ColumnStyle::Bare,
        }
    }

    /// Replace the column style.
    pub fn with_columns(mut self, columns: ColumnStyle) -> Self {
        self.columns = columns;
        self
    }
}

/// Render `expr` as a SQL scalar expression.
///
/// Plain inorder walk: binary nodes become `(left OP right)` and calls become
/// `name(arg, ...)`. Comparisons become
/// `(CASE WHEN left OP right THEN 1.0 WHEN NOT (left OP right) THEN 0.0 END)`
/// so they can take part in arithmetic while a NULL operand still yields NULL.
pub fn render(expr: &Expr, options: &RenderOptions) -> String {
    Rendered { expr, options }.to_string()
}

/// Render with default options (ANSI, bare columns).
pub fn to_sql(expr: &Expr) -> String {
    render(expr, &RenderOptions::default())
}

/// SQL text for a numeric literal.
///
/// Integral values keep a `.0` suffix so databases never fall back to integer
/// division. Non-finite values have no SQL literal and render as `NULL`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "NULL".to_string();
    }
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Single-quoted SQL string literal for `dialect`.
///
/// Quotes are doubled, except in `BigQuery` which only accepts `\'`.
/// Dialects that read backslash escapes inside literals get `\\` as well.
pub fn quote_text(value: &str, dialect: SqlDialect) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' if dialect.backslash_escapes() => out.push_str("\\\\"),
            '\'' if dialect == SqlDialect::BigQuery => out.push_str("\\'"),
            '\'' => out.push_str("''"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Check that `sql` parses as exactly one expression in `dialect`.
pub fn validate_sql(sql: &str, dialect: SqlDialect) -> Result<()> {
    let parser_dialect = dialect.parser_dialect();
    let invalid = |e: sqlparser::parser::ParserError| SynthesisError::InvalidSql(e.to_string());

    let mut parser = Parser::new(parser_dialect.as_ref())
        .try_with_sql(sql)
        .map_err(invalid)?;
    parser.parse_expr().map_err(invalid)?;

    let trailing = parser.peek_token();
    if trailing.token != Token::EOF {
        return Err(SynthesisError::InvalidSql(format!(
            "unexpected trailing token `{}`",
            trailing.token
        )));
    }
    Ok(())
}

struct Rendered<'a> {
    expr: &'a Expr,
    options: &'a RenderOptions,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.expr, self.options)
    }
}

fn write_expr(out: &mut impl Write, expr: &Expr, options: &RenderOptions) -> fmt::Result {
    match expr {
        Expr::Column { name } => write_column(out, name, options),
        Expr::Number { value } => out.write_str(&format_number(*value)),
        Expr::Text { value } => out.write_str(&quote_text(value, options.dialect)),
        Expr::Binary { op, left, right } => {
            out.write_char('(')?;
            write_expr(out, left, options)?;
            write!(out, " {op} ")?;
            write_expr(out, right, options)?;
            out.write_char(')')
        }
        Expr::Compare { op, left, right } => {
            let mut condition = String::new();
            write_expr(&mut condition, left, options)?;
            write!(condition, " {op} ")?;
            write_expr(&mut condition, right, options)?;
            write!(
                out,
                "(CASE WHEN {condition} THEN 1.0 WHEN NOT ({condition}) THEN 0.0 END)"
            )
        }
        Expr::Call { function, args } => {
            write!(out, "{function}(")?;
            for (idx, arg) in args.iter().enumerate() {
                if idx > 0 {
                    out.write_str(", ")?;
                }
                write_expr(out, arg, options)?;
            }
            out.write_char(')')
        }
    }
}

fn write_column(out: &mut impl Write, name: &str, options: &RenderOptions) -> fmt::Result {
    let style = options.dialect.quote_style();
    match &options.columns {
        ColumnStyle::Bare if is_plain_identifier(name) => out.write_str(name),
        ColumnStyle::Bare | ColumnStyle::Quoted => out.write_str(&quote_component(name, style)),
        ColumnStyle::Qualified(table) => {
            write!(out, "{}.{}", table.quoted(style), quote_component(name, style))
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_sql(self))
    }
}
