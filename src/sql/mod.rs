/// Target dialects and their identifier quoting conventions.
pub mod dialect;
/// Table-name qualification and identifier quoting.
pub mod names;
/// Rendering of expression trees as SQL text, and validation with `sqlparser`.
pub mod render;

pub use dialect::{QuoteStyle, SqlDialect};
pub use names::{quote_identifier, quote_identifier_with, QualifiedIdentifier};
pub use render::{render, to_sql, validate_sql, ColumnStyle, RenderOptions};
