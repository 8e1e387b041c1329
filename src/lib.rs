//! Translate fitted generalized linear models into closed-form SQL scoring expressions.
#![warn(missing_docs)]

/// Error types shared by every synthesis stage.
pub mod error;
/// Expression tree: node types, constructors, and numeric evaluation.
pub mod expression;
/// Fitted-model descriptions: variants, families, links, and coefficient-name decoding.
pub mod model;
/// SQL identifier quoting, dialects, and expression rendering.
pub mod sql;
/// Linear-predictor extraction, response resolution, and their composition.
pub mod synthesis;

pub use error::{Result, SynthesisError};
pub use expression::Expr;
pub use model::ModelHandle;
pub use sql::names::{quote_identifier, quote_identifier_with, QualifiedIdentifier};
pub use synthesis::{synthesize, synthesize_sql};
