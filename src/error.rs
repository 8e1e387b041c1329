use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Every way a synthesis or quoting call can fail.
///
/// Errors are raised where they are detected and propagate unchanged: a call
/// either returns a complete expression or fails as a whole.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Missing or malformed identifier components.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The model class is not one the extractor knows how to read.
    #[error("unsupported model class `{0}`")]
    UnsupportedModel(String),

    /// The link function has no closed-form SQL expression.
    #[error(
        "link function `{link}` has no closed-form SQL expression; \
         supply an explicit response function name"
    )]
    UnsupportedLink {
        /// Name of the offending link.
        link: String,
    },

    /// A coefficient name encodes a transformation rather than a column.
    #[error("unsupported model term `{term}`: only columns, factor levels, and their interactions are supported")]
    UnsupportedTerm {
        /// Coefficient name as stored by the model.
        term: String,
    },

    /// A coefficient is NaN or infinite.
    #[error("coefficient for `{term}` is not finite ({value})")]
    NonFiniteCoefficient {
        /// Coefficient name as stored by the model.
        term: String,
        /// Offending value.
        value: f64,
    },

    /// The response-function override cannot be rendered as a SQL call.
    #[error("invalid response function name `{0}`")]
    InvalidFunctionName(String),

    /// The model description is structurally incomplete.
    #[error("invalid model description: {0}")]
    ModelFormat(String),

    /// The model description is not valid JSON for the expected shape.
    #[error("invalid model JSON: {0}")]
    ModelJson(#[from] serde_json::Error),

    /// Rendered SQL failed to parse back as a single expression.
    #[error("rendered SQL does not parse: {0}")]
    InvalidSql(String),
}

impl SynthesisError {
    /// True when retrying with an explicit response-function override can succeed.
    pub fn needs_response_override(&self) -> bool {
        matches!(self, SynthesisError::UnsupportedLink { .. })
    }
}
