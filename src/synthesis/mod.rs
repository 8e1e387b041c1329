/// Linear-predictor extraction with variant-specific coefficient compensation.
pub mod linear_predictor;
/// Link/response resolution.
pub mod response;

pub use linear_predictor::{effective_coefficients, extract_linear_predictor, EffectiveCoefficient};
pub use response::{resolve_response, ResponseFunction, ResponseSpec};

use crate::error::Result;
use crate::expression::Expr;
use crate::model::ModelHandle;
use crate::sql::render::{render, RenderOptions};

/// Synthesize the model's prediction as a single expression tree.
///
/// The linear predictor is built first, then wrapped in the response: a call
/// to `override_name` when one is given, otherwise the closed-form inverse
/// of the model's link.
///
/// ```
/// use glm2sql::model::{Family, Link};
/// use glm2sql::{synthesize, ModelHandle};
///
/// let model = ModelHandle::glm(Family::Binomial, Link::Logit)
///     .with_coefficient("(Intercept)", -1.0)
///     .with_coefficient("x", 0.5);
/// let expr = synthesize(&model, Some("probit")).unwrap();
/// assert_eq!(expr.to_string(), "probit((-1.0 + (0.5 * x)))");
/// ```
pub fn synthesize(model: &ModelHandle, override_name: Option<&str>) -> Result<Expr> {
    log::debug!(
        "synthesizing {} model ({} / {}) with {} coefficients",
        model.variant().class_name(),
        model.family(),
        model.link(),
        model.coefficients().len()
    );

    let eta = extract_linear_predictor(model)?;
    let response = resolve_response(model, override_name)?;
    match &response {
        ResponseSpec::ClosedForm(function) => log::debug!("applying closed-form {function} response"),
        ResponseSpec::Named(name) => log::debug!("applying named response `{name}`"),
    }
    Ok(response.apply(eta))
}

/// [`synthesize`], rendered to SQL text with `options`.
pub fn synthesize_sql(
    model: &ModelHandle,
    override_name: Option<&str>,
    options: &RenderOptions,
) -> Result<String> {
    Ok(render(&synthesize(model, override_name)?, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesisError;
    use crate::model::{Family, Link};

    #[test]
    fn identity_link_has_no_wrapper() {
        let model = ModelHandle::glm(Family::Gaussian, Link::Identity)
            .with_coefficient("(Intercept)", 1.0)
            .with_coefficient("x1", 2.0);
        assert_eq!(
            synthesize(&model, None).unwrap(),
            extract_linear_predictor(&model).unwrap()
        );
    }

    #[test]
    fn extraction_errors_take_precedence_over_link_errors() {
        let model = ModelHandle::glm(Family::Binomial, Link::Probit)
            .with_coefficient("I(x^2)", 1.0);
        assert!(matches!(
            synthesize(&model, None),
            Err(SynthesisError::UnsupportedTerm { .. })
        ));
    }

    #[test]
    fn poisson_renders_exp() {
        let model = ModelHandle::glm(Family::Poisson, Link::Log)
            .with_coefficient("(Intercept)", 0.5)
            .with_coefficient("x1", 0.25);
        assert_eq!(
            synthesize_sql(&model, None, &RenderOptions::default()).unwrap(),
            "EXP((0.5 + (0.25 * x1)))"
        );
    }
}
