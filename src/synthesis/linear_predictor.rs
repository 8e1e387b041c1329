use crate::error::{Result, SynthesisError};
use crate::expression::Expr;
use crate::model::terms::{decode_term, is_intercept, INTERCEPT};
use crate::model::{ModelHandle, ModelVariant};

/// A coefficient after variant-specific compensation, ready to be emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveCoefficient {
    /// Coefficient name; [`INTERCEPT`] for the intercept.
    pub term: String,
    /// Value on the scale of a plain GLM fitted to the original response.
    pub value: f64,
}

impl EffectiveCoefficient {
    /// True for the intercept.
    pub fn is_intercept(&self) -> bool {
        is_intercept(&self.term)
    }
}

/// Coefficients the linear predictor is built from, intercept first.
///
/// * aliased (`NA`) coefficients are skipped;
/// * `glmnet` coefficients that are exactly zero are dropped;
/// * `glmboost` coefficients are scaled by 2 when the response was recoded
///   to ±1, and the boosting offset is folded into the intercept, giving
///   `scale * (b0 + offset)`. Without an intercept coefficient the intercept
///   is `scale * offset`.
pub fn effective_coefficients(model: &ModelHandle) -> Result<Vec<EffectiveCoefficient>> {
    let (scale, offset) = match model.variant() {
        ModelVariant::Lm | ModelVariant::Glm | ModelVariant::Glmnet => (1.0, None),
        ModelVariant::Glmboost {
            offset,
            binary_recoding,
        } => (if *binary_recoding { 2.0 } else { 1.0 }, Some(*offset)),
        ModelVariant::Unrecognized(class) => {
            return Err(SynthesisError::UnsupportedModel(class.clone()))
        }
    };
    let sparse = matches!(model.variant(), ModelVariant::Glmnet);

    let mut intercept: Option<f64> = None;
    let mut terms = Vec::with_capacity(model.coefficients().len());

    for coefficient in model.coefficients() {
        let Some(estimate) = coefficient.estimate else {
            log::warn!(
                "skipping aliased coefficient `{}` with no estimate",
                coefficient.term
            );
            continue;
        };
        if !estimate.is_finite() {
            return Err(SynthesisError::NonFiniteCoefficient {
                term: coefficient.term.clone(),
                value: estimate,
            });
        }

        if is_intercept(&coefficient.term) {
            *intercept.get_or_insert(0.0) += estimate;
        } else if sparse && estimate == 0.0 {
            continue;
        } else {
            terms.push(EffectiveCoefficient {
                term: coefficient.term.clone(),
                value: scale * estimate,
            });
        }
    }

    let intercept = match (intercept, offset) {
        (Some(b0), Some(offset)) => Some(scale * (b0 + offset)),
        (None, Some(offset)) => Some(scale * offset),
        (b0, None) => b0,
    };

    Ok(intercept
        .map(|value| EffectiveCoefficient {
            term: INTERCEPT.to_string(),
            value,
        })
        .into_iter()
        .chain(terms)
        .collect())
}

/// Build `intercept + b1 * f1 + b2 * f2 + ...` over the model's input columns.
///
/// Terms keep the order the model stores them and are summed left to right.
/// A model with no usable coefficients yields the literal `0.0`.
pub fn extract_linear_predictor(model: &ModelHandle) -> Result<Expr> {
    let mut summands = Vec::new();
    for coefficient in effective_coefficients(model)? {
        if coefficient.is_intercept() {
            log::trace!("intercept {}", coefficient.value);
            summands.push(Expr::number(coefficient.value));
            continue;
        }
        let term = decode_term(&coefficient.term, model.factor_levels())?;
        log::trace!(
            "term `{}` -> {:?} * {}",
            term.name,
            term.components,
            coefficient.value
        );
        summands.push(Expr::mul(Expr::number(coefficient.value), term.to_expr()));
    }

    Ok(Expr::sum(summands).unwrap_or_else(|| Expr::number(0.0)))
}
