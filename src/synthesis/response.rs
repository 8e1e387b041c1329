use std::fmt;

use crate::error::{Result, SynthesisError};
use crate::expression::Expr;
use crate::model::{Link, ModelHandle, ModelVariant};

/// Closed-form inverse link, applied to the linear predictor `η`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseFunction {
    /// `η`
    Identity,
    /// `1 / (1 + EXP(-η))`
    Logistic,
    /// `EXP(η)`
    Exp,
    /// `1 / η`
    Reciprocal,
    /// `η * η`
    Square,
    /// `1 / SQRT(η)`
    InverseSqrt,
}

impl ResponseFunction {
    /// Inverse of `link`, or `None` when it has no closed form in portable SQL.
    pub fn for_link(link: &Link) -> Option<Self> {
        match link {
            Link::Identity => Some(ResponseFunction::Identity),
            Link::Logit => Some(ResponseFunction::Logistic),
            Link::Log => Some(ResponseFunction::Exp),
            Link::Inverse => Some(ResponseFunction::Reciprocal),
            Link::Sqrt => Some(ResponseFunction::Square),
            Link::InverseSquared => Some(ResponseFunction::InverseSqrt),
            Link::Probit | Link::Cloglog | Link::Cauchit | Link::Other(_) => None,
        }
    }

    /// Wrap `eta` in this function.
    pub fn apply(self, eta: Expr) -> Expr {
        match self {
            ResponseFunction::Identity => eta,
            ResponseFunction::Logistic => Expr::div(
                Expr::number(1.0),
                Expr::add(
                    Expr::number(1.0),
                    Expr::call("EXP", vec![Expr::mul(Expr::number(-1.0), eta)]),
                ),
            ),
            ResponseFunction::Exp => Expr::call("EXP", vec![eta]),
            ResponseFunction::Reciprocal => Expr::div(Expr::number(1.0), eta),
            ResponseFunction::Square => Expr::mul(eta.clone(), eta),
            ResponseFunction::InverseSqrt => {
                Expr::div(Expr::number(1.0), Expr::call("SQRT", vec![eta]))
            }
        }
    }
}

impl fmt::Display for ResponseFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFunction::Identity => write!(f, "identity"),
            ResponseFunction::Logistic => write!(f, "logistic"),
            ResponseFunction::Exp => write!(f, "exp"),
            ResponseFunction::Reciprocal => write!(f, "reciprocal"),
            ResponseFunction::Square => write!(f, "square"),
            ResponseFunction::InverseSqrt => write!(f, "inverse_sqrt"),
        }
    }
}

/// How the linear predictor is mapped onto the response scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSpec {
    /// Built-in closed-form expression.
    ClosedForm(ResponseFunction),
    /// Caller-supplied SQL function, called with `η` as its only argument.
    Named(String),
}

impl ResponseSpec {
    /// Apply the response to `eta`.
    pub fn apply(self, eta: Expr) -> Expr {
        match self {
            ResponseSpec::ClosedForm(function) => function.apply(eta),
            ResponseSpec::Named(name) => Expr::call(name, vec![eta]),
        }
    }
}

/// Pick the response for `model`.
///
/// An override short-circuits any inspection of the model and is used
/// verbatim, with one exception: a blank name is rejected with
/// [`SynthesisError::InvalidFunctionName`] instead of being accepted
/// unconditionally, since it cannot render as a SQL call. Without one the
/// model's link decides; links with no closed form fail with
/// [`SynthesisError::UnsupportedLink`], and the caller is expected to retry
/// with an override.
pub fn resolve_response(model: &ModelHandle, override_name: Option<&str>) -> Result<ResponseSpec> {
    if let Some(name) = override_name {
        if name.trim().is_empty() {
            return Err(SynthesisError::InvalidFunctionName(name.to_string()));
        }
        return Ok(ResponseSpec::Named(name.to_string()));
    }

    if let ModelVariant::Unrecognized(class) = model.variant() {
        return Err(SynthesisError::UnsupportedModel(class.clone()));
    }

    ResponseFunction::for_link(model.link())
        .map(ResponseSpec::ClosedForm)
        .ok_or_else(|| SynthesisError::UnsupportedLink {
            link: model.link().to_string(),
        })
}
