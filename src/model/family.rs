use serde::{Deserialize, Serialize};
use std::fmt;

/// Error distribution family a model was fitted with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Family {
    /// Normal errors.
    Gaussian,
    /// Binary or proportion response.
    Binomial,
    /// Binomial with an estimated dispersion.
    QuasiBinomial,
    /// Count response.
    Poisson,
    /// Poisson with an estimated dispersion.
    QuasiPoisson,
    /// Positive continuous response.
    Gamma,
    /// Inverse Gaussian response.
    InverseGaussian,
    /// Any family this crate has no vocabulary for, kept verbatim.
    Other(String),
}

impl Family {
    /// The family's canonical link, when it has one.
    pub fn canonical_link(&self) -> Option<Link> {
        match self {
            Family::Gaussian => Some(Link::Identity),
            Family::Binomial | Family::QuasiBinomial => Some(Link::Logit),
            Family::Poisson | Family::QuasiPoisson => Some(Link::Log),
            Family::Gamma => Some(Link::Inverse),
            Family::InverseGaussian => Some(Link::InverseSquared),
            Family::Other(_) => None,
        }
    }

    /// True for families with a two-class response.
    pub fn is_binomial(&self) -> bool {
        matches!(self, Family::Binomial | Family::QuasiBinomial)
    }
}

impl From<&str> for Family {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "gaussian" | "normal" => Family::Gaussian,
            "binomial" => Family::Binomial,
            "quasibinomial" => Family::QuasiBinomial,
            "poisson" => Family::Poisson,
            "quasipoisson" => Family::QuasiPoisson,
            "gamma" => Family::Gamma,
            "inverse.gaussian" | "inverse_gaussian" => Family::InverseGaussian,
            _ => Family::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for Family {
    fn from(value: String) -> Self {
        Family::from(value.as_str())
    }
}

impl From<Family> for String {
    fn from(value: Family) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Gaussian => write!(f, "gaussian"),
            Family::Binomial => write!(f, "binomial"),
            Family::QuasiBinomial => write!(f, "quasibinomial"),
            Family::Poisson => write!(f, "poisson"),
            Family::QuasiPoisson => write!(f, "quasipoisson"),
            Family::Gamma => write!(f, "gamma"),
            Family::InverseGaussian => write!(f, "inverse.gaussian"),
            Family::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Link function connecting the linear predictor to the mean response.
///
/// Names follow R's `family()$link` spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Link {
    /// `η = μ`
    Identity,
    /// `η = log(μ / (1 - μ))`
    Logit,
    /// `η = log(μ)`
    Log,
    /// `η = 1 / μ`
    Inverse,
    /// `η = sqrt(μ)`
    Sqrt,
    /// `η = 1 / μ²`
    InverseSquared,
    /// `η = Φ⁻¹(μ)`
    Probit,
    /// `η = log(-log(1 - μ))`
    Cloglog,
    /// `η = tan(π (μ - 1/2))`
    Cauchit,
    /// Any link this crate has no vocabulary for, kept verbatim.
    Other(String),
}

impl From<&str> for Link {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "identity" => Link::Identity,
            "logit" | "logistic" => Link::Logit,
            "log" => Link::Log,
            "inverse" => Link::Inverse,
            "sqrt" => Link::Sqrt,
            "1/mu^2" | "inverse_squared" => Link::InverseSquared,
            "probit" => Link::Probit,
            "cloglog" => Link::Cloglog,
            "cauchit" => Link::Cauchit,
            _ => Link::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for Link {
    fn from(value: String) -> Self {
        Link::from(value.as_str())
    }
}

impl From<Link> for String {
    fn from(value: Link) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Identity => write!(f, "identity"),
            Link::Logit => write!(f, "logit"),
            Link::Log => write!(f, "log"),
            Link::Inverse => write!(f, "inverse"),
            Link::Sqrt => write!(f, "sqrt"),
            Link::InverseSquared => write!(f, "1/mu^2"),
            Link::Probit => write!(f, "probit"),
            Link::Cloglog => write!(f, "cloglog"),
            Link::Cauchit => write!(f, "cauchit"),
            Link::Other(name) => write!(f, "{name}"),
        }
    }
}
