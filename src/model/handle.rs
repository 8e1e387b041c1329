use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::family::{Family, Link};
use crate::error::{Result, SynthesisError};

/// Which fitting routine produced the model; decides how coefficients are read.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelVariant {
    /// Ordinary least squares (`lm`): gaussian family, identity link.
    Lm,
    /// Plain generalized linear model (`glm`).
    Glm,
    /// Penalized GLM (`glmnet`) evaluated at one regularization strength.
    Glmnet,
    /// Component-wise boosted GLM (`glmboost`).
    Glmboost {
        /// Offset the boosting started from; not part of the coefficients.
        offset: f64,
        /// True when the response was recoded to ±1 internally, which halves
        /// the scale of every coefficient and of the offset.
        binary_recoding: bool,
    },
    /// A model class the extractor has no reader for.
    Unrecognized(String),
}

impl ModelVariant {
    /// Class name as spelled in model descriptions.
    pub fn class_name(&self) -> &str {
        match self {
            ModelVariant::Lm => "lm",
            ModelVariant::Glm => "glm",
            ModelVariant::Glmnet => "glmnet",
            ModelVariant::Glmboost { .. } => "glmboost",
            ModelVariant::Unrecognized(class) => class,
        }
    }
}

/// One named coefficient of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Coefficient name as the fitting library reports it.
    pub term: String,
    /// Estimate; `None` for aliased (`NA`) coefficients.
    pub estimate: Option<f64>,
}

/// Read-only description of a fitted model.
///
/// Holds what synthesis needs and nothing else: the variant, the family and
/// link, the coefficients in the order the model stores them, and the levels
/// of every factor variable (used to decode dummy coefficient names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel", into = "RawModel")]
pub struct ModelHandle {
    variant: ModelVariant,
    family: Family,
    link: Link,
    coefficients: Vec<Coefficient>,
    factor_levels: BTreeMap<String, Vec<String>>,
}

impl ModelHandle {
    /// Model of the given variant with no coefficients yet.
    pub fn new(variant: ModelVariant, family: Family, link: Link) -> Self {
        Self {
            variant,
            family,
            link,
            coefficients: Vec::new(),
            factor_levels: BTreeMap::new(),
        }
    }

    /// Ordinary least squares model.
    pub fn lm() -> Self {
        Self::new(ModelVariant::Lm, Family::Gaussian, Link::Identity)
    }

    /// Plain GLM.
    pub fn glm(family: Family, link: Link) -> Self {
        Self::new(ModelVariant::Glm, family, link)
    }

    /// Penalized GLM.
    pub fn glmnet(family: Family, link: Link) -> Self {
        Self::new(ModelVariant::Glmnet, family, link)
    }

    /// Boosted GLM; binomial families default to ±1 response recoding.
    pub fn glmboost(family: Family, link: Link, offset: f64) -> Self {
        let binary_recoding = family.is_binomial();
        Self::new(
            ModelVariant::Glmboost {
                offset,
                binary_recoding,
            },
            family,
            link,
        )
    }

    /// Model of a class this crate cannot read; synthesis rejects it.
    pub fn unrecognized(class: impl Into<String>, family: Family, link: Link) -> Self {
        Self::new(ModelVariant::Unrecognized(class.into()), family, link)
    }

    /// Append a coefficient.
    pub fn with_coefficient(mut self, term: impl Into<String>, estimate: f64) -> Self {
        self.coefficients.push(Coefficient {
            term: term.into(),
            estimate: Some(estimate),
        });
        self
    }

    /// Append an aliased (`NA`) coefficient.
    pub fn with_aliased(mut self, term: impl Into<String>) -> Self {
        self.coefficients.push(Coefficient {
            term: term.into(),
            estimate: None,
        });
        self
    }

    /// Declare a factor variable and its levels.
    pub fn with_factor<I, S>(mut self, variable: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.factor_levels
            .insert(variable.into(), levels.into_iter().map(Into::into).collect());
        self
    }

    /// Override the ±1 recoding flag of a boosted model; no effect on other variants.
    pub fn with_binary_recoding(mut self, recoded: bool) -> Self {
        if let ModelVariant::Glmboost {
            binary_recoding, ..
        } = &mut self.variant
        {
            *binary_recoding = recoded;
        }
        self
    }

    /// Load a model description exported as JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawModel = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Serialize back to the JSON description format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The model variant.
    pub fn variant(&self) -> &ModelVariant {
        &self.variant
    }

    /// The error family.
    pub fn family(&self) -> &Family {
        &self.family
    }

    /// The configured link.
    pub fn link(&self) -> &Link {
        &self.link
    }

    /// Coefficients in stored order.
    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    /// Factor variables and their levels.
    pub fn factor_levels(&self) -> &BTreeMap<String, Vec<String>> {
        &self.factor_levels
    }
}

/// Wire shape of a model description.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawModel {
    class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    family: Option<Family>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<Link>,
    coefficients: Vec<Coefficient>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    factor_levels: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binary_recoding: Option<bool>,
}

impl TryFrom<RawModel> for ModelHandle {
    type Error = SynthesisError;

    fn try_from(raw: RawModel) -> Result<Self> {
        let class = raw.class.trim().to_ascii_lowercase();

        let (variant, family, link) = match class.as_str() {
            "lm" => {
                if raw.family.as_ref().is_some_and(|f| *f != Family::Gaussian)
                    || raw.link.as_ref().is_some_and(|l| *l != Link::Identity)
                {
                    return Err(SynthesisError::ModelFormat(
                        "`lm` models are always gaussian with identity link".to_string(),
                    ));
                }
                (ModelVariant::Lm, Family::Gaussian, Link::Identity)
            }
            "glm" | "glmnet" | "glmboost" => {
                let family = raw.family.ok_or_else(|| {
                    SynthesisError::ModelFormat(format!("`{class}` model is missing `family`"))
                })?;
                let link = match raw.link {
                    Some(link) => link,
                    None => family.canonical_link().ok_or_else(|| {
                        SynthesisError::ModelFormat(format!(
                            "family `{family}` has no canonical link; specify `link`"
                        ))
                    })?,
                };
                let variant = match class.as_str() {
                    "glm" => ModelVariant::Glm,
                    "glmnet" => ModelVariant::Glmnet,
                    _ => {
                        let offset = raw.offset.ok_or_else(|| {
                            SynthesisError::ModelFormat(
                                "`glmboost` model is missing `offset`".to_string(),
                            )
                        })?;
                        ModelVariant::Glmboost {
                            offset,
                            binary_recoding: raw
                                .binary_recoding
                                .unwrap_or_else(|| family.is_binomial()),
                        }
                    }
                };
                (variant, family, link)
            }
            _ => {
                let family = raw
                    .family
                    .unwrap_or_else(|| Family::Other("unknown".to_string()));
                let link = raw
                    .link
                    .or_else(|| family.canonical_link())
                    .unwrap_or_else(|| Link::Other("unknown".to_string()));
                (ModelVariant::Unrecognized(raw.class.trim().to_string()), family, link)
            }
        };

        if raw.offset.is_some() && !matches!(variant, ModelVariant::Glmboost { .. }) {
            log::warn!(
                "ignoring `offset` on `{}` model; only boosted models carry one",
                variant.class_name()
            );
        }

        Ok(Self {
            variant,
            family,
            link,
            coefficients: raw.coefficients,
            factor_levels: raw.factor_levels,
        })
    }
}

impl From<ModelHandle> for RawModel {
    fn from(model: ModelHandle) -> Self {
        let (offset, binary_recoding) = match model.variant {
            ModelVariant::Glmboost {
                offset,
                binary_recoding,
            } => (Some(offset), Some(binary_recoding)),
            _ => (None, None),
        };
        RawModel {
            class: model.variant.class_name().to_string(),
            family: Some(model.family),
            link: Some(model.link),
            coefficients: model.coefficients,
            factor_levels: model.factor_levels,
            offset,
            binary_recoding,
        }
    }
}
