use glm2sql::expression::Expr;
use glm2sql::model::{Family, Link, ModelVariant};
use glm2sql::{synthesize, ModelHandle, SynthesisError};

mod support;

use support::{load_fixture_model, read_fixture_json};

#[test]
fn fixtures_load_with_expected_variants() {
    let gaussian = load_fixture_model("gaussian_x1_x2");
    assert_eq!(gaussian.variant(), &ModelVariant::Glm);
    assert_eq!(gaussian.coefficients().len(), 3);

    let boosted = load_fixture_model("glmboost_binomial");
    assert_eq!(
        boosted.variant(),
        &ModelVariant::Glmboost {
            offset: 0.2,
            binary_recoding: true,
        }
    );
    assert_eq!(boosted.link(), &Link::Logit);
    assert_eq!(boosted.factor_levels()["sex"], vec!["female", "male"]);
}

#[test]
fn builder_and_json_describe_the_same_model() {
    let built = ModelHandle::glm(Family::Gaussian, Link::Identity)
        .with_coefficient("(Intercept)", 1.0)
        .with_coefficient("x1", 2.0)
        .with_coefficient("x2", -0.5);
    let loaded = ModelHandle::from_json(&read_fixture_json("gaussian_x1_x2")).unwrap();
    assert_eq!(built, loaded);
}

#[test]
fn recoding_flag_can_be_disabled() {
    let model = ModelHandle::from_json(
        r#"{"class": "glmboost", "family": "binomial", "offset": 0.5,
            "binary_recoding": false,
            "coefficients": [{"term": "x1", "estimate": 1.0}]}"#,
    )
    .unwrap();
    let expr = synthesize(&model, Some("score")).unwrap();
    assert_eq!(expr.to_string(), "score((0.5 + (1.0 * x1)))");
}

#[test]
fn structural_errors_are_reported() {
    for json in [
        r#"{"class": "glm", "coefficients": []}"#,
        r#"{"class": "glm", "family": "tweedie", "coefficients": []}"#,
        r#"{"class": "glmboost", "family": "gaussian", "coefficients": []}"#,
    ] {
        assert!(
            matches!(
                ModelHandle::from_json(json),
                Err(SynthesisError::ModelFormat(_))
            ),
            "{json}"
        );
    }

    assert!(matches!(
        ModelHandle::from_json(r#"{"class": "glm", "family": "gaussian"}"#),
        Err(SynthesisError::ModelJson(_))
    ));
}

#[test]
fn expressions_serialize_with_node_tags() {
    let expr = synthesize(&load_fixture_model("poisson_aliased"), None).unwrap();
    let json = serde_json::to_value(&expr).unwrap();
    assert_eq!(json["node"], "call");
    assert_eq!(json["function"], "EXP");

    let back: Expr = serde_json::from_value(json).unwrap();
    assert_eq!(back, expr);
}
