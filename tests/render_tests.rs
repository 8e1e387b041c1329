use glm2sql::model::{Family, Link};
use glm2sql::sql::{render, validate_sql, ColumnStyle, RenderOptions, SqlDialect};
use glm2sql::synthesis::synthesize_sql;
use glm2sql::{synthesize, ModelHandle, QualifiedIdentifier};

mod support;

use support::load_fixture_model;

#[test]
fn gaussian_renders_bare_columns() {
    let model = load_fixture_model("gaussian_x1_x2");
    let sql = synthesize_sql(&model, None, &RenderOptions::default()).unwrap();
    insta::assert_snapshot!(sql, @"((1.0 + (2.0 * x1)) + (-0.5 * x2))");
}

#[test]
fn gaussian_renders_qualified_columns() {
    let model = load_fixture_model("gaussian_x1_x2");
    let table: QualifiedIdentifier = "analytics.scores".parse().unwrap();
    let options =
        RenderOptions::new(SqlDialect::Postgres).with_columns(ColumnStyle::Qualified(table));
    let sql = synthesize_sql(&model, None, &options).unwrap();
    insta::assert_snapshot!(
        sql,
        @r#"((1.0 + (2.0 * "analytics"."scores"."x1")) + (-0.5 * "analytics"."scores"."x2"))"#
    );
}

#[test]
fn mysql_quotes_with_backticks() {
    let model = load_fixture_model("gaussian_x1_x2");
    let options = RenderOptions::new(SqlDialect::MySql).with_columns(ColumnStyle::Quoted);
    let sql = synthesize_sql(&model, None, &options).unwrap();
    insta::assert_snapshot!(sql, @"((1.0 + (2.0 * `x1`)) + (-0.5 * `x2`))");
}

#[test]
fn binomial_renders_logistic_with_factor_indicators() {
    let model = load_fixture_model("binomial_factor");
    let sql = synthesize_sql(&model, None, &RenderOptions::default()).unwrap();
    insta::assert_snapshot!(
        sql,
        @"(1.0 / (1.0 + EXP((-1.0 * (((-0.6 + (0.03 * age_yrs)) + (0.4 * (CASE WHEN sex = 'male' THEN 1.0 WHEN NOT (sex = 'male') THEN 0.0 END))) + (0.01 * (age_yrs * (CASE WHEN sex = 'male' THEN 1.0 WHEN NOT (sex = 'male') THEN 0.0 END))))))))"
    );
}

#[test]
fn factor_indicators_keep_null_unknown() {
    let model = ModelHandle::glm(Family::Gaussian, Link::Identity)
        .with_coefficient("(Intercept)", 1.0)
        .with_coefficient("dirmale", 2.0)
        .with_factor("dir", ["female", "male"]);
    let sql = synthesize_sql(&model, None, &RenderOptions::default()).unwrap();
    insta::assert_snapshot!(
        sql,
        @"(1.0 + (2.0 * (CASE WHEN dir = 'male' THEN 1.0 WHEN NOT (dir = 'male') THEN 0.0 END)))"
    );
}

#[test]
fn factor_levels_with_colons_render_as_one_indicator() {
    let model = ModelHandle::glm(Family::Gaussian, Link::Identity)
        .with_coefficient("(Intercept)", 1.0)
        .with_coefficient("dir10:30", 2.0)
        .with_factor("dir", ["base", "10:30"]);
    let sql = synthesize_sql(&model, None, &RenderOptions::default()).unwrap();
    insta::assert_snapshot!(
        sql,
        @"(1.0 + (2.0 * (CASE WHEN dir = '10:30' THEN 1.0 WHEN NOT (dir = '10:30') THEN 0.0 END)))"
    );
}

#[test]
fn text_literals_follow_dialect_escaping() {
    let model = ModelHandle::glm(Family::Gaussian, Link::Identity)
        .with_coefficient(r"dira\", 1.0)
        .with_factor("dir", ["base", r"a\"]);
    let expr = synthesize(&model, None).unwrap();

    let mysql = render(&expr, &RenderOptions::new(SqlDialect::MySql));
    insta::assert_snapshot!(
        mysql,
        @r"(1.0 * (CASE WHEN dir = 'a\\' THEN 1.0 WHEN NOT (dir = 'a\\') THEN 0.0 END))"
    );
    let postgres = render(&expr, &RenderOptions::new(SqlDialect::Postgres));
    insta::assert_snapshot!(
        postgres,
        @r"(1.0 * (CASE WHEN dir = 'a\' THEN 1.0 WHEN NOT (dir = 'a\') THEN 0.0 END))"
    );
}

#[test]
fn override_renders_as_plain_call() {
    let model = load_fixture_model("binomial_probit");
    let sql = synthesize_sql(&model, Some("probit"), &RenderOptions::default()).unwrap();
    insta::assert_snapshot!(sql, @"probit((0.25 + (-1.5 * x1)))");
}

#[test]
fn rendered_sql_parses_in_every_dialect() {
    let cases = [
        ("gaussian_x1_x2", None),
        ("binomial_factor", None),
        ("glmboost_binomial", None),
        ("binomial_probit", Some("probit")),
        ("poisson_aliased", None),
    ];
    let table = QualifiedIdentifier::new(Some("scores"), Some("analytics"), None).unwrap();

    let awkward_levels = ModelHandle::glm(Family::Gaussian, Link::Identity)
        .with_coefficient("(Intercept)", 0.5)
        .with_coefficient(r"dira\", 1.0)
        .with_coefficient("dirit's", -1.0)
        .with_coefficient(r"dirO'Brien\'", 2.0)
        .with_factor("dir", ["base", r"a\", "it's", r"O'Brien\'"]);

    let models = cases
        .into_iter()
        .map(|(fixture, override_name)| (fixture, load_fixture_model(fixture), override_name))
        .chain([("awkward_levels", awkward_levels, None)]);

    for (fixture, model, override_name) in models {
        let expr = synthesize(&model, override_name).unwrap();
        for dialect in SqlDialect::ALL {
            for columns in [
                ColumnStyle::Bare,
                ColumnStyle::Quoted,
                ColumnStyle::Qualified(table.clone()),
            ] {
                let sql = render(&expr, &RenderOptions::new(dialect).with_columns(columns));
                validate_sql(&sql, dialect)
                    .unwrap_or_else(|err| panic!("{fixture} in {dialect}: {err}\n{sql}"));
            }
        }
    }
}
