use std::collections::BTreeMap;

use crate::error::{Result, SynthesisError};
use crate::expression::Expr;

/// Coefficient name R gives the intercept.
pub const INTERCEPT: &str = "(Intercept)";

/// True when `term` names the model intercept.
pub fn is_intercept(term: &str) -> bool {
    term.trim() == INTERCEPT
}

/// One factor of a (possibly interacted) model term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermComponent {
    /// Continuous input column, used as-is.
    Column(String),
    /// Dummy indicator: 1 when `column` equals `level`.
    Level {
        /// Factor column.
        column: String,
        /// Level the dummy encodes.
        level: String,
    },
}

impl TermComponent {
    /// Expression for this component over raw input columns.
    pub fn to_expr(&self) -> Expr {
        match self {
            TermComponent::Column(name) => Expr::column(name.as_str()),
            TermComponent::Level { column, level } => {
                Expr::equals(Expr::column(column.as_str()), Expr::text(level.as_str()))
            }
        }
    }
}

/// A non-intercept coefficient name decoded into its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Coefficient name as stored by the model.
    pub name: String,
    /// Components multiplied together; more than one for interactions.
    pub components: Vec<TermComponent>,
}

impl Term {
    /// Product of the component expressions.
    pub fn to_expr(&self) -> Expr {
        Expr::product(self.components.iter().map(TermComponent::to_expr))
            .unwrap_or_else(|| Expr::number(1.0))
    }
}

/// Decode a coefficient name such as `x1`, `genderM`, or `x1:genderM`.
///
/// Components are split on `:` outside backticks. A component is a factor
/// dummy when it is `<variable><level>` for a variable in `factor_levels`
/// (the longest matching variable wins); otherwise it is a continuous column.
/// Levels may themselves contain `:` (`dir10:30`), so a dummy is matched
/// against the longest run of pieces first. Unquoted components that look
/// like inline transformations (`I(x^2)`, `log(x)`) are rejected.
pub fn decode_term(name: &str, factor_levels: &BTreeMap<String, Vec<String>>) -> Result<Term> {
    let unsupported = || SynthesisError::UnsupportedTerm {
        term: name.to_string(),
    };
    let pieces = split_interaction(name);
    let mut components = Vec::with_capacity(pieces.len());

    let mut start = 0;
    while start < pieces.len() {
        let dummy = (start + 2..=pieces.len()).rev().find_map(|end| {
            let joined = pieces[start..end].join(":");
            match_factor_level(&joined, factor_levels).map(|component| (component, end))
        });
        let (component, end) = match dummy {
            Some(found) => found,
            None => (
                decode_component(pieces[start], factor_levels).ok_or_else(unsupported)?,
                start + 1,
            ),
        };
        components.push(component);
        start = end;
    }

    Ok(Term {
        name: name.to_string(),
        components,
    })
}

/// Split `a:b:c` on colons that are not inside backtick-quoted names.
fn split_interaction(name: &str) -> Vec<&str> {
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut parts = Vec::new();

    for (idx, ch) in name.char_indices() {
        match ch {
            '`' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                parts.push(name[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(name[start..].trim());
    parts
}

/// `<variable><level>` for a known factor, preferring the longest variable.
fn match_factor_level(
    part: &str,
    factor_levels: &BTreeMap<String, Vec<String>>,
) -> Option<TermComponent> {
    let mut best: Option<(&str, &str)> = None;
    for (variable, levels) in factor_levels {
        let quoted = format!("`{variable}`");
        for prefix in [variable.as_str(), quoted.as_str()] {
            let Some(level) = part.strip_prefix(prefix) else {
                continue;
            };
            if level.is_empty() || !levels.iter().any(|l| l == level) {
                continue;
            }
            if best.is_none_or(|(current, _)| variable.len() > current.len()) {
                best = Some((variable.as_str(), level));
            }
        }
    }
    best.map(|(column, level)| TermComponent::Level {
        column: column.to_string(),
        level: level.to_string(),
    })
}

/// True when `part` is `<variable><head>` and `head:` starts one of the
/// variable's levels, i.e. a colon-bearing level that failed to match.
fn is_partial_colon_level(part: &str, factor_levels: &BTreeMap<String, Vec<String>>) -> bool {
    factor_levels.iter().any(|(variable, levels)| {
        part.strip_prefix(variable.as_str()).is_some_and(|head| {
            let head = format!("{head}:");
            levels.iter().any(|level| level.starts_with(&head))
        })
    })
}

fn decode_component(
    part: &str,
    factor_levels: &BTreeMap<String, Vec<String>>,
) -> Option<TermComponent> {
    if part.is_empty() {
        return None;
    }
    if let Some(level) = match_factor_level(part, factor_levels) {
        return Some(level);
    }
    if is_partial_colon_level(part, factor_levels) {
        return None;
    }

    if let Some(inner) = part
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return (!inner.is_empty()).then(|| TermComponent::Column(inner.to_string()));
    }

    if part.contains(['(', ')', '^', '`']) || part.starts_with(|ch: char| ch.is_ascii_digit()) {
        return None;
    }
    Some(TermComponent::Column(part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(var, lv)| (var.to_string(), lv.iter().map(|l| l.to_string()).collect()))
            .collect()
    }

    #[test]
    fn continuous_terms_are_bare_columns() {
        let term = decode_term("x1", &BTreeMap::new()).unwrap();
        assert_eq!(term.components, vec![TermComponent::Column("x1".into())]);
        assert_eq!(term.to_expr(), Expr::column("x1"));
    }

    #[test]
    fn factor_dummies_decode_to_level_indicators() {
        let factors = levels(&[("gender", &["F", "M"])]);
        let term = decode_term("genderM", &factors).unwrap();
        assert_eq!(
            term.to_expr(),
            Expr::equals(Expr::column("gender"), Expr::text("M"))
        );
    }

    #[test]
    fn interactions_multiply_components() {
        let factors = levels(&[("gender", &["F", "M"])]);
        let term = decode_term("x1:genderM", &factors).unwrap();
        assert_eq!(
            term.to_expr(),
            Expr::mul(
                Expr::column("x1"),
                Expr::equals(Expr::column("gender"), Expr::text("M")),
            )
        );
    }

    #[test]
    fn longest_factor_name_wins() {
        let factors = levels(&[("type", &["Ab", "b"]), ("typeA", &["b"])]);
        let term = decode_term("typeAb", &factors).unwrap();
        assert_eq!(
            term.components,
            vec![TermComponent::Level {
                column: "typeA".into(),
                level: "b".into(),
            }]
        );
    }

    #[test]
    fn backticked_names_are_unquoted() {
        let factors = levels(&[("car make", &["audi", "bmw"])]);
        let term = decode_term("`engine size`:`car make`bmw", &factors).unwrap();
        assert_eq!(
            term.components,
            vec![
                TermComponent::Column("engine size".into()),
                TermComponent::Level {
                    column: "car make".into(),
                    level: "bmw".into(),
                },
            ]
        );
    }

    #[test]
    fn inline_transformations_are_rejected() {
        for name in ["I(x^2)", "log(x)", "poly(x, 2)1", "x1:"] {
            let err = decode_term(name, &BTreeMap::new()).unwrap_err();
            assert!(
                matches!(err, SynthesisError::UnsupportedTerm { ref term } if term == name),
                "{name} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn levels_containing_colons_stay_one_indicator() {
        let factors = levels(&[("dir", &["base", "10:30"]), ("ratio", &["1:2:3"])]);

        let term = decode_term("dir10:30", &factors).unwrap();
        assert_eq!(
            term.to_expr(),
            Expr::equals(Expr::column("dir"), Expr::text("10:30"))
        );

        let term = decode_term("x1:dir10:30:ratio1:2:3", &factors).unwrap();
        assert_eq!(
            term.components,
            vec![
                TermComponent::Column("x1".into()),
                TermComponent::Level {
                    column: "dir".into(),
                    level: "10:30".into(),
                },
                TermComponent::Level {
                    column: "ratio".into(),
                    level: "1:2:3".into(),
                },
            ]
        );
    }

    #[test]
    fn unmatched_colon_levels_are_rejected() {
        let factors = levels(&[("dir", &["base", "10:30"])]);
        for name in ["dir10:31", "dir10", "x1:30"] {
            assert!(
                matches!(
                    decode_term(name, &factors),
                    Err(SynthesisError::UnsupportedTerm { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn recognises_intercept() {
        assert!(is_intercept("(Intercept)"));
        assert!(!is_intercept("Intercept"));
    }
}
