use std::fmt;
use std::str::FromStr;

use sqlparser::keywords::ALL_KEYWORDS;

use super::dialect::{QuoteStyle, SqlDialect};
use crate::error::{Result, SynthesisError};

/// A table name with optional schema and catalog qualifiers.
///
/// Invariants: the table is non-empty; a catalog is only present together
/// with a schema; no component is blank or contains a NUL character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedIdentifier {
    catalog: Option<String>,
    schema: Option<String>,
    table: String,
}

impl QualifiedIdentifier {
    /// Validate and build an identifier from its parts.
    pub fn new(table: Option<&str>, schema: Option<&str>, catalog: Option<&str>) -> Result<Self> {
        let Some(table) = table else {
            return Err(SynthesisError::InvalidIdentifier(
                "table name is required".to_string(),
            ));
        };
        validate_component("table", table)?;
        if let Some(schema) = schema {
            validate_component("schema", schema)?;
        }
        if let Some(catalog) = catalog {
            validate_component("catalog", catalog)?;
            if schema.is_none() {
                return Err(SynthesisError::InvalidIdentifier(format!(
                    "catalog `{catalog}` requires a schema"
                )));
            }
        }

        Ok(Self {
            catalog: catalog.map(str::to_string),
            schema: schema.map(str::to_string),
            table: table.to_string(),
        })
    }

    /// Unqualified table identifier.
    pub fn table_only(table: &str) -> Result<Self> {
        Self::new(Some(table), None, None)
    }

    /// Table component.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Schema component, if any.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Catalog component, if any.
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Present components in catalog, schema, table order.
    pub fn components(&self) -> Vec<&str> {
        self.catalog
            .as_deref()
            .into_iter()
            .chain(self.schema.as_deref())
            .chain(std::iter::once(self.table.as_str()))
            .collect()
    }

    /// Each component quoted with `style`, joined by `.`.
    pub fn quoted(&self, style: QuoteStyle) -> String {
        self.components()
            .into_iter()
            .map(|component| quote_component(component, style))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for QualifiedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted(QuoteStyle::DoubleQuote))
    }
}

impl FromStr for QualifiedIdentifier {
    type Err = SynthesisError;

    /// Parse `table`, `schema.table`, or `catalog.schema.table`.
    ///
    /// Components may be quoted with `"…"`, `` `…` `` or `[…]`; dots inside
    /// quotes are part of the name.
    fn from_str(s: &str) -> Result<Self> {
        let parts = split_qualified_name(s)
            .into_iter()
            .map(unquote_identifier)
            .collect::<Vec<_>>();

        match parts.as_slice() {
            [table] => Self::new(Some(table.as_str()), None, None),
            [schema, table] => Self::new(Some(table.as_str()), Some(schema.as_str()), None),
            [catalog, schema, table] => Self::new(
                Some(table.as_str()),
                Some(schema.as_str()),
                Some(catalog.as_str()),
            ),
            _ => Err(SynthesisError::InvalidIdentifier(format!(
                "`{s}` has more than three name components"
            ))),
        }
    }
}

/// Quote a table name and its optional qualifiers with ANSI double quotes.
///
/// ```
/// use glm2sql::quote_identifier;
///
/// assert_eq!(quote_identifier(Some("tbl"), None, None).unwrap(), r#""tbl""#);
/// assert_eq!(
///     quote_identifier(Some("foo"), Some("bar"), Some("baz")).unwrap(),
///     r#""baz"."bar"."foo""#,
/// );
/// assert!(quote_identifier(None, None, Some("bar")).is_err());
/// ```
pub fn quote_identifier(
    table: Option<&str>,
    schema: Option<&str>,
    catalog: Option<&str>,
) -> Result<String> {
    quote_identifier_with(SqlDialect::Ansi, table, schema, catalog)
}

/// Like [`quote_identifier`], with the quote characters of `dialect`.
pub fn quote_identifier_with(
    dialect: SqlDialect,
    table: Option<&str>,
    schema: Option<&str>,
    catalog: Option<&str>,
) -> Result<String> {
    Ok(QualifiedIdentifier::new(table, schema, catalog)?.quoted(dialect.quote_style()))
}

/// Quote a single name component, doubling embedded closing delimiters.
pub fn quote_component(name: &str, style: QuoteStyle) -> String {
    let (open, close) = style.delimiters();
    let mut out = String::with_capacity(name.len() + 2);
    out.push(open);
    for ch in name.chars() {
        if ch == close {
            out.push(close);
        }
        out.push(ch);
    }
    out.push(close);
    out
}

/// Return the identifier without its surrounding quotes, undoubling escapes.
pub fn unquote_identifier(ident: &str) -> String {
    let ident = ident.trim();
    for (open, close) in [('"', '"'), ('`', '`'), ('[', ']')] {
        if let Some(inner) = ident
            .strip_prefix(open)
            .and_then(|s| s.strip_suffix(close))
        {
            let doubled = format!("{close}{close}");
            return inner.replace(&doubled, &close.to_string());
        }
    }
    ident.to_string()
}

/// True when `name` can be emitted without quotes in any supported dialect.
///
/// That means lowercase ASCII letters, digits and underscores, not starting
/// with a digit, and not a SQL keyword.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return false;
    }
    if !chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_') {
        return false;
    }
    ALL_KEYWORDS
        .binary_search(&name.to_ascii_uppercase().as_str())
        .is_err()
}

fn validate_component(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SynthesisError::InvalidIdentifier(format!(
            "{kind} name must not be empty"
        )));
    }
    if value.contains('\0') {
        return Err(SynthesisError::InvalidIdentifier(format!(
            "{kind} name must not contain NUL characters"
        )));
    }
    Ok(())
}

/// Split a dotted name on dots that are outside quoted components.
///
/// Inside a quoted component a doubled closing delimiter is an escaped
/// character, not the end of the component.
fn split_qualified_name(name: &str) -> Vec<&str> {
    let mut closing: Option<char> = None;
    let mut start = 0usize;
    let mut parts: Vec<&str> = Vec::new();
    let mut chars = name.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match (closing, ch) {
            (Some(close), ch) if ch == close => {
                if chars.next_if(|&(_, next)| next == close).is_none() {
                    closing = None;
                }
            }
            (Some(_), _) => {}
            (None, '"') => closing = Some('"'),
            (None, '`') => closing = Some('`'),
            (None, '[') => closing = Some(']'),
            (None, '.') => {
                parts.push(name[start..idx].trim());
                start = idx + 1;
            }
            (None, _) => {}
        }
    }
    parts.push(name[start..].trim());
    parts
}
