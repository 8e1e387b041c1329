use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    AnsiDialect, BigQueryDialect, Dialect, DuckDbDialect, MsSqlDialect, MySqlDialect,
    PostgreSqlDialect, SQLiteDialect, SnowflakeDialect,
};
use std::fmt;

/// How a dialect delimits quoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStyle {
    /// ANSI `"name"`.
    DoubleQuote,
    /// `` `name` ``
    Backtick,
    /// `[name]`
    Bracket,
}

impl QuoteStyle {
    /// Opening and closing delimiter.
    pub fn delimiters(self) -> (char, char) {
        match self {
            QuoteStyle::DoubleQuote => ('"', '"'),
            QuoteStyle::Backtick => ('`', '`'),
            QuoteStyle::Bracket => ('[', ']'),
        }
    }
}

/// Target SQL dialect for quoting and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// ANSI SQL.
    #[default]
    Ansi,
    /// `PostgreSQL`.
    Postgres,
    /// `MySQL` / `MariaDB`.
    MySql,
    /// Microsoft SQL Server.
    MsSql,
    /// Google `BigQuery`.
    BigQuery,
    /// Snowflake.
    Snowflake,
    /// `SQLite`.
    Sqlite,
    /// `DuckDB`.
    DuckDb,
}

impl SqlDialect {
    /// Every supported dialect.
    pub const ALL: [SqlDialect; 8] = [
        SqlDialect::Ansi,
        SqlDialect::Postgres,
        SqlDialect::MySql,
        SqlDialect::MsSql,
        SqlDialect::BigQuery,
        SqlDialect::Snowflake,
        SqlDialect::Sqlite,
        SqlDialect::DuckDb,
    ];

    /// Identifier quoting used by this dialect.
    pub fn quote_style(self) -> QuoteStyle {
        match self {
            SqlDialect::MySql | SqlDialect::BigQuery => QuoteStyle::Backtick,
            SqlDialect::MsSql => QuoteStyle::Bracket,
            SqlDialect::Ansi
            | SqlDialect::Postgres
            | SqlDialect::Snowflake
            | SqlDialect::Sqlite
            | SqlDialect::DuckDb => QuoteStyle::DoubleQuote,
        }
    }

    /// True when `\` starts an escape sequence inside string literals.
    pub fn backslash_escapes(self) -> bool {
        matches!(
            self,
            SqlDialect::MySql | SqlDialect::BigQuery | SqlDialect::Snowflake
        )
    }

    /// `sqlparser` dialect used to validate rendered SQL.
    pub fn parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Ansi => Box::new(AnsiDialect {}),
            SqlDialect::Postgres => Box::new(PostgreSqlDialect {}),
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::MsSql => Box::new(MsSqlDialect {}),
            SqlDialect::BigQuery => Box::new(BigQueryDialect {}),
            SqlDialect::Snowflake => Box::new(SnowflakeDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::DuckDb => Box::new(DuckDbDialect {}),
        }
    }

    /// Lowercase dialect name, as accepted by [`std::str::FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            SqlDialect::Ansi => "ansi",
            SqlDialect::Postgres => "postgres",
            SqlDialect::MySql => "mysql",
            SqlDialect::MsSql => "mssql",
            SqlDialect::BigQuery => "bigquery",
            SqlDialect::Snowflake => "snowflake",
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::DuckDb => "duckdb",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SqlDialect {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" | "generic" => Ok(SqlDialect::Ansi),
            "postgres" | "postgresql" => Ok(SqlDialect::Postgres),
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "mssql" | "sqlserver" | "tsql" => Ok(SqlDialect::MsSql),
            "bigquery" => Ok(SqlDialect::BigQuery),
            "snowflake" => Ok(SqlDialect::Snowflake),
            "sqlite" => Ok(SqlDialect::Sqlite),
            "duckdb" => Ok(SqlDialect::DuckDb),
            _ => Err(format!("Invalid SQL dialect: {s}")),
        }
    }
}
