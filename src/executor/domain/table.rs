//! `CREATE TABLE` generation and best-effort parsing.
//!
//! Parsing recognises the statements [`generate_table_sql`] produces plus
//! common hand-written variations. It is not a SQL parser.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::domain::{PlatformDomainError, validate_identifier};

const DEFAULT_SCHEMA: &str = "public";

/// Words that end a column type or start a table constraint when parsing.
const RESERVED_WORDS: [&str; 11] = [
    "check",
    "collate",
    "constraint",
    "default",
    "foreign",
    "generated",
    "not",
    "null",
    "primary",
    "references",
    "unique",
];

/// A column in a table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// SQL type, for example `text` or `numeric(10, 2)`.
    pub data_type: String,
    /// Whether `NULL` is allowed.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Whether the column is the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Default expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

const fn default_nullable() -> bool {
    true
}

impl ColumnDefinition {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            primary_key: false,
            default: None,
        }
    }

    /// Marks the column `NOT NULL`.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as primary key (implies `NOT NULL`).
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets a default expression.
    #[must_use]
    pub fn with_default(mut self, expression: impl Into<String>) -> Self {
        self.default = Some(expression.into());
        self
    }
}

/// A table and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name.
    pub name: String,
    /// Schema, `public` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

/// Errors from table SQL generation and parsing.
#[derive(Debug, Clone, Error)]
pub enum TableSqlError {
    /// A table, schema, or column name is not an identifier.
    #[error(transparent)]
    InvalidIdentifier(#[from] PlatformDomainError),

    /// A column type contains characters that cannot appear in a type.
    #[error("invalid column type `{0}`")]
    InvalidDataType(String),

    /// A column name or type uses a word reserved for constraints.
    #[error("`{0}` uses a reserved word")]
    ReservedWord(String),

    /// A default expression would not stay inside its column.
    #[error("invalid default expression `{0}`")]
    InvalidDefault(String),

    /// The table has no columns.
    #[error("table `{0}` has no columns")]
    NoColumns(String),

    /// The text is not a recognisable `CREATE TABLE` statement.
    #[error("not a CREATE TABLE statement")]
    NotCreateTable,

    /// An internal pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Renders a `CREATE TABLE IF NOT EXISTS` statement.
///
/// # Errors
///
/// Returns [`TableSqlError`] when a name is not an identifier, a type or
/// default is malformed, or there are no columns.
pub fn generate_table_sql(definition: &TableDefinition) -> Result<String, TableSqlError> {
    let table = validate_identifier(&definition.name)?;
    let schema = validate_identifier(definition.schema.as_deref().unwrap_or(DEFAULT_SCHEMA))?;
    if definition.columns.is_empty() {
        return Err(TableSqlError::NoColumns(table));
    }
    let columns = definition
        .columns
        .iter()
        .map(render_column)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {schema}.{table} (\n  {}\n);",
        columns.join(",\n  ")
    ))
}

fn render_column(column: &ColumnDefinition) -> Result<String, TableSqlError> {
    let name = validate_identifier(&column.name)?;
    if is_reserved(&name) {
        return Err(TableSqlError::ReservedWord(name));
    }
    let data_type = column.data_type.trim();
    let well_formed = !data_type.is_empty()
        && data_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '(' | ')' | ',' | '[' | ']'));
    if !well_formed {
        return Err(TableSqlError::InvalidDataType(column.data_type.clone()));
    }
    if data_type
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(is_reserved)
    {
        return Err(TableSqlError::ReservedWord(data_type.to_owned()));
    }
    let mut rendered = format!("{name} {data_type}");
    if column.primary_key {
        rendered.push_str(" PRIMARY KEY");
    } else if !column.nullable {
        rendered.push_str(" NOT NULL");
    }
    if let Some(expression) = &column.default {
        let trimmed = expression.trim();
        if trimmed.is_empty() || !is_self_contained(trimmed) {
            return Err(TableSqlError::InvalidDefault(expression.clone()));
        }
        rendered.push_str(" DEFAULT ");
        rendered.push_str(trimmed);
    }
    Ok(rendered)
}

fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Returns `true` when `expression` closes every literal and parenthesis it
/// opens and has no statement separator or column-separating comma.
fn is_self_contained(expression: &str) -> bool {
    let mut depth = 0_usize;
    let mut quote = None;
    for c in expression.chars() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(outer) => depth = outer,
                None => return false,
            },
            ';' => return false,
            ',' if depth == 0 => return false,
            _ => {}
        }
    }
    quote.is_none() && depth == 0
}

/// Parses a `CREATE TABLE` statement back into a definition.
///
/// Column names, types, nullability, primary keys (inline or table-level),
/// and defaults are recovered; other constraints are ignored.
///
/// # Errors
///
/// Returns [`TableSqlError::NotCreateTable`] when the text does not look
/// like a `CREATE TABLE` statement.
pub fn parse_create_table(sql: &str) -> Result<TableDefinition, TableSqlError> {
    let header = Regex::new(
        r#"(?is)^\s*create\s+table\s+(?:if\s+not\s+exists\s+)?(?:"?(\w+)"?\s*\.\s*)?"?(\w+)"?\s*\((.*)\)\s*;?\s*$"#,
    )?;
    let captures = header.captures(sql).ok_or(TableSqlError::NotCreateTable)?;
    let schema = captures.get(1).map(|m| m.as_str().to_owned());
    let name = captures
        .get(2)
        .map(|m| m.as_str().to_owned())
        .ok_or(TableSqlError::NotCreateTable)?;
    let body = captures.get(3).map_or("", |m| m.as_str());

    let parser = ColumnParser::new()?;
    let mut columns = Vec::new();
    let mut table_primary_key = Vec::new();
    for item in split_top_level(body) {
        if let Some(keys) = parser.table_primary_key(item) {
            table_primary_key.extend(keys);
        } else if !parser.is_table_constraint(item) {
            columns.push(parser.column(item)?);
        }
    }
    for column in &mut columns {
        if table_primary_key.contains(&column.name) {
            column.primary_key = true;
            column.nullable = false;
        }
    }
    if columns.is_empty() {
        return Err(TableSqlError::NoColumns(name));
    }
    Ok(TableDefinition {
        name,
        schema: schema.filter(|value| value != DEFAULT_SCHEMA),
        columns,
    })
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    let mut quote = None;
    for (index, c) in body.char_indices() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.extend(body.get(start..index));
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    items.extend(body.get(start..));
    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Blanks the contents of quoted literals and identifiers, keeping byte
/// offsets, so keyword patterns only see SQL structure.
fn mask_quoted(text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut quote = None;
    for c in text.chars() {
        match quote {
            Some(open) if c == open => {
                quote = None;
                masked.push(c);
            }
            Some(_) => masked.extend(std::iter::repeat_n(' ', c.len_utf8())),
            None => {
                if matches!(c, '\'' | '"') {
                    quote = Some(c);
                }
                masked.push(c);
            }
        }
    }
    masked
}

struct ColumnParser {
    constraint: Regex,
    keyword: Regex,
    not_null: Regex,
    inline_primary_key: Regex,
    default: Regex,
    table_primary_key: Regex,
}

impl ColumnParser {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            constraint: Regex::new(
                r"(?i)^(?:constraint\b|primary\s+key\b|foreign\s+key\b|unique\s*(?:\(|nulls\b|using\b)|check\s*\(|exclude\s*(?:\(|using\b))",
            )?,
            keyword: Regex::new(
                r"(?i)\b(not\s+null|null|primary\s+key|default|references|unique|check|constraint|generated|collate)\b",
            )?,
            not_null: Regex::new(r"(?i)\bnot\s+null\b")?,
            inline_primary_key: Regex::new(r"(?i)\bprimary\s+key\b")?,
            default: Regex::new(
                r"(?is)\bdefault\s+(.+?)(?:\s+(?:not\s+null|null|primary\s+key|references|unique|check|constraint)\b|$)",
            )?,
            table_primary_key: Regex::new(r"(?i)^(?:constraint\s+\w+\s+)?primary\s+key\s*\(([^)]*)\)")?,
        })
    }

    fn is_table_constraint(&self, item: &str) -> bool {
        self.constraint.is_match(item)
    }

    fn table_primary_key(&self, item: &str) -> Option<Vec<String>> {
        let columns = self.table_primary_key.captures(item)?.get(1)?;
        Some(
            columns
                .as_str()
                .split(',')
                .map(|name| name.trim().trim_matches('"').to_owned())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }

    fn column(&self, item: &str) -> Result<ColumnDefinition, TableSqlError> {
        let (raw_name, tail) = item
            .split_once(char::is_whitespace)
            .ok_or(TableSqlError::NotCreateTable)?;
        let name = validate_identifier(raw_name.trim_matches('"'))?;
        let rest = tail.trim();
        let masked = mask_quoted(rest);
        let type_end = self.keyword.find(&masked).map_or(rest.len(), |m| m.start());
        let data_type = rest.get(..type_end).unwrap_or(rest).trim().to_owned();
        if data_type.is_empty() {
            return Err(TableSqlError::InvalidDataType(item.to_owned()));
        }
        let primary_key = self.inline_primary_key.is_match(&masked);
        let default = self
            .default
            .captures(&masked)
            .and_then(|captures| captures.get(1))
            .and_then(|m| rest.get(m.range()))
            .map(|expression| expression.trim().to_owned());
        Ok(ColumnDefinition {
            name,
            data_type,
            nullable: !(primary_key || self.not_null.is_match(&masked)),
            primary_key,
            default,
        })
    }
}
