//! Pattern denylist for raw SQL.
//!
//! This is a tripwire for obviously dangerous statements, not a security
//! boundary: it does not parse SQL and equivalent rewrites pass.

use regex::{RegexSet, RegexSetBuilder};
use thiserror::Error;

/// Named case-insensitive patterns rejected in raw SQL.
///
/// Procedure names match anywhere in the text, including inside longer
/// identifiers; statement patterns match on keyword boundaries.
pub const DENYLIST: [(&str, &str); 11] = [
    ("xp_cmdshell", r"xp_cmdshell"),
    ("sp_executesql", r"sp_executesql"),
    ("pg_read_file", r"pg_read_(binary_)?file"),
    ("pg_write_file", r"pg_write_file"),
    ("pg_ls_dir", r"pg_ls_dir"),
    ("lo_import", r"lo_import"),
    ("lo_export", r"lo_export"),
    ("copy program", r"\bcopy\b[\s\S]*?\b(from|to)\s+program\b"),
    ("alter role superuser", r"\balter\s+(role|user)\b[\s\S]*?\bsuperuser\b"),
    ("grant superuser", r"\bgrant\b[\s\S]*?\bsuperuser\b"),
    ("create role", r"\bcreate\s+(role|user)\b"),
];

/// A query matched the denylist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("query rejected: contains forbidden pattern `{pattern}`")]
pub struct ForbiddenQuery {
    /// Name of the matched pattern.
    pub pattern: &'static str,
}

/// Compiled denylist.
#[derive(Debug, Clone)]
pub struct SqlSanitizer {
    patterns: RegexSet,
}

impl SqlSanitizer {
    /// Compiles [`DENYLIST`].
    ///
    /// # Errors
    ///
    /// Returns the regex error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = RegexSetBuilder::new(DENYLIST.iter().map(|(_, pattern)| *pattern))
            .case_insensitive(true)
            .build()?;
        Ok(Self { patterns })
    }

    /// Checks `query` against the denylist.
    ///
    /// Comments and multiple statements are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ForbiddenQuery`] naming the first matched pattern.
    pub fn check(&self, query: &str) -> Result<(), ForbiddenQuery> {
        let matched = self
            .patterns
            .matches(query)
            .iter()
            .next()
            .and_then(|index| DENYLIST.get(index));
        match matched {
            Some((name, _)) => Err(ForbiddenQuery { pattern: name }),
            None => Ok(()),
        }
    }
}
