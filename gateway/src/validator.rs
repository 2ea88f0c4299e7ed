//! Statement validator - policy gate in front of every client query
//!
//! [`BlocklistValidator`] is a lexical check, not a parser. It lower-cases
//! the statement and rejects it when any blocklisted token appears as a
//! substring anywhere, then requires the trimmed text to start with
//! `select`.
//!
//! Known limits of the lexical check:
//! - False positives: identifiers that embed a token are rejected, e.g.
//!   `SELECT updated_at FROM t` (contains `update`) or a `created_by`
//!   column (contains `create`).
//! - False negatives: it does not look inside comments or string escapes,
//!   does not detect multi-statement batches on drivers that allow them,
//!   and does not reason about functions with side effects.
//!
//! Stronger policies plug in through the [`StatementValidator`] trait.

use crate::error::Rejection;

/// Tokens whose presence anywhere in the lower-cased statement rejects it
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "drop", "truncate", "delete", "update", "insert", "create", "alter", "rename", "replace",
];

/// A policy that decides whether a raw SQL string may be executed
pub trait StatementValidator: Send + Sync {
    /// Check a statement, returning the reason when it is refused
    fn check(&self, sql: &str) -> Result<(), Rejection>;

    /// Returns true when the statement may be executed
    fn validate(&self, sql: &str) -> bool {
        self.check(sql).is_ok()
    }
}

/// Substring blocklist plus a `select` prefix requirement
#[derive(Debug, Clone)]
pub struct BlocklistValidator {
    blocklist: Vec<String>,
}

impl BlocklistValidator {
    /// Create a validator with the default blocklist
    pub fn new() -> Self {
        Self::with_blocklist(DEFAULT_BLOCKLIST.iter().copied())
    }

    /// Create a validator with a custom token list
    pub fn with_blocklist<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocklist: tokens
                .into_iter()
                .map(|t| t.into().to_lowercase())
                .collect(),
        }
    }

    pub fn blocklist(&self) -> &[String] {
        &self.blocklist
    }
}

impl Default for BlocklistValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementValidator for BlocklistValidator {
    fn check(&self, sql: &str) -> Result<(), Rejection> {
        let lowered = sql.to_lowercase();

        // Blocklist first, so the reported reason names the token
        if let Some(token) = self.blocklist.iter().find(|t| lowered.contains(t.as_str())) {
            let reason = Rejection::ForbiddenToken(token.clone());
            tracing::warn!("Rejected statement: {}", reason);
            return Err(reason);
        }

        if !lowered.trim().starts_with("select") {
            let reason = Rejection::NotSelect;
            tracing::warn!("Rejected statement: {}", reason);
            return Err(reason);
        }

        Ok(())
    }
}
