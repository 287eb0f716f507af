//! Leading-keyword guard for `query_database`.
//!
//! A statement is rejected when, after trimming, its first word is one of
//! [`FORBIDDEN_KEYWORDS`] (any case) followed by whitespace. This is a prefix
//! check, not a parser: `INSERT`, CTEs, and stored procedure calls pass.

use crate::error::{DbError, DbResult};

/// Statement keywords rejected at the start of a query.
pub const FORBIDDEN_KEYWORDS: [&str; 5] = ["DROP", "DELETE", "TRUNCATE", "ALTER", "UPDATE"];

/// Return the forbidden keyword a statement starts with, if any.
pub fn dangerous_keyword(sql: &str) -> Option<&'static str> {
    let statement = sql.trim();
    let end = statement.find(char::is_whitespace)?;
    let first_word = &statement[..end];

    FORBIDDEN_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| first_word.eq_ignore_ascii_case(keyword))
}

pub fn is_dangerous_query(sql: &str) -> bool {
    dangerous_keyword(sql).is_some()
}

/// Reject a statement starting with a forbidden keyword.
pub fn check_query(sql: &str) -> DbResult<()> {
    match dangerous_keyword(sql) {
        Some(keyword) => Err(DbError::dangerous_query(keyword)),
        None => Ok(()),
    }
}
