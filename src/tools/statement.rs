//! Single-statement check for `query_database`.
//!
//! Statements without bound parameters run over the text protocol, which
//! executes every `;`-separated statement in the string. A query is therefore
//! split with the [sqlparser](https://docs.rs/sqlparser/) tokenizer for the
//! target dialect and refused unless it holds exactly one statement.
//! Semicolons inside string literals, quoted identifiers and comments do not
//! count; a single trailing semicolon is allowed.

use crate::error::{DbError, DbResult};
use crate::models::DatabaseType;
use sqlparser::dialect::{Dialect, MySqlDialect, SQLiteDialect};
use sqlparser::tokenizer::{Token, Tokenizer};

fn dialect(db_type: DatabaseType) -> Box<dyn Dialect> {
    match db_type {
        DatabaseType::MySQL => Box::new(MySqlDialect {}),
        DatabaseType::SQLite => Box::new(SQLiteDialect {}),
    }
}

/// Count the non-empty statements in `sql`.
pub fn statement_count(sql: &str, db_type: DatabaseType) -> DbResult<usize> {
    let dialect = dialect(db_type);
    let tokens = Tokenizer::new(dialect.as_ref(), sql)
        .tokenize()
        .map_err(|e| DbError::invalid_query(format!("Failed to tokenize SQL: {}", e)))?;

    let mut count = 0;
    let mut in_statement = false;
    for token in tokens {
        match token {
            Token::SemiColon => in_statement = false,
            Token::Whitespace(_) | Token::EOF => {}
            _ => {
                if !in_statement {
                    count += 1;
                    in_statement = true;
                }
            }
        }
    }
    Ok(count)
}

/// Refuse empty input and input holding more than one statement.
pub fn check_single_statement(sql: &str, db_type: DatabaseType) -> DbResult<()> {
    match statement_count(sql, db_type)? {
        0 => Err(DbError::invalid_query("Empty SQL statement")),
        1 => Ok(()),
        n => Err(DbError::invalid_query(format!(
            "Multiple statements are not allowed ({} found)",
            n
        ))),
    }
}
