//! Text rendering of tool outputs.
//!
//! Every tool answers with a one-line header followed by pretty-printed JSON.

use crate::error::DbError;
use crate::models::DatabaseSummary;
use crate::tools::query::QueryOutput;
use crate::tools::schema::{DescribeTableOutput, ListTablesOutput};
use serde::Serialize;

/// Rendering of a tool output as the text sent back to the agent.
pub trait ToolText {
    fn to_text(&self) -> String;
}

pub fn to_json_text<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn with_header<T: Serialize + ?Sized>(header: String, value: &T) -> String {
    format!("{}\n\n{}", header, to_json_text(value))
}

impl ToolText for QueryOutput {
    fn to_text(&self) -> String {
        with_header(
            format!(
                "Database: {} ({})\nRows: {}",
                self.database, self.database_id, self.row_count
            ),
            self,
        )
    }
}

impl ToolText for Vec<DatabaseSummary> {
    fn to_text(&self) -> String {
        with_header(format!("Configured databases: {}", self.len()), self)
    }
}

impl ToolText for ListTablesOutput {
    fn to_text(&self) -> String {
        with_header(
            format!(
                "Tables in {} ({}): {}",
                self.database, self.database_id, self.count
            ),
            self,
        )
    }
}

impl ToolText for DescribeTableOutput {
    fn to_text(&self) -> String {
        with_header(
            format!(
                "Table {} in {}: {} columns",
                self.table,
                self.database_id,
                self.columns.len()
            ),
            self,
        )
    }
}

/// Text for a failed call, with the suggestion appended when there is one.
pub fn error_text(error: &DbError) -> String {
    match error.suggestion() {
        Some(suggestion) => format!("Error: {}\n\nSuggestion: {}", error, suggestion),
        None => format!("Error: {}", error),
    }
}
