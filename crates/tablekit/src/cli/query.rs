//! Query CLI command.

use clap::Parser;
use tablekit_core::Document;

use super::parse_document;
use crate::inputs::{QueryConditions, QueryInput};

/// Query a table or index by partition key.
#[derive(Debug, Parser)]
pub struct QueryCommand {
    /// Table name.
    #[arg(long)]
    pub table: String,
    /// Key condition expression, e.g. `u = :u`.
    #[arg(long)]
    pub key_condition: String,
    /// Expression attribute values as a JSON object.
    #[arg(long, value_parser = parse_document)]
    pub values: Option<Document>,
    /// Secondary index to query.
    #[arg(long)]
    pub index: Option<String>,
    /// Maximum number of items to evaluate.
    #[arg(long)]
    pub limit: Option<i32>,
    /// Return items in descending sort key order.
    #[arg(long)]
    pub descending: bool,
    /// Strongly consistent read.
    #[arg(long)]
    pub consistent_read: bool,
    /// `LastEvaluatedKey` of the previous page, as a JSON object.
    #[arg(long, value_parser = parse_document)]
    pub exclusive_start_key: Option<Document>,
    /// Attributes to return (comma separated). All attributes when omitted.
    #[arg(long, value_delimiter = ',')]
    pub attributes: Vec<String>,
}

impl QueryCommand {
    pub fn into_input(self) -> QueryInput {
        QueryInput::new(
            self.table,
            QueryConditions {
                index_name: self.index,
                limit: self.limit,
                consistent_read: self.consistent_read.then_some(true),
                scan_index_forward: self.descending.then_some(false),
                exclusive_start_key: self.exclusive_start_key,
                key_condition_expression: self.key_condition,
                expression_attribute_values: self.values,
            },
            self.attributes,
        )
    }
}
