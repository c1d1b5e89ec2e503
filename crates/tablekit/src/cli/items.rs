//! Single-item CLI commands.

use clap::Parser;
use tablekit_core::Document;

use super::parse_document;
use crate::inputs::{
    DeleteConditions, DeleteInput, GetConditions, GetInput, PutConditions, PutInput,
};

/// Fetch one item by key.
#[derive(Debug, Parser)]
pub struct GetCommand {
    /// Table name.
    #[arg(long)]
    pub table: String,
    /// Primary key as a JSON object.
    #[arg(long, value_parser = parse_document)]
    pub key: Document,
    /// Attributes to return (comma separated). All attributes when omitted.
    #[arg(long, value_delimiter = ',')]
    pub attributes: Vec<String>,
    /// Strongly consistent read.
    #[arg(long)]
    pub consistent_read: bool,
}

impl GetCommand {
    pub fn into_input(self) -> GetInput {
        let input = GetInput::new(self.table, self.key, self.attributes);
        if self.consistent_read {
            input.with_conditions(GetConditions {
                consistent_read: Some(true),
            })
        } else {
            input
        }
    }
}

/// Create or replace one item.
#[derive(Debug, Parser)]
pub struct PutCommand {
    /// Table name.
    #[arg(long)]
    pub table: String,
    /// Item as a JSON object.
    #[arg(long, value_parser = parse_document)]
    pub item: Document,
    /// Condition expression, e.g. `attribute_not_exists(id)`.
    #[arg(long)]
    pub condition: Option<String>,
    /// Expression attribute values as a JSON object.
    #[arg(long, value_parser = parse_document)]
    pub values: Option<Document>,
}

impl PutCommand {
    pub fn into_input(self) -> PutInput {
        let input = PutInput::new(self.table, self.item);
        if self.condition.is_none() && self.values.is_none() {
            return input;
        }
        input.with_conditions(PutConditions {
            condition_expression: self.condition,
            expression_attribute_values: self.values,
        })
    }
}

/// Delete one item by key.
#[derive(Debug, Parser)]
pub struct DeleteCommand {
    /// Table name.
    #[arg(long)]
    pub table: String,
    /// Primary key as a JSON object.
    #[arg(long, value_parser = parse_document)]
    pub key: Document,
    /// Condition expression, e.g. `attribute_exists(id)`.
    #[arg(long)]
    pub condition: Option<String>,
    /// Expression attribute values as a JSON object.
    #[arg(long, value_parser = parse_document)]
    pub values: Option<Document>,
}

impl DeleteCommand {
    pub fn into_input(self) -> DeleteInput {
        let input = DeleteInput::new(self.table, self.key);
        if self.condition.is_none() && self.values.is_none() {
            return input;
        }
        input.with_conditions(DeleteConditions {
            condition_expression: self.condition,
            expression_attribute_values: self.values,
        })
    }
}
