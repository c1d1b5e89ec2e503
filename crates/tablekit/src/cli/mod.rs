//! CLI command definitions.

pub mod items;
pub mod query;
pub mod transact;

use clap::{Parser, Subcommand, ValueEnum};
use tablekit_core::Document;

use crate::inputs::to_document;

/// Typed get/put/delete/query/transaction calls against DynamoDB.
#[derive(Debug, Parser)]
#[command(name = "tablekit")]
#[command(about = "Typed DynamoDB calls with diagnostic logging", long_about = None)]
pub struct Cli {
    /// Custom endpoint URL, e.g. DynamoDB Local. Falls back to
    /// $USE_CUSTOM_DYNAMODB_ENDPOINT, then $AWS_ENDPOINT_URL.
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// AWS region. Falls back to $AWS_REGION, then us-east-1.
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch one item by key.
    Get(items::GetCommand),
    /// Create or replace one item.
    Put(items::PutCommand),
    /// Delete one item by key.
    Delete(items::DeleteCommand),
    /// Query a table or index by partition key.
    Query(query::QueryCommand),
    /// Execute a JSON file of put/delete intents as one transaction.
    Transact(transact::TransactCommand),
}

/// Parses a JSON object argument into a `Document`.
pub fn parse_document(raw: &str) -> Result<Document, String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))?;
    to_document(&value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let document = parse_document(r#"{"u": "__REG_NUMBER_FOUND__"}"#).unwrap();
        assert_eq!(document["u"], "__REG_NUMBER_FOUND__");

        assert!(parse_document("[1, 2]").unwrap_err().contains("expected an object"));
        assert!(parse_document("{").unwrap_err().starts_with("invalid JSON"));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "tablekit",
            "get",
            "--table",
            "spaceship",
            "--key",
            r#"{"u":"x"}"#,
            "--endpoint-url",
            "http://localhost:8000",
            "--region",
            "eu-west-1",
            "--format",
            "json",
        ]);

        assert_eq!(cli.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Get(_)));
    }
}
