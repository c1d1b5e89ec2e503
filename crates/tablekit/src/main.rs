//! tablekit CLI entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tablekit::cli::{transact, Cli, Commands};
use tablekit::output::{pretty, render};
use tablekit::storage::DynamoDbService;
use tablekit::{Config, SimpleDynamodbClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablekit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.endpoint_url.clone(), cli.region.clone());
    config.validate()?;
    tracing::debug!(endpoint = %config.target_display(), "Connecting to DynamoDB");

    let service = DynamoDbService::from_config(&config).await;
    let client = SimpleDynamodbClient::new(Arc::new(service));

    let format = cli.format;
    let output = match cli.command {
        Commands::Get(command) => {
            let item = client.get(command.into_input()).await?;
            render(&item, format, |item| pretty::format_item(item.as_ref()))
        }
        Commands::Put(command) => {
            let response = client.put(command.into_input()).await?;
            render(&response, format, |r| pretty::format_write("Stored", r))
        }
        Commands::Delete(command) => {
            let response = client.delete(command.into_input()).await?;
            render(&response, format, |r| pretty::format_write("Deleted", r))
        }
        Commands::Query(command) => {
            let page = client.query_page(command.into_input()).await?;
            render(&page, format, pretty::format_query)
        }
        Commands::Transact(command) => {
            let intents = transact::read_intents(&command.file)
                .with_context(|| format!("reading intents from {}", command.file.display()))?;

            let mut transaction = client.start_transaction();
            for intent in intents {
                transaction.queue().push(intent);
            }
            let receipt = transaction.execute(client.log().as_ref()).await?;
            render(&receipt, format, pretty::format_receipt)
        }
    };
    println!("{output}");

    Ok(())
}
