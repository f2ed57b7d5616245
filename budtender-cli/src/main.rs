//! budtender CLI: ask, chat, search, refresh the index, check health, import products.
//! Config from env (and `.env`).

use anyhow::{Context, Result};
use budtender::{build_components, build_components_unindexed, AppComponents, AppConfig};
use budtender_cli::{read_products, Cli, Commands};
use budtender_core::{init_tracing, TurnOutcome};
use clap::Parser;
use context_resolver::get_product_name;
use storage::ProductRepository;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.log_file)?;

    match cli.command {
        Commands::Import { file } => handle_import(&config, &file).await,
        Commands::Ask { question, session } => {
            let components = build_components(&config).await?;
            handle_ask(&components, &session, &question).await
        }
        Commands::Chat => {
            let components = build_components(&config).await?;
            handle_chat(&components).await
        }
        Commands::Search { query, k } => {
            let components = build_components(&config).await?;
            handle_search(&components, &query, k).await
        }
        Commands::RefreshIndex => {
            let components = build_components_unindexed(&config).await?;
            let count = components.search_service().refresh_index().await?;
            println!("Index refreshed with {} products", count);
            Ok(())
        }
        Commands::Health => {
            let components = build_components(&config).await?;
            handle_health(&components).await
        }
    }
}

fn print_outcome(outcome: &TurnOutcome) {
    println!("{}", outcome.answer);
    if let Some(context) = &outcome.context_used {
        println!(
            "  [product: {}, topic changed: {}]",
            get_product_name(&context.description),
            outcome.topic_changed
        );
    }
}

async fn handle_ask(components: &AppComponents, session: &str, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question is required");
    }
    let outcome = components.chat_service().respond(session, question).await;
    print_outcome(&outcome);
    Ok(())
}

async fn handle_chat(components: &AppComponents) -> Result<()> {
    let chat = components.chat_service();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Ask about a product (type 'exit' to quit).");
    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }
        let outcome = chat.respond("chat", question).await;
        print_outcome(&outcome);
    }
    Ok(())
}

async fn handle_search(components: &AppComponents, query: &str, k: Option<usize>) -> Result<()> {
    let response = components.search_service().search(query, k).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn handle_health(components: &AppComponents) -> Result<()> {
    let report = components.search_service().health().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_healthy() {
        anyhow::bail!("Unhealthy");
    }
    Ok(())
}

async fn handle_import(config: &AppConfig, file: &std::path::Path) -> Result<()> {
    let records = read_products(file).await?;
    let repo = ProductRepository::new(&config.database_url)
        .await
        .context("Failed to open product database")?;
    let count = repo.save_all(&records).await?;
    info!(count, file = %file.display(), "Imported products");
    println!(
        "Imported {} products; run `budtender refresh-index` to rebuild the index",
        count
    );
    Ok(())
}
