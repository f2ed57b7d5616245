//! CLI parser.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "budtender")]
#[command(about = "Product Q&A over the cannabis catalog: ask, chat, search, refresh-index, health, import", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Answer one question.
    Ask {
        question: String,
        /// Session id; turns with the same id share context within this process.
        #[arg(short, long, default_value = "cli")]
        session: String,
    },
    /// Interactive conversation on stdin; `exit` or `quit` ends it.
    Chat,
    /// Search the catalog directly.
    Search {
        query: String,
        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Reload products from the database and rebuild the index.
    RefreshIndex,
    /// Check database, index and generator.
    Health,
    /// Import products from a JSON array of {"id"?, "description"}.
    Import { file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_session() {
        let cli = Cli::try_parse_from(["budtender", "ask", "What is OG Kush?", "--session", "s1"])
            .unwrap();
        assert_eq!(
            cli.command,
            Commands::Ask {
                question: "What is OG Kush?".to_string(),
                session: "s1".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_search_k() {
        let cli = Cli::try_parse_from(["budtender", "search", "citrus", "-k", "5"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Search {
                query: "citrus".to_string(),
                k: Some(5),
            }
        );
    }

    #[test]
    fn test_parse_refresh_index() {
        let cli = Cli::try_parse_from(["budtender", "refresh-index"]).unwrap();
        assert_eq!(cli.command, Commands::RefreshIndex);
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["budtender"]).is_err());
    }
}
