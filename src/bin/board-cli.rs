use board_client::{BoardClient, ClientError};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "board-cli")]
#[command(about = "Command-line client for the message board", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ten most recent messages
    List,
    /// Store a message
    Post {
        /// Message text (1-250 characters after trimming)
        text: String,
    },
    /// Check service liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = BoardClient::new(&cli.url);

    let result = match cli.command {
        Commands::List => client.list_messages().await.and_then(|m| print_json(&m)),
        Commands::Post { text } => client.post_message(&text).await.and_then(|s| print_json(&s)),
        Commands::Health => client.health().await.and_then(|h| print_json(&h)),
    };

    if let Err(e) = result {
        eprintln!("Error ({}): {}", client.base_url(), e);
        if let ClientError::Api {
            correlation_id: Some(id),
            ..
        } = &e
        {
            eprintln!("Correlation ID: {}", id);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
