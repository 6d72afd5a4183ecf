//! Sana CLI - interactive front end for the Sana chat client.
//!
//! Stands in for the mobile presentation layer: it only consumes the
//! read surface the session controller exposes.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sana_chat::{ChatConfig, ChatSession, ConnectivityMonitor, HttpChatApi, SendOutcome};
use sana_core::{Message, Sender};
use sana_store::{FileStore, KeyValueStore};

/// Sana - wellness assistant chat client
#[derive(Parser)]
#[command(name = "sana")]
#[command(about = "CLI for the Sana wellness chat", long_about = None)]
struct Cli {
    /// Remote chat endpoint base URL
    #[arg(short, long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Directory for persisted conversations
    #[arg(short, long, default_value = ".sana")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,
    /// Print the active conversation history
    History,
    /// List saved conversations
    Summaries,
    /// Clear the active conversation
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let config = ChatConfig::new(cli.base_url);
    let api = Arc::new(HttpChatApi::new(config.clone()));
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(cli.data_dir).await?);

    let mut session = ChatSession::new(api.clone(), store);
    session.initialize().await;

    match cli.command {
        Commands::Chat => chat_loop(&mut session, api, &config).await?,
        Commands::History => print_history(session.messages()),
        Commands::Summaries => print_summaries(&session).await,
        Commands::Clear => {
            session.clear_conversation().await;
            println!("Conversation cleared.");
        }
    }

    Ok(())
}

async fn chat_loop(
    session: &mut ChatSession,
    api: Arc<HttpChatApi>,
    config: &ChatConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let monitor = ConnectivityMonitor::new(api, session.connectivity_flag(), config);
    let _monitor = monitor.spawn();

    print_history(session.messages());
    println!("(type /clear to reset, /quit to exit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(session)?;

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/clear" => {
                session.clear_conversation().await;
                print_history(session.messages());
            }
            _ => match session.send_message(&line).await {
                SendOutcome::Sent => {
                    if let Some(reply) = session.messages().last() {
                        print_message(reply);
                    }
                }
                SendOutcome::Rejected(reason) => println!("(not sent: {reason})"),
            },
        }
        prompt(session)?;
    }

    Ok(())
}

fn prompt(session: &ChatSession) -> std::io::Result<()> {
    print!("[{}] you> ", session.connectivity());
    std::io::stdout().flush()
}

fn print_history(messages: &[Message]) {
    for message in messages {
        print_message(message);
    }
}

fn print_message(message: &Message) {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    let marker = if message.is_error { " (!)" } else { "" };
    println!(
        "[{}] {}{}: {}",
        message.timestamp.format("%H:%M"),
        who,
        marker,
        message.text
    );
}

async fn print_summaries(session: &ChatSession) {
    let summaries = session.summaries().await;
    if summaries.is_empty() {
        println!("No saved conversations.");
        return;
    }
    for summary in summaries {
        println!(
            "{}  {}  ({} messages)  {}",
            summary.timestamp.format("%Y-%m-%d %H:%M"),
            summary.title,
            summary.message_count,
            summary.preview
        );
    }
}
