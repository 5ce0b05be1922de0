//! Taiwan stock chat bot CLI
//!
//! Reads one command per line from stdin and prints the replies.
//!
//! # Usage
//!
//! ```bash
//! # Interactive
//! cargo run --bin stock-bot -p twstock-bot
//!
//! # One-shot
//! cargo run --bin stock-bot -p twstock-bot -- -c "/daily 2330 20250101 20250110"
//! ```

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use twstock_bot::bot::StockBot;
use twstock_bot::config::BotConfig;
use twstock_bot::interface::MessageSink;
use twstock_bot::platforms::StdoutSink;
use twstock_bot::provider::TwseProvider;

#[derive(Parser, Debug)]
#[command(name = "stock-bot")]
#[command(about = "Chat-style lookups of Taiwan stock exchange data", long_about = None)]
struct Args {
    /// Phrase table JSON file (exact message → reply)
    #[arg(long)]
    phrases: Option<PathBuf>,

    /// Most reply messages allowed per command
    #[arg(long)]
    max_replies: Option<usize>,

    /// Run a single message and exit
    #[arg(short, long)]
    command: Option<String>,
}

const PROMPT: &str = ">>> ";

fn print_banner() {
    println!(
        r#"
╔══════════════════════════════════════════════════╗
║                Taiwan Stock Bot                  ║
║                                                  ║
║  /help                     - all commands        ║
║  /price 2330               - real-time quote     ║
║  /daily 2330 20250101 20250110                   ║
║  /pricetrend 2330 20250101 20250331 month        ║
║                                                  ║
║  Ctrl-D to quit                                  ║
╚══════════════════════════════════════════════════╝
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = twstock_utils::Config::from_env();
    twstock_utils::init_tracing(&app_config);

    let args = Args::parse();

    let mut builder = BotConfig::builder();
    if let Some(path) = args.phrases {
        builder = builder.phrase_table_path(path);
    }
    if let Some(max) = args.max_replies {
        builder = builder.max_replies(max);
    }
    let config = builder.with_env().build()?;

    info!("Starting {} ({})", app_config.app_name, app_config.environment);

    let provider = Arc::new(TwseProvider::new(&config)?);
    let bot = StockBot::new(&config, provider)?;
    let sink = StdoutSink::new();

    if let Some(command) = args.command {
        bot.process(&command, &sink).await?;
        return Ok(());
    }

    print_banner();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{PROMPT}");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            continue;
        }

        let replies = bot.respond(input).await;
        if let Err(e) = sink.send(&replies).await {
            eprintln!("Error writing reply: {e}");
        }
    }

    Ok(())
}
