//! Terminal client for the Fanout relay.
//!
//! Connects to the relay and sends every line typed at the prompt as a message.
//! Displays everything the relay broadcasts, including our own messages.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fanout-client -- --name Alice
//! cargo run --bin fanout-client -- -n Bob -u ws://127.0.0.1:3000/ws/messages
//! ```

use clap::Parser;

use fanout_client::run_client;
use fanout_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "fanout-client")]
#[command(about = "Terminal client for the Fanout WebSocket relay", long_about = None)]
struct Args {
    /// Sender name attached to every message
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket endpoint of the relay
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws/messages")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
