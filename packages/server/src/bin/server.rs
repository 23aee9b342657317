//! WebSocket relay server.
//!
//! Every message a client sends is broadcast to all connected clients, sender included.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fanout-server
//! cargo run --bin fanout-server -- --host 127.0.0.1 --port 8080 --max-connections 100
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use fanout_server::{
    infrastructure::registry::InMemoryConnectionRegistry,
    ui::{Server, ServerConfig},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetStatusUseCase, RelayMessageUseCase,
    },
};
use fanout_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "fanout-server")]
#[command(about = "WebSocket relay that broadcasts every message to every client", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// Directory served for non-WebSocket requests
    #[arg(short = 'd', long, default_value = "./public")]
    public_dir: PathBuf,

    /// Maximum number of simultaneous connections (unbounded if omitted)
    #[arg(short = 'm', long)]
    max_connections: Option<usize>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        public_dir: args.public_dir,
        max_connections: args.max_connections,
    };

    // Initialize dependencies in order:
    // 1. Registry
    // 2. UseCases
    // 3. Server

    // 1. Create Registry (in-memory set of live connections)
    let registry = Arc::new(InMemoryConnectionRegistry::with_max_connections(
        config.max_connections,
    ));

    // 2. Create UseCases
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(registry.clone()));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(registry.clone()));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(registry.clone()));
    let get_status_usecase = Arc::new(GetStatusUseCase::new(registry));

    // 3. Create and run the server
    let server = Server::new(
        config,
        connect_client_usecase,
        disconnect_client_usecase,
        relay_message_usecase,
        get_status_usecase,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
