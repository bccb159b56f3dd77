//! Collaborative drawing relay server.
//!
//! Relays drawing events between the members of a room and keeps the last
//! canvas snapshot of each room for late joiners.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sketchroom-server -- --port 3001
//! ```

use clap::Parser;
use sketchroom_server::ServerConfig;
use sketchroom_shared::logger::setup_logger;

/// Sketchroom relay server
#[derive(Parser, Debug)]
#[command(name = "sketchroom-server")]
#[command(about = "Real-time collaborative drawing relay")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };

    // Run the server
    if let Err(e) = sketchroom_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
