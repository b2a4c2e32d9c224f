//! Origin anchor server
//!
//! Starts the HTTP server for anchoring and verifying content fingerprints.

use origin_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using an in-memory registry");
        eprintln!("Usage: origin-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    init_tracing(&config);
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Origin Server - Content anchor registry over HTTP");
    println!();
    println!("USAGE:");
    println!("    origin-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - database_path: SQLite file holding the anchor journal");
    println!("    - default_page_size: Page length when 'limit' is omitted (default: 50)");
    println!("    - max_page_size: Largest accepted 'limit' (default: 1000)");
    println!("    - event_buffer: Insertion event channel capacity (default: 1024)");
    println!("    - log_level: Tracing filter when RUST_LOG is unset (default: 'info')");
    println!();
}
