//! Quiz event gateway example
//!
//! Run with: cargo run --example quiz_server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example quiz_server                    # binds to 0.0.0.0:8080
//!   cargo run --example quiz_server localhost          # binds to 127.0.0.1:8080
//!   cargo run --example quiz_server 127.0.0.1:9000     # binds to 127.0.0.1:9000
//!
//! ## Subscribe to a stream
//!
//! With curl:
//!   curl -N -H 'Authorization: Bearer secret-42' http://localhost:8080/events/stats
//!   curl -N 'http://localhost:8080/events/notifications?token=secret-42'
//!
//! From a browser:
//!   new EventSource("http://localhost:8080/events/stats?token=secret-42")
//!
//! The first frame is the synthetic connect event ({"type":"refresh"} or
//! {"type":"ready"}); afterwards the demo publishes a fake quiz result for
//! user 42 every 10 seconds, with keep-alive comments in between.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;

use quizpulse::{
    EventServer, NotificationEvent, ServerConfig, StatsEvent, TokenAuthenticator,
};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8080
/// - "localhost:9000" -> 127.0.0.1:9000
/// - "127.0.0.1" -> 127.0.0.1:8080
/// - "0.0.0.0:9000" -> 0.0.0.0:9000
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 8080;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: quiz_server [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:8080)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  quiz_server                     # binds to 0.0.0.0:8080");
    eprintln!("  quiz_server localhost           # binds to 127.0.0.1:8080");
    eprintln!("  quiz_server 127.0.0.1:9000      # binds to 127.0.0.1:9000");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:8080".parse()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizpulse=debug".parse()?)
                .add_directive("quiz_server=debug".parse()?),
        )
        .init();

    let config = ServerConfig::default().bind(bind_addr);
    let auth = TokenAuthenticator::new()
        .with_token("secret-42", 42)
        .with_token("secret-7", 7);

    println!("Starting quiz event gateway on {}", config.bind_addr);
    println!();
    println!("=== Subscribe ===");
    println!("curl -N -H 'Authorization: Bearer secret-42' http://localhost:8080/events/stats");
    println!("curl -N 'http://localhost:8080/events/notifications?token=secret-42'");
    println!();

    let server = EventServer::new(config, auth);

    // Stand-in for domain mutation handlers: publish fake activity for
    // user 42 so subscribers see live frames.
    let publisher = server.publisher();
    tokio::spawn(async move {
        let mut score: i64 = 60;
        let mut ticker = tokio::time::interval(Duration::from_secs(10));
        ticker.tick().await; // skip the immediate first tick

        loop {
            ticker.tick().await;
            score = 60 + (score + 7) % 40;

            publisher
                .publish_stats(42, StatsEvent::quiz_completed(score))
                .await;

            let mut data = serde_json::Map::new();
            data.insert("quiz".to_string(), json!("daily-challenge"));
            publisher
                .publish_notification(
                    42,
                    NotificationEvent::with_data("quiz_reminder", data),
                )
                .await;
        }
    });

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    Ok(())
}
