//! snippetd server binary.

use std::process::exit;

use snippetd::{logging, Config, Database, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            Config::default()
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: failed to initialize log file: {e}");
        logging::init_console_only(&config.logging.level);
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            exit(1);
        }
    };

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        exit(1);
    }
}
