use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use intake_panel_lib::config::{load_config, load_config_from_path};
use intake_panel_lib::services::logger::init_tracing;
use intake_panel_lib::services::{MemoryNotifier, NotificationLevel};
use serde_json::json;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config_from_path(&PathBuf::from(path)),
        None => load_config(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting intake panel ...");

    let notifier = Arc::new(MemoryNotifier::new());
    let snapshot = match intake_panel_lib::run(&config, notifier.clone()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = json!({
        "panel": snapshot,
        "notifications": notifier.notifications(),
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!("Failed to render snapshot: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if notifier.messages(NotificationLevel::Error).is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
