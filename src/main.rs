use tracing::{error, info};

use corkboard::{Application, Config};

#[tokio::main]
async fn main() {
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = corkboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        corkboard::logging::init_console_only(&config.logging.level);
    }

    info!("corkboard - multi-user board platform");

    let app = match Application::open(config).await {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Failed to start");
            std::process::exit(1);
        }
    };

    match app.boards().list_default_page(0).await {
        Ok(page) => info!(
            boards = page.plan.total_items,
            pages = page.plan.total_pages,
            "Board listing available"
        ),
        Err(e) => error!(error = %e, "Failed to read board listing"),
    }
}
