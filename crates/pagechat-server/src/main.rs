//! PageChat — chat with the page you are reading.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use pagechat_server::panels::start_panel_worker;
use pagechat_server::routes::build_router;
use pagechat_server::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("PAGECHAT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                println!("PageChat — chat with the page you are reading");
                println!();
                println!("Usage: pagechat");
                println!();
                println!("Environment:");
                println!("  PORT                 HTTP port (default 3010)");
                println!("  PAGECHAT_DATA_DIR    Data directory (default ./data)");
                println!("  PAGECHAT_ENDPOINT    Chat-completions endpoint");
                println!("  PAGECHAT_MODEL       Model name");
                println!("  RUST_LOG             Log filter (default info)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'pagechat help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = pagechat_core::PageChatConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    info!(
        "Model endpoint: {} ({})",
        state.model_config.endpoint, state.model_config.model
    );

    start_panel_worker(state.clone());

    let app = build_router(state.clone());

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("PageChat server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
