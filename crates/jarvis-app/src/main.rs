mod chat;
mod cli;

use std::process::ExitCode;

use jarvis_common::JarvisError;
use jarvis_config::JarvisConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::chat::ChatLoop;

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Variables already set in the process environment win.
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/jarvis-app/
        manifest_dir.join("..").join("..").join(".env"),
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return;
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim(), value)
        })
        .collect()
}

fn init_logging(directive: &str) {
    let directive = directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: cli::Args, config: JarvisConfig) -> Result<(), JarvisError> {
    let mut chat = ChatLoop::start(&args, config).await?;
    let result = chat.run().await;
    chat.shutdown().await;
    result
}

fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();
    let loaded = jarvis_config::load_config(args.config.as_deref());

    let log_directive = args.log_level.clone().unwrap_or_else(|| {
        loaded
            .as_ref()
            .map(|config| config.logging.level.directive())
            .unwrap_or("info")
            .to_string()
    });
    init_logging(&log_directive);

    tracing::info!("Jarvis v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            tracing::error!("Config load failed: {e}");
            eprintln!("jarvis: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            JarvisConfig::default()
        }
    };
    tracing::info!(
        assistant = %config.assistant.name,
        model = %config.assistant.model,
        mode = ?config.runs.mode,
        "Config loaded"
    );

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("jarvis: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args, config)) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Jarvis failed: {e}");
            eprintln!("jarvis: {e}");
            ExitCode::FAILURE
        }
    }
}
