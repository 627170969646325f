use anyhow::Result;
use clap::Parser;

use app_token_server::cache::manager::TokenCacheManager;
use app_token_server::config::loader;
use app_token_server::provider::client::ProviderClient;
use app_token_server::server::server;
use app_token_server::store::file_store::FileStore;
use app_token_server::utils::logging;
use app_token_server::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "app-token-server.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = loader::file_to_config(std::path::Path::new(&args.config)).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build provider client and token store
    // -------------------------------

    let provider = ProviderClient::new(&service_config.provider)?;
    let store = FileStore::new(&service_config.cache.path);

    // -------------------------------
    // 3. Assemble the cache manager
    // -------------------------------

    let subject_id = match &service_config.provider.subject_id {
        Some(value) => value.resolve()?,
        None => String::new(),
    };
    let manager = TokenCacheManager::new(
        provider,
        store,
        service_config.provider.base_url.clone(),
        subject_id,
    );

    // -------------------------------
    // 4. Serve /auth (and /metrics when enabled)
    // -------------------------------

    info!("Service starting...");
    server::start(&service_config.settings, manager).await?;

    Ok(())
}
