pub mod commands;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod feed;
pub mod playlist;
pub mod resolver;
pub mod storage;
pub mod title;
pub mod transport;

use std::sync::Arc;

use commands::Cli;
use config::AppConfig;
use feed::FeedFetcher;
use playlist::PlaylistStore;
use storage::JsonFileStore;
use title::TitleResolver;
use transport::ReqwestTransport;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config_dir = cli.config_dir.unwrap_or_else(config::get_config_dir);
    let config = AppConfig::load(&config_dir);

    let storage = Arc::new(JsonFileStore::new(&config_dir)?);
    log::debug!("Playlist stored under {}", storage.dir().display());
    let transport = Arc::new(ReqwestTransport::new(&config)?);
    let titles = TitleResolver::new(transport.clone(), &config);
    let feeds = FeedFetcher::new(transport, &config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut store = PlaylistStore::new(storage, titles, feeds);
        let mut stdout = std::io::stdout().lock();
        commands::execute(&mut store, cli.command, &mut stdout).await
    })
}
