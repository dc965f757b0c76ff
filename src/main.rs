mod bangs;
mod color;
mod error;
mod fetch;
mod profile;
mod store;
mod theme;
mod transparency;

use log::{error, info};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use store::MemoryStore;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quteinit");
    let bang_cache = config_dir.join("bangs.json");

    // The cache never expires on its own; this flag deletes it so the next
    // import refetches the feed.
    if std::env::args().any(|a| a == "--refresh-bangs") && bang_cache.exists() {
        if let Err(e) = fs::remove_file(&bang_cache) {
            error!("could not remove {}: {e}", bang_cache.display());
            return ExitCode::FAILURE;
        }
        info!("removed bang cache {}", bang_cache.display());
    }

    let mut store = MemoryStore::with_defaults();
    match profile::initialize(&mut store, &config_dir, &bang_cache, &fetch::HttpFetch) {
        Ok(summary) => {
            if summary.theme_installed {
                info!("theme installed into {}", config_dir.display());
            }
            info!(
                "profile loaded: {} settings, {} bindings, {} bangs",
                summary.settings, summary.bindings, summary.bangs
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("configuration load failed: {e}");
            ExitCode::FAILURE
        }
    }
}
