//! Polling watcher that reloads the config file when its modification time changes.
//!
//! Only the in-memory snapshot is swapped and the callback invoked; callers decide
//! what to re-apply. Pool, CORS and token verifier settings stay as built at startup.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use arc_swap::ArcSwap;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{parse, AppConfig};

async fn modified(path: &PathBuf) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

async fn reload(path: &PathBuf) -> anyhow::Result<AppConfig> {
    let content = tokio::fs::read_to_string(path).await?;
    let mut cfg = parse(&content)?;
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

/// Spawn the watcher. The task lives until the runtime shuts down.
pub fn watch<F>(
    path: impl Into<PathBuf>,
    current: Arc<ArcSwap<AppConfig>>,
    interval: Duration,
    on_change: F,
) -> JoinHandle<()>
where
    F: Fn(&AppConfig) + Send + Sync + 'static,
{
    let path = path.into();
    tokio::spawn(async move {
        let mut last = modified(&path).await;
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let now = modified(&path).await;
            if now.is_none() || now == last {
                continue;
            }
            last = now;
            match reload(&path).await {
                Ok(next) => {
                    let prev = current.load_full();
                    if prev.database != next.database
                        || prev.cors != next.cors
                        || prev.oauth != next.oauth
                        || prev.server != next.server
                    {
                        warn!(
                            event = "config_reload_partial",
                            path = %path.display(),
                            "server, database, oauth and cors changes take effect after restart"
                        );
                    }
                    let next = Arc::new(next);
                    current.store(Arc::clone(&next));
                    on_change(&next);
                    info!(event = "config_reloaded", path = %path.display(), "configuration reloaded");
                }
                Err(e) => {
                    warn!(event = "config_reload_failed", path = %path.display(), error = %e, "keeping previous configuration");
                }
            }
        }
    })
}
