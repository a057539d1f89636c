//! Follow state changes made by other processes.
//!
//! Polls the storage file; every change found is re-published on the event
//! bus with a `sync` action and printed as one JSON line.

use std::time::Duration;

use eliteshop_storefront::Storefront;
use eliteshop_storefront::store::FileStore;

/// Watch until Ctrl-C.
#[allow(clippy::print_stdout)]
pub async fn run(storefront: &Storefront, file: &FileStore, interval_ms: u64) {
    let _printer = storefront.events().subscribe_scoped(|event| {
        match serde_json::to_string(event) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode event"),
        }
    });

    tracing::info!(path = %file.path().display(), "watching for changes");
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(50)));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match file.refresh() {
                    Ok(changes) if !changes.is_empty() => {
                        tracing::debug!(changes = changes.len(), "storage changed");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "failed to re-read storage"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopped watching");
                break;
            }
        }
    }
}
