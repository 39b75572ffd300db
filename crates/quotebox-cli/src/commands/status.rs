//! Status command handler

use anyhow::Result;

use quotebox_core::storage::QUOTES_KEY;
use quotebox_core::{Config, FileStorage, QuoteStore, Selector};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &QuoteStore, selector: &Selector, config: &Config, output: &Output) -> Result<()> {
    let storage = FileStorage::new(&config.data_dir);
    let snapshot_size = storage.size_of(QUOTES_KEY);
    let categories = store.categories();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "quotes": store.len(),
                    "categories": categories,
                    "filter": selector.current_filter().as_str(),
                    "sync_enabled": config.sync_enabled,
                    "sync_url": config.sync_url,
                    "sync_interval_secs": config.sync_interval().as_secs(),
                    "storage": {
                        "data_dir": config.data_dir,
                        "snapshot_exists": storage.exists(QUOTES_KEY),
                        "snapshot_size": snapshot_size
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Quotebox Status");
            println!("===============");
            println!();
            println!("Quotes:");
            println!("  Count:      {}", store.len());
            println!("  Categories: {}", categories.join(", "));
            println!("  Filter:     {}", selector.current_filter());
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.sync_active() {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.sync_url {
                println!("  Server:   {}", url);
            }
            println!("  Interval: {}s", config.sync_interval().as_secs());
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            if storage.exists(QUOTES_KEY) {
                println!("  Size:     {}", human_size(snapshot_size));
            } else {
                println!("  Size:     (built-in quotes only, nothing saved yet)");
            }
        }
    }

    Ok(())
}

/// Format a byte count for display
fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
