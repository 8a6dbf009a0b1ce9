//! Status command - show cache location and disk usage

use crate::cache::{format_bytes, CacheResolver};
use crate::config::{Config, ConfigManager};
use crate::error::PlateResult;
use crate::remote::create_source;
use crate::ui::{self, UiContext};

/// Execute the status command
pub async fn execute(config: &Config, manager: &ConfigManager) -> PlateResult<()> {
    let ctx = UiContext::detect();
    let source = create_source(config);
    let resolver = CacheResolver::from_config(config, source.clone());
    let store = resolver.store();

    ui::section(&ctx, "platecache status");
    ui::key_value(&ctx, "Config", &manager.path().display().to_string());
    ui::key_value_status(
        &ctx,
        "Cache directory",
        &store.dir().display().to_string(),
        store.dir().is_dir(),
    );

    let usage = store.usage().await?;
    ui::key_value(&ctx, "Images", &usage.files.to_string());
    ui::key_value(&ctx, "Size", &format_bytes(usage.bytes));

    ui::key_value(&ctx, "Source", source.name());
    let probe = if config.http.probe {
        format!("on ({}ms)", config.http.probe_timeout_ms)
    } else {
        "off".to_string()
    };
    ui::key_value(&ctx, "Probe", &probe);
    ui::key_value(
        &ctx,
        "Placeholder",
        config.cache.placeholder.as_deref().unwrap_or("(original URL)"),
    );

    Ok(())
}
