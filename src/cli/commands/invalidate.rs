//! Invalidate command - force images to be fetched again

use crate::cache::CacheResolver;
use crate::cli::args::InvalidateArgs;
use crate::config::Config;
use crate::error::PlateResult;
use crate::remote::create_source;
use crate::ui::{self, UiContext};

/// Execute the invalidate command
pub async fn execute(args: InvalidateArgs, config: &Config) -> PlateResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();
    config.cache.optimize_urls |= args.optimize;

    let resolver = CacheResolver::from_config(&config, create_source(&config));
    let urls: Vec<String> = args
        .urls
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .collect();

    resolver.invalidate_all(&urls).await;

    ui::step_ok(&ctx, &format!("Invalidated {} image(s)", urls.len()));
    Ok(())
}
