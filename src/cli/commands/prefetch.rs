//! Prefetch command - warm the cache ahead of time

use crate::cache::CacheResolver;
use crate::cli::args::PrefetchArgs;
use crate::config::Config;
use crate::error::PlateResult;
use crate::remote::create_source;
use crate::ui::{self, FetchProgress, UiContext};
use futures_util::stream::{FuturesUnordered, StreamExt};

/// Execute the prefetch command
pub async fn execute(args: PrefetchArgs, config: &Config) -> PlateResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();
    config.cache.optimize_urls |= args.optimize;

    let resolver = CacheResolver::from_config(&config, create_source(&config));
    let urls: Vec<String> = args
        .urls
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .collect();

    let progress = FetchProgress::new(&ctx, urls.len() as u64);
    let mut pending: FuturesUnordered<_> = urls
        .iter()
        .map(|url| {
            let resolver = resolver.clone();
            async move {
                let resolution = resolver.resolve(url).await;
                (url, resolution)
            }
        })
        .collect();

    let mut unavailable = Vec::new();
    while let Some((url, resolution)) = pending.next().await {
        if !resolution.from_cache {
            unavailable.push(url);
        }
        progress.on_done(url, resolution.from_cache);
    }
    progress.finish();

    let cached = urls.len() - unavailable.len();
    if unavailable.is_empty() {
        ui::step_ok(&ctx, &format!("Cached {} image(s)", cached));
    } else {
        // The bar hides per-image results
        if ctx.decorated() {
            for url in &unavailable {
                ui::step_error_detail(&ctx, "Unavailable", url);
            }
        }
        ui::step_warn_hint(
            &ctx,
            &format!("Cached {} image(s), {} unavailable", cached, unavailable.len()),
            "Run with -v to see why",
        );
    }

    Ok(())
}
