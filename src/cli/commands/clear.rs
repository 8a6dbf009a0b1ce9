//! Clear command - remove every cached image

use crate::cache::CacheResolver;
use crate::cli::args::ClearArgs;
use crate::config::Config;
use crate::error::PlateResult;
use crate::remote::create_source;
use crate::ui::{self, UiContext};

/// Execute the clear command
pub async fn execute(args: ClearArgs, config: &Config) -> PlateResult<()> {
    let ctx = UiContext::detect().assuming_yes(args.yes);
    let resolver = CacheResolver::from_config(config, create_source(config));
    let dir = resolver.store().dir().display().to_string();

    if !ui::confirm(&ctx, &format!("Remove all cached images in {}?", dir), false) {
        ui::step_warn_hint(&ctx, "Nothing removed", "Pass --yes to skip the prompt");
        return Ok(());
    }

    let removed = resolver.clear().await?;
    ui::step_ok_detail(&ctx, &format!("Removed {} cached image(s)", removed), &dir);
    Ok(())
}
