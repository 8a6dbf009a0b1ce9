//! Resolve command - turn image URLs into renderable URIs

use crate::cache::{CacheResolver, Resolution};
use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::config::Config;
use crate::error::PlateResult;
use crate::remote::create_source;
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct ResolveJson<'a> {
    url: &'a str,
    #[serde(flatten)]
    resolution: &'a Resolution,
}

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> PlateResult<()> {
    let mut config = config.clone();
    if args.placeholder.is_some() {
        config.cache.placeholder = args.placeholder;
    }
    config.cache.optimize_urls |= args.optimize;
    if args.no_probe {
        config.http.probe = false;
    }

    let resolver = CacheResolver::from_config(&config, create_source(&config));
    let resolutions = resolver.prefetch(&args.urls).await;
    let urls: Vec<&str> = args
        .urls
        .iter()
        .map(String::as_str)
        .filter(|url| !url.trim().is_empty())
        .collect();

    match args.format {
        OutputFormat::Table => print_table(&urls, &resolutions),
        OutputFormat::Json => print_json(&urls, &resolutions)?,
        OutputFormat::Plain => {
            for resolution in &resolutions {
                println!("{}", resolution.display_uri);
            }
        }
    }

    Ok(())
}

fn print_table(urls: &[&str], resolutions: &[Resolution]) {
    println!("{:<10} {:<50} {}", "SOURCE", "URL", "DISPLAY");
    println!("{}", "-".repeat(100));

    for (url, resolution) in urls.iter().zip(resolutions) {
        let source = if resolution.from_cache {
            style("cache").green().to_string()
        } else {
            style("fallback").yellow().to_string()
        };
        println!("{:<10} {:<50} {}", source, url, resolution.display_uri);
    }

    let hits = resolutions.iter().filter(|r| r.from_cache).count();
    println!();
    println!("Total: {} cached, {} fallback", hits, resolutions.len() - hits);
}

fn print_json(urls: &[&str], resolutions: &[Resolution]) -> PlateResult<()> {
    let rows: Vec<ResolveJson<'_>> = urls
        .iter()
        .copied()
        .zip(resolutions)
        .map(|(url, resolution)| ResolveJson { url, resolution })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_row_flattens_resolution() {
        let resolution = Resolution::fallback("asset://placeholder.png");
        let row = ResolveJson {
            url: "https://cdn.example/missing.jpg",
            resolution: &resolution,
        };
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["url"], "https://cdn.example/missing.jpg");
        assert_eq!(value["display_uri"], "asset://placeholder.png");
        assert_eq!(value["from_cache"], false);
    }
}
