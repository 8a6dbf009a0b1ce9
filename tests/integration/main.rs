//! Integration tests for platecache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use platecache::cache::{derive_key, optimize_uri};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and cache
    fn platecache(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("platecache");
        cmd.env("PLATECACHE_CONFIG", temp.path().join("config.toml"))
            .env("PLATECACHE_DIR", temp.path().join("images"))
            .env("CI", "1");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("image cache"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("platecache"));
    }

    #[test]
    fn status_on_empty_cache() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Images: 0"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn config_init_writes_file() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));
        assert!(temp.path().join("config.toml").exists());
    }

    #[test]
    fn invalid_config_reports_hint() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "[cache]\nextension = \"\"\n").unwrap();
        platecache(&temp)
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn resolve_unreachable_returns_placeholder() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .args([
                "resolve",
                "http://127.0.0.1:9/missing.jpg",
                "--placeholder",
                "asset://placeholder.png",
                "-f",
                "plain",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("asset://placeholder.png"));
    }

    #[test]
    fn resolve_unreachable_json() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .args(["resolve", "http://127.0.0.1:9/missing.jpg", "-f", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"from_cache\": false"))
            .stdout(predicate::str::contains(
                "\"display_uri\": \"http://127.0.0.1:9/missing.jpg\"",
            ));
    }

    #[test]
    fn invalidate_unknown_url() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .args(["invalidate", "https://cdn.example/a.jpg"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Invalidated 1 image(s)"));
    }

    #[test]
    fn invalidate_skips_blank_urls() {
        let temp = TempDir::new().unwrap();
        platecache(&temp)
            .args(["invalidate", "", "  ", "https://cdn.example/a.jpg"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Invalidated 1 image(s)"));
    }

    #[test]
    fn invalidate_optimized_removes_rewritten_file() {
        let temp = TempDir::new().unwrap();
        let images = temp.path().join("images");
        let url = "https://res.cloudinary.com/demo/image/upload/meal.jpg";
        let cached = images.join(
            derive_key(&optimize_uri(url))
                .unwrap()
                .file_name("img_", "jpg"),
        );
        std::fs::create_dir_all(&images).unwrap();
        std::fs::write(&cached, b"jpeg").unwrap();

        // Without --optimize the plain URL's key is targeted
        platecache(&temp).args(["invalidate", url]).assert().success();
        assert!(cached.exists());

        platecache(&temp)
            .args(["invalidate", "--optimize", url])
            .assert()
            .success();
        assert!(!cached.exists());
    }

    #[test]
    fn clear_without_yes_is_noop_in_ci() {
        let temp = TempDir::new().unwrap();
        let images = temp.path().join("images");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::write(images.join("img_0011223344556677.jpg"), b"jpeg").unwrap();

        platecache(&temp)
            .arg("clear")
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing removed"));
        assert!(images.join("img_0011223344556677.jpg").exists());
    }

    #[test]
    fn clear_with_yes_removes_images() {
        let temp = TempDir::new().unwrap();
        let images = temp.path().join("images");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::write(images.join("img_0011223344556677.jpg"), b"jpeg").unwrap();

        platecache(&temp)
            .args(["clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1 cached image(s)"));
        assert!(!images.join("img_0011223344556677.jpg").exists());
    }
}

mod scenario_tests {
    use platecache::cache::{
        derive_key, CacheResolver, EntryState, LocalStore, Prober, Resolution, ResolverOptions,
        StoreLayout,
    };
    use platecache::config::Config;
    use platecache::remote::{MemorySource, RemoteSource};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    const PLACEHOLDER: &str = "asset://placeholder.png";

    fn resolver(temp: &TempDir, source: &Arc<MemorySource>) -> CacheResolver {
        let mut config = Config::default();
        config.cache.dir = Some(temp.path().join("images"));
        config.cache.placeholder = Some(PLACEHOLDER.to_string());
        CacheResolver::from_config(&config, source.clone())
    }

    #[tokio::test]
    async fn happy_path() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(MemorySource::new());
        let u = "https://cdn.example/a.jpg";
        source.serve(u, b"\xff\xd8\xff".to_vec());

        let resolution = resolver(&temp, &source).resolve(u).await;

        let expected = temp
            .path()
            .join("images")
            .join(format!("img_{}.jpg", derive_key(u).unwrap()));
        assert_eq!(
            resolution,
            Resolution {
                display_uri: expected.display().to_string(),
                from_cache: true,
            }
        );
        assert_eq!(std::fs::read(expected).unwrap(), b"\xff\xd8\xff");
    }

    #[tokio::test]
    async fn unreachable_image() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(MemorySource::new());
        let u = "https://cdn.example/missing.jpg";
        let resolver = resolver(&temp, &source);

        let resolution = resolver.resolve(u).await;

        assert_eq!(resolution, Resolution::fallback(PLACEHOLDER));
        assert!(!resolver.store().has(&derive_key(u).unwrap()).await);
        assert_eq!(source.download_count(), 0);
    }

    #[tokio::test]
    async fn refresh_after_edit() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(MemorySource::new());
        let u1 = "https://cdn.example/meal/1.jpg";
        let u2 = "https://cdn.example/meal/2.jpg";
        source.serve(u1, b"v1".to_vec());
        source.serve(u2, b"v2".to_vec());
        let resolver = resolver(&temp, &source);

        let before = resolver.resolve(u1).await;
        assert_eq!(resolver.state(u1), EntryState::Ready);

        // Photo replaced upstream, same URL
        source.serve(u1, b"v1-edited".to_vec());
        resolver.invalidate_all([u1]).await;
        let results = resolver.prefetch([u1, u2]).await;

        assert_eq!(results[0], before);
        assert_eq!(std::fs::read(&before.display_uri).unwrap(), b"v1-edited");
        assert!(results[1].from_cache);
        assert_eq!(source.download_count(), 3);
    }

    #[tokio::test]
    async fn many_images_at_cold_start() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(MemorySource::new().with_latency(Duration::from_millis(10)));
        let urls: Vec<String> = (0..24)
            .map(|i| format!("https://cdn.example/meal/{}.jpg", i % 8))
            .collect();
        for url in &urls {
            source.serve(url, url.as_bytes().to_vec());
        }
        let resolver = resolver(&temp, &source);

        let results = resolver.prefetch(&urls).await;

        assert!(results.iter().all(|r| r.from_cache));
        assert_eq!(source.head_count(), 8);
        assert_eq!(source.download_count(), 8);
        assert_eq!(resolver.store().usage().await.unwrap().files, 8);
    }

    #[tokio::test]
    async fn clones_share_registry() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(MemorySource::new());
        let u = "https://cdn.example/a.jpg";
        source.serve(u, b"x".to_vec());

        let list_screen = resolver(&temp, &source);
        let detail_screen = list_screen.clone();

        list_screen.resolve(u).await;
        assert!(detail_screen.resolve(u).await.from_cache);
        assert_eq!(source.download_count(), 1);
    }

    #[tokio::test]
    async fn probe_disabled_goes_straight_to_download() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(MemorySource::new());
        let u = "https://cdn.example/a.jpg";
        source.serve(u, b"x".to_vec());
        let dyn_source: Arc<dyn RemoteSource> = source.clone();

        let resolver = CacheResolver::new(
            LocalStore::new(
                StoreLayout::new(temp.path()),
                Arc::clone(&dyn_source),
                Duration::from_secs(1),
            ),
            Prober::disabled(dyn_source),
            ResolverOptions::default(),
        );

        assert!(resolver.resolve(u).await.from_cache);
        assert_eq!(source.head_count(), 0);
        assert_eq!(source.download_count(), 1);
    }
}
