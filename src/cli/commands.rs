//! Command implementations for LKG Loader CLI
//!
//! Each handler receives the fully layered [`AppConfig`] and builds the
//! pieces it needs from it.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::app::{
    hash_text, AppContext, DatasetLoader, HttpFetcher, LkgStore, LoadResult, Provenance, Row,
};
use crate::cli::args::{CacheAction, CacheArgs, HashArgs, LoadArgs};
use crate::cli::progress::load_spinner;
use crate::config::AppConfig;
use crate::constants::display::DEFAULT_PREVIEW_ROWS;
use crate::errors::{AppError, LoadError, Result};

/// Handle the load command
pub async fn handle_load(args: LoadArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let sources = config.sources()?;
    let (cache_config, client_config) = config.to_runtime_config();
    let store = LkgStore::open_or_memory(&cache_config);
    let fetcher = Arc::new(HttpFetcher::with_config(&client_config)?);

    info!("Loading dataset from {}", sources.manifest_url());
    let ctx = AppContext::new(DatasetLoader::new(sources, fetcher, store));

    let start_time = Instant::now();
    let spinner = load_spinner("📡 Loading dataset...", !quiet && !args.json);
    let outcome = ctx.dataset().await;
    spinner.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(LoadError::NoDataAvailable { cause }) => {
            return Err(LoadError::NoDataAvailable {
                cause: cause.clone(),
            }
            .into())
        }
        Err(other) => return Err(AppError::generic(other.to_string())),
    };

    if args.json {
        let limit = args.limit.unwrap_or(result.rows.len());
        println!("{}", render_json(result, limit)?);
        return Ok(());
    }

    println!(
        "✅ Loaded {} rows in {:.1}s",
        result.len(),
        start_time.elapsed().as_secs_f64()
    );
    print!("{}", describe_provenance(&result.meta));
    println!();
    print!(
        "{}",
        render_preview(result, args.limit.unwrap_or(DEFAULT_PREVIEW_ROWS))
    );
    Ok(())
}

/// Handle cache management commands
pub async fn handle_cache(args: CacheArgs, config: &AppConfig) -> Result<()> {
    let (cache_config, _) = config.to_runtime_config();
    let store = LkgStore::open(&cache_config)?;

    match args.action {
        CacheAction::Info => {
            println!("📦 Last-known-good cache");
            println!("=======================");
            println!("Location: {}", store.location());
            match store.load() {
                Some(cached) => {
                    println!("Rows: {}", cached.len());
                    print!("{}", describe_provenance(&cached.meta));
                }
                None => println!("No cached copy"),
            }
        }
        CacheAction::Clear => {
            store.clear()?;
            info!("Cleared last-known-good copy at {}", store.location());
            println!("🗑️  Cleared cached copy at {}", store.location());
        }
    }
    Ok(())
}

/// Handle the hash command
pub async fn handle_hash(args: HashArgs) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.file).await?;
    println!("{}  {}", hash_text(&text), args.file.display());
    Ok(())
}

/// JSON view of a load, rows truncated to `limit`
#[derive(Serialize)]
struct JsonOutput<'a> {
    rows: &'a [Row],
    meta: &'a Provenance,
}

fn render_json(result: &LoadResult, limit: usize) -> Result<String> {
    let output = JsonOutput {
        rows: &result.rows[..limit.min(result.rows.len())],
        meta: &result.meta,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn describe_provenance(meta: &Provenance) -> String {
    let mut out = String::new();
    out.push_str(&format!("Source: {}\n", meta.source));
    if let Some(manifest) = &meta.manifest {
        out.push_str(&format!("Payload: {}\n", manifest.url));
        if let Some(version) = &manifest.version {
            out.push_str(&format!("Version: {}\n", version));
        }
        if let Some(schema_version) = &manifest.schema_version {
            out.push_str(&format!("Schema version: {}\n", schema_version));
        }
    }
    if let Some(fetched_at) = meta.fetched_at {
        out.push_str(&format!("Fetched at: {}\n", fetched_at.to_rfc3339()));
    }
    out
}

/// Tab-separated preview of the first `limit` rows
fn render_preview(result: &LoadResult, limit: usize) -> String {
    let columns = result.columns();
    let mut out = String::new();
    if columns.is_empty() {
        return out;
    }

    out.push_str(&format!("{}\n", columns.join("\t")));
    for row in result.rows.iter().take(limit) {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| row.get(*column).map(ToString::to_string).unwrap_or_default())
            .collect();
        out.push_str(&format!("{}\n", cells.join("\t")));
    }

    if result.len() > limit {
        out.push_str(&format!("... {} more rows\n", result.len() - limit));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{CellValue, Manifest};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_result() -> LoadResult {
        let rows = (1..=3)
            .map(|i| {
                let mut row = Row::new();
                row.insert("a".to_string(), CellValue::from(i.to_string().as_str()));
                row.insert("b".to_string(), CellValue::Empty);
                row
            })
            .collect();
        LoadResult {
            rows,
            meta: Provenance::network(Manifest {
                url: "d.csv".to_string(),
                version: Some("7".to_string()),
                schema_version: None,
                sha256: None,
            }),
        }
    }

    #[test]
    fn test_render_preview_truncates() {
        let preview = render_preview(&sample_result(), 2);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines, vec!["a\tb", "1\t", "2\t", "... 1 more rows"]);
    }

    #[test]
    fn test_render_json_limit() {
        let json = render_json(&sample_result(), 1).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 1);
        assert_eq!(value["rows"][0]["a"], "1");
        assert!(value["rows"][0]["b"].is_null());
        assert_eq!(value["meta"]["source"], "network");

        // Limits beyond the row count are clamped
        let json = render_json(&sample_result(), 100).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_describe_provenance() {
        let result = sample_result();
        let text = describe_provenance(&result.meta);
        assert!(text.contains("Source: network"));
        assert!(text.contains("Payload: d.csv"));
        assert!(text.contains("Version: 7"));
        assert!(text.contains("Fetched at: "));

        let cached = describe_provenance(&result.meta.clone().into_cached());
        assert!(cached.contains("Source: cache"));
    }

    #[tokio::test]
    async fn test_handle_hash_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("d.csv");
        tokio::fs::write(&path, "a,b\n1,2").await.unwrap();

        assert!(handle_hash(HashArgs { file: path }).await.is_ok());

        let missing = HashArgs {
            file: temp_dir.path().join("missing.csv"),
        };
        assert!(matches!(
            handle_hash(missing).await,
            Err(AppError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_handle_cache_clear_and_info() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.cache.cache_root = Some(PathBuf::from(temp_dir.path()));

        let (cache_config, _) = config.to_runtime_config();
        let store = LkgStore::open(&cache_config).unwrap();
        let result = sample_result();
        store.save(&result.meta, &result.rows).unwrap();

        let info = CacheArgs {
            action: CacheAction::Info,
        };
        handle_cache(info, &config).await.unwrap();
        assert!(store.load().is_some());

        let clear = CacheArgs {
            action: CacheAction::Clear,
        };
        handle_cache(clear, &config).await.unwrap();
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn test_handle_load_requires_manifest_url() {
        let args = LoadArgs {
            json: false,
            limit: None,
        };
        let err = handle_load(args, &AppConfig::default(), true)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_render_preview_keeps_header_order() {
        let mut row = Row::new();
        row.insert("zeta", CellValue::from("1"));
        row.insert("alpha", CellValue::from("2"));
        let result = LoadResult {
            rows: vec![row],
            meta: sample_result().meta,
        };
        let preview = render_preview(&result, 5);
        assert_eq!(preview.lines().collect::<Vec<_>>(), vec!["zeta\talpha", "1\t2"]);
    }

    #[tokio::test]
    async fn test_handle_load_survives_unusable_cache_directory() {
        // Bind then drop to get a port nobody is listening on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let blocker = tempfile::NamedTempFile::new().unwrap();
        let mut config = AppConfig::default();
        config.source.manifest_url = Some(format!("{}/manifest.json", base));
        config.cache.cache_root = Some(blocker.path().join("cache"));
        config.client.request_timeout_secs = 5;
        config.client.connect_timeout_secs = 5;

        let args = LoadArgs {
            json: true,
            limit: None,
        };
        let err = handle_load(args, &config, true).await.unwrap_err();
        assert_eq!(err.category(), "load");
        assert!(err.to_string().contains("No data available"));
    }
}
