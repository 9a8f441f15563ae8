use anyhow::Result;
use clap::Parser;
use scanpool::cli::{Args, Commands, PoolConfigFile};
use scanpool::{FileInfo, PoolConfig, ScanPool};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Scan {
            path,
            max_depth,
            workers,
            config,
            json,
            stats,
            verbose,
        } => {
            init_logging(verbose);
            let config_file = PoolConfigFile::discover(config.as_deref())?;
            let mut pool_config = config_file.to_pool_config();
            if let Some(workers) = workers {
                pool_config = pool_config.with_workers(workers);
            }
            run_scan(pool_config, path, max_depth, json, stats).await
        }
        Commands::Analyze {
            file,
            base,
            json,
            verbose,
        } => {
            init_logging(verbose);
            run_analyze(file, base, json).await
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "scanpool=debug"
    } else {
        "scanpool=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_scan(
    pool_config: PoolConfig,
    path: PathBuf,
    max_depth: u32,
    json: bool,
    stats: bool,
) -> Result<()> {
    info!(
        "scanning {} with {} workers",
        path.display(),
        pool_config.max_workers
    );
    let pool = ScanPool::new(pool_config);
    let started = Instant::now();

    let entries = pool.scan_directory_with(&path, "", max_depth).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print_scan_summary(&entries, started.elapsed().as_millis());
    }

    if stats {
        let snapshot = pool.stats().await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    pool.terminate().await?;
    Ok(())
}

async fn run_analyze(file: PathBuf, base: Option<PathBuf>, json: bool) -> Result<()> {
    let base = base
        .or_else(|| file.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let pool = ScanPool::new(PoolConfig::default().with_workers(1));
    let info = pool.analyze_file(&file, "", &base).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_file_info(&info);
    }

    pool.terminate().await?;
    Ok(())
}

fn print_scan_summary(entries: &[FileInfo], elapsed_ms: u128) {
    let files = entries.iter().filter(|e| !e.is_directory).count();
    let directories = entries.len() - files;
    let importable = entries.iter().filter(|e| e.is_importable).count();

    for entry in entries.iter().filter(|e| e.is_importable) {
        let indicators: Vec<&str> = entry
            .project_indicators
            .iter()
            .map(String::as_str)
            .collect();
        if indicators.is_empty() {
            println!("{}", entry.relative_path);
        } else {
            println!("{} [{}]", entry.relative_path, indicators.join(", "));
        }
    }
    println!(
        "{} files, {} directories, {} importable ({} ms)",
        files, directories, importable, elapsed_ms
    );
}

fn print_file_info(info: &FileInfo) {
    println!("path:       {}", info.path.display());
    println!("relative:   {}", info.relative_path);
    println!("size:       {} bytes", info.size);
    let extension = if info.extension.is_empty() {
        "(none)"
    } else {
        info.extension.as_str()
    };
    println!("extension:  {}", extension);
    println!("importable: {}", info.is_importable);
    if !info.project_indicators.is_empty() {
        let indicators: Vec<&str> = info.project_indicators.iter().map(String::as_str).collect();
        println!("indicators: {}", indicators.join(", "));
    }
}
