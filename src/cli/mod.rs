//! farecast CLI Module
//!
//! Command-line interface for preparing cached fare datasets.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cache::FeatureCache;
use crate::config::PipelineConfig;
use crate::pipeline::FarePipeline;
use crate::preprocessing::{Norm, FEATURE_COLUMNS};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<16} {}", muted(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "farecast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Prepare and cache taxi fare feature matrices")]
#[command(long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cache file (overrides the configuration)
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build (or fetch from cache) the feature matrix for the first N rows
    Prepare {
        /// Raw trip CSV
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Number of raw rows to read; also the cache key
        #[arg(short, long, default_value = "10001")]
        nrows: usize,

        /// Required geohash prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Geohash precision in characters
        #[arg(long)]
        precision: Option<usize>,

        /// Row norm (l1, l2, max)
        #[arg(long)]
        norm: Option<String>,
    },

    /// Inspect or clear the dataset cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// List stored dataset sizes and shapes
    List,
    /// Delete the cache file
    Clear,
}

/// Merge the optional configuration file with command-line overrides
pub fn resolve_config(config: Option<&Path>, cache: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let mut resolved = match config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(cache) = cache {
        resolved = resolved.with_cache_path(cache);
    }
    Ok(resolved)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_prepare(
    mut config: PipelineConfig,
    data: Option<&Path>,
    nrows: usize,
    prefix: Option<&str>,
    precision: Option<usize>,
    norm: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(data) = data {
        config = config.with_data_path(data);
    }
    if let Some(prefix) = prefix {
        config = config.with_geohash_prefix(prefix);
    }
    if let Some(precision) = precision {
        config = config.with_geohash_precision(precision);
    }
    if let Some(norm) = norm {
        config = config.with_norm(norm.parse::<Norm>()?);
    }

    section("Prepare");
    kv("Data", &config.data_path.display().to_string());
    kv("Cache", &config.cache_path.display().to_string());
    kv("Rows", &nrows.to_string());

    let pipeline = FarePipeline::new(config)?;
    let was_cached = pipeline.cache().keys()?.contains(&nrows);

    step_run(if was_cached { "Loading from cache" } else { "Computing features" });
    let start = Instant::now();
    let dataset = pipeline.load_data(nrows)?;
    step_done(&format!("{:?}", start.elapsed()));

    let labels = &dataset.labels;
    let mean = labels.mean().unwrap_or(0.0);
    let (min, max) = labels
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    println!();
    kv("Samples", &dataset.n_samples().to_string());
    kv("Features", &FEATURE_COLUMNS.join(", "));
    if !dataset.is_empty() {
        kv("Fare", &format!("mean {:.2}, min {:.2}, max {:.2}", mean, min, max));
    }
    kv("Source", if was_cached { "cache" } else { "computed" });
    println!();

    Ok(())
}

pub fn cmd_cache_list(config: &PipelineConfig) -> anyhow::Result<()> {
    section("Cache");
    let cache = FeatureCache::open(&config.cache_path)?;
    let entries = cache.summary()?;

    if entries.is_empty() {
        println!("  {}", muted("no cached datasets"));
    } else {
        println!("  {:<12} {:>10} {:>10}", muted("nrows"), muted("samples"), muted("features"));
        println!("  {}", dim(&"─".repeat(34)));
        for entry in entries {
            println!("  {:<12} {:>10} {:>10}", entry.nrows, entry.n_samples, entry.n_features);
        }
    }
    println!();
    cache.close();

    Ok(())
}

pub fn cmd_cache_clear(config: &PipelineConfig) -> anyhow::Result<()> {
    section("Cache");
    let cache = FeatureCache::open(&config.cache_path)?;
    cache.clear()?;
    println!("  {} cleared {}", ok("✓"), config.cache_path.display());
    println!();

    Ok(())
}
