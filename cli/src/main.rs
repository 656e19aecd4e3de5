//! Mosaic CLI - render one composed page.
//!
//! ```text
//! mosaic --template page.html --components components.json -p hostname=example.com
//!    |
//!    v
//! MosaicConfig (~/.mosaic/config.toml) -> HttpFetcher -> PageBuilder -> stdout
//! ```
//!
//! Logs go to stderr (filtered by `RUST_LOG`) so stdout carries only the page.

use std::fs;
use std::io::{Write, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use mosaic_config::MosaicConfig;
use mosaic_engine::{JoinEnvelope, JsonEnvelope, PageBuilder, Params};
use mosaic_providers::HttpFetcher;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum EnvelopeKind {
    /// Concatenate bodies into `{{body}}`.
    #[default]
    Passthrough,
    /// Join bodies with `--separator` into `{{body}}`.
    Join,
    /// Merge JSON object bodies into `{{key}}` fields.
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "mosaic", version, about)]
struct Cli {
    /// Page template containing `{{placeholder}}` markers.
    #[arg(short, long)]
    template: PathBuf,

    /// JSON component configuration (`{"components": [{"endpoint": ...}]}`).
    #[arg(short, long)]
    components: Option<PathBuf>,

    /// Settings file. Defaults to ~/.mosaic/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t)]
    envelope: EnvelopeKind,

    /// Separator for the `join` envelope.
    #[arg(long, default_value = ",")]
    separator: String,

    /// Template parameter, repeatable. Overrides `[params]` from the config file.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Write the page here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

fn merge_params(defaults: Params, overrides: &[(String, String)]) -> Params {
    let mut params = defaults;
    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }
    params
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<MosaicConfig> {
    let loaded = match path {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            MosaicConfig::load_from(path)?
        }
        None => MosaicConfig::load()?,
    };
    Ok(loaded.unwrap_or_default())
}

async fn render(cli: &Cli, config: &MosaicConfig) -> Result<String> {
    let template = fs::read_to_string(&cli.template)
        .with_context(|| format!("failed to read template {}", cli.template.display()))?;

    let fetcher = HttpFetcher::new(&config.http_settings()).context("failed to build HTTP client")?;
    let mut builder = PageBuilder::new()
        .with_template(template)
        .with_fetcher(fetcher);

    if let Some(path) = &cli.components {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read components {}", path.display()))?;
        builder = builder
            .with_config(&source)
            .with_context(|| format!("invalid components {}", path.display()))?;
    }

    let params = merge_params(config.params(), &cli.params);
    tracing::debug!(
        components = builder.components().len(),
        params = params.len(),
        envelope = ?cli.envelope,
        "Building page"
    );

    let page = match cli.envelope {
        EnvelopeKind::Passthrough => builder.build(Some(&params)).await?,
        EnvelopeKind::Join => {
            builder
                .with_envelope(JoinEnvelope::new(&cli.separator))
                .build(Some(&params))
                .await?
        }
        EnvelopeKind::Json => {
            builder
                .with_envelope(JsonEnvelope)
                .build(Some(&params))
                .await?
        }
    };
    Ok(page)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_ref())?;
    let page = render(&cli, &config).await?;

    match &cli.output {
        Some(path) => fs::write(path, &page)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut out = stdout().lock();
            out.write_all(page.as_bytes())?;
            out.flush()?;
        }
    }

    Ok(())
}
