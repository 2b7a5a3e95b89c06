//! aether-purrsist binary.
//!
//! Reads `config.yaml` (or the path given with `--config`), opens the Aether
//! backend database read-only, renders the selected communities and
//! publishes the result to IPFS under a stable IPNS name.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use purrsist_archive::{Publisher, Settings, SiteBuilder};
use purrsist_ipfs::{ClientConfig, IpfsClient};
use purrsist_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Archive Aether communities to IPFS")]
struct Cli {
  /// Path to the configuration file (YAML, TOML or JSON).
  #[arg(short, long, default_value = "config.yaml")]
  config: PathBuf,

  /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Render into `--output` without contacting IPFS.
  #[arg(long, requires = "output")]
  dry_run: bool,

  /// Directory to render into with `--dry-run`.
  #[arg(long, value_name = "DIR")]
  output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let level = match cli.verbose {
    0 => LevelFilter::INFO,
    1 => LevelFilter::DEBUG,
    _ => LevelFilter::TRACE,
  };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy(),
    )
    .init();

  let settings = Settings::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let db_path = settings.db_path();
  if !db_path.is_file() {
    anyhow::bail!("Aether database {db_path:?} does not exist");
  }
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open database at {db_path:?}"))?;

  if cli.dry_run {
    let output = cli.output.context("--dry-run needs --output")?;
    tokio::fs::create_dir_all(&output)
      .await
      .with_context(|| format!("failed to create {output:?}"))?;

    let rules = settings.rules().context("invalid board rules")?;
    let base_url = settings.feeds.base_url.as_deref().unwrap_or(".");
    let stats = SiteBuilder::new(&store, &rules, &settings.feeds, base_url)
      .build(&output)
      .await
      .context("rendering failed")?;
    tracing::info!(boards = stats.boards, threads = stats.threads, "dry run complete");
    println!("{}", output.display());
    return Ok(());
  }

  let client = IpfsClient::new(ClientConfig {
    api_url: settings.api_url()?,
    timeout: settings.api_timeout(),
  })
  .context("failed to build IPFS client")?;

  let outcome = Publisher::new(&store, &client, &settings)?
    .run()
    .await
    .context("publish failed")?;

  println!("{}", outcome.cid);
  if settings.ipfs.pinremote.enabled {
    println!("https://{}.ipfs.dweb.link", outcome.cid);
  }

  Ok(())
}
