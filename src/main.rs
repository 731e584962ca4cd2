use clap::{Parser, Subcommand};
use pagecast::config::{self, Config};
use pagecast::cursor::ArchiveIndex;
use pagecast::cycle::{self, Runner};
use pagecast::imaging::RustBackend;
use pagecast::navigate::Archive;
use pagecast::publish::OutboxPublisher;
use pagecast::store::CursorStore;
use pagecast::{check, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagecast")]
#[command(about = "Post a scanned archive one page per run")]
#[command(long_about = "\
Post a scanned archive one page per run

Each `post` publishes the page under the cursor and advances the cursor:
next page, then the next volume, then the next series, then back to the
start of the archive.

Archive structure:

  archive/
  ├── 01-nausicaa/        # series (name from [catalog] series)
  │   ├── vol-01/         # volume
  │   │   ├── 001.jpg     # page
  │   │   └── 002.jpg
  │   └── vol-02/
  └── 02-akira/

Every level is ordered by the byte-wise sort of its names; zero-pad numbers.
Entries starting with '.' are ignored.

Logging goes to stderr and is controlled by RUST_LOG (default: info).
Run 'pagecast gen-config' to generate a documented pagecast.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = "pagecast.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish the page under the cursor and advance the cursor
    Post,
    /// Resolve and encode the page under the cursor without publishing
    Preview {
        /// Write the encoded image here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the cursor and the page it points at
    Status,
    /// Point the cursor at a zero-based series / volume / page
    Set {
        series: usize,
        volume: usize,
        page: usize,
    },
    /// Survey the archive for problems a run would hit
    Check,
    /// Print a stock pagecast.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Post => {
            let ctx = Context::load(&cli.config)?;
            let publisher = OutboxPublisher::new(&ctx.config.outbox);
            let runner = Runner {
                archive: &ctx.archive,
                store: &ctx.store,
                backend: &RustBackend,
                publisher: &publisher,
                fit: ctx.config.encoder.fit_config(),
            };
            let report = runner.run()?;
            output::print_cycle_report(&report);
        }
        Command::Preview { output: written } => {
            let ctx = Context::load(&cli.config)?;
            let index = ctx.store.load()?;
            let fit = ctx.config.encoder.fit_config();
            let prepared = cycle::prepare(&ctx.archive, &RustBackend, &fit, index)?;
            if let Some(path) = &written {
                std::fs::write(path, &prepared.image.bytes)?;
            }
            output::print_prepared(&prepared, written.as_deref());
        }
        Command::Status => {
            let ctx = Context::load(&cli.config)?;
            let index = ctx.store.load()?;
            let resolved = ctx.archive.resolve(index)?;
            output::print_status(ctx.store.path(), &resolved);
        }
        Command::Set {
            series,
            volume,
            page,
        } => {
            let ctx = Context::load(&cli.config)?;
            let index = ArchiveIndex::new(series, volume, page);
            let resolved = ctx.archive.resolve(index)?;
            ctx.store.save(index)?;
            info!(%index, cursor = %ctx.store.path().display(), "cursor set");
            output::print_cursor_set(index, &resolved, ctx.store.path());
        }
        Command::Check => {
            let ctx = Context::load(&cli.config)?;
            let report = check::check(&ctx.archive, Some(ctx.store.load()))?;
            output::print_check_report(&report, ctx.archive.catalog().names());
            if !report.is_healthy() {
                return Err("archive check found problems".into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Everything a command needs from the config file.
struct Context {
    config: Config,
    archive: Archive,
    store: CursorStore,
}

impl Context {
    /// File layer over defaults, then `PAGECAST_*` environment overrides.
    fn load(path: &Path) -> Result<Self, config::ConfigError> {
        let config = config::load_config(path)?.with_env(|var| std::env::var(var).ok())?;
        info!(
            config = %path.display(),
            archive_root = %config.archive_root.display(),
            byte_budget = config.encoder.byte_budget,
            "loaded config"
        );
        Ok(Self {
            archive: Archive::new(&config.archive_root, config.catalog.series.clone()),
            store: CursorStore::new(&config.cursor_path),
            config,
        })
    }
}

/// Log to stderr so stdout stays the command's output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
