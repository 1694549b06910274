// Entry point for the `image-stamper` command line tool.
// All stamping logic lives in the library; this file only parses arguments,
// sets up logging and maps outcomes to exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use image_stamper_lib::commands::{
    ReportFormat, SettingsUpdate, StampOptions, list_positions, show_settings, stamp, update_settings,
};
use image_stamper_lib::{Anchor, SettingsStore};

#[derive(Parser, Debug)]
#[command(name = "image-stamper", version, about = "Stamp a logo onto every image in a directory")]
struct Cli {
    /// Log per-image detail.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Settings file to use instead of the per-user default.
    #[arg(long, global = true)]
    settings_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stamp every supported image in the input directory and write JPEGs.
    Stamp(StampArgs),
    /// Inspect or change saved settings.
    Settings {
        #[command(subcommand)]
        cmd: SettingsCommand,
    },
    /// List valid logo positions.
    Positions,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print saved settings and where they are stored.
    Show,
    /// Update and save the given fields.
    Set(FieldArgs),
}

#[derive(Args, Debug)]
struct FieldArgs {
    /// Directory to read images from.
    #[arg(long = "input")]
    input_dir: Option<String>,

    /// Directory to write stamped JPEGs to (created if missing).
    #[arg(long = "output")]
    output_dir: Option<String>,

    /// Logo image file.
    #[arg(long = "logo")]
    logo_path: Option<String>,

    /// One of bottom-right, bottom-left, top-right, top-left, center.
    #[arg(long)]
    position: Option<Anchor>,

    /// Logo width as a fraction of the image's shorter side, in (0, 1].
    #[arg(long)]
    size_ratio: Option<f64>,

    /// Logo opacity, 0 to 255.
    #[arg(long)]
    opacity: Option<u8>,
}

impl From<FieldArgs> for SettingsUpdate {
    fn from(args: FieldArgs) -> Self {
        Self {
            input_dir: args.input_dir,
            output_dir: args.output_dir,
            logo_path: args.logo_path,
            position: args.position,
            logo_size_ratio: args.size_ratio,
            opacity: args.opacity,
        }
    }
}

#[derive(Args, Debug)]
struct StampArgs {
    #[command(flatten)]
    fields: FieldArgs,

    /// Maximum images processed at once.
    #[arg(long)]
    workers: Option<usize>,

    /// JPEG quality, 1 to 100.
    #[arg(long)]
    quality: Option<u8>,

    /// Emit one JSON object per event instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Save the resolved settings before running.
    #[arg(long, default_value_t = false)]
    save: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = match cli.settings_file {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::user_default().context("locate settings file")?,
    };
    debug!("Using settings at {}", store.path().display());

    match cli.cmd {
        Command::Stamp(args) => cmd_stamp(args, &store),
        Command::Settings { cmd: SettingsCommand::Show } => {
            println!("{}", show_settings(&store)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings { cmd: SettingsCommand::Set(fields) } => {
            let update = SettingsUpdate::from(fields);
            if update.is_empty() {
                warn!("Nothing to update");
                return Ok(ExitCode::SUCCESS);
            }
            update_settings(&store, &update).context("update settings")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Positions => {
            for name in list_positions() {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_stamp(args: StampArgs, store: &SettingsStore) -> anyhow::Result<ExitCode> {
    let options = StampOptions {
        overrides: args.fields.into(),
        workers: args.workers,
        quality: args.quality,
        format: if args.json { ReportFormat::Json } else { ReportFormat::Console },
        save: args.save,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")?;

    runtime.block_on(async {
        let shutdown = CancellationToken::new();
        let on_signal = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received");
                on_signal.cancel();
            }
        });

        match stamp(options, store, shutdown).await {
            Ok(summary) => {
                if summary.cancelled > 0 {
                    warn!("{} image(s) skipped after interrupt", summary.cancelled);
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) if e.is_batch_fatal() => {
                // Already reported on the event stream.
                warn!("{}", e);
                Ok(ExitCode::FAILURE)
            }
            Err(e) => Err(anyhow::Error::new(e).context("stamp")),
        }
    })
}
