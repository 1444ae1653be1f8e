//! Command-line entry point.

use artfolio_app::{AppConfig, AppResult, WhiteboardHeader, load_script, replay};
use artfolio_core::storage::{FileBlobStore, FileStorage};
use artfolio_render::{RasterSurface, StickerAssets};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "artfolio", version, about = "Replay and export Artfolio drawings")]
struct Cli {
    /// Config file (TOML). Defaults apply when it does not exist.
    #[arg(short, long, global = true, env = "ARTFOLIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON event script onto a canvas, save it and print the image URI.
    Replay {
        /// JSON array of canvas events.
        #[arg(short, long)]
        script: PathBuf,
        /// Output directory for sessions and images (overrides `data_dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Resume a previously saved session instead of starting blank.
        #[arg(long)]
        resume: Option<String>,
        /// Id to save the session under. Defaults to the resumed id.
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("artfolio: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Replay { script, out, resume, id } => {
            let events = load_script(&script)?;
            let data_dir = out.unwrap_or_else(|| config.data_dir());
            log::info!("Writing to {}", data_dir.display());

            let storage = Arc::new(FileStorage::new(data_dir.join("sessions"))?);
            let blobs = Arc::new(FileBlobStore::new(data_dir.join("drawings"))?);
            let assets = StickerAssets::load_catalog(&config.canvas.stickers, &config.assets_dir);
            let surface = Arc::new(RasterSurface::from_config(&config.canvas, assets));

            let session_id = id.or_else(|| resume.clone()).unwrap_or_else(|| "drawing".to_string());
            let mut header = WhiteboardHeader::new(config.canvas.clone(), session_id.as_str(), storage, blobs, surface)
                .with_header_height(config.header_height);

            if let Some(resume) = resume {
                pollster::block_on(header.load(&resume))?;
                header.set_session_id(session_id);
            }

            let report = replay(header.open_editor(), &events);
            log::info!(
                "Replayed {} events ({} applied, {} ignored)",
                events.len(),
                report.applied,
                report.ignored
            );

            let uri = pollster::block_on(header.save())?;
            println!("{}", uri);
            Ok(())
        }
    }
}
