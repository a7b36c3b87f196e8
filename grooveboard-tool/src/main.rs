//! Terminal editor for laying out pieces on a grooved board.

mod config;
mod editor;
mod error;
mod export;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

use crate::config::{catalogs, load_config, resolve_settings, EditOverrides};

#[derive(Parser)]
#[command(name = "groove")]
#[command(about = "Lay out pieces on a grooved board", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/grooveboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the board editor (default)
    Edit(EditArgs),

    /// List board sizes
    Boards,

    /// List piece templates
    Templates,
}

#[derive(Args, Default)]
struct EditArgs {
    /// Board size key: small, medium, large, or one from the config
    #[arg(long)]
    board: Option<String>,

    /// Start in touch mode (click opens the move menu)
    #[arg(long)]
    touch: bool,

    /// Start with an empty pool instead of the starter pieces
    #[arg(long)]
    empty: bool,
}

impl From<EditArgs> for EditOverrides {
    fn from(args: EditArgs) -> Self {
        EditOverrides {
            board: args.board,
            touch: args.touch,
            empty: args.empty,
        }
    }
}

fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("grooveboard").join("logs"))
}

/// File-only logging; the terminal belongs to the editor.
fn init_logging() -> Option<LoggerHandle> {
    let log_dir = log_dir()?;
    let logger = Logger::try_with_env_or_str("info")
        .ok()?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename("groove")
                .suffix("log")
                .suppress_timestamp(),
        )
        .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
        .start();
    match logger {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to start logging in {}: {}", log_dir.display(), e);
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging();

    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Edit(EditArgs::default())) {
        Command::Edit(args) => {
            let settings = resolve_settings(config, args.into())?;
            editor::run(settings)?;
        }
        Command::Boards => {
            let (boards, _) = catalogs(&config);
            for board in boards.all() {
                let stock = if board.in_stock { "in stock" } else { "out of stock" };
                println!(
                    "{:<8} {:<20} capacity {:>4}  {:>8}  {}",
                    board.key, board.label, board.capacity, board.price, stock
                );
                if !board.description.is_empty() {
                    println!("         {}", board.description);
                }
            }
        }
        Command::Templates => {
            let (_, templates) = catalogs(&config);
            for (index, template) in templates.all().iter().enumerate() {
                let visual = template.visual_ref.as_deref().unwrap_or("-");
                println!("{:>2}  {:<12} {:>4} units  {}", index, template.text, template.width, visual);
            }
        }
    }

    Ok(())
}
