/// Clap argument definitions
mod args;

/// `show`, `add` and `migrate` commands
mod day;

/// Terminal UI over today, the previous day and the index
mod journal;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use clap::Parser;

use bjournal_core::config::Config;
use bjournal_core::error::Result;

pub use args::Cli;
use args::Commands;

const LOG_FILE: &str = "bjournal.log";

/// Main entry point for the CLI
pub fn run_cli() {
    let cli = Cli::parse();
    init_logging(cli.command.is_none());

    let success = match cli.command {
        Some(Commands::Init { dir }) => handle_init(dir.or(cli.journal)),

        None => with_config(cli.journal, journal::handle_journal),

        Some(Commands::Show { date }) => {
            with_config(cli.journal, |config| day::handle_show(config, &date))
        }

        Some(Commands::Add { text, kind, date }) => with_config(cli.journal, |config| {
            day::handle_add(config, &text.join(" "), &kind, &date)
        }),

        Some(Commands::Migrate { from, to }) => with_config(cli.journal, |config| {
            day::handle_migrate(config, from.as_deref(), &to)
        }),

        Some(Commands::Serve { port }) => {
            with_config(cli.journal, |config| crate::server::handle_serve(config, port))
        }
    };

    if !success {
        std::process::exit(1);
    }
}

/// Load the config, applying the `--journal` override
fn load_config(journal_override: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(dir) = journal_override {
        config.journal_dir = dir;
    }
    Ok(config)
}

fn with_config(journal_override: Option<PathBuf>, run: impl FnOnce(&Config) -> bool) -> bool {
    match load_config(journal_override) {
        Ok(config) => run(&config),
        Err(e) => {
            eprintln!("✗ {}", e);
            false
        }
    }
}

/// Handle the init command
/// Returns true on success, false on error
fn handle_init(dir: Option<PathBuf>) -> bool {
    let dir = dir.unwrap_or_else(|| Config::default().journal_dir);

    match Config::init(dir.clone()) {
        Ok(_) => {
            println!("✓ Initialized bjournal");
            println!("  Journal: {}", dir.display());
            if let Some(path) = Config::config_path() {
                println!("  Config:  {}", path.display());
            }
            true
        }
        Err(e) => {
            eprintln!("✗ Error initializing bjournal: {}", e);
            false
        }
    }
}

/// Route `log` output through env_logger.
///
/// The terminal UI owns the screen, so in that mode records go to
/// `bjournal.log` instead of stderr.
fn init_logging(tui: bool) {
    let default_level = if tui { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if tui {
        match open_log_file() {
            Some(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            None => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    builder.init();
}

/// Append to `bjournal.log` next to the executable, or in the config
/// directory when that is not writable.
fn open_log_file() -> Option<File> {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(LOG_FILE)));
    let in_config = dirs::config_dir().map(|dir| dir.join("bjournal").join(LOG_FILE));

    beside_exe.into_iter().chain(in_config).find_map(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    })
}
