//! Command-line argument structures and enums

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bj")]
#[command(version)]
#[command(about = "A bullet journal for the terminal", long_about = None)]
pub struct Cli {
    /// Override the journal directory
    #[arg(short, long, global = true)]
    pub journal: Option<PathBuf>,

    /// Without a subcommand the journal opens in the terminal UI
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file and create the journal directory
    Init {
        /// Journal directory (default: ~/Journal)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print a day's entries
    Show {
        /// Day to show: "today", "yesterday", "DD.MM.YYYY", "YYYY-MM-DD"
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Add an entry to a day
    Add {
        /// Entry text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Category: task, note, event or scheduled
        #[arg(short, long, default_value = "task")]
        kind: String,

        /// Day to add to
        #[arg(short, long, default_value = "today")]
        date: String,
    },

    /// Carry open entries of one day over to another
    Migrate {
        /// Source day (default: the latest day before the target)
        #[arg(short, long)]
        from: Option<String>,

        /// Target day
        #[arg(short, long, default_value = "today")]
        to: String,
    },

    /// Serve today's log as JSON
    Serve {
        /// Port to listen on (default: config's status_port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
