use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "rbridge", about = "Drive an R console from a script", version)]
pub struct Cli {
    /// Workspace root; the scratch directory and .gitignore live here.
    /// Defaults to the current directory.
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open a script and drive an R console from it interactively.
    Console {
        /// The R script to edit and send from.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write an R .gitignore to the workspace root.
    Gitignore {
        /// Overwrite an existing .gitignore.
        #[arg(long)]
        force: bool,
    },

    /// Lint an R file with lintr.
    Lint {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print diagnostics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Install lintr from CRAN.
    #[command(name = "install-linter")]
    InstallLinter,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
