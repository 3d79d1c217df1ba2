use anyhow::{Context, Result};
use rbridge::{
    cli::{Cli, Commands},
    config::Config,
    extension::Extension,
    handlers,
    integration,
    lint::Linter,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; RUST_LOG overrides the default level.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Cli::parse();
    let cfg = Config::load();
    tracing::debug!(config = %cfg.config_path.display(), "configuration loaded");

    let workspace = match args.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match args.command {
        Commands::Console { file } => {
            let ext = Extension::from_config(cfg, workspace);
            handlers::console::run(&ext, &file).await
        }
        Commands::Gitignore { force } => {
            let path = integration::create_gitignore(&workspace, force)?;
            println!("Created {}", path.display());
            Ok(())
        }
        Commands::Lint { file, json } => {
            let diagnostics = Linter::from_config(&cfg).lint(&file).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&diagnostics)?);
            } else {
                for d in &diagnostics {
                    println!("{d}");
                }
            }
            Ok(())
        }
        Commands::InstallLinter => {
            Linter::from_config(&cfg).install().await?;
            println!("lintr installed");
            Ok(())
        }
    }
}
