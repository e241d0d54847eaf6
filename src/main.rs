use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use downcharts::app::AppContext;
use downcharts::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config)?;

    match cli.command {
        Commands::Charts { site, html, json } => {
            commands::charts(&ctx, &site, html.as_deref(), json).await?;
        }
        Commands::Sites => {
            commands::list_sites(&ctx)?;
        }
        Commands::Parse { text } => {
            commands::parse(&ctx, &text)?;
        }
        Commands::Bot { comments, workers } => {
            commands::bot(&ctx, &comments, workers).await?;
        }
    }

    Ok(())
}
