use anyhow::Result;
use clap::Parser;
use ridge_runner::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ridge_runner=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
