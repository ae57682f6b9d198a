use aquasafe::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Api => cli::api::run().await,
        Command::Ui(args) => cli::ui::run(args).await,
        Command::Collect(args) => cli::pipeline::collect(args).await,
        Command::Preprocess => cli::pipeline::preprocess(),
        Command::Train(args) => cli::pipeline::train(args),
        Command::Evaluate => cli::pipeline::evaluate(),
        Command::Report => cli::pipeline::report(),
        Command::Pipeline(args) => cli::pipeline::run(args).await,
    }
}
