use crate::batch::{run_rate, RateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rmbs_rating::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "RMBS Credit Rating Service",
    about = "Rate residential mortgage portfolios over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rate a JSON payload file and print the breakdown
    Rate(RateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rate(args) => run_rate(args),
    }
}
