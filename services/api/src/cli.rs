use crate::demo::{run_recommend, RecommendArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use transfer_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Transfer Match",
    about = "Run the college-transfer recommendation service or query it from the command line",
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
    /// Rank colleges for a profile against the bundled or a CSV catalog
    Recommend(RecommendArgs),
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
        Command::Recommend(args) => run_recommend(args).await,
    }
}
